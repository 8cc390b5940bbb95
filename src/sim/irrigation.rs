use chrono::{DateTime, FixedOffset, Timelike};
use rand::Rng;

use super::signal;
use crate::models::{IrrigationData, IrrigationZone};

struct ZoneProfile {
    id: &'static str,
    name: &'static str,
    activation_chance: f64,
    minutes: (f64, f64),
}

const ZONES: [ZoneProfile; 3] = [
    ZoneProfile {
        id: "zone1",
        name: "North Field Zone",
        activation_chance: 0.7,
        minutes: (10.0, 20.0),
    },
    ZoneProfile {
        id: "zone2",
        name: "East Field Zone",
        activation_chance: 0.5,
        minutes: (5.0, 15.0),
    },
    ZoneProfile {
        id: "zone3",
        name: "South Field Zone",
        activation_chance: 0.6,
        minutes: (8.0, 18.0),
    },
];

pub const RECOMMENDATIONS: [&str; 5] = [
    "Increase irrigation in northeast zones. Reduce water in central area to prevent overwatering.",
    "Soil moisture levels optimal. Consider reducing irrigation duration by 10% in all zones.",
    "Weather forecast indicates rain tomorrow. Consider postponing irrigation for water conservation.",
    "Soil sensors in South Field Zone indicate dryness. Consider extending irrigation duration.",
    "North Field Zone approaching optimal moisture levels. System will automatically stop irrigation in 5 minutes.",
];

const IDLE: &str = "0 min";

/// Early morning (05-08) and evening (18-21) watering windows.
pub fn irrigation_window(hour: u32) -> bool {
    matches!(hour, 5..=8 | 18..=21)
}

/// Zone states plus an advisory sentence.
///
/// The advisory is drawn independently of the zone states.
pub fn simulate_irrigation<R>(rng: &mut R, at: DateTime<FixedOffset>) -> IrrigationData
where
    R: Rng + ?Sized,
{
    // ---
    let window = irrigation_window(at.hour());

    let zones = ZONES
        .iter()
        .map(|zone| {
            let active = window && rng.gen_bool(zone.activation_chance);
            let duration = if active {
                let (lo, hi) = zone.minutes;
                format!("{} min", signal::random_in_range(&mut *rng, lo, hi).floor() as i64)
            } else {
                IDLE.to_string()
            };
            IrrigationZone {
                id: zone.id.to_string(),
                name: zone.name.to_string(),
                active,
                duration,
            }
        })
        .collect();

    let recommendation = RECOMMENDATIONS[rng.gen_range(0..RECOMMENDATIONS.len())];

    IrrigationData {
        zones,
        recommendation: recommendation.to_string(),
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::sim::testing::{at, rng};

    #[test]
    fn inactive_zones_report_zero_minutes() {
        // ---
        let mut rng = rng(61);
        for hour in 0..24 {
            for _ in 0..50 {
                for zone in simulate_irrigation(&mut rng, at(6, 1, hour, 0)).zones {
                    assert_eq!(!zone.active, zone.duration == IDLE, "{zone:?}");
                }
            }
        }
    }

    #[test]
    fn nothing_runs_outside_window() {
        // ---
        let mut rng = rng(62);
        for hour in [0, 4, 9, 12, 17, 22, 23] {
            let data = simulate_irrigation(&mut rng, at(6, 1, hour, 0));
            assert!(data.zones.iter().all(|z| !z.active));
        }
    }

    #[test]
    fn active_durations_fall_in_zone_range() {
        // ---
        let mut rng = rng(63);
        for _ in 0..200 {
            let data = simulate_irrigation(&mut rng, at(6, 1, 6, 0));
            for (zone, profile) in data.zones.iter().zip(ZONES.iter()) {
                if !zone.active {
                    continue;
                }
                let minutes: f64 = zone.duration.trim_end_matches(" min").parse().unwrap();
                assert!(minutes >= profile.minutes.0 && minutes < profile.minutes.1);
            }
            assert!(RECOMMENDATIONS.contains(&data.recommendation.as_str()));
        }
    }
}
