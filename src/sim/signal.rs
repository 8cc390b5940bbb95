//! Daily-sinusoid-plus-noise signal synthesis shared by all domains.

use std::f64::consts::PI;

use chrono::{DateTime, Duration, FixedOffset, Timelike};
use rand::Rng;

use crate::models::HistoryPoint;

/// Number of samples in a synthetic history.
pub const HISTORY_POINTS: usize = 7;

/// Baseline, daily amplitude and noise half-width of one metric.
#[derive(Debug, Clone, Copy)]
pub struct SignalProfile {
    pub baseline: f64,
    pub amplitude: f64,
    pub noise: f64,
}

impl SignalProfile {
    pub const fn new(baseline: f64, amplitude: f64, noise: f64) -> Self {
        Self {
            baseline,
            amplitude,
            noise,
        }
    }
}

/// Uniform draw in `[min, max)`; returns `min` for an empty range.
pub fn random_in_range<R>(rng: &mut R, min: f64, max: f64) -> f64
where
    R: Rng + ?Sized,
{
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

/// `sin(2π · hour / 24)` for the local hour of `at`.
pub fn day_factor(at: &DateTime<FixedOffset>) -> f64 {
    (f64::from(at.hour()) / 24.0 * PI * 2.0).sin()
}

/// `baseline + amplitude · day_factor + uniform(-noise, noise)`.
///
/// No clamping happens here; callers bound the result for their metric.
pub fn trending_value<R>(rng: &mut R, profile: SignalProfile, at: &DateTime<FixedOffset>) -> f64
where
    R: Rng + ?Sized,
{
    let noise = random_in_range(rng, -profile.noise, profile.noise);
    profile.baseline + profile.amplitude * day_factor(at) + noise
}

/// Clamp to `[0, 100]` and round to a whole percent.
pub fn percent(value: f64) -> i64 {
    value.clamp(0.0, 100.0).round() as i64
}

/// Round to one decimal place.
pub fn one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Resample `sample` at `at - 24h, at - 20h, ... at`, labelled `0:00`..`24:00`.
pub fn history<F>(at: &DateTime<FixedOffset>, mut sample: F) -> Vec<HistoryPoint>
where
    F: FnMut(&DateTime<FixedOffset>) -> f64,
{
    (0..HISTORY_POINTS as i64)
        .map(|i| {
            let offset = *at - Duration::hours(24 - i * 4);
            HistoryPoint {
                time: format!("{}:00", i * 4),
                value: sample(&offset).round() as i64,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::sim::testing::{at, rng};

    #[test]
    fn trending_value_stays_within_envelope() {
        // ---
        let profile = SignalProfile::new(65.0, 15.0, 5.0);
        let mut rng = rng(1);
        for hour in 0..24 {
            let t = at(3, 10, hour, 0);
            let v = trending_value(&mut rng, profile, &t);
            let centre = 65.0 + 15.0 * day_factor(&t);
            assert!((v - centre).abs() <= 5.0, "hour {hour}: {v} vs {centre}");
        }
    }

    #[test]
    fn zero_noise_is_deterministic() {
        // ---
        let profile = SignalProfile::new(10.0, 4.0, 0.0);
        let t = at(3, 10, 6, 0);
        let v = trending_value(&mut rng(9), profile, &t);
        // sin(π/2) at 06:00
        assert!((v - 14.0).abs() < 1e-9);
    }

    #[test]
    fn history_has_seven_increasing_labels() {
        // ---
        let t = at(3, 10, 12, 30);
        let mut seen = Vec::new();
        let points = history(&t, |ts| {
            seen.push(*ts);
            1.0
        });

        assert_eq!(points.len(), HISTORY_POINTS);
        let labels: Vec<_> = points.iter().map(|p| p.time.as_str()).collect();
        assert_eq!(
            labels,
            ["0:00", "4:00", "8:00", "12:00", "16:00", "20:00", "24:00"]
        );
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(seen[0], t - Duration::hours(24));
        assert_eq!(seen[6], t);
    }

    #[test]
    fn percent_clamps_before_rounding() {
        // ---
        assert_eq!(percent(101.7), 100);
        assert_eq!(percent(-3.2), 0);
        assert_eq!(percent(49.5), 50);
    }
}
