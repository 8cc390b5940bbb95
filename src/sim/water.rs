use chrono::{DateTime, FixedOffset, Timelike};
use rand::Rng;

use super::signal::{self, SignalProfile};
use crate::models::{Thresholds, WaterData};

const RESERVOIR: SignalProfile = SignalProfile::new(70.0, 8.0, 3.0);
const FLOW: SignalProfile = SignalProfile::new(40.0, 10.0, 5.0);
const QUALITY: SignalProfile = SignalProfile::new(95.0, 5.0, 2.0);
const USAGE_HISTORY: SignalProfile = SignalProfile::new(65.0, 15.0, 5.0);

const PEAK_USAGE_FACTOR: f64 = 1.5;

/// Reservoir below 40% is critical, below 60% needs attention.
pub const RESERVOIR_THRESHOLDS: Thresholds = Thresholds::new(40.0, 60.0);

/// Morning (06-09) and evening (18-22) demand peaks.
fn usage_factor(hour: u32) -> f64 {
    match hour {
        6..=9 | 18..=22 => PEAK_USAGE_FACTOR,
        _ => 1.0,
    }
}

/// Reservoir, flow and quality readings with a 24h usage history.
pub fn simulate_water<R>(rng: &mut R, at: DateTime<FixedOffset>) -> WaterData
where
    R: Rng + ?Sized,
{
    // ---
    let reservoir = signal::percent(signal::trending_value(rng, RESERVOIR, &at));
    let flow = signal::trending_value(rng, FLOW, &at) * usage_factor(at.hour());
    let quality = signal::percent(signal::trending_value(rng, QUALITY, &at));

    let history = signal::history(&at, |ts| {
        signal::trending_value(&mut *rng, USAGE_HISTORY, ts) * usage_factor(ts.hour())
    });

    WaterData {
        reservoir,
        flow: flow.max(0.0).round() as i64,
        quality,
        status: RESERVOIR_THRESHOLDS.classify(reservoir as f64),
        history,
    }
}
