use chrono::{DateTime, FixedOffset};
use rand::Rng;

use super::signal::{self, SignalProfile};
use crate::models::{EnergyData, Thresholds};

const SOLAR: SignalProfile = SignalProfile::new(2.0, 3.0, 0.5);
const BATTERY: SignalProfile = SignalProfile::new(65.0, 15.0, 5.0);
const GRID: SignalProfile = SignalProfile::new(4.0, 2.0, 1.0);
const LOAD_HISTORY: SignalProfile = SignalProfile::new(60.0, 30.0, 10.0);

/// Battery charge below 30% is critical, below 50% needs attention.
pub const BATTERY_THRESHOLDS: Thresholds = Thresholds::new(30.0, 50.0);

/// Solar, battery and grid readings with a 24h load history.
pub fn simulate_energy<R>(rng: &mut R, at: DateTime<FixedOffset>) -> EnergyData
where
    R: Rng + ?Sized,
{
    // ---
    let solar = signal::trending_value(rng, SOLAR, &at).max(0.0);
    let battery = signal::percent(signal::trending_value(rng, BATTERY, &at));
    let grid = signal::trending_value(rng, GRID, &at).max(0.0);

    let history = signal::history(&at, |ts| signal::trending_value(&mut *rng, LOAD_HISTORY, ts));

    EnergyData {
        solar: signal::one_decimal(solar),
        battery,
        grid: signal::one_decimal(grid),
        status: BATTERY_THRESHOLDS.classify(battery as f64),
        history,
    }
}
