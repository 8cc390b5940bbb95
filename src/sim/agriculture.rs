use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use rand::Rng;

use super::signal::{self, SignalProfile};
use crate::models::{AgricultureData, IrrigationState, Thresholds};

const SOIL: SignalProfile = SignalProfile::new(45.0, 10.0, 5.0);
const AIR_TEMP: SignalProfile = SignalProfile::new(24.0, 6.0, 2.0);

/// Soil below 30% is critical, below 38% needs attention.
pub const SOIL_THRESHOLDS: Thresholds = Thresholds::new(30.0, 38.0);

/// Soil dries out June through September.
fn seasonal_factor(month0: u32) -> f64 {
    if (5..=8).contains(&month0) {
        0.7
    } else {
        1.2
    }
}

/// Soil moisture, air temperature and the derived irrigation switch.
pub fn simulate_agriculture<R>(rng: &mut R, at: DateTime<FixedOffset>) -> AgricultureData
where
    R: Rng + ?Sized,
{
    // ---
    let soil = signal::trending_value(rng, SOIL, &at) * seasonal_factor(at.month0());
    let soil = signal::percent(soil);
    let temp = signal::trending_value(rng, AIR_TEMP, &at).round() as i64;

    let daylight = (6..=18).contains(&at.hour());
    let irrigation = if (soil as f64) < SOIL_THRESHOLDS.attention_below && daylight {
        IrrigationState::On
    } else {
        IrrigationState::Off
    };

    AgricultureData {
        soil,
        temp,
        irrigation,
        status: SOIL_THRESHOLDS.classify(soil as f64),
    }
}
