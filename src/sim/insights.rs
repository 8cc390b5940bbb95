//! Templated one-line insights shown under the dashboard cards.
//!
//! Each call picks one template uniformly; repeats across calls are expected.

use chrono::{DateTime, FixedOffset, Timelike};
use rand::Rng;

use super::signal::random_in_range;
use crate::models::EnergyData;

const TEMPLATES_PER_DOMAIN: usize = 5;

fn hours_ahead(at: &DateTime<FixedOffset>, hours: u32) -> u32 {
    (at.hour() + hours) % 24
}

fn rounded_between<R>(rng: &mut R, min: f64, max: f64) -> i64
where
    R: Rng + ?Sized,
{
    random_in_range(rng, min, max).round() as i64
}

pub fn energy_insight<R>(rng: &mut R, energy: &EnergyData, at: DateTime<FixedOffset>) -> String
where
    R: Rng + ?Sized,
{
    // ---
    match rng.gen_range(0..TEMPLATES_PER_DOMAIN) {
        0 => format!(
            "Peak energy demand predicted at {}:00 today. Consider optimizing load distribution.",
            hours_ahead(&at, 2)
        ),
        1 => format!(
            "Solar generation efficiency at {}% today. Battery predicted to reach full charge by {}:00.",
            energy.solar.trunc() as i64 + 10,
            hours_ahead(&at, 4)
        ),
        2 => format!(
            "AI analysis indicates potential for {}% energy savings by shifting irrigation to off-peak hours.",
            rounded_between(rng, 15.0, 30.0)
        ),
        3 => format!(
            "Grid demand expected to decrease by {}% if forecasted sunshine materializes tomorrow.",
            rounded_between(rng, 10.0, 25.0)
        ),
        _ => "Battery storage trending downward. AI recommends reducing non-essential consumption over next 3 hours."
            .to_string(),
    }
}

pub fn water_insight<R>(rng: &mut R) -> String
where
    R: Rng + ?Sized,
{
    // ---
    match rng.gen_range(0..TEMPLATES_PER_DOMAIN) {
        0 => format!(
            "Water usage elevated in northern sector. Potential leak detected with {}% confidence.",
            rounded_between(rng, 75.0, 95.0)
        ),
        1 => format!(
            "Reservoir levels will reach optimal capacity in approximately {} hours based on current inflow.",
            rounded_between(rng, 2.0, 8.0)
        ),
        2 => format!(
            "Smart water allocation has reduced consumption by {}% compared to last month.",
            rounded_between(rng, 10.0, 30.0)
        ),
        3 => "Flow rate fluctuations detected in east pipeline. Preventative maintenance recommended within 48 hours."
            .to_string(),
        _ => "AI predicts water demand spike in 3 hours based on historical patterns. Automated pressure adjustment scheduled."
            .to_string(),
    }
}
