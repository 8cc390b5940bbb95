//! Synthetic telemetry generation.
//!
//! Every generator takes its random source and its instant as arguments, so
//! tests can pin output with a seeded [`StdRng`] and a fixed timestamp. The
//! routes draw a fresh generator per request from [`Entropy`].

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use chrono::{DateTime, FixedOffset, Local};
use rand::{rngs::StdRng, SeedableRng};

mod agriculture;
mod alerts;
mod dashboard;
mod energy;
mod insights;
mod irrigation;
pub mod signal;
mod water;
mod weather;

pub use agriculture::{simulate_agriculture, SOIL_THRESHOLDS};
pub use alerts::simulate_alerts;
pub use dashboard::{simulate_dashboard, simulate_snapshot};
pub use energy::{simulate_energy, BATTERY_THRESHOLDS};
pub use insights::{energy_insight, water_insight};
pub use irrigation::{irrigation_window, simulate_irrigation, RECOMMENDATIONS};
pub use water::{simulate_water, RESERVOIR_THRESHOLDS};
pub use weather::{pick_condition, simulate_weather};

// ---

/// Current wall-clock time in the server's local offset.
pub fn now() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

/// Hands out one random generator per request.
///
/// Unseeded, each generator comes from OS entropy. Seeded, generator `n` is
/// derived from `seed + n`, so a run with the same request order replays the
/// same values.
#[derive(Debug, Clone, Default)]
pub struct Entropy {
    seed: Option<u64>,
    draws: Arc<AtomicU64>,
}

impl Entropy {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            seed,
            draws: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn rng(&self) -> StdRng {
        // ---
        match self.seed {
            Some(seed) => {
                let n = self.draws.fetch_add(1, Ordering::Relaxed);
                StdRng::seed_from_u64(seed.wrapping_add(n))
            }
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    // ---
    use chrono::{DateTime, FixedOffset, TimeZone};
    use rand::{rngs::StdRng, SeedableRng};

    pub fn at(month: u32, day: u32, hour: u32, minute: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2025, month, day, hour, minute, 0)
            .unwrap()
    }

    pub fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }
}
