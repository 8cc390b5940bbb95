use chrono::{DateTime, FixedOffset};
use rand::Rng;

use super::{energy_insight, simulate_agriculture, simulate_energy, simulate_water, water_insight};
use crate::models::{DashboardData, DomainSnapshot, Insights};

/// Energy, water and agriculture readings for one instant.
pub fn simulate_snapshot<R>(rng: &mut R, at: DateTime<FixedOffset>) -> DomainSnapshot
where
    R: Rng + ?Sized,
{
    DomainSnapshot {
        energy: simulate_energy(rng, at),
        water: simulate_water(rng, at),
        agriculture: simulate_agriculture(rng, at),
    }
}

/// A [`DomainSnapshot`] plus one energy and one water insight.
pub fn simulate_dashboard<R>(rng: &mut R, at: DateTime<FixedOffset>) -> DashboardData
where
    R: Rng + ?Sized,
{
    // ---
    let DomainSnapshot {
        energy,
        water,
        agriculture,
    } = simulate_snapshot(rng, at);

    let insights = Insights {
        energy: energy_insight(rng, &energy, at),
        water: water_insight(rng),
    };

    DashboardData {
        energy,
        water,
        agriculture,
        insights,
    }
}
