//! Read-only simulation endpoints backing the dashboard cards.

use axum::{extract::State, routing::get, Json, Router};
use tracing::info;

use crate::models::{
    AgricultureData, Alert, DashboardData, EnergyData, IrrigationData, WaterData, WeatherDay,
};
use crate::{sim, AppState};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/api/dashboard", get(dashboard))
        .route("/api/energy", get(energy))
        .route("/api/water", get(water))
        .route("/api/agriculture", get(agriculture))
        .route("/api/alerts", get(alerts))
        .route("/api/irrigation", get(irrigation))
        .route("/api/weather", get(weather))
}

async fn dashboard(State(state): State<AppState>) -> Json<DashboardData> {
    info!("GET /api/dashboard");
    Json(sim::simulate_dashboard(&mut state.entropy.rng(), sim::now()))
}

async fn energy(State(state): State<AppState>) -> Json<EnergyData> {
    info!("GET /api/energy");
    Json(sim::simulate_energy(&mut state.entropy.rng(), sim::now()))
}

async fn water(State(state): State<AppState>) -> Json<WaterData> {
    info!("GET /api/water");
    Json(sim::simulate_water(&mut state.entropy.rng(), sim::now()))
}

async fn agriculture(State(state): State<AppState>) -> Json<AgricultureData> {
    info!("GET /api/agriculture");
    Json(sim::simulate_agriculture(&mut state.entropy.rng(), sim::now()))
}

async fn alerts(State(state): State<AppState>) -> Json<Vec<Alert>> {
    // ---
    let alerts = sim::simulate_alerts(&mut state.entropy.rng(), sim::now());
    info!("GET /api/alerts - {} alerts", alerts.len());
    Json(alerts)
}

async fn irrigation(State(state): State<AppState>) -> Json<IrrigationData> {
    // ---
    let data = sim::simulate_irrigation(&mut state.entropy.rng(), sim::now());
    info!(
        "GET /api/irrigation - {} active zones",
        data.zones.iter().filter(|z| z.active).count()
    );
    Json(data)
}

async fn weather(State(state): State<AppState>) -> Json<Vec<WeatherDay>> {
    info!("GET /api/weather");
    Json(sim::simulate_weather(&mut state.entropy.rng(), sim::now()))
}
