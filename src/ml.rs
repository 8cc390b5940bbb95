//! Local stand-ins for the ML and energy-market services.
//!
//! Each function produces the body the routes return when the upstream is
//! absent or failing. Bodies carry `success: true` and
//! `source: "simulation"`.

use chrono::{DateTime, Duration, FixedOffset};
use rand::Rng;
use serde::Serialize;

use crate::models::IrrigationZone;
use crate::sim;
use crate::upstream::SIMULATION_SOURCE;

const FORECAST_HOURS: i64 = 24;
const TARGET_MOISTURE: i64 = 50;
const MAX_EXPECTED_MOISTURE: f64 = 95.0;

/// Envelope shared by every simulated ML body.
#[derive(Debug, Serialize)]
pub struct Simulated<T> {
    pub success: bool,
    #[serde(flatten)]
    pub payload: T,
    pub source: &'static str,
}

impl<T> Simulated<T> {
    fn new(payload: T) -> Self {
        Self {
            success: true,
            payload,
            source: SIMULATION_SOURCE,
        }
    }
}

/// `{"result": ...}` payload.
#[derive(Debug, Serialize)]
pub struct Verdict<T> {
    pub result: T,
}

// --- energy prediction

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyPrediction {
    /// Hourly solar output for the next 24 hours.
    Forecast(Vec<ForecastPoint>),
    /// Solar output at a single instant.
    Prediction(SolarPrediction),
}

#[derive(Debug, Serialize)]
pub struct ForecastPoint {
    /// Local `HH:MM`.
    pub time: String,
    /// Solar output in kW.
    pub output: f64,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

#[derive(Debug, Serialize)]
pub struct SolarPrediction {
    pub solar_output: f64,
    /// RFC 3339.
    pub timestamp: String,
}

pub fn predict_energy<R>(
    rng: &mut R,
    at: DateTime<FixedOffset>,
    hourly: bool,
) -> Simulated<EnergyPrediction>
where
    R: Rng + ?Sized,
{
    // ---
    if hourly {
        let points = (0..FORECAST_HOURS)
            .map(|i| {
                let ts = at + Duration::hours(i);
                ForecastPoint {
                    time: ts.format("%H:%M").to_string(),
                    output: sim::simulate_energy(&mut *rng, ts).solar,
                    timestamp: ts.timestamp_millis(),
                }
            })
            .collect();
        return Simulated::new(EnergyPrediction::Forecast(points));
    }

    Simulated::new(EnergyPrediction::Prediction(SolarPrediction {
        solar_output: sim::simulate_energy(rng, at).solar,
        timestamp: at.to_rfc3339(),
    }))
}

// --- leak detection

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LeakSeverity {
    High,
    Medium,
    None,
}

#[derive(Debug, Serialize)]
pub struct LeakResult {
    pub leak_detected: bool,
    /// Percent.
    pub confidence: u32,
    pub severity: LeakSeverity,
    pub recommendation: &'static str,
    pub anomaly_details: AnomalyDetails,
}

#[derive(Debug, Serialize)]
pub struct AnomalyDetails {
    pub is_anomaly: bool,
    pub anomaly_score: f64,
    pub water_usage: f64,
}

/// Usage outside `[10, 90]` is treated as a leak.
pub fn is_abnormal_usage(water_usage: f64) -> bool {
    water_usage > 90.0 || water_usage < 10.0
}

pub fn detect_leak<R>(rng: &mut R, water_usage: f64) -> Simulated<Verdict<LeakResult>>
where
    R: Rng + ?Sized,
{
    // ---
    let abnormal = is_abnormal_usage(water_usage);
    let draw: u32 = if abnormal {
        70 + rng.gen_range(0..30)
    } else {
        rng.gen_range(0..20)
    };

    let result = if abnormal {
        LeakResult {
            leak_detected: true,
            confidence: draw,
            severity: if draw > 80 {
                LeakSeverity::High
            } else {
                LeakSeverity::Medium
            },
            recommendation: "Investigate unusual water usage patterns",
            anomaly_details: AnomalyDetails {
                is_anomaly: true,
                anomaly_score: -0.5,
                water_usage,
            },
        }
    } else {
        LeakResult {
            leak_detected: false,
            confidence: 100 - draw,
            severity: LeakSeverity::None,
            recommendation: "No action needed",
            anomaly_details: AnomalyDetails {
                is_anomaly: false,
                anomaly_score: 0.5,
                water_usage,
            },
        }
    };

    Simulated::new(Verdict { result })
}

// --- irrigation optimization

#[derive(Debug, Serialize)]
pub struct IrrigationPlan {
    pub zones: Vec<IrrigationZone>,
    pub recommendation: String,
    pub moisture_deficit: i64,
    pub current_moisture: f64,
    pub target_moisture: i64,
    pub expected_moisture: i64,
}

pub fn optimize_irrigation<R>(
    rng: &mut R,
    soil_moisture: f64,
    temperature: f64,
    at: DateTime<FixedOffset>,
) -> Simulated<Verdict<IrrigationPlan>>
where
    R: Rng + ?Sized,
{
    // ---
    let zones = sim::simulate_irrigation(rng, at).zones;
    let expected = (soil_moisture + 30.0).round().min(MAX_EXPECTED_MOISTURE) as i64;

    let mut advice = vec![
        format!(
            "Optimal irrigation time: {} minutes to reach target soil moisture.",
            (30.0 - soil_moisture / 2.0).round() as i64
        ),
        format!("Expected soil moisture after irrigation: {}%.", expected),
    ];
    if temperature > 30.0 {
        advice.push(
            "High temperature detected. Consider irrigating during early morning or evening for better efficiency."
                .to_string(),
        );
    }

    Simulated::new(Verdict {
        result: IrrigationPlan {
            zones,
            recommendation: advice.join(" "),
            moisture_deficit: (TARGET_MOISTURE as f64 - soil_moisture).round() as i64,
            current_moisture: soil_moisture,
            target_moisture: TARGET_MOISTURE,
            expected_moisture: expected,
        },
    })
}

// --- energy market

#[derive(Debug, Serialize)]
pub struct MarketStats {
    /// kWh.
    pub total_energy_traded: i64,
    pub total_value_traded: f64,
    pub transaction_count: u32,
    /// Price per kWh, four decimals.
    pub average_price: String,
    pub active_users: u32,
    pub pending_transactions: u32,
}

#[derive(Debug, Serialize)]
pub struct MarketSnapshot {
    pub stats: MarketStats,
}

pub fn energy_market<R>(rng: &mut R) -> Simulated<MarketSnapshot>
where
    R: Rng + ?Sized,
{
    // ---
    let stats = MarketStats {
        total_energy_traded: sim::signal::random_in_range(rng, 500.0, 1500.0).round() as i64,
        total_value_traded: sim::signal::random_in_range(rng, 1000.0, 6000.0).round() / 100.0,
        transaction_count: rng.gen_range(10..60),
        average_price: format!("{:.4}", sim::signal::random_in_range(rng, 0.1, 0.3)),
        active_users: rng.gen_range(5..15),
        pending_transactions: rng.gen_range(0..3),
    };
    Simulated::new(MarketSnapshot { stats })
}
