//! ML and energy-market endpoints.
//!
//! Each handler validates presence of its required fields, tries the
//! upstream once, and on any failure answers from [`crate::ml`] within the
//! same request.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::upstream::tag_source;
use crate::{ml, sim, ApiError, AppState};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/api/ml/energy/predict", post(predict_energy))
        .route("/api/ml/water/detect-leak", post(detect_leak))
        .route(
            "/api/ml/agriculture/optimize-irrigation",
            post(optimize_irrigation),
        )
        .route("/api/blockchain/energy-market", get(energy_market))
}

#[derive(Debug, Default, Deserialize)]
struct PredictRequest {
    #[serde(default)]
    forecast: Option<Value>,
    #[serde(default)]
    timestamp: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct LeakRequest {
    #[serde(default)]
    water_usage: Option<f64>,
    #[serde(default)]
    timestamp: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct IrrigationRequest {
    #[serde(default)]
    soil_moisture: Option<f64>,
    #[serde(default)]
    temperature: Option<f64>,
    #[serde(default)]
    timestamp: Option<Value>,
}

/// JavaScript-style truthiness of an optional JSON flag.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Instant named by a request `timestamp`, else now.
///
/// Accepts epoch millis (fractions truncated) or an RFC 3339 string. Anything
/// else, or an instant too close to the representable range for the
/// generators to step a day either way, falls back to now.
fn anchored(timestamp: Option<&Value>) -> DateTime<FixedOffset> {
    // ---
    let now = sim::now();
    let requested = match timestamp {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|utc| utc.with_timezone(now.offset())),
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s).ok(),
        _ => None,
    };

    let margin = Duration::days(2);
    requested
        .filter(|at| {
            at.checked_sub_signed(margin).is_some() && at.checked_add_signed(margin).is_some()
        })
        .unwrap_or(now)
}

async fn predict_energy(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    // ---
    // Every field is optional, so a bodiless request is valid.
    let request = match payload {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => PredictRequest::default(),
        Err(rejection) => return Err(rejection.into()),
    };
    let hourly = is_truthy(request.forecast.as_ref());
    info!("POST /api/ml/energy/predict - hourly={}", hourly);

    let body = json!({ "forecast": request.forecast, "timestamp": request.timestamp });
    match state.ml.post_json("/api/energy/predict", &body).await {
        Ok(upstream) => Ok(Json(tag_source(upstream)).into_response()),
        Err(e) => {
            e.log_fallback("ML API");
            let at = anchored(request.timestamp.as_ref());
            let simulated = ml::predict_energy(&mut state.entropy.rng(), at, hourly);
            Ok(Json(simulated).into_response())
        }
    }
}

async fn detect_leak(
    State(state): State<AppState>,
    payload: Result<Json<LeakRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    // ---
    let Json(request) = payload?;
    let Some(water_usage) = request.water_usage else {
        return Err(ApiError::bad_request("water_usage parameter is required"));
    };
    info!("POST /api/ml/water/detect-leak - water_usage={}", water_usage);

    let body = json!({ "water_usage": water_usage, "timestamp": request.timestamp });
    match state.ml.post_json("/api/water/detect-leak", &body).await {
        Ok(upstream) => Ok(Json(tag_source(upstream)).into_response()),
        Err(e) => {
            e.log_fallback("ML API");
            let simulated = ml::detect_leak(&mut state.entropy.rng(), water_usage);
            Ok(Json(simulated).into_response())
        }
    }
}

async fn optimize_irrigation(
    State(state): State<AppState>,
    payload: Result<Json<IrrigationRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    // ---
    let Json(request) = payload?;
    let (Some(soil_moisture), Some(temperature)) = (request.soil_moisture, request.temperature)
    else {
        return Err(ApiError::bad_request(
            "soil_moisture and temperature parameters are required",
        ));
    };
    info!(
        "POST /api/ml/agriculture/optimize-irrigation - soil={} temp={}",
        soil_moisture, temperature
    );

    let body = json!({
        "soil_moisture": soil_moisture,
        "temperature": temperature,
        "timestamp": request.timestamp,
    });
    match state
        .ml
        .post_json("/api/agriculture/optimize-irrigation", &body)
        .await
    {
        Ok(upstream) => Ok(Json(tag_source(upstream)).into_response()),
        Err(e) => {
            e.log_fallback("ML API");
            let at = anchored(request.timestamp.as_ref());
            let simulated =
                ml::optimize_irrigation(&mut state.entropy.rng(), soil_moisture, temperature, at);
            Ok(Json(simulated).into_response())
        }
    }
}

async fn energy_market(State(state): State<AppState>) -> Response {
    // ---
    info!("GET /api/blockchain/energy-market");
    match state.ml.get_json("/api/blockchain/market-stats").await {
        Ok(upstream) => Json(tag_source(upstream)).into_response(),
        Err(e) => {
            e.log_fallback("Blockchain API");
            Json(ml::energy_market(&mut state.entropy.rng())).into_response()
        }
    }
}
