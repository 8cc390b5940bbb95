use std::time::Duration;

use anyhow::Result;
use axum::{
    http::{HeaderMap, StatusCode as AxumStatus},
    routing::{get, post},
    Json, Router,
};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use smartinfra_telemetry::Config;

mod common;

/// Upstream stub: leak detection fails, market stats and prediction succeed,
/// chat insists on the bearer key.
fn stub_upstream() -> Router {
    Router::new()
        .route(
            "/api/water/detect-leak",
            post(|| async { (AxumStatus::SERVICE_UNAVAILABLE, "down") }),
        )
        .route(
            "/api/energy/predict",
            post(|| async { Json(json!({ "success": true, "source": "model-v2" })) }),
        )
        .route(
            "/api/blockchain/market-stats",
            get(|| async { Json(json!({ "success": true, "stats": { "active_users": 3 } })) }),
        )
        .route(
            "/chat",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let authorised = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    == Some("Bearer secret-key");
                if !authorised {
                    return Err(AxumStatus::UNAUTHORIZED);
                }
                let echoed = body["message"].as_str().unwrap_or_default().to_string();
                Ok(Json(json!({
                    "response": format!("upstream: {echoed}"),
                    "timestamp": 1,
                    "history": body["history"],
                })))
            }),
        )
}

fn unreachable_config() -> Config {
    Config {
        // nothing listens on port 1
        ml_api_url: Some("http://127.0.0.1:1".into()),
        upstream_timeout: Duration::from_millis(500),
        ..Config::default()
    }
}

async fn post_json(url: String, body: Value) -> Result<(StatusCode, Value)> {
    let response = Client::new().post(url).json(&body).send().await?;
    let status = response.status();
    Ok((status, response.json().await?))
}

#[tokio::test]
async fn leak_detection_simulated_verdicts() -> Result<()> {
    // ---
    let base = common::spawn_app(common::simulation_config()).await?;
    let url = format!("{}/api/ml/water/detect-leak", base);

    let (status, high) = post_json(url.clone(), json!({ "water_usage": 95 })).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(high["source"], "simulation");
    assert_eq!(high["result"]["leak_detected"], true);
    assert_eq!(high["result"]["anomaly_details"]["water_usage"], 95.0);

    let (_, normal) = post_json(url, json!({ "water_usage": 50 })).await?;
    assert_eq!(normal["result"]["leak_detected"], false);
    assert_eq!(normal["result"]["severity"], "none");
    Ok(())
}

#[tokio::test]
async fn required_fields_are_validated() -> Result<()> {
    // ---
    let base = common::spawn_app(common::simulation_config()).await?;

    let (status, body) = post_json(
        format!("{}/api/ml/water/detect-leak", base),
        json!({ "timestamp": 1 }),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "water_usage parameter is required");

    let (status, body) = post_json(
        format!("{}/api/ml/agriculture/optimize-irrigation", base),
        json!({ "soil_moisture": 30 }),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "soil_moisture and temperature parameters are required"
    );
    Ok(())
}

#[tokio::test]
async fn unreachable_upstream_falls_back() -> Result<()> {
    // ---
    let base = common::spawn_app(unreachable_config()).await?;

    let (status, plan) = post_json(
        format!("{}/api/ml/agriculture/optimize-irrigation", base),
        json!({ "soil_moisture": 20, "temperature": 32 }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plan["source"], "simulation");
    assert_eq!(plan["result"]["moisture_deficit"], 30);
    assert_eq!(plan["result"]["zones"].as_array().unwrap().len(), 3);

    let (_, forecast) = post_json(
        format!("{}/api/ml/energy/predict", base),
        json!({ "forecast": true }),
    )
    .await?;
    assert_eq!(forecast["source"], "simulation");
    assert_eq!(forecast["forecast"].as_array().unwrap().len(), 24);

    let market: Value = Client::new()
        .get(format!("{}/api/blockchain/energy-market", base))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(market["source"], "simulation");
    assert!(market["stats"]["average_price"].is_string());
    Ok(())
}

#[tokio::test]
async fn prediction_without_body_is_simulated() -> Result<()> {
    // ---
    let base = common::spawn_app(common::simulation_config()).await?;
    let response = Client::new()
        .post(format!("{}/api/ml/energy/predict", base))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert!(body["prediction"]["solar_output"].is_number());
    Ok(())
}

#[tokio::test]
async fn upstream_bodies_pass_through_with_source() -> Result<()> {
    // ---
    let upstream = common::serve(stub_upstream()).await?;
    let base = common::spawn_app(Config {
        ml_api_url: Some(format!("http://{}", upstream)),
        ..Config::default()
    })
    .await?;

    let (_, predicted) = post_json(format!("{}/api/ml/energy/predict", base), json!({})).await?;
    assert_eq!(predicted, json!({ "success": true, "source": "model-v2" }));

    let market: Value = Client::new()
        .get(format!("{}/api/blockchain/energy-market", base))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(market["source"], "ml_api");
    assert_eq!(market["stats"]["active_users"], 3);

    // non-2xx upstream is not surfaced to the caller
    let (status, leak) = post_json(
        format!("{}/api/ml/water/detect-leak", base),
        json!({ "water_usage": 5 }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(leak["source"], "simulation");
    assert_eq!(leak["result"]["leak_detected"], true);
    Ok(())
}

#[tokio::test]
async fn chat_upstream_with_key_and_fallback() -> Result<()> {
    // ---
    let upstream = common::serve(stub_upstream()).await?;
    let endpoint = format!("http://{}", upstream);

    let keyed = common::spawn_app(Config {
        chat_api_endpoint: Some(endpoint.clone()),
        chat_api_key: Some("secret-key".into()),
        ..Config::default()
    })
    .await?;
    let (_, reply) = post_json(format!("{}/api/chat", keyed), json!({ "message": "hi" })).await?;
    assert_eq!(reply["response"], "upstream: hi");

    // wrong key: upstream answers 401, local rules answer instead
    let unkeyed = common::spawn_app(Config {
        chat_api_endpoint: Some(endpoint),
        chat_api_key: Some("wrong".into()),
        ..Config::default()
    })
    .await?;
    let (status, reply) =
        post_json(format!("{}/api/chat", unkeyed), json!({ "message": "hi" })).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        reply["response"],
        "I'm analyzing the data now. Is there anything specific you'd like to know about?"
    );
    Ok(())
}

#[tokio::test]
async fn optional_fields_are_not_validated() -> Result<()> {
    // ---
    let base = common::spawn_app(common::simulation_config()).await?;
    let predict = format!("{}/api/ml/energy/predict", base);

    let (status, body) = post_json(
        predict.clone(),
        json!({ "timestamp": "2025-01-01T00:00:00Z" }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["prediction"]["timestamp"]
        .as_str()
        .unwrap()
        .starts_with("2025-01-01T00:00:00"));

    let (status, body) = post_json(
        predict.clone(),
        json!({ "forecast": true, "timestamp": 1_700_000_000_000.5 }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["forecast"][0]["timestamp"], 1_700_000_000_000_i64);

    let (status, _) = post_json(predict, json!({ "timestamp": "soon" })).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, leak) = post_json(
        format!("{}/api/ml/water/detect-leak", base),
        json!({ "water_usage": 95, "timestamp": "2025-01-01T00:00:00Z" }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(leak["result"]["leak_detected"], true);

    let (status, plan) = post_json(
        format!("{}/api/ml/agriculture/optimize-irrigation", base),
        json!({ "soil_moisture": 20, "temperature": 25, "timestamp": [1] }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plan["result"]["moisture_deficit"], 30);

    let (status, reply) = post_json(
        format!("{}/api/chat", base),
        json!({ "message": "hello", "history": "none" }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert!(reply["response"].is_string());
    Ok(())
}

#[tokio::test]
async fn out_of_range_timestamps_still_simulate() -> Result<()> {
    // ---
    let base = common::spawn_app(common::simulation_config()).await?;
    let predict = format!("{}/api/ml/energy/predict", base);

    for timestamp in [8_210_266_876_799_999_i64, -8_334_601_228_800_000_i64] {
        let (status, body) = post_json(
            predict.clone(),
            json!({ "forecast": true, "timestamp": timestamp }),
        )
        .await?;
        assert_eq!(status, StatusCode::OK, "timestamp {timestamp}");
        assert_eq!(body["forecast"].as_array().unwrap().len(), 24);

        let (status, _) = post_json(
            format!("{}/api/ml/agriculture/optimize-irrigation", base),
            json!({ "soil_moisture": 40, "temperature": 20, "timestamp": timestamp }),
        )
        .await?;
        assert_eq!(status, StatusCode::OK, "timestamp {timestamp}");
    }
    Ok(())
}

#[tokio::test]
async fn chat_history_is_forwarded_untouched() -> Result<()> {
    // ---
    let upstream = common::serve(stub_upstream()).await?;
    let base = common::spawn_app(Config {
        chat_api_endpoint: Some(format!("http://{}", upstream)),
        chat_api_key: Some("secret-key".into()),
        ..Config::default()
    })
    .await?;

    let history = json!({ "turns": ["earlier"] });
    let (status, reply) = post_json(
        format!("{}/api/chat", base),
        json!({ "message": "hi", "history": history }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["history"], history);
    Ok(())
}
