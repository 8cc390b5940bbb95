//! Live channel on `GET /ws`.
//!
//! Each connection gets one initial dashboard frame, then an update frame
//! every `live_interval`. Clients can also ask for a specific data set with
//! `{"type":"request_data","dataType":...,"requestId":...}`.
//!
//! The update ticker belongs to the connection task: it is created after the
//! upgrade and dropped when the loop ends, so no timer outlives its socket.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::models::{Alert, DashboardData, DomainSnapshot, IrrigationData, WeatherDay};
use crate::{sim, AppState};

// ---

pub fn router() -> Router<AppState> {
    Router::new().route("/ws", get(upgrade))
}

/// Frames pushed to the client.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerMessage {
    Initial {
        data: DashboardData,
    },
    Update {
        timestamp: i64,
        data: DomainSnapshot,
    },
    Response {
        #[serde(rename = "requestId", skip_serializing_if = "Option::is_none")]
        request_id: Option<Value>,
        #[serde(rename = "dataType", skip_serializing_if = "Option::is_none")]
        data_type: Option<String>,
        data: RequestedData,
    },
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestedData {
    Alerts(Vec<Alert>),
    Irrigation(IrrigationData),
    Weather(Vec<WeatherDay>),
    Dashboard(DashboardData),
}

/// Frames accepted from the client.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientMessage {
    RequestData {
        #[serde(rename = "dataType", default)]
        data_type: Option<String>,
        #[serde(rename = "requestId", default)]
        request_id: Option<Value>,
    },
}

async fn upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| client_loop(socket, state))
}

async fn client_loop(mut socket: WebSocket, state: AppState) {
    // ---
    info!("live client connected");

    let initial = ServerMessage::Initial {
        data: sim::simulate_dashboard(&mut state.entropy.rng(), sim::now()),
    };
    if send(&mut socket, &initial).await.is_err() {
        return;
    }

    let period = state.config.live_interval;
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let at = sim::now();
                let update = ServerMessage::Update {
                    timestamp: at.timestamp_millis(),
                    data: sim::simulate_snapshot(&mut state.entropy.rng(), at),
                };
                if send(&mut socket, &update).await.is_err() {
                    break;
                }
            }
            message = socket.recv() => {
                let Some(Ok(message)) = message else {
                    break;
                };

                match message {
                    Message::Text(text) => {
                        let Some(reply) = handle_text(&state, text.as_str()) else {
                            continue;
                        };
                        if send(&mut socket, &reply).await.is_err() {
                            break;
                        }
                    }
                    Message::Ping(payload) => {
                        if socket.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Message::Close(_) => break,
                    Message::Binary(_) | Message::Pong(_) => {}
                }
            }
        }
    }

    info!("live client disconnected");
}

/// Parse one inbound text frame; malformed frames are logged and dropped.
fn handle_text(state: &AppState, text: &str) -> Option<ServerMessage> {
    // ---
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(err) => {
            warn!(error = %err, "ignoring live message");
            return None;
        }
    };
    debug!("live message received: {:?}", message);

    let ClientMessage::RequestData {
        data_type,
        request_id,
    } = message;
    Some(ServerMessage::Response {
        data: requested_data(state, data_type.as_deref()),
        request_id,
        data_type,
    })
}

fn requested_data(state: &AppState, data_type: Option<&str>) -> RequestedData {
    // ---
    let mut rng = state.entropy.rng();
    let at = sim::now();
    match data_type {
        Some("alerts") => RequestedData::Alerts(sim::simulate_alerts(&mut rng, at)),
        Some("irrigation") => RequestedData::Irrigation(sim::simulate_irrigation(&mut rng, at)),
        Some("weather") => RequestedData::Weather(sim::simulate_weather(&mut rng, at)),
        _ => RequestedData::Dashboard(sim::simulate_dashboard(&mut rng, at)),
    }
}

async fn send(socket: &mut WebSocket, message: &ServerMessage) -> Result<(), axum::Error> {
    // ---
    let text = match serde_json::to_string(message) {
        Ok(text) => text,
        Err(err) => {
            warn!(error = %err, "failed to serialise live frame");
            return Ok(());
        }
    };
    socket.send(Message::Text(text.into())).await
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::Config;

    fn state() -> AppState {
        AppState::from_config(Config::default()).unwrap()
    }

    #[test]
    fn request_data_echoes_request_id() {
        // ---
        let reply = handle_text(
            &state(),
            r#"{"type":"request_data","dataType":"alerts","requestId":"abc-1"}"#,
        )
        .unwrap();
        let value = serde_json::to_value(&reply).unwrap();

        assert_eq!(value["type"], "response");
        assert_eq!(value["requestId"], "abc-1");
        assert_eq!(value["dataType"], "alerts");
        assert!(value["data"].as_array().unwrap().len() >= 3);
    }

    #[test]
    fn unknown_data_type_returns_dashboard() {
        // ---
        let reply = handle_text(&state(), r#"{"type":"request_data","requestId":7}"#).unwrap();
        let value = serde_json::to_value(&reply).unwrap();

        assert_eq!(value["requestId"], 7);
        assert!(value.get("dataType").is_none());
        assert!(value["data"]["insights"]["energy"].is_string());
    }

    #[test]
    fn malformed_frames_are_ignored() {
        // ---
        assert!(handle_text(&state(), "not json").is_none());
        assert!(handle_text(&state(), r#"{"type":"subscribe"}"#).is_none());
    }

    #[test]
    fn update_frame_shape() {
        // ---
        let at = sim::now();
        let update = ServerMessage::Update {
            timestamp: at.timestamp_millis(),
            data: sim::simulate_snapshot(&mut state().entropy.rng(), at),
        };
        let value = serde_json::to_value(&update).unwrap();

        assert_eq!(value["type"], "update");
        assert!(value["data"]["energy"]["battery"].is_string());
        assert!(value["data"]["water"]["history"].is_array());
        assert!(value["data"]["agriculture"]["irrigation"].is_string());
    }
}
