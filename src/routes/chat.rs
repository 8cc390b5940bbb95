//! `POST /api/chat`: forwards to the chat service when one is configured,
//! otherwise answers from the local rule table.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::{chat, sim, ApiError, AppState};

// ---

pub fn router() -> Router<AppState> {
    Router::new().route("/api/chat", post(handler))
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ChatRequest {
    #[serde(default)]
    message: Option<String>,
    /// Prior turns in whatever shape the client sends; forwarded upstream
    /// untouched, unused by the simulation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    history: Option<Value>,
}

async fn handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    // ---
    let Json(request) = payload?;
    let message = match request.message.as_deref() {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => return Err(ApiError::bad_request("Message is required")),
    };
    info!(
        "POST /api/chat - {} chars, {} history turns",
        message.len(),
        request
            .history
            .as_ref()
            .and_then(serde_json::Value::as_array)
            .map_or(0, Vec::len)
    );

    match state.chat.post_json("/chat", &request).await {
        Ok(body) => Ok(Json(body).into_response()),
        Err(e) => {
            e.log_fallback("chat API");
            let reply = chat::respond(&mut state.entropy.rng(), &message, sim::now());
            Ok(Json(reply).into_response())
        }
    }
}
