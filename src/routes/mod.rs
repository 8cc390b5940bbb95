//! Route gateway: merges one subrouter per concern and installs the panic
//! guard that turns handler panics into the `{error}` envelope.

use std::any::Any;

use axum::{response::IntoResponse, response::Response, Router};
use tower_http::catch_panic::CatchPanicLayer;

use crate::{ApiError, AppState};

mod chat;
mod health;
mod live;
mod ml;
mod telemetry;

// ---

pub fn router(state: AppState) -> Router {
    // ---
    Router::new()
        .merge(telemetry::router())
        .merge(chat::router())
        .merge(ml::router())
        .merge(live::router())
        .merge(health::router())
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    // ---
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("<non-string panic>");
    tracing::error!("handler panicked: {}", detail);
    ApiError::Internal("Internal server error").into_response()
}
