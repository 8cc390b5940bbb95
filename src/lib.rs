//! Simulated smart-infrastructure telemetry backend.
//!
//! Modules follow the Explicit Module Boundary Pattern (EMBP): each concern
//! lives behind one module, and sibling modules reach shared types through
//! the re-exports below rather than through each other's internals.
//!
//! - `sim` – signal synthesis and per-domain generators
//! - `chat` – ordered keyword rules for the assistant
//! - `ml` – local fallbacks for the ML and market services
//! - `upstream` – optional upstream HTTP client
//! - `routes` – axum gateway (REST + live channel)

pub mod chat;
pub mod config;
pub mod error;
pub mod ml;
pub mod models;
pub mod routes;
pub mod sim;
pub mod upstream;

pub use config::Config;
pub use error::ApiError;
pub use sim::Entropy;
pub use upstream::UpstreamClient;

// ---

/// Shared, immutable per-process state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Config,
    pub entropy: Entropy,
    pub ml: UpstreamClient,
    pub chat: UpstreamClient,
}

impl AppState {
    /// Build the upstream clients and entropy source described by `config`.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        // ---
        let http = upstream::http_client(config.upstream_timeout)?;
        let ml = UpstreamClient::new(http.clone(), config.ml_api_url.clone());
        let chat = UpstreamClient::new(http, config.chat_api_endpoint.clone())
            .with_bearer(config.chat_api_key.clone());
        tracing::info!(
            ml_upstream = ml.is_configured(),
            chat_upstream = chat.is_configured(),
            "upstreams resolved"
        );

        Ok(Self {
            entropy: Entropy::new(config.sim_seed),
            ml,
            chat,
            config,
        })
    }
}
