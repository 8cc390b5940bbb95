//! Configuration loader for the `smartinfra-telemetry` service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). Every upstream is optional: when a URL is absent
//! the service answers from its local simulation.
use std::{env, net::SocketAddr, time::Duration};

use anyhow::{anyhow, Result};

/// Parse an optional integer environment variable with a default value.
macro_rules! parse_env_u64 {
    ($var_name:expr, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<u64>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Read an optional string environment variable, treating blank values as unset.
macro_rules! optional_env {
    ($var_name:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// Address the HTTP/WebSocket server binds to.
    pub bind_addr: SocketAddr,

    /// Base URL of the optional ML / market service.
    pub ml_api_url: Option<String>,

    /// Base URL of the optional chat service.
    pub chat_api_endpoint: Option<String>,

    /// Bearer key sent to the chat service.
    pub chat_api_key: Option<String>,

    /// Upper bound on a single upstream call.
    pub upstream_timeout: Duration,

    /// Period between live-channel update frames.
    pub live_interval: Duration,

    /// Seed for reproducible simulation output.
    pub sim_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            ml_api_url: None,
            chat_api_endpoint: None,
            chat_api_key: None,
            upstream_timeout: Duration::from_millis(3000),
            live_interval: Duration::from_millis(5000),
            sim_seed: None,
        }
    }
}

/// Load configuration from environment variables with defaults.
///
/// Optional:
/// - `BIND_ADDR` – listen address (default: `0.0.0.0:5000`)
/// - `ML_API_URL` – ML / market service base URL
/// - `CHAT_API_ENDPOINT`, `CHAT_API_KEY` – chat service base URL and key
/// - `UPSTREAM_TIMEOUT_MS` – per-call upstream timeout (default: 3000)
/// - `LIVE_INTERVAL_MS` – live update period (default: 5000)
/// - `SIM_SEED` – fixed simulation seed
///
/// Returns an error if any variable is present but invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let defaults = Config::default();

    let bind_addr = match env::var("BIND_ADDR") {
        Ok(raw) => raw
            .parse::<SocketAddr>()
            .map_err(|e| anyhow!("Invalid BIND_ADDR: {}", e))?,
        Err(_) => defaults.bind_addr,
    };

    let upstream_timeout_ms = parse_env_u64!("UPSTREAM_TIMEOUT_MS", 3000);
    let live_interval_ms = parse_env_u64!("LIVE_INTERVAL_MS", 5000);
    if live_interval_ms == 0 {
        return Err(anyhow!("LIVE_INTERVAL_MS must be greater than zero"));
    }

    let sim_seed = env::var("SIM_SEED")
        .ok()
        .map(|v| v.parse::<u64>())
        .transpose()
        .map_err(|e| anyhow!("Invalid SIM_SEED: {}", e))?;

    Ok(Config {
        bind_addr,
        ml_api_url: optional_env!("ML_API_URL"),
        chat_api_endpoint: optional_env!("CHAT_API_ENDPOINT"),
        chat_api_key: env::var("CHAT_API_KEY").ok().filter(|v| !v.is_empty()),
        upstream_timeout: Duration::from_millis(upstream_timeout_ms),
        live_interval: Duration::from_millis(live_interval_ms),
        sim_seed,
    })
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    ///
    /// Masks the chat API key while showing all other values.
    pub fn log_config(&self) {
        // ---
        let masked_key = match &self.chat_api_key {
            Some(key) if key.chars().count() > 4 => {
                format!("{}****", key.chars().take(4).collect::<String>())
            }
            Some(_) => "****".to_string(),
            None => "<unset>".to_string(),
        };
        let or_sim = |v: &Option<String>| v.clone().unwrap_or_else(|| "<simulation>".into());

        tracing::info!("Configuration loaded:");
        tracing::info!("  BIND_ADDR           : {}", self.bind_addr);
        tracing::info!("  ML_API_URL          : {}", or_sim(&self.ml_api_url));
        tracing::info!("  CHAT_API_ENDPOINT   : {}", or_sim(&self.chat_api_endpoint));
        tracing::info!("  CHAT_API_KEY        : {}", masked_key);
        tracing::info!("  UPSTREAM_TIMEOUT_MS : {}", self.upstream_timeout.as_millis());
        tracing::info!("  LIVE_INTERVAL_MS    : {}", self.live_interval.as_millis());
        tracing::info!("  SIM_SEED            : {:?}", self.sim_seed);
    }
}
