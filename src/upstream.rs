//! Thin JSON client for the optional ML, market and chat services.
//!
//! Calls are bounded by the client timeout and never retried. Callers treat
//! every [`UpstreamError`] as a cue to answer from the local simulation.

use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;

/// Source tag written into upstream bodies that do not carry one.
pub const UPSTREAM_SOURCE: &str = "ml_api";

/// Source tag for locally simulated bodies.
pub const SIMULATION_SOURCE: &str = "simulation";

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("no upstream configured")]
    NotConfigured,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream responded with status: {0}")]
    Status(StatusCode),
}

impl UpstreamError {
    /// Log that `service` is being replaced by the simulation.
    pub fn log_fallback(&self, service: &str) {
        // ---
        match self {
            Self::NotConfigured => {
                tracing::debug!("{} not configured, using simulation", service)
            }
            other => {
                tracing::warn!("{} unavailable, using simulation fallback: {}", service, other)
            }
        }
    }
}

/// Build the shared HTTP client with a per-request timeout.
pub fn http_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: Client,
    base_url: Option<String>,
    bearer: Option<String>,
}

impl UpstreamClient {
    pub fn new(http: Client, base_url: Option<String>) -> Self {
        Self {
            http,
            base_url,
            bearer: None,
        }
    }

    pub fn with_bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    pub async fn get_json(&self, path: &str) -> Result<Value, UpstreamError> {
        let url = self.url(path)?;
        self.send(self.http.get(url)).await
    }

    pub async fn post_json<B>(&self, path: &str, body: &B) -> Result<Value, UpstreamError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path)?;
        self.send(self.http.post(url).json(body)).await
    }

    fn url(&self, path: &str) -> Result<String, UpstreamError> {
        let base = self.base_url.as_deref().ok_or(UpstreamError::NotConfigured)?;
        Ok(format!("{}{}", base, path))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, UpstreamError> {
        // ---
        let request = match &self.bearer {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        let body: Value = response.json().await?;
        tracing::debug!("upstream responded {}", status);
        Ok(body)
    }
}

/// Mark an upstream body with [`UPSTREAM_SOURCE`] unless it names its own source.
pub fn tag_source(mut body: Value) -> Value {
    if let Value::Object(map) = &mut body {
        map.entry("source")
            .or_insert_with(|| Value::String(UPSTREAM_SOURCE.to_string()));
    }
    body
}
