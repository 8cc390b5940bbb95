//! Shared helpers: serve the real router on an ephemeral port.
#![allow(dead_code)]

use std::net::SocketAddr;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;

use smartinfra_telemetry::{routes, AppState, Config};

/// Serve `app` on 127.0.0.1 and return its address.
pub async fn serve(app: Router) -> Result<SocketAddr> {
    // ---
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    Ok(addr)
}

/// Start the service with `config` and return its base URL.
pub async fn spawn_app(config: Config) -> Result<String> {
    let state = AppState::from_config(config)?;
    let addr = serve(routes::router(state)).await?;
    Ok(format!("http://{}", addr))
}

/// Simulation-only configuration.
pub fn simulation_config() -> Config {
    Config::default()
}
