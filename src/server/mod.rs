// src/server/mod.rs

use crate::config::Config;
use crate::core::state::ServerState;
use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

pub mod connection_loop;

/// The main server startup function: builds the shared state, binds the
/// listener, and runs the accept loop until shutdown.
pub async fn run(config: Config) -> Result<()> {
    let state = ServerState::new(config);
    let addr = format!("{}:{}", state.config.host, state.config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind listener on {addr}"))?;
    info!("listening on {addr}");

    connection_loop::run(listener, state).await;
    Ok(())
}
