// src/server/connection_loop.rs

//! Contains the main server loop for accepting connections and handling
//! graceful shutdown.

use crate::connection::ConnectionHandler;
use crate::core::state::ServerState;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

// Platform-specific signal handling imports
#[cfg(windows)]
use tokio::signal;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

/// Waits for a shutdown signal based on the operating system.
/// On Unix, it listens for SIGINT and SIGTERM. On Windows, Ctrl+C.
async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigint = match signal(SignalKind::interrupt()) {
            Ok(s) => s,
            Err(e) => {
                error!("failed to register SIGINT handler: {e}");
                std::future::pending::<()>().await;
                return;
            }
        };
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                error!("failed to register SIGTERM handler: {e}");
                std::future::pending::<()>().await;
                return;
            }
        };
        tokio::select! {
            _ = sigint.recv() => info!("SIGINT received, initiating graceful shutdown"),
            _ = sigterm.recv() => info!("SIGTERM received, initiating graceful shutdown"),
        }
    }
    #[cfg(windows)]
    {
        if signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C received, initiating graceful shutdown");
        }
    }
}

/// The main server loop: accepts connections, spawns a handler task per
/// client, and fans a shutdown signal out to all of them on exit.
pub async fn run(listener: TcpListener, state: Arc<ServerState>) {
    let (shutdown_tx, _) = broadcast::channel(1);
    let mut session_id_counter: u64 = 0;
    let mut client_tasks = JoinSet::new();

    loop {
        tokio::select! {
            biased; // Prioritize the shutdown signal over other events.

            _ = await_shutdown_signal() => {
                break;
            },

            res = listener.accept() => {
                match res {
                    Ok((socket, addr)) => {
                        info!("accepted new connection from {addr}");
                        state.stats.increment_total_connections();

                        session_id_counter = session_id_counter.wrapping_add(1);
                        let session_id = session_id_counter;
                        let state_clone = state.clone();
                        let shutdown_rx = shutdown_tx.subscribe();

                        client_tasks.spawn(async move {
                            let mut handler = ConnectionHandler::new(
                                socket, addr, state_clone, session_id, shutdown_rx,
                            );
                            if let Err(e) = handler.run().await {
                                warn!("connection from {addr} terminated unexpectedly: {e}");
                            }
                        });
                    }
                    Err(e) => {
                        error!("failed to accept connection: {e}");
                    }
                }
            },

            // Reap completed client tasks.
            Some(res) = client_tasks.join_next() => {
                if let Err(e) = res {
                    if e.is_panic() {
                        error!("a client handler panicked: {e:?}");
                    }
                }
            },
        }
    }

    // --- Graceful shutdown sequence ---
    info!("shutting down, signalling all connection tasks");
    let _ = shutdown_tx.send(());
    client_tasks.shutdown().await;
    info!(
        "server shutdown complete ({} connections, {} commands served)",
        state.stats.total_connections(),
        state.stats.total_commands()
    );
}
