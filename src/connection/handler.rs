// src/connection/handler.rs

//! Defines the `ConnectionHandler` which manages the full lifecycle of a client connection.

use super::guard::ConnectionGuard;
use super::session::SessionState;
use crate::core::handler::command_router::{RouteResponse, Router};
use crate::core::protocol::{RespFrame, RespFrameCodec};
use crate::core::state::ServerState;
use crate::core::EmberError;
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::broadcast;
use tokio_util::codec::Framed;
use tracing::{debug, warn};

/// Manages the full lifecycle of a client connection: reading frames, routing
/// them, and writing replies, until the peer disconnects or the server shuts down.
pub struct ConnectionHandler {
    framed: Framed<TcpStream, RespFrameCodec>,
    addr: SocketAddr,
    state: Arc<ServerState>,
    session_id: u64,
    shutdown_rx: broadcast::Receiver<()>,
    session: SessionState,
}

impl ConnectionHandler {
    pub fn new(
        socket: TcpStream,
        addr: SocketAddr,
        state: Arc<ServerState>,
        session_id: u64,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            framed: Framed::new(socket, RespFrameCodec),
            addr,
            state,
            session_id,
            shutdown_rx,
            session: SessionState::new(),
        }
    }

    /// The main event loop for the connection.
    pub async fn run(&mut self) -> Result<(), EmberError> {
        let _guard = ConnectionGuard::new(self.state.clone(), self.session_id, self.addr);
        loop {
            tokio::select! {
                // Prioritize the shutdown signal over inbound traffic.
                biased;
                _ = self.shutdown_rx.recv() => {
                    debug!("connection handler for {} received shutdown signal", self.addr);
                    break;
                }
                result = self.framed.next() => {
                    match result {
                        Some(Ok(frame)) => self.process_frame(frame).await?,
                        Some(Err(e)) => {
                            if is_normal_disconnect(&e) {
                                debug!("connection from {} closed by peer: {}", self.addr, e);
                            } else {
                                warn!("connection error for {}: {}", self.addr, e);
                            }
                            break;
                        }
                        None => {
                            debug!("connection from {} closed by peer", self.addr);
                            break;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Routes one frame and sends the reply, turning per-command errors into
    /// error replies so the connection stays open.
    async fn process_frame(&mut self, frame: RespFrame) -> Result<(), EmberError> {
        let mut router = Router::new(
            self.state.clone(),
            self.session_id,
            self.addr,
            &mut self.session,
        );
        match router.route(frame).await {
            Ok(RouteResponse::Single(response)) => {
                self.framed.send(response.into()).await?;
            }
            Ok(RouteResponse::NoOp) => {}
            Err(e) => {
                debug!("session {}: error reply: {}", self.session_id, e);
                self.framed.send(RespFrame::Error(e.to_string())).await?;
            }
        }
        Ok(())
    }
}

/// Helper function to check for non-critical disconnection errors.
fn is_normal_disconnect(e: &EmberError) -> bool {
    matches!(e, EmberError::Io(arc_err) if matches!(
        arc_err.kind(),
        std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::BrokenPipe
            | std::io::ErrorKind::UnexpectedEof
            | std::io::ErrorKind::ConnectionAborted
    ))
}
