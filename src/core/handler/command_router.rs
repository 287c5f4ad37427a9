// src/core/handler/command_router.rs

//! The central component for routing inbound frames.
//!
//! The `Router` receives a decoded `RespFrame` from the `ConnectionHandler`
//! and decides between three paths: transaction control words run their state
//! transition, a session inside `MULTI` queues the raw frame, and everything
//! else is parsed and executed immediately against the engines.

use super::transaction_handler::TransactionHandler;
use crate::connection::SessionState;
use crate::core::protocol::RespFrame;
use crate::core::state::ServerState;
use crate::core::storage::db::ExecutionContext;
use crate::core::{Command, EmberError, RespValue};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::debug;

/// The outcome of routing one frame.
pub enum RouteResponse {
    /// A single RESP value to send back.
    Single(RespValue),
    /// Nothing to send; used for malformed frames that are silently skipped.
    NoOp,
}

/// The `Router` directs one inbound frame through the processing pipeline.
pub struct Router<'a> {
    state: Arc<ServerState>,
    session_id: u64,
    addr: SocketAddr,
    session: &'a mut SessionState,
}

impl<'a> Router<'a> {
    pub fn new(
        state: Arc<ServerState>,
        session_id: u64,
        addr: SocketAddr,
        session: &'a mut SessionState,
    ) -> Self {
        Self {
            state,
            session_id,
            addr,
            session,
        }
    }

    /// The main entry point for routing a frame.
    pub async fn route(&mut self, frame: RespFrame) -> Result<RouteResponse, EmberError> {
        // Requests must be arrays of bulk strings; anything else is skipped
        // without a reply.
        let Some(name) = command_name(&frame) else {
            debug!(
                "session {} ({}): skipping malformed request frame",
                self.session_id, self.addr
            );
            return Ok(RouteResponse::NoOp);
        };

        self.state.stats.increment_total_commands();

        // A session inside MULTI queues everything except the control words,
        // with no validation of the queued command's shape.
        if self.session.tx.in_multi && !matches!(name.as_str(), "multi" | "exec" | "discard") {
            debug!("session {}: queued '{}'", self.session_id, name);
            return Ok(RouteResponse::Single(
                self.transaction_handler().handle_queueing(frame),
            ));
        }

        let command = Command::try_from(frame)?;
        debug!("session {}: received command '{}'", self.session_id, command.name());

        let response = match command {
            Command::Multi => self.transaction_handler().handle_multi(),
            Command::Exec => self.transaction_handler().handle_exec().await?,
            Command::Discard => self.transaction_handler().handle_discard()?,
            cmd => self.execute_command(cmd).await?,
        };
        Ok(RouteResponse::Single(response))
    }

    fn transaction_handler(&mut self) -> TransactionHandler<'_> {
        TransactionHandler::new(self.state.clone(), self.session, self.session_id)
    }

    /// Executes a standard command: acquires the locks it needs, runs it, and
    /// returns the reply.
    async fn execute_command(&mut self, command: Command) -> Result<RespValue, EmberError> {
        let state = self.state.clone();
        let db = &state.db;
        let locks = db.determine_locks_for_command(&command).await;
        let mut ctx = ExecutionContext {
            state: self.state.clone(),
            locks,
            db,
            command: Some(command.clone()),
            session_id: self.session_id,
            no_block: false,
        };
        command.execute(&mut ctx).await
    }
}

/// Extracts the lowercase command name from a request frame, or `None` if the
/// frame is not an array led by a bulk string.
fn command_name(frame: &RespFrame) -> Option<String> {
    let RespFrame::Array(parts) = frame else {
        return None;
    };
    match parts.first() {
        Some(RespFrame::BulkString(name)) => {
            Some(String::from_utf8_lossy(name).to_ascii_lowercase())
        }
        _ => None,
    }
}
