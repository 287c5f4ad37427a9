// src/core/handler/transaction_handler.rs

//! Manages the logic for transactions: command queuing and all-at-once
//! execution of the queue on `EXEC`.

use crate::connection::SessionState;
use crate::core::protocol::RespFrame;
use crate::core::state::ServerState;
use crate::core::storage::db::ExecutionContext;
use crate::core::{Command, EmberError, RespValue};
use std::sync::Arc;
use tracing::debug;

/// Handles the transaction state transitions for a single client session.
/// The queue lives in the session itself, so it is never addressable from
/// another connection.
pub struct TransactionHandler<'a> {
    state: Arc<ServerState>,
    session: &'a mut SessionState,
    session_id: u64,
}

impl<'a> TransactionHandler<'a> {
    pub fn new(state: Arc<ServerState>, session: &'a mut SessionState, session_id: u64) -> Self {
        Self {
            state,
            session,
            session_id,
        }
    }

    /// Handles the `MULTI` command. A nested `MULTI` re-enters the
    /// transaction with a fresh queue and still replies OK.
    pub fn handle_multi(&mut self) -> RespValue {
        self.session.tx.in_multi = true;
        self.session.tx.queued.clear();
        debug!("session {}: started transaction", self.session_id);
        RespValue::SimpleString("OK".into())
    }

    /// Queues a raw command frame. The frame is not parsed or validated here;
    /// any shape error surfaces in the `EXEC` reply array instead.
    pub fn handle_queueing(&mut self, frame: RespFrame) -> RespValue {
        self.session.tx.queued.push(frame);
        RespValue::SimpleString("QUEUED".into())
    }

    /// Handles the `EXEC` command: executes every queued command sequentially
    /// through the non-transactional engine, collecting one reply per command.
    pub async fn handle_exec(&mut self) -> Result<RespValue, EmberError> {
        if !self.session.tx.in_multi {
            return Err(EmberError::ExecWithoutMulti);
        }
        self.session.tx.in_multi = false;
        let queued = std::mem::take(&mut self.session.tx.queued);
        debug!(
            "session {}: executing transaction of {} commands",
            self.session_id,
            queued.len()
        );

        let mut responses = Vec::with_capacity(queued.len());
        for frame in queued {
            let response = match Command::try_from(frame) {
                Ok(command) => self.execute_queued(command).await,
                // Shape errors deferred from queue time become error replies
                // in the result array.
                Err(e) => RespValue::Error(e.to_string()),
            };
            responses.push(response);
        }
        Ok(RespValue::Array(responses))
    }

    /// Handles the `DISCARD` command, aborting the transaction.
    pub fn handle_discard(&mut self) -> Result<RespValue, EmberError> {
        if !self.session.tx.in_multi {
            return Err(EmberError::DiscardWithoutMulti);
        }
        self.session.tx.in_multi = false;
        self.session.tx.queued.clear();
        debug!("session {}: discarded transaction", self.session_id);
        Ok(RespValue::SimpleString("OK".into()))
    }

    /// Runs one queued command. Errors become error replies rather than
    /// aborting the rest of the queue, and blocking commands run in their
    /// non-blocking form.
    async fn execute_queued(&self, command: Command) -> RespValue {
        if matches!(command, Command::Multi | Command::Exec | Command::Discard) {
            // Control words cannot appear here through the router, but a
            // hand-built frame could still name them.
            return RespValue::Error(
                EmberError::Internal("transaction control word inside EXEC".into()).to_string(),
            );
        }
        let db = &self.state.db;
        let locks = db.determine_locks_for_command(&command).await;
        let mut ctx = ExecutionContext {
            state: self.state.clone(),
            locks,
            db,
            command: Some(command.clone()),
            session_id: self.session_id,
            no_block: true,
        };
        match command.execute(&mut ctx).await {
            Ok(response) => response,
            Err(e) => RespValue::Error(e.to_string()),
        }
    }
}
