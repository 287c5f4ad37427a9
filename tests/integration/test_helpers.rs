// tests/integration/test_helpers.rs

//! Test helpers and utilities for integration tests.

use bytes::Bytes;
use emberdb::config::Config;
use emberdb::connection::SessionState;
use emberdb::core::handler::command_router::{RouteResponse, Router};
use emberdb::core::protocol::RespFrame;
use emberdb::core::state::ServerState;
use emberdb::core::storage::db::ExecutionContext;
use emberdb::core::{Command, EmberError, RespValue};
use std::net::SocketAddr;
use std::sync::Arc;

/// TestContext provides a complete test environment with a real database instance.
#[derive(Clone)]
pub struct TestContext {
    pub state: Arc<ServerState>,
}

impl TestContext {
    /// Creates a new test context with default configuration.
    pub fn new() -> Self {
        Self {
            state: ServerState::new(Config::default()),
        }
    }

    /// Builds a request frame from string parts, shaped exactly as the codec
    /// would deliver it.
    pub fn frame(parts: &[&str]) -> RespFrame {
        RespFrame::Array(
            parts
                .iter()
                .map(|p| RespFrame::BulkString(Bytes::copy_from_slice(p.as_bytes())))
                .collect(),
        )
    }

    /// Parses and executes a command directly against the engines, as the
    /// given session.
    pub async fn execute_as(
        &self,
        session_id: u64,
        parts: &[&str],
    ) -> Result<RespValue, EmberError> {
        let command = Command::try_from(Self::frame(parts))?;
        let db = &self.state.db;
        let locks = db.determine_locks_for_command(&command).await;
        let mut ctx = ExecutionContext {
            state: self.state.clone(),
            locks,
            db,
            command: Some(command.clone()),
            session_id,
            no_block: false,
        };
        command.execute(&mut ctx).await
    }

    /// Parses and executes a command as a fixed default session.
    pub async fn execute(&self, parts: &[&str]) -> Result<RespValue, EmberError> {
        self.execute_as(1, parts).await
    }

    /// Routes a frame through the full dispatch pipeline (transaction
    /// handling included) using the given session state.
    pub async fn route_as(
        &self,
        session: &mut SessionState,
        session_id: u64,
        parts: &[&str],
    ) -> Result<RespValue, EmberError> {
        let addr: SocketAddr = "127.0.0.1:0".parse().expect("test addr");
        let mut router = Router::new(self.state.clone(), session_id, addr, session);
        match router.route(Self::frame(parts)).await? {
            RouteResponse::Single(value) => Ok(value),
            RouteResponse::NoOp => Ok(RespValue::Null),
        }
    }
}

/// Shorthand for a bulk-string reply value.
pub fn bulk(s: &str) -> RespValue {
    RespValue::BulkString(Bytes::copy_from_slice(s.as_bytes()))
}

/// Shorthand for an array of bulk-string reply values.
pub fn bulk_array(items: &[&str]) -> RespValue {
    RespValue::Array(items.iter().map(|s| bulk(s)).collect())
}
