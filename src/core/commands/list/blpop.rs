// src/core/commands/list/blpop.rs

//! Implements the `BLPOP` command.

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, extract_string, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::storage::db::ExecutionContext;
use crate::core::{EmberError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

/// Represents the `BLPOP` command with its parsed arguments. A timeout of
/// zero (or below) means "wait forever", represented as `None`.
#[derive(Debug, Clone, Default)]
pub struct BLPop {
    pub key: Bytes,
    pub timeout: Option<Duration>,
}

impl ParseCommand for BLPop {
    fn parse(args: &[RespFrame]) -> Result<Self, EmberError> {
        validate_arg_count(args, 2, "BLPOP")?;
        let key = extract_bytes(&args[0])?;
        let timeout_secs: f64 = extract_string(&args[1])?
            .parse()
            .map_err(|_| EmberError::NotAFloat)?;
        let timeout = if timeout_secs <= 0.0 {
            None
        } else {
            Some(Duration::from_secs_f64(timeout_secs))
        };
        Ok(BLPop { key, timeout })
    }
}

#[async_trait]
impl ExecutableCommand for BLPop {
    /// Executes the `BLPOP` command. The blocking logic, including race
    /// prevention, is delegated to the central `BlockerManager`.
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, EmberError> {
        let state = ctx.state.clone();
        state
            .blocker_manager
            .orchestrate_blocking_pop(ctx, &self.key, self.timeout)
            .await
    }
}
