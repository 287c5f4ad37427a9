// src/core/storage/db/context.rs

use super::core::Db;
use super::locking::ExecutionLocks;
use super::shard::ShardCache;
use crate::core::state::ServerState;
use crate::core::{Command, EmberError};
use bytes::Bytes;
use std::sync::Arc;
use tokio::sync::MutexGuard;

/// `ExecutionContext` provides all the state and locks required to execute a `Command`.
pub struct ExecutionContext<'a> {
    pub state: Arc<ServerState>,
    pub locks: ExecutionLocks<'a>,
    pub db: &'a Db,
    // The command being executed. Keeping it in the context makes the context
    // self-contained and lets the lock helpers find their own keys.
    pub command: Option<Command>,
    pub session_id: u64,
    /// Set while running queued commands inside `EXEC`; blocking commands
    /// must degrade to their non-blocking form.
    pub no_block: bool,
}

impl<'a> ExecutionContext<'a> {
    /// A helper to get the shard guard for a single-key command from the context.
    pub fn get_single_shard_context_mut(
        &mut self,
    ) -> Result<&mut MutexGuard<'a, ShardCache>, EmberError> {
        let key = self
            .command
            .as_ref()
            .and_then(|c| c.get_keys().into_iter().next())
            .ok_or_else(|| {
                EmberError::Internal("command in context has no keys for shard lookup".into())
            })?;
        let shard_index = self.db.get_shard_index(&key);
        match &mut self.locks {
            ExecutionLocks::Single { guard, .. } => Ok(guard),
            ExecutionLocks::Multi { guards } => guards
                .get_mut(&shard_index)
                .ok_or_else(|| EmberError::LockingError("required shard lock missing".into())),
            ExecutionLocks::None => Err(EmberError::LockingError(
                "command expected a shard lock".into(),
            )),
        }
    }

    /// Gets the held guard covering a specific key. Used by multi-key commands.
    pub fn guard_for_key(
        &mut self,
        key: &Bytes,
    ) -> Result<&mut MutexGuard<'a, ShardCache>, EmberError> {
        let shard_index = self.db.get_shard_index(key);
        match &mut self.locks {
            ExecutionLocks::Single {
                shard_index: held, guard,
            } if *held == shard_index => Ok(guard),
            ExecutionLocks::Single { .. } => Err(EmberError::LockingError(
                "held shard lock does not cover key".into(),
            )),
            ExecutionLocks::Multi { guards } => guards
                .get_mut(&shard_index)
                .ok_or_else(|| EmberError::LockingError("required shard lock missing".into())),
            ExecutionLocks::None => Err(EmberError::LockingError(
                "command expected a shard lock".into(),
            )),
        }
    }

    /// Releases all locks held by the context.
    pub fn release_locks(&mut self) {
        self.locks = ExecutionLocks::None;
    }

    /// Re-acquires all necessary locks for the command currently in the context.
    /// Used by blocking commands after waking up.
    pub async fn reacquire_locks_for_command(&mut self) -> Result<(), EmberError> {
        let command = self.command.as_ref().ok_or_else(|| {
            EmberError::Internal("cannot reacquire locks without a command in context".into())
        })?;
        self.locks = self.db.determine_locks_for_command(command).await;
        Ok(())
    }
}
