// src/core/storage/db/locking.rs

use super::core::Db;
use super::shard::ShardCache;
use crate::core::Command;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::MutexGuard;

/// `ExecutionLocks` holds the necessary `MutexGuard`s for executing a command.
/// This enum allows the command execution layer to handle different locking strategies.
pub enum ExecutionLocks<'a> {
    /// A lock on a single database shard.
    Single {
        shard_index: usize,
        guard: MutexGuard<'a, ShardCache>,
    },
    /// Locks on multiple specific database shards.
    Multi {
        guards: BTreeMap<usize, MutexGuard<'a, ShardCache>>,
    },
    /// No locks are required for this command.
    None,
}

impl Db {
    /// Determines and acquires the appropriate locks for a given command based
    /// on the keys it operates on.
    pub async fn determine_locks_for_command<'a>(
        &'a self,
        command: &Command,
    ) -> ExecutionLocks<'a> {
        let keys = command.get_keys();
        match keys.len() {
            0 => ExecutionLocks::None,
            1 => {
                let shard_index = self.get_shard_index(&keys[0]);
                ExecutionLocks::Single {
                    shard_index,
                    guard: self.get_shard(shard_index).entries.lock().await,
                }
            }
            _ => ExecutionLocks::Multi {
                guards: self.lock_shards_for_keys(&keys).await,
            },
        }
    }

    /// Locks multiple shards based on a list of keys, acquiring them in sorted
    /// shard-index order to prevent deadlocks.
    pub async fn lock_shards_for_keys<'a>(
        &'a self,
        keys: &[Bytes],
    ) -> BTreeMap<usize, MutexGuard<'a, ShardCache>> {
        let indices: BTreeSet<usize> = keys.iter().map(|key| self.get_shard_index(key)).collect();
        let mut guards = BTreeMap::new();
        for index in indices {
            guards.insert(index, self.shards[index].entries.lock().await);
        }
        guards
    }
}
