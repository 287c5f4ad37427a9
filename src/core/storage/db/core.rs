// src/core/storage/db/core.rs

use super::shard::DbShard;
use bytes::Bytes;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;

/// The number of shards per database.
pub const NUM_SHARDS: usize = 16;

/// `Db` is the process-wide keyspace, composed of multiple `DbShard`s.
/// Sharding keeps unrelated keys from contending on a single lock while the
/// per-shard mutex guarantees one mutator at a time for any given key.
#[derive(Debug)]
pub struct Db {
    /// The collection of shards that make up this database.
    pub shards: Vec<Arc<DbShard>>,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum PushDirection {
    Left,
    Right,
}

impl Db {
    pub fn new() -> Self {
        let shards = (0..NUM_SHARDS).map(|_| Arc::new(DbShard::new())).collect();
        Self { shards }
    }

    /// Calculates the shard index for a given key using hashing.
    pub fn get_shard_index(&self, key: &Bytes) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % NUM_SHARDS
    }

    /// Gets a reference to a shard by its index.
    pub fn get_shard(&self, index: usize) -> &Arc<DbShard> {
        &self.shards[index]
    }
}

impl Default for Db {
    fn default() -> Self {
        Self::new()
    }
}
