// src/core/storage/db/shard.rs

//! Defines the `DbShard` and `ShardCache` structs, which form the fundamental
//! storage units within a `Db`.

use crate::core::storage::data_types::StoredValue;
use bytes::Bytes;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// A `DbShard` is a single, concurrent slice of the database.
/// All access to the entries goes through the async mutex, which is also the
/// per-key mutual-exclusion point for the whole engine.
#[derive(Debug)]
pub struct DbShard {
    pub entries: Mutex<ShardCache>,
}

/// A `ShardCache` wraps the underlying key-value map and centralizes the
/// lazy-expiry bookkeeping.
#[derive(Debug, Default)]
pub struct ShardCache {
    store: HashMap<Bytes, StoredValue>,
}

impl DbShard {
    /// Creates a new, empty `DbShard`.
    pub(super) fn new() -> Self {
        Self {
            entries: Mutex::new(ShardCache::default()),
        }
    }
}

impl ShardCache {
    /// Puts a key-value pair into the shard, returning the old value if the
    /// key already existed.
    pub fn put(&mut self, key: Bytes, value: StoredValue) -> Option<StoredValue> {
        self.store.insert(key, value)
    }

    /// Removes a key from the shard, returning the value if it was present.
    pub fn pop(&mut self, key: &Bytes) -> Option<StoredValue> {
        self.store.remove(key)
    }

    /// Gets an immutable reference to a value.
    pub fn get(&self, key: &Bytes) -> Option<&StoredValue> {
        self.store.get(key)
    }

    /// Gets a mutable reference to a value.
    pub fn get_mut(&mut self, key: &Bytes) -> Option<&mut StoredValue> {
        self.store.get_mut(key)
    }

    /// Gets a mutable reference to a value, inserting a default if it doesn't exist.
    pub fn get_or_insert_with_mut<F>(&mut self, key: Bytes, f: F) -> &mut StoredValue
    where
        F: FnOnce() -> StoredValue,
    {
        self.store.entry(key).or_insert_with(f)
    }

    /// Physically removes the entry if its expiration has passed. This is the
    /// lazy-expiry hook; every access path calls it before reading the key.
    /// Returns true if an expired entry was removed.
    pub fn evict_if_expired(&mut self, key: &Bytes) -> bool {
        if self.store.get(key).is_some_and(|v| v.is_expired()) {
            self.store.remove(key);
            return true;
        }
        false
    }

    /// Returns the number of live keys in this shard (expired entries that
    /// have not yet been touched still count).
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
