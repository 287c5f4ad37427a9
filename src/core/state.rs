// src/core/state.rs

//! Defines the central `ServerState` struct, holding all shared server-wide state.

use crate::config::Config;
use crate::core::blocking::BlockerManager;
use crate::core::storage::db::Db;
use crate::core::stream_blocking::StreamBlockerManager;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// The central struct holding all shared, server-wide state. Wrapped in an
/// `Arc` and handed to every connection task, this is the single source of
/// truth for the keyspace and the blocking coordinators.
#[derive(Debug)]
pub struct ServerState {
    /// The sharded keyspace.
    pub db: Arc<Db>,
    /// The server's runtime configuration.
    pub config: Config,
    /// Manages clients blocked on list commands (`BLPOP`).
    pub blocker_manager: Arc<BlockerManager>,
    /// Manages clients blocked on stream commands (`XREAD BLOCK`).
    pub stream_blocker_manager: Arc<StreamBlockerManager>,
    /// Server-wide counters.
    pub stats: StatsState,
}

impl ServerState {
    /// Builds the shared state from the given configuration.
    pub fn new(config: Config) -> Arc<Self> {
        Arc::new(Self {
            db: Arc::new(Db::new()),
            config,
            blocker_manager: Arc::new(BlockerManager::new()),
            stream_blocker_manager: Arc::new(StreamBlockerManager::new()),
            stats: StatsState::default(),
        })
    }
}

/// Server-wide statistics counters.
#[derive(Debug, Default)]
pub struct StatsState {
    total_connections: AtomicU64,
    total_commands: AtomicU64,
}

impl StatsState {
    pub fn increment_total_connections(&self) {
        self.total_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_total_commands(&self) {
        self.total_commands.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total_connections(&self) -> u64 {
        self.total_connections.load(Ordering::Relaxed)
    }

    pub fn total_commands(&self) -> u64 {
        self.total_commands.load(Ordering::Relaxed)
    }
}
