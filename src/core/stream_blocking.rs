// src/core/stream_blocking.rs

//! Manages clients that are blocked waiting for data on one or more streams,
//! for the `XREAD` command with the `BLOCK` option.

use bytes::Bytes;
use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tracing::debug;

/// The waker for stream blocking only needs to signal that data may have arrived;
/// the woken client re-reads its streams under fresh locks.
type Waker = oneshot::Sender<()>;

/// A shareable, thread-safe waker. The `Option` allows it to be `take()`-n,
/// ensuring it is only used once.
type SharedWaker = Arc<Mutex<Option<Waker>>>;

/// Holds information about a waiting client, including its session ID for cleanup.
#[derive(Clone, Debug)]
struct WaiterInfo {
    session_id: u64,
    waker: SharedWaker,
}

/// Manages all clients currently blocked on stream reads. `XADD` wakes every
/// waiter on the key (broadcast); waiters must tolerate spurious wakeups by
/// re-evaluating their predicate.
#[derive(Debug, Default)]
pub struct StreamBlockerManager {
    waiters: DashMap<Bytes, VecDeque<WaiterInfo>>,
}

impl StreamBlockerManager {
    pub fn new() -> Self {
        Default::default()
    }

    /// Registers a single waker under every watched key and returns the
    /// receiving end. Callers must invoke this while still holding the shard
    /// locks covering `keys`: an append can then only commit after the waiter
    /// is visible, so no wake-up is lost between a scan and the wait.
    pub fn subscribe(
        &self,
        keys: &[Bytes],
        session_id: u64,
    ) -> (SharedWaker, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        let shared_waker = Arc::new(Mutex::new(Some(tx)));
        let waiter_info = WaiterInfo {
            session_id,
            waker: shared_waker.clone(),
        };
        for key in keys {
            self.waiters
                .entry(key.clone())
                .or_default()
                .push_back(waiter_info.clone());
        }
        debug!("session {session_id}: subscribed to streams {keys:?}");
        (shared_waker, rx)
    }

    /// Wakes up all clients waiting on a specific stream. Called by `XADD`
    /// after the entry is committed under the shard lock.
    pub fn notify(&self, key: &Bytes) {
        if let Some(mut queue) = self.waiters.get_mut(key) {
            if queue.is_empty() {
                return;
            }
            debug!(
                "notifying {} waiters for stream '{}'",
                queue.len(),
                String::from_utf8_lossy(key)
            );
            // Wake up all waiters. `take()` ensures each fires only once.
            while let Some(info) = queue.pop_front() {
                if let Ok(mut slot) = info.waker.lock() {
                    if let Some(waker) = slot.take() {
                        let _ = waker.send(());
                    }
                }
            }
        }
    }

    /// Removes a specific waker from all associated key queues after it has
    /// been used or has timed out.
    pub fn unsubscribe(&self, keys: &[Bytes], waker_to_remove: &SharedWaker) {
        for key in keys {
            if let Some(mut queue) = self.waiters.get_mut(key) {
                queue.retain(|info| !Arc::ptr_eq(&info.waker, waker_to_remove));
                if queue.is_empty() {
                    drop(queue);
                    self.waiters.remove(key);
                }
            }
        }
    }

    /// Removes all wakers for a given session. Called when a client connection
    /// closes to prevent dangling wakers.
    pub fn remove_waiters_for_session(&self, session_id: u64) {
        self.waiters.iter_mut().for_each(|mut queue| {
            queue.retain(|info| info.session_id != session_id);
        });
        self.waiters.retain(|_, queue| !queue.is_empty());
        debug!("removed any pending stream blockers for session {session_id}");
    }
}
