// src/core/blocking.rs

//! Manages clients that are blocked waiting for data on list keys (`BLPOP`).

use crate::core::commands::list::logic::list_pop_front;
use crate::core::storage::db::ExecutionContext;
use crate::core::{EmberError, RespValue};
use bytes::Bytes;
use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::debug;

/// The value handed to a waiter when a blocking list pop is served.
#[derive(Debug, Clone)]
pub struct PoppedValue {
    pub key: Bytes,
    pub value: Bytes,
}

/// The waker carries the popped value, so a woken client never re-reads the list.
type Waker = oneshot::Sender<PoppedValue>;

/// A shareable waker. The `Option` allows it to be `take()`-n so it fires at most once.
type SharedWaker = Arc<Mutex<Option<Waker>>>;

/// Holds information about a waiting client, including its session ID for cleanup.
#[derive(Clone, Debug)]
struct WaiterInfo {
    session_id: u64,
    waker: SharedWaker,
}

/// Manages all clients currently blocked on list operations, as a FIFO queue
/// of waiters per key.
#[derive(Debug, Default)]
pub struct BlockerManager {
    waiters: DashMap<Bytes, VecDeque<WaiterInfo>>,
}

impl BlockerManager {
    pub fn new() -> Self {
        Default::default()
    }

    /// Orchestrates a blocking list pop (`BLPOP`).
    ///
    /// The sequence is race-free because the waker is registered *before* the
    /// shard lock is released: a push can only run after both, and will then
    /// find the waiter in the queue.
    pub async fn orchestrate_blocking_pop(
        self: &Arc<Self>,
        ctx: &mut ExecutionContext<'_>,
        key: &Bytes,
        wait_timeout: Option<Duration>,
    ) -> Result<RespValue, EmberError> {
        // 1. Attempt a non-blocking pop under the already-held shard lock.
        if let Some(value) = list_pop_front(ctx, key)? {
            return Ok(RespValue::Array(vec![
                RespValue::BulkString(key.clone()),
                RespValue::BulkString(value),
            ]));
        }

        // Inside EXEC a blocking command degrades to its non-blocking form.
        if ctx.no_block {
            return Ok(RespValue::Null);
        }

        // 2. Prepare and register the waker while the lock is still held.
        let (tx, rx) = oneshot::channel();
        let shared_waker = Arc::new(Mutex::new(Some(tx)));
        let waiter_info = WaiterInfo {
            session_id: ctx.session_id,
            waker: shared_waker.clone(),
        };
        self.waiters
            .entry(key.clone())
            .or_default()
            .push_back(waiter_info);
        debug!(
            "session {}: parked on list key '{}'",
            ctx.session_id,
            String::from_utf8_lossy(key)
        );

        // 3. Release the lock and wait for a hand-off or the timeout.
        ctx.release_locks();
        let outcome = match wait_timeout {
            Some(t) => timeout(t, rx).await.ok(),
            None => Some(rx.await),
        };

        // 4. Clean up the waiter. If the serving path already consumed the
        // waker, this is a no-op; exactly one of the two paths wins.
        self.remove_waiter(key, &shared_waker);

        match outcome {
            Some(Ok(popped)) => Ok(RespValue::Array(vec![
                RespValue::BulkString(popped.key),
                RespValue::BulkString(popped.value),
            ])),
            // Timed out, or the waker was dropped without firing.
            _ => Ok(RespValue::Null),
        }
    }

    /// Hands head elements of `list` to parked clients, oldest first. Called by
    /// the push commands while they still hold the shard lock, so a delivered
    /// element is always backed by committed list state.
    ///
    /// An element is consumed only when the hand-off send succeeds; once it
    /// does, the element is gone even if the client never reads it. A failed
    /// send means the receiver is already gone (timeout or disconnect), and
    /// the element stays at the head for the next waiter.
    pub fn serve_waiters(&self, key: &Bytes, list: &mut VecDeque<Bytes>) {
        let Some(mut queue) = self.waiters.get_mut(key) else {
            return;
        };
        while !list.is_empty() {
            let Some(info) = queue.pop_front() else {
                break;
            };
            let waker = match info.waker.lock() {
                Ok(mut slot) => slot.take(),
                Err(_) => None,
            };
            let Some(waker) = waker else {
                // Stale waiter whose waker was already consumed; skip it.
                continue;
            };
            if let Some(front) = list.front() {
                let popped = PoppedValue {
                    key: key.clone(),
                    value: front.clone(),
                };
                if waker.send(popped).is_ok() {
                    list.pop_front();
                    debug!(
                        "handed off head element of list '{}' to a waiter",
                        String::from_utf8_lossy(key)
                    );
                }
            }
        }
        if queue.is_empty() {
            drop(queue);
            self.waiters.remove(key);
        }
    }

    /// Removes a specific waker from the key's queue.
    fn remove_waiter(&self, key: &Bytes, waker_to_remove: &SharedWaker) {
        if let Some(mut queue) = self.waiters.get_mut(key) {
            queue.retain(|info| !Arc::ptr_eq(&info.waker, waker_to_remove));
            if queue.is_empty() {
                drop(queue);
                self.waiters.remove(key);
            }
        }
    }

    /// Removes all wakers for a given session upon client disconnection, so no
    /// dangling waiter survives its connection.
    pub fn remove_waiters_for_session(&self, session_id: u64) {
        self.waiters.iter_mut().for_each(|mut queue| {
            queue.retain(|info| info.session_id != session_id);
        });
        self.waiters.retain(|_, queue| !queue.is_empty());
        debug!("removed any pending list blockers for session {session_id}");
    }
}
