// src/connection/session.rs

//! Defines the state associated with a single client session.

use crate::core::protocol::RespFrame;

/// Holds the state specific to a single client session. The transaction
/// buffer lives here, with the connection, so no other connection can ever
/// reach it.
#[derive(Debug, Default)]
pub struct SessionState {
    /// The session's transaction buffer.
    pub tx: TransactionState,
}

/// The per-connection transaction buffer: whether the session is inside a
/// `MULTI` block, and the commands queued so far as raw frames.
#[derive(Debug, Default)]
pub struct TransactionState {
    pub in_multi: bool,
    pub queued: Vec<RespFrame>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }
}
