// src/core/errors.rs

//! Defines the primary error type for the entire application.

use std::num::{ParseFloatError, ParseIntError};
use std::sync::Arc;
use thiserror::Error;

/// The main error enum, representing all possible failures within the server.
/// The `Display` text of every user-facing variant is the exact string sent
/// on the wire as an error reply.
#[derive(Error, Debug)]
pub enum EmberError {
    #[error("IO Error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("Incomplete data in stream")]
    IncompleteData,

    #[error("ERR unknown command '{0}'")]
    UnknownCommand(String),

    #[error("ERR syntax error")]
    SyntaxError,

    #[error("ERR wrong number of arguments for '{0}' command")]
    WrongArgumentCount(String),

    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,

    #[error("WRONGTYPE value is not a list")]
    NotAList,

    #[error("WRONGTYPE key exists and is not a stream")]
    NotAStream,

    #[error("ERR value is not an integer or out of range")]
    NotAnInteger,

    #[error("ERR value is not a float")]
    NotAFloat,

    #[error("ERR invalid PX value")]
    InvalidExpiry,

    #[error("ERR invalid ID format")]
    InvalidStreamId,

    #[error("ERR The ID specified in XADD must be greater than 0-0")]
    StreamIdTooSmall,

    #[error("ERR The ID specified in XADD is equal or smaller than the target stream top item")]
    StreamIdNotGreater,

    #[error("ERR invalid BLOCK timeout")]
    InvalidBlockTimeout,

    #[error("ERR EXEC without MULTI")]
    ExecWithoutMulti,

    #[error("ERR DISCARD without MULTI")]
    DiscardWithoutMulti,

    #[error("Locking Error: {0}")]
    LockingError(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

// Manual implementation of Clone because `std::io::Error` is not cloneable.
// The Arc wrapper makes sharing the underlying error cheap.
impl Clone for EmberError {
    fn clone(&self) -> Self {
        match self {
            EmberError::Io(e) => EmberError::Io(Arc::clone(e)),
            EmberError::IncompleteData => EmberError::IncompleteData,
            EmberError::UnknownCommand(s) => EmberError::UnknownCommand(s.clone()),
            EmberError::SyntaxError => EmberError::SyntaxError,
            EmberError::WrongArgumentCount(s) => EmberError::WrongArgumentCount(s.clone()),
            EmberError::WrongType => EmberError::WrongType,
            EmberError::NotAList => EmberError::NotAList,
            EmberError::NotAStream => EmberError::NotAStream,
            EmberError::NotAnInteger => EmberError::NotAnInteger,
            EmberError::NotAFloat => EmberError::NotAFloat,
            EmberError::InvalidExpiry => EmberError::InvalidExpiry,
            EmberError::InvalidStreamId => EmberError::InvalidStreamId,
            EmberError::StreamIdTooSmall => EmberError::StreamIdTooSmall,
            EmberError::StreamIdNotGreater => EmberError::StreamIdNotGreater,
            EmberError::InvalidBlockTimeout => EmberError::InvalidBlockTimeout,
            EmberError::ExecWithoutMulti => EmberError::ExecWithoutMulti,
            EmberError::DiscardWithoutMulti => EmberError::DiscardWithoutMulti,
            EmberError::LockingError(s) => EmberError::LockingError(s.clone()),
            EmberError::Internal(s) => EmberError::Internal(s.clone()),
        }
    }
}

impl PartialEq for EmberError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (EmberError::Io(e1), EmberError::Io(e2)) => e1.to_string() == e2.to_string(),
            (EmberError::UnknownCommand(s1), EmberError::UnknownCommand(s2)) => s1 == s2,
            (EmberError::WrongArgumentCount(s1), EmberError::WrongArgumentCount(s2)) => s1 == s2,
            (EmberError::LockingError(s1), EmberError::LockingError(s2)) => s1 == s2,
            (EmberError::Internal(s1), EmberError::Internal(s2)) => s1 == s2,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

// --- From trait implementations for easy error conversion ---

impl From<std::io::Error> for EmberError {
    fn from(e: std::io::Error) -> Self {
        EmberError::Io(Arc::new(e))
    }
}

impl From<ParseIntError> for EmberError {
    fn from(_: ParseIntError) -> Self {
        EmberError::NotAnInteger
    }
}

impl From<ParseFloatError> for EmberError {
    fn from(_: ParseFloatError) -> Self {
        EmberError::NotAFloat
    }
}

impl From<std::str::Utf8Error> for EmberError {
    fn from(_: std::str::Utf8Error) -> Self {
        EmberError::WrongType
    }
}

impl From<std::string::FromUtf8Error> for EmberError {
    fn from(_: std::string::FromUtf8Error) -> Self {
        EmberError::WrongType
    }
}
