// src/core/storage/data_types.rs

//! Defines the core data structures for storing values in the database,
//! such as `StoredValue` and the `DataValue` enum.

use crate::core::storage::stream::Stream;
use bytes::Bytes;
use std::collections::VecDeque;
use std::time::Instant;

/// A wrapper for all values stored in the database, containing the data and
/// its optional expiration instant.
#[derive(Debug, Clone)]
pub struct StoredValue {
    pub data: DataValue,
    /// The absolute instant after which the value is treated as absent.
    /// Only string values ever carry an expiry; see `SET` with `PX`.
    pub expiry: Option<Instant>,
}

impl StoredValue {
    /// Creates a new `StoredValue` with no expiration.
    pub fn new(data: DataValue) -> Self {
        Self { data, expiry: None }
    }

    /// Checks whether the value's expiration instant has passed.
    pub fn is_expired(&self) -> bool {
        self.expiry.is_some_and(|expiry| expiry <= Instant::now())
    }
}

/// The tagged value type. Every key holds exactly one of these kinds;
/// operations against the wrong kind fail without mutating (type exclusivity).
#[derive(Debug, Clone)]
pub enum DataValue {
    String(Bytes),
    List(VecDeque<Bytes>),
    Stream(Stream),
}

impl DataValue {
    /// The type name reported by the `TYPE` command.
    pub fn type_name(&self) -> &'static str {
        match self {
            DataValue::String(_) => "string",
            DataValue::List(_) => "list",
            DataValue::Stream(_) => "stream",
        }
    }
}
