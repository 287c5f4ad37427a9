// src/core/storage/stream.rs

//! The stream engine: entry ids, entries, and the append-only `Stream` type
//! with id generation and validation.

use crate::core::EmberError;
use bytes::Bytes;
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

// --- Stream ID ---

/// A stream entry id: a `(ms, seq)` pair ordered lexicographically.
/// The canonical wire form is `"<ms>-<seq>"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Default)]
pub struct StreamId {
    pub ms: u64,
    pub seq: u64,
}

impl StreamId {
    pub fn new(ms: u64, seq: u64) -> Self {
        Self { ms, seq }
    }
}

impl FromStr for StreamId {
    type Err = EmberError;

    /// Parses `"<ms>"` (sequence defaults to 0) or `"<ms>-<seq>"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('-') {
            None => {
                let ms = s.parse().map_err(|_| EmberError::InvalidStreamId)?;
                Ok(StreamId::new(ms, 0))
            }
            Some((ms, seq)) => {
                let ms = ms.parse().map_err(|_| EmberError::InvalidStreamId)?;
                let seq = seq.parse().map_err(|_| EmberError::InvalidStreamId)?;
                Ok(StreamId::new(ms, seq))
            }
        }
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.ms, self.seq)
    }
}

/// The id requested by an `XADD`: fully explicit, a timestamp with an
/// auto-generated sequence (`ms-*`), or fully auto-generated (`*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdSpec {
    Auto,
    AutoSeq(u64),
    Explicit(StreamId),
}

// --- Stream Entry ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEntry {
    pub id: StreamId,
    /// Field/value pairs in original insertion order.
    pub fields: IndexMap<Bytes, Bytes>,
}

// --- Main Stream Struct ---

/// An append-only sequence of entries ordered strictly by id. The `BTreeMap`
/// makes storage order and id order the same thing.
#[derive(Debug, Clone, Default)]
pub struct Stream {
    pub entries: BTreeMap<StreamId, StreamEntry>,
    /// The highest id ever generated for this stream. New entries must
    /// compare strictly greater.
    pub last_generated_id: StreamId,
}

impl Stream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves the requested id, validates it against the stream's top item,
    /// and appends the entry.
    ///
    /// Id resolution:
    /// - `*`: wall-clock milliseconds; if the clock matches (or lags) the top
    ///   item's timestamp, the sequence continues from it.
    /// - `ms-*`: the next sequence for that timestamp, except `0-*` starts at
    ///   sequence 1 so that `0-0` is never produced.
    /// - explicit ids are used as given.
    pub fn add_entry(
        &mut self,
        id_spec: IdSpec,
        fields: IndexMap<Bytes, Bytes>,
    ) -> Result<StreamId, EmberError> {
        let new_id = match id_spec {
            IdSpec::Explicit(id) => id,
            IdSpec::AutoSeq(ms) => {
                let seq = if self.last_generated_id.ms == ms {
                    self.last_generated_id.seq + 1
                } else if ms == 0 {
                    1
                } else {
                    0
                };
                StreamId::new(ms, seq)
            }
            IdSpec::Auto => {
                let mut ms = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_millis() as u64;
                if ms < self.last_generated_id.ms {
                    ms = self.last_generated_id.ms;
                }
                let seq = if ms == self.last_generated_id.ms {
                    self.last_generated_id.seq + 1
                } else {
                    0
                };
                StreamId::new(ms, seq)
            }
        };

        if new_id == StreamId::new(0, 0) {
            return Err(EmberError::StreamIdTooSmall);
        }
        if new_id <= self.last_generated_id {
            return Err(EmberError::StreamIdNotGreater);
        }

        self.entries.insert(new_id, StreamEntry { id: new_id, fields });
        self.last_generated_id = new_id;
        Ok(new_id)
    }
}
