// src/core/commands/streams/xread.rs

//! Implements the `XREAD` command for reading new entries from one or more
//! streams, optionally blocking until entries arrive.

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, extract_string};
use crate::core::commands::streams::format_entry;
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::DataValue;
use crate::core::storage::db::ExecutionContext;
use crate::core::storage::stream::{StreamEntry, StreamId};
use crate::core::{EmberError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;
use std::ops::Bound;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};

/// The starting id requested for one stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamIdSpec {
    /// An exact id (e.g., "12345-0"); only strictly greater entries are returned.
    Exact(StreamId),
    /// The stream's last entry at command entry time ('$').
    Last,
}

/// The parsed `XREAD` command with all its options.
#[derive(Debug, Clone, Default)]
pub struct XRead {
    pub streams: Vec<(Bytes, StreamIdSpec)>,
    pub block_timeout: Option<Duration>,
}

impl ParseCommand for XRead {
    fn parse(args: &[RespFrame]) -> Result<Self, EmberError> {
        let mut cmd = XRead::default();
        let mut i = 0;

        // Parse optional arguments before the STREAMS keyword.
        while i < args.len() {
            match extract_string(&args[i])?.to_ascii_lowercase().as_str() {
                "block" => {
                    i += 1;
                    if i >= args.len() {
                        return Err(EmberError::SyntaxError);
                    }
                    let ms: u64 = extract_string(&args[i])?
                        .parse()
                        .map_err(|_| EmberError::InvalidBlockTimeout)?;
                    cmd.block_timeout = Some(Duration::from_millis(ms));
                    i += 1;
                }
                "streams" => {
                    i += 1;
                    break;
                }
                _ => return Err(EmberError::SyntaxError),
            }
        }

        // The rest must be `key1..keyN id1..idN`.
        let remaining_args = &args[i..];
        let num_args = remaining_args.len();
        if num_args == 0 || num_args % 2 != 0 {
            return Err(EmberError::WrongArgumentCount("XREAD".to_string()));
        }

        let num_streams = num_args / 2;
        let keys = &remaining_args[0..num_streams];
        let ids = &remaining_args[num_streams..];

        for (key_frame, id_frame) in keys.iter().zip(ids.iter()) {
            let key = extract_bytes(key_frame)?;
            let id_str = extract_string(id_frame)?;
            let id_spec = if id_str == "$" {
                StreamIdSpec::Last
            } else {
                StreamIdSpec::Exact(id_str.parse()?)
            };
            cmd.streams.push((key, id_spec));
        }

        Ok(cmd)
    }
}

#[async_trait]
impl ExecutableCommand for XRead {
    /// Executes `XREAD`, handling both the immediate and the blocking case.
    ///
    /// `$` ids are resolved to concrete watermarks exactly once, before any
    /// wait, so a blocked reader observes every entry committed after it
    /// parked and nothing from before.
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, EmberError> {
        // --- Phase 1: resolve watermarks and scan, under the initial locks ---
        let watermarks = self.resolve_watermarks(ctx)?;
        let results = read_after(ctx, &watermarks)?;
        let has_matches = results.iter().any(|(_, entries)| !entries.is_empty());

        if has_matches {
            return Ok(format_results(results));
        }
        // No matches: a non-blocking read (or one degraded inside EXEC)
        // replies with an empty array immediately.
        if self.block_timeout.is_none() || ctx.no_block {
            return Ok(RespValue::Array(vec![]));
        }

        // --- Phase 2: park until an append matches or the budget runs out ---
        let block = self.block_timeout.unwrap_or_default();
        let deadline = (!block.is_zero()).then(|| Instant::now() + block);
        let keys: Vec<Bytes> = self.streams.iter().map(|(k, _)| k.clone()).collect();
        let state = ctx.state.clone();

        loop {
            // Register the waker while the shard locks are still held, then
            // release them and wait. Any append after the scan will notify.
            let (waker, rx) = state
                .stream_blocker_manager
                .subscribe(&keys, ctx.session_id);
            ctx.release_locks();

            let woken = match deadline {
                Some(deadline) => timeout_at(deadline, rx).await.is_ok(),
                None => {
                    let _ = rx.await;
                    true
                }
            };
            state.stream_blocker_manager.unsubscribe(&keys, &waker);

            if !woken {
                return Ok(RespValue::Null);
            }

            // Re-evaluate the full predicate against the original watermarks.
            // Wakeups are broadcast, so another reader may have raced us here;
            // an empty re-scan just parks again for the remaining budget.
            ctx.reacquire_locks_for_command().await?;
            let results = read_after(ctx, &watermarks)?;
            if results.iter().any(|(_, entries)| !entries.is_empty()) {
                return Ok(format_results(results));
            }
        }
    }
}

impl XRead {
    /// Resolves each stream's starting id to a concrete watermark. `$` becomes
    /// the stream's current last id, or the minimum id when the stream is
    /// empty or missing.
    fn resolve_watermarks(
        &self,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<Vec<(Bytes, StreamId)>, EmberError> {
        let mut watermarks = Vec::with_capacity(self.streams.len());
        for (key, id_spec) in &self.streams {
            let id = match id_spec {
                StreamIdSpec::Exact(id) => *id,
                StreamIdSpec::Last => {
                    let guard = ctx.guard_for_key(key)?;
                    guard
                        .get(key)
                        .and_then(|entry| match &entry.data {
                            DataValue::Stream(stream) => Some(stream.last_generated_id),
                            _ => None,
                        })
                        .unwrap_or_default()
                }
            };
            watermarks.push((key.clone(), id));
        }
        Ok(watermarks)
    }
}

/// Reads, for every watched stream, the entries with ids strictly greater
/// than its watermark.
fn read_after(
    ctx: &mut ExecutionContext<'_>,
    watermarks: &[(Bytes, StreamId)],
) -> Result<Vec<(Bytes, Vec<StreamEntry>)>, EmberError> {
    let mut results = Vec::with_capacity(watermarks.len());
    for (key, after) in watermarks {
        let guard = ctx.guard_for_key(key)?;
        guard.evict_if_expired(key);
        let entries = match guard.get(key) {
            Some(entry) => match &entry.data {
                DataValue::Stream(stream) => stream
                    .entries
                    .range((Bound::Excluded(*after), Bound::Unbounded))
                    .map(|(_, entry)| entry.clone())
                    .collect(),
                _ => return Err(EmberError::NotAStream),
            },
            None => Vec::new(),
        };
        results.push((key.clone(), entries));
    }
    Ok(results)
}

/// Formats the reply: one `[key, [entry, ...]]` pair per requested stream, in
/// request order. Streams with no matches appear with an empty entries array.
fn format_results(results: Vec<(Bytes, Vec<StreamEntry>)>) -> RespValue {
    let response: Vec<RespValue> = results
        .into_iter()
        .map(|(stream_name, entries)| {
            let entry_values: Vec<RespValue> = entries.iter().map(format_entry).collect();
            RespValue::Array(vec![
                RespValue::BulkString(stream_name),
                RespValue::Array(entry_values),
            ])
        })
        .collect();
    RespValue::Array(response)
}
