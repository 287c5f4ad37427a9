// src/core/commands/streams/xrange.rs

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, extract_string};
use crate::core::commands::streams::format_entry;
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::DataValue;
use crate::core::storage::db::ExecutionContext;
use crate::core::storage::stream::StreamId;
use crate::core::{EmberError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;
use std::ops::Bound;

#[derive(Debug, Clone, Default)]
pub struct XRange {
    pub key: Bytes,
    pub start: StreamId,
    pub end: StreamId,
    pub count: Option<usize>,
}

/// Parses one end of the range. `-` is the minimum id, `+` the maximum, and a
/// bare millisecond value gets `default_seq` as its sequence (0 on the start
/// boundary, max on the end boundary).
fn parse_range_boundary(s: &str, default_seq: u64) -> Result<StreamId, EmberError> {
    match s {
        "-" => Ok(StreamId::new(0, 0)),
        "+" => Ok(StreamId::new(u64::MAX, u64::MAX)),
        _ if s.contains('-') => s.parse(),
        _ => {
            let ms = s.parse().map_err(|_| EmberError::InvalidStreamId)?;
            Ok(StreamId::new(ms, default_seq))
        }
    }
}

impl ParseCommand for XRange {
    fn parse(args: &[RespFrame]) -> Result<Self, EmberError> {
        if args.len() < 3 {
            return Err(EmberError::WrongArgumentCount("XRANGE".to_string()));
        }
        let key = extract_bytes(&args[0])?;
        let start = parse_range_boundary(&extract_string(&args[1])?, 0)?;
        let end = parse_range_boundary(&extract_string(&args[2])?, u64::MAX)?;

        let mut count = None;
        if args.len() > 3 {
            if !extract_string(&args[3])?.eq_ignore_ascii_case("count") || args.len() != 5 {
                return Err(EmberError::SyntaxError);
            }
            count = Some(extract_string(&args[4])?.parse()?);
        }
        Ok(XRange { key, start, end, count })
    }
}

#[async_trait]
impl ExecutableCommand for XRange {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, EmberError> {
        let guard = ctx.get_single_shard_context_mut()?;
        guard.evict_if_expired(&self.key);
        let Some(entry) = guard.get(&self.key) else {
            return Ok(RespValue::Array(vec![]));
        };
        let DataValue::Stream(stream) = &entry.data else {
            return Err(EmberError::NotAStream);
        };

        let results = stream
            .entries
            .range((Bound::Included(self.start), Bound::Included(self.end)))
            .take(self.count.unwrap_or(usize::MAX))
            .map(|(_, entry)| format_entry(entry))
            .collect();
        Ok(RespValue::Array(results))
    }
}
