// src/core/commands/list/lrange.rs

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, extract_string, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::DataValue;
use crate::core::storage::db::ExecutionContext;
use crate::core::{EmberError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct LRange {
    pub key: Bytes,
    pub start: i64,
    pub stop: i64,
}

impl ParseCommand for LRange {
    fn parse(args: &[RespFrame]) -> Result<Self, EmberError> {
        validate_arg_count(args, 3, "LRANGE")?;
        let key = extract_bytes(&args[0])?;
        let start = extract_string(&args[1])?
            .parse()
            .map_err(|_| EmberError::NotAnInteger)?;
        let stop = extract_string(&args[2])?
            .parse()
            .map_err(|_| EmberError::NotAnInteger)?;
        Ok(LRange { key, start, stop })
    }
}

#[async_trait]
impl ExecutableCommand for LRange {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, EmberError> {
        let guard = ctx.get_single_shard_context_mut()?;
        guard.evict_if_expired(&self.key);
        let Some(entry) = guard.get(&self.key) else {
            return Ok(RespValue::Array(vec![]));
        };
        let DataValue::List(list) = &entry.data else {
            return Err(EmberError::NotAList);
        };

        let len = list.len() as i64;
        // Negative indices count from the tail; both ends clamp into range.
        let mut start = if self.start < 0 { len + self.start } else { self.start };
        let mut stop = if self.stop < 0 { len + self.stop } else { self.stop };
        start = start.max(0);
        stop = stop.min(len - 1);
        if start > stop || len == 0 {
            return Ok(RespValue::Array(vec![]));
        }

        let values = list
            .iter()
            .skip(start as usize)
            .take((stop - start + 1) as usize)
            .map(|v| RespValue::BulkString(v.clone()))
            .collect();
        Ok(RespValue::Array(values))
    }
}
