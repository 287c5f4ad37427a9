// src/core/commands/list/lpop.rs

//! Implements the `LPOP` command.
//!
//! Without a count, a missing key replies null and a present key replies the
//! popped head as a bulk string. With a count, the reply is always an array:
//! empty for a missing key, otherwise up to `count` head elements.

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, extract_string};
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::DataValue;
use crate::core::storage::db::ExecutionContext;
use crate::core::{EmberError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct LPop {
    pub key: Bytes,
    pub count: Option<usize>,
}

impl ParseCommand for LPop {
    fn parse(args: &[RespFrame]) -> Result<Self, EmberError> {
        if args.is_empty() || args.len() > 2 {
            return Err(EmberError::WrongArgumentCount("LPOP".to_string()));
        }
        let key = extract_bytes(&args[0])?;
        let count = match args.get(1) {
            None => None,
            Some(frame) => {
                let count: i64 = extract_string(frame)?
                    .parse()
                    .map_err(|_| EmberError::NotAnInteger)?;
                if count < 0 {
                    return Err(EmberError::NotAnInteger);
                }
                Some(count as usize)
            }
        };
        Ok(LPop { key, count })
    }
}

#[async_trait]
impl ExecutableCommand for LPop {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, EmberError> {
        let guard = ctx.get_single_shard_context_mut()?;
        guard.evict_if_expired(&self.key);

        let (popped, now_empty) = {
            let Some(entry) = guard.get_mut(&self.key) else {
                return Ok(match self.count {
                    None => RespValue::Null,
                    Some(_) => RespValue::Array(vec![]),
                });
            };
            let DataValue::List(list) = &mut entry.data else {
                return Err(EmberError::NotAList);
            };
            let take = self.count.unwrap_or(1).min(list.len());
            let popped: Vec<Bytes> = list.drain(..take).collect();
            (popped, list.is_empty())
        };

        if now_empty {
            guard.pop(&self.key);
        }

        Ok(match self.count {
            None => match popped.into_iter().next() {
                Some(value) => RespValue::BulkString(value),
                None => RespValue::Null,
            },
            Some(_) => {
                RespValue::Array(popped.into_iter().map(RespValue::BulkString).collect())
            }
        })
    }
}
