// src/core/commands/list/llen.rs

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::DataValue;
use crate::core::storage::db::ExecutionContext;
use crate::core::{EmberError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct LLen {
    pub key: Bytes,
}

impl ParseCommand for LLen {
    fn parse(args: &[RespFrame]) -> Result<Self, EmberError> {
        validate_arg_count(args, 1, "LLEN")?;
        Ok(LLen {
            key: extract_bytes(&args[0])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for LLen {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, EmberError> {
        let guard = ctx.get_single_shard_context_mut()?;
        guard.evict_if_expired(&self.key);
        match guard.get(&self.key) {
            Some(entry) => match &entry.data {
                DataValue::List(list) => Ok(RespValue::Integer(list.len() as i64)),
                _ => Err(EmberError::NotAList),
            },
            None => Ok(RespValue::Integer(0)),
        }
    }
}
