// src/core/commands/generic/type_cmd.rs

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::storage::db::ExecutionContext;
use crate::core::{EmberError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

/// Represents the `TYPE` command. Named `TypeInfo` because `Type` collides
/// with too much in scope.
#[derive(Debug, Clone, Default)]
pub struct TypeInfo {
    pub key: Bytes,
}

impl ParseCommand for TypeInfo {
    fn parse(args: &[RespFrame]) -> Result<Self, EmberError> {
        validate_arg_count(args, 1, "TYPE")?;
        Ok(TypeInfo {
            key: extract_bytes(&args[0])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for TypeInfo {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, EmberError> {
        let guard = ctx.get_single_shard_context_mut()?;
        guard.evict_if_expired(&self.key);
        let name = match guard.get(&self.key) {
            Some(entry) => entry.data.type_name(),
            None => "none",
        };
        Ok(RespValue::SimpleString(name.into()))
    }
}
