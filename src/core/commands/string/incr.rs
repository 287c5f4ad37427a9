// src/core/commands/string/incr.rs

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::{DataValue, StoredValue};
use crate::core::storage::db::ExecutionContext;
use crate::core::{EmberError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

/// Represents the `INCR` command.
#[derive(Debug, Clone, Default)]
pub struct Incr {
    pub key: Bytes,
}

impl ParseCommand for Incr {
    fn parse(args: &[RespFrame]) -> Result<Self, EmberError> {
        validate_arg_count(args, 1, "INCR")?;
        Ok(Incr {
            key: extract_bytes(&args[0])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for Incr {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, EmberError> {
        let guard = ctx.get_single_shard_context_mut()?;
        guard.evict_if_expired(&self.key);

        if let Some(entry) = guard.get_mut(&self.key) {
            let DataValue::String(value) = &mut entry.data else {
                return Err(EmberError::WrongType);
            };
            // The current content must be a base-10 signed integer.
            let current: i64 = std::str::from_utf8(value)
                .map_err(|_| EmberError::NotAnInteger)?
                .parse()
                .map_err(|_| EmberError::NotAnInteger)?;
            let new_val = current.checked_add(1).ok_or(EmberError::NotAnInteger)?;
            *value = Bytes::from(new_val.to_string());
            return Ok(RespValue::Integer(new_val));
        }

        // Absent key: behave as if it held "0".
        guard.put(
            self.key.clone(),
            StoredValue::new(DataValue::String(Bytes::from_static(b"1"))),
        );
        Ok(RespValue::Integer(1))
    }
}
