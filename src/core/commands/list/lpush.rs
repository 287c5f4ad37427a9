// src/core/commands/list/lpush.rs

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::parse_key_and_values;
use crate::core::commands::list::logic::list_push_logic;
use crate::core::protocol::RespFrame;
use crate::core::storage::db::{ExecutionContext, PushDirection};
use crate::core::{EmberError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct LPush {
    pub key: Bytes,
    pub values: Vec<Bytes>,
}

impl ParseCommand for LPush {
    fn parse(args: &[RespFrame]) -> Result<Self, EmberError> {
        let (key, values) = parse_key_and_values(args, 2, "LPUSH")?;
        Ok(LPush { key, values })
    }
}

#[async_trait]
impl ExecutableCommand for LPush {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, EmberError> {
        // Each value is prepended in argument order, so the final list order
        // is the reverse of the argument list.
        list_push_logic(ctx, &self.key, &self.values, PushDirection::Left)
    }
}
