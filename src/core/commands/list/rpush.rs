// src/core/commands/list/rpush.rs

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::parse_key_and_values;
use crate::core::commands::list::logic::list_push_logic;
use crate::core::protocol::RespFrame;
use crate::core::storage::db::{ExecutionContext, PushDirection};
use crate::core::{EmberError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct RPush {
    pub key: Bytes,
    pub values: Vec<Bytes>,
}

impl ParseCommand for RPush {
    fn parse(args: &[RespFrame]) -> Result<Self, EmberError> {
        let (key, values) = parse_key_and_values(args, 2, "RPUSH")?;
        Ok(RPush { key, values })
    }
}

#[async_trait]
impl ExecutableCommand for RPush {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, EmberError> {
        list_push_logic(ctx, &self.key, &self.values, PushDirection::Right)
    }
}
