// src/core/commands/generic/info.rs

//! Implements the `INFO` command. Only the replication section carries any
//! content; this server always reports itself as a master.

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::extract_string;
use crate::core::protocol::RespFrame;
use crate::core::storage::db::ExecutionContext;
use crate::core::{EmberError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct Info {
    pub section: Option<String>,
}

impl ParseCommand for Info {
    fn parse(args: &[RespFrame]) -> Result<Self, EmberError> {
        match args.len() {
            0 => Ok(Info { section: None }),
            1 => Ok(Info {
                section: Some(extract_string(&args[0])?.to_ascii_lowercase()),
            }),
            _ => Err(EmberError::WrongArgumentCount("INFO".to_string())),
        }
    }
}

#[async_trait]
impl ExecutableCommand for Info {
    async fn execute<'a>(
        &self,
        _ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, EmberError> {
        let body = match self.section.as_deref() {
            None | Some("replication") => Bytes::from_static(b"role:master"),
            Some(_) => Bytes::new(),
        };
        Ok(RespValue::BulkString(body))
    }
}
