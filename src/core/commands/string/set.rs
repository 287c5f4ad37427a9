// src/core/commands/string/set.rs

//! Implements the `SET` command.
//!
//! # Command Syntax
//! `SET key value [PX milliseconds]`
//!
//! `PX` installs an absolute expiration that many milliseconds in the future.
//! Without `PX`, any prior expiration on the key is cleared by the overwrite.

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, extract_string};
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::{DataValue, StoredValue};
use crate::core::storage::db::ExecutionContext;
use crate::core::{EmberError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct Set {
    pub key: Bytes,
    pub value: Bytes,
    pub ttl: Option<Duration>,
}

impl ParseCommand for Set {
    fn parse(args: &[RespFrame]) -> Result<Self, EmberError> {
        if args.len() < 2 {
            return Err(EmberError::WrongArgumentCount("SET".to_string()));
        }
        let key = extract_bytes(&args[0])?;
        let value = extract_bytes(&args[1])?;

        let ttl = match args.len() {
            2 => None,
            4 => {
                if !extract_string(&args[2])?.eq_ignore_ascii_case("px") {
                    return Err(EmberError::SyntaxError);
                }
                let ms: u64 = extract_string(&args[3])?
                    .parse()
                    .map_err(|_| EmberError::InvalidExpiry)?;
                if ms == 0 {
                    return Err(EmberError::InvalidExpiry);
                }
                Some(Duration::from_millis(ms))
            }
            _ => return Err(EmberError::SyntaxError),
        };

        Ok(Set { key, value, ttl })
    }
}

#[async_trait]
impl ExecutableCommand for Set {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, EmberError> {
        let guard = ctx.get_single_shard_context_mut()?;
        let mut stored = StoredValue::new(DataValue::String(self.value.clone()));
        stored.expiry = self.ttl.map(|ttl| Instant::now() + ttl);
        // A plain SET overwrites whatever was there, expiry included.
        guard.put(self.key.clone(), stored);
        Ok(RespValue::SimpleString("OK".into()))
    }
}
