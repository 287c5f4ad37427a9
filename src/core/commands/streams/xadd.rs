// src/core/commands/streams/xadd.rs

//! Implements the `XADD` command for adding entries to a stream.
//!
//! # Command Syntax
//! `XADD key <* | ms-* | ms-seq> field value [field value ...]`
//!
//! The resolved id is returned as a bulk string. Waiting `XREAD` clients are
//! woken after the entry is committed.

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, extract_string};
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::{DataValue, StoredValue};
use crate::core::storage::db::ExecutionContext;
use crate::core::storage::stream::{IdSpec, Stream};
use crate::core::{EmberError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;
use indexmap::IndexMap;

#[derive(Debug, Clone)]
pub struct XAdd {
    pub key: Bytes,
    pub id_spec: IdSpec,
    pub fields: IndexMap<Bytes, Bytes>,
}

impl Default for XAdd {
    fn default() -> Self {
        Self {
            key: Bytes::new(),
            id_spec: IdSpec::Auto,
            fields: IndexMap::new(),
        }
    }
}

fn parse_id_spec(s: &str) -> Result<IdSpec, EmberError> {
    if s == "*" {
        return Ok(IdSpec::Auto);
    }
    if let Some(ms_part) = s.strip_suffix("-*") {
        let ms = ms_part.parse().map_err(|_| EmberError::InvalidStreamId)?;
        return Ok(IdSpec::AutoSeq(ms));
    }
    s.parse().map(IdSpec::Explicit)
}

impl ParseCommand for XAdd {
    fn parse(args: &[RespFrame]) -> Result<Self, EmberError> {
        // key, id, and at least one field/value pair.
        if args.len() < 4 || (args.len() - 2) % 2 != 0 {
            return Err(EmberError::WrongArgumentCount("XADD".to_string()));
        }
        let key = extract_bytes(&args[0])?;
        let id_spec = parse_id_spec(&extract_string(&args[1])?)?;
        let fields = args[2..]
            .chunks_exact(2)
            .map(|chunk| Ok((extract_bytes(&chunk[0])?, extract_bytes(&chunk[1])?)))
            .collect::<Result<_, EmberError>>()?;
        Ok(XAdd { key, id_spec, fields })
    }
}

#[async_trait]
impl ExecutableCommand for XAdd {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, EmberError> {
        let state = ctx.state.clone();
        let guard = ctx.get_single_shard_context_mut()?;
        guard.evict_if_expired(&self.key);

        let created = guard.get(&self.key).is_none();
        let add_result = {
            let entry = guard.get_or_insert_with_mut(self.key.clone(), || {
                StoredValue::new(DataValue::Stream(Stream::new()))
            });
            let DataValue::Stream(stream) = &mut entry.data else {
                return Err(EmberError::NotAStream);
            };
            stream.add_entry(self.id_spec, self.fields.clone())
        };

        match add_result {
            Ok(new_id) => {
                // The entry is committed under the shard lock; woken readers
                // will re-acquire it and observe the append.
                state.stream_blocker_manager.notify(&self.key);
                Ok(RespValue::BulkString(new_id.to_string().into()))
            }
            Err(e) => {
                // A rejected id must not leave an empty stream behind.
                if created {
                    guard.pop(&self.key);
                }
                Err(e)
            }
        }
    }
}
