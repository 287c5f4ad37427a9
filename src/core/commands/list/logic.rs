// src/core/commands/list/logic.rs

use crate::core::storage::data_types::{DataValue, StoredValue};
use crate::core::storage::db::{ExecutionContext, PushDirection};
use crate::core::{EmberError, RespValue};
use bytes::Bytes;
use std::collections::VecDeque;

/// Shared logic for `LPUSH` and `RPUSH` commands.
///
/// The values are committed to the list first and waiters are served
/// afterwards, all under the same shard lock, so the returned length counts
/// every pushed value and a delivery is never observed ahead of the list
/// state that backs it.
pub(crate) fn list_push_logic(
    ctx: &mut ExecutionContext<'_>,
    key: &Bytes,
    values: &[Bytes],
    direction: PushDirection,
) -> Result<RespValue, EmberError> {
    let state = ctx.state.clone();
    let guard = ctx.get_single_shard_context_mut()?;
    guard.evict_if_expired(key);

    let new_len;
    let now_empty;
    {
        let entry = guard.get_or_insert_with_mut(key.clone(), || {
            StoredValue::new(DataValue::List(VecDeque::new()))
        });
        let DataValue::List(list) = &mut entry.data else {
            return Err(EmberError::NotAList);
        };
        for value in values {
            match direction {
                PushDirection::Left => list.push_front(value.clone()),
                PushDirection::Right => list.push_back(value.clone()),
            }
        }
        new_len = list.len() as i64;

        // Hand off head elements to any parked BLPOP clients, oldest first.
        state.blocker_manager.serve_waiters(key, list);
        now_empty = list.is_empty();
    }
    if now_empty {
        guard.pop(key);
    }

    Ok(RespValue::Integer(new_len))
}

/// Pops the head element of the list at `key`, removing the key once the list
/// drains. Shared by `LPOP` and the blocking pop's immediate path.
pub(crate) fn list_pop_front(
    ctx: &mut ExecutionContext<'_>,
    key: &Bytes,
) -> Result<Option<Bytes>, EmberError> {
    let guard = ctx.get_single_shard_context_mut()?;
    guard.evict_if_expired(key);

    let (popped, now_empty) = {
        let Some(entry) = guard.get_mut(key) else {
            return Ok(None);
        };
        let DataValue::List(list) = &mut entry.data else {
            return Err(EmberError::NotAList);
        };
        (list.pop_front(), list.is_empty())
    };

    if popped.is_some() && now_empty {
        guard.pop(key);
    }
    Ok(popped)
}
