// src/core/commands/streams/mod.rs

pub mod xadd;
pub mod xlen;
pub mod xrange;
pub mod xread;

pub use xadd::XAdd;
pub use xlen::XLen;
pub use xrange::XRange;
pub use xread::XRead;

use crate::core::storage::stream::StreamEntry;
use crate::core::RespValue;

/// Formats a single stream entry into the `[id, [field, value, ...]]` array
/// shape shared by `XRANGE` and `XREAD`. The field/value array is flat and
/// preserves insertion order.
pub(crate) fn format_entry(entry: &StreamEntry) -> RespValue {
    let mut fields_array = Vec::with_capacity(entry.fields.len() * 2);
    for (k, v) in &entry.fields {
        fields_array.push(RespValue::BulkString(k.clone()));
        fields_array.push(RespValue::BulkString(v.clone()));
    }
    RespValue::Array(vec![
        RespValue::BulkString(entry.id.to_string().into()),
        RespValue::Array(fields_array),
    ])
}
