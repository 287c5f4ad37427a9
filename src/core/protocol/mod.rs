// src/core/protocol/mod.rs

//! The RESP wire protocol: frame types, the network codec, and the
//! simplified value type used by the command layer.

mod resp_frame;
mod resp_value;

pub use resp_frame::{RespFrame, RespFrameCodec};
pub use resp_value::RespValue;
