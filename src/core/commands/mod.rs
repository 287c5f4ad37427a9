// src/core/commands/mod.rs

//! This module defines all supported commands, organizes them into categories,
//! and provides the central `Command` enum that encapsulates their parsed state.

pub mod command_trait;
pub mod generic;
pub mod helpers;
pub mod list;
pub mod streams;
pub mod string;

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::protocol::RespFrame;
use crate::core::storage::db::ExecutionContext;
use crate::core::{EmberError, RespValue};
use bytes::Bytes;

/// A fully parsed command, ready for execution.
#[derive(Debug, Clone)]
pub enum Command {
    // --- Generic ---
    Ping(generic::Ping),
    Echo(generic::Echo),
    Info(generic::Info),
    Type(generic::TypeInfo),

    // --- Strings ---
    Get(string::Get),
    Set(string::Set),
    Incr(string::Incr),

    // --- Lists ---
    LPush(list::LPush),
    RPush(list::RPush),
    LPop(list::LPop),
    LLen(list::LLen),
    LRange(list::LRange),
    BLPop(list::BLPop),

    // --- Streams ---
    XAdd(streams::XAdd),
    XRange(streams::XRange),
    XLen(streams::XLen),
    XRead(streams::XRead),

    // --- Transactions (routed by the handler, never executed directly) ---
    Multi,
    Exec,
    Discard,
}

impl TryFrom<RespFrame> for Command {
    type Error = EmberError;

    /// Parses a request frame (an array of bulk strings, first element the
    /// case-insensitive command name) into a `Command`.
    fn try_from(frame: RespFrame) -> Result<Self, Self::Error> {
        let RespFrame::Array(parts) = frame else {
            return Err(EmberError::SyntaxError);
        };
        let Some(RespFrame::BulkString(name_bytes)) = parts.first() else {
            return Err(EmberError::SyntaxError);
        };
        let name = String::from_utf8_lossy(name_bytes).to_string();
        let args = &parts[1..];

        match name.to_ascii_lowercase().as_str() {
            "ping" => Ok(Command::Ping(generic::Ping::parse(args)?)),
            "echo" => Ok(Command::Echo(generic::Echo::parse(args)?)),
            "info" => Ok(Command::Info(generic::Info::parse(args)?)),
            "type" => Ok(Command::Type(generic::TypeInfo::parse(args)?)),
            "get" => Ok(Command::Get(string::Get::parse(args)?)),
            "set" => Ok(Command::Set(string::Set::parse(args)?)),
            "incr" => Ok(Command::Incr(string::Incr::parse(args)?)),
            "lpush" => Ok(Command::LPush(list::LPush::parse(args)?)),
            "rpush" => Ok(Command::RPush(list::RPush::parse(args)?)),
            "lpop" => Ok(Command::LPop(list::LPop::parse(args)?)),
            "llen" => Ok(Command::LLen(list::LLen::parse(args)?)),
            "lrange" => Ok(Command::LRange(list::LRange::parse(args)?)),
            "blpop" => Ok(Command::BLPop(list::BLPop::parse(args)?)),
            "xadd" => Ok(Command::XAdd(streams::XAdd::parse(args)?)),
            "xrange" => Ok(Command::XRange(streams::XRange::parse(args)?)),
            "xlen" => Ok(Command::XLen(streams::XLen::parse(args)?)),
            "xread" => Ok(Command::XRead(streams::XRead::parse(args)?)),
            "multi" => {
                helpers::validate_arg_count(args, 0, "MULTI")?;
                Ok(Command::Multi)
            }
            "exec" => {
                helpers::validate_arg_count(args, 0, "EXEC")?;
                Ok(Command::Exec)
            }
            "discard" => {
                helpers::validate_arg_count(args, 0, "DISCARD")?;
                Ok(Command::Discard)
            }
            _ => Err(EmberError::UnknownCommand(name)),
        }
    }
}

impl Command {
    /// The lowercase name of the command, for logging and routing.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Ping(_) => "ping",
            Command::Echo(_) => "echo",
            Command::Info(_) => "info",
            Command::Type(_) => "type",
            Command::Get(_) => "get",
            Command::Set(_) => "set",
            Command::Incr(_) => "incr",
            Command::LPush(_) => "lpush",
            Command::RPush(_) => "rpush",
            Command::LPop(_) => "lpop",
            Command::LLen(_) => "llen",
            Command::LRange(_) => "lrange",
            Command::BLPop(_) => "blpop",
            Command::XAdd(_) => "xadd",
            Command::XRange(_) => "xrange",
            Command::XLen(_) => "xlen",
            Command::XRead(_) => "xread",
            Command::Multi => "multi",
            Command::Exec => "exec",
            Command::Discard => "discard",
        }
    }

    /// The keys this command operates on, used to decide which shards to lock.
    pub fn get_keys(&self) -> Vec<Bytes> {
        match self {
            Command::Ping(_) | Command::Echo(_) | Command::Info(_) => vec![],
            Command::Multi | Command::Exec | Command::Discard => vec![],
            Command::Type(c) => vec![c.key.clone()],
            Command::Get(c) => vec![c.key.clone()],
            Command::Set(c) => vec![c.key.clone()],
            Command::Incr(c) => vec![c.key.clone()],
            Command::LPush(c) => vec![c.key.clone()],
            Command::RPush(c) => vec![c.key.clone()],
            Command::LPop(c) => vec![c.key.clone()],
            Command::LLen(c) => vec![c.key.clone()],
            Command::LRange(c) => vec![c.key.clone()],
            Command::BLPop(c) => vec![c.key.clone()],
            Command::XAdd(c) => vec![c.key.clone()],
            Command::XRange(c) => vec![c.key.clone()],
            Command::XLen(c) => vec![c.key.clone()],
            Command::XRead(c) => c.streams.iter().map(|(k, _)| k.clone()).collect(),
        }
    }

    /// Executes the command against the engines.
    pub async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, EmberError> {
        match self {
            Command::Ping(c) => c.execute(ctx).await,
            Command::Echo(c) => c.execute(ctx).await,
            Command::Info(c) => c.execute(ctx).await,
            Command::Type(c) => c.execute(ctx).await,
            Command::Get(c) => c.execute(ctx).await,
            Command::Set(c) => c.execute(ctx).await,
            Command::Incr(c) => c.execute(ctx).await,
            Command::LPush(c) => c.execute(ctx).await,
            Command::RPush(c) => c.execute(ctx).await,
            Command::LPop(c) => c.execute(ctx).await,
            Command::LLen(c) => c.execute(ctx).await,
            Command::LRange(c) => c.execute(ctx).await,
            Command::BLPop(c) => c.execute(ctx).await,
            Command::XAdd(c) => c.execute(ctx).await,
            Command::XRange(c) => c.execute(ctx).await,
            Command::XLen(c) => c.execute(ctx).await,
            Command::XRead(c) => c.execute(ctx).await,
            Command::Multi | Command::Exec | Command::Discard => Err(EmberError::Internal(
                "transaction control commands are handled by the router".into(),
            )),
        }
    }
}
