//! JSON frames exchanged with the room server

use chrono::Utc;
use serde::Serialize;

use crate::common::errors::Result;
use crate::common::types::{InboundEvent, OutboundCommand};

/// Keepalive sent by the client
pub const PING: &str = "PING";

/// A parsed server frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerFrame {
    /// Keepalive answer
    Pong,
    Event(InboundEvent),
}

/// Outgoing command with its send time
#[derive(Debug, Serialize)]
pub struct CommandFrame<'a> {
    #[serde(flatten)]
    pub command: &'a OutboundCommand,
    /// Unix time in milliseconds
    pub sent_at: i64,
}

/// Encode a command as a text frame
pub fn encode_command(command: &OutboundCommand) -> Result<String> {
    let frame = CommandFrame {
        command,
        sent_at: Utc::now().timestamp_millis(),
    };
    Ok(serde_json::to_string(&frame)?)
}

/// Parse a text frame from the server
pub fn parse_message(text: &str) -> Result<ServerFrame> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("pong") {
        return Ok(ServerFrame::Pong);
    }
    Ok(ServerFrame::Event(serde_json::from_str(trimmed)?))
}
