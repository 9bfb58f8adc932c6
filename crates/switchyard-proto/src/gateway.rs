//! Gateway framing.
//!
//! Every websocket text message is one JSON frame `{op, d, s, t}`. Only
//! dispatch frames (`op = 0`) carry `s` and `t`.

use crate::error::{ProtoError, Result};
use crate::intents::Intents;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

wire_enum! {
    /// Gateway opcode.
    pub enum Opcode {
        /// Event dispatch (receive).
        Dispatch = 0,
        /// Heartbeat (send or receive).
        Heartbeat = 1,
        /// Start a session (send).
        Identify = 2,
        /// Update presence (send).
        PresenceUpdate = 3,
        /// Join or move voice (send).
        VoiceStateUpdate = 4,
        /// Resume a session (send).
        Resume = 6,
        /// Server asks the client to reconnect (receive).
        Reconnect = 7,
        /// Request guild members (send).
        RequestGuildMembers = 8,
        /// Session is invalid (receive).
        InvalidSession = 9,
        /// First frame after connect (receive).
        Hello = 10,
        /// Heartbeat acknowledged (receive).
        HeartbeatAck = 11,
    }
}

/// One gateway frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayFrame {
    /// Opcode.
    pub op: Opcode,
    /// Payload.
    #[serde(default)]
    pub d: Value,
    /// Sequence number (dispatch only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,
    /// Event name (dispatch only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,
}

/// Payload of `Hello`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hello {
    /// Heartbeat period in milliseconds.
    pub heartbeat_interval: u64,
}

impl Hello {
    /// Heartbeat period as a duration.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval)
    }
}

/// Client properties sent with `Identify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionProperties {
    /// Operating system.
    pub os: String,
    /// Library name.
    pub browser: String,
    /// Library name.
    pub device: String,
}

impl Default for ConnectionProperties {
    fn default() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            browser: "switchyard".to_string(),
            device: "switchyard".to_string(),
        }
    }
}

/// Payload of `Identify`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identify {
    /// Bot token (without the `Bot ` prefix).
    pub token: String,
    /// Requested intents.
    pub intents: Intents,
    /// Client properties.
    pub properties: ConnectionProperties,
}

impl std::fmt::Debug for Identify {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identify")
            .field("token", &"<redacted>")
            .field("intents", &self.intents)
            .field("properties", &self.properties)
            .finish()
    }
}

impl GatewayFrame {
    /// Parse a frame from websocket text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ProtoError::decode("gateway frame", e))
    }

    /// Serialize the frame for sending.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Heartbeat carrying the last sequence number seen.
    pub fn heartbeat(last_sequence: Option<u64>) -> Self {
        Self {
            op: Opcode::Heartbeat,
            d: last_sequence.map_or(Value::Null, Value::from),
            s: None,
            t: None,
        }
    }

    /// Identify frame.
    pub fn identify(identify: &Identify) -> Result<Self> {
        Ok(Self {
            op: Opcode::Identify,
            d: serde_json::to_value(identify)?,
            s: None,
            t: None,
        })
    }

    /// Interpret the payload of a `Hello` frame. A zero interval is rejected.
    pub fn hello(&self) -> Result<Hello> {
        let hello: Hello = Hello::deserialize(&self.d).map_err(|e| ProtoError::decode("HELLO", e))?;
        if hello.heartbeat_interval == 0 {
            return Err(ProtoError::ZeroHeartbeatInterval);
        }
        Ok(hello)
    }
}
