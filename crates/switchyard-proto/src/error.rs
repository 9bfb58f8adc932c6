//! Error types for the protocol library.
//!
//! Decoding failures carry the dispatch name or opcode that was being
//! decoded so the gateway loop can log something useful.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtoError`].
pub type Result<T, E = ProtoError> = std::result::Result<T, E>;

/// Protocol-level errors.
#[derive(Debug, Error)]
pub enum ProtoError {
    /// A frame or payload was not valid JSON for the expected shape.
    #[error("failed to decode {context}: {source}")]
    Decode {
        /// What was being decoded (opcode or dispatch name).
        context: String,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// A frame could not be encoded.
    #[error("failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),

    /// Opcode number not defined by the gateway protocol.
    #[error("unknown gateway opcode: {0}")]
    UnknownOpcode(u8),

    /// A dispatch frame arrived without its event name.
    #[error("dispatch frame without event name")]
    MissingEventName,

    /// `Hello` announced a heartbeat period of zero.
    #[error("HELLO announced a zero heartbeat interval")]
    ZeroHeartbeatInterval,

    /// Enumerated wire value outside the known range.
    #[error("invalid {kind} value: {value}")]
    InvalidEnum {
        /// Type being decoded.
        kind: &'static str,
        /// The raw value.
        value: u8,
    },
}

impl ProtoError {
    pub(crate) fn decode(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            context: context.into(),
            source,
        }
    }
}
