//! Unified error handling for switchyard.
//!
//! Startup errors (`BuildError`, `GatewayError`, `SessionError` during command
//! sync) bubble up to `main` and end the process. `HandlerError` never leaves
//! the failure boundary around a single handler invocation.

use crate::handlers::RouteCategory;
use switchyard_proto::{EventKind, Opcode, ProtoError};
use thiserror::Error;

// ============================================================================
// Handler Errors (runtime, contained per invocation)
// ============================================================================

/// Errors a feature handler can return.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("interaction is missing {0}")]
    MissingData(&'static str),

    #[error("unexpected payload for {0}")]
    UnexpectedPayload(EventKind),

    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Session(_) => "session_error",
            Self::MissingData(_) => "missing_data",
            Self::UnexpectedPayload(_) => "unexpected_payload",
            Self::Internal(_) => "internal_error",
        }
    }
}

/// Result type for feature handlers.
pub type HandlerResult = Result<(), HandlerError>;

// ============================================================================
// Build Errors (registry construction, fatal)
// ============================================================================

/// Registry construction failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error(
        "{category} handler with ID '{id}' from feature '{feature}' is already registered by feature '{registered_by}'"
    )]
    Conflict {
        category: RouteCategory,
        id: String,
        feature: String,
        registered_by: String,
    },
}

// ============================================================================
// Session Errors (REST calls on behalf of handlers and startup)
// ============================================================================

/// Failures talking to the platform REST API.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("platform rejected request ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("application id unknown: gateway session is not ready")]
    NotReady,

    #[error("bot token contains characters not allowed in a header")]
    InvalidToken,
}

// ============================================================================
// Gateway Errors (websocket session, fatal)
// ============================================================================

/// Gateway connection failures. There is no resume: any of these ends the run.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("websocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtoError),

    #[error("expected HELLO, got {0:?}")]
    UnexpectedFrame(Opcode),

    #[error("gateway closed the connection (code {code:?}): {reason}")]
    Closed { code: Option<u16>, reason: String },

    #[error("gateway requested a reconnect")]
    ReconnectRequested,

    #[error("gateway invalidated the session")]
    InvalidSession,

    #[error("heartbeat was not acknowledged")]
    Zombied,

    #[error("connection ended before READY")]
    NotReady,

    #[error("gateway task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<tokio_tungstenite::tungstenite::Error> for GatewayError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(err))
    }
}
