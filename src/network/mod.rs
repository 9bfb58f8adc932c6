//! Network module.
//!
//! Contains the platform session (REST), the gateway websocket connection,
//! and command publication.

mod commands;
mod gateway;
mod rest;
mod session;

pub use commands::sync_commands;
pub use gateway::{GatewayConnection, GatewayOptions};
pub use rest::HttpSession;
pub use session::Session;
