//! Platform session seam.
//!
//! Handlers reach the platform only through [`Session`]. Production uses
//! [`HttpSession`](super::HttpSession); tests substitute a recorder.

use crate::error::SessionError;
use async_trait::async_trait;
use std::time::Duration;
use switchyard_proto::{ApplicationCommand, Interaction, InteractionResponse};

/// Shared handle to the platform. Must be safe to use from many handlers at once.
#[async_trait]
pub trait Session: Send + Sync {
    /// Last heartbeat round trip, `None` before the first acknowledgement.
    fn heartbeat_latency(&self) -> Option<Duration>;

    /// Application id learnt from `READY`.
    fn application_id(&self) -> Option<String>;

    /// Send the initial response to an interaction.
    async fn respond(
        &self,
        interaction: &Interaction,
        response: InteractionResponse,
    ) -> Result<(), SessionError>;

    /// Replace every command registered for the application in `guild_id`.
    async fn bulk_overwrite_commands(
        &self,
        guild_id: &str,
        commands: &[ApplicationCommand],
    ) -> Result<Vec<ApplicationCommand>, SessionError>;
}
