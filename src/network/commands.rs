//! Command publication.

use super::session::Session;
use crate::error::SessionError;
use crate::handlers::Registry;
use tracing::info;

/// Overwrite the guild's command set with every command the registry declares.
///
/// Returns the number of commands the platform accepted. An empty registry
/// publishes nothing and leaves the guild's commands untouched.
pub async fn sync_commands(
    session: &dyn Session,
    guild_id: &str,
    registry: &Registry,
) -> Result<usize, SessionError> {
    let commands = registry.commands();
    if commands.is_empty() {
        info!(guild = %guild_id, "No commands to publish");
        return Ok(0);
    }

    info!(guild = %guild_id, count = commands.len(), "Publishing commands");
    let accepted = session.bulk_overwrite_commands(guild_id, commands).await?;
    info!(guild = %guild_id, count = accepted.len(), "Commands published");
    Ok(accepted.len())
}
