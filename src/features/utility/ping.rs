//! `/ping`: replies with the gateway heartbeat latency.

use crate::error::HandlerResult;
use crate::features::Feature;
use crate::handlers::{Context, InteractionHandler};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use switchyard_proto::{ApplicationCommand, Interaction, InteractionResponse};
use tracing::warn;

pub fn ping() -> Feature {
    Feature::new("Ping")
        .command(ApplicationCommand::chat_input(
            "ping",
            "Responds with Pong! and the API latency.",
        ))
        .on_command("ping", PingHandler)
}

fn pong_message(latency: Duration) -> String {
    format!("🏓 Pong! API latency is `{}ms`.", latency.as_millis())
}

/// Handler for the `ping` command.
pub struct PingHandler;

#[async_trait]
impl InteractionHandler for PingHandler {
    async fn handle(&self, ctx: Context, interaction: Arc<Interaction>) -> HandlerResult {
        let reply = InteractionResponse::message(pong_message(ctx.latency()));
        if let Err(e) = ctx.respond(&interaction, reply).await {
            warn!(
                feature = %ctx.feature,
                interaction = %interaction.id,
                error = %e,
                "Failed to send pong"
            );
        }
        Ok(())
    }
}
