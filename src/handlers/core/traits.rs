//! Handler traits.
//!
//! Two shapes of handler exist:
//!
//! - [`InteractionHandler`]: owns exactly one routing key in one
//!   [`RouteCategory`](super::RouteCategory) and receives the interaction.
//! - [`EventHandler`]: one of possibly many reactions to a gateway event
//!   kind, receives the whole event.
//!
//! Both are implemented for plain async closures, so small features do not
//! need a struct per handler:
//!
//! ```ignore
//! Feature::new("Greeter").on_event(EventKind::MessageCreate, |ctx: Context, event: Arc<GatewayEvent>| async move {
//!     tracing::info!(feature = %ctx.feature, seq = ?event.sequence, "saw a message");
//!     Ok(())
//! });
//! ```

use super::context::Context;
use crate::error::HandlerResult;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use switchyard_proto::{GatewayEvent, Interaction};

/// Handler for a routed interaction (command, component, modal, autocomplete).
#[async_trait]
pub trait InteractionHandler: Send + Sync {
    async fn handle(&self, ctx: Context, interaction: Arc<Interaction>) -> HandlerResult;
}

/// Handler for a gateway event kind.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, ctx: Context, event: Arc<GatewayEvent>) -> HandlerResult;
}

#[async_trait]
impl<F, Fut> InteractionHandler for F
where
    F: Fn(Context, Arc<Interaction>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    async fn handle(&self, ctx: Context, interaction: Arc<Interaction>) -> HandlerResult {
        (self)(ctx, interaction).await
    }
}

#[async_trait]
impl<F, Fut> EventHandler for F
where
    F: Fn(Context, Arc<GatewayEvent>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    async fn handle(&self, ctx: Context, event: Arc<GatewayEvent>) -> HandlerResult {
        (self)(ctx, event).await
    }
}

/// Shared, type-erased interaction handler as stored in the registry.
pub type SharedInteractionHandler = Arc<dyn InteractionHandler>;

/// Shared, type-erased event handler as stored in the registry.
pub type SharedEventHandler = Arc<dyn EventHandler>;
