//! Handler context and route labels.
//!
//! Every spawned handler receives a `Context`: the shared session handle plus
//! the route that selected it and the feature that registered it.

use crate::error::HandlerError;
use crate::network::Session;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use switchyard_proto::{EventKind, Interaction, InteractionKind, InteractionResponse};

/// Identifier-keyed handler categories.
///
/// Each category is a separate namespace: "confirm" may be both a command
/// name and a component custom id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RouteCategory {
    ApplicationCommand,
    Component,
    ModalSubmit,
    Autocomplete,
}

impl RouteCategory {
    /// All categories, in registration order.
    pub const ALL: [RouteCategory; 4] = [
        Self::ApplicationCommand,
        Self::Component,
        Self::ModalSubmit,
        Self::Autocomplete,
    ];

    /// Category an interaction subtype routes through. Pings have none.
    pub const fn for_interaction(kind: InteractionKind) -> Option<Self> {
        match kind {
            InteractionKind::ApplicationCommand => Some(Self::ApplicationCommand),
            InteractionKind::MessageComponent => Some(Self::Component),
            InteractionKind::ModalSubmit => Some(Self::ModalSubmit),
            InteractionKind::Autocomplete => Some(Self::Autocomplete),
            InteractionKind::Ping => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ApplicationCommand => "application-command",
            Self::Component => "component",
            Self::ModalSubmit => "modal-submit",
            Self::Autocomplete => "autocomplete",
        }
    }
}

impl fmt::Display for RouteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What selected a handler: an interaction route or an event kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Interaction { category: RouteCategory, key: String },
    Event(EventKind),
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interaction { category, key } => write!(f, "{category}:{key}"),
            Self::Event(kind) => write!(f, "event:{kind}"),
        }
    }
}

/// Context passed to each handler invocation.
#[derive(Clone)]
pub struct Context {
    /// Shared platform session. Safe for concurrent use.
    pub session: Arc<dyn Session>,
    /// Feature that registered the handler.
    pub feature: Arc<str>,
    /// Route that matched.
    pub route: Route,
}

impl Context {
    pub fn new(session: Arc<dyn Session>, feature: Arc<str>, route: Route) -> Self {
        Self {
            session,
            feature,
            route,
        }
    }

    /// Answer an interaction in one call.
    #[inline]
    pub async fn respond(
        &self,
        interaction: &Interaction,
        response: InteractionResponse,
    ) -> Result<(), HandlerError> {
        self.session.respond(interaction, response).await?;
        Ok(())
    }

    /// Last measured gateway heartbeat round trip, zero until known.
    pub fn latency(&self) -> Duration {
        self.session.heartbeat_latency().unwrap_or_default()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("feature", &self.feature)
            .field("route", &self.route)
            .finish_non_exhaustive()
    }
}
