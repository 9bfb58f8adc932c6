//! Feature modules.
//!
//! A [`Feature`] is a named, declarative bundle of capabilities: gateway
//! intents, command definitions to publish, and handlers keyed by route.
//! Features never see each other; the registry merges them at startup.

mod utility;

use crate::handlers::{
    EventHandler, InteractionHandler, RouteCategory, SharedEventHandler, SharedInteractionHandler,
};
use std::fmt;
use std::sync::Arc;
use switchyard_proto::{ApplicationCommand, EventKind, Intents};

/// Declaration of one feature's capabilities.
///
/// Built with chained calls and consumed by
/// [`Registry::build`](crate::handlers::Registry::build).
pub struct Feature {
    name: Arc<str>,
    intents: Intents,
    commands: Vec<ApplicationCommand>,
    routes: Vec<(RouteCategory, String, SharedInteractionHandler)>,
    events: Vec<(EventKind, SharedEventHandler)>,
}

/// A feature taken apart for registration.
pub(crate) struct FeatureParts {
    pub(crate) name: Arc<str>,
    pub(crate) intents: Intents,
    pub(crate) commands: Vec<ApplicationCommand>,
    pub(crate) routes: Vec<(RouteCategory, String, SharedInteractionHandler)>,
    pub(crate) events: Vec<(EventKind, SharedEventHandler)>,
}

impl Feature {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            intents: Intents::NONE,
            commands: Vec::new(),
            routes: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Request additional gateway intents. Accumulates.
    pub fn intents(mut self, intents: Intents) -> Self {
        self.intents |= intents;
        self
    }

    /// Publish a command definition at startup.
    pub fn command(mut self, command: ApplicationCommand) -> Self {
        self.commands.push(command);
        self
    }

    /// Route an interaction key in `category` to `handler`.
    pub fn route(
        mut self,
        category: RouteCategory,
        key: impl Into<String>,
        handler: impl InteractionHandler + 'static,
    ) -> Self {
        self.routes.push((category, key.into(), Arc::new(handler)));
        self
    }

    /// Handle invocations of the command `name`.
    pub fn on_command(self, name: impl Into<String>, handler: impl InteractionHandler + 'static) -> Self {
        self.route(RouteCategory::ApplicationCommand, name, handler)
    }

    /// Handle component interactions with `custom_id`.
    pub fn on_component(
        self,
        custom_id: impl Into<String>,
        handler: impl InteractionHandler + 'static,
    ) -> Self {
        self.route(RouteCategory::Component, custom_id, handler)
    }

    /// Handle submissions of the modal `custom_id`.
    pub fn on_modal(self, custom_id: impl Into<String>, handler: impl InteractionHandler + 'static) -> Self {
        self.route(RouteCategory::ModalSubmit, custom_id, handler)
    }

    /// Handle autocomplete requests for the command `name`.
    pub fn on_autocomplete(
        self,
        name: impl Into<String>,
        handler: impl InteractionHandler + 'static,
    ) -> Self {
        self.route(RouteCategory::Autocomplete, name, handler)
    }

    /// React to every gateway event of `kind`.
    ///
    /// Dispatch names without a variant of their own all map to
    /// [`EventKind::Unknown`], so an `Unknown` handler sees every one of
    /// them. Use [`GatewayEvent::name`] to tell them apart.
    ///
    /// [`GatewayEvent::name`]: switchyard_proto::GatewayEvent::name
    pub fn on_event(mut self, kind: EventKind, handler: impl EventHandler + 'static) -> Self {
        self.events.push((kind, Arc::new(handler)));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn required_intents(&self) -> Intents {
        self.intents
    }

    pub fn commands(&self) -> &[ApplicationCommand] {
        &self.commands
    }

    pub(crate) fn into_parts(self) -> FeatureParts {
        FeatureParts {
            name: self.name,
            intents: self.intents,
            commands: self.commands,
            routes: self.routes,
            events: self.events,
        }
    }
}

impl fmt::Debug for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let routes: Vec<String> = self
            .routes
            .iter()
            .map(|(category, key, _)| format!("{category}:{key}"))
            .collect();
        let events: Vec<EventKind> = self.events.iter().map(|(kind, _)| *kind).collect();
        f.debug_struct("Feature")
            .field("name", &self.name)
            .field("intents", &self.intents)
            .field("commands", &self.commands.len())
            .field("routes", &routes)
            .field("events", &events)
            .finish()
    }
}

/// Features enabled in this build, in activation order.
pub fn active_features() -> Vec<Feature> {
    vec![utility::ping()]
}
