//! Feature registry.
//!
//! `Registry::build` folds the declared capabilities of every active feature
//! into one routing table. The four identifier-keyed categories reject
//! duplicate keys; event handlers for the same kind accumulate in
//! registration order. The result is immutable and shared as
//! `Arc<Registry>` with the dispatcher.

use super::context::RouteCategory;
use super::traits::{SharedEventHandler, SharedInteractionHandler};
use crate::error::BuildError;
use crate::features::Feature;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use switchyard_proto::{ApplicationCommand, EventKind, Intents};
use tracing::{debug, info, warn};

/// A registered interaction handler and the feature that owns it.
#[derive(Clone)]
pub struct RouteEntry {
    feature: Arc<str>,
    handler: SharedInteractionHandler,
}

impl RouteEntry {
    pub fn feature(&self) -> &Arc<str> {
        &self.feature
    }

    pub fn handler(&self) -> &SharedInteractionHandler {
        &self.handler
    }
}

/// A registered event handler and the feature that owns it.
#[derive(Clone)]
pub struct EventEntry {
    feature: Arc<str>,
    handler: SharedEventHandler,
}

impl EventEntry {
    pub fn feature(&self) -> &Arc<str> {
        &self.feature
    }

    pub fn handler(&self) -> &SharedEventHandler {
        &self.handler
    }
}

type RouteMap = HashMap<String, RouteEntry>;

/// Aggregated routing table of all active features.
#[derive(Default)]
pub struct Registry {
    intents: Intents,
    commands: Vec<ApplicationCommand>,
    application_commands: RouteMap,
    components: RouteMap,
    modal_submits: RouteMap,
    autocompletes: RouteMap,
    events: HashMap<EventKind, Vec<EventEntry>>,
    features: Vec<Arc<str>>,
}

impl Registry {
    /// Build the registry from features in activation order.
    ///
    /// Fails on the first identifier registered twice within a category,
    /// whether by two features or by the same one.
    pub fn build<I>(features: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = Feature>,
    {
        let mut registry = Self::default();

        info!("Loading features");
        for feature in features {
            registry.load(feature)?;
        }

        info!(
            features = registry.features.len(),
            intents = %registry.intents,
            commands = registry.commands.len(),
            application_commands = registry.application_commands.len(),
            components = registry.components.len(),
            modal_submits = registry.modal_submits.len(),
            autocompletes = registry.autocompletes.len(),
            event_handlers = registry.event_handler_count(),
            "Finished loading features"
        );
        Ok(registry)
    }

    fn load(&mut self, feature: Feature) -> Result<(), BuildError> {
        let parts = feature.into_parts();
        let name = parts.name;
        info!(feature = %name, "Loading feature");

        if self.features.iter().any(|existing| **existing == *name) {
            warn!(feature = %name, "Feature name registered twice; diagnostics will be ambiguous");
        }
        self.features.push(Arc::clone(&name));

        self.intents |= parts.intents;
        self.commands.extend(parts.commands);

        for (category, key, handler) in parts.routes {
            let routes = self.routes_mut(category);
            match routes.entry(key) {
                Entry::Occupied(existing) => {
                    return Err(BuildError::Conflict {
                        category,
                        id: existing.key().clone(),
                        feature: name.to_string(),
                        registered_by: existing.get().feature.to_string(),
                    });
                }
                Entry::Vacant(slot) => {
                    debug!(feature = %name, %category, key = %slot.key(), "Handler registered");
                    slot.insert(RouteEntry {
                        feature: Arc::clone(&name),
                        handler,
                    });
                }
            }
        }

        for (kind, handler) in parts.events {
            self.events.entry(kind).or_default().push(EventEntry {
                feature: Arc::clone(&name),
                handler,
            });
            debug!(feature = %name, event = %kind, "Event handler registered");
        }

        Ok(())
    }

    fn routes_mut(&mut self, category: RouteCategory) -> &mut RouteMap {
        match category {
            RouteCategory::ApplicationCommand => &mut self.application_commands,
            RouteCategory::Component => &mut self.components,
            RouteCategory::ModalSubmit => &mut self.modal_submits,
            RouteCategory::Autocomplete => &mut self.autocompletes,
        }
    }

    fn routes(&self, category: RouteCategory) -> &RouteMap {
        match category {
            RouteCategory::ApplicationCommand => &self.application_commands,
            RouteCategory::Component => &self.components,
            RouteCategory::ModalSubmit => &self.modal_submits,
            RouteCategory::Autocomplete => &self.autocompletes,
        }
    }

    /// Union of every feature's intents.
    pub fn intents(&self) -> Intents {
        self.intents
    }

    /// All command definitions, in feature order, duplicates kept.
    pub fn commands(&self) -> &[ApplicationCommand] {
        &self.commands
    }

    /// The single handler for `key` in `category`.
    pub fn interaction_handler(&self, category: RouteCategory, key: &str) -> Option<&RouteEntry> {
        self.routes(category).get(key)
    }

    /// Handlers for an event kind, in registration order. Empty if none.
    pub fn event_handlers(&self, kind: EventKind) -> &[EventEntry] {
        self.events.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Registered keys of a category, sorted.
    pub fn route_keys(&self, category: RouteCategory) -> Vec<&str> {
        let mut keys: Vec<&str> = self.routes(category).keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Number of handlers in a category.
    pub fn route_count(&self, category: RouteCategory) -> usize {
        self.routes(category).len()
    }

    /// Total event handlers across all kinds.
    pub fn event_handler_count(&self) -> usize {
        self.events.values().map(Vec::len).sum()
    }

    /// Feature names in load order.
    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(|name| &**name)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("features", &self.features)
            .field("intents", &self.intents)
            .field("commands", &self.commands.len())
            .field("application_commands", &self.route_keys(RouteCategory::ApplicationCommand))
            .field("components", &self.route_keys(RouteCategory::Component))
            .field("modal_submits", &self.route_keys(RouteCategory::ModalSubmit))
            .field("autocompletes", &self.route_keys(RouteCategory::Autocomplete))
            .field("event_handlers", &self.event_handler_count())
            .finish()
    }
}
