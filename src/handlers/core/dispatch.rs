//! Event dispatcher.
//!
//! `dispatch` is synchronous: it resolves handlers against the registry,
//! spawns one isolated task per matching handler and returns immediately.
//! Every task runs behind a [`FailureBoundary`], so slow or failing handlers
//! never delay the caller or each other.

use super::boundary::{BoundaryCounters, FailureBoundary, HandlerOutcome};
use super::context::{Context, Route, RouteCategory};
use super::registry::Registry;
use crate::error::HandlerResult;
use crate::network::Session;
use crate::telemetry::spans;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use switchyard_proto::{EventPayload, GatewayEvent};
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;
use tracing::{Instrument, Span, debug, info, warn};

#[derive(Debug, Default)]
struct DispatchCounters {
    events: AtomicU64,
    matched: AtomicU64,
    unmatched: AtomicU64,
    launched: AtomicU64,
}

/// Point-in-time copy of dispatcher counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Events passed to `dispatch`.
    pub events: u64,
    /// Interactions that found a routed handler.
    pub matched: u64,
    /// Interactions with no routed handler, pings included.
    pub unmatched: u64,
    /// Handler tasks spawned.
    pub launched: u64,
    pub completed: u64,
    pub errors: u64,
    pub panics: u64,
    pub timeouts: u64,
}

/// Handles to the tasks launched for one event.
#[derive(Debug, Default)]
#[must_use = "dropping Dispatched detaches the handlers, which keep running"]
pub struct Dispatched {
    tasks: Vec<JoinHandle<HandlerOutcome>>,
}

impl Dispatched {
    /// Number of handler tasks launched.
    pub fn launched(&self) -> usize {
        self.tasks.len()
    }

    /// Wait for every launched handler. Outcomes are in launch order.
    pub async fn join(self) -> Vec<HandlerOutcome> {
        let mut outcomes = Vec::with_capacity(self.tasks.len());
        for task in self.tasks {
            outcomes.push(task.await.unwrap_or(HandlerOutcome::Cancelled));
        }
        outcomes
    }

    /// Let the handlers run on without keeping their handles.
    pub fn detach(self) {}
}

/// Routes gateway events to feature handlers.
pub struct Dispatcher {
    registry: Arc<Registry>,
    session: Arc<dyn Session>,
    tracker: TaskTracker,
    handler_timeout: Option<Duration>,
    counters: DispatchCounters,
    outcomes: Arc<BoundaryCounters>,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>, session: Arc<dyn Session>) -> Self {
        Self {
            registry,
            session,
            tracker: TaskTracker::new(),
            handler_timeout: None,
            counters: DispatchCounters::default(),
            outcomes: Arc::new(BoundaryCounters::default()),
        }
    }

    /// Drop handlers still running after `timeout`. `None` or zero disables it.
    pub fn with_handler_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.handler_timeout = timeout.filter(|t| !t.is_zero());
        self
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Route one event.
    ///
    /// An interaction launches at most one routed handler, chosen by its
    /// subtype and routing key. Independently, every handler registered for
    /// the event's kind is launched. Must be called from within a Tokio
    /// runtime.
    pub fn dispatch(&self, event: GatewayEvent) -> Dispatched {
        self.counters.events.fetch_add(1, Ordering::Relaxed);
        let mut dispatched = Dispatched::default();

        if let EventPayload::Interaction(interaction) = &event.payload {
            let routed = RouteCategory::for_interaction(interaction.kind).and_then(|category| {
                let key = interaction.routing_key()?;
                let entry = self.registry.interaction_handler(category, key)?;
                Some((category, key.to_string(), entry.clone()))
            });

            match routed {
                Some((category, key, entry)) => {
                    self.counters.matched.fetch_add(1, Ordering::Relaxed);
                    let ctx = self.context(entry.feature(), Route::Interaction { category, key });
                    let handler = Arc::clone(entry.handler());
                    let interaction = Arc::new(interaction.clone());
                    let boundary = self.boundary(&ctx);
                    let task = self.launch(boundary, async move { handler.handle(ctx, interaction).await });
                    dispatched.tasks.push(task);
                }
                None => {
                    self.counters.unmatched.fetch_add(1, Ordering::Relaxed);
                    debug!(
                        kind = %interaction.kind,
                        key = ?interaction.routing_key(),
                        "No handler for interaction"
                    );
                }
            }
        }

        let handlers = self.registry.event_handlers(event.kind);
        if !handlers.is_empty() {
            let event = Arc::new(event);
            for entry in handlers {
                let ctx = self.context(entry.feature(), Route::Event(event.kind));
                let handler = Arc::clone(entry.handler());
                let event = Arc::clone(&event);
                let boundary = self.boundary(&ctx);
                let task = self.launch(boundary, async move { handler.handle(ctx, event).await });
                dispatched.tasks.push(task);
            }
        }

        dispatched
    }

    fn context(&self, feature: &Arc<str>, route: Route) -> Context {
        Context::new(Arc::clone(&self.session), Arc::clone(feature), route)
    }

    fn boundary(&self, ctx: &Context) -> (FailureBoundary, Span) {
        let boundary = FailureBoundary::new(
            Arc::clone(&ctx.feature),
            ctx.route.clone(),
            self.handler_timeout,
            Arc::clone(&self.outcomes),
        );
        (boundary, spans::handler(&ctx.feature, &ctx.route))
    }

    fn launch<F>(&self, (boundary, span): (FailureBoundary, Span), handler: F) -> JoinHandle<HandlerOutcome>
    where
        F: Future<Output = HandlerResult> + Send + 'static,
    {
        self.counters.launched.fetch_add(1, Ordering::Relaxed);
        self.tracker
            .spawn(async move { boundary.run(handler).await }.instrument(span))
    }

    /// Handler tasks currently running.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    pub fn stats(&self) -> DispatchStats {
        DispatchStats {
            events: self.counters.events.load(Ordering::Relaxed),
            matched: self.counters.matched.load(Ordering::Relaxed),
            unmatched: self.counters.unmatched.load(Ordering::Relaxed),
            launched: self.counters.launched.load(Ordering::Relaxed),
            completed: self.outcomes.completed.load(Ordering::Relaxed),
            errors: self.outcomes.errors.load(Ordering::Relaxed),
            panics: self.outcomes.panics.load(Ordering::Relaxed),
            timeouts: self.outcomes.timeouts.load(Ordering::Relaxed),
        }
    }

    /// Stop accepting work and wait up to `grace` for running handlers.
    ///
    /// Returns `true` if every handler finished in time. Handlers still
    /// running afterwards are abandoned to runtime shutdown.
    pub async fn shutdown(&self, grace: Duration) -> bool {
        self.tracker.close();
        let in_flight = self.tracker.len();
        if in_flight > 0 {
            info!(in_flight, grace_ms = grace.as_millis() as u64, "Draining handlers");
        }
        let drained = tokio::time::timeout(grace, self.tracker.wait()).await.is_ok();
        if !drained {
            warn!(in_flight = self.tracker.len(), "Handlers still running after grace period");
        }
        let stats = self.stats();
        info!(
            events = stats.events,
            launched = stats.launched,
            errors = stats.errors,
            panics = stats.panics,
            timeouts = stats.timeouts,
            "Dispatcher stopped"
        );
        drained
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("handler_timeout", &self.handler_timeout)
            .field("in_flight", &self.tracker.len())
            .finish_non_exhaustive()
    }
}
