//! Event routing.
//!
//! Features declare handlers; this module turns those declarations into a
//! [`Registry`] and dispatches gateway events through it.

mod core;

pub use self::core::{
    Context, DispatchStats, Dispatched, Dispatcher, EventEntry, EventHandler, HandlerOutcome,
    InteractionHandler, Registry, Route, RouteCategory, RouteEntry, SharedEventHandler,
    SharedInteractionHandler,
};
