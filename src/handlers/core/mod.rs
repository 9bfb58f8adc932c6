//! Core handler infrastructure.
//!
//! This module contains the routing machinery shared by every feature:
//!
//! - [`Registry`]: immutable routing table built once from active features.
//! - [`Dispatcher`]: resolves events against the registry and launches
//!   handlers as isolated tasks.
//! - [`InteractionHandler`] / [`EventHandler`]: the two handler shapes.
//! - [`Context`]: what every handler invocation receives.

pub mod boundary;
pub mod context;
pub mod dispatch;
pub mod registry;
pub mod traits;

pub use boundary::HandlerOutcome;
pub use context::{Context, Route, RouteCategory};
pub use dispatch::{DispatchStats, Dispatched, Dispatcher};
pub use registry::{EventEntry, Registry, RouteEntry};
pub use traits::{EventHandler, InteractionHandler, SharedEventHandler, SharedInteractionHandler};
