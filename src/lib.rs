//! Switchyard - feature-module event dispatcher for chat-platform bots.
//!
//! Features declare the commands, interaction routes and gateway events they
//! care about. At startup the declarations are merged into a conflict-checked
//! [`Registry`](handlers::Registry); at runtime the
//! [`Dispatcher`](handlers::Dispatcher) launches each matching handler as its
//! own task, so a failing handler never takes down the bot or its siblings.

pub mod config;
pub mod error;
pub mod features;
pub mod handlers;
pub mod network;
pub mod telemetry;

pub use switchyard_proto as proto;
