//! # switchyard-proto
//!
//! Wire-level data model for a chat-platform bot: gateway frames, dispatch
//! events, interactions, interaction responses and application command
//! definitions.
//!
//! Everything here is plain data with `serde` support. No I/O happens in this
//! crate; the bot runtime owns the websocket and REST plumbing.
//!
//! ## Quick Start
//!
//! ```rust
//! use switchyard_proto::{EventKind, GatewayEvent, GatewayFrame};
//!
//! let raw = r#"{"op":0,"s":3,"t":"MESSAGE_CREATE","d":{"id":"1","channel_id":"2","content":"hi","author":{"id":"9","username":"ana"}}}"#;
//! let frame: GatewayFrame = serde_json::from_str(raw).unwrap();
//! let event = GatewayEvent::from_frame(frame).unwrap().unwrap();
//! assert_eq!(event.kind, EventKind::MessageCreate);
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod command;
pub mod error;
pub mod event;
pub mod gateway;
pub mod intents;
pub mod interaction;
pub mod response;

pub use self::command::{ApplicationCommand, CommandOption, CommandType, OptionType};
pub use self::error::{ProtoError, Result};
pub use self::event::{EventKind, EventPayload, GatewayEvent, Message, Ready, ReadyApplication, User};
pub use self::gateway::{ConnectionProperties, GatewayFrame, Hello, Identify, Opcode};
pub use self::intents::Intents;
pub use self::interaction::{Interaction, InteractionData, InteractionKind, Member};
pub use self::response::{InteractionResponse, ResponseData, ResponseKind};
