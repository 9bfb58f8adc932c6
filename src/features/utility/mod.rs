//! Utility commands.

mod ping;

pub use ping::ping;
