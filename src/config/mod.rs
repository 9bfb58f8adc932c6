//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Config struct definitions and loading
//! - [`defaults`]: serde default values
//! - [`validation`]: startup sanity checks
//!
//! Non-secret settings come from an optional TOML file. The bot token and
//! guild id come only from the environment.

mod defaults;
mod types;
mod validation;

pub use types::{
    Config, ConfigError, Credentials, DispatchConfig, GatewayConfig, LogFormat, LoggingConfig,
};
pub use validation::{ValidationError, validate};

/// File loaded when no path is given on the command line.
pub const DEFAULT_CONFIG_FILE: &str = "switchyard.toml";

/// Environment variable holding the bot token.
pub const TOKEN_VAR: &str = "BOT_TOKEN";

/// Environment variable holding the guild commands are published to.
pub const GUILD_VAR: &str = "GUILD_ID";
