//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("gateway.url must start with ws:// or wss://, got '{0}'")]
    GatewayScheme(String),
    #[error("gateway.api_base must start with http:// or https://, got '{0}'")]
    ApiBaseScheme(String),
    #[error("dispatch.shutdown_grace_secs must be greater than zero")]
    ZeroShutdownGrace,
    #[error("GUILD_ID must be a numeric id, got '{0}'")]
    InvalidGuildId(String),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let url = &config.gateway.url;
    if !(url.starts_with("wss://") || url.starts_with("ws://")) {
        errors.push(ValidationError::GatewayScheme(url.clone()));
    }

    let api = &config.gateway.api_base;
    if !(api.starts_with("https://") || api.starts_with("http://")) {
        errors.push(ValidationError::ApiBaseScheme(api.clone()));
    }

    if config.dispatch.shutdown_grace_secs == 0 {
        errors.push(ValidationError::ZeroShutdownGrace);
    }

    // Snowflake ids are decimal u64
    let guild = &config.credentials.guild_id;
    if guild.parse::<u64>().is_err() {
        errors.push(ValidationError::InvalidGuildId(guild.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
