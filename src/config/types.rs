//! Core configuration types and loading.

use super::defaults::{default_api_base, default_gateway_url, default_shutdown_grace_secs};
use super::validation::ValidationError;
use super::{DEFAULT_CONFIG_FILE, GUILD_VAR, TOKEN_VAR};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("environment variable {0} is not set")]
    MissingSecret(&'static str),
    #[error("invalid configuration: {}", join(.0))]
    Invalid(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Runtime configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Filled from the environment, never from the file.
    #[serde(skip)]
    pub credentials: Credentials,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load from `path`, or from `switchyard.toml` if it exists, plus the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let content = match path {
            Some(path) => std::fs::read_to_string(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                std::fs::read_to_string(DEFAULT_CONFIG_FILE)?
            }
            None => String::new(),
        };
        Self::from_parts(&content, |key| std::env::var(key).ok())
    }

    /// Build from TOML text and an environment lookup.
    pub fn from_parts<F>(content: &str, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Config = toml::from_str(content)?;
        let secret = |key: &'static str| {
            env(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::MissingSecret(key))
        };
        config.credentials = Credentials {
            token: secret(TOKEN_VAR)?,
            guild_id: secret(GUILD_VAR)?,
        };
        Ok(config)
    }
}

/// Secrets taken from the environment.
#[derive(Clone, Default)]
pub struct Credentials {
    pub token: String,
    pub guild_id: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("guild_id", &self.guild_id)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Websocket URL, including version and encoding query.
    #[serde(default = "default_gateway_url")]
    pub url: String,
    /// REST API base URL.
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: default_gateway_url(),
            api_base: default_api_base(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Per-handler deadline. Absent or zero means handlers may run indefinitely.
    #[serde(default)]
    pub handler_timeout_secs: Option<u64>,
    /// How long shutdown waits for running handlers.
    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,
}

impl DispatchConfig {
    pub fn handler_timeout(&self) -> Option<Duration> {
        self.handler_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            handler_timeout_secs: None,
            shutdown_grace_secs: default_shutdown_grace_secs(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    /// Fallback filter when `RUST_LOG` is unset, e.g. `"info,switchyard=debug"`.
    #[serde(default)]
    pub filter: Option<String>,
}
