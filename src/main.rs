//! switchyard - feature-module chat bot.
//!
//! Startup order: logging, configuration, feature registry, gateway session,
//! command publication. Runs until SIGINT/SIGTERM or until the gateway
//! session ends, then drains in-flight handlers.

use anyhow::Context as _;
use std::path::PathBuf;
use std::sync::Arc;
use switchyard::config::{self, Config};
use switchyard::features::active_features;
use switchyard::handlers::{Dispatcher, Registry};
use switchyard::network::{GatewayConnection, GatewayOptions, HttpSession, sync_commands};
use switchyard::telemetry;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);

    // Logging needs the [logging] table, so a broken config is reported on stderr.
    let config = Config::load(config_path.as_deref())
        .with_context(|| match &config_path {
            Some(path) => format!("failed to load config from {}", path.display()),
            None => "failed to load config".to_string(),
        })?;
    telemetry::init(&config.logging);

    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        return Err(config::ConfigError::Invalid(errors).into());
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        gateway = %config.gateway.url,
        guild = %config.credentials.guild_id,
        "Starting switchyard"
    );

    let registry = Arc::new(Registry::build(active_features()).map_err(|e| {
        error!(error = %e, "Failed to build feature registry");
        e
    })?);

    let session = Arc::new(HttpSession::new(
        &config.gateway.api_base,
        &config.credentials.token,
    )?);
    let dispatcher = Arc::new(
        Dispatcher::new(Arc::clone(&registry), session.clone())
            .with_handler_timeout(config.dispatch.handler_timeout()),
    );

    let options = GatewayOptions {
        url: config.gateway.url.clone(),
        token: config.credentials.token.clone(),
        intents: registry.intents(),
    };
    let mut gateway =
        GatewayConnection::connect(options, Arc::clone(&session), Arc::clone(&dispatcher)).await?;
    gateway.wait_ready().await?;

    let published = sync_commands(session.as_ref(), &config.credentials.guild_id, &registry)
        .await
        .context("failed to publish commands")?;
    info!(commands = published, "Ready to serve");

    let ended = tokio::select! {
        result = gateway.closed() => Some(result),
        _ = shutdown_signal() => None,
    };
    let outcome = match ended {
        Some(result) => {
            match &result {
                Ok(()) => info!("Gateway session ended"),
                Err(e) => error!(error = %e, "Gateway session failed"),
            }
            result
        }
        None => {
            info!("Shutdown signal received");
            gateway.close().await
        }
    };

    if !dispatcher.shutdown(config.dispatch.shutdown_grace()).await {
        warn!("Exiting with handlers still running");
    }

    outcome?;
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
