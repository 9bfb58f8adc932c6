//! Logging setup and span constructors.

use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured filter; with neither set the level is `info`.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.filter.as_deref().unwrap_or("info"))
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match config.format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().with_current_span(true).init(),
    }
}

/// Standardized span constructors.
pub mod spans {
    use crate::handlers::Route;
    use tracing::{Span, info_span};

    /// Create a span for one handler invocation.
    pub fn handler(feature: &str, route: &Route) -> Span {
        info_span!("handler", feature = %feature, route = %route)
    }
}
