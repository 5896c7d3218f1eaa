//! Tracing setup: Subscriber initialisation and structured event helpers.

pub mod events;

use tracing_subscriber::EnvFilter;

use crate::config::defaults::LOG_FILTER_ENV;
use crate::config::LoggingConfig;

/// Initialize the global tracing subscriber.
///
/// The `VIGIL_LOG` environment variable takes precedence over the configured
/// level. Calling this more than once keeps the first subscriber.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(config.effective_level()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let _ = if config.effective_json() {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

/// Initialize tracing with a custom filter string (for testing or embedding).
pub fn init_tracing_with_filter(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(true)
        .with_test_writer()
        .try_init();
}
