//! `tracing` subscriber setup
//!
//! `RUST_LOG` wins over `AppConfig::log_level` when set.

use crate::config::{AppConfig, LogFormat};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber
///
/// Returns `false` when a subscriber was already installed (e.g. by a test
/// harness), which is not an error.
pub fn init(config: &AppConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(false))
            .try_init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init(),
    };

    match result {
        Ok(()) => {
            tracing::debug!(
                app = %config.name,
                environment = %config.environment,
                "logging initialised"
            );
            true
        }
        Err(_) => false,
    }
}
