//! Tracing setup: structured logging with span definitions and event types.

pub mod events;
pub mod spans;

use braid_core::config::ObservabilityConfig;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `config.log_level` when set. Returns `false` if a
/// subscriber was already installed, which makes repeated calls harmless.
pub fn init_tracing(config: &ObservabilityConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.json_logs {
        builder
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .try_init()
    } else {
        builder.compact().try_init()
    };
    installed.is_ok()
}

/// Install a subscriber with an explicit filter string (tests and embedding).
pub fn init_tracing_with_filter(filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(true)
        .with_test_writer()
        .try_init()
        .is_ok()
}
