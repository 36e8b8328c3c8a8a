//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::defaults::LOG_ENV_VAR;
use crate::config::ObservabilityConfig;

/// Install a global fmt subscriber.
///
/// `MEDIASEARCH_LOG` overrides the configured level. Returns `false` when a
/// global subscriber was already installed, which is harmless.
pub fn init_tracing(config: &ObservabilityConfig) -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if config.json_logs {
        builder
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .try_init()
            .is_ok()
    } else {
        builder.try_init().is_ok()
    }
}
