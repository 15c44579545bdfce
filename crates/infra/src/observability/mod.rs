//! Tracing subscriber setup
//!
//! `RUST_LOG` takes precedence over the configured level. Output is either
//! human-readable or JSON lines, picked by [`LoggingConfig::json`].

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use wiss_domain::constants::DEFAULT_LOG_LEVEL;
use wiss_domain::LoggingConfig;

/// Install the global tracing subscriber.
///
/// Returns `false` when a subscriber was already installed (a second call,
/// or a test harness that set its own), in which case nothing changes.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = build_filter(config);

    let installed = if config.json {
        tracing_subscriber::registry().with(filter).with(fmt::layer().json()).try_init()
    } else {
        tracing_subscriber::registry().with(filter).with(fmt::layer()).try_init()
    };

    match installed {
        Ok(()) => {
            tracing::debug!(level = %config.level, json = config.json, "tracing initialised");
            true
        }
        Err(_) => false,
    }
}

/// `RUST_LOG`, else the configured directive, else the default level.
fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}
