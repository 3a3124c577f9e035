//! Structured logging.
//!
//! Uses the tracing crate; the default directive comes from config and can
//! be overridden with `RUST_LOG`. The subscriber's stdout writer is safe for
//! concurrent request tasks: each event is written as one line.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Initialize the tracing subscriber.
pub fn init(config: &ObservabilityConfig) {
    let default_filter = format!(
        "fieldgate={level},tower_http={level}",
        level = config.log_level
    );

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
