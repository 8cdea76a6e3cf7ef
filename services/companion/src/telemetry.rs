//! services/companion/src/telemetry.rs
//!
//! Logging bootstrap for embedders of the companion library.

use crate::config::Config;
use crate::error::AppError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global `tracing` subscriber at the configured level.
///
/// Fails if a global subscriber is already set.
pub fn init_tracing(config: &Config) -> Result<(), AppError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| AppError::Internal(format!("failed to install tracing subscriber: {e}")))
}
