// crates/lifestyle-risk-server/src/logging.rs
// ============================================================================
// Module: Logging Setup
// Description: Global tracing subscriber initialization.
// Purpose: Route service events to stderr as text or JSON.
// Dependencies: lifestyle-risk-config, tracing-subscriber, thiserror
// ============================================================================

//! ## Overview
//! The subscriber filter comes from [`LOG_ENV_VAR`] when set, otherwise from
//! the configured level. Output always goes to stderr so that CLI commands
//! keep stdout for their results.

use lifestyle_risk_config::LogFormat;
use lifestyle_risk_config::LoggingConfig;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the configured log filter.
pub const LOG_ENV_VAR: &str = "LIFESTYLE_RISK_LOG";

/// Logging setup errors.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Filter directive could not be parsed.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// A global subscriber is already installed.
    #[error("logging init failed: {0}")]
    Init(String),
}

/// Builds the event filter for `config`.
///
/// # Errors
///
/// Returns [`LoggingError::Filter`] when the configured level is not a valid directive.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV_VAR) {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|err| LoggingError::Filter(err.to_string()))
}

/// Installs the global tracing subscriber.
///
/// # Errors
///
/// Returns [`LoggingError`] when the filter is invalid or a subscriber is
/// already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);
    let result = match config.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|err| LoggingError::Init(err.to_string()))
}
