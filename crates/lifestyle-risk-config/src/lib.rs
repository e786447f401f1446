// crates/lifestyle-risk-config/src/lib.rs
// ============================================================================
// Module: Lifestyle Risk Config
// Description: Configuration model for the lifestyle risk webhook.
// Purpose: Re-export the config types consumed by the server and CLI.
// Dependencies: lifestyle-risk-core, lifestyle-risk-store-sqlite, serde, toml
// ============================================================================

//! Configuration model for the lifestyle risk webhook.

pub mod config;

pub use config::CONFIG_ENV_VAR;
pub use config::ConfigError;
pub use config::DEFAULT_BIND;
pub use config::DEFAULT_CONFIG_NAME;
pub use config::DEFAULT_CORS_ORIGIN;
pub use config::DEFAULT_MAX_BODY_BYTES;
pub use config::DEFAULT_MODEL_PATH;
pub use config::LOG_LEVELS;
pub use config::LogFormat;
pub use config::LoggingConfig;
pub use config::MAX_BODY_BYTES_LIMIT;
pub use config::MAX_CONFIG_FILE_SIZE;
pub use config::ModelConfig;
pub use config::ResponderConfig;
pub use config::RiskConfig;
pub use config::ServerConfig;
pub use config::StoreConfig;
pub use config::StoreType;
