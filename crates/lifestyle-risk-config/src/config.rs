// crates/lifestyle-risk-config/src/config.rs
// ============================================================================
// Module: Lifestyle Risk Configuration
// Description: TOML configuration model, load guards, and validation.
// Purpose: Provide fail-closed settings for the webhook server and CLI.
// Dependencies: lifestyle-risk-core, lifestyle-risk-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is read from a single TOML file. Loading enforces path and
//! size limits before parsing, rejects unknown keys, and validates every
//! section so that a service never starts with settings it cannot honor.
//! Security posture: config files are operator input but are still bounded.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs::File;
use std::io::Read;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use lifestyle_risk_core::MessageVariant;
use lifestyle_risk_store_sqlite::SqliteStoreConfig;
use lifestyle_risk_store_sqlite::SqliteStoreMode;
use lifestyle_risk_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "LIFESTYLE_RISK_CONFIG";
/// Config file used when neither a flag nor the environment names one.
pub const DEFAULT_CONFIG_NAME: &str = "lifestyle-risk.toml";
/// Maximum config file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum total config path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of a single config path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;

/// Default bind address for the webhook server.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
/// Default request body limit in bytes.
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;
/// Upper bound for the request body limit.
pub const MAX_BODY_BYTES_LIMIT: usize = 1024 * 1024;
/// Default allowed CORS origin (the conversational agent console).
pub const DEFAULT_CORS_ORIGIN: &str = "https://dialogflow.cloud.google.com";
/// Default model artifact path.
pub const DEFAULT_MODEL_PATH: &str = "models/lifestyle-risk-forest.json";
/// Default busy timeout for the `SQLite` store.
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Accepted log levels.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("config io error: {0}")]
    Io(String),
    /// Config file is not valid TOML for the config model.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Config violates a load guard or validation rule.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Top-level service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RiskConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Model artifact settings.
    #[serde(default)]
    pub model: ModelConfig,
    /// Response wording settings.
    #[serde(default)]
    pub responder: ResponderConfig,
    /// Prediction store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address to bind.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum accepted request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Origins allowed by the CORS layer.
    #[serde(default = "default_cors_allowed_origins")]
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: default_max_body_bytes(),
            cors_allowed_origins: default_cors_allowed_origins(),
        }
    }
}

/// Model artifact configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Path to the forest artifact.
    #[serde(default = "default_model_path")]
    pub path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
        }
    }
}

/// Responder configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResponderConfig {
    /// Success message wording.
    #[serde(default)]
    pub variant: MessageVariant,
}

/// Prediction store backend selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreType {
    /// Predictions are not persisted.
    #[default]
    None,
    /// Predictions are persisted to `SQLite`.
    Sqlite,
}

/// Prediction store configuration.
///
/// # Invariants
/// - `path` is required when `store_type` is [`StoreType::Sqlite`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Backend selector.
    #[serde(rename = "type", default)]
    pub store_type: StoreType,
    /// Database path (sqlite only).
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Busy timeout in milliseconds (sqlite only).
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// Journal mode (sqlite only).
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// Sync mode (sqlite only).
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
    /// Optional retention limit.
    #[serde(default)]
    pub max_records: Option<u64>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_type: StoreType::None,
            path: None,
            busy_timeout_ms: default_busy_timeout_ms(),
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
            max_records: None,
        }
    }
}

impl StoreConfig {
    /// Returns the `SQLite` store configuration when the sqlite backend is selected.
    #[must_use]
    pub fn sqlite(&self) -> Option<SqliteStoreConfig> {
        if self.store_type != StoreType::Sqlite {
            return None;
        }
        let path = self.path.clone()?;
        Some(SqliteStoreConfig {
            path,
            busy_timeout_ms: self.busy_timeout_ms,
            journal_mode: self.journal_mode,
            sync_mode: self.sync_mode,
            max_records: self.max_records,
        })
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Minimum level (`trace|debug|info|warn|error`).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Serde default for [`ServerConfig::bind`].
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

/// Serde default for [`ServerConfig::max_body_bytes`].
const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Serde default for [`ServerConfig::cors_allowed_origins`].
fn default_cors_allowed_origins() -> Vec<String> {
    vec![DEFAULT_CORS_ORIGIN.to_string()]
}

/// Serde default for [`ModelConfig::path`].
fn default_model_path() -> PathBuf {
    PathBuf::from(DEFAULT_MODEL_PATH)
}

/// Serde default for [`StoreConfig::busy_timeout_ms`].
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

/// Serde default for [`LoggingConfig::level`].
fn default_log_level() -> String {
    "info".to_string()
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl RiskConfig {
    /// Loads and validates configuration.
    ///
    /// The file is taken from `path`, else [`CONFIG_ENV_VAR`], else
    /// [`DEFAULT_CONFIG_NAME`]. A missing default file yields the built-in
    /// defaults; a missing explicitly named file is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file violates a load guard, fails to
    /// parse, or fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match env::var_os(CONFIG_ENV_VAR) {
                Some(value) if !value.is_empty() => (PathBuf::from(value), true),
                _ => (PathBuf::from(DEFAULT_CONFIG_NAME), false),
            },
        };
        validate_config_path(&resolved)?;
        if !explicit && !resolved.exists() {
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        let text = read_config_text(&resolved)?;
        Self::from_toml_str(&text)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first violated rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.model.validate()?;
        self.store.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    /// Returns the parsed bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `bind` is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("server.bind is not a socket address: {}", self.bind)))
    }

    /// Validates the bind address, body limit and CORS origins.
    fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        if self.max_body_bytes == 0 || self.max_body_bytes > MAX_BODY_BYTES_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "server.max_body_bytes out of range: {} (max {MAX_BODY_BYTES_LIMIT})",
                self.max_body_bytes
            )));
        }
        for origin in &self.cors_allowed_origins {
            let scheme_ok = origin.starts_with("http://") || origin.starts_with("https://");
            if !scheme_ok || origin.trim() != origin {
                return Err(ConfigError::Invalid(format!(
                    "server.cors_allowed_origins entry must be an http(s) origin: {origin}"
                )));
            }
        }
        Ok(())
    }
}

impl ModelConfig {
    /// Validates the model section.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("model.path must not be empty".to_string()));
        }
        Ok(())
    }
}

impl StoreConfig {
    /// Validates store limits and sqlite requirements.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_records == Some(0) {
            return Err(ConfigError::Invalid(
                "store.max_records must be greater than zero".to_string(),
            ));
        }
        if self.store_type == StoreType::Sqlite {
            match &self.path {
                Some(path) if !path.as_os_str().is_empty() => {}
                _ => {
                    return Err(ConfigError::Invalid(
                        "sqlite store requires store.path".to_string(),
                    ));
                }
            }
            if self.busy_timeout_ms == 0 {
                return Err(ConfigError::Invalid(
                    "store.busy_timeout_ms must be greater than zero".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl LoggingConfig {
    /// Validates the log level.
    fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "logging.level must be one of {}: {}",
                LOG_LEVELS.join("|"),
                self.level
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates config path limits before touching the filesystem.
fn validate_config_path(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Reads the config file as UTF-8 within the size limit.
fn read_config_text(path: &Path) -> Result<String, ConfigError> {
    let file = File::open(path).map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
    let limit = u64::try_from(MAX_CONFIG_FILE_SIZE).unwrap_or(u64::MAX).saturating_add(1);
    let mut bytes = Vec::new();
    file.take(limit)
        .read_to_end(&mut bytes)
        .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
    if bytes.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
    }
    String::from_utf8(bytes).map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))
}
