// crates/lifestyle-risk-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Prediction Store
// Description: Durable PredictionStore backed by SQLite.
// Purpose: Persist completed predictions for later review.
// Dependencies: lifestyle-risk-core, rusqlite, serde, thiserror
// ============================================================================

//! ## Overview
//! This module implements a durable [`PredictionStore`] using `SQLite`. Each
//! successful prediction becomes one row holding the ten raw parameter values
//! as text, the decoded disease name, and the creation time. An optional
//! retention limit prunes the oldest rows after every insert.
//! Security posture: stored values are untrusted agent input and are never
//! interpreted; they are bound as parameters, not spliced into SQL.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::Duration;

use lifestyle_risk_core::FEATURE_COUNT;
use lifestyle_risk_core::FeatureField;
use lifestyle_risk_core::PredictionRecord;
use lifestyle_risk_core::PredictionStore;
use lifestyle_risk_core::StoreError;
use lifestyle_risk_core::Timestamp;
use lifestyle_risk_core::core::raw_value_text;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::ToSql;
use rusqlite::params;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of rows returned by a single listing.
pub const MAX_LIST_LIMIT: usize = 10_000;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `synchronous` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` prediction store.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory).
/// - `busy_timeout_ms` is interpreted as milliseconds.
/// - `max_records`, when set, must be greater than zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
    /// Optional maximum number of retained predictions (oldest pruned).
    #[serde(default)]
    pub max_records: Option<u64>,
}

impl SqliteStoreConfig {
    /// Builds a configuration with default tuning for `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
            max_records: None,
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
///
/// # Invariants
/// - Error messages avoid embedding raw parameter values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid configuration or store data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
        }
    }
}

// ============================================================================
// SECTION: Stored Rows
// ============================================================================

/// Raw parameter value read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredField {
    /// Feature field.
    pub field: FeatureField,
    /// Raw value text as received from the agent.
    pub value: String,
}

/// Prediction row read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredPrediction {
    /// Row identifier (monotonic per database).
    pub id: i64,
    /// Raw parameter values in feature vector order.
    pub fields: Vec<StoredField>,
    /// Decoded disease name.
    pub disease_name: String,
    /// Creation time.
    pub created_at: Timestamp,
}

impl StoredPrediction {
    /// Returns the stored raw text for `field`.
    #[must_use]
    pub fn value(&self, field: FeatureField) -> Option<&str> {
        self.fields.iter().find(|stored| stored.field == field).map(|stored| stored.value.as_str())
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed prediction store.
///
/// # Invariants
/// - `SQLite` connection access is serialized through a mutex.
/// - When `max_records` is set, at most that many rows remain after an insert.
#[derive(Clone)]
pub struct SqlitePredictionStore {
    /// Store configuration.
    config: SqliteStoreConfig,
    /// Shared connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqlitePredictionStore {
    /// Opens an `SQLite`-backed prediction store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the configuration is invalid or the
    /// database cannot be opened or initialized.
    pub fn new(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        if config.max_records == Some(0) {
            return Err(SqliteStoreError::Invalid(
                "max_records must be greater than zero".to_string(),
            ));
        }
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(&config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            config,
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Opens an existing store for reading without touching its schema or pragmas.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the file does not exist, cannot be
    /// opened, or does not carry this store's schema version.
    pub fn open_read_only(path: impl Into<PathBuf>) -> Result<Self, SqliteStoreError> {
        let config = SqliteStoreConfig::new(path);
        validate_store_path(&config.path)?;
        if !config.path.is_file() {
            return Err(SqliteStoreError::Io(format!(
                "store database not found: {}",
                config.path.display()
            )));
        }
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
        let connection = Connection::open_with_flags(&config.path, flags)
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        connection
            .busy_timeout(Duration::from_millis(config.busy_timeout_ms))
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        check_schema_version(&connection)?;
        Ok(Self {
            config,
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Inserts a prediction and applies retention.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the write fails.
    pub fn insert_record(&self, record: &PredictionRecord) -> Result<i64, SqliteStoreError> {
        let values = FeatureField::ALL
            .map(|field| record.value(field).map_or_else(|| "null".to_string(), raw_value_text));
        let disease_name = record.disease.name();
        let created_at = record.created_at.as_unix_millis();
        let mut bound: Vec<&dyn ToSql> = values.iter().map(|value| value as &dyn ToSql).collect();
        bound.push(&disease_name);
        bound.push(&created_at);
        let placeholders: Vec<String> = (1 ..= bound.len()).map(|index| format!("?{index}")).collect();
        let sql = format!(
            "INSERT INTO predictions ({}, disease_name, created_at) VALUES ({})",
            field_columns(),
            placeholders.join(", ")
        );
        let mut guard = self.lock()?;
        let tx = guard.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        tx.execute(&sql, bound.as_slice()).map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let id = tx.last_insert_rowid();
        if let Some(max_records) = self.config.max_records {
            let keep = i64::try_from(max_records).unwrap_or(i64::MAX);
            tx.execute(
                "DELETE FROM predictions WHERE id NOT IN (
                    SELECT id FROM predictions ORDER BY id DESC LIMIT ?1
                )",
                params![keep],
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        }
        tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        Ok(id)
    }

    /// Lists the most recent predictions, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] if the query fails or `limit` is out of range.
    pub fn list_recent(&self, limit: usize) -> Result<Vec<StoredPrediction>, SqliteStoreError> {
        if limit == 0 || limit > MAX_LIST_LIMIT {
            return Err(SqliteStoreError::Invalid(format!(
                "list limit out of range: {limit} (max {MAX_LIST_LIMIT})"
            )));
        }
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let sql = format!(
            "SELECT id, {}, disease_name, created_at FROM predictions ORDER BY id DESC LIMIT ?1",
            field_columns()
        );
        let guard = self.lock()?;
        let mut stmt = guard.prepare(&sql).map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let rows = stmt
            .query_map(params![limit], |row| {
                let id: i64 = row.get(0)?;
                let mut fields = Vec::with_capacity(FEATURE_COUNT);
                for (offset, field) in FeatureField::ALL.into_iter().enumerate() {
                    let value: String = row.get(offset + 1)?;
                    fields.push(StoredField {
                        field,
                        value,
                    });
                }
                let disease_name: String = row.get(FEATURE_COUNT + 1)?;
                let created_at: i64 = row.get(FEATURE_COUNT + 2)?;
                Ok(StoredPrediction {
                    id,
                    fields,
                    disease_name,
                    created_at: Timestamp::from_unix_millis(created_at),
                })
            })
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|err| SqliteStoreError::Db(err.to_string()))?);
        }
        Ok(results)
    }

    /// Returns the number of stored predictions.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] if the query fails.
    pub fn count(&self) -> Result<u64, SqliteStoreError> {
        let guard = self.lock()?;
        let count: i64 = guard
            .query_row("SELECT COUNT(*) FROM predictions", params![], |row| row.get(0))
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        u64::try_from(count)
            .map_err(|_| SqliteStoreError::Invalid(format!("negative row count: {count}")))
    }

    /// Verifies the connection can serve queries.
    fn check_connection(&self) -> Result<(), SqliteStoreError> {
        let guard = self.lock()?;
        guard
            .query_row("SELECT 1", params![], |row| row.get::<_, i64>(0))
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        Ok(())
    }

    /// Locks the shared connection.
    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SqliteStoreError> {
        self.connection.lock().map_err(|_| SqliteStoreError::Io("sqlite mutex poisoned".to_string()))
    }
}

impl PredictionStore for SqlitePredictionStore {
    fn insert(&self, record: &PredictionRecord) -> Result<(), StoreError> {
        self.insert_record(record).map(|_| ()).map_err(StoreError::from)
    }

    fn readiness(&self) -> Result<(), StoreError> {
        self.check_connection().map_err(StoreError::from)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the raw-value column list in feature vector order.
fn field_columns() -> String {
    FeatureField::ALL.map(FeatureField::column_name).join(", ")
}

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    if path.as_os_str().is_empty() {
        return Err(SqliteStoreError::Invalid("store path must not be empty".to_string()));
    }
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            let columns: String = FeatureField::ALL
                .map(|field| format!("{} TEXT NOT NULL, ", field.column_name()))
                .concat();
            tx.execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS predictions (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    {columns}disease_name TEXT NOT NULL,
                    created_at INTEGER NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_predictions_created_at
                    ON predictions (created_at);"
            ))
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        }
        Some(SCHEMA_VERSION) => {}
        Some(other) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {other}"
            )));
        }
    }
    tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Validates the schema version of an existing store without modifying it.
fn check_schema_version(connection: &Connection) -> Result<(), SqliteStoreError> {
    let version: Option<i64> = connection
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match version {
        Some(SCHEMA_VERSION) => Ok(()),
        Some(other) => {
            Err(SqliteStoreError::VersionMismatch(format!("unsupported schema version: {other}")))
        }
        None => Err(SqliteStoreError::Invalid("store schema not initialized".to_string())),
    }
}
