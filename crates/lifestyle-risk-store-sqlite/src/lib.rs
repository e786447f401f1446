// crates/lifestyle-risk-store-sqlite/src/lib.rs
// ============================================================================
// Module: Lifestyle Risk SQLite Store
// Description: SQLite-backed prediction persistence.
// Purpose: Provide the durable PredictionStore used by the webhook service.
// Dependencies: lifestyle-risk-core, rusqlite, serde, thiserror
// ============================================================================

//! ## Overview
//! Re-exports the `SQLite` prediction store and its configuration types.

pub mod store;

pub use store::MAX_LIST_LIMIT;
pub use store::SqlitePredictionStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
pub use store::StoredField;
pub use store::StoredPrediction;
