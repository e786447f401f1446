// crates/lifestyle-risk-core/src/runtime/store.rs
// ============================================================================
// Module: In-Memory Prediction Store
// Description: Simple in-memory PredictionStore for tests and local runs.
// Purpose: Provide a deterministic store implementation without external deps.
// Dependencies: crate::interfaces, crate::core
// ============================================================================

//! ## Overview
//! Keeps prediction records in a mutex-guarded vector. Intended for tests and
//! local runs; production deployments use the `SQLite` backend.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Mutex;

use crate::core::PredictionRecord;
use crate::interfaces::PredictionStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Store
// ============================================================================

/// In-memory prediction store.
///
/// # Invariants
/// - Records are kept in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryPredictionStore {
    /// Recorded predictions.
    records: Mutex<Vec<PredictionRecord>>,
}

impl InMemoryPredictionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all records.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the store mutex is poisoned.
    pub fn records(&self) -> Result<Vec<PredictionRecord>, StoreError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| StoreError::Io("prediction store mutex poisoned".to_string()))?;
        Ok(guard.clone())
    }
}

impl PredictionStore for InMemoryPredictionStore {
    fn insert(&self, record: &PredictionRecord) -> Result<(), StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Io("prediction store mutex poisoned".to_string()))?
            .push(record.clone());
        Ok(())
    }
}
