// crates/lifestyle-risk-core/src/interfaces/mod.rs
// ============================================================================
// Module: Lifestyle Risk Interfaces
// Description: Backend-agnostic interfaces for the classifier, store, and clock.
// Purpose: Define the collaborator contracts consumed by the prediction pipeline.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Interfaces describe how the pipeline integrates with the trained model,
//! the persistence backend, and the host clock without embedding backend
//! details. Implementations are shared across request tasks and must be
//! `Send + Sync`; they are invoked synchronously.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::ClassId;
use crate::core::PredictionRecord;
use crate::core::Timestamp;
use crate::runtime::FeatureVector;

// ============================================================================
// SECTION: Classifier
// ============================================================================

/// Classifier errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Model rejected the input vector.
    #[error("model input rejected: {0}")]
    Input(String),
    /// Model runtime reported an error.
    #[error("model runtime error: {0}")]
    Runtime(String),
}

/// Pre-trained classifier loaded once at startup.
pub trait Classifier: Send + Sync {
    /// Predicts a class id for a feature vector.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] when the model cannot evaluate the vector.
    fn predict(&self, features: &FeatureVector) -> Result<ClassId, ModelError>;
}

// ============================================================================
// SECTION: Prediction Store
// ============================================================================

/// Prediction store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("prediction store io error: {0}")]
    Io(String),
    /// Store data version is incompatible.
    #[error("prediction store version mismatch: {0}")]
    VersionMismatch(String),
    /// Store data is invalid.
    #[error("prediction store invalid data: {0}")]
    Invalid(String),
    /// Store reported an error.
    #[error("prediction store error: {0}")]
    Store(String),
}

/// Best-effort sink for completed predictions.
pub trait PredictionStore: Send + Sync {
    /// Inserts a prediction record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the record cannot be written.
    fn insert(&self, record: &PredictionRecord) -> Result<(), StoreError>;

    /// Reports store readiness for liveness and readiness checks.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store is unavailable.
    fn readiness(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

// ============================================================================
// SECTION: Clock
// ============================================================================

/// Host time source for record timestamps.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> Timestamp;
}

/// Clock that always returns the same timestamp.
///
/// # Invariants
/// - Every call returns the configured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}
