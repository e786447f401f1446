// crates/lifestyle-risk-model/src/lib.rs
// ============================================================================
// Module: Lifestyle Risk Model
// Description: Pre-trained classifier runtime for lifestyle risk prediction.
// Purpose: Load exported forests and expose them as core classifiers.
// Dependencies: lifestyle-risk-core, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The model crate owns the only concrete [`lifestyle_risk_core::Classifier`]
//! shipped with the service: a random forest loaded once at startup from a
//! JSON artifact and shared read-only across request handlers.

pub mod forest;

pub use forest::ForestArtifact;
pub use forest::ForestModel;
pub use forest::MAX_MODEL_BYTES;
pub use forest::MAX_TREE_NODES;
pub use forest::MODEL_FORMAT_VERSION;
pub use forest::ModelLoadError;
pub use forest::TreeArtifact;
pub use forest::TreeNode;

#[cfg(test)]
mod tests;
