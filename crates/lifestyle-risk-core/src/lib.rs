// crates/lifestyle-risk-core/src/lib.rs
// ============================================================================
// Module: Lifestyle Risk Core
// Description: Feature encoding and prediction-response pipeline.
// Purpose: Translate agent parameters into model input and model output into text.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! `lifestyle-risk-core` owns the only real logic of the webhook: validating
//! an untyped parameter bag, encoding it into the classifier's fixed-order
//! feature vector, and decoding the predicted class into the outward
//! message. The classifier, persistence store, and clock are consumed through
//! the traits in [`interfaces`]; transport lives in `lifestyle-risk-server`.

pub mod core;
pub mod interfaces;
pub mod runtime;

pub use crate::core::CategoryTable;
pub use crate::core::ClassId;
pub use crate::core::DiseaseLabel;
pub use crate::core::FEATURE_COUNT;
pub use crate::core::FeatureField;
pub use crate::core::FieldKind;
pub use crate::core::PredictionRecord;
pub use crate::core::RawField;
pub use crate::core::RequestParameters;
pub use crate::core::Timestamp;
pub use crate::interfaces::Classifier;
pub use crate::interfaces::Clock;
pub use crate::interfaces::FixedClock;
pub use crate::interfaces::ModelError;
pub use crate::interfaces::PredictionStore;
pub use crate::interfaces::StoreError;
pub use crate::runtime::EncodeError;
pub use crate::runtime::FeatureVector;
pub use crate::runtime::InMemoryPredictionStore;
pub use crate::runtime::MessageVariant;
pub use crate::runtime::OutwardMessage;
pub use crate::runtime::PipelineOutcome;
pub use crate::runtime::PipelineReport;
pub use crate::runtime::PredictionPipeline;
pub use crate::runtime::RequestState;
pub use crate::runtime::StoreOutcome;
