// crates/lifestyle-risk-core/src/runtime/pipeline.rs
// ============================================================================
// Module: Prediction Pipeline
// Description: Encode, predict, persist, and respond for one webhook request.
// Purpose: Wire the encoder and responder to the classifier and store contracts.
// Dependencies: crate::core, crate::interfaces, crate::runtime
// ============================================================================

//! ## Overview
//! One pipeline execution handles exactly one inbound request:
//! `Pending -> Encoded -> Predicted -> Responded` on success, or
//! `Pending -> Failed -> Responded` when encoding fails. The classifier is
//! invoked at most once and never sees a partially encoded vector. When a
//! store is attached, the decoded record is written before the response is
//! returned; store failures are reported but never change the message.
//!
//! The pipeline holds only immutable collaborators, so a single instance can
//! be shared across concurrent request tasks without locking.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::core::ClassId;
use crate::core::DiseaseLabel;
use crate::core::PredictionRecord;
use crate::core::RequestParameters;
use crate::interfaces::Classifier;
use crate::interfaces::Clock;
use crate::interfaces::PredictionStore;
use crate::runtime::encoder::EncodeError;
use crate::runtime::encoder::encode;
use crate::runtime::encoder::extract_parameters;
use crate::runtime::responder::MessageVariant;
use crate::runtime::responder::OutwardMessage;
use crate::runtime::responder::decode;
use crate::runtime::responder::format_error;
use crate::runtime::responder::format_model_unavailable;
use crate::runtime::responder::format_success;

// ============================================================================
// SECTION: Request States
// ============================================================================

/// Lifecycle state of a single request.
///
/// # Invariants
/// - `Responded` is the only terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    /// Payload received.
    Pending,
    /// Feature vector built.
    Encoded,
    /// Class id obtained.
    Predicted,
    /// Encoding or prediction failed.
    Failed,
    /// Message emitted.
    Responded,
}

// ============================================================================
// SECTION: Report
// ============================================================================

/// Result classification of a pipeline execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PipelineOutcome {
    /// Prediction succeeded.
    Predicted {
        /// Raw class id returned by the classifier.
        class_id: ClassId,
        /// Decoded disease label.
        disease: DiseaseLabel,
    },
    /// Encoding failed before the classifier was invoked.
    FieldError {
        /// Name of the offending field.
        field: String,
        /// Stable error kind label.
        error_kind: &'static str,
    },
    /// The classifier reported an error.
    ModelError {
        /// Classifier error message.
        message: String,
    },
}

impl PipelineOutcome {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Predicted {
                ..
            } => "predicted",
            Self::FieldError {
                ..
            } => "field_error",
            Self::ModelError {
                ..
            } => "model_error",
        }
    }
}

/// Persistence result for a pipeline execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreOutcome {
    /// No store attached, or nothing to record.
    Skipped,
    /// Record written.
    Recorded,
    /// Store rejected the record.
    Failed {
        /// Store error message.
        message: String,
    },
}

impl StoreOutcome {
    /// Returns a stable label for the store outcome.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Skipped => "skipped",
            Self::Recorded => "recorded",
            Self::Failed {
                ..
            } => "failed",
        }
    }
}

/// Full account of one pipeline execution.
///
/// # Invariants
/// - `path` starts with [`RequestState::Pending`] and ends with [`RequestState::Responded`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    /// Message returned to the caller.
    pub message: OutwardMessage,
    /// Outcome classification.
    pub outcome: PipelineOutcome,
    /// Persistence result.
    pub store: StoreOutcome,
    /// States visited in order.
    pub path: Vec<RequestState>,
}

// ============================================================================
// SECTION: Pipeline
// ============================================================================

/// Request pipeline wired to its external collaborators.
#[derive(Clone)]
pub struct PredictionPipeline {
    /// Shared classifier.
    classifier: Arc<dyn Classifier>,
    /// Optional persistence backend.
    store: Option<Arc<dyn PredictionStore>>,
    /// Host clock for record timestamps.
    clock: Arc<dyn Clock>,
    /// Success message wording.
    variant: MessageVariant,
}

impl PredictionPipeline {
    /// Creates a pipeline without persistence.
    #[must_use]
    pub fn new(classifier: Arc<dyn Classifier>, clock: Arc<dyn Clock>) -> Self {
        Self {
            classifier,
            store: None,
            clock,
            variant: MessageVariant::default(),
        }
    }

    /// Attaches a persistence backend.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn PredictionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Selects the success message wording.
    #[must_use]
    pub const fn with_variant(mut self, variant: MessageVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Returns the configured message wording.
    #[must_use]
    pub const fn variant(&self) -> MessageVariant {
        self.variant
    }

    /// Returns the attached store, if any.
    #[must_use]
    pub fn store(&self) -> Option<&Arc<dyn PredictionStore>> {
        self.store.as_ref()
    }

    /// Handles a full webhook payload (`queryResult.parameters`).
    #[must_use]
    pub fn respond_payload(&self, payload: &Value) -> PipelineReport {
        match extract_parameters(payload) {
            Ok(params) => self.respond(&params),
            Err(error) => field_failure(&error),
        }
    }

    /// Handles an already extracted parameter bag.
    #[must_use]
    pub fn respond(&self, params: &RequestParameters) -> PipelineReport {
        let features = match encode(params) {
            Ok(features) => features,
            Err(error) => return field_failure(&error),
        };
        let class_id = match self.classifier.predict(&features) {
            Ok(class_id) => class_id,
            Err(error) => {
                return PipelineReport {
                    message: format_model_unavailable(),
                    outcome: PipelineOutcome::ModelError {
                        message: error.to_string(),
                    },
                    store: StoreOutcome::Skipped,
                    path: vec![
                        RequestState::Pending,
                        RequestState::Encoded,
                        RequestState::Failed,
                        RequestState::Responded,
                    ],
                };
            }
        };
        let disease = decode(class_id);
        let store = self.record(params, disease);
        PipelineReport {
            message: format_success(disease, self.variant),
            outcome: PipelineOutcome::Predicted {
                class_id,
                disease,
            },
            store,
            path: vec![
                RequestState::Pending,
                RequestState::Encoded,
                RequestState::Predicted,
                RequestState::Responded,
            ],
        }
    }

    /// Writes the prediction record when a store is attached.
    fn record(&self, params: &RequestParameters, disease: DiseaseLabel) -> StoreOutcome {
        let Some(store) = &self.store else {
            return StoreOutcome::Skipped;
        };
        let record = PredictionRecord::from_parameters(params, disease, self.clock.now());
        match store.insert(&record) {
            Ok(()) => StoreOutcome::Recorded,
            Err(error) => StoreOutcome::Failed {
                message: error.to_string(),
            },
        }
    }
}

/// Builds the report for an encoding failure.
fn field_failure(error: &EncodeError) -> PipelineReport {
    PipelineReport {
        message: format_error(error.field_name()),
        outcome: PipelineOutcome::FieldError {
            field: error.field_name().to_string(),
            error_kind: error.kind_label(),
        },
        store: StoreOutcome::Skipped,
        path: vec![RequestState::Pending, RequestState::Failed, RequestState::Responded],
    }
}
