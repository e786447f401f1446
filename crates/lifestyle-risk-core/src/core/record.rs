// crates/lifestyle-risk-core/src/core/record.rs
// ============================================================================
// Module: Prediction Records
// Description: Request/response pairs handed to persistence backends.
// Purpose: Capture the raw inputs and decoded outcome of a single prediction.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A prediction record is built only after a successful prediction. It
//! carries the ten raw values exactly as received, the decoded disease name,
//! and a host-supplied creation timestamp. Records are handed off and never
//! retained by the pipeline.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use serde_json::Value;

use crate::core::disease::DiseaseLabel;
use crate::core::fields::FeatureField;
use crate::core::params::RequestParameters;
use crate::core::params::raw_value_text;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Records
// ============================================================================

/// Raw value of one required field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawField {
    /// Field identifier.
    pub field: FeatureField,
    /// Value exactly as received.
    pub value: Value,
}

impl RawField {
    /// Returns the value rendered as text.
    #[must_use]
    pub fn text(&self) -> String {
        raw_value_text(&self.value)
    }
}

/// Persisted prediction outcome.
///
/// # Invariants
/// - `fields` holds one entry per required field, in feature vector order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionRecord {
    /// Raw request values in feature vector order.
    pub fields: Vec<RawField>,
    /// Decoded disease label.
    pub disease: DiseaseLabel,
    /// Creation timestamp.
    pub created_at: Timestamp,
}

impl PredictionRecord {
    /// Builds a record from validated parameters.
    ///
    /// Fields missing from `params` are recorded as JSON null; the pipeline
    /// only builds records after encoding succeeded, so that never happens there.
    #[must_use]
    pub fn from_parameters(
        params: &RequestParameters,
        disease: DiseaseLabel,
        created_at: Timestamp,
    ) -> Self {
        let fields = FeatureField::ALL
            .into_iter()
            .map(|field| RawField {
                field,
                value: params.field(field).cloned().unwrap_or(Value::Null),
            })
            .collect();
        Self {
            fields,
            disease,
            created_at,
        }
    }

    /// Returns the raw value recorded for `field`.
    #[must_use]
    pub fn value(&self, field: FeatureField) -> Option<&Value> {
        self.fields.iter().find(|raw| raw.field == field).map(|raw| &raw.value)
    }
}
