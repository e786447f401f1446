// crates/lifestyle-risk-core/src/runtime/encoder.rs
// ============================================================================
// Module: Feature Encoder
// Description: Validation and encoding of raw request parameters.
// Purpose: Turn an untyped parameter bag into the classifier's feature vector.
// Dependencies: crate::core, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The encoder walks the ten required fields in vector order. Categorical
//! fields resolve through their category table with an exact, case-sensitive
//! match; numeric fields coerce to an integer. The first failure
//! short-circuits and no partial vector is ever returned. Encoding is a pure
//! function of the input and the static tables.
//!
//! Numeric coercion accepts JSON integers, JSON floats (truncated toward
//! zero), and strings holding an optionally signed base-10 integer with
//! surrounding whitespace. Booleans, null, arrays, and objects are rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::FEATURE_COUNT;
use crate::core::FeatureField;
use crate::core::FieldKind;
use crate::core::RequestParameters;
use crate::core::category_table;
use crate::core::raw_value_text;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Envelope key holding the agent's query result.
pub const QUERY_RESULT_KEY: &str = "queryResult";

/// Key holding the parameter object inside the query result.
pub const PARAMETERS_KEY: &str = "parameters";

/// Exclusive magnitude bound for floats converted to `i64` (2^63).
const I64_FLOAT_BOUND: f64 = 9_223_372_036_854_775_808.0;

// ============================================================================
// SECTION: Feature Vector
// ============================================================================

/// Ordered numeric input to the classifier.
///
/// # Invariants
/// - Exactly [`FEATURE_COUNT`] values in [`FeatureField::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FeatureVector([i64; FEATURE_COUNT]);

impl FeatureVector {
    /// Creates a feature vector from values already in vector order.
    #[must_use]
    pub const fn new(values: [i64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    /// Returns the values in vector order.
    #[must_use]
    pub const fn values(&self) -> &[i64; FEATURE_COUNT] {
        &self.0
    }

    /// Returns the encoded value for `field`.
    #[must_use]
    pub const fn get(&self, field: FeatureField) -> i64 {
        self.0[field.index()]
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Encoding failures.
///
/// # Invariants
/// - Variants are internal distinctions; at the webhook boundary they all
///   collapse into a single message naming [`EncodeError::field_name`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// A required key is absent.
    #[error("missing required field: {field}")]
    MissingField {
        /// Missing key (a required field or an envelope key).
        field: String,
    },
    /// A categorical value is not a label of its table.
    #[error("invalid category for field {field}: {value}")]
    InvalidCategory {
        /// Offending field.
        field: FeatureField,
        /// Raw value rendered as text.
        value: String,
    },
    /// A numeric value cannot be coerced to an integer.
    #[error("invalid numeric value for field {field}: {value}")]
    InvalidNumeric {
        /// Offending field.
        field: FeatureField,
        /// Raw value rendered as text.
        value: String,
    },
}

impl EncodeError {
    /// Returns the name of the field that failed.
    #[must_use]
    pub fn field_name(&self) -> &str {
        match self {
            Self::MissingField {
                field,
            } => field,
            Self::InvalidCategory {
                field, ..
            }
            | Self::InvalidNumeric {
                field, ..
            } => field.wire_name(),
        }
    }

    /// Returns a stable label for the error kind.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::MissingField {
                ..
            } => "missing_field",
            Self::InvalidCategory {
                ..
            } => "invalid_category",
            Self::InvalidNumeric {
                ..
            } => "invalid_numeric",
        }
    }

    /// Builds a missing-field error for a required field.
    fn missing(field: FeatureField) -> Self {
        Self::MissingField {
            field: field.wire_name().to_string(),
        }
    }
}

// ============================================================================
// SECTION: Envelope
// ============================================================================

/// Extracts `queryResult.parameters` from a webhook payload.
///
/// # Errors
///
/// Returns [`EncodeError::MissingField`] naming `queryResult` or `parameters`
/// when either level is absent or not a JSON object.
pub fn extract_parameters(payload: &Value) -> Result<RequestParameters, EncodeError> {
    let query_result = payload.get(QUERY_RESULT_KEY).and_then(Value::as_object).ok_or_else(|| {
        EncodeError::MissingField {
            field: QUERY_RESULT_KEY.to_string(),
        }
    })?;
    let parameters = query_result.get(PARAMETERS_KEY).and_then(Value::as_object).ok_or_else(|| {
        EncodeError::MissingField {
            field: PARAMETERS_KEY.to_string(),
        }
    })?;
    Ok(RequestParameters::from_map(parameters.clone()))
}

// ============================================================================
// SECTION: Encoding
// ============================================================================

/// Encodes request parameters into a feature vector.
///
/// # Errors
///
/// Returns the first [`EncodeError`] encountered in vector order.
pub fn encode(params: &RequestParameters) -> Result<FeatureVector, EncodeError> {
    let mut values = [0_i64; FEATURE_COUNT];
    for field in FeatureField::ALL {
        values[field.index()] = encode_field(params, field)?;
    }
    Ok(FeatureVector::new(values))
}

/// Encodes a single field.
fn encode_field(params: &RequestParameters, field: FeatureField) -> Result<i64, EncodeError> {
    let raw = params.field(field).ok_or_else(|| EncodeError::missing(field))?;
    match field.kind() {
        FieldKind::Categorical => encode_category(field, raw),
        FieldKind::Numeric => coerce_integer(raw).ok_or_else(|| EncodeError::InvalidNumeric {
            field,
            value: raw_value_text(raw),
        }),
    }
}

/// Resolves a categorical value through the field's table.
fn encode_category(field: FeatureField, raw: &Value) -> Result<i64, EncodeError> {
    let code = match (category_table(field), raw) {
        (Some(table), Value::String(label)) => table.code(label),
        _ => None,
    };
    code.ok_or_else(|| EncodeError::InvalidCategory {
        field,
        value: raw_value_text(raw),
    })
}

/// Coerces a raw JSON value into an integer.
fn coerce_integer(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(number) => number.as_i64().or_else(|| number.as_f64().and_then(truncate_float)),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Truncates a float toward zero when the result fits in `i64`.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Value is finite, already truncated, and range-checked against i64 bounds."
)]
fn truncate_float(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    let truncated = value.trunc();
    if truncated >= I64_FLOAT_BOUND || truncated < -I64_FLOAT_BOUND {
        return None;
    }
    Some(truncated as i64)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, reason = "Test-only assertions.")]

    use serde_json::json;

    use super::coerce_integer;
    use super::truncate_float;

    #[test]
    fn coerce_accepts_integer_forms() {
        assert_eq!(coerce_integer(&json!(34)), Some(34));
        assert_eq!(coerce_integer(&json!(-3)), Some(-3));
        assert_eq!(coerce_integer(&json!(34.0)), Some(34));
        assert_eq!(coerce_integer(&json!(7.9)), Some(7));
        assert_eq!(coerce_integer(&json!(-7.9)), Some(-7));
        assert_eq!(coerce_integer(&json!("8000")), Some(8000));
        assert_eq!(coerce_integer(&json!(" 45 ")), Some(45));
        assert_eq!(coerce_integer(&json!("+3")), Some(3));
    }

    #[test]
    fn coerce_rejects_non_integer_forms() {
        assert_eq!(coerce_integer(&json!("34.0")), None);
        assert_eq!(coerce_integer(&json!("thirty")), None);
        assert_eq!(coerce_integer(&json!("")), None);
        assert_eq!(coerce_integer(&json!(true)), None);
        assert_eq!(coerce_integer(&json!(null)), None);
        assert_eq!(coerce_integer(&json!([1])), None);
        assert_eq!(coerce_integer(&json!({"value": 1})), None);
        assert_eq!(coerce_integer(&json!(u64::MAX)), None);
    }

    #[test]
    fn truncate_rejects_out_of_range() {
        assert_eq!(truncate_float(f64::NAN), None);
        assert_eq!(truncate_float(f64::INFINITY), None);
        assert_eq!(truncate_float(1e19), None);
        assert_eq!(truncate_float(-1e19), None);
        assert_eq!(truncate_float(-0.5), Some(0));
    }
}
