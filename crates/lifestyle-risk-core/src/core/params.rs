// crates/lifestyle-risk-core/src/core/params.rs
// ============================================================================
// Module: Request Parameters
// Description: Loosely typed parameter bag received from the conversational agent.
// Purpose: Hold untrusted raw values until the encoder validates them.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Request parameters arrive as an arbitrary JSON object. Values are kept
//! exactly as received; no normalization happens here. Security posture:
//! every value is untrusted input and must pass through the encoder before it
//! reaches the classifier.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::core::fields::FeatureField;

// ============================================================================
// SECTION: Request Parameters
// ============================================================================

/// Raw parameter bag keyed by wire name.
///
/// # Invariants
/// - Keys are kept verbatim (case-sensitive).
/// - Values are untyped JSON and unvalidated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestParameters(Map<String, Value>);

impl RequestParameters {
    /// Creates an empty parameter bag.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wraps an existing JSON object.
    #[must_use]
    pub const fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Inserts or replaces a raw value, returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Inserts or replaces a raw value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Removes a raw value by key.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Returns the raw value for a required field.
    #[must_use]
    pub fn field(&self, field: FeatureField) -> Option<&Value> {
        self.0.get(field.wire_name())
    }

    /// Returns the raw value for an arbitrary key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the number of parameters present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no parameters are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the underlying JSON object.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for RequestParameters {
    fn from(map: Map<String, Value>) -> Self {
        Self::from_map(map)
    }
}

// ============================================================================
// SECTION: Raw Value Rendering
// ============================================================================

/// Renders a raw value as text for logs, errors, and persistence.
///
/// Strings are returned verbatim; every other value uses its compact JSON form.
#[must_use]
pub fn raw_value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
