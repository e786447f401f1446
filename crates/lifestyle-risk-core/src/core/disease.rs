// crates/lifestyle-risk-core/src/core/disease.rs
// ============================================================================
// Module: Disease Table
// Description: Class identifiers and the fixed class-to-disease mapping.
// Purpose: Decode classifier output into user-facing disease labels.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The classifier emits an integer class id. The disease table maps the six
//! known ids to disease names; every other id decodes to a fixed fallback
//! label, so decoding is total over all integers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Disease names indexed by class id.
pub static DISEASE_NAMES: [&str; 6] = [
    "Cardiovascular Disease",
    "Hyper Tension",
    "Lung Cancer or Cancer",
    "Mental Health Issues",
    "Minimal or No Risks",
    "No Significant Risks Found",
];

/// Label used for class ids outside the disease table.
pub const FALLBACK_DISEASE_NAME: &str = "Unknown Disease";

// ============================================================================
// SECTION: Class Identifier
// ============================================================================

/// Class identifier produced by the classifier.
///
/// # Invariants
/// - Any integer is representable; unknown values decode to the fallback label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassId(i64);

impl ClassId {
    /// Creates a class identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw class value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: Disease Label
// ============================================================================

/// Decoded disease label.
///
/// # Invariants
/// - `name` is either an entry of [`DISEASE_NAMES`] or [`FALLBACK_DISEASE_NAME`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DiseaseLabel {
    /// Disease display name.
    name: &'static str,
}

impl DiseaseLabel {
    /// Fallback label for unknown class ids.
    pub const UNKNOWN: Self = Self {
        name: FALLBACK_DISEASE_NAME,
    };

    /// Decodes a class id through the disease table.
    #[must_use]
    pub fn decode(class_id: ClassId) -> Self {
        usize::try_from(class_id.get())
            .ok()
            .and_then(|index| DISEASE_NAMES.get(index))
            .map_or(Self::UNKNOWN, |name| Self {
                name: *name,
            })
    }

    /// Returns the disease display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true when the label is the fallback for an unknown class id.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.name == FALLBACK_DISEASE_NAME
    }
}

impl fmt::Display for DiseaseLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
