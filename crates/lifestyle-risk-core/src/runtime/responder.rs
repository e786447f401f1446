// crates/lifestyle-risk-core/src/runtime/responder.rs
// ============================================================================
// Module: Responder
// Description: Disease decoding and outward message formatting.
// Purpose: Produce the single text field returned to the conversational agent.
// Dependencies: crate::core, serde
// ============================================================================

//! ## Overview
//! The responder decodes class ids through the disease table and renders the
//! outward message. Two success wordings exist (`informational` and
//! `terse`); the wording is selected by caller configuration, never by the
//! request. Every encoding failure renders the same error template carrying
//! only the field name.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::ClassId;
use crate::core::DiseaseLabel;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefix of the field error template.
pub const FIELD_ERROR_PREFIX: &str = "Error: Missing or invalid data for field: ";

/// Prefix of the terse success message.
pub const TERSE_PREFIX: &str = "The predicted disease is: ";

/// Message returned when the classifier itself fails.
pub const MODEL_UNAVAILABLE_MESSAGE: &str =
    "Sorry, I couldn't generate a prediction right now. Please try again later.";

// ============================================================================
// SECTION: Message Variant
// ============================================================================

/// Success message wording.
///
/// # Invariants
/// - Selected by configuration; never derived from request input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageVariant {
    /// Empathetic multi-sentence guidance naming the disease.
    #[default]
    Informational,
    /// Short factual statement naming the disease.
    Terse,
}

impl MessageVariant {
    /// Returns a stable label for the variant.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Informational => "informational",
            Self::Terse => "terse",
        }
    }
}

// ============================================================================
// SECTION: Outward Message
// ============================================================================

/// Response body returned to the conversational agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutwardMessage {
    /// Message text.
    #[serde(rename = "fulfillmentText")]
    pub fulfillment_text: String,
}

impl OutwardMessage {
    /// Wraps message text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            fulfillment_text: text.into(),
        }
    }

    /// Returns the message text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.fulfillment_text
    }
}

// ============================================================================
// SECTION: Responder Operations
// ============================================================================

/// Decodes a class id into a disease label. Total over all class ids.
#[must_use]
pub fn decode(class_id: ClassId) -> DiseaseLabel {
    DiseaseLabel::decode(class_id)
}

/// Formats a success message for `label` using `variant` wording.
#[must_use]
pub fn format_success(label: DiseaseLabel, variant: MessageVariant) -> OutwardMessage {
    let name = label.name();
    let text = match variant {
        MessageVariant::Informational => format!(
            "Your lifestyle insights suggest a possible risk for {name}, but the good news is \
             that small, simple changes can make a big difference!  If you’d like tips on \
             healthy eating or lifestyle improvements, I’m here to support you. And for a \
             thorough checkup, a visit to your doctor might be helpful."
        ),
        MessageVariant::Terse => format!("{TERSE_PREFIX}{name}"),
    };
    OutwardMessage::new(text)
}

/// Formats the field error template.
#[must_use]
pub fn format_error(field_name: &str) -> OutwardMessage {
    OutwardMessage::new(format!("{FIELD_ERROR_PREFIX}{field_name}"))
}

/// Formats the message returned when the classifier fails.
#[must_use]
pub fn format_model_unavailable() -> OutwardMessage {
    OutwardMessage::new(MODEL_UNAVAILABLE_MESSAGE)
}
