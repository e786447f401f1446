// crates/lifestyle-risk-core/src/core/mod.rs
// ============================================================================
// Module: Lifestyle Risk Data Model
// Description: Fields, tables, parameters, records, and time values.
// Purpose: Group the fixed data model shared by the encoder and responder.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Fixed data model for the prediction pipeline. Everything here is either
//! immutable process-wide data or a per-request value.

pub mod disease;
pub mod fields;
pub mod params;
pub mod record;
pub mod tables;
pub mod time;

pub use disease::ClassId;
pub use disease::DISEASE_NAMES;
pub use disease::DiseaseLabel;
pub use disease::FALLBACK_DISEASE_NAME;
pub use fields::FEATURE_COUNT;
pub use fields::FeatureField;
pub use fields::FieldKind;
pub use params::RequestParameters;
pub use params::raw_value_text;
pub use record::PredictionRecord;
pub use record::RawField;
pub use tables::CategoryTable;
pub use tables::category_table;
pub use time::Timestamp;
