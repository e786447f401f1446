// crates/lifestyle-risk-core/tests/encoder.rs
// ============================================================================
// Module: Encoder Tests
// Description: Field validation, table lookups, and vector ordering.
// Purpose: Ensure malformed parameters fail closed and never reach the model.
// Dependencies: lifestyle-risk-core
// ============================================================================

//! ## Overview
//! Exercises the encoder against the reference scenario, every missing field,
//! every categorical table, numeric coercion, and the webhook envelope.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

// ============================================================================
// SECTION: Imports
// ============================================================================

use lifestyle_risk_core::EncodeError;
use lifestyle_risk_core::FeatureField;
use lifestyle_risk_core::FieldKind;
use lifestyle_risk_core::core::category_table;
use lifestyle_risk_core::runtime::encode;
use lifestyle_risk_core::runtime::extract_parameters;
use serde_json::json;

use crate::common::payload;
use crate::common::valid_parameters;

// ============================================================================
// SECTION: Valid Payloads
// ============================================================================

#[test]
fn encodes_reference_scenario_in_vector_order() {
    let vector = encode(&valid_parameters()).expect("encode");
    assert_eq!(vector.values(), &[1, 34, 7, 45, 3, 0, 8000, 1, 0, 0]);
}

#[test]
fn encoding_is_idempotent() {
    let params = valid_parameters();
    let first = encode(&params).expect("first encode");
    let second = encode(&params).expect("second encode");
    assert_eq!(first, second);
}

#[test]
fn encodes_every_category_label() {
    for field in FeatureField::ALL {
        let Some(table) = category_table(field) else {
            continue;
        };
        assert_eq!(table.field(), field);
        for (label, code) in table.entries() {
            let params = valid_parameters().with(field.wire_name(), *label);
            let vector = encode(&params).expect("encode label");
            assert_eq!(vector.get(field), *code, "{field} {label}");
        }
    }
}

#[test]
fn ignores_unrelated_parameters() {
    let params = valid_parameters().with("Age.original", "34").with("Extra", json!([1, 2]));
    let vector = encode(&params).expect("encode");
    assert_eq!(vector.values(), &[1, 34, 7, 45, 3, 0, 8000, 1, 0, 0]);
}

#[test]
fn coerces_agent_number_formats() {
    let params = valid_parameters()
        .with("Age", 34.0)
        .with("SleepDuration", "7")
        .with("DailySteps", " 8000 ");
    let vector = encode(&params).expect("encode");
    assert_eq!(vector.values(), &[1, 34, 7, 45, 3, 0, 8000, 1, 0, 0]);
}

#[test]
fn accepts_out_of_scale_numeric_values() {
    let params = valid_parameters().with("Age", -4).with("StressLevel", 99);
    let vector = encode(&params).expect("encode");
    assert_eq!(vector.get(FeatureField::Age), -4);
    assert_eq!(vector.get(FeatureField::StressLevel), 99);
}

// ============================================================================
// SECTION: Missing Fields
// ============================================================================

#[test]
fn each_missing_field_is_reported_by_name() {
    for field in FeatureField::ALL {
        let mut params = valid_parameters();
        params.remove(field.wire_name());
        let err = encode(&params).expect_err("missing field must fail");
        assert_eq!(
            err,
            EncodeError::MissingField {
                field: field.wire_name().to_string(),
            }
        );
        assert_eq!(err.field_name(), field.wire_name());
    }
}

#[test]
fn first_failure_in_vector_order_wins() {
    let mut params = valid_parameters().with("BMICategory", "Underweight");
    params.remove("Smoking_Status");
    params.remove("Age");
    let err = encode(&params).expect_err("must fail");
    assert_eq!(err.field_name(), "Age");
}

#[test]
fn field_names_are_case_sensitive() {
    let mut params = valid_parameters();
    let value = params.remove("BMICategory").expect("bmi present");
    params.insert("BmiCategory", value);
    let err = encode(&params).expect_err("wrong case must fail");
    assert_eq!(err.field_name(), "BMICategory");
}

// ============================================================================
// SECTION: Invalid Values
// ============================================================================

#[test]
fn unknown_category_is_rejected_for_every_table() {
    for field in FeatureField::ALL.into_iter().filter(|f| f.kind() == FieldKind::Categorical) {
        let params = valid_parameters().with(field.wire_name(), "Unlisted");
        let err = encode(&params).expect_err("unknown label must fail");
        assert_eq!(
            err,
            EncodeError::InvalidCategory {
                field,
                value: "Unlisted".to_string(),
            }
        );
    }
}

#[test]
fn category_lookup_does_not_normalize() {
    for label in ["male", "Male ", " Male", "MALE"] {
        let params = valid_parameters().with("Gender", label);
        let err = encode(&params).expect_err("non-exact label must fail");
        assert_eq!(err.field_name(), "Gender");
        assert_eq!(err.kind_label(), "invalid_category");
    }
}

#[test]
fn non_string_category_is_rejected() {
    let params = valid_parameters().with("Smoking_Status", 1);
    let err = encode(&params).expect_err("numeric label must fail");
    assert_eq!(
        err,
        EncodeError::InvalidCategory {
            field: FeatureField::SmokingStatus,
            value: "1".to_string(),
        }
    );
}

#[test]
fn invalid_numeric_is_rejected() {
    for raw in [json!("seven"), json!("7.5"), json!(true), json!(null), json!({"amount": 7})] {
        let params = valid_parameters().with("SleepDuration", raw.clone());
        let err = encode(&params).expect_err("invalid numeric must fail");
        assert_eq!(err.field_name(), "SleepDuration", "{raw}");
        assert_eq!(err.kind_label(), "invalid_numeric", "{raw}");
    }
}

// ============================================================================
// SECTION: Envelope
// ============================================================================

#[test]
fn extracts_parameters_from_envelope() {
    let params = extract_parameters(&payload(&valid_parameters())).expect("extract");
    assert_eq!(params, valid_parameters());
}

#[test]
fn missing_query_result_is_reported() {
    let err = extract_parameters(&json!({"parameters": {}})).expect_err("must fail");
    assert_eq!(err.field_name(), "queryResult");
    let err = extract_parameters(&json!("not an object")).expect_err("must fail");
    assert_eq!(err.field_name(), "queryResult");
}

#[test]
fn missing_parameters_is_reported() {
    let err = extract_parameters(&json!({"queryResult": {"queryText": "hi"}})).expect_err("fail");
    assert_eq!(err.field_name(), "parameters");
    let err = extract_parameters(&json!({"queryResult": {"parameters": []}})).expect_err("fail");
    assert_eq!(err.field_name(), "parameters");
}
