// crates/lifestyle-risk-core/tests/common/mod.rs
// ============================================================================
// Module: Core Test Fixtures
// Description: Shared payload and classifier fixtures for core tests.
// Purpose: Keep integration tests focused on behavior instead of setup.
// Dependencies: lifestyle-risk-core, serde_json
// ============================================================================

//! ## Overview
//! Reference parameters, scripted classifiers and a failing store shared
//! by the core integration tests.

#![allow(dead_code, reason = "Each test binary uses a different subset of fixtures.")]

use std::sync::Mutex;

use lifestyle_risk_core::ClassId;
use lifestyle_risk_core::Classifier;
use lifestyle_risk_core::FeatureVector;
use lifestyle_risk_core::ModelError;
use lifestyle_risk_core::PredictionRecord;
use lifestyle_risk_core::PredictionStore;
use lifestyle_risk_core::RequestParameters;
use lifestyle_risk_core::StoreError;
use serde_json::Value;
use serde_json::json;

/// Parameters from the reference scenario (encodes to `[1,34,7,45,3,0,8000,1,0,0]`).
pub fn valid_parameters() -> RequestParameters {
    RequestParameters::new()
        .with("Gender", "Male")
        .with("Age", 34)
        .with("SleepDuration", 7)
        .with("PhysicalActivityLevel", 45)
        .with("StressLevel", 3)
        .with("BMICategory", "Normal Weight")
        .with("DailySteps", 8000)
        .with("Sleep_Disorder", "No Disorder")
        .with("Food_Habits", "Healthy")
        .with("Smoking_Status", "Non-smoker")
}

/// Wraps parameters in the agent webhook envelope.
pub fn payload(params: &RequestParameters) -> Value {
    json!({
        "responseId": "resp-1",
        "queryResult": {
            "queryText": "check my risk",
            "parameters": params.as_map(),
        },
    })
}

/// Classifier that always returns the same class and counts calls.
#[derive(Default)]
pub struct FixedClassifier {
    pub class_id: i64,
    pub seen: Mutex<Vec<FeatureVector>>,
}

impl FixedClassifier {
    pub fn new(class_id: i64) -> Self {
        Self {
            class_id,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().expect("seen lock").len()
    }
}

impl Classifier for FixedClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<ClassId, ModelError> {
        self.seen.lock().expect("seen lock").push(*features);
        Ok(ClassId::new(self.class_id))
    }
}

/// Classifier that always fails.
pub struct FailingClassifier;

impl Classifier for FailingClassifier {
    fn predict(&self, _features: &FeatureVector) -> Result<ClassId, ModelError> {
        Err(ModelError::Runtime("model offline".to_string()))
    }
}

/// Store that always fails.
pub struct FailingStore;

impl PredictionStore for FailingStore {
    fn insert(&self, _record: &PredictionRecord) -> Result<(), StoreError> {
        Err(StoreError::Store("disk full".to_string()))
    }
}
