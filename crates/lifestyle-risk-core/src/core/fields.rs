// crates/lifestyle-risk-core/src/core/fields.rs
// ============================================================================
// Module: Feature Fields
// Description: Canonical request fields and their position in the feature vector.
// Purpose: Pin wire names, vector order, and field kinds in one place.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Every webhook request carries exactly ten named parameters. This module
//! fixes their wire names (case-sensitive), their order in the model's
//! feature vector, and whether each one is resolved through a category table
//! or coerced as an integer.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Number of features consumed by the classifier.
pub const FEATURE_COUNT: usize = 10;

// ============================================================================
// SECTION: Field Kinds
// ============================================================================

/// How a raw field value is turned into a feature.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Resolved through a fixed label table.
    Categorical,
    /// Coerced to an integer.
    Numeric,
}

// ============================================================================
// SECTION: Feature Fields
// ============================================================================

/// Required request field.
///
/// # Invariants
/// - Declaration order matches feature vector order.
/// - Wire names are exact and case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeatureField {
    /// Reported gender.
    #[serde(rename = "Gender")]
    Gender,
    /// Age in years.
    #[serde(rename = "Age")]
    Age,
    /// Nightly sleep duration in hours.
    #[serde(rename = "SleepDuration")]
    SleepDuration,
    /// Physical activity level (minutes per day).
    #[serde(rename = "PhysicalActivityLevel")]
    PhysicalActivityLevel,
    /// Self-reported stress level.
    #[serde(rename = "StressLevel")]
    StressLevel,
    /// BMI category label.
    #[serde(rename = "BMICategory")]
    BmiCategory,
    /// Daily step count.
    #[serde(rename = "DailySteps")]
    DailySteps,
    /// Sleep disorder label.
    #[serde(rename = "Sleep_Disorder")]
    SleepDisorder,
    /// Food habits label.
    #[serde(rename = "Food_Habits")]
    FoodHabits,
    /// Smoking status label.
    #[serde(rename = "Smoking_Status")]
    SmokingStatus,
}

impl FeatureField {
    /// All fields in feature vector order.
    pub const ALL: [Self; FEATURE_COUNT] = [
        Self::Gender,
        Self::Age,
        Self::SleepDuration,
        Self::PhysicalActivityLevel,
        Self::StressLevel,
        Self::BmiCategory,
        Self::DailySteps,
        Self::SleepDisorder,
        Self::FoodHabits,
        Self::SmokingStatus,
    ];

    /// Returns the exact parameter key used on the wire.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Gender => "Gender",
            Self::Age => "Age",
            Self::SleepDuration => "SleepDuration",
            Self::PhysicalActivityLevel => "PhysicalActivityLevel",
            Self::StressLevel => "StressLevel",
            Self::BmiCategory => "BMICategory",
            Self::DailySteps => "DailySteps",
            Self::SleepDisorder => "Sleep_Disorder",
            Self::FoodHabits => "Food_Habits",
            Self::SmokingStatus => "Smoking_Status",
        }
    }

    /// Returns the snake-case column name used by persistence backends.
    #[must_use]
    pub const fn column_name(self) -> &'static str {
        match self {
            Self::Gender => "gender",
            Self::Age => "age",
            Self::SleepDuration => "sleep_duration",
            Self::PhysicalActivityLevel => "physical_activity_level",
            Self::StressLevel => "stress_level",
            Self::BmiCategory => "bmi_category",
            Self::DailySteps => "daily_steps",
            Self::SleepDisorder => "sleep_disorder",
            Self::FoodHabits => "food_habits",
            Self::SmokingStatus => "smoking_status",
        }
    }

    /// Returns the zero-based position of the field in the feature vector.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns how the field's raw value is encoded.
    #[must_use]
    pub const fn kind(self) -> FieldKind {
        match self {
            Self::Gender
            | Self::BmiCategory
            | Self::SleepDisorder
            | Self::FoodHabits
            | Self::SmokingStatus => FieldKind::Categorical,
            Self::Age
            | Self::SleepDuration
            | Self::PhysicalActivityLevel
            | Self::StressLevel
            | Self::DailySteps => FieldKind::Numeric,
        }
    }
}

impl fmt::Display for FeatureField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}
