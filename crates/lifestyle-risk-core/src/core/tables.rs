// crates/lifestyle-risk-core/src/core/tables.rs
// ============================================================================
// Module: Category Tables
// Description: Fixed label-to-code tables for categorical request fields.
// Purpose: Provide the read-only lookups the encoder resolves labels through.
// Dependencies: crate::core::fields
// ============================================================================

//! ## Overview
//! Category tables are compiled into the binary as static slices. They are
//! never mutated and carry no lifecycle beyond process start. Lookups are
//! exact and case-sensitive; callers must treat a miss as an encoding failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::fields::FeatureField;

// ============================================================================
// SECTION: Category Table
// ============================================================================

/// Fixed label-to-code mapping for one categorical field.
///
/// # Invariants
/// - Labels are unique within a table.
/// - Codes are small non-negative integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTable {
    /// Field this table encodes.
    field: FeatureField,
    /// Label/code pairs.
    entries: &'static [(&'static str, i64)],
}

impl CategoryTable {
    /// Returns the field this table encodes.
    #[must_use]
    pub const fn field(&self) -> FeatureField {
        self.field
    }

    /// Returns the label/code pairs in declaration order.
    #[must_use]
    pub const fn entries(&self) -> &'static [(&'static str, i64)] {
        self.entries
    }

    /// Returns the code for `label`, or `None` when the label is unknown.
    #[must_use]
    pub fn code(&self, label: &str) -> Option<i64> {
        self.entries.iter().find(|(candidate, _)| *candidate == label).map(|(_, code)| *code)
    }
}

/// Gender labels.
pub static GENDER_TABLE: CategoryTable = CategoryTable {
    field: FeatureField::Gender,
    entries: &[("Male", 1), ("Female", 0)],
};

/// BMI category labels.
pub static BMI_CATEGORY_TABLE: CategoryTable = CategoryTable {
    field: FeatureField::BmiCategory,
    entries: &[("Normal Weight", 0), ("Overweight", 2), ("Obese", 1)],
};

/// Sleep disorder labels.
pub static SLEEP_DISORDER_TABLE: CategoryTable = CategoryTable {
    field: FeatureField::SleepDisorder,
    entries: &[("No Disorder", 1), ("Insomnia", 0), ("Sleep Apnea", 2)],
};

/// Food habit labels.
pub static FOOD_HABITS_TABLE: CategoryTable = CategoryTable {
    field: FeatureField::FoodHabits,
    entries: &[("Healthy", 0), ("Moderate", 1), ("Unhealthy", 2)],
};

/// Smoking status labels.
pub static SMOKING_STATUS_TABLE: CategoryTable = CategoryTable {
    field: FeatureField::SmokingStatus,
    entries: &[("Non-smoker", 0), ("Smoker", 1)],
};

/// Returns the category table for a categorical field, or `None` for numeric fields.
#[must_use]
pub const fn category_table(field: FeatureField) -> Option<&'static CategoryTable> {
    match field {
        FeatureField::Gender => Some(&GENDER_TABLE),
        FeatureField::BmiCategory => Some(&BMI_CATEGORY_TABLE),
        FeatureField::SleepDisorder => Some(&SLEEP_DISORDER_TABLE),
        FeatureField::FoodHabits => Some(&FOOD_HABITS_TABLE),
        FeatureField::SmokingStatus => Some(&SMOKING_STATUS_TABLE),
        FeatureField::Age
        | FeatureField::SleepDuration
        | FeatureField::PhysicalActivityLevel
        | FeatureField::StressLevel
        | FeatureField::DailySteps => None,
    }
}
