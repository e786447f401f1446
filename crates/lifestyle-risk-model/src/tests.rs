// crates/lifestyle-risk-model/src/tests.rs
// ============================================================================
// Module: Forest Unit Tests
// Description: Structural validation of in-memory forest artifacts.
// ============================================================================

//! Unit tests for forest structure validation and voting.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    reason = "Test-only panic-based assertions are permitted."
)]

use lifestyle_risk_core::ClassId;
use lifestyle_risk_core::Classifier;
use lifestyle_risk_core::FeatureVector;

use crate::ForestArtifact;
use crate::ForestModel;
use crate::ModelLoadError;
use crate::TreeArtifact;
use crate::TreeNode;

fn leaf(distribution: &[f64]) -> TreeNode {
    TreeNode::Leaf {
        distribution: distribution.to_vec(),
    }
}

fn stump(feature: usize, threshold: f64, left: &[f64], right: &[f64]) -> TreeArtifact {
    TreeArtifact {
        nodes: vec![
            TreeNode::Split {
                feature,
                threshold,
                left: 1,
                right: 2,
            },
            leaf(left),
            leaf(right),
        ],
    }
}

fn artifact(trees: Vec<TreeArtifact>) -> ForestArtifact {
    ForestArtifact {
        format_version: 1,
        feature_count: 10,
        classes: vec![0, 1, 2],
        trees,
    }
}

fn invalid_reason(artifact: ForestArtifact) -> String {
    let Err(ModelLoadError::Invalid(reason)) = ForestModel::from_artifact(artifact) else {
        panic!("expected invalid artifact");
    };
    reason
}

#[test]
fn split_routes_equal_values_left() {
    let model = ForestModel::from_artifact(artifact(vec![stump(
        1,
        34.0,
        &[1.0, 0.0, 0.0],
        &[0.0, 0.0, 1.0],
    )]))
    .expect("valid forest");
    let at_threshold = FeatureVector::new([0, 34, 0, 0, 0, 0, 0, 0, 0, 0]);
    let above = FeatureVector::new([0, 35, 0, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(model.predict(&at_threshold).expect("predict"), ClassId::new(0));
    assert_eq!(model.predict(&above).expect("predict"), ClassId::new(2));
}

#[test]
fn votes_are_normalized_before_averaging() {
    let model = ForestModel::from_artifact(artifact(vec![
        TreeArtifact {
            nodes: vec![leaf(&[90.0, 10.0, 0.0])],
        },
        TreeArtifact {
            nodes: vec![leaf(&[0.0, 1.0, 0.0])],
        },
    ]))
    .expect("valid forest");
    let probabilities =
        model.class_probabilities(&FeatureVector::new([0; 10])).expect("probabilities");
    assert!((probabilities[0] - 0.45).abs() < 1e-9);
    assert!((probabilities[1] - 0.55).abs() < 1e-9);
    assert_eq!(probabilities[2], 0.0);
    assert_eq!(model.predict(&FeatureVector::new([0; 10])).expect("predict"), ClassId::new(1));
}

#[test]
fn ties_resolve_to_first_class() {
    let model = ForestModel::from_artifact(artifact(vec![TreeArtifact {
        nodes: vec![leaf(&[0.0, 2.0, 2.0])],
    }]))
    .expect("valid forest");
    assert_eq!(model.predict(&FeatureVector::new([0; 10])).expect("predict"), ClassId::new(1));
}

#[test]
fn rejects_wrong_version_and_feature_count() {
    let mut bad_version = artifact(vec![stump(0, 0.5, &[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0])]);
    bad_version.format_version = 2;
    assert!(invalid_reason(bad_version).contains("format_version"));

    let mut bad_features = artifact(vec![stump(0, 0.5, &[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0])]);
    bad_features.feature_count = 9;
    assert!(invalid_reason(bad_features).contains("feature_count"));
}

#[test]
fn rejects_empty_forest_and_empty_tree() {
    assert!(invalid_reason(artifact(Vec::new())).contains("at least one tree"));
    let empty_tree = artifact(vec![TreeArtifact {
        nodes: Vec::new(),
    }]);
    assert!(invalid_reason(empty_tree).contains("at least one node"));
}

#[test]
fn rejects_backward_and_dangling_children() {
    let backward = artifact(vec![TreeArtifact {
        nodes: vec![
            leaf(&[1.0, 0.0, 0.0]),
            TreeNode::Split {
                feature: 0,
                threshold: 0.0,
                left: 0,
                right: 2,
            },
            leaf(&[1.0, 0.0, 0.0]),
        ],
    }]);
    assert!(invalid_reason(backward).contains("child 0 out of range"));

    let dangling = artifact(vec![TreeArtifact {
        nodes: vec![
            TreeNode::Split {
                feature: 0,
                threshold: 0.0,
                left: 1,
                right: 7,
            },
            leaf(&[1.0, 0.0, 0.0]),
        ],
    }]);
    assert!(invalid_reason(dangling).contains("child 7 out of range"));
}

#[test]
fn rejects_bad_split_parameters() {
    let feature = artifact(vec![stump(10, 0.5, &[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0])]);
    assert!(invalid_reason(feature).contains("feature 10 out of range"));
    let threshold = artifact(vec![stump(0, f64::NAN, &[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0])]);
    assert!(invalid_reason(threshold).contains("threshold must be finite"));
}

#[test]
fn rejects_bad_leaf_distributions() {
    let short = artifact(vec![stump(0, 0.5, &[1.0, 0.0], &[0.0, 1.0, 0.0])]);
    assert!(invalid_reason(short).contains("expected 3"));
    let negative = artifact(vec![stump(0, 0.5, &[1.0, -1.0, 0.0], &[0.0, 1.0, 0.0])]);
    assert!(invalid_reason(negative).contains("non-negative"));
    let zero = artifact(vec![stump(0, 0.5, &[0.0, 0.0, 0.0], &[0.0, 1.0, 0.0])]);
    assert!(invalid_reason(zero).contains("positive sum"));
}

#[test]
fn rejects_empty_class_list() {
    let mut empty = artifact(vec![TreeArtifact {
        nodes: vec![leaf(&[])],
    }]);
    empty.classes.clear();
    assert!(invalid_reason(empty).contains("classes must not be empty"));
}
