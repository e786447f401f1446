// crates/lifestyle-risk-model/src/forest.rs
// ============================================================================
// Module: Random Forest Runtime
// Description: Loader and evaluator for exported random-forest classifiers.
// Purpose: Serve the pre-trained model behind the core Classifier contract.
// Dependencies: lifestyle-risk-core, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A forest is a list of binary decision trees exported as JSON. Split nodes
//! send a vector to `left` when `vector[feature] <= threshold` and to `right`
//! otherwise; leaves carry per-class weights. Each tree's leaf weights are
//! normalized and averaged across the forest, and the predicted class is the
//! first class with the highest averaged probability.
//!
//! Artifacts are validated completely at load time and fail closed: child
//! indices must point strictly forward, so evaluation always terminates.
//! Security posture: model files are untrusted input and are size-limited.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::path::Path;

use lifestyle_risk_core::ClassId;
use lifestyle_risk_core::Classifier;
use lifestyle_risk_core::FEATURE_COUNT;
use lifestyle_risk_core::FeatureVector;
use lifestyle_risk_core::ModelError;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Supported artifact format version.
pub const MODEL_FORMAT_VERSION: u32 = 1;

/// Maximum model artifact size accepted by the loader.
pub const MAX_MODEL_BYTES: usize = 16 * 1024 * 1024;

/// Maximum number of nodes accepted in a single tree.
pub const MAX_TREE_NODES: usize = 1 << 20;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Model loading errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    /// Artifact could not be read.
    #[error("model io error: {0}")]
    Io(String),
    /// Artifact exceeds the size limit.
    #[error("model artifact too large: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual artifact size in bytes.
        actual_bytes: usize,
    },
    /// Artifact is not valid JSON for the forest format.
    #[error("model parse error: {0}")]
    Parse(String),
    /// Artifact parsed but violates a structural invariant.
    #[error("model invalid: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Artifact Format
// ============================================================================

/// Serialized forest artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForestArtifact {
    /// Artifact format version.
    pub format_version: u32,
    /// Number of features the forest was trained on.
    pub feature_count: usize,
    /// Class ids in distribution order.
    pub classes: Vec<i64>,
    /// Decision trees.
    pub trees: Vec<TreeArtifact>,
}

/// Serialized decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TreeArtifact {
    /// Nodes; index 0 is the root.
    pub nodes: Vec<TreeNode>,
}

/// Decision tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum TreeNode {
    /// Internal split.
    Split {
        /// Feature index compared at this node.
        feature: usize,
        /// Values `<= threshold` go left.
        threshold: f64,
        /// Left child index.
        left: usize,
        /// Right child index.
        right: usize,
    },
    /// Terminal node.
    Leaf {
        /// Per-class weights, aligned with the forest's class list.
        distribution: Vec<f64>,
    },
}

// ============================================================================
// SECTION: Forest Model
// ============================================================================

/// Validated random-forest classifier.
///
/// # Invariants
/// - At least one class and one tree.
/// - Every tree is non-empty and acyclic (children point strictly forward).
/// - Every leaf has one finite, non-negative weight per class with a positive sum.
#[derive(Debug, Clone, PartialEq)]
pub struct ForestModel {
    /// Class ids in distribution order.
    classes: Vec<ClassId>,
    /// Validated trees.
    trees: Vec<TreeArtifact>,
}

impl ForestModel {
    /// Loads and validates a forest artifact from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ModelLoadError`] when the file cannot be read, exceeds
    /// [`MAX_MODEL_BYTES`], or fails validation.
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        let bytes = read_with_limit(path, MAX_MODEL_BYTES)?;
        Self::from_json_slice(&bytes)
    }

    /// Parses and validates a forest artifact from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ModelLoadError`] when parsing or validation fails.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ModelLoadError> {
        if bytes.len() > MAX_MODEL_BYTES {
            return Err(ModelLoadError::TooLarge {
                max_bytes: MAX_MODEL_BYTES,
                actual_bytes: bytes.len(),
            });
        }
        let artifact: ForestArtifact =
            serde_json::from_slice(bytes).map_err(|err| ModelLoadError::Parse(err.to_string()))?;
        Self::from_artifact(artifact)
    }

    /// Validates an in-memory artifact.
    ///
    /// # Errors
    ///
    /// Returns [`ModelLoadError::Invalid`] when the artifact violates an invariant.
    pub fn from_artifact(artifact: ForestArtifact) -> Result<Self, ModelLoadError> {
        if artifact.format_version != MODEL_FORMAT_VERSION {
            return Err(ModelLoadError::Invalid(format!(
                "unsupported format_version: {} (expected {MODEL_FORMAT_VERSION})",
                artifact.format_version
            )));
        }
        if artifact.feature_count != FEATURE_COUNT {
            return Err(ModelLoadError::Invalid(format!(
                "feature_count must be {FEATURE_COUNT}, got {}",
                artifact.feature_count
            )));
        }
        if artifact.classes.is_empty() {
            return Err(ModelLoadError::Invalid("classes must not be empty".to_string()));
        }
        if artifact.trees.is_empty() {
            return Err(ModelLoadError::Invalid("forest must contain at least one tree".to_string()));
        }
        for (tree_index, tree) in artifact.trees.iter().enumerate() {
            validate_tree(tree, artifact.classes.len())
                .map_err(|reason| ModelLoadError::Invalid(format!("tree {tree_index}: {reason}")))?;
        }
        Ok(Self {
            classes: artifact.classes.into_iter().map(ClassId::new).collect(),
            trees: artifact.trees,
        })
    }

    /// Returns the class ids in distribution order.
    #[must_use]
    pub fn classes(&self) -> &[ClassId] {
        &self.classes
    }

    /// Returns the number of trees in the forest.
    #[must_use]
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Returns averaged class probabilities for a feature vector.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Runtime`] if a tree walk leaves the node list.
    pub fn class_probabilities(&self, features: &FeatureVector) -> Result<Vec<f64>, ModelError> {
        let mut totals = vec![0.0_f64; self.classes.len()];
        for tree in &self.trees {
            let distribution = evaluate_tree(tree, features)?;
            let sum: f64 = distribution.iter().sum();
            for (total, weight) in totals.iter_mut().zip(distribution) {
                *total += weight / sum;
            }
        }
        let tree_count = tree_count_as_f64(self.trees.len());
        for total in &mut totals {
            *total /= tree_count;
        }
        Ok(totals)
    }
}

impl Classifier for ForestModel {
    fn predict(&self, features: &FeatureVector) -> Result<ClassId, ModelError> {
        let probabilities = self.class_probabilities(features)?;
        let mut best: Option<(usize, f64)> = None;
        for (index, probability) in probabilities.into_iter().enumerate() {
            match best {
                Some((_, current)) if probability <= current => {}
                _ => best = Some((index, probability)),
            }
        }
        best.and_then(|(index, _)| self.classes.get(index).copied())
            .ok_or_else(|| ModelError::Runtime("forest produced no class scores".to_string()))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates the structure of a single tree.
fn validate_tree(tree: &TreeArtifact, class_count: usize) -> Result<(), String> {
    if tree.nodes.is_empty() {
        return Err("tree must contain at least one node".to_string());
    }
    if tree.nodes.len() > MAX_TREE_NODES {
        return Err(format!("tree exceeds {MAX_TREE_NODES} nodes"));
    }
    for (index, node) in tree.nodes.iter().enumerate() {
        match node {
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if *feature >= FEATURE_COUNT {
                    return Err(format!("node {index}: feature {feature} out of range"));
                }
                if !threshold.is_finite() {
                    return Err(format!("node {index}: threshold must be finite"));
                }
                for child in [*left, *right] {
                    if child <= index || child >= tree.nodes.len() {
                        return Err(format!("node {index}: child {child} out of range"));
                    }
                }
            }
            TreeNode::Leaf {
                distribution,
            } => {
                if distribution.len() != class_count {
                    return Err(format!(
                        "node {index}: distribution has {} weights, expected {class_count}",
                        distribution.len()
                    ));
                }
                if distribution.iter().any(|weight| !weight.is_finite() || *weight < 0.0) {
                    return Err(format!("node {index}: weights must be finite and non-negative"));
                }
                if distribution.iter().sum::<f64>() <= 0.0 {
                    return Err(format!("node {index}: weights must have a positive sum"));
                }
            }
        }
    }
    Ok(())
}

/// Walks a validated tree and returns the reached leaf distribution.
fn evaluate_tree<'a>(
    tree: &'a TreeArtifact,
    features: &FeatureVector,
) -> Result<&'a [f64], ModelError> {
    let mut index = 0;
    loop {
        let node = tree
            .nodes
            .get(index)
            .ok_or_else(|| ModelError::Runtime(format!("node {index} out of range")))?;
        match node {
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                let value = features
                    .values()
                    .get(*feature)
                    .copied()
                    .ok_or_else(|| ModelError::Input(format!("feature {feature} out of range")))?;
                index = if feature_as_f64(value) <= *threshold { *left } else { *right };
            }
            TreeNode::Leaf {
                distribution,
            } => return Ok(distribution),
        }
    }
}

/// Converts an encoded feature to the model's split domain.
#[allow(clippy::cast_precision_loss, reason = "Split thresholds are trained on f64 features.")]
const fn feature_as_f64(value: i64) -> f64 {
    value as f64
}

/// Converts a tree count into an averaging divisor.
#[allow(clippy::cast_precision_loss, reason = "Tree counts are far below 2^52.")]
const fn tree_count_as_f64(count: usize) -> f64 {
    count as f64
}

/// Reads a file while enforcing a byte limit.
fn read_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ModelLoadError> {
    let file = File::open(path)
        .map_err(|err| ModelLoadError::Io(format!("{}: {err}", path.display())))?;
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX).saturating_add(1);
    let mut bytes = Vec::new();
    file.take(limit)
        .read_to_end(&mut bytes)
        .map_err(|err| ModelLoadError::Io(format!("{}: {err}", path.display())))?;
    if bytes.len() > max_bytes {
        return Err(ModelLoadError::TooLarge {
            max_bytes,
            actual_bytes: bytes.len(),
        });
    }
    Ok(bytes)
}
