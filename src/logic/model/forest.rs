//! Random Forest - decision tree ensemble over the URL-only layout
//!
//! Trees are loaded from a JSON blob:
//!
//! ```json
//! { "trees": [ { "featureIndex": 3, "threshold": 50.0,
//!                "left": { "value": [0.9, 0.1] },
//!                "right": { "value": 0.2 } } ],
//!   "n_estimators": 1, "max_depth": 5, "feature_names": [] }
//! ```
//!
//! A leaf pair is `[P(phishing), P(legitimate)]`; a scalar leaf is
//! `P(phishing)`.

use serde::{Deserialize, Serialize};

use crate::error::{ScanError, ScanResult};
use crate::logic::features::URL_FEATURE_COUNT;

/// Nesting bound enforced at load time
pub const MAX_TREE_DEPTH: usize = 256;

/// Documented tree depth when the blob doesn't say
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Vote threshold for a tree to count as "phishing"
pub const VOTE_THRESHOLD: f64 = 0.5;

// ============================================================================
// TREE NODES
// ============================================================================

/// Leaf payload as stored in the blob
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LeafValue {
    /// `[P(phishing), P(legitimate)]`
    Pair([f64; 2]),
    /// `P(phishing)`
    Scalar(f64),
}

impl LeafValue {
    pub fn p_phishing(&self) -> f64 {
        match self {
            LeafValue::Pair(pair) => pair[0],
            LeafValue::Scalar(p) => *p,
        }
    }

    pub fn p_legit(&self) -> f64 {
        match self {
            LeafValue::Pair(pair) => pair[1],
            LeafValue::Scalar(p) => 1.0 - p,
        }
    }

    /// Every component within [0, 1]; NaN and infinities fail
    fn is_probability(&self) -> bool {
        let in_range = |v: &f64| (0.0..=1.0).contains(v);
        match self {
            LeafValue::Pair(pair) => pair.iter().all(in_range),
            LeafValue::Scalar(p) => in_range(p),
        }
    }
}

/// Owned, acyclic decision tree
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionTreeNode {
    Leaf {
        value: LeafValue,
    },
    Internal {
        feature_index: usize,
        threshold: f64,
        left: Box<DecisionTreeNode>,
        right: Box<DecisionTreeNode>,
    },
}

/// Wire shape of a node before validation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    #[serde(default)]
    value: Option<LeafValue>,
    #[serde(default, alias = "feature_index")]
    feature_index: Option<usize>,
    #[serde(default)]
    threshold: Option<f64>,
    #[serde(default)]
    left: Option<Box<RawNode>>,
    #[serde(default)]
    right: Option<Box<RawNode>>,
}

impl DecisionTreeNode {
    fn from_raw(raw: RawNode, depth: usize) -> Result<Self, String> {
        if depth > MAX_TREE_DEPTH {
            return Err(format!("tree deeper than {}", MAX_TREE_DEPTH));
        }

        if let Some(value) = raw.value {
            if !value.is_probability() {
                return Err(format!("leaf probability outside [0, 1]: {:?}", value));
            }
            return Ok(DecisionTreeNode::Leaf { value });
        }

        let feature_index = raw
            .feature_index
            .ok_or_else(|| "internal node without featureIndex".to_string())?;
        if feature_index >= URL_FEATURE_COUNT {
            return Err(format!(
                "featureIndex {} out of range (< {})",
                feature_index, URL_FEATURE_COUNT
            ));
        }

        let threshold = raw
            .threshold
            .filter(|t| t.is_finite())
            .ok_or_else(|| format!("missing or non-finite threshold at featureIndex {}", feature_index))?;

        let left = raw.left.ok_or_else(|| "internal node without left child".to_string())?;
        let right = raw.right.ok_or_else(|| "internal node without right child".to_string())?;

        Ok(DecisionTreeNode::Internal {
            feature_index,
            threshold,
            left: Box::new(Self::from_raw(*left, depth + 1)?),
            right: Box::new(Self::from_raw(*right, depth + 1)?),
        })
    }

    /// Descend to a leaf. A missing feature value compares false and
    /// goes right.
    pub fn traverse(&self, features: &[f64]) -> LeafValue {
        let mut node = self;
        loop {
            match node {
                DecisionTreeNode::Leaf { value } => return *value,
                DecisionTreeNode::Internal {
                    feature_index,
                    threshold,
                    left,
                    right,
                } => {
                    node = match features.get(*feature_index) {
                        Some(v) if *v <= *threshold => left,
                        _ => right,
                    };
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            DecisionTreeNode::Leaf { .. } => 1,
            DecisionTreeNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

// ============================================================================
// FOREST
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawForest {
    trees: Vec<RawNode>,
    #[serde(default)]
    n_estimators: Option<usize>,
    #[serde(default)]
    max_depth: Option<usize>,
    #[serde(default)]
    feature_names: Vec<String>,
}

/// Loaded, validated forest. Read-only after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForestModel {
    pub trees: Vec<DecisionTreeNode>,
    pub n_estimators: usize,
    pub max_depth: usize,
    /// Documentation only; never consulted during traversal
    pub feature_names: Vec<String>,
}

/// Ensemble output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestPrediction {
    /// Mean P(phishing) across trees
    pub score: f64,
    /// `max(0, 1 - 2 * stddev)` of the per-tree P(phishing)
    pub confidence: f64,
    pub per_tree: Vec<f64>,
}

impl ForestPrediction {
    /// Result when there is nothing to vote
    pub fn neutral() -> Self {
        Self {
            score: 0.5,
            confidence: 0.0,
            per_tree: Vec::new(),
        }
    }
}

/// Vote breakdown for diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VotingStats {
    pub total_trees: usize,
    pub phishing_votes: usize,
    pub legit_votes: usize,
    pub agreement: f64,
    pub predictions: Vec<f64>,
}

impl RandomForestModel {
    pub fn new(trees: Vec<DecisionTreeNode>) -> Self {
        Self {
            n_estimators: trees.len(),
            max_depth: DEFAULT_MAX_DEPTH,
            feature_names: Vec::new(),
            trees,
        }
    }

    /// Parse and validate a forest blob
    pub fn from_json(json: &str) -> ScanResult<Self> {
        let raw: RawForest = serde_json::from_str(json)?;

        let trees = raw
            .trees
            .into_iter()
            .enumerate()
            .map(|(i, node)| {
                DecisionTreeNode::from_raw(node, 1)
                    .map_err(|e| ScanError::ModelUnavailable(format!("forest tree {}: {}", i, e)))
            })
            .collect::<ScanResult<Vec<_>>>()?;

        let model = Self {
            n_estimators: raw.n_estimators.filter(|&n| n > 0).unwrap_or(trees.len()),
            max_depth: raw.max_depth.filter(|&d| d > 0).unwrap_or(DEFAULT_MAX_DEPTH),
            feature_names: raw.feature_names,
            trees,
        };

        log::info!(
            "Forest loaded: {} trees, max_depth={}",
            model.n_estimators,
            model.max_depth
        );
        Ok(model)
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    fn tree_probabilities(&self, features: &[f64]) -> Vec<f64> {
        self.trees
            .iter()
            .map(|tree| tree.traverse(features).p_phishing())
            .collect()
    }

    /// Average the trees; neutral for an empty forest.
    pub fn predict(&self, features: &[f64]) -> ForestPrediction {
        if self.trees.is_empty() {
            log::warn!("Forest has no trees, returning neutral score");
            return ForestPrediction::neutral();
        }

        let per_tree = self.tree_probabilities(features);
        let n = per_tree.len() as f64;
        let mean = per_tree.iter().sum::<f64>() / n;
        let variance = per_tree.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / n;
        let confidence = (1.0 - variance.sqrt() * 2.0).max(0.0);

        log::debug!(
            "Forest prediction: {:.4}, stddev: {:.4}, confidence: {:.4}",
            mean,
            variance.sqrt(),
            confidence
        );

        ForestPrediction {
            score: mean,
            confidence,
            per_tree,
        }
    }

    /// Count per-tree votes on either side of [`VOTE_THRESHOLD`]
    pub fn voting_stats(&self, features: &[f64]) -> ScanResult<VotingStats> {
        if self.trees.is_empty() {
            return Err(ScanError::ModelUnavailable("forest has no trees".to_string()));
        }

        let predictions = self.tree_probabilities(features);
        let phishing_votes = predictions.iter().filter(|&&p| p > VOTE_THRESHOLD).count();
        let legit_votes = predictions.len() - phishing_votes;

        Ok(VotingStats {
            total_trees: self.trees.len(),
            phishing_votes,
            legit_votes,
            agreement: phishing_votes.max(legit_votes) as f64 / self.trees.len() as f64,
            predictions,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(p: f64) -> DecisionTreeNode {
        DecisionTreeNode::Leaf {
            value: LeafValue::Pair([p, 1.0 - p]),
        }
    }

    fn split(idx: usize, threshold: f64, left: DecisionTreeNode, right: DecisionTreeNode) -> DecisionTreeNode {
        DecisionTreeNode::Internal {
            feature_index: idx,
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[test]
    fn test_leaf_index_zero_is_phishing() {
        // A leaf stored as [0.9, 0.1] must read as 90% phishing
        let json = r#"{"trees":[{"value":[0.9,0.1]}]}"#;
        let model = RandomForestModel::from_json(json).unwrap();
        let prediction = model.predict(&[0.0; 22]);
        assert!((prediction.score - 0.9).abs() < 1e-12);
        assert_eq!(prediction.confidence, 1.0);
    }

    #[test]
    fn test_scalar_leaf_is_phishing_probability() {
        let value = LeafValue::Scalar(0.3);
        assert_eq!(value.p_phishing(), 0.3);
        assert!((value.p_legit() - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_traversal_goes_left_on_equal() {
        let tree = split(2, 0.5, leaf(0.1), leaf(0.8));
        let mut features = [0.0; 22];
        features[2] = 0.5;
        assert_eq!(tree.traverse(&features).p_phishing(), 0.1);
        features[2] = 0.51;
        assert_eq!(tree.traverse(&features).p_phishing(), 0.8);
        // missing feature goes right
        assert_eq!(tree.traverse(&[]).p_phishing(), 0.8);
    }

    #[test]
    fn test_score_and_confidence() {
        let model = RandomForestModel::new(vec![leaf(1.0), leaf(0.0)]);
        let prediction = model.predict(&[0.0; 22]);
        assert_eq!(prediction.score, 0.5);
        // stddev 0.5 -> 1 - 1.0
        assert_eq!(prediction.confidence, 0.0);
        assert_eq!(prediction.per_tree, vec![1.0, 0.0]);
    }

    #[test]
    fn test_empty_forest_is_neutral() {
        let model = RandomForestModel::new(Vec::new());
        assert_eq!(model.predict(&[0.0; 22]), ForestPrediction::neutral());
        assert!(model.voting_stats(&[0.0; 22]).is_err());
    }

    #[test]
    fn test_voting_stats() {
        let model = RandomForestModel::new(vec![leaf(0.9), leaf(0.7), leaf(0.2), leaf(0.5)]);
        let stats = model.voting_stats(&[0.0; 22]).unwrap();
        assert_eq!(stats.total_trees, 4);
        assert_eq!(stats.phishing_votes, 2);
        assert_eq!(stats.legit_votes, 2);
        assert_eq!(stats.agreement, 0.5);
    }

    #[test]
    fn test_from_json_metadata_defaults() {
        let json = r#"{"trees":[
            {"featureIndex":3,"threshold":50.0,"left":{"value":[0.9,0.1]},"right":{"value":0.2}},
            {"feature_index":0,"threshold":10,"left":{"value":0.4},"right":{"value":[0.6,0.4]}}
        ],"n_estimators":0}"#;
        let model = RandomForestModel::from_json(json).unwrap();
        assert_eq!(model.n_estimators, 2);
        assert_eq!(model.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(model.trees[0].depth(), 2);
    }

    #[test]
    fn test_from_json_rejects_bad_trees() {
        let out_of_range = r#"{"trees":[{"featureIndex":22,"threshold":1,"left":{"value":1},"right":{"value":0}}]}"#;
        assert!(matches!(
            RandomForestModel::from_json(out_of_range),
            Err(ScanError::ModelUnavailable(_))
        ));

        let missing_child = r#"{"trees":[{"featureIndex":1,"threshold":1,"left":{"value":1}}]}"#;
        assert!(RandomForestModel::from_json(missing_child).is_err());

        let bad_pair = r#"{"trees":[{"value":[7.5,-6.5]}]}"#;
        let bad_scalar = r#"{"trees":[{"value":[0.5,0.5]},{"value":-3.0}]}"#;
        let nested = r#"{"trees":[{"featureIndex":0,"threshold":1,"left":{"value":0.3},"right":{"value":1.2}}]}"#;
        for json in [bad_pair, bad_scalar, nested] {
            assert!(
                matches!(RandomForestModel::from_json(json), Err(ScanError::ModelUnavailable(_))),
                "{}",
                json
            );
        }

        assert!(matches!(
            RandomForestModel::from_json("{not json"),
            Err(ScanError::Json(_))
        ));
    }
}
