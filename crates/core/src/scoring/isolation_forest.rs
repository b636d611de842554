//! Isolation Forest inference over pre-fitted trees.
//!
//! Trees are stored in flat array form: node `i` is a leaf when
//! `children_left[i] == -1`, otherwise it splits on `feature[i]` and sends the
//! sample left when `x <= threshold[i]`. Children always have a higher index
//! than their parent.

use serde::{Deserialize, Serialize};

/// Leaf marker in `children_left` / `children_right`.
pub const LEAF: i64 = -1;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Average path length of an unsuccessful search in a binary search tree of
/// `n` nodes, used to normalise isolation depths.
pub fn average_path_length(n: u64) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// A single fitted isolation tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsolationTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub n_node_samples: Vec<u64>,
    /// Column subset the tree was fitted on. `feature` indexes into this
    /// subset when present, into the full sample otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<usize>>,
}

impl IsolationTree {
    fn node_count(&self) -> usize {
        self.children_left.len()
    }

    fn validate(&self, n_features: usize) -> Result<(), String> {
        let n = self.node_count();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if [
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
            self.n_node_samples.len(),
        ]
        .iter()
        .any(|&len| len != n)
        {
            return Err("tree arrays differ in length".to_string());
        }

        let width = match &self.features {
            Some(subset) => {
                if let Some(bad) = subset.iter().find(|&&f| f >= n_features) {
                    return Err(format!("feature subset index {bad} out of range"));
                }
                subset.len()
            }
            None => n_features,
        };

        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == LEAF {
                continue;
            }
            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(format!("node {node} has invalid child {child}"));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= width {
                return Err(format!("node {node} splits on invalid feature {feature}"));
            }
        }
        Ok(())
    }

    /// Depth of the leaf `sample` lands in, plus the expected remaining depth
    /// of that leaf's population.
    pub fn path_length(&self, sample: &[f64]) -> f64 {
        let mut node = 0usize;
        let mut depth = 0u32;

        while self.children_left[node] != LEAF {
            let split = self.feature[node] as usize;
            let column = match &self.features {
                Some(subset) => subset[split],
                None => split,
            };
            node = if sample[column] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
            depth += 1;
        }

        f64::from(depth) + average_path_length(self.n_node_samples[node])
    }
}

/// A fitted isolation forest.
///
/// `offset` follows the usual convention: the decision value is
/// `-score - offset` and negative decisions are outliers. A forest fitted
/// with automatic contamination has `offset = -0.5`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsolationForest {
    pub n_features: usize,
    pub max_samples: u64,
    pub offset: f64,
    pub trees: Vec<IsolationTree>,
}

impl IsolationForest {
    /// Check that every tree is well formed for `n_features` inputs.
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.n_features != n_features {
            return Err(format!(
                "expected {n_features} features, got {}",
                self.n_features
            ));
        }
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        if self.max_samples == 0 {
            return Err("max_samples must be positive".to_string());
        }
        if !self.offset.is_finite() {
            return Err("offset must be finite".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(n_features)
                .map_err(|e| format!("tree {i}: {e}"))?;
        }
        Ok(())
    }

    /// Anomaly score in `(0, 1]`; higher is more anomalous.
    pub fn score(&self, sample: &[f64]) -> f64 {
        let mean_path = self
            .trees
            .iter()
            .map(|tree| tree.path_length(sample))
            .sum::<f64>()
            / self.trees.len() as f64;

        let norm = average_path_length(self.max_samples);
        if norm == 0.0 {
            // A single-sample forest cannot separate anything.
            return 1.0;
        }
        2f64.powf(-mean_path / norm)
    }

    pub fn decision_function(&self, sample: &[f64]) -> f64 {
        -self.score(sample) - self.offset
    }

    /// `-1` for outliers, `1` for inliers.
    pub fn predict(&self, sample: &[f64]) -> i8 {
        if self.decision_function(sample) < 0.0 {
            -1
        } else {
            1
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
