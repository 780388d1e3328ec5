//! CART-style classification tree

use crate::error::{CreditError, Result};
use crate::model::{Classifier, POSITIVE_CLASS};
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Decision tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Leaf with the majority label and the positive-class fraction of the
    /// training rows that reached it
    Leaf {
        label: i64,
        positive_fraction: f64,
        n_samples: usize,
    },
    /// Internal node splitting on `feature_idx <= threshold`
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
        n_samples: usize,
    },
}

/// Impurity criterion
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Criterion {
    /// Gini impurity
    Gini,
    /// Shannon entropy
    Entropy,
}

/// Classification decision tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    root: Option<TreeNode>,
    /// Maximum depth; unbounded when None
    pub max_depth: Option<usize>,
    /// Minimum samples to attempt a split
    pub min_samples_split: usize,
    /// Minimum samples per leaf
    pub min_samples_leaf: usize,
    /// Impurity criterion
    pub criterion: Criterion,
    /// Candidate feature indices per split; all features when None. Set by
    /// the forest for random-subspace trees.
    pub feature_candidates: Option<Vec<usize>>,
    n_features: usize,
    feature_importances: Option<Array1<f64>>,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTree {
    /// Create a tree with default hyperparameters
    pub fn new() -> Self {
        Self {
            root: None,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            criterion: Criterion::Gini,
            feature_candidates: None,
            n_features: 0,
            feature_importances: None,
        }
    }

    /// Set maximum depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set minimum samples to split
    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples.max(2);
        self
    }

    /// Set minimum samples in leaf
    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples.max(1);
        self
    }

    /// Set criterion
    pub fn with_criterion(mut self, criterion: Criterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Tree depth (0 before fit)
    pub fn depth(&self) -> usize {
        fn node_depth(node: &TreeNode) -> usize {
            match node {
                TreeNode::Leaf { .. } => 1,
                TreeNode::Split { left, right, .. } => 1 + node_depth(left).max(node_depth(right)),
            }
        }
        self.root.as_ref().map_or(0, node_depth)
    }

    fn build_tree(
        &self,
        x: &Array2<f64>,
        y: &Array1<i64>,
        indices: &[usize],
        depth: usize,
        importances: &mut [f64],
    ) -> TreeNode {
        let n_samples = indices.len();
        let labels: Vec<i64> = indices.iter().map(|&i| y[i]).collect();

        let should_stop = n_samples < self.min_samples_split
            || self.max_depth.is_some_and(|d| depth >= d)
            || labels.iter().all(|&l| l == labels[0]);

        if should_stop {
            return Self::make_leaf(&labels);
        }

        let Some((best_feature, best_threshold)) = self.find_best_split(x, y, indices) else {
            return Self::make_leaf(&labels);
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| x[[i, best_feature]] <= best_threshold);

        if left_indices.len() < self.min_samples_leaf || right_indices.len() < self.min_samples_leaf
        {
            return Self::make_leaf(&labels);
        }

        let parent_impurity = self.impurity(&class_counts_of(&labels), n_samples);
        let left_labels: Vec<i64> = left_indices.iter().map(|&i| y[i]).collect();
        let right_labels: Vec<i64> = right_indices.iter().map(|&i| y[i]).collect();
        let weighted_child_impurity = (left_labels.len() as f64
            * self.impurity(&class_counts_of(&left_labels), left_labels.len())
            + right_labels.len() as f64
                * self.impurity(&class_counts_of(&right_labels), right_labels.len()))
            / n_samples as f64;
        importances[best_feature] += n_samples as f64 * (parent_impurity - weighted_child_impurity);

        let left = Box::new(self.build_tree(x, y, &left_indices, depth + 1, importances));
        let right = Box::new(self.build_tree(x, y, &right_indices, depth + 1, importances));

        TreeNode::Split {
            feature_idx: best_feature,
            threshold: best_threshold,
            left,
            right,
            n_samples,
        }
    }

    fn make_leaf(labels: &[i64]) -> TreeNode {
        let counts = class_counts_of(labels);
        let label = counts
            .iter()
            .max_by(|(a_label, a_count), (b_label, b_count)| {
                a_count.cmp(b_count).then(b_label.cmp(a_label))
            })
            .map(|(&label, _)| label)
            .unwrap_or(0);
        let positives = counts.get(&POSITIVE_CLASS).copied().unwrap_or(0);

        TreeNode::Leaf {
            label,
            positive_fraction: positives as f64 / labels.len().max(1) as f64,
            n_samples: labels.len(),
        }
    }

    fn find_best_split(
        &self,
        x: &Array2<f64>,
        y: &Array1<i64>,
        indices: &[usize],
    ) -> Option<(usize, f64)> {
        let all_features: Vec<usize> = (0..x.ncols()).collect();
        let candidates = self.feature_candidates.as_deref().unwrap_or(&all_features);

        let labels: Vec<i64> = indices.iter().map(|&i| y[i]).collect();
        let parent_impurity = self.impurity(&class_counts_of(&labels), indices.len());

        // Each feature finds its own best threshold independently
        let per_feature: Vec<Option<(usize, f64, f64)>> = candidates
            .par_iter()
            .map(|&feature_idx| {
                let mut values: Vec<f64> =
                    indices.iter().map(|&i| x[[i, feature_idx]]).collect();
                values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                values.dedup();

                let mut best_gain = 0.0f64;
                let mut best_threshold = None;

                for window in values.windows(2) {
                    let threshold = (window[0] + window[1]) / 2.0;

                    let mut left_counts: HashMap<i64, usize> = HashMap::new();
                    let mut right_counts: HashMap<i64, usize> = HashMap::new();
                    let mut left_n = 0usize;
                    let mut right_n = 0usize;

                    for &idx in indices {
                        if x[[idx, feature_idx]] <= threshold {
                            *left_counts.entry(y[idx]).or_insert(0) += 1;
                            left_n += 1;
                        } else {
                            *right_counts.entry(y[idx]).or_insert(0) += 1;
                            right_n += 1;
                        }
                    }

                    if left_n < self.min_samples_leaf || right_n < self.min_samples_leaf {
                        continue;
                    }

                    let weighted = (left_n as f64 * self.impurity(&left_counts, left_n)
                        + right_n as f64 * self.impurity(&right_counts, right_n))
                        / indices.len() as f64;
                    let gain = parent_impurity - weighted;

                    if gain > best_gain {
                        best_gain = gain;
                        best_threshold = Some(threshold);
                    }
                }

                best_threshold.map(|t| (feature_idx, t, best_gain))
            })
            .collect();

        per_feature
            .into_iter()
            .flatten()
            .max_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(feature, threshold, _)| (feature, threshold))
    }

    fn impurity(&self, counts: &HashMap<i64, usize>, n: usize) -> f64 {
        if n == 0 {
            return 0.0;
        }
        let n = n as f64;
        match self.criterion {
            Criterion::Gini => {
                1.0 - counts
                    .values()
                    .map(|&c| (c as f64 / n).powi(2))
                    .sum::<f64>()
            }
            Criterion::Entropy => -counts
                .values()
                .filter(|&&c| c > 0)
                .map(|&c| {
                    let p = c as f64 / n;
                    p * p.ln()
                })
                .sum::<f64>(),
        }
    }

    fn leaf_for(&self, node: &TreeNode, sample: &[f64]) -> (i64, f64) {
        match node {
            TreeNode::Leaf {
                label,
                positive_fraction,
                ..
            } => (*label, *positive_fraction),
            TreeNode::Split {
                feature_idx,
                threshold,
                left,
                right,
                ..
            } => {
                if sample[*feature_idx] <= *threshold {
                    self.leaf_for(left, sample)
                } else {
                    self.leaf_for(right, sample)
                }
            }
        }
    }

    fn check_input(&self, x: &Array2<f64>) -> Result<&TreeNode> {
        let root = self.root.as_ref().ok_or(CreditError::NotFitted)?;
        if x.ncols() != self.n_features {
            return Err(CreditError::Shape {
                expected: self.n_features,
                actual: x.ncols(),
            });
        }
        Ok(root)
    }
}

fn class_counts_of(labels: &[i64]) -> HashMap<i64, usize> {
    let mut counts = HashMap::new();
    for &label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
}

impl Classifier for DecisionTree {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<i64>) -> Result<()> {
        let n_samples = x.nrows();
        if n_samples == 0 {
            return Err(CreditError::EmptyInput(
                "cannot fit tree on an empty matrix".to_string(),
            ));
        }
        if n_samples != y.len() {
            return Err(CreditError::Shape {
                expected: n_samples,
                actual: y.len(),
            });
        }

        self.n_features = x.ncols();

        let mut importances = vec![0.0; self.n_features];
        let indices: Vec<usize> = (0..n_samples).collect();
        self.root = Some(self.build_tree(x, y, &indices, 0, &mut importances));

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for imp in &mut importances {
                *imp /= total;
            }
        }
        self.feature_importances = Some(Array1::from_vec(importances));

        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<i64>> {
        let root = self.check_input(x)?;
        let labels: Vec<i64> = (0..x.nrows())
            .map(|i| self.leaf_for(root, x.row(i).to_vec().as_slice()).0)
            .collect();
        Ok(Array1::from_vec(labels))
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let root = self.check_input(x)?;
        let probs: Vec<f64> = (0..x.nrows())
            .map(|i| self.leaf_for(root, x.row(i).to_vec().as_slice()).1)
            .collect();
        Ok(Array1::from_vec(probs))
    }

    fn feature_importances(&self) -> Option<&Array1<f64>> {
        self.feature_importances.as_ref()
    }
}
