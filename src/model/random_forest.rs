//! Bagged random forest classifier

use crate::error::{CreditError, Result};
use crate::model::decision_tree::{Criterion, DecisionTree};
use crate::model::{Classifier, POSITIVE_CLASS};
use ndarray::{Array1, Array2, Axis};
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Strategy for the number of candidate features per tree
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum MaxFeatures {
    /// Square root of the feature count
    Sqrt,
    /// Log2 of the feature count
    Log2,
    /// Fixed number
    Fixed(usize),
    /// All features
    All,
}

/// Random forest: bootstrap-sampled trees over random feature subspaces,
/// aggregated by majority vote. The positive-class probability of a row is
/// the fraction of trees voting for the positive class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    /// Number of trees
    pub n_estimators: usize,
    /// Maximum depth per tree
    pub max_depth: Option<usize>,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Feature-subspace strategy
    pub max_features: MaxFeatures,
    /// Impurity criterion
    pub criterion: Criterion,
    /// Base seed; tree i uses seed + i
    pub random_state: Option<u64>,
    n_features: usize,
    feature_importances: Option<Array1<f64>>,
}

impl Default for RandomForest {
    fn default() -> Self {
        Self::new(100)
    }
}

impl RandomForest {
    /// Create a forest with the given number of trees
    pub fn new(n_estimators: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_estimators: n_estimators.max(1),
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::Sqrt,
            criterion: Criterion::Gini,
            random_state: None,
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

    /// Set the feature-subspace strategy
    pub fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.max_features = max_features;
        self
    }

    /// Set criterion
    pub fn with_criterion(mut self, criterion: Criterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Set the base random seed
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Number of fitted trees
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    fn subspace_size(&self, n_features: usize) -> usize {
        match self.max_features {
            MaxFeatures::Sqrt => (n_features as f64).sqrt().ceil() as usize,
            MaxFeatures::Log2 => (n_features as f64).log2().ceil() as usize,
            MaxFeatures::Fixed(n) => n.min(n_features),
            MaxFeatures::All => n_features,
        }
        .max(1)
    }

    fn tree_votes(&self, x: &Array2<f64>) -> Result<Vec<Array1<i64>>> {
        if self.trees.is_empty() {
            return Err(CreditError::NotFitted);
        }
        self.trees.par_iter().map(|tree| tree.predict(x)).collect()
    }

    fn compute_feature_importances(&mut self) {
        let mut totals = vec![0.0; self.n_features];
        for tree in &self.trees {
            if let Some(imp) = tree.feature_importances() {
                for (acc, &val) in totals.iter_mut().zip(imp.iter()) {
                    *acc += val;
                }
            }
        }

        let sum: f64 = totals.iter().sum();
        if sum > 0.0 {
            for imp in &mut totals {
                *imp /= sum;
            }
        }
        self.feature_importances = Some(Array1::from_vec(totals));
    }
}

impl Classifier for RandomForest {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<i64>) -> Result<()> {
        let n_samples = x.nrows();
        if n_samples == 0 {
            return Err(CreditError::EmptyInput(
                "cannot fit forest on an empty matrix".to_string(),
            ));
        }
        if n_samples != y.len() {
            return Err(CreditError::Shape {
                expected: n_samples,
                actual: y.len(),
            });
        }

        self.n_features = x.ncols();
        let subspace = self.subspace_size(self.n_features);
        let base_seed = self.random_state.unwrap_or(42);

        let trees: Result<Vec<DecisionTree>> = (0..self.n_estimators)
            .into_par_iter()
            .map(|tree_idx| {
                let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(tree_idx as u64));

                let sample_indices: Vec<usize> = (0..n_samples)
                    .map(|_| (rng.next_u64() as usize) % n_samples)
                    .collect();
                let x_boot = x.select(Axis(0), &sample_indices);
                let y_boot =
                    Array1::from_vec(sample_indices.iter().map(|&i| y[i]).collect());

                let mut candidates: Vec<usize> = (0..self.n_features).collect();
                candidates.shuffle(&mut rng);
                candidates.truncate(subspace);

                let mut tree = DecisionTree::new()
                    .with_min_samples_split(self.min_samples_split)
                    .with_min_samples_leaf(self.min_samples_leaf)
                    .with_criterion(self.criterion);
                if let Some(d) = self.max_depth {
                    tree = tree.with_max_depth(d);
                }
                tree.feature_candidates = Some(candidates);

                tree.fit(&x_boot, &y_boot)?;
                Ok(tree)
            })
            .collect();

        self.trees = trees?;
        self.compute_feature_importances();

        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<i64>> {
        let all_votes = self.tree_votes(x)?;

        let labels: Vec<i64> = (0..x.nrows())
            .map(|i| {
                let mut votes: HashMap<i64, usize> = HashMap::new();
                for tree_votes in &all_votes {
                    *votes.entry(tree_votes[i]).or_insert(0) += 1;
                }
                votes
                    .into_iter()
                    .max_by(|(a_label, a_count), (b_label, b_count)| {
                        a_count.cmp(b_count).then(b_label.cmp(a_label))
                    })
                    .map(|(label, _)| label)
                    .unwrap_or(0)
            })
            .collect();

        Ok(Array1::from_vec(labels))
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let all_votes = self.tree_votes(x)?;
        let n_trees = all_votes.len() as f64;

        let probs: Vec<f64> = (0..x.nrows())
            .map(|i| {
                let positives = all_votes
                    .iter()
                    .filter(|votes| votes[i] == POSITIVE_CLASS)
                    .count();
                positives as f64 / n_trees
            })
            .collect();

        Ok(Array1::from_vec(probs))
    }

    fn feature_importances(&self) -> Option<&Array1<f64>> {
        self.feature_importances.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn separable_data() -> (Array2<f64>, Array1<i64>) {
        let x = array![
            [0.0, 0.0],
            [0.1, 0.1],
            [0.2, 0.2],
            [1.0, 1.0],
            [1.1, 1.1],
            [1.2, 1.2],
        ];
        let y = array![0, 0, 0, 1, 1, 1];
        (x, y)
    }

    #[test]
    fn test_forest_fits_separable_data() {
        let (x, y) = separable_data();

        let mut rf = RandomForest::new(20).with_random_state(42);
        rf.fit(&x, &y).unwrap();

        let predictions = rf.predict(&x).unwrap();
        let correct = predictions
            .iter()
            .zip(y.iter())
            .filter(|(p, a)| p == a)
            .count();
        assert!(correct >= 5, "only {correct}/6 correct");
    }

    #[test]
    fn test_proba_is_vote_share() {
        let (x, y) = separable_data();

        let mut rf = RandomForest::new(20).with_random_state(42);
        rf.fit(&x, &y).unwrap();

        let proba = rf.predict_proba(&x).unwrap();
        for &p in proba.iter() {
            assert!((0.0..=1.0).contains(&p));
            // Vote shares live on a 1/20 grid
            let scaled = p * 20.0;
            assert!((scaled - scaled.round()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_seeded_fits_are_deterministic() {
        let (x, y) = separable_data();

        let mut a = RandomForest::new(10).with_random_state(7);
        let mut b = RandomForest::new(10).with_random_state(7);
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();

        assert_eq!(a.predict_proba(&x).unwrap(), b.predict_proba(&x).unwrap());
    }

    #[test]
    fn test_importances_normalized() {
        let (x, y) = separable_data();

        let mut rf = RandomForest::new(10).with_random_state(42);
        rf.fit(&x, &y).unwrap();

        let importances = rf.feature_importances().unwrap();
        let sum: f64 = importances.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let rf = RandomForest::new(5);
        let x = array![[0.0, 0.0]];
        assert!(matches!(rf.predict(&x), Err(CreditError::NotFitted)));
    }
}
