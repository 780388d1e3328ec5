//! Hyperparameter search grids
//!
//! Declarative candidate grids for the model families the training workflow
//! searches over. The grids are configuration only; an external runner (or
//! the in-crate forest, for its own parameters) consumes the candidate
//! combinations.

use crate::error::{CreditError, Result};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// One candidate value for a hyperparameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GridValue {
    /// Integer-valued parameter
    Int(i64),
    /// Real-valued parameter
    Float(f64),
    /// String-valued parameter
    Text(String),
    /// Explicit "unset" candidate (e.g. unbounded depth)
    Null,
}

impl From<i64> for GridValue {
    fn from(v: i64) -> Self {
        GridValue::Int(v)
    }
}

impl From<f64> for GridValue {
    fn from(v: f64) -> Self {
        GridValue::Float(v)
    }
}

impl From<&str> for GridValue {
    fn from(v: &str) -> Self {
        GridValue::Text(v.to_string())
    }
}

/// An ordered set of hyperparameters, each with its candidate values.
/// Iteration order over combinations is deterministic: the last-added
/// parameter varies fastest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamGrid {
    params: Vec<(String, Vec<GridValue>)>,
}

impl ParamGrid {
    /// Create an empty grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter with its candidates
    pub fn with_param<V: Into<GridValue>>(
        mut self,
        name: &str,
        candidates: impl IntoIterator<Item = V>,
    ) -> Self {
        self.params.push((
            name.to_string(),
            candidates.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Parameter names, in insertion order
    pub fn param_names(&self) -> Vec<&str> {
        self.params.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Candidates for one parameter
    pub fn candidates(&self, name: &str) -> Option<&[GridValue]> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c.as_slice())
    }

    /// Total number of combinations in the full cartesian product
    pub fn n_candidates(&self) -> usize {
        if self.params.is_empty() {
            return 0;
        }
        self.params.iter().map(|(_, c)| c.len()).product()
    }

    /// All combinations, each as (name, value) pairs in parameter order
    pub fn iter(&self) -> impl Iterator<Item = Vec<(&str, &GridValue)>> + '_ {
        let total = self.n_candidates();
        (0..total).map(move |mut idx| {
            let mut combo = Vec::with_capacity(self.params.len());
            for (name, candidates) in self.params.iter().rev() {
                let value = &candidates[idx % candidates.len()];
                idx /= candidates.len();
                combo.push((name.as_str(), value));
            }
            combo.reverse();
            combo
        })
    }

    /// A seeded random subset of `n` combinations, without replacement
    pub fn sample(&self, n: usize, seed: u64) -> Result<Vec<Vec<(&str, &GridValue)>>> {
        let total = self.n_candidates();
        if n > total {
            return Err(CreditError::Validation(format!(
                "requested {n} samples from a grid with {total} combinations"
            )));
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let mut all: Vec<Vec<(&str, &GridValue)>> = self.iter().collect();
        all.shuffle(&mut rng);
        all.truncate(n);
        Ok(all)
    }
}

/// Full random-forest grid
pub fn random_forest_grid() -> ParamGrid {
    ParamGrid::new()
        .with_param("n_estimators", [200i64, 400, 600])
        .with_param(
            "max_depth",
            [GridValue::Null, GridValue::Int(10), GridValue::Int(20)],
        )
        .with_param("min_samples_split", [2i64, 5, 10])
        .with_param("min_samples_leaf", [1i64, 2, 4])
}

/// Full gradient-boosting grid (XGBoost-style parameters)
pub fn xgboost_grid() -> ParamGrid {
    ParamGrid::new()
        .with_param("n_estimators", [200i64, 400, 600])
        .with_param("max_depth", [3i64, 5, 7, 10])
        .with_param("learning_rate", [0.01, 0.05, 0.1])
        .with_param("subsample", [0.6, 0.8, 1.0])
}

/// Full ordered-boosting grid (CatBoost-style parameters)
pub fn catboost_grid() -> ParamGrid {
    ParamGrid::new()
        .with_param("iterations", [200i64, 400, 600])
        .with_param("depth", [4i64, 6, 8, 10])
        .with_param("learning_rate", [0.01, 0.05, 0.1])
        .with_param("l2_leaf_reg", [1i64, 3, 5, 7])
}

/// Compact random-forest grid for the one-hot pipeline variant
pub fn random_forest_grid_ohe() -> ParamGrid {
    ParamGrid::new()
        .with_param("n_estimators", [200i64, 400])
        .with_param("max_depth", [GridValue::Null, GridValue::Int(12)])
        .with_param("min_samples_split", [2i64, 5])
        .with_param("min_samples_leaf", [1i64, 2])
}

/// Compact gradient-boosting grid for the one-hot pipeline variant
pub fn xgboost_grid_ohe() -> ParamGrid {
    ParamGrid::new()
        .with_param("n_estimators", [300i64, 600])
        .with_param("max_depth", [4i64, 6])
        .with_param("learning_rate", [0.05, 0.1])
        .with_param("subsample", [0.8, 1.0])
}

/// Compact ordered-boosting grid for the one-hot pipeline variant
pub fn catboost_grid_ohe() -> ParamGrid {
    ParamGrid::new()
        .with_param("iterations", [400i64, 600])
        .with_param("depth", [6i64, 8])
        .with_param("learning_rate", [0.05, 0.1])
        .with_param("l2_leaf_reg", [3i64, 5])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_sizes() {
        assert_eq!(random_forest_grid().n_candidates(), 81);
        assert_eq!(xgboost_grid().n_candidates(), 108);
        assert_eq!(catboost_grid().n_candidates(), 144);
        assert_eq!(random_forest_grid_ohe().n_candidates(), 16);
        assert_eq!(xgboost_grid_ohe().n_candidates(), 16);
        assert_eq!(catboost_grid_ohe().n_candidates(), 16);
    }

    #[test]
    fn test_iteration_covers_all_combinations() {
        let grid = ParamGrid::new()
            .with_param("a", [1i64, 2])
            .with_param("b", [10i64, 20, 30]);

        let combos: Vec<_> = grid.iter().collect();
        assert_eq!(combos.len(), 6);

        // First combination holds every parameter's first candidate
        assert_eq!(combos[0][0], ("a", &GridValue::Int(1)));
        assert_eq!(combos[0][1], ("b", &GridValue::Int(10)));
        // Last-added parameter varies fastest
        assert_eq!(combos[1][0], ("a", &GridValue::Int(1)));
        assert_eq!(combos[1][1], ("b", &GridValue::Int(20)));
    }

    #[test]
    fn test_null_candidate_survives() {
        let grid = random_forest_grid();
        let depths = grid.candidates("max_depth").unwrap();
        assert!(depths.contains(&GridValue::Null));
    }

    #[test]
    fn test_sample_is_seeded_and_bounded() {
        let grid = random_forest_grid();

        let a = grid.sample(5, 42).unwrap();
        let b = grid.sample(5, 42).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 5);

        assert!(grid.sample(1000, 42).is_err());
    }
}
