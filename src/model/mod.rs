//! Classification models
//!
//! The pipeline is generic over [`Classifier`]; the in-crate implementations
//! are a CART-style decision tree and a bagged random forest built on top of
//! it. Labels are integer class codes; for the credit task they are binary
//! with 1 meaning default.

mod decision_tree;
mod random_forest;

pub use decision_tree::{Criterion, DecisionTree};
pub use random_forest::{MaxFeatures, RandomForest};

use crate::error::Result;
use ndarray::{Array1, Array2};

/// Positive class code (loan default)
pub const POSITIVE_CLASS: i64 = 1;

/// Trait implemented by every classification model the pipeline can drive
pub trait Classifier: Send + Sync {
    /// Fit on a feature matrix and integer labels
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<i64>) -> Result<()>;

    /// Predict a class code per row
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<i64>>;

    /// Probability of the positive class per row
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>>;

    /// Per-feature importance scores summing to 1, if the model exposes them
    fn feature_importances(&self) -> Option<&Array1<f64>> {
        None
    }
}
