//! Credit-risk classification workflow
//!
//! Predicts loan default from application records. The crate covers the full
//! path from raw CSV to served predictions:
//!
//! - [`features`]: derived ratios and bucket columns
//! - [`preprocessing`]: imputation, standardization, categorical encoding
//! - [`resample`]: minority oversampling for imbalanced training data
//! - [`model`]: decision-tree and random-forest classifiers
//! - [`pipeline`]: the composed fit/predict surface
//! - [`artifact`]: persisted models with provenance metadata
//! - [`server`]: HTTP prediction endpoint
//! - [`cli`]: train / predict / eda / importance / serve commands

pub mod app;
pub mod artifact;
pub mod cli;
pub mod data;
pub mod eda;
pub mod error;
pub mod features;
pub mod grids;
pub mod importance;
pub mod model;
pub mod pipeline;
pub mod preprocessing;
pub mod resample;
pub mod schema;
pub mod server;

/// Commonly used types
pub mod prelude {
    pub use crate::artifact::ModelArtifact;
    pub use crate::error::{CreditError, Result};
    pub use crate::model::{Classifier, DecisionTree, RandomForest};
    pub use crate::pipeline::CreditPipeline;
    pub use crate::preprocessing::CreditPreprocessor;
    pub use crate::schema::{FeatureSchema, TARGET};
}
