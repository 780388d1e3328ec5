//! Persisted model artifacts

use crate::error::{CreditError, Result};
use crate::model::Classifier;
use crate::pipeline::CreditPipeline;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A fitted pipeline together with the metadata needed to trust it later:
/// crate version at save time and creation timestamp. Artifacts are plain
/// JSON files; loading never executes anything beyond deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "C: Serialize + DeserializeOwned")]
pub struct ModelArtifact<C: Classifier> {
    /// The fitted pipeline
    pub pipeline: CreditPipeline<C>,
    /// Crate version that produced the artifact
    pub version: String,
    /// Save timestamp
    pub created_at: DateTime<Utc>,
}

impl<C: Classifier + Serialize + DeserializeOwned> ModelArtifact<C> {
    /// Wrap a fitted pipeline. Fails on an unfitted one; an artifact must be
    /// usable for prediction as soon as it is loaded.
    pub fn new(pipeline: CreditPipeline<C>) -> Result<Self> {
        if !pipeline.is_fitted() {
            return Err(CreditError::Validation(
                "cannot build an artifact from an unfitted pipeline".to_string(),
            ));
        }
        Ok(Self {
            pipeline,
            version: env!("CARGO_PKG_VERSION").to_string(),
            created_at: Utc::now(),
        })
    }

    /// Write the artifact as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load an artifact from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RandomForest;
    use crate::pipeline::CreditPipeline;
    use crate::schema::FeatureSchema;

    #[test]
    fn test_unfitted_pipeline_rejected() {
        let pipe = CreditPipeline::new(
            FeatureSchema::credit_default(),
            RandomForest::new(5),
        );
        assert!(matches!(
            ModelArtifact::new(pipe),
            Err(CreditError::Validation(_))
        ));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = ModelArtifact::<RandomForest>::load("/nonexistent/model.json");
        assert!(matches!(result, Err(CreditError::Io(_))));
    }
}
