//! End-to-end credit-risk pipeline
//!
//! Composes feature engineering, preprocessing, optional minority
//! oversampling, and a classifier behind one fit/predict surface. The same
//! pipeline object serves batch training and single-row inference.

use crate::data::{target_vector, to_matrix};
use crate::error::{CreditError, Result};
use crate::features;
use crate::importance::ImportanceReport;
use crate::model::Classifier;
use crate::preprocessing::CreditPreprocessor;
use crate::resample::{Sampler, SmoteNC};
use crate::schema::FeatureSchema;
use ndarray::{Array1, Array2};
use polars::prelude::DataFrame;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Fit/predict pipeline over any [`Classifier`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "C: Serialize + DeserializeOwned")]
pub struct CreditPipeline<C: Classifier> {
    preprocessor: CreditPreprocessor,
    classifier: C,
    /// Oversample the minority class during fit (ordinal encoding only)
    resample: bool,
    resample_seed: u64,
    is_fitted: bool,
}

impl<C: Classifier> CreditPipeline<C> {
    /// Create an unfitted pipeline
    pub fn new(schema: FeatureSchema, classifier: C) -> Self {
        Self {
            preprocessor: CreditPreprocessor::new(schema),
            classifier,
            resample: true,
            resample_seed: 42,
            is_fitted: false,
        }
    }

    /// Disable minority oversampling during fit
    pub fn without_resampling(mut self) -> Self {
        self.resample = false;
        self
    }

    /// Use one-hot categorical encoding; this variant never resamples
    pub fn with_one_hot(mut self) -> Self {
        self.preprocessor = CreditPreprocessor::new(self.preprocessor.schema().clone()).with_one_hot();
        self.resample = false;
        self
    }

    /// Set the oversampling seed
    pub fn with_resample_seed(mut self, seed: u64) -> Self {
        self.resample_seed = seed;
        self
    }

    /// The fitted (or to-be-fitted) classifier
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Preprocessor output column names
    pub fn output_columns(&self) -> Vec<String> {
        self.preprocessor.output_columns()
    }

    /// Whether `fit` has completed
    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// Engineer features and run the fitted preprocessor over a table
    fn prepare(&self, df: &DataFrame) -> Result<Array2<f64>> {
        let engineered = features::engineer(df)?;
        let processed = self.preprocessor.transform(&engineered)?;
        to_matrix(&processed, &self.preprocessor.output_columns())
    }

    /// Fit on a raw application table that includes the target column.
    ///
    /// Feature engineering and preprocessing statistics come from the full
    /// training table; oversampling happens after preprocessing so synthetic
    /// rows are generated in the encoded space.
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        if df.height() == 0 {
            return Err(CreditError::EmptyInput(
                "cannot fit pipeline on a table with zero rows".to_string(),
            ));
        }

        let y = target_vector(df)?;
        let engineered = features::engineer(df)?;
        let processed = self.preprocessor.fit_transform(&engineered)?;
        let x = to_matrix(&processed, &self.preprocessor.output_columns())?;

        let (x, y) = if self.resample {
            let n_numerical = self.preprocessor.schema().numerical().len();
            let n_total = self.preprocessor.output_columns().len();
            let categorical_indices: Vec<usize> = (n_numerical..n_total).collect();

            let mut sampler =
                SmoteNC::new(categorical_indices).with_seed(self.resample_seed);
            let resampled = sampler.fit_resample(&x, &y)?;
            (resampled.x, resampled.y)
        } else {
            (x, y)
        };

        self.classifier.fit(&x, &y)?;
        self.is_fitted = true;
        Ok(self)
    }

    /// Predict a class code per row of a raw application table
    pub fn predict(&self, df: &DataFrame) -> Result<Array1<i64>> {
        if !self.is_fitted {
            return Err(CreditError::NotFitted);
        }
        let x = self.prepare(df)?;
        self.classifier.predict(&x)
    }

    /// Probability of default per row of a raw application table
    pub fn predict_proba(&self, df: &DataFrame) -> Result<Array1<f64>> {
        if !self.is_fitted {
            return Err(CreditError::NotFitted);
        }
        let x = self.prepare(df)?;
        self.classifier.predict_proba(&x)
    }

    /// Ranked feature importances of the fitted classifier
    pub fn importance_report(&self, top_n: usize) -> Result<ImportanceReport> {
        if !self.is_fitted {
            return Err(CreditError::NotFitted);
        }
        ImportanceReport::from_classifier(
            &self.classifier,
            &self.preprocessor.output_columns(),
            top_n,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RandomForest;
    use crate::schema::TARGET;
    use polars::prelude::*;

    fn training_frame() -> DataFrame {
        let n = 30;
        let age: Vec<f64> = (0..n).map(|i| 22.0 + (i % 40) as f64).collect();
        let income: Vec<f64> = (0..n).map(|i| 20000.0 + 3000.0 * i as f64).collect();
        let emp: Vec<f64> = (0..n).map(|i| (i % 20) as f64).collect();
        let amount: Vec<f64> = (0..n).map(|i| 2000.0 + 900.0 * i as f64).collect();
        let rate: Vec<f64> = (0..n).map(|i| 6.0 + 0.4 * (i % 30) as f64).collect();
        let hist: Vec<f64> = (0..n).map(|i| 2.0 + (i % 10) as f64).collect();
        let score: Vec<f64> = (0..n).map(|i| 450.0 + 10.0 * i as f64).collect();
        let gender: Vec<&str> = (0..n).map(|i| if i % 2 == 0 { "female" } else { "male" }).collect();
        let education: Vec<&str> = (0..n)
            .map(|i| ["High School", "Bachelor", "Master"][i % 3])
            .collect();
        let home: Vec<&str> = (0..n).map(|i| ["RENT", "OWN", "MORTGAGE"][i % 3]).collect();
        let intent: Vec<&str> = (0..n)
            .map(|i| ["PERSONAL", "EDUCATION", "MEDICAL"][i % 3])
            .collect();
        // Defaults concentrate in high-rate, low-score rows
        let status: Vec<i64> = (0..n).map(|i| i64::from(i % 4 == 0)).collect();

        df!(
            "person_age" => age,
            "person_gender" => gender,
            "person_education" => education,
            "person_income" => income,
            "person_emp_exp" => emp,
            "person_home_ownership" => home,
            "loan_amnt" => amount,
            "loan_intent" => intent,
            "loan_int_rate" => rate,
            "cb_person_cred_hist_length" => hist,
            "credit_score" => score,
            TARGET => status,
        )
        .unwrap()
    }

    fn pipeline() -> CreditPipeline<RandomForest> {
        CreditPipeline::new(
            FeatureSchema::credit_default(),
            RandomForest::new(10).with_random_state(42),
        )
        .with_resample_seed(42)
    }

    #[test]
    fn test_fit_predict_end_to_end() {
        let df = training_frame();
        let mut pipe = pipeline();
        pipe.fit(&df).unwrap();

        let inference = df.drop(TARGET).unwrap();
        let labels = pipe.predict(&inference).unwrap();
        assert_eq!(labels.len(), df.height());
        for &l in labels.iter() {
            assert!(l == 0 || l == 1);
        }

        let proba = pipe.predict_proba(&inference).unwrap();
        for &p in proba.iter() {
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn test_single_row_prediction_works() {
        let df = training_frame();
        let mut pipe = pipeline();
        pipe.fit(&df).unwrap();

        let one = df.drop(TARGET).unwrap().slice(0, 1);
        let labels = pipe.predict(&one).unwrap();
        assert_eq!(labels.len(), 1);
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let df = training_frame();
        let pipe = pipeline();
        assert!(matches!(
            pipe.predict(&df.drop(TARGET).unwrap()),
            Err(CreditError::NotFitted)
        ));
    }

    #[test]
    fn test_fit_without_target_fails() {
        let df = training_frame().drop(TARGET).unwrap();
        let mut pipe = pipeline();
        assert!(matches!(pipe.fit(&df), Err(CreditError::Schema(_))));
    }

    #[test]
    fn test_importance_report_covers_all_features() {
        let df = training_frame();
        let mut pipe = pipeline();
        pipe.fit(&df).unwrap();

        let report = pipe.importance_report(100).unwrap();
        assert_eq!(report.ranked.len(), pipe.output_columns().len());
    }

    #[test]
    fn test_one_hot_variant_fits() {
        let df = training_frame();
        let mut pipe = CreditPipeline::new(
            FeatureSchema::credit_default(),
            RandomForest::new(5).with_random_state(42),
        )
        .with_one_hot();
        pipe.fit(&df).unwrap();

        let labels = pipe.predict(&df.drop(TARGET).unwrap()).unwrap();
        assert_eq!(labels.len(), df.height());
    }
}
