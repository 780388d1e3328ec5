//! The credit-risk preprocessor: imputation, scaling, and encoding composed
//! behind one fit/transform contract

use super::{ImputeStrategy, Imputer, OneHotEncoder, OrdinalEncoder, StandardScaler};
use crate::error::{CreditError, Result};
use crate::schema::FeatureSchema;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Categorical encoding variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncoderKind {
    /// Integer codes with a sentinel for unseen labels (default)
    Ordinal,
    /// Indicator column per label; used by the alternative pipeline variant
    /// that trains without oversampling
    OneHot,
}

/// Stateful preprocessor mapping a mixed numeric/categorical application
/// table to a fully numeric one.
///
/// The feature schema is fixed at construction. `fit` learns imputation fill
/// values, scaling statistics, and label mappings from one training table;
/// `transform` reapplies them to any schema-compatible table without mutating
/// the fitted state. Output columns are the numerical features in schema
/// order followed by the categorical features in schema order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditPreprocessor {
    schema: FeatureSchema,
    encoding: EncoderKind,
    numeric_imputer: Imputer,
    categorical_imputer: Imputer,
    scaler: StandardScaler,
    ordinal: OrdinalEncoder,
    one_hot: OneHotEncoder,
    is_fitted: bool,
}

impl CreditPreprocessor {
    /// Create an unfitted preprocessor for the given schema. No computation
    /// happens here.
    pub fn new(schema: FeatureSchema) -> Self {
        Self {
            schema,
            encoding: EncoderKind::Ordinal,
            numeric_imputer: Imputer::new(ImputeStrategy::Median),
            categorical_imputer: Imputer::new(ImputeStrategy::MostFrequent),
            scaler: StandardScaler::new(),
            ordinal: OrdinalEncoder::new(),
            one_hot: OneHotEncoder::new(),
            is_fitted: false,
        }
    }

    /// Switch to one-hot categorical encoding (must be set before `fit`)
    pub fn with_one_hot(mut self) -> Self {
        self.encoding = EncoderKind::OneHot;
        self
    }

    /// The schema this preprocessor was constructed with
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Whether `fit` has completed
    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// Output column names in emission order. For ordinal encoding this is
    /// exactly `schema.columns()`; for one-hot it expands each categorical
    /// column into its indicator columns.
    pub fn output_columns(&self) -> Vec<String> {
        match self.encoding {
            EncoderKind::Ordinal => self.schema.columns(),
            EncoderKind::OneHot => {
                let mut cols: Vec<String> = self.schema.numerical().to_vec();
                cols.extend(self.one_hot.output_columns());
                cols
            }
        }
    }

    /// Learn imputation, scaling, and encoding state from the training table.
    ///
    /// Scaler statistics are computed on the imputed numerical block and the
    /// encoder is fitted on the imputed categorical block, so fill values
    /// participate in both, mirroring how the table is handled at transform
    /// time.
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        if df.height() == 0 {
            return Err(CreditError::EmptyInput(
                "cannot fit preprocessor on a table with zero rows".to_string(),
            ));
        }
        self.schema.validate(df)?;

        let num_cols: Vec<&str> = self.schema.numerical().iter().map(String::as_str).collect();
        let cat_cols: Vec<&str> = self.schema.categorical().iter().map(String::as_str).collect();

        let imputed_num = self.numeric_imputer.fit_transform(df, &num_cols)?;
        self.scaler.fit(&imputed_num, &num_cols)?;

        let imputed_cat = self.categorical_imputer.fit_transform(df, &cat_cols)?;
        match self.encoding {
            EncoderKind::Ordinal => {
                self.ordinal.fit(&imputed_cat, &cat_cols)?;
            }
            EncoderKind::OneHot => {
                self.one_hot.fit(&imputed_cat, &cat_cols)?;
            }
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Transform a schema-compatible table into a fully numeric one using the
    /// fitted state. Does not mutate `self` or the input.
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(CreditError::NotFitted);
        }
        self.schema.validate(df)?;

        let num_block = self.scaler.transform(&self.numeric_imputer.transform(df)?)?;
        let cat_imputed = self.categorical_imputer.transform(df)?;

        let mut columns: Vec<Column> = Vec::new();
        for name in self.schema.numerical() {
            columns.push(num_block.column(name)?.clone());
        }

        match self.encoding {
            EncoderKind::Ordinal => {
                let encoded = self.ordinal.transform(&cat_imputed)?;
                for name in self.schema.categorical() {
                    columns.push(encoded.column(name)?.clone());
                }
            }
            EncoderKind::OneHot => {
                let encoded = self.one_hot.transform(&cat_imputed)?;
                for name in self.one_hot.output_columns() {
                    columns.push(encoded.column(&name)?.clone());
                }
            }
        }

        Ok(DataFrame::new(columns)?)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<DataFrame> {
        self.fit(df)?;
        self.transform(df)
    }

    /// Persist the fitted state as JSON
    pub fn save(&self, path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a previously saved preprocessor
    pub fn load(path: &str) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
