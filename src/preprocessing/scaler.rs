//! Standardization of numeric features

use crate::error::{CreditError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-column standardization parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScaleParams {
    mean: f64,
    std: f64,
}

/// Z-score scaler: `(x - mean) / std` with training-time statistics.
///
/// Statistics use the population standard deviation (ddof = 0). A column with
/// zero variance gets a scale factor of 1, so its standardized values are all
/// exactly 0 rather than NaN.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandardScaler {
    params: HashMap<String, ScaleParams>,
    is_fitted: bool,
}

impl StandardScaler {
    /// Create an unfitted scaler
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute per-column mean and std. Expects imputed (null-free) columns;
    /// any remaining nulls are ignored in the statistics.
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        for col_name in columns {
            let column = df
                .column(col_name)
                .map_err(|_| CreditError::Schema(format!("required column '{col_name}' not found")))?;
            let casted = column.as_materialized_series().cast(&DataType::Float64)?;
            let ca = casted.f64()?;

            let values: Vec<f64> = ca.into_iter().flatten().collect();
            if values.is_empty() {
                return Err(CreditError::EmptyInput(format!(
                    "column '{col_name}' has no values to fit on"
                )));
            }

            let n = values.len() as f64;
            let mean = values.iter().sum::<f64>() / n;
            let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            let std = variance.sqrt();

            self.params.insert(
                col_name.to_string(),
                ScaleParams {
                    mean,
                    std: if std == 0.0 { 1.0 } else { std },
                },
            );
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Standardize every fitted column using the stored statistics
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(CreditError::NotFitted);
        }

        let mut result = df.clone();

        for (col_name, params) in &self.params {
            let column = df
                .column(col_name)
                .map_err(|_| CreditError::Schema(format!("required column '{col_name}' not found")))?;
            let casted = column.as_materialized_series().cast(&DataType::Float64)?;
            let ca = casted.f64()?;

            let scaled: Float64Chunked = ca
                .into_iter()
                .map(|opt| opt.map(|v| (v - params.mean) / params.std))
                .collect();

            result.with_column(scaled.with_name(column.name().clone()).into_series())?;
        }

        Ok(result)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
        self.fit(df, columns)?;
        self.transform(df)
    }
}
