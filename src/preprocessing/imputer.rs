//! Missing value imputation

use crate::error::{CreditError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Strategy for imputing missing values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImputeStrategy {
    /// Replace with the training median (numeric only)
    Median,
    /// Replace with the most frequent value; ties break toward the
    /// lexicographically smallest label so fitting is deterministic
    MostFrequent,
    /// Replace with a constant value
    Constant(f64),
}

/// Imputer for handling missing values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Imputer {
    strategy: ImputeStrategy,
    fill_values: HashMap<String, ImputeValue>,
    is_fitted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum ImputeValue {
    Numeric(f64),
    Label(String),
}

impl Imputer {
    /// Create a new imputer with the specified strategy
    pub fn new(strategy: ImputeStrategy) -> Self {
        Self {
            strategy,
            fill_values: HashMap::new(),
            is_fitted: false,
        }
    }

    /// Learn per-column fill values from the training table
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        for col_name in columns {
            let series = df
                .column(col_name)
                .map_err(|_| CreditError::Schema(format!("required column '{col_name}' not found")))?;

            let fill_value = self.compute_fill_value(series.as_materialized_series())?;
            self.fill_values.insert(col_name.to_string(), fill_value);
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Replace missing values in every fitted column using the stored fills
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(CreditError::NotFitted);
        }

        let mut result = df.clone();

        for (col_name, fill_value) in &self.fill_values {
            let series = df
                .column(col_name)
                .map_err(|_| CreditError::Schema(format!("required column '{col_name}' not found")))?;
            let filled = Self::fill_series(series.as_materialized_series(), fill_value)?;
            result.with_column(filled)?;
        }

        Ok(result)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    /// Most frequent non-null label; smallest label wins a tie
    fn compute_mode_label(series: &Series) -> Result<String> {
        let ca = series.str()?;
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for val in ca.into_iter().flatten() {
            *counts.entry(val).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .max_by(|(a_label, a_count), (b_label, b_count)| {
                a_count.cmp(b_count).then(b_label.cmp(a_label))
            })
            .map(|(label, _)| label.to_string())
            .ok_or_else(|| {
                CreditError::EmptyInput(format!(
                    "column '{}' has no non-missing values",
                    series.name()
                ))
            })
    }

    fn compute_fill_value(&self, series: &Series) -> Result<ImputeValue> {
        match &self.strategy {
            ImputeStrategy::Median => {
                let ca = series.cast(&DataType::Float64)?;
                let median = ca.f64()?.median().ok_or_else(|| {
                    CreditError::EmptyInput(format!(
                        "column '{}' has no non-missing values",
                        series.name()
                    ))
                })?;
                Ok(ImputeValue::Numeric(median))
            }
            ImputeStrategy::MostFrequent => {
                let mode = Self::compute_mode_label(series)?;
                Ok(ImputeValue::Label(mode))
            }
            ImputeStrategy::Constant(val) => Ok(ImputeValue::Numeric(*val)),
        }
    }

    fn fill_series(series: &Series, fill_value: &ImputeValue) -> Result<Series> {
        match fill_value {
            ImputeValue::Numeric(val) => {
                let casted = series.cast(&DataType::Float64)?;
                let ca = casted.f64()?;
                let filled: Float64Chunked = ca
                    .into_iter()
                    .map(|opt| Some(opt.unwrap_or(*val)))
                    .collect();
                Ok(filled.with_name(series.name().clone()).into_series())
            }
            ImputeValue::Label(val) => {
                let ca = series.str()?;
                let filled: StringChunked = ca
                    .into_iter()
                    .map(|opt| Some(opt.unwrap_or(val.as_str()).to_string()))
                    .collect();
                Ok(filled.with_name(series.name().clone()).into_series())
            }
        }
    }
}
