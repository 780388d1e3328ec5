//! Exploratory summaries of the application table

use crate::error::{CreditError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Skewness above which a log transform is worth considering
pub const SKEW_THRESHOLD: f64 = 1.0;

/// Summary statistics for one numeric column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSummary {
    /// Column name
    pub name: String,
    /// Non-null count
    pub count: usize,
    /// Fraction of rows that are null
    pub missing_fraction: f64,
    /// Mean of non-null values
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    /// Minimum
    pub min: f64,
    /// Maximum
    pub max: f64,
    /// Fisher-Pearson skewness (g1)
    pub skewness: f64,
}

fn column_values(df: &DataFrame, name: &str) -> Result<(Vec<f64>, usize)> {
    let column = df
        .column(name)
        .map_err(|_| CreditError::Schema(format!("required column '{name}' not found")))?;
    let casted = column.as_materialized_series().cast(&DataType::Float64)?;
    let ca = casted.f64()?;
    let values: Vec<f64> = ca.into_iter().flatten().collect();
    Ok((values, column.len()))
}

/// Summarize one numeric column
pub fn summarize_column(df: &DataFrame, name: &str) -> Result<ColumnSummary> {
    let (values, total_rows) = column_values(df, name)?;
    if values.is_empty() {
        return Err(CreditError::EmptyInput(format!(
            "column '{name}' has no non-missing values"
        )));
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std = variance.sqrt();

    let skewness = if std == 0.0 {
        0.0
    } else {
        values.iter().map(|v| ((v - mean) / std).powi(3)).sum::<f64>() / n
    };

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Ok(ColumnSummary {
        name: name.to_string(),
        count: values.len(),
        missing_fraction: 1.0 - values.len() as f64 / total_rows.max(1) as f64,
        mean,
        std,
        min,
        max,
        skewness,
    })
}

/// Summarize several numeric columns
pub fn summarize(df: &DataFrame, columns: &[&str]) -> Result<Vec<ColumnSummary>> {
    columns.iter().map(|c| summarize_column(df, c)).collect()
}

/// Columns whose distribution would benefit from a `log1p` transform: skewed
/// past [`SKEW_THRESHOLD`], non-negative, and actually less skewed after the
/// transform.
pub fn suggest_log_transform(df: &DataFrame, columns: &[&str]) -> Result<Vec<String>> {
    let mut suggestions = Vec::new();

    for &name in columns {
        let summary = summarize_column(df, name)?;
        if summary.min < 0.0 || summary.skewness.abs() < SKEW_THRESHOLD {
            continue;
        }

        let (values, _) = column_values(df, name)?;
        let logged: Vec<f64> = values.iter().map(|v| v.ln_1p()).collect();
        let n = logged.len() as f64;
        let mean = logged.iter().sum::<f64>() / n;
        let std = (logged.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();
        let log_skew = if std == 0.0 {
            0.0
        } else {
            logged.iter().map(|v| ((v - mean) / std).powi(3)).sum::<f64>() / n
        };

        if log_skew.abs() < summary.skewness.abs() {
            suggestions.push(name.to_string());
        }
    }

    Ok(suggestions)
}
