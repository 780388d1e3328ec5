//! Categorical encoding

use crate::error::{CreditError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Code assigned to any label absent from the fitted mapping
pub const UNSEEN_LABEL_CODE: i64 = -1;

/// Ordinal encoder: one integer code per observed label.
///
/// Codes are assigned in sorted lexicographic order of the labels seen during
/// fit, so two encoders fitted on the same table produce identical mappings.
/// Labels never seen at fit time map to [`UNSEEN_LABEL_CODE`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrdinalEncoder {
    // column name -> (label -> code)
    mappings: HashMap<String, HashMap<String, i64>>,
    is_fitted: bool,
}

impl OrdinalEncoder {
    /// Create an unfitted encoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the per-column label mappings
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        for col_name in columns {
            let column = df
                .column(col_name)
                .map_err(|_| CreditError::Schema(format!("required column '{col_name}' not found")))?;
            let ca = column.as_materialized_series().str()?.clone();

            let labels: BTreeSet<&str> = ca.into_iter().flatten().collect();
            let mapping: HashMap<String, i64> = labels
                .into_iter()
                .enumerate()
                .map(|(code, label)| (label.to_string(), code as i64))
                .collect();

            self.mappings.insert(col_name.to_string(), mapping);
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Replace every fitted column with its integer codes
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(CreditError::NotFitted);
        }

        let mut result = df.clone();

        for (col_name, mapping) in &self.mappings {
            let column = df
                .column(col_name)
                .map_err(|_| CreditError::Schema(format!("required column '{col_name}' not found")))?;
            let ca = column.as_materialized_series().str()?.clone();

            let codes: Vec<i64> = ca
                .into_iter()
                .map(|v| {
                    v.and_then(|label| mapping.get(label).copied())
                        .unwrap_or(UNSEEN_LABEL_CODE)
                })
                .collect();

            result.with_column(Series::new(column.name().clone(), codes))?;
        }

        Ok(result)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    /// Fitted label -> code mapping for one column
    pub fn mapping(&self, column: &str) -> Option<&HashMap<String, i64>> {
        self.mappings.get(column)
    }
}

/// One-hot encoder used by the alternative, non-default pipeline variant.
///
/// Emits one `col=label` indicator column per label observed at fit time, in
/// sorted label order; labels unseen at fit time encode as all-zeros.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OneHotEncoder {
    // column name -> sorted labels
    categories: HashMap<String, Vec<String>>,
    column_order: Vec<String>,
    is_fitted: bool,
}

impl OneHotEncoder {
    /// Create an unfitted encoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the sorted label set of each column
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        self.column_order = columns.iter().map(|s| s.to_string()).collect();

        for col_name in columns {
            let column = df
                .column(col_name)
                .map_err(|_| CreditError::Schema(format!("required column '{col_name}' not found")))?;
            let ca = column.as_materialized_series().str()?.clone();

            let labels: BTreeSet<&str> = ca.into_iter().flatten().collect();
            self.categories.insert(
                col_name.to_string(),
                labels.into_iter().map(String::from).collect(),
            );
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Replace every fitted column with its indicator columns
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(CreditError::NotFitted);
        }

        let mut result = df.clone();

        for col_name in &self.column_order {
            let labels = &self.categories[col_name];
            let column = df
                .column(col_name)
                .map_err(|_| CreditError::Schema(format!("required column '{col_name}' not found")))?;
            let ca = column.as_materialized_series().str()?.clone();

            for label in labels {
                let indicator: Vec<i64> = ca
                    .into_iter()
                    .map(|v| i64::from(v == Some(label.as_str())))
                    .collect();
                result.with_column(Series::new(
                    format!("{col_name}={label}").into(),
                    indicator,
                ))?;
            }

            result = result.drop(col_name)?;
        }

        Ok(result)
    }

    /// Output column names, in emission order
    pub fn output_columns(&self) -> Vec<String> {
        self.column_order
            .iter()
            .flat_map(|col| {
                self.categories[col]
                    .iter()
                    .map(move |label| format!("{col}={label}"))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinal_codes_are_sorted() {
        let df = df!("home" => &["RENT", "OWN", "RENT", "OTHER"]).unwrap();

        let mut encoder = OrdinalEncoder::new();
        encoder.fit(&df, &["home"]).unwrap();

        let mapping = encoder.mapping("home").unwrap();
        assert_eq!(mapping["OTHER"], 0);
        assert_eq!(mapping["OWN"], 1);
        assert_eq!(mapping["RENT"], 2);
    }

    #[test]
    fn test_unseen_label_maps_to_sentinel() {
        let train = df!("home" => &["RENT", "OWN"]).unwrap();
        let test = df!("home" => &["MORTGAGE", "RENT"]).unwrap();

        let mut encoder = OrdinalEncoder::new();
        encoder.fit(&train, &["home"]).unwrap();
        let result = encoder.transform(&test).unwrap();

        let col = result.column("home").unwrap();
        let col = col.i64().unwrap();
        assert_eq!(col.get(0), Some(UNSEEN_LABEL_CODE));
        assert_ne!(col.get(1), Some(UNSEEN_LABEL_CODE));
    }

    #[test]
    fn test_transform_before_fit_fails() {
        let df = df!("home" => &["RENT"]).unwrap();
        let encoder = OrdinalEncoder::new();
        assert!(matches!(encoder.transform(&df), Err(CreditError::NotFitted)));
    }

    #[test]
    fn test_one_hot_expansion() {
        let df = df!("intent" => &["PERSONAL", "MEDICAL", "PERSONAL"]).unwrap();

        let mut encoder = OneHotEncoder::new();
        encoder.fit(&df, &["intent"]).unwrap();
        let result = encoder.transform(&df).unwrap();

        assert!(result.column("intent").is_err());
        let medical = result.column("intent=MEDICAL").unwrap();
        let medical = medical.i64().unwrap();
        assert_eq!(medical.get(0), Some(0));
        assert_eq!(medical.get(1), Some(1));
        assert_eq!(
            encoder.output_columns(),
            vec!["intent=MEDICAL", "intent=PERSONAL"]
        );
    }

    #[test]
    fn test_one_hot_unknown_label_all_zeros() {
        let train = df!("intent" => &["PERSONAL", "MEDICAL"]).unwrap();
        let test = df!("intent" => &["VENTURE"]).unwrap();

        let mut encoder = OneHotEncoder::new();
        encoder.fit(&train, &["intent"]).unwrap();
        let result = encoder.transform(&test).unwrap();

        for name in encoder.output_columns() {
            let col = result.column(&name).unwrap();
            let col = col.i64().unwrap();
            assert_eq!(col.get(0), Some(0), "unknown label must encode as zeros");
        }
    }
}
