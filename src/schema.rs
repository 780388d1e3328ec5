//! Feature schema for the credit application table

use crate::error::{CreditError, Result};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Name of the binary target column (1 = default, 0 = repaid)
pub const TARGET: &str = "loan_status";

/// Declares which columns the pipeline treats as numerical and which as
/// categorical. Column order within each group is the emission order of the
/// preprocessor output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    numerical: Vec<String>,
    categorical: Vec<String>,
}

impl FeatureSchema {
    /// Build a schema from explicit column lists. Fails when a name appears
    /// twice, in either group or across groups.
    pub fn new<I, J, S, T>(numerical: I, categorical: J) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        let numerical: Vec<String> = numerical.into_iter().map(Into::into).collect();
        let categorical: Vec<String> = categorical.into_iter().map(Into::into).collect();

        let mut seen = HashSet::new();
        for name in numerical.iter().chain(categorical.iter()) {
            if !seen.insert(name.as_str()) {
                return Err(CreditError::Schema(format!(
                    "duplicate column '{name}' in feature schema"
                )));
            }
        }

        Ok(Self {
            numerical,
            categorical,
        })
    }

    /// The schema of the credit application table after feature engineering
    pub fn credit_default() -> Self {
        Self {
            numerical: [
                "person_age",
                "person_income",
                "person_emp_exp",
                "loan_amnt",
                "loan_int_rate",
                "loan_percent_income",
                "cb_person_cred_hist_length",
                "credit_score",
                "income_to_loan",
                "emp_exp_x_age",
                "loan_over_score",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            categorical: [
                "person_gender",
                "person_education",
                "person_home_ownership",
                "loan_intent",
                "person_age_bin",
                "loan_int_rate_bin",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }

    /// Numerical feature names, in emission order
    pub fn numerical(&self) -> &[String] {
        &self.numerical
    }

    /// Categorical feature names, in emission order
    pub fn categorical(&self) -> &[String] {
        &self.categorical
    }

    /// All feature names: numerical first, then categorical
    pub fn columns(&self) -> Vec<String> {
        self.numerical
            .iter()
            .chain(self.categorical.iter())
            .cloned()
            .collect()
    }

    /// Check that every schema column is present in the table
    pub fn validate(&self, df: &DataFrame) -> Result<()> {
        let present: HashSet<&str> = df
            .get_column_names()
            .iter()
            .map(|s| s.as_str())
            .collect();

        for name in self.numerical.iter().chain(self.categorical.iter()) {
            if !present.contains(name.as_str()) {
                return Err(CreditError::Schema(format!(
                    "required column '{name}' not found in input table"
                )));
            }
        }
        Ok(())
    }
}
