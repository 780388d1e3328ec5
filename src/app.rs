//! Demo form surface: field definitions, record validation, prediction
//!
//! This is the data layer behind the interactive demo. It declares the
//! twelve base input fields with their valid ranges and label sets, converts
//! one submitted record into a single-row table, and renders the pipeline's
//! answer as a label plus default probability.

use crate::error::{CreditError, Result};
use crate::model::Classifier;
use crate::pipeline::CreditPipeline;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of form field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FieldKind {
    /// Fixed label set
    Select { options: Vec<String> },
    /// Bounded numeric input
    Number { min: f64, max: f64, default: f64 },
}

/// One input field of the demo form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormField {
    /// Column name the field feeds
    pub name: String,
    /// Human-readable label
    pub label: String,
    /// Input kind with its constraints
    pub kind: FieldKind,
}

fn select(name: &str, label: &str, options: &[&str]) -> FormField {
    FormField {
        name: name.to_string(),
        label: label.to_string(),
        kind: FieldKind::Select {
            options: options.iter().map(|s| s.to_string()).collect(),
        },
    }
}

fn number(name: &str, label: &str, min: f64, max: f64, default: f64) -> FormField {
    FormField {
        name: name.to_string(),
        label: label.to_string(),
        kind: FieldKind::Number { min, max, default },
    }
}

/// The credit application form, in display order
pub fn credit_form() -> Vec<FormField> {
    vec![
        number("person_age", "Age", 18.0, 144.0, 30.0),
        select("person_gender", "Gender", &["female", "male"]),
        select(
            "person_education",
            "Education",
            &["High School", "Associate", "Bachelor", "Master", "Doctorate"],
        ),
        number("person_income", "Annual income", 0.0, 7_200_766.0, 60000.0),
        number("person_emp_exp", "Years of employment", 0.0, 125.0, 5.0),
        select(
            "person_home_ownership",
            "Home ownership",
            &["RENT", "OWN", "MORTGAGE", "OTHER"],
        ),
        number("loan_amnt", "Loan amount", 500.0, 35000.0, 10000.0),
        select(
            "loan_intent",
            "Loan intent",
            &[
                "PERSONAL",
                "EDUCATION",
                "MEDICAL",
                "VENTURE",
                "HOMEIMPROVEMENT",
                "DEBTCONSOLIDATION",
            ],
        ),
        number("loan_int_rate", "Interest rate (%)", 0.0, 30.0, 11.0),
        number(
            "cb_person_cred_hist_length",
            "Credit history length (years)",
            2.0,
            30.0,
            5.0,
        ),
        number("credit_score", "Credit score", 390.0, 850.0, 650.0),
    ]
}

/// One submitted credit application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditRecord {
    pub person_age: f64,
    pub person_gender: String,
    pub person_education: String,
    pub person_income: f64,
    pub person_emp_exp: f64,
    pub person_home_ownership: String,
    pub loan_amnt: f64,
    pub loan_intent: String,
    pub loan_int_rate: f64,
    pub cb_person_cred_hist_length: f64,
    pub credit_score: f64,
}

impl CreditRecord {
    /// Check every field against the form constraints
    pub fn validate(&self) -> Result<()> {
        for field in credit_form() {
            match &field.kind {
                FieldKind::Number { min, max, .. } => {
                    let value = self.numeric_value(&field.name)?;
                    if value < *min || value > *max {
                        return Err(CreditError::Validation(format!(
                            "{} must be between {min} and {max}, got {value}",
                            field.name
                        )));
                    }
                }
                FieldKind::Select { options } => {
                    let value = self.label_value(&field.name)?;
                    if !options.iter().any(|o| o == value) {
                        return Err(CreditError::Validation(format!(
                            "{} must be one of {options:?}, got '{value}'",
                            field.name
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn numeric_value(&self, name: &str) -> Result<f64> {
        match name {
            "person_age" => Ok(self.person_age),
            "person_income" => Ok(self.person_income),
            "person_emp_exp" => Ok(self.person_emp_exp),
            "loan_amnt" => Ok(self.loan_amnt),
            "loan_int_rate" => Ok(self.loan_int_rate),
            "cb_person_cred_hist_length" => Ok(self.cb_person_cred_hist_length),
            "credit_score" => Ok(self.credit_score),
            _ => Err(CreditError::Validation(format!(
                "unknown numeric field '{name}'"
            ))),
        }
    }

    fn label_value(&self, name: &str) -> Result<&str> {
        match name {
            "person_gender" => Ok(&self.person_gender),
            "person_education" => Ok(&self.person_education),
            "person_home_ownership" => Ok(&self.person_home_ownership),
            "loan_intent" => Ok(&self.loan_intent),
            _ => Err(CreditError::Validation(format!(
                "unknown select field '{name}'"
            ))),
        }
    }

    /// Convert into a single-row raw application table
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        Ok(df!(
            "person_age" => &[self.person_age],
            "person_gender" => &[self.person_gender.as_str()],
            "person_education" => &[self.person_education.as_str()],
            "person_income" => &[self.person_income],
            "person_emp_exp" => &[self.person_emp_exp],
            "person_home_ownership" => &[self.person_home_ownership.as_str()],
            "loan_amnt" => &[self.loan_amnt],
            "loan_intent" => &[self.loan_intent.as_str()],
            "loan_int_rate" => &[self.loan_int_rate],
            "cb_person_cred_hist_length" => &[self.cb_person_cred_hist_length],
            "credit_score" => &[self.credit_score],
        )?)
    }
}

/// Rendered prediction for one application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// "Default" or "No Default"
    pub label: String,
    /// Probability of default, in [0, 1]
    pub probability: f64,
}

/// Validate one record and run it through a fitted pipeline
pub fn predict_record<C: Classifier>(
    pipeline: &CreditPipeline<C>,
    record: &CreditRecord,
) -> Result<Prediction> {
    record.validate()?;
    let df = record.to_dataframe()?;

    let labels = pipeline.predict(&df)?;
    let proba = pipeline.predict_proba(&df)?;

    Ok(Prediction {
        label: if labels[0] == 1 {
            "Default".to_string()
        } else {
            "No Default".to_string()
        },
        probability: proba[0],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> CreditRecord {
        CreditRecord {
            person_age: 30.0,
            person_gender: "female".to_string(),
            person_education: "Bachelor".to_string(),
            person_income: 60000.0,
            person_emp_exp: 5.0,
            person_home_ownership: "RENT".to_string(),
            loan_amnt: 10000.0,
            loan_intent: "PERSONAL".to_string(),
            loan_int_rate: 11.0,
            cb_person_cred_hist_length: 5.0,
            credit_score: 650.0,
        }
    }

    #[test]
    fn test_form_has_all_base_fields() {
        let form = credit_form();
        assert_eq!(form.len(), 11);
        assert_eq!(form[0].name, "person_age");
    }

    #[test]
    fn test_valid_record_passes() {
        assert!(record().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_age_fails() {
        let mut r = record();
        r.person_age = 12.0;
        assert!(matches!(r.validate(), Err(CreditError::Validation(_))));
    }

    #[test]
    fn test_unknown_label_fails() {
        let mut r = record();
        r.loan_intent = "YACHT".to_string();
        assert!(matches!(r.validate(), Err(CreditError::Validation(_))));
    }

    #[test]
    fn test_record_to_dataframe() {
        let df = record().to_dataframe().unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(df.width(), 11);
        assert!(df.column("loan_amnt").is_ok());
    }
}
