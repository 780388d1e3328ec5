//! Feature engineering for the credit application table
//!
//! Derives the ratio and bucket columns the classifier consumes from the raw
//! application fields. All derivations are row-local, so a single-row table
//! produces bit-identical values to the same row inside a batch.

use crate::error::{CreditError, Result};
use polars::prelude::*;

/// Age bucket label. Internal edges are left-inclusive: 25 falls in "25-35",
/// 35 in "35-50", 50 in "50+".
pub fn age_bucket(age: f64) -> &'static str {
    if age < 25.0 {
        "<25"
    } else if age < 35.0 {
        "25-35"
    } else if age < 50.0 {
        "35-50"
    } else {
        "50+"
    }
}

/// Interest-rate bucket label, same edge convention as [`age_bucket`]
pub fn interest_rate_bucket(rate: f64) -> &'static str {
    if rate < 10.0 {
        "<10%"
    } else if rate < 15.0 {
        "10-15%"
    } else if rate < 20.0 {
        "15-20%"
    } else {
        "20%+"
    }
}

fn f64_column(df: &DataFrame, name: &str) -> Result<Float64Chunked> {
    let column = df
        .column(name)
        .map_err(|_| CreditError::Schema(format!("required column '{name}' not found")))?;
    Ok(column
        .as_materialized_series()
        .cast(&DataType::Float64)?
        .f64()?
        .clone())
}

/// Element-wise `num / den`, null wherever the denominator is null or zero
fn guarded_ratio(num: &Float64Chunked, den: &Float64Chunked, name: &str) -> Series {
    let ratio: Float64Chunked = num
        .into_iter()
        .zip(den)
        .map(|(n, d)| match (n, d) {
            (Some(n), Some(d)) if d != 0.0 => Some(n / d),
            _ => None,
        })
        .collect();
    ratio.with_name(name.into()).into_series()
}

/// Derive all engineered columns. Returns a new table; the input is not
/// modified. `loan_percent_income` is always recomputed from the amount and
/// income columns, replacing any supplied value.
pub fn engineer(df: &DataFrame) -> Result<DataFrame> {
    let age = f64_column(df, "person_age")?;
    let income = f64_column(df, "person_income")?;
    let emp_exp = f64_column(df, "person_emp_exp")?;
    let amount = f64_column(df, "loan_amnt")?;
    let rate = f64_column(df, "loan_int_rate")?;
    let score = f64_column(df, "credit_score")?;

    let mut result = df.clone();

    result.with_column(guarded_ratio(&amount, &income, "loan_percent_income"))?;
    result.with_column(guarded_ratio(&income, &amount, "income_to_loan"))?;
    result.with_column(guarded_ratio(&emp_exp, &age, "emp_exp_x_age"))?;
    result.with_column(guarded_ratio(&amount, &score, "loan_over_score"))?;

    let age_bins: StringChunked = age
        .into_iter()
        .map(|opt| opt.map(age_bucket))
        .collect();
    result.with_column(age_bins.with_name("person_age_bin".into()).into_series())?;

    let rate_bins: StringChunked = rate
        .into_iter()
        .map(|opt| opt.map(interest_rate_bucket))
        .collect();
    result.with_column(rate_bins.with_name("loan_int_rate_bin".into()).into_series())?;

    Ok(result)
}
