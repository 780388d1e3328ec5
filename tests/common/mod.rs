//! Shared fixtures for integration tests

use polars::prelude::*;

/// A labeled application table with a roughly 3:1 class imbalance
pub fn training_frame(n: usize) -> DataFrame {
    let age: Vec<f64> = (0..n).map(|i| 21.0 + (i % 45) as f64).collect();
    let income: Vec<f64> = (0..n).map(|i| 18000.0 + 2500.0 * i as f64).collect();
    let emp: Vec<f64> = (0..n).map(|i| (i % 25) as f64).collect();
    let amount: Vec<f64> = (0..n).map(|i| 1000.0 + 800.0 * (i % 40) as f64).collect();
    let rate: Vec<f64> = (0..n).map(|i| 5.5 + 0.5 * (i % 28) as f64).collect();
    let hist: Vec<f64> = (0..n).map(|i| 2.0 + (i % 12) as f64).collect();
    let score: Vec<f64> = (0..n).map(|i| 400.0 + 9.0 * (i % 50) as f64).collect();
    let gender: Vec<&str> = (0..n)
        .map(|i| if i % 2 == 0 { "female" } else { "male" })
        .collect();
    let education: Vec<&str> = (0..n)
        .map(|i| ["High School", "Associate", "Bachelor", "Master", "Doctorate"][i % 5])
        .collect();
    let home: Vec<&str> = (0..n)
        .map(|i| ["RENT", "OWN", "MORTGAGE", "OTHER"][i % 4])
        .collect();
    let intent: Vec<&str> = (0..n)
        .map(|i| {
            [
                "PERSONAL",
                "EDUCATION",
                "MEDICAL",
                "VENTURE",
                "HOMEIMPROVEMENT",
                "DEBTCONSOLIDATION",
            ][i % 6]
        })
        .collect();
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
        "loan_status" => status,
    )
    .unwrap()
}
