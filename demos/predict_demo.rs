//! Train a small model in memory and score one application record

use credit_risk::app::{predict_record, CreditRecord};
use credit_risk::model::RandomForest;
use credit_risk::pipeline::CreditPipeline;
use credit_risk::schema::FeatureSchema;
use polars::prelude::*;

fn demo_training_frame() -> DataFrame {
    let n = 60;
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
        .map(|i| ["High School", "Bachelor", "Master"][i % 3])
        .collect();
    let home: Vec<&str> = (0..n)
        .map(|i| ["RENT", "OWN", "MORTGAGE"][i % 3])
        .collect();
    let intent: Vec<&str> = (0..n)
        .map(|i| ["PERSONAL", "EDUCATION", "MEDICAL"][i % 3])
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

fn main() -> anyhow::Result<()> {
    let df = demo_training_frame();

    let mut pipeline = CreditPipeline::new(
        FeatureSchema::credit_default(),
        RandomForest::new(50).with_random_state(42),
    );
    pipeline.fit(&df)?;

    let applicant = CreditRecord {
        person_age: 27.0,
        person_gender: "male".to_string(),
        person_education: "Bachelor".to_string(),
        person_income: 45000.0,
        person_emp_exp: 4.0,
        person_home_ownership: "RENT".to_string(),
        loan_amnt: 15000.0,
        loan_intent: "MEDICAL".to_string(),
        loan_int_rate: 17.5,
        cb_person_cred_hist_length: 4.0,
        credit_score: 580.0,
    };

    let prediction = predict_record(&pipeline, &applicant)?;
    println!(
        "Prediction: {} ({:.1}% default probability)",
        prediction.label,
        prediction.probability * 100.0
    );

    let report = pipeline.importance_report(10)?;
    println!("\nTop features:\n{}", report.render());

    Ok(())
}
