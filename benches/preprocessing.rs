//! Preprocessing throughput benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use credit_risk::features::engineer;
use credit_risk::preprocessing::CreditPreprocessor;
use credit_risk::schema::FeatureSchema;
use polars::prelude::*;

fn training_frame(n: usize) -> DataFrame {
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
    )
    .unwrap()
}

fn bench_engineer(c: &mut Criterion) {
    let df = training_frame(10_000);
    c.bench_function("engineer_10k_rows", |b| {
        b.iter(|| engineer(black_box(&df)).unwrap())
    });
}

fn bench_fit_transform(c: &mut Criterion) {
    let df = engineer(&training_frame(10_000)).unwrap();
    c.bench_function("preprocessor_fit_transform_10k_rows", |b| {
        b.iter(|| {
            let mut pre = CreditPreprocessor::new(FeatureSchema::credit_default());
            pre.fit_transform(black_box(&df)).unwrap()
        })
    });
}

fn bench_transform_single_row(c: &mut Criterion) {
    let df = engineer(&training_frame(10_000)).unwrap();
    let mut pre = CreditPreprocessor::new(FeatureSchema::credit_default());
    pre.fit(&df).unwrap();
    let row = df.slice(0, 1);

    c.bench_function("preprocessor_transform_single_row", |b| {
        b.iter(|| pre.transform(black_box(&row)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_engineer,
    bench_fit_transform,
    bench_transform_single_row
);
criterion_main!(benches);
