//! Preprocessor behavior over the full credit schema

mod common;

use credit_risk::error::CreditError;
use credit_risk::features::engineer;
use credit_risk::preprocessing::{CreditPreprocessor, UNSEEN_LABEL_CODE};
use credit_risk::schema::FeatureSchema;
use polars::prelude::*;

fn engineered_frame(n: usize) -> DataFrame {
    engineer(&common::training_frame(n)).unwrap()
}

#[test]
fn output_is_numerical_then_categorical() {
    let df = engineered_frame(40);
    let schema = FeatureSchema::credit_default();
    let mut pre = CreditPreprocessor::new(schema.clone());

    let out = pre.fit_transform(&df).unwrap();

    let names: Vec<String> = out
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(names, schema.columns());
}

#[test]
fn transform_is_repeatable() {
    let df = engineered_frame(40);
    let mut pre = CreditPreprocessor::new(FeatureSchema::credit_default());
    pre.fit(&df).unwrap();

    let a = pre.transform(&df).unwrap();
    let b = pre.transform(&df).unwrap();
    assert!(a.equals(&b));
}

#[test]
fn two_fits_on_same_data_agree() {
    let df = engineered_frame(40);

    let mut first = CreditPreprocessor::new(FeatureSchema::credit_default());
    let mut second = CreditPreprocessor::new(FeatureSchema::credit_default());

    let a = first.fit_transform(&df).unwrap();
    let b = second.fit_transform(&df).unwrap();
    assert!(a.equals(&b));
}

#[test]
fn standardized_training_columns_center_on_zero() {
    let df = engineered_frame(60);
    let mut pre = CreditPreprocessor::new(FeatureSchema::credit_default());
    let out = pre.fit_transform(&df).unwrap();

    for name in ["person_age", "person_income", "credit_score"] {
        let col = out.column(name).unwrap();
        let mean = col.f64().unwrap().mean().unwrap();
        assert!(mean.abs() < 1e-9, "{name} mean {mean}");
    }
}

#[test]
fn unseen_category_encodes_as_sentinel() {
    let train = engineered_frame(40);
    let mut pre = CreditPreprocessor::new(FeatureSchema::credit_default());
    pre.fit(&train).unwrap();

    let mut novel = train.slice(0, 1);
    novel
        .with_column(Series::new("loan_intent".into(), &["SPACE_TOURISM"]))
        .unwrap();

    let out = pre.transform(&novel).unwrap();
    let code = out.column("loan_intent").unwrap().i64().unwrap().get(0);
    assert_eq!(code, Some(UNSEEN_LABEL_CODE));
}

#[test]
fn missing_values_are_imputed_with_training_statistics() {
    let train = engineered_frame(40);
    let mut pre = CreditPreprocessor::new(FeatureSchema::credit_default());
    pre.fit(&train).unwrap();

    let mut holed = train.slice(0, 3);
    holed
        .with_column(Series::new(
            "person_income".into(),
            &[None, Some(50000.0), Some(60000.0)],
        ))
        .unwrap();

    let out = pre.transform(&holed).unwrap();
    assert_eq!(out.column("person_income").unwrap().null_count(), 0);
}

#[test]
fn empty_table_is_rejected_at_fit() {
    let empty = engineered_frame(40).slice(0, 0);
    let mut pre = CreditPreprocessor::new(FeatureSchema::credit_default());
    assert!(matches!(pre.fit(&empty), Err(CreditError::EmptyInput(_))));
}

#[test]
fn save_load_roundtrip_preserves_transform() {
    let df = engineered_frame(40);
    let mut pre = CreditPreprocessor::new(FeatureSchema::credit_default());
    pre.fit(&df).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preprocessor.json");
    pre.save(path.to_str().unwrap()).unwrap();

    let loaded = CreditPreprocessor::load(path.to_str().unwrap()).unwrap();
    let a = pre.transform(&df).unwrap();
    let b = loaded.transform(&df).unwrap();
    assert!(a.equals(&b));
}
