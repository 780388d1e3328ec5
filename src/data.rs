//! Dataset loading and matrix conversion

use crate::error::{CreditError, Result};
use crate::schema::TARGET;
use ndarray::{Array1, Array2};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Load a CSV file with a header row into a DataFrame
pub fn load_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let file = File::open(path.as_ref())?;
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .into_reader_with_file_handle(file)
        .finish()?;
    if df.height() == 0 {
        return Err(CreditError::EmptyInput(format!(
            "'{}' contains no rows",
            path.as_ref().display()
        )));
    }
    Ok(df)
}

/// Convert the listed columns of a DataFrame into a dense f64 matrix, in
/// column order. Nulls are not allowed here; impute first.
pub fn to_matrix(df: &DataFrame, columns: &[String]) -> Result<Array2<f64>> {
    let n_rows = df.height();
    let n_cols = columns.len();

    let mut series = Vec::with_capacity(n_cols);
    for name in columns {
        let column = df
            .column(name)
            .map_err(|_| CreditError::Schema(format!("required column '{name}' not found")))?;
        let casted = column.as_materialized_series().cast(&DataType::Float64)?;
        if casted.null_count() > 0 {
            return Err(CreditError::Data(format!(
                "column '{name}' still contains missing values"
            )));
        }
        series.push(casted.f64()?.clone());
    }

    Ok(Array2::from_shape_fn((n_rows, n_cols), |(i, j)| {
        series[j].get(i).unwrap_or(f64::NAN)
    }))
}

/// Extract the binary target column as integer labels
pub fn target_vector(df: &DataFrame) -> Result<Array1<i64>> {
    let column = df
        .column(TARGET)
        .map_err(|_| CreditError::Schema(format!("required column '{TARGET}' not found")))?;
    let casted = column.as_materialized_series().cast(&DataType::Int64)?;
    let ca = casted.i64()?;
    if ca.null_count() > 0 {
        return Err(CreditError::Data(format!(
            "target column '{TARGET}' contains missing values"
        )));
    }
    Ok(Array1::from_iter(ca.into_iter().flatten()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_csv_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loans.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "person_age,loan_status").unwrap();
        writeln!(file, "30.0,0").unwrap();
        writeln!(file, "45.0,1").unwrap();

        let df = load_csv(&path).unwrap();
        assert_eq!(df.height(), 2);
        assert!(df.column("person_age").is_ok());
    }

    #[test]
    fn test_to_matrix_column_order() {
        let df = df!("a" => &[1.0, 2.0], "b" => &[3.0, 4.0]).unwrap();
        let m = to_matrix(&df, &["b".to_string(), "a".to_string()]).unwrap();

        assert_eq!(m.shape(), &[2, 2]);
        assert_eq!(m[[0, 0]], 3.0);
        assert_eq!(m[[0, 1]], 1.0);
    }

    #[test]
    fn test_to_matrix_rejects_nulls() {
        let df = df!("a" => &[Some(1.0), None]).unwrap();
        assert!(matches!(
            to_matrix(&df, &["a".to_string()]),
            Err(CreditError::Data(_))
        ));
    }

    #[test]
    fn test_target_vector() {
        let df = df!(TARGET => &[0i64, 1, 1]).unwrap();
        let y = target_vector(&df).unwrap();
        assert_eq!(y, ndarray::array![0, 1, 1]);
    }

    #[test]
    fn test_target_vector_missing_column_fails() {
        let df = df!("other" => &[1i64]).unwrap();
        assert!(matches!(target_vector(&df), Err(CreditError::Schema(_))));
    }
}
