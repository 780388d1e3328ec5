//! Feature-importance reporting

use crate::error::{CreditError, Result};
use crate::model::Classifier;
use colored::Colorize;
use serde::{Deserialize, Serialize};

/// Ranked feature importances extracted from a fitted model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportanceReport {
    /// (feature name, importance), sorted descending by importance
    pub ranked: Vec<(String, f64)>,
}

impl ImportanceReport {
    /// Extract the top `top_n` importances from a fitted classifier.
    ///
    /// Fails with `UnsupportedModel` when the model exposes no importances,
    /// and with a shape error when the score vector does not line up with
    /// the feature names.
    pub fn from_classifier<C: Classifier>(
        model: &C,
        feature_names: &[String],
        top_n: usize,
    ) -> Result<Self> {
        let importances = model.feature_importances().ok_or_else(|| {
            CreditError::UnsupportedModel(
                "model does not expose feature importances".to_string(),
            )
        })?;

        if importances.len() != feature_names.len() {
            return Err(CreditError::Shape {
                expected: feature_names.len(),
                actual: importances.len(),
            });
        }

        let mut ranked: Vec<(String, f64)> = feature_names
            .iter()
            .cloned()
            .zip(importances.iter().copied())
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(top_n.max(1));

        Ok(Self { ranked })
    }

    /// Terminal bar chart, one line per feature
    pub fn render(&self) -> String {
        let max_score = self
            .ranked
            .first()
            .map(|(_, score)| *score)
            .unwrap_or(0.0)
            .max(f64::EPSILON);
        let name_width = self
            .ranked
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        for (name, score) in &self.ranked {
            let bar_len = ((score / max_score) * 40.0).round() as usize;
            let bar = "█".repeat(bar_len);
            out.push_str(&format!(
                "{:width$}  {} {:.4}\n",
                name.bold(),
                bar.cyan(),
                score,
                width = name_width
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classifier, RandomForest};
    use ndarray::{array, Array1, Array2};

    fn fitted_forest() -> (RandomForest, Vec<String>) {
        let x = array![
            [0.0, 5.0],
            [0.1, 5.0],
            [0.2, 5.0],
            [1.0, 5.0],
            [1.1, 5.0],
            [1.2, 5.0],
        ];
        let y = array![0, 0, 0, 1, 1, 1];

        let mut rf = RandomForest::new(10).with_random_state(42);
        rf.fit(&x, &y).unwrap();
        (rf, vec!["signal".to_string(), "constant".to_string()])
    }

    #[test]
    fn test_report_is_sorted_descending() {
        let (rf, names) = fitted_forest();
        let report = ImportanceReport::from_classifier(&rf, &names, 10).unwrap();

        assert_eq!(report.ranked.len(), 2);
        assert!(report.ranked[0].1 >= report.ranked[1].1);
        assert_eq!(report.ranked[0].0, "signal");
    }

    #[test]
    fn test_top_n_truncates() {
        let (rf, names) = fitted_forest();
        let report = ImportanceReport::from_classifier(&rf, &names, 1).unwrap();
        assert_eq!(report.ranked.len(), 1);
    }

    #[test]
    fn test_name_count_mismatch_fails() {
        let (rf, _) = fitted_forest();
        let wrong = vec!["only_one".to_string()];
        assert!(matches!(
            ImportanceReport::from_classifier(&rf, &wrong, 5),
            Err(CreditError::Shape { .. })
        ));
    }

    #[test]
    fn test_model_without_importances_fails() {
        struct Opaque;
        impl Classifier for Opaque {
            fn fit(&mut self, _x: &Array2<f64>, _y: &Array1<i64>) -> crate::error::Result<()> {
                Ok(())
            }
            fn predict(&self, x: &Array2<f64>) -> crate::error::Result<Array1<i64>> {
                Ok(Array1::zeros(x.nrows()))
            }
            fn predict_proba(&self, x: &Array2<f64>) -> crate::error::Result<Array1<f64>> {
                Ok(Array1::zeros(x.nrows()))
            }
        }

        let result = ImportanceReport::from_classifier(&Opaque, &["a".to_string()], 5);
        assert!(matches!(result, Err(CreditError::UnsupportedModel(_))));
    }

    #[test]
    fn test_render_contains_feature_names() {
        let (rf, names) = fitted_forest();
        let report = ImportanceReport::from_classifier(&rf, &names, 10).unwrap();
        let rendered = report.render();
        assert!(rendered.contains("signal"));
    }
}
