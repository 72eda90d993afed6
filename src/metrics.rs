//! Metrics for evaluating regression models.
//!
//! Every metric takes `(predictions, labels)` of equal, non-zero length.

use crate::error::{PipelineError, Result};

fn check_lengths(predictions: &[f64], labels: &[f64]) -> Result<()> {
    if predictions.len() != labels.len() {
        return Err(PipelineError::LengthMismatch {
            predictions: predictions.len(),
            labels: labels.len(),
        });
    }
    if labels.is_empty() {
        return Err(PipelineError::EmptyInput(
            "metric of zero predictions is undefined".to_string(),
        ));
    }
    Ok(())
}

/// Calculate Mean Squared Error (MSE).
///
/// MSE = mean((y_true - y_pred)^2)
pub fn mse(predictions: &[f64], labels: &[f64]) -> Result<f64> {
    check_lengths(predictions, labels)?;
    let sum_sq: f64 = predictions
        .iter()
        .zip(labels)
        .map(|(p, t)| (p - t).powi(2))
        .sum();
    Ok(sum_sq / labels.len() as f64)
}

/// Calculate Root Mean Squared Error (RMSE).
///
/// RMSE = sqrt(MSE), in the same units as the target.
///
/// # Errors
/// - [`PipelineError::LengthMismatch`] if the sequences differ in length
/// - [`PipelineError::EmptyInput`] if both are empty
pub fn rmse(predictions: &[f64], labels: &[f64]) -> Result<f64> {
    mse(predictions, labels).map(f64::sqrt)
}

/// Calculate Mean Absolute Error (MAE).
///
/// MAE = mean(|y_true - y_pred|)
pub fn mae(predictions: &[f64], labels: &[f64]) -> Result<f64> {
    check_lengths(predictions, labels)?;
    let sum_abs: f64 = predictions
        .iter()
        .zip(labels)
        .map(|(p, t)| (p - t).abs())
        .sum();
    Ok(sum_abs / labels.len() as f64)
}

/// Coefficient of determination.
///
/// R² = 1 - SS_res / SS_tot. Undefined for constant labels, reported as
/// [`PipelineError::ZeroVarianceColumn`] named `"labels"`.
pub fn r2_score(predictions: &[f64], labels: &[f64]) -> Result<f64> {
    check_lengths(predictions, labels)?;
    let mean = labels.iter().sum::<f64>() / labels.len() as f64;
    let ss_tot: f64 = labels.iter().map(|t| (t - mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return Err(PipelineError::ZeroVarianceColumn("labels".to_string()));
    }
    let ss_res: f64 = predictions
        .iter()
        .zip(labels)
        .map(|(p, t)| (t - p).powi(2))
        .sum();
    Ok(1.0 - ss_res / ss_tot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rmse() {
        let predictions = [2.0, 4.0, 6.0];
        let labels = [1.0, 4.0, 8.0];
        // (1 + 0 + 4) / 3
        assert!((rmse(&predictions, &labels).unwrap() - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_rmse_perfect() {
        let labels = [254.0, 930.0, 1530.0];
        assert_eq!(rmse(&labels, &labels).unwrap(), 0.0);
    }

    #[test]
    fn test_rmse_length_mismatch() {
        assert!(matches!(
            rmse(&[1.0, 2.0], &[1.0]),
            Err(PipelineError::LengthMismatch {
                predictions: 2,
                labels: 1
            })
        ));
    }

    #[test]
    fn test_rmse_empty() {
        assert!(matches!(rmse(&[], &[]), Err(PipelineError::EmptyInput(_))));
    }

    #[test]
    fn test_mse_and_mae() {
        let predictions = [1.0, 2.0, 3.0, 4.0];
        let labels = [2.0, 2.0, 1.0, 4.0];
        assert!((mse(&predictions, &labels).unwrap() - 1.25).abs() < 1e-12);
        assert!((mae(&predictions, &labels).unwrap() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_r2_score() {
        let labels = [1.0, 2.0, 3.0, 4.0];
        assert!((r2_score(&labels, &labels).unwrap() - 1.0).abs() < 1e-12);

        // Predicting the mean scores zero
        let mean = [2.5; 4];
        assert!(r2_score(&mean, &labels).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_r2_score_constant_labels() {
        assert!(matches!(
            r2_score(&[1.0, 2.0], &[3.0, 3.0]),
            Err(PipelineError::ZeroVarianceColumn(ref c)) if c == "labels"
        ));
    }

    mod metrics_proptest {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_rmse_of_identical_sequences_is_zero(
                values in prop::collection::vec(-1.0e6f64..1.0e6, 1..100),
            ) {
                prop_assert_eq!(rmse(&values, &values).unwrap(), 0.0);
            }

            #[test]
            fn prop_rmse_non_negative_and_bounds_mae(
                pairs in prop::collection::vec((-1.0e3f64..1.0e3, -1.0e3f64..1.0e3), 1..100),
            ) {
                let (p, t): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
                let r = rmse(&p, &t).unwrap();
                prop_assert!(r >= 0.0);
                prop_assert!(r + 1e-9 >= mae(&p, &t).unwrap());
            }
        }
    }
}
