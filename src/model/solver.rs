//! Dense least-squares solver.
//!
//! The design matrix is centred (when an intercept is fitted) and factored
//! with [`nalgebra::SVD`]. Singular values at or below `rcond * σ_max` are
//! treated as zero, which yields the minimum-norm solution when `X` is rank
//! deficient. Without an explicit `rcond` the cutoff is
//! `ε · max(n_samples, n_features)`, the usual `lstsq` default.

use crate::error::{PipelineError, Result};
use nalgebra::{DMatrix, DVector, SVD};
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

/// Result of [`solve_least_squares`].
#[derive(Clone, Debug)]
pub struct LeastSquaresSolution {
    pub coefficients: Array1<f64>,
    pub intercept: f64,
    /// Number of singular values kept by the solve.
    pub rank: usize,
}

/// Relative singular-value cutoff used when none is configured.
pub fn default_rcond(n_samples: usize, n_features: usize) -> f64 {
    f64::EPSILON * n_samples.max(n_features) as f64
}

/// Minimum-norm least-squares fit of `y ≈ X β + b`.
///
/// With `fit_intercept = false` the intercept is fixed at zero and the data
/// are not centred.
pub fn solve_least_squares(
    x: ArrayView2<'_, f64>,
    y: ArrayView1<'_, f64>,
    fit_intercept: bool,
    rcond: Option<f64>,
) -> Result<LeastSquaresSolution> {
    let (n_samples, n_features) = x.dim();
    if y.len() != n_samples {
        return Err(PipelineError::DimensionMismatch {
            expected: format!("{} labels", n_samples),
            got: format!("{} labels", y.len()),
        });
    }
    if n_samples == 0 {
        return Err(PipelineError::EmptyInput(
            "cannot solve least squares without samples".to_string(),
        ));
    }

    let (x_mean, y_mean) = if fit_intercept {
        let x_mean = x
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(n_features));
        (x_mean, y.sum() / n_samples as f64)
    } else {
        (Array1::zeros(n_features), 0.0)
    };

    let (coefficients, rank) = if n_features == 0 {
        (Array1::zeros(0), 0)
    } else {
        let xc = DMatrix::from_fn(n_samples, n_features, |i, j| x[[i, j]] - x_mean[j]);
        let yc = DVector::from_iterator(n_samples, y.iter().map(|v| v - y_mean));
        let rcond = rcond.unwrap_or_else(|| default_rcond(n_samples, n_features));
        svd_solve(xc, &yc, rcond)?
    };

    let intercept = if fit_intercept {
        y_mean - x_mean.dot(&coefficients)
    } else {
        0.0
    };

    Ok(LeastSquaresSolution {
        coefficients,
        intercept,
        rank,
    })
}

fn svd_solve(xc: DMatrix<f64>, yc: &DVector<f64>, rcond: f64) -> Result<(Array1<f64>, usize)> {
    let n_features = xc.ncols();
    let svd = SVD::try_new(xc, true, true, f64::EPSILON, 0).ok_or_else(|| {
        PipelineError::Numerical("singular value decomposition did not converge".to_string())
    })?;

    let sigma_max = svd.singular_values.iter().fold(0.0f64, |m, &s| m.max(s));
    if sigma_max == 0.0 {
        return Ok((Array1::zeros(n_features), 0));
    }

    let cutoff = rcond * sigma_max;
    let rank = svd.rank(cutoff);
    let beta = svd
        .solve(yc, cutoff)
        .map_err(|e| PipelineError::Numerical(e.to_string()))?;

    Ok((beta.iter().copied().collect(), rank))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    fn residual_rms(x: &Array2<f64>, y: &Array1<f64>, sol: &LeastSquaresSolution) -> f64 {
        let predictions = x.dot(&sol.coefficients) + sol.intercept;
        let sq: f64 = (&predictions - y).iter().map(|r| r * r).sum();
        (sq / y.len() as f64).sqrt()
    }

    #[test]
    fn test_least_squares_exact_fit() {
        // y = 1 + 2 x0 - x1
        let x = array![[0.0, 1.0], [1.0, 0.0], [2.0, 3.0], [3.0, 1.0], [4.0, 2.0]];
        let y: Array1<f64> = x.rows().into_iter().map(|r| 1.0 + 2.0 * r[0] - r[1]).collect();

        let sol = solve_least_squares(x.view(), y.view(), true, None).unwrap();
        assert_eq!(sol.rank, 2);
        assert!((sol.coefficients[0] - 2.0).abs() < 1e-9);
        assert!((sol.coefficients[1] + 1.0).abs() < 1e-9);
        assert!((sol.intercept - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_least_squares_without_intercept() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![2.0, 4.0, 6.0];
        let sol = solve_least_squares(x.view(), y.view(), false, None).unwrap();
        assert!((sol.coefficients[0] - 2.0).abs() < 1e-12);
        assert_eq!(sol.intercept, 0.0);
    }

    #[test]
    fn test_least_squares_columns_of_disparate_scale() {
        // Full rank, but the second column is nine orders of magnitude smaller
        let n = 20;
        let x = Array2::from_shape_fn((n, 2), |(i, j)| {
            if j == 0 {
                1000.0 * i as f64
            } else {
                1e-6 * ((7 * i) % 5) as f64
            }
        });
        let y: Array1<f64> = x.column(0).mapv(|v| 1e6 * v);

        let sol = solve_least_squares(x.view(), y.view(), true, None).unwrap();
        assert_eq!(sol.rank, 2);
        assert!((sol.coefficients[0] - 1e6).abs() / 1e6 < 1e-9);
        let rms = residual_rms(&x, &y, &sol);
        assert!(rms < 1e-2, "residual rms = {}", rms);
    }

    #[test]
    fn test_least_squares_nearly_collinear_columns() {
        // x1 = x0 + 1e-6 * noise; y = 3 x0 + 1e6 (x1 - x0) is fitted exactly
        let n = 30;
        let x = Array2::from_shape_fn((n, 2), |(i, j)| {
            let t = 0.5 * i as f64;
            if j == 0 {
                t
            } else {
                t + 1e-6 * (((3 * i) % 7) as f64 - 3.0)
            }
        });
        let y: Array1<f64> = x
            .rows()
            .into_iter()
            .map(|r| 3.0 * r[0] + 1e6 * (r[1] - r[0]))
            .collect();

        let sol = solve_least_squares(x.view(), y.view(), true, None).unwrap();
        assert_eq!(sol.rank, 2);
        let rms = residual_rms(&x, &y, &sol);
        assert!(rms < 1e-5, "residual rms = {}", rms);
        assert!((sol.coefficients[1] - 1e6).abs() / 1e6 < 1e-4);
        assert!((sol.coefficients[0] - (3.0 - 1e6)).abs() / 1e6 < 1e-4);
    }

    #[test]
    fn test_least_squares_explicit_rcond_truncates() {
        let n = 20;
        let x = Array2::from_shape_fn((n, 2), |(i, j)| {
            if j == 0 {
                1000.0 * i as f64
            } else {
                1e-6 * ((7 * i) % 5) as f64
            }
        });
        let y: Array1<f64> = x.column(0).mapv(|v| 2.0 * v);

        let sol = solve_least_squares(x.view(), y.view(), true, Some(1e-3)).unwrap();
        assert_eq!(sol.rank, 1);
    }

    #[test]
    fn test_least_squares_duplicate_column_min_norm() {
        // Two identical columns: min-norm solution splits the weight evenly
        let x = array![
            [1.0, 1.0],
            [2.0, 2.0],
            [3.0, 3.0],
            [5.0, 5.0],
            [6.0, 6.0],
            [7.0, 7.0]
        ];
        let y: Array1<f64> = x.column(0).mapv(|v| 1.0 + 2.0 * v);
        let sol = solve_least_squares(x.view(), y.view(), true, None).unwrap();
        assert_eq!(sol.rank, 1);
        assert!((sol.coefficients[0] - 1.0).abs() < 1e-9);
        assert!((sol.coefficients[1] - 1.0).abs() < 1e-9);
        assert!((sol.intercept - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_least_squares_constant_features() {
        let x = array![[1.0], [1.0], [1.0]];
        let y = array![1.0, 2.0, 3.0];
        let sol = solve_least_squares(x.view(), y.view(), true, None).unwrap();
        assert_eq!(sol.rank, 0);
        assert_eq!(sol.coefficients[0], 0.0);
        assert!((sol.intercept - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_least_squares_no_features() {
        let x = Array2::<f64>::zeros((3, 0));
        let y = array![1.0, 2.0, 6.0];
        let sol = solve_least_squares(x.view(), y.view(), true, None).unwrap();
        assert!(sol.coefficients.is_empty());
        assert!((sol.intercept - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_least_squares_errors() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0];
        assert!(matches!(
            solve_least_squares(x.view(), y.view(), true, None),
            Err(PipelineError::DimensionMismatch { .. })
        ));

        let x = Array2::<f64>::zeros((0, 2));
        let y = Array1::<f64>::zeros(0);
        assert!(matches!(
            solve_least_squares(x.view(), y.view(), true, None),
            Err(PipelineError::EmptyInput(_))
        ));
    }

    #[test]
    fn test_default_rcond() {
        assert_eq!(default_rcond(10, 3), 10.0 * f64::EPSILON);
        assert_eq!(default_rcond(2, 5), 5.0 * f64::EPSILON);
    }
}
