//! Ordinary least-squares linear regression.
//!
//! [`LinearRegression`] holds hyperparameters only. [`Estimator::fit`]
//! produces a [`FittedLinearRegression`] with the learned coefficients,
//! intercept and the feature names of the training matrix. The names are
//! checked on every `predict`, so a matrix with the same width but a
//! different column order is rejected instead of silently mispredicted.
//!
//! ```rust
//! use tabular_holdout::feature_matrix::FeatureMatrix;
//! use tabular_holdout::model::{Estimator, LinearRegression, Predictor};
//!
//! let x = FeatureMatrix::from_rows(&[vec![1.0], vec![2.0], vec![3.0]]).unwrap();
//! let model = LinearRegression::new().fit(&x, &[2.0, 4.0, 6.0]).unwrap();
//!
//! assert!((model.coefficients()[0] - 2.0).abs() < 1e-9);
//! assert!(model.intercept().abs() < 1e-9);
//! assert_eq!(model.predict(&x).unwrap().len(), 3);
//! ```

use crate::error::{PipelineError, Result};
use crate::feature_matrix::FeatureMatrix;
use crate::model::solver::solve_least_squares;
use crate::model::{Estimator, Predictor};
use ndarray::{ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Hyperparameters for [`LinearRegression`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressionConfig {
    /// Learn an intercept term (data are centred before solving).
    pub fit_intercept: bool,
    /// Relative singular-value cutoff; `None` uses `ε · max(rows, columns)`.
    pub rcond: Option<f64>,
}

impl Default for LinearRegressionConfig {
    fn default() -> Self {
        Self {
            fit_intercept: true,
            rcond: None,
        }
    }
}

/// Unfitted linear regression.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinearRegression {
    config: LinearRegressionConfig,
}

impl LinearRegression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to learn an intercept.
    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.config.fit_intercept = fit_intercept;
        self
    }

    /// Set the relative singular-value cutoff.
    pub fn with_rcond(mut self, rcond: f64) -> Self {
        self.config.rcond = Some(rcond);
        self
    }

    pub fn config(&self) -> &LinearRegressionConfig {
        &self.config
    }
}

impl Estimator for LinearRegression {
    type Fitted = FittedLinearRegression;

    /// Fit by ordinary least squares.
    ///
    /// # Errors
    /// - [`PipelineError::InvalidParameter`] if `rcond` is negative or not finite
    /// - [`PipelineError::DimensionMismatch`] if `labels.len()` differs from the row count
    /// - [`PipelineError::EmptyInput`] if there are no rows
    /// - [`PipelineError::NonFiniteValue`] for NaN or infinite features or labels
    /// - [`PipelineError::Numerical`] if the SVD does not converge
    fn fit(&self, features: &FeatureMatrix, labels: &[f64]) -> Result<Self::Fitted> {
        if let Some(rcond) = self.config.rcond {
            if !(rcond.is_finite() && rcond >= 0.0) {
                return Err(PipelineError::InvalidParameter(format!(
                    "rcond must be a non-negative finite number, got {}",
                    rcond
                )));
            }
        }
        if features.n_rows() != labels.len() {
            return Err(PipelineError::DimensionMismatch {
                expected: format!("{} labels", features.n_rows()),
                got: format!("{} labels", labels.len()),
            });
        }
        if features.n_rows() == 0 {
            return Err(PipelineError::EmptyInput(
                "cannot fit LinearRegression on zero rows".to_string(),
            ));
        }
        if labels.iter().any(|v| !v.is_finite()) {
            return Err(PipelineError::NonFiniteValue("labels".to_string()));
        }
        if let Some((j, _)) = features
            .data()
            .axis_iter(Axis(1))
            .enumerate()
            .find(|(_, col)| col.iter().any(|v| !v.is_finite()))
        {
            return Err(PipelineError::NonFiniteValue(
                features.feature_names()[j].clone(),
            ));
        }

        let solution = solve_least_squares(
            features.data().view(),
            ArrayView1::from(labels),
            self.config.fit_intercept,
            self.config.rcond,
        )?;

        let n_features = features.n_cols();
        if solution.rank < n_features {
            warn!(
                rank = solution.rank,
                n_features,
                n_samples = features.n_rows(),
                "rank-deficient design matrix; using the minimum-norm solution"
            );
        }
        debug!(
            n_samples = features.n_rows(),
            n_features,
            intercept = solution.intercept,
            "fitted linear regression"
        );

        Ok(FittedLinearRegression {
            coefficients: solution.coefficients.to_vec(),
            intercept: solution.intercept,
            feature_names: features.feature_names().to_vec(),
        })
    }
}

/// Serializable parameters of a fitted linear regression.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressionParams {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub feature_names: Vec<String>,
}

/// Fitted linear model `y = X β + b`.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedLinearRegression {
    coefficients: Vec<f64>,
    intercept: f64,
    feature_names: Vec<String>,
}

impl FittedLinearRegression {
    /// One coefficient per input column, in column order.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Column names of the training matrix.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Coefficient of the column called `name`.
    pub fn coefficient(&self, name: &str) -> Option<f64> {
        self.feature_names
            .iter()
            .position(|n| n == name)
            .map(|j| self.coefficients[j])
    }
}

impl Predictor for FittedLinearRegression {
    type Params = LinearRegressionParams;

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>> {
        if features.n_cols() != self.coefficients.len() {
            return Err(PipelineError::DimensionMismatch {
                expected: format!("{} feature columns", self.coefficients.len()),
                got: format!("{} feature columns", features.n_cols()),
            });
        }
        if features.feature_names() != self.feature_names.as_slice() {
            return Err(PipelineError::FeatureOrderMismatch {
                expected: self.feature_names.clone(),
                got: features.feature_names().to_vec(),
            });
        }

        let beta = ArrayView1::from(&self.coefficients[..]);
        let predictions = features.data().dot(&beta) + self.intercept;
        Ok(predictions.to_vec())
    }

    fn n_features_in(&self) -> usize {
        self.coefficients.len()
    }

    fn extract_params(&self) -> Self::Params {
        LinearRegressionParams {
            coefficients: self.coefficients.clone(),
            intercept: self.intercept,
            feature_names: self.feature_names.clone(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self> {
        if params.coefficients.len() != params.feature_names.len() {
            return Err(PipelineError::DimensionMismatch {
                expected: format!("{} coefficients", params.feature_names.len()),
                got: format!("{} coefficients", params.coefficients.len()),
            });
        }
        if !params.intercept.is_finite() || params.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(PipelineError::NonFiniteValue("coefficients".to_string()));
        }
        Ok(Self {
            coefficients: params.coefficients,
            intercept: params.intercept,
            feature_names: params.feature_names,
        })
    }
}
