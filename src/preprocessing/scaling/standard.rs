//! Standard Scaler (Z-score normalization).
//!
//! Transforms a numeric column by removing the mean and scaling to unit variance.
//!
//! The standard score of a sample `x` is calculated as:
//! ```text
//! z = (x - u) / s
//! ```
//! where `u` is the mean of the training samples, and `s` is the population
//! standard deviation (ddof = 0).
//!
//! # Example
//! ```ignore
//! use tabular_holdout::preprocessing::{FittedTransformer, StandardScaler, Transformer};
//!
//! let scaler = StandardScaler::new("Temperature");
//! let fitted = scaler.fit(&train)?;
//! let scaled = fitted.transform(&validation)?;
//! ```

use crate::dataset::Dataset;
use crate::error::{PipelineError, Result};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

/// Relative tolerance below which a standard deviation counts as zero.
const ZERO_STD_TOLERANCE: f64 = 1e-12;

/// Configuration for StandardScaler.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerConfig {
    /// If True, center the data before scaling.
    pub with_mean: bool,
    /// If True, scale the data to unit variance.
    pub with_std: bool,
}

impl Default for StandardScalerConfig {
    fn default() -> Self {
        Self {
            with_mean: true,
            with_std: true,
        }
    }
}

/// Serializable parameters for a fitted StandardScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerParams {
    /// Source column.
    pub column: String,
    /// Configuration options.
    pub config: StandardScalerConfig,
    /// Training mean (0 if with_mean=False).
    pub mean: f64,
    /// Training standard deviation (1 if with_std=False).
    pub std: f64,
}

/// StandardScaler transformer (unfitted) for one numeric column.
#[derive(Clone, Debug, PartialEq)]
pub struct StandardScaler {
    column: String,
    config: StandardScalerConfig,
}

impl StandardScaler {
    /// Create a new StandardScaler for `column` with default configuration.
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            config: StandardScalerConfig::default(),
        }
    }

    /// Set whether to center data by mean.
    pub fn with_mean(mut self, with_mean: bool) -> Self {
        self.config.with_mean = with_mean;
        self
    }

    /// Set whether to scale data to unit variance.
    pub fn with_std(mut self, with_std: bool) -> Self {
        self.config.with_std = with_std;
        self
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: StandardScalerConfig) -> Self {
        self.config = config;
        self
    }

    /// Column this scaler reads.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Fit directly on a slice of training values.
    pub fn fit_values(&self, values: &[f64]) -> Result<FittedStandardScaler> {
        if values.is_empty() {
            return Err(PipelineError::EmptyInput(format!(
                "cannot fit StandardScaler on empty column `{}`",
                self.column
            )));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(PipelineError::NonFiniteValue(self.column.clone()));
        }

        let (mean, std) = mean_and_std(ArrayView1::from(values));

        let std = if self.config.with_std {
            if std <= ZERO_STD_TOLERANCE * mean.abs().max(1.0) {
                return Err(PipelineError::ZeroVarianceColumn(self.column.clone()));
            }
            std
        } else {
            1.0
        };
        let mean = if self.config.with_mean { mean } else { 0.0 };

        Ok(FittedStandardScaler {
            column: self.column.clone(),
            config: self.config,
            mean,
            std,
        })
    }
}

/// Population mean and standard deviation of a non-empty view.
pub(crate) fn mean_and_std(values: ArrayView1<'_, f64>) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.sum() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

impl Transformer for StandardScaler {
    type Output = Array2<f64>;
    type Fitted = FittedStandardScaler;

    fn fit(&self, data: &Dataset) -> Result<Self::Fitted> {
        let values = data.numeric_column(&self.column)?;
        self.fit_values(&values)
    }
}

/// Fitted StandardScaler ready for inference.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedStandardScaler {
    column: String,
    config: StandardScalerConfig,
    mean: f64,
    std: f64,
}

impl FittedStandardScaler {
    /// Column this scaler reads.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Training mean.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Training standard deviation.
    pub fn std(&self) -> f64 {
        self.std
    }

    /// Scale raw values with the learned mean and std.
    pub fn transform_values(&self, values: &[f64]) -> Array1<f64> {
        values.iter().map(|v| (v - self.mean) / self.std).collect()
    }

    /// Map standardized values back to the original units.
    pub fn inverse_transform(&self, scaled: ArrayView1<'_, f64>) -> Array1<f64> {
        scaled.mapv(|z| z * self.std + self.mean)
    }
}

impl FittedTransformer for FittedStandardScaler {
    type Output = Array2<f64>;
    type Params = StandardScalerParams;

    fn transform(&self, data: &Dataset) -> Result<Self::Output> {
        let values = data.numeric_column(&self.column)?;
        Ok(self.transform_values(&values).insert_axis(Axis(1)))
    }

    fn n_features_out(&self) -> usize {
        1
    }

    fn feature_names(&self) -> Vec<String> {
        vec![self.column.clone()]
    }

    fn extract_params(&self) -> Self::Params {
        StandardScalerParams {
            column: self.column.clone(),
            config: self.config,
            mean: self.mean,
            std: self.std,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self> {
        if !params.mean.is_finite() || !params.std.is_finite() {
            return Err(PipelineError::NonFiniteValue(params.column));
        }
        if params.std <= 0.0 {
            return Err(PipelineError::ZeroVarianceColumn(params.column));
        }
        Ok(Self {
            column: params.column,
            config: params.config,
            mean: params.mean,
            std: params.std,
        })
    }
}
