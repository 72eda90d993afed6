//! Regression models.
//!
//! Models follow the same fit/predict split as the preprocessing
//! transformers:
//! - [`Estimator`]: unfitted model with hyperparameters; `fit` consumes a
//!   training matrix and labels and returns a fitted predictor.
//! - [`Predictor`]: fitted model ready for inference and serialization.

pub mod linear;
pub mod solver;

pub use linear::{
    FittedLinearRegression, LinearRegression, LinearRegressionConfig, LinearRegressionParams,
};

use crate::error::Result;
use crate::feature_matrix::FeatureMatrix;
use crate::serialization::SerializableParams;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Unfitted regression model.
pub trait Estimator {
    /// The fitted model type ready for inference.
    type Fitted: Predictor;

    /// Fit a new, independent model on `features` and `labels`.
    fn fit(&self, features: &FeatureMatrix, labels: &[f64]) -> Result<Self::Fitted>;
}

/// Fitted regression model.
pub trait Predictor: Clone {
    /// Serializable representation of learned parameters.
    type Params: Serialize + DeserializeOwned;

    /// Predict one value per row of `features`.
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>>;

    /// Number of columns expected at prediction time.
    fn n_features_in(&self) -> usize;

    /// Extract learned parameters as a serializable representation.
    fn extract_params(&self) -> Self::Params;

    /// Reconstruct a fitted model from parameters.
    fn from_params(params: Self::Params) -> Result<Self>
    where
        Self: Sized;

    /// Save the fitted model to a file.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.extract_params().write_to_file(path)
    }

    /// Load a fitted model from a file.
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self>
    where
        Self: Sized,
    {
        Self::from_params(Self::Params::read_from_file(path)?)
    }
}
