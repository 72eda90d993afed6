//! Core traits for preprocessing transformers.
//!
//! This module defines the two central traits:
//! - [`Transformer`]: Used during fitting; has hyperparameters and can learn from data.
//! - [`FittedTransformer`]: After fitting; holds learned parameters, applies them and
//!   can be serialized.
//!
//! Only [`Transformer::fit`] learns anything. A fitted value cannot be re-fitted
//! or mutated, so validation and test data can only ever pass through
//! [`FittedTransformer::transform`] with statistics learned elsewhere.

use crate::dataset::Dataset;
use crate::error::Result;
use crate::serialization::SerializableParams;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Unfitted transformer with hyperparameters.
///
/// # Example
/// ```ignore
/// use tabular_holdout::preprocessing::{FittedTransformer, StandardScaler, Transformer};
///
/// let scaler = StandardScaler::new("Temperature");
/// let fitted = scaler.fit(&train)?;
/// let scaled_validation = fitted.transform(&validation)?;
/// ```
pub trait Transformer: Clone {
    /// Output produced by the fitted transformer.
    type Output;
    /// The fitted transformer type ready for inference.
    type Fitted: FittedTransformer<Output = Self::Output>;

    /// Learn parameters from the training records.
    ///
    /// # Errors
    /// Returns [`PipelineError`](crate::error::PipelineError) if:
    /// - Data is empty
    /// - A required column is missing or holds the wrong kind of values
    /// - The learned statistics make the transform undefined
    fn fit(&self, data: &Dataset) -> Result<Self::Fitted>;

    /// Fit on `data` and transform the same records.
    ///
    /// Returns the fitted transformer alongside the transformed training data
    /// so that it can be reused on held-out data.
    fn fit_transform(&self, data: &Dataset) -> Result<(Self::Fitted, Self::Output)> {
        let fitted = self.fit(data)?;
        let output = fitted.transform(data)?;
        Ok((fitted, output))
    }
}

/// Fitted transformer ready for inference.
///
/// # Guarantees
/// - `extract_params()` + `from_params()` is a round-trip.
/// - `transform` never changes the learned parameters.
pub trait FittedTransformer: Clone {
    /// Output data type after transformation.
    type Output;
    /// Serializable representation of learned parameters.
    type Params: Serialize + DeserializeOwned;

    /// Transform records using learned parameters.
    fn transform(&self, data: &Dataset) -> Result<Self::Output>;

    /// Number of output columns.
    fn n_features_out(&self) -> usize;

    /// Names of the output columns, in output order.
    fn feature_names(&self) -> Vec<String>;

    /// Extract learned parameters as a serializable representation.
    fn extract_params(&self) -> Self::Params;

    /// Reconstruct a fitted transformer from parameters.
    fn from_params(params: Self::Params) -> Result<Self>
    where
        Self: Sized;

    /// Save the fitted transformer to a file.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.extract_params().write_to_file(path)
    }

    /// Load a fitted transformer from a file.
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self>
    where
        Self: Sized,
    {
        Self::from_params(Self::Params::read_from_file(path)?)
    }
}
