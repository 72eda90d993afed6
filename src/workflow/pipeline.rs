//! Fitted preprocessing + model bundle.

use crate::dataset::Dataset;
use crate::error::{PipelineError, Result};
use crate::feature_matrix::FeatureMatrix;
use crate::model::{FittedLinearRegression, LinearRegressionParams, Predictor};
use crate::preprocessing::{ColumnTransformerParams, FittedColumnTransformer, FittedTransformer};
use crate::serialization::SerializableParams;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serializable parameters for the regression pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegressionPipelineParams {
    /// Preprocessor parameters.
    pub transformer: ColumnTransformerParams,
    /// Model parameters.
    pub model: LinearRegressionParams,
}

/// Fitted column transformer and linear model applied to raw records.
///
/// The entire pipeline can be serialized and loaded for deployment.
#[derive(Clone, Debug, PartialEq)]
pub struct RegressionPipeline {
    transformer: FittedColumnTransformer,
    model: FittedLinearRegression,
}

impl RegressionPipeline {
    /// Pair a fitted transformer with a model fitted on its output.
    ///
    /// # Errors
    /// [`PipelineError::FeatureOrderMismatch`] if the model was fitted on
    /// different columns than the transformer produces.
    pub fn new(transformer: FittedColumnTransformer, model: FittedLinearRegression) -> Result<Self> {
        if transformer.output_names() != model.feature_names() {
            return Err(PipelineError::FeatureOrderMismatch {
                expected: transformer.feature_names(),
                got: model.feature_names().to_vec(),
            });
        }
        Ok(Self { transformer, model })
    }

    pub fn transformer(&self) -> &FittedColumnTransformer {
        &self.transformer
    }

    pub fn model(&self) -> &FittedLinearRegression {
        &self.model
    }

    /// Apply the fitted column transformer.
    pub fn transform(&self, records: &Dataset) -> Result<FeatureMatrix> {
        self.transformer.transform(records)
    }

    /// Make predictions on raw records.
    pub fn predict(&self, records: &Dataset) -> Result<Vec<f64>> {
        let features = self.transform(records)?;
        self.model.predict(&features)
    }

    /// Extract parameters for serialization.
    pub fn extract_params(&self) -> RegressionPipelineParams {
        RegressionPipelineParams {
            transformer: self.transformer.extract_params(),
            model: self.model.extract_params(),
        }
    }

    /// Reconstruct from parameters.
    pub fn from_params(params: RegressionPipelineParams) -> Result<Self> {
        let transformer = FittedColumnTransformer::from_params(params.transformer)?;
        let model = FittedLinearRegression::from_params(params.model)?;
        Self::new(transformer, model)
    }

    /// Save the entire pipeline to a file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.extract_params().write_to_file(path)
    }

    /// Load a pipeline from a file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_params(RegressionPipelineParams::read_from_file(path)?)
    }
}
