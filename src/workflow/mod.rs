//! End-to-end holdout experiment.
//!
//! 1. Split the records into train, validation and test partitions.
//! 2. Separate the label column from each partition.
//! 3. Fit the column transformer on the training partition only.
//! 4. Transform all three partitions with the fitted transformer.
//! 5. Fit ordinary least squares on the transformed training partition.
//! 6. Report RMSE on every partition.

pub mod config;
pub mod pipeline;

pub use config::HoldoutConfig;
pub use pipeline::{RegressionPipeline, RegressionPipelineParams};

use crate::dataset::Dataset;
use crate::error::Result;
use crate::metrics::rmse;
use crate::model::{Estimator, Predictor};
use crate::preprocessing::{FittedTransformer, Transformer};
use crate::split::train_validation_test_split;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Learned coefficient of one feature column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NamedCoefficient {
    pub feature: String,
    pub value: f64,
}

/// Summary of one holdout run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HoldoutReport {
    pub n_train: usize,
    pub n_validation: usize,
    pub n_test: usize,
    pub train_rmse: f64,
    pub validation_rmse: f64,
    pub test_rmse: f64,
    pub intercept: f64,
    /// Coefficients in feature-matrix column order.
    pub coefficients: Vec<NamedCoefficient>,
}

/// Report together with the pipeline that produced it.
#[derive(Clone, Debug)]
pub struct HoldoutRun {
    pub report: HoldoutReport,
    pub pipeline: RegressionPipeline,
}

/// Runs the holdout workflow described by a [`HoldoutConfig`].
#[derive(Clone, Debug)]
pub struct HoldoutExperiment {
    config: HoldoutConfig,
}

impl HoldoutExperiment {
    /// Validate `config` and wrap it.
    pub fn new(config: HoldoutConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &HoldoutConfig {
        &self.config
    }

    /// Run the experiment on `dataset`.
    ///
    /// # Errors
    /// Any error of the underlying split, transform, fit or metric call.
    /// In particular a partition that rounds to zero records makes
    /// [`rmse`] fail with [`EmptyInput`](crate::error::PipelineError::EmptyInput).
    pub fn run(&self, dataset: &Dataset) -> Result<HoldoutRun> {
        let config = &self.config;

        let partitions = train_validation_test_split(
            dataset,
            config.test_fraction,
            config.validation_fraction,
            config.seed,
        )?;
        let (n_train, n_validation, n_test) = partitions.sizes();
        info!(n_train, n_validation, n_test, seed = config.seed, "split dataset");

        let (train_x, train_y) = partitions.train.split_target(&config.target)?;
        let (validation_x, validation_y) = partitions.validation.split_target(&config.target)?;
        let (test_x, test_y) = partitions.test.split_target(&config.target)?;

        let (transformer, train_features) = config.column_transformer().fit_transform(&train_x)?;
        let validation_features = transformer.transform(&validation_x)?;
        let test_features = transformer.transform(&test_x)?;
        info!(
            n_features = transformer.n_features_out(),
            "fitted column transformer on training partition"
        );

        let model = config.estimator().fit(&train_features, &train_y)?;

        let train_rmse = rmse(&model.predict(&train_features)?, &train_y)?;
        let validation_rmse = rmse(&model.predict(&validation_features)?, &validation_y)?;
        let test_rmse = rmse(&model.predict(&test_features)?, &test_y)?;
        info!(train_rmse, validation_rmse, test_rmse, "evaluated model");

        let report = HoldoutReport {
            n_train,
            n_validation,
            n_test,
            train_rmse,
            validation_rmse,
            test_rmse,
            intercept: model.intercept(),
            coefficients: model
                .feature_names()
                .iter()
                .zip(model.coefficients())
                .map(|(feature, &value)| NamedCoefficient {
                    feature: feature.clone(),
                    value,
                })
                .collect(),
        };

        let pipeline = RegressionPipeline::new(transformer, model)?;
        Ok(HoldoutRun { report, pipeline })
    }
}
