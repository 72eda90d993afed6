//! Error types for dataset handling, preprocessing, fitting and evaluation.

use crate::dataset::ValueKind;
use thiserror::Error;

/// Error type shared by every stage of the holdout pipeline.
///
/// Errors are raised at the boundary of the call that detected them
/// (`split`, `fit`, `transform`, `predict`, `rmse`, ...) and are never
/// retried or swallowed.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Split fraction outside the open interval (0, 1).
    #[error("Invalid split fraction: expected a value strictly between 0 and 1, got {0}")]
    InvalidSplitFraction(f64),

    /// A declared column is absent from the dataset.
    #[error("Column not found: `{0}`")]
    ColumnNotFound(String),

    /// A numeric column has zero standard deviation in the training data.
    #[error("Zero variance in column `{0}`: standardization is undefined")]
    ZeroVarianceColumn(String),

    /// A categorical value was not observed while fitting the encoder.
    #[error("Unseen category `{value}` in column `{column}`")]
    UnseenCategory { column: String, value: String },

    /// Row or column counts disagree between matrices, labels and coefficients.
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: String, got: String },

    /// Feature matrix columns are not in the order the model was fitted on.
    #[error("Feature order mismatch: expected {expected:?}, got {got:?}")]
    FeatureOrderMismatch {
        expected: Vec<String>,
        got: Vec<String>,
    },

    /// Predictions and labels have different lengths.
    #[error("Length mismatch: {predictions} predictions vs {labels} labels")]
    LengthMismatch { predictions: usize, labels: usize },

    /// Empty data provided where non-empty was required.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// A column holds values of the wrong kind.
    #[error("Type mismatch in column `{column}`: expected {expected} values")]
    TypeMismatch { column: String, expected: ValueKind },

    /// NaN or infinite value where a finite number is required.
    #[error("Non-finite value in `{0}`")]
    NonFiniteValue(String),

    /// Invalid hyperparameter or configuration value.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A linear-algebra routine failed to converge.
    #[error("Numerical error: {0}")]
    Numerical(String),

    /// A CSV cell in a numeric column could not be parsed.
    #[error("Cannot parse `{value}` in column `{column}` (record {row}) as a number")]
    Parse {
        row: usize,
        column: String,
        value: String,
    },

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Binary (de)serialization of fitted parameters failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// Workflow configuration could not be parsed.
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PipelineError>;
