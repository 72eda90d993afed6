//! # tabular-holdout
//!
//! Holdout evaluation of a linear regression on tabular records:
//!
//! - [`split`]: seeded, reproducible train/validation/test partitioning
//! - [`preprocessing`]: standardization and one-hot encoding fitted on the
//!   training partition only
//! - [`model`]: ordinary least squares with named coefficients
//! - [`metrics`]: RMSE and friends
//! - [`workflow`]: the end-to-end experiment and a persistable pipeline
//!
//! # Example
//!
//! ```rust
//! use tabular_holdout::dataset::{Dataset, Value};
//! use tabular_holdout::workflow::{HoldoutConfig, HoldoutExperiment};
//!
//! let rows = (0..100)
//!     .map(|i| {
//!         let hour = (i % 24) as f64;
//!         let season = if i % 2 == 0 { "Winter" } else { "Summer" };
//!         vec![Value::from(hour), Value::from(season), Value::from(10.0 + 2.0 * hour)]
//!     })
//!     .collect();
//! let dataset = Dataset::new(["Hour", "Seasons", "Rented Bike Count"], rows).unwrap();
//!
//! let config = HoldoutConfig::new("Rented Bike Count")
//!     .with_numeric(["Hour"])
//!     .with_categorical(["Seasons"]);
//! let run = HoldoutExperiment::new(config).unwrap().run(&dataset).unwrap();
//!
//! assert_eq!(run.report.n_test, 20);
//! assert!(run.report.test_rmse < 1e-6);
//! ```

pub mod dataset;
pub mod error;
pub mod feature_matrix;
pub mod metrics;
pub mod model;
pub mod preprocessing;
pub mod serialization;
pub mod split;
pub mod workflow;

pub use dataset::{CsvLoader, Dataset, Value, ValueKind};
pub use error::{PipelineError, Result};
pub use feature_matrix::FeatureMatrix;
pub use metrics::{mae, mse, r2_score, rmse};
pub use model::{Estimator, FittedLinearRegression, LinearRegression, Predictor};
pub use preprocessing::{
    ColumnTransformer, FittedColumnTransformer, FittedTransformer, HandleUnknown, OneHotEncoder,
    StandardScaler, Transformer,
};
pub use split::{split, train_validation_test_split, Partitions};
pub use workflow::{HoldoutConfig, HoldoutExperiment, HoldoutReport, RegressionPipeline};
