//! Column preprocessing for tabular regression.
//!
//! Transformers follow a fit/transform split:
//!
//! - [`Transformer`]: Unfitted transformer with hyperparameters
//! - [`FittedTransformer`]: Fitted transformer ready for inference
//!
//! # Available Transformers
//!
//! - [`StandardScaler`]: Z-score normalization of one numeric column
//! - [`OneHotEncoder`]: Indicator columns for one categorical column
//! - [`ColumnTransformer`]: Combines the above over a set of named columns
//!
//! # Example
//!
//! ```ignore
//! use tabular_holdout::preprocessing::{
//!     ColumnTransformer, FittedColumnTransformer, FittedTransformer, Transformer,
//! };
//!
//! let ct = ColumnTransformer::new()
//!     .with_numeric(["Hour", "Temperature"])
//!     .with_categorical(["Seasons"]);
//!
//! let fitted = ct.fit(&train)?;
//! let train_features = fitted.transform(&train)?;
//!
//! // Save for later use
//! fitted.save_to_file("columns.bin")?;
//!
//! // Later, load and transform new data
//! let loaded = FittedColumnTransformer::load_from_file("columns.bin")?;
//! let test_features = loaded.transform(&test)?;
//! ```

pub mod column_transformer;
pub mod encoding;
pub mod scaling;
pub mod traits;

pub use column_transformer::{
    ColumnStep, ColumnStepParams, ColumnTransformer, ColumnTransformerParams, FittedColumnStep,
    FittedColumnTransformer,
};
pub use encoding::{FittedOneHotEncoder, HandleUnknown, OneHotEncoder, OneHotEncoderParams};
pub use scaling::{
    FittedStandardScaler, StandardScaler, StandardScalerConfig, StandardScalerParams,
};
pub use traits::{FittedTransformer, Transformer};
