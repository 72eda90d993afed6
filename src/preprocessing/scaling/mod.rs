//! Scaling transformers for numeric columns.
//!
//! # Example
//!
//! ```ignore
//! use tabular_holdout::preprocessing::scaling::StandardScaler;
//! use tabular_holdout::preprocessing::{FittedTransformer, Transformer};
//!
//! let scaler = StandardScaler::new("Temperature");
//! let fitted = scaler.fit(&train)?;
//! let scaled = fitted.transform(&test)?;
//! ```

pub mod standard;

pub use standard::{
    FittedStandardScaler, StandardScaler, StandardScalerConfig, StandardScalerParams,
};
