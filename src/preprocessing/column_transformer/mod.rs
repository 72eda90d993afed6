//! ColumnTransformer for applying different transformers to different columns.
//!
//! Numeric columns are standardized and categorical columns are one-hot
//! encoded; the per-column outputs are concatenated into one
//! [`FeatureMatrix`](crate::feature_matrix::FeatureMatrix).

#[allow(clippy::module_inception)]
mod column_transformer;

pub use column_transformer::{
    ColumnStep, ColumnStepParams, ColumnTransformer, ColumnTransformerParams,
    FittedColumnStep, FittedColumnTransformer,
};
