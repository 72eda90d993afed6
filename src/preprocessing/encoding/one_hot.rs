//! One-hot encoding for categorical columns.
//!
//! Transforms categorical values into one-hot (dummy) indicator vectors.

use crate::dataset::Dataset;
use crate::error::{PipelineError, Result};
use crate::preprocessing::encoding::HandleUnknown;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::warn;

/// One-hot encoder for one categorical column.
///
/// The encoder learns the distinct values (categories) present in the column
/// during fitting. Categories are kept in lexicographic order, which fixes
/// the order of the output indicator columns.
///
/// # Example
/// ```ignore
/// use tabular_holdout::preprocessing::{FittedTransformer, HandleUnknown, OneHotEncoder, Transformer};
///
/// let encoder = OneHotEncoder::new("Seasons").with_handle_unknown(HandleUnknown::Error);
/// let fitted = encoder.fit(&train)?;
///
/// // Output: n x 4 matrix, columns Seasons=Autumn, Seasons=Spring, ...
/// let encoded = fitted.transform(&test)?;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct OneHotEncoder {
    column: String,
    /// How to handle unknown categories during transform.
    handle_unknown: HandleUnknown,
}

impl OneHotEncoder {
    /// Create a new OneHotEncoder for `column` with default settings.
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            handle_unknown: HandleUnknown::default(),
        }
    }

    /// Set the strategy for handling unknown categories.
    pub fn with_handle_unknown(mut self, strategy: HandleUnknown) -> Self {
        self.handle_unknown = strategy;
        self
    }

    /// Column this encoder reads.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Fit directly on a slice of training values.
    pub fn fit_values<S: AsRef<str>>(&self, values: &[S]) -> Result<FittedOneHotEncoder> {
        if values.is_empty() {
            return Err(PipelineError::EmptyInput(format!(
                "cannot fit OneHotEncoder on empty column `{}`",
                self.column
            )));
        }

        let categories: BTreeSet<&str> = values.iter().map(|v| v.as_ref()).collect();

        Ok(FittedOneHotEncoder {
            column: self.column.clone(),
            categories: categories.into_iter().map(str::to_string).collect(),
            handle_unknown: self.handle_unknown,
        })
    }
}

impl Transformer for OneHotEncoder {
    type Output = Array2<f64>;
    type Fitted = FittedOneHotEncoder;

    fn fit(&self, data: &Dataset) -> Result<Self::Fitted> {
        let values = data.categorical_column(&self.column)?;
        self.fit_values(&values)
    }
}

/// Serializable parameters for a fitted OneHotEncoder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoderParams {
    /// Source column.
    pub column: String,
    /// Categories in output order (sorted, unique).
    pub categories: Vec<String>,
    /// Handle unknown strategy.
    pub handle_unknown: HandleUnknown,
}

/// Fitted OneHotEncoder ready for inference.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedOneHotEncoder {
    column: String,
    /// Unique categories, sorted.
    categories: Vec<String>,
    handle_unknown: HandleUnknown,
}

impl FittedOneHotEncoder {
    /// Column this encoder reads.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Categories learned during fitting, in output order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn handle_unknown(&self) -> HandleUnknown {
        self.handle_unknown
    }

    /// Position of `value` in the vocabulary.
    pub fn category_index(&self, value: &str) -> Option<usize> {
        self.categories
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok()
    }

    /// Encode raw values into an `n x n_categories` indicator matrix.
    pub fn transform_values<S: AsRef<str>>(&self, values: &[S]) -> Result<Array2<f64>> {
        let mut result = Array2::<f64>::zeros((values.len(), self.categories.len()));
        let mut n_unknown = 0usize;

        for (row, value) in values.iter().enumerate() {
            let value = value.as_ref();
            match self.category_index(value) {
                Some(idx) => result[[row, idx]] = 1.0,
                None => match self.handle_unknown {
                    HandleUnknown::Error => {
                        return Err(PipelineError::UnseenCategory {
                            column: self.column.clone(),
                            value: value.to_string(),
                        });
                    }
                    // With Ignore, leave as zeros
                    HandleUnknown::Ignore => n_unknown += 1,
                },
            }
        }

        if n_unknown > 0 {
            warn!(
                column = %self.column,
                n_unknown,
                "unseen categories encoded as all-zero indicators"
            );
        }
        Ok(result)
    }

    /// Decode indicator rows back to categories.
    ///
    /// Rows without an active indicator (unknown values under
    /// [`HandleUnknown::Ignore`]) decode to `None`.
    pub fn inverse_transform(&self, encoded: ArrayView2<'_, f64>) -> Result<Vec<Option<String>>> {
        if encoded.ncols() != self.categories.len() {
            return Err(PipelineError::DimensionMismatch {
                expected: format!("{} indicator columns", self.categories.len()),
                got: format!("{} columns", encoded.ncols()),
            });
        }
        Ok(encoded
            .rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .position(|&v| v > 0.5)
                    .map(|idx| self.categories[idx].clone())
            })
            .collect())
    }
}

impl FittedTransformer for FittedOneHotEncoder {
    type Output = Array2<f64>;
    type Params = OneHotEncoderParams;

    fn transform(&self, data: &Dataset) -> Result<Self::Output> {
        let values = data.categorical_column(&self.column)?;
        self.transform_values(&values)
    }

    fn n_features_out(&self) -> usize {
        self.categories.len()
    }

    fn feature_names(&self) -> Vec<String> {
        self.categories
            .iter()
            .map(|c| format!("{}={}", self.column, c))
            .collect()
    }

    fn extract_params(&self) -> Self::Params {
        OneHotEncoderParams {
            column: self.column.clone(),
            categories: self.categories.clone(),
            handle_unknown: self.handle_unknown,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self> {
        if params.categories.is_empty() {
            return Err(PipelineError::InvalidParameter(format!(
                "encoder for `{}` has no categories",
                params.column
            )));
        }
        // Lookup relies on a strictly increasing vocabulary
        if params.categories.windows(2).any(|w| w[0] >= w[1]) {
            return Err(PipelineError::InvalidParameter(format!(
                "categories for `{}` must be sorted and unique",
                params.column
            )));
        }
        Ok(Self {
            column: params.column,
            categories: params.categories,
            handle_unknown: params.handle_unknown,
        })
    }
}
