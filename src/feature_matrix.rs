//! Fixed-width numeric design matrix with named columns.

use crate::error::{PipelineError, Result};
use ndarray::{Array2, ArrayView1, Axis};

/// Numeric feature matrix produced by a fitted column transformer.
///
/// Each row is one input record. Column `j` is named `feature_names()[j]`;
/// the names travel with the data so that a model fitted on one column order
/// can refuse a matrix laid out differently.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureMatrix {
    data: Array2<f64>,
    feature_names: Vec<String>,
}

impl FeatureMatrix {
    /// Pair `data` with its column names.
    ///
    /// # Errors
    /// [`PipelineError::DimensionMismatch`] if the name count differs from the
    /// column count.
    pub fn new(data: Array2<f64>, feature_names: Vec<String>) -> Result<Self> {
        if data.ncols() != feature_names.len() {
            return Err(PipelineError::DimensionMismatch {
                expected: format!("{} feature names", data.ncols()),
                got: format!("{} feature names", feature_names.len()),
            });
        }
        Ok(Self {
            data,
            feature_names,
        })
    }

    /// Build from row vectors, naming columns `x0`, `x1`, ...
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let n_cols = rows.first().map(Vec::len).unwrap_or(0);
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_cols) {
            return Err(PipelineError::DimensionMismatch {
                expected: format!("{} values per row", n_cols),
                got: format!("{} values in row {}", row.len(), i),
            });
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let data = Array2::from_shape_vec((rows.len(), n_cols), flat).map_err(|e| {
            PipelineError::DimensionMismatch {
                expected: format!("{}x{}", rows.len(), n_cols),
                got: e.to_string(),
            }
        })?;
        let names = (0..n_cols).map(|j| format!("x{}", j)).collect();
        Self::new(data, names)
    }

    /// Underlying values.
    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    /// Column names in positional order.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn n_rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn n_cols(&self) -> usize {
        self.data.ncols()
    }

    /// Values of the column called `name`.
    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.feature_names
            .iter()
            .position(|n| n == name)
            .map(|j| self.data.index_axis(Axis(1), j))
    }
}
