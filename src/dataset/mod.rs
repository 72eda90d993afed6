//! In-memory tabular datasets.
//!
//! A [`Dataset`] is an ordered sequence of records sharing one schema. Each
//! record holds one [`Value`] per column, and every column holds a single
//! value kind (numeric or categorical) across all records.
//!
//! # Example
//!
//! ```rust
//! use tabular_holdout::dataset::{Dataset, Value};
//!
//! let ds = Dataset::new(
//!     ["Hour", "Seasons", "Rented Bike Count"],
//!     vec![
//!         vec![Value::from(8.0), Value::from("Winter"), Value::from(120.0)],
//!         vec![Value::from(18.0), Value::from("Summer"), Value::from(940.0)],
//!     ],
//! )
//! .unwrap();
//!
//! let (features, labels) = ds.split_target("Rented Bike Count").unwrap();
//! assert_eq!(features.columns(), &["Hour".to_string(), "Seasons".to_string()]);
//! assert_eq!(labels, vec![120.0, 940.0]);
//! ```

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

pub mod csv_loader;
pub use self::csv_loader::CsvLoader;

/// Kind of values stored in a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// Real-valued attribute.
    Numeric,
    /// Discrete token.
    Categorical,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Numeric => write!(f, "numeric"),
            ValueKind::Categorical => write!(f, "categorical"),
        }
    }
}

/// A single cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Numeric(f64),
    Categorical(String),
}

impl Value {
    /// Kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Numeric(_) => ValueKind::Numeric,
            Value::Categorical(_) => ValueKind::Categorical,
        }
    }

    /// Numeric payload, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Numeric(v) => Some(*v),
            Value::Categorical(_) => None,
        }
    }

    /// Categorical payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Numeric(_) => None,
            Value::Categorical(s) => Some(s),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Numeric(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Categorical(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Categorical(s)
    }
}

/// Ordered records over a fixed, named set of columns.
///
/// Construction validates the schema invariants, so every accessor can rely
/// on rectangular rows and single-kind columns.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Dataset {
    /// Build a dataset from column names and row-major records.
    ///
    /// # Errors
    /// - [`PipelineError::InvalidParameter`] for duplicate column names
    /// - [`PipelineError::DimensionMismatch`] if a row has the wrong width
    /// - [`PipelineError::TypeMismatch`] if a column mixes numeric and categorical values
    pub fn new<I, S>(columns: I, rows: Vec<Vec<Value>>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();

        let mut seen = HashSet::with_capacity(columns.len());
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(PipelineError::InvalidParameter(format!(
                    "duplicate column name `{}`",
                    name
                )));
            }
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(PipelineError::DimensionMismatch {
                    expected: format!("{} values per record", columns.len()),
                    got: format!("{} values in record {}", row.len(), i),
                });
            }
        }

        if let Some(first) = rows.first() {
            for (col, name) in columns.iter().enumerate() {
                let kind = first[col].kind();
                if rows.iter().any(|row| row[col].kind() != kind) {
                    return Err(PipelineError::TypeMismatch {
                        column: name.clone(),
                        expected: kind,
                    });
                }
            }
        }

        Ok(Self { columns, rows })
    }

    /// A dataset with the given schema and no records.
    pub fn empty<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(columns, Vec::new())
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if there are no records.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in schema order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of `name` in the schema.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| PipelineError::ColumnNotFound(name.to_string()))
    }

    /// Kind of the values in `name`, or `None` when the dataset has no records.
    pub fn column_kind(&self, name: &str) -> Result<Option<ValueKind>> {
        let idx = self.column_index(name)?;
        Ok(self.rows.first().map(|row| row[idx].kind()))
    }

    /// Record at `index`.
    pub fn row(&self, index: usize) -> Option<&[Value]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Iterate over records in order.
    pub fn rows(&self) -> impl Iterator<Item = &[Value]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Values of a numeric column.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        let idx = self.column_index(name)?;
        self.rows
            .iter()
            .map(|row| {
                row[idx].as_f64().ok_or_else(|| PipelineError::TypeMismatch {
                    column: name.to_string(),
                    expected: ValueKind::Numeric,
                })
            })
            .collect()
    }

    /// Values of a categorical column, borrowed from the dataset.
    pub fn categorical_column(&self, name: &str) -> Result<Vec<&str>> {
        let idx = self.column_index(name)?;
        self.rows
            .iter()
            .map(|row| {
                row[idx].as_str().ok_or_else(|| PipelineError::TypeMismatch {
                    column: name.to_string(),
                    expected: ValueKind::Categorical,
                })
            })
            .collect()
    }

    /// Records at `indices`, in the order given.
    pub fn take(&self, indices: &[usize]) -> Result<Self> {
        let mut rows = Vec::with_capacity(indices.len());
        for &i in indices {
            let row = self.rows.get(i).ok_or_else(|| {
                PipelineError::InvalidParameter(format!(
                    "record index {} out of bounds for {} records",
                    i,
                    self.rows.len()
                ))
            })?;
            rows.push(row.clone());
        }
        Ok(Self {
            columns: self.columns.clone(),
            rows,
        })
    }

    /// Keep only `columns`, in the order given.
    pub fn select<S: AsRef<str>>(&self, columns: &[S]) -> Result<Self> {
        let indices = columns
            .iter()
            .map(|c| self.column_index(c.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let names: Vec<String> = columns.iter().map(|c| c.as_ref().to_string()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Self::new(names, rows)
    }

    /// Remove the numeric `target` column and return it as labels.
    ///
    /// Returns `(features, labels)` where `features` keeps every other column
    /// in schema order.
    pub fn split_target(&self, target: &str) -> Result<(Self, Vec<f64>)> {
        let labels = self.numeric_column(target)?;
        let target_idx = self.column_index(target)?;

        let columns = self
            .columns
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != target_idx)
            .map(|(_, c)| c.clone())
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|&(i, _)| i != target_idx)
                    .map(|(_, v)| v.clone())
                    .collect()
            })
            .collect();

        Ok((Self { columns, rows }, labels))
    }
}
