//! Holdout experiment configuration.
//!
//! Loaded from JSON; every field except `target` has a default:
//!
//! ```json
//! {
//!   "target": "Rented Bike Count",
//!   "numeric_columns": ["Hour", "Temperature"],
//!   "categorical_columns": ["Seasons"],
//!   "test_fraction": 0.2,
//!   "validation_fraction": 0.2,
//!   "seed": 42,
//!   "handle_unknown": "ignore",
//!   "fit_intercept": true
//! }
//! ```

use crate::error::{PipelineError, Result};
use crate::model::LinearRegression;
use crate::preprocessing::{ColumnTransformer, HandleUnknown, OneHotEncoder, StandardScaler};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

fn default_test_fraction() -> f64 {
    0.2
}

fn default_validation_fraction() -> f64 {
    0.2
}

fn default_seed() -> u64 {
    42
}

fn default_fit_intercept() -> bool {
    true
}

/// Configuration of one holdout experiment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HoldoutConfig {
    /// Numeric label column.
    pub target: String,
    /// Columns standardized before fitting.
    #[serde(default)]
    pub numeric_columns: Vec<String>,
    /// Columns one-hot encoded before fitting.
    #[serde(default)]
    pub categorical_columns: Vec<String>,
    /// Share of all records held out for testing.
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,
    /// Share of the non-test records held out for validation.
    #[serde(default = "default_validation_fraction")]
    pub validation_fraction: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Policy for categories absent from the training subset.
    #[serde(default)]
    pub handle_unknown: HandleUnknown,
    #[serde(default = "default_fit_intercept")]
    pub fit_intercept: bool,
}

impl HoldoutConfig {
    /// Configuration predicting `target` with default split settings and no
    /// feature columns yet.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            numeric_columns: Vec::new(),
            categorical_columns: Vec::new(),
            test_fraction: default_test_fraction(),
            validation_fraction: default_validation_fraction(),
            seed: default_seed(),
            handle_unknown: HandleUnknown::default(),
            fit_intercept: default_fit_intercept(),
        }
    }

    pub fn with_numeric<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numeric_columns.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn with_categorical<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categorical_columns
            .extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn with_test_fraction(mut self, fraction: f64) -> Self {
        self.test_fraction = fraction;
        self
    }

    pub fn with_validation_fraction(mut self, fraction: f64) -> Self {
        self.validation_fraction = fraction;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_handle_unknown(mut self, strategy: HandleUnknown) -> Self {
        self.handle_unknown = strategy;
        self
    }

    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Parse a JSON document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON file and validate it.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check fractions and column lists.
    ///
    /// # Errors
    /// - [`PipelineError::InvalidSplitFraction`] for a fraction outside (0, 1)
    /// - [`PipelineError::InvalidParameter`] for an empty target, no feature
    ///   columns, a column listed twice or the target listed as a feature
    pub fn validate(&self) -> Result<()> {
        for fraction in [self.test_fraction, self.validation_fraction] {
            if !(fraction > 0.0 && fraction < 1.0) {
                return Err(PipelineError::InvalidSplitFraction(fraction));
            }
        }

        if self.target.is_empty() {
            return Err(PipelineError::InvalidParameter(
                "target column name is empty".to_string(),
            ));
        }
        if self.numeric_columns.is_empty() && self.categorical_columns.is_empty() {
            return Err(PipelineError::InvalidParameter(
                "no numeric or categorical feature columns configured".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for column in self.numeric_columns.iter().chain(&self.categorical_columns) {
            if column == &self.target {
                return Err(PipelineError::InvalidParameter(format!(
                    "target `{}` is also listed as a feature",
                    column
                )));
            }
            if !seen.insert(column.as_str()) {
                return Err(PipelineError::InvalidParameter(format!(
                    "column `{}` is listed more than once",
                    column
                )));
            }
        }
        Ok(())
    }

    /// Column transformer described by this configuration.
    pub fn column_transformer(&self) -> ColumnTransformer {
        let with_scalers = self
            .numeric_columns
            .iter()
            .fold(ColumnTransformer::new(), |ct, c| {
                ct.with_scaler(StandardScaler::new(c.as_str()))
            });
        self.categorical_columns.iter().fold(with_scalers, |ct, c| {
            ct.with_encoder(OneHotEncoder::new(c.as_str()).with_handle_unknown(self.handle_unknown))
        })
    }

    /// Regression model described by this configuration.
    pub fn estimator(&self) -> LinearRegression {
        LinearRegression::new().with_fit_intercept(self.fit_intercept)
    }
}
