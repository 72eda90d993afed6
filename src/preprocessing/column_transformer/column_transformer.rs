//! ColumnTransformer implementation.
//!
//! Applies one transformer per named column and concatenates the results.

use crate::dataset::Dataset;
use crate::error::{PipelineError, Result};
use crate::feature_matrix::FeatureMatrix;
use crate::preprocessing::encoding::{FittedOneHotEncoder, OneHotEncoder, OneHotEncoderParams};
use crate::preprocessing::scaling::{FittedStandardScaler, StandardScaler, StandardScalerParams};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::{s, Array2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Unfitted transformer for a single column.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnStep {
    StandardScaler(StandardScaler),
    OneHotEncoder(OneHotEncoder),
}

impl ColumnStep {
    fn column(&self) -> &str {
        match self {
            ColumnStep::StandardScaler(t) => t.column(),
            ColumnStep::OneHotEncoder(t) => t.column(),
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, ColumnStep::StandardScaler(_))
    }

    fn fit(&self, data: &Dataset) -> Result<FittedColumnStep> {
        match self {
            ColumnStep::StandardScaler(t) => t.fit(data).map(FittedColumnStep::StandardScaler),
            ColumnStep::OneHotEncoder(t) => t.fit(data).map(FittedColumnStep::OneHotEncoder),
        }
    }
}

/// Fitted transformer for a single column.
#[derive(Clone, Debug, PartialEq)]
pub enum FittedColumnStep {
    StandardScaler(FittedStandardScaler),
    OneHotEncoder(FittedOneHotEncoder),
}

impl FittedColumnStep {
    fn column(&self) -> &str {
        match self {
            FittedColumnStep::StandardScaler(t) => t.column(),
            FittedColumnStep::OneHotEncoder(t) => t.column(),
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, FittedColumnStep::StandardScaler(_))
    }

    fn transform(&self, data: &Dataset) -> Result<Array2<f64>> {
        match self {
            FittedColumnStep::StandardScaler(t) => t.transform(data),
            FittedColumnStep::OneHotEncoder(t) => t.transform(data),
        }
    }

    fn n_features_out(&self) -> usize {
        match self {
            FittedColumnStep::StandardScaler(t) => t.n_features_out(),
            FittedColumnStep::OneHotEncoder(t) => t.n_features_out(),
        }
    }

    fn feature_names(&self) -> Vec<String> {
        match self {
            FittedColumnStep::StandardScaler(t) => t.feature_names(),
            FittedColumnStep::OneHotEncoder(t) => t.feature_names(),
        }
    }

    fn extract_params(&self) -> ColumnStepParams {
        match self {
            FittedColumnStep::StandardScaler(t) => ColumnStepParams::StandardScaler(t.extract_params()),
            FittedColumnStep::OneHotEncoder(t) => ColumnStepParams::OneHotEncoder(t.extract_params()),
        }
    }

    fn from_params(params: ColumnStepParams) -> Result<Self> {
        match params {
            ColumnStepParams::StandardScaler(p) => {
                FittedStandardScaler::from_params(p).map(FittedColumnStep::StandardScaler)
            }
            ColumnStepParams::OneHotEncoder(p) => {
                FittedOneHotEncoder::from_params(p).map(FittedColumnStep::OneHotEncoder)
            }
        }
    }
}

/// ColumnTransformer applies a scaler to each numeric column and a one-hot
/// encoder to each categorical column.
///
/// Output layout: numeric columns in the order they were added, then the
/// indicator groups of the categorical columns in the order they were added.
/// Columns of the input that are not named are dropped.
///
/// # Example
/// ```ignore
/// use tabular_holdout::preprocessing::{ColumnTransformer, FittedTransformer, Transformer};
///
/// let ct = ColumnTransformer::new()
///     .with_numeric(["Hour", "Temperature"])
///     .with_categorical(["Seasons"]);
///
/// let fitted = ct.fit(&train)?;
/// let features = fitted.transform(&validation)?;
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnTransformer {
    steps: Vec<ColumnStep>,
}

impl ColumnTransformer {
    /// Create a new empty ColumnTransformer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Standardize each of `columns` with a default StandardScaler.
    pub fn with_numeric<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.steps.extend(
            columns
                .into_iter()
                .map(|c| ColumnStep::StandardScaler(StandardScaler::new(c))),
        );
        self
    }

    /// One-hot encode each of `columns` with a default OneHotEncoder.
    pub fn with_categorical<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.steps.extend(
            columns
                .into_iter()
                .map(|c| ColumnStep::OneHotEncoder(OneHotEncoder::new(c))),
        );
        self
    }

    /// Add a configured StandardScaler.
    pub fn with_scaler(mut self, scaler: StandardScaler) -> Self {
        self.steps.push(ColumnStep::StandardScaler(scaler));
        self
    }

    /// Add a configured OneHotEncoder.
    pub fn with_encoder(mut self, encoder: OneHotEncoder) -> Self {
        self.steps.push(ColumnStep::OneHotEncoder(encoder));
        self
    }

    /// Get the number of column steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Transformer for ColumnTransformer {
    type Output = FeatureMatrix;
    type Fitted = FittedColumnTransformer;

    fn fit(&self, data: &Dataset) -> Result<Self::Fitted> {
        if self.steps.is_empty() {
            return Err(PipelineError::InvalidParameter(
                "Cannot fit ColumnTransformer without numeric or categorical columns".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(self.steps.len());
        for step in &self.steps {
            if !seen.insert(step.column()) {
                return Err(PipelineError::InvalidParameter(format!(
                    "column `{}` is listed more than once",
                    step.column()
                )));
            }
        }

        if data.is_empty() {
            return Err(PipelineError::EmptyInput(
                "Cannot fit ColumnTransformer on empty data".to_string(),
            ));
        }

        // Numeric outputs always precede categorical indicator groups
        let ordered = self
            .steps
            .iter()
            .filter(|s| s.is_numeric())
            .chain(self.steps.iter().filter(|s| !s.is_numeric()));

        let steps = ordered
            .map(|step| step.fit(data))
            .collect::<Result<Vec<_>>>()?;

        let fitted = FittedColumnTransformer::from_steps(steps);
        debug!(
            n_rows = data.len(),
            n_features_out = fitted.n_features_out(),
            "fitted column transformer"
        );
        Ok(fitted)
    }
}

/// Serializable parameters for one fitted column step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ColumnStepParams {
    StandardScaler(StandardScalerParams),
    OneHotEncoder(OneHotEncoderParams),
}

/// Serializable parameters for a fitted ColumnTransformer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnTransformerParams {
    /// Step parameters in output order.
    pub steps: Vec<ColumnStepParams>,
}

/// Fitted ColumnTransformer ready for inference.
///
/// Holds the statistics learned from the training subset. There is no way to
/// refit or mutate it; held-out data only passes through
/// [`FittedTransformer::transform`].
#[derive(Clone, Debug, PartialEq)]
pub struct FittedColumnTransformer {
    /// Fitted steps in output order.
    steps: Vec<FittedColumnStep>,
    /// Output column names, fixed at fit time.
    feature_names: Vec<String>,
}

impl FittedColumnTransformer {
    fn from_steps(steps: Vec<FittedColumnStep>) -> Self {
        let feature_names = steps.iter().flat_map(|s| s.feature_names()).collect();
        Self {
            steps,
            feature_names,
        }
    }

    /// Output column names in output order.
    pub fn output_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Numeric source columns, in output order.
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter_map(|s| match s {
                FittedColumnStep::StandardScaler(t) => Some(t.column()),
                FittedColumnStep::OneHotEncoder(_) => None,
            })
            .collect()
    }

    /// Categorical source columns, in output order.
    pub fn categorical_columns(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter_map(|s| match s {
                FittedColumnStep::OneHotEncoder(t) => Some(t.column()),
                FittedColumnStep::StandardScaler(_) => None,
            })
            .collect()
    }

    /// Fitted scaler for a numeric column.
    pub fn scaler(&self, column: &str) -> Option<&FittedStandardScaler> {
        self.steps.iter().find_map(|s| match s {
            FittedColumnStep::StandardScaler(t) if t.column() == column => Some(t),
            _ => None,
        })
    }

    /// Fitted encoder for a categorical column.
    pub fn encoder(&self, column: &str) -> Option<&FittedOneHotEncoder> {
        self.steps.iter().find_map(|s| match s {
            FittedColumnStep::OneHotEncoder(t) if t.column() == column => Some(t),
            _ => None,
        })
    }

    /// Fitted steps in output order.
    pub fn steps(&self) -> &[FittedColumnStep] {
        &self.steps
    }
}

impl FittedTransformer for FittedColumnTransformer {
    type Output = FeatureMatrix;
    type Params = ColumnTransformerParams;

    fn transform(&self, data: &Dataset) -> Result<Self::Output> {
        let mut result = Array2::<f64>::zeros((data.len(), self.feature_names.len()));

        let mut offset = 0;
        for step in &self.steps {
            let width = step.n_features_out();
            let block = step.transform(data)?;
            result
                .slice_mut(s![.., offset..offset + width])
                .assign(&block);
            offset += width;
        }

        FeatureMatrix::new(result, self.feature_names.clone())
    }

    fn n_features_out(&self) -> usize {
        self.feature_names.len()
    }

    fn feature_names(&self) -> Vec<String> {
        self.feature_names.clone()
    }

    fn extract_params(&self) -> Self::Params {
        ColumnTransformerParams {
            steps: self.steps.iter().map(FittedColumnStep::extract_params).collect(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self> {
        if params.steps.is_empty() {
            return Err(PipelineError::InvalidParameter(
                "ColumnTransformer params contain no steps".to_string(),
            ));
        }
        let steps = params
            .steps
            .into_iter()
            .map(FittedColumnStep::from_params)
            .collect::<Result<Vec<_>>>()?;

        let mut seen = HashSet::with_capacity(steps.len());
        if let Some(dup) = steps.iter().find(|s| !seen.insert(s.column())) {
            return Err(PipelineError::InvalidParameter(format!(
                "column `{}` is listed more than once",
                dup.column()
            )));
        }

        // Numeric blocks must precede every indicator group
        if let Some(pair) = steps
            .windows(2)
            .find(|pair| !pair[0].is_numeric() && pair[1].is_numeric())
        {
            return Err(PipelineError::InvalidParameter(format!(
                "numeric column `{}` follows categorical column `{}`",
                pair[1].column(),
                pair[0].column()
            )));
        }

        Ok(Self::from_steps(steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Value;
    use crate::preprocessing::encoding::HandleUnknown;

    fn bikes(rows: &[(f64, &str, f64)]) -> Dataset {
        let rows = rows
            .iter()
            .map(|&(h, s, t)| vec![Value::from(h), Value::from(s), Value::from(t)])
            .collect();
        Dataset::new(["Hour", "Seasons", "Temperature"], rows).unwrap()
    }

    fn train() -> Dataset {
        bikes(&[
            (0.0, "Winter", -5.0),
            (6.0, "Spring", 10.0),
            (12.0, "Summer", 28.0),
            (18.0, "Autumn", 15.0),
        ])
    }

    #[test]
    fn test_column_transformer_output_layout() {
        // Categorical listed first still lands after the numeric columns
        let ct = ColumnTransformer::new()
            .with_categorical(["Seasons"])
            .with_numeric(["Temperature", "Hour"]);
        let fitted = ct.fit(&train()).unwrap();

        assert_eq!(
            fitted.feature_names(),
            vec![
                "Temperature",
                "Hour",
                "Seasons=Autumn",
                "Seasons=Spring",
                "Seasons=Summer",
                "Seasons=Winter",
            ]
        );
        assert_eq!(fitted.n_features_out(), 6);
        assert_eq!(fitted.numeric_columns(), vec!["Temperature", "Hour"]);
        assert_eq!(fitted.categorical_columns(), vec!["Seasons"]);

        let kinds: Vec<(&str, bool)> = fitted
            .steps()
            .iter()
            .map(|step| (step.column(), step.is_numeric()))
            .collect();
        assert_eq!(
            kinds,
            vec![("Temperature", true), ("Hour", true), ("Seasons", false)]
        );
    }

    #[test]
    fn test_column_transformer_transform_values() {
        let ct = ColumnTransformer::new()
            .with_numeric(["Hour"])
            .with_categorical(["Seasons"]);
        let (fitted, features) = ct.fit_transform(&train()).unwrap();

        assert_eq!(features.n_rows(), 4);
        assert_eq!(features.n_cols(), 5);
        assert_eq!(features.feature_names(), fitted.output_names());

        // Hour: mean 9, population std sqrt(45)
        let std = 45.0f64.sqrt();
        let hour = features.column("Hour").unwrap();
        assert!((hour[0] - (-9.0 / std)).abs() < 1e-12);
        assert!((hour[3] - (9.0 / std)).abs() < 1e-12);

        // Row 0 is Winter
        assert_eq!(features.data().row(0).slice(s![1..]).to_vec(), vec![0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_column_transformer_uses_training_statistics() {
        let fitted = ColumnTransformer::new()
            .with_numeric(["Hour"])
            .fit(&train())
            .unwrap();

        let before = fitted.clone();
        let held_out = bikes(&[(9.0, "Winter", 0.0), (23.0, "Summer", 20.0)]);
        let features = fitted.transform(&held_out).unwrap();
        assert_eq!(fitted, before);
        let scaler = fitted.scaler("Hour").unwrap();
        assert!((scaler.mean() - 9.0).abs() < 1e-12);
        assert!(features.data()[[0, 0]].abs() < 1e-12);
        assert!((features.data()[[1, 0]] - 14.0 / 45.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_column_transformer_extra_columns_ignored() {
        let fitted = ColumnTransformer::new()
            .with_numeric(["Hour"])
            .fit(&train())
            .unwrap();

        let reordered = train().select(&["Temperature", "Seasons", "Hour"]).unwrap();
        let a = fitted.transform(&train()).unwrap();
        let b = fitted.transform(&reordered).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_column_transformer_empty_subset() {
        let fitted = ColumnTransformer::new()
            .with_numeric(["Hour"])
            .with_categorical(["Seasons"])
            .fit(&train())
            .unwrap();
        let empty = Dataset::empty(["Hour", "Seasons"]).unwrap();
        let features = fitted.transform(&empty).unwrap();
        assert_eq!(features.n_rows(), 0);
        assert_eq!(features.n_cols(), 5);
    }

    #[test]
    fn test_column_transformer_unseen_category() {
        let held_out = bikes(&[(3.0, "Monsoon", 1.0)]);

        let ignoring = ColumnTransformer::new()
            .with_categorical(["Seasons"])
            .fit(&train())
            .unwrap();
        let features = ignoring.transform(&held_out).unwrap();
        assert!(features.data().iter().all(|&v| v == 0.0));

        let strict = ColumnTransformer::new()
            .with_encoder(OneHotEncoder::new("Seasons").with_handle_unknown(HandleUnknown::Error))
            .fit(&train())
            .unwrap();
        assert!(matches!(
            strict.transform(&held_out),
            Err(PipelineError::UnseenCategory { .. })
        ));
    }

    #[test]
    fn test_column_transformer_missing_column() {
        let ct = ColumnTransformer::new().with_numeric(["Humidity"]);
        assert!(matches!(
            ct.fit(&train()),
            Err(PipelineError::ColumnNotFound(ref c)) if c == "Humidity"
        ));

        let fitted = ColumnTransformer::new().with_numeric(["Hour"]).fit(&train()).unwrap();
        let no_hour = train().select(&["Seasons"]).unwrap();
        assert!(matches!(
            fitted.transform(&no_hour),
            Err(PipelineError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_column_transformer_kind_mismatch() {
        let ct = ColumnTransformer::new().with_numeric(["Seasons"]);
        assert!(matches!(
            ct.fit(&train()),
            Err(PipelineError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_column_transformer_zero_variance() {
        let data = bikes(&[(1.0, "Winter", 3.0), (1.0, "Summer", 4.0)]);
        let ct = ColumnTransformer::new().with_numeric(["Hour"]);
        assert!(matches!(
            ct.fit(&data),
            Err(PipelineError::ZeroVarianceColumn(ref c)) if c == "Hour"
        ));
    }

    #[test]
    fn test_column_transformer_invalid_configuration() {
        assert!(matches!(
            ColumnTransformer::new().fit(&train()),
            Err(PipelineError::InvalidParameter(_))
        ));

        let overlapping = ColumnTransformer::new()
            .with_numeric(["Hour"])
            .with_categorical(["Hour"]);
        assert!(matches!(
            overlapping.fit(&train()),
            Err(PipelineError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_column_transformer_empty_data() {
        let ct = ColumnTransformer::new().with_numeric(["Hour"]);
        let empty = Dataset::empty(["Hour"]).unwrap();
        assert!(matches!(ct.fit(&empty), Err(PipelineError::EmptyInput(_))));
    }

    #[test]
    fn test_column_transformer_params_round_trip() {
        let fitted = ColumnTransformer::new()
            .with_numeric(["Hour", "Temperature"])
            .with_categorical(["Seasons"])
            .fit(&train())
            .unwrap();

        let restored = FittedColumnTransformer::from_params(fitted.extract_params()).unwrap();
        assert_eq!(restored, fitted);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("columns.bin");
        fitted.save_to_file(&path).unwrap();
        let loaded = FittedColumnTransformer::load_from_file(&path).unwrap();
        assert_eq!(
            loaded.transform(&train()).unwrap(),
            fitted.transform(&train()).unwrap()
        );
    }

    #[test]
    fn test_column_transformer_from_params_rejects_scaler_after_encoder() {
        let fitted = ColumnTransformer::new()
            .with_numeric(["Hour"])
            .with_categorical(["Seasons"])
            .fit(&train())
            .unwrap();

        let mut params = fitted.extract_params();
        params.steps.reverse();
        assert!(matches!(
            params.steps[0],
            ColumnStepParams::OneHotEncoder(_)
        ));
        assert!(matches!(
            FittedColumnTransformer::from_params(params),
            Err(PipelineError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_column_transformer_from_params_rejects_empty() {
        let params = ColumnTransformerParams { steps: vec![] };
        assert!(FittedColumnTransformer::from_params(params).is_err());
    }
}
