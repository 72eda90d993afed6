use crate::dataset::{Dataset, Value};
use crate::error::{PipelineError, Result};
use csv::{ReaderBuilder, Trim};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// CSV loader producing a [`Dataset`].
///
/// Columns declared categorical are kept as strings; every other loaded
/// column must parse as `f64`. Fields that are not valid UTF-8 are read as
/// Latin-1, so exports such as `Temperature(°C)` in Windows code pages
/// load without re-encoding.
///
/// # Example
///
/// ```no_run
/// use tabular_holdout::dataset::CsvLoader;
///
/// let dataset = CsvLoader::new()
///     .with_columns(["Hour", "Temperature", "Seasons", "Rented Bike Count"])
///     .with_categorical(["Seasons"])
///     .load("SeoulBikeData.csv")
///     .unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct CsvLoader {
    categorical: Vec<String>,
    columns: Option<Vec<String>>,
    delimiter: u8,
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvLoader {
    /// Loader for comma-separated files with a header row.
    pub fn new() -> Self {
        Self {
            categorical: Vec::new(),
            columns: None,
            delimiter: b',',
        }
    }

    /// Columns to keep as categorical tokens.
    pub fn with_categorical<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categorical = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Load only these columns, in this order.
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Load a dataset from a CSV file.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Dataset> {
        let path = path.as_ref();
        debug!("Loading CSV from {:?}", path);
        let file = File::open(path)?;
        self.load_from_reader(BufReader::new(file))
    }

    /// Load a dataset from any reader yielding CSV text.
    pub fn load_from_reader<R: Read>(&self, reader: R) -> Result<Dataset> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .byte_headers()?
            .iter()
            .map(|h| decode_field(h).into_owned())
            .collect();

        let selected: Vec<(usize, String)> = match &self.columns {
            Some(columns) => columns
                .iter()
                .map(|c| {
                    headers
                        .iter()
                        .position(|h| h == c)
                        .map(|i| (i, c.clone()))
                        .ok_or_else(|| PipelineError::ColumnNotFound(c.clone()))
                })
                .collect::<Result<_>>()?,
            None => headers.iter().cloned().enumerate().collect(),
        };

        for c in &self.categorical {
            if !selected.iter().any(|(_, name)| name == c) {
                return Err(PipelineError::ColumnNotFound(c.clone()));
            }
        }
        let is_categorical: Vec<bool> = selected
            .iter()
            .map(|(_, name)| self.categorical.contains(name))
            .collect();

        let mut rows = Vec::new();
        for (row_idx, record) in rdr.byte_records().enumerate() {
            let record = record?;
            let mut row = Vec::with_capacity(selected.len());
            for ((idx, name), &categorical) in selected.iter().zip(&is_categorical) {
                let raw = decode_field(record.get(*idx).unwrap_or_default());
                if categorical {
                    row.push(Value::Categorical(raw.into_owned()));
                } else {
                    let v: f64 = raw.parse().map_err(|_| PipelineError::Parse {
                        row: row_idx,
                        column: name.clone(),
                        value: raw.to_string(),
                    })?;
                    row.push(Value::Numeric(v));
                }
            }
            rows.push(row);
        }

        debug!("Loaded {} records with {} columns", rows.len(), selected.len());
        Dataset::new(selected.into_iter().map(|(_, name)| name), rows)
    }
}

/// UTF-8 when valid, otherwise Latin-1 (every byte maps to the same code point).
fn decode_field(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Cow::Borrowed(s),
        Err(_) => Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ValueKind;

    const BIKES: &str = "\
Date,Rented Bike Count,Hour,Temperature,Seasons,Holiday
01/12/2017,254,0,-5.2,Winter,No Holiday
01/12/2017,204,1,-5.5,Winter,No Holiday
01/06/2018,1530,18,27.1,Summer,Holiday
";

    #[test]
    fn test_load_all_columns() {
        let ds = CsvLoader::new()
            .with_categorical(["Date", "Seasons", "Holiday"])
            .load_from_reader(BIKES.as_bytes())
            .unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.columns().len(), 6);
        assert_eq!(
            ds.numeric_column("Temperature").unwrap(),
            vec![-5.2, -5.5, 27.1]
        );
        assert_eq!(ds.column_kind("Seasons").unwrap(), Some(ValueKind::Categorical));
    }

    #[test]
    fn test_load_selected_columns() {
        let ds = CsvLoader::new()
            .with_columns(["Hour", "Seasons", "Rented Bike Count"])
            .with_categorical(["Seasons"])
            .load_from_reader(BIKES.as_bytes())
            .unwrap();
        assert_eq!(
            ds.columns(),
            &[
                "Hour".to_string(),
                "Seasons".to_string(),
                "Rented Bike Count".to_string()
            ]
        );
        assert_eq!(ds.categorical_column("Seasons").unwrap()[2], "Summer");
    }

    #[test]
    fn test_unparseable_numeric() {
        // Date is left numeric on purpose
        let result = CsvLoader::new()
            .with_categorical(["Seasons", "Holiday"])
            .load_from_reader(BIKES.as_bytes());
        assert!(matches!(
            result,
            Err(PipelineError::Parse { row: 0, ref column, .. }) if column == "Date"
        ));
    }

    #[test]
    fn test_missing_selected_column() {
        let result = CsvLoader::new()
            .with_columns(["Hour", "Wind speed"])
            .load_from_reader(BIKES.as_bytes());
        assert!(matches!(result, Err(PipelineError::ColumnNotFound(ref c)) if c == "Wind speed"));
    }

    #[test]
    fn test_missing_categorical_column() {
        let result = CsvLoader::new()
            .with_columns(["Hour"])
            .with_categorical(["Seasons"])
            .load_from_reader(BIKES.as_bytes());
        assert!(matches!(result, Err(PipelineError::ColumnNotFound(_))));
    }

    #[test]
    fn test_semicolon_delimiter() {
        let text = "Hour;Seasons\n3;Autumn\n4;Autumn\n";
        let ds = CsvLoader::new()
            .with_delimiter(b';')
            .with_categorical(["Seasons"])
            .load_from_reader(text.as_bytes())
            .unwrap();
        assert_eq!(ds.numeric_column("Hour").unwrap(), vec![3.0, 4.0]);
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bikes.csv");
        std::fs::write(&path, BIKES).unwrap();
        let ds = CsvLoader::new()
            .with_columns(["Hour", "Rented Bike Count"])
            .load(&path)
            .unwrap();
        assert_eq!(ds.numeric_column("Rented Bike Count").unwrap(), vec![254.0, 204.0, 1530.0]);
    }

    #[test]
    fn test_latin1_header_and_values() {
        // "Temperature(°C)" and "Automne" with a Latin-1 degree sign / e-grave
        let mut text = b"Hour,Temperature(".to_vec();
        text.push(0xB0);
        text.extend_from_slice(b"C),Seasons\n7,12.5,Automne");
        text.push(0xE8);
        text.extend_from_slice(b"\n8,13.0,Winter\n");

        let ds = CsvLoader::new()
            .with_columns(["Hour", "Temperature(\u{b0}C)", "Seasons"])
            .with_categorical(["Seasons"])
            .load_from_reader(text.as_slice())
            .unwrap();
        assert_eq!(ds.numeric_column("Temperature(\u{b0}C)").unwrap(), vec![12.5, 13.0]);
        assert_eq!(ds.categorical_column("Seasons").unwrap()[0], "Automne\u{e8}");
    }

    #[test]
    fn test_decode_field() {
        assert_eq!(decode_field("°C".as_bytes()), "°C");
        assert_eq!(decode_field(&[b'a', 0xB0]), "a\u{b0}");
    }

    #[test]
    fn test_load_missing_file() {
        let result = CsvLoader::new().load("/no/such/bikes.csv");
        assert!(matches!(result, Err(PipelineError::Io(_))));
    }
}
