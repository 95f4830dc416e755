//! Load a numeric column from a delimited file into a [`Series`].
//!
//! The loading collaborator reports distinct error kinds: a missing file is
//! [`InputError::FileNotFound`], a missing header column is
//! [`InputError::ColumnNotFound`], and unparsable cells carry their line
//! number. Valid inputs always yield a non-empty series named after the
//! column.
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use ndarray::Array1;

use crate::forecasting::core::series::Series;
use crate::forecasting::errors::{ForecastResult, InputError};

/// Read one numeric column from a CSV file with a header row.
pub fn load_column(path: impl AsRef<Path>, column: &str) -> ForecastResult<Series> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => {
            InputError::FileNotFound { path: path.display().to_string() }
        }
        _ => InputError::Io { detail: err.to_string() },
    })?;

    let mut reader = csv::Reader::from_reader(file);
    let headers = reader
        .headers()
        .map_err(|err| InputError::Io { detail: err.to_string() })?;
    let column_index = headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| InputError::ColumnNotFound { column: column.to_string() })?;

    let mut values = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|err| InputError::Io { detail: err.to_string() })?;
        // Header is line 1; the first record is line 2.
        let line = row + 2;
        let cell = record.get(column_index).ok_or(InputError::InvalidNumber {
            line,
            value: String::new(),
        })?;
        let parsed: f64 = cell.trim().parse().map_err(|_| InputError::InvalidNumber {
            line,
            value: cell.to_string(),
        })?;
        values.push(parsed);
    }

    if values.is_empty() {
        return Err(InputError::EmptyColumn { column: column.to_string() }.into());
    }
    Ok(Series::new(Array1::from(values), column)?)
}
