//! Errors for the forecasting stack (series validation, model fitting,
//! hyperparameter search, and input loading).
//!
//! This module defines the model error type, [`ForecastError`], the search
//! error type, [`SearchError`], and the loader error type, [`InputError`].
//! All implement `Display`/`Error`; under the `python-bindings` feature they
//! convert to `PyErr` at the PyO3 boundary.
//!
//! ## Conventions
//! - **Indices are 0-based** (match Rust/NumPy).
//! - Observations must be **finite**; multiplicative modes additionally
//!   require strict positivity.
//! - Optimizer/backend failures are normalized to
//!   [`ForecastError::FitFailed`] with a human-readable status; inside the
//!   search loop they are *caught and scored*, never propagated.
//! - Structural rejections (seasonal identifiability) are not errors at the
//!   trial level; only an exhausted configuration space surfaces as
//!   [`SearchError::SpaceExhausted`].
#[cfg(feature = "python-bindings")]
use pyo3::exceptions::{PyFileNotFoundError, PyValueError};
#[cfg(feature = "python-bindings")]
use pyo3::PyErr;

use crate::optimization::errors::OptError;

/// Crate-wide result alias for forecasting operations.
pub type ForecastResult<T> = Result<T, ForecastError>;

/// Result alias for search paths that may produce [`SearchError`].
pub type SearchResult<T> = Result<T, SearchError>;

/// Unified error type for forecasting.
///
/// Covers input/series validation, configuration checks, fitting failures,
/// and wrapped search/loader errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastError {
    // ---- Series validation ----
    /// Series is empty.
    EmptySeries,

    /// An observation is NaN/±inf.
    NonFiniteValue { index: usize, value: f64 },

    /// An observation is ≤ 0 where strict positivity is required
    /// (multiplicative seasonality).
    NonPositiveValue { index: usize, value: f64 },

    /// Series has too few observations for the requested operation.
    SeriesTooShort { needed: usize, actual: usize, context: &'static str },

    // ---- Configuration validation ----
    /// Forecast horizon must be at least 1.
    InvalidHorizon { horizon: usize },

    /// Seasonal period is inadmissible for the requested operation.
    InvalidPeriod { period: usize, reason: &'static str },

    /// Model family name did not parse.
    UnknownModelFamily { name: String },

    /// Seasonal mode name did not parse.
    UnknownSeasonalMode { name: String },

    /// Decomposition mode name did not parse.
    UnknownDecompositionMode { name: String },

    // ---- Estimation ----
    /// Numerical fitting failed; includes a human-readable status.
    FitFailed { status: String },

    /// Model hasn't been fitted yet.
    ModelNotFitted,

    // ---- Wrapped layers ----
    /// Hyperparameter search failed.
    Search(SearchError),

    /// Input loading failed.
    Input(InputError),
}

impl ForecastError {
    /// Whether this error is a degenerate-fit condition that the direct
    /// (non-search) forecast path converts to a missing-value output instead
    /// of propagating.
    pub fn is_degenerate_fit(&self) -> bool {
        matches!(
            self,
            ForecastError::FitFailed { .. }
                | ForecastError::SeriesTooShort { .. }
                | ForecastError::NonPositiveValue { .. }
        )
    }
}

impl std::error::Error for ForecastError {}

impl std::fmt::Display for ForecastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Series validation ----
            ForecastError::EmptySeries => {
                write!(f, "Input series is empty.")
            }
            ForecastError::NonFiniteValue { index, value } => {
                write!(f, "Observation at index {index} is non-finite: {value}")
            }
            ForecastError::NonPositiveValue { index, value } => {
                write!(f, "Observation at index {index} is non-positive: {value}")
            }
            ForecastError::SeriesTooShort { needed, actual, context } => {
                write!(f, "Series too short for {context}: need {needed}, got {actual}")
            }
            // ---- Configuration validation ----
            ForecastError::InvalidHorizon { horizon } => {
                write!(f, "Forecast horizon must be at least 1; got {horizon}")
            }
            ForecastError::InvalidPeriod { period, reason } => {
                write!(f, "Invalid seasonal period {period}: {reason}")
            }
            ForecastError::UnknownModelFamily { name } => {
                write!(
                    f,
                    "Unknown model family '{name}' (expected 'arima', 'sarima', or \
                     'exponential_smoothing')"
                )
            }
            ForecastError::UnknownSeasonalMode { name } => {
                write!(f, "Unknown seasonal mode '{name}' (expected 'add' or 'mul')")
            }
            ForecastError::UnknownDecompositionMode { name } => {
                write!(f, "Unknown decomposition mode '{name}' (expected 'add' or 'mul')")
            }
            // ---- Estimation ----
            ForecastError::FitFailed { status } => {
                write!(f, "Model fitting failed: {status}")
            }
            ForecastError::ModelNotFitted => {
                write!(f, "Model hasn't been fitted yet.")
            }
            // ---- Wrapped layers ----
            ForecastError::Search(err) => write!(f, "{err}"),
            ForecastError::Input(err) => write!(f, "{err}"),
        }
    }
}

impl From<OptError> for ForecastError {
    fn from(err: OptError) -> ForecastError {
        ForecastError::FitFailed { status: err.to_string() }
    }
}

impl From<SearchError> for ForecastError {
    fn from(err: SearchError) -> ForecastError {
        ForecastError::Search(err)
    }
}

impl From<InputError> for ForecastError {
    fn from(err: InputError) -> ForecastError {
        ForecastError::Input(err)
    }
}

/// Errors specific to the hyperparameter-search loop.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    /// Every sampled trial was structurally invalid; the configuration space
    /// is exhausted for this search run.
    SpaceExhausted { trials: usize },

    /// Search requires at least one more observation than the horizon.
    TrainWindowEmpty { len: usize, horizon: usize },
}

impl std::error::Error for SearchError {}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::SpaceExhausted { trials } => {
                write!(
                    f,
                    "Configuration space exhausted: all {trials} trials were structurally invalid"
                )
            }
            SearchError::TrainWindowEmpty { len, horizon } => {
                write!(
                    f,
                    "Series of length {len} leaves no training window for horizon {horizon}"
                )
            }
        }
    }
}

/// Errors raised while loading a series from a delimited file.
///
/// Missing file and missing column are distinct kinds so callers can report
/// them separately.
#[derive(Debug, Clone, PartialEq)]
pub enum InputError {
    /// The file does not exist or could not be opened.
    FileNotFound { path: String },

    /// The header row has no column with the requested name.
    ColumnNotFound { column: String },

    /// A cell in the requested column did not parse as a number.
    InvalidNumber { line: usize, value: String },

    /// The requested column exists but holds no rows.
    EmptyColumn { column: String },

    /// Any other I/O or CSV-layer failure.
    Io { detail: String },
}

impl std::error::Error for InputError {}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::FileNotFound { path } => {
                write!(f, "File not found: {path}")
            }
            InputError::ColumnNotFound { column } => {
                write!(f, "Column '{column}' not found in header")
            }
            InputError::InvalidNumber { line, value } => {
                write!(f, "Value '{value}' on line {line} is not a number")
            }
            InputError::EmptyColumn { column } => {
                write!(f, "Column '{column}' contains no rows")
            }
            InputError::Io { detail } => {
                write!(f, "I/O error: {detail}")
            }
        }
    }
}

/// Convert a [`ForecastError`] into a Python exception with the error message.
///
/// Used at the Rust↔Python boundary to surface domain errors cleanly. A
/// missing input file maps to `FileNotFoundError`; everything else maps to
/// `ValueError`, matching the original package's behavior.
#[cfg(feature = "python-bindings")]
impl From<ForecastError> for PyErr {
    fn from(err: ForecastError) -> PyErr {
        match &err {
            ForecastError::Input(InputError::FileNotFound { .. }) => {
                PyFileNotFoundError::new_err(err.to_string())
            }
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opt_error_normalizes_to_fit_failed() {
        let err: ForecastError = OptError::MissingThetaHat.into();
        assert!(matches!(err, ForecastError::FitFailed { .. }));
        assert!(err.is_degenerate_fit());
    }

    #[test]
    fn validation_errors_are_not_degenerate_fits() {
        assert!(!ForecastError::EmptySeries.is_degenerate_fit());
        assert!(!ForecastError::InvalidHorizon { horizon: 0 }.is_degenerate_fit());
        assert!(!ForecastError::UnknownModelFamily { name: "lstm".into() }.is_degenerate_fit());
    }

    #[test]
    fn input_error_kinds_are_distinct() {
        let missing = InputError::FileNotFound { path: "metrics.csv".into() };
        let column = InputError::ColumnNotFound { column: "value".into() };
        assert_ne!(missing, column);
        assert!(missing.to_string().contains("metrics.csv"));
        assert!(column.to_string().contains("value"));
    }

    #[test]
    fn search_exhaustion_reports_trial_count() {
        let err = SearchError::SpaceExhausted { trials: 30 };
        assert!(err.to_string().contains("30"));
        let wrapped: ForecastError = err.into();
        assert!(matches!(wrapped, ForecastError::Search(_)));
    }
}
