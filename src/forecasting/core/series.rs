//! Validated univariate series container.
//!
//! Purpose
//! -------
//! Represent a named, positionally indexed series of `f64` observations and
//! centralize basic input checks so downstream code can assume clean data.
//!
//! Key behaviors
//! -------------
//! - Stores observations as an `ndarray::Array1<f64>` plus a name.
//! - Enforces non-emptiness and finiteness at construction time via
//!   [`Series::new`].
//! - Provides [`Series::missing`] for the degenerate-fit output contract: a
//!   sequence of NaNs of a fixed length, deliberately bypassing the
//!   finiteness check.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based; the oldest observation is at index 0, the newest at
//!   the end.
//! - Forecast outputs are named `"Forecast"`; inputs keep whatever name the
//!   loader or caller attached.
use ndarray::{Array1, ArrayView1};

use crate::forecasting::errors::{ForecastError, ForecastResult};

/// Name attached to every forecast output series.
pub const FORECAST_NAME: &str = "Forecast";

/// A named univariate series of finite `f64` observations.
///
/// Invariants (for instances built via [`Series::new`]):
/// - `values.len() > 0`.
/// - Every entry is finite.
///
/// Instances built via [`Series::missing`] intentionally violate the
/// finiteness invariant: they carry NaNs and exist only as degenerate-fit
/// outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Observed values.
    values: Array1<f64>,
    /// Series name (column name on load, `"Forecast"` on output).
    name: String,
}

impl Series {
    /// Construct a validated [`Series`] from raw observations.
    ///
    /// Returns [`ForecastError::EmptySeries`] when `values` is empty and
    /// [`ForecastError::NonFiniteValue`] for the first NaN/±inf entry.
    pub fn new(values: Array1<f64>, name: impl Into<String>) -> ForecastResult<Self> {
        if values.is_empty() {
            return Err(ForecastError::EmptySeries);
        }
        for (index, &value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(ForecastError::NonFiniteValue { index, value });
            }
        }
        Ok(Series { values, name: name.into() })
    }

    /// Construct a series from a slice, validating as [`Series::new`].
    pub fn from_slice(values: &[f64], name: impl Into<String>) -> ForecastResult<Self> {
        Series::new(Array1::from(values.to_vec()), name)
    }

    /// A series of `len` missing values (NaN).
    ///
    /// Used on degenerate-fit paths where the output shape contract
    /// (`len == horizon`) must hold but no numeric forecast exists.
    pub fn missing(name: impl Into<String>, len: usize) -> Self {
        Series { values: Array1::from_elem(len, f64::NAN), name: name.into() }
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series holds no observations.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Series name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// View of the underlying values.
    pub fn values(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }

    /// Consume the series, returning the underlying array.
    pub fn into_values(self) -> Array1<f64> {
        self.values
    }

    /// Whether every observation is NaN (a missing-value output).
    pub fn is_all_missing(&self) -> bool {
        self.values.iter().all(|v| v.is_nan())
    }

    /// Sub-series holding the first `len` observations, keeping the name.
    ///
    /// Used by the search loop to form the training window. Panics if
    /// `len` exceeds the series length; callers validate first.
    pub fn head(&self, len: usize) -> Series {
        Series {
            values: self.values.slice(ndarray::s![..len]).to_owned(),
            name: self.name.clone(),
        }
    }
}
