//! rust_forecast — classical time-series forecasting with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the forecasting routines to Python via the `_rust_forecast`
//! extension module. When the `python-bindings` feature is enabled, this
//! module defines the Python-facing functions and classes.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules ([`forecasting`], [`optimization`],
//!   [`data`]) as the public crate surface.
//! - Define `#[pyfunction]` wrappers for the per-family forecast entry
//!   points, the family-dispatching `forecast`, and `decompose_series`.
//! - Wrap the decomposition result in a `#[pyclass]` whose getters expose
//!   the trend, seasonal, and residual components as NumPy arrays.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work is implemented in the inner Rust modules; this file
//!   performs only FFI glue, input validation, and error mapping.
//! - Forecast outputs returned to Python always have length equal to the
//!   requested number of steps; degenerate fits yield NaN-filled arrays.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend on [`forecasting`] directly (or its
//!   `prelude`) and can ignore the PyO3 items guarded by the
//!   `python-bindings` feature.
//! - Errors from core Rust code are propagated as rich error types
//!   internally and converted to Python exceptions at the PyO3 boundary
//!   (`ValueError`, or `FileNotFoundError` for missing input files).

pub mod data;
pub mod forecasting;
pub mod optimization;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    forecasting::{
        api,
        decompose::{decompose as decompose_inner, Decomposition, DecompositionMode},
    },
    utils::extract_series,
};

#[cfg(feature = "python-bindings")]
use crate::forecasting::core::series::Series;

/// Name attached to series extracted at the Python boundary.
#[cfg(feature = "python-bindings")]
const INPUT_SERIES_NAME: &str = "series";

/// Forecast with the model family named by `model_type`.
///
/// Mirrors the original package's dispatcher: `model_type` is one of
/// `"arima"`, `"sarima"`, or `"exponential_smoothing"`; unknown names raise
/// `ValueError` immediately.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (data, model_type, steps = 1, optimize = false),
    text_signature = "(data, model_type, /, steps=1, optimize=False)"
)]
fn forecast<'py>(
    py: Python<'py>, data: &Bound<'py, PyAny>, model_type: &str, steps: usize, optimize: bool,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let series = extract_series(py, data, INPUT_SERIES_NAME)?;
    let result = api::forecast(&series, model_type, steps, optimize).map_err(PyErr::from)?;
    Ok(result.into_values().into_raw_vec().into_pyarray(py))
}

/// ARIMA forecast (default order (1, 1, 1), or a randomized search when
/// `optimize=True`).
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (data, steps = 1, optimize = false),
    text_signature = "(data, /, steps=1, optimize=False)"
)]
fn forecast_arima<'py>(
    py: Python<'py>, data: &Bound<'py, PyAny>, steps: usize, optimize: bool,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let series = extract_series(py, data, INPUT_SERIES_NAME)?;
    let result = api::forecast_arima(&series, steps, optimize).map_err(PyErr::from)?;
    Ok(result.into_values().into_raw_vec().into_pyarray(py))
}

/// Seasonal ARIMA forecast (default (1, 1, 1)(1, 1, 1, 12), or a randomized
/// search when `optimize=True`).
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (data, steps = 1, optimize = false),
    text_signature = "(data, /, steps=1, optimize=False)"
)]
fn forecast_sarima<'py>(
    py: Python<'py>, data: &Bound<'py, PyAny>, steps: usize, optimize: bool,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let series = extract_series(py, data, INPUT_SERIES_NAME)?;
    let result = api::forecast_sarima(&series, steps, optimize).map_err(PyErr::from)?;
    Ok(result.into_values().into_raw_vec().into_pyarray(py))
}

/// Exponential-smoothing forecast (additive, period 12 by default, or a
/// randomized search when `optimize=True`).
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (data, steps = 1, optimize = false),
    text_signature = "(data, /, steps=1, optimize=False)"
)]
fn forecast_exponential_smoothing<'py>(
    py: Python<'py>, data: &Bound<'py, PyAny>, steps: usize, optimize: bool,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let series = extract_series(py, data, INPUT_SERIES_NAME)?;
    let result =
        api::forecast_exponential_smoothing(&series, steps, optimize).map_err(PyErr::from)?;
    Ok(result.into_values().into_raw_vec().into_pyarray(py))
}

/// SeasonalDecomposition — Python-facing decomposition result.
///
/// Exposes `observed`, `trend`, `seasonal`, and `resid` as NumPy arrays;
/// `trend` and `resid` are NaN over the edge half-windows where the centered
/// moving average is undefined.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_forecast")]
pub struct SeasonalDecomposition {
    inner: Decomposition,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl SeasonalDecomposition {
    #[getter]
    pub fn observed<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner.observed.values().to_vec().into_pyarray(py)
    }

    #[getter]
    pub fn trend<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner.trend.to_vec().into_pyarray(py)
    }

    #[getter]
    pub fn seasonal<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner.seasonal.to_vec().into_pyarray(py)
    }

    #[getter]
    pub fn resid<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner.resid.to_vec().into_pyarray(py)
    }

    #[getter]
    pub fn period(&self) -> usize {
        self.inner.period
    }
}

/// Decompose a series into trend, seasonality, and residuals.
///
/// `model` is `"add"` or `"mul"`; `period` is the explicit number of
/// observations per season.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (data, model = "add", period = 12),
    text_signature = "(data, /, model='add', period=12)"
)]
fn decompose_series<'py>(
    py: Python<'py>, data: &Bound<'py, PyAny>, model: &str, period: usize,
) -> PyResult<SeasonalDecomposition> {
    let series = extract_series(py, data, INPUT_SERIES_NAME)?;
    let mode: DecompositionMode = model.parse::<DecompositionMode>().map_err(PyErr::from)?;
    let inner = decompose_inner(&series, mode, period).map_err(PyErr::from)?;
    Ok(SeasonalDecomposition { inner })
}

/// Load one numeric column from a CSV file.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(text_signature = "(path, column, /)")]
fn load_column<'py>(
    py: Python<'py>, path: &str, column: &str,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let series: Series = crate::data::load_column(path, column).map_err(PyErr::from)?;
    Ok(series.into_values().into_raw_vec().into_pyarray(py))
}

/// _rust_forecast — PyO3 module initializer for the Python extension.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_forecast<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(forecast, m)?)?;
    m.add_function(wrap_pyfunction!(forecast_arima, m)?)?;
    m.add_function(wrap_pyfunction!(forecast_sarima, m)?)?;
    m.add_function(wrap_pyfunction!(forecast_exponential_smoothing, m)?)?;
    m.add_function(wrap_pyfunction!(decompose_series, m)?)?;
    m.add_function(wrap_pyfunction!(load_column, m)?)?;
    m.add_class::<SeasonalDecomposition>()?;
    Ok(())
}
