//! User-facing forecast entry points.
//!
//! Purpose
//! -------
//! Mirror the original surface: one function per model family taking
//! `(series, horizon, optimize)`, plus a family-dispatching [`forecast`]
//! that parses the family name. Every function returns a series named
//! `"Forecast"` whose length equals the horizon — on degenerate-fit paths
//! the values are NaN, never a shorter sequence and never a raised fitting
//! error.
//!
//! Key behaviors
//! -------------
//! - Without optimization, the family's default configuration
//!   ([`ForecastDefaults`]) is fitted directly; fitting failures of the
//!   degenerate kind (numerical failure, too-short series, positivity
//!   violations) become missing-value outputs.
//! - With optimization, the randomized search runs first and search-level
//!   errors (including an exhausted configuration space) propagate.
//! - A forecast that degenerates to a single value is broadcast to the full
//!   horizon before being returned.
use ndarray::Array1;

use crate::forecasting::core::{
    config::{ArimaOrder, ModelFamily, SarimaConfig, SmoothingConfig},
    defaults::ForecastDefaults,
    series::{Series, FORECAST_NAME},
};
use crate::forecasting::errors::{ForecastError, ForecastResult};
use crate::forecasting::models::{ArimaModel, Forecaster, HoltWintersModel, SarimaModel};
use crate::forecasting::search::{
    optimize_arima, optimize_exponential_smoothing, optimize_sarima, SearchOptions,
};

/// Forecast `horizon` steps with the family named by `family`.
///
/// The family name is parsed case-insensitively; an unknown name raises an
/// invalid-argument error immediately. Defaults and search behavior follow
/// the per-family functions below.
pub fn forecast(
    series: &Series, family: &str, horizon: usize, optimize: bool,
) -> ForecastResult<Series> {
    let family: ModelFamily = family.parse()?;
    forecast_family(series, family, horizon, optimize, &ForecastDefaults::default())
}

/// Forecast with an already-parsed family and explicit defaults.
pub fn forecast_family(
    series: &Series, family: ModelFamily, horizon: usize, optimize: bool,
    defaults: &ForecastDefaults,
) -> ForecastResult<Series> {
    match family {
        ModelFamily::Arima => forecast_arima_inner(series, horizon, optimize, defaults),
        ModelFamily::Sarima => forecast_sarima_inner(series, horizon, optimize, defaults),
        ModelFamily::ExponentialSmoothing => {
            forecast_exponential_smoothing_inner(series, horizon, optimize, defaults)
        }
    }
}

/// ARIMA forecast with the default (1, 1, 1) order or a searched order.
pub fn forecast_arima(
    series: &Series, horizon: usize, optimize: bool,
) -> ForecastResult<Series> {
    forecast_arima_inner(series, horizon, optimize, &ForecastDefaults::default())
}

/// ARIMA forecast with an explicit order (no search).
pub fn forecast_arima_with(
    series: &Series, order: ArimaOrder, horizon: usize,
) -> ForecastResult<Series> {
    validate_horizon(horizon)?;
    direct_or_missing(ArimaModel::new(order), series, horizon)
}

/// Seasonal ARIMA forecast with the default configuration or a searched one.
pub fn forecast_sarima(
    series: &Series, horizon: usize, optimize: bool,
) -> ForecastResult<Series> {
    forecast_sarima_inner(series, horizon, optimize, &ForecastDefaults::default())
}

/// Seasonal ARIMA forecast with an explicit configuration (no search).
pub fn forecast_sarima_with(
    series: &Series, config: SarimaConfig, horizon: usize,
) -> ForecastResult<Series> {
    validate_horizon(horizon)?;
    direct_or_missing(SarimaModel::new(config), series, horizon)
}

/// Exponential-smoothing forecast with the default configuration or a
/// searched one.
pub fn forecast_exponential_smoothing(
    series: &Series, horizon: usize, optimize: bool,
) -> ForecastResult<Series> {
    forecast_exponential_smoothing_inner(series, horizon, optimize, &ForecastDefaults::default())
}

/// Exponential-smoothing forecast with an explicit configuration (no
/// search).
pub fn forecast_exponential_smoothing_with(
    series: &Series, config: SmoothingConfig, horizon: usize,
) -> ForecastResult<Series> {
    validate_horizon(horizon)?;
    direct_or_missing(HoltWintersModel::new(config), series, horizon)
}

fn forecast_arima_inner(
    series: &Series, horizon: usize, optimize: bool, defaults: &ForecastDefaults,
) -> ForecastResult<Series> {
    validate_horizon(horizon)?;
    if optimize {
        let model = optimize_arima(series, horizon, &SearchOptions::default())?;
        finalize(model.predict(horizon)?, horizon)
    } else {
        direct_or_missing(ArimaModel::new(defaults.arima_order), series, horizon)
    }
}

fn forecast_sarima_inner(
    series: &Series, horizon: usize, optimize: bool, defaults: &ForecastDefaults,
) -> ForecastResult<Series> {
    validate_horizon(horizon)?;
    if optimize {
        let model = optimize_sarima(series, horizon, &SearchOptions::default())?;
        finalize(model.predict(horizon)?, horizon)
    } else {
        direct_or_missing(SarimaModel::new(defaults.sarima), series, horizon)
    }
}

fn forecast_exponential_smoothing_inner(
    series: &Series, horizon: usize, optimize: bool, defaults: &ForecastDefaults,
) -> ForecastResult<Series> {
    validate_horizon(horizon)?;
    if optimize {
        let model = optimize_exponential_smoothing(series, horizon, &SearchOptions::default())?;
        finalize(model.predict(horizon)?, horizon)
    } else {
        direct_or_missing(HoltWintersModel::new(defaults.smoothing), series, horizon)
    }
}

fn validate_horizon(horizon: usize) -> ForecastResult<()> {
    if horizon == 0 {
        return Err(ForecastError::InvalidHorizon { horizon });
    }
    Ok(())
}

/// Fit directly and forecast; degenerate fitting failures become a
/// missing-value output of the contracted length instead of an error.
fn direct_or_missing<M: Forecaster>(
    mut model: M, series: &Series, horizon: usize,
) -> ForecastResult<Series> {
    match model.fit(series) {
        Ok(()) => finalize(model.predict(horizon)?, horizon),
        Err(err) if err.is_degenerate_fit() => Ok(Series::missing(FORECAST_NAME, horizon)),
        Err(err) => Err(err),
    }
}

/// Shape a raw forecast into the output contract.
///
/// A single value is broadcast to the horizon; any non-finite entry turns
/// the whole output into a missing-value series (degenerate fit), so the
/// returned series is either fully finite or fully missing and always of
/// length `horizon`.
fn finalize(values: Array1<f64>, horizon: usize) -> ForecastResult<Series> {
    let broadcast = if values.len() == 1 && horizon > 1 {
        Array1::from_elem(horizon, values[0])
    } else {
        values
    };
    if broadcast.len() != horizon || broadcast.iter().any(|v| !v.is_finite()) {
        return Ok(Series::missing(FORECAST_NAME, horizon));
    }
    Series::new(broadcast, FORECAST_NAME)
}
