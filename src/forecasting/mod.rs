//! forecasting — classical forecasting stack: models, search, and
//! decomposition.
//!
//! Purpose
//! -------
//! Provide a cohesive forecasting layer that bundles the validated series
//! container, the ARIMA / seasonal ARIMA / Holt–Winters model families, the
//! randomized hyperparameter search, seasonal decomposition, and shared
//! error types under a single namespace. This is the surface most consumers
//! (including the Python bindings) should depend on.
//!
//! Key behaviors
//! -------------
//! - Collect core building blocks in [`core`]: the [`Series`] container,
//!   configuration types, differencing with step-wise inversion, forecast
//!   metrics, and the configurable defaults for the direct path.
//! - Expose the model families in [`models`] behind the common
//!   [`Forecaster`](models::Forecaster) trait; estimation runs through the
//!   crate's shared [`optimization`](crate::optimization) layer.
//! - Run the randomized search in [`search`]: a fixed trial budget, held-out
//!   mean-squared-error scoring, failure-to-infinity trials, structural
//!   rejection of non-identifiable seasonal candidates, and a full-series
//!   refit of the winner.
//! - Offer the user-facing entry points in [`api`]
//!   ([`forecast`](api::forecast) and the per-family functions) and seasonal
//!   decomposition in [`decompose`].
//! - Centralize error types in [`errors`] so callers see a uniform error
//!   surface across the stack.
//!
//! Invariants & assumptions
//! ------------------------
//! - Input series are carried in validated [`Series`] instances: non-empty
//!   and finite. Missing-value outputs are produced only by the stack
//!   itself, via `Series::missing`.
//! - Every forecast output has length exactly equal to the requested
//!   horizon and is named `"Forecast"`; degenerate fits yield NaN values,
//!   never a shorter sequence.
//! - Trials inside a search never raise for a single bad candidate; errors
//!   are caught and scored as infinity. Only an exhausted configuration
//!   space or an invalid search input surfaces as an error.
//! - Everything is single-threaded, synchronous, and stateless between
//!   calls; each search invocation owns its RNG.
//!
//! Downstream usage
//! ----------------
//! - Typical end-to-end flow:
//!   1. Load a column into a [`Series`] via [`crate::data::load_column`].
//!   2. Call [`api::forecast`] with a family name, horizon, and the
//!      optimize flag — or construct a model directly and drive
//!      `fit`/`predict` yourself.
//!   3. For component analysis, call [`decompose::decompose`] with a mode
//!      and an explicit period.

pub mod api;
pub mod core;
pub mod decompose;
pub mod errors;
pub mod models;
pub mod search;

// ---- Re-exports (primary public surface) ----------------------------------
//
// These are the “everyday” types and functions most users need. More
// specialized items (search spaces, the ARMA core, transforms) remain under
// their respective submodules.

pub use self::api::{
    forecast, forecast_arima, forecast_arima_with, forecast_exponential_smoothing,
    forecast_exponential_smoothing_with, forecast_family, forecast_sarima, forecast_sarima_with,
};
pub use self::core::config::{
    ArimaOrder, ModelFamily, SarimaConfig, SeasonalMode, SeasonalOrder, SmoothingConfig,
};
pub use self::core::defaults::ForecastDefaults;
pub use self::core::series::{Series, FORECAST_NAME};
pub use self::decompose::{decompose, Decomposition, DecompositionMode};
pub use self::errors::{ForecastError, ForecastResult, InputError, SearchError};
pub use self::models::{ArimaModel, Forecaster, HoltWintersModel, SarimaModel};
pub use self::search::{SearchOptions, SearchOutcome};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_forecast::forecasting::prelude::*;
//
// to import the main forecasting surface in a single line.

pub mod prelude {
    pub use super::{
        decompose, forecast, forecast_arima, forecast_exponential_smoothing, forecast_sarima,
        ArimaModel, ArimaOrder, Decomposition, DecompositionMode, ForecastDefaults,
        ForecastError, ForecastResult, Forecaster, HoltWintersModel, InputError, ModelFamily,
        SarimaConfig, SarimaModel, SearchError, SearchOptions, SeasonalMode, SeasonalOrder,
        Series, SmoothingConfig,
    };
}
