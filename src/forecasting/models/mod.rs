//! Model families: ARIMA, seasonal ARIMA, and Holt–Winters exponential
//! smoothing, all speaking the same [`Forecaster`] interface.

pub mod arima;
pub mod arma;
pub mod exponential_smoothing;
pub mod sarima;

use ndarray::Array1;

use crate::forecasting::core::series::Series;
use crate::forecasting::errors::ForecastResult;

pub use self::arima::ArimaModel;
pub use self::exponential_smoothing::HoltWintersModel;
pub use self::sarima::SarimaModel;

/// Common fitting/forecasting interface implemented by every model family.
///
/// `fit` estimates parameters from a validated series and caches them on the
/// model; `predict` produces a `horizon`-step forecast from the cached fit
/// and fails with `ModelNotFitted` before any successful `fit`.
pub trait Forecaster {
    fn fit(&mut self, series: &Series) -> ForecastResult<()>;
    fn predict(&self, horizon: usize) -> ForecastResult<Array1<f64>>;
}
