//! ARIMA(p, d, q): differencing plus the shared ARMA core.
//!
//! Fitting differences the series `d` times, estimates the ARMA(p, q)
//! parameters by conditional sum of squares, and caches the working series,
//! residuals, and differencing state. Forecasting iterates the ARMA
//! recursion and integrates each step back to the original scale. An
//! intercept is estimated only when `d == 0`.
use ndarray::Array1;

use crate::forecasting::core::{config::ArimaOrder, difference::Differencer, series::Series};
use crate::forecasting::errors::{ForecastError, ForecastResult};
use crate::forecasting::models::{
    arma::{fit_arma, forecast_arma, ArmaParams, ArmaSpec},
    Forecaster,
};
use crate::optimization::objective::{FitOptions, FitOutcome};

/// Cached state of a successful fit.
#[derive(Debug, Clone, PartialEq)]
struct ArimaFit {
    params: ArmaParams,
    residuals: Array1<f64>,
    working: Array1<f64>,
    differencer: Differencer,
    outcome: FitOutcome,
}

/// Non-seasonal autoregressive integrated moving-average model.
#[derive(Debug, Clone, PartialEq)]
pub struct ArimaModel {
    order: ArimaOrder,
    options: FitOptions,
    fitted: Option<ArimaFit>,
}

impl ArimaModel {
    /// Model with the given order and default optimizer options.
    pub fn new(order: ArimaOrder) -> Self {
        Self::with_options(order, FitOptions::default())
    }

    pub fn with_options(order: ArimaOrder, options: FitOptions) -> Self {
        Self { order, options, fitted: None }
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    /// Optimizer outcome of the last successful fit.
    pub fn fit_outcome(&self) -> Option<&FitOutcome> {
        self.fitted.as_ref().map(|f| &f.outcome)
    }

    /// Dense fitted parameters of the last successful fit.
    pub fn params(&self) -> Option<&ArmaParams> {
        self.fitted.as_ref().map(|f| &f.params)
    }
}

impl Forecaster for ArimaModel {
    fn fit(&mut self, series: &Series) -> ForecastResult<()> {
        let (working, differencer) =
            Differencer::apply(series.values(), self.order.d, 0, 0)?;
        let spec =
            ArmaSpec::nonseasonal(self.order.p, self.order.q, self.order.d == 0);
        let (params, residuals, outcome) = fit_arma(&spec, &working, &self.options)?;
        self.fitted = Some(ArimaFit { params, residuals, working, differencer, outcome });
        Ok(())
    }

    fn predict(&self, horizon: usize) -> ForecastResult<Array1<f64>> {
        if horizon == 0 {
            return Err(ForecastError::InvalidHorizon { horizon });
        }
        let fit = self.fitted.as_ref().ok_or(ForecastError::ModelNotFitted)?;
        let w_hat =
            forecast_arma(&fit.params, fit.working.view(), fit.residuals.view(), horizon);
        let mut differencer = fit.differencer.clone();
        Ok(w_hat.iter().map(|&v| differencer.roll_forward(v)).collect())
    }
}
