//! Seasonal ARIMA (p, d, q)(P, D, Q, s).
//!
//! Seasonal differencing is applied before regular differencing; the
//! seasonal AR/MA polynomials are expanded against their non-seasonal
//! counterparts inside the shared ARMA core, so estimation and forecasting
//! reuse the dense-lag recursion unchanged. An intercept is estimated only
//! when `d + D == 0`.
use ndarray::Array1;

use crate::forecasting::core::{
    config::{ArimaOrder, SarimaConfig, SeasonalOrder},
    difference::Differencer,
    series::Series,
};
use crate::forecasting::errors::{ForecastError, ForecastResult};
use crate::forecasting::models::{
    arma::{fit_arma, forecast_arma, ArmaParams, ArmaSpec},
    Forecaster,
};
use crate::optimization::objective::{FitOptions, FitOutcome};

#[derive(Debug, Clone, PartialEq)]
struct SarimaFit {
    params: ArmaParams,
    residuals: Array1<f64>,
    working: Array1<f64>,
    differencer: Differencer,
    outcome: FitOutcome,
}

/// Seasonal autoregressive integrated moving-average model.
#[derive(Debug, Clone, PartialEq)]
pub struct SarimaModel {
    config: SarimaConfig,
    options: FitOptions,
    fitted: Option<SarimaFit>,
}

impl SarimaModel {
    /// Model with the given configuration and default optimizer options.
    pub fn new(config: SarimaConfig) -> Self {
        Self::with_options(config, FitOptions::default())
    }

    pub fn with_options(config: SarimaConfig, options: FitOptions) -> Self {
        Self { config, options, fitted: None }
    }

    pub fn config(&self) -> SarimaConfig {
        self.config
    }

    pub fn order(&self) -> ArimaOrder {
        self.config.order
    }

    pub fn seasonal_order(&self) -> SeasonalOrder {
        self.config.seasonal
    }

    /// Optimizer outcome of the last successful fit.
    pub fn fit_outcome(&self) -> Option<&FitOutcome> {
        self.fitted.as_ref().map(|f| &f.outcome)
    }
}

impl Forecaster for SarimaModel {
    fn fit(&mut self, series: &Series) -> ForecastResult<()> {
        let order = self.config.order;
        let seasonal = self.config.seasonal;
        if seasonal.is_active() && seasonal.s < 2 {
            return Err(ForecastError::InvalidPeriod {
                period: seasonal.s,
                reason: "seasonal orders require a period of at least 2",
            });
        }
        let (working, differencer) =
            Differencer::apply(series.values(), order.d, seasonal.d, seasonal.s)?;
        let spec = ArmaSpec {
            p: order.p,
            q: order.q,
            seasonal_p: seasonal.p,
            seasonal_q: seasonal.q,
            period: if seasonal.is_active() { seasonal.s } else { 0 },
            with_intercept: order.d + seasonal.d == 0,
        };
        if working.len() <= spec.max_ar_lag() {
            return Err(ForecastError::SeriesTooShort {
                needed: spec.max_ar_lag() + order.d + seasonal.d * seasonal.s + 1,
                actual: series.len(),
                context: "seasonal ARIMA estimation",
            });
        }
        let (params, residuals, outcome) = fit_arma(&spec, &working, &self.options)?;
        self.fitted = Some(SarimaFit { params, residuals, working, differencer, outcome });
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

#[cfg(test)]
mod tests {
    use super::*;

    fn seasonal_series(n: usize, period: usize) -> Series {
        // Repeating seasonal pattern on a gentle trend with a small wiggle.
        let pattern = [4.0, 1.0, -2.0, 0.5, 3.0, -1.5, 2.0, -3.0, 1.5, -0.5, 2.5, -2.0];
        let values: Vec<f64> = (0..n)
            .map(|t| {
                let t_f = t as f64;
                pattern[t % period] + 0.2 * t_f + 0.05 * (12.9898 * t_f).sin()
            })
            .collect();
        Series::from_slice(&values, "value").unwrap()
    }

    #[test]
    fn predict_before_fit_is_an_error() {
        let config =
            SarimaConfig::new(ArimaOrder::new(1, 1, 1), SeasonalOrder::new(1, 1, 1, 12));
        let model = SarimaModel::new(config);
        assert!(matches!(model.predict(5), Err(ForecastError::ModelNotFitted)));
    }

    #[test]
    fn pure_seasonal_difference_repeats_the_pattern_step() {
        // (0, 0, 0)(0, 1, 0, 4) on an exactly periodic series: the seasonally
        // differenced series is zero, so forecasts repeat the last cycle.
        let pattern = [10.0, 12.0, 9.0, 11.0];
        let values: Vec<f64> = (0..20).map(|t| pattern[t % 4]).collect();
        let series = Series::from_slice(&values, "value").unwrap();
        let config =
            SarimaConfig::new(ArimaOrder::new(0, 0, 0), SeasonalOrder::new(0, 1, 0, 4));
        let mut model = SarimaModel::new(config);
        model.fit(&series).unwrap();
        let forecast = model.predict(6).unwrap();
        for (h, &v) in forecast.iter().enumerate() {
            let expected = pattern[(20 + h) % 4];
            assert!(
                (v - expected).abs() < 1e-9,
                "step {h}: forecast {v}, expected {expected}"
            );
        }
    }

    #[test]
    fn seasonal_fit_produces_horizon_length_forecasts() {
        let series = seasonal_series(72, 12);
        let config =
            SarimaConfig::new(ArimaOrder::new(1, 1, 0), SeasonalOrder::new(0, 1, 1, 12));
        let mut model = SarimaModel::new(config);
        model.fit(&series).unwrap();
        let forecast = model.predict(5).unwrap();
        assert_eq!(forecast.len(), 5);
        assert!(forecast.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn inactive_seasonal_part_reduces_to_plain_arima() {
        let series = seasonal_series(40, 12);
        let config =
            SarimaConfig::new(ArimaOrder::new(1, 0, 0), SeasonalOrder::new(0, 0, 0, 12));
        let mut model = SarimaModel::new(config);
        model.fit(&series).unwrap();
        let forecast = model.predict(3).unwrap();
        assert_eq!(forecast.len(), 3);
    }

    #[test]
    fn short_series_under_seasonal_differencing_fails_cleanly() {
        let series = seasonal_series(10, 12);
        let config =
            SarimaConfig::new(ArimaOrder::new(1, 1, 1), SeasonalOrder::new(1, 1, 1, 12));
        let mut model = SarimaModel::new(config);
        let err = model.fit(&series).unwrap_err();
        assert!(matches!(err, ForecastError::SeriesTooShort { .. }));
    }

    #[test]
    fn active_seasonal_orders_require_a_period() {
        let series = seasonal_series(40, 12);
        let config =
            SarimaConfig::new(ArimaOrder::new(1, 0, 0), SeasonalOrder::new(1, 0, 0, 0));
        let mut model = SarimaModel::new(config);
        assert!(matches!(
            model.fit(&series).unwrap_err(),
            ForecastError::InvalidPeriod { .. }
        ));
    }
}
