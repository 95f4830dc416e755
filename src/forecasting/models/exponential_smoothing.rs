//! Seasonal exponential smoothing (Holt–Winters, level + seasonal).
//!
//! Purpose
//! -------
//! Fit the level/seasonal smoothing recursions with additive or
//! multiplicative seasonality. The smoothing weights (α, γ) are estimated by
//! minimizing the in-sample sum of squared one-step errors through the
//! shared L-BFGS machinery, with logistic transforms keeping both weights in
//! (0, 1).
//!
//! Key behaviors
//! -------------
//! - Additive: `ℓ_t = α (y_t − s_{t−m}) + (1 − α) ℓ_{t−1}`,
//!   `s_t = γ (y_t − ℓ_t) + (1 − γ) s_{t−m}`; one-step prediction
//!   `ŷ_t = ℓ_{t−1} + s_{t−m}`.
//! - Multiplicative: the same recursions with subtraction replaced by
//!   division and addition by multiplication.
//! - Initialization: the level starts at the mean of the first cycle;
//!   seasonal factors come from per-phase means over the first two cycles,
//!   centered to zero mean (additive) or normalized to unit mean
//!   (multiplicative).
//!
//! Invariants & assumptions
//! ------------------------
//! - At least two full seasonal cycles of data are required to fit.
//! - Multiplicative seasonality requires strictly positive observations;
//!   violations are fitting failures, not panics.
use ndarray::Array1;
use statrs::statistics::Statistics;

use crate::forecasting::core::{
    config::{SeasonalMode, SmoothingConfig},
    series::Series,
};
use crate::forecasting::errors::{ForecastError, ForecastResult};
use crate::forecasting::models::Forecaster;
use crate::optimization::{
    errors::{OptError, OptResult},
    lbfgs::minimize,
    objective::{validate_theta, FitOptions, Objective, Theta},
    transforms::{safe_logistic, safe_logit},
};

/// Smoothing-state snapshot after running the recursions over a series.
#[derive(Debug, Clone, PartialEq)]
struct SmoothingState {
    level: f64,
    /// `seasonals[t % m]` holds the most recent seasonal value for phase
    /// `t % m`.
    seasonals: Vec<f64>,
    sse: f64,
}

/// Cached state of a successful fit.
#[derive(Debug, Clone, PartialEq)]
struct HoltWintersFit {
    alpha: f64,
    gamma: f64,
    state: SmoothingState,
    n: usize,
}

/// Exponential-smoothing model with additive or multiplicative seasonality.
#[derive(Debug, Clone, PartialEq)]
pub struct HoltWintersModel {
    config: SmoothingConfig,
    options: FitOptions,
    fitted: Option<HoltWintersFit>,
}

impl HoltWintersModel {
    /// Model with the given configuration and default optimizer options.
    pub fn new(config: SmoothingConfig) -> Self {
        Self::with_options(config, FitOptions::default())
    }

    pub fn with_options(config: SmoothingConfig, options: FitOptions) -> Self {
        Self { config, options, fitted: None }
    }

    pub fn config(&self) -> SmoothingConfig {
        self.config
    }

    /// Fitted smoothing weights `(α, γ)`, if the model has been fitted.
    pub fn weights(&self) -> Option<(f64, f64)> {
        self.fitted.as_ref().map(|f| (f.alpha, f.gamma))
    }

    /// Minimum series length required to fit: two full seasonal cycles.
    pub fn min_observations(&self) -> usize {
        2 * self.config.period
    }

    fn validate_series(&self, series: &Series) -> ForecastResult<()> {
        let m = self.config.period;
        if m < 2 {
            return Err(ForecastError::InvalidPeriod {
                period: m,
                reason: "seasonal smoothing requires a period of at least 2",
            });
        }
        if series.len() < self.min_observations() {
            return Err(ForecastError::SeriesTooShort {
                needed: self.min_observations(),
                actual: series.len(),
                context: "seasonal exponential smoothing",
            });
        }
        if self.config.mode == SeasonalMode::Multiplicative {
            for (index, &value) in series.values().iter().enumerate() {
                if value <= 0.0 {
                    return Err(ForecastError::NonPositiveValue { index, value });
                }
            }
        }
        Ok(())
    }
}

impl Forecaster for HoltWintersModel {
    fn fit(&mut self, series: &Series) -> ForecastResult<()> {
        self.validate_series(series)?;
        let objective =
            SmoothingObjective { mode: self.config.mode, period: self.config.period };
        let data = series.values().to_owned();
        // Conventional warm start: a responsive level, a slow seasonal.
        let theta0 = Array1::from(vec![safe_logit(0.3), safe_logit(0.1)]);
        let outcome = minimize(&objective, theta0, &data, &self.options)?;
        let alpha = safe_logistic(outcome.theta_hat[0]);
        let gamma = safe_logistic(outcome.theta_hat[1]);
        let state = run_recursions(&data, self.config.mode, self.config.period, alpha, gamma)?;
        self.fitted = Some(HoltWintersFit { alpha, gamma, state, n: series.len() });
        Ok(())
    }

    fn predict(&self, horizon: usize) -> ForecastResult<Array1<f64>> {
        if horizon == 0 {
            return Err(ForecastError::InvalidHorizon { horizon });
        }
        let fit = self.fitted.as_ref().ok_or(ForecastError::ModelNotFitted)?;
        let m = self.config.period;
        let mut out = Array1::<f64>::zeros(horizon);
        for h in 1..=horizon {
            let seasonal = fit.state.seasonals[(fit.n + h - 1) % m];
            out[h - 1] = match self.config.mode {
                SeasonalMode::Additive => fit.state.level + seasonal,
                SeasonalMode::Multiplicative => fit.state.level * seasonal,
            };
        }
        Ok(out)
    }
}

/// SSE objective over `(logit α, logit γ)`.
struct SmoothingObjective {
    mode: SeasonalMode,
    period: usize,
}

impl Objective for SmoothingObjective {
    type Data = Array1<f64>;

    fn value(&self, theta: &Theta, data: &Array1<f64>) -> OptResult<f64> {
        validate_theta(theta)?;
        let alpha = safe_logistic(theta[0]);
        let gamma = safe_logistic(theta[1]);
        let state = run_recursions(data, self.mode, self.period, alpha, gamma)
            .map_err(|_| OptError::NonFiniteCost { value: f64::NAN })?;
        Ok(state.sse)
    }

    fn check(&self, theta: &Theta, data: &Array1<f64>) -> OptResult<()> {
        if theta.len() != 2 {
            return Err(OptError::ThetaLengthMismatch { expected: 2, actual: theta.len() });
        }
        validate_theta(theta)?;
        if data.len() < 2 * self.period {
            return Err(OptError::TooFewObservations {
                needed: 2 * self.period,
                actual: data.len(),
            });
        }
        Ok(())
    }
}

/// Run the level/seasonal recursions over the full series.
///
/// Returns the final state together with the accumulated one-step SSE; any
/// non-finite intermediate (which can only arise from pathological inputs)
/// is reported as a fitting failure.
fn run_recursions(
    values: &Array1<f64>, mode: SeasonalMode, period: usize, alpha: f64, gamma: f64,
) -> ForecastResult<SmoothingState> {
    let m = period;
    let first_cycle = values.iter().take(m).copied().collect::<Vec<_>>();
    let second_cycle = values.iter().skip(m).take(m).copied().collect::<Vec<_>>();
    let a1 = first_cycle.iter().mean();
    let a2 = second_cycle.iter().mean();

    let mut level = a1;
    let mut seasonals: Vec<f64> = (0..m)
        .map(|i| match mode {
            SeasonalMode::Additive => {
                ((values[i] - a1) + (values[m + i] - a2)) / 2.0
            }
            SeasonalMode::Multiplicative => (values[i] / a1 + values[m + i] / a2) / 2.0,
        })
        .collect();
    normalize_seasonals(&mut seasonals, mode);

    let mut sse = 0.0;
    for (t, &y) in values.iter().enumerate() {
        let phase = t % m;
        let seasonal = seasonals[phase];
        let (prediction, new_level) = match mode {
            SeasonalMode::Additive => {
                let prediction = level + seasonal;
                let new_level = alpha * (y - seasonal) + (1.0 - alpha) * level;
                (prediction, new_level)
            }
            SeasonalMode::Multiplicative => {
                let prediction = level * seasonal;
                let new_level = alpha * (y / seasonal) + (1.0 - alpha) * level;
                (prediction, new_level)
            }
        };
        let err = y - prediction;
        sse += err * err;
        level = new_level;
        seasonals[phase] = match mode {
            SeasonalMode::Additive => gamma * (y - level) + (1.0 - gamma) * seasonal,
            SeasonalMode::Multiplicative => gamma * (y / level) + (1.0 - gamma) * seasonal,
        };
        if !level.is_finite() || !seasonals[phase].is_finite() {
            return Err(ForecastError::FitFailed {
                status: format!("smoothing recursion diverged at index {t}"),
            });
        }
    }

    Ok(SmoothingState { level, seasonals, sse })
}

/// Center additive seasonals to zero mean; scale multiplicative seasonals to
/// unit mean.
fn normalize_seasonals(seasonals: &mut [f64], mode: SeasonalMode) {
    let mean = seasonals.iter().mean();
    match mode {
        SeasonalMode::Additive => {
            for s in seasonals.iter_mut() {
                *s -= mean;
            }
        }
        SeasonalMode::Multiplicative => {
            if mean != 0.0 {
                for s in seasonals.iter_mut() {
                    *s /= mean;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seasonal_series(n: usize, period: usize, base: f64, amplitude: f64) -> Series {
        let values: Vec<f64> = (0..n)
            .map(|t| {
                let phase = (t % period) as f64 / period as f64;
                base + amplitude * (phase * std::f64::consts::TAU).sin()
                    + 0.05 * (12.9898 * t as f64).sin()
            })
            .collect();
        Series::from_slice(&values, "value").unwrap()
    }

    #[test]
    fn predict_before_fit_is_an_error() {
        let model = HoltWintersModel::new(SmoothingConfig::new(SeasonalMode::Additive, 12));
        assert!(matches!(model.predict(4), Err(ForecastError::ModelNotFitted)));
    }

    #[test]
    fn fit_requires_two_full_cycles() {
        let series = seasonal_series(20, 12, 50.0, 5.0);
        let mut model = HoltWintersModel::new(SmoothingConfig::new(SeasonalMode::Additive, 12));
        let err = model.fit(&series).unwrap_err();
        assert!(matches!(err, ForecastError::SeriesTooShort { needed: 24, .. }));
    }

    #[test]
    fn multiplicative_mode_rejects_non_positive_observations() {
        let values: Vec<f64> = (0..24).map(|t| (t as f64) - 3.0).collect();
        let series = Series::from_slice(&values, "value").unwrap();
        let mut model =
            HoltWintersModel::new(SmoothingConfig::new(SeasonalMode::Multiplicative, 12));
        let err = model.fit(&series).unwrap_err();
        assert!(matches!(err, ForecastError::NonPositiveValue { .. }));
        assert!(err.is_degenerate_fit());
    }

    #[test]
    fn additive_fit_captures_the_seasonal_shape() {
        let period = 6;
        let series = seasonal_series(48, period, 20.0, 4.0);
        let mut model =
            HoltWintersModel::new(SmoothingConfig::new(SeasonalMode::Additive, period));
        model.fit(&series).unwrap();
        let forecast = model.predict(period).unwrap();
        assert_eq!(forecast.len(), period);
        // One full forecast cycle should reproduce the seasonal swing around
        // the base level.
        let spread = forecast.iter().cloned().fold(f64::MIN, f64::max)
            - forecast.iter().cloned().fold(f64::MAX, f64::min);
        assert!(spread > 4.0, "expected a pronounced seasonal swing, got spread {spread}");
        for &v in forecast.iter() {
            assert!((v - 20.0).abs() < 8.0);
        }
    }

    #[test]
    fn multiplicative_fit_produces_positive_forecasts() {
        let period = 4;
        let series = seasonal_series(32, period, 100.0, 20.0);
        let mut model =
            HoltWintersModel::new(SmoothingConfig::new(SeasonalMode::Multiplicative, period));
        model.fit(&series).unwrap();
        let forecast = model.predict(8).unwrap();
        assert_eq!(forecast.len(), 8);
        assert!(forecast.iter().all(|&v| v > 0.0));
    }

    #[test]
    fn fitted_weights_stay_inside_the_unit_interval() {
        let series = seasonal_series(36, 6, 10.0, 2.0);
        let mut model = HoltWintersModel::new(SmoothingConfig::new(SeasonalMode::Additive, 6));
        model.fit(&series).unwrap();
        let (alpha, gamma) = model.weights().unwrap();
        assert!(alpha > 0.0 && alpha < 1.0);
        assert!(gamma > 0.0 && gamma < 1.0);
    }

    #[test]
    fn forecast_seasonal_phase_alignment_continues_the_cycle() {
        // Strictly periodic input: the h-step forecast must land on the same
        // phase the series would have continued on.
        let pattern = [10.0, 14.0, 8.0, 12.0];
        let values: Vec<f64> = (0..24).map(|t| pattern[t % 4]).collect();
        let series = Series::from_slice(&values, "value").unwrap();
        let mut model = HoltWintersModel::new(SmoothingConfig::new(SeasonalMode::Additive, 4));
        model.fit(&series).unwrap();
        let forecast = model.predict(4).unwrap();
        for (h, &v) in forecast.iter().enumerate() {
            let expected = pattern[(24 + h) % 4];
            assert!(
                (v - expected).abs() < 0.5,
                "step {h}: forecast {v}, expected ≈ {expected}"
            );
        }
    }
}
