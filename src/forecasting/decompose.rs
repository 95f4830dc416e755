//! Classical seasonal decomposition into trend, seasonal, and residual
//! components.
//!
//! Purpose
//! -------
//! Split a series into a centered-moving-average trend, a repeating
//! seasonal component, and a residual, under either an additive
//! (`y = T + S + R`) or a multiplicative (`y = T · S · R`) model.
//!
//! Key behaviors
//! -------------
//! - The trend is a centered moving average of width `period` (a 2×m average
//!   when the period is even), NaN over the half-window at each edge.
//! - The seasonal component is the per-phase mean of the detrended series,
//!   centered to zero mean (additive) or normalized to unit mean
//!   (multiplicative), tiled over the full length.
//! - The residual is whatever the trend and seasonal components leave over;
//!   it is NaN wherever the trend is.
//!
//! Conventions
//! -----------
//! - `period ≥ 2` and `len ≥ 2·period` are required.
//! - Multiplicative decomposition requires strictly positive observations.
use ndarray::Array1;
use statrs::statistics::Statistics;

use crate::forecasting::core::series::Series;
use crate::forecasting::errors::{ForecastError, ForecastResult};

/// Additive or multiplicative decomposition model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecompositionMode {
    Additive,
    Multiplicative,
}

impl std::str::FromStr for DecompositionMode {
    type Err = ForecastError;

    /// Parse a decomposition mode (case-insensitive): `"add"`/`"additive"`
    /// or `"mul"`/`"multiplicative"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "add" | "additive" => Ok(DecompositionMode::Additive),
            "mul" | "multiplicative" => Ok(DecompositionMode::Multiplicative),
            _ => Err(ForecastError::UnknownDecompositionMode { name: s.to_string() }),
        }
    }
}

/// Decomposition result: the observed series plus its three components.
///
/// `trend` and `resid` are NaN over the half-window at each edge where the
/// centered moving average is undefined; `seasonal` is defined everywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    pub observed: Series,
    pub trend: Array1<f64>,
    pub seasonal: Array1<f64>,
    pub resid: Array1<f64>,
    pub mode: DecompositionMode,
    pub period: usize,
}

/// Decompose a series into trend, seasonal, and residual components.
///
/// Errors
/// ------
/// - [`ForecastError::InvalidPeriod`] when `period < 2`.
/// - [`ForecastError::SeriesTooShort`] when `len < 2·period`.
/// - [`ForecastError::NonPositiveValue`] in multiplicative mode when any
///   observation is ≤ 0.
pub fn decompose(
    series: &Series, mode: DecompositionMode, period: usize,
) -> ForecastResult<Decomposition> {
    if period < 2 {
        return Err(ForecastError::InvalidPeriod {
            period,
            reason: "decomposition requires a period of at least 2",
        });
    }
    let n = series.len();
    if n < 2 * period {
        return Err(ForecastError::SeriesTooShort {
            needed: 2 * period,
            actual: n,
            context: "seasonal decomposition",
        });
    }
    let values = series.values();
    if mode == DecompositionMode::Multiplicative {
        for (index, &value) in values.iter().enumerate() {
            if value <= 0.0 {
                return Err(ForecastError::NonPositiveValue { index, value });
            }
        }
    }

    let trend = centered_moving_average(values.as_slice().expect("series is contiguous"), period);

    // Detrend, then average by phase over the positions where the trend is
    // defined.
    let mut phase_sums = vec![0.0; period];
    let mut phase_counts = vec![0usize; period];
    for t in 0..n {
        if trend[t].is_nan() {
            continue;
        }
        let detrended = match mode {
            DecompositionMode::Additive => values[t] - trend[t],
            DecompositionMode::Multiplicative => values[t] / trend[t],
        };
        phase_sums[t % period] += detrended;
        phase_counts[t % period] += 1;
    }
    let mut phase_means: Vec<f64> = phase_sums
        .iter()
        .zip(phase_counts.iter())
        .map(|(sum, &count)| if count > 0 { sum / count as f64 } else { 0.0 })
        .collect();

    let mean = phase_means.iter().mean();
    match mode {
        DecompositionMode::Additive => {
            for s in phase_means.iter_mut() {
                *s -= mean;
            }
        }
        DecompositionMode::Multiplicative => {
            if mean != 0.0 {
                for s in phase_means.iter_mut() {
                    *s /= mean;
                }
            }
        }
    }

    let seasonal = Array1::from_iter((0..n).map(|t| phase_means[t % period]));
    let resid = Array1::from_iter((0..n).map(|t| match mode {
        DecompositionMode::Additive => values[t] - trend[t] - seasonal[t],
        DecompositionMode::Multiplicative => values[t] / (trend[t] * seasonal[t]),
    }));

    Ok(Decomposition {
        observed: series.clone(),
        trend,
        seasonal,
        resid,
        mode,
        period,
    })
}

/// Centered moving average of width `period`; NaN where the window does not
/// fit.
///
/// For odd periods this is the plain centered mean. For even periods it is
/// the standard 2×m average with half weights on the two outermost points,
/// which keeps the window centered on an integer index.
fn centered_moving_average(values: &[f64], period: usize) -> Array1<f64> {
    let n = values.len();
    let mut trend = Array1::from_elem(n, f64::NAN);
    let half = period / 2;
    if period % 2 == 1 {
        for t in half..n - half {
            let window = &values[t - half..=t + half];
            trend[t] = window.iter().sum::<f64>() / period as f64;
        }
    } else {
        for t in half..n.saturating_sub(half) {
            let mut acc = 0.5 * values[t - half] + 0.5 * values[t + half];
            for &v in &values[t - half + 1..t + half] {
                acc += v;
            }
            trend[t] = acc / period as f64;
        }
    }
    trend
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn seasonal_series(n: usize, period: usize) -> Series {
        let values: Vec<f64> = (0..n)
            .map(|t| {
                let phase = (t % period) as f64 / period as f64;
                30.0 + 0.5 * t as f64 + 6.0 * (phase * std::f64::consts::TAU).sin()
            })
            .collect();
        Series::from_slice(&values, "value").unwrap()
    }

    #[test]
    fn mode_parses_the_original_names() {
        assert_eq!(DecompositionMode::from_str("add").unwrap(), DecompositionMode::Additive);
        assert_eq!(
            DecompositionMode::from_str("MUL").unwrap(),
            DecompositionMode::Multiplicative
        );
        assert!(DecompositionMode::from_str("stl").is_err());
    }

    #[test]
    fn trend_is_nan_exactly_at_the_edges() {
        let period = 4;
        let series = seasonal_series(24, period);
        let result = decompose(&series, DecompositionMode::Additive, period).unwrap();
        let half = period / 2;
        for t in 0..series.len() {
            let defined = t >= half && t < series.len() - half;
            assert_eq!(
                result.trend[t].is_nan(),
                !defined,
                "unexpected trend definedness at index {t}"
            );
        }
    }

    #[test]
    fn seasonal_component_repeats_with_the_period() {
        let period = 6;
        let series = seasonal_series(48, period);
        let result = decompose(&series, DecompositionMode::Additive, period).unwrap();
        for t in period..series.len() {
            assert_eq!(result.seasonal[t], result.seasonal[t - period]);
        }
        // Additive seasonals are centered.
        let one_cycle: f64 = result.seasonal.iter().take(period).sum();
        assert!(one_cycle.abs() < 1e-9);
    }

    #[test]
    fn additive_components_resum_to_the_observations() {
        let period = 4;
        let series = seasonal_series(32, period);
        let result = decompose(&series, DecompositionMode::Additive, period).unwrap();
        for t in 0..series.len() {
            if result.trend[t].is_nan() {
                assert!(result.resid[t].is_nan());
                continue;
            }
            let rebuilt = result.trend[t] + result.seasonal[t] + result.resid[t];
            assert!((rebuilt - series.values()[t]).abs() < 1e-9);
        }
    }

    #[test]
    fn multiplicative_components_remultiply_to_the_observations() {
        let period = 4;
        let values: Vec<f64> = (0..32)
            .map(|t| {
                let phase = (t % period) as f64 / period as f64;
                (50.0 + t as f64) * (1.0 + 0.2 * (phase * std::f64::consts::TAU).sin())
            })
            .collect();
        let series = Series::from_slice(&values, "value").unwrap();
        let result = decompose(&series, DecompositionMode::Multiplicative, period).unwrap();
        for t in 0..series.len() {
            if result.trend[t].is_nan() {
                continue;
            }
            let rebuilt = result.trend[t] * result.seasonal[t] * result.resid[t];
            assert!((rebuilt - series.values()[t]).abs() < 1e-9);
        }
    }

    #[test]
    fn multiplicative_mode_rejects_non_positive_observations() {
        let values: Vec<f64> = (0..16).map(|t| t as f64 - 2.0).collect();
        let series = Series::from_slice(&values, "value").unwrap();
        let err = decompose(&series, DecompositionMode::Multiplicative, 4).unwrap_err();
        assert!(matches!(err, ForecastError::NonPositiveValue { .. }));
    }

    #[test]
    fn short_series_and_tiny_periods_are_rejected() {
        let series = seasonal_series(6, 4);
        assert!(matches!(
            decompose(&series, DecompositionMode::Additive, 4),
            Err(ForecastError::SeriesTooShort { .. })
        ));
        assert!(matches!(
            decompose(&series, DecompositionMode::Additive, 1),
            Err(ForecastError::InvalidPeriod { .. })
        ));
    }
}
