//! Default configurations for the direct (non-optimized) forecast path.
//!
//! The orders here are conventional starting points, not inferred-optimal
//! values; they are plain data so callers can override any of them instead
//! of editing constants.
use crate::forecasting::core::config::{
    ArimaOrder, SarimaConfig, SeasonalMode, SeasonalOrder, SmoothingConfig,
};

/// Default configurations used when a forecast is requested without
/// hyperparameter search.
///
/// The `Default` impl reproduces the conventional baselines: ARIMA (1, 1, 1),
/// SARIMA (1, 1, 1)(1, 1, 1, 12), additive smoothing with period 12.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastDefaults {
    pub arima_order: ArimaOrder,
    pub sarima: SarimaConfig,
    pub smoothing: SmoothingConfig,
}

impl Default for ForecastDefaults {
    fn default() -> Self {
        Self {
            arima_order: ArimaOrder::new(1, 1, 1),
            sarima: SarimaConfig::new(ArimaOrder::new(1, 1, 1), SeasonalOrder::new(1, 1, 1, 12)),
            smoothing: SmoothingConfig::new(SeasonalMode::Additive, 12),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_baselines() {
        let defaults = ForecastDefaults::default();
        assert_eq!(defaults.arima_order, ArimaOrder::new(1, 1, 1));
        assert_eq!(defaults.sarima.seasonal, SeasonalOrder::new(1, 1, 1, 12));
        assert_eq!(defaults.smoothing.mode, SeasonalMode::Additive);
        assert_eq!(defaults.smoothing.period, 12);
    }
}
