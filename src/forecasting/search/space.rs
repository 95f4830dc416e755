//! Search spaces: the bounded configuration ranges each family explores.
//!
//! Sampling is uniform over the declared integer/categorical ranges. The
//! ranges mirror the original sweep: ARIMA p, q ∈ [0, 5] and d ∈ [0, 2];
//! the seasonal variant adds P, Q ∈ [0, 5], D ∈ [0, 2], s ∈ [4, 12];
//! smoothing draws a mode and a period in [2, 12].
use rand::Rng;

use crate::forecasting::core::config::{
    ArimaOrder, SarimaConfig, SeasonalMode, SeasonalOrder, SmoothingConfig,
};
use crate::forecasting::search::trial::RejectionReason;

/// A bounded configuration space that trials are sampled from.
pub trait SearchSpace {
    type Config;

    /// Draw one configuration uniformly from the space.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Config;

    /// Structural validity screen, applied before any fitting.
    fn structural_rejection(&self, _config: &Self::Config) -> Option<RejectionReason> {
        None
    }
}

/// Non-seasonal ARIMA orders: p ∈ [0, max_p], d ∈ [0, max_d], q ∈ [0, max_q].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArimaSpace {
    pub max_p: usize,
    pub max_d: usize,
    pub max_q: usize,
}

impl Default for ArimaSpace {
    fn default() -> Self {
        Self { max_p: 5, max_d: 2, max_q: 5 }
    }
}

impl SearchSpace for ArimaSpace {
    type Config = ArimaOrder;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ArimaOrder {
        ArimaOrder::new(
            rng.random_range(0..=self.max_p),
            rng.random_range(0..=self.max_d),
            rng.random_range(0..=self.max_q),
        )
    }
}

/// Seasonal ARIMA orders with a sampled period s ∈ [min_period, max_period].
///
/// Candidates with `q == Q` are structurally rejected (a known seasonal
/// non-identifiability condition) before any fitting happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SarimaSpace {
    pub max_p: usize,
    pub max_d: usize,
    pub max_q: usize,
    pub max_seasonal_p: usize,
    pub max_seasonal_d: usize,
    pub max_seasonal_q: usize,
    pub min_period: usize,
    pub max_period: usize,
}

impl Default for SarimaSpace {
    fn default() -> Self {
        Self {
            max_p: 5,
            max_d: 2,
            max_q: 5,
            max_seasonal_p: 5,
            max_seasonal_d: 2,
            max_seasonal_q: 5,
            min_period: 4,
            max_period: 12,
        }
    }
}

impl SearchSpace for SarimaSpace {
    type Config = SarimaConfig;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SarimaConfig {
        let order = ArimaOrder::new(
            rng.random_range(0..=self.max_p),
            rng.random_range(0..=self.max_d),
            rng.random_range(0..=self.max_q),
        );
        let seasonal = SeasonalOrder::new(
            rng.random_range(0..=self.max_seasonal_p),
            rng.random_range(0..=self.max_seasonal_d),
            rng.random_range(0..=self.max_seasonal_q),
            rng.random_range(self.min_period..=self.max_period),
        );
        SarimaConfig::new(order, seasonal)
    }

    fn structural_rejection(&self, config: &SarimaConfig) -> Option<RejectionReason> {
        if config.order.q == config.seasonal.q {
            Some(RejectionReason::MovingAverageOverlap)
        } else {
            None
        }
    }
}

/// Smoothing configurations: a seasonal mode and a period in
/// [min_period, max_period].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmoothingSpace {
    pub min_period: usize,
    pub max_period: usize,
}

impl Default for SmoothingSpace {
    fn default() -> Self {
        Self { min_period: 2, max_period: 12 }
    }
}

impl SearchSpace for SmoothingSpace {
    type Config = SmoothingConfig;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SmoothingConfig {
        let mode = if rng.random_range(0..2) == 0 {
            SeasonalMode::Additive
        } else {
            SeasonalMode::Multiplicative
        };
        SmoothingConfig::new(mode, rng.random_range(self.min_period..=self.max_period))
    }
}
