//! Regular and seasonal differencing with step-wise inversion.
//!
//! Purpose
//! -------
//! Remove trend (order-`d` regular differencing) and seasonality (order-`D`
//! differencing at lag `s`) before ARMA estimation, and reconstruct
//! original-scale values from forecasts on the differenced scale.
//!
//! Key behaviors
//! -------------
//! - [`Differencer::apply`] differences seasonally first, then regularly,
//!   recording the tail values of every intermediate level.
//! - [`Differencer::roll_forward`] integrates one forecast step back to the
//!   original scale, updating the recorded tails so consecutive calls walk
//!   the forecast horizon in order.
//!
//! Invariants & assumptions
//! ------------------------
//! - Differencing shortens the series at the front only; every intermediate
//!   level ends at the same final time index as the input.
//! - `roll_forward` must be called with forecasts in horizon order
//!   (h = 1, 2, …); each call consumes and replaces one tail entry per level.
//!
//! Conventions
//! -----------
//! - Level-`k` seasonal tails hold the last `s` values of the `k`-times
//!   seasonally differenced series, oldest at the front.
//! - Level-`m` regular tails hold the last value of the `m`-times regularly
//!   differenced (post-seasonal) series.
use std::collections::VecDeque;

use ndarray::{Array1, ArrayView1};

use crate::forecasting::errors::{ForecastError, ForecastResult};

/// Differencing state: the transformed series' provenance plus the tail
/// buffers needed to invert it one forecast step at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct Differencer {
    d: usize,
    seasonal_d: usize,
    period: usize,
    regular_tails: Vec<f64>,
    seasonal_tails: Vec<VecDeque<f64>>,
}

impl Differencer {
    /// Difference `values` by `(d, D, s)` and capture inversion state.
    ///
    /// Seasonal differencing (order `D` at lag `s`) is applied first, then
    /// regular differencing (order `d`), matching the usual
    /// `(1 − L)^d (1 − L^s)^D` factorization. Returns the differenced series
    /// together with a [`Differencer`] that can roll forecasts back.
    ///
    /// Errors
    /// ------
    /// - [`ForecastError::InvalidPeriod`] when `D > 0` and `s < 2`.
    /// - [`ForecastError::SeriesTooShort`] when differencing would consume
    ///   the entire series (`len <= d + D·s`).
    pub fn apply(
        values: ArrayView1<f64>, d: usize, seasonal_d: usize, period: usize,
    ) -> ForecastResult<(Array1<f64>, Differencer)> {
        if seasonal_d > 0 && period < 2 {
            return Err(ForecastError::InvalidPeriod {
                period,
                reason: "seasonal differencing requires a period of at least 2",
            });
        }
        let needed = d + seasonal_d * period + 1;
        if values.len() < needed {
            return Err(ForecastError::SeriesTooShort {
                needed,
                actual: values.len(),
                context: "differencing",
            });
        }

        let mut current: Vec<f64> = values.to_vec();
        let mut seasonal_tails = Vec::with_capacity(seasonal_d);
        for _ in 0..seasonal_d {
            let tail: VecDeque<f64> =
                current[current.len() - period..].iter().copied().collect();
            seasonal_tails.push(tail);
            let next: Vec<f64> = current[period..]
                .iter()
                .zip(current.iter())
                .map(|(next, prev)| next - prev)
                .collect();
            current = next;
        }

        let mut regular_tails = Vec::with_capacity(d);
        for _ in 0..d {
            regular_tails.push(*current.last().expect("length checked above"));
            let next: Vec<f64> = current.windows(2).map(|w| w[1] - w[0]).collect();
            current = next;
        }

        Ok((
            Array1::from(current),
            Differencer { d, seasonal_d, period, regular_tails, seasonal_tails },
        ))
    }

    /// Integrate a single forecast on the differenced scale back to the
    /// original scale.
    ///
    /// Regular levels are inverted first (innermost transform), then seasonal
    /// levels; all tail buffers are advanced so the next call continues from
    /// this step.
    pub fn roll_forward(&mut self, w_hat: f64) -> f64 {
        let mut value = w_hat;
        for m in (0..self.d).rev() {
            value += self.regular_tails[m];
            self.regular_tails[m] = value;
        }
        for k in (0..self.seasonal_d).rev() {
            let lagged = self.seasonal_tails[k]
                .pop_front()
                .expect("seasonal tail holds one value per phase");
            value += lagged;
            self.seasonal_tails[k].push_back(value);
        }
        value
    }

    /// Total differencing order `d + D` (used to decide whether the ARMA core
    /// carries an intercept).
    pub fn total_order(&self) -> usize {
        self.d + self.seasonal_d
    }
}
