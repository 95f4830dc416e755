//! The search loop: sample, split, fit, score, select, refit.
//!
//! Purpose
//! -------
//! Explore a bounded configuration space under a fixed trial budget and
//! return the configuration with the lowest held-out forecast error, refit
//! on the entire series for production use.
//!
//! Key behaviors
//! -------------
//! - The last `horizon` observations are held out; every candidate is fitted
//!   on the remaining prefix and scored by the mean squared error of its
//!   `horizon`-step forecast against the holdout.
//! - Any fitting or forecasting failure inside a trial is caught and scored
//!   as infinity; the search continues and never raises for a single bad
//!   candidate.
//! - Structurally rejected candidates are tagged distinctly and excluded
//!   from selection; if *every* trial is rejected the search fails with a
//!   configuration-space-exhausted error.
//! - Trials run sequentially; each search invocation owns its RNG and keeps
//!   no state between calls.
use ndarray::s;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::forecasting::core::{
    config::{ArimaOrder, SarimaConfig, SmoothingConfig},
    metrics::mean_squared_error,
    series::Series,
};
use crate::forecasting::errors::{ForecastResult, SearchError};
use crate::forecasting::models::{
    ArimaModel, Forecaster, HoltWintersModel, SarimaModel,
};
use crate::forecasting::search::{
    space::{ArimaSpace, SarimaSpace, SearchSpace, SmoothingSpace},
    trial::Trial,
};
use ndarray::Array1;

/// Fixed trial budget used by the stock search entry points.
pub const DEFAULT_TRIAL_BUDGET: usize = 30;

/// Search-run configuration.
///
/// `seed` pins the RNG for reproducible runs (tests); `None` draws fresh
/// OS entropy per run, so repeated searches may select different winners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub trials: usize,
    pub seed: Option<u64>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { trials: DEFAULT_TRIAL_BUDGET, seed: None }
    }
}

/// Everything a finished search run knows: the winner and the full trial
/// log (scored, failed, and rejected alike), in sampling order.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome<C> {
    pub best_config: C,
    pub best_score: f64,
    pub trials: Vec<Trial<C>>,
}

/// Run the generic search loop over a configuration space.
///
/// `evaluate` fits one candidate on the training window and returns its
/// `horizon`-step forecast; its errors are trial failures, not search
/// failures. Selection picks the minimum score among non-rejected trials
/// (ties keep the earliest trial).
pub fn run_search<S, F>(
    space: &S, series: &Series, horizon: usize, opts: &SearchOptions, mut evaluate: F,
) -> ForecastResult<SearchOutcome<S::Config>>
where
    S: SearchSpace,
    S::Config: Clone,
    F: FnMut(&S::Config, &Series, usize) -> ForecastResult<Array1<f64>>,
{
    if horizon == 0 {
        return Err(crate::forecasting::errors::ForecastError::InvalidHorizon { horizon });
    }
    if series.len() <= horizon {
        return Err(SearchError::TrainWindowEmpty { len: series.len(), horizon }.into());
    }

    let train = series.head(series.len() - horizon);
    let holdout = series.values().slice_move(s![series.len() - horizon..]);

    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut trials: Vec<Trial<S::Config>> = Vec::with_capacity(opts.trials);
    for _ in 0..opts.trials {
        let config = space.sample(&mut rng);
        if let Some(reason) = space.structural_rejection(&config) {
            trials.push(Trial::rejected(config, reason));
            continue;
        }
        match evaluate(&config, &train, horizon) {
            Ok(forecast) => {
                let score = mean_squared_error(holdout.view(), forecast.view());
                if score.is_finite() {
                    trials.push(Trial::scored(config, score));
                } else {
                    trials.push(Trial::failed(config));
                }
            }
            Err(_) => trials.push(Trial::failed(config)),
        }
    }

    let best = trials
        .iter()
        .filter(|t| !t.is_rejected())
        .min_by(|a, b| a.score.partial_cmp(&b.score).expect("trial scores are never NaN"))
        .ok_or(SearchError::SpaceExhausted { trials: opts.trials })?;

    Ok(SearchOutcome {
        best_config: best.config.clone(),
        best_score: best.score,
        trials,
    })
}

/// Search ARIMA orders and refit the winner on the full series.
pub fn optimize_arima(
    series: &Series, horizon: usize, opts: &SearchOptions,
) -> ForecastResult<ArimaModel> {
    let space = ArimaSpace::default();
    let outcome = run_search(&space, series, horizon, opts, |config, train, h| {
        let mut candidate = ArimaModel::new(*config);
        candidate.fit(train)?;
        candidate.predict(h)
    })?;
    let mut model = ArimaModel::new(outcome.best_config);
    model.fit(series)?;
    Ok(model)
}

/// Search seasonal ARIMA configurations and refit the winner on the full
/// series.
pub fn optimize_sarima(
    series: &Series, horizon: usize, opts: &SearchOptions,
) -> ForecastResult<SarimaModel> {
    let space = SarimaSpace::default();
    let outcome = run_search(&space, series, horizon, opts, |config, train, h| {
        let mut candidate = SarimaModel::new(*config);
        candidate.fit(train)?;
        candidate.predict(h)
    })?;
    let mut model = SarimaModel::new(outcome.best_config);
    model.fit(series)?;
    Ok(model)
}

/// Search smoothing configurations and refit the winner on the full series.
pub fn optimize_exponential_smoothing(
    series: &Series, horizon: usize, opts: &SearchOptions,
) -> ForecastResult<HoltWintersModel> {
    let space = SmoothingSpace::default();
    let outcome = run_search(&space, series, horizon, opts, |config, train, h| {
        let mut candidate = HoltWintersModel::new(*config);
        candidate.fit(train)?;
        candidate.predict(h)
    })?;
    let mut model = HoltWintersModel::new(outcome.best_config);
    model.fit(series)?;
    Ok(model)
}

/// Convenience aliases so callers can name the winning configuration types
/// without reaching into `core::config`.
pub type ArimaSearchOutcome = SearchOutcome<ArimaOrder>;
pub type SarimaSearchOutcome = SearchOutcome<SarimaConfig>;
pub type SmoothingSearchOutcome = SearchOutcome<SmoothingConfig>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecasting::errors::ForecastError;
    use crate::forecasting::search::trial::{RejectionReason, TrialStatus};
    use rand::Rng;

    // A space over a single integer knob, evaluated by a closure-controlled
    // score table, keeps these tests independent of any real model.
    struct ToySpace {
        reject_even: bool,
        reject_all: bool,
    }

    impl SearchSpace for ToySpace {
        type Config = usize;

        fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
            rng.random_range(0..10)
        }

        fn structural_rejection(&self, config: &usize) -> Option<RejectionReason> {
            if self.reject_all || (self.reject_even && config % 2 == 0) {
                Some(RejectionReason::MovingAverageOverlap)
            } else {
                None
            }
        }
    }

    fn toy_series(n: usize) -> Series {
        let values: Vec<f64> = (0..n).map(|t| t as f64).collect();
        Series::from_slice(&values, "value").unwrap()
    }

    #[test]
    fn holdout_split_uses_the_series_tail() {
        let series = toy_series(10);
        let space = ToySpace { reject_even: false, reject_all: false };
        let opts = SearchOptions { trials: 5, seed: Some(1) };
        // Echo the holdout as the forecast: a perfect score of zero proves
        // the loop scored against the last `horizon` observations.
        let outcome = run_search(&space, &series, 3, &opts, |_, train, h| {
            assert_eq!(train.len(), 7);
            Ok(Array1::from(vec![7.0, 8.0, 9.0]).slice_move(s![..h]))
        })
        .unwrap();
        assert_eq!(outcome.best_score, 0.0);
        assert_eq!(outcome.trials.len(), 5);
    }

    #[test]
    fn failing_candidates_score_infinity_and_never_win() {
        let series = toy_series(12);
        let space = ToySpace { reject_even: false, reject_all: false };
        let opts = SearchOptions { trials: 10, seed: Some(2) };
        let outcome = run_search(&space, &series, 2, &opts, |config, _, h| {
            if *config != 4 {
                return Err(ForecastError::FitFailed { status: "did not converge".into() });
            }
            Ok(Array1::from_elem(h, 100.0))
        })
        .unwrap();
        assert_eq!(outcome.best_config, 4);
        assert!(outcome.best_score.is_finite());
        for trial in &outcome.trials {
            if trial.config != 4 {
                assert_eq!(trial.status, TrialStatus::FitFailed);
                assert_eq!(trial.score, f64::INFINITY);
            }
        }
    }

    #[test]
    fn rejected_trials_are_tagged_and_excluded_from_selection() {
        let series = toy_series(12);
        let space = ToySpace { reject_even: true, reject_all: false };
        let opts = SearchOptions { trials: 20, seed: Some(3) };
        let outcome = run_search(&space, &series, 2, &opts, |config, _, h| {
            // Even configs would win by score if they were not rejected.
            let value = if config % 2 == 0 { 10.0 } else { 10.5 };
            Ok(Array1::from_elem(h, value))
        })
        .unwrap();
        assert_eq!(outcome.best_config % 2, 1, "an even (rejected) config won selection");
        for trial in &outcome.trials {
            if trial.config % 2 == 0 {
                assert_eq!(
                    trial.status,
                    TrialStatus::Rejected(RejectionReason::MovingAverageOverlap)
                );
                assert_eq!(trial.score, f64::INFINITY);
            }
        }
    }

    #[test]
    fn exhausted_space_is_a_search_error_not_a_winner() {
        let series = toy_series(12);
        let space = ToySpace { reject_even: false, reject_all: true };
        let opts = SearchOptions { trials: 8, seed: Some(4) };
        let err = run_search(&space, &series, 2, &opts, |_, _, h| {
            Ok(Array1::from_elem(h, 0.0))
        })
        .unwrap_err();
        assert_eq!(
            err,
            ForecastError::Search(SearchError::SpaceExhausted { trials: 8 })
        );
    }

    #[test]
    fn series_no_longer_than_the_horizon_is_rejected_up_front() {
        let series = toy_series(4);
        let space = ToySpace { reject_even: false, reject_all: false };
        let opts = SearchOptions::default();
        let err = run_search(&space, &series, 4, &opts, |_, _, h| {
            Ok(Array1::from_elem(h, 0.0))
        })
        .unwrap_err();
        assert!(matches!(
            err,
            ForecastError::Search(SearchError::TrainWindowEmpty { len: 4, horizon: 4 })
        ));
    }

    #[test]
    fn all_failed_trials_still_select_a_config_and_surface_the_refit_error() {
        // Runtime failures are not structural rejections: the search picks
        // one of them and the refit on the full series reports the failure.
        let series = toy_series(6);
        let space = ToySpace { reject_even: false, reject_all: false };
        let opts = SearchOptions { trials: 5, seed: Some(9) };
        let outcome = run_search(&space, &series, 2, &opts, |_, _, _| {
            Err(ForecastError::FitFailed { status: "always fails".into() })
        })
        .unwrap();
        assert_eq!(outcome.best_score, f64::INFINITY);
        assert!(outcome.trials.iter().all(|t| t.status == TrialStatus::FitFailed));
    }
}
