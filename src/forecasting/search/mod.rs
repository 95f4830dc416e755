//! Randomized hyperparameter search with held-out scoring.
//!
//! This is the decision-making layer of the crate: [`runner::run_search`]
//! explores a [`space::SearchSpace`] under a fixed trial budget, scoring
//! each candidate by held-out mean squared error, and the family entry
//! points ([`optimize_arima`], [`optimize_sarima`],
//! [`optimize_exponential_smoothing`]) refit the winning configuration on
//! the full series.

pub mod runner;
pub mod space;
pub mod trial;

pub use self::runner::{
    optimize_arima, optimize_exponential_smoothing, optimize_sarima, run_search,
    SearchOptions, SearchOutcome, DEFAULT_TRIAL_BUDGET,
};
pub use self::space::{ArimaSpace, SarimaSpace, SearchSpace, SmoothingSpace};
pub use self::trial::{RejectionReason, Trial, TrialStatus};
