//! Forecast-accuracy metrics.
use ndarray::ArrayView1;

/// Mean squared error between observations and predictions.
///
/// Lengths must match; the caller guarantees this (the search loop always
/// compares a horizon-length forecast against the horizon-length holdout).
/// NaNs in either argument propagate into the result, which the search loop
/// treats as a failed trial.
pub fn mean_squared_error(actual: ArrayView1<f64>, predicted: ArrayView1<f64>) -> f64 {
    debug_assert_eq!(actual.len(), predicted.len());
    let n = actual.len();
    if n == 0 {
        return f64::NAN;
    }
    let sse: f64 =
        actual.iter().zip(predicted.iter()).map(|(a, p)| (a - p) * (a - p)).sum();
    sse / n as f64
}
