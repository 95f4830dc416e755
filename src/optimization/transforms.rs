//! Numerically stable parameter transforms between optimizer space and
//! model space.
//!
//! The optimizer works in unconstrained θ-space; model constraints are
//! enforced by construction:
//! - smoothing weights in `(0, 1)` via [`safe_logistic`] / [`safe_logit`];
//! - stationary autoregressive and invertible moving-average coefficient
//!   vectors via the partial-autocorrelation (Durbin–Levinson) maps
//!   [`pacf_to_ar`] / [`pacf_to_ma`], fed by `tanh`-squashed θ blocks.
//!
//! Conventions
//! -----------
//! - The AR polynomial is `1 − φ₁z − … − φ_p z^p`; [`pacf_to_ar`] returns φ
//!   with all roots outside the unit circle whenever every partial lies in
//!   `(−1, 1)`.
//! - The MA polynomial is `1 + ϑ₁z + … + ϑ_q z^q`; [`pacf_to_ma`] returns ϑ
//!   with all roots outside the unit circle under the same condition (the
//!   recursion differs from the AR case only in the sign of the reflection
//!   step).
//! - Inverse maps ([`ar_to_pacf`], [`ma_to_pacf`], [`safe_logit`]) are used
//!   for warm starts and round-trip tests; inputs are clamped away from the
//!   boundary before `atanh`/`ln` to avoid infinities.
use ndarray::{Array1, ArrayView1};

/// Squashing guard: partials and logistic outputs stay this far inside the
/// open interval so the inverse maps remain finite.
const BOUNDARY_EPS: f64 = 1e-12;

/// Stable logistic `1 / (1 + exp(−x))`.
///
/// Evaluates through the non-overflowing branch for either sign of `x`.
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        let e = (-x).exp();
        1.0 / (1.0 + e)
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Inverse of [`safe_logistic`] on `(0, 1)`.
///
/// The input is clamped to `[BOUNDARY_EPS, 1 − BOUNDARY_EPS]` first, so the
/// result is always finite.
pub fn safe_logit(p: f64) -> f64 {
    let p = p.clamp(BOUNDARY_EPS, 1.0 - BOUNDARY_EPS);
    (p / (1.0 - p)).ln()
}

/// Squash an unconstrained θ block into partial autocorrelations in `(−1, 1)`.
pub fn squash_partials(theta: ArrayView1<f64>) -> Array1<f64> {
    theta.mapv(f64::tanh)
}

/// Inverse of [`squash_partials`], clamping away from ±1 before `atanh`.
pub fn unsquash_partials(partials: ArrayView1<f64>) -> Array1<f64> {
    partials.mapv(|r| r.clamp(-1.0 + BOUNDARY_EPS, 1.0 - BOUNDARY_EPS).atanh())
}

/// Map partial autocorrelations to stationary AR coefficients.
///
/// Durbin–Levinson recursion: at stage `i`, the new coefficient vector is
/// `y_j ← y_j − r_i · y_{i−1−j}` with `y_i = r_i`. If every `r` lies in
/// `(−1, 1)`, the returned φ defines a stationary AR polynomial.
pub fn pacf_to_ar(partials: ArrayView1<f64>) -> Array1<f64> {
    levinson(partials, -1.0)
}

/// Map partial autocorrelations to invertible MA coefficients.
///
/// Same recursion as [`pacf_to_ar`] with the reflection sign flipped, which
/// yields ϑ such that `1 + ϑ₁z + … + ϑ_q z^q` has all roots outside the unit
/// circle.
pub fn pacf_to_ma(partials: ArrayView1<f64>) -> Array1<f64> {
    levinson(partials, 1.0)
}

/// Recover partial autocorrelations from stationary AR coefficients.
pub fn ar_to_pacf(coeffs: ArrayView1<f64>) -> Array1<f64> {
    levinson_inv(coeffs, -1.0)
}

/// Recover partial autocorrelations from invertible MA coefficients.
pub fn ma_to_pacf(coeffs: ArrayView1<f64>) -> Array1<f64> {
    levinson_inv(coeffs, 1.0)
}

fn levinson(partials: ArrayView1<f64>, sign: f64) -> Array1<f64> {
    let k = partials.len();
    let mut coeffs = Array1::<f64>::zeros(k);
    let mut prev = vec![0.0; k];
    for i in 0..k {
        let r = partials[i];
        prev[..i].copy_from_slice(&coeffs.as_slice().expect("contiguous")[..i]);
        for j in 0..i {
            coeffs[j] = prev[j] + sign * r * prev[i - 1 - j];
        }
        coeffs[i] = r;
    }
    coeffs
}

fn levinson_inv(coeffs: ArrayView1<f64>, sign: f64) -> Array1<f64> {
    let k = coeffs.len();
    let mut partials = Array1::<f64>::zeros(k);
    let mut work = coeffs.to_owned();
    for i in (0..k).rev() {
        let r = work[i];
        partials[i] = r;
        if i > 0 {
            let denom = 1.0 - r * r;
            let prev: Vec<f64> = work.as_slice().expect("contiguous")[..i].to_vec();
            for j in 0..i {
                work[j] = (prev[j] - sign * r * prev[i - 1 - j]) / denom;
            }
        }
    }
    partials
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn logistic_and_logit_round_trip() {
        for &x in &[-30.0, -2.0, 0.0, 0.5, 10.0] {
            let p = safe_logistic(x);
            assert!(p > 0.0 && p < 1.0);
            assert!((safe_logit(p) - x).abs() < 1e-6, "round trip failed for {x}");
        }
    }

    #[test]
    fn logistic_saturates_without_overflow() {
        assert!(safe_logistic(1e4) <= 1.0);
        assert!(safe_logistic(-1e4) >= 0.0);
        assert!(safe_logit(0.0).is_finite());
        assert!(safe_logit(1.0).is_finite());
    }

    #[test]
    fn squash_round_trip_recovers_theta() {
        let theta = array![-3.0, -0.25, 0.0, 1.5];
        let partials = squash_partials(theta.view());
        assert!(partials.iter().all(|r| r.abs() < 1.0));
        let back = unsquash_partials(partials.view());
        for (a, b) in theta.iter().zip(back.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-8);
        }
    }

    #[test]
    fn pacf_identity_for_single_lag() {
        let phi = pacf_to_ar(array![0.7].view());
        assert!((phi[0] - 0.7).abs() < 1e-12);
        let theta = pacf_to_ma(array![-0.4].view());
        assert!((theta[0] + 0.4).abs() < 1e-12);
    }

    #[test]
    fn ar_round_trip_recovers_partials() {
        let partials = array![0.5, -0.3, 0.2];
        let coeffs = pacf_to_ar(partials.view());
        let back = ar_to_pacf(coeffs.view());
        for (a, b) in partials.iter().zip(back.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-10);
        }
    }

    #[test]
    fn ma_round_trip_recovers_partials() {
        let partials = array![-0.6, 0.25, 0.1, -0.05];
        let coeffs = pacf_to_ma(partials.view());
        let back = ma_to_pacf(coeffs.view());
        for (a, b) in partials.iter().zip(back.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-10);
        }
    }

    #[test]
    fn ar2_from_partials_is_stationary() {
        // For p = 2 stationarity is |φ₂| < 1, φ₂ + φ₁ < 1, φ₂ − φ₁ < 1.
        let grid = [-0.9, -0.5, 0.0, 0.5, 0.9];
        for &r1 in &grid {
            for &r2 in &grid {
                let phi = pacf_to_ar(array![r1, r2].view());
                let (p1, p2) = (phi[0], phi[1]);
                assert!(p2.abs() < 1.0);
                assert!(p2 + p1 < 1.0);
                assert!(p2 - p1 < 1.0);
            }
        }
    }
}
