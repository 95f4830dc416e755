//! Public API surface for cost minimization.
//!
//! - [`Objective`]: trait models implement to be fitted numerically.
//! - [`FitOptions`]: configuration for the optimizer.
//! - [`LineSearch`]: choice of line search used by L-BFGS.
//! - [`FitOutcome`]: normalized result returned by the high-level
//!   [`minimize`](crate::optimization::lbfgs::minimize) API.
//!
//! Convention: the optimizer *minimizes* a scalar cost `c(θ)` directly. The
//! ARMA conditional-sum-of-squares objective returns the negative concentrated
//! log-likelihood; the exponential-smoothing objective returns the in-sample
//! sum of squared one-step errors. If an analytic gradient is provided, it
//! should be the gradient of the cost itself.
use std::str::FromStr;

use argmin::core::{TerminationReason, TerminationStatus};
use argmin_math::ArgminL2Norm;
use ndarray::Array1;

use crate::optimization::errors::{OptError, OptResult};

/// Unconstrained parameter vector passed to the optimizer.
pub type Theta = Array1<f64>;

/// Gradient of the cost with respect to `Theta`.
pub type Grad = Array1<f64>;

/// Scalar cost in minimization space.
pub type Cost = f64;

/// Default L-BFGS history size.
pub const DEFAULT_LBFGS_MEM: usize = 7;

/// User-implemented cost interface.
///
/// The optimizer minimizes `c(θ)` over the unconstrained vector `θ`; any
/// reparameterization into model space (stationarity, invertibility, (0, 1)
/// smoothing weights) is handled inside the implementation via
/// [`transforms`](crate::optimization::transforms).
///
/// - `type Data`: per-model data carried into `value`/`grad`/`check`.
///
/// Required:
/// - `value(&Theta, &Data) -> OptResult<Cost>`: evaluate the cost.
/// - `check(&Theta, &Data) -> OptResult<()>`: validation hook to reject
///   obviously invalid `θ`/`data` pairs. Called once before optimization.
///
/// Optional:
/// - `grad(&Theta, &Data) -> OptResult<Grad>`: analytic gradient of the cost.
///   If not implemented, robust finite differences are used automatically.
pub trait Objective {
    type Data: 'static;

    // Required methods
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    // Optional methods
    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Choice of line search used inside the L-BFGS solver.
///
/// Parsing is case-insensitive (`"MoreThuente"`, `"HagerZhang"`); unknown
/// names return [`OptError::InvalidLineSearch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearch {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearch {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearch::MoreThuente),
            "hagerzhang" => Ok(LineSearch::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Optimizer-level configuration.
///
/// Fields:
/// - `tol_grad` — terminate when the gradient norm falls below this threshold.
/// - `tol_cost` — terminate when the change in cost falls below this threshold.
/// - `max_iter` — iteration cap handed to the executor.
/// - `line_search` — line-search algorithm used by L-BFGS.
/// - `lbfgs_mem` — L-BFGS history size; `None` uses [`DEFAULT_LBFGS_MEM`].
///
/// Construct via [`FitOptions::new`] (validated) or [`FitOptions::default`]
/// (`tol_grad = 1e-6`, `tol_cost = None`, `max_iter = 300`, More–Thuente).
#[derive(Debug, Clone, PartialEq)]
pub struct FitOptions {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
    pub line_search: LineSearch,
    pub lbfgs_mem: Option<usize>,
}

impl FitOptions {
    /// Create a validated set of optimizer options.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
        line_search: LineSearch, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        verify_tol_grad(tol_grad)?;
        verify_tol_cost(tol_cost)?;
        if let Some(m) = max_iter {
            if m == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter: m,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        if let Some(m) = lbfgs_mem {
            if m == 0 {
                return Err(OptError::InvalidLbfgsMem {
                    mem: m,
                    reason: "L-BFGS memory must be greater than zero.",
                });
            }
        }
        Ok(Self { tol_grad, tol_cost, max_iter, line_search, lbfgs_mem })
    }
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            tol_grad: Some(1e-6),
            tol_cost: None,
            max_iter: Some(300),
            line_search: LineSearch::MoreThuente,
            lbfgs_mem: None,
        }
    }
}

/// Normalized optimizer result.
///
/// Fields:
/// - `theta_hat` — best unconstrained parameter vector found.
/// - `value` — cost at `theta_hat`.
/// - `converged` — whether the solver terminated on a convergence criterion
///   (as opposed to the iteration cap or a solver exit).
/// - `status` — human-readable termination reason.
/// - `iterations` — iterations performed.
/// - `grad_norm` — L2 norm of the last available gradient, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub grad_norm: Option<f64>,
}

impl FitOutcome {
    /// Build a [`FitOutcome`] from raw solver state, validating the estimate.
    ///
    /// `theta_hat` must be present and finite; `value` must be finite. The
    /// termination status is mapped to a `(converged, status)` pair, where
    /// only solver-side convergence (gradient/cost tolerance reached) counts
    /// as converged.
    pub fn from_state(
        theta_hat: Option<Theta>, value: f64, termination: &TerminationStatus, iterations: u64,
        grad: Option<&Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat)?;
        validate_value(value)?;
        let (converged, status) = match termination {
            TerminationStatus::Terminated(reason) => {
                let converged = matches!(
                    reason,
                    TerminationReason::SolverConverged | TerminationReason::TargetCostReached
                );
                (converged, reason.to_string())
            }
            TerminationStatus::NotTerminated => (false, "not terminated".to_string()),
        };
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(FitOutcome {
            theta_hat,
            value,
            converged,
            status,
            iterations: iterations as usize,
            grad_norm,
        })
    }
}

/// Check that an optional gradient tolerance is finite and positive.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Check that an optional cost tolerance is finite and positive.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Check a gradient for the expected dimension and finite entries.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Check that the best parameter vector exists and is finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    match theta_hat {
        Some(t) => {
            for (index, &value) in t.iter().enumerate() {
                if !value.is_finite() {
                    return Err(OptError::InvalidThetaHat {
                        index,
                        value,
                        reason: "Parameter estimates must be finite.",
                    });
                }
            }
            Ok(t)
        }
        None => Err(OptError::MissingThetaHat),
    }
}

/// Check that a cost value is finite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

/// Check that every coordinate of `theta` is finite.
pub fn validate_theta(theta: &Theta) -> OptResult<()> {
    for (index, &value) in theta.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidThetaInput { index, value });
        }
    }
    Ok(())
}
