//! optimization — shared numerical fitting layer.
//!
//! Purpose
//! -------
//! Provide the cost-minimization machinery used by every model in the crate:
//! a user-facing [`Objective`] trait, an L-BFGS driver built on `argmin` with
//! robust finite-difference gradients, and numerically stable transforms
//! between unconstrained optimizer space and constrained model space.
//!
//! Key behaviors
//! -------------
//! - [`objective`] defines the [`Objective`] trait, validated [`FitOptions`],
//!   and the normalized [`FitOutcome`] result type.
//! - [`lbfgs`] adapts an objective into an `argmin` problem, wires L-BFGS
//!   with a More–Thuente or Hager–Zhang line search, and exposes the
//!   high-level [`minimize`] entry point.
//! - [`transforms`] maps θ blocks into `(0, 1)` smoothing weights and into
//!   stationary/invertible ARMA coefficient vectors, so every point the
//!   optimizer visits is a valid model.
//! - [`errors`] centralizes optimizer error types; `argmin` backend errors
//!   are normalized into typed [`OptError`] variants.
//!
//! Conventions
//! -----------
//! - Parameter vectors and gradients are `ndarray` containers over `f64`.
//! - The optimizer minimizes the cost directly; objectives that are
//!   likelihoods return the negative log-likelihood.
//! - Finite differences are taken with respect to the unconstrained vector;
//!   reparameterization happens inside each objective.

pub mod errors;
pub mod lbfgs;
pub mod objective;
pub mod transforms;

pub use self::errors::{OptError, OptResult};
pub use self::lbfgs::minimize;
pub use self::objective::{FitOptions, FitOutcome, LineSearch, Objective};
