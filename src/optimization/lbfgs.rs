//! L-BFGS driver: argmin adapter, solver builders, and the high-level
//! [`minimize`] entry point.
//!
//! An [`Objective`] is exposed to `argmin` through [`ArgminAdapter`], which
//! forwards `value` as the cost and supplies a gradient either analytically
//! (when the objective implements `grad`) or via finite differences of the
//! cost. Central differences are tried first; if an evaluation inside the
//! finite-difference closure fails, or the resulting gradient does not
//! validate, the computation falls back to forward differences once.
use std::cell::RefCell;

use argmin::core::{CostFunction, Error, Executor, Gradient, IterState, Solver, State};
use argmin::solver::linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch};
use argmin::solver::quasinewton::LBFGS;
use finitediff::FiniteDiff;

use crate::optimization::{
    errors::{OptError, OptResult},
    objective::{
        validate_grad, Cost, FitOptions, FitOutcome, Grad, LineSearch, Objective, Theta,
        DEFAULT_LBFGS_MEM,
    },
};

/// More–Thuente line search over the crate's numeric shapes.
pub type MoreThuenteLs = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// Hager–Zhang line search over the crate's numeric shapes.
pub type HagerZhangLs = HagerZhangLineSearch<Theta, Grad, Cost>;

/// L-BFGS wired with a More–Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLs, Theta, Grad, Cost>;

/// L-BFGS wired with a Hager–Zhang line search.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLs, Theta, Grad, Cost>;

/// Bridges an [`Objective`] to `argmin`'s `CostFunction` and `Gradient`.
#[derive(Debug, Clone)]
pub struct ArgminAdapter<'a, F: Objective> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: Objective> ArgminAdapter<'a, F> {
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

impl<'a, F: Objective> CostFunction for ArgminAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the cost `c(θ)`, rejecting non-finite values.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.value(theta, self.data)?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(output)
    }
}

impl<'a, F: Objective> Gradient for ArgminAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate the gradient of the cost at `θ`.
    ///
    /// Uses the analytic gradient when the objective provides one, otherwise
    /// finite-differences the cost closure. The closure cannot use `?`, so the
    /// first evaluation error is captured in `closure_err` and replayed after
    /// the finite-difference call returns.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = theta.len();
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, dim)?;
                Ok(g)
            }
            Err(OptError::GradientNotImplemented) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                let cost_fn = |theta: &Theta| -> f64 {
                    match self.cost(theta) {
                        Ok(val) => val,
                        Err(e) => {
                            let mut slot = closure_err.borrow_mut();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                            f64::NAN
                        }
                    }
                };
                let fd_grad = theta.central_diff(&cost_fn);
                if closure_err.borrow().is_some() {
                    return Ok(forward_diff_checked(theta, &cost_fn, &closure_err)?);
                }
                match validate_grad(&fd_grad, dim) {
                    Ok(()) => Ok(fd_grad),
                    Err(_) => Ok(forward_diff_checked(theta, &cost_fn, &closure_err)?),
                }
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Forward-difference gradient with error capture and validation.
///
/// Clears `closure_err`, runs `forward_diff`, then surfaces any error the
/// closure captured during evaluation; the resulting gradient must validate
/// (matching dimension, finite entries) or an error is returned.
fn forward_diff_checked<G>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad>
where
    G: Fn(&Theta) -> f64,
{
    closure_err.borrow_mut().take();
    let grad = theta.forward_diff(func);
    if let Some(err) = closure_err.borrow_mut().take() {
        return Err(err.into());
    }
    validate_grad(&grad, theta.len())?;
    Ok(grad)
}

/// Build an L-BFGS solver with a Hager–Zhang line search from `opts`.
pub fn build_lbfgs_hager_zhang(opts: &FitOptions) -> OptResult<LbfgsHagerZhang> {
    let hager_zhang = HagerZhangLs::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsHagerZhang::new(hager_zhang, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Build an L-BFGS solver with a More–Thuente line search from `opts`.
pub fn build_lbfgs_more_thuente(opts: &FitOptions) -> OptResult<LbfgsMoreThuente> {
    let more_thuente = MoreThuenteLs::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsMoreThuente::new(more_thuente, mem);
    configure_lbfgs(lbfgs, opts)
}

fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &FitOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

/// Run an `argmin` solver on an adapted objective and normalize the result.
///
/// `theta0` is consumed and set on the executor state. Any `argmin` runtime
/// error (line-search failures, solver errors) is converted through the
/// crate's `From<argmin::core::Error>` into a typed [`OptError`].
fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &FitOptions, problem: ArgminAdapter<'a, F>, solver: S,
) -> OptResult<FitOutcome>
where
    F: Objective,
    S: Solver<ArgminAdapter<'a, F>, IterState<Theta, Grad, (), (), (), f64>> + 'static,
{
    let mut executor = Executor::new(problem, solver);
    executor = executor.configure(|state| {
        let state = state.param(theta0);
        match opts.max_iter {
            Some(m) => state.max_iters(m as u64),
            None => state,
        }
    });
    let result = executor.run()?;
    let state = result.state();
    FitOutcome::from_state(
        state.get_best_param().cloned(),
        state.get_best_cost(),
        state.get_termination_status(),
        state.get_iter(),
        state.get_gradient(),
    )
}

/// Minimize a cost `c(θ)` using L-BFGS with the configured line search.
///
/// # Behavior
/// - Validates the initial guess via `f.check(theta0, data)`.
/// - Wraps `(f, data)` in an [`ArgminAdapter`] and builds an L-BFGS solver
///   with either a More–Thuente or a Hager–Zhang line search.
/// - Returns a normalized [`FitOutcome`].
///
/// # Errors
/// - Propagates any error from `f.check`.
/// - Propagates builder errors and runtime errors from the solver.
/// - Returns an error when the solver produced no finite best parameters.
pub fn minimize<F: Objective>(
    f: &F, theta0: Theta, data: &F::Data, opts: &FitOptions,
) -> OptResult<FitOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgminAdapter::new(f, data);
    match opts.line_search {
        LineSearch::MoreThuente => {
            let solver = build_lbfgs_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearch::HagerZhang => {
            let solver = build_lbfgs_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}
