//! Damped Newton root finder with backtracking line search.
//!
//! Generic over the residual and Jacobian functions; the turbine-specific
//! layers above supply the bookkeeping (scaling, validity checks) through
//! the optional validator/limiter hooks rather than baking any physical
//! assumption into the solver itself.

use crate::error::{SolverError, SolverResult};
use nalgebra::DVector;

/// Which damped-Newton variant `newton_solve` runs.
///
/// Both share the same finite-difference Jacobian and convergence-history
/// bookkeeping; they differ only in how a trial step is chosen and damped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SolverMethod {
    /// Backtracking-line-search Newton step, SVD pseudo-inverse fallback on
    /// a singular Jacobian. The default fallback method.
    #[default]
    LevenbergMarquardt,
    /// Powell's hybrid dogleg: interpolates between the Newton step and the
    /// steepest-descent (Cauchy) step, scaled to a trust-region radius that
    /// adapts from the actual-vs-predicted reduction ratio each iteration.
    PowellHybrid,
}

/// Newton solver configuration.
#[derive(Clone, Copy, Debug)]
pub struct NewtonConfig {
    /// Which solver method `newton_solve` dispatches to.
    pub method: SolverMethod,
    /// Maximum iterations
    pub max_iterations: usize,
    /// Absolute tolerance for residual norm
    pub abs_tol: f64,
    /// Relative tolerance for residual norm
    pub rel_tol: f64,
    /// Line search backtracking factor
    pub line_search_beta: f64,
    /// Maximum line search iterations
    pub max_line_search_iters: usize,
    /// Initial trust-region radius (`SolverMethod::PowellHybrid` only)
    pub initial_trust_radius: f64,
    /// Trust-region radius is never grown past this (`PowellHybrid` only)
    pub max_trust_radius: f64,
    /// Minimum actual/predicted reduction ratio to accept a dogleg step
    /// (`PowellHybrid` only)
    pub trust_region_eta: f64,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            method: SolverMethod::default(),
            max_iterations: 200,
            abs_tol: 1e-6,
            rel_tol: 1e-6,
            line_search_beta: 0.5,
            max_line_search_iters: 25,
            initial_trust_radius: 1.0,
            max_trust_radius: 1e3,
            trust_region_eta: 1e-4,
        }
    }
}

/// Newton iteration result.
pub struct NewtonResult {
    /// Solution vector
    pub x: DVector<f64>,
    /// Final residual norm
    pub residual_norm: f64,
    /// Number of iterations
    pub iterations: usize,
    /// Converged flag
    pub converged: bool,
}

/// Solve `residual_fn(x) = 0`, dispatching on `config.method`.
///
/// `SolverMethod::LevenbergMarquardt` runs a plain damped Newton iteration
/// with no validity checks beyond residual reduction (see
/// [`newton_solve_with_validator`] for the hook-carrying variant);
/// `SolverMethod::PowellHybrid` runs the dogleg trust-region iteration in
/// [`dogleg_solve`].
pub fn newton_solve<F, J>(
    x0: DVector<f64>,
    residual_fn: F,
    jacobian_fn: J,
    config: &NewtonConfig,
) -> SolverResult<NewtonResult>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
    J: Fn(&DVector<f64>) -> SolverResult<nalgebra::DMatrix<f64>>,
{
    match config.method {
        SolverMethod::LevenbergMarquardt => newton_solve_with_validator(
            x0,
            residual_fn,
            jacobian_fn,
            config,
            None::<fn(&DVector<f64>) -> bool>,
            None::<fn(&DVector<f64>, &DVector<f64>) -> bool>,
            None::<fn(&DVector<f64>, &DVector<f64>) -> DVector<f64>>,
            None,
        ),
        SolverMethod::PowellHybrid => dogleg_solve(x0, residual_fn, jacobian_fn, config),
    }
}

/// Newton solver with line search and an optional state validator, step
/// validator, step limiter, and iteration observer.
///
/// `state_validator` rejects trial states that are physically invalid (e.g.
/// an entropy or Mach number outside the range the property oracle can
/// evaluate); when it returns `false` the line search backtracks without
/// paying for a residual evaluation. `step_limiter` clamps a proposed step
/// before it is checked or evaluated (e.g. capping how far entropy can move
/// in one iteration).
#[allow(clippy::too_many_arguments)]
pub fn newton_solve_with_validator<F, J, V, S, L>(
    x0: DVector<f64>,
    residual_fn: F,
    jacobian_fn: J,
    config: &NewtonConfig,
    state_validator: Option<V>,
    step_validator: Option<S>,
    step_limiter: Option<L>,
    mut iteration_observer: Option<&mut dyn FnMut(usize, f64)>,
) -> SolverResult<NewtonResult>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
    J: Fn(&DVector<f64>) -> SolverResult<nalgebra::DMatrix<f64>>,
    V: Fn(&DVector<f64>) -> bool,
    S: Fn(&DVector<f64>, &DVector<f64>) -> bool,
    L: Fn(&DVector<f64>, &DVector<f64>) -> DVector<f64>,
{
    let mut x = x0.clone();
    let mut r = residual_fn(&x)?;
    let mut r_norm = r.norm();
    let r0_norm = r_norm;

    for iter in 0..config.max_iterations {
        if let Some(observer) = iteration_observer.as_mut() {
            observer(iter, r_norm);
        }

        if r_norm < config.abs_tol || r_norm < config.rel_tol * r0_norm {
            return Ok(NewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter,
                converged: true,
            });
        }

        let jac = jacobian_fn(&x)?;

        // Solve J * dx = -r, falling back to a regularized SVD pseudo-inverse
        // when the Jacobian is singular or ill-conditioned.
        let dx = match jac.clone().lu().solve(&(-r.clone())) {
            Some(solution) => solution,
            None => {
                let svd = jac.svd(true, true);
                let threshold = 1e-10 * svd.singular_values.max();
                svd.solve(&(-r.clone()), threshold)
                    .map_err(|_| SolverError::Numeric {
                        what: "Jacobian is severely ill-conditioned; SVD pseudo-inverse failed"
                            .to_string(),
                    })?
            }
        };

        let mut alpha = 1.0;
        let mut x_new = &x + alpha * &dx;
        let mut r_new: Option<DVector<f64>> = None;
        let mut r_new_norm = f64::INFINITY;

        for _ls_iter in 0..config.max_line_search_iters {
            if let Some(ref limiter) = step_limiter {
                x_new = limiter(&x, &x_new);
            }

            let mut valid = state_validator
                .as_ref()
                .is_none_or(|validator| validator(&x_new));
            if valid {
                valid = step_validator
                    .as_ref()
                    .is_none_or(|validator| validator(&x, &x_new));
            }

            if valid {
                match residual_fn(&x_new) {
                    Ok(r) => {
                        r_new_norm = r.norm();
                        if r_new_norm < r_norm {
                            r_new = Some(r);
                            break;
                        }
                    }
                    Err(_) => {
                        // Residual computation failed; treat as invalid state.
                    }
                }
            }

            alpha *= config.line_search_beta;
            x_new = &x + alpha * &dx;
        }

        let r_new = r_new.ok_or_else(|| SolverError::ConvergenceFailed {
            what: format!(
                "Line search failed to find valid step at iteration {}",
                iter
            ),
        })?;

        x = x_new;
        r = r_new;
        r_norm = r_new_norm;

        if alpha < 1e-12 {
            return Err(SolverError::ConvergenceFailed {
                what: format!(
                    "Line search stagnated (alpha < 1e-12) at iteration {}",
                    iter
                ),
            });
        }
    }

    Err(SolverError::ConvergenceFailed {
        what: format!(
            "Maximum iterations {} reached, residual = {}",
            config.max_iterations, r_norm
        ),
    })
}

/// Powell's hybrid dogleg step: the Newton step `p_gn` if it already lies
/// inside the trust region, the steepest-descent step scaled to the region
/// boundary if even that overshoots, otherwise the point where the segment
/// from the Cauchy step to the Newton step crosses the boundary.
fn dogleg_step(cauchy: &DVector<f64>, newton: &DVector<f64>, radius: f64) -> DVector<f64> {
    let newton_norm = newton.norm();
    if newton_norm <= radius {
        return newton.clone();
    }

    let cauchy_norm = cauchy.norm();
    if cauchy_norm >= radius {
        return cauchy * (radius / cauchy_norm);
    }

    // Solve ||cauchy + tau * (newton - cauchy)||^2 = radius^2 for tau in [0, 1].
    let diff = newton - cauchy;
    let a = diff.norm_squared();
    let b = 2.0 * cauchy.dot(&diff);
    let c = cauchy.norm_squared() - radius * radius;
    let discriminant = (b * b - 4.0 * a * c).max(0.0);
    let tau = if a > 1e-300 {
        ((-b + discriminant.sqrt()) / (2.0 * a)).clamp(0.0, 1.0)
    } else {
        0.0
    };
    cauchy + tau * diff
}

/// Solve `residual_fn(x) = 0` with Powell's hybrid dogleg trust-region
/// method: each iteration computes the Gauss-Newton step and the Cauchy
/// (steepest-descent) step, combines them with [`dogleg_step`], and grows or
/// shrinks the trust-region radius from how well the linearized model
/// predicted the actual residual reduction.
pub fn dogleg_solve<F, J>(
    x0: DVector<f64>,
    residual_fn: F,
    jacobian_fn: J,
    config: &NewtonConfig,
) -> SolverResult<NewtonResult>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
    J: Fn(&DVector<f64>) -> SolverResult<nalgebra::DMatrix<f64>>,
{
    let mut x = x0.clone();
    let mut r = residual_fn(&x)?;
    let mut r_norm = r.norm();
    let r0_norm = r_norm;
    let mut radius = config.initial_trust_radius;

    for iter in 0..config.max_iterations {
        if r_norm < config.abs_tol || r_norm < config.rel_tol * r0_norm {
            return Ok(NewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter,
                converged: true,
            });
        }

        let jac = jacobian_fn(&x)?;

        let gauss_newton = match jac.clone().lu().solve(&(-r.clone())) {
            Some(step) => step,
            None => {
                let svd = jac.clone().svd(true, true);
                let threshold = 1e-10 * svd.singular_values.max();
                svd.solve(&(-r.clone()), threshold)
                    .map_err(|_| SolverError::Numeric {
                        what: "Jacobian is severely ill-conditioned; SVD pseudo-inverse failed"
                            .to_string(),
                    })?
            }
        };

        // Steepest-descent direction of 0.5*||r||^2 is g = J^T r; the Cauchy
        // point minimizes the linear model along that direction.
        let g = jac.transpose() * &r;
        let jg = &jac * &g;
        let gg = g.dot(&g);
        let jgjg = jg.dot(&jg);
        let cauchy = if jgjg > 1e-300 {
            (-(gg / jgjg)) * &g
        } else {
            DVector::zeros(g.len())
        };

        let step = dogleg_step(&cauchy, &gauss_newton, radius);
        let step_norm = step.norm();
        let x_new = &x + &step;

        let predicted_reduction = {
            let jp = &jac * &step;
            0.5 * r.norm_squared() - 0.5 * (&r + jp).norm_squared()
        };

        let trial = residual_fn(&x_new);
        let (rho, accepted_r, accepted_r_norm) = match trial {
            Ok(r_new) => {
                let actual_reduction = 0.5 * r_norm * r_norm - 0.5 * r_new.norm_squared();
                let rho = if predicted_reduction > 1e-300 {
                    actual_reduction / predicted_reduction
                } else {
                    -1.0
                };
                let r_new_norm = r_new.norm();
                (rho, Some(r_new), r_new_norm)
            }
            Err(_) => (-1.0, None, f64::INFINITY),
        };

        if rho < 0.25 {
            radius *= 0.25;
        } else if rho > 0.75 && (step_norm - radius).abs() < 1e-8 * radius.max(1.0) {
            radius = (2.0 * radius).min(config.max_trust_radius);
        }

        if rho > config.trust_region_eta {
            if let Some(r_new) = accepted_r {
                x = x_new;
                r = r_new;
                r_norm = accepted_r_norm;
            }
        }
        // rho <= eta: reject the step, keep x/r, retry next iteration at the
        // (already shrunk) radius.

        if radius < 1e-14 {
            return Err(SolverError::ConvergenceFailed {
                what: format!("Trust-region radius collapsed at iteration {}", iter),
            });
        }
    }

    Err(SolverError::ConvergenceFailed {
        what: format!(
            "Maximum iterations {} reached, residual = {}",
            config.max_iterations, r_norm
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_quadratic() {
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0] * x[0] - 4.0))
        };
        let jacobian = |x: &DVector<f64>| -> SolverResult<nalgebra::DMatrix<f64>> {
            Ok(nalgebra::DMatrix::from_element(1, 1, 2.0 * x[0]))
        };

        let x0 = DVector::from_element(1, 3.0);
        let config = NewtonConfig::default();
        let result = newton_solve(x0, residual, jacobian, &config).unwrap();

        assert!(result.converged);
        assert!((result.x[0] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn state_validator_rejects_infeasible_trial_steps() {
        // x must stay positive; the residual would otherwise push it negative.
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0] - 10.0))
        };
        let jacobian =
            |_: &DVector<f64>| -> SolverResult<nalgebra::DMatrix<f64>> { Ok(nalgebra::DMatrix::from_element(1, 1, 1.0)) };
        let validator = |x: &DVector<f64>| x[0] > 0.0;

        let x0 = DVector::from_element(1, 1.0);
        let config = NewtonConfig::default();
        let result = newton_solve_with_validator(
            x0,
            residual,
            jacobian,
            &config,
            Some(validator),
            None::<fn(&DVector<f64>, &DVector<f64>) -> bool>,
            None::<fn(&DVector<f64>, &DVector<f64>) -> DVector<f64>>,
            None,
        )
        .unwrap();

        assert!(result.converged);
        assert!(result.x[0] > 0.0);
    }

    #[test]
    fn dogleg_solves_simple_quadratic() {
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0] * x[0] - 4.0))
        };
        let jacobian = |x: &DVector<f64>| -> SolverResult<nalgebra::DMatrix<f64>> {
            Ok(nalgebra::DMatrix::from_element(1, 1, 2.0 * x[0]))
        };

        let x0 = DVector::from_element(1, 3.0);
        let config = NewtonConfig::default();
        let result = dogleg_solve(x0, residual, jacobian, &config).unwrap();

        assert!(result.converged);
        assert!((result.x[0] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn dogleg_solves_a_two_variable_system() {
        // x^2 + y^2 = 25, x - y = 1; one root is (4, 3).
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_vec(vec![
                x[0] * x[0] + x[1] * x[1] - 25.0,
                x[0] - x[1] - 1.0,
            ]))
        };
        let jacobian = |x: &DVector<f64>| -> SolverResult<nalgebra::DMatrix<f64>> {
            Ok(nalgebra::DMatrix::from_row_slice(
                2,
                2,
                &[2.0 * x[0], 2.0 * x[1], 1.0, -1.0],
            ))
        };

        let x0 = DVector::from_vec(vec![5.0, 1.0]);
        let config = NewtonConfig::default();
        let result = dogleg_solve(x0, residual, jacobian, &config).unwrap();

        assert!(result.converged);
        assert!((result.x[0] - 4.0).abs() < 1e-5);
        assert!((result.x[1] - 3.0).abs() < 1e-5);
    }

    #[test]
    fn newton_solve_dispatches_on_method() {
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0] * x[0] - 4.0))
        };
        let jacobian = |x: &DVector<f64>| -> SolverResult<nalgebra::DMatrix<f64>> {
            Ok(nalgebra::DMatrix::from_element(1, 1, 2.0 * x[0]))
        };

        let config = NewtonConfig {
            method: SolverMethod::PowellHybrid,
            ..NewtonConfig::default()
        };
        let x0 = DVector::from_element(1, 3.0);
        let result = newton_solve(x0, residual, jacobian, &config).unwrap();

        assert!(result.converged);
        assert!((result.x[0] - 2.0).abs() < 1e-6);
    }
}
