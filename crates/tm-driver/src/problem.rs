//! Wrap [`evaluate_cascade_series`] as the residual/Jacobian pair
//! `tm-solver`'s Newton iteration needs: a flat `DVector<f64>` in, a flat
//! `DVector<f64>` out.

use nalgebra::{DMatrix, DVector};
use tm_assembly::{evaluate_cascade_series, BoundaryConditions, MachineUnknowns, SeriesContext, SeriesResult};
use tm_cascade::ChokingModel;
use tm_solver::{SolverError, SolverResult};

/// Evaluate the series residual at a flat unknown vector.
pub fn residual(
    x: &DVector<f64>,
    boundary: &BoundaryConditions,
    ctx: &SeriesContext,
    models: &[ChokingModel],
) -> SolverResult<DVector<f64>> {
    let unknowns = MachineUnknowns::from_vector(x, models);
    let (residuals, _) = evaluate_cascade_series(&unknowns, boundary, ctx).map_err(|err| {
        SolverError::InvalidState {
            what: err.to_string(),
        }
    })?;
    Ok(residuals)
}

/// Re-evaluate the series at a converged unknown vector to recover the full
/// per-plane/per-cascade result, instead of just the residual.
pub fn evaluate(
    x: &DVector<f64>,
    boundary: &BoundaryConditions,
    ctx: &SeriesContext,
    models: &[ChokingModel],
) -> SolverResult<SeriesResult> {
    let unknowns = MachineUnknowns::from_vector(x, models);
    let (_, series) = evaluate_cascade_series(&unknowns, boundary, ctx).map_err(|err| {
        SolverError::InvalidState {
            what: err.to_string(),
        }
    })?;
    Ok(series)
}

/// Forward-difference Jacobian of [`residual`], with a per-unknown step of
/// `rel_step_fd * x` (falling back to `rel_step_fd` when `x` is zero) --
/// the same scheme used for the critical-point sub-problem in `tm-cascade`.
pub fn jacobian(
    x: &DVector<f64>,
    f0: &DVector<f64>,
    boundary: &BoundaryConditions,
    ctx: &SeriesContext,
    models: &[ChokingModel],
    rel_step_fd: f64,
) -> SolverResult<DMatrix<f64>> {
    let n = x.len();
    let m = f0.len();
    let mut jac = DMatrix::<f64>::zeros(m, n);
    for j in 0..n {
        let mut x_perturbed = x.clone();
        let mut step = rel_step_fd * x[j];
        if step == 0.0 {
            step = rel_step_fd;
        }
        x_perturbed[j] += step;

        let f_perturbed = residual(&x_perturbed, boundary, ctx, models)?;
        for i in 0..m {
            jac[(i, j)] = (f_perturbed[i] - f0[i]) / step;
        }
    }
    Ok(jac)
}
