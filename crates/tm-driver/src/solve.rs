//! Solve one [`OperatingPoint`] to a converged [`SeriesResult`], retrying
//! with progressively different initial guesses when the warm start (or the
//! default heuristic) fails to converge.

use nalgebra::DVector;
use tm_assembly::{MachineReferenceValues, SeriesResult};
use tm_cascade::ChokingModel;
use tm_geometry::MachineGeometry;
use tm_solver::{newton_solve, NewtonConfig, NewtonResult};
use tracing::{debug, warn};

use crate::cache::WarmStartCache;
use crate::error::{DriverError, DriverResult};
use crate::guess::{expand_guess, retry_ladder_heuristics, DEFAULT_HEURISTIC};
use crate::model::{build_series_context, ModelConfig};
use crate::point::OperatingPoint;
use crate::problem::{evaluate, jacobian, residual};
use crate::reference::build_reference;

/// Convergence bookkeeping from the Newton iteration that produced a
/// solution: which initial guess it took, how many iterations it ran, and
/// the final residual norm.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveStats {
    pub initial_guess_source: String,
    pub iterations: usize,
    pub residual_norm: f64,
}

/// The outcome of a converged solve: the flat unknown vector (for warm-start
/// caching), the fully evaluated series result, and the scaling used to
/// evaluate it (needed downstream to compute overall/stage performance).
pub struct OperatingPointSolution {
    pub point: OperatingPoint,
    pub unknowns: DVector<f64>,
    pub series: SeriesResult,
    pub reference: MachineReferenceValues,
    pub stats: SolveStats,
}

fn try_solve(
    x0: DVector<f64>,
    boundary: &tm_assembly::BoundaryConditions,
    ctx: &tm_assembly::SeriesContext,
    models: &[ChokingModel],
    config: &NewtonConfig,
) -> DriverResult<NewtonResult> {
    let result = newton_solve(
        x0,
        |x| residual(x, boundary, ctx, models),
        |x| {
            let f0 = residual(x, boundary, ctx, models)?;
            jacobian(x, &f0, boundary, ctx, models, ctx.rel_step_fd)
        },
        config,
    )?;
    Ok(result)
}

/// Solve a single operating point, trying a cached warm start first, then
/// the default heuristic, then the 11-variant retry ladder in order.
pub fn solve_operating_point(
    point: &OperatingPoint,
    geometry: &MachineGeometry,
    model: &ModelConfig,
    fluid: &dyn tm_fluids::PropertyOracle,
    cache: &mut WarmStartCache,
    newton_config: &NewtonConfig,
) -> DriverResult<OperatingPointSolution> {
    point.validate()?;

    let op_reference = build_reference(point, geometry, fluid)?;
    let ctx = build_series_context(geometry, model, fluid, &op_reference.reference.scaling);
    let models = ctx.choking_models();

    let mut attempts: Vec<(String, DVector<f64>)> = Vec::new();

    if let Some((warm, distance)) = cache.nearest(point) {
        debug!(distance, "using warm-started guess from cache");
        attempts.push(("warm start".to_string(), warm.clone()));
    }

    let default_guess = expand_guess(
        &op_reference.boundary,
        &op_reference.reference,
        &ctx.cascades,
        model,
        fluid,
        &DEFAULT_HEURISTIC,
    )?;
    attempts.push(("default heuristic".to_string(), default_guess.to_vector()));

    for (i, heuristic) in retry_ladder_heuristics().iter().enumerate() {
        let guess = expand_guess(
            &op_reference.boundary,
            &op_reference.reference,
            &ctx.cascades,
            model,
            fluid,
            heuristic,
        )?;
        attempts.push((format!("retry ladder #{i}"), guess.to_vector()));
    }

    for (label, x0) in attempts {
        match try_solve(x0, &op_reference.boundary, &ctx, &models, newton_config) {
            Ok(result) => {
                let series = evaluate(&result.x, &op_reference.boundary, &ctx, &models)?;
                cache.insert(point.clone(), result.x.clone());
                return Ok(OperatingPointSolution {
                    point: point.clone(),
                    unknowns: result.x,
                    series,
                    reference: op_reference.reference,
                    stats: SolveStats {
                        initial_guess_source: label,
                        iterations: result.iterations,
                        residual_norm: result.residual_norm,
                    },
                });
            }
            Err(err) => {
                warn!(attempt = %label, error = %err, "solve attempt failed, retrying");
            }
        }
    }

    Err(DriverError::NonConvergence {
        what: format!(
            "exhausted warm start, default heuristic, and all {} retry-ladder variants",
            retry_ladder_heuristics().len()
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_config_uses_throat_choking() {
        // Full end-to-end solves are covered by tests/seed_scenarios.rs;
        // this just pins the default model's choking mode.
        let model = ModelConfig::default();
        assert_eq!(model.choking_model, tm_cascade::ChokingModel::Throat);
    }
}
