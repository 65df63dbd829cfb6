//! Expand a small set of heuristic performance parameters (reaction,
//! efficiencies, critical Mach number) into a full scaled unknown vector,
//! by walking the cascades forward with the same rothalpy-conservation and
//! velocity-triangle relations the cascade evaluator itself uses.
//!
//! This is not a root find: every quantity below is either read straight
//! off the boundary condition or solved in closed form, so the result is a
//! plausible starting point for Newton's method rather than a converged
//! solution. Flow is assumed to follow the blade metal angle exactly (zero
//! deviation) and the available enthalpy drop is split evenly across
//! cascades, with the reaction parameter further splitting each stage's
//! share between its stator and rotor.

use nalgebra::Vector3;
use tm_assembly::{
    BoundaryConditions, CascadeSpec, CascadeUnknowns, CriticalUnknowns, MachineReferenceValues,
    MachineUnknowns,
};
use tm_cascade::{
    evaluate_cascade_exit, evaluate_cascade_inlet, evaluate_cascade_interspace, CascadeExitInput,
    CascadeInletInput, ChokingModel, ThroatUnknowns,
};
use tm_core::degtrig::sind;
use tm_fluids::PropertyOracle;

use crate::error::DriverResult;
use crate::model::ModelConfig;

/// The four scalar performance parameters the original heuristic guess is
/// built from: degree of reaction, total-to-total and total-to-static
/// efficiency, and critical relative Mach number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicParams {
    pub reaction: f64,
    pub eta_tt: f64,
    pub eta_ts: f64,
    /// Carried for parity with the retry ladder's parameter surface; this
    /// expansion derives the throat/exit velocity guess directly from
    /// rothalpy conservation rather than from an assumed critical Mach
    /// ratio, so it does not feed into the guess itself.
    pub ma_crit: f64,
}

/// The point-one default heuristic: a middling reaction design with
/// reasonable, but not optimistic, efficiencies.
pub const DEFAULT_HEURISTIC: HeuristicParams = HeuristicParams {
    reaction: 0.5,
    eta_tt: 0.9,
    eta_ts: 0.8,
    ma_crit: 0.95,
};

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![start];
    }
    (0..n)
        .map(|i| start + (end - start) * (i as f64) / ((n - 1) as f64))
        .collect()
}

/// A ladder of 11 heuristic variants spanning a wide reaction and
/// efficiency range, tried in order when the default heuristic fails to
/// converge. The critical Mach number is held fixed across the ladder --
/// only reaction and efficiency are varied.
pub fn retry_ladder_heuristics() -> Vec<HeuristicParams> {
    const N: usize = 11;
    let reaction = linspace(0.0, 0.95, N);
    let eta_ts = linspace(0.6, 0.9, N);
    let eta_tt = linspace(0.7, 1.0, N);
    (0..N)
        .map(|i| HeuristicParams {
            reaction: reaction[i],
            eta_tt: eta_tt[i],
            eta_ts: eta_ts[i],
            ma_crit: 0.9,
        })
        .collect()
}

/// Typical fraction of the spouting velocity carried by the turbine inlet
/// absolute velocity, used to seed `v_in` before any cascade has been
/// evaluated.
const INLET_VELOCITY_FRACTION: f64 = 0.15;

fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.01, 0.99)
}

#[allow(clippy::too_many_arguments)]
fn quadratic_positive_root(u_sinb: f64, c: f64, fallback: f64) -> f64 {
    let discriminant = u_sinb * u_sinb - 4.0 * c;
    if discriminant < 0.0 {
        return fallback;
    }
    let w = 0.5 * (-u_sinb + discriminant.sqrt());
    if w > 0.0 && w.is_finite() {
        w
    } else {
        fallback
    }
}

/// Build a full [`MachineUnknowns`] guess by propagating the boundary
/// conditions forward through each cascade using `heuristic`.
pub fn expand_guess(
    boundary: &BoundaryConditions,
    reference: &MachineReferenceValues,
    cascades: &[CascadeSpec],
    model: &ModelConfig,
    fluid: &dyn PropertyOracle,
    heuristic: &HeuristicParams,
) -> DriverResult<MachineUnknowns> {
    let scaling = reference.scaling;
    let n = cascades.len();

    let dh0_total = boundary.h0_in - reference.h_out_s;
    let dh_cascade = heuristic.eta_ts * dh0_total / n as f64;

    let v_in_guess = INLET_VELOCITY_FRACTION * scaling.v0;
    let mut h0_in = boundary.h0_in;
    let mut s_in = boundary.s_in;
    let mut alpha_in = boundary.alpha_in;
    let mut v_in = v_in_guess;

    let mut out_cascades = Vec::with_capacity(n);

    for (i, spec) in cascades.iter().enumerate() {
        let angular_speed = boundary.angular_speed * ((i % 2) as f64);

        let inlet_plane = evaluate_cascade_inlet(
            CascadeInletInput {
                h0: h0_in,
                s: s_in,
                v: v_in,
                alpha: alpha_in,
            },
            fluid,
            spec.inlet_geometry,
            angular_speed,
        )?;

        // Split each stage's drop between its stator (1 - R) and rotor (R);
        // a lone trailing stator gets the uniform per-cascade share.
        let dh_i = if i % 2 == 1 {
            2.0 * heuristic.reaction * dh_cascade
        } else if i + 1 < n {
            2.0 * (1.0 - heuristic.reaction) * dh_cascade
        } else {
            dh_cascade
        };
        let h0_exit_target = h0_in - dh_i;

        let beta_exit = spec.metal_angle_te;
        let u_exit = angular_speed * spec.exit_geometry.radius_mean;
        let u_sinb = u_exit * sind(beta_exit);
        let w_exit = quadratic_positive_root(
            u_sinb,
            inlet_plane.rothalpy - h0_exit_target,
            0.3 * scaling.v0,
        );

        let ds_i = (dh_i * (1.0 - heuristic.eta_ts) / inlet_plane.static_state.t.max(1.0)).max(0.0);
        let s_throat_guess = s_in + 0.5 * ds_i;
        let s_exit_guess = s_in + ds_i;

        let w_throat_scaled = (w_exit / scaling.v0).clamp(0.05, 3.0);
        let s_throat_scaled = clamp_unit((s_throat_guess - scaling.s_min) / scaling.s_range);
        let w_out_scaled = (w_exit / scaling.v0).clamp(0.05, 3.0);
        let s_out_scaled = clamp_unit((s_exit_guess - scaling.s_min) / scaling.s_range);
        let beta_out_scaled = clamp_unit((beta_exit - scaling.angle_min) / scaling.angle_range);

        let critical = match spec.choking_model {
            ChokingModel::Critical => {
                let v_in_local_scaled = (v_in / scaling.v0).clamp(0.01, 3.0);
                CriticalUnknowns::Critical(Vector3::new(
                    v_in_local_scaled,
                    w_throat_scaled,
                    s_throat_scaled,
                ))
            }
            ChokingModel::Throat => CriticalUnknowns::Throat(ThroatUnknowns {
                w_throat_scaled,
                s_throat_scaled,
                beta_throat_scaled: beta_out_scaled,
            }),
            ChokingModel::IsentropicThroat => {
                CriticalUnknowns::IsentropicThroat { w_throat_scaled }
            }
        };

        out_cascades.push(CascadeUnknowns {
            w_throat_scaled,
            s_throat_scaled,
            w_out_scaled,
            s_out_scaled,
            beta_out_scaled,
            critical,
        });

        let (exit_plane, _losses) = evaluate_cascade_exit(
            CascadeExitInput {
                w: w_exit,
                beta: beta_exit,
                s: s_exit_guess,
                rothalpy: inlet_plane.rothalpy,
            },
            fluid,
            spec.exit_geometry,
            &inlet_plane,
            angular_speed,
            model.blockage,
            &model.loss_options,
            spec.loss_geometry,
        )?;

        if i != n - 1 {
            let next = &cascades[i + 1];
            let outlet = evaluate_cascade_interspace(
                exit_plane.stagnation_abs.h,
                exit_plane.velocity.v_m,
                exit_plane.velocity.v_t,
                exit_plane.static_state.rho,
                spec.exit_geometry.radius_mean,
                spec.exit_geometry.area,
                next.inlet_geometry.radius_mean_in,
                next.inlet_geometry.area_in,
                fluid,
            )?;
            h0_in = outlet.h0_in;
            s_in = outlet.s_in;
            alpha_in = outlet.alpha_in;
            v_in = outlet.v_in;
        }
    }

    Ok(MachineUnknowns {
        v_in_scaled: (v_in_guess / scaling.v0).clamp(0.01, 3.0),
        cascades: out_cascades,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_ladder_has_eleven_variants_with_constant_critical_mach() {
        let ladder = retry_ladder_heuristics();
        assert_eq!(ladder.len(), 11);
        assert!(ladder.iter().all(|h| h.ma_crit == 0.9));
        assert_eq!(ladder.first().unwrap().reaction, 0.0);
        assert!((ladder.last().unwrap().reaction - 0.95).abs() < 1e-12);
    }

    #[test]
    fn linspace_matches_endpoints() {
        let values = linspace(0.6, 0.9, 11);
        assert_eq!(values.len(), 11);
        assert!((values[0] - 0.6).abs() < 1e-12);
        assert!((values[10] - 0.9).abs() < 1e-12);
    }
}
