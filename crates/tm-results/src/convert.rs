//! Turn a converged [`tm_driver::OperatingPointSolution`] into the
//! serializable [`OperatingPointResult`] record set.

use tm_assembly::{compute_overall_performance, compute_stage_performance};
use tm_cascade::FlowPlane;
use tm_driver::OperatingPointSolution;

use crate::types::{
    CascadeRecordOut, OperationPointRecord, OverallRecord, PlaneRecord, SolverRecord, Station,
    StageRecord,
};

fn plane_record(plane: &FlowPlane, cascade_index: usize, station: Station) -> PlaneRecord {
    PlaneRecord {
        cascade_index,
        station,
        u: plane.velocity.u,
        v: plane.velocity.v,
        v_m: plane.velocity.v_m,
        v_t: plane.velocity.v_t,
        alpha: plane.velocity.alpha,
        w: plane.velocity.w,
        w_m: plane.velocity.w_m,
        w_t: plane.velocity.w_t,
        beta: plane.velocity.beta,
        p: plane.static_state.p,
        t: plane.static_state.t,
        h: plane.static_state.h,
        s: plane.static_state.s,
        rho: plane.static_state.rho,
        p0_abs: plane.stagnation_abs.p,
        h0_abs: plane.stagnation_abs.h,
        p0_rel: plane.stagnation_rel.p,
        h0_rel: plane.stagnation_rel.h,
        ma: plane.ma,
        ma_rel: plane.ma_rel,
        re: plane.re,
        mass_flow: plane.mass_flow,
        rothalpy: plane.rothalpy,
        blockage: plane.blockage,
        loss_error: plane.loss_error,
    }
}

/// Build the full result record for a converged solution.
///
/// `number_of_stages` is the machine's stator/rotor pair count (from
/// [`tm_geometry::MachineGeometry::number_of_stages`]); it determines how
/// many [`StageRecord`]s are derived and must match the cascade count the
/// solution was evaluated with.
pub fn build_operating_point_result(
    solution: &OperatingPointSolution,
    number_of_stages: usize,
) -> crate::ResultsResult<super::types::OperatingPointResult> {
    let series = &solution.series;
    let boundary = tm_assembly::BoundaryConditions {
        h0_in: series
            .planes
            .first()
            .ok_or_else(|| crate::ResultsError::EmptySeries)?
            .stagnation_abs
            .h,
        s_in: series.planes.first().unwrap().static_state.s,
        alpha_in: solution.point.alpha_in,
        angular_speed: solution.point.omega,
        p_out: solution.point.p_out,
        p0_in: solution.point.p0_in,
    };
    let overall = compute_overall_performance(
        series,
        &boundary,
        solution.reference.scaling.v0,
        solution.reference.h_out_s,
    );

    let plane = series
        .planes
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let cascade_index = i / 3;
            let station = match i % 3 {
                0 => Station::Inlet,
                1 => Station::Throat,
                _ => Station::Exit,
            };
            plane_record(p, cascade_index, station)
        })
        .collect();

    let cascade = series
        .cascades
        .iter()
        .enumerate()
        .map(|(i, c)| CascadeRecordOut {
            cascade_index: i,
            loss_profile: c.losses.profile,
            loss_trailing_edge: c.losses.trailing_edge,
            loss_secondary: c.losses.secondary,
            loss_tip_clearance: c.losses.tip_clearance,
            loss_incidence: c.losses.incidence,
            loss_total: c.losses.total,
            dh_s: c.dh_s,
            ma_crit: c.ma_crit,
            mass_flow_crit: c.mass_flow_crit,
            d_crit: c.d_crit,
            w_crit: c.w_crit,
            p_crit: c.p_crit,
            beta_crit: c.beta_crit,
            incidence: c.incidence,
            density_correction: c.density_correction,
        })
        .collect();

    let stage = compute_stage_performance(series, number_of_stages)
        .into_iter()
        .enumerate()
        .map(|(i, reaction)| StageRecord {
            stage_index: i,
            reaction,
        })
        .collect();

    Ok(super::types::OperatingPointResult {
        operation_point: OperationPointRecord {
            fluid_name: solution.point.fluid_name.clone(),
            p0_in: solution.point.p0_in,
            t0_in: solution.point.t0_in,
            p_out: solution.point.p_out,
            alpha_in: solution.point.alpha_in,
            omega: solution.point.omega,
        },
        overall: Some(OverallRecord {
            pr_tt: overall.pr_tt,
            pr_ts: overall.pr_ts,
            mass_flow_rate: overall.mass_flow_rate,
            efficiency_tt: overall.efficiency_tt,
            efficiency_ts: overall.efficiency_ts,
            efficiency_ts_drop_kinetic: overall.efficiency_ts_drop_kinetic,
            efficiency_ts_drop_losses: overall.efficiency_ts_drop_losses,
            power: overall.power,
            torque: overall.torque,
            angular_speed: overall.angular_speed,
            exit_flow_angle: overall.exit_flow_angle,
            exit_velocity: overall.exit_velocity,
            spouting_velocity: overall.spouting_velocity,
            last_blade_velocity: overall.last_blade_velocity,
            blade_jet_ratio: overall.blade_jet_ratio,
            h0_in: overall.h0_in,
            h0_out: overall.h0_out,
            h_out_s: overall.h_out_s,
        }),
        plane,
        cascade,
        stage,
        solver: SolverRecord {
            converged: true,
            initial_guess_source: solution.stats.initial_guess_source.clone(),
            iterations: solution.stats.iterations,
            residual_norm: solution.stats.residual_norm,
        },
    })
}

/// Build the record for a point that failed to converge: everything but
/// `operation_point` and `solver` is left empty, per the "a point that
/// exhausts the retry ladder is marked `NonConvergence` and does not halt
/// the sweep" contract.
pub fn build_non_convergence_result(
    point: &tm_driver::OperatingPoint,
    what: String,
) -> super::types::OperatingPointResult {
    super::types::OperatingPointResult {
        operation_point: OperationPointRecord {
            fluid_name: point.fluid_name.clone(),
            p0_in: point.p0_in,
            t0_in: point.t0_in,
            p_out: point.p_out,
            alpha_in: point.alpha_in,
            omega: point.omega,
        },
        overall: None,
        plane: Vec::new(),
        cascade: Vec::new(),
        stage: Vec::new(),
        solver: SolverRecord {
            converged: false,
            initial_guess_source: what,
            iterations: 0,
            residual_norm: f64::NAN,
        },
    }
}
