//! Post-processing of a converged [`crate::series::SeriesResult`]: the
//! efficiency drop attributable to each loss type, per-stage degree of
//! reaction, and overall (turbine-level) performance.

use crate::boundary::BoundaryConditions;
use crate::series::SeriesResult;

/// Fraction of total-to-static efficiency drop attributed to each loss
/// type, for one cascade.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EfficiencyDropBreakdown {
    pub profile: f64,
    pub incidence: f64,
    pub secondary: f64,
    pub clearance: f64,
    pub trailing: f64,
}

/// Compute the efficiency-drop breakdown for every cascade in a series.
///
/// A re-heating correction factor `dhs_total / dhs_sum` aligns the sum of
/// per-cascade isentropic enthalpy changes with the turbine's actual
/// total-to-static enthalpy drop (re-heating makes later cascades'
/// isentropic losses partially overlap, so the raw sum over-counts).
pub fn compute_efficiency_breakdown(
    series: &SeriesResult,
    h_out_s: f64,
) -> Vec<EfficiencyDropBreakdown> {
    let h0_in = series.planes.first().expect("series has planes").stagnation_abs.h;
    let h_out = series.planes.last().expect("series has planes").static_state.h;

    let dhs_total = h_out - h_out_s;
    let dhs_sum: f64 = series.cascades.iter().map(|c| c.dh_s).sum();
    let correction = dhs_total / dhs_sum;

    series
        .cascades
        .iter()
        .map(|cascade| {
            let loss_total = cascade.losses.total;
            let efficiency_drop = correction * cascade.dh_s / (h0_in - h_out_s);
            EfficiencyDropBreakdown {
                profile: cascade.losses.profile / loss_total * efficiency_drop,
                incidence: cascade.losses.incidence / loss_total * efficiency_drop,
                secondary: cascade.losses.secondary / loss_total * efficiency_drop,
                clearance: cascade.losses.tip_clearance / loss_total * efficiency_drop,
                trailing: cascade.losses.trailing_edge / loss_total * efficiency_drop,
            }
        })
        .collect()
}

/// Degree of reaction for each stage, `R = (h_rotor_in - h_rotor_out) /
/// (h_stator_in - h_rotor_out)`, assuming a strict stator/rotor alternation
/// where each stage spans exactly 6 planes (stator inlet/throat/exit, rotor
/// inlet/throat/exit): `[stator_in, stator_throat, stator_out, rotor_in,
/// rotor_throat, rotor_out]`. The rotor inlet (`base+2`, the stator's exit
/// plane by the interspace link) and rotor exit (`base+5`) bracket both the
/// numerator and denominator.
pub fn compute_stage_performance(series: &SeriesResult, number_of_stages: usize) -> Vec<f64> {
    if number_of_stages == 0 {
        return Vec::new();
    }
    let h: Vec<f64> = series.planes.iter().map(|p| p.static_state.h).collect();
    (0..number_of_stages)
        .map(|i| {
            let base = i * 6;
            (h[base + 2] - h[base + 5]) / (h[base] - h[base + 5])
        })
        .collect()
}

/// Turbine-level performance: pressure ratios, efficiencies, power, torque,
/// and the velocity-triangle summary quantities at the last plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverallPerformance {
    pub pr_tt: f64,
    pub pr_ts: f64,
    pub mass_flow_rate: f64,
    pub efficiency_tt: f64,
    pub efficiency_ts: f64,
    pub efficiency_ts_drop_kinetic: f64,
    pub efficiency_ts_drop_losses: f64,
    pub power: f64,
    pub torque: f64,
    pub angular_speed: f64,
    pub exit_flow_angle: f64,
    pub exit_velocity: f64,
    pub spouting_velocity: f64,
    pub last_blade_velocity: f64,
    pub blade_jet_ratio: f64,
    pub h0_in: f64,
    pub h0_out: f64,
    pub h_out_s: f64,
}

pub fn compute_overall_performance(
    series: &SeriesResult,
    boundary: &BoundaryConditions,
    v0: f64,
    h_out_s: f64,
) -> OverallPerformance {
    let first = series.planes.first().expect("series has planes");
    let last = series.planes.last().expect("series has planes");

    let pr_tt = first.stagnation_abs.p / last.stagnation_abs.p;
    let pr_ts = first.stagnation_abs.p / last.static_state.p;
    let h0_in = first.stagnation_abs.h;
    let h0_out = last.stagnation_abs.h;
    let v_out = last.velocity.v;
    let u_out = last.velocity.u;
    let mass_flow_rate = last.mass_flow;

    let efficiency_tt = (h0_in - h0_out) / (h0_in - h_out_s - 0.5 * v_out.powi(2));
    let efficiency_ts = (h0_in - h0_out) / (h0_in - h_out_s);
    let efficiency_ts_drop_kinetic = 0.5 * v_out.powi(2) / (h0_in - h_out_s);
    let efficiency_ts_drop_losses = 1.0 - efficiency_ts - efficiency_ts_drop_kinetic;
    let power = mass_flow_rate * (h0_in - h0_out);
    let torque = power / boundary.angular_speed;

    OverallPerformance {
        pr_tt,
        pr_ts,
        mass_flow_rate,
        efficiency_tt,
        efficiency_ts,
        efficiency_ts_drop_kinetic,
        efficiency_ts_drop_losses,
        power,
        torque,
        angular_speed: boundary.angular_speed,
        exit_flow_angle: last.velocity.alpha,
        exit_velocity: v_out,
        spouting_velocity: v0,
        last_blade_velocity: u_out,
        blade_jet_ratio: u_out / v0,
        h0_in,
        h0_out,
        h_out_s,
    }
}
