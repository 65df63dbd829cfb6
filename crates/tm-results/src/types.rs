//! Serializable per-operating-point result records.
//!
//! Mirrors the section layout the original tool and its configuration both
//! expose: `operation_point`, `overall`, `plane`, `cascade`, `stage`,
//! `solver`. None of the evaluation crates below this one depend on `serde`
//! themselves (they are pure numerics); this crate is the seam where their
//! plain-data results get a serializable shape for a CLI or downstream tool
//! to emit as JSON or YAML.

use serde::{Deserialize, Serialize};

/// The boundary conditions an operating point was solved at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationPointRecord {
    pub fluid_name: String,
    pub p0_in: f64,
    pub t0_in: f64,
    pub p_out: f64,
    pub alpha_in: f64,
    pub omega: f64,
}

/// Turbine-level performance: pressure ratios, efficiencies, power, torque,
/// velocity-triangle summary at the last plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverallRecord {
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

/// Which station within a cascade a [`PlaneRecord`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Station {
    Inlet,
    Throat,
    Exit,
}

/// One flow station: a flattening of [`tm_cascade::FlowPlane`] plus which
/// cascade and station it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneRecord {
    pub cascade_index: usize,
    pub station: Station,
    pub u: f64,
    pub v: f64,
    pub v_m: f64,
    pub v_t: f64,
    pub alpha: f64,
    pub w: f64,
    pub w_m: f64,
    pub w_t: f64,
    pub beta: f64,
    pub p: f64,
    pub t: f64,
    pub h: f64,
    pub s: f64,
    pub rho: f64,
    pub p0_abs: f64,
    pub h0_abs: f64,
    pub p0_rel: f64,
    pub h0_rel: f64,
    pub ma: f64,
    pub ma_rel: f64,
    pub re: f64,
    pub mass_flow: f64,
    pub rothalpy: f64,
    pub blockage: f64,
    pub loss_error: f64,
}

/// Loss breakdown and critical-point/incidence quantities for one blade row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CascadeRecordOut {
    pub cascade_index: usize,
    pub loss_profile: f64,
    pub loss_trailing_edge: f64,
    pub loss_secondary: f64,
    pub loss_tip_clearance: f64,
    pub loss_incidence: f64,
    pub loss_total: f64,
    pub dh_s: f64,
    pub ma_crit: f64,
    pub mass_flow_crit: f64,
    pub d_crit: f64,
    pub w_crit: f64,
    pub p_crit: f64,
    pub beta_crit: f64,
    pub incidence: f64,
    pub density_correction: f64,
}

/// Degree of reaction for one stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageRecord {
    pub stage_index: usize,
    pub reaction: f64,
}

/// Convergence status for one operating point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverRecord {
    pub converged: bool,
    pub initial_guess_source: String,
    pub iterations: usize,
    pub residual_norm: f64,
}

/// The full result of one operating point, regardless of outcome: a point
/// that exhausted the retry ladder still gets a record, with `solver.converged
/// = false` and `overall`/`plane`/`cascade`/`stage` left empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingPointResult {
    pub operation_point: OperationPointRecord,
    pub overall: Option<OverallRecord>,
    pub plane: Vec<PlaneRecord>,
    pub cascade: Vec<CascadeRecordOut>,
    pub stage: Vec<StageRecord>,
    pub solver: SolverRecord,
}
