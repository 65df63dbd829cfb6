//! Chain a machine's cascades into one residual vector: each cascade's own
//! residuals, plus the interspace link carrying its exit state to the next
//! cascade's inlet, plus the final exit-pressure residual closing the
//! boundary-value problem.

use nalgebra::DVector;
use tm_cascade::{
    evaluate_cascade_interspace, ChokingModel, ExitGeometry, FlowPlane, InletGeometry,
    ReferenceValues, ThroatBlockage,
};
use tm_core::degtrig::arccosd;
use tm_deviation::DeviationModel;
use tm_fluids::PropertyOracle;
use tm_geometry::CascadeType;
use tm_loss::{LossGeometryInput, LossModelOptions};

use crate::boundary::BoundaryConditions;
use crate::cascade::{evaluate_cascade, CascadeBoundary, CascadeContext, CascadeRecord};
use crate::error::AssemblyResult;
use crate::unknowns::MachineUnknowns;

/// Static (non-iteration-dependent) description of one cascade in the
/// series: its geometry and model configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadeSpec {
    pub cascade_type: CascadeType,
    pub inlet_geometry: InletGeometry,
    pub exit_geometry: ExitGeometry,
    pub throat_geometry: ExitGeometry,
    pub metal_angle_le: f64,
    pub metal_angle_te: f64,
    pub area_throat: f64,
    pub area_exit: f64,
    pub loss_geometry: LossGeometryInput,
    pub deviation_model: DeviationModel,
    pub choking_model: ChokingModel,
}

/// Everything constant across Newton iterations for a whole machine.
pub struct SeriesContext<'a> {
    pub fluid: &'a dyn PropertyOracle,
    pub cascades: Vec<CascadeSpec>,
    pub blockage: ThroatBlockage,
    pub loss_options: &'a LossModelOptions,
    pub reference: &'a ReferenceValues,
    pub rel_step_fd: f64,
}

impl SeriesContext<'_> {
    pub fn choking_models(&self) -> Vec<ChokingModel> {
        self.cascades.iter().map(|c| c.choking_model).collect()
    }
}

/// Per-plane and per-cascade results of one series evaluation, plus the
/// exit-pressure residual that closes the boundary-value problem.
pub struct SeriesResult {
    /// Inlet, throat, and exit plane of each cascade, in cascade order
    /// (`planes[3*i]` is cascade `i`'s inlet, `planes[3*i+1]` its throat,
    /// `planes[3*i+2]` its exit).
    pub planes: Vec<FlowPlane>,
    pub cascades: Vec<CascadeRecord>,
    pub p_out_residual: f64,
}

pub fn evaluate_cascade_series(
    unknowns: &MachineUnknowns,
    boundary: &BoundaryConditions,
    ctx: &SeriesContext,
) -> AssemblyResult<(DVector<f64>, SeriesResult)> {
    let reference = ctx.reference;
    let n = ctx.cascades.len();

    let mut residuals = Vec::new();
    let mut planes = Vec::with_capacity(3 * n);
    let mut records = Vec::with_capacity(n);

    let mut h0_in = boundary.h0_in;
    let mut s_in = boundary.s_in;
    let mut alpha_in = boundary.alpha_in;
    let mut v_in = unknowns.v_in_scaled * reference.v0;

    for (i, spec) in ctx.cascades.iter().enumerate() {
        // Stator/rotor rows alternate, starting with a stationary row.
        let angular_speed_cascade = boundary.angular_speed * ((i % 2) as f64);
        let gauging_angle =
            spec.metal_angle_te.signum() * arccosd(spec.area_throat / spec.area_exit);

        let cascade_ctx = CascadeContext {
            fluid: ctx.fluid,
            inlet_geometry: spec.inlet_geometry,
            exit_geometry: spec.exit_geometry,
            throat_geometry: spec.throat_geometry,
            angular_speed: angular_speed_cascade,
            blockage: ctx.blockage,
            loss_options: ctx.loss_options,
            loss_geometry: spec.loss_geometry,
            deviation_model: spec.deviation_model,
            metal_angle_le: spec.metal_angle_le,
            metal_angle_te: spec.metal_angle_te,
            area_throat: spec.area_throat,
            area_exit: spec.area_exit,
            gauging_angle,
            reference,
            rel_step_fd: ctx.rel_step_fd,
        };

        let cascade_boundary = CascadeBoundary {
            h0_in,
            s_in,
            alpha_in,
            v_in,
        };
        let (cascade_residuals, record) =
            evaluate_cascade(cascade_boundary, &unknowns.cascades[i], &cascade_ctx)?;
        residuals.extend(cascade_residuals.iter().copied());

        planes.push(record.inlet_plane);
        planes.push(record.throat_plane);
        planes.push(record.exit_plane);

        if i != n - 1 {
            let next = &ctx.cascades[i + 1];
            let outlet = evaluate_cascade_interspace(
                record.exit_plane.stagnation_abs.h,
                record.exit_plane.velocity.v_m,
                record.exit_plane.velocity.v_t,
                record.exit_plane.static_state.rho,
                spec.exit_geometry.radius_mean,
                spec.exit_geometry.area,
                next.inlet_geometry.radius_mean_in,
                next.inlet_geometry.area_in,
                ctx.fluid,
            )?;
            h0_in = outlet.h0_in;
            s_in = outlet.s_in;
            alpha_in = outlet.alpha_in;
            v_in = outlet.v_in;
        }

        records.push(record);
    }

    let p_calc = records
        .last()
        .expect("a machine has at least one cascade")
        .exit_plane
        .static_state
        .p;
    let p_out_residual = (p_calc - boundary.p_out) / boundary.p0_in;
    residuals.push(p_out_residual);

    Ok((
        DVector::from_vec(residuals),
        SeriesResult {
            planes,
            cascades: records,
            p_out_residual,
        },
    ))
}
