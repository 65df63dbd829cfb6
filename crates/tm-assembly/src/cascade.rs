//! Single-cascade residual evaluation: inlet plane, the actual throat plane
//! (geometric gauging angle, always evaluated regardless of choking mode),
//! the exit plane, and the mode-dependent choking dispatch -- combined into
//! one residual vector and a [`CascadeRecord`] of the quantities a results
//! layer wants to report.

use nalgebra::DVector;
use tm_cascade::{
    evaluate_cascade_critical, evaluate_cascade_exit, evaluate_cascade_inlet,
    evaluate_cascade_isentropic_throat, evaluate_cascade_throat, interpolate_critical_state,
    CascadeExitInput, CascadeInletInput, ChokingContext, CriticalContext, ExitGeometry, FlowPlane,
    InletGeometry, ReferenceValues, ThroatBlockage,
};
use tm_deviation::DeviationModel;
use tm_fluids::PropertyOracle;
use tm_loss::{LossBreakdown, LossGeometryInput, LossModelOptions};

use crate::error::AssemblyResult;
use crate::unknowns::{CascadeUnknowns, CriticalUnknowns};

/// The boundary condition a cascade is evaluated at: for the first cascade
/// in a machine this comes from the machine's overall inlet state and the
/// `v_in` unknown; for every later cascade it is the previous cascade's
/// [`tm_cascade::InterspaceOutlet`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadeBoundary {
    pub h0_in: f64,
    pub s_in: f64,
    pub alpha_in: f64,
    pub v_in: f64,
}

/// Everything about one cascade's geometry, fluid, and model configuration
/// that does not change across Newton iterations.
pub struct CascadeContext<'a> {
    pub fluid: &'a dyn PropertyOracle,
    pub inlet_geometry: InletGeometry,
    pub throat_geometry: ExitGeometry,
    pub exit_geometry: ExitGeometry,
    pub angular_speed: f64,
    pub blockage: ThroatBlockage,
    pub loss_options: &'a LossModelOptions,
    pub loss_geometry: LossGeometryInput,
    pub deviation_model: DeviationModel,
    pub metal_angle_le: f64,
    pub metal_angle_te: f64,
    pub area_throat: f64,
    pub area_exit: f64,
    /// Zero-deviation gauging angle, `sign(metal_angle_te) * arccosd(A_throat/A_exit)`.
    pub gauging_angle: f64,
    pub reference: &'a ReferenceValues,
    pub rel_step_fd: f64,
}

/// Everything [`KEYS_CASCADE`]-equivalent about one cascade's converged
/// operating point, for reporting.
///
/// `mass_flow_crit`/`d_crit`/`w_crit`/`p_crit`/`beta_crit` are only fully
/// populated for [`CriticalUnknowns::Critical`] (Mode A), which alone solves
/// a full critical-point throat plane; the calibrated-surrogate modes
/// (Throat, IsentropicThroat) only expose the critical Mach number, leaving
/// the rest `NaN` since their critical state is not a full thermodynamic
/// plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadeRecord {
    pub inlet_plane: FlowPlane,
    pub throat_plane: FlowPlane,
    pub exit_plane: FlowPlane,
    pub losses: LossBreakdown,
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

/// Evaluate one cascade's residuals (mass/loss balance at the throat and
/// exit planes, plus the choking-mode residuals) and reportable record.
///
/// Residual count matches [`CascadeUnknowns`]'s unknown count: 8 for
/// [`CriticalUnknowns::Critical`]/`Throat`, 6 for `IsentropicThroat`.
pub fn evaluate_cascade(
    boundary: CascadeBoundary,
    unknowns: &CascadeUnknowns,
    ctx: &CascadeContext,
) -> AssemblyResult<(DVector<f64>, CascadeRecord)> {
    let reference = ctx.reference;

    let inlet_plane = evaluate_cascade_inlet(
        CascadeInletInput {
            h0: boundary.h0_in,
            s: boundary.s_in,
            v: boundary.v_in,
            alpha: boundary.alpha_in,
        },
        ctx.fluid,
        ctx.inlet_geometry,
        ctx.angular_speed,
    )?;

    let w_throat = unknowns.w_throat_scaled * reference.v0;
    let s_throat = unknowns.s_throat_scaled * reference.s_range + reference.s_min;
    let (throat_plane, _throat_losses) = evaluate_cascade_exit(
        CascadeExitInput {
            w: w_throat,
            beta: ctx.metal_angle_te,
            s: s_throat,
            rothalpy: inlet_plane.rothalpy,
        },
        ctx.fluid,
        ctx.throat_geometry,
        &inlet_plane,
        ctx.angular_speed,
        ctx.blockage,
        ctx.loss_options,
        ctx.loss_geometry,
    )?;

    let w_out = unknowns.w_out_scaled * reference.v0;
    let s_out = unknowns.s_out_scaled * reference.s_range + reference.s_min;
    let beta_out = unknowns.beta_out_scaled * reference.angle_range + reference.angle_min;

    let (exit_plane, losses) = evaluate_cascade_exit(
        CascadeExitInput {
            w: w_out,
            beta: beta_out,
            s: s_out,
            rothalpy: inlet_plane.rothalpy,
        },
        ctx.fluid,
        ctx.exit_geometry,
        &inlet_plane,
        ctx.angular_speed,
        ctx.blockage,
        ctx.loss_options,
        ctx.loss_geometry,
    )?;

    let isentropic = ctx
        .fluid
        .state_ps(exit_plane.static_state.p, inlet_plane.static_state.s)?;
    let dh_s = exit_plane.static_state.h - isentropic.h;

    let mass_error_throat =
        (inlet_plane.mass_flow - throat_plane.mass_flow) / reference.mass_flow_ref;
    let loss_error_throat = throat_plane.loss_error;
    let mass_error_exit = (inlet_plane.mass_flow - exit_plane.mass_flow) / reference.mass_flow_ref;
    let loss_error_exit = exit_plane.loss_error;

    let choking_ctx = ChokingContext {
        deviation_model: ctx.deviation_model,
        area_throat: ctx.area_throat,
        area_exit: ctx.area_exit,
        gauging_angle: ctx.gauging_angle,
        metal_angle_te: ctx.metal_angle_te,
        blockage: ctx.blockage,
        loss_options: ctx.loss_options,
        loss_geometry: ctx.loss_geometry,
        reference,
        rel_step_fd: ctx.rel_step_fd,
    };

    let mut residuals = vec![
        mass_error_throat,
        loss_error_throat,
        mass_error_exit,
        loss_error_exit,
    ];

    let (ma_crit, mass_flow_crit, d_crit, w_crit, p_crit, beta_crit, density_correction) =
        match &unknowns.critical {
            CriticalUnknowns::Critical(x) => {
                let critical_ctx = CriticalContext {
                    inlet_h0: boundary.h0_in,
                    inlet_s: boundary.s_in,
                    inlet_alpha: boundary.alpha_in,
                    fluid: ctx.fluid,
                    inlet_geometry: ctx.inlet_geometry,
                    throat_geometry: ctx.throat_geometry,
                    throat_area: ctx.area_throat,
                    exit_area: ctx.area_exit,
                    gauging_angle: ctx.gauging_angle,
                    angular_speed: ctx.angular_speed,
                    blockage: ctx.blockage,
                    loss_options: ctx.loss_options,
                    loss_geometry: ctx.loss_geometry,
                    reference,
                };
                let (choking_residuals, state) =
                    evaluate_cascade_critical(x, &critical_ctx, &choking_ctx, &exit_plane)?;
                residuals.extend([
                    choking_residuals.mass_balance,
                    choking_residuals.loss,
                    choking_residuals.lagrangian,
                    choking_residuals.choking,
                ]);
                (
                    state.throat_plane.ma_rel,
                    state.throat_plane.mass_flow,
                    state.throat_plane.static_state.rho,
                    state.throat_plane.velocity.w,
                    state.throat_plane.static_state.p,
                    state.throat_plane.velocity.beta,
                    f64::NAN,
                )
            }
            CriticalUnknowns::Throat(t) => {
                let choking_residuals = evaluate_cascade_throat(
                    t,
                    &inlet_plane,
                    &exit_plane,
                    ctx.fluid,
                    ctx.throat_geometry,
                    ctx.angular_speed,
                    &choking_ctx,
                )?;
                residuals.extend([
                    choking_residuals.mass_balance,
                    choking_residuals.loss,
                    choking_residuals.lagrangian,
                    choking_residuals.choking,
                ]);
                let (phi_max, mach_crit) = interpolate_critical_state(
                    inlet_plane.stagnation_rel.p,
                    inlet_plane.stagnation_rel.t,
                    losses.total,
                );
                (
                    mach_crit,
                    phi_max * ctx.area_throat,
                    f64::NAN,
                    f64::NAN,
                    f64::NAN,
                    f64::NAN,
                    f64::NAN,
                )
            }
            CriticalUnknowns::IsentropicThroat { w_throat_scaled } => {
                let choking_residuals = evaluate_cascade_isentropic_throat(
                    *w_throat_scaled,
                    &inlet_plane,
                    &exit_plane,
                    ctx.fluid,
                    ctx.throat_geometry,
                    ctx.angular_speed,
                    &choking_ctx,
                )?;
                residuals.extend([choking_residuals.mass_balance, choking_residuals.choking]);
                (1.0, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN)
            }
        };

    let incidence = inlet_plane.velocity.beta - ctx.metal_angle_le;

    let record = CascadeRecord {
        inlet_plane,
        throat_plane,
        exit_plane,
        losses,
        dh_s,
        ma_crit,
        mass_flow_crit,
        d_crit,
        w_crit,
        p_crit,
        beta_crit,
        incidence,
        density_correction,
    };

    Ok((DVector::from_vec(residuals), record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;
    use tm_cascade::ThroatUnknowns;
    use tm_fluids::IdealGasOracle;
    use tm_geometry::CascadeType;

    fn loss_geometry() -> LossGeometryInput {
        LossGeometryInput {
            cascade_type: CascadeType::Stator,
            hub_tip_ratio_in: 0.8,
            pitch: 0.02,
            chord: 0.03,
            axial_chord: 0.026,
            stagger_angle: 30.0,
            metal_angle_le: 0.0,
            metal_angle_te: -65.0,
            thickness_max: 0.005,
            thickness_te: 0.001,
            opening: 0.01,
            height: 0.02,
            tip_clearance: 0.0005,
            diameter_le: 0.002,
            wedge_angle_le: 20.0,
        }
    }

    fn reference() -> ReferenceValues {
        ReferenceValues {
            mass_flow_ref: 1.0,
            v0: 300.0,
            s_min: 0.0,
            s_range: 200.0,
            angle_min: -80.0,
            angle_range: 80.0,
        }
    }

    fn context<'a>(
        fluid: &'a dyn PropertyOracle,
        reference: &'a ReferenceValues,
        loss_options: &'a LossModelOptions,
    ) -> CascadeContext<'a> {
        CascadeContext {
            fluid,
            inlet_geometry: InletGeometry {
                radius_mean_in: 0.1,
                chord: 0.03,
                area_in: 0.02,
            },
            throat_geometry: ExitGeometry {
                radius_mean: 0.1,
                area: 0.01,
                chord: 0.03,
                opening: 0.01,
            },
            exit_geometry: ExitGeometry {
                radius_mean: 0.1,
                area: 0.018,
                chord: 0.03,
                opening: 0.01,
            },
            angular_speed: 1000.0,
            blockage: ThroatBlockage::None,
            loss_options,
            loss_geometry: loss_geometry(),
            deviation_model: DeviationModel::Aungier,
            metal_angle_le: 0.0,
            metal_angle_te: -65.0,
            area_throat: 0.01,
            area_exit: 0.012,
            gauging_angle: -65.0,
            reference,
            rel_step_fd: 1e-6,
        }
    }

    fn boundary(fluid: &IdealGasOracle) -> CascadeBoundary {
        let state = fluid.state_pt(2.1e5, 420.0).unwrap();
        CascadeBoundary {
            h0_in: state.h + 0.5 * 80f64.powi(2),
            s_in: state.s,
            alpha_in: 20.0,
            v_in: 80.0,
        }
    }

    #[test]
    fn isentropic_throat_mode_returns_six_residuals() {
        let fluid = IdealGasOracle::air();
        let loss_options = LossModelOptions::default();
        let reference = reference();
        let ctx = context(&fluid, &reference, &loss_options);
        let unknowns = CascadeUnknowns {
            w_throat_scaled: 0.7,
            s_throat_scaled: 0.1,
            w_out_scaled: 250.0 / reference.v0,
            s_out_scaled: 0.1,
            beta_out_scaled: ((-65.0) - reference.angle_min) / reference.angle_range,
            critical: CriticalUnknowns::IsentropicThroat {
                w_throat_scaled: 0.5,
            },
        };
        let (residuals, record) = evaluate_cascade(boundary(&fluid), &unknowns, &ctx).unwrap();
        assert_eq!(residuals.len(), 6);
        assert!(record.inlet_plane.mass_flow > 0.0);
        assert!(record.throat_plane.mass_flow > 0.0);
        assert!(record.ma_crit == 1.0);
    }

    #[test]
    fn throat_mode_returns_eight_residuals() {
        let fluid = IdealGasOracle::air();
        let loss_options = LossModelOptions::default();
        let reference = reference();
        let ctx = context(&fluid, &reference, &loss_options);
        let unknowns = CascadeUnknowns {
            w_throat_scaled: 0.7,
            s_throat_scaled: 0.1,
            w_out_scaled: 250.0 / reference.v0,
            s_out_scaled: 0.1,
            beta_out_scaled: ((-65.0) - reference.angle_min) / reference.angle_range,
            critical: CriticalUnknowns::Throat(ThroatUnknowns {
                w_throat_scaled: 0.7,
                s_throat_scaled: 0.1,
                beta_throat_scaled: ((-65.0) - reference.angle_min) / reference.angle_range,
            }),
        };
        let (residuals, record) = evaluate_cascade(boundary(&fluid), &unknowns, &ctx).unwrap();
        assert_eq!(residuals.len(), 8);
        assert!(record.mass_flow_crit.is_finite());
    }

    #[test]
    fn critical_mode_returns_eight_residuals() {
        let fluid = IdealGasOracle::air();
        let loss_options = LossModelOptions::default();
        let reference = reference();
        let ctx = context(&fluid, &reference, &loss_options);
        let unknowns = CascadeUnknowns {
            w_throat_scaled: 0.7,
            s_throat_scaled: 0.1,
            w_out_scaled: 250.0 / reference.v0,
            s_out_scaled: 0.1,
            beta_out_scaled: ((-65.0) - reference.angle_min) / reference.angle_range,
            critical: CriticalUnknowns::Critical(Vector3::new(0.27, 0.8, 0.1)),
        };
        let (residuals, record) = evaluate_cascade(boundary(&fluid), &unknowns, &ctx).unwrap();
        assert_eq!(residuals.len(), 8);
        assert!(record.w_crit.is_finite());
    }
}
