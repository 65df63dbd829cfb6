//! Choking: deciding whether a cascade's exit flow has reached its critical
//! (maximum mass flow) condition, and producing the residual equation that
//! couples the exit-plane unknowns to that condition.
//!
//! Three interchangeable models are supported, all converging to the same
//! physical answer but trading off cost against accuracy:
//!
//! - [`ChokingModel::Critical`]: solve the full Lagrangian stationarity
//!   problem for the critical point alongside the rest of the cascade.
//!   Exact, but adds three unknowns and a per-iteration finite-difference
//!   Jacobian.
//! - [`ChokingModel::Throat`]: look up the critical Mach number and mass
//!   flux from a calibrated surrogate polynomial, fit offline against the
//!   exact model. Adds a throat-plane unknown set but no extra root-finding
//!   cost.
//! - [`ChokingModel::IsentropicThroat`]: assume the throat is isentropic and
//!   critical Mach number is exactly one. Cheapest and least accurate.

use nalgebra::Vector3;
use tm_core::degtrig::{arccosd, cosd};
use tm_core::numeric::{smooth_switch, BlendMethod};
use tm_deviation::{DeviationInput, DeviationModel};
use tm_loss::{LossGeometryInput, LossModelOptions};

/// Sharpness used to smooth the choking boundary (`exit Ma_rel` crossing the
/// critical Mach number): a transition width of ~0.02.
const CHOKING_MACH_SHARPNESS: f64 = 50.0;

use crate::critical::{
    compute_critical_jacobian, compute_critical_values, evaluate_lagrangian_gradient,
    CriticalContext, CriticalState,
};
use crate::error::CascadeResult;
use crate::exit::{evaluate_cascade_exit, CascadeExitInput, ExitGeometry, ThroatBlockage};
use crate::plane::FlowPlane;
use crate::reference::ReferenceValues;

/// Which of the three choking models governs a cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChokingModel {
    Critical,
    Throat,
    IsentropicThroat,
}

/// Residuals produced by a choking model. Mode [`ChokingModel::Critical`]
/// fills all four; [`ChokingModel::Throat`] fills all four with `loss`
/// replacing the Lagrangian gradient with a direct loss-model residual and
/// `lagrangian` left at zero; [`ChokingModel::IsentropicThroat`] fills only
/// `mass_balance` and `choking`, leaving `loss`/`lagrangian` at zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChokingResiduals {
    pub mass_balance: f64,
    pub loss: f64,
    pub lagrangian: f64,
    pub choking: f64,
}

/// Inputs shared by all three choking models: geometry, reference scaling,
/// and the deviation/loss configuration the cascade already uses.
pub struct ChokingContext<'a> {
    pub deviation_model: DeviationModel,
    pub area_throat: f64,
    pub area_exit: f64,
    pub gauging_angle: f64,
    pub metal_angle_te: f64,
    pub blockage: ThroatBlockage,
    pub loss_options: &'a LossModelOptions,
    pub loss_geometry: LossGeometryInput,
    pub reference: &'a ReferenceValues,
    pub rel_step_fd: f64,
}

/// Sub-critical deviation-model exit angle, signed to match the flow
/// direction, shared by all three choking models' residual construction.
fn signed_deviation_angle(
    deviation_model: DeviationModel,
    ma: f64,
    ma_crit: f64,
    beta: f64,
    metal_angle_te: f64,
    area_throat: f64,
    area_exit: f64,
) -> CascadeResult<f64> {
    let angle = deviation_model.exit_flow_angle(DeviationInput {
        ma_exit: ma,
        ma_crit_exit: ma_crit,
        metal_angle_te,
        area_throat,
        area_exit,
    })?;
    Ok(beta.signum() * angle)
}

/// Mode A: the critical point is found by solving the Lagrangian
/// stationarity problem for `x = [v*_in, w*_throat, s*_throat]` alongside
/// the rest of the cascade.
#[allow(clippy::too_many_arguments)]
pub fn evaluate_cascade_critical(
    x: &Vector3<f64>,
    critical_ctx: &CriticalContext,
    choking_ctx: &ChokingContext,
    exit_plane: &FlowPlane,
) -> CascadeResult<(ChokingResiduals, CriticalState)> {
    let (f0, state) = compute_critical_values(x, critical_ctx)?;
    let jacobian = compute_critical_jacobian(x, &f0, critical_ctx, choking_ctx.rel_step_fd)?;
    let gradient =
        evaluate_lagrangian_gradient(&jacobian, &f0, choking_ctx.reference.mass_flow_ref);

    let critical_mach = state.throat_plane.ma_rel;
    let critical_mass_flow = state.throat_plane.mass_flow;

    let beta_subcritical = signed_deviation_angle(
        choking_ctx.deviation_model,
        exit_plane.ma_rel,
        critical_mach,
        exit_plane.velocity.beta,
        choking_ctx.metal_angle_te,
        choking_ctx.area_throat,
        choking_ctx.area_exit,
    )?;
    let beta_supercritical = exit_plane.velocity.beta.signum()
        * arccosd(
            critical_mass_flow
                / exit_plane.static_state.rho
                / exit_plane.velocity.w
                / choking_ctx.area_exit,
        );
    let beta_model = smooth_switch(
        exit_plane.ma_rel,
        critical_mach,
        beta_subcritical,
        beta_supercritical,
        BlendMethod::LogSumExp,
        CHOKING_MACH_SHARPNESS,
    );
    let choking_residual = cosd(beta_model) - cosd(exit_plane.velocity.beta);

    let residuals = ChokingResiduals {
        mass_balance: gradient.mass_residual,
        loss: gradient.loss_residual,
        lagrangian: gradient.grad,
        choking: choking_residual,
    };
    Ok((residuals, state))
}

/// Unknowns Mode B solves for at the throat: scaled relative velocity,
/// entropy, and flow angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThroatUnknowns {
    pub w_throat_scaled: f64,
    pub s_throat_scaled: f64,
    pub beta_throat_scaled: f64,
}

/// Mode B: the critical Mach number and mass flux come from a calibrated
/// surrogate fit against the exact (Mode A) model, avoiding the
/// finite-difference Jacobian cost.
///
/// Returns the critical mass flux `phi_max` [kg/s/m^2] and critical relative
/// Mach number, as a function of inlet relative stagnation pressure and
/// temperature and the cascade's total loss coefficient.
pub fn interpolate_critical_state(p0_rel_in: f64, t0_rel_in: f64, loss_total: f64) -> (f64, f64) {
    let x = [
        1.0,
        p0_rel_in,
        t0_rel_in,
        loss_total,
        p0_rel_in.powi(2),
        t0_rel_in.powi(2),
        loss_total.powi(2),
        p0_rel_in * t0_rel_in,
        p0_rel_in * loss_total,
        t0_rel_in * loss_total,
    ];

    const COEFF_MACH_CRIT: [f64; 10] = [
        9.978_088_78e-1,
        -8.595_568_18e-9,
        2.182_831_01e-5,
        -3.384_138_36e-1,
        -4.894_698_16e-14,
        -5.990_214_08e-8,
        9.935_199_91e-2,
        7.712_011_15e-11,
        -4.133_467_25e-9,
        4.913_177_61e-6,
    ];
    const COEFF_PHI_MAX: [f64; 10] = [
        9.811_203_37e1,
        3.462_995_80e-3,
        -6.343_577_17e-1,
        -6.842_343_62e1,
        1.055_069_96e-11,
        1.040_457_97e-3,
        3.362_317_86e1,
        -3.810_199_18e-6,
        -6.903_480_74e-4,
        1.266_925_86e-1,
    ];

    let mach_crit: f64 = x.iter().zip(COEFF_MACH_CRIT).map(|(xi, ci)| xi * ci).sum();
    let phi_max: f64 = x.iter().zip(COEFF_PHI_MAX).map(|(xi, ci)| xi * ci).sum();
    (phi_max, mach_crit)
}

#[allow(clippy::too_many_arguments)]
pub fn evaluate_cascade_throat(
    x: &ThroatUnknowns,
    inlet_plane: &FlowPlane,
    exit_plane: &FlowPlane,
    fluid: &dyn tm_fluids::PropertyOracle,
    throat_geometry: ExitGeometry,
    angular_speed: f64,
    choking_ctx: &ChokingContext,
) -> CascadeResult<ChokingResiduals> {
    let reference = choking_ctx.reference;
    let w = x.w_throat_scaled * reference.v0;
    let s = x.s_throat_scaled * reference.s_range + reference.s_min;
    let beta = x.beta_throat_scaled * reference.angle_range + reference.angle_min;

    let (throat_plane, loss_dict) = evaluate_cascade_exit(
        CascadeExitInput {
            w,
            beta,
            s,
            rothalpy: inlet_plane.rothalpy,
        },
        fluid,
        throat_geometry,
        inlet_plane,
        angular_speed,
        choking_ctx.blockage,
        choking_ctx.loss_options,
        choking_ctx.loss_geometry,
    )?;

    let (phi_max, critical_mach) = interpolate_critical_state(
        inlet_plane.stagnation_rel.p,
        inlet_plane.stagnation_rel.t,
        loss_dict.total,
    );
    let critical_mass_flow = phi_max * choking_ctx.area_throat;

    let beta_model = signed_deviation_angle(
        choking_ctx.deviation_model,
        throat_plane.ma_rel,
        critical_mach,
        throat_plane.velocity.beta,
        choking_ctx.metal_angle_te,
        choking_ctx.area_throat,
        choking_ctx.area_exit,
    )?;
    let beta_residual = cosd(beta_model) - cosd(throat_plane.velocity.beta);

    let exit_beta_model = signed_deviation_angle(
        choking_ctx.deviation_model,
        exit_plane.ma_rel,
        critical_mach,
        exit_plane.velocity.beta,
        choking_ctx.metal_angle_te,
        choking_ctx.area_throat,
        choking_ctx.area_exit,
    )?;
    let subcritical_residual = cosd(exit_beta_model) - cosd(exit_plane.velocity.beta);
    let supercritical_residual = throat_plane.ma_rel - critical_mach;
    let choking_residual = smooth_switch(
        exit_plane.ma_rel,
        critical_mach,
        subcritical_residual,
        supercritical_residual,
        BlendMethod::LogSumExp,
        CHOKING_MACH_SHARPNESS,
    );

    Ok(ChokingResiduals {
        mass_balance: (inlet_plane.mass_flow - throat_plane.mass_flow) / reference.mass_flow_ref,
        loss: throat_plane.loss_error,
        lagrangian: beta_residual,
        choking: choking_residual,
    })
}

/// Mode C: the throat is assumed isentropic (entropy equal to the inlet's)
/// and the critical Mach number is taken as exactly one. Cheapest of the
/// three, and the least representative of real cascades with non-trivial
/// throat losses.
pub fn evaluate_cascade_isentropic_throat(
    w_throat_scaled: f64,
    inlet_plane: &FlowPlane,
    exit_plane: &FlowPlane,
    fluid: &dyn tm_fluids::PropertyOracle,
    throat_geometry: ExitGeometry,
    angular_speed: f64,
    choking_ctx: &ChokingContext,
) -> CascadeResult<ChokingResiduals> {
    let reference = choking_ctx.reference;
    let w = w_throat_scaled * reference.v0;
    let beta = exit_plane.velocity.beta.signum()
        * arccosd(choking_ctx.area_throat / choking_ctx.area_exit);

    let (throat_plane, _loss_dict) = evaluate_cascade_exit(
        CascadeExitInput {
            w,
            beta,
            s: inlet_plane.static_state.s,
            rothalpy: inlet_plane.rothalpy,
        },
        fluid,
        throat_geometry,
        inlet_plane,
        angular_speed,
        choking_ctx.blockage,
        choking_ctx.loss_options,
        choking_ctx.loss_geometry,
    )?;

    let choking_residual = throat_plane.ma_rel - exit_plane.ma_rel.min(1.0);

    Ok(ChokingResiduals {
        mass_balance: (inlet_plane.mass_flow - throat_plane.mass_flow) / reference.mass_flow_ref,
        loss: 0.0,
        lagrangian: 0.0,
        choking: choking_residual,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolate_critical_state_near_calibration_point_is_reasonable() {
        let (phi_max, mach_crit) = interpolate_critical_state(2.0e5, 400.0, 0.05);
        assert!(phi_max > 0.0);
        assert!(mach_crit > 0.5 && mach_crit < 1.5);
    }
}
