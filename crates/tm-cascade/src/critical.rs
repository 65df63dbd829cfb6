//! The critical (maximum mass flow) point of a cascade, found by turning the
//! optimality condition `d(mass_flow)/d(w_throat) = 0` subject to the mass
//! balance and loss-model equations into a Lagrangian stationarity problem.
//!
//! Three scaled unknowns are solved for: the critical inlet absolute
//! velocity, the critical throat relative velocity, and the critical throat
//! entropy. The critical throat flow angle is not a free unknown -- it is
//! always the zero-deviation gauging angle, since the critical point is
//! defined purely by the throat's geometric minimum area.

use nalgebra::{Matrix3, Vector3};
use tm_core::degtrig::arccosd;
use tm_fluids::PropertyOracle;
use tm_loss::{LossGeometryInput, LossModelOptions};

use crate::error::CascadeResult;
use crate::exit::{evaluate_cascade_exit, CascadeExitInput, ExitGeometry, ThroatBlockage};
use crate::inlet::{evaluate_cascade_inlet, CascadeInletInput, InletGeometry};
use crate::plane::FlowPlane;
use crate::reference::ReferenceValues;

/// Everything `compute_critical_values` needs besides the unknown vector
/// itself, bundled to keep the finite-difference Jacobian call tractable.
pub struct CriticalContext<'a> {
    pub inlet_h0: f64,
    pub inlet_s: f64,
    pub inlet_alpha: f64,
    pub fluid: &'a dyn PropertyOracle,
    pub inlet_geometry: InletGeometry,
    pub throat_geometry: ExitGeometry,
    pub throat_area: f64,
    pub exit_area: f64,
    pub gauging_angle: f64,
    pub angular_speed: f64,
    pub blockage: ThroatBlockage,
    pub loss_options: &'a LossModelOptions,
    pub loss_geometry: LossGeometryInput,
    pub reference: &'a ReferenceValues,
}

/// The inlet and throat planes evaluated at the critical unknowns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalState {
    pub inlet_plane: FlowPlane,
    pub throat_plane: FlowPlane,
}

/// Evaluate `[throat mass_flow, mass balance residual, loss_error residual]`
/// at the scaled critical unknowns `x = [v*_in, w*_throat, s*_throat]`.
///
/// The critical throat flow angle is fixed to the zero-deviation gauging
/// angle; it is not part of `x`.
pub fn compute_critical_values(
    x: &Vector3<f64>,
    ctx: &CriticalContext,
) -> CascadeResult<(Vector3<f64>, CriticalState)> {
    let reference = ctx.reference;
    let v_in = x[0] * reference.v0;
    let w_throat = x[1] * reference.v0;
    let s_throat = x[2] * reference.s_range + reference.s_min;

    let inlet_plane = evaluate_cascade_inlet(
        CascadeInletInput {
            h0: ctx.inlet_h0,
            s: ctx.inlet_s,
            v: v_in,
            alpha: ctx.inlet_alpha,
        },
        ctx.fluid,
        ctx.inlet_geometry,
        ctx.angular_speed,
    )?;

    let throat_beta = ctx.gauging_angle.signum() * arccosd(ctx.throat_area / ctx.exit_area);
    let (throat_plane, _losses) = evaluate_cascade_exit(
        CascadeExitInput {
            w: w_throat,
            beta: throat_beta,
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

    let mass_residual =
        (inlet_plane.mass_flow - throat_plane.mass_flow) / reference.mass_flow_ref;
    let loss_residual = throat_plane.loss_error;

    let f = Vector3::new(throat_plane.mass_flow, mass_residual, loss_residual);
    Ok((
        f,
        CriticalState {
            inlet_plane,
            throat_plane,
        },
    ))
}

/// Forward-difference Jacobian of [`compute_critical_values`], with a
/// per-unknown absolute step of `rel_step_fd * x`.
pub fn compute_critical_jacobian(
    x: &Vector3<f64>,
    f0: &Vector3<f64>,
    ctx: &CriticalContext,
    rel_step_fd: f64,
) -> CascadeResult<Matrix3<f64>> {
    let mut jacobian = Matrix3::<f64>::zeros();
    for j in 0..3 {
        let mut x_perturbed = *x;
        let mut step = rel_step_fd * x[j];
        if step == 0.0 {
            step = rel_step_fd;
        }
        x_perturbed[j] += step;

        let (f_perturbed, _) = compute_critical_values(&x_perturbed, ctx)?;
        for i in 0..3 {
            jacobian[(i, j)] = (f_perturbed[i] - f0[i]) / step;
        }
    }
    Ok(jacobian)
}

/// Lagrange multipliers eliminated from the stationarity condition, and the
/// resulting gradient of the Lagrangian along the throat-velocity direction.
///
/// `x = [v*_in, w*_throat, s*_throat]`; the mass balance and loss residuals
/// (`g1`, `g2`) act as the two constraints, and the multipliers are solved
/// explicitly from the Jacobian rather than carried as extra unknowns.
pub struct LagrangianGradient {
    pub mass_residual: f64,
    pub loss_residual: f64,
    pub grad: f64,
}

pub fn evaluate_lagrangian_gradient(
    jacobian: &Matrix3<f64>,
    f0: &Vector3<f64>,
    mass_flow_ref: f64,
) -> LagrangianGradient {
    let a11 = jacobian[(1, 0)];
    let a12 = jacobian[(2, 0)];
    let a21 = jacobian[(1, 2)];
    let a22 = jacobian[(2, 2)];
    let b1 = -jacobian[(0, 0)];
    let b2 = -jacobian[(0, 2)];

    let determinant = a11 * a22 - a12 * a21;
    let l1_det = a22 * b1 - a12 * b2;
    let l2_det = a11 * b2 - a21 * b1;

    let df = jacobian[(0, 1)];
    let dg1 = jacobian[(1, 1)];
    let dg2 = jacobian[(2, 1)];
    let grad = (determinant * df + l1_det * dg1 + l2_det * dg2) / mass_flow_ref;

    LagrangianGradient {
        mass_residual: f0[1],
        loss_residual: f0[2],
        grad,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tm_fluids::IdealGasOracle;
    use tm_geometry::CascadeType;

    fn ctx<'a>(fluid: &'a dyn PropertyOracle, reference: &'a ReferenceValues) -> CriticalContext<'a> {
        CriticalContext {
            inlet_h0: 5.0e5,
            inlet_s: 3600.0,
            inlet_alpha: 20.0,
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
            throat_area: 0.01,
            exit_area: 0.012,
            gauging_angle: -65.0,
            angular_speed: 1000.0,
            blockage: ThroatBlockage::None,
            loss_options: Box::leak(Box::new(LossModelOptions::default())),
            loss_geometry: LossGeometryInput {
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
            },
            reference,
        }
    }

    #[test]
    fn critical_jacobian_is_finite() {
        let fluid = IdealGasOracle::air();
        let reference = ReferenceValues {
            mass_flow_ref: 1.0,
            v0: 300.0,
            s_min: 0.0,
            s_range: 200.0,
            angle_min: -80.0,
            angle_range: 80.0,
        };
        let context = ctx(&fluid, &reference);
        let x = Vector3::new(0.3, 0.6, 0.8);
        let (f0, _state) = compute_critical_values(&x, &context).unwrap();
        assert!(f0.iter().all(|v| v.is_finite()));

        let jacobian = compute_critical_jacobian(&x, &f0, &context, 1e-6).unwrap();
        assert!(jacobian.iter().all(|v| v.is_finite()));

        let gradient = evaluate_lagrangian_gradient(&jacobian, &f0, reference.mass_flow_ref);
        assert!(gradient.grad.is_finite());
    }
}
