//! Throat/exit-plane evaluation: velocity triangle from the relative
//! velocity and flow angle unknowns, thermodynamic state from rothalpy
//! conservation, boundary-layer blockage, and the loss model.

use tm_fluids::PropertyOracle;
use tm_loss::{compute_losses, LossBreakdown, LossFlowInput, LossGeometryInput, LossModelOptions};

use crate::error::{CascadeError, CascadeResult};
use crate::plane::FlowPlane;
use crate::velocity::triangle_from_relative;

/// Unknowns solved for at the throat or exit plane: relative velocity,
/// relative flow angle, entropy, and the rothalpy carried over from the
/// inlet plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadeExitInput {
    pub w: f64,
    pub beta: f64,
    pub s: f64,
    pub rothalpy: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitGeometry {
    pub radius_mean: f64,
    pub area: f64,
    pub chord: f64,
    pub opening: f64,
}

/// How the boundary-layer blockage factor at a throat/exit plane is
/// determined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThroatBlockage {
    /// Flat-plate turbulent boundary-layer correlation.
    FlatPlateTurbulent,
    /// A fixed, user-specified blockage factor in `[0, 1]`.
    Fixed(f64),
    /// No blockage.
    None,
}

pub fn blockage_factor(
    model: ThroatBlockage,
    re: f64,
    chord: f64,
    opening: f64,
) -> CascadeResult<f64> {
    match model {
        ThroatBlockage::FlatPlateTurbulent => {
            let displacement_thickness = 0.048 / re.powf(1.0 / 5.0) * 0.9 * chord;
            Ok(2.0 * displacement_thickness / opening)
        }
        ThroatBlockage::Fixed(value) => {
            if (0.0..=1.0).contains(&value) {
                Ok(value)
            } else {
                Err(CascadeError::UnknownBlockageOption(format!(
                    "fixed blockage factor {value} outside [0, 1]"
                )))
            }
        }
        ThroatBlockage::None => Ok(0.0),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn evaluate_cascade_exit(
    input: CascadeExitInput,
    fluid: &dyn PropertyOracle,
    geometry: ExitGeometry,
    inlet_plane: &FlowPlane,
    angular_speed: f64,
    blockage: ThroatBlockage,
    loss_options: &LossModelOptions,
    loss_geometry: LossGeometryInput,
) -> CascadeResult<(FlowPlane, LossBreakdown)> {
    let blade_speed = angular_speed * geometry.radius_mean;
    let velocity = triangle_from_relative(blade_speed, input.w, input.beta);

    let h = input.rothalpy + 0.5 * blade_speed.powi(2) - 0.5 * input.w.powi(2);
    let static_state = fluid.state_hs(h, input.s)?;

    let h0 = h + 0.5 * velocity.v.powi(2);
    let stagnation_abs = fluid.state_hs(h0, input.s)?;

    let h0_rel = h + 0.5 * input.w.powi(2);
    let stagnation_rel = fluid.state_hs(h0_rel, input.s)?;

    let ma = velocity.v / static_state.a;
    let ma_rel = input.w / static_state.a;
    let re = static_state.rho * input.w * geometry.chord / static_state.mu;
    let rothalpy = h0_rel - 0.5 * blade_speed.powi(2);

    let blockage_factor = blockage_factor(blockage, re, geometry.chord, geometry.opening)?;
    let mass_flow = static_state.rho * velocity.w_m * geometry.area * (1.0 - blockage_factor);

    let min_val = 1e-3;
    let loss_flow = LossFlowInput {
        re_in: inlet_plane.re.max(min_val),
        re_out: re.max(min_val),
        ma_rel_in: inlet_plane.ma_rel.max(min_val),
        ma_rel_out: ma_rel.max(min_val),
        p0_rel_in: inlet_plane.stagnation_rel.p,
        p_in: inlet_plane.static_state.p,
        p0_rel_out: stagnation_rel.p,
        p_out: static_state.p,
        beta_in: inlet_plane.velocity.beta,
        beta_out: input.beta,
        gamma_out: static_state.gamma,
    };
    let losses = compute_losses(&loss_flow, &loss_geometry, loss_options)?;

    // Entropy at this plane is a free unknown; tie it to the loss model by
    // comparing the kinetic-energy loss coefficient implied by the entropy
    // rise (relative to the cascade inlet entropy) against the one the
    // correlation predicts.
    let isentropic = fluid.state_ps(static_state.p, inlet_plane.static_state.s)?;
    let dh_s = static_state.h - isentropic.h;
    let loss_error = dh_s / (0.5 * input.w.powi(2)) - losses.total;

    let plane = FlowPlane {
        velocity,
        static_state,
        stagnation_abs,
        stagnation_rel,
        losses: Some(losses),
        ma,
        ma_rel,
        re,
        mass_flow,
        rothalpy,
        blockage: blockage_factor,
        loss_error,
    };

    Ok((plane, losses))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inlet::{evaluate_cascade_inlet, CascadeInletInput, InletGeometry};
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

    #[test]
    fn exit_plane_mass_flow_is_positive() {
        let fluid = IdealGasOracle::air();
        let inlet_state = fluid.state_pt(2.1e5, 420.0).unwrap();
        let h0 = inlet_state.h + 0.5 * 80f64.powi(2);
        let inlet = evaluate_cascade_inlet(
            CascadeInletInput {
                h0,
                s: inlet_state.s,
                v: 80.0,
                alpha: 20.0,
            },
            &fluid,
            InletGeometry {
                radius_mean_in: 0.1,
                chord: 0.03,
                area_in: 0.02,
            },
            1000.0,
        )
        .unwrap();

        let exit_input = CascadeExitInput {
            w: 250.0,
            beta: -65.0,
            s: inlet_state.s + 2.0,
            rothalpy: inlet.rothalpy,
        };
        let (plane, _losses) = evaluate_cascade_exit(
            exit_input,
            &fluid,
            ExitGeometry {
                radius_mean: 0.1,
                area: 0.018,
                chord: 0.03,
                opening: 0.01,
            },
            &inlet,
            1000.0,
            ThroatBlockage::None,
            &LossModelOptions::default(),
            loss_geometry(),
        )
        .unwrap();

        assert!(plane.mass_flow > 0.0);
        assert!(plane.losses.is_some());
    }
}
