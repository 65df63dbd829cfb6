//! Inlet-plane evaluation: velocity triangle, thermodynamic state, Mach and
//! Reynolds numbers, mass flow, rothalpy.

use tm_fluids::PropertyOracle;

use crate::error::CascadeResult;
use crate::plane::FlowPlane;
use crate::velocity::triangle_from_absolute;

/// Boundary condition at the cascade inlet: stagnation enthalpy, entropy,
/// absolute velocity and flow angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadeInletInput {
    pub h0: f64,
    pub s: f64,
    pub v: f64,
    pub alpha: f64,
}

/// Geometry this plane needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InletGeometry {
    pub radius_mean_in: f64,
    pub chord: f64,
    pub area_in: f64,
}

pub fn evaluate_cascade_inlet(
    input: CascadeInletInput,
    fluid: &dyn PropertyOracle,
    geometry: InletGeometry,
    angular_speed: f64,
) -> CascadeResult<FlowPlane> {
    let blade_speed = geometry.radius_mean_in * angular_speed;
    let velocity = triangle_from_absolute(blade_speed, input.v, input.alpha);

    let h = input.h0 - 0.5 * input.v.powi(2);
    let static_state = fluid.state_hs(h, input.s)?;

    let stagnation_abs = fluid.state_hs(input.h0, input.s)?;

    let h0_rel = h + 0.5 * velocity.w.powi(2);
    let stagnation_rel = fluid.state_hs(h0_rel, input.s)?;

    let ma = input.v / static_state.a;
    let ma_rel = velocity.w / static_state.a;
    let re = static_state.rho * velocity.w * geometry.chord / static_state.mu;
    let mass_flow = static_state.rho * velocity.w_m * geometry.area_in;
    let rothalpy = h0_rel - 0.5 * blade_speed.powi(2);

    Ok(FlowPlane {
        velocity,
        static_state,
        stagnation_abs,
        stagnation_rel,
        losses: None,
        ma,
        ma_rel,
        re,
        mass_flow,
        rothalpy,
        blockage: f64::NAN,
        loss_error: f64::NAN,
    })
}
