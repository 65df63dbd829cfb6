//! The full set of flow quantities tracked at one station (inlet, throat, or
//! exit plane) of a cascade.

use tm_fluids::FluidState;
use tm_loss::LossBreakdown;

use crate::velocity::VelocityTriangle;

/// Everything computed at a single flow station.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowPlane {
    pub velocity: VelocityTriangle,
    /// Static thermodynamic state.
    pub static_state: FluidState,
    /// Absolute stagnation state (same entropy, enthalpy `h + v^2/2`).
    pub stagnation_abs: FluidState,
    /// Relative stagnation state (same entropy, enthalpy `h + w^2/2`).
    pub stagnation_rel: FluidState,
    /// Loss coefficients; `None` at the inlet plane, where the loss model
    /// does not apply.
    pub losses: Option<LossBreakdown>,
    pub ma: f64,
    pub ma_rel: f64,
    pub re: f64,
    pub mass_flow: f64,
    pub rothalpy: f64,
    /// Boundary-layer blockage factor; `NaN` at the inlet plane.
    pub blockage: f64,
    /// Residual tying the entropy unknown at this plane to the loss model:
    /// the kinetic-energy loss coefficient implied by the entropy rise minus
    /// the one predicted by the loss correlation. Zero at convergence;
    /// `NaN` at the inlet plane, where there is no loss model.
    pub loss_error: f64,
}

impl FlowPlane {
    pub fn p(&self) -> f64 {
        self.static_state.p
    }
}
