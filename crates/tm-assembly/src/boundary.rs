//! Machine-level boundary conditions and scaling reference values.

use tm_cascade::ReferenceValues;

/// The operating point a machine is evaluated at: inlet stagnation state,
/// inlet flow angle, shaft speed, and exit static pressure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryConditions {
    pub h0_in: f64,
    pub s_in: f64,
    pub alpha_in: f64,
    pub angular_speed: f64,
    pub p_out: f64,
    pub p0_in: f64,
}

/// [`ReferenceValues`] plus the isentropic exit enthalpy used to normalize
/// efficiency: the enthalpy the flow would reach expanding isentropically
/// from the inlet stagnation state down to the exit static pressure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MachineReferenceValues {
    pub scaling: ReferenceValues,
    pub h_out_s: f64,
}
