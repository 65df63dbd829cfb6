//! Reference values used to scale a cascade's unknowns to order-one
//! quantities before handing them to the root finder.

/// Scaling quantities shared by every cascade in a machine: a representative
/// mass flow rate, velocity, entropy range, and flow-angle range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceValues {
    pub mass_flow_ref: f64,
    pub v0: f64,
    pub s_min: f64,
    pub s_range: f64,
    pub angle_min: f64,
    pub angle_range: f64,
}
