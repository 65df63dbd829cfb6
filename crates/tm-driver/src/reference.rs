//! Build the scaling [`ReferenceValues`] and [`BoundaryConditions`] a solve
//! needs from an [`OperatingPoint`] and the machine's inlet geometry.

use tm_assembly::{BoundaryConditions, MachineReferenceValues};
use tm_cascade::ReferenceValues;
use tm_fluids::PropertyOracle;
use tm_geometry::MachineGeometry;

use crate::error::DriverResult;
use crate::point::OperatingPoint;

/// Fraction of the inlet-entropy magnitude spanned by the scaled entropy
/// unknowns' window, centered slightly below the inlet entropy (entropy
/// only rises downstream of the inlet).
const ENTROPY_WINDOW_FRACTION: f64 = 0.15;
const ANGLE_MIN_DEG: f64 = -90.0;
const ANGLE_RANGE_DEG: f64 = 180.0;

/// Everything derived from an operating point plus the first cascade's
/// inlet area: the boundary conditions the series solve is closed against,
/// and the reference values every cascade's unknowns are scaled by.
pub struct OperatingPointReference {
    pub boundary: BoundaryConditions,
    pub reference: MachineReferenceValues,
}

pub fn build_reference(
    point: &OperatingPoint,
    geometry: &MachineGeometry,
    fluid: &dyn PropertyOracle,
) -> DriverResult<OperatingPointReference> {
    let stagnation = fluid.state_pt(point.p0_in, point.t0_in)?;
    let h0_in = stagnation.h;
    let s_in = stagnation.s;
    let d_in = stagnation.rho;

    let isentropic_exit = fluid.state_ps(point.p_out, s_in)?;
    let h_out_s = isentropic_exit.h;
    let v0 = (2.0 * (h0_in - h_out_s)).max(1.0).sqrt();

    let area_in = geometry
        .derived
        .first()
        .expect("a machine has at least one cascade")
        .area_in;
    let mass_flow_ref = area_in * v0 * d_in;

    let s_range = (s_in.abs() * ENTROPY_WINDOW_FRACTION).max(1.0);
    let s_min = s_in - 0.25 * s_range;

    let boundary = BoundaryConditions {
        h0_in,
        s_in,
        alpha_in: point.alpha_in,
        angular_speed: point.omega,
        p_out: point.p_out,
        p0_in: point.p0_in,
    };
    let reference = MachineReferenceValues {
        scaling: ReferenceValues {
            mass_flow_ref,
            v0,
            s_min,
            s_range,
            angle_min: ANGLE_MIN_DEG,
            angle_range: ANGLE_RANGE_DEG,
        },
        h_out_s,
    };

    Ok(OperatingPointReference { boundary, reference })
}
