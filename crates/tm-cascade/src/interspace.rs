//! The gap between consecutive cascades: angular momentum and stagnation
//! enthalpy are conserved, density is assumed unchanged across the gap.

use tm_core::degtrig::arctand;
use tm_fluids::PropertyOracle;

use crate::error::CascadeResult;

/// Inlet boundary condition handed to the next cascade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterspaceOutlet {
    pub h0_in: f64,
    pub s_in: f64,
    pub alpha_in: f64,
    pub v_in: f64,
}

/// Propagate the exit conditions of one cascade across the interspace to
/// the inlet of the next.
///
/// No heat transfer (stagnation enthalpy conserved), no friction (angular
/// momentum conserved), and density held fixed across the gap -- the density
/// assumption is a known approximation, not exact for a real annular duct.
#[allow(clippy::too_many_arguments)]
pub fn evaluate_cascade_interspace(
    h0_exit: f64,
    v_m_exit: f64,
    v_t_exit: f64,
    rho_exit: f64,
    radius_exit: f64,
    area_exit: f64,
    radius_inlet: f64,
    area_inlet: f64,
    fluid: &dyn PropertyOracle,
) -> CascadeResult<InterspaceOutlet> {
    let h0_in = h0_exit;

    let v_t_in = v_t_exit * radius_exit / radius_inlet;
    let v_m_in = v_m_exit * area_exit / area_inlet;
    let v_in = (v_t_in.powi(2) + v_m_in.powi(2)).sqrt();
    let alpha_in = arctand(v_t_in / v_m_in);

    let h_in = h0_in - 0.5 * v_in.powi(2);
    let state = fluid.state_rho_h(rho_exit, h_in)?;

    Ok(InterspaceOutlet {
        h0_in,
        s_in: state.s,
        alpha_in,
        v_in,
    })
}
