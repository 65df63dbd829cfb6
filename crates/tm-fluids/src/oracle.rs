//! Real-fluid property oracle: the trait boundary between this crate and
//! whatever thermodynamic property package a caller wires in (REFPROP,
//! CoolProp, a tabulated EOS, ...). This crate ships only the trait and a
//! lightweight reference implementation used by the test suite; producing
//! physically accurate properties for an arbitrary working fluid is out of
//! scope here.

use crate::error::FluidResult;
use crate::state::FluidState;

/// Four independent-variable input pairs used to query a fluid state.
///
/// `PT` is used once, to build the inlet stagnation state from the boundary
/// conditions; everywhere else in the cascade evaluator the natural pair
/// falls out of what was already being conserved (`PH` for a static state
/// reached at constant rothalpy, `PS` for an isentropic target, `HS` when
/// both enthalpy and entropy have been fixed by upstream algebra, and
/// `RhoH` when density is the natural unknown, as in the critical-state
/// solve).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StateInput {
    /// Pressure and temperature [Pa, K].
    Pt { p: f64, t: f64 },
    /// Pressure and specific enthalpy [Pa, J/kg].
    Ph { p: f64, h: f64 },
    /// Pressure and specific entropy [Pa, J/(kg*K)].
    Ps { p: f64, s: f64 },
    /// Specific enthalpy and specific entropy [J/kg, J/(kg*K)].
    Hs { h: f64, s: f64 },
    /// Density and specific enthalpy [kg/m^3, J/kg].
    RhoH { rho: f64, h: f64 },
}

/// Trait for real-fluid (or perfect-gas) property backends.
///
/// Implementations must be thread-safe (`Send + Sync`): the operating-point
/// driver may evaluate independent points from a `rayon` pool.
pub trait PropertyOracle: Send + Sync {
    /// Human-readable backend name, for diagnostics and result metadata.
    fn name(&self) -> &str;

    /// Resolve a fluid state from one of the supported input pairs.
    fn state(&self, input: StateInput) -> FluidResult<FluidState>;

    /// Convenience wrapper around [`StateInput::Pt`].
    fn state_pt(&self, p: f64, t: f64) -> FluidResult<FluidState> {
        self.state(StateInput::Pt { p, t })
    }

    /// Convenience wrapper around [`StateInput::Ph`].
    fn state_ph(&self, p: f64, h: f64) -> FluidResult<FluidState> {
        self.state(StateInput::Ph { p, h })
    }

    /// Convenience wrapper around [`StateInput::Ps`].
    fn state_ps(&self, p: f64, s: f64) -> FluidResult<FluidState> {
        self.state(StateInput::Ps { p, s })
    }

    /// Convenience wrapper around [`StateInput::Hs`].
    fn state_hs(&self, h: f64, s: f64) -> FluidResult<FluidState> {
        self.state(StateInput::Hs { h, s })
    }

    /// Convenience wrapper around [`StateInput::RhoH`].
    fn state_rho_h(&self, rho: f64, h: f64) -> FluidResult<FluidState> {
        self.state(StateInput::RhoH { rho, h })
    }
}
