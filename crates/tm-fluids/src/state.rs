//! Thermodynamic state representation.

/// A fully-resolved thermodynamic state as returned by a [`crate::PropertyOracle`].
///
/// Every field is a plain `f64` in SI units rather than a `uom` quantity: the
/// cascade evaluator mixes these values freely inside residual vectors and
/// finite-difference Jacobians, where a `uom`-typed quantity would have to be
/// unwrapped at every arithmetic step. Pressure and temperature at the
/// boundary-condition layer go through `tm_core::units` typed constructors,
/// where the extra type safety earns its keep; everything downstream of the
/// oracle call stays in bare `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidState {
    /// Pressure [Pa]
    pub p: f64,
    /// Temperature [K]
    pub t: f64,
    /// Specific enthalpy [J/kg]
    pub h: f64,
    /// Specific entropy [J/(kg*K)]
    pub s: f64,
    /// Density [kg/m^3]
    pub rho: f64,
    /// Speed of sound [m/s]
    pub a: f64,
    /// Dynamic viscosity [Pa*s]
    pub mu: f64,
    /// Thermal conductivity [W/(m*K)]
    pub k: f64,
    /// Specific heat capacity at constant pressure [J/(kg*K)]
    pub cp: f64,
    /// Specific heat capacity at constant volume [J/(kg*K)]
    pub cv: f64,
    /// Heat capacity ratio cp/cv (dimensionless)
    pub gamma: f64,
    /// Compressibility factor Z = p/(rho*R*T) (dimensionless)
    pub z: f64,
}

impl FluidState {
    /// Check that every field is finite and every strictly-positive quantity
    /// is indeed positive. Cheap enough to call after every oracle query.
    pub fn is_physical(&self) -> bool {
        let finite = [
            self.p, self.t, self.h, self.s, self.rho, self.a, self.mu, self.k, self.cp, self.cv,
            self.gamma, self.z,
        ]
        .iter()
        .all(|v| v.is_finite());
        finite
            && self.p > 0.0
            && self.t > 0.0
            && self.rho > 0.0
            && self.a > 0.0
            && self.cp > 0.0
            && self.cv > 0.0
            && self.gamma > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FluidState {
        FluidState {
            p: 1e5,
            t: 300.0,
            h: 3e5,
            s: 1e3,
            rho: 1.2,
            a: 340.0,
            mu: 1.8e-5,
            k: 0.026,
            cp: 1005.0,
            cv: 718.0,
            gamma: 1.4,
            z: 1.0,
        }
    }

    #[test]
    fn physical_state_passes() {
        assert!(sample().is_physical());
    }

    #[test]
    fn non_finite_state_fails() {
        let mut s = sample();
        s.h = f64::NAN;
        assert!(!s.is_physical());
    }

    #[test]
    fn non_positive_density_fails() {
        let mut s = sample();
        s.rho = -1.0;
        assert!(!s.is_physical());
    }
}
