//! A calorically-perfect-gas [`PropertyOracle`] used by the test suite and by
//! callers who just need a cheap, analytic stand-in while wiring up a real
//! backend. Every state equation here is closed-form: there is no inner
//! root-find, which makes this implementation useful for isolating bugs in
//! the cascade solver's own Newton iteration from bugs in a property
//! backend.

use crate::error::{FluidError, FluidResult};
use crate::oracle::{PropertyOracle, StateInput};
use crate::state::FluidState;

/// Calorically-perfect-gas model: constant `cp`, constant `gamma`, ideal
/// equation of state `p = rho * R * T`.
#[derive(Debug, Clone, Copy)]
pub struct IdealGasOracle {
    /// Specific heat capacity at constant pressure [J/(kg*K)]
    pub cp: f64,
    /// Heat capacity ratio cp/cv
    pub gamma: f64,
    /// Reference temperature for the entropy datum [K]
    pub t_ref: f64,
    /// Reference pressure for the entropy datum [Pa]
    pub p_ref: f64,
    /// Dynamic viscosity reference at `t_ref` [Pa*s], scaled as mu ~ sqrt(T)
    pub mu_ref: f64,
    /// Thermal conductivity reference at `t_ref` [W/(m*K)], scaled as k ~ sqrt(T)
    pub k_ref: f64,
}

impl IdealGasOracle {
    /// Dry air at atmospheric reference conditions.
    pub fn air() -> Self {
        Self {
            cp: 1005.0,
            gamma: 1.4,
            t_ref: 288.15,
            p_ref: 101_325.0,
            mu_ref: 1.789e-5,
            k_ref: 2.53e-2,
        }
    }

    fn gas_constant(&self) -> f64 {
        self.cp * (self.gamma - 1.0) / self.gamma
    }

    fn state_from_pt(&self, p: f64, t: f64) -> FluidResult<FluidState> {
        if !(p.is_finite() && p > 0.0) {
            return Err(FluidError::NonPhysical { what: "pressure" });
        }
        if !(t.is_finite() && t > 0.0) {
            return Err(FluidError::NonPhysical { what: "temperature" });
        }
        let r = self.gas_constant();
        let cv = self.cp / self.gamma;
        let h = self.cp * t;
        let s = self.cp * (t / self.t_ref).ln() - r * (p / self.p_ref).ln();
        let rho = p / (r * t);
        let a = (self.gamma * r * t).sqrt();
        let sqrt_t = (t / self.t_ref).sqrt();
        Ok(FluidState {
            p,
            t,
            h,
            s,
            rho,
            a,
            mu: self.mu_ref * sqrt_t,
            k: self.k_ref * sqrt_t,
            cp: self.cp,
            cv,
            gamma: self.gamma,
            z: 1.0,
        })
    }
}

impl PropertyOracle for IdealGasOracle {
    fn name(&self) -> &str {
        "ideal-gas"
    }

    fn state(&self, input: StateInput) -> FluidResult<FluidState> {
        let r = self.gas_constant();
        match input {
            StateInput::Pt { p, t } => self.state_from_pt(p, t),
            StateInput::Ph { p, h } => {
                let t = h / self.cp;
                self.state_from_pt(p, t)
            }
            StateInput::Ps { p, s } => {
                if !(p.is_finite() && p > 0.0) {
                    return Err(FluidError::NonPhysical { what: "pressure" });
                }
                let t = self.t_ref * ((s + r * (p / self.p_ref).ln()) / self.cp).exp();
                self.state_from_pt(p, t)
            }
            StateInput::Hs { h, s } => {
                let t = h / self.cp;
                if !(t.is_finite() && t > 0.0) {
                    return Err(FluidError::NonPhysical { what: "enthalpy" });
                }
                let ln_p_over_pref = (self.cp * (t / self.t_ref).ln() - s) / r;
                let p = self.p_ref * ln_p_over_pref.exp();
                self.state_from_pt(p, t)
            }
            StateInput::RhoH { rho, h } => {
                if !(rho.is_finite() && rho > 0.0) {
                    return Err(FluidError::NonPhysical { what: "density" });
                }
                let t = h / self.cp;
                let p = rho * r * t;
                self.state_from_pt(p, t)
            }
        }
    }
}
