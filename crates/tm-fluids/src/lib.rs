//! tm-fluids: the real-fluid property boundary for the turbine mean-line
//! solver.
//!
//! This crate defines a stable trait, [`PropertyOracle`], that isolates the
//! cascade evaluator from the choice of thermodynamic property backend.
//! Producing physically accurate properties for an arbitrary working fluid
//! (REFPROP, CoolProp, a tabulated EOS, ...) is explicitly out of scope;
//! this crate only ships the trait plus a calorically-perfect-gas reference
//! implementation, [`IdealGasOracle`], used to exercise the rest of the
//! stack without an external dependency.

pub mod error;
pub mod ideal_gas;
pub mod oracle;
pub mod state;

pub use error::{FluidError, FluidResult};
pub use ideal_gas::IdealGasOracle;
pub use oracle::{PropertyOracle, StateInput};
pub use state::FluidState;
