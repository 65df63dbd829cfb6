//! Single-cascade (one blade row) flow physics: velocity triangles,
//! thermodynamic state from rothalpy conservation, loss and deviation
//! models, the critical (choking) point, and the interspace link to the
//! next cascade in a machine.
//!
//! Chaining multiple cascades into a full multi-stage turbine, and the
//! overall/stage performance that chain produces, lives one layer up in
//! `tm-assembly`.

pub mod choking;
pub mod critical;
pub mod error;
pub mod exit;
pub mod inlet;
pub mod interspace;
pub mod plane;
pub mod reference;
pub mod velocity;

pub use choking::{
    evaluate_cascade_critical, evaluate_cascade_isentropic_throat, evaluate_cascade_throat,
    interpolate_critical_state, ChokingContext, ChokingModel, ChokingResiduals, ThroatUnknowns,
};
pub use critical::{
    compute_critical_jacobian, compute_critical_values, evaluate_lagrangian_gradient,
    CriticalContext, CriticalState, LagrangianGradient,
};
pub use error::{CascadeError, CascadeResult};
pub use exit::{blockage_factor, evaluate_cascade_exit, CascadeExitInput, ExitGeometry, ThroatBlockage};
pub use inlet::{evaluate_cascade_inlet, CascadeInletInput, InletGeometry};
pub use interspace::{evaluate_cascade_interspace, InterspaceOutlet};
pub use plane::FlowPlane;
pub use reference::ReferenceValues;
pub use velocity::{triangle_from_absolute, triangle_from_relative, VelocityTriangle};
