//! Generic damped Newton root finder over a residual vector.
//!
//! Deliberately has no notion of turbines, cascades, or fluids: it solves
//! `residual_fn(x) = 0` given a residual function and a (possibly
//! finite-difference) Jacobian. Two methods share that Jacobian routine and
//! convergence bookkeeping: a backtracking-line-search Newton step with an
//! SVD fallback for ill-conditioned steps (`SolverMethod::LevenbergMarquardt`,
//! the default), and Powell's hybrid dogleg trust-region step
//! (`SolverMethod::PowellHybrid`); `newton_solve` dispatches between them on
//! `NewtonConfig::method`. The turbine-specific residual assembly and
//! operating-point continuation live in `tm-assembly` and `tm-driver`.

pub mod error;
pub mod jacobian;
pub mod newton;

pub use error::{SolverError, SolverResult};
pub use jacobian::{central_difference_jacobian, finite_difference_jacobian};
pub use newton::{
    dogleg_solve, newton_solve, newton_solve_with_validator, NewtonConfig, NewtonResult,
    SolverMethod,
};
