//! Error types for the operating-point driver.

use thiserror::Error;

pub type DriverResult<T> = Result<T, DriverError>;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("Invalid operating point: {what}")]
    InvalidOperatingPoint { what: String },

    #[error(transparent)]
    Assembly(#[from] tm_assembly::AssemblyError),

    #[error(transparent)]
    Cascade(#[from] tm_cascade::CascadeError),

    #[error(transparent)]
    Geometry(#[from] tm_geometry::GeometryError),

    #[error(transparent)]
    Fluid(#[from] tm_fluids::FluidError),

    #[error(transparent)]
    Solver(#[from] tm_solver::SolverError),

    #[error("Solver did not converge for this operating point after exhausting every retry: {what}")]
    NonConvergence { what: String },
}
