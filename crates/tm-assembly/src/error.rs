//! Assembly (multi-cascade series) evaluation errors.

use thiserror::Error;

pub type AssemblyResult<T> = Result<T, AssemblyError>;

#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("Invalid assembly input: {what}")]
    InvalidInput { what: String },

    #[error(transparent)]
    Cascade(#[from] tm_cascade::CascadeError),

    #[error(transparent)]
    Geometry(#[from] tm_geometry::GeometryError),

    #[error(transparent)]
    Fluid(#[from] tm_fluids::FluidError),
}
