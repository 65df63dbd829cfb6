//! Cascade evaluation errors.

use thiserror::Error;

pub type CascadeResult<T> = Result<T, CascadeError>;

#[derive(Error, Debug)]
pub enum CascadeError {
    #[error("Invalid cascade input: {what}")]
    InvalidInput { what: String },

    #[error("Fluid property evaluation failed: {0}")]
    Fluid(#[from] tm_fluids::FluidError),

    #[error("Loss model evaluation failed: {0}")]
    Loss(#[from] tm_loss::LossError),

    #[error("Deviation model evaluation failed: {0}")]
    Deviation(#[from] tm_deviation::DeviationError),

    #[error("Unknown choking condition: {0}")]
    UnknownChokingCondition(String),

    #[error("Unknown throat blockage option: {0}")]
    UnknownBlockageOption(String),
}
