//! Deviation model errors.

use thiserror::Error;

pub type DeviationResult<T> = Result<T, DeviationError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeviationError {
    #[error("Invalid deviation model input: {what}")]
    InvalidInput { what: String },
}
