//! Loss model errors.

use thiserror::Error;

pub type LossResult<T> = Result<T, LossError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LossError {
    #[error("Invalid loss model input: {what}")]
    InvalidInput { what: String },
}
