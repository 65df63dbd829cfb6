//! Geometry validation errors.

use thiserror::Error;

pub type GeometryResult<T> = Result<T, GeometryError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Invalid configuration: {what}")]
    InvalidConfiguration { what: String },
}
