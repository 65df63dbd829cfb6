//! Top-level CLI error: wraps every lower-crate error the CLI can surface,
//! plus the one error kind that belongs to the CLI alone -- a malformed or
//! out-of-range configuration file, fatal before any operating point is
//! solved.

use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("invalid configuration: {what}")]
    InvalidConfiguration { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to serialize results: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Geometry(#[from] tm_geometry::GeometryError),

    #[error(transparent)]
    Driver(#[from] tm_driver::DriverError),

    #[error(transparent)]
    Results(#[from] tm_results::ResultsError),
}
