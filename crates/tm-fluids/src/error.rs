//! Fluid property errors.

use thiserror::Error;
use tm_core::CoreError;

/// Result type for fluid property lookups.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can be raised by a [`crate::PropertyOracle`] implementation.
///
/// These map onto the `PropertyOutOfRange` / `NonConvergence` error kinds
/// surfaced by the higher-level crates: a backend that cannot find a root for
/// the requested input pair (e.g. `PH` near a phase boundary) reports
/// [`FluidError::ConvergenceFailed`]; one that is asked for a state outside
/// its tabulated or correlation range reports [`FluidError::OutOfRange`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Non-physical values (negative density, pressure, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Value out of the valid range of the backing correlation or table.
    #[error("Value out of range for {what}")]
    OutOfRange { what: &'static str },

    /// Invalid argument (e.g. mismatched composition).
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Operation not supported by this backend.
    #[error("Not supported: {what}")]
    NotSupported { what: &'static str },

    /// Backend-internal error (surrogate fit singular, lookup table I/O, ...).
    #[error("Backend error: {message}")]
    Backend { message: String },

    /// The inner root find (e.g. temperature from P,h) failed to converge.
    #[error("Convergence failed for {what}")]
    ConvergenceFailed { what: &'static str },
}

impl From<FluidError> for CoreError {
    fn from(err: FluidError) -> Self {
        match err {
            FluidError::NonPhysical { what } => CoreError::Invariant { what },
            FluidError::OutOfRange { what } => CoreError::InvalidArg { what },
            FluidError::InvalidArg { what } => CoreError::InvalidArg { what },
            FluidError::NotSupported { what } => CoreError::Invariant { what },
            FluidError::Backend { .. } => CoreError::Invariant {
                what: "fluid backend error",
            },
            FluidError::ConvergenceFailed { what } => CoreError::Invariant { what },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FluidError::NonPhysical { what: "pressure" };
        assert!(err.to_string().contains("pressure"));
    }

    #[test]
    fn error_to_core_error() {
        let fluid_err = FluidError::NotSupported { what: "mixtures" };
        let core_err: CoreError = fluid_err.into();
        assert!(matches!(core_err, CoreError::Invariant { .. }));
    }
}
