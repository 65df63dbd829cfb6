//! tm-core: stable foundation shared by every crate in the turbine mean-line stack.
//!
//! Contains:
//! - units (uom SI types + constructors, plus the bare-`f64`-degrees angle
//!   convention used throughout the cascade model)
//! - numeric (Real + tolerances + smooth max/min/abs blending primitives)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use units::*;
