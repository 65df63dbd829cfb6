//! tm-geometry: blade-row geometry and the derived quantities the cascade
//! evaluator and loss/deviation models need (areas, throat radii, aspect
//! ratio, flaring angle, ...).

pub mod derived;
pub mod error;
pub mod machine;
pub mod raw;

pub use derived::{compute_derived_geometry, throat_radius, CascadeGeometryDerived};
pub use error::{GeometryError, GeometryResult};
pub use machine::MachineGeometry;
pub use raw::{CascadeGeometry, CascadeType};
