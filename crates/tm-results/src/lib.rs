//! tm-results: serializable result records and on-disk run storage.

pub mod convert;
pub mod error;
pub mod store;
pub mod types;

pub use convert::{build_non_convergence_result, build_operating_point_result};
pub use error::{ResultsError, ResultsResult};
pub use store::{RunId, RunManifest, RunStore};
pub use types::*;
