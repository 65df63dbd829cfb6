//! tm-loss: the Kacker-Okapuu / Benner cascade loss model.

pub mod error;
pub mod model;

pub use error::{LossError, LossResult};
pub use model::{compute_losses, LossBreakdown, LossFlowInput, LossGeometryInput, LossModelOptions};
