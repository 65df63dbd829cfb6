//! Multi-cascade assembly: chains [`tm_cascade`]'s single-cascade physics
//! into a full turbine's residual system, and turns a converged solution
//! into per-plane, per-cascade, per-stage, and overall performance.

pub mod boundary;
pub mod cascade;
pub mod error;
pub mod performance;
pub mod series;
pub mod unknowns;

pub use boundary::{BoundaryConditions, MachineReferenceValues};
pub use cascade::{CascadeBoundary, CascadeContext, CascadeRecord};
pub use error::{AssemblyError, AssemblyResult};
pub use performance::{
    compute_efficiency_breakdown, compute_overall_performance, compute_stage_performance,
    EfficiencyDropBreakdown, OverallPerformance,
};
pub use series::{evaluate_cascade_series, CascadeSpec, SeriesContext, SeriesResult};
pub use unknowns::{CascadeUnknowns, CriticalUnknowns, MachineUnknowns};
