//! End-to-end projection: resolve periods, solve financing, summarise.

pub mod engine;
pub mod input;
pub mod output;
pub mod summary;

pub use engine::{run_projection, ProjectionEngine};
pub use input::ProjectionInput;
pub use output::{FieldSources, ProjectionOutput, YearlyProjection};
pub use summary::ProjectionSummary;
