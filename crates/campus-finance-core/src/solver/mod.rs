//! Financing layer: working capital, debt balancing, interest and the
//! fixed-point iteration that ties them together.

pub mod balancing;
pub mod circular;
pub mod params;
pub mod recurrence;

pub use circular::{solve, solve_financials, SolverMetadata, SolverResult};
pub use params::{SolverParams, WorkingCapitalBalances};
pub use recurrence::YearState;
