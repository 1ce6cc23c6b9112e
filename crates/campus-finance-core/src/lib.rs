//! Thirty-year (2023–2052) financial projection for a school campus.
//!
//! Tuition, staff, rent and opex calculators feed a period resolver that
//! blends recorded actuals and transition overrides with calculated values.
//! The solver then closes the interest / debt / cash loop by fixed-point
//! iteration and produces the P&L, cash flow and balance sheet per year.

pub mod calculators;
pub mod error;
pub mod period;
pub mod projection;
pub mod settings;
pub mod solver;
pub mod time_value;
pub mod types;

pub use error::CampusFinanceError;
pub use types::*;

/// Standard result type for all campus-finance operations
pub type CampusFinanceResult<T> = Result<T, CampusFinanceError>;
