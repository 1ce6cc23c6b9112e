//! Per-year calculators. Each is a pure function of its plan and a calendar
//! year; none of them look at other years.

pub mod ebitda;
pub mod growth;
pub mod opex;
pub mod rent;
pub mod revenue;
pub mod staff_cost;
