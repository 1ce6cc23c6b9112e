pub mod npv;
pub mod projection;
pub mod solver;
