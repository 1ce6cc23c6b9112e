use serde::{Deserialize, Serialize};

use crate::types::{percent_of, Money, Percent};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EbitdaResult {
    pub ebitda: Money,
    /// EBITDA / revenue × 100; 0 when revenue is 0
    pub margin: Percent,
}

pub fn calculate_ebitda(revenue: Money, staff_cost: Money, rent: Money, opex: Money) -> EbitdaResult {
    let ebitda = revenue - staff_cost - rent - opex;
    EbitdaResult {
        ebitda,
        margin: percent_of(ebitda, revenue),
    }
}
