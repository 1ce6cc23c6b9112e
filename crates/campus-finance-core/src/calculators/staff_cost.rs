use serde::{Deserialize, Serialize};

use super::growth::stepped_value;
use super::revenue::{default_base_year, default_frequency};
use crate::types::{Money, Rate};
use crate::CampusFinanceResult;

/// Staff cost base, escalated with the same stepped CPI as tuition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffCostPlan {
    pub base_cost: Money,
    #[serde(default = "default_frequency")]
    pub cpi_frequency: u32,
    #[serde(default = "default_base_year")]
    pub base_year: i32,
}

pub fn calculate_staff_cost(
    plan: &StaffCostPlan,
    cpi_rate: Rate,
    year: i32,
) -> CampusFinanceResult<Money> {
    stepped_value(
        plan.base_cost,
        cpi_rate,
        plan.cpi_frequency,
        plan.base_year,
        year,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_staff_cost_steps_with_cpi() {
        let plan = StaffCostPlan {
            base_cost: dec!(10000000),
            cpi_frequency: 2,
            base_year: 2028,
        };
        assert_eq!(calculate_staff_cost(&plan, dec!(0.03), 2028).unwrap(), dec!(10000000));
        assert_eq!(calculate_staff_cost(&plan, dec!(0.03), 2029).unwrap(), dec!(10000000));
        assert_eq!(calculate_staff_cost(&plan, dec!(0.03), 2030).unwrap(), dec!(10300000));
    }
}
