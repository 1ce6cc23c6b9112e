use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Money;

/// Which row of the balancing policy applied in a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalancingAction {
    /// Enough cash to clear all debt and stay above the floor
    Repay,
    /// Above the floor but not enough to clear debt; debt carried unchanged
    Hold,
    /// Below the floor; new debt drawn to restore it
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Balancing {
    pub action: BalancingAction,
    pub short_term_debt: Money,
    pub financing_cash_flow: Money,
    pub end_cash: Money,
}

/// Apply the debt balancing policy to a pre-financing cash position.
///
/// Short-term debt is the only lever: it is repaid in full when cash allows,
/// otherwise carried, and drawn down just enough to keep `minimum_cash`.
pub fn balance_cash(theoretical_cash: Money, previous_debt: Money, minimum_cash: Money) -> Balancing {
    if theoretical_cash >= minimum_cash + previous_debt {
        Balancing {
            action: BalancingAction::Repay,
            short_term_debt: Decimal::ZERO,
            financing_cash_flow: -previous_debt,
            end_cash: theoretical_cash - previous_debt,
        }
    } else if theoretical_cash >= minimum_cash {
        Balancing {
            action: BalancingAction::Hold,
            short_term_debt: previous_debt,
            financing_cash_flow: Decimal::ZERO,
            end_cash: theoretical_cash,
        }
    } else {
        let short_term_debt = previous_debt + (minimum_cash - theoretical_cash);
        Balancing {
            action: BalancingAction::Draw,
            short_term_debt,
            financing_cash_flow: short_term_debt - previous_debt,
            end_cash: minimum_cash,
        }
    }
}
