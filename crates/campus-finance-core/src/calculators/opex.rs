use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

/// How an operating-expense sub-account is sized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "basis", rename_all = "snake_case")]
pub enum OpexBasis {
    Fixed { amount: Money },
    PercentOfRevenue { percent: Rate },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpexAccount {
    pub name: String,
    #[serde(flatten)]
    pub basis: OpexBasis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpexLine {
    pub name: String,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpexBreakdown {
    pub lines: Vec<OpexLine>,
    pub total: Money,
}

pub fn calculate_opex(accounts: &[OpexAccount], revenue: Money) -> OpexBreakdown {
    let lines: Vec<OpexLine> = accounts
        .iter()
        .map(|account| OpexLine {
            name: account.name.clone(),
            amount: match &account.basis {
                OpexBasis::Fixed { amount } => *amount,
                OpexBasis::PercentOfRevenue { percent } => revenue * percent,
            },
        })
        .collect();
    let total = lines.iter().map(|l| l.amount).sum::<Decimal>();
    OpexBreakdown { lines, total }
}
