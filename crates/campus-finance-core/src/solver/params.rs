use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CampusFinanceError;
use crate::settings::{validate_settings, FinancialSettings, WorkingCapitalSettings};
use crate::types::{Money, Rate, DAYS_IN_YEAR, PROJECTION_YEARS};
use crate::CampusFinanceResult;

/// Working-capital balances at a year end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkingCapitalBalances {
    pub accounts_receivable: Money,
    pub accounts_payable: Money,
    pub deferred_income: Money,
    pub accrued_expenses: Money,
}

impl WorkingCapitalBalances {
    /// Balances implied by a year's revenue and staff costs.
    pub fn from_flows(revenue: Money, staff_costs: Money, settings: &WorkingCapitalSettings) -> Self {
        Self {
            accounts_receivable: revenue / DAYS_IN_YEAR * settings.ar_collection_days,
            accounts_payable: staff_costs / DAYS_IN_YEAR * settings.ap_payment_days,
            deferred_income: revenue * settings.deferred_income_factor,
            accrued_expenses: staff_costs * (settings.accrued_expense_days / DAYS_IN_YEAR),
        }
    }

    pub fn liabilities(&self) -> Money {
        self.accounts_payable + self.deferred_income + self.accrued_expenses
    }

    /// Cash absorbed by the move from `previous` to `self`: a receivable
    /// increase uses cash, liability increases provide it.
    pub fn change_from(&self, previous: &WorkingCapitalBalances) -> Money {
        (self.accounts_receivable - previous.accounts_receivable)
            - (self.accounts_payable - previous.accounts_payable)
            - (self.deferred_income - previous.deferred_income)
            - (self.accrued_expenses - previous.accrued_expenses)
    }
}

/// Everything one solve needs. Built fresh per calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverParams {
    /// Revenue per year, 2023 first
    pub revenue: Vec<Money>,
    /// EBITDA per year (pre-financing)
    pub ebitda: Vec<Money>,
    pub capex: Vec<Money>,
    pub staff_costs: Vec<Money>,
    pub fixed_assets_opening: Money,
    pub depreciation_rate: Rate,
    pub starting_cash: Money,
    pub opening_equity: Money,
    #[serde(default)]
    pub opening_debt: Money,
    #[serde(default)]
    pub opening_working_capital: WorkingCapitalBalances,
    #[serde(default)]
    pub settings: FinancialSettings,
}

impl SolverParams {
    pub fn validate(&self) -> CampusFinanceResult<()> {
        for (field, values) in [
            ("revenue", &self.revenue),
            ("ebitda", &self.ebitda),
            ("capex", &self.capex),
            ("staff_costs", &self.staff_costs),
        ] {
            if values.len() != PROJECTION_YEARS {
                return Err(CampusFinanceError::ArrayLength {
                    field: field.into(),
                    expected: PROJECTION_YEARS,
                    actual: values.len(),
                });
            }
        }

        for (field, values) in [
            ("revenue", &self.revenue),
            ("capex", &self.capex),
            ("staff_costs", &self.staff_costs),
        ] {
            if let Some((i, v)) = values.iter().enumerate().find(|(_, v)| **v < Decimal::ZERO) {
                return Err(CampusFinanceError::NegativeValue {
                    field: format!("{field}[{i}]"),
                    value: *v,
                });
            }
        }

        let wc = &self.opening_working_capital;
        for (field, value) in [
            ("fixed_assets_opening", self.fixed_assets_opening),
            ("depreciation_rate", self.depreciation_rate),
            ("starting_cash", self.starting_cash),
            ("opening_debt", self.opening_debt),
            ("opening_working_capital.accounts_receivable", wc.accounts_receivable),
            ("opening_working_capital.accounts_payable", wc.accounts_payable),
            ("opening_working_capital.deferred_income", wc.deferred_income),
            ("opening_working_capital.accrued_expenses", wc.accrued_expenses),
        ] {
            if value < Decimal::ZERO {
                return Err(CampusFinanceError::NegativeValue {
                    field: field.into(),
                    value,
                });
            }
        }
        if self.depreciation_rate > Decimal::ONE {
            return Err(CampusFinanceError::InvalidInput {
                field: "depreciation_rate".into(),
                reason: format!("Rate must be between 0 and 1, got {}", self.depreciation_rate),
            });
        }

        validate_settings(&self.settings)
    }

    /// Opening assets minus opening liabilities and equity. Non-zero means
    /// every projected year carries the same difference.
    pub fn opening_imbalance(&self) -> Money {
        let wc = &self.opening_working_capital;
        let assets = self.starting_cash + wc.accounts_receivable + self.fixed_assets_opening;
        assets - wc.liabilities() - self.opening_debt - self.opening_equity
    }

    /// Equity that makes the opening balance sheet balance.
    pub fn balancing_equity(&self) -> Money {
        self.opening_equity + self.opening_imbalance()
    }
}
