use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::balancing::{balance_cash, BalancingAction};
use super::params::{SolverParams, WorkingCapitalBalances};
use crate::types::{year_at, Money, PROJECTION_YEARS};

/// Fully financed state of one projected year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearState {
    pub year: i32,
    // P&L tail
    pub revenue: Money,
    pub ebitda: Money,
    pub depreciation: Money,
    pub interest_expense: Money,
    pub interest_income: Money,
    pub net_result_before_zakat: Money,
    pub zakat: Money,
    pub net_result: Money,
    // Cash flow
    pub working_capital_change: Money,
    pub operating_cash_flow: Money,
    pub capex: Money,
    pub investing_cash_flow: Money,
    pub financing_cash_flow: Money,
    pub net_cash_flow: Money,
    pub theoretical_cash: Money,
    pub balancing: BalancingAction,
    // Balance sheet
    pub cash: Money,
    pub working_capital: WorkingCapitalBalances,
    pub fixed_assets: Money,
    pub total_assets: Money,
    pub short_term_debt: Money,
    pub total_liabilities: Money,
    pub retained_earnings: Money,
    pub total_equity: Money,
}

impl YearState {
    /// Assets − liabilities − equity. Zero when the year balances.
    pub fn balance_difference(&self) -> Money {
        self.total_assets - self.total_liabilities - self.total_equity
    }
}

/// Balances carried from one year into the next within a pass.
#[derive(Debug, Clone, Copy)]
struct Carry {
    cash: Money,
    debt: Money,
    fixed_assets: Money,
    retained_earnings: Money,
    working_capital: WorkingCapitalBalances,
}

impl Carry {
    fn opening(params: &SolverParams) -> Self {
        Self {
            cash: params.starting_cash,
            debt: params.opening_debt,
            fixed_assets: params.fixed_assets_opening,
            retained_earnings: Decimal::ZERO,
            working_capital: params.opening_working_capital,
        }
    }
}

/// Interest for one year given last year's balances from this pass and the
/// same year's balances from the previous pass.
fn interest(carry: &Carry, previous: Option<&YearState>, params: &SolverParams) -> (Money, Money) {
    match previous {
        None => (Decimal::ZERO, Decimal::ZERO),
        Some(prev) => {
            let average_debt = (carry.debt + prev.short_term_debt) / dec!(2);
            let average_cash = (carry.cash + prev.cash) / dec!(2);
            (
                average_debt * params.settings.debt_interest_rate,
                average_cash * params.settings.bank_deposit_interest_rate,
            )
        }
    }
}

/// One forward pass over all thirty years.
///
/// With no `previous` projection interest is zero everywhere (cold start).
/// Otherwise each year's interest blends this pass's prior-year balances with
/// the previous pass's same-year balances.
pub fn forward_pass(params: &SolverParams, previous: Option<&[YearState]>) -> Vec<YearState> {
    let settings = &params.settings;
    let mut carry = Carry::opening(params);
    let mut years = Vec::with_capacity(PROJECTION_YEARS);

    for offset in 0..PROJECTION_YEARS {
        let revenue = params.revenue[offset];
        let ebitda = params.ebitda[offset];
        let capex = params.capex[offset];
        let staff_costs = params.staff_costs[offset];

        let (interest_expense, interest_income) =
            interest(&carry, previous.and_then(|p| p.get(offset)), params);

        // P&L
        let depreciation = carry.fixed_assets * params.depreciation_rate;
        let net_result_before_zakat = ebitda - depreciation - interest_expense + interest_income;
        let zakat = net_result_before_zakat.max(Decimal::ZERO) * settings.zakat_rate;
        let net_result = net_result_before_zakat - zakat;

        // Working capital
        let working_capital =
            WorkingCapitalBalances::from_flows(revenue, staff_costs, &settings.working_capital);
        let working_capital_change = working_capital.change_from(&carry.working_capital);

        // Cash flow before financing
        let operating_cash_flow = net_result + depreciation - working_capital_change;
        let investing_cash_flow = -capex;
        let theoretical_cash = carry.cash + operating_cash_flow + investing_cash_flow;

        let balancing =
            balance_cash(theoretical_cash, carry.debt, settings.minimum_cash_balance);
        let net_cash_flow =
            operating_cash_flow + investing_cash_flow + balancing.financing_cash_flow;

        // Balance sheet
        let fixed_assets = carry.fixed_assets + capex - depreciation;
        let total_assets = balancing.end_cash + working_capital.accounts_receivable + fixed_assets;
        let total_liabilities = working_capital.liabilities() + balancing.short_term_debt;
        let retained_earnings = carry.retained_earnings + net_result;
        let total_equity = params.opening_equity + retained_earnings;

        years.push(YearState {
            year: year_at(offset),
            revenue,
            ebitda,
            depreciation,
            interest_expense,
            interest_income,
            net_result_before_zakat,
            zakat,
            net_result,
            working_capital_change,
            operating_cash_flow,
            capex,
            investing_cash_flow,
            financing_cash_flow: balancing.financing_cash_flow,
            net_cash_flow,
            theoretical_cash,
            balancing: balancing.action,
            cash: balancing.end_cash,
            working_capital,
            fixed_assets,
            total_assets,
            short_term_debt: balancing.short_term_debt,
            total_liabilities,
            retained_earnings,
            total_equity,
        });

        carry = Carry {
            cash: balancing.end_cash,
            debt: balancing.short_term_debt,
            fixed_assets,
            retained_earnings,
            working_capital,
        };
    }

    years
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{FinancialSettings, WorkingCapitalSettings};

    fn sample_params() -> SolverParams {
        SolverParams {
            revenue: vec![dec!(100000000); PROJECTION_YEARS],
            ebitda: vec![dec!(15000000); PROJECTION_YEARS],
            capex: vec![dec!(5000000); PROJECTION_YEARS],
            staff_costs: vec![dec!(50000000); PROJECTION_YEARS],
            fixed_assets_opening: dec!(50000000),
            depreciation_rate: dec!(0.10),
            starting_cash: dec!(5000000),
            opening_equity: dec!(55000000),
            opening_debt: Decimal::ZERO,
            opening_working_capital: WorkingCapitalBalances::default(),
            settings: FinancialSettings::default(),
        }
    }

    #[test]
    fn test_cold_start_has_no_interest() {
        let years = forward_pass(&sample_params(), None);
        assert_eq!(years.len(), PROJECTION_YEARS);
        for y in &years {
            assert_eq!(y.interest_expense, Decimal::ZERO);
            assert_eq!(y.interest_income, Decimal::ZERO);
        }
    }

    #[test]
    fn test_first_year_pnl() {
        let years = forward_pass(&sample_params(), None);
        let y = &years[0];
        assert_eq!(y.year, 2023);
        assert_eq!(y.depreciation, dec!(5000000));
        assert_eq!(y.net_result_before_zakat, dec!(10000000));
        assert_eq!(y.zakat, dec!(250000));
        assert_eq!(y.net_result, dec!(9750000));
        assert_eq!(y.fixed_assets, dec!(50000000));
    }

    #[test]
    fn test_every_year_balances() {
        let years = forward_pass(&sample_params(), None);
        for y in &years {
            assert!(
                y.balance_difference().abs() < dec!(0.01),
                "Year {}: out of balance by {}",
                y.year,
                y.balance_difference()
            );
        }
    }

    #[test]
    fn test_loss_is_not_zakatable() {
        let mut p = sample_params();
        p.ebitda = vec![dec!(-10000000); PROJECTION_YEARS];
        let years = forward_pass(&p, None);
        for y in &years {
            assert_eq!(y.zakat, Decimal::ZERO);
        }
    }

    #[test]
    fn test_interest_uses_blended_balances() {
        let mut p = sample_params();
        p.opening_debt = dec!(4000000);
        p.opening_equity = p.balancing_equity();
        let cold = forward_pass(&p, None);
        let warm = forward_pass(&p, Some(&cold));
        // 2023: opening debt 4M, cold-start 2023 debt
        let expected = (dec!(4000000) + cold[0].short_term_debt) / dec!(2) * dec!(0.05);
        assert_eq!(warm[0].interest_expense, expected);
        let expected_income = (dec!(5000000) + cold[0].cash) / dec!(2) * dec!(0.02);
        assert_eq!(warm[0].interest_income, expected_income);
    }

    #[test]
    fn test_first_year_working_capital_change_from_zero_opening() {
        let mut p = sample_params();
        p.settings.working_capital = WorkingCapitalSettings {
            ar_collection_days: dec!(73),
            ap_payment_days: Decimal::ZERO,
            deferred_income_factor: Decimal::ZERO,
            accrued_expense_days: Decimal::ZERO,
        };
        let years = forward_pass(&p, None);
        // AR = 100M / 365 × 73 = 20M, all absorbed in year one
        assert!((years[0].working_capital_change - dec!(20000000)).abs() < dec!(0.000001));
        assert_eq!(years[1].working_capital_change, Decimal::ZERO);
    }
}
