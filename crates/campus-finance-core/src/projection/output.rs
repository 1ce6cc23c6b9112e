use serde::{Deserialize, Serialize};

use crate::calculators::rent::rent_load;
use crate::period::{FieldSource, ResolvedYear};
use crate::solver::balancing::BalancingAction;
use crate::solver::{SolverMetadata, YearState};
use crate::types::{Money, Percent, PeriodKind};

use super::summary::ProjectionSummary;

/// Provenance of each resolved pre-financing field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSources {
    pub revenue: FieldSource,
    pub staff_cost: FieldSource,
    pub rent: FieldSource,
    pub opex: FieldSource,
    pub capex: FieldSource,
}

/// One year of the P&L, cash flow and balance sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyProjection {
    pub year: i32,
    pub period: PeriodKind,
    pub students: u32,
    pub sources: FieldSources,
    // P&L
    pub revenue: Money,
    pub staff_cost: Money,
    pub rent: Money,
    pub opex: Money,
    pub ebitda: Money,
    pub ebitda_margin: Percent,
    pub rent_load: Percent,
    pub capex: Money,
    pub depreciation: Money,
    pub interest_expense: Money,
    pub interest_income: Money,
    pub net_result_before_zakat: Money,
    pub zakat: Money,
    pub net_result: Money,
    // Cash flow
    pub working_capital_change: Money,
    pub operating_cash_flow: Money,
    pub investing_cash_flow: Money,
    pub financing_cash_flow: Money,
    pub net_cash_flow: Money,
    pub theoretical_cash: Money,
    pub balancing: BalancingAction,
    // Balance sheet
    pub cash: Money,
    pub accounts_receivable: Money,
    pub fixed_assets: Money,
    pub total_assets: Money,
    pub accounts_payable: Money,
    pub deferred_income: Money,
    pub accrued_expenses: Money,
    pub short_term_debt: Money,
    pub total_liabilities: Money,
    pub opening_equity: Money,
    pub retained_earnings: Money,
    pub total_equity: Money,
}

impl YearlyProjection {
    pub(crate) fn assemble(resolved: &ResolvedYear, solved: &YearState, opening_equity: Money) -> Self {
        let wc = &solved.working_capital;
        Self {
            year: resolved.year,
            period: resolved.period,
            students: resolved.students,
            sources: FieldSources {
                revenue: resolved.revenue.source,
                staff_cost: resolved.staff_cost.source,
                rent: resolved.rent.source,
                opex: resolved.opex.source,
                capex: resolved.capex.source,
            },
            revenue: resolved.revenue.value,
            staff_cost: resolved.staff_cost.value,
            rent: resolved.rent.value,
            opex: resolved.opex.value,
            ebitda: resolved.ebitda.ebitda,
            ebitda_margin: resolved.ebitda.margin,
            rent_load: rent_load(resolved.rent.value, resolved.revenue.value),
            capex: solved.capex,
            depreciation: solved.depreciation,
            interest_expense: solved.interest_expense,
            interest_income: solved.interest_income,
            net_result_before_zakat: solved.net_result_before_zakat,
            zakat: solved.zakat,
            net_result: solved.net_result,
            working_capital_change: solved.working_capital_change,
            operating_cash_flow: solved.operating_cash_flow,
            investing_cash_flow: solved.investing_cash_flow,
            financing_cash_flow: solved.financing_cash_flow,
            net_cash_flow: solved.net_cash_flow,
            theoretical_cash: solved.theoretical_cash,
            balancing: solved.balancing,
            cash: solved.cash,
            accounts_receivable: wc.accounts_receivable,
            fixed_assets: solved.fixed_assets,
            total_assets: solved.total_assets,
            accounts_payable: wc.accounts_payable,
            deferred_income: wc.deferred_income,
            accrued_expenses: wc.accrued_expenses,
            short_term_debt: solved.short_term_debt,
            total_liabilities: solved.total_liabilities,
            opening_equity,
            retained_earnings: solved.retained_earnings,
            total_equity: solved.total_equity,
        }
    }

    /// Assets − liabilities − equity.
    pub fn balance_difference(&self) -> Money {
        self.total_assets - self.total_liabilities - self.total_equity
    }
}

/// Complete projection: thirty yearly records, summary and solver diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionOutput {
    pub years: Vec<YearlyProjection>,
    pub summary: ProjectionSummary,
    pub solver: SolverMetadata,
}
