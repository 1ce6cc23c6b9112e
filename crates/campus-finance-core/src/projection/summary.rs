use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::output::YearlyProjection;
use crate::time_value::{npv_window, window_npv};
use crate::types::{safe_divide, Money, Percent, Rate};
use crate::CampusFinanceResult;

/// Totals and averages over the requested year range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub start_year: i32,
    pub end_year: i32,
    pub total_revenue: Money,
    pub total_staff_cost: Money,
    pub total_rent: Money,
    pub total_opex: Money,
    pub total_ebitda: Money,
    pub total_capex: Money,
    pub total_net_cash_flow: Money,
    pub total_zakat: Money,
    pub total_interest_expense: Money,
    /// NPV of rent over the range clipped to 2028–2052
    pub npv_rent: Money,
    /// NPV of net cash flow over the range clipped to 2028–2052
    pub npv_cash_flow: Money,
    pub average_ebitda_margin: Percent,
    /// Mean rent load over the range clipped to 2028–2052
    pub average_rent_load: Percent,
    pub final_cash: Money,
    pub final_debt: Money,
    pub peak_debt: Money,
}

fn mean(values: impl Iterator<Item = Decimal>) -> Decimal {
    let (sum, n) = values.fold((Decimal::ZERO, 0u32), |(s, n), v| (s + v, n + 1));
    safe_divide(sum, Decimal::from(n))
}

pub fn build_summary(
    years: &[YearlyProjection],
    start_year: i32,
    end_year: i32,
    discount_rate: Rate,
) -> CampusFinanceResult<ProjectionSummary> {
    let in_range: Vec<&YearlyProjection> = years
        .iter()
        .filter(|y| (start_year..=end_year).contains(&y.year))
        .collect();
    let total = |f: fn(&YearlyProjection) -> Money| in_range.iter().map(|y| f(y)).sum::<Money>();

    let rent: Vec<Money> = years.iter().map(|y| y.rent).collect();
    let net_cash_flow: Vec<Money> = years.iter().map(|y| y.net_cash_flow).collect();

    let average_rent_load = match npv_window(start_year, end_year) {
        Some((from, to)) => mean(
            years
                .iter()
                .filter(|y| (from..=to).contains(&y.year))
                .map(|y| y.rent_load),
        ),
        None => Decimal::ZERO,
    };

    let last = in_range.last();

    Ok(ProjectionSummary {
        start_year,
        end_year,
        total_revenue: total(|y| y.revenue),
        total_staff_cost: total(|y| y.staff_cost),
        total_rent: total(|y| y.rent),
        total_opex: total(|y| y.opex),
        total_ebitda: total(|y| y.ebitda),
        total_capex: total(|y| y.capex),
        total_net_cash_flow: total(|y| y.net_cash_flow),
        total_zakat: total(|y| y.zakat),
        total_interest_expense: total(|y| y.interest_expense),
        npv_rent: window_npv(discount_rate, &rent, start_year, end_year)?,
        npv_cash_flow: window_npv(discount_rate, &net_cash_flow, start_year, end_year)?,
        average_ebitda_margin: mean(in_range.iter().map(|y| y.ebitda_margin)),
        average_rent_load,
        final_cash: last.map(|y| y.cash).unwrap_or_default(),
        final_debt: last.map(|y| y.short_term_debt).unwrap_or_default(),
        peak_debt: in_range
            .iter()
            .map(|y| y.short_term_debt)
            .max()
            .unwrap_or_default(),
    })
}
