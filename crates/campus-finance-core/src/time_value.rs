use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::CampusFinanceError;
use crate::types::{year_offset, Money, Rate, FIRST_DYNAMIC_YEAR, LAST_YEAR};
use crate::CampusFinanceResult;

/// Earliest year any NPV window may include.
pub const NPV_WINDOW_START: i32 = FIRST_DYNAMIC_YEAR;
/// Latest year any NPV window may include.
pub const NPV_WINDOW_END: i32 = LAST_YEAR;

/// Net Present Value of end-of-period cash flows: the first flow is
/// discounted by one full period.
pub fn npv(rate: Rate, cash_flows: &[Money]) -> CampusFinanceResult<Money> {
    if rate <= dec!(-1) {
        return Err(CampusFinanceError::InvalidInput {
            field: "rate".into(),
            reason: "Discount rate must be greater than -100%".into(),
        });
    }

    let mut result = Decimal::ZERO;
    let one_plus_r = Decimal::ONE + rate;
    let mut discount = Decimal::ONE;

    for (t, cf) in cash_flows.iter().enumerate() {
        discount = discount
            .checked_mul(one_plus_r)
            .filter(|d| !d.is_zero())
            .ok_or_else(|| discount_out_of_range(t + 1))?;
        result = cf
            .checked_div(discount)
            .and_then(|pv| result.checked_add(pv))
            .ok_or_else(|| discount_out_of_range(t + 1))?;
    }

    Ok(result)
}

fn discount_out_of_range(period: usize) -> CampusFinanceError {
    CampusFinanceError::InvalidInput {
        field: "rate".into(),
        reason: format!("Discount factor out of range at period {period}"),
    }
}

/// Years an NPV over `[start_year, end_year]` actually covers, clipped to
/// 2028–2052. `None` when the intersection is empty.
pub fn npv_window(start_year: i32, end_year: i32) -> Option<(i32, i32)> {
    let from = start_year.max(NPV_WINDOW_START);
    let to = end_year.min(NPV_WINDOW_END);
    (from <= to).then_some((from, to))
}

/// NPV of a thirty-year series (2023 first) over the clipped window, with the
/// first window year discounted one period. Zero for an empty window.
pub fn window_npv(
    rate: Rate,
    yearly: &[Money],
    start_year: i32,
    end_year: i32,
) -> CampusFinanceResult<Money> {
    let Some((from, to)) = npv_window(start_year, end_year) else {
        return Ok(Decimal::ZERO);
    };
    let flows: Vec<Money> = (from..=to)
        .map(|year| {
            year_offset(year)
                .and_then(|i| yearly.get(i))
                .copied()
                .unwrap_or(Decimal::ZERO)
        })
        .collect();
    npv(rate, &flows)
}
