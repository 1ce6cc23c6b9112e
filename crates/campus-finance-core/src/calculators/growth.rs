use rust_decimal::prelude::MathematicalOps;
use rust_decimal::Decimal;

use crate::error::CampusFinanceError;
use crate::types::{Money, Rate};
use crate::CampusFinanceResult;

/// Number of completed escalation steps between `base_year` and `year`.
///
/// Escalation is a step function: the value only moves on frequency
/// boundaries. Years before the base year take no steps.
pub fn escalation_steps(base_year: i32, frequency: u32, year: i32) -> CampusFinanceResult<i64> {
    if frequency == 0 {
        return Err(CampusFinanceError::InvalidInput {
            field: "frequency".into(),
            reason: "Escalation frequency must be at least 1 year".into(),
        });
    }
    if year <= base_year {
        return Ok(0);
    }
    Ok((i64::from(year) - i64::from(base_year)) / i64::from(frequency))
}

/// Multiplier `(1 + rate)^⌊(year − base_year) / frequency⌋`.
pub fn stepped_growth_factor(
    rate: Rate,
    frequency: u32,
    base_year: i32,
    year: i32,
) -> CampusFinanceResult<Decimal> {
    let steps = escalation_steps(base_year, frequency, year)?;
    if steps == 0 {
        return Ok(Decimal::ONE);
    }
    (Decimal::ONE + rate)
        .checked_powi(steps)
        .ok_or_else(|| CampusFinanceError::InvalidInput {
            field: "rate".into(),
            reason: format!("Escalation overflows after {steps} steps at rate {rate}"),
        })
}

/// Escalated value of `base` in `year` under stepped CPI growth.
pub fn stepped_value(
    base: Money,
    rate: Rate,
    frequency: u32,
    base_year: i32,
    year: i32,
) -> CampusFinanceResult<Money> {
    Ok(base * stepped_growth_factor(rate, frequency, base_year, year)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_annual_frequency_compounds_every_year() {
        let v = stepped_value(dec!(1000), dec!(0.10), 1, 2028, 2030).unwrap();
        assert_eq!(v, dec!(1210));
    }

    #[test]
    fn test_step_only_on_frequency_boundary() {
        // frequency 3: 2028..2030 flat, 2031 first step
        for year in 2028..=2030 {
            let v = stepped_value(dec!(1000), dec!(0.05), 3, 2028, year).unwrap();
            assert_eq!(v, dec!(1000), "year {year} should not be escalated");
        }
        let v = stepped_value(dec!(1000), dec!(0.05), 3, 2028, 2031).unwrap();
        assert_eq!(v, dec!(1050));
        let v = stepped_value(dec!(1000), dec!(0.05), 3, 2028, 2034).unwrap();
        assert_eq!(v, dec!(1102.5));
    }

    #[test]
    fn test_years_before_base_are_flat() {
        let v = stepped_value(dec!(500), dec!(0.03), 2, 2028, 2024).unwrap();
        assert_eq!(v, dec!(500));
    }

    #[test]
    fn test_zero_frequency_rejected() {
        let result = stepped_value(dec!(500), dec!(0.03), 0, 2028, 2030);
        match result.unwrap_err() {
            CampusFinanceError::InvalidInput { field, .. } => assert_eq!(field, "frequency"),
            e => panic!("Expected InvalidInput, got {e:?}"),
        }
    }

    #[test]
    fn test_frequency_beyond_i32_takes_no_steps() {
        assert_eq!(escalation_steps(2028, u32::MAX, 2052).unwrap(), 0);
        let v = stepped_value(dec!(500), dec!(0.03), u32::MAX, 2028, 2052).unwrap();
        assert_eq!(v, dec!(500));
    }

    #[test]
    fn test_zero_rate_is_identity() {
        let v = stepped_value(dec!(750), Decimal::ZERO, 1, 2028, 2052).unwrap();
        assert_eq!(v, dec!(750));
    }
}
