use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Percentages expressed on a 0–100 scale (40 = 40%). Used for margins only.
pub type Percent = Decimal;

/// First projected calendar year.
pub const FIRST_YEAR: i32 = 2023;
/// Last projected calendar year.
pub const LAST_YEAR: i32 = 2052;
/// Number of projected years; every yearly array has exactly this length.
pub const PROJECTION_YEARS: usize = (LAST_YEAR - FIRST_YEAR + 1) as usize;

/// Last year of recorded actuals.
pub const LAST_HISTORICAL_YEAR: i32 = 2024;
/// First year of the transition window.
pub const FIRST_TRANSITION_YEAR: i32 = 2025;
/// Last year of the transition window.
pub const LAST_TRANSITION_YEAR: i32 = 2027;
/// First fully calculated year; also the base year of rent escalation and NPV windows.
pub const FIRST_DYNAMIC_YEAR: i32 = 2028;

pub(crate) const DAYS_IN_YEAR: Decimal = dec!(365);
pub(crate) const HUNDRED: Decimal = dec!(100);

/// Calendar year for a zero-based year offset.
pub fn year_at(offset: usize) -> i32 {
    FIRST_YEAR + offset as i32
}

/// Zero-based offset for a calendar year, `None` outside 2023–2052.
pub fn year_offset(year: i32) -> Option<usize> {
    if (FIRST_YEAR..=LAST_YEAR).contains(&year) {
        Some((year - FIRST_YEAR) as usize)
    } else {
        None
    }
}

/// Which of the three planning periods a year falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    Historical,
    Transition,
    Dynamic,
}

impl PeriodKind {
    pub fn of_year(year: i32) -> Self {
        if year <= LAST_HISTORICAL_YEAR {
            PeriodKind::Historical
        } else if year <= LAST_TRANSITION_YEAR {
            PeriodKind::Transition
        } else {
            PeriodKind::Dynamic
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// `numerator / denominator`, or zero when the denominator is zero.
pub fn safe_divide(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}

/// `numerator / denominator × 100`, zero when the denominator is zero.
pub fn percent_of(numerator: Decimal, denominator: Decimal) -> Percent {
    safe_divide(numerator, denominator) * HUNDRED
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thirty_projection_years() {
        assert_eq!(PROJECTION_YEARS, 30);
        assert_eq!(year_at(0), 2023);
        assert_eq!(year_at(PROJECTION_YEARS - 1), 2052);
    }

    #[test]
    fn test_year_offset_bounds() {
        assert_eq!(year_offset(2023), Some(0));
        assert_eq!(year_offset(2052), Some(29));
        assert_eq!(year_offset(2022), None);
        assert_eq!(year_offset(2053), None);
    }

    #[test]
    fn test_period_classification() {
        assert_eq!(PeriodKind::of_year(2023), PeriodKind::Historical);
        assert_eq!(PeriodKind::of_year(2024), PeriodKind::Historical);
        assert_eq!(PeriodKind::of_year(2025), PeriodKind::Transition);
        assert_eq!(PeriodKind::of_year(2027), PeriodKind::Transition);
        assert_eq!(PeriodKind::of_year(2028), PeriodKind::Dynamic);
        assert_eq!(PeriodKind::of_year(2052), PeriodKind::Dynamic);
    }

    #[test]
    fn test_percent_of_zero_denominator_is_zero() {
        assert_eq!(percent_of(dec!(10), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(percent_of(dec!(20), dec!(50)), dec!(40));
    }
}
