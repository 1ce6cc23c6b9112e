use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CampusFinanceError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid length for {field}: expected {expected} yearly values, got {actual}")]
    ArrayLength {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid year range: start year {start_year} is after end year {end_year}")]
    InvalidYearRange { start_year: i32, end_year: i32 },

    #[error("Year out of range: {field} = {year} (projection covers 2023–2052)")]
    YearOutOfRange { field: String, year: i32 },

    #[error("Negative value: {field} = {value}")]
    NegativeValue { field: String, value: Decimal },

    #[error("At least one curriculum plan is required")]
    EmptyCurriculum,

    #[error("Financial settings unavailable: {0}")]
    SettingsUnavailable(String),

    #[error("Projection data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CampusFinanceError {
    /// Stable machine-readable code for callers that branch on the failure kind.
    pub fn code(&self) -> &'static str {
        match self {
            CampusFinanceError::InvalidInput { .. } => "INVALID_INPUT",
            CampusFinanceError::ArrayLength { .. } => "ARRAY_LENGTH_MISMATCH",
            CampusFinanceError::InvalidYearRange { .. } => "INVALID_YEAR_RANGE",
            CampusFinanceError::YearOutOfRange { .. } => "YEAR_OUT_OF_RANGE",
            CampusFinanceError::NegativeValue { .. } => "NEGATIVE_VALUE",
            CampusFinanceError::EmptyCurriculum => "EMPTY_CURRICULUM",
            CampusFinanceError::SettingsUnavailable(_) => "SETTINGS_UNAVAILABLE",
            CampusFinanceError::DataUnavailable(_) => "DATA_UNAVAILABLE",
            CampusFinanceError::SerializationError(_) => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for CampusFinanceError {
    fn from(e: serde_json::Error) -> Self {
        CampusFinanceError::SerializationError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_codes_are_distinct_per_kind() {
        let errors = vec![
            CampusFinanceError::InvalidInput {
                field: "x".into(),
                reason: "y".into(),
            },
            CampusFinanceError::ArrayLength {
                field: "revenue".into(),
                expected: 30,
                actual: 29,
            },
            CampusFinanceError::InvalidYearRange {
                start_year: 2030,
                end_year: 2025,
            },
            CampusFinanceError::YearOutOfRange {
                field: "start_year".into(),
                year: 2020,
            },
            CampusFinanceError::NegativeValue {
                field: "capex".into(),
                value: dec!(-1),
            },
            CampusFinanceError::EmptyCurriculum,
            CampusFinanceError::SettingsUnavailable("down".into()),
            CampusFinanceError::DataUnavailable("missing".into()),
            CampusFinanceError::SerializationError("bad".into()),
        ];
        let mut codes: Vec<&str> = errors.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_array_length_message_names_field_and_counts() {
        let err = CampusFinanceError::ArrayLength {
            field: "ebitda".into(),
            expected: 30,
            actual: 12,
        };
        let msg = err.to_string();
        assert!(msg.contains("ebitda"));
        assert!(msg.contains("30"));
        assert!(msg.contains("12"));
    }
}
