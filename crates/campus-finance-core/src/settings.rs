//! Financial settings and the capabilities that supply them.
//!
//! Callers pick a [`SettingsProvider`]; the projection engine falls back to
//! [`DefaultSettings`] when the chosen provider fails.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::error::CampusFinanceError;
use crate::types::{Money, Rate};
use crate::CampusFinanceResult;

pub const DEFAULT_ZAKAT_RATE: Rate = dec!(0.025);
pub const DEFAULT_DEBT_INTEREST_RATE: Rate = dec!(0.05);
pub const DEFAULT_DEPOSIT_INTEREST_RATE: Rate = dec!(0.02);
pub const DEFAULT_MINIMUM_CASH_BALANCE: Money = dec!(1000000);

/// Day counts and factors that size the working-capital balances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkingCapitalSettings {
    /// AR = revenue / 365 × days
    pub ar_collection_days: Decimal,
    /// AP = staff costs / 365 × days
    pub ap_payment_days: Decimal,
    /// Deferred income = revenue × factor
    pub deferred_income_factor: Rate,
    /// Accrued expenses = staff costs × days / 365
    pub accrued_expense_days: Decimal,
}

impl Default for WorkingCapitalSettings {
    fn default() -> Self {
        Self {
            ar_collection_days: dec!(15),
            ap_payment_days: dec!(30),
            deferred_income_factor: dec!(0.25),
            accrued_expense_days: dec!(30),
        }
    }
}

/// Rates and policy settings the financing layer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialSettings {
    pub zakat_rate: Rate,
    pub debt_interest_rate: Rate,
    pub bank_deposit_interest_rate: Rate,
    pub minimum_cash_balance: Money,
    pub working_capital: WorkingCapitalSettings,
}

impl Default for FinancialSettings {
    fn default() -> Self {
        Self {
            zakat_rate: DEFAULT_ZAKAT_RATE,
            debt_interest_rate: DEFAULT_DEBT_INTEREST_RATE,
            bank_deposit_interest_rate: DEFAULT_DEPOSIT_INTEREST_RATE,
            minimum_cash_balance: DEFAULT_MINIMUM_CASH_BALANCE,
            working_capital: WorkingCapitalSettings::default(),
        }
    }
}

/// Source of financial settings.
pub trait SettingsProvider {
    fn financial_settings(&self) -> CampusFinanceResult<FinancialSettings>;

    /// Short name used in log lines and warnings.
    fn name(&self) -> &str;
}

/// Always answers with the documented defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSettings;

impl SettingsProvider for DefaultSettings {
    fn financial_settings(&self) -> CampusFinanceResult<FinancialSettings> {
        Ok(FinancialSettings::default())
    }

    fn name(&self) -> &str {
        "defaults"
    }
}

/// Settings handed over by the caller, e.g. already fetched by an API layer.
#[derive(Debug, Clone)]
pub struct StaticSettings(pub FinancialSettings);

impl SettingsProvider for StaticSettings {
    fn financial_settings(&self) -> CampusFinanceResult<FinancialSettings> {
        Ok(self.0.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Settings stored as a JSON document outside the process.
#[derive(Debug, Clone)]
pub struct JsonSettingsFile {
    path: PathBuf,
}

impl JsonSettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SettingsProvider for JsonSettingsFile {
    fn financial_settings(&self) -> CampusFinanceResult<FinancialSettings> {
        let contents = fs::read_to_string(&self.path).map_err(|e| {
            CampusFinanceError::SettingsUnavailable(format!(
                "Failed to read '{}': {e}",
                self.path.display()
            ))
        })?;
        let settings: FinancialSettings = serde_json::from_str(&contents).map_err(|e| {
            CampusFinanceError::SettingsUnavailable(format!(
                "Failed to parse '{}': {e}",
                self.path.display()
            ))
        })?;
        validate_settings(&settings)?;
        Ok(settings)
    }

    fn name(&self) -> &str {
        "json-file"
    }
}

/// Reject settings a solve could not use: negative rates, day counts or cash floors.
pub fn validate_settings(settings: &FinancialSettings) -> CampusFinanceResult<()> {
    let wc = &settings.working_capital;
    let checks = [
        ("zakat_rate", settings.zakat_rate),
        ("debt_interest_rate", settings.debt_interest_rate),
        ("bank_deposit_interest_rate", settings.bank_deposit_interest_rate),
        ("minimum_cash_balance", settings.minimum_cash_balance),
        ("working_capital.ar_collection_days", wc.ar_collection_days),
        ("working_capital.ap_payment_days", wc.ap_payment_days),
        ("working_capital.deferred_income_factor", wc.deferred_income_factor),
        ("working_capital.accrued_expense_days", wc.accrued_expense_days),
    ];
    for (field, value) in checks {
        if value < Decimal::ZERO {
            return Err(CampusFinanceError::NegativeValue {
                field: field.into(),
                value,
            });
        }
    }
    Ok(())
}

/// Ask `provider` for settings, degrading to defaults on failure or when
/// the returned values are invalid.
///
/// Returns the settings plus a warning describing the fallback, if one happened.
pub fn load_or_default(provider: &dyn SettingsProvider) -> (FinancialSettings, Option<String>) {
    let loaded = provider
        .financial_settings()
        .and_then(|settings| validate_settings(&settings).map(|_| settings));
    match loaded {
        Ok(settings) => (settings, None),
        Err(e) => {
            let warning = format!(
                "Settings provider '{}' failed ({}); using default financial settings",
                provider.name(),
                e
            );
            log::warn!("{warning}");
            (FinancialSettings::default(), Some(warning))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unreachable;

    impl SettingsProvider for Unreachable {
        fn financial_settings(&self) -> CampusFinanceResult<FinancialSettings> {
            Err(CampusFinanceError::SettingsUnavailable("connection refused".into()))
        }

        fn name(&self) -> &str {
            "unreachable"
        }
    }

    #[test]
    fn test_documented_defaults() {
        let s = FinancialSettings::default();
        assert_eq!(s.zakat_rate, dec!(0.025));
        assert_eq!(s.debt_interest_rate, dec!(0.05));
        assert_eq!(s.bank_deposit_interest_rate, dec!(0.02));
        assert_eq!(s.minimum_cash_balance, dec!(1000000));
    }

    #[test]
    fn test_failed_provider_falls_back() {
        let (settings, warning) = load_or_default(&Unreachable);
        assert_eq!(settings, FinancialSettings::default());
        let warning = warning.unwrap();
        assert!(warning.contains("unreachable"));
        assert!(warning.contains("connection refused"));
    }

    #[test]
    fn test_static_provider_passes_through() {
        let mut custom = FinancialSettings::default();
        custom.minimum_cash_balance = dec!(2500000);
        let (settings, warning) = load_or_default(&StaticSettings(custom.clone()));
        assert_eq!(settings, custom);
        assert!(warning.is_none());
    }

    #[test]
    fn test_invalid_static_settings_fall_back() {
        let mut bad = FinancialSettings::default();
        bad.debt_interest_rate = dec!(-0.01);
        let (settings, warning) = load_or_default(&StaticSettings(bad));
        assert_eq!(settings, FinancialSettings::default());
        assert!(warning.unwrap().contains("static"));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let s: FinancialSettings =
            serde_json::from_str(r#"{"debt_interest_rate":"0.07"}"#).unwrap();
        assert_eq!(s.debt_interest_rate, dec!(0.07));
        assert_eq!(s.zakat_rate, DEFAULT_ZAKAT_RATE);
        assert_eq!(s.working_capital, WorkingCapitalSettings::default());
    }

    #[test]
    fn test_missing_file_is_settings_unavailable() {
        let provider = JsonSettingsFile::new("/nonexistent/campus/settings.json");
        let err = provider.financial_settings().unwrap_err();
        assert_eq!(err.code(), "SETTINGS_UNAVAILABLE");
    }

    #[test]
    fn test_negative_setting_rejected() {
        let mut s = FinancialSettings::default();
        s.working_capital.ap_payment_days = dec!(-5);
        match validate_settings(&s).unwrap_err() {
            CampusFinanceError::NegativeValue { field, .. } => {
                assert_eq!(field, "working_capital.ap_payment_days")
            }
            e => panic!("Expected NegativeValue, got {e:?}"),
        }
    }
}
