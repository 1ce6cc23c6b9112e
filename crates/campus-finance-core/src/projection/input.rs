use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::calculators::opex::{OpexAccount, OpexBasis};
use crate::calculators::rent::RentModel;
use crate::calculators::revenue::CurriculumPlan;
use crate::calculators::staff_cost::StaffCostPlan;
use crate::error::CampusFinanceError;
use crate::period::PeriodData;
use crate::solver::WorkingCapitalBalances;
use crate::types::{
    year_offset, Money, Rate, FIRST_TRANSITION_YEAR, FIRST_YEAR, LAST_HISTORICAL_YEAR,
    LAST_TRANSITION_YEAR,
};
use crate::CampusFinanceResult;

pub const DEFAULT_DEPRECIATION_RATE: Rate = dec!(0.10);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSettings {
    pub cpi_rate: Rate,
    pub discount_rate: Rate,
    /// Overrides the settings provider's zakat rate when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zakat_rate: Option<Rate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapexItem {
    pub year: i32,
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Opening position at the start of 2023.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OpeningBalanceSheet {
    pub starting_cash: Money,
    /// Derived so the opening position balances when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_equity: Option<Money>,
    pub fixed_assets: Money,
    pub opening_debt: Money,
    /// Receivables and operating liabilities carried into 2023
    pub working_capital: WorkingCapitalBalances,
}

/// Everything the presentation layer supplies for one projection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionInput {
    pub curricula: Vec<CurriculumPlan>,
    /// Non-tuition revenue per calendar year
    #[serde(default)]
    pub other_revenue: BTreeMap<i32, Money>,
    pub rent_model: RentModel,
    pub staff_costs: StaffCostPlan,
    #[serde(default)]
    pub capex: Vec<CapexItem>,
    #[serde(default)]
    pub opex: Vec<OpexAccount>,
    pub admin: AdminSettings,
    /// First year of the reporting range (summary and NPV)
    pub start_year: i32,
    /// Last year of the reporting range, inclusive
    pub end_year: i32,
    /// Plan version used to fetch stored period data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    /// Inline period data; takes precedence over the data source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_data: Option<PeriodData>,
    #[serde(default)]
    pub balance_sheet: OpeningBalanceSheet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depreciation_rate: Option<Rate>,
}

impl ProjectionInput {
    pub fn other_revenue_in(&self, year: i32) -> Money {
        self.other_revenue.get(&year).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn capex_in(&self, year: i32) -> Money {
        self.capex
            .iter()
            .filter(|item| item.year == year)
            .map(|item| item.amount)
            .sum()
    }

    pub fn depreciation_rate(&self) -> Rate {
        self.depreciation_rate.unwrap_or(DEFAULT_DEPRECIATION_RATE)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate_input(input: &ProjectionInput) -> CampusFinanceResult<()> {
    if input.curricula.is_empty() {
        return Err(CampusFinanceError::EmptyCurriculum);
    }

    validate_year("start_year", input.start_year)?;
    validate_year("end_year", input.end_year)?;
    if input.start_year > input.end_year {
        return Err(CampusFinanceError::InvalidYearRange {
            start_year: input.start_year,
            end_year: input.end_year,
        });
    }

    for plan in &input.curricula {
        validate_non_negative(&format!("curricula[{}].base_tuition", plan.name), plan.base_tuition)?;
        validate_frequency(&format!("curricula[{}].cpi_frequency", plan.name), plan.cpi_frequency)?;
    }

    for (year, amount) in &input.other_revenue {
        validate_year("other_revenue.year", *year)?;
        validate_non_negative(&format!("other_revenue[{year}]"), *amount)?;
    }

    validate_non_negative("staff_costs.base_cost", input.staff_costs.base_cost)?;
    validate_frequency("staff_costs.cpi_frequency", input.staff_costs.cpi_frequency)?;

    validate_rent_model(&input.rent_model)?;

    for item in &input.capex {
        validate_year("capex.year", item.year)?;
        validate_non_negative(&format!("capex[{}]", item.year), item.amount)?;
    }

    for account in &input.opex {
        let value = match &account.basis {
            OpexBasis::Fixed { amount } => *amount,
            OpexBasis::PercentOfRevenue { percent } => *percent,
        };
        validate_non_negative(&format!("opex[{}]", account.name), value)?;
    }

    if input.admin.discount_rate <= dec!(-1) {
        return Err(CampusFinanceError::InvalidInput {
            field: "admin.discount_rate".into(),
            reason: "Discount rate must be greater than -100%".into(),
        });
    }
    if input.admin.cpi_rate <= dec!(-1) {
        return Err(CampusFinanceError::InvalidInput {
            field: "admin.cpi_rate".into(),
            reason: "CPI rate must be greater than -100%".into(),
        });
    }
    if let Some(zakat) = input.admin.zakat_rate {
        validate_non_negative("admin.zakat_rate", zakat)?;
    }

    let bs = &input.balance_sheet;
    validate_non_negative("balance_sheet.starting_cash", bs.starting_cash)?;
    validate_non_negative("balance_sheet.fixed_assets", bs.fixed_assets)?;
    validate_non_negative("balance_sheet.opening_debt", bs.opening_debt)?;

    if let Some(rate) = input.depreciation_rate {
        validate_non_negative("depreciation_rate", rate)?;
        if rate > Decimal::ONE {
            return Err(CampusFinanceError::InvalidInput {
                field: "depreciation_rate".into(),
                reason: format!("Rate must be between 0 and 1, got {rate}"),
            });
        }
    }

    if let Some(data) = &input.period_data {
        validate_period_data(data)?;
    }

    Ok(())
}

/// Period records must sit in their own window and carry no negative amounts.
pub fn validate_period_data(data: &PeriodData) -> CampusFinanceResult<()> {
    for actual in &data.historical {
        if !(FIRST_YEAR..=LAST_HISTORICAL_YEAR).contains(&actual.year) {
            return Err(CampusFinanceError::InvalidInput {
                field: "historical.year".into(),
                reason: format!(
                    "Historical actuals must fall in {FIRST_YEAR}–{LAST_HISTORICAL_YEAR}, got {}",
                    actual.year
                ),
            });
        }
        for (field, value) in [
            ("revenue", actual.revenue),
            ("staff_costs", actual.staff_costs),
            ("rent", actual.rent),
            ("opex", actual.opex),
            ("capex", actual.capex),
        ] {
            if let Some(v) = value {
                validate_non_negative(&format!("historical[{}].{field}", actual.year), v)?;
            }
        }
    }

    for record in &data.transition {
        if !(FIRST_TRANSITION_YEAR..=LAST_TRANSITION_YEAR).contains(&record.year) {
            return Err(CampusFinanceError::InvalidInput {
                field: "transition.year".into(),
                reason: format!(
                    "Transition records must fall in {FIRST_TRANSITION_YEAR}–{LAST_TRANSITION_YEAR}, got {}",
                    record.year
                ),
            });
        }
        for (field, value) in [
            ("average_tuition", record.average_tuition),
            ("other_revenue", record.other_revenue),
        ] {
            if let Some(v) = value {
                validate_non_negative(&format!("transition[{}].{field}", record.year), v)?;
            }
        }
    }

    if let Some(rent) = data.fallbacks.manual_rent {
        validate_non_negative("fallbacks.manual_rent", rent)?;
    }
    Ok(())
}

fn validate_rent_model(model: &RentModel) -> CampusFinanceResult<()> {
    match model {
        RentModel::FixedEscalation {
            base_rent,
            escalation_rate,
            frequency,
        } => {
            validate_non_negative("rent_model.base_rent", *base_rent)?;
            validate_non_negative("rent_model.escalation_rate", *escalation_rate)?;
            validate_frequency("rent_model.frequency", *frequency)
        }
        RentModel::RevenueShare {
            share_pct,
            minimum_rent,
        } => {
            validate_non_negative("rent_model.share_pct", *share_pct)?;
            if let Some(floor) = minimum_rent {
                validate_non_negative("rent_model.minimum_rent", *floor)?;
            }
            Ok(())
        }
        RentModel::PartnerModel {
            land_size,
            land_price_per_sqm,
            bua_size,
            construction_cost_per_sqm,
            yield_base,
            escalation,
        } => {
            validate_non_negative("rent_model.land_size", *land_size)?;
            validate_non_negative("rent_model.land_price_per_sqm", *land_price_per_sqm)?;
            validate_non_negative("rent_model.bua_size", *bua_size)?;
            validate_non_negative(
                "rent_model.construction_cost_per_sqm",
                *construction_cost_per_sqm,
            )?;
            validate_non_negative("rent_model.yield_base", *yield_base)?;
            if let Some(esc) = escalation {
                validate_non_negative("rent_model.escalation.rate", esc.rate)?;
                validate_frequency("rent_model.escalation.frequency", esc.frequency)?;
            }
            Ok(())
        }
    }
}

fn validate_year(field: &str, year: i32) -> CampusFinanceResult<()> {
    if year_offset(year).is_none() {
        return Err(CampusFinanceError::YearOutOfRange {
            field: field.into(),
            year,
        });
    }
    Ok(())
}

fn validate_non_negative(field: &str, value: Decimal) -> CampusFinanceResult<()> {
    if value < Decimal::ZERO {
        return Err(CampusFinanceError::NegativeValue {
            field: field.into(),
            value,
        });
    }
    Ok(())
}

fn validate_frequency(field: &str, frequency: u32) -> CampusFinanceResult<()> {
    if frequency == 0 {
        return Err(CampusFinanceError::InvalidInput {
            field: field.into(),
            reason: "Frequency must be at least 1 year".into(),
        });
    }
    Ok(())
}
