use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::growth::stepped_value;
use super::revenue::default_frequency;
use crate::types::{percent_of, Money, Percent, Rate, FIRST_DYNAMIC_YEAR};
use crate::CampusFinanceResult;

/// Stepped escalation applied from 2028 onwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Escalation {
    pub rate: Rate,
    #[serde(default = "default_frequency")]
    pub frequency: u32,
}

/// The three mutually exclusive ways rent can be set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum RentModel {
    /// base × (1 + rate)^⌊(year − 2028) / frequency⌋
    FixedEscalation {
        base_rent: Money,
        escalation_rate: Rate,
        #[serde(default = "default_frequency")]
        frequency: u32,
    },
    /// revenue × share, floored at `minimum_rent` when one is given
    RevenueShare {
        share_pct: Rate,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        minimum_rent: Option<Money>,
    },
    /// (land × land price + built-up area × build cost) × yield
    PartnerModel {
        land_size: Decimal,
        land_price_per_sqm: Money,
        bua_size: Decimal,
        construction_cost_per_sqm: Money,
        yield_base: Rate,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        escalation: Option<Escalation>,
    },
}

/// Partner-model investment base (land plus construction).
pub fn partner_investment(
    land_size: Decimal,
    land_price_per_sqm: Money,
    bua_size: Decimal,
    construction_cost_per_sqm: Money,
) -> Money {
    land_size * land_price_per_sqm + bua_size * construction_cost_per_sqm
}

/// Rent for `year`. `revenue` is only read by the revenue-share model.
pub fn calculate_rent(model: &RentModel, revenue: Money, year: i32) -> CampusFinanceResult<Money> {
    match model {
        RentModel::FixedEscalation {
            base_rent,
            escalation_rate,
            frequency,
        } => stepped_value(
            *base_rent,
            *escalation_rate,
            *frequency,
            FIRST_DYNAMIC_YEAR,
            year,
        ),
        RentModel::RevenueShare {
            share_pct,
            minimum_rent,
        } => {
            let share = revenue * share_pct;
            Ok(match minimum_rent {
                Some(floor) => share.max(*floor),
                None => share,
            })
        }
        RentModel::PartnerModel {
            land_size,
            land_price_per_sqm,
            bua_size,
            construction_cost_per_sqm,
            yield_base,
            escalation,
        } => {
            let base = partner_investment(
                *land_size,
                *land_price_per_sqm,
                *bua_size,
                *construction_cost_per_sqm,
            ) * yield_base;
            match escalation {
                Some(esc) => {
                    stepped_value(base, esc.rate, esc.frequency, FIRST_DYNAMIC_YEAR, year)
                }
                None => Ok(base),
            }
        }
    }
}

/// Rent as a percentage of revenue; 0 when there is no revenue.
pub fn rent_load(rent: Money, revenue: Money) -> Percent {
    percent_of(rent, revenue)
}
