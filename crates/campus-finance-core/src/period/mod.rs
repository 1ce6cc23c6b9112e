//! Historical / transition / dynamic period handling.
//!
//! Every resolved figure carries a [`FieldSource`] so its provenance can be
//! audited year by year.

pub mod resolver;
pub mod source;

use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

pub use resolver::{PeriodResolver, Resolved, ResolvedYear};
pub use source::{InMemoryDataSource, JsonDataDirectory, NoDataSource, ProjectionDataSource};

/// Where a resolved number came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    /// Recorded actual, used verbatim
    Historical,
    /// Administrative transition override
    TransitionExplicit,
    /// Transition rule used because no override was given
    TransitionFallback,
    /// Computed by the per-year calculators
    Calculated,
}

/// Recorded actuals for one historical year. Missing fields are calculated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoricalActuals {
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_costs: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rent: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opex: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capex: Option<Money>,
}

/// Administrative overrides for one transition year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionYear {
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_enrollment: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_tuition: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_revenue: Option<Money>,
    /// Staff costs = last historical staff costs × (1 + growth)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_cost_growth: Option<Rate>,
    /// Rent = last historical rent × (1 + growth)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rent_growth: Option<Rate>,
}

/// Rules used for transition years without explicit overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionFallbacks {
    /// Seats available during transition; planned enrollment is scaled down
    /// proportionally to fit. Defaults to the summed curriculum capacity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_cap: Option<u32>,
    /// Flat rent charged in every transition year
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_rent: Option<Money>,
}

/// All period data for one plan version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodData {
    pub historical: Vec<HistoricalActuals>,
    pub transition: Vec<TransitionYear>,
    pub fallbacks: TransitionFallbacks,
}

impl PeriodData {
    pub fn is_empty(&self) -> bool {
        self.historical.is_empty()
            && self.transition.is_empty()
            && self.fallbacks == TransitionFallbacks::default()
    }

    pub fn actuals(&self, year: i32) -> Option<&HistoricalActuals> {
        self.historical.iter().find(|h| h.year == year)
    }

    pub fn transition_year(&self, year: i32) -> Option<&TransitionYear> {
        self.transition.iter().find(|t| t.year == year)
    }
}
