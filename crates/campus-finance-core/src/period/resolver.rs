use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{FieldSource, HistoricalActuals, PeriodData, TransitionYear};
use crate::calculators::ebitda::{calculate_ebitda, EbitdaResult};
use crate::calculators::opex::calculate_opex;
use crate::calculators::rent::calculate_rent;
use crate::calculators::revenue::{calculate_revenue, total_students, CurriculumPlan};
use crate::calculators::staff_cost::calculate_staff_cost;
use crate::projection::input::ProjectionInput;
use crate::types::{safe_divide, year_at, Money, PeriodKind, LAST_HISTORICAL_YEAR, PROJECTION_YEARS};
use crate::CampusFinanceResult;

/// A value together with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolved {
    pub value: Money,
    pub source: FieldSource,
}

impl Resolved {
    fn new(value: Money, source: FieldSource) -> Self {
        Self { value, source }
    }

    fn calculated(value: Money) -> Self {
        Self::new(value, FieldSource::Calculated)
    }
}

/// Pre-financing figures for one year after period resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedYear {
    pub year: i32,
    pub period: PeriodKind,
    pub students: u32,
    pub revenue: Resolved,
    pub staff_cost: Resolved,
    pub rent: Resolved,
    pub opex: Resolved,
    pub capex: Resolved,
    pub ebitda: EbitdaResult,
}

/// Picks, per year and per field, the authoritative value: recorded actual,
/// transition override, transition fallback, or calculation.
pub struct PeriodResolver<'a> {
    input: &'a ProjectionInput,
    data: &'a PeriodData,
}

impl<'a> PeriodResolver<'a> {
    pub fn new(input: &'a ProjectionInput, data: &'a PeriodData) -> Self {
        Self { input, data }
    }

    /// Resolve all thirty years, 2023 first.
    pub fn resolve_all(&self) -> CampusFinanceResult<Vec<ResolvedYear>> {
        (0..PROJECTION_YEARS)
            .map(|offset| self.resolve_year(year_at(offset)))
            .collect()
    }

    pub fn resolve_year(&self, year: i32) -> CampusFinanceResult<ResolvedYear> {
        let (revenue, students) = self.revenue(year)?;
        let staff_cost = self.staff_cost(year)?;
        let rent = self.rent(year, revenue.value)?;
        let opex = self.opex(year, revenue.value);
        let capex = self.capex(year);
        let ebitda = calculate_ebitda(revenue.value, staff_cost.value, rent.value, opex.value);

        Ok(ResolvedYear {
            year,
            period: PeriodKind::of_year(year),
            students,
            revenue,
            staff_cost,
            rent,
            opex,
            capex,
            ebitda,
        })
    }

    fn historical(
        &self,
        year: i32,
        pick: impl Fn(&HistoricalActuals) -> Option<Money>,
    ) -> Option<Resolved> {
        if PeriodKind::of_year(year) != PeriodKind::Historical {
            return None;
        }
        self.data
            .actuals(year)
            .and_then(pick)
            .map(|v| Resolved::new(v, FieldSource::Historical))
    }

    fn transition(&self, year: i32) -> Option<&TransitionYear> {
        if PeriodKind::of_year(year) != PeriodKind::Transition {
            return None;
        }
        self.data.transition_year(year)
    }

    fn in_transition(year: i32) -> bool {
        PeriodKind::of_year(year) == PeriodKind::Transition
    }

    fn revenue(&self, year: i32) -> CampusFinanceResult<(Resolved, u32)> {
        let plans = &self.input.curricula;
        let planned = calculate_revenue(
            plans,
            self.input.admin.cpi_rate,
            self.input.other_revenue_in(year),
            year,
        )?;
        let planned_students = total_students(plans, year);

        if let Some(actual) = self.historical(year, |a| a.revenue) {
            return Ok((actual, planned_students));
        }

        if Self::in_transition(year) {
            let record = self.transition(year);
            let other = record
                .and_then(|r| r.other_revenue)
                .unwrap_or(planned.other_revenue);

            if let Some((average_tuition, students)) =
                record.and_then(|r| r.average_tuition.map(|t| (t, r.target_enrollment)))
            {
                let students = students.unwrap_or(planned_students);
                let value = average_tuition * Decimal::from(students) + other;
                return Ok((
                    Resolved::new(value, FieldSource::TransitionExplicit),
                    students,
                ));
            }

            let target = record.and_then(|r| r.target_enrollment);
            let cap = self
                .data
                .fallbacks
                .capacity_cap
                .unwrap_or_else(|| total_capacity(plans));
            let desired = target.unwrap_or(planned_students);
            let effective = desired.min(cap);
            if target.is_some() || effective < planned_students {
                let factor = safe_divide(Decimal::from(effective), Decimal::from(planned_students));
                let students = if planned_students == 0 { 0 } else { effective };
                let source = if target.is_some() {
                    FieldSource::TransitionExplicit
                } else {
                    FieldSource::TransitionFallback
                };
                return Ok((
                    Resolved::new(planned.tuition_revenue * factor + other, source),
                    students,
                ));
            }
        }

        Ok((Resolved::calculated(planned.total_revenue), planned_students))
    }

    fn staff_cost(&self, year: i32) -> CampusFinanceResult<Resolved> {
        if let Some(actual) = self.historical(year, |a| a.staff_costs) {
            return Ok(actual);
        }
        if let Some(growth) = self.transition(year).and_then(|r| r.staff_cost_growth) {
            let base = self.staff_cost(LAST_HISTORICAL_YEAR)?.value;
            return Ok(Resolved::new(
                base * (Decimal::ONE + growth),
                FieldSource::TransitionExplicit,
            ));
        }
        let value = calculate_staff_cost(&self.input.staff_costs, self.input.admin.cpi_rate, year)?;
        Ok(Resolved::calculated(value))
    }

    fn rent(&self, year: i32, revenue: Money) -> CampusFinanceResult<Resolved> {
        if let Some(actual) = self.historical(year, |a| a.rent) {
            return Ok(actual);
        }
        if Self::in_transition(year) {
            if let Some(growth) = self.transition(year).and_then(|r| r.rent_growth) {
                let base_revenue = self.revenue(LAST_HISTORICAL_YEAR)?.0.value;
                let base = self.rent(LAST_HISTORICAL_YEAR, base_revenue)?.value;
                return Ok(Resolved::new(
                    base * (Decimal::ONE + growth),
                    FieldSource::TransitionExplicit,
                ));
            }
            if let Some(manual) = self.data.fallbacks.manual_rent {
                return Ok(Resolved::new(manual, FieldSource::TransitionFallback));
            }
        }
        let value = calculate_rent(&self.input.rent_model, revenue, year)?;
        Ok(Resolved::calculated(value))
    }

    fn opex(&self, year: i32, revenue: Money) -> Resolved {
        self.historical(year, |a| a.opex)
            .unwrap_or_else(|| Resolved::calculated(calculate_opex(&self.input.opex, revenue).total))
    }

    fn capex(&self, year: i32) -> Resolved {
        self.historical(year, |a| a.capex)
            .unwrap_or_else(|| Resolved::calculated(self.input.capex_in(year)))
    }
}

/// Seats across every curriculum; the default transition enrollment cap.
fn total_capacity(plans: &[CurriculumPlan]) -> u32 {
    plans.iter().fold(0u32, |acc, p| acc.saturating_add(p.capacity))
}
