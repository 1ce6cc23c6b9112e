use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::growth::stepped_value;
use crate::types::{Money, Rate, FIRST_DYNAMIC_YEAR};
use crate::CampusFinanceResult;

pub(crate) fn default_frequency() -> u32 {
    1
}

pub(crate) fn default_base_year() -> i32 {
    FIRST_DYNAMIC_YEAR
}

/// One curriculum offered by the campus (e.g. "British", "IB").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurriculumPlan {
    pub name: String,
    /// Seat capacity of the curriculum
    pub capacity: u32,
    /// Annual tuition per student in the growth base year
    pub base_tuition: Money,
    /// Years between CPI steps
    #[serde(default = "default_frequency")]
    pub cpi_frequency: u32,
    /// Year the base tuition applies to
    #[serde(default = "default_base_year")]
    pub base_year: i32,
    /// Students enrolled per calendar year; missing years count as zero
    #[serde(default)]
    pub enrollment: BTreeMap<i32, u32>,
}

impl CurriculumPlan {
    pub fn students(&self, year: i32) -> u32 {
        self.enrollment.get(&year).copied().unwrap_or(0)
    }

    pub fn tuition(&self, cpi_rate: Rate, year: i32) -> CampusFinanceResult<Money> {
        stepped_value(
            self.base_tuition,
            cpi_rate,
            self.cpi_frequency,
            self.base_year,
            year,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurriculumRevenue {
    pub name: String,
    pub students: u32,
    pub tuition: Money,
    pub revenue: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueBreakdown {
    pub year: i32,
    pub curricula: Vec<CurriculumRevenue>,
    pub tuition_revenue: Money,
    pub other_revenue: Money,
    pub total_revenue: Money,
}

/// Tuition × enrollment per curriculum, summed, plus other revenue.
pub fn calculate_revenue(
    plans: &[CurriculumPlan],
    cpi_rate: Rate,
    other_revenue: Money,
    year: i32,
) -> CampusFinanceResult<RevenueBreakdown> {
    let mut curricula = Vec::with_capacity(plans.len());
    let mut tuition_revenue = Decimal::ZERO;

    for plan in plans {
        let students = plan.students(year);
        let tuition = plan.tuition(cpi_rate, year)?;
        let revenue = tuition * Decimal::from(students);
        tuition_revenue += revenue;
        curricula.push(CurriculumRevenue {
            name: plan.name.clone(),
            students,
            tuition,
            revenue,
        });
    }

    Ok(RevenueBreakdown {
        year,
        curricula,
        tuition_revenue,
        other_revenue,
        total_revenue: tuition_revenue + other_revenue,
    })
}

/// Total planned students across all curricula.
pub fn total_students(plans: &[CurriculumPlan], year: i32) -> u32 {
    plans.iter().map(|p| p.students(year)).sum()
}
