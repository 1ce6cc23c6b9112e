use rust_decimal::Decimal;
use std::time::Instant;

use super::input::{validate_input, validate_period_data, ProjectionInput};
use super::output::{ProjectionOutput, YearlyProjection};
use super::summary::build_summary;
use crate::period::{NoDataSource, PeriodData, PeriodResolver, ProjectionDataSource};
use crate::settings::{load_or_default, DefaultSettings, FinancialSettings, SettingsProvider};
use crate::solver::{solve, SolverParams};
use crate::types::{with_metadata, ComputationOutput, PeriodKind};
use crate::CampusFinanceResult;

const METHODOLOGY: &str = "Campus 30-year projection with circular interest / debt resolution";

/// Runs projections against an injected settings provider and data source.
pub struct ProjectionEngine {
    settings: Box<dyn SettingsProvider>,
    data: Box<dyn ProjectionDataSource>,
}

impl ProjectionEngine {
    pub fn new(
        settings: impl SettingsProvider + 'static,
        data: impl ProjectionDataSource + 'static,
    ) -> Self {
        Self::from_boxed(Box::new(settings), Box::new(data))
    }

    pub fn from_boxed(
        settings: Box<dyn SettingsProvider>,
        data: Box<dyn ProjectionDataSource>,
    ) -> Self {
        Self { settings, data }
    }

    /// Documented default settings and no stored period data.
    pub fn with_defaults() -> Self {
        Self::new(DefaultSettings, NoDataSource)
    }

    /// Fetch settings and period data, then run the projection.
    ///
    /// Neither collaborator failing aborts the run: settings fall back to the
    /// defaults and period data to none, each with a warning.
    pub fn project(
        &self,
        input: &ProjectionInput,
    ) -> CampusFinanceResult<ComputationOutput<ProjectionOutput>> {
        let mut warnings = Vec::new();

        let (settings, fallback) = load_or_default(self.settings.as_ref());
        warnings.extend(fallback);

        let period_data = match (&input.period_data, &input.version_id) {
            (Some(inline), _) => inline.clone(),
            (None, Some(version)) => self.fetch_period_data(version, &mut warnings)?,
            (None, None) => PeriodData::default(),
        };

        project_with(input, &settings, &period_data, warnings)
    }

    fn fetch_period_data(
        &self,
        version: &str,
        warnings: &mut Vec<String>,
    ) -> CampusFinanceResult<PeriodData> {
        match self.data.period_data(version) {
            Ok(data) => {
                validate_period_data(&data)?;
                if data.is_empty() {
                    log::info!("No period records for version '{version}'; every year is calculated");
                }
                Ok(data)
            }
            Err(e) => {
                let warning = format!(
                    "Data source '{}' failed for version '{version}' ({e}); projecting without historical or transition data",
                    self.data.name()
                );
                log::warn!("{warning}");
                warnings.push(warning);
                Ok(PeriodData::default())
            }
        }
    }
}

/// Run a projection with settings already in hand and only inline period data.
pub fn run_projection(
    input: &ProjectionInput,
    settings: &FinancialSettings,
) -> CampusFinanceResult<ComputationOutput<ProjectionOutput>> {
    let period_data = input.period_data.clone().unwrap_or_default();
    project_with(input, settings, &period_data, Vec::new())
}

fn project_with(
    input: &ProjectionInput,
    settings: &FinancialSettings,
    period_data: &PeriodData,
    mut warnings: Vec<String>,
) -> CampusFinanceResult<ComputationOutput<ProjectionOutput>> {
    let start = Instant::now();
    validate_input(input)?;

    let mut settings = settings.clone();
    if let Some(zakat) = input.admin.zakat_rate {
        settings.zakat_rate = zakat;
    }

    let resolved = PeriodResolver::new(input, period_data).resolve_all()?;

    for plan in &input.curricula {
        let over: Vec<(i32, u32)> = resolved
            .iter()
            .filter(|y| y.period == PeriodKind::Dynamic)
            .map(|y| (y.year, plan.students(y.year)))
            .filter(|&(_, students)| students > plan.capacity)
            .collect();
        if let Some(peak) = over.iter().map(|&(_, students)| students).max() {
            let years: Vec<String> = over.iter().map(|(year, _)| year.to_string()).collect();
            warnings.push(format!(
                "{} enrollment exceeds capacity {} (peak {}) in: {}",
                plan.name,
                plan.capacity,
                peak,
                years.join(", ")
            ));
        }
    }

    let bs = &input.balance_sheet;
    let mut params = SolverParams {
        revenue: resolved.iter().map(|y| y.revenue.value).collect(),
        ebitda: resolved.iter().map(|y| y.ebitda.ebitda).collect(),
        capex: resolved.iter().map(|y| y.capex.value).collect(),
        staff_costs: resolved.iter().map(|y| y.staff_cost.value).collect(),
        fixed_assets_opening: bs.fixed_assets,
        depreciation_rate: input.depreciation_rate(),
        starting_cash: bs.starting_cash,
        opening_equity: bs.opening_equity.unwrap_or(Decimal::ZERO),
        opening_debt: bs.opening_debt,
        opening_working_capital: bs.working_capital,
        settings,
    };
    match bs.opening_equity {
        None => params.opening_equity = params.balancing_equity(),
        Some(_) => {
            let imbalance = params.opening_imbalance();
            if !imbalance.is_zero() {
                let warning = format!(
                    "Opening balance sheet is out of balance by {imbalance}; every year carries this difference"
                );
                log::warn!("{warning}");
                warnings.push(warning);
            }
        }
    }

    let solved = solve(&params)?;
    if solved.metadata.fallback_used {
        warnings.push(format!(
            "Solver did not converge after {} iterations (max error {} in {}); last iteration returned",
            solved.metadata.iterations,
            solved.metadata.max_error,
            solved.metadata.max_error_year.unwrap_or_default()
        ));
    }
    let debt_years: Vec<String> = solved
        .years
        .iter()
        .filter(|y| y.short_term_debt > Decimal::ZERO)
        .map(|y| y.year.to_string())
        .collect();
    if !debt_years.is_empty() {
        warnings.push(format!(
            "Short-term debt carried to hold minimum cash in: {}",
            debt_years.join(", ")
        ));
    }

    let years: Vec<YearlyProjection> = resolved
        .iter()
        .zip(&solved.years)
        .map(|(r, s)| YearlyProjection::assemble(r, s, params.opening_equity))
        .collect();

    let summary = build_summary(
        &years,
        input.start_year,
        input.end_year,
        input.admin.discount_rate,
    )?;

    let output = ProjectionOutput {
        years,
        summary,
        solver: solved.metadata,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(METHODOLOGY, input, warnings, elapsed, output))
}
