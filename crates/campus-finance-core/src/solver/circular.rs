use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::params::SolverParams;
use super::recurrence::{forward_pass, YearState};
use crate::types::{with_metadata, ComputationOutput};
use crate::CampusFinanceResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const MAX_ITERATIONS: u32 = 10;
/// Largest per-year change in net result (relative) that counts as converged.
pub const CONVERGENCE_TOLERANCE: Decimal = dec!(0.0001);
/// Below this previous net result the error is measured in absolute terms.
pub const ABSOLUTE_ERROR_THRESHOLD: Decimal = dec!(0.01);

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverMetadata {
    pub converged: bool,
    pub iterations: u32,
    pub max_error: Decimal,
    /// Year with the largest error in the final iteration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_error_year: Option<i32>,
    /// Max error after each iteration from the second on
    pub iteration_errors: Vec<Decimal>,
    pub duration_us: u64,
    /// True when the iteration budget ran out; the last pass is still returned
    pub fallback_used: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverResult {
    pub years: Vec<YearState>,
    pub metadata: SolverMetadata,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Resolve the interest ↔ debt ↔ cash ↔ net result cycle for all thirty years.
///
/// Each iteration is a full forward pass fed by the previous one. Iteration
/// stops once no year's net result moves by more than 0.01%, or after
/// [`MAX_ITERATIONS`], in which case the last pass is returned with
/// `converged = false`.
pub fn solve(params: &SolverParams) -> CampusFinanceResult<SolverResult> {
    let start = Instant::now();
    params.validate()?;

    let mut current = forward_pass(params, None);
    let mut iterations = 1;
    let mut iteration_errors = Vec::new();
    let mut max_error = Decimal::ZERO;
    let mut max_error_year = None;
    let mut converged = false;

    while iterations < MAX_ITERATIONS {
        let next = forward_pass(params, Some(&current));
        iterations += 1;

        let (error, year) = convergence_error(&next, &current);
        log::debug!("solver iteration {iterations}: max error {error} in {year}");
        iteration_errors.push(error);
        max_error = error;
        max_error_year = Some(year);
        current = next;

        if error <= CONVERGENCE_TOLERANCE {
            converged = true;
            break;
        }
    }

    if !converged {
        log::warn!(
            "Circular solver did not converge after {MAX_ITERATIONS} iterations \
             (max error {max_error}); returning last iteration"
        );
    }

    Ok(SolverResult {
        years: current,
        metadata: SolverMetadata {
            converged,
            iterations,
            max_error,
            max_error_year,
            iteration_errors,
            duration_us: start.elapsed().as_micros() as u64,
            fallback_used: !converged,
        },
    })
}

/// Largest per-year change in net result between two passes, and its year.
///
/// Relative change where the previous net result is material, absolute
/// change where it is below [`ABSOLUTE_ERROR_THRESHOLD`].
pub fn convergence_error(current: &[YearState], previous: &[YearState]) -> (Decimal, i32) {
    let mut worst = (Decimal::ZERO, current.first().map(|y| y.year).unwrap_or_default());
    for (now, before) in current.iter().zip(previous) {
        let delta = (now.net_result - before.net_result).abs();
        let error = if before.net_result.abs() < ABSOLUTE_ERROR_THRESHOLD {
            delta
        } else {
            delta / before.net_result.abs()
        };
        if error > worst.0 {
            worst = (error, now.year);
        }
    }
    worst
}

/// [`solve`] wrapped in the standard output envelope with diagnostic warnings.
pub fn solve_financials(
    params: &SolverParams,
) -> CampusFinanceResult<ComputationOutput<SolverResult>> {
    let result = solve(params)?;
    let mut warnings = Vec::new();

    let imbalance = params.opening_imbalance();
    if !imbalance.is_zero() {
        let warning = format!(
            "Opening balance sheet is out of balance by {imbalance}; every year carries this difference"
        );
        log::warn!("{warning}");
        warnings.push(warning);
    }
    if result.metadata.fallback_used {
        warnings.push(format!(
            "Solver did not converge after {} iterations (max error {}); last iteration returned",
            result.metadata.iterations, result.metadata.max_error
        ));
    }
    for y in result.years.iter().filter(|y| y.short_term_debt > Decimal::ZERO) {
        warnings.push(format!(
            "Year {}: short-term debt of {} needed to hold minimum cash",
            y.year,
            y.short_term_debt.round_dp(2)
        ));
    }

    let elapsed = result.metadata.duration_us;
    Ok(with_metadata(
        "Fixed-point circular solver (interest / debt / cash / net result)",
        params,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::FinancialSettings;
    use crate::solver::params::WorkingCapitalBalances;
    use crate::types::PROJECTION_YEARS;

    fn sample_params() -> SolverParams {
        SolverParams {
            revenue: vec![dec!(100000000); PROJECTION_YEARS],
            ebitda: vec![dec!(15000000); PROJECTION_YEARS],
            capex: vec![dec!(5000000); PROJECTION_YEARS],
            staff_costs: vec![dec!(50000000); PROJECTION_YEARS],
            fixed_assets_opening: dec!(50000000),
            depreciation_rate: dec!(0.10),
            starting_cash: dec!(5000000),
            opening_equity: dec!(55000000),
            opening_debt: Decimal::ZERO,
            opening_working_capital: WorkingCapitalBalances::default(),
            settings: FinancialSettings::default(),
        }
    }

    // --------------------------------------------------
    // Convergence
    // --------------------------------------------------

    #[test]
    fn test_profitable_campus_converges() {
        let result = solve(&sample_params()).unwrap();
        assert!(result.metadata.converged);
        assert!(!result.metadata.fallback_used);
        assert!(result.metadata.iterations >= 2);
        assert!(result.metadata.max_error <= CONVERGENCE_TOLERANCE);
        assert_eq!(
            result.metadata.iteration_errors.len() as u32,
            result.metadata.iterations - 1
        );
    }

    #[test]
    fn test_zero_rates_converge_on_second_pass() {
        let mut p = sample_params();
        p.settings.debt_interest_rate = Decimal::ZERO;
        p.settings.bank_deposit_interest_rate = Decimal::ZERO;
        let result = solve(&p).unwrap();
        assert!(result.metadata.converged);
        assert_eq!(result.metadata.iterations, 2);
        assert_eq!(result.metadata.max_error, Decimal::ZERO);
    }

    #[test]
    fn test_errors_shrink_between_iterations() {
        let result = solve(&sample_params()).unwrap();
        let errs = &result.metadata.iteration_errors;
        for pair in errs.windows(2) {
            assert!(pair[1] <= pair[0], "errors should not grow: {errs:?}");
        }
    }

    #[test]
    fn test_runaway_interest_exhausts_iteration_budget() {
        let mut p = sample_params();
        p.ebitda = vec![dec!(-10000000); PROJECTION_YEARS];
        p.settings.debt_interest_rate = dec!(0.50);
        let result = solve(&p).unwrap();

        assert!(!result.metadata.converged);
        assert!(result.metadata.fallback_used);
        assert_eq!(result.metadata.iterations, MAX_ITERATIONS);
        assert_eq!(
            result.metadata.iteration_errors.len() as u32,
            MAX_ITERATIONS - 1
        );
        assert!(result.metadata.max_error > CONVERGENCE_TOLERANCE);
        assert!(result.metadata.max_error_year.is_some());

        // the last pass is still a complete, internally consistent projection
        assert_eq!(result.years.len(), PROJECTION_YEARS);
        for y in &result.years {
            assert!(y.balance_difference().abs() < dec!(0.01), "Year {} unbalanced", y.year);
        }
    }

    #[test]
    fn test_envelope_warns_on_non_convergence() {
        let mut p = sample_params();
        p.ebitda = vec![dec!(-10000000); PROJECTION_YEARS];
        p.settings.debt_interest_rate = dec!(0.50);
        let out = solve_financials(&p).unwrap();
        assert!(out.result.metadata.fallback_used);
        assert!(out
            .warnings
            .iter()
            .any(|w| w.contains("did not converge after 10 iterations")));
    }

    #[test]
    fn test_convergence_error_absolute_mode() {
        let base = forward_pass(&sample_params(), None);
        let mut a = base.clone();
        let mut b = base;
        b[3].net_result = dec!(0.001);
        a[3].net_result = dec!(0.005);
        let (error, year) = convergence_error(&a, &b);
        assert_eq!(error, dec!(0.004));
        assert_eq!(year, 2026);
    }

    #[test]
    fn test_convergence_error_relative_mode() {
        let base = forward_pass(&sample_params(), None);
        let mut a = base.clone();
        a[0].net_result = base[0].net_result * dec!(1.02);
        let (error, year) = convergence_error(&a, &base);
        assert_eq!(error, dec!(0.02));
        assert_eq!(year, 2023);
    }

    // --------------------------------------------------
    // Accounting identities
    // --------------------------------------------------

    #[test]
    fn test_converged_years_balance_and_hold_floor() {
        let p = sample_params();
        let result = solve(&p).unwrap();
        let mut previous_cash = p.starting_cash;
        for y in &result.years {
            assert!(y.balance_difference().abs() < dec!(0.01), "Year {} unbalanced", y.year);
            assert!(y.cash >= p.settings.minimum_cash_balance);
            assert!((y.net_cash_flow - (y.cash - previous_cash)).abs() < dec!(0.01));
            previous_cash = y.cash;
        }
    }

    #[test]
    fn test_idempotent() {
        let p = sample_params();
        let a = solve(&p).unwrap();
        let b = solve(&p).unwrap();
        assert_eq!(a.years, b.years);
        assert_eq!(a.metadata.iterations, b.metadata.iterations);
    }

    #[test]
    fn test_validation_error_not_retried() {
        let mut p = sample_params();
        p.revenue.pop();
        let err = solve(&p).unwrap_err();
        assert_eq!(err.code(), "ARRAY_LENGTH_MISMATCH");
    }

    // --------------------------------------------------
    // Envelope
    // --------------------------------------------------

    #[test]
    fn test_envelope_warns_on_debt_and_imbalance() {
        let mut p = sample_params();
        p.ebitda = vec![dec!(-10000000); PROJECTION_YEARS];
        p.opening_equity = dec!(56000000);
        let out = solve_financials(&p).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("out of balance")));
        assert!(out.warnings.iter().any(|w| w.contains("short-term debt")));
        assert_eq!(
            out.methodology,
            "Fixed-point circular solver (interest / debt / cash / net result)"
        );
    }
}
