use campus_finance_core::calculators::ebitda::calculate_ebitda;
use campus_finance_core::settings::FinancialSettings;
use campus_finance_core::solver::{solve, solve_financials, SolverParams, WorkingCapitalBalances};
use campus_finance_core::{CampusFinanceError, PROJECTION_YEARS};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const TOLERANCE: Decimal = dec!(0.01);

// ===========================================================================
// Fixtures
// ===========================================================================

/// Flat 100M revenue at a 15% EBITDA margin with 5M capex a year.
fn scenario_a() -> SolverParams {
    SolverParams {
        revenue: vec![dec!(100_000_000); PROJECTION_YEARS],
        ebitda: vec![dec!(15_000_000); PROJECTION_YEARS],
        capex: vec![dec!(5_000_000); PROJECTION_YEARS],
        staff_costs: vec![dec!(50_000_000); PROJECTION_YEARS],
        fixed_assets_opening: dec!(50_000_000),
        depreciation_rate: dec!(0.10),
        starting_cash: dec!(5_000_000),
        opening_equity: dec!(55_000_000),
        opening_debt: Decimal::ZERO,
        opening_working_capital: WorkingCapitalBalances::default(),
        settings: FinancialSettings::default(),
    }
}

// ===========================================================================
// Scenarios
// ===========================================================================

#[test]
fn test_scenario_a_converges_and_balances() {
    let result = solve(&scenario_a()).unwrap();
    assert!(result.metadata.converged);
    assert!(!result.metadata.fallback_used);
    assert!(result.metadata.iterations <= 7, "took {}", result.metadata.iterations);
    assert_eq!(result.years.len(), PROJECTION_YEARS);
    for y in &result.years {
        assert!(
            y.balance_difference().abs() < TOLERANCE,
            "{} off by {}",
            y.year,
            y.balance_difference()
        );
    }
}

#[test]
fn test_scenario_b_cash_rich_carries_no_debt() {
    let mut params = scenario_a();
    params.starting_cash = dec!(100_000_000);
    params.opening_equity = dec!(150_000_000);
    let result = solve(&params).unwrap();
    assert_eq!(result.years[0].short_term_debt, Decimal::ZERO);
    assert!(result.years[0].interest_income > Decimal::ZERO);
}

#[test]
fn test_scenario_c_loss_making_still_solves() {
    let mut params = scenario_a();
    params.ebitda = vec![dec!(-10_000_000); PROJECTION_YEARS];
    let result = solve(&params).unwrap();

    assert_eq!(result.years.len(), PROJECTION_YEARS);
    let mut previous_debt = Decimal::ZERO;
    for y in &result.years {
        assert!(y.balance_difference().abs() < TOLERANCE, "{} unbalanced", y.year);
        assert!(y.short_term_debt >= previous_debt, "{} debt fell", y.year);
        assert!(y.cash >= params.settings.minimum_cash_balance - TOLERANCE);
        previous_debt = y.short_term_debt;
    }
    assert!(previous_debt > dec!(300_000_000));
}

#[test]
fn test_scenario_d_ebitda() {
    let result = calculate_ebitda(
        dec!(50_000_000),
        dec!(15_000_000),
        dec!(10_000_000),
        dec!(5_000_000),
    );
    assert_eq!(result.ebitda, dec!(20_000_000));
    assert_eq!(result.margin, dec!(40));
}

#[test]
fn test_scenario_e_first_year_depreciation() {
    let mut params = scenario_a();
    params.capex = vec![Decimal::ZERO; PROJECTION_YEARS];
    let result = solve(&params).unwrap();
    assert_eq!(result.years[0].depreciation, dec!(5_000_000));
    assert_eq!(result.years[0].fixed_assets, dec!(45_000_000));
    assert_eq!(result.years[1].depreciation, dec!(4_500_000));
}

// ===========================================================================
// Invariants
// ===========================================================================

#[test]
fn test_minimum_cash_held_every_year() {
    let result = solve(&scenario_a()).unwrap();
    let floor = FinancialSettings::default().minimum_cash_balance;
    for y in &result.years {
        assert!(y.cash >= floor - TOLERANCE, "{} cash {}", y.year, y.cash);
    }
}

#[test]
fn test_retained_earnings_accumulate_net_result() {
    let result = solve(&scenario_a()).unwrap();
    let mut running = Decimal::ZERO;
    for y in &result.years {
        running += y.net_result;
        assert_eq!(y.retained_earnings, running);
    }
}

#[test]
fn test_net_cash_flow_is_sum_of_sections() {
    let result = solve(&scenario_a()).unwrap();
    for y in &result.years {
        assert_eq!(
            y.net_cash_flow,
            y.operating_cash_flow + y.investing_cash_flow + y.financing_cash_flow
        );
    }
}

#[test]
fn test_cash_moves_by_net_cash_flow() {
    let params = scenario_a();
    let result = solve(&params).unwrap();
    let mut previous_cash = params.starting_cash;
    for y in &result.years {
        assert!((y.cash - previous_cash - y.net_cash_flow).abs() < TOLERANCE);
        previous_cash = y.cash;
    }
}

#[test]
fn test_zakat_never_negative() {
    let mut params = scenario_a();
    params.ebitda = vec![dec!(-2_000_000); PROJECTION_YEARS];
    let result = solve(&params).unwrap();
    assert!(result.years.iter().all(|y| y.zakat >= Decimal::ZERO));
    assert!(result.years.iter().all(|y| y.zakat == Decimal::ZERO));
}

#[test]
fn test_solver_is_deterministic() {
    let first = solve(&scenario_a()).unwrap();
    let second = solve(&scenario_a()).unwrap();
    assert_eq!(first.years, second.years);
    assert_eq!(first.metadata.iterations, second.metadata.iterations);
}

// ===========================================================================
// Validation and envelope
// ===========================================================================

#[test]
fn test_wrong_length_rejected() {
    let mut params = scenario_a();
    params.revenue.push(dec!(1));
    match solve(&params).unwrap_err() {
        CampusFinanceError::ArrayLength { field, actual, .. } => {
            assert_eq!(field, "revenue");
            assert_eq!(actual, 31);
        }
        e => panic!("Expected ArrayLength, got {e:?}"),
    }
}

#[test]
fn test_envelope_warns_about_debt() {
    let mut params = scenario_a();
    params.ebitda = vec![dec!(-10_000_000); PROJECTION_YEARS];
    let out = solve_financials(&params).unwrap();
    assert!(!out.warnings.is_empty());
    assert!(out.methodology.contains("circular"));
    assert_eq!(out.result.years.len(), PROJECTION_YEARS);
}
