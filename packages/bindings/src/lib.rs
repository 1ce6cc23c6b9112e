use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;

use campus_finance_core::projection::{self, ProjectionInput};
use campus_finance_core::settings::{load_or_default, DefaultSettings, FinancialSettings, StaticSettings};
use campus_finance_core::solver::{self, SolverParams};
use campus_finance_core::{time_value, CampusFinanceError};

/// Domain errors carry their machine code so callers can branch on it.
fn to_domain_error(e: CampusFinanceError) -> napi::Error {
    napi::Error::from_reason(format!("[{}] {}", e.code(), e))
}

/// Convert any other Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse<T: serde::de::DeserializeOwned>(json: &str) -> NapiResult<T> {
    serde_json::from_str(json).map_err(|e| to_domain_error(e.into()))
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Full 30-year projection. `settings_json` falls back to defaults when absent
/// or invalid, with a warning in the envelope.
#[napi]
pub fn run_projection(input_json: String, settings_json: Option<String>) -> NapiResult<String> {
    let input: ProjectionInput = parse(&input_json)?;

    let mut warnings = Vec::new();
    let settings = match settings_json {
        Some(json) => match serde_json::from_str::<FinancialSettings>(&json) {
            Ok(parsed) => {
                let (settings, fallback) = load_or_default(&StaticSettings(parsed));
                warnings.extend(fallback);
                settings
            }
            Err(e) => {
                warnings.push(format!("Invalid settings ({e}); using default financial settings"));
                load_or_default(&DefaultSettings).0
            }
        },
        None => load_or_default(&DefaultSettings).0,
    };

    let mut output = projection::run_projection(&input, &settings).map_err(to_domain_error)?;
    warnings.append(&mut output.warnings);
    output.warnings = warnings;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Solver
// ---------------------------------------------------------------------------

#[napi]
pub fn solve_financials(params_json: String) -> NapiResult<String> {
    let params: SolverParams = parse(&params_json)?;
    let output = solver::solve_financials(&params).map_err(to_domain_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Time value
// ---------------------------------------------------------------------------

/// NPV of a 30-value series (2023 first) clipped to 2028–2052. Rate and flows
/// are decimal strings.
#[napi]
pub fn window_npv(
    rate: String,
    flows_json: String,
    start_year: i32,
    end_year: i32,
) -> NapiResult<String> {
    let rate: Decimal = rate.parse().map_err(to_napi_error)?;
    let flows: Vec<Decimal> = parse(&flows_json)?;
    let value = time_value::window_npv(rate, &flows, start_year, end_year)
        .map_err(to_domain_error)?;
    Ok(value.to_string())
}
