use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use campus_finance_core::time_value::{npv, npv_window, window_npv};
use campus_finance_core::PROJECTION_YEARS;

/// Arguments for net present value
#[derive(Args)]
pub struct NpvArgs {
    /// Discount rate as a decimal (e.g. 0.08)
    #[arg(long)]
    pub rate: Decimal,

    /// Cash flows, comma-separated. Thirty values (2023 first) are windowed to
    /// 2028–2052; any other count is discounted from the first value.
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub cash_flows: Vec<Decimal>,

    /// First year of the window
    #[arg(long, default_value_t = 2023)]
    pub start_year: i32,

    /// Last year of the window
    #[arg(long, default_value_t = 2052)]
    pub end_year: i32,
}

pub fn run_npv(args: NpvArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if args.cash_flows.len() == PROJECTION_YEARS {
        let value = window_npv(args.rate, &args.cash_flows, args.start_year, args.end_year)?;
        let window = npv_window(args.start_year, args.end_year);
        return Ok(json!({
            "result": {
                "npv": value,
                "window_start": window.map(|(from, _)| from),
                "window_end": window.map(|(_, to)| to),
            }
        }));
    }
    let value = npv(args.rate, &args.cash_flows)?;
    Ok(json!({ "result": { "npv": value } }))
}
