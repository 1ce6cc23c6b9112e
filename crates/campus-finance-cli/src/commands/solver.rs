use clap::Args;
use serde_json::Value;

use campus_finance_core::solver::{self, SolverParams};

use crate::input;

/// Arguments for running the circular solver on precomputed yearly arrays
#[derive(Args)]
pub struct SolveArgs {
    /// Path to a solver parameter file (JSON or YAML); stdin when omitted
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_solve(args: SolveArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params: SolverParams = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(piped) = input::stdin::read_piped()? {
        piped
    } else {
        return Err("--input <params.json> or stdin required for solve".into());
    };
    let result = solver::solve_financials(&params)?;
    Ok(serde_json::to_value(result)?)
}
