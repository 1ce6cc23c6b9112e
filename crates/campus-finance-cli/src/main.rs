mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use campus_finance_core::CampusFinanceError;
use commands::npv::NpvArgs;
use commands::projection::ProjectArgs;
use commands::solver::SolveArgs;

/// Thirty-year campus financial projections
#[derive(Parser)]
#[command(
    name = "campus",
    version,
    about = "Thirty-year campus financial projections",
    long_about = "Projects tuition revenue, staff and rent costs, opex and capex for a \
                  school campus over 2023–2052, resolves the interest / debt / cash \
                  circularity, and reports the P&L, cash flow and balance sheet per year."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full projection from a plan file
    Project(ProjectArgs),
    /// Run the circular financing solver on precomputed yearly arrays
    Solve(SolveArgs),
    /// Net present value of a cash flow series
    Npv(NpvArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Project(args) => commands::projection::run_project(args),
        Commands::Solve(args) => commands::solver::run_solve(args),
        Commands::Npv(args) => commands::npv::run_npv(args),
        Commands::Version => {
            println!("campus {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            match e.downcast_ref::<CampusFinanceError>() {
                Some(domain) => eprintln!(
                    "{} [{}]: {}",
                    "error".red().bold(),
                    domain.code(),
                    domain
                ),
                None => eprintln!("{}: {}", "error".red().bold(), e),
            }
            process::exit(1);
        }
    }
}
