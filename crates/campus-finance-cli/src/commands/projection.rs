use clap::Args;
use serde_json::Value;

use campus_finance_core::period::{JsonDataDirectory, NoDataSource, ProjectionDataSource};
use campus_finance_core::projection::{ProjectionEngine, ProjectionInput};
use campus_finance_core::settings::{DefaultSettings, JsonSettingsFile, SettingsProvider};

use crate::input;

/// Arguments for a full campus projection
#[derive(Args)]
pub struct ProjectArgs {
    /// Path to the plan file (JSON or YAML); stdin when omitted
    #[arg(long)]
    pub input: Option<String>,

    /// Financial settings JSON file (defaults apply when omitted)
    #[arg(long)]
    pub settings: Option<String>,

    /// Directory holding `<version>.json` period data files
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Plan version to load from --data-dir (overrides the file's version_id)
    #[arg(long)]
    pub plan_version: Option<String>,

    /// First year of the reporting range
    #[arg(long)]
    pub start_year: Option<i32>,

    /// Last year of the reporting range
    #[arg(long)]
    pub end_year: Option<i32>,
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut plan: ProjectionInput = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(piped) = input::stdin::read_piped()? {
        piped
    } else {
        return Err("--input <plan.json|plan.yaml> or stdin required for projection".into());
    };

    if let Some(version) = args.plan_version {
        plan.version_id = Some(version);
    }
    if let Some(year) = args.start_year {
        plan.start_year = year;
    }
    if let Some(year) = args.end_year {
        plan.end_year = year;
    }

    let settings: Box<dyn SettingsProvider> = match args.settings {
        Some(path) => Box::new(JsonSettingsFile::new(path)),
        None => Box::new(DefaultSettings),
    };
    let data: Box<dyn ProjectionDataSource> = match args.data_dir {
        Some(dir) => Box::new(JsonDataDirectory::new(dir)),
        None => Box::new(NoDataSource),
    };
    log::info!(
        "Projecting {} curricula with settings from '{}' and data from '{}'",
        plan.curricula.len(),
        settings.name(),
        data.name()
    );

    let result = ProjectionEngine::from_boxed(settings, data).project(&plan)?;
    Ok(serde_json::to_value(result)?)
}
