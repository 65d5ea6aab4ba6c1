use clap::Args;
use scenario_calc_core::scenario::ScenarioInput;
use serde_json::Value;

use crate::input;

/// Arguments for a full scenario run.
#[derive(Args)]
pub struct RunArgs {
    /// Path to a JSON scenario input file
    #[arg(long)]
    pub input: Option<String>,

    /// Override the projection horizon declared in the input file
    #[arg(long)]
    pub months: Option<u32>,
}

pub fn run_scenario(args: RunArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut scenario: ScenarioInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input file is required (or pipe a scenario on stdin)".into());
    };

    if let Some(months) = args.months {
        tracing::info!(months, "overriding timeframe.months from --months");
        scenario.timeframe.months = months;
    }

    let output = scenario_calc_core::run(&scenario)?;
    Ok(serde_json::to_value(output)?)
}
