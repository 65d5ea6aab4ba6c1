use clap::Args;
use scenario_calc_core::scenario::ScenarioInput;
use serde_json::{json, Value};

use crate::input;

/// Arguments for scenario validation.
#[derive(Args)]
pub struct ValidateArgs {
    /// Path to a JSON scenario input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn validate_scenario(args: ValidateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let scenario: ScenarioInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input file is required (or pipe a scenario on stdin)".into());
    };

    match scenario.validate() {
        Ok(()) => Ok(json!({ "valid": true })),
        Err(e) => Ok(json!({ "valid": false, "reason": e.to_string() })),
    }
}
