use clap::Args;
use scenario_calc_core::scenario::ScenarioInput;
use serde_json::{json, Value};

use crate::input;

/// Arguments for comparing multiple scenario runs side by side.
#[derive(Args)]
pub struct CompareArgs {
    /// Comma-separated list of JSON scenario input files
    #[arg(long, value_delimiter = ',')]
    pub inputs: Vec<String>,
}

pub fn compare_scenarios(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if args.inputs.is_empty() {
        return Err("--inputs requires at least one file".into());
    }

    let mut rows = Vec::with_capacity(args.inputs.len());
    for path in &args.inputs {
        let scenario: ScenarioInput = input::file::read_json(path)?;
        let output = scenario_calc_core::run(&scenario)?;
        rows.push(json!({
            "file": path,
            "enterprise_value": output.valuation.dcf.enterprise_value,
            "equity_value": output.valuation.dcf.equity_value,
        }));
    }

    Ok(Value::Array(rows))
}
