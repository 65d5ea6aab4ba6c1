use clap::Args;
use scenario_calc_core::sample::sample_scenario;
use serde_json::Value;

/// Arguments for emitting the built-in sample scenario.
#[derive(Args)]
pub struct SampleArgs {
    /// Override the sample's default projection horizon
    #[arg(long)]
    pub months: Option<u32>,
}

pub fn emit_sample(args: SampleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut scenario = sample_scenario();
    if let Some(months) = args.months {
        scenario.timeframe.months = months;
    }
    Ok(serde_json::to_value(scenario)?)
}
