use clap::{Args, ValueEnum};
use scenario_calc_core::scenario::{ScenarioInput, ScenarioType};
use serde_json::Value;

use crate::input;

#[derive(Debug, Clone, ValueEnum)]
pub enum VariantKind {
    Base,
    Bull,
    Bear,
}

impl From<VariantKind> for ScenarioType {
    fn from(kind: VariantKind) -> Self {
        match kind {
            VariantKind::Base => ScenarioType::Base,
            VariantKind::Bull => ScenarioType::Bull,
            VariantKind::Bear => ScenarioType::Bear,
        }
    }
}

/// Arguments for deriving a bull/bear variant from a base scenario.
#[derive(Args)]
pub struct VariantArgs {
    /// Path to the base scenario's JSON input file
    #[arg(long)]
    pub input: String,

    /// The variant to tag the clone with
    #[arg(long, value_enum)]
    pub kind: VariantKind,

    /// Id to give the cloned scenario
    #[arg(long)]
    pub id: String,

    /// Name to give the cloned scenario
    #[arg(long)]
    pub name: String,
}

pub fn derive_variant(args: VariantArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let scenario: ScenarioInput = input::file::read_json(&args.input)?;
    let variant = scenario.clone_as(args.id, args.name, args.kind.into());
    Ok(serde_json::to_value(variant)?)
}
