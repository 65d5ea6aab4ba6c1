mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::compare::CompareArgs;
use commands::run::RunArgs;
use commands::sample::SampleArgs;
use commands::validate::ValidateArgs;
use commands::variant::VariantArgs;

/// Month-by-month scenario projection and valuation engine
#[derive(Parser)]
#[command(
    name = "scenario-calc",
    version,
    about = "Month-by-month scenario projection and valuation engine",
    long_about = "Projects the monthly financial trajectory of an early-stage company \
                  over a configurable horizon and derives DCF, comps, VC-method, and \
                  scorecard valuations from the projection."
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
    /// Run a full scenario projection and valuation
    Run(RunArgs),
    /// Validate a scenario input without running it
    Validate(ValidateArgs),
    /// Emit the built-in sample scenario as JSON
    Sample(SampleArgs),
    /// Run several scenarios and compare their valuations
    Compare(CompareArgs),
    /// Derive a bull/bear variant from a base scenario
    Variant(VariantArgs),
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
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Run(args) => commands::run::run_scenario(args),
        Commands::Validate(args) => commands::validate::validate_scenario(args),
        Commands::Sample(args) => commands::sample::emit_sample(args),
        Commands::Compare(args) => commands::compare::compare_scenarios(args),
        Commands::Variant(args) => commands::variant::derive_variant(args),
        Commands::Version => {
            println!("scenario-calc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
