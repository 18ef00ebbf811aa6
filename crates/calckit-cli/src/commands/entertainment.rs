use clap::Args;
use serde_json::Value;

use calckit_core::entertainment::compatibility::{self, CompatibilityInput};

use crate::input;

/// Arguments for the name compatibility score
#[derive(Args)]
pub struct CompatibilityArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// First name
    #[arg(long)]
    pub first: Option<String>,

    /// Second name
    #[arg(long)]
    pub second: Option<String>,

    /// Seed for the bonus draw; the same seed always gives the same score
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
}

pub fn run_compatibility(args: CompatibilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let compat_input: CompatibilityInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        CompatibilityInput {
            first_name: args.first.ok_or("--first is required (or provide --input)")?,
            second_name: args.second.ok_or("--second is required (or provide --input)")?,
            seed: args.seed,
        }
    };

    let result = compatibility::calculate_compatibility(&compat_input)?;
    Ok(serde_json::to_value(result)?)
}
