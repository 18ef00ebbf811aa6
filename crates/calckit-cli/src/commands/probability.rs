use clap::Args;
use serde_json::Value;

use calckit_core::probability::dice::{self, DiceInput};

use crate::input;

/// Arguments for the dice sum probability
#[derive(Args)]
pub struct DiceArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Number of six-sided dice (1 to 10)
    #[arg(long, short = 'n')]
    pub dice: Option<u32>,

    /// Target sum of the faces
    #[arg(long, short = 't')]
    pub target: Option<u32>,
}

pub fn run_dice(args: DiceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let dice_input: DiceInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        DiceInput {
            dice_count: args.dice.ok_or("--dice is required (or provide --input)")?,
            target_sum: args.target.ok_or("--target is required (or provide --input)")?,
        }
    };

    let result = dice::calculate_dice_probability(&dice_input)?;
    Ok(serde_json::to_value(result)?)
}
