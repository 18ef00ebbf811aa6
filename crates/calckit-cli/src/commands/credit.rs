use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use calckit_core::credit::merton::{self, DefaultProbabilityInput};

use crate::input;

/// Arguments for the structural probability of default
#[derive(Args)]
pub struct DefaultProbabilityArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Market value of the firm's assets
    #[arg(long, alias = "assets")]
    pub asset_value: Option<Decimal>,

    /// Face value of debt due at the horizon
    #[arg(long, alias = "debt")]
    pub debt_value: Option<Decimal>,

    /// Annualised asset volatility as a decimal (0.25 = 25%)
    #[arg(long, alias = "vol")]
    pub asset_volatility: Option<Decimal>,

    /// Horizon in years
    #[arg(long, default_value = "1")]
    pub horizon_years: Decimal,
}

pub fn run_default_probability(
    args: DefaultProbabilityArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let pd_input: DefaultProbabilityInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        DefaultProbabilityInput {
            asset_value: args
                .asset_value
                .ok_or("--asset-value is required (or provide --input)")?,
            debt_value: args
                .debt_value
                .ok_or("--debt-value is required (or provide --input)")?,
            asset_volatility: args
                .asset_volatility
                .ok_or("--asset-volatility is required (or provide --input)")?,
            horizon_years: args.horizon_years,
        }
    };

    let result = merton::calculate_default_probability(&pd_input)?;
    Ok(serde_json::to_value(result)?)
}
