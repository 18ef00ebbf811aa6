use clap::Args;
use serde_json::Value;

use calckit_core::statistics::correlation::{self, CorrelationInput};

use crate::input;

/// Arguments for the correlation matrix
#[derive(Args)]
pub struct CorrelationArgs {
    /// Path to JSON input file with `rows` and optional `columns`
    #[arg(long, conflicts_with = "csv")]
    pub input: Option<String>,

    /// Path to a CSV file whose header row names the columns
    #[arg(long)]
    pub csv: Option<String>,
}

pub fn run_correlation(args: CorrelationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let corr_input: CorrelationInput = if let Some(ref path) = args.csv {
        let table = input::csv_in::read_decimal_table(path)?;
        CorrelationInput {
            columns: Some(table.headers),
            rows: table.rows,
        }
    } else if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        return Err("--csv or --input is required for a correlation matrix".into());
    };

    let result = correlation::calculate_correlation_matrix(&corr_input)?;
    Ok(serde_json::to_value(result)?)
}
