mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::amortization::{PayoffArgs, SavingsArgs};
use commands::credit::DefaultProbabilityArgs;
use commands::entertainment::CompatibilityArgs;
use commands::health::{BmiArgs, FatMassArgs, FractureRiskArgs, NafldArgs};
use commands::probability::DiceArgs;
use commands::statistics::CorrelationArgs;

/// Everyday calculators with decimal precision
#[derive(Parser)]
#[command(
    name = "calc",
    version,
    about = "Everyday calculators with decimal precision",
    long_about = "A CLI for small, deterministic calculators: dice probabilities, \
                  correlation matrices, default probability, debt payoff, savings \
                  goals and health risk scores. Every command accepts flags, a JSON \
                  file via --input, or JSON piped on stdin."
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
    /// Probability of rolling a target sum with fair six-sided dice
    Dice(DiceArgs),
    /// Pearson correlation matrix of a numeric table
    Correlation(CorrelationArgs),
    /// Merton-style probability of default
    DefaultProbability(DefaultProbabilityArgs),
    /// Months to pay off a balance with a fixed payment
    Payoff(PayoffArgs),
    /// Months to save for a home down payment
    Savings(SavingsArgs),
    /// Body mass index
    Bmi(BmiArgs),
    /// Fat mass index and fat-free mass index
    FatMass(FatMassArgs),
    /// Additive fatty liver (NAFLD) risk score
    Nafld(NafldArgs),
    /// Additive ten-year fracture risk score
    FractureRisk(FractureRiskArgs),
    /// Seeded name compatibility score (for fun)
    Compatibility(CompatibilityArgs),
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
    env_logger::init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Dice(args) => commands::probability::run_dice(args),
        Commands::Correlation(args) => commands::statistics::run_correlation(args),
        Commands::DefaultProbability(args) => commands::credit::run_default_probability(args),
        Commands::Payoff(args) => commands::amortization::run_payoff(args),
        Commands::Savings(args) => commands::amortization::run_savings(args),
        Commands::Bmi(args) => commands::health::run_bmi(args),
        Commands::FatMass(args) => commands::health::run_fat_mass(args),
        Commands::Nafld(args) => commands::health::run_nafld(args),
        Commands::FractureRisk(args) => commands::health::run_fracture_risk(args),
        Commands::Compatibility(args) => commands::entertainment::run_compatibility(args),
        Commands::Version => {
            println!("calc {}", env!("CARGO_PKG_VERSION"));
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
