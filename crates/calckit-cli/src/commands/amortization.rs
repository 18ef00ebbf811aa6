use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use calckit_core::amortization::payoff::{self, PayoffInput};
use calckit_core::amortization::savings::{self, DownPaymentInput};

use crate::input;

/// Arguments for the debt payoff horizon
#[derive(Args)]
pub struct PayoffArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Outstanding balance
    #[arg(long)]
    pub balance: Option<Decimal>,

    /// Annual interest rate as a decimal (0.20 = 20% APR)
    #[arg(long, alias = "apr")]
    pub annual_rate: Option<Decimal>,

    /// Fixed monthly payment
    #[arg(long, alias = "payment")]
    pub monthly_payment: Option<Decimal>,

    /// Include the month-by-month schedule
    #[arg(long)]
    pub schedule: bool,

    /// Date of the first payment (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Also solve for the payment that clears the balance in this many months
    #[arg(long)]
    pub target_months: Option<u32>,
}

/// Arguments for the down payment savings plan
#[derive(Args)]
pub struct SavingsArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase price of the home
    #[arg(long, alias = "price")]
    pub home_price: Option<Decimal>,

    /// Down payment as a decimal share of the price
    #[arg(long, default_value = "0.20")]
    pub down_payment_fraction: Decimal,

    /// Closing costs as a decimal share of the price
    #[arg(long)]
    pub closing_cost_fraction: Option<Decimal>,

    /// Amount already saved
    #[arg(long, default_value = "0")]
    pub current_savings: Decimal,

    /// Amount added at the end of each month
    #[arg(long, alias = "contribution")]
    pub monthly_contribution: Option<Decimal>,

    /// Expected annual return on savings as a decimal
    #[arg(long, default_value = "0")]
    pub annual_return: Decimal,
}

pub fn run_payoff(args: PayoffArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let payoff_input: PayoffInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        PayoffInput {
            balance: args.balance.ok_or("--balance is required (or provide --input)")?,
            annual_rate: args
                .annual_rate
                .ok_or("--annual-rate is required (or provide --input)")?,
            monthly_payment: args
                .monthly_payment
                .ok_or("--monthly-payment is required (or provide --input)")?,
            include_schedule: args.schedule,
            start_date: args.start_date,
            target_months: args.target_months,
        }
    };

    let result = payoff::calculate_payoff(&payoff_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_savings(args: SavingsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let savings_input: DownPaymentInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        DownPaymentInput {
            home_price: args
                .home_price
                .ok_or("--home-price is required (or provide --input)")?,
            down_payment_fraction: args.down_payment_fraction,
            closing_cost_fraction: args.closing_cost_fraction,
            current_savings: args.current_savings,
            monthly_contribution: args
                .monthly_contribution
                .ok_or("--monthly-contribution is required (or provide --input)")?,
            annual_return: args.annual_return,
        }
    };

    let result = savings::calculate_down_payment_savings(&savings_input)?;
    Ok(serde_json::to_value(result)?)
}
