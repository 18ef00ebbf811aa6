//! Months needed to save a home down payment.
//!
//! Balance accrues monthly interest and then receives the contribution:
//! `pv <- pv * (1 + r) + contribution`. The loop stops at the target or
//! after `MAX_SAVINGS_MONTHS`, whichever comes first.

use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::*;
use crate::{CalcError, CalcResult};

/// 50 years.
pub const MAX_SAVINGS_MONTHS: u32 = 600;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownPaymentInput {
    pub home_price: Money,
    /// Down payment as a decimal share of price (0.20 = 20%).
    pub down_payment_fraction: Rate,
    /// Closing costs as a decimal share of price. Treated as 0 when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_cost_fraction: Option<Rate>,
    pub current_savings: Money,
    pub monthly_contribution: Money,
    /// Expected annual return on savings as a decimal; compounded monthly.
    pub annual_return: Rate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsSnapshot {
    pub year: u32,
    pub balance: Money,
    pub contributions_to_date: Money,
    pub interest_to_date: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownPaymentOutput {
    pub target_amount: Money,
    pub down_payment_amount: Money,
    pub closing_costs: Money,
    pub months_to_goal: u32,
    pub years_to_goal: Decimal,
    pub total_contributions: Money,
    pub interest_earned: Money,
    pub final_balance: Money,
    pub yearly_projection: Vec<SavingsSnapshot>,
}

// ---------------------------------------------------------------------------
// Core
// ---------------------------------------------------------------------------

/// Project savings month by month until the down payment target is met.
pub fn calculate_down_payment_savings(
    input: &DownPaymentInput,
) -> CalcResult<ComputationOutput<DownPaymentOutput>> {
    validate_input(input)?;
    let mut warnings: Vec<String> = Vec::new();

    let down_payment_amount = input.home_price * input.down_payment_fraction;
    let closing_costs = input.home_price * input.closing_cost_fraction.unwrap_or(Decimal::ZERO);
    let target = down_payment_amount + closing_costs;
    let r = input.annual_return / dec!(12);

    let mut balance = input.current_savings;
    let mut contributions = Decimal::ZERO;
    let mut months = 0u32;
    let mut yearly_projection = Vec::new();

    if balance >= target {
        warnings.push("Current savings already cover the target.".to_string());
    }

    while balance < target {
        if months == MAX_SAVINGS_MONTHS {
            debug!("savings goal {target} not reached after {months} months (balance {balance})");
            return Err(CalcError::ConvergenceFailure {
                function: "down_payment_savings".into(),
                iterations: MAX_SAVINGS_MONTHS,
                last_delta: target - balance,
            });
        }
        balance = balance * (Decimal::ONE + r) + input.monthly_contribution;
        contributions += input.monthly_contribution;
        months += 1;
        if months % 12 == 0 {
            yearly_projection.push(SavingsSnapshot {
                year: months / 12,
                balance,
                contributions_to_date: contributions,
                interest_to_date: balance - input.current_savings - contributions,
            });
        }
    }

    let output = DownPaymentOutput {
        target_amount: target,
        down_payment_amount,
        closing_costs,
        months_to_goal: months,
        years_to_goal: (Decimal::from(months) / dec!(12)).round_dp(2),
        total_contributions: contributions,
        interest_earned: balance - input.current_savings - contributions,
        final_balance: balance,
        yearly_projection,
    };

    let assumptions = serde_json::json!({
        "compounding": "monthly, annual_return / 12",
        "contribution_timing": "end of month",
        "horizon_cap_months": MAX_SAVINGS_MONTHS,
    });

    Ok(with_metadata(
        "Down payment savings projection",
        &assumptions,
        warnings,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &DownPaymentInput) -> CalcResult<()> {
    if input.home_price <= Decimal::ZERO {
        return Err(CalcError::invalid("home_price", "Home price must be positive."));
    }
    if input.down_payment_fraction <= Decimal::ZERO || input.down_payment_fraction > Decimal::ONE
    {
        return Err(CalcError::invalid(
            "down_payment_fraction",
            "Must be between 0 (exclusive) and 1 (inclusive).",
        ));
    }
    if let Some(c) = input.closing_cost_fraction {
        if c < Decimal::ZERO || c > Decimal::ONE {
            return Err(CalcError::invalid(
                "closing_cost_fraction",
                "Must be between 0 and 1.",
            ));
        }
    }
    if input.current_savings < Decimal::ZERO {
        return Err(CalcError::invalid(
            "current_savings",
            "Savings cannot be negative.",
        ));
    }
    if input.monthly_contribution < Decimal::ZERO {
        return Err(CalcError::invalid(
            "monthly_contribution",
            "Contribution cannot be negative.",
        ));
    }
    if input.annual_return <= dec!(-1) || input.annual_return > Decimal::ONE {
        return Err(CalcError::invalid(
            "annual_return",
            "Must be a decimal between -1 (exclusive) and 1.",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
