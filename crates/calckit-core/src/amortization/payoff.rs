//! Fixed-payment payoff horizon for a revolving balance (credit card).
//!
//! The month count comes from the closed form
//!
//! ```text
//! n = -ln(1 - r*B/M) / ln(1 + r)        (n = B/M when r = 0)
//! ```
//!
//! rounded up, then reconciled against the recurrence `b <- b(1+r) - M` so
//! that the reported count is the first month the balance reaches zero.

use chrono::{Months, NaiveDate};
use log::debug;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::*;
use crate::{CalcError, CalcResult};

/// 100 years of monthly payments.
pub const MAX_PAYOFF_MONTHS: u32 = 1200;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffInput {
    /// Outstanding balance.
    pub balance: Money,
    /// Annual percentage rate as a decimal (0.20 = 20% APR). Monthly rate is
    /// `annual_rate / 12`.
    pub annual_rate: Rate,
    /// Fixed monthly payment.
    pub monthly_payment: Money,
    /// Emit a month-by-month schedule.
    #[serde(default)]
    pub include_schedule: bool,
    /// Date of the first payment; enables `payoff_date`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Desired payoff horizon; enables `required_payment`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_months: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffPeriod {
    pub month: u32,
    pub opening_balance: Money,
    pub interest: Money,
    pub payment: Money,
    pub principal: Money,
    pub closing_balance: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffOutput {
    pub monthly_rate: Rate,
    /// Unrounded closed-form month count.
    pub exact_months: Decimal,
    pub months: u32,
    pub years: u32,
    pub remaining_months: u32,
    /// monthly_payment * months
    pub total_paid: Money,
    pub total_interest: Money,
    /// Amount actually needed in the last month to clear the balance.
    pub final_payment: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_payment: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<PayoffPeriod>>,
}

// ---------------------------------------------------------------------------
// Core
// ---------------------------------------------------------------------------

/// Months, totals and (optionally) schedule to pay off a balance.
pub fn calculate_payoff(input: &PayoffInput) -> CalcResult<ComputationOutput<PayoffOutput>> {
    validate_input(input)?;
    let mut warnings: Vec<String> = Vec::new();

    let b = input.balance;
    let m = input.monthly_payment;
    let r = input.annual_rate / dec!(12);

    let first_interest = r * b;
    if m <= first_interest {
        debug!("payment {m} does not cover first-month interest {first_interest}");
        return Err(CalcError::DegenerateComputation(format!(
            "Monthly payment {m} does not exceed the first month's interest {first_interest}; \
             the balance never amortizes."
        )));
    }

    let exact_months = closed_form_months(b, r, m)?;
    if exact_months > Decimal::from(MAX_PAYOFF_MONTHS) {
        return Err(CalcError::ConvergenceFailure {
            function: "payoff".into(),
            iterations: MAX_PAYOFF_MONTHS,
            last_delta: exact_months,
        });
    }
    let estimate = exact_months.ceil().to_u32().unwrap_or(MAX_PAYOFF_MONTHS).max(1);
    let months = reconcile_with_recurrence(b, r, m, estimate);
    if months != estimate {
        debug!("closed form gave {estimate} months, recurrence gave {months}");
    }

    let before_last = balance_after(b, r, m, months - 1);
    let final_payment = before_last + before_last * r;

    let total_paid = m * Decimal::from(months);
    let total_interest = total_paid - b;

    if total_interest > b {
        warnings.push("Total interest exceeds the original balance.".to_string());
    }

    let payoff_date = match input.start_date {
        Some(start) => {
            let date = start.checked_add_months(Months::new(months - 1));
            if date.is_none() {
                warnings.push("Payoff date is outside the supported calendar range.".into());
            }
            date
        }
        None => None,
    };

    let required_payment = match input.target_months {
        Some(n) => Some(required_payment(b, r, n)?),
        None => None,
    };

    let schedule = if input.include_schedule {
        Some(build_schedule(b, r, m, months))
    } else {
        None
    };

    let output = PayoffOutput {
        monthly_rate: r,
        exact_months,
        months,
        years: months / 12,
        remaining_months: months % 12,
        total_paid,
        total_interest,
        final_payment,
        payoff_date,
        required_payment,
        schedule,
    };

    let assumptions = serde_json::json!({
        "monthly_rate": "annual_rate / 12",
        "months": "ceil(-ln(1 - r*B/M) / ln(1 + r))",
        "total_paid": "monthly_payment * months",
        "interest_posting": "monthly, before payment",
    });

    Ok(with_metadata(
        "Fixed-payment amortization (closed-form payoff horizon)",
        &assumptions,
        warnings,
        output,
    ))
}

/// Payment that clears `balance` in exactly `months` payments.
pub fn required_payment(balance: Money, monthly_rate: Rate, months: u32) -> CalcResult<Money> {
    if months == 0 {
        return Err(CalcError::invalid(
            "target_months",
            "Target horizon must be at least one month.",
        ));
    }
    if monthly_rate.is_zero() {
        return Ok(balance / Decimal::from(months));
    }
    let growth = (Decimal::ONE + monthly_rate).powi(months as i64);
    let denom = growth - Decimal::ONE;
    if denom.is_zero() {
        return Err(CalcError::DivisionByZero {
            context: "annuity factor in required payment".into(),
        });
    }
    Ok(monthly_rate * balance * growth / denom)
}

fn closed_form_months(b: Money, r: Rate, m: Money) -> CalcResult<Decimal> {
    if r.is_zero() {
        return Ok(b / m);
    }
    let ratio = Decimal::ONE - r * b / m;
    let num = ratio.checked_ln().ok_or_else(|| {
        CalcError::DegenerateComputation(format!("ln(1 - r*B/M) with argument {ratio}"))
    })?;
    let den = (Decimal::ONE + r).checked_ln().ok_or_else(|| {
        CalcError::DegenerateComputation("ln(1 + r)".into())
    })?;
    if den.is_zero() {
        return Err(CalcError::DivisionByZero {
            context: "ln(1 + r) in payoff horizon".into(),
        });
    }
    Ok(-num / den)
}

fn balance_after(b: Money, r: Rate, m: Money, months: u32) -> Money {
    let mut balance = b;
    for _ in 0..months {
        balance = balance + balance * r - m;
    }
    balance
}

/// Nudge the closed-form estimate by one month if rounding put it on the
/// wrong side of zero.
fn reconcile_with_recurrence(b: Money, r: Rate, m: Money, estimate: u32) -> u32 {
    if estimate > 1 && balance_after(b, r, m, estimate - 1) <= Decimal::ZERO {
        estimate - 1
    } else if balance_after(b, r, m, estimate) > Decimal::ZERO {
        estimate + 1
    } else {
        estimate
    }
}

fn build_schedule(b: Money, r: Rate, m: Money, months: u32) -> Vec<PayoffPeriod> {
    let mut schedule = Vec::with_capacity(months as usize);
    let mut opening = b;
    for month in 1..=months {
        let interest = opening * r;
        let payment = m.min(opening + interest);
        let closing = opening + interest - payment;
        schedule.push(PayoffPeriod {
            month,
            opening_balance: opening,
            interest,
            payment,
            principal: payment - interest,
            closing_balance: closing,
        });
        opening = closing;
    }
    schedule
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &PayoffInput) -> CalcResult<()> {
    if input.balance <= Decimal::ZERO {
        return Err(CalcError::invalid("balance", "Balance must be positive."));
    }
    if input.annual_rate < Decimal::ZERO {
        return Err(CalcError::invalid("annual_rate", "Rate cannot be negative."));
    }
    if input.annual_rate > dec!(10) {
        return Err(CalcError::invalid(
            "annual_rate",
            "Rate exceeds 1000% APR; pass a decimal, not a percentage.",
        ));
    }
    if input.monthly_payment <= Decimal::ZERO {
        return Err(CalcError::invalid(
            "monthly_payment",
            "Monthly payment must be positive.",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
