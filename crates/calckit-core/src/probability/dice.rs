//! Exact dice-sum combinatorics.
//!
//! Counts the ways `n` six-sided dice can land on a given total with a
//! dynamic-programming table over (dice, sum). All counting is done in
//! `u64`; 6^10 is well inside range.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::*;
use crate::{CalcError, CalcResult};

pub const MIN_DICE: u32 = 1;
pub const MAX_DICE: u32 = 10;
const FACES: u32 = 6;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiceInput {
    /// Number of six-sided dice (1 to 10).
    pub dice_count: u32,
    /// Total to count outcomes for. Unreachable totals yield zero ways.
    pub target_sum: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SumOutcome {
    pub sum: u32,
    pub ways: u64,
    pub probability: Probability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiceOutput {
    pub ways: u64,
    pub total_outcomes: u64,
    pub probability: Probability,
    /// Probability as a percentage, rounded to 4 dp.
    pub probability_pct: Decimal,
    /// P(total >= target_sum)
    pub probability_at_least: Probability,
    /// P(total <= target_sum)
    pub probability_at_most: Probability,
    pub min_sum: u32,
    pub max_sum: u32,
    pub most_likely_sums: Vec<u32>,
    pub distribution: Vec<SumOutcome>,
}

// ---------------------------------------------------------------------------
// Core
// ---------------------------------------------------------------------------

/// Number of ways `dice_count` dice sum to `target_sum`.
///
/// Returns 0 for unreachable totals, including `target_sum == 0`.
pub fn count_ways(dice_count: u32, target_sum: u32) -> CalcResult<u64> {
    validate_dice_count(dice_count)?;
    if target_sum < dice_count || target_sum > dice_count * FACES {
        return Ok(0);
    }
    let table = ways_table(dice_count, target_sum);
    Ok(table[dice_count as usize][target_sum as usize])
}

/// Compute the count, probability and full distribution for a dice total.
pub fn calculate_dice_probability(input: &DiceInput) -> CalcResult<ComputationOutput<DiceOutput>> {
    validate_dice_count(input.dice_count)?;
    let mut warnings: Vec<String> = Vec::new();

    let n = input.dice_count;
    let min_sum = n;
    let max_sum = n * FACES;
    let total_outcomes = (FACES as u64).pow(n);
    let total_dec = Decimal::from(total_outcomes);

    let table = ways_table(n, max_sum);
    let row = &table[n as usize];

    let distribution: Vec<SumOutcome> = (min_sum..=max_sum)
        .map(|s| {
            let ways = row[s as usize];
            SumOutcome {
                sum: s,
                ways,
                probability: Decimal::from(ways) / total_dec,
            }
        })
        .collect();

    let reachable = input.target_sum >= min_sum && input.target_sum <= max_sum;
    if !reachable {
        warnings.push(format!(
            "Target sum {} is unreachable with {} dice (range {}..={}).",
            input.target_sum, n, min_sum, max_sum
        ));
    }

    let ways = if reachable {
        row[input.target_sum as usize]
    } else {
        0
    };
    let at_least: u64 = distribution
        .iter()
        .filter(|o| o.sum >= input.target_sum)
        .map(|o| o.ways)
        .sum();
    let at_most: u64 = distribution
        .iter()
        .filter(|o| o.sum <= input.target_sum)
        .map(|o| o.ways)
        .sum();

    let peak = distribution.iter().map(|o| o.ways).max().unwrap_or(0);
    let most_likely_sums = distribution
        .iter()
        .filter(|o| o.ways == peak)
        .map(|o| o.sum)
        .collect();

    let probability = Decimal::from(ways) / total_dec;

    let output = DiceOutput {
        ways,
        total_outcomes,
        probability,
        probability_pct: to_percent(probability),
        probability_at_least: Decimal::from(at_least) / total_dec,
        probability_at_most: Decimal::from(at_most) / total_dec,
        min_sum,
        max_sum,
        most_likely_sums,
        distribution,
    };

    let assumptions = serde_json::json!({
        "faces": FACES,
        "recurrence": "ways[d][s] = sum_{f=1..6, f<s} ways[d-1][s-f]",
        "fair_dice": true,
    });

    Ok(with_metadata(
        "Dynamic-programming dice-sum enumeration",
        &assumptions,
        warnings,
        output,
    ))
}

/// Build `ways[d][s]` for `d` in `0..=dice_count`, `s` in `0..=max_sum`.
fn ways_table(dice_count: u32, max_sum: u32) -> Vec<Vec<u64>> {
    let n = dice_count as usize;
    let width = max_sum as usize + 1;
    let mut ways = vec![vec![0u64; width]; n + 1];

    for s in 1..width.min(FACES as usize + 1) {
        ways[1][s] = 1;
    }
    for d in 2..=n {
        for s in 1..width {
            let mut total = 0u64;
            for f in 1..=FACES as usize {
                if f < s {
                    total += ways[d - 1][s - f];
                }
            }
            ways[d][s] = total;
        }
    }
    ways
}

fn validate_dice_count(dice_count: u32) -> CalcResult<()> {
    if !(MIN_DICE..=MAX_DICE).contains(&dice_count) {
        return Err(CalcError::InvalidInput {
            field: "dice_count".into(),
            reason: format!("Must be between {MIN_DICE} and {MAX_DICE}."),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
