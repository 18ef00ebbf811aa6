//! Name compatibility score for entertainment use.
//!
//! The score is a pure function of the two names and the seed: letter
//! overlap sets the base and a seeded bonus supplies the "luck".

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::classification::{Classification, ThresholdBand, ThresholdTable};
use crate::types::*;
use crate::{CalcError, CalcResult};

const BASE_WEIGHT: u32 = 60;
const MAX_BONUS: u32 = 40;
const MAX_SCORE: u32 = 100;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityInput {
    pub first_name: String,
    pub second_name: String,
    /// Seed for the bonus draw. Same seed and names give the same score.
    pub seed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompatibilityBand {
    Challenging,
    Promising,
    Strong,
    Soulmates,
}

impl std::fmt::Display for CompatibilityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Challenging => write!(f, "Challenging"),
            Self::Promising => write!(f, "Promising"),
            Self::Strong => write!(f, "Strong"),
            Self::Soulmates => write!(f, "Soulmates"),
        }
    }
}

pub const COMPATIBILITY_TABLE: ThresholdTable<CompatibilityBand> = ThresholdTable::new(&[
    ThresholdBand {
        lower_bound: dec!(0),
        label: CompatibilityBand::Challenging,
        guidance: "Opposites attract, sometimes. Expect to work at it.",
    },
    ThresholdBand {
        lower_bound: dec!(40),
        label: CompatibilityBand::Promising,
        guidance: "A good foundation with room to grow.",
    },
    ThresholdBand {
        lower_bound: dec!(70),
        label: CompatibilityBand::Strong,
        guidance: "Plenty in common. The stars look favourable.",
    },
    ThresholdBand {
        lower_bound: dec!(90),
        label: CompatibilityBand::Soulmates,
        guidance: "Written in the stars.",
    },
]);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityOutput {
    /// Letters appearing in both names, lowercase and sorted.
    pub shared_letters: Vec<char>,
    pub base_score: u32,
    pub bonus: u32,
    /// Total in 0..=100.
    pub score: u32,
    pub band: Classification<CompatibilityBand>,
}

// ---------------------------------------------------------------------------
// Core
// ---------------------------------------------------------------------------

fn distinct_letters(name: &str) -> BTreeSet<char> {
    name.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

pub fn calculate_compatibility(
    input: &CompatibilityInput,
) -> CalcResult<ComputationOutput<CompatibilityOutput>> {
    let first = distinct_letters(&input.first_name);
    let second = distinct_letters(&input.second_name);
    if first.is_empty() {
        return Err(CalcError::invalid(
            "first_name",
            "Name must contain at least one ASCII letter.",
        ));
    }
    if second.is_empty() {
        return Err(CalcError::invalid(
            "second_name",
            "Name must contain at least one ASCII letter.",
        ));
    }

    let shared: Vec<char> = first.intersection(&second).copied().collect();
    let widest = first.len().max(second.len()) as u32;
    let base = shared.len() as u32 * BASE_WEIGHT / widest;

    let mut rng = StdRng::seed_from_u64(input.seed);
    let bonus: u32 = rng.gen_range(0..=MAX_BONUS);
    let score = (base + bonus).min(MAX_SCORE);

    let output = CompatibilityOutput {
        shared_letters: shared,
        base_score: base,
        bonus,
        score,
        band: COMPATIBILITY_TABLE.classification(Decimal::from(score)),
    };

    let assumptions = serde_json::json!({
        "base": "shared distinct letters * 60 / max distinct letters (case-insensitive ASCII)",
        "bonus": "StdRng seeded draw in 0..=40",
        "seed": input.seed,
    });

    Ok(with_metadata(
        "Seeded name compatibility (entertainment only)",
        &assumptions,
        vec!["For entertainment only.".into()],
        output,
    ))
}
