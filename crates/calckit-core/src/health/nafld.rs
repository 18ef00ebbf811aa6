//! Additive risk score for non-alcoholic fatty liver disease.
//!
//! The point weights are a screening heuristic, not a validated clinical
//! index such as the FLI or NAFLD fibrosis score.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::FactorContribution;
use crate::classification::{Classification, ThresholdBand, ThresholdTable};
use crate::types::*;
use crate::{CalcError, CalcResult};

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlcoholUse {
    None,
    Moderate,
    Heavy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Active,
    Moderate,
    Sedentary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NafldInput {
    pub sex: Sex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_years: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmi: Option<Decimal>,
    /// Waist circumference in centimetres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waist_cm: Option<Decimal>,
    #[serde(default)]
    pub type2_diabetes: bool,
    #[serde(default)]
    pub hypertension: bool,
    #[serde(default)]
    pub high_triglycerides: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alcohol: Option<AlcoholUse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<ActivityLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NafldRisk {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl std::fmt::Display for NafldRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Moderate => write!(f, "Moderate"),
            Self::High => write!(f, "High"),
            Self::VeryHigh => write!(f, "Very High"),
        }
    }
}

pub const NAFLD_TABLE: ThresholdTable<NafldRisk> = ThresholdTable::new(&[
    ThresholdBand {
        lower_bound: dec!(0),
        label: NafldRisk::Low,
        guidance: "Few risk factors present. Maintain a balanced diet and regular activity.",
    },
    ThresholdBand {
        lower_bound: dec!(4),
        label: NafldRisk::Moderate,
        guidance: "Several risk factors present. Consider liver enzyme tests at your next check-up.",
    },
    ThresholdBand {
        lower_bound: dec!(8),
        label: NafldRisk::High,
        guidance: "Multiple metabolic risk factors. Ask a clinician about liver ultrasound screening.",
    },
    ThresholdBand {
        lower_bound: dec!(12),
        label: NafldRisk::VeryHigh,
        guidance: "Strong risk profile. Seek medical evaluation for fatty liver disease.",
    },
]);

pub const NAFLD_MAX_SCORE: u32 = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NafldOutput {
    pub score: u32,
    pub max_score: u32,
    pub factors: Vec<FactorContribution>,
    pub risk: Classification<NafldRisk>,
}

// ---------------------------------------------------------------------------
// Points
// ---------------------------------------------------------------------------

fn age_points(age: u32) -> u32 {
    match age {
        0..=39 => 0,
        40..=49 => 1,
        50..=59 => 2,
        _ => 3,
    }
}

fn bmi_points(bmi: Decimal) -> u32 {
    if bmi >= dec!(35) {
        4
    } else if bmi >= dec!(30) {
        3
    } else if bmi >= dec!(25) {
        2
    } else {
        0
    }
}

fn waist_elevated(sex: Sex, waist_cm: Decimal) -> bool {
    match sex {
        Sex::Male => waist_cm >= dec!(102),
        Sex::Female => waist_cm >= dec!(88),
    }
}

fn alcohol_points(alcohol: AlcoholUse) -> u32 {
    match alcohol {
        AlcoholUse::None => 0,
        AlcoholUse::Moderate => 1,
        AlcoholUse::Heavy => 3,
    }
}

fn activity_points(activity: ActivityLevel) -> u32 {
    match activity {
        ActivityLevel::Active => 0,
        ActivityLevel::Moderate => 1,
        ActivityLevel::Sedentary => 2,
    }
}

// ---------------------------------------------------------------------------
// Core
// ---------------------------------------------------------------------------

pub fn calculate_nafld_risk(input: &NafldInput) -> CalcResult<ComputationOutput<NafldOutput>> {
    validate_input(input)?;
    let mut warnings: Vec<String> = Vec::new();
    let mut factors: Vec<FactorContribution> = Vec::new();
    let mut add = |factor: &str, points: u32| {
        factors.push(FactorContribution {
            factor: factor.to_string(),
            points,
        });
    };

    match input.age_years {
        Some(age) => add("age", age_points(age)),
        None => warnings.push("Age not provided; scored as 0.".into()),
    }
    match input.bmi {
        Some(bmi) => add("bmi", bmi_points(bmi)),
        None => warnings.push("BMI not provided; scored as 0.".into()),
    }
    if let Some(waist) = input.waist_cm {
        add(
            "waist_circumference",
            if waist_elevated(input.sex, waist) { 2 } else { 0 },
        );
    }
    add("type2_diabetes", if input.type2_diabetes { 3 } else { 0 });
    add("hypertension", if input.hypertension { 1 } else { 0 });
    add("high_triglycerides", if input.high_triglycerides { 2 } else { 0 });
    if let Some(alcohol) = input.alcohol {
        add("alcohol", alcohol_points(alcohol));
        if alcohol == AlcoholUse::Heavy {
            warnings.push(
                "Heavy alcohol use points to alcohol-related liver disease rather than NAFLD."
                    .into(),
            );
        }
    }
    if let Some(activity) = input.activity {
        add("physical_activity", activity_points(activity));
    }

    let score: u32 = factors.iter().map(|f| f.points).sum();

    let output = NafldOutput {
        score,
        max_score: NAFLD_MAX_SCORE,
        factors,
        risk: NAFLD_TABLE.classification(Decimal::from(score)),
    };

    let assumptions = serde_json::json!({
        "age": "<40: 0, 40-49: 1, 50-59: 2, >=60: 3",
        "bmi": "<25: 0, 25-29.9: 2, 30-34.9: 3, >=35: 4",
        "waist": "male >= 102 cm or female >= 88 cm: 2",
        "conditions": "diabetes 3, hypertension 1, triglycerides 2",
        "lifestyle": "alcohol 0/1/3, activity 0/1/2",
        "missing_inputs": "score 0",
    });

    Ok(with_metadata(
        "Additive NAFLD risk score (screening heuristic)",
        &assumptions,
        warnings,
        output,
    ))
}

fn validate_input(input: &NafldInput) -> CalcResult<()> {
    if let Some(age) = input.age_years {
        if age > 130 {
            return Err(CalcError::invalid("age_years", "Age must be at most 130."));
        }
    }
    if let Some(bmi) = input.bmi {
        if bmi <= Decimal::ZERO || bmi > dec!(100) {
            return Err(CalcError::invalid("bmi", "BMI must be in (0, 100]."));
        }
    }
    if let Some(waist) = input.waist_cm {
        if waist <= Decimal::ZERO || waist > dec!(300) {
            return Err(CalcError::invalid(
                "waist_cm",
                "Waist must be positive and given in centimetres.",
            ));
        }
    }
    Ok(())
}
