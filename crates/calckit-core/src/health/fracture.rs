//! Ten-year fracture risk score.
//!
//! Uses FRAX-style risk factors with simple additive weights. The weights
//! and the probability mapping are a simplification and do not reproduce the
//! country-calibrated FRAX model.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::FactorContribution;
use crate::classification::{Classification, ThresholdBand, ThresholdTable};
use crate::types::*;
use crate::{CalcError, CalcResult};

const PROBABILITY_PER_POINT: Decimal = dec!(0.04);
const PROBABILITY_CAP: Decimal = dec!(0.60);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FractureRiskInput {
    pub sex: Sex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_years: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmi: Option<Decimal>,
    #[serde(default)]
    pub prior_fracture: bool,
    #[serde(default)]
    pub parent_hip_fracture: bool,
    #[serde(default)]
    pub current_smoker: bool,
    #[serde(default)]
    pub glucocorticoids: bool,
    #[serde(default)]
    pub rheumatoid_arthritis: bool,
    #[serde(default)]
    pub secondary_osteoporosis: bool,
    /// Average alcohol units per day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alcohol_units_per_day: Option<Decimal>,
    /// Femoral neck BMD T-score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmd_t_score: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FractureRisk {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl std::fmt::Display for FractureRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Moderate => write!(f, "Moderate"),
            Self::High => write!(f, "High"),
            Self::VeryHigh => write!(f, "Very High"),
        }
    }
}

pub const FRACTURE_TABLE: ThresholdTable<FractureRisk> = ThresholdTable::new(&[
    ThresholdBand {
        lower_bound: dec!(0),
        label: FractureRisk::Low,
        guidance: "Low fracture risk. Keep up weight-bearing exercise, calcium and vitamin D.",
    },
    ThresholdBand {
        lower_bound: dec!(4),
        label: FractureRisk::Moderate,
        guidance: "Moderate risk. A bone density scan may refine the estimate.",
    },
    ThresholdBand {
        lower_bound: dec!(7),
        label: FractureRisk::High,
        guidance: "High risk. Discuss bone density testing and treatment with a clinician.",
    },
    ThresholdBand {
        lower_bound: dec!(10),
        label: FractureRisk::VeryHigh,
        guidance: "Very high risk. Seek medical assessment for osteoporosis treatment.",
    },
]);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FractureRiskOutput {
    pub score: u32,
    pub factors: Vec<FactorContribution>,
    /// Estimated ten-year probability of a major osteoporotic fracture.
    pub ten_year_probability: Probability,
    pub ten_year_probability_pct: Decimal,
    pub risk: Classification<FractureRisk>,
}

fn age_points(age: u32) -> u32 {
    match age {
        0..=49 => 0,
        50..=59 => 1,
        60..=69 => 2,
        70..=79 => 3,
        _ => 4,
    }
}

fn t_score_points(t: Decimal) -> u32 {
    if t <= dec!(-2.5) {
        3
    } else if t <= dec!(-1.0) {
        1
    } else {
        0
    }
}

pub fn calculate_fracture_risk(
    input: &FractureRiskInput,
) -> CalcResult<ComputationOutput<FractureRiskOutput>> {
    validate_input(input)?;
    let mut warnings: Vec<String> = Vec::new();

    let flags = [
        ("female", input.sex == Sex::Female, 1),
        ("prior_fracture", input.prior_fracture, 2),
        ("parent_hip_fracture", input.parent_hip_fracture, 1),
        ("current_smoker", input.current_smoker, 1),
        ("glucocorticoids", input.glucocorticoids, 2),
        ("rheumatoid_arthritis", input.rheumatoid_arthritis, 1),
        ("secondary_osteoporosis", input.secondary_osteoporosis, 1),
    ];

    let mut factors: Vec<FactorContribution> = Vec::new();
    match input.age_years {
        Some(age) => factors.push(FactorContribution {
            factor: "age".into(),
            points: age_points(age),
        }),
        None => warnings.push("Age not provided; scored as 0.".into()),
    }
    if let Some(bmi) = input.bmi {
        factors.push(FactorContribution {
            factor: "low_bmi".into(),
            points: if bmi < dec!(20) { 1 } else { 0 },
        });
    }
    for (factor, present, points) in flags {
        factors.push(FactorContribution {
            factor: factor.into(),
            points: if present { points } else { 0 },
        });
    }
    if let Some(units) = input.alcohol_units_per_day {
        factors.push(FactorContribution {
            factor: "alcohol".into(),
            points: if units >= dec!(3) { 1 } else { 0 },
        });
    }
    match input.bmd_t_score {
        Some(t) => factors.push(FactorContribution {
            factor: "bmd_t_score".into(),
            points: t_score_points(t),
        }),
        None => warnings.push("No bone density T-score; estimate relies on clinical factors only.".into()),
    }

    let score: u32 = factors.iter().map(|f| f.points).sum();
    let probability = (Decimal::from(score) * PROBABILITY_PER_POINT).min(PROBABILITY_CAP);

    let output = FractureRiskOutput {
        score,
        factors,
        ten_year_probability: probability,
        ten_year_probability_pct: to_percent(probability),
        risk: FRACTURE_TABLE.classification(Decimal::from(score)),
    };

    let assumptions = serde_json::json!({
        "age": "<50: 0, 50-59: 1, 60-69: 2, 70-79: 3, >=80: 4",
        "clinical_factors": "female 1, low BMI (<20) 1, prior fracture 2, parental hip 1, \
                             smoker 1, glucocorticoids 2, RA 1, secondary 1, alcohol >= 3 units 1",
        "bmd_t_score": "> -1.0: 0, <= -1.0: 1, <= -2.5: 3",
        "probability": "min(score * 4%, 60%)",
    });

    Ok(with_metadata(
        "Additive fracture risk score (FRAX-style factors)",
        &assumptions,
        warnings,
        output,
    ))
}

fn validate_input(input: &FractureRiskInput) -> CalcResult<()> {
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
    if let Some(units) = input.alcohol_units_per_day {
        if units < Decimal::ZERO {
            return Err(CalcError::invalid(
                "alcohol_units_per_day",
                "Alcohol intake cannot be negative.",
            ));
        }
    }
    if let Some(t) = input.bmd_t_score {
        if t < dec!(-10) || t > dec!(10) {
            return Err(CalcError::invalid(
                "bmd_t_score",
                "T-score must lie between -10 and 10.",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(sex: Sex) -> FractureRiskInput {
        FractureRiskInput {
            sex,
            age_years: None,
            bmi: None,
            prior_fracture: false,
            parent_hip_fracture: false,
            current_smoker: false,
            glucocorticoids: false,
            rheumatoid_arthritis: false,
            secondary_osteoporosis: false,
            alcohol_units_per_day: None,
            bmd_t_score: None,
        }
    }

    #[test]
    fn test_young_man_without_factors() {
        let out = calculate_fracture_risk(&FractureRiskInput {
            age_years: Some(35),
            ..base(Sex::Male)
        })
        .unwrap();
        assert_eq!(out.result.score, 0);
        assert_eq!(out.result.ten_year_probability, Decimal::ZERO);
        assert_eq!(out.result.risk.label, FractureRisk::Low);
    }

    #[test]
    fn test_older_woman_with_osteoporosis() {
        let out = calculate_fracture_risk(&FractureRiskInput {
            age_years: Some(72),
            bmi: Some(dec!(19)),
            prior_fracture: true,
            bmd_t_score: Some(dec!(-2.7)),
            ..base(Sex::Female)
        })
        .unwrap();
        // age 3 + female 1 + bmi 1 + prior 2 + t-score 3
        assert_eq!(out.result.score, 10);
        assert_eq!(out.result.ten_year_probability, dec!(0.40));
        assert_eq!(out.result.ten_year_probability_pct, dec!(40));
        assert_eq!(out.result.risk.label, FractureRisk::VeryHigh);
    }

    #[test]
    fn test_probability_is_capped() {
        let out = calculate_fracture_risk(&FractureRiskInput {
            age_years: Some(85),
            bmi: Some(dec!(18)),
            prior_fracture: true,
            parent_hip_fracture: true,
            current_smoker: true,
            glucocorticoids: true,
            rheumatoid_arthritis: true,
            secondary_osteoporosis: true,
            alcohol_units_per_day: Some(dec!(4)),
            bmd_t_score: Some(dec!(-3)),
            ..base(Sex::Female)
        })
        .unwrap();
        assert_eq!(out.result.score, 18);
        assert_eq!(out.result.ten_year_probability, PROBABILITY_CAP);
    }

    #[test]
    fn test_t_score_edges() {
        assert_eq!(t_score_points(dec!(-0.9)), 0);
        assert_eq!(t_score_points(dec!(-1.0)), 1);
        assert_eq!(t_score_points(dec!(-2.5)), 3);
    }

    #[test]
    fn test_reject_negative_alcohol() {
        assert!(calculate_fracture_risk(&FractureRiskInput {
            alcohol_units_per_day: Some(dec!(-1)),
            ..base(Sex::Male)
        })
        .is_err());
    }
}
