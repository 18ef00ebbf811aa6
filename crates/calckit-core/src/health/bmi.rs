use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::classification::{Classification, ThresholdBand, ThresholdTable};
use crate::types::*;
use crate::{CalcError, CalcResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmiInput {
    pub weight_kg: Decimal,
    pub height_m: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    ObeseClassI,
    ObeseClassII,
    ObeseClassIII,
}

impl std::fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Underweight => write!(f, "Underweight"),
            Self::Normal => write!(f, "Normal weight"),
            Self::Overweight => write!(f, "Overweight"),
            Self::ObeseClassI => write!(f, "Obese (Class I)"),
            Self::ObeseClassII => write!(f, "Obese (Class II)"),
            Self::ObeseClassIII => write!(f, "Obese (Class III)"),
        }
    }
}

/// WHO adult cut points.
pub const BMI_TABLE: ThresholdTable<BmiCategory> = ThresholdTable::new(&[
    ThresholdBand {
        lower_bound: dec!(0),
        label: BmiCategory::Underweight,
        guidance: "Below the healthy range; discuss nutrition with a clinician.",
    },
    ThresholdBand {
        lower_bound: dec!(18.5),
        label: BmiCategory::Normal,
        guidance: "Within the healthy range.",
    },
    ThresholdBand {
        lower_bound: dec!(25),
        label: BmiCategory::Overweight,
        guidance: "Above the healthy range; activity and diet changes lower risk.",
    },
    ThresholdBand {
        lower_bound: dec!(30),
        label: BmiCategory::ObeseClassI,
        guidance: "Increased cardiometabolic risk.",
    },
    ThresholdBand {
        lower_bound: dec!(35),
        label: BmiCategory::ObeseClassII,
        guidance: "High cardiometabolic risk; medical guidance recommended.",
    },
    ThresholdBand {
        lower_bound: dec!(40),
        label: BmiCategory::ObeseClassIII,
        guidance: "Very high risk; seek medical guidance.",
    },
]);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiOutput {
    pub bmi: Decimal,
    pub category: Classification<BmiCategory>,
    /// Weight range (kg) giving a BMI of 18.5 to 25 at this height.
    pub healthy_weight_min_kg: Decimal,
    pub healthy_weight_max_kg: Decimal,
}

/// weight / height^2, without the classification envelope.
pub fn body_mass_index(weight_kg: Decimal, height_m: Decimal) -> CalcResult<Decimal> {
    if weight_kg <= Decimal::ZERO {
        return Err(CalcError::invalid("weight_kg", "Weight must be positive."));
    }
    if height_m <= Decimal::ZERO {
        return Err(CalcError::invalid("height_m", "Height must be positive."));
    }
    if height_m > dec!(3) {
        return Err(CalcError::invalid(
            "height_m",
            "Height exceeds 3 m; pass metres, not centimetres.",
        ));
    }
    Ok(weight_kg / (height_m * height_m))
}

pub fn calculate_bmi(input: &BmiInput) -> CalcResult<ComputationOutput<BmiOutput>> {
    let bmi = body_mass_index(input.weight_kg, input.height_m)?;
    let h2 = input.height_m * input.height_m;

    let output = BmiOutput {
        bmi: bmi.round_dp(2),
        category: BMI_TABLE.classification(bmi),
        healthy_weight_min_kg: (dec!(18.5) * h2).round_dp(1),
        healthy_weight_max_kg: (dec!(25) * h2).round_dp(1),
    };

    let assumptions = serde_json::json!({
        "formula": "weight_kg / height_m^2",
        "cut_points": "WHO adult",
    });

    Ok(with_metadata(
        "Body mass index",
        &assumptions,
        Vec::new(),
        output,
    ))
}
