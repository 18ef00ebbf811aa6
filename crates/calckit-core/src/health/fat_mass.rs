//! Fat mass index (FMI) and fat-free mass index (FFMI).
//!
//! FMI = fat mass / height^2 with sex-specific bands (Kelly et al., 2009).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::classification::{Classification, ThresholdBand, ThresholdTable};
use crate::types::*;
use crate::{CalcError, CalcResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FatMassInput {
    pub sex: Sex,
    pub weight_kg: Decimal,
    pub height_m: Decimal,
    /// Body fat as a decimal share of weight (0.25 = 25%).
    pub body_fat_fraction: Rate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FatMassCategory {
    FatDeficit,
    Normal,
    ExcessFat,
    ObeseClassI,
    ObeseClassII,
    ObeseClassIII,
}

impl std::fmt::Display for FatMassCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FatDeficit => write!(f, "Fat deficit"),
            Self::Normal => write!(f, "Normal"),
            Self::ExcessFat => write!(f, "Excess fat"),
            Self::ObeseClassI => write!(f, "Obese (Class I)"),
            Self::ObeseClassII => write!(f, "Obese (Class II)"),
            Self::ObeseClassIII => write!(f, "Obese (Class III)"),
        }
    }
}

const DEFICIT: &str = "Fat mass is below the healthy range.";
const NORMAL: &str = "Fat mass is within the healthy range.";
const EXCESS: &str = "Fat mass is above the healthy range.";
const OBESE_I: &str = "Obesity, class I; health risks are increased.";
const OBESE_II: &str = "Obesity, class II; health risks are high.";
const OBESE_III: &str = "Obesity, class III; health risks are very high.";

pub const MALE_FMI_TABLE: ThresholdTable<FatMassCategory> = ThresholdTable::new(&[
    ThresholdBand { lower_bound: dec!(0), label: FatMassCategory::FatDeficit, guidance: DEFICIT },
    ThresholdBand { lower_bound: dec!(3), label: FatMassCategory::Normal, guidance: NORMAL },
    ThresholdBand { lower_bound: dec!(6), label: FatMassCategory::ExcessFat, guidance: EXCESS },
    ThresholdBand { lower_bound: dec!(9), label: FatMassCategory::ObeseClassI, guidance: OBESE_I },
    ThresholdBand { lower_bound: dec!(12), label: FatMassCategory::ObeseClassII, guidance: OBESE_II },
    ThresholdBand { lower_bound: dec!(15), label: FatMassCategory::ObeseClassIII, guidance: OBESE_III },
]);

pub const FEMALE_FMI_TABLE: ThresholdTable<FatMassCategory> = ThresholdTable::new(&[
    ThresholdBand { lower_bound: dec!(0), label: FatMassCategory::FatDeficit, guidance: DEFICIT },
    ThresholdBand { lower_bound: dec!(5), label: FatMassCategory::Normal, guidance: NORMAL },
    ThresholdBand { lower_bound: dec!(9), label: FatMassCategory::ExcessFat, guidance: EXCESS },
    ThresholdBand { lower_bound: dec!(13), label: FatMassCategory::ObeseClassI, guidance: OBESE_I },
    ThresholdBand { lower_bound: dec!(17), label: FatMassCategory::ObeseClassII, guidance: OBESE_II },
    ThresholdBand { lower_bound: dec!(21), label: FatMassCategory::ObeseClassIII, guidance: OBESE_III },
]);

pub fn fmi_table(sex: Sex) -> &'static ThresholdTable<FatMassCategory> {
    match sex {
        Sex::Male => &MALE_FMI_TABLE,
        Sex::Female => &FEMALE_FMI_TABLE,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatMassOutput {
    pub fat_mass_kg: Decimal,
    pub lean_mass_kg: Decimal,
    pub fat_mass_index: Decimal,
    pub fat_free_mass_index: Decimal,
    pub category: Classification<FatMassCategory>,
}

pub fn calculate_fat_mass_index(input: &FatMassInput) -> CalcResult<ComputationOutput<FatMassOutput>> {
    validate_input(input)?;

    let h2 = input.height_m * input.height_m;
    let fat_mass = input.weight_kg * input.body_fat_fraction;
    let lean_mass = input.weight_kg - fat_mass;
    let fmi = fat_mass / h2;
    let ffmi = lean_mass / h2;

    let output = FatMassOutput {
        fat_mass_kg: fat_mass.round_dp(2),
        lean_mass_kg: lean_mass.round_dp(2),
        fat_mass_index: fmi.round_dp(2),
        fat_free_mass_index: ffmi.round_dp(2),
        category: fmi_table(input.sex).classification(fmi),
    };

    let assumptions = serde_json::json!({
        "fmi": "weight_kg * body_fat_fraction / height_m^2",
        "ffmi": "weight_kg * (1 - body_fat_fraction) / height_m^2",
        "bands": format!("{} cut points", input.sex),
    });

    Ok(with_metadata(
        "Fat mass index",
        &assumptions,
        Vec::new(),
        output,
    ))
}

fn validate_input(input: &FatMassInput) -> CalcResult<()> {
    if input.weight_kg <= Decimal::ZERO {
        return Err(CalcError::invalid("weight_kg", "Weight must be positive."));
    }
    if input.height_m <= Decimal::ZERO || input.height_m > dec!(3) {
        return Err(CalcError::invalid(
            "height_m",
            "Height must be positive and given in metres.",
        ));
    }
    if input.body_fat_fraction < Decimal::ZERO || input.body_fat_fraction >= Decimal::ONE {
        return Err(CalcError::invalid(
            "body_fat_fraction",
            "Must be a decimal in [0, 1).",
        ));
    }
    Ok(())
}
