use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use calckit_core::health::bmi::{self, BmiInput};
use calckit_core::health::fat_mass::{self, FatMassInput};
use calckit_core::health::fracture::{self, FractureRiskInput};
use calckit_core::health::nafld::{self, ActivityLevel, AlcoholUse, NafldInput};
use calckit_core::Sex;

use crate::input;

// ---------------------------------------------------------------------------
// Flag value types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SexArg {
    Male,
    Female,
}

impl From<SexArg> for Sex {
    fn from(s: SexArg) -> Self {
        match s {
            SexArg::Male => Sex::Male,
            SexArg::Female => Sex::Female,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AlcoholArg {
    None,
    Moderate,
    Heavy,
}

impl From<AlcoholArg> for AlcoholUse {
    fn from(a: AlcoholArg) -> Self {
        match a {
            AlcoholArg::None => AlcoholUse::None,
            AlcoholArg::Moderate => AlcoholUse::Moderate,
            AlcoholArg::Heavy => AlcoholUse::Heavy,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ActivityArg {
    Active,
    Moderate,
    Sedentary,
}

impl From<ActivityArg> for ActivityLevel {
    fn from(a: ActivityArg) -> Self {
        match a {
            ActivityArg::Active => ActivityLevel::Active,
            ActivityArg::Moderate => ActivityLevel::Moderate,
            ActivityArg::Sedentary => ActivityLevel::Sedentary,
        }
    }
}

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

/// Arguments for body mass index
#[derive(Args)]
pub struct BmiArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Weight in kilograms
    #[arg(long)]
    pub weight_kg: Option<Decimal>,

    /// Height in metres
    #[arg(long)]
    pub height_m: Option<Decimal>,
}

/// Arguments for fat mass index
#[derive(Args)]
pub struct FatMassArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub sex: Option<SexArg>,

    /// Weight in kilograms
    #[arg(long)]
    pub weight_kg: Option<Decimal>,

    /// Height in metres
    #[arg(long)]
    pub height_m: Option<Decimal>,

    /// Body fat as a decimal share of weight (0.25 = 25%)
    #[arg(long, alias = "body-fat")]
    pub body_fat_fraction: Option<Decimal>,
}

/// Arguments for the NAFLD risk score
#[derive(Args)]
pub struct NafldArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub sex: Option<SexArg>,

    #[arg(long)]
    pub age: Option<u32>,

    #[arg(long)]
    pub bmi: Option<Decimal>,

    /// Waist circumference in centimetres
    #[arg(long)]
    pub waist_cm: Option<Decimal>,

    #[arg(long)]
    pub diabetes: bool,

    #[arg(long)]
    pub hypertension: bool,

    #[arg(long)]
    pub high_triglycerides: bool,

    #[arg(long)]
    pub alcohol: Option<AlcoholArg>,

    #[arg(long)]
    pub activity: Option<ActivityArg>,
}

/// Arguments for the fracture risk score
#[derive(Args)]
pub struct FractureRiskArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub sex: Option<SexArg>,

    #[arg(long)]
    pub age: Option<u32>,

    #[arg(long)]
    pub bmi: Option<Decimal>,

    #[arg(long)]
    pub prior_fracture: bool,

    #[arg(long)]
    pub parent_hip_fracture: bool,

    #[arg(long)]
    pub smoker: bool,

    #[arg(long)]
    pub glucocorticoids: bool,

    #[arg(long)]
    pub rheumatoid_arthritis: bool,

    #[arg(long)]
    pub secondary_osteoporosis: bool,

    /// Average alcohol units per day
    #[arg(long)]
    pub alcohol_units: Option<Decimal>,

    /// Femoral neck BMD T-score
    #[arg(long, allow_negative_numbers = true)]
    pub t_score: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// Runners
// ---------------------------------------------------------------------------

pub fn run_bmi(args: BmiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let bmi_input: BmiInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        BmiInput {
            weight_kg: args.weight_kg.ok_or("--weight-kg is required (or provide --input)")?,
            height_m: args.height_m.ok_or("--height-m is required (or provide --input)")?,
        }
    };

    let result = bmi::calculate_bmi(&bmi_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_fat_mass(args: FatMassArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let fm_input: FatMassInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        FatMassInput {
            sex: args.sex.ok_or("--sex is required (or provide --input)")?.into(),
            weight_kg: args.weight_kg.ok_or("--weight-kg is required (or provide --input)")?,
            height_m: args.height_m.ok_or("--height-m is required (or provide --input)")?,
            body_fat_fraction: args
                .body_fat_fraction
                .ok_or("--body-fat-fraction is required (or provide --input)")?,
        }
    };

    let result = fat_mass::calculate_fat_mass_index(&fm_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_nafld(args: NafldArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let nafld_input: NafldInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        NafldInput {
            sex: args.sex.ok_or("--sex is required (or provide --input)")?.into(),
            age_years: args.age,
            bmi: args.bmi,
            waist_cm: args.waist_cm,
            type2_diabetes: args.diabetes,
            hypertension: args.hypertension,
            high_triglycerides: args.high_triglycerides,
            alcohol: args.alcohol.map(Into::into),
            activity: args.activity.map(Into::into),
        }
    };

    let result = nafld::calculate_nafld_risk(&nafld_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_fracture_risk(args: FractureRiskArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let fracture_input: FractureRiskInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        FractureRiskInput {
            sex: args.sex.ok_or("--sex is required (or provide --input)")?.into(),
            age_years: args.age,
            bmi: args.bmi,
            prior_fracture: args.prior_fracture,
            parent_hip_fracture: args.parent_hip_fracture,
            current_smoker: args.smoker,
            glucocorticoids: args.glucocorticoids,
            rheumatoid_arthritis: args.rheumatoid_arthritis,
            secondary_osteoporosis: args.secondary_osteoporosis,
            alcohol_units_per_day: args.alcohol_units,
            bmd_t_score: args.t_score,
        }
    };

    let result = fracture::calculate_fracture_risk(&fracture_input)?;
    Ok(serde_json::to_value(result)?)
}
