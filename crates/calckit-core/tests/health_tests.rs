use calckit_core::health::bmi::{self, BmiCategory, BmiInput};
use calckit_core::health::fat_mass::{self, FatMassInput};
use calckit_core::health::fracture::{self, FractureRiskInput};
use calckit_core::health::nafld::{self, ActivityLevel, AlcoholUse, NafldInput, NafldRisk};
use calckit_core::Sex;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// BMI and fat mass
// ===========================================================================

#[test]
fn test_bmi_band_sweep() {
    let cases = [
        (dec!(50), BmiCategory::Underweight),
        (dec!(60), BmiCategory::Normal),
        (dec!(80), BmiCategory::Overweight),
        (dec!(95), BmiCategory::ObeseClassI),
        (dec!(110), BmiCategory::ObeseClassII),
        (dec!(130), BmiCategory::ObeseClassIII),
    ];
    for (weight, expected) in cases {
        let out = bmi::calculate_bmi(&BmiInput {
            weight_kg: weight,
            height_m: dec!(1.75),
        })
        .unwrap();
        assert_eq!(out.result.category.label, expected, "weight {weight}");
    }
}

#[test]
fn test_fat_and_lean_mass_add_up() {
    let out = fat_mass::calculate_fat_mass_index(&FatMassInput {
        sex: Sex::Female,
        weight_kg: dec!(64),
        height_m: dec!(1.68),
        body_fat_fraction: dec!(0.30),
    })
    .unwrap();
    assert_eq!(out.result.fat_mass_kg + out.result.lean_mass_kg, dec!(64));
}

// ===========================================================================
// Additive risk scores
// ===========================================================================

fn nafld_profile() -> NafldInput {
    NafldInput {
        sex: Sex::Male,
        age_years: Some(55),
        bmi: Some(dec!(31)),
        waist_cm: Some(dec!(104)),
        type2_diabetes: true,
        hypertension: false,
        high_triglycerides: false,
        alcohol: Some(AlcoholUse::None),
        activity: Some(ActivityLevel::Active),
    }
}

#[test]
fn test_nafld_factor_breakdown_sums_to_score() {
    let out = nafld::calculate_nafld_risk(&nafld_profile()).unwrap();
    // age 2 + bmi 3 + waist 2 + diabetes 3
    assert_eq!(out.result.score, 10);
    assert_eq!(out.result.risk.label, NafldRisk::High);
    let total: u32 = out.result.factors.iter().map(|f| f.points).sum();
    assert_eq!(total, out.result.score);
}

#[test]
fn test_nafld_each_added_factor_never_lowers_score() {
    let base = nafld::calculate_nafld_risk(&nafld_profile()).unwrap().result.score;
    let worse = nafld::calculate_nafld_risk(&NafldInput {
        hypertension: true,
        activity: Some(ActivityLevel::Sedentary),
        ..nafld_profile()
    })
    .unwrap()
    .result
    .score;
    assert_eq!(worse, base + 3);
}

#[test]
fn test_fracture_probability_tracks_score() {
    let out = fracture::calculate_fracture_risk(&FractureRiskInput {
        sex: Sex::Female,
        age_years: Some(65),
        bmi: Some(dec!(24)),
        prior_fracture: false,
        parent_hip_fracture: true,
        current_smoker: false,
        glucocorticoids: false,
        rheumatoid_arthritis: false,
        secondary_osteoporosis: false,
        alcohol_units_per_day: Some(dec!(1)),
        bmd_t_score: Some(dec!(-1.5)),
    })
    .unwrap();
    // age 2 + female 1 + parent 1 + t-score 1
    assert_eq!(out.result.score, 5);
    assert_eq!(
        out.result.ten_year_probability,
        Decimal::from(out.result.score) * dec!(0.04)
    );
    assert!(out.warnings.is_empty());
}

#[test]
fn test_health_kernels_are_idempotent() {
    let a = nafld::calculate_nafld_risk(&nafld_profile()).unwrap();
    let b = nafld::calculate_nafld_risk(&nafld_profile()).unwrap();
    assert_eq!(a, b);

    let input = BmiInput {
        weight_kg: dec!(72.5),
        height_m: dec!(1.81),
    };
    assert_eq!(bmi::calculate_bmi(&input).unwrap(), bmi::calculate_bmi(&input).unwrap());
}
