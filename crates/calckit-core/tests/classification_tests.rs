//! Every threshold table in the crate maps each score to exactly one band,
//! and a score equal to a cut point lands in the band that starts there.

use std::fmt::Debug;

use calckit_core::classification::ThresholdTable;
use calckit_core::credit::merton::DEFAULT_RISK_TABLE;
use calckit_core::health::bmi::BMI_TABLE;
use calckit_core::health::fat_mass::{FEMALE_FMI_TABLE, MALE_FMI_TABLE};
use calckit_core::health::fracture::FRACTURE_TABLE;
use calckit_core::health::nafld::NAFLD_TABLE;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn check_table<L: Copy + PartialEq + Debug>(name: &str, table: &ThresholdTable<L>) {
    assert!(table.is_monotonic(), "{name} bounds must strictly increase");

    let bands = table.bands();
    for (i, band) in bands.iter().enumerate().skip(1) {
        let at = table.classify(band.lower_bound);
        assert_eq!(at.label, band.label, "{name}: cut point {}", band.lower_bound);

        let below = table.classify(band.lower_bound - dec!(0.0000001));
        assert_eq!(below.label, bands[i - 1].label, "{name}: just below {}", band.lower_bound);
    }

    assert_eq!(table.classify(dec!(-1_000_000)).label, bands[0].label, "{name}: floor");
    assert_eq!(
        table.classify(dec!(1_000_000)).label,
        bands[bands.len() - 1].label,
        "{name}: ceiling"
    );

    // Walk the whole range: the selected band index never decreases.
    let mut score = bands[0].lower_bound - Decimal::ONE;
    let top = bands[bands.len() - 1].lower_bound + Decimal::ONE;
    let step = (top - score) / dec!(500);
    let mut last_index = 0;
    while score <= top {
        let label = table.classify(score).label;
        let index = bands
            .iter()
            .position(|b| b.label == label)
            .expect("classified label belongs to the table");
        assert!(index >= last_index, "{name}: band order broke at {score}");
        last_index = index;
        score += step;
    }
}

#[test]
fn test_default_risk_table() {
    check_table("default risk", &DEFAULT_RISK_TABLE);
}

#[test]
fn test_bmi_table() {
    check_table("bmi", &BMI_TABLE);
}

#[test]
fn test_fat_mass_tables() {
    check_table("fmi male", &MALE_FMI_TABLE);
    check_table("fmi female", &FEMALE_FMI_TABLE);
}

#[test]
fn test_risk_score_tables() {
    check_table("nafld", &NAFLD_TABLE);
    check_table("fracture", &FRACTURE_TABLE);
}

#[cfg(feature = "entertainment")]
#[test]
fn test_compatibility_table() {
    check_table(
        "compatibility",
        &calckit_core::entertainment::compatibility::COMPATIBILITY_TABLE,
    );
}
