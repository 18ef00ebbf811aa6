#![cfg(feature = "entertainment")]

use calckit_core::entertainment::compatibility::{self, CompatibilityInput};
use calckit_core::CalcError;
use pretty_assertions::assert_eq;

fn pair(seed: u64) -> CompatibilityInput {
    CompatibilityInput {
        first_name: "Elizabeth".into(),
        second_name: "Darcy".into(),
        seed,
    }
}

#[test]
fn test_seed_fully_determines_output() {
    for seed in [0, 1, 42, u64::MAX] {
        let a = compatibility::calculate_compatibility(&pair(seed)).unwrap();
        let b = compatibility::calculate_compatibility(&pair(seed)).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn test_base_ignores_seed() {
    let a = compatibility::calculate_compatibility(&pair(5)).unwrap();
    let b = compatibility::calculate_compatibility(&pair(6)).unwrap();
    assert_eq!(a.result.base_score, b.result.base_score);
    assert_eq!(a.result.shared_letters, b.result.shared_letters);
}

#[test]
fn test_blank_name_rejected() {
    let err = compatibility::calculate_compatibility(&CompatibilityInput {
        first_name: "   ".into(),
        ..pair(1)
    })
    .unwrap_err();
    assert!(matches!(err, CalcError::InvalidInput { .. }));
}
