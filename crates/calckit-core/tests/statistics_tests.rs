use calckit_core::statistics::correlation::{self, CorrelationInput};
use calckit_core::CalcError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Correlation matrix
// ===========================================================================

fn sample_rows() -> Vec<Vec<Decimal>> {
    vec![
        vec![dec!(1), dec!(2.1), dec!(9), dec!(4)],
        vec![dec!(2), dec!(3.9), dec!(7), dec!(1)],
        vec![dec!(3), dec!(6.2), dec!(6), dec!(5)],
        vec![dec!(4), dec!(8.1), dec!(3), dec!(2)],
        vec![dec!(5), dec!(9.8), dec!(1), dec!(3)],
    ]
}

#[test]
fn test_matrix_is_symmetric_bounded_with_unit_diagonal() {
    let matrix = correlation::correlation_matrix(&sample_rows()).unwrap();
    let k = matrix.len();
    assert_eq!(k, 4);
    for i in 0..k {
        assert_eq!(matrix[i][i], Decimal::ONE);
        for j in 0..k {
            assert_eq!(matrix[i][j], matrix[j][i]);
            assert!(matrix[i][j] >= -Decimal::ONE && matrix[i][j] <= Decimal::ONE);
        }
    }
}

#[test]
fn test_scaled_and_negated_columns() {
    let rows: Vec<Vec<Decimal>> = (1..=6)
        .map(|i| {
            let x = Decimal::from(i);
            vec![x, x * dec!(3) + dec!(2), -x]
        })
        .collect();
    let matrix = correlation::correlation_matrix(&rows).unwrap();
    assert_eq!(matrix[0][1], Decimal::ONE);
    assert_eq!(matrix[0][2], -Decimal::ONE);
}

#[test]
fn test_named_columns_and_pairs() {
    let out = correlation::calculate_correlation_matrix(&CorrelationInput {
        columns: Some(vec!["a".into(), "b".into(), "c".into(), "d".into()]),
        rows: sample_rows(),
    })
    .unwrap();
    let r = &out.result;
    assert_eq!(r.columns, vec!["a", "b", "c", "d"]);
    assert_eq!(r.observations, 5);
    assert_eq!(r.variables.len(), 4);

    let pos = r.strongest_positive_pair.as_ref().unwrap();
    assert_eq!((pos.first.as_str(), pos.second.as_str()), ("a", "b"));
    let neg = r.strongest_negative_pair.as_ref().unwrap();
    assert!(neg.correlation < Decimal::ZERO);
}

#[test]
fn test_linkage_matches_matrix() {
    let matrix = correlation::correlation_matrix(&sample_rows()).unwrap();
    let linkage = correlation::average_linkage(&matrix);
    let expected: Decimal =
        (matrix[0][1].abs() + matrix[0][2].abs() + matrix[0][3].abs()) / dec!(3);
    assert!((linkage[0] - expected).abs() < dec!(0.0000000001));
}

#[test]
fn test_single_row_is_insufficient() {
    let err = correlation::correlation_matrix(&[vec![dec!(1), dec!(2)]]).unwrap_err();
    assert!(matches!(err, CalcError::InsufficientData(_)));
}

#[test]
fn test_ragged_rows_rejected() {
    let rows = vec![vec![dec!(1), dec!(2)], vec![dec!(3)]];
    let err = correlation::correlation_matrix(&rows).unwrap_err();
    assert!(matches!(err, CalcError::InvalidInput { .. }));
}

#[test]
fn test_correlation_is_idempotent() {
    let input = CorrelationInput {
        columns: None,
        rows: sample_rows(),
    };
    let a = correlation::calculate_correlation_matrix(&input).unwrap();
    let b = correlation::calculate_correlation_matrix(&input).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_large_magnitude_table_does_not_overflow() {
    let rows = vec![
        vec![dec!(1_000_000_000_000_000), dec!(2)],
        vec![dec!(-1_000_000_000_000_000), dec!(5)],
        vec![dec!(3_000_000_000_000_000), dec!(1)],
    ];
    let out = correlation::calculate_correlation_matrix(&CorrelationInput {
        columns: None,
        rows,
    })
    .unwrap();
    let r = out.result.matrix[0][1];
    assert!(r < Decimal::ZERO && r >= -Decimal::ONE);
    // sample std of (1, -1, 3) x 1e15 is 2e15
    let sd = out.result.variables[0].std_dev;
    assert!((sd - dec!(2_000_000_000_000_000)).abs() < Decimal::ONE, "got {sd}");
}
