//! Pearson correlation matrix over a table of observations.
//!
//! Rows are observations, columns are variables. Standard deviations and
//! covariances use the Bessel-corrected (n - 1) divisor. Matrix entries are
//! clamped to [-1, 1] and rounded to 12 decimal places so that identical or
//! mirrored columns report exactly 1 or -1.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::*;
use crate::{CalcError, CalcResult};

const MATRIX_DP: u32 = 12;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationInput {
    /// Optional variable names, one per column. Defaults to `x1..xn`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    /// Observations: every row must have the same number of values.
    pub rows: Vec<Vec<Decimal>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSummary {
    pub name: String,
    pub mean: Decimal,
    pub std_dev: Decimal,
    /// Mean absolute correlation with every other variable.
    pub average_linkage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelatedPair {
    pub first: String,
    pub second: String,
    pub correlation: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationOutput {
    pub columns: Vec<String>,
    pub observations: usize,
    pub matrix: Vec<Vec<Decimal>>,
    pub variables: Vec<VariableSummary>,
    /// Variable with the highest average linkage (first wins ties).
    pub most_linked: String,
    /// Variable with the lowest average linkage (first wins ties).
    pub least_linked: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strongest_positive_pair: Option<CorrelatedPair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strongest_negative_pair: Option<CorrelatedPair>,
}

// ---------------------------------------------------------------------------
// Core
// ---------------------------------------------------------------------------

/// Build the correlation matrix and per-variable linkage summary.
pub fn calculate_correlation_matrix(
    input: &CorrelationInput,
) -> CalcResult<ComputationOutput<CorrelationOutput>> {
    let n_cols = validate_table(input)?;
    let mut warnings: Vec<String> = Vec::new();

    let columns: Vec<String> = match &input.columns {
        Some(names) => names.clone(),
        None => (1..=n_cols).map(|i| format!("x{i}")).collect(),
    };

    let stats = column_stats(&input.rows, n_cols)?;

    for (name, col) in columns.iter().zip(&stats) {
        if col.std_dev.is_zero() {
            warnings.push(format!(
                "Column '{name}' is constant; its correlations are reported as 0."
            ));
        }
    }

    let matrix = correlation_matrix_from(&stats);

    let linkage = average_linkage(&matrix);
    let variables: Vec<VariableSummary> = columns
        .iter()
        .enumerate()
        .map(|(i, name)| VariableSummary {
            name: name.clone(),
            mean: stats[i].mean,
            std_dev: stats[i].std_dev,
            average_linkage: linkage[i],
        })
        .collect();

    let (most_idx, least_idx) = linkage_extremes(&linkage);
    let (strongest_positive_pair, strongest_negative_pair) = strongest_pairs(&matrix, &columns);

    let output = CorrelationOutput {
        most_linked: columns[most_idx].clone(),
        least_linked: columns[least_idx].clone(),
        columns,
        observations: input.rows.len(),
        matrix,
        variables,
        strongest_positive_pair,
        strongest_negative_pair,
    };

    let assumptions = serde_json::json!({
        "estimator": "Pearson, Bessel-corrected (n - 1)",
        "zero_variance": "correlation defined as 0",
        "clamp": "[-1, 1]",
        "rounding_dp": MATRIX_DP,
    });

    Ok(with_metadata(
        "Pearson correlation matrix",
        &assumptions,
        warnings,
        output,
    ))
}

/// Correlation matrix only, for callers that do not need the summary.
pub fn correlation_matrix(rows: &[Vec<Decimal>]) -> CalcResult<Vec<Vec<Decimal>>> {
    let input = CorrelationInput {
        columns: None,
        rows: rows.to_vec(),
    };
    let n_cols = validate_table(&input)?;
    let stats = column_stats(rows, n_cols)?;
    Ok(correlation_matrix_from(&stats))
}

/// Per-column moments. Deviations are kept divided by the column's largest
/// absolute deviation, so every accumulated product lies in [-1, 1] and
/// large-magnitude data cannot overflow.
struct ColumnStats {
    mean: Decimal,
    std_dev: Decimal,
    unit_deviations: Vec<Decimal>,
    unit_std_dev: Decimal,
}

fn column_stats(rows: &[Vec<Decimal>], n_cols: usize) -> CalcResult<Vec<ColumnStats>> {
    (0..n_cols)
        .map(|c| {
            let values: Vec<Decimal> = rows.iter().map(|r| r[c]).collect();
            summarize_column(&values)
        })
        .collect()
}

fn summarize_column(values: &[Decimal]) -> CalcResult<ColumnStats> {
    let mean = mean(values);
    let deviations: Vec<Decimal> = values
        .iter()
        .map(|v| {
            v.checked_sub(mean).ok_or_else(|| {
                CalcError::DegenerateComputation(format!("deviation of {v} from mean {mean}"))
            })
        })
        .collect::<CalcResult<_>>()?;

    let scale = deviations
        .iter()
        .map(|d| d.abs())
        .max()
        .unwrap_or(Decimal::ZERO);
    if scale.is_zero() {
        return Ok(ColumnStats {
            mean,
            std_dev: Decimal::ZERO,
            unit_deviations: vec![Decimal::ZERO; values.len()],
            unit_std_dev: Decimal::ZERO,
        });
    }

    let unit_deviations: Vec<Decimal> = deviations.iter().map(|d| *d / scale).collect();
    let ss: Decimal = unit_deviations.iter().map(|u| *u * *u).sum();
    let variance = ss / bessel_divisor(values.len());
    let unit_std_dev = variance.sqrt().ok_or_else(|| {
        CalcError::DegenerateComputation(format!("square root of variance {variance}"))
    })?;
    let std_dev = scale.checked_mul(unit_std_dev).ok_or_else(|| {
        CalcError::DegenerateComputation(format!("standard deviation at scale {scale}"))
    })?;

    Ok(ColumnStats {
        mean,
        std_dev,
        unit_deviations,
        unit_std_dev,
    })
}

fn correlation_matrix_from(stats: &[ColumnStats]) -> Vec<Vec<Decimal>> {
    let k = stats.len();
    let mut matrix = vec![vec![Decimal::ZERO; k]; k];
    for a in 0..k {
        matrix[a][a] = Decimal::ONE;
        for b in (a + 1)..k {
            let (x, y) = (&stats[a], &stats[b]);
            let r = if x.unit_std_dev.is_zero() || y.unit_std_dev.is_zero() {
                Decimal::ZERO
            } else {
                let cov = unit_covariance(&x.unit_deviations, &y.unit_deviations);
                clamp_unit(cov / (x.unit_std_dev * y.unit_std_dev)).round_dp(MATRIX_DP)
            };
            matrix[a][b] = r;
            matrix[b][a] = r;
        }
    }
    matrix
}

/// Arithmetic mean. Falls back to summing `v / n` when the plain sum would
/// overflow.
fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let n = Decimal::from(values.len() as u64);
    match values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
    {
        Some(sum) => sum / n,
        None => values.iter().map(|v| *v / n).sum(),
    }
}

fn bessel_divisor(n: usize) -> Decimal {
    Decimal::from(n.saturating_sub(1).max(1) as u64)
}

fn unit_covariance(a: &[Decimal], b: &[Decimal]) -> Decimal {
    let sum: Decimal = a.iter().zip(b).map(|(x, y)| *x * *y).sum();
    sum / bessel_divisor(a.len())
}

fn clamp_unit(x: Decimal) -> Decimal {
    x.max(dec!(-1)).min(Decimal::ONE)
}

/// Mean absolute off-diagonal correlation per variable.
pub fn average_linkage(matrix: &[Vec<Decimal>]) -> Vec<Decimal> {
    let k = matrix.len();
    if k < 2 {
        return vec![Decimal::ZERO; k];
    }
    let others = Decimal::from((k - 1) as u64);
    (0..k)
        .map(|i| {
            let sum: Decimal = (0..k)
                .filter(|j| *j != i)
                .map(|j| matrix[i][j].abs())
                .sum();
            sum / others
        })
        .collect()
}

/// Indices of the highest and lowest linkage, first occurrence winning ties.
fn linkage_extremes(linkage: &[Decimal]) -> (usize, usize) {
    let mut most = 0;
    let mut least = 0;
    for (i, v) in linkage.iter().enumerate() {
        if *v > linkage[most] {
            most = i;
        }
        if *v < linkage[least] {
            least = i;
        }
    }
    (most, least)
}

fn strongest_pairs(
    matrix: &[Vec<Decimal>],
    columns: &[String],
) -> (Option<CorrelatedPair>, Option<CorrelatedPair>) {
    let mut positive: Option<(usize, usize)> = None;
    let mut negative: Option<(usize, usize)> = None;
    for a in 0..matrix.len() {
        for b in (a + 1)..matrix.len() {
            let r = matrix[a][b];
            if r > Decimal::ZERO && positive.map_or(true, |(i, j)| r > matrix[i][j]) {
                positive = Some((a, b));
            }
            if r < Decimal::ZERO && negative.map_or(true, |(i, j)| r < matrix[i][j]) {
                negative = Some((a, b));
            }
        }
    }
    let pair = |(a, b): (usize, usize)| CorrelatedPair {
        first: columns[a].clone(),
        second: columns[b].clone(),
        correlation: matrix[a][b],
    };
    (positive.map(pair), negative.map(pair))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_table(input: &CorrelationInput) -> CalcResult<usize> {
    if input.rows.len() < 2 {
        return Err(CalcError::InsufficientData(
            "Correlation requires at least 2 observations.".into(),
        ));
    }
    let n_cols = input.rows[0].len();
    if n_cols < 2 {
        return Err(CalcError::InsufficientData(
            "Correlation requires at least 2 variables.".into(),
        ));
    }
    if let Some(i) = input.rows.iter().position(|r| r.len() != n_cols) {
        return Err(CalcError::InvalidInput {
            field: "rows".into(),
            reason: format!(
                "Row {} has {} values, expected {}.",
                i,
                input.rows[i].len(),
                n_cols
            ),
        });
    }
    if let Some(names) = &input.columns {
        if names.len() != n_cols {
            return Err(CalcError::InvalidInput {
                field: "columns".into(),
                reason: format!("{} names given for {} columns.", names.len(), n_cols),
            });
        }
    }
    Ok(n_cols)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Vec<Vec<Decimal>> {
        vec![
            vec![dec!(1), dec!(2), dec!(9), dec!(4)],
            vec![dec!(2), dec!(4), dec!(7), dec!(4)],
            vec![dec!(3), dec!(6), dec!(8), dec!(5)],
            vec![dec!(4), dec!(8), dec!(3), dec!(4)],
            vec![dec!(5), dec!(10), dec!(1), dec!(6)],
        ]
    }

    #[test]
    fn test_diagonal_is_one() {
        let m = correlation_matrix(&table()).unwrap();
        for (i, row) in m.iter().enumerate() {
            assert_eq!(row[i], Decimal::ONE);
        }
    }

    #[test]
    fn test_symmetric_and_bounded() {
        let m = correlation_matrix(&table()).unwrap();
        for i in 0..m.len() {
            for j in 0..m.len() {
                assert_eq!(m[i][j], m[j][i]);
                assert!(m[i][j] >= dec!(-1) && m[i][j] <= Decimal::ONE);
            }
        }
    }

    #[test]
    fn test_scaled_column_is_perfectly_correlated() {
        let m = correlation_matrix(&table()).unwrap();
        assert_eq!(m[0][1], Decimal::ONE);
    }

    #[test]
    fn test_negated_column_is_minus_one() {
        let rows = vec![
            vec![dec!(1), dec!(-1)],
            vec![dec!(4), dec!(-4)],
            vec![dec!(2), dec!(-2)],
        ];
        let m = correlation_matrix(&rows).unwrap();
        assert_eq!(m[0][1], dec!(-1));
    }

    #[test]
    fn test_constant_column_is_zero() {
        let rows = vec![
            vec![dec!(1), dec!(7)],
            vec![dec!(2), dec!(7)],
            vec![dec!(3), dec!(7)],
        ];
        let out = calculate_correlation_matrix(&CorrelationInput {
            columns: None,
            rows,
        })
        .unwrap();
        assert_eq!(out.result.matrix[0][1], Decimal::ZERO);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_linkage_ties_go_to_first_column() {
        let rows = vec![
            vec![dec!(1), dec!(1)],
            vec![dec!(2), dec!(2)],
            vec![dec!(3), dec!(3)],
        ];
        let out = calculate_correlation_matrix(&CorrelationInput {
            columns: Some(vec!["a".into(), "b".into()]),
            rows,
        })
        .unwrap();
        assert_eq!(out.result.most_linked, "a");
        assert_eq!(out.result.least_linked, "a");
    }

    #[test]
    fn test_strongest_pairs() {
        let out = calculate_correlation_matrix(&CorrelationInput {
            columns: None,
            rows: table(),
        })
        .unwrap();
        let pos = out.result.strongest_positive_pair.unwrap();
        assert_eq!((pos.first.as_str(), pos.second.as_str()), ("x1", "x2"));
        let neg = out.result.strongest_negative_pair.unwrap();
        assert!(neg.correlation < Decimal::ZERO);
    }

    #[test]
    fn test_reject_single_row() {
        assert!(correlation_matrix(&[vec![dec!(1), dec!(2)]]).is_err());
    }

    #[test]
    fn test_reject_single_column() {
        assert!(correlation_matrix(&[vec![dec!(1)], vec![dec!(2)]]).is_err());
    }

    #[test]
    fn test_reject_ragged_rows() {
        let rows = vec![vec![dec!(1), dec!(2)], vec![dec!(3)]];
        assert!(matches!(
            correlation_matrix(&rows),
            Err(CalcError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_large_magnitudes_match_small_scale() {
        let small = vec![
            vec![dec!(1), dec!(2)],
            vec![dec!(-1), dec!(5)],
            vec![dec!(3), dec!(1)],
        ];
        let large = vec![
            vec![dec!(1_000_000_000_000_000), dec!(2)],
            vec![dec!(-1_000_000_000_000_000), dec!(5)],
            vec![dec!(3_000_000_000_000_000), dec!(1)],
        ];
        let m = correlation_matrix(&large).unwrap();
        assert_eq!(m, correlation_matrix(&small).unwrap());
        // -8 / sqrt(8 * 26 / 3)
        assert!((m[0][1] - dec!(-0.960769)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_values_near_decimal_limit() {
        let big = |k: i128| Decimal::from_i128_with_scale(k * 10i128.pow(28), 0);
        let rows = vec![
            vec![big(5), dec!(1)],
            vec![big(6), dec!(2)],
            vec![big(7), dec!(3)],
        ];
        let out = calculate_correlation_matrix(&CorrelationInput {
            columns: None,
            rows,
        })
        .unwrap();
        assert_eq!(out.result.matrix[0][1], Decimal::ONE);
        assert!(out.result.variables[0].std_dev > Decimal::ZERO);
    }

    #[test]
    fn test_reject_column_name_mismatch() {
        let input = CorrelationInput {
            columns: Some(vec!["only".into()]),
            rows: table(),
        };
        assert!(calculate_correlation_matrix(&input).is_err());
    }
}
