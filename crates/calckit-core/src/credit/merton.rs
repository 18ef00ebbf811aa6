//! Merton structural model: distance to default and probability of default.
//!
//! Takes the asset value and asset volatility as given (no equity-implied
//! solve) and evaluates
//!
//! ```text
//! d  = ln(V / D) / (sigma * sqrt(T))
//! PD = N(-d)
//! ```
//!
//! `N` is built on the Abramowitz & Stegun 7.1.26 rational approximation of
//! `erf`, whose absolute error is about 1.5e-7. That is fine for advisory
//! output and is stated in every result's warnings.
//!
//! PD falls strictly as `V` rises only while it is representable: once
//! `N(-d)` drops below Decimal's 28 fractional digits (around d = 11) it is
//! reported as exactly 0.

use log::debug;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::classification::{Classification, ThresholdBand, ThresholdTable};
use crate::types::*;
use crate::{CalcError, CalcResult};

// ---------------------------------------------------------------------------
// Normal distribution helpers
// ---------------------------------------------------------------------------

const SQRT_2: Decimal = dec!(1.4142135623730950488016887242);

// A&S 7.1.26
const ERF_P: Decimal = dec!(0.3275911);
const ERF_A1: Decimal = dec!(0.254829592);
const ERF_A2: Decimal = dec!(-0.284496736);
const ERF_A3: Decimal = dec!(1.421413741);
const ERF_A4: Decimal = dec!(-1.453152027);
const ERF_A5: Decimal = dec!(1.061405429);

/// exp(-x^2) is below 1e-27 here, so the tail term no longer shows in 28
/// fractional digits.
const ERF_SATURATION: Decimal = dec!(8);

/// Error function, A&S 7.1.26. Absolute error <= 1.5e-7.
pub fn erf(x: Decimal) -> Decimal {
    let sign = if x.is_sign_negative() {
        dec!(-1)
    } else {
        Decimal::ONE
    };
    let ax = x.abs();
    if ax >= ERF_SATURATION {
        return sign;
    }
    let t = Decimal::ONE / (Decimal::ONE + ERF_P * ax);
    let poly = ((((ERF_A5 * t + ERF_A4) * t + ERF_A3) * t + ERF_A2) * t + ERF_A1) * t;
    // underflow of exp(-x^2) means the tail term is zero
    let tail = (-(ax * ax)).checked_exp().unwrap_or(Decimal::ZERO);
    let y = Decimal::ONE - poly * tail;
    sign * y
}

/// Standard normal CDF via `erf`.
pub fn norm_cdf(x: Decimal) -> Decimal {
    dec!(0.5) * (Decimal::ONE + erf(x / SQRT_2))
}

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultProbabilityInput {
    /// Market value of the firm's assets.
    pub asset_value: Money,
    /// Face value of debt (default barrier).
    pub debt_value: Money,
    /// Annualized asset volatility (decimal, e.g. 0.25 = 25%).
    pub asset_volatility: Rate,
    /// Horizon in years.
    pub horizon_years: Years,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultRisk {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl std::fmt::Display for DefaultRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VeryLow => write!(f, "Very Low"),
            Self::Low => write!(f, "Low"),
            Self::Moderate => write!(f, "Moderate"),
            Self::High => write!(f, "High"),
            Self::VeryHigh => write!(f, "Very High"),
        }
    }
}

/// PD bands, bounds in probability (not percent).
pub const DEFAULT_RISK_TABLE: ThresholdTable<DefaultRisk> = ThresholdTable::new(&[
    ThresholdBand {
        lower_bound: dec!(0),
        label: DefaultRisk::VeryLow,
        guidance: "Default is remote over the horizon; consistent with investment-grade credit.",
    },
    ThresholdBand {
        lower_bound: dec!(0.001),
        label: DefaultRisk::Low,
        guidance: "Small default probability; routine monitoring is sufficient.",
    },
    ThresholdBand {
        lower_bound: dec!(0.01),
        label: DefaultRisk::Moderate,
        guidance: "Meaningful default risk; review leverage and asset volatility.",
    },
    ThresholdBand {
        lower_bound: dec!(0.05),
        label: DefaultRisk::High,
        guidance: "Elevated default risk; consider collateral, covenants or reduced exposure.",
    },
    ThresholdBand {
        lower_bound: dec!(0.20),
        label: DefaultRisk::VeryHigh,
        guidance: "Distressed; assets offer little cushion over the debt barrier.",
    },
]);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultProbabilityOutput {
    /// Leverage V / D.
    pub asset_coverage: Decimal,
    pub distance_to_default: Decimal,
    pub probability_of_default: Probability,
    pub probability_of_default_pct: Decimal,
    pub risk: Classification<DefaultRisk>,
}

// ---------------------------------------------------------------------------
// Core
// ---------------------------------------------------------------------------

/// Estimate the probability of default over `horizon_years`.
pub fn calculate_default_probability(
    input: &DefaultProbabilityInput,
) -> CalcResult<ComputationOutput<DefaultProbabilityOutput>> {
    validate_input(input)?;
    let mut warnings: Vec<String> = Vec::new();

    let sqrt_t = input.horizon_years.sqrt().ok_or_else(|| {
        CalcError::DegenerateComputation("square root of horizon_years".into())
    })?;
    let denom = input.asset_volatility.checked_mul(sqrt_t).ok_or_else(|| {
        CalcError::DegenerateComputation("sigma * sqrt(T) overflows".into())
    })?;
    if denom.is_zero() {
        return Err(CalcError::DivisionByZero {
            context: "sigma * sqrt(T) in distance to default".into(),
        });
    }

    let coverage = input.asset_value.checked_div(input.debt_value).ok_or_else(|| {
        CalcError::DegenerateComputation(format!(
            "asset coverage {} / {} is out of range",
            input.asset_value, input.debt_value
        ))
    })?;
    let ln_coverage = coverage.checked_ln().ok_or_else(|| {
        CalcError::DegenerateComputation(format!("ln of asset coverage {coverage}"))
    })?;
    let dd = ln_coverage.checked_div(denom).ok_or_else(|| {
        debug!("distance to default overflowed: ln(V/D)={ln_coverage}, sigma*sqrt(T)={denom}");
        CalcError::DegenerateComputation(format!(
            "Distance to default ln(V/D) / (sigma * sqrt(T)) = {ln_coverage} / {denom} \
             is out of range; asset volatility is too small for this leverage."
        ))
    })?;
    let pd = norm_cdf(-dd).max(Decimal::ZERO).min(Decimal::ONE);

    if input.asset_value <= input.debt_value {
        warnings.push(
            "Asset value does not exceed debt; the firm is at or past the default barrier."
                .to_string(),
        );
    }
    warnings.push(
        "Normal CDF uses the Abramowitz-Stegun erf approximation (abs. error ~1.5e-7)."
            .to_string(),
    );

    let output = DefaultProbabilityOutput {
        asset_coverage: coverage,
        distance_to_default: dd,
        probability_of_default: pd,
        probability_of_default_pct: to_percent(pd),
        risk: DEFAULT_RISK_TABLE.classification(pd),
    };

    let assumptions = serde_json::json!({
        "distance_to_default": "ln(V / D) / (sigma * sqrt(T))",
        "probability_of_default": "N(-d)",
        "drift": "none",
        "erf": "Abramowitz & Stegun 7.1.26",
    });

    Ok(with_metadata(
        "Merton structural model (simplified distance to default)",
        &assumptions,
        warnings,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &DefaultProbabilityInput) -> CalcResult<()> {
    if input.asset_value <= Decimal::ZERO {
        return Err(CalcError::invalid("asset_value", "Asset value must be positive."));
    }
    if input.debt_value <= Decimal::ZERO {
        return Err(CalcError::invalid("debt_value", "Debt value must be positive."));
    }
    if input.asset_volatility < Decimal::ZERO {
        return Err(CalcError::invalid(
            "asset_volatility",
            "Asset volatility cannot be negative.",
        ));
    }
    if input.horizon_years < Decimal::ZERO {
        return Err(CalcError::invalid(
            "horizon_years",
            "Horizon cannot be negative.",
        ));
    }
    if input.asset_volatility.is_zero() || input.horizon_years.is_zero() {
        debug!(
            "rejecting degenerate Merton input: sigma={}, T={}",
            input.asset_volatility, input.horizon_years
        );
        return Err(CalcError::DegenerateComputation(
            "Invalid inputs: asset volatility and horizon must both be non-zero.".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Decimal, b: Decimal, eps: Decimal) -> bool {
        (a - b).abs() < eps
    }

    fn base_input() -> DefaultProbabilityInput {
        DefaultProbabilityInput {
            asset_value: dec!(120),
            debt_value: dec!(100),
            asset_volatility: dec!(0.25),
            horizon_years: dec!(1),
        }
    }

    #[test]
    fn test_erf_known_values() {
        assert!(approx_eq(erf(Decimal::ZERO), Decimal::ZERO, dec!(0.0000002)));
        assert!(approx_eq(erf(dec!(0.5)), dec!(0.5204998778), dec!(0.0000002)));
        assert!(approx_eq(erf(Decimal::ONE), dec!(0.8427007929), dec!(0.0000002)));
        assert!(approx_eq(erf(dec!(2)), dec!(0.9953222650), dec!(0.0000002)));
    }

    #[test]
    fn test_erf_is_odd() {
        for x in [dec!(0.1), dec!(0.7), dec!(1.3), dec!(2.2)] {
            assert_eq!(erf(-x), -erf(x));
        }
    }

    #[test]
    fn test_erf_saturates() {
        assert_eq!(erf(dec!(8)), Decimal::ONE);
        assert_eq!(erf(dec!(-8)), dec!(-1));
        assert_eq!(erf(dec!(40)), Decimal::ONE);
    }

    #[test]
    fn test_erf_tail_visible_below_cutoff() {
        assert!(erf(dec!(7)) < Decimal::ONE);
        assert!(erf(dec!(6.5)) < erf(dec!(7)));
    }

    #[test]
    fn test_pd_keeps_falling_in_far_tail() {
        // ln(V/D) of 0.7, 0.9 and 1.0 at sigma 0.1 gives d = 7, 9, 10
        let mut previous = Decimal::ONE;
        for ln_cov in [dec!(0.7), dec!(0.9), dec!(1.0)] {
            let out = calculate_default_probability(&DefaultProbabilityInput {
                asset_value: dec!(100) * ln_cov.exp(),
                debt_value: dec!(100),
                asset_volatility: dec!(0.1),
                horizon_years: Decimal::ONE,
            })
            .unwrap();
            let pd = out.result.probability_of_default;
            assert!(pd > Decimal::ZERO && pd < previous, "d = {}", out.result.distance_to_default);
            previous = pd;
        }
    }

    #[test]
    fn test_tiny_volatility_overflow_is_degenerate() {
        let input = DefaultProbabilityInput {
            asset_value: dec!(1_000_000),
            debt_value: Decimal::ONE,
            asset_volatility: dec!(0.0000000000000000000000000001),
            horizon_years: Decimal::ONE,
        };
        assert!(matches!(
            calculate_default_probability(&input),
            Err(CalcError::DegenerateComputation(_))
        ));
    }

    #[test]
    fn test_norm_cdf_at_zero() {
        assert!(approx_eq(norm_cdf(Decimal::ZERO), dec!(0.5), dec!(0.0000002)));
    }

    #[test]
    fn test_norm_cdf_symmetry() {
        let pos = norm_cdf(dec!(1.0));
        let neg = norm_cdf(dec!(-1.0));
        assert!(approx_eq(pos + neg, Decimal::ONE, dec!(0.0000001)));
        assert!(approx_eq(pos, dec!(0.8413447461), dec!(0.0000002)));
    }

    #[test]
    fn test_distance_to_default() {
        let out = calculate_default_probability(&base_input()).unwrap();
        // ln(1.2) / 0.25 = 0.729286...
        assert!(approx_eq(
            out.result.distance_to_default,
            dec!(0.7292862271),
            dec!(0.0000001)
        ));
        // N(-0.7293) ~ 0.2329
        assert!(approx_eq(
            out.result.probability_of_default,
            dec!(0.2329),
            dec!(0.0005)
        ));
        assert_eq!(out.result.risk.label, DefaultRisk::VeryHigh);
    }

    #[test]
    fn test_at_barrier_pd_is_half() {
        let input = DefaultProbabilityInput {
            asset_value: dec!(100),
            ..base_input()
        };
        let out = calculate_default_probability(&input).unwrap();
        assert!(approx_eq(out.result.distance_to_default, Decimal::ZERO, dec!(0.0000001)));
        assert!(approx_eq(out.result.probability_of_default, dec!(0.5), dec!(0.0000002)));
        assert_eq!(out.warnings.len(), 2);
    }

    #[test]
    fn test_pd_decreases_with_assets() {
        let mut last = Decimal::ONE;
        for v in [dec!(90), dec!(100), dec!(110), dec!(130), dec!(160)] {
            let input = DefaultProbabilityInput {
                asset_value: v,
                ..base_input()
            };
            let pd = calculate_default_probability(&input)
                .unwrap()
                .result
                .probability_of_default;
            assert!(pd < last, "PD {pd} at V={v} should be below {last}");
            last = pd;
        }
    }

    #[test]
    fn test_pd_increases_with_volatility_when_solvent() {
        let mut last = Decimal::ZERO;
        for sigma in [dec!(0.10), dec!(0.20), dec!(0.35), dec!(0.60)] {
            let input = DefaultProbabilityInput {
                asset_volatility: sigma,
                ..base_input()
            };
            let pd = calculate_default_probability(&input)
                .unwrap()
                .result
                .probability_of_default;
            assert!(pd > last);
            last = pd;
        }
    }

    #[test]
    fn test_safe_firm_is_very_low_risk() {
        let input = DefaultProbabilityInput {
            asset_value: dec!(300),
            debt_value: dec!(100),
            asset_volatility: dec!(0.15),
            horizon_years: dec!(1),
        };
        let out = calculate_default_probability(&input).unwrap();
        assert_eq!(out.result.risk.label, DefaultRisk::VeryLow);
    }

    #[test]
    fn test_reject_zero_volatility() {
        let input = DefaultProbabilityInput {
            asset_volatility: Decimal::ZERO,
            ..base_input()
        };
        assert!(matches!(
            calculate_default_probability(&input),
            Err(CalcError::DegenerateComputation(_))
        ));
    }

    #[test]
    fn test_reject_zero_horizon() {
        let input = DefaultProbabilityInput {
            horizon_years: Decimal::ZERO,
            ..base_input()
        };
        assert!(matches!(
            calculate_default_probability(&input),
            Err(CalcError::DegenerateComputation(_))
        ));
    }

    #[test]
    fn test_reject_non_positive_debt() {
        let input = DefaultProbabilityInput {
            debt_value: Decimal::ZERO,
            ..base_input()
        };
        assert!(matches!(
            calculate_default_probability(&input),
            Err(CalcError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_reject_negative_volatility() {
        let input = DefaultProbabilityInput {
            asset_volatility: dec!(-0.1),
            ..base_input()
        };
        assert!(matches!(
            calculate_default_probability(&input),
            Err(CalcError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_risk_table_is_monotonic() {
        assert!(DEFAULT_RISK_TABLE.is_monotonic());
    }
}
