use std::str::FromStr;

use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;

use calckit_core::CalcResult;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse the JSON input, run the calculator and serialize its output.
fn run_json<I, O>(input_json: &str, calc: fn(&I) -> CalcResult<O>) -> NapiResult<String>
where
    I: DeserializeOwned,
    O: Serialize,
{
    let input: I = serde_json::from_str(input_json).map_err(to_napi_error)?;
    let output = calc(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

fn parse_decimal(field: &str, raw: &str) -> NapiResult<Decimal> {
    Decimal::from_str(raw.trim())
        .map_err(|e| to_napi_error(format!("{field}: '{raw}' is not a decimal ({e})")))
}

// ---------------------------------------------------------------------------
// Probability and statistics
// ---------------------------------------------------------------------------

#[napi]
pub fn dice_probability(input_json: String) -> NapiResult<String> {
    run_json(
        &input_json,
        calckit_core::probability::dice::calculate_dice_probability,
    )
}

/// Number of ordered outcomes of `dice_count` dice summing to `target_sum`.
#[napi]
pub fn dice_ways(dice_count: u32, target_sum: u32) -> NapiResult<i64> {
    let ways =
        calckit_core::probability::dice::count_ways(dice_count, target_sum).map_err(to_napi_error)?;
    i64::try_from(ways).map_err(to_napi_error)
}

#[napi]
pub fn correlation_matrix(input_json: String) -> NapiResult<String> {
    run_json(
        &input_json,
        calckit_core::statistics::correlation::calculate_correlation_matrix,
    )
}

// ---------------------------------------------------------------------------
// Credit and amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn default_probability(input_json: String) -> NapiResult<String> {
    run_json(
        &input_json,
        calckit_core::credit::merton::calculate_default_probability,
    )
}

#[napi]
pub fn debt_payoff(input_json: String) -> NapiResult<String> {
    run_json(&input_json, calckit_core::amortization::payoff::calculate_payoff)
}

#[napi]
pub fn down_payment_savings(input_json: String) -> NapiResult<String> {
    run_json(
        &input_json,
        calckit_core::amortization::savings::calculate_down_payment_savings,
    )
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[napi]
pub fn bmi(input_json: String) -> NapiResult<String> {
    run_json(&input_json, calckit_core::health::bmi::calculate_bmi)
}

/// Bare BMI as a decimal string, for form fields that update as the user types.
#[napi]
pub fn body_mass_index(weight_kg: String, height_m: String) -> NapiResult<String> {
    let w = parse_decimal("weight_kg", &weight_kg)?;
    let h = parse_decimal("height_m", &height_m)?;
    let value = calckit_core::health::bmi::body_mass_index(w, h).map_err(to_napi_error)?;
    Ok(value.round_dp(2).to_string())
}

#[napi]
pub fn fat_mass_index(input_json: String) -> NapiResult<String> {
    run_json(
        &input_json,
        calckit_core::health::fat_mass::calculate_fat_mass_index,
    )
}

#[napi]
pub fn nafld_risk(input_json: String) -> NapiResult<String> {
    run_json(&input_json, calckit_core::health::nafld::calculate_nafld_risk)
}

#[napi]
pub fn fracture_risk(input_json: String) -> NapiResult<String> {
    run_json(
        &input_json,
        calckit_core::health::fracture::calculate_fracture_risk,
    )
}

// ---------------------------------------------------------------------------
// Entertainment
// ---------------------------------------------------------------------------

#[napi]
pub fn name_compatibility(input_json: String) -> NapiResult<String> {
    run_json(
        &input_json,
        calckit_core::entertainment::compatibility::calculate_compatibility,
    )
}
