//! Health and body-composition calculators.
//!
//! Additive risk scores report each factor's points so the caller can show
//! how the total was reached.

use serde::{Deserialize, Serialize};

pub mod bmi;
pub mod fat_mass;
pub mod fracture;
pub mod nafld;

/// Points a single risk factor contributed to an additive score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorContribution {
    pub factor: String,
    pub points: u32,
}
