pub mod classification;
pub mod error;
pub mod types;

#[cfg(feature = "probability")]
pub mod probability;

#[cfg(feature = "statistics")]
pub mod statistics;

#[cfg(feature = "credit")]
pub mod credit;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "health")]
pub mod health;

#[cfg(feature = "entertainment")]
pub mod entertainment;

pub use error::CalcError;
pub use types::*;

/// Standard result type for all calculator kernels
pub type CalcResult<T> = Result<T, CalcError>;
