pub mod amortization;
pub mod credit;
pub mod entertainment;
pub mod health;
pub mod probability;
pub mod statistics;
