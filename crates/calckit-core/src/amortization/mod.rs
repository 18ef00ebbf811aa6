pub mod payoff;
pub mod savings;
