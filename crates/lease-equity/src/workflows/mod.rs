pub mod equity;
pub mod payoff;
