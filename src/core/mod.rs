//! Core betting math

pub mod kelly;
pub mod odds;

// Re-export commonly used types
pub use kelly::{kelly_fraction, StakingPolicy, StakingStrategy};
pub use odds::{american_to_decimal, implied_probability, DECIMAL_EPS};
