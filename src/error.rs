use polars::prelude::PolarsError;
use thiserror::Error;

/// Library error types
#[derive(Debug, Error)]
pub enum SimError {
    /// Unrecognized staking strategy tag
    #[error("Unknown stake_strategy: {0} (expected 'flat' or 'kelly')")]
    UnknownStrategy(String),

    /// Missing or invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing or malformed input data
    #[error("Data error: {0}")]
    Data(String),

    #[error("Failed to read CSV: {0}")]
    Polars(#[from] PolarsError),

    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Chart rendering failure
    #[error("Failed to render histogram: {0}")]
    Plot(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;

/// Validation functions
pub fn validate_probability(prob: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&prob) {
        return Err(SimError::Data(format!(
            "Probability must be between 0 and 1, got {}",
            prob
        )));
    }
    Ok(())
}

pub fn validate_binary(column: &str, value: f64) -> Result<bool> {
    if value == 1.0 {
        Ok(true)
    } else if value == 0.0 {
        Ok(false)
    } else {
        Err(SimError::Data(format!(
            "Column '{}' must hold 0 or 1, got {}",
            column, value
        )))
    }
}

pub fn validate_stake(stake: f64) -> Result<()> {
    if !stake.is_finite() || stake < 0.0 {
        return Err(SimError::Config(format!(
            "Flat stake must be non-negative, got {}",
            stake
        )));
    }
    Ok(())
}

pub fn validate_bankroll(bankroll: f64) -> Result<()> {
    if !bankroll.is_finite() || bankroll <= 0.0 {
        return Err(SimError::Config(format!(
            "Initial bankroll must be positive, got {}",
            bankroll
        )));
    }
    Ok(())
}
