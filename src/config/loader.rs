//! Configuration Loader - File Loading and Validation

use std::path::Path;

use tracing::info;

use super::AppConfig;
use crate::backtesting::HistogramFormat;
use crate::error::{Result, SimError};

/// Load and validate configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails or a required key is missing
/// - Validation rules are violated (including an unknown strategy)
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let config = read_config(path)?;

    validate_config(&config)?;

    info!(
        data = %config.data.path.display(),
        strategy = %config.stake.strategy,
        num_runs = config.simulation.num_runs,
        "Configuration loaded"
    );

    Ok(config)
}

/// Parse a TOML configuration file without validating it
///
/// Callers that apply overrides on top of the file validate afterwards.
pub fn read_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();

    let content = std::fs::read_to_string(path).map_err(|e| {
        SimError::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;

    Ok(toml::from_str(&content)?)
}

/// Validate all configuration parameters
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Strategy tag and stake parameters
    config.stake.policy()?;

    ensure(
        !config.data.path.as_os_str().is_empty(),
        "data.path must not be empty",
    )?;

    let columns = &config.data.columns;
    for (key, value) in [
        ("pred_col", &columns.pred_col),
        ("prob_col", &columns.prob_col),
        ("home_fav_col", &columns.home_fav_col),
        ("fav_odds_col", &columns.fav_odds_col),
        ("dog_odds_col", &columns.dog_odds_col),
    ] {
        ensure(!value.is_empty(), &format!("data.{} must not be empty", key))?;
    }

    ensure(
        config.simulation.num_runs >= 1,
        "simulation.num_runs must be at least 1",
    )?;

    if let Some(ref plot_path) = config.simulation.plot_path {
        HistogramFormat::from_path(plot_path)?;
    }

    Ok(())
}

fn ensure(condition: bool, message: &str) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(SimError::Config(message.to_string()))
    }
}
