//! Configuration - TOML-based run configuration
//!
//! Data source and column names, staking policy, and simulation settings.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::backtesting::DEFAULT_NUM_SIMULATIONS;
use crate::core::kelly::StakingPolicy;
use crate::data::GameColumns;
use crate::error::Result;

pub use loader::{load_config, read_config, validate_config};

/// Top-level run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub data: DataConfig,
    pub stake: StakeConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Input CSV and its column names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub path: PathBuf,
    #[serde(flatten)]
    pub columns: GameColumns,
}

/// Staking policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeConfig {
    /// "flat" or "kelly"
    pub strategy: String,
    #[serde(default = "default_flat_size")]
    pub flat_size: f64,
    #[serde(default = "default_bankroll")]
    pub bankroll: f64,
    #[serde(default = "default_kelly_multiplier")]
    pub kelly_multiplier: f64,
}

impl StakeConfig {
    /// Resolve into a staking policy, rejecting unknown strategy tags
    pub fn policy(&self) -> Result<StakingPolicy> {
        StakingPolicy::new(&self.strategy, self.flat_size, self.bankroll)?
            .with_kelly_multiplier(self.kelly_multiplier)
    }
}

/// Monte Carlo settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_num_runs")]
    pub num_runs: usize,
    /// Histogram destination, `.svg` chart or `.csv` table; none when absent
    #[serde(default)]
    pub plot_path: Option<PathBuf>,
    /// Fixed seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_runs: default_num_runs(),
            plot_path: None,
            seed: None,
        }
    }
}

fn default_flat_size() -> f64 {
    100.0
}

fn default_bankroll() -> f64 {
    1_000.0
}

fn default_kelly_multiplier() -> f64 {
    1.0
}

fn default_num_runs() -> usize {
    DEFAULT_NUM_SIMULATIONS
}
