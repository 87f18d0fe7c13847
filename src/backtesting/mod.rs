//! Bet construction, realized metrics and Monte Carlo risk simulation

pub mod histogram;
pub mod metrics;
pub mod monte_carlo;
pub mod records;
pub mod stats;

pub use histogram::{Histogram, HistogramFormat, DEFAULT_BINS};
pub use metrics::{calculate_metrics, calculate_sharpe_ratio, BacktestMetrics};
pub use monte_carlo::{
    Calibration, MonteCarloSimulator, SimulationOutcome, SimulationSummary,
    DEFAULT_NUM_SIMULATIONS,
};
pub use records::{build_bet_records, place_bet, BetRecord, BetRecordBuilder};
