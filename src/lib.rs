//! Wagersim - sports-betting capital allocation analysis
//!
//! This library provides:
//! - American to decimal odds conversion
//! - Flat and Kelly staking with bankroll compounding
//! - Bet record construction from per-game predictions
//! - Monte Carlo estimation of the total PnL distribution
//!
//! # Example
//!
//! ```no_run
//! use wagersim::backtesting::{build_bet_records, MonteCarloSimulator};
//! use wagersim::core::StakingPolicy;
//! use wagersim::data::{load_games, GameColumns};
//!
//! let games = load_games("data/games.csv", &GameColumns::default())?;
//! let bets = build_bet_records(&games, &StakingPolicy::kelly(1_000.0));
//!
//! let outcome = MonteCarloSimulator::new(&bets).run_seeded(100_000, Some(42))?;
//! println!("{}", outcome.summary.report());
//! # Ok::<(), wagersim::SimError>(())
//! ```

pub mod backtesting;
pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use backtesting::{BetRecord, MonteCarloSimulator, SimulationSummary};
pub use error::SimError;
pub use models::{BetSide, GameRow};
