//! Monte Carlo Risk Simulation
//!
//! Estimate the distribution of total profit/loss for a bet sequence.
//!
//! The realized records only calibrate the model:
//!     p ~ Beta(W + 1, L + 1)             posterior win rate, uniform prior
//!     win payoff  ~ Normal(avg_win, std_win),   floored at 0
//!     loss payoff ~ Normal(avg_loss, std_loss), capped at 0
//!
//! Each simulated history draws `p` once, then settles `n` bets (the
//! historical bet count) against it and sums the payoffs. Individual stakes
//! and odds are pooled into the two payoff distributions.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Beta, Distribution, Normal};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use super::histogram::Histogram;
use super::records::BetRecord;
use super::stats::{mean, percentile_sorted, sample_std};
use crate::core::odds::DECIMAL_EPS;
use crate::error::{Result, SimError};

pub const DEFAULT_NUM_SIMULATIONS: usize = 100_000;

/// Simulations per independently seeded batch
const BATCH_SIZE: usize = 1_000;

/// Parameters estimated once from the realized bets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub wins: usize,
    pub losses: usize,
    pub avg_win: f64,
    pub std_win: f64,
    pub avg_loss: f64,
    pub std_loss: f64,
    pub num_bets: usize,
}

impl Calibration {
    pub fn from_records(bets: &[BetRecord]) -> Self {
        let win_payouts: Vec<f64> = bets.iter().filter(|b| b.win).map(|b| b.pnl).collect();
        let loss_payouts: Vec<f64> = bets.iter().filter(|b| !b.win).map(|b| b.pnl).collect();

        Self {
            wins: win_payouts.len(),
            losses: loss_payouts.len(),
            avg_win: mean(&win_payouts),
            std_win: sample_std(&win_payouts),
            avg_loss: mean(&loss_payouts),
            std_loss: sample_std(&loss_payouts),
            num_bets: bets.len(),
        }
    }

    /// Posterior mean of the win rate
    pub fn posterior_mean(&self) -> f64 {
        (self.wins + 1) as f64 / (self.wins + self.losses + 2) as f64
    }
}

/// Summary of the simulated total PnL distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub expected_return: f64,
    pub std_pnl: f64,
    pub t_stat: f64,
    pub prob_loss: f64,
    pub min_pnl: f64,
    pub max_pnl: f64,
    pub pct25: f64,
    pub pct75: f64,
}

impl SimulationSummary {
    /// Reduce simulated totals to summary statistics
    ///
    /// The t-statistic's standard error uses the historical bet count.
    pub fn from_totals(totals: &[f64], num_bets: usize) -> Self {
        let mut sorted = totals.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let expected_return = mean(totals);
        let std_pnl = sample_std(totals);
        let t_stat = if num_bets == 0 {
            0.0
        } else if std_pnl == 0.0 {
            expected_return / DECIMAL_EPS
        } else {
            expected_return / (std_pnl / (num_bets as f64).sqrt())
        };
        let prob_loss = if totals.is_empty() {
            0.0
        } else {
            totals.iter().filter(|&&t| t < 0.0).count() as f64 / totals.len() as f64
        };

        Self {
            expected_return,
            std_pnl,
            t_stat,
            prob_loss,
            min_pnl: sorted.first().copied().unwrap_or(0.0),
            max_pnl: sorted.last().copied().unwrap_or(0.0),
            pct25: percentile_sorted(&sorted, 25.0),
            pct75: percentile_sorted(&sorted, 75.0),
        }
    }

    /// Console report lines
    pub fn report(&self) -> String {
        [
            format!("Expected Return: ${:.2}", self.expected_return),
            format!("Std PNL: ${:.2}", self.std_pnl),
            format!("T-statistic: {:.2}", self.t_stat),
            format!("P(loss): {:.2}%", self.prob_loss * 100.0),
            format!("Range: ${:.2} — ${:.2}", self.min_pnl, self.max_pnl),
            format!(
                "25th/75th percentiles: ${:.2} / ${:.2}",
                self.pct25, self.pct75
            ),
        ]
        .join("\n")
    }
}

/// Result of one simulator run
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    pub calibration: Calibration,
    pub summary: SimulationSummary,
    /// Simulated total PnL per history, in batch order
    pub totals: Vec<f64>,
}

impl SimulationOutcome {
    /// Persist a histogram of the simulated totals, `.svg` chart or `.csv` table
    pub fn save_histogram<P: AsRef<Path>>(&self, path: P, bins: usize) -> Result<()> {
        Histogram::new(&self.totals, bins).save(path)
    }
}

/// Sampling distributions for one synthetic history
struct PayoffSampler {
    posterior: Beta<f64>,
    win_payoff: Normal<f64>,
    loss_payoff: Normal<f64>,
    num_bets: usize,
}

impl PayoffSampler {
    fn new(calibration: &Calibration) -> Result<Self> {
        let posterior = Beta::new((calibration.wins + 1) as f64, (calibration.losses + 1) as f64)
            .map_err(|e| SimError::Data(format!("Invalid win-rate posterior: {}", e)))?;
        let win_payoff = Normal::new(calibration.avg_win, calibration.std_win)
            .map_err(|e| SimError::Data(format!("Invalid win payoff distribution: {}", e)))?;
        let loss_payoff = Normal::new(calibration.avg_loss, calibration.std_loss)
            .map_err(|e| SimError::Data(format!("Invalid loss payoff distribution: {}", e)))?;

        Ok(Self {
            posterior,
            win_payoff,
            loss_payoff,
            num_bets: calibration.num_bets,
        })
    }

    /// Total PnL of one alternate history
    fn simulate_total<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let p = self.posterior.sample(rng);

        let mut total = 0.0;
        for _ in 0..self.num_bets {
            total += if rng.gen::<f64>() < p {
                self.win_payoff.sample(rng).max(0.0)
            } else {
                self.loss_payoff.sample(rng).min(0.0)
            };
        }
        total
    }
}

/// Monte Carlo simulator over a realized bet sequence
pub struct MonteCarloSimulator<'a> {
    bets: &'a [BetRecord],
    calibration: Calibration,
}

impl<'a> MonteCarloSimulator<'a> {
    pub fn new(bets: &'a [BetRecord]) -> Self {
        let calibration = Calibration::from_records(bets);
        debug!(?calibration, "Calibrated simulator");
        Self { bets, calibration }
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn num_bets(&self) -> usize {
        self.bets.len()
    }

    /// Run `num_sims` simulations
    ///
    /// Simulations are split into fixed-size batches run in parallel. Each
    /// batch gets its own generator seeded from `rng`, so the same seed
    /// yields the same totals regardless of thread count.
    pub fn run<R: Rng + ?Sized>(&self, num_sims: usize, rng: &mut R) -> Result<SimulationOutcome> {
        if num_sims == 0 {
            return Err(SimError::Config(
                "Number of simulations must be at least 1".to_string(),
            ));
        }

        let sampler = PayoffSampler::new(&self.calibration)?;

        info!(
            num_sims,
            num_bets = self.calibration.num_bets,
            wins = self.calibration.wins,
            losses = self.calibration.losses,
            "Running Monte Carlo simulation"
        );

        let num_batches = num_sims.div_ceil(BATCH_SIZE);
        let seeds: Vec<u64> = (0..num_batches).map(|_| rng.gen()).collect();

        let batches: Vec<Vec<f64>> = seeds
            .par_iter()
            .enumerate()
            .map(|(i, &seed)| {
                let len = BATCH_SIZE.min(num_sims - i * BATCH_SIZE);
                let mut batch_rng = ChaCha8Rng::seed_from_u64(seed);
                (0..len)
                    .map(|_| sampler.simulate_total(&mut batch_rng))
                    .collect::<Vec<f64>>()
            })
            .collect();
        let totals: Vec<f64> = batches.concat();

        let summary = SimulationSummary::from_totals(&totals, self.calibration.num_bets);

        info!(
            expected_return = summary.expected_return,
            prob_loss = summary.prob_loss,
            "Simulation complete"
        );

        Ok(SimulationOutcome {
            calibration: self.calibration.clone(),
            summary,
            totals,
        })
    }

    /// Run with a fresh generator, seeded when `seed` is given
    pub fn run_seeded(&self, num_sims: usize, seed: Option<u64>) -> Result<SimulationOutcome> {
        let mut rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };
        self.run(num_sims, &mut rng)
    }
}
