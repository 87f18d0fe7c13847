//! Bet Record Construction
//!
//! Turn per-game predictions into an ordered sequence of hypothetical bets.
//! Kelly stakes depend on the bankroll left by every earlier bet, so rows
//! are folded strictly in the order given.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::kelly::StakingPolicy;
use crate::core::odds::american_to_decimal;
use crate::error::Result;
use crate::models::{BetSide, GameRow};

/// Individual bet record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetRecord {
    pub stake: f64,
    pub pnl: f64,
    pub win: bool,
    pub odds_dec: f64,
    pub bankroll_after: f64,
    pub side: BetSide,
    pub win_prob: f64,
    pub expected_value: f64,
}

/// Size and settle one bet
///
/// Returns the bankroll after the bet together with its record.
pub fn place_bet(bankroll: f64, row: &GameRow, policy: &StakingPolicy) -> (f64, BetRecord) {
    let fav_dec = american_to_decimal(row.fav_odds);
    let dog_dec = american_to_decimal(row.dog_odds);

    let side = row.side_backed();
    let odds_dec = match side {
        BetSide::Favorite => fav_dec,
        BetSide::Underdog => dog_dec,
    };
    let win_prob = row.selection_probability();
    let net_odds = odds_dec - 1.0;

    let stake = policy.stake(win_prob, net_odds, bankroll);
    let win = row.is_correct();
    let pnl = if win { stake * net_odds } else { -stake };
    let bankroll_after = bankroll + pnl;

    let record = BetRecord {
        stake,
        pnl,
        win,
        odds_dec,
        bankroll_after,
        side,
        win_prob,
        expected_value: win_prob * odds_dec,
    };

    (bankroll_after, record)
}

/// Build bet records for all rows, in input order
pub fn build_bet_records(rows: &[GameRow], policy: &StakingPolicy) -> Vec<BetRecord> {
    let records: Vec<BetRecord> = rows
        .iter()
        .scan(policy.initial_bankroll, |bankroll, row| {
            let (next, record) = place_bet(*bankroll, row, policy);
            *bankroll = next;
            Some(record)
        })
        .collect();

    debug!(
        bets = records.len(),
        strategy = %policy.strategy,
        final_bankroll = records.last().map_or(policy.initial_bankroll, |r| r.bankroll_after),
        "Built bet records"
    );

    records
}

/// Builder that resolves the strategy tag before touching any rows
#[derive(Debug, Clone)]
pub struct BetRecordBuilder {
    policy: StakingPolicy,
}

impl BetRecordBuilder {
    /// Create a builder from a strategy tag and its parameters
    ///
    /// An unknown tag is a configuration error.
    pub fn new(strategy: &str, flat_stake: f64, initial_bankroll: f64) -> Result<Self> {
        Ok(Self {
            policy: StakingPolicy::new(strategy, flat_stake, initial_bankroll)?,
        })
    }

    pub fn from_policy(policy: StakingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &StakingPolicy {
        &self.policy
    }

    pub fn build(&self, rows: &[GameRow]) -> Vec<BetRecord> {
        build_bet_records(rows, &self.policy)
    }
}
