//! Kelly Criterion Bet Sizing
//!
//! The Kelly criterion formula:
//!     f* = (b*p - q) / b
//!
//! Where:
//!     f* = fraction of bankroll to bet
//!     b = decimal odds - 1 (net odds)
//!     p = probability of winning
//!     q = 1 - p (probability of losing)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::odds::DECIMAL_EPS;
use crate::error::{validate_bankroll, validate_stake, Result, SimError};

/// Calculate the Kelly fraction for a single bet
///
/// Floored at zero: a bet without positive edge gets no stake. The
/// denominator carries a small epsilon so `b == 0` stays defined.
///
/// # Examples
/// ```
/// use wagersim::core::kelly::kelly_fraction;
/// let f = kelly_fraction(0.6, 1.0); // even money, 60% to win
/// assert!((f - 0.2).abs() < 1e-6);
/// ```
pub fn kelly_fraction(win_prob: f64, net_odds: f64) -> f64 {
    let q = 1.0 - win_prob;
    ((net_odds * win_prob - q) / (net_odds + DECIMAL_EPS)).max(0.0)
}

/// Staking strategy tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StakingStrategy {
    /// Constant amount per bet
    Flat,
    /// Kelly fraction of the running bankroll
    Kelly,
}

impl FromStr for StakingStrategy {
    type Err = SimError;

    fn from_str(tag: &str) -> Result<Self> {
        match tag {
            "flat" => Ok(StakingStrategy::Flat),
            "kelly" => Ok(StakingStrategy::Kelly),
            other => Err(SimError::UnknownStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for StakingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StakingStrategy::Flat => write!(f, "flat"),
            StakingStrategy::Kelly => write!(f, "kelly"),
        }
    }
}

/// Staking policy: strategy plus its parameters
#[derive(Debug, Clone)]
pub struct StakingPolicy {
    pub strategy: StakingStrategy,
    pub flat_stake: f64,
    pub initial_bankroll: f64,
    /// Scales the Kelly fraction (1.0 = full Kelly)
    pub kelly_multiplier: f64,
}

impl StakingPolicy {
    /// Create a policy from a strategy tag
    ///
    /// Fails on an unknown tag before any bet is sized.
    pub fn new(tag: &str, flat_stake: f64, initial_bankroll: f64) -> Result<Self> {
        let strategy = tag.parse::<StakingStrategy>()?;
        validate_stake(flat_stake)?;
        validate_bankroll(initial_bankroll)?;

        Ok(Self {
            strategy,
            flat_stake,
            initial_bankroll,
            kelly_multiplier: 1.0,
        })
    }

    /// Flat staking with the given amount
    pub fn flat(stake: f64, initial_bankroll: f64) -> Self {
        Self {
            strategy: StakingStrategy::Flat,
            flat_stake: stake,
            initial_bankroll,
            kelly_multiplier: 1.0,
        }
    }

    /// Full Kelly staking from the given bankroll
    pub fn kelly(initial_bankroll: f64) -> Self {
        Self {
            strategy: StakingStrategy::Kelly,
            flat_stake: 0.0,
            initial_bankroll,
            kelly_multiplier: 1.0,
        }
    }

    pub fn with_kelly_multiplier(mut self, multiplier: f64) -> Result<Self> {
        if !(multiplier > 0.0 && multiplier <= 1.0) {
            return Err(SimError::Config(format!(
                "Kelly multiplier must be in (0, 1], got {}",
                multiplier
            )));
        }
        self.kelly_multiplier = multiplier;
        Ok(self)
    }

    /// Stake for a bet given the bankroll as of immediately before it
    pub fn stake(&self, win_prob: f64, net_odds: f64, bankroll: f64) -> f64 {
        match self.strategy {
            StakingStrategy::Flat => self.flat_stake,
            StakingStrategy::Kelly => {
                kelly_fraction(win_prob, net_odds) * self.kelly_multiplier * bankroll
            }
        }
    }
}

impl Default for StakingPolicy {
    fn default() -> Self {
        Self::flat(100.0, 1_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kelly_fraction_positive_edge() {
        // b = 1.5, p = 0.5: (0.75 - 0.5) / 1.5 = 0.1667
        let f = kelly_fraction(0.5, 1.5);
        assert!((f - 0.166_666_7).abs() < 1e-6);
    }

    #[test]
    fn test_kelly_fraction_no_edge_is_zero() {
        // b*p == q
        assert_eq!(kelly_fraction(0.5, 1.0), 0.0);
        // b*p < q
        assert_eq!(kelly_fraction(0.3, 1.0), 0.0);
    }

    #[test]
    fn test_kelly_fraction_zero_net_odds() {
        let f = kelly_fraction(0.9, 0.0);
        assert!(f.is_finite());
        assert_eq!(f, 0.0);
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("flat".parse::<StakingStrategy>().unwrap(), StakingStrategy::Flat);
        assert_eq!("kelly".parse::<StakingStrategy>().unwrap(), StakingStrategy::Kelly);
        assert!(matches!(
            "martingale".parse::<StakingStrategy>(),
            Err(SimError::UnknownStrategy(tag)) if tag == "martingale"
        ));
    }

    #[test]
    fn test_policy_new_rejects_unknown_tag() {
        assert!(StakingPolicy::new("Kelly ", 100.0, 1000.0).is_err());
        assert!(StakingPolicy::new("kelly", 100.0, 1000.0).is_ok());
    }

    #[test]
    fn test_policy_new_rejects_bad_params() {
        assert!(StakingPolicy::new("flat", -1.0, 1000.0).is_err());
        assert!(StakingPolicy::new("flat", 100.0, 0.0).is_err());
    }

    #[test]
    fn test_flat_stake_ignores_bankroll() {
        let policy = StakingPolicy::flat(100.0, 1000.0);
        assert_eq!(policy.stake(0.6, 1.0, 1000.0), 100.0);
        assert_eq!(policy.stake(0.1, 1.0, 5.0), 100.0);
    }

    #[test]
    fn test_kelly_stake_scales_with_bankroll() {
        let policy = StakingPolicy::kelly(1000.0);
        let small = policy.stake(0.6, 1.0, 1000.0);
        let large = policy.stake(0.6, 1.0, 2000.0);
        assert!((small - 200.0).abs() < 1e-4);
        assert!((large - 2.0 * small).abs() < 1e-6);
    }

    #[test]
    fn test_kelly_multiplier() {
        let policy = StakingPolicy::kelly(1000.0)
            .with_kelly_multiplier(0.5)
            .unwrap();
        assert!((policy.stake(0.6, 1.0, 1000.0) - 100.0).abs() < 1e-4);

        assert!(StakingPolicy::kelly(1000.0).with_kelly_multiplier(0.0).is_err());
        assert!(StakingPolicy::kelly(1000.0).with_kelly_multiplier(1.5).is_err());
    }
}
