//! Backtest Metrics
//!
//! Realized metrics over the bet records: ROI, hit rate, drawdown, etc.

use super::records::BetRecord;
use crate::models::BetSide;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Realized evaluation metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestMetrics {
    // Basic metrics
    pub total_bets: usize,
    pub placed_bets: usize,
    pub winning_bets: usize,
    pub hit_rate: f64,
    pub roi: f64,

    // Expected value related
    pub avg_ev: f64,
    pub avg_odds: f64,
    pub avg_probability: f64,

    // Risk metrics
    pub profit_factor: f64,
    pub max_drawdown: f64,
    pub max_drawdown_pct: f64,

    // Win/Loss
    pub total_stake: f64,
    pub gross_profit: f64,
    pub gross_loss: f64,
    pub net_profit: f64,
    pub final_bankroll: f64,
}

impl Default for BacktestMetrics {
    fn default() -> Self {
        Self {
            total_bets: 0,
            placed_bets: 0,
            winning_bets: 0,
            hit_rate: 0.0,
            roi: 0.0,
            avg_ev: 0.0,
            avg_odds: 0.0,
            avg_probability: 0.0,
            profit_factor: 0.0,
            max_drawdown: 0.0,
            max_drawdown_pct: 0.0,
            total_stake: 0.0,
            gross_profit: 0.0,
            gross_loss: 0.0,
            net_profit: 0.0,
            final_bankroll: 0.0,
        }
    }
}

/// Calculate metrics from bet records
pub fn calculate_metrics(bets: &[BetRecord], initial_bankroll: f64) -> BacktestMetrics {
    if bets.is_empty() {
        return BacktestMetrics {
            final_bankroll: initial_bankroll,
            ..Default::default()
        };
    }

    // Basic metrics
    let total_bets = bets.len();
    let placed_bets = bets.iter().filter(|b| b.stake > 0.0).count();
    let winning_bets = bets.iter().filter(|b| b.win).count();
    let hit_rate = winning_bets as f64 / total_bets as f64;

    // Expected value related
    let avg_ev: f64 = bets.iter().map(|b| b.expected_value).sum::<f64>() / total_bets as f64;
    let avg_odds: f64 = bets.iter().map(|b| b.odds_dec).sum::<f64>() / total_bets as f64;
    let avg_probability: f64 = bets.iter().map(|b| b.win_prob).sum::<f64>() / total_bets as f64;

    // Profit/Loss calculation
    let total_stake: f64 = bets.iter().map(|b| b.stake).sum();
    let gross_profit: f64 = bets.iter().map(|b| b.pnl).filter(|&p| p > 0.0).sum();
    let gross_loss: f64 = bets.iter().map(|b| b.pnl).filter(|&p| p < 0.0).map(f64::abs).sum();
    let net_profit: f64 = bets.iter().map(|b| b.pnl).sum();

    // Profit Factor
    let profit_factor = if gross_loss > 0.0 {
        gross_profit / gross_loss
    } else if gross_profit > 0.0 {
        f64::INFINITY
    } else {
        0.0
    };

    // Drawdown over the bankroll path, starting from the initial bankroll
    let mut peak = initial_bankroll;
    let mut max_drawdown = 0.0f64;
    let mut max_drawdown_pct = 0.0f64;
    for bet in bets {
        peak = peak.max(bet.bankroll_after);
        let drawdown = peak - bet.bankroll_after;
        if drawdown > max_drawdown {
            max_drawdown = drawdown;
        }
        if peak > 0.0 {
            max_drawdown_pct = max_drawdown_pct.max(drawdown / peak);
        }
    }

    // ROI
    let roi = if total_stake > 0.0 {
        net_profit / total_stake
    } else {
        0.0
    };

    BacktestMetrics {
        total_bets,
        placed_bets,
        winning_bets,
        hit_rate,
        roi,
        avg_ev,
        avg_odds,
        avg_probability,
        profit_factor,
        max_drawdown,
        max_drawdown_pct,
        total_stake,
        gross_profit,
        gross_loss,
        net_profit,
        final_bankroll: bets[bets.len() - 1].bankroll_after,
    }
}

/// Calculate Sharpe ratio of per-bet returns (pnl / stake)
///
/// Bets with zero stake are skipped.
pub fn calculate_sharpe_ratio(bets: &[BetRecord], risk_free_rate: f64) -> f64 {
    let returns: Vec<f64> = bets
        .iter()
        .filter(|b| b.stake > 0.0)
        .map(|b| b.pnl / b.stake)
        .collect();

    if returns.is_empty() {
        return 0.0;
    }

    let mean_return: f64 = returns.iter().sum::<f64>() / returns.len() as f64;

    let variance: f64 = returns
        .iter()
        .map(|r| (r - mean_return).powi(2))
        .sum::<f64>()
        / returns.len() as f64;

    let std_return = variance.sqrt();

    if std_return == 0.0 {
        return 0.0;
    }

    (mean_return - risk_free_rate) / std_return
}

/// Analysis results by dimension
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionAnalysis {
    pub key: String,
    pub bets: usize,
    pub wins: usize,
    pub hit_rate: f64,
    pub stake: f64,
    pub profit: f64,
    pub roi: f64,
}

impl DimensionAnalysis {
    fn from_group(key: &str, group: &[&BetRecord]) -> Self {
        let total = group.len();
        let wins = group.iter().filter(|b| b.win).count();
        let stake: f64 = group.iter().map(|b| b.stake).sum();
        let profit: f64 = group.iter().map(|b| b.pnl).sum();

        Self {
            key: key.to_string(),
            bets: total,
            wins,
            hit_rate: if total > 0 {
                wins as f64 / total as f64
            } else {
                0.0
            },
            stake,
            profit,
            roi: if stake > 0.0 { profit / stake } else { 0.0 },
        }
    }
}

/// Analyze bet results by side backed (favorite vs underdog)
pub fn analyze_by_side(bets: &[BetRecord]) -> Vec<DimensionAnalysis> {
    let mut grouped: HashMap<BetSide, Vec<&BetRecord>> = HashMap::new();
    for bet in bets {
        grouped.entry(bet.side).or_default().push(bet);
    }

    let mut results: Vec<DimensionAnalysis> = grouped
        .iter()
        .map(|(side, group)| DimensionAnalysis::from_group(side.as_str(), group))
        .collect();

    results.sort_by(|a, b| a.key.cmp(&b.key));
    results
}

/// Analyze bet results by decimal odds band
pub fn analyze_by_odds_range(bets: &[BetRecord]) -> Vec<DimensionAnalysis> {
    let mut grouped: HashMap<&str, Vec<&BetRecord>> = HashMap::new();
    for bet in bets {
        let key = if bet.odds_dec < 1.5 {
            "heavy fav (<1.5)"
        } else if bet.odds_dec < 2.0 {
            "fav (1.5-2)"
        } else if bet.odds_dec < 3.0 {
            "dog (2-3)"
        } else {
            "long (>3)"
        };
        grouped.entry(key).or_default().push(bet);
    }

    let mut results: Vec<DimensionAnalysis> = grouped
        .iter()
        .map(|(key, group)| DimensionAnalysis::from_group(key, group))
        .collect();

    results.sort_by(|a, b| a.key.cmp(&b.key));
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(stake: f64, pnl: f64, odds_dec: f64, bankroll_after: f64, side: BetSide) -> BetRecord {
        BetRecord {
            stake,
            pnl,
            win: pnl > 0.0,
            odds_dec,
            bankroll_after,
            side,
            win_prob: 0.55,
            expected_value: 0.55 * odds_dec,
        }
    }

    fn create_test_bets() -> Vec<BetRecord> {
        vec![
            record(100.0, 150.0, 2.5, 1150.0, BetSide::Underdog),
            record(100.0, -100.0, 1.5, 1050.0, BetSide::Favorite),
            record(100.0, 80.0, 1.8, 1130.0, BetSide::Favorite),
        ]
    }

    #[test]
    fn test_calculate_metrics() {
        let bets = create_test_bets();
        let metrics = calculate_metrics(&bets, 1000.0);

        assert_eq!(metrics.total_bets, 3);
        assert_eq!(metrics.placed_bets, 3);
        assert_eq!(metrics.winning_bets, 2);
        assert!((metrics.hit_rate - 0.6667).abs() < 0.01);
        assert!((metrics.gross_profit - 230.0).abs() < 1e-9);
        assert!((metrics.gross_loss - 100.0).abs() < 1e-9);
        assert!((metrics.net_profit - 130.0).abs() < 1e-9);
        assert!((metrics.roi - 130.0 / 300.0).abs() < 1e-9);
        assert!((metrics.profit_factor - 2.3).abs() < 1e-9);
        assert_eq!(metrics.final_bankroll, 1130.0);
    }

    #[test]
    fn test_calculate_metrics_empty() {
        let metrics = calculate_metrics(&[], 1000.0);

        assert_eq!(metrics.total_bets, 0);
        assert_eq!(metrics.winning_bets, 0);
        assert_eq!(metrics.hit_rate, 0.0);
        assert_eq!(metrics.final_bankroll, 1000.0);
    }

    #[test]
    fn test_max_drawdown() {
        let bets = vec![
            record(100.0, 100.0, 2.0, 1100.0, BetSide::Favorite),
            record(100.0, -100.0, 2.0, 1000.0, BetSide::Favorite),
            record(100.0, -100.0, 2.0, 900.0, BetSide::Favorite),
        ];

        let metrics = calculate_metrics(&bets, 1000.0);

        // Bankroll: 1100, 1000, 900 -> peak 1100, drawdown 200
        assert!((metrics.max_drawdown - 200.0).abs() < 1e-9);
        assert!((metrics.max_drawdown_pct - 200.0 / 1100.0).abs() < 1e-9);
    }

    #[test]
    fn test_drawdown_from_initial_bankroll() {
        let bets = vec![record(100.0, -100.0, 2.0, 900.0, BetSide::Favorite)];
        let metrics = calculate_metrics(&bets, 1000.0);
        assert!((metrics.max_drawdown - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_calculate_sharpe_ratio() {
        let bets = create_test_bets();
        let sharpe = calculate_sharpe_ratio(&bets, 0.0);

        // Returns: 1.5, -1.0, 0.8 -> mean 0.433
        assert!(sharpe > 0.0);
    }

    #[test]
    fn test_sharpe_skips_zero_stakes() {
        let bets = vec![record(0.0, 0.0, 2.0, 1000.0, BetSide::Favorite)];
        assert_eq!(calculate_sharpe_ratio(&bets, 0.0), 0.0);
    }

    #[test]
    fn test_analyze_by_side() {
        let bets = create_test_bets();
        let analysis = analyze_by_side(&bets);

        assert_eq!(analysis.len(), 2);

        let fav = analysis.iter().find(|a| a.key == "favorite").unwrap();
        assert_eq!(fav.bets, 2);
        assert_eq!(fav.wins, 1);

        let dog = analysis.iter().find(|a| a.key == "underdog").unwrap();
        assert_eq!(dog.bets, 1);
        assert!((dog.roi - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_analyze_by_odds_range() {
        let bets = create_test_bets();
        let analysis = analyze_by_odds_range(&bets);

        // odds: 2.5 (dog), 1.5 (fav), 1.8 (fav)
        assert_eq!(analysis.len(), 2);
        let fav = analysis.iter().find(|a| a.key == "fav (1.5-2)").unwrap();
        assert_eq!(fav.bets, 2);
    }
}
