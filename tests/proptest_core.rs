//! Property-Based Tests — Staking and Simulation Invariants

use proptest::prelude::*;

use wagersim::backtesting::{build_bet_records, MonteCarloSimulator};
use wagersim::core::{american_to_decimal, kelly_fraction, StakingPolicy};
use wagersim::GameRow;

fn game_row() -> impl Strategy<Value = GameRow> {
    (
        any::<bool>(),
        0.0f64..=1.0,
        any::<bool>(),
        any::<bool>(),
        -1000.0f64..-100.0,
        100.0f64..1000.0,
    )
        .prop_map(
            |(prediction, probability, home_win, home_favorite, fav_odds, dog_odds)| GameRow {
                prediction,
                probability,
                home_win,
                home_favorite,
                fav_odds,
                dog_odds,
            },
        )
}

// ── Odds and Kelly ──────────────────────────────────────────

proptest! {
    /// Decimal odds are always finite and above 1.
    #[test]
    fn decimal_odds_above_one(odds in -100_000.0f64..100_000.0) {
        let dec = american_to_decimal(odds);
        prop_assert!(dec.is_finite());
        prop_assert!(dec > 1.0, "decimal odds {dec} for {odds}");
    }

    /// Kelly fraction is non-negative and zero without edge.
    #[test]
    fn kelly_fraction_non_negative(p in 0.0f64..=1.0, b in 0.0f64..20.0) {
        let f = kelly_fraction(p, b);
        prop_assert!(f >= 0.0);
        if b * p <= 1.0 - p {
            prop_assert_eq!(f, 0.0);
        }
    }
}

// ── Bet records ─────────────────────────────────────────────

proptest! {
    /// Running bankroll equals the previous bankroll plus this bet's pnl.
    #[test]
    fn bankroll_follows_pnl(
        rows in prop::collection::vec(game_row(), 0..40),
        kelly in any::<bool>(),
    ) {
        let policy = if kelly {
            StakingPolicy::kelly(1_000.0)
        } else {
            StakingPolicy::flat(100.0, 1_000.0)
        };
        let records = build_bet_records(&rows, &policy);
        prop_assert_eq!(records.len(), rows.len());

        let mut previous = policy.initial_bankroll;
        for r in &records {
            prop_assert!(r.stake >= 0.0);
            prop_assert!(r.odds_dec > 1.0);
            if r.win {
                prop_assert!(r.pnl >= 0.0);
            } else {
                prop_assert_eq!(r.pnl, -r.stake);
            }
            prop_assert!((r.bankroll_after - (previous + r.pnl)).abs() < 1e-6 * previous.abs().max(1.0));
            previous = r.bankroll_after;
        }
    }

    /// Kelly staking never risks more than the running bankroll.
    #[test]
    fn kelly_never_bets_the_farm(rows in prop::collection::vec(game_row(), 1..40)) {
        let records = build_bet_records(&rows, &StakingPolicy::kelly(1_000.0));
        let mut bankroll = 1_000.0;
        for r in &records {
            prop_assert!(r.stake <= bankroll * (1.0 + 1e-9));
            prop_assert!(r.bankroll_after >= 0.0);
            bankroll = r.bankroll_after;
        }
    }
}

// ── Simulation summary ──────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Summary statistics are ordered and bounded.
    #[test]
    fn summary_is_well_formed(
        rows in prop::collection::vec(game_row(), 1..30),
        seed in any::<u64>(),
    ) {
        let records = build_bet_records(&rows, &StakingPolicy::flat(100.0, 1_000.0));
        let s = MonteCarloSimulator::new(&records)
            .run_seeded(2_000, Some(seed))
            .unwrap()
            .summary;

        prop_assert!((0.0..=1.0).contains(&s.prob_loss));
        prop_assert!(s.min_pnl <= s.pct25);
        prop_assert!(s.pct25 <= s.pct75);
        prop_assert!(s.pct75 <= s.max_pnl);
        prop_assert!(s.std_pnl >= 0.0);
    }
}
