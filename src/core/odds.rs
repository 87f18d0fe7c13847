//! Odds Conversion
//!
//! Convert American odds quotes into decimal payout multipliers.
//!
//! ```text
//!     o > 0:  d = o / 100 + 1
//!     o <= 0: d = 100 / (|o| + ε) + 1
//! ```
//!
//! Where:
//!     o = American odds (e.g., +150, -200)
//!     d = decimal odds, total return per unit stake including principal
//!     ε = DECIMAL_EPS, keeps a quote of 0 finite

/// Small constant added to denominators to avoid division by zero
pub const DECIMAL_EPS: f64 = 1e-9;

/// Convert American odds to decimal odds
///
/// An American quote of exactly 0 is not valid, but still maps to a finite
/// (very large) multiplier instead of panicking.
///
/// # Examples
/// ```
/// use wagersim::core::odds::american_to_decimal;
/// assert!((american_to_decimal(150.0) - 2.5).abs() < 1e-9);
/// assert!((american_to_decimal(-200.0) - 1.5).abs() < 1e-9);
/// ```
pub fn american_to_decimal(odds: f64) -> f64 {
    if odds > 0.0 {
        odds / 100.0 + 1.0
    } else {
        100.0 / (odds.abs() + DECIMAL_EPS) + 1.0
    }
}

/// Probability implied by a decimal quote (ignoring the bookmaker margin)
pub fn implied_probability(decimal_odds: f64) -> f64 {
    if decimal_odds <= 0.0 {
        return 0.0;
    }
    1.0 / decimal_odds
}
