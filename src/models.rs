use serde::{Deserialize, Serialize};

/// Per-game model output and market odds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameRow {
    /// Predicted class: true = home team wins
    pub prediction: bool,
    /// Predicted probability that the home team wins
    pub probability: f64,
    /// Ground truth: true = home team won
    pub home_win: bool,
    /// Whether the home team is the market favorite
    pub home_favorite: bool,
    /// Favorite's American odds
    pub fav_odds: f64,
    /// Underdog's American odds
    pub dog_odds: f64,
}

/// Which side of the market a bet backs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetSide {
    Favorite,
    Underdog,
}

impl BetSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            BetSide::Favorite => "favorite",
            BetSide::Underdog => "underdog",
        }
    }
}

impl GameRow {
    /// Side backed by the prediction
    ///
    /// Backing the home team means backing the favorite when the home team
    /// is favored; backing the away team means the opposite side.
    pub fn side_backed(&self) -> BetSide {
        if self.prediction == self.home_favorite {
            BetSide::Favorite
        } else {
            BetSide::Underdog
        }
    }

    /// Win probability attached to the predicted winner
    pub fn selection_probability(&self) -> f64 {
        if self.prediction {
            self.probability
        } else {
            1.0 - self.probability
        }
    }

    /// American odds for a side
    pub fn odds_for(&self, side: BetSide) -> f64 {
        match side {
            BetSide::Favorite => self.fav_odds,
            BetSide::Underdog => self.dog_odds,
        }
    }

    /// Whether the predicted class matched the outcome
    pub fn is_correct(&self) -> bool {
        self.prediction == self.home_win
    }
}
