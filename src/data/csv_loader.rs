//! CSV loading for per-game predictions and market odds

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{validate_binary, validate_probability, Result, SimError};
use crate::models::GameRow;

/// Ground-truth outcome column, always read under this name
pub const OUTCOME_COLUMN: &str = "home_win";

/// Names of the model-output and odds columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameColumns {
    pub pred_col: String,
    pub prob_col: String,
    pub home_fav_col: String,
    pub fav_odds_col: String,
    pub dog_odds_col: String,
}

impl Default for GameColumns {
    fn default() -> Self {
        Self {
            pred_col: "pred".to_string(),
            prob_col: "proba".to_string(),
            home_fav_col: "home_fav".to_string(),
            fav_odds_col: "fav_odds".to_string(),
            dog_odds_col: "dog_odds".to_string(),
        }
    }
}

impl GameColumns {
    fn names(&self) -> [&str; 5] {
        [
            &self.pred_col,
            &self.prob_col,
            &self.home_fav_col,
            &self.fav_odds_col,
            &self.dog_odds_col,
        ]
    }
}

/// Load game rows from a CSV file
pub fn load_games<P: AsRef<Path>>(csv_path: P, columns: &GameColumns) -> Result<Vec<GameRow>> {
    let path = csv_path.as_ref();
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let games = games_from_frame(&df, columns)?;
    info!(rows = games.len(), path = %path.display(), "Loaded game rows");
    Ok(games)
}

/// Extract game rows from an already loaded frame
pub fn games_from_frame(df: &DataFrame, columns: &GameColumns) -> Result<Vec<GameRow>> {
    let required = columns.names();
    for name in required.into_iter().chain([OUTCOME_COLUMN]) {
        if df.column(name).is_err() {
            return Err(SimError::Data(format!("Missing required column '{}'", name)));
        }
    }

    let preds = float_column(df, &columns.pred_col)?;
    let probs = float_column(df, &columns.prob_col)?;
    let actuals = float_column(df, OUTCOME_COLUMN)?;
    let home_favs = float_column(df, &columns.home_fav_col)?;
    let fav_odds = float_column(df, &columns.fav_odds_col)?;
    let dog_odds = float_column(df, &columns.dog_odds_col)?;

    let mut games = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let probability = probs[i];
        validate_probability(probability)
            .map_err(|e| SimError::Data(format!("Row {}: {}", i, e)))?;

        games.push(GameRow {
            prediction: validate_binary(&columns.pred_col, preds[i])?,
            probability,
            home_win: validate_binary(OUTCOME_COLUMN, actuals[i])?,
            home_favorite: validate_binary(&columns.home_fav_col, home_favs[i])?,
            fav_odds: fav_odds[i],
            dog_odds: dog_odds[i],
        });
    }

    debug!(rows = games.len(), "Converted frame to game rows");
    Ok(games)
}

/// Read a column as f64 values, rejecting nulls
fn float_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let series = df.column(name)?.cast(&DataType::Float64)?;
    let values = series.f64()?;

    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| {
            v.ok_or_else(|| SimError::Data(format!("Column '{}' has a null at row {}", name, i)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_games() {
        let file = write_csv(
            "home_win,pred,proba,home_fav,fav_odds,dog_odds\n\
             1,1,0.64,1,-150,130\n\
             0,1,0.55,0,-120,110\n\
             0,0,0.30,1,-200,170\n",
        );

        let games = load_games(file.path(), &GameColumns::default()).unwrap();

        assert_eq!(games.len(), 3);
        assert!(games[0].prediction);
        assert!(games[0].home_win);
        assert!(games[0].home_favorite);
        assert!((games[0].probability - 0.64).abs() < 1e-12);
        assert_eq!(games[0].fav_odds, -150.0);
        assert_eq!(games[0].dog_odds, 130.0);
        assert!(!games[1].home_favorite);
        assert!(!games[2].prediction);
    }

    #[test]
    fn test_load_games_custom_columns() {
        let file = write_csv(
            "home_win,y_hat,p_home,fav_home,ml_fav,ml_dog\n\
             1,1,0.70,1,-180,155\n",
        );
        let columns = GameColumns {
            pred_col: "y_hat".to_string(),
            prob_col: "p_home".to_string(),
            home_fav_col: "fav_home".to_string(),
            fav_odds_col: "ml_fav".to_string(),
            dog_odds_col: "ml_dog".to_string(),
        };

        let games = load_games(file.path(), &columns).unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].fav_odds, -180.0);
    }

    #[test]
    fn test_missing_column() {
        let file = write_csv("pred,proba,home_fav,fav_odds,dog_odds\n1,0.6,1,-150,130\n");
        let err = load_games(file.path(), &GameColumns::default()).unwrap_err();
        assert!(err.to_string().contains("home_win"));
    }

    #[test]
    fn test_non_binary_prediction() {
        let file = write_csv(
            "home_win,pred,proba,home_fav,fav_odds,dog_odds\n\
             1,2,0.64,1,-150,130\n",
        );
        assert!(matches!(
            load_games(file.path(), &GameColumns::default()),
            Err(SimError::Data(_))
        ));
    }

    #[test]
    fn test_probability_out_of_range() {
        let file = write_csv(
            "home_win,pred,proba,home_fav,fav_odds,dog_odds\n\
             1,1,1.4,1,-150,130\n",
        );
        assert!(load_games(file.path(), &GameColumns::default()).is_err());
    }

    #[test]
    fn test_null_cell_names_column_and_row() {
        let file = write_csv(
            "home_win,pred,proba,home_fav,fav_odds,dog_odds\n\
             1,1,0.64,1,-150,130\n\
             0,1,,1,-120,110\n",
        );

        match load_games(file.path(), &GameColumns::default()) {
            Err(SimError::Data(msg)) => {
                assert!(msg.contains("proba"), "{}", msg);
                assert!(msg.contains("row 1"), "{}", msg);
            }
            other => panic!("expected data error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        assert!(load_games("nonexistent.csv", &GameColumns::default()).is_err());
    }
}
