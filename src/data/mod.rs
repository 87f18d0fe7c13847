//! Data loading modules

pub mod csv_loader;

// Re-export commonly used types
pub use csv_loader::{games_from_frame, load_games, GameColumns, OUTCOME_COLUMN};
