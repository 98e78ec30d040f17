use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ChessError, ChessResult};

/// Board geometry used by `Game::start`.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct GameConfig {
    pub rows: i32,
    pub columns: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig { rows: 8, columns: 8 }
    }
}

impl GameConfig {
    /// Smallest board that fits the standard back rank and pawn rows.
    pub const MIN_ROWS: i32 = 4;
    pub const MIN_COLUMNS: i32 = 8;
    /// Columns are named `a` to `z`.
    pub const MAX_ROWS: i32 = 26;
    pub const MAX_COLUMNS: i32 = 26;

    pub fn from_json(json: &str) -> ChessResult<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ChessResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|err| {
            ChessError::invalid_config(format!("cannot read {}: {err}", path.display()))
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> ChessResult<()> {
        if self.rows < Self::MIN_ROWS || self.columns < Self::MIN_COLUMNS {
            return Err(ChessError::invalid_config(format!(
                "board must be at least {}x{}, got {}x{}",
                Self::MIN_ROWS,
                Self::MIN_COLUMNS,
                self.rows,
                self.columns
            )));
        }
        if self.rows > Self::MAX_ROWS || self.columns > Self::MAX_COLUMNS {
            return Err(ChessError::invalid_config(format!(
                "board must be at most {}x{}, got {}x{}",
                Self::MAX_ROWS,
                Self::MAX_COLUMNS,
                self.rows,
                self.columns
            )));
        }
        Ok(())
    }
}
