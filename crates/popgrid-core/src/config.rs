//! Session construction parameters.

use crate::score::{CLEAR_BOARD_BONUS, LEVEL_TARGETS};
use serde::{Deserialize, Serialize};

/// Tuning knobs for a [`GameSession`](crate::session::GameSession).
///
/// The defaults reproduce the classic game: a 10x10 board of 5 types and
/// 20 levels. Dimensions, type count, and both scoring tables can be
/// overridden for testing or tuning; validation happens at session
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub columns: usize,
    pub rows: usize,
    pub num_types: u8,
    /// Last playable level; clearing it ends the game with `GameCleared`
    pub final_level: u32,
    /// Score thresholds; the target for level L is `level_targets[L - 1]`
    pub level_targets: Vec<u32>,
    /// Bonus per count of units remaining at level end; counts past the
    /// end of the table award nothing
    pub clear_board_bonus: Vec<u32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            columns: 10,
            rows: 10,
            num_types: 5,
            final_level: 20,
            level_targets: LEVEL_TARGETS.to_vec(),
            clear_board_bonus: CLEAR_BOARD_BONUS.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_the_classic_game() {
        let config = GameConfig::default();
        assert_eq!(config.columns, 10);
        assert_eq!(config.rows, 10);
        assert_eq!(config.num_types, 5);
        assert_eq!(config.final_level, 20);
        assert_eq!(config.level_targets.len(), 20);
        assert_eq!(config.level_targets[0], 1000);
        assert_eq!(config.clear_board_bonus.len(), 15);
    }

    #[test]
    fn test_partial_json_fills_in_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"columns": 6, "rows": 4}"#).unwrap();
        assert_eq!(config.columns, 6);
        assert_eq!(config.rows, 4);
        assert_eq!(config.num_types, 5);
        assert_eq!(config.level_targets.len(), 20);
    }
}
