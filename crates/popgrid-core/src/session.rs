//! Game session state machine.
//!
//! This module contains the main `GameSession` struct and the per-turn
//! rules layered on top of the board: opening a selection, confirming or
//! cancelling it, scoring, and level progression.
//!
//! The session owns its [`BoardEngine`] and drives it synchronously; each
//! input event is handled to completion before the next is accepted.

use crate::board::BoardEngine;
use crate::config::GameConfig;
use crate::grid::{CellCoord, GridError, UnitType};
use crate::input::{SessionEvent, UserInput};
use crate::score;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// No selection pending; a matchable `SelectAt` opens one
    WaitingForInput,
    /// A matched group is highlighted, awaiting confirm or cancel
    AreaSelected,
    /// Terminal: the session no longer accepts input
    Finished { outcome: GameOutcome },
}

/// How a finished game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    /// The board ran out of matches below the level target
    GameOver,
    /// The final level's target was met
    GameCleared,
}

/// Errors that can occur when constructing or driving a session
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub enum SessionError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("level target table has {entries} entries but the final level is {final_level}")]
    LevelTableTooShort { final_level: u32, entries: usize },

    #[error("game is finished")]
    GameFinished,
}

/// The complete session state.
///
/// State fields are public for observation by a presentation layer; all
/// mutation goes through [`GameSession::handle_input`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    /// The board being played
    pub board: BoardEngine,
    /// Current phase
    pub phase: SessionPhase,
    /// Current level, 1-based
    pub current_level: u32,
    /// Cumulative match score across levels; compared against the target
    pub current_score: u32,
    /// Score threshold for the current level
    pub level_target: u32,
    /// Match score plus clear bonus accrued this level
    pub level_score: u32,
    /// Clear-board bonus awarded at the last level end
    pub clear_board_score: u32,
    /// Score the pending selection is worth
    pub selection_score: u32,
    /// The highlighted matched group; empty outside `AreaSelected`
    pub selection: Vec<CellCoord>,
    config: GameConfig,
    /// Seed chain for board fills (deterministic replays)
    rng_seed: u64,
}

/// Split the next fill RNG off the seed chain
fn next_rng(seed: &mut u64) -> StdRng {
    let mut rng = StdRng::seed_from_u64(*seed);
    *seed = rng.gen();
    rng
}

impl GameSession {
    /// Create a session with a randomly drawn seed
    pub fn new(config: GameConfig) -> Result<Self, SessionError> {
        let seed = rand::thread_rng().gen();
        Self::with_seed(config, seed)
    }

    /// Create a session whose board fills are fully determined by `seed`
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, SessionError> {
        // Level 1 must have a target even when final_level is 0
        let levels_needed = config.final_level.max(1) as usize;
        if config.level_targets.len() < levels_needed {
            return Err(SessionError::LevelTableTooShort {
                final_level: config.final_level,
                entries: config.level_targets.len(),
            });
        }

        let mut rng_seed = seed;
        let mut rng = next_rng(&mut rng_seed);
        let board =
            BoardEngine::new_with_rng(config.columns, config.rows, config.num_types, &mut rng)?;

        Ok(Self {
            board,
            phase: SessionPhase::WaitingForInput,
            current_level: 1,
            current_score: 0,
            level_target: config.level_targets[0],
            level_score: 0,
            clear_board_score: 0,
            selection_score: 0,
            selection: Vec::new(),
            config,
            rng_seed,
        })
    }

    /// Number of units in the pending selection
    pub fn units_selected(&self) -> usize {
        self.selection.len()
    }

    /// The construction-time configuration
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Feed one user input event through the state machine.
    ///
    /// Returns the outbound events the transition produced. Guard-false
    /// inputs (out-of-bounds or non-matchable coordinates, tool and menu
    /// events) return an empty event list and change nothing. A finished
    /// session rejects all input with [`SessionError::GameFinished`].
    pub fn handle_input(&mut self, input: UserInput) -> Result<Vec<SessionEvent>, SessionError> {
        if matches!(self.phase, SessionPhase::Finished { .. }) {
            return Err(SessionError::GameFinished);
        }

        let position = match input {
            UserInput::SelectAt(position) => position,
            // Accepted but inert: no core semantics are bound to these
            UserInput::SelectTool | UserInput::SelectMenu => return Ok(Vec::new()),
        };

        match self.phase {
            SessionPhase::WaitingForInput => Ok(self.open_selection(position)),
            SessionPhase::AreaSelected => Ok(self.confirm_or_cancel(position)),
            SessionPhase::Finished { .. } => Err(SessionError::GameFinished),
        }
    }

    // ==================== Transitions ====================

    /// WaitingForInput + SelectAt: open a selection when the cell matches
    fn open_selection(&mut self, position: CellCoord) -> Vec<SessionEvent> {
        let group = self.board.compute_match_group(position);
        if group.is_empty() {
            // Out of bounds or not matchable: silent no-op
            return Vec::new();
        }

        self.selection_score = score::selection_score(group.len());
        self.selection = group;
        self.phase = SessionPhase::AreaSelected;

        vec![SessionEvent::AreaSelected {
            cells: self.selection.clone(),
            score: self.selection_score,
        }]
    }

    /// AreaSelected + SelectAt: confirm when the pick lands inside the
    /// selection, cancel otherwise
    fn confirm_or_cancel(&mut self, position: CellCoord) -> Vec<SessionEvent> {
        if !self.selection.contains(&position) {
            self.selection.clear();
            self.selection_score = 0;
            self.phase = SessionPhase::WaitingForInput;
            return vec![SessionEvent::SelectionCancelled];
        }

        let group = std::mem::take(&mut self.selection);
        let units = group.len();
        let burst_score = self.selection_score;
        self.selection_score = 0;

        self.board.remove_group(&group);
        self.level_score += burst_score;
        self.current_score += burst_score;

        let mut events = vec![SessionEvent::GroupRemoved {
            units,
            score: burst_score,
        }];

        if self.board.has_any_match_available() {
            self.phase = SessionPhase::WaitingForInput;
        } else {
            events.extend(self.end_level());
        }

        events
    }

    // ==================== Level End ====================

    /// Entry action for the level-ended state: award the clear-board
    /// bonus, then advance to the next level, clear the game, or end it.
    fn end_level(&mut self) -> Vec<SessionEvent> {
        let remaining = self.board.occupied_count();
        self.clear_board_score =
            score::clear_board_bonus(remaining, &self.config.clear_board_bonus);
        self.level_score += self.clear_board_score;

        let mut events = vec![SessionEvent::LevelEnded {
            remaining_units: remaining,
            clear_bonus: self.clear_board_score,
            level_score: self.level_score,
        }];

        if self.current_score < self.level_target {
            self.phase = SessionPhase::Finished {
                outcome: GameOutcome::GameOver,
            };
            events.push(SessionEvent::GameOver {
                final_score: self.current_score,
            });
            return events;
        }

        if self.current_level < self.config.final_level {
            self.current_level += 1;
            self.level_target = self.config.level_targets[(self.current_level - 1) as usize];
            self.level_score = 0;
            self.clear_board_score = 0;

            let mut rng = next_rng(&mut self.rng_seed);
            self.board.refill_with_rng(&mut rng);
            self.phase = SessionPhase::WaitingForInput;

            events.push(SessionEvent::LevelCleared {
                level: self.current_level,
                target: self.level_target,
            });

            // A fresh fill can be unplayable for degenerate dimensions or
            // type counts; such a level ends immediately.
            if !self.board.has_any_match_available() {
                events.extend(self.end_level());
            }
        } else {
            self.phase = SessionPhase::Finished {
                outcome: GameOutcome::GameCleared,
            };
            events.push(SessionEvent::GameCleared {
                final_score: self.current_score,
            });
        }

        events
    }
}

// ==================== Snapshots ====================

/// JSON-friendly snapshot of the observable session state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub current_level: u32,
    pub current_score: u32,
    pub level_target: u32,
    pub level_score: u32,
    pub clear_board_score: u32,
    pub selection_score: u32,
    pub units_selected: usize,
    pub selection: Vec<CellCoord>,
    /// Per-cell unit types, column-major
    pub cells: Vec<Vec<Option<UnitType>>>,
}

impl GameSession {
    /// Capture the observable state for a presentation layer
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            current_level: self.current_level,
            current_score: self.current_score,
            level_target: self.level_target,
            level_score: self.level_score,
            clear_board_score: self.clear_board_score,
            selection_score: self.selection_score,
            units_selected: self.units_selected(),
            selection: self.selection.clone(),
            cells: self.board.grid().type_matrix(),
        }
    }

    /// The snapshot serialized to JSON
    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }
}
