//! User input events and the session's outbound event stream.
//!
//! A host translates raw UI gestures into [`UserInput`] values and feeds
//! them to [`GameSession::handle_input`](crate::session::GameSession::handle_input);
//! each call returns the [`SessionEvent`]s the transition produced.

use crate::grid::CellCoord;
use serde::{Deserialize, Serialize};

/// The three input kinds the session accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserInput {
    /// A cell was picked (grid coordinates, already translated from the
    /// input device by the caller)
    SelectAt(CellCoord),
    /// The tool button; accepted but carries no core semantics
    SelectTool,
    /// The menu button; accepted but carries no core semantics
    SelectMenu,
}

/// Events that occur as a result of input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A matched group is now highlighted, awaiting confirm or cancel
    AreaSelected {
        cells: Vec<CellCoord>,
        score: u32,
    },

    /// The pending selection was dismissed without bursting
    SelectionCancelled,

    /// A confirmed group was burst and the board compacted
    GroupRemoved {
        units: usize,
        score: u32,
    },

    /// The board ran out of matches; the level is over
    LevelEnded {
        remaining_units: usize,
        clear_bonus: u32,
        level_score: u32,
    },

    /// The level target was met; play continues on a fresh board
    LevelCleared {
        level: u32,
        target: u32,
    },

    /// The level target was missed; the session is finished
    GameOver { final_score: u32 },

    /// The final level was cleared; the session is finished
    GameCleared { final_score: u32 },
}
