//! Popgrid - a same-type tile-bursting puzzle game engine
//!
//! This crate provides the core mechanics of the game, including:
//! - A rectangular grid of typed units with stable identities
//! - Connectivity-based selection (flood fill over same-type neighbors)
//! - Gravity compaction after removal
//! - A turn-based state machine with scoring and level progression
//!
//! # Architecture
//!
//! The engine is presentation-free and platform-agnostic. A host
//! translates raw UI gestures into [`UserInput`] events, feeds them to
//! [`GameSession::handle_input`], and renders from the returned
//! [`SessionEvent`] stream and the serializable session state. Control
//! flow is strictly host -> session -> board; the core registers no
//! callbacks and performs no I/O.
//!
//! # Modules
//!
//! - [`grid`]: grid storage, unit identities, gravity compaction
//! - [`board`]: connectivity queries and group removal
//! - [`input`]: inbound input events and outbound session events
//! - [`score`]: scoring formula and progression tables
//! - [`config`]: session construction parameters
//! - [`session`]: the per-turn state machine

pub mod board;
pub mod config;
pub mod grid;
pub mod input;
pub mod score;
pub mod session;

// Re-export commonly used types
pub use board::BoardEngine;
pub use config::GameConfig;
pub use grid::{CellCoord, Grid, GridError, Unit, UnitId, UnitType};
pub use input::{SessionEvent, UserInput};
pub use session::{GameOutcome, GameSession, SessionError, SessionPhase, SessionSnapshot};
