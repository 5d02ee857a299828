//! Grid storage for the puzzle board.
//!
//! This module contains:
//! - `CellCoord`: column/row coordinates on the rectangular grid
//! - `Unit`: an occupied cell, pairing a type with a stable identity
//! - `Grid`: column-major storage with random fill and gravity compaction
//!
//! The grid knows nothing about game rules; connectivity queries live in
//! [`crate::board`] and turn logic in [`crate::session`].

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Unit type index, in `[0, num_types)`.
pub type UnitType = u8;

/// Stable unit identity, unique across all fills of one grid.
///
/// Selection keys its visited sets by identity rather than by coordinate,
/// and a presentation layer can use identities to track sprites: an id
/// follows its unit when compaction slides cells around.
pub type UnitId = u32;

/// Column/row coordinate on the grid.
///
/// Signed so that raw input from a UI layer is representable even when out
/// of range; grid operations bounds-check and treat out-of-range
/// coordinates as empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct CellCoord {
    /// Column, 0-based from the left
    pub col: i32,
    /// Row, 0-based from the gravity end
    pub row: i32,
}

impl CellCoord {
    /// Create a new coordinate
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }
}

/// An occupied cell: a typed unit with a stable identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Which of the `num_types` kinds this unit is
    pub unit_type: UnitType,
    /// Identity that survives compaction
    pub id: UnitId,
}

/// Errors that can occur when constructing a grid
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub enum GridError {
    #[error("grid dimensions must be positive, got {columns}x{rows}")]
    InvalidDimension { columns: usize, rows: usize },

    #[error("unit type count must be positive")]
    InvalidTypeCount,

    #[error("unit type {unit_type} is outside [0, {num_types})")]
    TypeOutOfRange { unit_type: UnitType, num_types: u8 },

    #[error("layout column {column} has {got} rows, expected {expected}")]
    RaggedLayout {
        column: usize,
        got: usize,
        expected: usize,
    },
}

/// Column-major grid of optional units plus an identity index.
///
/// Invariant: `positions` maps exactly the ids of the occupied cells to
/// the coordinate they occupy, each id appearing once. Every mutating
/// operation re-establishes this before returning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    columns: usize,
    rows: usize,
    num_types: u8,
    /// `cells[col][row]`; `None` is an empty cell
    cells: Vec<Vec<Option<Unit>>>,
    /// Inverse index: where each live unit currently sits
    positions: HashMap<UnitId, CellCoord>,
    /// Next identity to hand out on fill
    next_id: UnitId,
}

impl Grid {
    /// Create a grid with every cell assigned a uniformly random type
    pub fn new(columns: usize, rows: usize, num_types: u8) -> Result<Self, GridError> {
        let mut rng = rand::thread_rng();
        Self::new_with_rng(columns, rows, num_types, &mut rng)
    }

    /// Create a randomly filled grid drawing from the given RNG
    /// (deterministic when the RNG is seeded)
    pub fn new_with_rng<R: Rng>(
        columns: usize,
        rows: usize,
        num_types: u8,
        rng: &mut R,
    ) -> Result<Self, GridError> {
        Self::validate_shape(columns, rows, num_types)?;

        let mut grid = Self {
            columns,
            rows,
            num_types,
            cells: vec![vec![None; rows]; columns],
            positions: HashMap::new(),
            next_id: 0,
        };
        grid.refill_with_rng(rng);
        Ok(grid)
    }

    /// Create a grid from an explicit column-major layout.
    ///
    /// `layout[col][row]` gives the unit type of each cell (`None` for
    /// empty). Identities are assigned in column-major order. This is the
    /// constructor for deterministic boards in tests and puzzle setups.
    pub fn from_unit_types(
        layout: Vec<Vec<Option<UnitType>>>,
        num_types: u8,
    ) -> Result<Self, GridError> {
        let columns = layout.len();
        let rows = layout.first().map_or(0, Vec::len);
        Self::validate_shape(columns, rows, num_types)?;

        for (column, cells) in layout.iter().enumerate() {
            if cells.len() != rows {
                return Err(GridError::RaggedLayout {
                    column,
                    got: cells.len(),
                    expected: rows,
                });
            }
            for cell in cells {
                if let Some(unit_type) = cell {
                    if *unit_type >= num_types {
                        return Err(GridError::TypeOutOfRange {
                            unit_type: *unit_type,
                            num_types,
                        });
                    }
                }
            }
        }

        let mut next_id: UnitId = 0;
        let mut cells = Vec::with_capacity(columns);
        for column_types in layout {
            let column: Vec<Option<Unit>> = column_types
                .into_iter()
                .map(|cell| {
                    cell.map(|unit_type| {
                        let id = next_id;
                        next_id += 1;
                        Unit { unit_type, id }
                    })
                })
                .collect();
            cells.push(column);
        }

        let mut grid = Self {
            columns,
            rows,
            num_types,
            cells,
            positions: HashMap::new(),
            next_id,
        };
        grid.rebuild_positions();
        Ok(grid)
    }

    fn validate_shape(columns: usize, rows: usize, num_types: u8) -> Result<(), GridError> {
        if columns == 0 || rows == 0 {
            return Err(GridError::InvalidDimension { columns, rows });
        }
        if num_types == 0 {
            return Err(GridError::InvalidTypeCount);
        }
        Ok(())
    }

    // ==================== Queries ====================

    /// Number of columns
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of distinct unit types cells are drawn from
    pub fn num_types(&self) -> u8 {
        self.num_types
    }

    /// Whether the coordinate lies inside the grid
    pub fn contains(&self, coord: CellCoord) -> bool {
        coord.col >= 0
            && coord.row >= 0
            && (coord.col as usize) < self.columns
            && (coord.row as usize) < self.rows
    }

    /// The unit at `coord`, if the coordinate is in bounds and occupied
    pub fn unit(&self, coord: CellCoord) -> Option<Unit> {
        if !self.contains(coord) {
            return None;
        }
        self.cells[coord.col as usize][coord.row as usize]
    }

    /// The unit type at `coord`, if occupied
    pub fn unit_type(&self, coord: CellCoord) -> Option<UnitType> {
        self.unit(coord).map(|unit| unit.unit_type)
    }

    /// The unit identity at `coord`, if occupied
    pub fn unit_id(&self, coord: CellCoord) -> Option<UnitId> {
        self.unit(coord).map(|unit| unit.id)
    }

    /// Where the unit with this identity currently sits
    pub fn position_of(&self, id: UnitId) -> Option<CellCoord> {
        self.positions.get(&id).copied()
    }

    /// Total occupied cells
    pub fn occupied_count(&self) -> usize {
        self.positions.len()
    }

    /// The up-to-4 orthogonally adjacent in-bounds coordinates.
    /// No diagonals, no wraparound.
    pub fn neighbors(&self, coord: CellCoord) -> Vec<CellCoord> {
        let mut result = Vec::with_capacity(4);
        for (dc, dr) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            let neighbor = CellCoord::new(coord.col + dc, coord.row + dr);
            if self.contains(neighbor) {
                result.push(neighbor);
            }
        }
        result
    }

    /// Per-cell unit types, column-major; the snapshot a presentation
    /// layer renders from
    pub fn type_matrix(&self) -> Vec<Vec<Option<UnitType>>> {
        self.cells
            .iter()
            .map(|column| column.iter().map(|cell| cell.map(|u| u.unit_type)).collect())
            .collect()
    }

    // ==================== Mutation ====================

    /// Re-randomize every cell in place, keeping dimensions.
    /// All units are replaced; fresh identities are assigned.
    pub fn refill_with_rng<R: Rng>(&mut self, rng: &mut R) {
        self.positions.clear();
        for col in 0..self.columns {
            for row in 0..self.rows {
                let id = self.next_id;
                self.next_id += 1;
                let unit_type = rng.gen_range(0..self.num_types);
                self.cells[col][row] = Some(Unit { unit_type, id });
                self.positions.insert(id, CellCoord::new(col as i32, row as i32));
            }
        }
        self.debug_validate();
    }

    /// Empty the given cells. Out-of-bounds or already-empty coordinates
    /// are ignored. Does not compact.
    pub fn remove_cells(&mut self, coords: &[CellCoord]) {
        for &coord in coords {
            if !self.contains(coord) {
                continue;
            }
            if let Some(unit) = self.cells[coord.col as usize][coord.row as usize].take() {
                self.positions.remove(&unit.id);
            }
        }
        self.debug_validate();
    }

    /// Two-phase gravity pass.
    ///
    /// Phase 1 slides the occupied cells of each column toward row 0,
    /// preserving their relative order. Phase 2 moves fully-empty columns
    /// behind the occupied ones, preserving the relative order of the
    /// rest. Identities travel with their cells; the position index is
    /// rebuilt afterward. Idempotent.
    pub fn compact(&mut self) {
        for column in &mut self.cells {
            let mut write = 0;
            for read in 0..self.rows {
                if let Some(unit) = column[read].take() {
                    column[write] = Some(unit);
                    write += 1;
                }
            }
        }

        let mut compacted: Vec<Vec<Option<Unit>>> = Vec::with_capacity(self.columns);
        let mut empty_columns = Vec::new();
        for column in self.cells.drain(..) {
            if column.iter().any(Option::is_some) {
                compacted.push(column);
            } else {
                empty_columns.push(column);
            }
        }
        compacted.extend(empty_columns);
        self.cells = compacted;

        self.rebuild_positions();
        self.debug_validate();
    }

    fn rebuild_positions(&mut self) {
        self.positions.clear();
        for (col, column) in self.cells.iter().enumerate() {
            for (row, cell) in column.iter().enumerate() {
                if let Some(unit) = cell {
                    self.positions
                        .insert(unit.id, CellCoord::new(col as i32, row as i32));
                }
            }
        }
    }

    /// Identity/position index consistency check; compiled out of release
    /// builds. A failure here means an internal bug, not bad input.
    fn debug_validate(&self) {
        #[cfg(debug_assertions)]
        {
            let mut occupied = 0;
            for (col, column) in self.cells.iter().enumerate() {
                debug_assert_eq!(column.len(), self.rows, "column {} lost its shape", col);
                for (row, cell) in column.iter().enumerate() {
                    if let Some(unit) = cell {
                        occupied += 1;
                        debug_assert_eq!(
                            self.positions.get(&unit.id),
                            Some(&CellCoord::new(col as i32, row as i32)),
                            "identity {} desynced from the position index",
                            unit.id
                        );
                    }
                }
            }
            debug_assert_eq!(
                occupied,
                self.positions.len(),
                "position index tracks a different number of units than the cells hold"
            );
        }
    }
}
