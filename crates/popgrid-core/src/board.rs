//! Board engine: connectivity queries and group removal over a [`Grid`].
//!
//! This is the game-facing surface of the board:
//! - `is_matchable`: does a cell open a selection
//! - `compute_match_group`: the full same-type connected component
//! - `remove_group`: burst a group, then let gravity close the gaps
//! - `has_any_match_available`: is the board still playable

use crate::grid::{CellCoord, Grid, GridError, UnitId};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Connectivity and removal operations over a grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardEngine {
    grid: Grid,
}

impl BoardEngine {
    /// Create an engine over a freshly randomized grid
    pub fn new(columns: usize, rows: usize, num_types: u8) -> Result<Self, GridError> {
        let mut rng = rand::thread_rng();
        Self::new_with_rng(columns, rows, num_types, &mut rng)
    }

    /// Create an engine over a grid filled from the given RNG
    pub fn new_with_rng<R: Rng>(
        columns: usize,
        rows: usize,
        num_types: u8,
        rng: &mut R,
    ) -> Result<Self, GridError> {
        Ok(Self {
            grid: Grid::new_with_rng(columns, rows, num_types, rng)?,
        })
    }

    /// Wrap an existing grid (deterministic boards for tests and puzzles)
    pub fn from_grid(grid: Grid) -> Self {
        Self { grid }
    }

    /// Read access to the underlying grid
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Total occupied cells
    pub fn occupied_count(&self) -> usize {
        self.grid.occupied_count()
    }

    /// True iff `pos` is occupied and at least one in-bounds orthogonal
    /// neighbor holds the same type. At most 4 neighbor checks.
    pub fn is_matchable(&self, pos: CellCoord) -> bool {
        let unit_type = match self.grid.unit_type(pos) {
            Some(t) => t,
            None => return false,
        };
        self.grid
            .neighbors(pos)
            .into_iter()
            .any(|n| self.grid.unit_type(n) == Some(unit_type))
    }

    /// Flood fill over same-type adjacency starting at `seed`.
    ///
    /// Returns every position in the connected component reachable from
    /// the seed through same-type neighbors. A non-matchable seed yields
    /// an empty group, never a singleton: matching takes at least two
    /// connected units. The pending/checked sets are keyed by unit
    /// identity, and the result order is unspecified.
    pub fn compute_match_group(&self, seed: CellCoord) -> Vec<CellCoord> {
        if !self.is_matchable(seed) {
            return Vec::new();
        }
        let (seed_type, seed_id) = match self.grid.unit(seed) {
            Some(unit) => (unit.unit_type, unit.id),
            None => return Vec::new(),
        };

        let mut pending = vec![seed_id];
        let mut checked: HashSet<UnitId> = HashSet::new();

        while let Some(id) = pending.pop() {
            if !checked.insert(id) {
                continue;
            }
            let pos = match self.grid.position_of(id) {
                Some(pos) => pos,
                None => continue,
            };
            for neighbor in self.grid.neighbors(pos) {
                if self.grid.unit_type(neighbor) != Some(seed_type) {
                    continue;
                }
                if let Some(neighbor_id) = self.grid.unit_id(neighbor) {
                    if !checked.contains(&neighbor_id) {
                        pending.push(neighbor_id);
                    }
                }
            }
        }

        checked
            .into_iter()
            .filter_map(|id| self.grid.position_of(id))
            .collect()
    }

    /// Burst a group: remove every cell in it, then compact.
    /// Mutates the grid irreversibly.
    pub fn remove_group(&mut self, group: &[CellCoord]) {
        self.grid.remove_cells(group);
        self.grid.compact();
    }

    /// Whether any matchable cell remains. False for boards holding one
    /// unit or fewer; otherwise the scan short-circuits on the first hit.
    pub fn has_any_match_available(&self) -> bool {
        if self.occupied_count() <= 1 {
            return false;
        }
        for col in 0..self.grid.columns() as i32 {
            for row in 0..self.grid.rows() as i32 {
                let pos = CellCoord::new(col, row);
                if self.grid.unit_type(pos).is_some() && self.is_matchable(pos) {
                    return true;
                }
            }
        }
        false
    }

    /// Re-randomize the grid in place, keeping dimensions (level advance)
    pub fn refill_with_rng<R: Rng>(&mut self, rng: &mut R) {
        self.grid.refill_with_rng(rng);
    }

    /// Rebuild the grid with new dimensions (explicit resize)
    pub fn reset(&mut self, columns: usize, rows: usize, num_types: u8) -> Result<(), GridError> {
        let mut rng = rand::thread_rng();
        self.reset_with_rng(columns, rows, num_types, &mut rng)
    }

    /// Rebuild the grid with new dimensions, filling from the given RNG
    pub fn reset_with_rng<R: Rng>(
        &mut self,
        columns: usize,
        rows: usize,
        num_types: u8,
        rng: &mut R,
    ) -> Result<(), GridError> {
        self.grid = Grid::new_with_rng(columns, rows, num_types, rng)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(layout: Vec<Vec<Option<u8>>>, num_types: u8) -> BoardEngine {
        BoardEngine::from_grid(Grid::from_unit_types(layout, num_types).unwrap())
    }

    fn sorted(mut group: Vec<CellCoord>) -> Vec<CellCoord> {
        group.sort_by_key(|c| (c.col, c.row));
        group
    }

    #[test]
    fn test_isolated_cell_is_not_matchable() {
        // 0 1
        // 1 0
        let board = engine(vec![vec![Some(0), Some(1)], vec![Some(1), Some(0)]], 2);
        assert!(!board.is_matchable(CellCoord::new(0, 0)));
        assert!(!board.is_matchable(CellCoord::new(1, 1)));
    }

    #[test]
    fn test_matchable_needs_a_same_type_neighbor() {
        let board = engine(vec![vec![Some(0), Some(0)], vec![Some(1), Some(2)]], 3);
        assert!(board.is_matchable(CellCoord::new(0, 0)));
        assert!(board.is_matchable(CellCoord::new(0, 1)));
        assert!(!board.is_matchable(CellCoord::new(1, 0)));
    }

    #[test]
    fn test_out_of_bounds_is_not_matchable() {
        let board = engine(vec![vec![Some(0), Some(0)]], 1);
        assert!(!board.is_matchable(CellCoord::new(5, 0)));
        assert!(!board.is_matchable(CellCoord::new(-1, -1)));
    }

    #[test]
    fn test_non_matchable_seed_yields_empty_group() {
        let board = engine(vec![vec![Some(0), Some(1)], vec![Some(1), Some(0)]], 2);
        assert!(board.compute_match_group(CellCoord::new(0, 0)).is_empty());
        assert!(board.compute_match_group(CellCoord::new(99, 0)).is_empty());
    }

    #[test]
    fn test_match_group_is_the_full_connected_component() {
        // Column-major layout; the 0-component snakes through three columns:
        //   col0: 0 0 1
        //   col1: 1 0 1
        //   col2: 0 0 1
        let board = engine(
            vec![
                vec![Some(0), Some(0), Some(1)],
                vec![Some(1), Some(0), Some(1)],
                vec![Some(0), Some(0), Some(1)],
            ],
            2,
        );

        let group = sorted(board.compute_match_group(CellCoord::new(0, 0)));
        assert_eq!(
            group,
            vec![
                CellCoord::new(0, 0),
                CellCoord::new(0, 1),
                CellCoord::new(1, 1),
                CellCoord::new(2, 0),
                CellCoord::new(2, 1),
            ]
        );

        // Every seed inside the component finds the same group
        let from_other_seed = sorted(board.compute_match_group(CellCoord::new(2, 1)));
        assert_eq!(from_other_seed, group);
    }

    #[test]
    fn test_match_group_does_not_cross_other_types() {
        // Two 0-pairs separated by a 1-column must stay separate groups
        let board = engine(
            vec![
                vec![Some(0), Some(0)],
                vec![Some(1), Some(1)],
                vec![Some(0), Some(0)],
            ],
            2,
        );
        let left = sorted(board.compute_match_group(CellCoord::new(0, 0)));
        assert_eq!(left, vec![CellCoord::new(0, 0), CellCoord::new(0, 1)]);
    }

    #[test]
    fn test_remove_group_removes_and_compacts() {
        let mut board = engine(
            vec![
                vec![Some(0), Some(0), Some(1)],
                vec![Some(2), Some(2), Some(2)],
            ],
            3,
        );
        let group = board.compute_match_group(CellCoord::new(0, 0));
        assert_eq!(group.len(), 2);

        let before = board.occupied_count();
        board.remove_group(&group);
        assert_eq!(board.occupied_count(), before - group.len());

        // The survivor of column 0 fell to row 0
        assert_eq!(board.grid().unit_type(CellCoord::new(0, 0)), Some(1));
        assert_eq!(board.grid().unit_type(CellCoord::new(0, 1)), None);
    }

    #[test]
    fn test_single_unit_board_has_no_match() {
        let board = engine(vec![vec![Some(0), None], vec![None, None]], 1);
        assert!(!board.has_any_match_available());
    }

    #[test]
    fn test_checkerboard_is_stuck() {
        let board = engine(
            vec![
                vec![Some(0), Some(1), Some(0)],
                vec![Some(1), Some(0), Some(1)],
                vec![Some(0), Some(1), Some(0)],
            ],
            2,
        );
        assert!(!board.has_any_match_available());
    }

    #[test]
    fn test_any_match_short_circuits_true() {
        let board = engine(
            vec![
                vec![Some(0), Some(1), Some(0)],
                vec![Some(1), Some(0), Some(0)],
            ],
            2,
        );
        assert!(board.has_any_match_available());
    }

    #[test]
    fn test_reset_changes_dimensions() {
        let mut board = BoardEngine::new(4, 4, 3).unwrap();
        board.reset(6, 2, 2).unwrap();
        assert_eq!(board.grid().columns(), 6);
        assert_eq!(board.grid().rows(), 2);
        assert_eq!(board.occupied_count(), 12);

        assert!(matches!(
            board.reset(0, 2, 2),
            Err(GridError::InvalidDimension { .. })
        ));
    }
}
