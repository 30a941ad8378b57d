//! Block occupancy grid
//!
//! Fixed-size grid mapping integer cells to the scene index of the block
//! that occupies them. Cell (0, 0) is the lower-left corner.

use glam::IVec2;

use crate::consts::MAX_GRID_CELLS;
use crate::error::{Result, SimError};

/// Von Neumann neighborhood offsets (N, S, E, W)
pub const NEIGHBORS: [IVec2; 4] = [
    IVec2::new(0, 1),
    IVec2::new(0, -1),
    IVec2::new(1, 0),
    IVec2::new(-1, 0),
];

#[derive(Debug, Clone)]
pub struct BlockGrid {
    width: u32,
    height: u32,
    cells: Vec<Option<usize>>,
}

impl BlockGrid {
    /// Allocate an empty `width` x `height` grid
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = Self::cell_count(width, height).ok_or_else(|| {
            SimError::InvalidConfig(format!(
                "grid {}x{} exceeds {} cells",
                width, height, MAX_GRID_CELLS
            ))
        })?;
        Ok(Self {
            width,
            height,
            cells: vec![None; len],
        })
    }

    /// Number of cells in a `width` x `height` grid, if it is allocatable
    pub fn cell_count(width: u32, height: u32) -> Option<usize> {
        (width as usize)
            .checked_mul(height as usize)
            .filter(|&n| n <= MAX_GRID_CELLS)
    }

    pub fn in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < self.width && (cell.y as u32) < self.height
    }

    fn index(&self, cell: IVec2) -> Option<usize> {
        if self.in_bounds(cell) {
            Some(cell.y as usize * self.width as usize + cell.x as usize)
        } else {
            None
        }
    }

    /// Scene index of the block at `cell`, if any
    pub fn get(&self, cell: IVec2) -> Option<usize> {
        self.index(cell).and_then(|i| self.cells[i])
    }

    pub fn is_occupied(&self, cell: IVec2) -> bool {
        self.get(cell).is_some()
    }

    /// Claim an empty cell for the block at scene index `body`
    pub fn insert(&mut self, cell: IVec2, body: usize) -> Result<()> {
        let i = self.index(cell).ok_or(SimError::GridOutOfBounds {
            cell,
            width: self.width,
            height: self.height,
        })?;
        if self.cells[i].is_some() {
            return Err(SimError::CellOccupied(cell));
        }
        self.cells[i] = Some(body);
        Ok(())
    }

    /// Scene indices of the blocks in the occupied neighbor cells
    pub fn occupied_neighbors(&self, cell: IVec2) -> impl Iterator<Item = usize> + '_ {
        NEIGHBORS.iter().filter_map(move |&offset| self.get(cell + offset))
    }

    /// Number of occupied blocks
    pub fn len(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_none())
    }

    /// Point every occupied cell at a new scene index
    pub(crate) fn remap(&mut self, mut f: impl FnMut(usize) -> usize) {
        for cell in self.cells.iter_mut().flatten() {
            *cell = f(*cell);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut grid = BlockGrid::new(4, 3).unwrap();
        grid.insert(IVec2::new(1, 2), 7).unwrap();
        assert_eq!(grid.get(IVec2::new(1, 2)), Some(7));
        assert!(grid.get(IVec2::new(2, 1)).is_none());
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_insert_rejects_out_of_bounds() {
        let mut grid = BlockGrid::new(4, 3).unwrap();
        assert!(matches!(
            grid.insert(IVec2::new(4, 0), 0),
            Err(SimError::GridOutOfBounds { .. })
        ));
        assert!(matches!(
            grid.insert(IVec2::new(0, -1), 0),
            Err(SimError::GridOutOfBounds { .. })
        ));
        assert!(grid.is_empty());
    }

    #[test]
    fn test_insert_rejects_occupied() {
        let mut grid = BlockGrid::new(4, 4).unwrap();
        grid.insert(IVec2::new(1, 1), 0).unwrap();
        assert!(matches!(
            grid.insert(IVec2::new(1, 1), 1),
            Err(SimError::CellOccupied(_))
        ));
    }

    #[test]
    fn test_neighbors_ignore_diagonals_and_edges() {
        let mut grid = BlockGrid::new(3, 3).unwrap();
        grid.insert(IVec2::new(0, 0), 0).unwrap();
        grid.insert(IVec2::new(1, 0), 1).unwrap();
        grid.insert(IVec2::new(1, 1), 2).unwrap();
        let mut n: Vec<usize> = grid.occupied_neighbors(IVec2::new(0, 0)).collect();
        n.sort();
        // (1, 1) is diagonal to (0, 0)
        assert_eq!(n, vec![1]);
    }

    #[test]
    fn test_remap() {
        let mut grid = BlockGrid::new(2, 2).unwrap();
        grid.insert(IVec2::new(0, 0), 3).unwrap();
        grid.insert(IVec2::new(1, 1), 5).unwrap();
        grid.remap(|i| i - 1);
        assert_eq!(grid.get(IVec2::new(0, 0)), Some(2));
        assert_eq!(grid.get(IVec2::new(1, 1)), Some(4));
    }

    #[test]
    fn test_oversized_grid_is_rejected() {
        assert_eq!(BlockGrid::cell_count(4, 3), Some(12));
        assert_eq!(BlockGrid::cell_count(4_000_000_000, 4_000_000_000), None);
        assert!(matches!(
            BlockGrid::new(u32::MAX, u32::MAX),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_is_occupied() {
        let mut grid = BlockGrid::new(2, 2).unwrap();
        grid.insert(IVec2::new(1, 0), 0).unwrap();
        assert!(grid.is_occupied(IVec2::new(1, 0)));
        assert!(!grid.is_occupied(IVec2::new(0, 1)));
        assert!(!grid.is_occupied(IVec2::new(5, 5)));
    }
}
