//! Fixed cell collection laid out as a row-major rectangle.

use glam::Vec2;
use rail_defence_core::{CellCoord, CellSnapshot};

/// Single unit of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) coord: CellCoord,
    pub(crate) occupied: bool,
    pub(crate) placeable: bool,
}

impl Cell {
    /// Creates a cell that has not been assigned coordinates yet.
    pub(crate) const fn placeholder(placeable: bool) -> Self {
        Self {
            coord: CellCoord::new(0, 0),
            occupied: false,
            placeable,
        }
    }

    pub(crate) const fn snapshot(&self) -> CellSnapshot {
        CellSnapshot {
            coord: self.coord,
            occupied: self.occupied,
            placeable: self.placeable,
        }
    }
}

/// Assigns row-major coordinates: the i-th cell receives `(i mod width, i div width)`.
///
/// A zero width leaves the cells untouched.
pub(crate) fn assign_coordinates(cells: &mut [Cell], width: u32) {
    if width == 0 {
        return;
    }

    let width = width as usize;
    for (index, cell) in cells.iter_mut().enumerate() {
        let column = u32::try_from(index % width).unwrap_or(u32::MAX);
        let row = u32::try_from(index / width).unwrap_or(u32::MAX);
        cell.coord = CellCoord::new(column, row);
    }
}

/// Owns every cell of the session and answers coordinate lookups.
#[derive(Clone, Debug)]
pub(crate) struct GridTopology {
    columns: u32,
    rows: u32,
    tile_length: f32,
    cells: Vec<Cell>,
}

impl GridTopology {
    /// Builds a grid whose cells are all placeable except those listed in `blocked`.
    pub(crate) fn new(columns: u32, rows: u32, tile_length: f32, blocked: &[CellCoord]) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);

        let mut cells = vec![Cell::placeholder(true); capacity];
        assign_coordinates(&mut cells, columns);

        let mut grid = Self {
            columns,
            rows,
            tile_length,
            cells,
        };
        for &coord in blocked {
            if let Some(cell) = grid.cell_mut(coord) {
                cell.placeable = false;
            }
        }
        grid
    }

    pub(crate) const fn columns(&self) -> u32 {
        self.columns
    }

    pub(crate) const fn rows(&self) -> u32 {
        self.rows
    }

    pub(crate) const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Looks up a cell by coordinate.
    pub(crate) fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.index(coord).and_then(|index| self.cells.get(index))
    }

    pub(crate) fn cell_mut(&mut self, coord: CellCoord) -> Option<&mut Cell> {
        self.index(coord).and_then(|index| self.cells.get_mut(index))
    }

    pub(crate) fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Marks every cell free without touching placement eligibility.
    pub(crate) fn clear_occupancy(&mut self) {
        for cell in &mut self.cells {
            cell.occupied = false;
        }
    }

    /// World-space centre of the provided cell.
    pub(crate) fn cell_center(&self, coord: CellCoord) -> Vec2 {
        Vec2::new(
            (coord.column() as f32 + 0.5) * self.tile_length,
            (coord.row() as f32 + 0.5) * self.tile_length,
        )
    }

    fn index(&self, coord: CellCoord) -> Option<usize> {
        if coord.column() < self.columns && coord.row() < self.rows {
            let row = usize::try_from(coord.row()).ok()?;
            let column = usize::try_from(coord.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
