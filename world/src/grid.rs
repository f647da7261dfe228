//! Dense fixed-extent grid of cells.

use pursuit_core::{CellCoord, GridError};

use crate::{cell::Cell, neighbors::NeighborTable};

/// Largest number of cells a grid may hold.
pub const MAX_GRID_CELLS: usize = 1 << 22;

/// Fixed `columns x rows` collection of cells stored in row-major order.
///
/// Every coordinate inside the extent owns exactly one [`Cell`]; the extent
/// never changes after construction.
#[derive(Clone, Debug)]
pub struct Grid {
    columns: u32,
    rows: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Builds a grid and precomputes every cell's neighbour links.
    ///
    /// Extents holding more than [`MAX_GRID_CELLS`] cells are refused before
    /// anything is allocated.
    pub fn build(columns: u32, rows: u32) -> Result<Self, GridError> {
        let too_large = GridError::TooLarge {
            columns,
            rows,
            limit: MAX_GRID_CELLS,
        };
        let cells = u64::from(columns)
            .checked_mul(u64::from(rows))
            .and_then(|cells| usize::try_from(cells).ok())
            .ok_or(too_large)?;
        if cells > MAX_GRID_CELLS {
            return Err(too_large);
        }
        Ok(Self::allocate(columns, rows))
    }

    /// Builds an extent already known to fit under [`MAX_GRID_CELLS`].
    pub(crate) fn allocate(columns: u32, rows: u32) -> Self {
        let table = NeighborTable::new(columns, rows);
        let cells = (0..rows)
            .flat_map(|row| (0..columns).map(move |column| CellCoord::new(column, row)))
            .map(|coord| Cell::new(coord, table.links(coord)))
            .collect();

        Self {
            columns,
            rows,
            cells,
        }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the grid has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Looks up the cell at `coord`.
    pub fn get(&self, coord: CellCoord) -> Result<&Cell, GridError> {
        let index = self.index(coord)?;
        Ok(&self.cells[index])
    }

    /// Looks up the cell at `coord` for mutation.
    pub fn get_mut(&mut self, coord: CellCoord) -> Result<&mut Cell, GridError> {
        let index = self.index(coord)?;
        Ok(&mut self.cells[index])
    }

    /// Visits every cell exactly once in row-major order.
    pub fn for_each_cell<F>(&self, mut visitor: F)
    where
        F: FnMut(&Cell),
    {
        for cell in &self.cells {
            visitor(cell);
        }
    }

    /// Visits every cell exactly once in row-major order, allowing mutation.
    pub fn for_each_cell_mut<F>(&mut self, mut visitor: F)
    where
        F: FnMut(&mut Cell),
    {
        for cell in &mut self.cells {
            visitor(cell);
        }
    }

    /// Iterator over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    fn index(&self, cell: CellCoord) -> Result<usize, GridError> {
        let out_of_bounds = GridError::OutOfBounds {
            cell,
            columns: self.columns,
            rows: self.rows,
        };
        if !self.contains(cell) {
            return Err(out_of_bounds);
        }
        let row = usize::try_from(cell.row()).map_err(|_| out_of_bounds)?;
        let column = usize::try_from(cell.column()).map_err(|_| out_of_bounds)?;
        let width = usize::try_from(self.columns).map_err(|_| out_of_bounds)?;
        Ok(row * width + column)
    }
}
