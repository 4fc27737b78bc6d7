use rand::Rng;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

/// State of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Dead,
    Alive,
}

impl Cell {
    pub fn is_alive(self) -> bool {
        self == Cell::Alive
    }

    /// Opposite state
    pub fn toggled(self) -> Cell {
        match self {
            Cell::Dead => Cell::Alive,
            Cell::Alive => Cell::Dead,
        }
    }

    /// Character used by the plain-text grid dump
    pub fn symbol(self) -> char {
        match self {
            Cell::Dead => '.',
            Cell::Alive => 'O',
        }
    }
}

impl From<bool> for Cell {
    fn from(alive: bool) -> Self {
        if alive {
            Cell::Alive
        } else {
            Cell::Dead
        }
    }
}

/// Errors raised while building a grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Zero width or height, or an area that does not fit in memory
    InvalidDimensions { width: usize, height: usize },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::InvalidDimensions { width, height } => {
                write!(f, "invalid grid dimensions {}x{}", width, height)
            }
        }
    }
}

impl Error for GridError {}

/// Fixed-size, hard-edged Life grid.
///
/// Coordinates are signed so callers can probe around the edges freely:
/// reads outside the grid see `Cell::Dead` and writes outside it are ignored.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    /// Staging buffer for the next generation, only touched by `life::step`
    next: Vec<Cell>,
}

impl Grid {
    /// Create an all-dead grid
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        let area = width
            .checked_mul(height)
            .filter(|&area| area > 0)
            .ok_or(GridError::InvalidDimensions { width, height })?;

        Ok(Self {
            width,
            height,
            cells: vec![Cell::Dead; area],
            next: vec![Cell::Dead; area],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Check whether (x, y) lies inside the grid
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        self.index(x, y).is_some()
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    /// Cell at (x, y), `Cell::Dead` outside the grid
    pub fn get(&self, x: i64, y: i64) -> Cell {
        self.index(x, y).map_or(Cell::Dead, |idx| self.cells[idx])
    }

    /// Overwrite the cell at (x, y); ignored outside the grid
    pub fn set(&mut self, x: i64, y: i64, cell: Cell) {
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = cell;
        }
    }

    /// Flip the cell at (x, y); ignored outside the grid
    pub fn toggle(&mut self, x: i64, y: i64) {
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = self.cells[idx].toggled();
        }
    }

    /// Kill every cell
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Dead);
    }

    /// Set every cell alive or dead with equal probability
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for cell in self.cells.iter_mut() {
            *cell = Cell::from(rng.gen_bool(0.5));
        }
    }

    /// Mark every cell of a horizontal run alive, clipping it to the grid.
    /// Returns the number of cells that landed inside the grid.
    pub(crate) fn fill_run(&mut self, x: i64, y: i64, len: u64) -> usize {
        let Ok(row) = usize::try_from(y) else {
            return 0;
        };
        if row >= self.height || len == 0 {
            return 0;
        }

        let end = x.saturating_add(i64::try_from(len).unwrap_or(i64::MAX));
        let start = x.max(0);
        let end = end.min(self.width as i64);
        if start >= end {
            return 0;
        }

        let offset = row * self.width;
        let (start, end) = (start as usize, end as usize);
        self.cells[offset + start..offset + end].fill(Cell::Alive);
        end - start
    }

    /// Number of live cells
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.cells.iter().any(|c| c.is_alive())
    }

    /// Coordinates of every live cell in row-major order
    pub fn live_cells(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_alive())
            .map(move |(idx, _)| ((idx % self.width) as i64, (idx / self.width) as i64))
    }

    /// Current generation and the staging buffer, for the step function
    pub(crate) fn buffers_mut(&mut self) -> (&[Cell], &mut [Cell]) {
        (&self.cells, &mut self.next)
    }

    /// Promote the staged generation to current
    pub(crate) fn swap_buffers(&mut self) {
        std::mem::swap(&mut self.cells, &mut self.next);
    }
}

impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.cells == other.cells
    }
}

impl Eq for Grid {}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width) {
            let line: String = row.iter().map(|c| c.symbol()).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
