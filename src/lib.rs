//! Conway's Game of Life engine.
//!
//! A hard-edged [`Grid`], the B3/S23 [`step`] function and a tolerant RLE
//! pattern loader. Hosts own the grid and drive it once per tick:
//!
//! ```
//! use conway_life::{load_pattern, Cell, Grid, Placement};
//!
//! let mut grid = Grid::new(10, 10).unwrap();
//! load_pattern("x = 3, y = 1\n3o!".as_bytes(), Placement::at(5, 5), &mut grid).unwrap();
//! conway_life::step(&mut grid);
//! assert_eq!(grid.get(6, 4), Cell::Alive);
//! ```

pub mod config;
pub mod grid;
pub mod life;
pub mod patterns;
pub mod rle;
pub mod session;

pub use grid::{Cell, Grid, GridError};
pub use life::{count_live_neighbors, step};
pub use patterns::PatternLibrary;
pub use rle::{load_pattern, load_pattern_file, PatternLoadError, Placement, RlePattern};
pub use session::Session;
