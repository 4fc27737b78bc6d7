//! Generation advance under Conway's B3/S23 rule.

use crate::grid::{Cell, Grid};

/// Moore neighbourhood offsets
const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Count live cells among the 8 neighbours of (x, y).
/// Neighbours past the grid edge count as dead; there is no wraparound.
pub fn count_live_neighbors(grid: &Grid, x: i64, y: i64) -> u8 {
    NEIGHBOR_OFFSETS
        .iter()
        .filter(|&&(dx, dy)| grid.get(x.saturating_add(dx), y.saturating_add(dy)).is_alive())
        .count() as u8
}

/// Conway's rule for a single cell
pub fn next_state(cell: Cell, live_neighbors: u8) -> Cell {
    match (cell, live_neighbors) {
        (Cell::Alive, 2) | (Cell::Alive, 3) => Cell::Alive, // Survival
        (Cell::Dead, 3) => Cell::Alive,                      // Birth
        _ => Cell::Dead,
    }
}

/// Same count as `count_live_neighbors`, reading straight from a row-major buffer
fn count_in_buffer(cells: &[Cell], width: usize, height: usize, x: usize, y: usize) -> u8 {
    let x_range = x.saturating_sub(1)..=(x + 1).min(width - 1);
    let y_range = y.saturating_sub(1)..=(y + 1).min(height - 1);

    let mut count = 0;
    for ny in y_range {
        for nx in x_range.clone() {
            if (nx, ny) != (x, y) && cells[ny * width + nx].is_alive() {
                count += 1;
            }
        }
    }
    count
}

/// Advance the grid by one generation.
///
/// Every next state is computed from the current generation into the grid's
/// staging buffer, which then replaces the current generation in a single
/// swap, so no cell ever sees a neighbour that was already updated.
pub fn step(grid: &mut Grid) {
    let width = grid.width();
    let height = grid.height();
    let (current, next) = grid.buffers_mut();

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let neighbors = count_in_buffer(current, width, height, x, y);
            next[idx] = next_state(current[idx], neighbors);
        }
    }

    grid.swap_buffers();
}

impl Grid {
    /// Advance by one generation, see [`step`]
    pub fn step(&mut self) {
        step(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    fn grid_with(width: usize, height: usize, cells: &[(i64, i64)]) -> Grid {
        let mut grid = Grid::new(width, height).unwrap();
        for &(x, y) in cells {
            grid.set(x, y, Cell::Alive);
        }
        grid
    }

    fn live_set(grid: &Grid) -> BTreeSet<(i64, i64)> {
        grid.live_cells().collect()
    }

    #[test]
    fn test_rule_table() {
        for n in 0..=8 {
            let survives = next_state(Cell::Alive, n) == Cell::Alive;
            let born = next_state(Cell::Dead, n) == Cell::Alive;
            assert_eq!(survives, n == 2 || n == 3, "survival with {} neighbours", n);
            assert_eq!(born, n == 3, "birth with {} neighbours", n);
        }
    }

    #[test]
    fn test_count_neighbors_interior_and_edges() {
        let full = grid_with(3, 3, &[(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1), (0, 2), (1, 2), (2, 2)]);
        assert_eq!(count_live_neighbors(&full, 1, 1), 8);
        assert_eq!(count_live_neighbors(&full, 0, 0), 3);
        assert_eq!(count_live_neighbors(&full, 1, 0), 5);
        assert_eq!(count_live_neighbors(&full, -1, -1), 1);
        assert_eq!(count_live_neighbors(&full, 10, 10), 0);
    }

    #[test]
    fn test_buffer_count_matches_public_count() {
        let mut grid = Grid::new(9, 7).unwrap();
        grid.randomize(&mut StdRng::seed_from_u64(42));
        let mut copy = grid.clone();
        let (current, _) = copy.buffers_mut();
        for y in 0..7 {
            for x in 0..9 {
                assert_eq!(
                    count_in_buffer(current, 9, 7, x, y),
                    count_live_neighbors(&grid, x as i64, y as i64)
                );
            }
        }
    }

    #[test]
    fn test_empty_grid_stays_empty() {
        let mut grid = Grid::new(10, 10).unwrap();
        grid.step();
        assert!(grid.is_empty());
    }

    #[test]
    fn test_step_keeps_dimensions() {
        for (w, h) in [(1, 1), (1, 7), (7, 1), (13, 4)] {
            let mut grid = Grid::new(w, h).unwrap();
            grid.randomize(&mut StdRng::seed_from_u64(w as u64 * 31 + h as u64));
            step(&mut grid);
            assert_eq!((grid.width(), grid.height()), (w, h));
        }
    }

    #[test]
    fn test_block_is_still_life() {
        let mut grid = grid_with(10, 10, &[(4, 4), (5, 4), (4, 5), (5, 5)]);
        let before = grid.clone();
        step(&mut grid);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_blinker_oscillates() {
        let horizontal = [(5, 5), (6, 5), (7, 5)];
        let mut grid = grid_with(10, 10, &horizontal);

        step(&mut grid);
        assert_eq!(live_set(&grid), BTreeSet::from([(6, 4), (6, 5), (6, 6)]));

        step(&mut grid);
        assert_eq!(live_set(&grid), BTreeSet::from(horizontal));
    }

    #[test]
    fn test_lone_corner_cell_dies() {
        let mut grid = grid_with(5, 5, &[(0, 0)]);
        step(&mut grid);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_no_wraparound() {
        // A vertical line on the left edge would feed births on the right
        // edge of a torus
        let mut grid = grid_with(6, 6, &[(0, 1), (0, 2), (0, 3)]);
        step(&mut grid);
        assert_eq!(live_set(&grid), BTreeSet::from([(0, 2), (1, 2)]));
        for y in 0..6 {
            assert_eq!(grid.get(5, y), Cell::Dead);
        }
    }

    #[test]
    fn test_updates_are_simultaneous() {
        // Row-major in-place updates would kill (0, 0) before (1, 1) counts it
        let mut grid = grid_with(3, 3, &[(0, 0), (2, 0), (0, 2)]);
        step(&mut grid);
        assert_eq!(live_set(&grid), BTreeSet::from([(1, 1)]));
    }

    #[test]
    fn test_step_is_deterministic() {
        let mut a = Grid::new(20, 15).unwrap();
        a.randomize(&mut StdRng::seed_from_u64(3));
        let mut b = a.clone();
        for _ in 0..5 {
            a.step();
            step(&mut b);
        }
        assert_eq!(a, b);
    }
}
