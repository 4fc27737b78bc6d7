use crate::grid::Grid;
use crate::rle::{self, PatternLoadError, Placement};
use log::debug;
use rand::Rng;
use std::io::Read;

/// Host-side simulation state: the grid plus the play/pause and tick cadence.
///
/// The host calls [`Session::tick`] once per rendered frame; a generation is
/// stepped every `update_frequency` frames while playing.
#[derive(Debug, Clone)]
pub struct Session {
    grid: Grid,
    pub is_playing: bool,
    update_frequency: u32,
    frame_count: u32,
    generation: u64,
}

impl Session {
    pub fn new(grid: Grid, update_frequency: u32) -> Self {
        Self {
            grid,
            is_playing: true,
            update_frequency: update_frequency.max(1),
            frame_count: 0,
            generation: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn update_frequency(&self) -> u32 {
        self.update_frequency
    }

    /// Advance one frame. Returns true if a generation was stepped.
    pub fn tick(&mut self) -> bool {
        if self.is_playing {
            self.frame_count += 1;
        }

        if self.frame_count >= self.update_frequency {
            self.frame_count = 0;
            self.advance();
            true
        } else {
            false
        }
    }

    fn advance(&mut self) {
        self.grid.step();
        self.generation += 1;
        debug!(
            "generation {} population {}",
            self.generation,
            self.grid.population()
        );
    }

    /// Toggle play/pause state
    pub fn toggle_playing(&mut self) {
        self.is_playing = !self.is_playing;
    }

    /// Step a single generation by hand; only allowed while paused
    pub fn step_once(&mut self) -> bool {
        if self.is_playing {
            return false;
        }
        self.advance();
        true
    }

    /// Clear the grid and pause
    pub fn clear(&mut self) {
        self.grid.clear();
        self.is_playing = false;
        self.generation = 0;
    }

    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.grid.randomize(rng);
        self.generation = 0;
    }

    pub fn toggle_cell(&mut self, x: i64, y: i64) {
        self.grid.toggle(x, y);
    }

    /// Fewer frames between generations, never below 1
    pub fn speed_up(&mut self) {
        if self.update_frequency > 1 {
            self.update_frequency -= 1;
        }
    }

    /// More frames between generations
    pub fn slow_down(&mut self) {
        self.update_frequency = self.update_frequency.saturating_add(1);
    }

    /// Load an RLE pattern onto the session grid
    pub fn load_pattern<R: Read>(
        &mut self,
        source: R,
        placement: Placement,
    ) -> Result<(), PatternLoadError> {
        rle::load_pattern(source, placement, &mut self.grid)?;
        self.pattern_placed(placement);
        Ok(())
    }

    /// Mutable grid access for pattern libraries and other loaders.
    /// Call [`Session::pattern_placed`] afterwards.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Bookkeeping after a pattern has been stamped
    pub fn pattern_placed(&mut self, placement: Placement) {
        if placement.clear_before {
            self.generation = 0;
        }
    }
}
