//! Fill-path puzzle: generation and path tracing
//!
//! The generator carves a self-avoiding walk of active cells and keeps it as
//! the solution. The player traces a path from the same start; the level is
//! complete once the traced path is as long as the solution.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::{Result, SimError};
use super::grid::{Direction, Grid};
use super::maze::LevelGenerator;
use crate::consts::*;
use crate::manhattan;

/// Tuning for the solution walk
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillConfig {
    pub size: usize,
    pub path_min_length: u32,
    pub path_max_length: u32,
    pub hint_step: usize,
    pub max_attempts: u32,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            size: FILL_SIZE,
            path_min_length: FILL_PATH_MIN_LENGTH,
            path_max_length: FILL_PATH_MAX_LENGTH,
            hint_step: HINT_STEP,
            max_attempts: MAX_GENERATION_ATTEMPTS,
        }
    }
}

impl FillConfig {
    pub fn validate(&self) -> Result<()> {
        if self.size < 2 {
            return Err(SimError::InvalidConfig("fill grid needs at least 2x2 cells"));
        }
        if self.path_min_length >= self.path_max_length {
            return Err(SimError::InvalidConfig(
                "fill path minimum must be below its maximum",
            ));
        }
        if self.path_min_length as usize + 1 >= self.size * self.size {
            return Err(SimError::InvalidConfig("fill path minimum cannot fit in the grid"));
        }
        if self.max_attempts == 0 {
            return Err(SimError::InvalidConfig("generation needs at least one attempt"));
        }
        Ok(())
    }
}

/// Ordered walk of grid cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    positions: Vec<IVec2>,
}

impl Path {
    pub fn new(start: IVec2) -> Self {
        Self {
            positions: vec![start],
        }
    }

    pub fn positions(&self) -> &[IVec2] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Never true: a path always holds its start cell
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn start(&self) -> IVec2 {
        self.positions[0]
    }

    pub fn end(&self) -> IVec2 {
        self.positions[self.positions.len() - 1]
    }

    pub fn push(&mut self, pos: IVec2) {
        self.positions.push(pos);
    }

    /// Index of `pos` in the path, not counting the current end
    pub fn index_of(&self, pos: IVec2) -> Option<usize> {
        let body = &self.positions[..self.positions.len() - 1];
        body.iter().position(|&p| p == pos)
    }

    /// Keep positions `0..=index`, returning the ones removed
    pub fn truncate(&mut self, index: usize) -> Vec<IVec2> {
        self.positions.split_off(index + 1)
    }

    pub fn distance_from_end(&self, pos: IVec2) -> i32 {
        manhattan(self.end(), pos)
    }
}

/// Result of feeding one target cell to the puzzle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathOutcome {
    /// Off-grid, not adjacent, inactive, or level already complete
    Ignored,
    /// Path cut back to an earlier cell
    Retreated,
    /// Path grew by one cell
    Extended,
    /// Path grew to the solution length
    Completed,
}

/// A generated fill level plus the player's progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillPuzzle {
    grid: Grid,
    path: Path,
    solution: Path,
    hint_blocks: usize,
    hint_step: usize,
}

impl FillPuzzle {
    /// Build a puzzle from a solution walk; activates exactly its cells
    pub fn from_solution(size: usize, solution: Path, hint_step: usize) -> Result<Self> {
        let mut grid = Grid::new(size);
        for &pos in solution.positions() {
            grid.set_active(pos, true)?;
        }
        let start = solution.start();
        grid.set_visited(start, true)?;

        Ok(Self {
            grid,
            path: Path::new(start),
            solution,
            hint_blocks: 1,
            hint_step,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn solution(&self) -> &Path {
        &self.solution
    }

    pub fn is_completed(&self) -> bool {
        self.path.len() == self.solution.len()
    }

    /// Move the path toward `target`
    pub fn handle_input(&mut self, target: IVec2) -> Result<PathOutcome> {
        if self.is_completed() || !self.grid.contains(target) {
            return Ok(PathOutcome::Ignored);
        }

        if let Some(index) = self.path.index_of(target) {
            for pos in self.path.truncate(index) {
                self.grid.set_visited(pos, false)?;
            }
            return Ok(PathOutcome::Retreated);
        }

        if self.grid.is_active(target)? && self.path.distance_from_end(target) == 1 {
            self.path.push(target);
            self.grid.set_visited(target, true)?;
            if self.is_completed() {
                return Ok(PathOutcome::Completed);
            }
            return Ok(PathOutcome::Extended);
        }

        Ok(PathOutcome::Ignored)
    }

    /// Reveal more of the solution
    pub fn hint(&mut self) {
        self.hint_blocks += self.hint_step;
    }

    /// Solution prefix currently revealed; never includes the final cell
    pub fn hint_positions(&self) -> &[IVec2] {
        let shown = self.hint_blocks.min(self.solution.len() - 1);
        &self.solution.positions()[..shown]
    }
}

/// Result of a single solution walk
#[derive(Debug, Clone, PartialEq, Eq)]
enum Attempt {
    Accepted(Path),
    DeadEnd { iteration: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FillGenerator {
    config: FillConfig,
}

impl FillGenerator {
    pub fn new(config: FillConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FillConfig {
        &self.config
    }

    fn attempt<R: Rng + ?Sized>(&self, grid: &mut Grid, rng: &mut R) -> Result<Attempt> {
        grid.reset();

        let n = self.config.size as i32;
        let mut pos = IVec2::new(rng.random_range(0..n), rng.random_range(0..n));
        grid.set_active(pos, true)?;
        let mut solution = Path::new(pos);

        for iteration in 0..self.config.path_max_length {
            let mut options = Vec::with_capacity(4);
            for dir in Direction::ALL {
                let next = pos + dir.delta();
                if grid.contains(next) && !grid.is_active(next)? {
                    options.push(next);
                }
            }

            if options.is_empty() {
                if iteration <= self.config.path_min_length {
                    return Ok(Attempt::DeadEnd { iteration });
                }
                break;
            }

            pos = options[rng.random_range(0..options.len())];
            grid.set_active(pos, true)?;
            solution.push(pos);
        }

        Ok(Attempt::Accepted(solution))
    }
}

impl Default for FillGenerator {
    fn default() -> Self {
        Self {
            config: FillConfig::default(),
        }
    }
}

impl LevelGenerator for FillGenerator {
    type Level = FillPuzzle;

    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<FillPuzzle> {
        let mut scratch = Grid::new(self.config.size);

        for attempt in 1..=self.config.max_attempts {
            match self.attempt(&mut scratch, rng)? {
                Attempt::Accepted(solution) => {
                    log::info!(
                        "Fill puzzle generated after {} attempt(s): start={}, length={}",
                        attempt,
                        solution.start(),
                        solution.len()
                    );
                    return FillPuzzle::from_solution(
                        self.config.size,
                        solution,
                        self.config.hint_step,
                    );
                }
                Attempt::DeadEnd { iteration } => {
                    log::debug!(
                        "Fill attempt {} dead-ended at iteration {}",
                        attempt,
                        iteration
                    );
                }
            }
        }

        log::warn!(
            "Fill generation exhausted after {} attempts",
            self.config.max_attempts
        );
        Err(SimError::GenerationExhausted {
            attempts: self.config.max_attempts,
        })
    }
}
