//! Constrained random-walk maze generation
//!
//! The walk starts on a random interior cell and repeatedly picks an
//! admissible direction, seals the cell behind it, runs forward for a random
//! length and seals the cell ahead. Attempts that dead-end too early or end
//! up too small are thrown away and the whole grid is regenerated.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::{Result, SimError};
use super::grid::{Direction, Grid};
use crate::consts::*;

/// Produces a fresh level from a random source
pub trait LevelGenerator {
    type Level;

    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Self::Level>;
}

/// Tuning for the maze walk
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    pub size: usize,
    pub actions_min_length: u32,
    pub actions_max_length: u32,
    pub path_max_length: u32,
    pub min_active: usize,
    pub min_disabled: usize,
    pub max_attempts: u32,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            size: MAZE_SIZE,
            actions_min_length: ACTIONS_MIN_LENGTH,
            actions_max_length: ACTIONS_MAX_LENGTH,
            path_max_length: PATH_MAX_LENGTH,
            min_active: MIN_ACTIVE_POINTS_COUNT,
            min_disabled: MIN_DISABLED_POINTS_COUNT,
            max_attempts: MAX_GENERATION_ATTEMPTS,
        }
    }
}

impl MazeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.size < 4 {
            return Err(SimError::InvalidConfig("maze needs a 2x2 interior"));
        }
        if self.path_max_length == 0 {
            return Err(SimError::InvalidConfig("maze run length range is empty"));
        }
        if self.actions_min_length >= self.actions_max_length {
            return Err(SimError::InvalidConfig(
                "maze walk minimum must be below its maximum",
            ));
        }
        let interior = (self.size - 2) * (self.size - 2);
        if self.min_active > interior {
            return Err(SimError::InvalidConfig(
                "maze minimum active count exceeds the interior",
            ));
        }
        if self.max_attempts == 0 {
            return Err(SimError::InvalidConfig("generation needs at least one attempt"));
        }
        Ok(())
    }
}

/// A generated maze and the cell the ball starts on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MazeLayout {
    pub grid: Grid,
    pub start: IVec2,
}

/// Result of a single generation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Accepted { start: IVec2 },
    DeadEnd { iteration: u32 },
    TooSmall { active: usize, disabled: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MazeGenerator {
    config: MazeConfig,
}

impl MazeGenerator {
    pub fn new(config: MazeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MazeConfig {
        &self.config
    }

    /// Regenerate `grid` in place, returning the start cell.
    ///
    /// Each attempt resets the whole grid. Gives up with `GenerationExhausted`
    /// once `max_attempts` attempts have been rejected.
    pub fn generate_into<R: Rng + ?Sized>(&self, grid: &mut Grid, rng: &mut R) -> Result<IVec2> {
        if grid.size() != self.config.size {
            *grid = Grid::new(self.config.size);
        }

        for attempt in 1..=self.config.max_attempts {
            match self.attempt(grid, rng)? {
                Attempt::Accepted { start } => {
                    log::info!(
                        "Maze generated after {} attempt(s): start={}, active={}, disabled={}",
                        attempt,
                        start,
                        grid.count_active(),
                        grid.count_disabled()
                    );
                    return Ok(start);
                }
                Attempt::DeadEnd { iteration } => {
                    log::debug!("Maze attempt {} dead-ended at iteration {}", attempt, iteration);
                }
                Attempt::TooSmall { active, disabled } => {
                    log::debug!(
                        "Maze attempt {} too small: active={}, disabled={}",
                        attempt,
                        active,
                        disabled
                    );
                }
            }
        }

        log::warn!(
            "Maze generation exhausted after {} attempts",
            self.config.max_attempts
        );
        grid.reset();
        Err(SimError::GenerationExhausted {
            attempts: self.config.max_attempts,
        })
    }

    fn attempt<R: Rng + ?Sized>(&self, grid: &mut Grid, rng: &mut R) -> Result<Attempt> {
        grid.reset();

        let n = self.config.size as i32;
        let start = IVec2::new(rng.random_range(1..n - 1), rng.random_range(1..n - 1));
        let cell = grid.cell_mut(start)?;
        cell.active = true;
        cell.visited = true;

        let mut pos = start;
        for iteration in 0..self.config.actions_max_length {
            let options = admissible_directions(grid, pos)?;
            if options.is_empty() {
                if iteration <= self.config.actions_min_length {
                    return Ok(Attempt::DeadEnd { iteration });
                }
                break;
            }

            let dir = options[rng.random_range(0..options.len())];
            let run_length = rng.random_range(0..self.config.path_max_length);
            pos = carve(grid, pos, dir, run_length)?;
        }

        let active = grid.count_active();
        let disabled = grid.count_disabled();
        if active < self.config.min_active || disabled < self.config.min_disabled {
            return Ok(Attempt::TooSmall { active, disabled });
        }

        Ok(Attempt::Accepted { start })
    }
}

impl Default for MazeGenerator {
    fn default() -> Self {
        Self {
            config: MazeConfig::default(),
        }
    }
}

impl LevelGenerator for MazeGenerator {
    type Level = MazeLayout;

    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<MazeLayout> {
        let mut grid = Grid::new(self.config.size);
        let start = self.generate_into(&mut grid, rng)?;
        Ok(MazeLayout { grid, start })
    }
}

/// Directions the walk may take from `pos`, in `Direction::ALL` order.
///
/// A direction is admissible when it does not lead onto the border ring, the
/// neighbour in that direction is not disabled, and the neighbour behind is
/// not active. The last check is skipped when `pos` sits on the far interior
/// edge opposite the direction of travel.
pub fn admissible_directions(grid: &Grid, pos: IVec2) -> Result<Vec<Direction>> {
    let low = 1;
    let high = grid.size() as i32 - 2;
    let mut options = Vec::with_capacity(4);

    for dir in Direction::ALL {
        let delta = dir.delta();
        let (coord, step) = if delta.x != 0 {
            (pos.x, delta.x)
        } else {
            (pos.y, delta.y)
        };

        // Moving toward the border ring
        let edge = if step < 0 { low } else { high };
        if coord == edge {
            continue;
        }
        if grid.is_disabled(pos + delta)? {
            continue;
        }

        // Backing edge: nothing behind to check inside the interior
        let back_edge = if step < 0 { high } else { low };
        if coord != back_edge && grid.is_active(pos - delta)? {
            continue;
        }

        options.push(dir);
    }

    Ok(options)
}

/// Run one walk iteration from `pos` in `dir`, returning the new position.
///
/// Seals the cell behind, steps onto fresh cells while the step index is
/// within `run_length` (already active cells never stop the run), then seals
/// the cell ahead of the final position.
pub fn carve(grid: &mut Grid, pos: IVec2, dir: Direction, run_length: u32) -> Result<IVec2> {
    let delta = dir.delta();

    let behind = pos - delta;
    if grid.is_interior(behind) && !grid.is_active(behind)? {
        grid.set_disabled(behind, true)?;
    }

    let mut pos = pos;
    let mut step = 0u32;
    loop {
        let next = pos + delta;
        if !grid.is_interior(next) || grid.is_disabled(next)? {
            break;
        }
        if !grid.is_active(next)? && step > run_length {
            break;
        }
        pos = next;
        grid.set_active(pos, true)?;
        step += 1;
    }

    let ahead = pos + delta;
    if grid.is_interior(ahead) && !grid.is_active(ahead)? {
        grid.set_disabled(ahead, true)?;
    }

    Ok(pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn generate(seed: u64) -> MazeLayout {
        let mut rng = Pcg32::seed_from_u64(seed);
        MazeGenerator::default().generate(&mut rng).unwrap()
    }

    fn grid_with_start(start: IVec2) -> Grid {
        let mut grid = Grid::new(MAZE_SIZE);
        grid.set_active(start, true).unwrap();
        grid.set_visited(start, true).unwrap();
        grid
    }

    #[test]
    fn test_fresh_start_allows_every_direction() {
        let grid = grid_with_start(IVec2::new(5, 5));
        let options = admissible_directions(&grid, IVec2::new(5, 5)).unwrap();
        assert_eq!(options, Direction::ALL.to_vec());
    }

    #[test]
    fn test_first_step_from_five_five() {
        let start = IVec2::new(5, 5);
        for dir in Direction::ALL {
            let mut grid = grid_with_start(start);
            let options = admissible_directions(&grid, start).unwrap();
            assert!(options.contains(&dir));
            assert!(!grid.is_disabled(start + dir.delta()).unwrap());

            let end = carve(&mut grid, start, dir, 0).unwrap();

            // Chosen neighbour entered, cell behind sealed
            assert_eq!(end, start + dir.delta());
            assert!(grid.is_active(start + dir.delta()).unwrap());
            assert!(grid.is_disabled(start - dir.delta()).unwrap());
            // Far end sealed
            assert!(grid.is_disabled(end + dir.delta()).unwrap());
            assert_eq!(grid.count_active(), 2);
        }
    }

    #[test]
    fn test_generator_first_step_from_five_five() {
        let config = MazeConfig {
            actions_min_length: 0,
            actions_max_length: 1,
            min_active: 0,
            min_disabled: 0,
            max_attempts: 1,
            ..MazeConfig::default()
        };
        let n = config.size as i32;
        let five = IVec2::new(5, 5);
        let seed = (0..10_000u64)
            .find(|&seed| {
                let mut rng = Pcg32::seed_from_u64(seed);
                IVec2::new(rng.random_range(1..n - 1), rng.random_range(1..n - 1)) == five
            })
            .unwrap();

        // Replay the draws of the first iteration: all four directions are open
        let mut replay = Pcg32::seed_from_u64(seed);
        replay.random_range(1..n - 1);
        replay.random_range(1..n - 1);
        let dir = Direction::ALL[replay.random_range(0..Direction::ALL.len())];
        let run_length = replay.random_range(0..config.path_max_length);

        let mut rng = Pcg32::seed_from_u64(seed);
        let layout = MazeGenerator::new(config).unwrap().generate(&mut rng).unwrap();
        assert_eq!(layout.start, five);
        assert!(layout.grid.is_active(five + dir.delta()).unwrap());
        assert!(layout.grid.is_disabled(five - dir.delta()).unwrap());

        let mut expected = grid_with_start(five);
        carve(&mut expected, five, dir, run_length).unwrap();
        assert_eq!(layout.grid, expected);
    }

    #[test]
    fn test_border_directions_rejected() {
        let grid = grid_with_start(IVec2::new(1, 1));
        let options = admissible_directions(&grid, IVec2::new(1, 1)).unwrap();
        assert_eq!(options, vec![Direction::Right, Direction::Down]);

        let far = IVec2::new(MAZE_SIZE as i32 - 2, MAZE_SIZE as i32 - 2);
        let grid = grid_with_start(far);
        let options = admissible_directions(&grid, far).unwrap();
        assert_eq!(options, vec![Direction::Left, Direction::Up]);
    }

    #[test]
    fn test_active_behind_blocks_direction() {
        let pos = IVec2::new(5, 5);
        let mut grid = grid_with_start(pos);
        grid.set_active(IVec2::new(6, 5), true).unwrap();
        let options = admissible_directions(&grid, pos).unwrap();
        assert!(!options.contains(&Direction::Left));
        assert!(options.contains(&Direction::Right));
    }

    #[test]
    fn test_active_behind_ignored_on_back_edge() {
        // At x == N-2 the cell behind a left move is the border, never checked
        let pos = IVec2::new(MAZE_SIZE as i32 - 2, 5);
        let mut grid = grid_with_start(pos);
        grid.set_active(IVec2::new(MAZE_SIZE as i32 - 1, 5), true).unwrap();
        let options = admissible_directions(&grid, pos).unwrap();
        assert!(options.contains(&Direction::Left));

        // Same cell one column in is checked
        let pos = IVec2::new(MAZE_SIZE as i32 - 3, 5);
        let mut grid = grid_with_start(pos);
        grid.set_active(IVec2::new(MAZE_SIZE as i32 - 2, 5), true).unwrap();
        let options = admissible_directions(&grid, pos).unwrap();
        assert!(!options.contains(&Direction::Left));
    }

    #[test]
    fn test_disabled_neighbour_rejected() {
        let pos = IVec2::new(5, 5);
        let mut grid = grid_with_start(pos);
        grid.set_disabled(IVec2::new(5, 4), true).unwrap();
        let options = admissible_directions(&grid, pos).unwrap();
        assert!(!options.contains(&Direction::Up));
    }

    #[test]
    fn test_carve_stops_at_disabled() {
        let start = IVec2::new(3, 5);
        let mut grid = grid_with_start(start);
        grid.set_disabled(IVec2::new(6, 5), true).unwrap();
        let end = carve(&mut grid, start, Direction::Right, 9).unwrap();
        assert_eq!(end, IVec2::new(5, 5));
        assert_eq!(grid.count_active(), 3);
    }

    #[test]
    fn test_carve_runs_through_active_cells() {
        let start = IVec2::new(2, 5);
        let mut grid = grid_with_start(start);
        for x in 3..8 {
            grid.set_active(IVec2::new(x, 5), true).unwrap();
        }
        // Run length 0 allows one fresh step, but the active corridor is free
        let end = carve(&mut grid, start, Direction::Right, 0).unwrap();
        assert_eq!(end, IVec2::new(7, 5));
        assert!(grid.is_disabled(IVec2::new(8, 5)).unwrap());
    }

    #[test]
    fn test_carve_stays_off_border() {
        let start = IVec2::new(12, 5);
        let mut grid = grid_with_start(start);
        let end = carve(&mut grid, start, Direction::Right, 9).unwrap();
        assert_eq!(end, IVec2::new(MAZE_SIZE as i32 - 2, 5));
        assert!(!grid.is_disabled(IVec2::new(MAZE_SIZE as i32 - 1, 5)).unwrap());
    }

    #[test]
    fn test_exhausted_budget_is_reported() {
        let config = MazeConfig {
            min_active: 14 * 14,
            max_attempts: 3,
            ..MazeConfig::default()
        };
        let generator = MazeGenerator::new(config).unwrap();
        let mut rng = Pcg32::seed_from_u64(7);
        assert_eq!(
            generator.generate(&mut rng),
            Err(SimError::GenerationExhausted { attempts: 3 })
        );
    }

    #[test]
    fn test_invalid_configs() {
        let tiny = MazeConfig {
            size: 3,
            ..MazeConfig::default()
        };
        assert!(MazeGenerator::new(tiny).is_err());

        let inverted = MazeConfig {
            actions_min_length: 100,
            actions_max_length: 10,
            ..MazeConfig::default()
        };
        assert!(MazeGenerator::new(inverted).is_err());
    }

    #[test]
    fn test_determinism() {
        assert_eq!(generate(4242), generate(4242));
    }

    #[test]
    fn test_generate_into_resizes_grid() {
        let mut grid = Grid::new(3);
        let mut rng = Pcg32::seed_from_u64(1);
        MazeGenerator::default()
            .generate_into(&mut grid, &mut rng)
            .unwrap();
        assert_eq!(grid.size(), MAZE_SIZE);
    }

    fn assert_invariants(layout: &MazeLayout) -> core::result::Result<(), TestCaseError> {
        let grid = &layout.grid;
        let active = grid.count_active();

        prop_assert!(active >= MIN_ACTIVE_POINTS_COUNT);
        prop_assert!(grid.count_disabled() >= MIN_DISABLED_POINTS_COUNT);
        prop_assert_eq!(grid.connected_active_count(layout.start), Ok(active));
        prop_assert_eq!(grid.is_visited(layout.start), Ok(true));
        prop_assert_eq!(grid.count_visited(), 1);

        for (pos, cell) in grid.iter() {
            prop_assert!(!(cell.active && cell.disabled), "{} both active and disabled", pos);
            if cell.active {
                prop_assert!(grid.is_interior(pos), "{} active on border", pos);
            }
        }
        Ok(())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_generated_maze_invariants(seed: u64) {
            assert_invariants(&generate(seed))?;
        }

        #[test]
        fn prop_regeneration_leaks_nothing(seed: u64) {
            let generator = MazeGenerator::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut grid = Grid::new(MAZE_SIZE);

            let first = generator.generate_into(&mut grid, &mut rng).unwrap();
            assert_invariants(&MazeLayout { grid: grid.clone(), start: first })?;

            grid.reset();
            let second = generator.generate_into(&mut grid, &mut rng).unwrap();
            assert_invariants(&MazeLayout { grid, start: second })?;
        }
    }
}
