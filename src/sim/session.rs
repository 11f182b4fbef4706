//! Level sessions
//!
//! A session owns everything one game needs between frames: the seeded RNG,
//! the current level and the events waiting for the presentation layer.
//! Render code reads it, input handlers and the logic tick mutate it.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::{Ball, StepOutcome, step, validate_speed};
use super::error::{Result, SimError};
use super::fill::{FillConfig, FillGenerator, FillPuzzle, PathOutcome};
use super::grid::{Direction, Grid};
use super::maze::{LevelGenerator, MazeConfig, MazeGenerator, MazeLayout};
use crate::consts::*;

/// Lifecycle of a single level once generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPhase {
    Playing,
    /// Terminal for this level; only `next_level` leaves it
    Completed,
}

/// Cues for the audio and UI collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Token moved; fill moves carry the new path length
    Moved { path_len: Option<usize> },
    /// Ball hit the edge of the maze and stopped
    Blocked,
    /// Level finished (raised once per level)
    Completed { level: u32 },
}

/// Random-walk maze with a rolling ball
#[derive(Debug, Clone)]
pub struct MazeSession {
    seed: u64,
    rng: Pcg32,
    generator: MazeGenerator,
    ball_speed: f32,
    level: u32,
    grid: Grid,
    start: IVec2,
    ball: Ball,
    phase: LevelPhase,
    events: Vec<GameEvent>,
}

impl MazeSession {
    pub fn new(seed: u64, config: MazeConfig) -> Result<Self> {
        Self::with_ball_speed(seed, config, BALL_SPEED)
    }

    pub fn with_ball_speed(seed: u64, config: MazeConfig, ball_speed: f32) -> Result<Self> {
        validate_speed(ball_speed)?;
        let generator = MazeGenerator::new(config)?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut grid = Grid::new(config.size);
        let start = generator.generate_into(&mut grid, &mut rng)?;

        log::info!("Maze session started with seed {}", seed);
        Ok(Self {
            seed,
            rng,
            generator,
            ball_speed,
            level: 0,
            grid,
            start,
            ball: Ball::with_speed(start, ball_speed),
            phase: LevelPhase::Playing,
            events: Vec::new(),
        })
    }

    /// Resume a previously generated layout as level 0
    pub fn from_layout(
        seed: u64,
        config: MazeConfig,
        layout: MazeLayout,
        ball_speed: f32,
    ) -> Result<Self> {
        validate_speed(ball_speed)?;
        let generator = MazeGenerator::new(config)?;
        let MazeLayout { mut grid, start } = layout;
        if grid.size() != config.size {
            return Err(SimError::InvalidConfig("layout size differs from the maze config"));
        }
        grid.set_visited(start, true)?;

        Ok(Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            generator,
            ball_speed,
            level: 0,
            grid,
            start,
            ball: Ball::with_speed(start, ball_speed),
            phase: LevelPhase::Playing,
            events: Vec::new(),
        })
    }

    /// Regenerate in place; the old grid and ball are replaced wholesale
    pub fn next_level(&mut self) -> Result<()> {
        self.start = self.generator.generate_into(&mut self.grid, &mut self.rng)?;
        self.ball = Ball::with_speed(self.start, self.ball_speed);
        self.phase = LevelPhase::Playing;
        self.events.clear();
        self.level += 1;
        Ok(())
    }

    /// Directional input; ignored while the ball rolls or after completion.
    /// An accepted direction raises a `Moved` cue.
    pub fn steer(&mut self, dir: Direction) -> bool {
        if self.phase == LevelPhase::Completed || !self.ball.steer(dir) {
            return false;
        }
        self.events.push(GameEvent::Moved { path_len: None });
        true
    }

    /// One logic tick
    pub fn tick(&mut self) -> Result<StepOutcome> {
        let outcome = step(&mut self.grid, &mut self.ball)?;
        match outcome {
            StepOutcome::Idle => {}
            StepOutcome::Blocked => self.events.push(GameEvent::Blocked),
            StepOutcome::Advanced => {}
            StepOutcome::AdvancedAndCompleted => self.complete(),
        }
        Ok(outcome)
    }

    fn complete(&mut self) {
        if self.phase == LevelPhase::Completed {
            return;
        }
        self.phase = LevelPhase::Completed;
        self.events.push(GameEvent::Completed { level: self.level });
        log::info!("Maze level {} completed", self.level);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn start(&self) -> IVec2 {
        self.start
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    pub fn is_completed(&self) -> bool {
        self.phase == LevelPhase::Completed
    }
}

/// Line-fill path puzzle
#[derive(Debug, Clone)]
pub struct FillSession {
    seed: u64,
    rng: Pcg32,
    generator: FillGenerator,
    level: u32,
    puzzle: FillPuzzle,
    phase: LevelPhase,
    events: Vec<GameEvent>,
}

impl FillSession {
    pub fn new(seed: u64, config: FillConfig) -> Result<Self> {
        let generator = FillGenerator::new(config)?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let puzzle = generator.generate(&mut rng)?;

        log::info!("Fill session started with seed {}", seed);
        Ok(Self {
            seed,
            rng,
            generator,
            level: 0,
            puzzle,
            phase: LevelPhase::Playing,
            events: Vec::new(),
        })
    }

    pub fn next_level(&mut self) -> Result<()> {
        self.puzzle = self.generator.generate(&mut self.rng)?;
        self.phase = LevelPhase::Playing;
        self.events.clear();
        self.level += 1;
        Ok(())
    }

    /// Pointer input already mapped to a grid cell
    pub fn select(&mut self, target: IVec2) -> Result<PathOutcome> {
        if self.phase == LevelPhase::Completed {
            return Ok(PathOutcome::Ignored);
        }

        let outcome = self.puzzle.handle_input(target)?;
        let path_len = Some(self.puzzle.path().len());
        match outcome {
            PathOutcome::Ignored => {}
            PathOutcome::Retreated | PathOutcome::Extended => {
                self.events.push(GameEvent::Moved { path_len });
            }
            PathOutcome::Completed => {
                self.events.push(GameEvent::Moved { path_len });
                self.phase = LevelPhase::Completed;
                self.events.push(GameEvent::Completed { level: self.level });
                log::info!("Fill level {} completed", self.level);
            }
        }
        Ok(outcome)
    }

    pub fn hint(&mut self) {
        if self.phase == LevelPhase::Playing {
            self.puzzle.hint();
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn puzzle(&self) -> &FillPuzzle {
        &self.puzzle
    }

    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    pub fn is_completed(&self) -> bool {
        self.phase == LevelPhase::Completed
    }
}
