//! Maze ball token and its per-tick movement rule
//!
//! The ball slides along one axis at a time until the cell ahead is not
//! part of the maze, coloring every active cell it enters.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::error::{Result, SimError};
use super::grid::{Direction, Grid};
use crate::consts::*;
use crate::nearest_cell;

/// Outcome of a single movement tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// Ball is at rest, nothing happened
    Idle,
    /// Cell ahead is off the maze; ball snapped back and stopped
    Blocked,
    /// Ball moved (possibly coloring a new cell)
    Advanced,
    /// Ball colored the last uncolored cell
    AdvancedAndCompleted,
}

impl StepOutcome {
    pub const fn completed(self) -> bool {
        matches!(self, Self::AdvancedAndCompleted)
    }
}

/// A speed must stay below one cell per tick so every step probes the
/// adjacent cell and never skips over one.
pub fn validate_speed(speed: f32) -> Result<()> {
    if !speed.is_finite() || speed <= 0.0 || speed >= 1.0 {
        return Err(SimError::InvalidConfig(
            "ball speed must be between 0 and 1 cell per tick",
        ));
    }
    Ok(())
}

/// The player's ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    /// Position in cell units (cell centers sit on integers)
    pub pos: Vec2,
    /// Velocity in cells per tick, axis-aligned
    pub vel: Vec2,
    /// Speed applied when a direction is accepted
    pub speed: f32,
    /// Trail history for rendering (newest first)
    #[serde(skip)]
    pub trail: Vec<Vec2>,
}

impl Ball {
    pub fn new(cell: IVec2) -> Self {
        Self::with_speed(cell, BALL_SPEED)
    }

    pub fn with_speed(cell: IVec2, speed: f32) -> Self {
        let pos = cell.as_vec2();
        Self {
            pos,
            vel: Vec2::ZERO,
            speed,
            trail: vec![pos; TRAIL_LENGTH],
        }
    }

    pub fn is_moving(&self) -> bool {
        self.vel != Vec2::ZERO
    }

    /// Current direction of travel, if any
    pub fn heading(&self) -> Option<Direction> {
        if self.vel.x > 0.0 {
            Some(Direction::Right)
        } else if self.vel.x < 0.0 {
            Some(Direction::Left)
        } else if self.vel.y > 0.0 {
            Some(Direction::Down)
        } else if self.vel.y < 0.0 {
            Some(Direction::Up)
        } else {
            None
        }
    }

    /// Start moving in `dir`. Ignored while already moving.
    pub fn steer(&mut self, dir: Direction) -> bool {
        if self.is_moving() {
            return false;
        }
        self.vel = dir.delta().as_vec2() * self.speed;
        true
    }

    /// Integrate one tick and record the trail
    pub fn advance(&mut self) {
        self.pos += self.vel;
        self.record_trail();
    }

    /// Undo the last tick, snap to the nearest cell and come to rest
    pub fn stop(&mut self) {
        self.pos = nearest_cell(self.pos - self.vel).as_vec2();
        self.vel = Vec2::ZERO;
    }

    /// Cell the leading edge of the ball is entering
    pub fn probe_cell(&self) -> Option<IVec2> {
        let offset = self.heading()?.delta().as_vec2() * BALL_SIZE_FACTOR;
        Some(nearest_cell(self.pos + offset))
    }

    /// Cell the ball's center currently occupies
    pub fn cell(&self) -> IVec2 {
        nearest_cell(self.pos)
    }

    fn record_trail(&mut self) {
        self.trail.insert(0, self.pos);
        self.trail.truncate(TRAIL_LENGTH);
    }
}

/// Advance the ball one tick against the maze, coloring what it enters
pub fn step(grid: &mut Grid, ball: &mut Ball) -> Result<StepOutcome> {
    if !ball.is_moving() {
        return Ok(StepOutcome::Idle);
    }

    ball.advance();

    let Some(next) = ball.probe_cell() else {
        return Ok(StepOutcome::Idle);
    };

    if !grid.contains(next) || !grid.is_active(next)? {
        ball.stop();
        return Ok(StepOutcome::Blocked);
    }

    if !grid.is_visited(next)? {
        grid.set_visited(next, true)?;
        if grid.all_active_visited() {
            return Ok(StepOutcome::AdvancedAndCompleted);
        }
    }

    Ok(StepOutcome::Advanced)
}
