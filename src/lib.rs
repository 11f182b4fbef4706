//! Tile Arcade - grid levels for single-screen arcade games
//!
//! Core modules:
//! - `sim`: Deterministic level generation, grid state and movement rules
//! - `audio`: Tone selection for gameplay cues
//! - `settings`: Data-driven level tuning

pub mod audio;
pub mod settings;
pub mod sim;

pub use audio::{AudioMixer, SoundEffect, Tone};
pub use settings::Settings;

use glam::{IVec2, Vec2};

/// Game configuration constants
pub mod consts {
    /// Logic ticks per second
    pub const TICK_RATE: f32 = 60.0;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Maze grid side length
    pub const MAZE_SIZE: usize = 16;
    /// Walk iterations below which a dead end restarts the attempt
    pub const ACTIONS_MIN_LENGTH: u32 = 10;
    /// Maximum walk iterations per attempt
    pub const ACTIONS_MAX_LENGTH: u32 = 100;
    /// Exclusive upper bound of a single run in one direction
    pub const PATH_MAX_LENGTH: u32 = 10;
    /// Accepted mazes need at least this many active cells
    pub const MIN_ACTIVE_POINTS_COUNT: usize = 20;
    /// Accepted mazes need at least this many disabled cells
    pub const MIN_DISABLED_POINTS_COUNT: usize = 6;

    /// Fill puzzle grid side length
    pub const FILL_SIZE: usize = 6;
    /// Solution walks stuck at or before this iteration are regenerated
    pub const FILL_PATH_MIN_LENGTH: u32 = 6;
    /// Maximum solution walk iterations
    pub const FILL_PATH_MAX_LENGTH: u32 = 20;
    /// Solution cells revealed per hint request
    pub const HINT_STEP: usize = 4;

    /// Whole-grid generation attempts before giving up
    pub const MAX_GENERATION_ATTEMPTS: u32 = 10_000;

    /// Ball speed in cells per tick
    pub const BALL_SPEED: f32 = 0.4;
    /// Ball radius as a fraction of a cell
    pub const BALL_SIZE_FACTOR: f32 = 0.4;
    /// Number of trail points kept for rendering
    pub const TRAIL_LENGTH: usize = 15;
}

/// Manhattan distance between two grid cells
#[inline]
pub fn manhattan(a: IVec2, b: IVec2) -> i32 {
    let d = a - b;
    d.x.abs() + d.y.abs()
}

/// Snap a continuous position to the nearest grid cell
#[inline]
pub fn nearest_cell(pos: Vec2) -> IVec2 {
    pos.round().as_ivec2()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manhattan() {
        assert_eq!(manhattan(IVec2::new(2, 2), IVec2::new(2, 1)), 1);
        assert_eq!(manhattan(IVec2::new(0, 0), IVec2::new(3, -4)), 7);
        assert_eq!(manhattan(IVec2::new(5, 5), IVec2::new(5, 5)), 0);
    }

    #[test]
    fn test_nearest_cell() {
        assert_eq!(nearest_cell(Vec2::new(3.4, 2.6)), IVec2::new(3, 3));
        assert_eq!(nearest_cell(Vec2::new(0.0, 15.0)), IVec2::new(0, 15));
    }
}
