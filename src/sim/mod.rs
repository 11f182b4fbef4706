//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Bounds-checked grid access
//! - No rendering or platform dependencies

pub mod ball;
pub mod clock;
pub mod error;
pub mod fill;
pub mod grid;
pub mod maze;
pub mod session;

pub use ball::{Ball, StepOutcome, step, validate_speed};
pub use clock::FixedStep;
pub use error::{Result, SimError};
pub use fill::{FillConfig, FillGenerator, FillPuzzle, Path, PathOutcome};
pub use grid::{Cell, Direction, Grid};
pub use maze::{LevelGenerator, MazeConfig, MazeGenerator, MazeLayout, admissible_directions, carve};
pub use session::{FillSession, GameEvent, LevelPhase, MazeSession};
