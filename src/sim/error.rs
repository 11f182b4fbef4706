use glam::IVec2;
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("Cell {pos} is outside the {size}x{size} grid")]
    OutOfRange { pos: IVec2, size: usize },
    #[error("Level generation gave up after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },
    #[error("Invalid level config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = core::result::Result<T, SimError>;
