//! Square tile grid shared by generation and gameplay
//!
//! Cells are stored row-major and addressed by `IVec2 { x: col, y: row }`.
//! Every read and write is bounds-checked; callers test `contains` or
//! `is_interior` first and propagate `OutOfRange` with `?`.

use std::collections::VecDeque;
use std::fmt;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::error::{Result, SimError};

/// One of the four axis-aligned movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Candidate order used by the maze walk
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Up,
        Direction::Right,
        Direction::Down,
    ];

    /// Unit step in grid space (y grows downward)
    pub const fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Flags carried by a single tile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Part of the playable region
    pub active: bool,
    /// Wall buffer, never activated during generation
    pub disabled: bool,
    /// Token has passed over this tile ("colored" in the maze game)
    pub visited: bool,
}

impl Cell {
    pub fn reset(&mut self) {
        *self = Cell::default();
    }
}

/// Fixed-size square grid of cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::default(); size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// True if `pos` lies in `[0, N)` on both axes
    pub fn contains(&self, pos: IVec2) -> bool {
        let n = self.size as i32;
        pos.x >= 0 && pos.y >= 0 && pos.x < n && pos.y < n
    }

    /// True if `pos` lies in `[1, N-2]` on both axes (off the border ring)
    pub fn is_interior(&self, pos: IVec2) -> bool {
        let n = self.size as i32;
        pos.x >= 1 && pos.y >= 1 && pos.x < n - 1 && pos.y < n - 1
    }

    fn index(&self, pos: IVec2) -> Result<usize> {
        if self.contains(pos) {
            Ok(pos.y as usize * self.size + pos.x as usize)
        } else {
            Err(SimError::OutOfRange {
                pos,
                size: self.size,
            })
        }
    }

    pub fn cell(&self, pos: IVec2) -> Result<&Cell> {
        let index = self.index(pos)?;
        Ok(&self.cells[index])
    }

    pub fn cell_mut(&mut self, pos: IVec2) -> Result<&mut Cell> {
        let index = self.index(pos)?;
        Ok(&mut self.cells[index])
    }

    /// Clear every flag on every cell
    pub fn reset(&mut self) {
        self.cells.iter_mut().for_each(Cell::reset);
    }

    pub fn is_active(&self, pos: IVec2) -> Result<bool> {
        Ok(self.cell(pos)?.active)
    }

    pub fn is_disabled(&self, pos: IVec2) -> Result<bool> {
        Ok(self.cell(pos)?.disabled)
    }

    pub fn is_visited(&self, pos: IVec2) -> Result<bool> {
        Ok(self.cell(pos)?.visited)
    }

    pub fn set_active(&mut self, pos: IVec2, value: bool) -> Result<()> {
        self.cell_mut(pos)?.active = value;
        Ok(())
    }

    pub fn set_disabled(&mut self, pos: IVec2, value: bool) -> Result<()> {
        self.cell_mut(pos)?.disabled = value;
        Ok(())
    }

    pub fn set_visited(&mut self, pos: IVec2, value: bool) -> Result<()> {
        self.cell_mut(pos)?.visited = value;
        Ok(())
    }

    pub fn count_where(&self, predicate: impl Fn(&Cell) -> bool) -> usize {
        self.cells.iter().filter(|cell| predicate(cell)).count()
    }

    pub fn count_active(&self) -> usize {
        self.count_where(|cell| cell.active)
    }

    pub fn count_disabled(&self) -> usize {
        self.count_where(|cell| cell.disabled)
    }

    pub fn count_visited(&self) -> usize {
        self.count_where(|cell| cell.visited)
    }

    /// Completion predicate: every active cell has been visited
    pub fn all_active_visited(&self) -> bool {
        self.cells
            .iter()
            .all(|cell| !cell.active || cell.visited)
    }

    /// Row-major iteration for renderers
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, &Cell)> + '_ {
        let size = self.size;
        self.cells.iter().enumerate().map(move |(i, cell)| {
            let pos = IVec2::new((i % size) as i32, (i / size) as i32);
            (pos, cell)
        })
    }

    /// Number of active cells 4-connected to `start` (0 if `start` is inactive)
    pub fn connected_active_count(&self, start: IVec2) -> Result<usize> {
        if !self.is_active(start)? {
            return Ok(0);
        }

        let mut seen = vec![false; self.cells.len()];
        let mut queue = VecDeque::from([start]);
        seen[self.index(start)?] = true;
        let mut count = 0;

        while let Some(pos) = queue.pop_front() {
            count += 1;
            for dir in Direction::ALL {
                let next = pos + dir.delta();
                if !self.contains(next) {
                    continue;
                }
                let index = self.index(next)?;
                if !seen[index] && self.cells[index].active {
                    seen[index] = true;
                    queue.push_back(next);
                }
            }
        }

        Ok(count)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.size == 0 {
            return Ok(());
        }
        for row in self.cells.chunks(self.size) {
            for cell in row {
                let glyph = match (cell.active, cell.visited, cell.disabled) {
                    (true, true, _) => 'o',
                    (true, false, _) => '.',
                    (false, _, true) => '#',
                    (false, _, false) => ' ',
                };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
