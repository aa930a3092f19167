//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of units on each side. Rosters are fixed-size and fixed-order.
pub const SQUAD_SIZE: usize = 4;

/// Integer grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Square reached by taking one step in `direction`
    pub fn step(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self::new(self.x + dx, self.y + dy)
    }

    /// All 8 neighbouring squares in compass probe order
    pub fn neighbors(&self) -> [Point; 8] {
        Direction::PROBE_ORDER.map(|d| self.step(d))
    }

    /// Chessboard distance (diagonal moves cost the same as straight ones)
    pub fn chebyshev(&self, other: &Self) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        dx.max(dy)
    }

    pub fn distance_squared(&self, other: &Self) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Movement direction. `y` grows towards the south.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    #[default]
    Noop,
}

impl Direction {
    /// Fixed order in which 8-neighbourhoods are probed.
    ///
    /// Both the threat model and the rerouter walk neighbours in this order,
    /// so tie-breaks between equally good squares are stable.
    pub const PROBE_ORDER: [Direction; 8] = [
        Direction::NorthWest,
        Direction::West,
        Direction::SouthWest,
        Direction::South,
        Direction::SouthEast,
        Direction::East,
        Direction::NorthEast,
        Direction::North,
    ];

    /// Grid offset `(dx, dy)` for this direction
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
            Direction::Noop => (0, 0),
        }
    }

    /// Direction whose offset matches `(dx, dy)`, if it is a single step
    pub fn from_offset(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, 0) => Some(Direction::Noop),
            _ => Self::PROBE_ORDER
                .into_iter()
                .find(|d| d.offset() == (dx, dy)),
        }
    }
}

/// Stable identity of a unit slot. Survives the unit's death.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CallSign {
    Alpha,
    Bravo,
    Charlie,
    Delta,
}

impl CallSign {
    /// Call signs in roster order
    pub const ALL: [CallSign; SQUAD_SIZE] = [
        CallSign::Alpha,
        CallSign::Bravo,
        CallSign::Charlie,
        CallSign::Delta,
    ];
}

impl fmt::Display for CallSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CallSign::Alpha => "ALPHA",
            CallSign::Bravo => "BRAVO",
            CallSign::Charlie => "CHARLIE",
            CallSign::Delta => "DELTA",
        };
        f.write_str(name)
    }
}

/// Side of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Blue,
    Amber,
}
