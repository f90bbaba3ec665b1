//! # Game Module
//!
//! Grid representation shared by maze generation and pursuit.
//!
//! This module contains the fundamental building blocks of Burrow:
//! - Positions and cardinal directions
//! - The tile map and its tile classification rules
//! - The integer matrix encoding used by the persistence and rendering layers

pub mod grid;
pub mod matrix;

pub use grid::*;
pub use matrix::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a 2D cell coordinate on the grid.
///
/// `x` grows eastward and `y` grows southward, so `(0, 0)` is the top-left cell.
///
/// # Examples
///
/// ```
/// use burrow::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
///
/// let adjacent = pos.cardinal_adjacent_positions();
/// assert_eq!(adjacent[0], Position::new(11, 5)); // East comes first
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Calculates the Manhattan distance to another position.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow::Position;
    ///
    /// let pos1 = Position::new(0, 0);
    /// let pos2 = Position::new(3, 4);
    /// assert_eq!(pos1.manhattan_distance(pos2), 7);
    /// ```
    pub fn manhattan_distance(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Returns the position one cell away in `direction`.
    ///
    /// Coordinates wrap at the `i32` limits; a wrapped position is never
    /// inside a grid.
    pub fn step(self, direction: Direction) -> Position {
        self.step_by(direction, 1)
    }

    /// Returns the position `cells` cells away in `direction`, wrapping at the
    /// `i32` limits like [`Position::step`].
    pub fn step_by(self, direction: Direction, cells: i32) -> Position {
        let delta = direction.to_delta();
        Position::new(
            self.x.wrapping_add(delta.x.wrapping_mul(cells)),
            self.y.wrapping_add(delta.y.wrapping_mul(cells)),
        )
    }

    /// Returns the 4 cardinal adjacent positions in East, South, West, North order.
    ///
    /// The order is part of the contract: it fixes tie-breaking in both carving
    /// and breadth-first search.
    pub fn cardinal_adjacent_positions(self) -> [Position; 4] {
        Direction::CARDINAL.map(|direction| self.step(direction))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// Cardinal directions for movement and carving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    East,
    South,
    West,
    North,
}

impl Direction {
    /// All four directions in neighbour order.
    pub const CARDINAL: [Direction; 4] = [
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::North,
    ];

    /// Converts a direction to a position delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow::{Direction, Position};
    ///
    /// let delta = Direction::North.to_delta();
    /// assert_eq!(delta, Position::new(0, -1));
    /// ```
    pub fn to_delta(self) -> Position {
        match self {
            Direction::East => Position::new(1, 0),
            Direction::South => Position::new(0, 1),
            Direction::West => Position::new(-1, 0),
            Direction::North => Position::new(0, -1),
        }
    }

    /// Returns the direction pointing the other way.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::North => Direction::South,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_creation() {
        let pos = Position::new(5, 10);
        assert_eq!(pos.x, 5);
        assert_eq!(pos.y, 10);
        assert_eq!(Position::from((5, 10)), pos);
    }

    #[test]
    fn test_position_manhattan_distance() {
        let pos1 = Position::new(0, 0);
        let pos2 = Position::new(3, 4);
        assert_eq!(pos1.manhattan_distance(pos2), 7);
        assert_eq!(pos2.manhattan_distance(pos1), 7);
        assert_eq!(Position::new(-2, 1).manhattan_distance(Position::new(2, -1)), 6);
    }

    #[test]
    fn test_position_cardinal_adjacent_order() {
        let pos = Position::new(5, 5);
        let adjacent = pos.cardinal_adjacent_positions();
        assert_eq!(
            adjacent,
            [
                Position::new(6, 5), // East
                Position::new(5, 6), // South
                Position::new(4, 5), // West
                Position::new(5, 4), // North
            ]
        );
    }

    #[test]
    fn test_position_step_by() {
        let pos = Position::new(1, 1);
        assert_eq!(pos.step_by(Direction::East, 2), Position::new(3, 1));
        assert_eq!(pos.step_by(Direction::North, 2), Position::new(1, -1));
    }

    #[test]
    fn test_position_arithmetic() {
        let pos1 = Position::new(5, 10);
        let pos2 = Position::new(3, 2);
        assert_eq!(pos1 + pos2, Position::new(8, 12));
        assert_eq!(pos1 - pos2, Position::new(2, 8));
    }

    #[test]
    fn test_position_display() {
        assert_eq!(Position::new(3, -1).to_string(), "(3, -1)");
    }

    #[test]
    fn test_direction_opposites() {
        for direction in Direction::CARDINAL {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_eq!(direction.to_delta() + direction.opposite().to_delta(), Position::new(0, 0));
        }
    }

    #[test]
    fn test_step_wraps_at_coordinate_limits() {
        let edge = Position::new(i32::MAX, i32::MIN);
        assert_eq!(edge.step(Direction::East), Position::new(i32::MIN, i32::MIN));
        assert_eq!(edge.step(Direction::North), Position::new(i32::MAX, i32::MAX));
        assert_eq!(edge.step_by(Direction::West, 2), Position::new(i32::MAX - 2, i32::MIN));
    }
}
