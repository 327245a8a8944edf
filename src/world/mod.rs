//! # World Module
//!
//! Spatial primitives shared by every generation stage.
//!
//! This module contains the fundamental building blocks of a room layout:
//! - Integer coordinates and cardinal directions
//! - The static tile catalog (connectivity, colliders, render layers)
//! - The dense, center-origin tilemap that generators write into
//!
//! Coordinates grow upward: North is `+y`, East is `+x`. The same convention
//! is used for dungeon grid cells and for tiles inside a room.

pub mod tilemap;
pub mod tiles;

pub use tilemap::*;
pub use tiles::*;

use serde::{Deserialize, Serialize};

/// Represents a 2D integer coordinate, either a tile inside a room or a
/// cell on the dungeon grid.
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
/// let adjacent = pos.adjacent_positions();
/// assert_eq!(adjacent.len(), 8); // All 8 surrounding positions
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

    /// Returns the origin position (0, 0).
    pub fn origin() -> Self {
        Self::new(0, 0)
    }

    /// Returns the neighbouring position one step in `direction`.
    pub fn step(self, direction: Direction) -> Position {
        self + direction.to_delta()
    }

    /// Returns all 8 adjacent positions (including diagonals).
    pub fn adjacent_positions(self) -> Vec<Position> {
        vec![
            Position::new(self.x - 1, self.y + 1), // NW
            Position::new(self.x, self.y + 1),     // N
            Position::new(self.x + 1, self.y + 1), // NE
            Position::new(self.x - 1, self.y),     // W
            Position::new(self.x + 1, self.y),     // E
            Position::new(self.x - 1, self.y - 1), // SW
            Position::new(self.x, self.y - 1),     // S
            Position::new(self.x + 1, self.y - 1), // SE
        ]
    }

    /// Returns only the 4 cardinal adjacent positions, in door order
    /// (North, East, South, West).
    pub fn cardinal_adjacent_positions(self) -> [Position; 4] {
        Direction::ALL.map(|direction| self.step(direction))
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

/// Cardinal directions, doubling as door indices.
///
/// The discriminant is the door index used throughout the crate:
/// 0 = North, 1 = East, 2 = South, 3 = West.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Direction {
    /// All four directions in door-index order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Converts a direction to a position delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow::{Direction, Position};
    ///
    /// let delta = Direction::North.to_delta();
    /// assert_eq!(delta, Position::new(0, 1));
    /// ```
    pub fn to_delta(self) -> Position {
        match self {
            Direction::North => Position::new(0, 1),
            Direction::East => Position::new(1, 0),
            Direction::South => Position::new(0, -1),
            Direction::West => Position::new(-1, 0),
        }
    }

    /// Door index of this direction (0..4).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Bit contributed to a room's door bitfield.
    pub fn bit(self) -> u8 {
        1 << self.index()
    }

    /// The direction pointing back the other way.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Whether a line crossing this edge runs horizontally.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::East | Direction::West)
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
    }

    #[test]
    fn test_position_adjacent() {
        let pos = Position::new(5, 5);
        let adjacent = pos.adjacent_positions();
        assert_eq!(adjacent.len(), 8);
        assert!(adjacent.contains(&Position::new(4, 4)));
        assert!(adjacent.contains(&Position::new(6, 6)));
    }

    #[test]
    fn test_position_cardinal_adjacent() {
        let pos = Position::new(5, 5);
        let adjacent = pos.cardinal_adjacent_positions();
        assert_eq!(adjacent[0], Position::new(5, 6)); // North
        assert_eq!(adjacent[1], Position::new(6, 5)); // East
        assert_eq!(adjacent[2], Position::new(5, 4)); // South
        assert_eq!(adjacent[3], Position::new(4, 5)); // West
    }

    #[test]
    fn test_position_arithmetic() {
        let pos1 = Position::new(5, 10);
        let pos2 = Position::new(3, 2);
        assert_eq!(pos1 + pos2, Position::new(8, 12));
        assert_eq!(pos1.step(Direction::West), Position::new(4, 10));
    }

    #[test]
    fn test_direction_indices_and_bits() {
        assert_eq!(Direction::North.index(), 0);
        assert_eq!(Direction::West.index(), 3);
        assert_eq!(Direction::South.bit(), 4);
        let bits: u8 = Direction::ALL.iter().map(|d| d.bit()).sum();
        assert_eq!(bits, 15);
    }

    #[test]
    fn test_direction_opposite() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_eq!(
                direction.to_delta() + direction.opposite().to_delta(),
                Position::origin()
            );
        }
    }
}
