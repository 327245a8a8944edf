//! # Tilemap
//!
//! Dense, center-origin grid of tile types describing one room's floor plan.

use crate::{BurrowError, BurrowResult, Collider, Position, TileType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest half-extent a tilemap can have.
pub const MAX_TILEMAP_HALF_EXTENT: i32 = crate::config::MAX_ROOM_EXTENT + 3;

/// Coordinate-indexed grid of tile types.
///
/// The tilemap covers `[-half_width, half_width] x [-half_height, half_height]`
/// and every coordinate inside that extent holds exactly one tile type.
///
/// # Examples
///
/// ```
/// use burrow::{Position, Tilemap, TileType};
///
/// let mut map = Tilemap::blank(2, 1);
/// assert_eq!(map.width(), 5);
/// assert_eq!(map.height(), 3);
///
/// map.set(Position::new(-2, 1), TileType::Wall).unwrap();
/// assert_eq!(map.get(Position::new(-2, 1)), Some(TileType::Wall));
/// assert_eq!(map.get(Position::new(3, 0)), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tilemap {
    half_width: i32,
    half_height: i32,
    tiles: Vec<TileType>,
}

impl Tilemap {
    /// Creates a tilemap of the given half-extents filled with `fill`.
    ///
    /// Half-extents are clamped to `0..=MAX_TILEMAP_HALF_EXTENT`; callers
    /// building from loaded data validate against
    /// [`crate::config::MAX_ROOM_EXTENT`] first.
    pub fn new(half_width: i32, half_height: i32, fill: TileType) -> Self {
        let half_width = half_width.clamp(0, MAX_TILEMAP_HALF_EXTENT);
        let half_height = half_height.clamp(0, MAX_TILEMAP_HALF_EXTENT);
        let columns = 2 * half_width as usize + 1;
        let rows = 2 * half_height as usize + 1;
        let len = columns * rows;
        Self {
            half_width,
            half_height,
            tiles: vec![fill; len],
        }
    }

    /// Creates an all-floor tilemap, the starting point of every room.
    pub fn blank(half_width: i32, half_height: i32) -> Self {
        Self::new(half_width, half_height, TileType::Floor)
    }

    /// Half-extent along x.
    pub fn half_width(&self) -> i32 {
        self.half_width
    }

    /// Half-extent along y.
    pub fn half_height(&self) -> i32 {
        self.half_height
    }

    /// Number of columns.
    pub fn width(&self) -> i32 {
        2 * self.half_width + 1
    }

    /// Number of rows.
    pub fn height(&self) -> i32 {
        2 * self.half_height + 1
    }

    /// Checks whether a position lies inside the extent.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x.abs() <= self.half_width && pos.y.abs() <= self.half_height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        let column = pos.x + self.half_width;
        let row = pos.y + self.half_height;
        Some((row * self.width() + column) as usize)
    }

    /// Gets the tile at a position, or `None` outside the extent.
    pub fn get(&self, pos: Position) -> Option<TileType> {
        self.index(pos).map(|index| self.tiles[index])
    }

    /// Sets the tile at a position.
    pub fn set(&mut self, pos: Position, tile: TileType) -> BurrowResult<()> {
        let index = self.index(pos).ok_or(BurrowError::OutOfBounds {
            x: pos.x,
            y: pos.y,
        })?;
        self.tiles[index] = tile;
        Ok(())
    }

    /// Iterates over every position in the extent, bottom row first.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (-self.half_height..=self.half_height).flat_map(move |y| {
            (-self.half_width..=self.half_width).map(move |x| Position::new(x, y))
        })
    }

    /// Iterates over `(position, tile)` pairs, bottom row first.
    pub fn iter(&self) -> impl Iterator<Item = (Position, TileType)> + '_ {
        self.positions().zip(self.tiles.iter().copied())
    }

    /// Counts the tiles of a given type.
    pub fn count(&self, tile: TileType) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    /// Collider the physics layer should create for the tile at `pos`.
    ///
    /// A colliding tile only needs a body when something could touch it,
    /// i.e. when a non-colliding tile sits in its 3x3 neighbourhood.
    pub fn exposed_collider(&self, pos: Position) -> Option<Collider> {
        let collider = self.get(pos)?.collider()?;
        let exposed = pos
            .adjacent_positions()
            .into_iter()
            .filter_map(|neighbor| self.get(neighbor))
            .any(TileType::is_passable);
        exposed.then_some(collider)
    }
}

impl fmt::Display for Tilemap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (-self.half_height..=self.half_height).rev() {
            let row: String = (-self.half_width..=self.half_width)
                .filter_map(|x| self.get(Position::new(x, y)))
                .map(TileType::glyph)
                .collect();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_has_no_holes() {
        let map = Tilemap::blank(3, 2);
        assert_eq!(map.positions().count(), 7 * 5);
        for pos in map.positions() {
            assert_eq!(map.get(pos), Some(TileType::Floor));
        }
    }

    #[test]
    fn test_set_out_of_bounds_fails() {
        let mut map = Tilemap::blank(1, 1);
        assert!(map.set(Position::new(2, 0), TileType::Wall).is_err());
        assert!(map.set(Position::new(-1, -1), TileType::Wall).is_ok());
    }

    #[test]
    fn test_oversized_extent_is_clamped() {
        let map = Tilemap::new(40_000, 40_000, TileType::Void);
        assert_eq!(map.half_width(), MAX_TILEMAP_HALF_EXTENT);
        assert_eq!(map.half_height(), MAX_TILEMAP_HALF_EXTENT);

        let map = Tilemap::new(-4, 2, TileType::Floor);
        assert_eq!(map.width(), 1);
        assert_eq!(map.positions().count(), 5);
    }

    #[test]
    fn test_exposed_collider() {
        let mut map = Tilemap::new(2, 2, TileType::Wall);
        map.set(Position::new(2, 2), TileType::Floor).unwrap();

        // Touches the floor diagonally
        assert!(map.exposed_collider(Position::new(1, 1)).is_some());
        // Buried inside walls
        assert!(map.exposed_collider(Position::new(-1, -1)).is_none());
        // Floors never collide
        assert!(map.exposed_collider(Position::new(2, 2)).is_none());
    }

    #[test]
    fn test_display_prints_top_row_first() {
        let mut map = Tilemap::blank(1, 1);
        map.set(Position::new(-1, 1), TileType::Wall).unwrap();
        map.set(Position::new(1, -1), TileType::Pit).unwrap();
        assert_eq!(map.to_string(), "#..\n...\n..o\n");
    }
}
