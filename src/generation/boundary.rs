//! # Boundary Builder
//!
//! Stamps the border ring around a room and cuts a door notch through it
//! for every enabled door.

use crate::{BurrowResult, Direction, Position, TileType, Tilemap};
use serde::{Deserialize, Serialize};

/// Extra cells added on every side of the interior by the boundary: the
/// ring itself plus the two outer rows of each door notch.
pub const BOUNDARY_MARGIN: i32 = 3;

/// An enabled door: where it sits along its edge and what it is paved with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Door {
    /// Offset from the center of the edge
    pub offset: i32,
    /// Tile used for the opening
    pub floor: TileType,
}

impl Default for Door {
    fn default() -> Self {
        Self {
            offset: 0,
            floor: TileType::Floor,
        }
    }
}

/// Door configuration of a finished room, indexed by direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorConfig {
    doors: [Option<Door>; 4],
}

impl DoorConfig {
    /// A configuration with every door closed.
    pub fn closed() -> Self {
        Self::default()
    }

    /// Returns a copy with the door in `direction` set.
    pub fn with_door(mut self, direction: Direction, door: Door) -> Self {
        self.doors[direction.index()] = Some(door);
        self
    }

    /// Gets the door in a direction, if enabled.
    pub fn get(&self, direction: Direction) -> Option<Door> {
        self.doors[direction.index()]
    }

    /// Checks whether the door in a direction is enabled.
    pub fn is_enabled(&self, direction: Direction) -> bool {
        self.doors[direction.index()].is_some()
    }

    /// Iterates over enabled doors in direction order.
    pub fn enabled(&self) -> impl Iterator<Item = (Direction, Door)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| self.get(direction).map(|door| (direction, door)))
    }

    /// Door bitfield: the sum of `2^direction` over enabled doors.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow::{Direction, Door, DoorConfig};
    ///
    /// let doors = DoorConfig::closed()
    ///     .with_door(Direction::North, Door::default())
    ///     .with_door(Direction::West, Door::default());
    /// assert_eq!(doors.bits(), 0b1001);
    /// ```
    pub fn bits(&self) -> u8 {
        self.enabled().map(|(direction, _)| direction.bit()).sum()
    }
}

/// Which doors of a grid cell are open, as decided by the dungeon graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OpenDoors([bool; 4]);

impl OpenDoors {
    /// No open doors.
    pub fn closed() -> Self {
        Self::default()
    }

    /// Every door open.
    pub fn all() -> Self {
        Self([true; 4])
    }

    /// Returns a copy with the door in `direction` opened.
    pub fn open(mut self, direction: Direction) -> Self {
        self.0[direction.index()] = true;
        self
    }

    /// Opens the door in `direction` in place.
    pub fn set_open(&mut self, direction: Direction) {
        self.0[direction.index()] = true;
    }

    /// Checks whether the door in `direction` is open.
    pub fn is_open(&self, direction: Direction) -> bool {
        self.0[direction.index()]
    }

    /// Open directions in direction order.
    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL
            .into_iter()
            .filter(move |&direction| self.is_open(direction))
    }

    /// Number of open doors.
    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&open| open).count()
    }

    /// Door bitfield: the sum of `2^direction` over open doors.
    pub fn bits(&self) -> u8 {
        self.directions().map(Direction::bit).sum()
    }
}

/// Interior cell just inside the room at a door.
pub fn door_reference_point(
    half_width: i32,
    half_height: i32,
    direction: Direction,
    offset: i32,
) -> Position {
    match direction {
        Direction::North => Position::new(offset, half_height),
        Direction::East => Position::new(half_width, offset),
        Direction::South => Position::new(offset, -half_height),
        Direction::West => Position::new(-half_width, offset),
    }
}

/// Stamps border rings and door notches.
#[derive(Debug, Clone)]
pub struct BoundaryBuilder {
    pub half_width: i32,
    pub half_height: i32,
    pub border: TileType,
}

impl BoundaryBuilder {
    /// Creates a boundary builder for a room of the given half-extents.
    pub fn new(half_width: i32, half_height: i32, border: TileType) -> Self {
        Self {
            half_width,
            half_height,
            border,
        }
    }

    /// Returns the interior grown to `±(dimension + 3)` with the border
    /// ring and door notches stamped in. Cells outside the outline are
    /// filled with [`TileType::Void`].
    pub fn build(&self, interior: &Tilemap, doors: &DoorConfig) -> BurrowResult<Tilemap> {
        let mut tilemap = Tilemap::new(
            self.half_width + BOUNDARY_MARGIN,
            self.half_height + BOUNDARY_MARGIN,
            TileType::Void,
        );
        for (pos, tile) in interior.iter() {
            if pos.x.abs() <= self.half_width && pos.y.abs() <= self.half_height {
                tilemap.set(pos, tile)?;
            }
        }

        let ring_x = self.half_width + 1;
        let ring_y = self.half_height + 1;

        for x in -ring_x..=ring_x {
            tilemap.set(Position::new(x, ring_y), self.border)?;
            tilemap.set(Position::new(x, -ring_y), self.border)?;
        }
        for y in -ring_y..=ring_y {
            tilemap.set(Position::new(ring_x, y), self.border)?;
            tilemap.set(Position::new(-ring_x, y), self.border)?;
        }

        for (direction, door) in doors.enabled() {
            self.cut_notch(&mut tilemap, direction, door)?;
        }

        Ok(tilemap)
    }

    /// Writes the 3-wide, 3-deep opening for one door, flanked by border
    /// tiles on both sides.
    fn cut_notch(
        &self,
        tilemap: &mut Tilemap,
        direction: Direction,
        door: Door,
    ) -> BurrowResult<()> {
        let edge = if direction.is_horizontal() {
            self.half_width
        } else {
            self.half_height
        };

        for depth in 1..=BOUNDARY_MARGIN {
            for across in -2i32..=2 {
                let tile = if across.abs() == 2 { self.border } else { door.floor };
                let along = edge + depth;
                let lateral = door.offset + across;
                let pos = match direction {
                    Direction::North => Position::new(lateral, along),
                    Direction::East => Position::new(along, lateral),
                    Direction::South => Position::new(lateral, -along),
                    Direction::West => Position::new(-along, lateral),
                };
                tilemap.set(pos, tile)?;
            }
        }
        Ok(())
    }
}
