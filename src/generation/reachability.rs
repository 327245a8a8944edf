//! # Reachability Validator
//!
//! Confirms that every enabled door of a finished room can be walked to
//! from every other one.

use crate::generation::boundary::{door_reference_point, DoorConfig};
use crate::{flood_fill, Position, Tilemap};
use log::trace;

/// Flood-fill check over non-colliding tiles.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReachabilityValidator;

impl ReachabilityValidator {
    /// Creates a reachability validator.
    pub fn new() -> Self {
        Self
    }

    /// Interior reference points of the enabled doors, in direction order.
    pub fn reference_points(
        half_width: i32,
        half_height: i32,
        doors: &DoorConfig,
    ) -> Vec<Position> {
        doors
            .enabled()
            .map(|(direction, door)| {
                door_reference_point(half_width, half_height, direction, door.offset)
            })
            .collect()
    }

    /// Checks that all reference points are mutually reachable through
    /// tiles without a collider.
    ///
    /// Zero or one reference point always passes. The fill starts from the
    /// first point; if that point is itself solid, no other door can be
    /// reached from it and the check fails.
    pub fn validate(&self, tilemap: &Tilemap, points: &[Position]) -> bool {
        let (start, rest) = match points.split_first() {
            Some((start, rest)) if !rest.is_empty() => (*start, rest),
            _ => return true,
        };

        let walkable = |pos: Position| {
            tilemap
                .get(pos)
                .map(|tile| tile.collider().is_none())
                .unwrap_or(false)
        };
        if !walkable(start) {
            trace!("Door reference point {:?} is blocked", start);
            return false;
        }

        let reached = flood_fill(start, walkable);
        match rest.iter().find(|point| !reached.contains(*point)) {
            Some(missing) => {
                trace!("Door at {:?} unreachable from {:?}", missing, start);
                false
            }
            None => true,
        }
    }

    /// Builds the reference points for a room and validates them.
    pub fn validate_room(
        &self,
        tilemap: &Tilemap,
        half_width: i32,
        half_height: i32,
        doors: &DoorConfig,
    ) -> bool {
        let points = Self::reference_points(half_width, half_height, doors);
        self.validate(tilemap, &points)
    }
}
