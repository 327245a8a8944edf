//! # Pathfinding Algorithms
//!
//! Grid traversal helpers shared by the generators and validators.

use crate::Position;
use pathfinding::prelude::bfs_reach;
use std::collections::HashSet;

/// Returns every position reachable from `start` by 4-directional steps
/// through positions accepted by `passable`.
///
/// The start position is always part of the result, even when it does not
/// satisfy the predicate itself.
///
/// # Examples
///
/// ```
/// use burrow::{flood_fill, Position};
///
/// let reached = flood_fill(Position::new(0, 0), |pos| pos.x.abs() <= 1 && pos.y == 0);
/// assert_eq!(reached.len(), 3);
/// ```
pub fn flood_fill<F>(start: Position, passable: F) -> HashSet<Position>
where
    F: Fn(Position) -> bool,
{
    bfs_reach(start, |&pos| {
        pos.cardinal_adjacent_positions()
            .into_iter()
            .filter(|&neighbor| passable(neighbor))
            .collect::<Vec<_>>()
    })
    .collect()
}
