//! # Region Generation
//!
//! Stochastic fillers that rewrite parts of a room's interior in place.
//!
//! Two fillers are provided:
//! 1. **Blob**: seeds single cells and grows them through a randomized
//!    frontier of cardinal neighbours
//! 2. **Line**: stamps a full row or column, then reopens short runs of it
//!    so the room stays passable
//!
//! Options are applied strictly in the order they are declared.

use crate::generation::options::{BlobOptions, GenerationOption, LineOptions};
use crate::{BurrowResult, Direction, Position, TileType, Tilemap};
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::Rng;

/// Lines of the same orientation, and lines and door lanes, must be at
/// least this far apart.
pub const MIN_LINE_SPACING: i32 = 3;

/// The interior area a filler may touch, plus where the doors sit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomFootprint {
    pub half_width: i32,
    pub half_height: i32,
    /// Door offsets along each edge, indexed by direction
    pub door_offsets: [i32; 4],
}

impl RoomFootprint {
    /// Creates a footprint with every door centered on its edge.
    pub fn new(half_width: i32, half_height: i32) -> Self {
        Self {
            half_width,
            half_height,
            door_offsets: [0; 4],
        }
    }

    /// Checks whether a position lies in the interior.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x.abs() <= self.half_width && pos.y.abs() <= self.half_height
    }

    /// Iterates over the interior, bottom row first.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (-self.half_height..=self.half_height).flat_map(move |y| {
            (-self.half_width..=self.half_width).map(move |x| Position::new(x, y))
        })
    }
}

/// Applies generation options to a room interior.
#[derive(Debug, Clone)]
pub struct RegionGenerator {
    /// Maximum offset draws per line option before giving up on the
    /// remaining lines
    pub max_line_attempts: u32,
}

impl RegionGenerator {
    /// Creates a region generator.
    pub fn new(max_line_attempts: u32) -> Self {
        Self { max_line_attempts }
    }

    /// Applies every option, in order, to the tilemap.
    pub fn apply(
        &self,
        tilemap: &mut Tilemap,
        options: &[GenerationOption],
        footprint: &RoomFootprint,
        rng: &mut StdRng,
    ) -> BurrowResult<()> {
        for option in options {
            match option {
                GenerationOption::Blob(blob) => self.apply_blob(tilemap, blob, footprint, rng)?,
                GenerationOption::Line(line) => self.apply_line(tilemap, line, footprint, rng)?,
            }
        }
        Ok(())
    }

    /// Seeds and grows blobs of the target tile.
    pub fn apply_blob(
        &self,
        tilemap: &mut Tilemap,
        blob: &BlobOptions,
        footprint: &RoomFootprint,
        rng: &mut StdRng,
    ) -> BurrowResult<()> {
        let eligible = |tilemap: &Tilemap, pos: Position| {
            footprint.contains(pos)
                && tilemap
                    .get(pos)
                    .map(|tile| tile != blob.target_tile && blob.overrides.contains(&tile))
                    .unwrap_or(false)
        };

        for seeded in 0..blob.seed_amount {
            let candidates: Vec<Position> = footprint
                .positions()
                .filter(|&pos| eligible(&*tilemap, pos))
                .collect();
            if candidates.is_empty() {
                trace!(
                    "{:?} blob stopped after {} of {} seeds: nothing left to override",
                    blob.target_tile,
                    seeded,
                    blob.seed_amount
                );
                break;
            }

            let seed = candidates[rng.gen_range(0..candidates.len())];
            tilemap.set(seed, blob.target_tile)?;

            let mut frontier = Vec::new();
            Self::enqueue_neighbors(&mut frontier, seed, blob.spread_compound, |pos| {
                eligible(&*tilemap, pos)
            });

            let mut grown = 0;
            while grown < blob.spread_amount || rng.gen::<f64>() < blob.spread_additional_chance {
                if frontier.is_empty() {
                    break;
                }
                let cell = frontier.swap_remove(rng.gen_range(0..frontier.len()));
                // Compound frontiers can hold cells converted since they were queued
                if !eligible(&*tilemap, cell) {
                    continue;
                }
                tilemap.set(cell, blob.target_tile)?;
                grown += 1;
                Self::enqueue_neighbors(&mut frontier, cell, blob.spread_compound, |pos| {
                    eligible(&*tilemap, pos)
                });
            }
        }

        Ok(())
    }

    /// Queues the eligible cardinal neighbours of `from`. Without
    /// `compound` a cell already waiting in the frontier is not queued
    /// again.
    fn enqueue_neighbors(
        frontier: &mut Vec<Position>,
        from: Position,
        compound: bool,
        eligible: impl Fn(Position) -> bool,
    ) {
        for neighbor in from.cardinal_adjacent_positions() {
            if eligible(neighbor) && (compound || !frontier.contains(&neighbor)) {
                frontier.push(neighbor);
            }
        }
    }

    /// Stamps lines of the target tile and carves holes through them.
    pub fn apply_line(
        &self,
        tilemap: &mut Tilemap,
        line: &LineOptions,
        footprint: &RoomFootprint,
        rng: &mut StdRng,
    ) -> BurrowResult<()> {
        let mut horizontal_offsets: Vec<i32> = Vec::new();
        let mut vertical_offsets: Vec<i32> = Vec::new();
        let (min_hole, max_hole) = (
            line.hole_size_range.0.min(line.hole_size_range.1),
            line.hole_size_range.0.max(line.hole_size_range.1),
        );

        let mut placed = 0;
        let mut attempts = 0;
        while placed < line.seed_amount && attempts < self.max_line_attempts {
            attempts += 1;

            let horizontal = rng.gen_bool(0.5);
            let (reach, placed_offsets, door_lanes) = if horizontal {
                (
                    footprint.half_height - 1,
                    &mut horizontal_offsets,
                    [
                        footprint.door_offsets[Direction::East.index()],
                        footprint.door_offsets[Direction::West.index()],
                    ],
                )
            } else {
                (
                    footprint.half_width - 1,
                    &mut vertical_offsets,
                    [
                        footprint.door_offsets[Direction::North.index()],
                        footprint.door_offsets[Direction::South.index()],
                    ],
                )
            };
            let reach = reach.max(0);
            let offset = rng.gen_range(-reach..=reach);

            let too_close = |other: &i32| (other - offset).abs() < MIN_LINE_SPACING;
            if placed_offsets.iter().any(too_close) || door_lanes.iter().any(too_close) {
                continue;
            }

            let cells: Vec<Position> = if horizontal {
                (-footprint.half_width..=footprint.half_width)
                    .map(|x| Position::new(x, offset))
                    .collect()
            } else {
                (-footprint.half_height..=footprint.half_height)
                    .map(|y| Position::new(offset, y))
                    .collect()
            };

            // Pre-line value of every cell the stamp actually changed
            let mut previous: Vec<Option<TileType>> = Vec::with_capacity(cells.len());
            for &cell in &cells {
                match tilemap.get(cell) {
                    Some(tile) if tile != line.target_tile && line.overrides.contains(&tile) => {
                        tilemap.set(cell, line.target_tile)?;
                        previous.push(Some(tile));
                    }
                    _ => previous.push(None),
                }
            }

            for _ in 0..line.hole_amount {
                let start = rng.gen_range(0..cells.len());
                let extra = rng.gen_range(min_hole..=max_hole);
                let (mut low, mut high) = (start, start);
                Self::revert(tilemap, &cells, &previous, start)?;

                for _ in 0..extra {
                    let grow_low = match (low > 0, high + 1 < cells.len()) {
                        (true, true) => rng.gen_bool(0.5),
                        (true, false) => true,
                        (false, true) => false,
                        (false, false) => break,
                    };
                    if grow_low {
                        low -= 1;
                        Self::revert(tilemap, &cells, &previous, low)?;
                    } else {
                        high += 1;
                        Self::revert(tilemap, &cells, &previous, high)?;
                    }
                }
            }

            placed_offsets.push(offset);
            placed += 1;
        }

        if placed < line.seed_amount {
            debug!(
                "Placed {} of {} {:?} lines after {} attempts",
                placed, line.seed_amount, line.target_tile, attempts
            );
        }

        Ok(())
    }

    fn revert(
        tilemap: &mut Tilemap,
        cells: &[Position],
        previous: &[Option<TileType>],
        index: usize,
    ) -> BurrowResult<()> {
        if let Some(tile) = previous[index] {
            tilemap.set(cells[index], tile)?;
        }
        Ok(())
    }
}

impl Default for RegionGenerator {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_LINE_ATTEMPTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn blob(target: TileType, seeds: u32, spread: u32, compound: bool) -> BlobOptions {
        BlobOptions {
            target_tile: target,
            overrides: vec![TileType::Floor],
            seed_amount: seeds,
            spread_amount: spread,
            spread_additional_chance: 0.0,
            spread_compound: compound,
        }
    }

    fn wall_line(seeds: u32, holes: u32) -> LineOptions {
        LineOptions {
            target_tile: TileType::Wall,
            overrides: vec![TileType::Floor],
            seed_amount: seeds,
            hole_amount: holes,
            hole_size_range: (1, 2),
        }
    }

    #[test]
    fn test_blob_converts_seed_plus_spread() {
        let footprint = RoomFootprint::new(7, 7);
        let mut map = Tilemap::blank(7, 7);
        let mut rng = StdRng::seed_from_u64(11);

        RegionGenerator::default()
            .apply_blob(&mut map, &blob(TileType::Pit, 1, 10, false), &footprint, &mut rng)
            .unwrap();

        // A single blob on an open floor always has room to grow
        assert_eq!(map.count(TileType::Pit), 11);
    }

    #[test]
    fn test_certain_additional_spread_fills_the_footprint() {
        let footprint = RoomFootprint::new(7, 7);
        let mut map = Tilemap::blank(7, 7);
        let mut rng = StdRng::seed_from_u64(11);
        let greedy = BlobOptions {
            spread_additional_chance: 1.0,
            ..blob(TileType::Pit, 1, 10, false)
        };

        RegionGenerator::default()
            .apply_blob(&mut map, &greedy, &footprint, &mut rng)
            .unwrap();

        assert_eq!(map.count(TileType::Pit), 15 * 15);
    }

    #[test]
    fn test_additional_chance_grows_past_spread_amount() {
        let footprint = RoomFootprint::new(7, 7);
        let options = BlobOptions {
            spread_additional_chance: 0.5,
            ..blob(TileType::Pit, 1, 10, false)
        };

        let mut largest = 0;
        for seed in 0..20 {
            let mut map = Tilemap::blank(7, 7);
            let mut rng = StdRng::seed_from_u64(seed);
            RegionGenerator::default()
                .apply_blob(&mut map, &options, &footprint, &mut rng)
                .unwrap();

            let pits = map.count(TileType::Pit);
            assert!(pits >= 11, "seed {} grew only {} cells", seed, pits);
            largest = largest.max(pits);
        }
        assert!(largest > 11);
    }

    #[test]
    fn test_frontier_without_compound_holds_each_cell_once() {
        let open = |_: Position| true;
        let shared = [Position::new(1, 0), Position::new(0, 1)];

        let mut frontier = Vec::new();
        RegionGenerator::enqueue_neighbors(&mut frontier, Position::origin(), false, open);
        RegionGenerator::enqueue_neighbors(&mut frontier, Position::new(1, 1), false, open);
        assert_eq!(frontier.len(), 6);
        for cell in shared {
            assert_eq!(frontier.iter().filter(|&&queued| queued == cell).count(), 1);
        }

        let mut frontier = Vec::new();
        RegionGenerator::enqueue_neighbors(&mut frontier, Position::origin(), true, open);
        RegionGenerator::enqueue_neighbors(&mut frontier, Position::new(1, 1), true, open);
        assert_eq!(frontier.len(), 8);
        for cell in shared {
            assert_eq!(frontier.iter().filter(|&&queued| queued == cell).count(), 2);
        }
    }

    #[test]
    fn test_blob_is_connected() {
        let footprint = RoomFootprint::new(6, 6);
        let mut map = Tilemap::blank(6, 6);
        let mut rng = StdRng::seed_from_u64(5);

        RegionGenerator::default()
            .apply_blob(&mut map, &blob(TileType::Pit, 1, 25, true), &footprint, &mut rng)
            .unwrap();

        let pits: Vec<Position> = map
            .iter()
            .filter(|(_, tile)| *tile == TileType::Pit)
            .map(|(pos, _)| pos)
            .collect();
        let reached = crate::utils::flood_fill(pits[0], |pos| {
            map.get(pos) == Some(TileType::Pit)
        });
        assert_eq!(reached.len(), pits.len());
    }

    #[test]
    fn test_blob_respects_overrides() {
        let footprint = RoomFootprint::new(3, 3);
        let mut map = Tilemap::new(3, 3, TileType::Wall);
        map.set(Position::new(0, 0), TileType::Floor).unwrap();
        map.set(Position::new(1, 0), TileType::Floor).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        RegionGenerator::default()
            .apply_blob(&mut map, &blob(TileType::Pit, 4, 10, false), &footprint, &mut rng)
            .unwrap();

        assert_eq!(map.count(TileType::Pit), 2);
        assert_eq!(map.count(TileType::Wall), 47);
    }

    #[test]
    fn test_blob_stays_inside_footprint() {
        let footprint = RoomFootprint::new(2, 2);
        let mut map = Tilemap::blank(5, 5);
        let mut rng = StdRng::seed_from_u64(9);

        RegionGenerator::default()
            .apply_blob(&mut map, &blob(TileType::Pit, 3, 40, true), &footprint, &mut rng)
            .unwrap();

        for (pos, tile) in map.iter() {
            if tile == TileType::Pit {
                assert!(footprint.contains(pos), "pit escaped to {:?}", pos);
            }
        }
    }

    #[test]
    fn test_line_without_holes_spans_the_room() {
        let footprint = RoomFootprint::new(7, 7);
        let mut map = Tilemap::blank(7, 7);
        let mut rng = StdRng::seed_from_u64(21);

        RegionGenerator::default()
            .apply_line(&mut map, &wall_line(1, 0), &footprint, &mut rng)
            .unwrap();

        assert_eq!(map.count(TileType::Wall), 15);
        let is_wall = |x, y| map.get(Position::new(x, y)) == Some(TileType::Wall);
        let full_row = (-7..=7).any(|y| (-7..=7).all(|x| is_wall(x, y)));
        let full_column = (-7..=7).any(|x| (-7..=7).all(|y| is_wall(x, y)));
        assert!(full_row || full_column);
    }

    #[test]
    fn test_lines_keep_clear_of_door_lanes_and_each_other() {
        let footprint = RoomFootprint::new(7, 7);
        for seed in 0..20 {
            let mut map = Tilemap::blank(7, 7);
            let mut rng = StdRng::seed_from_u64(seed);
            RegionGenerator::default()
                .apply_line(&mut map, &wall_line(2, 0), &footprint, &mut rng)
                .unwrap();

            let rows: Vec<i32> = (-7..=7)
                .filter(|&y| (-7..=7).all(|x| map.get(Position::new(x, y)) == Some(TileType::Wall)))
                .collect();
            for &y in &rows {
                assert!(y.abs() >= MIN_LINE_SPACING, "row {} blocks a door lane", y);
            }
            for pair in rows.windows(2) {
                assert!(pair[1] - pair[0] >= MIN_LINE_SPACING);
            }
        }
    }

    #[test]
    fn test_holes_reopen_line_cells() {
        let footprint = RoomFootprint::new(7, 7);
        let mut map = Tilemap::blank(7, 7);
        let mut rng = StdRng::seed_from_u64(4);

        RegionGenerator::default()
            .apply_line(&mut map, &wall_line(1, 2), &footprint, &mut rng)
            .unwrap();

        let walls = map.count(TileType::Wall);
        assert!(walls < 15, "holes should reopen part of the line");
        assert!(walls >= 15 - 2 * 3);
    }

    #[test]
    fn test_options_apply_in_order() {
        let footprint = RoomFootprint::new(4, 4);
        let mut map = Tilemap::blank(4, 4);
        let mut rng = StdRng::seed_from_u64(8);

        let options = vec![
            GenerationOption::Blob(BlobOptions {
                target_tile: TileType::SecondaryFloor,
                overrides: vec![TileType::Floor],
                seed_amount: 1,
                spread_amount: 200,
                spread_additional_chance: 0.0,
                spread_compound: false,
            }),
            GenerationOption::Blob(BlobOptions {
                target_tile: TileType::Pit,
                overrides: vec![TileType::SecondaryFloor],
                seed_amount: 1,
                spread_amount: 200,
                spread_additional_chance: 0.0,
                spread_compound: false,
            }),
        ];
        RegionGenerator::default()
            .apply(&mut map, &options, &footprint, &mut rng)
            .unwrap();

        assert_eq!(map.count(TileType::Pit), 81);
    }
}
