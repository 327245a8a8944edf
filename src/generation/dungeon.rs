//! # Dungeon Generation
//!
//! Room-graph layout and the full dungeon pipeline.
//!
//! A dungeon is a set of rooms on an integer grid. The graph builder grows
//! that set outward from a start room at the origin, opening a door pair
//! for every placement, then adds a few extra doors between rooms that
//! already sit side by side. Each room of the finished graph is then built
//! into a tilemap by the [`RoomBuilder`].

use crate::generation::boundary::OpenDoors;
use crate::generation::catalog::{DungeonConfig, DungeonStyle, RoomCatalog, RoomType};
use crate::generation::reachability::ReachabilityValidator;
use crate::generation::room::{RoomBuilder, RoomNode};
use crate::generation::{GenerationConfig, Generator};
use crate::{BurrowError, BurrowResult, Direction, Position};
use log::{debug, info, warn};
use pathfinding::prelude::bfs_reach;
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::BTreeMap;

/// Type and doors of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomDescriptor {
    pub room_type: RoomType,
    pub doors: OpenDoors,
    /// Door leading back to the room that placed this one
    pub parent: Option<Direction>,
}

impl RoomDescriptor {
    /// Creates a descriptor with every door closed.
    pub fn new(room_type: RoomType) -> Self {
        Self {
            room_type,
            doors: OpenDoors::closed(),
            parent: None,
        }
    }

    /// Door bitfield for the minimap.
    pub fn door_bits(&self) -> u8 {
        self.doors.bits()
    }
}

/// Mapping from grid cell to room, bounded to `[-size, size]^2`.
///
/// # Examples
///
/// ```
/// use burrow::{Direction, DungeonGraph, Position, RoomType};
///
/// let hub = DungeonGraph::hub();
/// assert_eq!(hub.len(), 9);
/// assert_eq!(hub.count_of(RoomType::Start), 9);
/// assert_eq!(
///     hub.neighbor(Position::origin(), Direction::North),
///     Some(Position::new(0, 1))
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DungeonGraph {
    size: i32,
    rooms: BTreeMap<Position, RoomDescriptor>,
    order: Vec<Position>,
}

impl DungeonGraph {
    /// Creates a graph holding only the start room at the origin.
    pub fn new(size: i32) -> Self {
        let origin = Position::origin();
        Self {
            size: size.max(0),
            rooms: BTreeMap::from([(origin, RoomDescriptor::new(RoomType::Start))]),
            order: vec![origin],
        }
    }

    /// The hub world: a 3x3 block of start rooms with every door open.
    pub fn hub() -> Self {
        let mut graph = Self::new(1);
        for x in -1..=1 {
            for y in -1..=1 {
                let pos = Position::new(x, y);
                if pos != Position::origin() {
                    graph.order.push(pos);
                }
                graph.rooms.insert(
                    pos,
                    RoomDescriptor {
                        room_type: RoomType::Start,
                        doors: OpenDoors::all(),
                        parent: None,
                    },
                );
            }
        }
        graph
    }

    /// Half-size of the grid.
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Checks whether a cell lies inside the grid bounds.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x.abs() <= self.size && pos.y.abs() <= self.size
    }

    /// Gets the room at a cell.
    pub fn get(&self, pos: Position) -> Option<&RoomDescriptor> {
        self.rooms.get(&pos)
    }

    /// Checks whether a cell holds a room.
    pub fn contains(&self, pos: Position) -> bool {
        self.rooms.contains_key(&pos)
    }

    /// Iterates over rooms in grid order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &RoomDescriptor)> + '_ {
        self.rooms.iter().map(|(&pos, room)| (pos, room))
    }

    /// Cells in the order their rooms were placed, origin first.
    pub fn placement_order(&self) -> &[Position] {
        &self.order
    }

    /// Number of rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Whether the graph holds no rooms. Never true for a built graph.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// The room reached through the door of `pos` facing `direction`.
    pub fn neighbor(&self, pos: Position, direction: Direction) -> Option<Position> {
        let room = self.rooms.get(&pos)?;
        if !room.doors.is_open(direction) {
            return None;
        }
        let next = pos.step(direction);
        self.rooms.contains_key(&next).then_some(next)
    }

    /// The room that placed the one at `pos`, if any.
    pub fn parent(&self, pos: Position) -> Option<Position> {
        let direction = self.rooms.get(&pos)?.parent?;
        self.neighbor(pos, direction)
    }

    /// Door bitfield of the room at a cell.
    pub fn door_bits(&self, pos: Position) -> Option<u8> {
        self.rooms.get(&pos).map(RoomDescriptor::door_bits)
    }

    /// Number of rooms of a given type.
    pub fn count_of(&self, room_type: RoomType) -> usize {
        self.rooms
            .values()
            .filter(|room| room.room_type == room_type)
            .count()
    }

    /// Cells reachable from the origin by walking through doors.
    pub fn reachable(&self) -> Vec<Position> {
        bfs_reach(Position::origin(), |&pos| {
            Direction::ALL
                .into_iter()
                .filter_map(|direction| self.neighbor(pos, direction))
                .collect::<Vec<_>>()
        })
        .collect()
    }

    /// Checks that every room can be reached from the origin.
    pub fn is_connected(&self) -> bool {
        self.rooms.contains_key(&Position::origin()) && self.reachable().len() == self.rooms.len()
    }

    /// Checks door symmetry and the adjacency rules of `catalog`.
    ///
    /// Every open door must face a room with the matching door open, or
    /// lead off the grid. A door a room was placed through only needs the
    /// placing room to accept it; any other door may not join two types
    /// where either refuses the other.
    pub fn check(&self, catalog: &RoomCatalog) -> BurrowResult<()> {
        for (pos, room) in self.iter() {
            if let Some(direction) = room.parent {
                if self.neighbor(pos, direction).is_none() {
                    return Err(BurrowError::GenerationFailed(format!(
                        "room at {:?} lost its door back to its parent",
                        pos
                    )));
                }
            }

            for direction in room.doors.directions() {
                let next = pos.step(direction);
                match self.rooms.get(&next) {
                    Some(other) => {
                        if !other.doors.is_open(direction.opposite()) {
                            return Err(BurrowError::GenerationFailed(format!(
                                "door {:?} of {:?} has no matching door at {:?}",
                                direction, pos, next
                            )));
                        }
                        let legal = if room.parent == Some(direction) {
                            catalog.may_place(other.room_type, room.room_type)
                        } else if other.parent == Some(direction.opposite()) {
                            catalog.may_place(room.room_type, other.room_type)
                        } else {
                            catalog.may_connect(room.room_type, other.room_type)
                        };
                        if !legal {
                            return Err(BurrowError::GenerationFailed(format!(
                                "{:?} at {:?} may not connect to {:?} at {:?}",
                                room.room_type, pos, other.room_type, next
                            )));
                        }
                    }
                    None if self.in_bounds(next) => {
                        return Err(BurrowError::GenerationFailed(format!(
                            "door {:?} of {:?} opens onto an empty cell",
                            direction, pos
                        )));
                    }
                    None => {}
                }
            }
        }

        if !self.is_connected() {
            return Err(BurrowError::GenerationFailed(
                "some rooms cannot be reached from the start room".to_string(),
            ));
        }
        Ok(())
    }

    fn place(&mut self, from: Position, direction: Direction, room_type: RoomType) {
        let to = from.step(direction);
        if let Some(parent) = self.rooms.get_mut(&from) {
            parent.doors.set_open(direction);
        }
        let mut room = RoomDescriptor::new(room_type);
        room.doors.set_open(direction.opposite());
        room.parent = Some(direction.opposite());
        self.rooms.insert(to, room);
        self.order.push(to);
    }

    fn connect(&mut self, from: Position, direction: Direction) {
        if let Some(room) = self.rooms.get_mut(&from) {
            room.doors.set_open(direction);
        }
        if let Some(room) = self.rooms.get_mut(&from.step(direction)) {
            room.doors.set_open(direction.opposite());
        }
    }
}

/// Grows a room graph from the start room under the catalog's adjacency
/// rules.
#[derive(Debug, Clone)]
pub struct DungeonGraphBuilder<'a> {
    catalog: &'a RoomCatalog,
    max_placement_attempts: u32,
    max_connection_attempts: u32,
}

impl<'a> DungeonGraphBuilder<'a> {
    /// Creates a graph builder with the configured retry bounds.
    pub fn new(catalog: &'a RoomCatalog, config: &GenerationConfig) -> Self {
        Self {
            catalog,
            max_placement_attempts: config.max_placement_attempts,
            max_connection_attempts: config.max_connection_attempts,
        }
    }

    /// Builds a graph meeting the quotas of `dungeon`.
    ///
    /// Fails with [`BurrowError::PlacementExhausted`] when too many picks in
    /// a row are rejected, which happens when the grid has no legal spot
    /// left for the types still owed.
    pub fn build(&self, dungeon: &DungeonConfig, rng: &mut StdRng) -> BurrowResult<DungeonGraph> {
        dungeon.validate()?;

        let mut graph = DungeonGraph::new(dungeon.size);
        let mut owed: BTreeMap<RoomType, u32> = dungeon
            .rooms
            .iter()
            .filter(|(_, &count)| count > 0)
            .map(|(&room_type, &count)| (room_type, count))
            .collect();

        let mut rejected = 0;
        while !owed.is_empty() {
            let types: Vec<RoomType> = owed.keys().copied().collect();
            let room_type = types[rng.gen_range(0..types.len())];
            let from = graph.order[rng.gen_range(0..graph.order.len())];
            let direction = Direction::ALL[rng.gen_range(0..4)];
            let to = from.step(direction);

            let parent_type = graph.rooms.get(&from).map(|room| room.room_type);
            let accepted = graph.in_bounds(to)
                && !graph.contains(to)
                && parent_type.map_or(false, |parent| self.catalog.may_place(parent, room_type));

            if !accepted {
                rejected += 1;
                if rejected >= self.max_placement_attempts {
                    return Err(BurrowError::PlacementExhausted {
                        room_type,
                        remaining: owed.values().sum(),
                        attempts: rejected,
                    });
                }
                continue;
            }

            rejected = 0;
            graph.place(from, direction, room_type);
            if let Some(count) = owed.get_mut(&room_type) {
                *count -= 1;
                if *count == 0 {
                    owed.remove(&room_type);
                }
            }
        }

        let added = self.add_connections(&mut graph, dungeon.connections, rng);
        if added < dungeon.connections {
            warn!(
                "Only added {} of {} extra connections",
                added, dungeon.connections
            );
        }

        debug!(
            "Built dungeon graph with {} rooms and {} extra connections",
            graph.len(),
            added
        );
        Ok(graph)
    }

    /// Opens doors between rooms that are grid neighbours but not yet
    /// joined. Returns the number of doors added.
    fn add_connections(&self, graph: &mut DungeonGraph, wanted: u32, rng: &mut StdRng) -> u32 {
        let mut added = 0;
        let mut failures = 0;
        while added < wanted && failures < self.max_connection_attempts {
            let from = graph.order[rng.gen_range(0..graph.order.len())];
            let direction = Direction::ALL[rng.gen_range(0..4)];
            let to = from.step(direction);

            let legal = match (graph.rooms.get(&from), graph.rooms.get(&to)) {
                (Some(a), Some(b)) => {
                    !a.doors.is_open(direction)
                        && self.catalog.may_connect(a.room_type, b.room_type)
                }
                _ => false,
            };
            if legal {
                graph.connect(from, direction);
                added += 1;
            } else {
                failures += 1;
            }
        }
        added
    }
}

/// A fully built dungeon: the graph plus one finished room per cell.
#[derive(Debug, Clone)]
pub struct Dungeon {
    pub style: DungeonStyle,
    pub graph: DungeonGraph,
    pub rooms: BTreeMap<Position, RoomNode>,
}

impl Dungeon {
    /// Gets the finished room at a cell.
    pub fn room(&self, pos: Position) -> Option<&RoomNode> {
        self.rooms.get(&pos)
    }

    /// The room the player enters in.
    pub fn start_room(&self) -> Option<&RoomNode> {
        self.room(Position::origin())
    }
}

/// Runs the full pipeline: graph layout followed by every room.
#[derive(Debug, Clone, Default)]
pub struct DungeonGenerator {
    catalog: RoomCatalog,
}

impl DungeonGenerator {
    /// Creates a generator using the standard catalog.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow::DungeonGenerator;
    ///
    /// let generator = DungeonGenerator::new();
    /// assert_eq!(generator.catalog().rooms.len(), 5);
    /// ```
    pub fn new() -> Self {
        Self::with_catalog(RoomCatalog::standard())
    }

    /// Creates a generator using a custom catalog.
    pub fn with_catalog(catalog: RoomCatalog) -> Self {
        Self { catalog }
    }

    /// The catalog rooms are drawn from.
    pub fn catalog(&self) -> &RoomCatalog {
        &self.catalog
    }

    /// Builds every room of an existing graph, in grid order.
    pub fn build_rooms(
        &self,
        graph: DungeonGraph,
        style: DungeonStyle,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> BurrowResult<Dungeon> {
        let mut builder = RoomBuilder::new(&self.catalog, config).with_style(style);
        let mut rooms = BTreeMap::new();
        for (pos, descriptor) in graph.iter() {
            let room = builder.build(descriptor.room_type, descriptor.doors, rng)?;
            rooms.insert(pos, room);
        }
        Ok(Dungeon {
            style,
            graph,
            rooms,
        })
    }

    /// Builds the hub world.
    pub fn generate_hub(
        &self,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> BurrowResult<Dungeon> {
        self.build_rooms(DungeonGraph::hub(), DungeonStyle::Hub, config, rng)
    }
}

impl Generator<Dungeon> for DungeonGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> BurrowResult<Dungeon> {
        config.validate()?;
        self.catalog.validate()?;

        let graph = DungeonGraphBuilder::new(&self.catalog, config).build(&config.dungeon, rng)?;
        let dungeon = self.build_rooms(graph, config.style, config, rng)?;
        self.validate(&dungeon, config)?;

        info!(
            "Generated {:?} dungeon with {} rooms (seed {})",
            dungeon.style,
            dungeon.rooms.len(),
            config.seed
        );
        Ok(dungeon)
    }

    fn validate(&self, dungeon: &Dungeon, config: &GenerationConfig) -> BurrowResult<()> {
        dungeon.graph.check(&self.catalog)?;

        let validator = ReachabilityValidator::new();
        for (pos, descriptor) in dungeon.graph.iter() {
            let room = dungeon.rooms.get(&pos).ok_or_else(|| {
                BurrowError::GenerationFailed(format!("no room built at {:?}", pos))
            })?;
            if room.room_type != descriptor.room_type
                || room.door_bits() != descriptor.door_bits()
            {
                return Err(BurrowError::GenerationFailed(format!(
                    "room at {:?} does not match its graph entry",
                    pos
                )));
            }
            if !validator.validate_room(&room.tilemap, room.width, room.height, &room.doors) {
                return Err(BurrowError::RoomUnreachable {
                    room_type: room.room_type,
                    attempts: config.max_room_attempts,
                });
            }
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "DungeonGenerator"
    }
}
