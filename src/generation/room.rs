//! # Room Builder
//!
//! Turns one node of the dungeon graph into a finished tilemap by running
//! the region fillers, stamping the boundary and validating that every
//! door is reachable, retrying until a layout passes.

use crate::config::MAX_ROOM_EXTENT;
use crate::generation::boundary::{BoundaryBuilder, Door, DoorConfig, OpenDoors};
use crate::generation::catalog::{DungeonStyle, RoomCatalog, RoomType};
use crate::generation::options::{MapTemplate, RoomConfig};
use crate::generation::reachability::ReachabilityValidator;
use crate::generation::region::{RegionGenerator, RoomFootprint};
use crate::generation::GenerationConfig;
use crate::{BurrowError, BurrowResult, Direction, Position, TileType, Tilemap};
use log::{debug, trace};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Stage of the room build loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomState {
    /// Filling the interior from the base layout
    Seeding,
    /// Stamping the border ring and door notches
    Bounding,
    /// Checking that the doors connect
    Validating,
    /// A layout passed and is frozen
    Done,
}

/// A finished room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomNode {
    pub room_type: RoomType,
    /// Interior half-width
    pub width: i32,
    /// Interior half-height
    pub height: i32,
    pub doors: DoorConfig,
    /// Post-boundary layout covering `±(width + 3) x ±(height + 3)`
    pub tilemap: Tilemap,
}

impl RoomNode {
    /// Door bitfield for display: the sum of `2^direction` over open doors.
    pub fn door_bits(&self) -> u8 {
        self.doors.bits()
    }
}

/// Everything about a room that is fixed before the attempt loop starts.
#[derive(Debug, Clone)]
struct RoomPlan {
    config: RoomConfig,
    half_width: i32,
    half_height: i32,
    border: TileType,
    doors: DoorConfig,
    door_offsets: [i32; 4],
    base: Tilemap,
}

/// Builds rooms by generate-and-test.
#[derive(Debug, Clone)]
pub struct RoomBuilder<'a> {
    catalog: &'a RoomCatalog,
    style: DungeonStyle,
    region: RegionGenerator,
    validator: ReachabilityValidator,
    max_attempts: u32,
    state: RoomState,
}

impl<'a> RoomBuilder<'a> {
    /// Creates a room builder for the configured style and retry bound.
    pub fn new(catalog: &'a RoomCatalog, config: &GenerationConfig) -> Self {
        Self {
            catalog,
            style: config.style,
            region: RegionGenerator::new(config.max_line_attempts),
            validator: ReachabilityValidator::new(),
            max_attempts: config.max_room_attempts,
            state: RoomState::Done,
        }
    }

    /// Overrides the style rooms are drawn from.
    pub fn with_style(mut self, style: DungeonStyle) -> Self {
        self.style = style;
        self
    }

    /// Stage of the most recent build.
    pub fn state(&self) -> RoomState {
        self.state
    }

    /// Builds a room of `room_type`, picking its config from the catalog.
    pub fn build(
        &mut self,
        room_type: RoomType,
        open: OpenDoors,
        rng: &mut StdRng,
    ) -> BurrowResult<RoomNode> {
        let config = self.catalog.choose_config(room_type, self.style, rng)?;
        self.build_with_config(room_type, &config, open, rng)
    }

    /// Builds a room from an explicit config.
    pub fn build_with_config(
        &mut self,
        room_type: RoomType,
        config: &RoomConfig,
        open: OpenDoors,
        rng: &mut StdRng,
    ) -> BurrowResult<RoomNode> {
        let plan = self.plan(room_type, config, open, rng)?;
        let footprint = RoomFootprint {
            half_width: plan.half_width,
            half_height: plan.half_height,
            door_offsets: plan.door_offsets,
        };
        let boundary = BoundaryBuilder::new(plan.half_width, plan.half_height, plan.border);

        for attempt in 1..=self.max_attempts {
            self.transition(RoomState::Seeding);
            let mut tilemap = plan.base.clone();
            self.region
                .apply(&mut tilemap, &plan.config.options, &footprint, rng)?;

            self.transition(RoomState::Bounding);
            let tilemap = boundary.build(&tilemap, &plan.doors)?;

            self.transition(RoomState::Validating);
            if self
                .validator
                .validate_room(&tilemap, plan.half_width, plan.half_height, &plan.doors)
            {
                self.transition(RoomState::Done);
                debug!(
                    "Built {:?} room {}x{} (doors {:04b}) on attempt {}",
                    room_type,
                    plan.half_width,
                    plan.half_height,
                    plan.doors.bits(),
                    attempt
                );
                return Ok(RoomNode {
                    room_type,
                    width: plan.half_width,
                    height: plan.half_height,
                    doors: plan.doors,
                    tilemap,
                });
            }
            debug!("{:?} room attempt {} left doors unreachable", room_type, attempt);
        }

        Err(BurrowError::RoomUnreachable {
            room_type,
            attempts: self.max_attempts,
        })
    }

    fn transition(&mut self, next: RoomState) {
        trace!("Room builder {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Resolves every random choice that holds across attempts: the
    /// template, dimensions and door offsets.
    fn plan(
        &self,
        room_type: RoomType,
        config: &RoomConfig,
        open: OpenDoors,
        rng: &mut StdRng,
    ) -> BurrowResult<RoomPlan> {
        let template = config.choose_map(rng);
        if let Some(template) = &template {
            template.validate()?;
        }

        let (half_width, half_height) = match &template {
            Some(template) => (template.width, template.height),
            None => self.catalog.info(room_type)?.default_dimensions,
        };
        let extents = 1..=MAX_ROOM_EXTENT;
        if !extents.contains(&half_width) || !extents.contains(&half_height) {
            return Err(BurrowError::InvalidConfig(format!(
                "{:?} room dimensions {}x{} must lie in 1..={}",
                room_type, half_width, half_height, MAX_ROOM_EXTENT
            )));
        }

        let mut doors = DoorConfig::closed();
        let mut door_offsets = [0; 4];
        for direction in Direction::ALL {
            let door = match &template {
                Some(template) => {
                    let info = template.doors[direction.index()];
                    Door {
                        offset: info.position.resolve(rng),
                        floor: info.floor,
                    }
                }
                None => Door::default(),
            };
            door_offsets[direction.index()] = door.offset;
            if open.is_open(direction) {
                doors = doors.with_door(direction, door);
            }
        }

        let base = Self::base_tilemap(half_width, half_height, template.as_ref())?;
        let border = template
            .as_ref()
            .map(|template| template.border)
            .unwrap_or(TileType::Wall);

        Ok(RoomPlan {
            config: config.clone(),
            half_width,
            half_height,
            border,
            doors,
            door_offsets,
            base,
        })
    }

    /// Blank floor overlaid with the template's literal matrix, if any.
    fn base_tilemap(
        half_width: i32,
        half_height: i32,
        template: Option<&MapTemplate>,
    ) -> BurrowResult<Tilemap> {
        let mut tilemap = Tilemap::blank(half_width, half_height);
        if let Some(matrix) = template.and_then(|template| template.matrix.as_ref()) {
            for (row, tiles) in matrix.iter().enumerate() {
                for (column, &tile) in tiles.iter().enumerate() {
                    let pos = Position::new(column as i32 - half_width, half_height - row as i32);
                    tilemap.set(pos, tile)?;
                }
            }
        }
        Ok(tilemap)
    }
}
