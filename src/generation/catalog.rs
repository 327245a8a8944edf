//! # Room Catalog
//!
//! Room types, dungeon styles and the read-only configuration data that
//! tells the generators how big each room is, which room types may sit
//! next to each other, and which generation configs a room can use.

use crate::generation::options::{
    BlobOptions, DoorInfo, DoorPosition, GenerationOption, LineOptions, MapTemplate, RoomConfig,
};
use crate::config::{MAX_DUNGEON_SIZE, MAX_ROOM_EXTENT};
use crate::{BurrowError, BurrowResult, Direction, TileType};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Different types of rooms that make up a dungeon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoomType {
    /// The room the player enters the dungeon in
    Start,
    /// Standard combat room
    Fight,
    /// Room containing treasure
    Treasure,
    /// Room with a boss
    Boss,
    /// Shop or merchant room
    Shop,
}

impl RoomType {
    /// Every room type, in catalog order.
    pub const ALL: [RoomType; 5] = [
        RoomType::Start,
        RoomType::Fight,
        RoomType::Treasure,
        RoomType::Boss,
        RoomType::Shop,
    ];
}

/// Tileset and generation flavour of a dungeon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DungeonStyle {
    Hub,
    Ice,
    Volcano,
}

impl std::str::FromStr for DungeonStyle {
    type Err = BurrowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hub" => Ok(DungeonStyle::Hub),
            "ice" => Ok(DungeonStyle::Ice),
            "volcano" => Ok(DungeonStyle::Volcano),
            other => Err(BurrowError::InvalidConfig(format!(
                "unknown dungeon style '{}'",
                other
            ))),
        }
    }
}

/// Catalog entry for one room type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomTypeInfo {
    /// Half-extents used when the chosen config has no template
    pub default_dimensions: (i32, i32),
    /// Room types this one refuses as neighbours
    pub dont_connect: Vec<RoomType>,
    /// Config choices per style; duplicates weight the choice
    pub configs: BTreeMap<DungeonStyle, Vec<RoomConfig>>,
}

/// Read-only room configuration, loaded once before generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomCatalog {
    pub rooms: BTreeMap<RoomType, RoomTypeInfo>,
}

impl RoomCatalog {
    /// The built-in catalog.
    pub fn standard() -> Self {
        use RoomType::*;

        let all_styles = |configs: Vec<RoomConfig>| {
            [DungeonStyle::Hub, DungeonStyle::Ice, DungeonStyle::Volcano]
                .into_iter()
                .map(|style| (style, configs.clone()))
                .collect::<BTreeMap<_, _>>()
        };

        let mut fight_configs = BTreeMap::new();
        fight_configs.insert(
            DungeonStyle::Hub,
            vec![fight_large(), fight_semi_random(), fight_random()],
        );
        fight_configs.insert(
            DungeonStyle::Ice,
            vec![
                fight_large(),
                fight_semi_random(),
                fight_semi_random(),
                fight_random(),
            ],
        );
        fight_configs.insert(
            DungeonStyle::Volcano,
            vec![fight_large(), fight_semi_random(), fight_random()],
        );

        let mut rooms = BTreeMap::new();
        rooms.insert(
            Start,
            RoomTypeInfo {
                default_dimensions: (6, 6),
                dont_connect: vec![Start, Treasure, Boss, Shop],
                configs: all_styles(vec![RoomConfig::empty()]),
            },
        );
        rooms.insert(
            Fight,
            RoomTypeInfo {
                default_dimensions: (7, 7),
                dont_connect: Vec::new(),
                configs: fight_configs,
            },
        );
        rooms.insert(
            Treasure,
            RoomTypeInfo {
                default_dimensions: (6, 5),
                dont_connect: vec![Treasure, Boss, Shop],
                configs: all_styles(vec![treasure()]),
            },
        );
        rooms.insert(
            Boss,
            RoomTypeInfo {
                default_dimensions: (9, 9),
                dont_connect: vec![Start, Fight, Treasure, Boss, Shop],
                configs: all_styles(vec![boss_centred()]),
            },
        );
        rooms.insert(
            Shop,
            RoomTypeInfo {
                default_dimensions: (10, 7),
                dont_connect: vec![Start, Fight, Treasure, Shop],
                configs: all_styles(vec![RoomConfig::empty()]),
            },
        );

        Self { rooms }
    }

    /// Parses a catalog from JSON and validates it.
    pub fn from_json_str(json: &str) -> BurrowResult<Self> {
        let catalog: RoomCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Loads a catalog from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> BurrowResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Checks that every room type is present with usable data.
    pub fn validate(&self) -> BurrowResult<()> {
        for room_type in RoomType::ALL {
            let info = self.info(room_type)?;
            let (width, height) = info.default_dimensions;
            if !(1..=MAX_ROOM_EXTENT).contains(&width) || !(1..=MAX_ROOM_EXTENT).contains(&height) {
                return Err(BurrowError::InvalidConfig(format!(
                    "{:?} default dimensions {}x{} must lie in 1..={}",
                    room_type, width, height, MAX_ROOM_EXTENT
                )));
            }
            for config in info.configs.values().flatten() {
                for template in config.maps.iter().flatten() {
                    template.validate()?;
                }
            }
        }
        Ok(())
    }

    /// Gets the entry for a room type.
    pub fn info(&self, room_type: RoomType) -> BurrowResult<&RoomTypeInfo> {
        self.rooms.get(&room_type).ok_or_else(|| {
            BurrowError::InvalidConfig(format!("no catalog entry for {:?}", room_type))
        })
    }

    /// Checks whether a room of type `parent` may grow a new `child` room
    /// through one of its doors. Only the parent's dont-connect set counts.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow::{RoomCatalog, RoomType};
    ///
    /// let catalog = RoomCatalog::standard();
    /// assert!(catalog.may_place(RoomType::Fight, RoomType::Boss));
    /// assert!(!catalog.may_place(RoomType::Boss, RoomType::Fight));
    /// ```
    pub fn may_place(&self, parent: RoomType, child: RoomType) -> bool {
        self.rooms
            .get(&parent)
            .map_or(true, |info| !info.dont_connect.contains(&child))
    }

    /// Checks whether two existing rooms may be joined by an extra door.
    ///
    /// The check is symmetric: the pair is rejected if either type lists
    /// the other in its dont-connect set.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow::{RoomCatalog, RoomType};
    ///
    /// let catalog = RoomCatalog::standard();
    /// assert!(catalog.may_connect(RoomType::Start, RoomType::Fight));
    /// assert!(catalog.may_connect(RoomType::Fight, RoomType::Start));
    /// assert!(!catalog.may_connect(RoomType::Fight, RoomType::Boss));
    /// ```
    pub fn may_connect(&self, a: RoomType, b: RoomType) -> bool {
        self.may_place(a, b) && self.may_place(b, a)
    }

    /// Picks one of the configs listed for a room type and style.
    pub fn choose_config(
        &self,
        room_type: RoomType,
        style: DungeonStyle,
        rng: &mut StdRng,
    ) -> BurrowResult<RoomConfig> {
        let configs = self
            .info(room_type)?
            .configs
            .get(&style)
            .filter(|configs| !configs.is_empty())
            .ok_or_else(|| {
                BurrowError::InvalidConfig(format!(
                    "no {:?} configs for {:?} rooms",
                    style, room_type
                ))
            })?;
        Ok(configs[rng.gen_range(0..configs.len())].clone())
    }
}

impl Default for RoomCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Room-placement quotas for one dungeon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonConfig {
    /// Half-size of the room grid; rooms live in `[-size, size]^2`
    pub size: i32,
    /// Number of rooms to place per type, not counting the start room
    pub rooms: BTreeMap<RoomType, u32>,
    /// Extra doors between already-adjacent rooms
    pub connections: u32,
}

impl DungeonConfig {
    /// The standard dungeon.
    pub fn base() -> Self {
        Self {
            size: 3,
            rooms: BTreeMap::from([
                (RoomType::Fight, 20),
                (RoomType::Treasure, 5),
                (RoomType::Boss, 2),
                (RoomType::Shop, 1),
            ]),
            connections: 9,
        }
    }

    /// A larger dungeon on an 11x11 grid.
    pub fn big() -> Self {
        Self {
            size: 5,
            rooms: BTreeMap::from([
                (RoomType::Fight, 60),
                (RoomType::Treasure, 20),
                (RoomType::Boss, 5),
                (RoomType::Shop, 3),
            ]),
            connections: 30,
        }
    }

    /// Total number of rooms owed, excluding the start room.
    pub fn total_rooms(&self) -> u64 {
        self.rooms.values().map(|&count| u64::from(count)).sum()
    }

    /// Number of grid cells available besides the origin.
    pub fn capacity(&self) -> u64 {
        let side = 2 * u64::from(self.size.max(0).unsigned_abs()) + 1;
        side.saturating_mul(side) - 1
    }

    /// Rejects configurations that can never be satisfied.
    pub fn validate(&self) -> BurrowResult<()> {
        if !(0..=MAX_DUNGEON_SIZE).contains(&self.size) {
            return Err(BurrowError::InvalidConfig(format!(
                "dungeon size {} must lie in 0..={}",
                self.size, MAX_DUNGEON_SIZE
            )));
        }
        if self.rooms.contains_key(&RoomType::Start) {
            return Err(BurrowError::InvalidConfig(
                "start rooms cannot be placed by quota".to_string(),
            ));
        }
        if self.total_rooms() > self.capacity() {
            return Err(BurrowError::InvalidConfig(format!(
                "{} rooms requested but a size {} grid only holds {}",
                self.total_rooms(),
                self.size,
                self.capacity()
            )));
        }
        Ok(())
    }
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self::base()
    }
}

fn secondary_floor_patches() -> GenerationOption {
    GenerationOption::Blob(BlobOptions {
        target_tile: TileType::SecondaryFloor,
        overrides: vec![TileType::Floor],
        seed_amount: 3,
        spread_amount: 20,
        spread_additional_chance: 0.2,
        spread_compound: false,
    })
}

fn fight_large() -> RoomConfig {
    let centered_range = DoorInfo {
        position: DoorPosition::Range(-3, 3),
        floor: TileType::Floor,
    };
    let mut template = MapTemplate::new(10, 8, TileType::Wall);
    for direction in Direction::ALL {
        template = template.with_door(direction, centered_range);
    }

    RoomConfig {
        options: vec![
            secondary_floor_patches(),
            GenerationOption::Blob(BlobOptions {
                target_tile: TileType::Pit,
                overrides: vec![TileType::Floor, TileType::SecondaryFloor],
                seed_amount: 2,
                spread_amount: 30,
                spread_additional_chance: 0.5,
                spread_compound: true,
            }),
        ],
        maps: vec![Some(template)],
    }
}

fn fight_semi_random() -> RoomConfig {
    RoomConfig {
        options: vec![
            secondary_floor_patches(),
            GenerationOption::Blob(BlobOptions {
                target_tile: TileType::Pit,
                overrides: vec![TileType::Floor, TileType::SecondaryFloor],
                seed_amount: 1,
                spread_amount: 50,
                spread_additional_chance: 0.5,
                spread_compound: true,
            }),
            GenerationOption::Line(LineOptions {
                target_tile: TileType::Wall,
                overrides: vec![TileType::Floor, TileType::Pit, TileType::SecondaryFloor],
                seed_amount: 2,
                hole_amount: 3,
                hole_size_range: (2, 4),
            }),
        ],
        maps: vec![None],
    }
}

fn fight_random() -> RoomConfig {
    RoomConfig {
        options: vec![
            GenerationOption::Blob(BlobOptions {
                target_tile: TileType::Pit,
                overrides: vec![TileType::Floor],
                seed_amount: 3,
                spread_amount: 15,
                spread_additional_chance: 0.4,
                spread_compound: false,
            }),
            GenerationOption::Blob(BlobOptions {
                target_tile: TileType::Wall,
                overrides: vec![TileType::Floor],
                seed_amount: 2,
                spread_amount: 6,
                spread_additional_chance: 0.3,
                spread_compound: true,
            }),
            GenerationOption::Line(LineOptions {
                target_tile: TileType::Wall,
                overrides: vec![TileType::Floor, TileType::Pit],
                seed_amount: 1,
                hole_amount: 2,
                hole_size_range: (1, 3),
            }),
            secondary_floor_patches(),
        ],
        maps: vec![None, Some(MapTemplate::new(8, 6, TileType::Wall))],
    }
}

fn treasure() -> RoomConfig {
    RoomConfig {
        options: vec![GenerationOption::Blob(BlobOptions {
            target_tile: TileType::Pavement,
            overrides: vec![TileType::Floor],
            seed_amount: 1,
            spread_amount: 12,
            spread_additional_chance: 0.3,
            spread_compound: true,
        })],
        maps: vec![None],
    }
}

/// The 19x19 boss arena: walled corners, four pit-guarded pillars and a
/// paved dais. The layout is mirror-symmetric on both axes, so each cell
/// is decided by its distance from the nearest edge.
fn boss_arena() -> Vec<Vec<TileType>> {
    const SIDE: usize = 19;
    let from_edge = |i: usize| i.min(SIDE - 1 - i);

    (0..SIDE)
        .map(|row| {
            (0..SIDE)
                .map(|column| match (from_edge(row), from_edge(column)) {
                    (r, c) if r <= 1 && c <= 1 => TileType::Wall,
                    (4, 4) => TileType::Wall,
                    (4, 5) | (5, 4) => TileType::Pit,
                    (r, c) if r >= 7 && c >= 7 => TileType::Pavement,
                    (6, 8) | (8, 6) => TileType::SecondaryFloor,
                    _ => TileType::Floor,
                })
                .collect()
        })
        .collect()
}

fn boss_centred() -> RoomConfig {
    let door = DoorInfo {
        position: DoorPosition::Range(-2, 2),
        floor: TileType::Floor,
    };
    let mut template = MapTemplate::new(9, 9, TileType::Wall);
    for direction in Direction::ALL {
        template = template.with_door(direction, door);
    }
    template.matrix = Some(boss_arena());

    RoomConfig {
        options: vec![GenerationOption::Blob(BlobOptions {
            target_tile: TileType::SecondaryFloor,
            overrides: vec![TileType::Floor],
            seed_amount: 2,
            spread_amount: 10,
            spread_additional_chance: 0.3,
            spread_compound: false,
        })],
        maps: vec![Some(template)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_standard_catalog_is_valid() {
        let catalog = RoomCatalog::standard();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.rooms.len(), RoomType::ALL.len());
    }

    #[test]
    fn test_default_dimensions() {
        let catalog = RoomCatalog::standard();
        assert_eq!(catalog.info(RoomType::Start).unwrap().default_dimensions, (6, 6));
        assert_eq!(catalog.info(RoomType::Shop).unwrap().default_dimensions, (10, 7));
    }

    #[test]
    fn test_extra_doors_need_both_sides_to_agree() {
        let catalog = RoomCatalog::standard();
        for a in RoomType::ALL {
            for b in RoomType::ALL {
                assert_eq!(catalog.may_connect(a, b), catalog.may_connect(b, a));
                assert_eq!(
                    catalog.may_connect(a, b),
                    catalog.may_place(a, b) && catalog.may_place(b, a)
                );
            }
        }
        assert!(!catalog.may_connect(RoomType::Start, RoomType::Start));
        assert!(!catalog.may_connect(RoomType::Treasure, RoomType::Shop));
    }

    #[test]
    fn test_placement_only_asks_the_parent() {
        let catalog = RoomCatalog::standard();
        for other in RoomType::ALL {
            assert!(!catalog.may_place(RoomType::Boss, other));
            assert_eq!(catalog.may_place(RoomType::Shop, other), other == RoomType::Boss);
            assert_eq!(catalog.may_place(other, RoomType::Shop), other == RoomType::Fight);
        }
        assert!(catalog.may_place(RoomType::Fight, RoomType::Boss));
        assert!(catalog.may_place(RoomType::Shop, RoomType::Boss));
        assert!(!catalog.may_connect(RoomType::Fight, RoomType::Boss));
    }

    #[test]
    fn test_boss_arena_matches_its_picture() {
        let picture = [
            "##...............##",
            "##...............##",
            "...................",
            "...................",
            "....#o.......o#....",
            "....o.........o....",
            "........,.,........",
            ".......=====.......",
            "......,=====,......",
            ".......=====.......",
            "......,=====,......",
            ".......=====.......",
            "........,.,........",
            "....o.........o....",
            "....#o.......o#....",
            "...................",
            "...................",
            "##...............##",
            "##...............##",
        ];
        assert_eq!(boss_arena(), MapTemplate::parse_matrix(&picture).unwrap());

        let config = boss_centred();
        let template = config.maps[0].as_ref().unwrap();
        assert!(template.validate().is_ok());
    }

    #[test]
    fn test_choose_config_for_every_type_and_style() {
        let catalog = RoomCatalog::standard();
        let mut rng = StdRng::seed_from_u64(3);
        for room_type in RoomType::ALL {
            for style in [DungeonStyle::Hub, DungeonStyle::Ice, DungeonStyle::Volcano] {
                assert!(catalog.choose_config(room_type, style, &mut rng).is_ok());
            }
        }
    }

    #[test]
    fn test_catalog_json_round_trip() {
        let catalog = RoomCatalog::standard();
        let json = serde_json::to_string(&catalog).unwrap();
        let parsed = RoomCatalog::from_json_str(&json).unwrap();
        assert_eq!(parsed, catalog);
    }

    #[test]
    fn test_dungeon_config_validation() {
        assert!(DungeonConfig::base().validate().is_ok());
        assert!(DungeonConfig::big().validate().is_ok());

        let crowded = DungeonConfig {
            size: 1,
            rooms: BTreeMap::from([(RoomType::Fight, 9)]),
            connections: 0,
        };
        assert!(matches!(crowded.validate(), Err(BurrowError::InvalidConfig(_))));

        let with_start = DungeonConfig {
            size: 2,
            rooms: BTreeMap::from([(RoomType::Start, 1)]),
            connections: 0,
        };
        assert!(with_start.validate().is_err());
    }

    #[test]
    fn test_huge_dungeon_sizes_are_rejected() {
        let huge = DungeonConfig {
            size: 100_000,
            rooms: BTreeMap::from([(RoomType::Fight, u32::MAX), (RoomType::Boss, u32::MAX)]),
            connections: 0,
        };
        assert!(matches!(huge.validate(), Err(BurrowError::InvalidConfig(_))));
        assert_eq!(huge.total_rooms(), 2 * u64::from(u32::MAX));

        let widest = DungeonConfig {
            size: MAX_DUNGEON_SIZE,
            rooms: BTreeMap::from([(RoomType::Fight, 10)]),
            connections: 0,
        };
        assert!(widest.validate().is_ok());
        assert_eq!(widest.capacity(), 129 * 129 - 1);
    }

    #[test]
    fn test_oversized_default_dimensions_are_rejected() {
        let mut catalog = RoomCatalog::standard();
        if let Some(info) = catalog.rooms.get_mut(&RoomType::Start) {
            info.default_dimensions = (40_000, 40_000);
        }
        let json = serde_json::to_string(&catalog).unwrap();
        assert!(matches!(
            RoomCatalog::from_json_str(&json),
            Err(BurrowError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_style_parsing() {
        assert_eq!("Ice".parse::<DungeonStyle>().unwrap(), DungeonStyle::Ice);
        assert!("swamp".parse::<DungeonStyle>().is_err());
    }
}
