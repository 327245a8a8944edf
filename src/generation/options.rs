//! # Room Generation Options
//!
//! Declarative descriptions of how a room's interior is filled: the ordered
//! list of region fillers to run and the optional fixed templates a room can
//! start from.

use crate::config::MAX_ROOM_EXTENT;
use crate::{BurrowError, BurrowResult, Direction, TileType};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One region-filling pass applied to a room's interior.
///
/// Options run in list order; later options may overwrite earlier ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationOption {
    /// Seed cells and randomly grow them outward
    Blob(BlobOptions),
    /// Stamp full rows or columns, then carve holes through them
    Line(LineOptions),
}

/// Parameters of the blob filler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlobOptions {
    pub target_tile: TileType,
    pub overrides: Vec<TileType>,
    /// Number of blobs to seed
    pub seed_amount: u32,
    /// Guaranteed growth steps per blob
    pub spread_amount: u32,
    /// Probability (0.0 to 1.0) of one more growth step once the
    /// guaranteed ones are spent
    pub spread_additional_chance: f64,
    /// Allow the same frontier cell to be queued more than once, which
    /// favours compact blobs
    pub spread_compound: bool,
}

/// Parameters of the line filler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineOptions {
    pub target_tile: TileType,
    pub overrides: Vec<TileType>,
    /// Number of lines to place
    pub seed_amount: u32,
    /// Holes carved through each line
    pub hole_amount: u32,
    /// Inclusive bounds on the extra cells each hole reopens
    pub hole_size_range: (u32, u32),
}

/// Where a door sits along its edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorPosition {
    /// Offset from the edge's center
    Fixed(i32),
    /// Inclusive range, resolved to a random offset once per room
    Range(i32, i32),
}

impl DoorPosition {
    /// Resolves the position to a concrete offset.
    pub fn resolve(self, rng: &mut StdRng) -> i32 {
        match self {
            DoorPosition::Fixed(offset) => offset,
            DoorPosition::Range(low, high) => rng.gen_range(low.min(high)..=low.max(high)),
        }
    }
}

impl Default for DoorPosition {
    fn default() -> Self {
        DoorPosition::Fixed(0)
    }
}

/// One entry of a template's door table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorInfo {
    pub position: DoorPosition,
    /// Tile used for the door opening
    pub floor: TileType,
}

impl Default for DoorInfo {
    fn default() -> Self {
        Self {
            position: DoorPosition::default(),
            floor: TileType::Floor,
        }
    }
}

/// A fixed room layout a config may start from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapTemplate {
    /// Half-width of the room interior
    pub width: i32,
    /// Half-height of the room interior
    pub height: i32,
    /// Tile used for the border ring and door flanks
    pub border: TileType,
    /// Door table indexed by direction (North, East, South, West)
    pub doors: [DoorInfo; 4],
    /// Literal interior; row 0 is the top row (`y = height`)
    pub matrix: Option<Vec<Vec<TileType>>>,
}

impl MapTemplate {
    /// Creates a template with centered plain doors and no literal matrix.
    pub fn new(width: i32, height: i32, border: TileType) -> Self {
        Self {
            width,
            height,
            border,
            doors: [DoorInfo::default(); 4],
            matrix: None,
        }
    }

    /// Sets the door table entry for one direction.
    pub fn with_door(mut self, direction: Direction, door: DoorInfo) -> Self {
        self.doors[direction.index()] = door;
        self
    }

    /// Attaches a literal matrix after checking its dimensions.
    pub fn with_matrix(mut self, matrix: Vec<Vec<TileType>>) -> BurrowResult<Self> {
        self.matrix = Some(matrix);
        self.validate()?;
        Ok(self)
    }

    /// Parses glyph rows (see [`TileType::glyph`]) into a tile matrix.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow::{MapTemplate, TileType};
    ///
    /// let matrix = MapTemplate::parse_matrix(&["#.#", "...", "#o#"]).unwrap();
    /// assert_eq!(matrix[2][1], TileType::Pit);
    /// ```
    pub fn parse_matrix(rows: &[&str]) -> BurrowResult<Vec<Vec<TileType>>> {
        rows.iter()
            .enumerate()
            .map(|(row, line)| {
                line.chars()
                    .map(|glyph| {
                        TileType::from_glyph(glyph).ok_or_else(|| {
                            BurrowError::InvalidTemplate(format!(
                                "unknown glyph {:?} in row {}",
                                glyph, row
                            ))
                        })
                    })
                    .collect()
            })
            .collect()
    }

    /// Checks that the template is usable.
    pub fn validate(&self) -> BurrowResult<()> {
        let extents = 1..=MAX_ROOM_EXTENT;
        if !extents.contains(&self.width) || !extents.contains(&self.height) {
            return Err(BurrowError::InvalidTemplate(format!(
                "dimensions {}x{} must lie in 1..={}",
                self.width, self.height, MAX_ROOM_EXTENT
            )));
        }

        if let Some(matrix) = &self.matrix {
            let rows = (2 * self.height + 1) as usize;
            let columns = (2 * self.width + 1) as usize;
            if matrix.len() != rows {
                return Err(BurrowError::InvalidTemplate(format!(
                    "expected {} rows, found {}",
                    rows,
                    matrix.len()
                )));
            }
            let ragged = matrix
                .iter()
                .enumerate()
                .find(|(_, row)| row.len() != columns);
            if let Some((index, row)) = ragged {
                return Err(BurrowError::InvalidTemplate(format!(
                    "row {} has {} cells, expected {}",
                    index,
                    row.len(),
                    columns
                )));
            }
        }

        for (direction, door) in Direction::ALL.iter().zip(self.doors.iter()) {
            let limit = if direction.is_horizontal() {
                self.height
            } else {
                self.width
            };
            let (low, high) = match door.position {
                DoorPosition::Fixed(offset) => (offset, offset),
                DoorPosition::Range(low, high) => (low.min(high), low.max(high)),
            };
            if low < -(limit - 1) || high > limit - 1 {
                return Err(BurrowError::InvalidTemplate(format!(
                    "{:?} door position {:?} leaves the edge",
                    direction, door.position
                )));
            }
        }

        Ok(())
    }
}

/// A way of generating a room: the filler passes plus the templates it
/// may start from. `None` in `maps` means "no template".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomConfig {
    pub options: Vec<GenerationOption>,
    pub maps: Vec<Option<MapTemplate>>,
}

impl RoomConfig {
    /// A config with no filler passes and no template.
    pub fn empty() -> Self {
        Self {
            options: Vec::new(),
            maps: vec![None],
        }
    }

    /// Picks one of the config's maps uniformly.
    pub fn choose_map(&self, rng: &mut StdRng) -> Option<MapTemplate> {
        if self.maps.is_empty() {
            return None;
        }
        self.maps[rng.gen_range(0..self.maps.len())].clone()
    }
}
