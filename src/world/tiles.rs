//! # Tile Catalog
//!
//! Static properties for every tile type: whether its sprite depends on
//! its neighbours, which tile types count as "the same surface" for
//! autotiling, its collision rectangle and its render layer.

use serde::{Deserialize, Serialize};

/// The kinds of tile a room tilemap can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TileType {
    /// Plain walkable ground
    Floor,
    /// Solid wall, also the default room border
    Wall,
    /// Impassable hole in the floor
    Pit,
    /// Walkable ground with its own autotiled sprite
    SecondaryFloor,
    /// Walkable paving that blends into walls
    Pavement,
    /// Filler outside the room outline; never walkable, never drawn
    Void,
}

/// Axis-aligned collision rectangle in tile units, relative to the
/// tile's lower-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Collider {
    /// A collider covering the whole tile.
    pub const FULL: Collider = Collider {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };
}

/// Draw layer a tile's sprite belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderLayer {
    /// Flat ground sprites drawn below everything else
    Ground,
    /// Tall sprites sorted by their y coordinate
    YOrdered,
}

/// Static properties of a tile type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileProperties {
    /// Whether the sprite is picked from an autotile atlas
    pub connective: bool,
    /// Tile types treated as the same surface when computing the bitmask
    pub connects: &'static [TileType],
    /// Collision rectangle, `None` for walkable tiles
    pub collider: Option<Collider>,
    /// Render layer tag
    pub layer: RenderLayer,
}

const PIT_COLLIDER: Collider = Collider {
    x: 2.0 / 16.0,
    y: 3.0 / 16.0,
    width: 11.0 / 16.0,
    height: 11.0 / 16.0,
};

const FLOOR: TileProperties = TileProperties {
    connective: false,
    connects: &[],
    collider: None,
    layer: RenderLayer::Ground,
};

const WALL: TileProperties = TileProperties {
    connective: true,
    connects: &[TileType::Wall, TileType::Void],
    collider: Some(Collider::FULL),
    layer: RenderLayer::YOrdered,
};

const PIT: TileProperties = TileProperties {
    connective: true,
    connects: &[TileType::Pit],
    collider: Some(PIT_COLLIDER),
    layer: RenderLayer::Ground,
};

const SECONDARY_FLOOR: TileProperties = TileProperties {
    connective: true,
    connects: &[TileType::SecondaryFloor],
    collider: None,
    layer: RenderLayer::Ground,
};

const PAVEMENT: TileProperties = TileProperties {
    connective: true,
    connects: &[TileType::Wall, TileType::Pavement],
    collider: None,
    layer: RenderLayer::Ground,
};

const VOID: TileProperties = TileProperties {
    connective: false,
    connects: &[],
    collider: Some(Collider::FULL),
    layer: RenderLayer::Ground,
};

impl TileType {
    /// Every tile type, in catalog order.
    pub const ALL: [TileType; 6] = [
        TileType::Floor,
        TileType::Wall,
        TileType::Pit,
        TileType::SecondaryFloor,
        TileType::Pavement,
        TileType::Void,
    ];

    /// Returns the static catalog entry for this tile type.
    pub fn properties(self) -> &'static TileProperties {
        match self {
            TileType::Floor => &FLOOR,
            TileType::Wall => &WALL,
            TileType::Pit => &PIT,
            TileType::SecondaryFloor => &SECONDARY_FLOOR,
            TileType::Pavement => &PAVEMENT,
            TileType::Void => &VOID,
        }
    }

    /// Whether this tile's sprite depends on its neighbours.
    pub fn is_connective(self) -> bool {
        self.properties().connective
    }

    /// Whether `other` belongs to this tile's connect set.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow::TileType;
    ///
    /// assert!(TileType::Pavement.connects_to(TileType::Wall));
    /// assert!(!TileType::Wall.connects_to(TileType::Pavement));
    /// ```
    pub fn connects_to(self, other: TileType) -> bool {
        self.properties().connects.contains(&other)
    }

    /// The collision rectangle, if this tile blocks movement.
    pub fn collider(self) -> Option<Collider> {
        self.properties().collider
    }

    /// Whether actors can walk over this tile.
    pub fn is_passable(self) -> bool {
        self.collider().is_none()
    }

    /// Render layer tag.
    pub fn layer(self) -> RenderLayer {
        self.properties().layer
    }

    /// Single-character representation used by text dumps and templates.
    pub fn glyph(self) -> char {
        match self {
            TileType::Floor => '.',
            TileType::Wall => '#',
            TileType::Pit => 'o',
            TileType::SecondaryFloor => ',',
            TileType::Pavement => '=',
            TileType::Void => ' ',
        }
    }

    /// Parses a glyph produced by [`TileType::glyph`].
    pub fn from_glyph(glyph: char) -> Option<TileType> {
        Self::ALL.into_iter().find(|tile| tile.glyph() == glyph)
    }
}
