//! # Autotile Encoder
//!
//! Picks the sprite variant of a connective tile from its 8 neighbours.
//!
//! Each neighbour that does not belong to the tile's connect set sets bits
//! in an 8-bit mask. Bits run clockwise from the north-west corner:
//!
//! ```text
//! 128   1   2
//!  64   .   4
//!  32  16   8
//! ```
//!
//! A differing cardinal neighbour sets its own bit plus both corners next
//! to it; a differing diagonal neighbour sets only its corner. Only 47 of
//! the 256 possible masks can be produced this way and each maps to one
//! index of the sprite atlas.

use crate::{BurrowError, BurrowResult, Direction, Position, Tilemap};
use log::error;

/// Mask bits set by a differing cardinal neighbour, indexed by direction.
const CARDINAL_BITS: [u8; 4] = [128 | 1 | 2, 2 | 4 | 8, 8 | 16 | 32, 32 | 64 | 128];

/// Diagonal offsets and the corner bit each one sets.
const DIAGONAL_BITS: [((i32, i32), u8); 4] =
    [((1, 1), 2), ((1, -1), 8), ((-1, -1), 32), ((-1, 1), 128)];

/// Mask to atlas index.
const ATLAS: [(u8, u8); 47] = [
    (0, 31),
    (2, 27),
    (8, 47),
    (10, 37),
    (14, 32),
    (32, 49),
    (34, 2),
    (40, 48),
    (42, 18),
    (46, 15),
    (56, 21),
    (58, 6),
    (62, 22),
    (128, 29),
    (130, 28),
    (131, 41),
    (136, 3),
    (138, 8),
    (139, 14),
    (142, 7),
    (143, 42),
    (160, 39),
    (162, 9),
    (163, 17),
    (168, 19),
    (170, 38),
    (171, 45),
    (174, 36),
    (175, 46),
    (184, 5),
    (186, 25),
    (187, 11),
    (190, 26),
    (191, 12),
    (224, 30),
    (226, 4),
    (227, 40),
    (232, 16),
    (234, 34),
    (235, 44),
    (238, 33),
    (239, 43),
    (248, 20),
    (250, 24),
    (251, 10),
    (254, 23),
    (255, 13),
];

/// Neighbour-bitmask encoder for connective tiles.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutotileEncoder;

impl AutotileEncoder {
    /// Every mask a neighbourhood can produce, ascending.
    pub const VALID_MASKS: [u8; 47] = {
        let mut masks = [0u8; 47];
        let mut i = 0;
        while i < ATLAS.len() {
            masks[i] = ATLAS[i].0;
            i += 1;
        }
        masks
    };

    /// Computes the neighbour mask of the tile at `pos`.
    ///
    /// Returns `None` for positions outside the tilemap and for tiles that
    /// are not connective. Neighbours outside the tilemap count as edges.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow::{AutotileEncoder, Position, Tilemap, TileType};
    ///
    /// let mut map = Tilemap::blank(1, 1);
    /// map.set(Position::origin(), TileType::Pit).unwrap();
    /// assert_eq!(AutotileEncoder::neighbor_mask(&map, Position::origin()), Some(255));
    ///
    /// let walls = Tilemap::new(1, 1, TileType::Wall);
    /// assert_eq!(AutotileEncoder::neighbor_mask(&walls, Position::origin()), Some(0));
    /// ```
    pub fn neighbor_mask(tilemap: &Tilemap, pos: Position) -> Option<u8> {
        let tile = tilemap.get(pos)?;
        if !tile.is_connective() {
            return None;
        }

        let differs = |neighbor: Position| {
            tilemap
                .get(neighbor)
                .map(|other| !tile.connects_to(other))
                .unwrap_or(true)
        };

        let mut mask = 0u8;
        for direction in Direction::ALL {
            if differs(pos.step(direction)) {
                mask |= CARDINAL_BITS[direction.index()];
            }
        }
        for ((dx, dy), bit) in DIAGONAL_BITS {
            if differs(Position::new(pos.x + dx, pos.y + dy)) {
                mask |= bit;
            }
        }
        Some(mask)
    }

    /// Looks up the atlas index of a mask.
    pub fn atlas_index(mask: u8) -> Option<u8> {
        ATLAS
            .iter()
            .find(|(entry, _)| *entry == mask)
            .map(|&(_, index)| index)
    }

    /// Atlas index for the tile at `pos`, or `None` when the tile is not
    /// connective.
    ///
    /// A mask missing from the atlas means an impossible neighbourhood was
    /// produced, which is reported as [`BurrowError::MissingAutotileMask`].
    pub fn sprite_index(tilemap: &Tilemap, pos: Position) -> BurrowResult<Option<u8>> {
        let mask = match Self::neighbor_mask(tilemap, pos) {
            Some(mask) => mask,
            None => return Ok(None),
        };
        match Self::atlas_index(mask) {
            Some(index) => Ok(Some(index)),
            None => {
                error!("Autotile mask {} at {:?} has no atlas entry", mask, pos);
                Err(BurrowError::MissingAutotileMask {
                    mask,
                    x: pos.x,
                    y: pos.y,
                })
            }
        }
    }
}
