//! The autotile table must cover every neighbourhood a tilemap can hold.

use burrow::{AutotileEncoder, BurrowError, Position, TileType, Tilemap};
use proptest::prelude::*;

/// Neighbour offsets of the origin, clockwise from north.
const RING: [(i32, i32); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

fn neighbourhood(center: TileType, other: TileType, different: u8) -> Tilemap {
    let mut map = Tilemap::new(1, 1, center);
    for (bit, &(dx, dy)) in RING.iter().enumerate() {
        if different & (1 << bit) != 0 {
            map.set(Position::new(dx, dy), other).unwrap();
        }
    }
    map
}

#[test]
fn test_isolated_tile_uses_isolated_sprite() {
    for tile in [TileType::Wall, TileType::Pit, TileType::SecondaryFloor, TileType::Pavement] {
        let map = neighbourhood(tile, TileType::Floor, 0xff);
        assert_eq!(AutotileEncoder::neighbor_mask(&map, Position::origin()), Some(255));
        assert_eq!(AutotileEncoder::sprite_index(&map, Position::origin()).unwrap(), Some(13));
    }
}

#[test]
fn test_surrounded_tile_uses_fill_sprite() {
    let map = neighbourhood(TileType::Pit, TileType::Floor, 0);
    assert_eq!(AutotileEncoder::neighbor_mask(&map, Position::origin()), Some(0));
    assert_eq!(AutotileEncoder::atlas_index(0), Some(31));
}

#[test]
fn test_valid_masks_are_exactly_the_table() {
    assert_eq!(AutotileEncoder::VALID_MASKS.len(), 47);
    let mut sorted = AutotileEncoder::VALID_MASKS.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), 47);
    for mask in AutotileEncoder::VALID_MASKS {
        assert!(AutotileEncoder::atlas_index(mask).is_some());
    }
}

#[test]
fn test_missing_mask_error_names_the_cell() {
    let error = BurrowError::MissingAutotileMask { mask: 1, x: 3, y: -2 };
    assert_eq!(error.to_string(), "No autotile entry for mask 1 at (3, -2)");
}

proptest! {
    #[test]
    fn prop_every_window_has_an_atlas_entry(different in any::<u8>(), center in 0usize..6) {
        let center = TileType::ALL[center];
        let map = neighbourhood(center, TileType::Floor, different);
        let index = AutotileEncoder::sprite_index(&map, Position::origin());
        prop_assert!(index.is_ok());
        prop_assert_eq!(index.unwrap().is_some(), center.is_connective());
    }

    #[test]
    fn prop_mask_is_always_listed(tiles in prop::collection::vec(0usize..6, 49)) {
        let mut map = Tilemap::blank(3, 3);
        let positions: Vec<Position> = map.positions().collect();
        for (pos, &tile) in positions.iter().zip(tiles.iter()) {
            map.set(*pos, TileType::ALL[tile]).unwrap();
        }
        for pos in positions {
            if let Some(mask) = AutotileEncoder::neighbor_mask(&map, pos) {
                prop_assert!(AutotileEncoder::VALID_MASKS.contains(&mask));
            }
        }
    }
}
