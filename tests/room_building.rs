//! Room builder scenarios run through the public API.

use burrow::generation::utils::create_rng;
use burrow::{
    BlobOptions, BurrowResult, Direction, DoorInfo, DoorPosition, DungeonStyle, GenerationConfig,
    GenerationOption, LineOptions, MapTemplate, OpenDoors, Position, ReachabilityValidator,
    RoomBuilder, RoomCatalog, RoomConfig, RoomState, RoomType, TileType,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_start_room_boundary_scenario() -> BurrowResult<()> {
    let catalog = RoomCatalog::standard();
    let config = GenerationConfig::for_testing(12345);
    let mut builder = RoomBuilder::new(&catalog, &config);

    let room = builder.build(
        RoomType::Start,
        OpenDoors::closed().open(Direction::North),
        &mut create_rng(&config),
    )?;

    assert_eq!(room.tilemap.get(Position::new(0, 9)), Some(TileType::Floor));
    assert_eq!(room.tilemap.get(Position::new(2, 9)), Some(TileType::Wall));
    assert_eq!(room.tilemap.get(Position::new(-7, 0)), Some(TileType::Wall));
    // Closed doors leave the ring intact
    assert_eq!(room.tilemap.get(Position::new(0, -7)), Some(TileType::Wall));
    assert_eq!(room.tilemap.get(Position::new(7, 0)), Some(TileType::Wall));
    assert_eq!(builder.state(), RoomState::Done);
    Ok(())
}

#[test]
fn test_every_standard_room_type_builds() -> BurrowResult<()> {
    let catalog = RoomCatalog::standard();
    let config = GenerationConfig::for_testing(99);
    let validator = ReachabilityValidator::new();

    for style in [DungeonStyle::Hub, DungeonStyle::Ice, DungeonStyle::Volcano] {
        let mut builder = RoomBuilder::new(&catalog, &config).with_style(style);
        let mut rng = StdRng::seed_from_u64(style as u64);
        for room_type in RoomType::ALL {
            let room = builder.build(room_type, OpenDoors::all(), &mut rng)?;
            assert_eq!(room.room_type, room_type);
            assert_eq!(room.door_bits(), 15);
            assert!(validator.validate_room(&room.tilemap, room.width, room.height, &room.doors));
        }
    }
    Ok(())
}

#[test]
fn test_walls_and_pits_keep_doors_connected() -> BurrowResult<()> {
    let catalog = RoomCatalog::standard();
    let config = GenerationConfig::for_testing(5);
    let mut builder = RoomBuilder::new(&catalog, &config);
    let crowded = RoomConfig {
        options: vec![
            GenerationOption::Blob(BlobOptions {
                target_tile: TileType::Pit,
                overrides: vec![TileType::Floor],
                seed_amount: 4,
                spread_amount: 12,
                spread_additional_chance: 0.5,
                spread_compound: true,
            }),
            GenerationOption::Line(LineOptions {
                target_tile: TileType::Wall,
                overrides: vec![TileType::Floor, TileType::Pit],
                seed_amount: 3,
                hole_amount: 2,
                hole_size_range: (1, 2),
            }),
        ],
        maps: vec![None],
    };

    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        let room =
            builder.build_with_config(RoomType::Fight, &crowded, OpenDoors::all(), &mut rng)?;
        assert!(ReachabilityValidator::new().validate_room(
            &room.tilemap,
            room.width,
            room.height,
            &room.doors
        ));
    }
    Ok(())
}

#[test]
fn test_template_door_table_is_honoured() -> BurrowResult<()> {
    let catalog = RoomCatalog::standard();
    let config = GenerationConfig::for_testing(3);
    let mut builder = RoomBuilder::new(&catalog, &config);
    let template = MapTemplate::new(6, 4, TileType::Pit).with_door(
        Direction::South,
        DoorInfo {
            position: DoorPosition::Fixed(-3),
            floor: TileType::SecondaryFloor,
        },
    );
    let room_config = RoomConfig {
        options: Vec::new(),
        maps: vec![Some(template)],
    };

    let room = builder.build_with_config(
        RoomType::Treasure,
        &room_config,
        OpenDoors::closed().open(Direction::South).open(Direction::North),
        &mut create_rng(&config),
    )?;

    assert_eq!((room.width, room.height), (6, 4));
    for depth in 5..=7 {
        assert_eq!(
            room.tilemap.get(Position::new(-3, -depth)),
            Some(TileType::SecondaryFloor)
        );
        assert_eq!(room.tilemap.get(Position::new(-5, -depth)), Some(TileType::Pit));
        assert_eq!(room.tilemap.get(Position::new(-1, -depth)), Some(TileType::Pit));
    }
    // The north door has no template entry beyond the default
    assert_eq!(room.tilemap.get(Position::new(0, 6)), Some(TileType::Floor));
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_seeded_rooms_are_reproducible(seed in any::<u64>(), bits in 0u8..16) {
        let catalog = RoomCatalog::standard();
        let config = GenerationConfig::for_testing(seed);
        let open = Direction::ALL
            .into_iter()
            .filter(|d| bits & d.bit() != 0)
            .fold(OpenDoors::closed(), |doors, d| doors.open(d));

        let build = || {
            let mut rng = StdRng::seed_from_u64(seed);
            RoomBuilder::new(&catalog, &config).build(RoomType::Fight, open, &mut rng)
        };
        let first = build().unwrap();
        let second = build().unwrap();
        prop_assert_eq!(first.door_bits(), bits);
        prop_assert_eq!(first, second);
    }
}
