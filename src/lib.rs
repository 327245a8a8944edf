//! # Burrow
//!
//! Procedural dungeon generation for tile-based games.
//!
//! ## Architecture Overview
//!
//! A dungeon is produced in two stages. First a room graph is laid out on
//! an integer grid, then every room of that graph is built independently
//! into a tilemap:
//!
//! - **World**: positions, directions, the static tile catalog and the
//!   [`Tilemap`] grid itself
//! - **Generation**: room catalog and configuration, region fillers, the
//!   boundary builder, reachability validation and the room and dungeon
//!   builders
//! - **Rendering**: the autotile encoder that maps a tile's neighbourhood
//!   to a sprite-atlas index
//!
//! Every random decision draws from an explicit [`rand::rngs::StdRng`]
//! handle, so a dungeon is fully reproducible from its seed.
//!
//! ```
//! use burrow::{DungeonGenerator, GenerationConfig, Generator};
//!
//! let config = GenerationConfig::for_testing(7);
//! let mut rng = burrow::generation::utils::create_rng(&config);
//! let dungeon = DungeonGenerator::new().generate(&config, &mut rng).unwrap();
//! assert!(dungeon.graph.is_connected());
//! ```

pub mod generation;
pub mod rendering;
pub mod utils;
pub mod world;

pub use generation::*;
pub use rendering::*;
pub use utils::*;
pub use world::*;

/// Core error type for dungeon generation.
#[derive(thiserror::Error, Debug)]
pub enum BurrowError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Configuration can never produce a dungeon
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Map template is malformed
    #[error("Invalid map template: {0}")]
    InvalidTemplate(String),

    /// Tile coordinate outside the tilemap's extent
    #[error("Position ({x}, {y}) is outside the tilemap")]
    OutOfBounds { x: i32, y: i32 },

    /// The room grid ran out of legal spots for a room type
    #[error("Could not place {room_type:?} ({remaining} still owed) after {attempts} attempts")]
    PlacementExhausted {
        room_type: RoomType,
        remaining: u32,
        attempts: u32,
    },

    /// Every generated layout left some door unreachable
    #[error("{room_type:?} room had unreachable doors after {attempts} attempts")]
    RoomUnreachable { room_type: RoomType, attempts: u32 },

    /// A tile neighbourhood produced a mask the atlas does not cover
    #[error("No autotile entry for mask {mask} at ({x}, {y})")]
    MissingAutotileMask { mask: u8, x: i32, y: i32 },

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the Burrow codebase.
pub type BurrowResult<T> = Result<T, BurrowError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generation configuration constants.
pub mod config {
    /// Default seed used when none is given
    pub const DEFAULT_SEED: u64 = 42;

    /// Layouts tried per room before giving up
    pub const DEFAULT_MAX_ROOM_ATTEMPTS: u32 = 200;

    /// Consecutive rejected room placements before giving up
    pub const DEFAULT_MAX_PLACEMENT_ATTEMPTS: u32 = 10_000;

    /// Failed picks tolerated while adding extra connections
    pub const DEFAULT_MAX_CONNECTION_ATTEMPTS: u32 = 1_000;

    /// Offset draws per line option
    pub const DEFAULT_MAX_LINE_ATTEMPTS: u32 = 100;

    /// Largest accepted dungeon grid half-size
    pub const MAX_DUNGEON_SIZE: i32 = 64;

    /// Largest accepted room half-extent, for templates and catalog defaults
    pub const MAX_ROOM_EXTENT: i32 = 128;
}
