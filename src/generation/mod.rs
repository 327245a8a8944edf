//! # Generation Module
//!
//! Procedural generation of dungeons: the room graph, room interiors and
//! the validation that every room is traversable.
//!
//! The pipeline runs leaf-first. [`RegionGenerator`] fills a room interior,
//! [`BoundaryBuilder`] closes it with a border ring and door notches,
//! [`ReachabilityValidator`] checks the doors connect and [`RoomBuilder`]
//! retries that sequence until it succeeds. [`DungeonGraphBuilder`] decides
//! which rooms exist and how their doors line up, and [`DungeonGenerator`]
//! drives the whole thing.

pub mod boundary;
pub mod catalog;
pub mod dungeon;
pub mod options;
pub mod reachability;
pub mod region;
pub mod room;

pub use boundary::*;
pub use catalog::*;
pub use dungeon::*;
pub use options::*;
pub use reachability::*;
pub use region::*;
pub use room::*;

use crate::config::{
    DEFAULT_MAX_CONNECTION_ATTEMPTS, DEFAULT_MAX_LINE_ATTEMPTS, DEFAULT_MAX_PLACEMENT_ATTEMPTS,
    DEFAULT_MAX_ROOM_ATTEMPTS, DEFAULT_SEED,
};
use crate::{BurrowError, BurrowResult};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for procedural generation.
///
/// Holds the seed, the dungeon style and quotas, and the retry bounds of
/// every generate-and-test loop in the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Visual and layout style of the dungeon
    pub style: DungeonStyle,
    /// Grid size, room quotas and extra connections
    pub dungeon: DungeonConfig,
    /// Layouts tried per room before giving up
    pub max_room_attempts: u32,
    /// Consecutive rejected placements before giving up on the graph
    pub max_placement_attempts: u32,
    /// Failed picks tolerated while adding extra connections
    pub max_connection_attempts: u32,
    /// Offset draws per line option
    pub max_line_attempts: u32,
}

impl GenerationConfig {
    /// Creates a default generation configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow::{DungeonStyle, GenerationConfig};
    ///
    /// let config = GenerationConfig::new(12345);
    /// assert_eq!(config.seed, 12345);
    /// assert_eq!(config.style, DungeonStyle::Ice);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            style: DungeonStyle::Ice,
            dungeon: DungeonConfig::base(),
            max_room_attempts: DEFAULT_MAX_ROOM_ATTEMPTS,
            max_placement_attempts: DEFAULT_MAX_PLACEMENT_ATTEMPTS,
            max_connection_attempts: DEFAULT_MAX_CONNECTION_ATTEMPTS,
            max_line_attempts: DEFAULT_MAX_LINE_ATTEMPTS,
        }
    }

    /// Creates a configuration for testing with a small dungeon.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            dungeon: DungeonConfig {
                size: 3,
                rooms: [(RoomType::Fight, 5), (RoomType::Treasure, 1)]
                    .into_iter()
                    .collect(),
                connections: 2,
            },
            ..Self::new(seed)
        }
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> BurrowResult<Self> {
        let config: GenerationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> BurrowResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Rejects configurations that can never produce a dungeon.
    pub fn validate(&self) -> BurrowResult<()> {
        self.dungeon.validate()?;

        let bounds = [
            ("max_room_attempts", self.max_room_attempts),
            ("max_placement_attempts", self.max_placement_attempts),
            ("max_connection_attempts", self.max_connection_attempts),
            ("max_line_attempts", self.max_line_attempts),
        ];
        if let Some((name, _)) = bounds.iter().find(|(_, value)| *value == 0) {
            return Err(BurrowError::InvalidConfig(format!("{} must be positive", name)));
        }

        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

/// Trait for procedural generators.
///
/// Every top-level generator takes the shared configuration plus an
/// explicit random source, so callers decide how runs are seeded.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> BurrowResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> BurrowResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;
    use rand::SeedableRng;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }
}
