//! # Generation Module
//!
//! Procedural content generation for mazes, spawn points, and pickups.
//!
//! This module provides the foundation for creating playable levels. The maze
//! generator carves a spanning-tree maze with a single exit; the level generator
//! builds on it to seal the exit and place the hero, the pursuer, and pickups.
//! All randomness comes from an explicit random source so that a seed fully
//! determines the result.

pub mod level;
pub mod maze;
pub mod spawns;

pub use level::*;
pub use maze::*;
pub use spawns::*;

use crate::{config, BurrowError, BurrowResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Configuration for procedural generation.
///
/// Controls the maze size, how many extra openings are punched into it, and how
/// agents and pickups are placed on the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Maze width in tiles
    pub width: u32,
    /// Maze height in tiles
    pub height: u32,
    /// One extra opening is sampled per this many cells
    pub sparsity_divisor: u32,
    /// Number of pickups placed on the level
    pub pickup_count: usize,
    /// Manhattan distance between hero and pursuer spawn cells
    pub spawn_separation: u32,
    /// Hero cells tried before spawn selection gives up
    pub max_spawn_attempts: u32,
}

impl GenerationConfig {
    /// Creates a configuration with the default game settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(42);
    /// assert_eq!(config.width, 25);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            width: config::DEFAULT_MAZE_WIDTH,
            height: config::DEFAULT_MAZE_HEIGHT,
            sparsity_divisor: config::SPARSITY_DIVISOR,
            pickup_count: config::DEFAULT_PICKUP_COUNT,
            spawn_separation: config::DEFAULT_SPAWN_SEPARATION,
            max_spawn_attempts: config::MAX_SPAWN_ATTEMPTS,
        }
    }

    /// Creates a configuration for testing with small levels.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            seed,
            width: 11,
            height: 11,
            sparsity_divisor: config::SPARSITY_DIVISOR,
            pickup_count: 3,
            spawn_separation: 6,
            max_spawn_attempts: 50,
        }
    }

    /// Returns a copy with a different maze size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Checks the settings a maze depends on: its size and sparsity.
    pub fn validate_maze_settings(&self) -> BurrowResult<()> {
        if self.width < config::MIN_MAZE_EXTENT || self.height < config::MIN_MAZE_EXTENT {
            return Err(BurrowError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.sparsity_divisor == 0 {
            return Err(BurrowError::InvalidConfig(
                "sparsity_divisor must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Checks that the settings can produce a level.
    pub fn validate(&self) -> BurrowResult<()> {
        self.validate_maze_settings()?;
        if self.spawn_separation == 0 {
            return Err(BurrowError::InvalidConfig(
                "spawn_separation must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Saves the configuration to a JSON string.
    pub fn save_to_json(&self) -> BurrowResult<String> {
        serde_json::to_string_pretty(self).map_err(BurrowError::from)
    }

    /// Loads a configuration from a JSON string.
    pub fn load_from_json(json: &str) -> BurrowResult<Self> {
        serde_json::from_str(json).map_err(BurrowError::from)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Trait for procedural generators.
///
/// All generation systems in Burrow implement this trait, giving a uniform
/// entry point for seeded generation and post-generation checks.
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
    use crate::{reachable_from, GridModel, PassableSet, Position, TileKind};

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }

    /// Validates the structural guarantees of a generated maze.
    ///
    /// The border may only hold walls and exits (the entrance excepted), there
    /// must be exactly one exit, and the exit must be reachable from the
    /// entrance through floor and exit cells.
    pub fn validate_maze(grid: &GridModel, entrance: Position) -> BurrowResult<()> {
        for pos in grid.positions().filter(|pos| grid.is_border(*pos)) {
            if pos == entrance {
                continue;
            }
            let tile = grid.tile_at(pos)?;
            if !matches!(tile, TileKind::Wall | TileKind::Exit) {
                return Err(BurrowError::GenerationFailed(format!(
                    "border cell {} is {:?}",
                    pos, tile
                )));
            }
        }

        let exits = grid.positions_of(TileKind::Exit);
        let exit = match exits.as_slice() {
            [exit] => *exit,
            _ => {
                return Err(BurrowError::GenerationFailed(format!(
                    "expected one exit, found {}",
                    exits.len()
                )))
            }
        };

        let corridor = PassableSet::new(&[TileKind::Floor, TileKind::Exit]);
        if !grid.is_passable(entrance, &corridor) {
            return Err(BurrowError::GenerationFailed(format!(
                "entrance {} is not open",
                entrance
            )));
        }
        if !reachable_from(grid, &corridor, entrance)?.contains(&exit) {
            return Err(BurrowError::GenerationFailed(format!(
                "exit {} is not reachable from entrance {}",
                exit, entrance
            )));
        }

        Ok(())
    }
}
