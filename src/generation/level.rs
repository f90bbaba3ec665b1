//! # Level Generation
//!
//! Builds a ready-to-play level on top of a generated maze: the exit starts
//! sealed, the hero and pursuer get spawn cells, and pickups are scattered over
//! the free floor.

use crate::generation::{choose_spawn_pair, place_pickups, utils, GeneratedMaze, MazeGenerator};
use crate::{
    BurrowError, BurrowResult, GenerationConfig, Generator, GridModel, Position, SpawnPair,
    TileKind,
};
use rand::rngs::StdRng;
use std::collections::HashSet;

/// Everything the game layer needs to start a level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelLayout {
    /// The maze, with its exit sealed
    pub grid: GridModel,
    /// Where the maze is entered
    pub entrance: Position,
    /// The exit cell, currently [`TileKind::SealedExit`]
    pub exit: Position,
    /// Hero and pursuer starting cells
    pub spawns: SpawnPair,
    /// Pickup cells, disjoint from the spawn cells
    pub pickups: Vec<Position>,
}

/// Generator for complete levels.
#[derive(Debug, Clone, Default)]
pub struct LevelGenerator {
    /// Generator used for the underlying maze
    pub maze_generator: MazeGenerator,
}

impl LevelGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Generator<LevelLayout> for LevelGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> BurrowResult<LevelLayout> {
        config.validate()?;
        let GeneratedMaze {
            mut grid,
            entrance,
            exit,
        } = self.maze_generator.generate(config, rng)?;

        grid.seal_exits();
        let passable = grid.rules().passable;

        let spawns = choose_spawn_pair(
            &grid,
            &passable,
            config.spawn_separation,
            config.max_spawn_attempts,
            rng,
        )?
        .ok_or_else(|| {
            BurrowError::GenerationFailed(format!(
                "no spawn cells {} apart after {} attempts",
                config.spawn_separation, config.max_spawn_attempts
            ))
        })?;

        // Pickups never share a cell with an agent.
        let mut occupied = grid.clone();
        occupied.set_tile(spawns.hero, TileKind::Wall)?;
        occupied.set_tile(spawns.pursuer, TileKind::Wall)?;
        let pickups = place_pickups(&occupied, &passable, config.pickup_count, rng)?;

        log::debug!(
            "Level ready: hero {} pursuer {} with {} pickups",
            spawns.hero,
            spawns.pursuer,
            pickups.len()
        );

        Ok(LevelLayout {
            grid,
            entrance,
            exit,
            spawns,
            pickups,
        })
    }

    fn validate(&self, level: &LevelLayout, config: &GenerationConfig) -> BurrowResult<()> {
        // Structural checks run against the unsealed maze.
        let mut grid = level.grid.clone();
        grid.unseal_exits();
        self.maze_generator.validate(
            &GeneratedMaze {
                grid,
                entrance: level.entrance,
                exit: level.exit,
            },
            config,
        )?;

        if level.spawns.hero.manhattan_distance(level.spawns.pursuer) != config.spawn_separation {
            return Err(BurrowError::GenerationFailed(
                "spawn cells are not at the configured separation".to_string(),
            ));
        }

        let distinct: HashSet<_> = level.pickups.iter().collect();
        if level.pickups.len() != config.pickup_count || distinct.len() != level.pickups.len() {
            return Err(BurrowError::GenerationFailed(format!(
                "expected {} distinct pickups, found {}",
                config.pickup_count,
                distinct.len()
            )));
        }
        if level
            .pickups
            .iter()
            .any(|pos| *pos == level.spawns.hero || *pos == level.spawns.pursuer)
        {
            return Err(BurrowError::GenerationFailed(
                "pickup placed on a spawn cell".to_string(),
            ));
        }

        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "LevelGenerator"
    }
}

/// Generates a level from `config`, seeding the random source from `config.seed`.
pub fn generate_level(config: &GenerationConfig) -> BurrowResult<LevelLayout> {
    let mut rng = utils::create_rng(config);
    LevelGenerator::new().generate(config, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_generation_with_small_level() {
        let config = GenerationConfig::for_testing(12345);
        let generator = LevelGenerator::new();
        let mut rng = utils::create_rng(&config);

        let level = generator.generate(&config, &mut rng).unwrap();
        assert!(generator.validate(&level, &config).is_ok());
        assert_eq!(generator.generator_type(), "LevelGenerator");
    }

    #[test]
    fn test_level_exit_starts_sealed() {
        let level = generate_level(&GenerationConfig::for_testing(7)).unwrap();
        assert_eq!(level.grid.tile_at(level.exit).unwrap(), TileKind::SealedExit);
        assert_eq!(level.grid.count(TileKind::Exit), 0);
        assert!(!level.grid.is_walkable(level.exit));
    }

    #[test]
    fn test_level_spawns_and_pickups_are_walkable() {
        let config = GenerationConfig::for_testing(31);
        let level = generate_level(&config).unwrap();

        assert!(level.grid.is_walkable(level.spawns.hero));
        assert!(level.grid.is_walkable(level.spawns.pursuer));
        assert_eq!(level.pickups.len(), config.pickup_count);
        for pickup in &level.pickups {
            assert!(level.grid.is_walkable(*pickup));
            assert_ne!(*pickup, level.spawns.hero);
            assert_ne!(*pickup, level.spawns.pursuer);
        }
    }

    #[test]
    fn test_level_generation_is_deterministic() {
        let config = GenerationConfig::new(2718);
        assert_eq!(generate_level(&config).unwrap(), generate_level(&config).unwrap());
    }

    #[test]
    fn test_level_generation_rejects_bad_config() {
        let config = GenerationConfig::for_testing(1).with_size(3, 3);
        assert!(matches!(
            generate_level(&config),
            Err(BurrowError::InvalidDimensions { .. })
        ));

        let mut config = GenerationConfig::for_testing(1);
        config.spawn_separation = 0;
        assert!(matches!(
            generate_level(&config),
            Err(BurrowError::InvalidConfig(_))
        ));
    }
}
