//! # Spawn Placement
//!
//! Chooses where the hero and the pursuer start and where pickups lie on a
//! freshly generated maze.

use crate::{reachable_from, BurrowError, BurrowResult, GridModel, PassableSet, Position};
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Starting cells for the hero and the pursuer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnPair {
    pub hero: Position,
    pub pursuer: Position,
}

/// Gets every passable cell off the border, in row-major order.
///
/// Border cells are excluded so nothing spawns on the entrance or the exit.
pub fn free_positions(grid: &GridModel, passable: &PassableSet) -> Vec<Position> {
    grid.positions()
        .filter(|pos| !grid.is_border(*pos) && grid.is_passable(*pos, passable))
        .collect()
}

/// Samples `count` distinct free cells uniformly at random.
///
/// # Errors
///
/// [`BurrowError::NotEnoughSpace`] if fewer than `count` free cells exist.
pub fn place_pickups<R: Rng + ?Sized>(
    grid: &GridModel,
    passable: &PassableSet,
    count: usize,
    rng: &mut R,
) -> BurrowResult<Vec<Position>> {
    let candidates = free_positions(grid, passable);
    if count > candidates.len() {
        return Err(BurrowError::NotEnoughSpace {
            requested: count,
            available: candidates.len(),
        });
    }

    Ok(index::sample(rng, candidates.len(), count)
        .into_iter()
        .map(|i| candidates[i])
        .collect())
}

/// Picks a hero cell and a pursuer cell exactly `separation` steps apart by
/// Manhattan distance, with the pursuer able to reach the hero.
///
/// Up to `max_attempts` random hero cells are tried. Returns `Ok(None)` if no
/// hero cell tried has a suitable partner.
pub fn choose_spawn_pair<R: Rng + ?Sized>(
    grid: &GridModel,
    passable: &PassableSet,
    separation: u32,
    max_attempts: u32,
    rng: &mut R,
) -> BurrowResult<Option<SpawnPair>> {
    let candidates = free_positions(grid, passable);
    if candidates.is_empty() {
        return Ok(None);
    }

    for attempt in 0..max_attempts {
        let hero = candidates[rng.gen_range(0..candidates.len())];
        let reachable = reachable_from(grid, passable, hero)?;

        let partners: Vec<Position> = candidates
            .iter()
            .copied()
            .filter(|pos| pos.manhattan_distance(hero) == separation && reachable.contains(pos))
            .collect();

        if !partners.is_empty() {
            let pursuer = partners[rng.gen_range(0..partners.len())];
            log::debug!(
                "Spawn pair hero {} pursuer {} after {} attempts",
                hero,
                pursuer,
                attempt + 1
            );
            return Ok(Some(SpawnPair { hero, pursuer }));
        }
    }

    log::warn!(
        "No spawn pair {} apart found in {} attempts",
        separation,
        max_attempts
    );
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_matrix, TileKind};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn room() -> GridModel {
        parse_matrix(
            "1 1 1 1 1 1 1\n\
             0 0 0 0 0 0 1\n\
             1 0 0 0 0 0 1\n\
             1 0 0 1 0 0 2\n\
             1 1 1 1 1 1 1\n",
        )
        .unwrap()
    }

    #[test]
    fn test_free_positions_skip_border_and_walls() {
        let grid = room();
        let free = free_positions(&grid, &PassableSet::walkable());

        assert_eq!(free.len(), 14);
        assert!(!free.contains(&Position::new(0, 1)));
        assert!(!free.contains(&Position::new(6, 3)));
        assert!(!free.contains(&Position::new(3, 3)));
    }

    #[test]
    fn test_place_pickups_distinct_and_free() {
        let grid = room();
        let passable = PassableSet::walkable();
        let mut rng = StdRng::seed_from_u64(10);

        let pickups = place_pickups(&grid, &passable, 6, &mut rng).unwrap();
        assert_eq!(pickups.len(), 6);

        let unique: HashSet<_> = pickups.iter().collect();
        assert_eq!(unique.len(), 6);
        for pos in &pickups {
            assert_eq!(grid.tile_at(*pos).unwrap(), TileKind::Floor);
            assert!(!grid.is_border(*pos));
        }
    }

    #[test]
    fn test_place_pickups_not_enough_space() {
        let grid = room();
        let mut rng = StdRng::seed_from_u64(10);
        assert!(matches!(
            place_pickups(&grid, &PassableSet::walkable(), 15, &mut rng),
            Err(BurrowError::NotEnoughSpace { requested: 15, available: 14 })
        ));
    }

    #[test]
    fn test_spawn_pair_separation() {
        let grid = room();
        let passable = PassableSet::walkable();
        let mut rng = StdRng::seed_from_u64(3);

        let pair = choose_spawn_pair(&grid, &passable, 5, 100, &mut rng)
            .unwrap()
            .expect("corners of the room are 5 apart");
        assert_eq!(pair.hero.manhattan_distance(pair.pursuer), 5);
        assert!(grid.is_passable(pair.hero, &passable));
        assert!(grid.is_passable(pair.pursuer, &passable));
    }

    #[test]
    fn test_spawn_pair_impossible_separation() {
        let grid = room();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            choose_spawn_pair(&grid, &PassableSet::walkable(), 40, 10, &mut rng).unwrap(),
            None
        );
    }

    #[test]
    fn test_spawn_pair_requires_reachability() {
        // Two floor cells 2 apart, split by a wall.
        let grid = parse_matrix(
            "1 1 1 1 1\n\
             1 0 1 0 1\n\
             1 1 1 1 1\n",
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            choose_spawn_pair(&grid, &PassableSet::walkable(), 2, 20, &mut rng).unwrap(),
            None
        );
    }
}
