//! # Pursuit Pathfinding
//!
//! Breadth-first search over the passable cells of a grid, used to move a
//! chasing agent one cell per tick toward its target.
//!
//! Nothing here caches between calls. Every query runs a full search against
//! the grid as it is right now, so tiles and targets may change freely between
//! ticks.

use crate::{BurrowResult, GridModel, PassableSet, Position};
use ::pathfinding::prelude::bfs_reach;
use std::collections::{HashSet, VecDeque};

/// Distances and discovery predecessors from one origin cell.
///
/// Neighbours are explored East, South, West, North, so among equally short
/// paths the one found first in that order is the one recorded.
#[derive(Debug, Clone)]
pub struct DistanceField {
    origin: Position,
    width: u32,
    distances: Vec<u32>,
    predecessors: Vec<Option<Position>>,
    unreachable: u32,
}

impl DistanceField {
    /// Runs a breadth-first search from `origin` until the queue is empty.
    ///
    /// The origin itself does not need to be passable.
    ///
    /// # Errors
    ///
    /// [`crate::BurrowError::OutOfBounds`] if `origin` is off the grid.
    pub fn compute(
        grid: &GridModel,
        passable: &PassableSet,
        origin: Position,
    ) -> BurrowResult<Self> {
        grid.tile_at(origin)?;

        let cell_count = grid.width() as usize * grid.height() as usize;
        // No path visits more than width*height cells.
        let unreachable = grid.width().saturating_mul(grid.height());

        let mut field = Self {
            origin,
            width: grid.width(),
            distances: vec![unreachable; cell_count],
            predecessors: vec![None; cell_count],
            unreachable,
        };

        let origin_slot = field.slot(origin);
        field.distances[origin_slot] = 0;

        let mut queue = VecDeque::new();
        queue.push_back(origin);

        while let Some(current) = queue.pop_front() {
            let next_distance = field.distances[field.slot(current)] + 1;

            for neighbor in grid.neighbors4(current) {
                if !grid.is_passable(neighbor, passable) {
                    continue;
                }

                let slot = field.slot(neighbor);
                if field.distances[slot] != unreachable {
                    continue;
                }

                field.distances[slot] = next_distance;
                field.predecessors[slot] = Some(current);
                queue.push_back(neighbor);
            }
        }

        Ok(field)
    }

    // Callers guarantee `pos` is on the grid.
    fn slot(&self, pos: Position) -> usize {
        pos.y as usize * self.width as usize + pos.x as usize
    }

    fn checked_slot(&self, pos: Position) -> Option<usize> {
        let height = self.distances.len() / self.width as usize;
        if pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as usize) < height {
            Some(self.slot(pos))
        } else {
            None
        }
    }

    /// The cell the search started from.
    pub fn origin(&self) -> Position {
        self.origin
    }

    /// Gets the number of steps from the origin to `target`.
    ///
    /// Returns None when `target` is unreachable or off the grid.
    pub fn distance_to(&self, target: Position) -> Option<u32> {
        self.checked_slot(target)
            .map(|slot| self.distances[slot])
            .filter(|distance| *distance != self.unreachable)
    }

    pub fn is_reachable(&self, target: Position) -> bool {
        self.distance_to(target).is_some()
    }

    /// Reconstructs the recorded shortest path, origin and target included.
    pub fn path_to(&self, target: Position) -> Option<Vec<Position>> {
        self.distance_to(target)?;

        let mut path = vec![target];
        let mut current = target;
        while let Some(previous) = self.predecessors[self.slot(current)] {
            path.push(previous);
            current = previous;
        }
        path.reverse();
        Some(path)
    }

    /// Gets the cell right after the origin on the recorded path to `target`.
    ///
    /// Returns None when `target` is the origin or unreachable.
    pub fn first_step_toward(&self, target: Position) -> Option<Position> {
        self.distance_to(target)?;

        let mut current = target;
        while let Some(previous) = self.predecessors[self.slot(current)] {
            if previous == self.origin {
                return Some(current);
            }
            current = previous;
        }
        None
    }
}

/// Computes the next cell for an agent at `start` chasing `target`.
///
/// Returns `start` unchanged when the agent is already on the target or when
/// the target cannot be reached through `passable` cells. Otherwise returns the
/// first step of a shortest path.
///
/// # Errors
///
/// [`crate::BurrowError::OutOfBounds`] if `start` or `target` is off the grid.
///
/// # Examples
///
/// ```
/// use burrow::{next_step, parse_matrix, PassableSet, Position};
///
/// let grid = parse_matrix("1 1 1 1 1\n1 0 0 0 1\n1 1 1 1 1\n").unwrap();
/// let walkable = PassableSet::walkable();
/// let step = next_step(&grid, &walkable, Position::new(1, 1), Position::new(3, 1)).unwrap();
/// assert_eq!(step, Position::new(2, 1));
/// ```
pub fn next_step(
    grid: &GridModel,
    passable: &PassableSet,
    start: Position,
    target: Position,
) -> BurrowResult<Position> {
    grid.tile_at(start)?;
    grid.tile_at(target)?;

    if start == target {
        return Ok(start);
    }

    let field = DistanceField::compute(grid, passable, start)?;
    let step = field.first_step_toward(target).unwrap_or(start);
    log::trace!("Pursuit step {} -> {} toward {}", start, step, target);
    Ok(step)
}

/// Gets every cell reachable from `start` through `passable` cells, `start` included.
pub fn reachable_from(
    grid: &GridModel,
    passable: &PassableSet,
    start: Position,
) -> BurrowResult<HashSet<Position>> {
    grid.tile_at(start)?;

    let reachable = bfs_reach(start, |cell: &Position| {
        grid.neighbors4(*cell)
            .into_iter()
            .filter(|neighbor| grid.is_passable(*neighbor, passable))
            .collect::<Vec<_>>()
    })
    .collect();

    Ok(reachable)
}

/// Outcome of one pursuit tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PursuitStep {
    /// The agent already stands on the target
    Arrived,
    /// The target cannot be reached; the agent stays put
    Stalled,
    /// The agent should move to this cell
    Advance(Position),
}

impl PursuitStep {
    /// Gets where an agent currently at `start` ends up after this step.
    pub fn destination(self, start: Position) -> Position {
        match self {
            PursuitStep::Advance(next) => next,
            PursuitStep::Arrived | PursuitStep::Stalled => start,
        }
    }
}

/// Pursuit queries bound to one passable set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathFinder {
    passable: PassableSet,
}

impl PathFinder {
    pub fn new(passable: PassableSet) -> Self {
        Self { passable }
    }

    /// Creates a path finder that walks the grid's own passable kinds.
    pub fn for_grid(grid: &GridModel) -> Self {
        Self::new(grid.rules().passable)
    }

    pub fn passable(&self) -> &PassableSet {
        &self.passable
    }

    /// See [`next_step`].
    pub fn next_step(
        &self,
        grid: &GridModel,
        start: Position,
        target: Position,
    ) -> BurrowResult<Position> {
        next_step(grid, &self.passable, start, target)
    }

    /// Like [`PathFinder::next_step`], but tells "already there" apart from "stuck".
    pub fn step(
        &self,
        grid: &GridModel,
        start: Position,
        target: Position,
    ) -> BurrowResult<PursuitStep> {
        grid.tile_at(target)?;
        if start == target {
            grid.tile_at(start)?;
            return Ok(PursuitStep::Arrived);
        }

        let field = DistanceField::compute(grid, &self.passable, start)?;
        Ok(match field.first_step_toward(target) {
            Some(next) => PursuitStep::Advance(next),
            None => PursuitStep::Stalled,
        })
    }

    /// Gets the shortest-path length from `start` to `target`, if any.
    pub fn distance(
        &self,
        grid: &GridModel,
        start: Position,
        target: Position,
    ) -> BurrowResult<Option<u32>> {
        grid.tile_at(target)?;
        Ok(DistanceField::compute(grid, &self.passable, start)?.distance_to(target))
    }

    pub fn is_reachable(
        &self,
        grid: &GridModel,
        start: Position,
        target: Position,
    ) -> BurrowResult<bool> {
        Ok(self.distance(grid, start, target)?.is_some())
    }

    /// Gets a full shortest path from `start` to `target`, both included.
    pub fn shortest_path(
        &self,
        grid: &GridModel,
        start: Position,
        target: Position,
    ) -> BurrowResult<Option<Vec<Position>>> {
        grid.tile_at(target)?;
        Ok(DistanceField::compute(grid, &self.passable, start)?.path_to(target))
    }

    /// See [`reachable_from`].
    pub fn reachable_from(
        &self,
        grid: &GridModel,
        start: Position,
    ) -> BurrowResult<HashSet<Position>> {
        reachable_from(grid, &self.passable, start)
    }
}

impl Default for PathFinder {
    fn default() -> Self {
        Self::new(PassableSet::walkable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_matrix, BurrowError, TileKind};

    fn corridor() -> GridModel {
        parse_matrix(
            "1 1 1 1 1 1 1\n\
             1 0 0 0 0 0 1\n\
             1 1 1 1 1 1 1\n",
        )
        .unwrap()
    }

    fn open_room(width: u32, height: u32) -> GridModel {
        let mut grid = GridModel::new(width, height, TileKind::Wall).unwrap();
        for y in 1..height as i32 - 1 {
            for x in 1..width as i32 - 1 {
                grid.set_tile(Position::new(x, y), TileKind::Floor).unwrap();
            }
        }
        grid
    }

    #[test]
    fn test_next_step_along_corridor() {
        let grid = corridor();
        let passable = PassableSet::walkable();

        let step = next_step(&grid, &passable, Position::new(1, 1), Position::new(5, 1)).unwrap();
        assert_eq!(step, Position::new(2, 1));

        let step = next_step(&grid, &passable, Position::new(5, 1), Position::new(1, 1)).unwrap();
        assert_eq!(step, Position::new(4, 1));
    }

    #[test]
    fn test_next_step_at_target_stays() {
        let grid = corridor();
        let here = Position::new(3, 1);
        assert_eq!(next_step(&grid, &PassableSet::walkable(), here, here).unwrap(), here);
    }

    #[test]
    fn test_next_step_adjacent_target() {
        let grid = corridor();
        let step = next_step(
            &grid,
            &PassableSet::walkable(),
            Position::new(2, 1),
            Position::new(3, 1),
        )
        .unwrap();
        assert_eq!(step, Position::new(3, 1));
    }

    #[test]
    fn test_next_step_walled_target_stalls() {
        let mut grid = open_room(7, 7);
        for neighbor in grid.neighbors4(Position::new(4, 4)) {
            grid.set_tile(neighbor, TileKind::Wall).unwrap();
        }
        let start = Position::new(1, 1);
        assert_eq!(
            next_step(&grid, &PassableSet::walkable(), start, Position::new(4, 4)).unwrap(),
            start
        );
    }

    #[test]
    fn test_next_step_respects_passable_set() {
        let mut grid = corridor();
        grid.set_tile(Position::new(3, 1), TileKind::SealedExit).unwrap();
        let start = Position::new(1, 1);
        let target = Position::new(5, 1);

        assert_eq!(
            next_step(&grid, &PassableSet::walkable(), start, target).unwrap(),
            start
        );

        let with_sealed = PassableSet::walkable().with(TileKind::SealedExit);
        assert_eq!(
            next_step(&grid, &with_sealed, start, target).unwrap(),
            Position::new(2, 1)
        );
    }

    #[test]
    fn test_next_step_east_wins_ties() {
        // Two equally short routes around a central pillar.
        let mut grid = open_room(5, 5);
        grid.set_tile(Position::new(2, 2), TileKind::Wall).unwrap();

        let step = next_step(
            &grid,
            &PassableSet::walkable(),
            Position::new(1, 1),
            Position::new(3, 3),
        )
        .unwrap();
        assert_eq!(step, Position::new(2, 1));

        // Mirrored: from the bottom-right corner East and South are walls, so West wins over North.
        let step = next_step(
            &grid,
            &PassableSet::walkable(),
            Position::new(3, 3),
            Position::new(1, 1),
        )
        .unwrap();
        assert_eq!(step, Position::new(2, 3));
    }

    #[test]
    fn test_next_step_out_of_bounds() {
        let grid = corridor();
        let passable = PassableSet::walkable();

        assert!(matches!(
            next_step(&grid, &passable, Position::new(1, 1), Position::new(7, 1)),
            Err(BurrowError::OutOfBounds { .. })
        ));
        assert!(matches!(
            next_step(&grid, &passable, Position::new(1, -1), Position::new(1, 1)),
            Err(BurrowError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_distance_field_queries() {
        let grid = corridor();
        let field = DistanceField::compute(&grid, &PassableSet::walkable(), Position::new(1, 1))
            .unwrap();

        assert_eq!(field.origin(), Position::new(1, 1));
        assert_eq!(field.distance_to(Position::new(1, 1)), Some(0));
        assert_eq!(field.distance_to(Position::new(5, 1)), Some(4));
        assert_eq!(field.distance_to(Position::new(0, 0)), None);
        assert_eq!(field.distance_to(Position::new(50, 50)), None);
        assert_eq!(field.first_step_toward(Position::new(1, 1)), None);
        assert_eq!(
            field.path_to(Position::new(4, 1)).unwrap(),
            vec![
                Position::new(1, 1),
                Position::new(2, 1),
                Position::new(3, 1),
                Position::new(4, 1),
            ]
        );
    }

    #[test]
    fn test_origin_need_not_be_passable() {
        // A pursuer standing on a sealed exit can still leave it.
        let mut grid = corridor();
        grid.set_tile(Position::new(1, 1), TileKind::SealedExit).unwrap();
        let step = next_step(
            &grid,
            &PassableSet::walkable(),
            Position::new(1, 1),
            Position::new(4, 1),
        )
        .unwrap();
        assert_eq!(step, Position::new(2, 1));
    }

    #[test]
    fn test_pursuit_step_outcomes() {
        let mut grid = corridor();
        let finder = PathFinder::for_grid(&grid);
        let start = Position::new(1, 1);

        assert_eq!(finder.step(&grid, start, start).unwrap(), PursuitStep::Arrived);
        assert_eq!(
            finder.step(&grid, start, Position::new(5, 1)).unwrap(),
            PursuitStep::Advance(Position::new(2, 1))
        );

        grid.set_tile(Position::new(3, 1), TileKind::Wall).unwrap();
        let outcome = finder.step(&grid, start, Position::new(5, 1)).unwrap();
        assert_eq!(outcome, PursuitStep::Stalled);
        assert_eq!(outcome.destination(start), start);
    }

    #[test]
    fn test_path_finder_distance_and_path() {
        let grid = corridor();
        let finder = PathFinder::default();

        assert_eq!(
            finder.distance(&grid, Position::new(1, 1), Position::new(5, 1)).unwrap(),
            Some(4)
        );
        assert!(finder.is_reachable(&grid, Position::new(1, 1), Position::new(3, 1)).unwrap());
        assert!(!finder.is_reachable(&grid, Position::new(1, 1), Position::new(3, 0)).unwrap());
        assert_eq!(
            finder
                .shortest_path(&grid, Position::new(1, 1), Position::new(5, 1))
                .unwrap()
                .map(|path| path.len()),
            Some(5)
        );
    }

    #[test]
    fn test_reachable_from_matches_distance_field() {
        let mut grid = open_room(6, 6);
        grid.set_tile(Position::new(3, 1), TileKind::Wall).unwrap();
        grid.set_tile(Position::new(3, 2), TileKind::Wall).unwrap();
        grid.set_tile(Position::new(3, 3), TileKind::Wall).unwrap();
        grid.set_tile(Position::new(3, 4), TileKind::Wall).unwrap();

        let passable = PassableSet::walkable();
        let reachable = reachable_from(&grid, &passable, Position::new(1, 1)).unwrap();
        let field = DistanceField::compute(&grid, &passable, Position::new(1, 1)).unwrap();

        assert_eq!(reachable.len(), 8);
        for pos in grid.positions() {
            assert_eq!(reachable.contains(&pos), field.is_reachable(pos), "mismatch at {}", pos);
        }
    }
}
