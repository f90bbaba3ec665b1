//! # Maze Generation
//!
//! Randomized depth-first carving on a lattice of step size 2.
//!
//! Cells with two odd coordinates are "rooms"; the cells between two rooms are
//! "doors". Carving walks the room lattice depth-first, opening the door to each
//! unvisited neighbour room, which yields a spanning tree of width-1 corridors.
//! Afterwards the border is walled, the entrance reopened, a single exit punched
//! into a random side, and a sprinkling of extra walls knocked out to create
//! loops.
//!
//! This module implements the generator that produces levels with:
//! 1. A spanning-tree maze carved from `(1, 1)`
//! 2. An entrance at `(0, 1)`
//! 3. One exit on a random border side, excluding corners
//! 4. Extra openings that add cycles without disconnecting anything

use crate::generation::utils;
use crate::{
    config, BurrowError, BurrowResult, Direction, GenerationConfig, Generator, GridModel,
    Position, TileKind,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// A freshly generated maze and its landmarks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMaze {
    /// The carved grid
    pub grid: GridModel,
    /// Where the hero enters the maze
    pub entrance: Position,
    /// The single exit cell on the border
    pub exit: Position,
}

/// Maze generator using randomized depth-first carving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeGenerator {
    /// First room carved; must have two odd coordinates
    pub origin: Position,
    /// Border cell opened as the entrance
    pub entrance: Position,
    /// One extra opening is sampled per this many cells
    pub sparsity_divisor: u32,
    /// Whether to check connectivity and border shape after generation
    pub validate_output: bool,
}

/// One level of the carving stack: a room and its shuffled exploration order.
#[derive(Debug)]
struct CarveFrame {
    room: Position,
    directions: [Direction; 4],
    next: usize,
}

impl CarveFrame {
    fn enter<R: Rng + ?Sized>(room: Position, rng: &mut R) -> Self {
        let mut directions = Direction::CARDINAL;
        directions.shuffle(rng);
        Self {
            room,
            directions,
            next: 0,
        }
    }
}

impl MazeGenerator {
    /// Creates a new maze generator with default settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow::MazeGenerator;
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let generator = MazeGenerator::new();
    /// let maze = generator.build(9, 7, &mut StdRng::seed_from_u64(3)).unwrap();
    /// assert_eq!(maze.grid.width(), 9);
    /// assert_eq!(maze.grid.height(), 7);
    /// ```
    pub fn new() -> Self {
        Self {
            origin: Position::new(1, 1),
            entrance: Position::new(0, 1),
            sparsity_divisor: config::SPARSITY_DIVISOR,
            validate_output: true,
        }
    }

    /// Creates a generator that takes its tunables from `config`.
    pub fn from_config(config: &GenerationConfig) -> Self {
        Self {
            sparsity_divisor: config.sparsity_divisor,
            ..Self::new()
        }
    }

    /// Generates a maze of the given size.
    ///
    /// # Errors
    ///
    /// [`BurrowError::InvalidDimensions`] if either extent is below 5, before
    /// any random draw is made. [`BurrowError::GenerationFailed`] if output
    /// validation is enabled and fails.
    pub fn build<R: Rng + ?Sized>(
        &self,
        width: u32,
        height: u32,
        rng: &mut R,
    ) -> BurrowResult<GeneratedMaze> {
        if width < config::MIN_MAZE_EXTENT || height < config::MIN_MAZE_EXTENT {
            return Err(BurrowError::InvalidDimensions { width, height });
        }
        if self.sparsity_divisor == 0 {
            return Err(BurrowError::InvalidConfig(
                "sparsity_divisor must be positive".to_string(),
            ));
        }

        let mut grid = GridModel::new(width, height, TileKind::Wall)?;

        self.carve_passages(&mut grid, rng)?;
        self.stamp_border(&mut grid)?;
        grid.set_tile(self.entrance, TileKind::Floor)?;
        let exit = self.place_exit(&mut grid, rng)?;
        let opened = self.sparsify(&mut grid, rng)?;

        log::debug!(
            "Generated {}x{} maze: exit at {}, {} extra openings, {} floor tiles",
            width,
            height,
            exit,
            opened,
            grid.count(TileKind::Floor)
        );

        if self.validate_output {
            utils::validate_maze(&grid, self.entrance)?;
        }

        Ok(GeneratedMaze {
            grid,
            entrance: self.entrance,
            exit,
        })
    }

    /// Checks whether a room may be carved: rooms stay off the border so that
    /// border stamping never cuts a corridor.
    fn is_carvable(grid: &GridModel, pos: Position) -> bool {
        pos.x >= 1
            && pos.y >= 1
            && pos.x <= grid.width() as i32 - 2
            && pos.y <= grid.height() as i32 - 2
    }

    /// Carves the spanning-tree maze, depth-first from the origin.
    ///
    /// An explicit stack replaces recursion. Each frame shuffles its directions
    /// when it is pushed, so random draws happen in the same order as the
    /// recursive formulation.
    fn carve_passages<R: Rng + ?Sized>(
        &self,
        grid: &mut GridModel,
        rng: &mut R,
    ) -> BurrowResult<()> {
        grid.set_tile(self.origin, TileKind::Floor)?;
        let mut stack = vec![CarveFrame::enter(self.origin, rng)];

        while let Some(frame) = stack.last_mut() {
            let Some(&direction) = frame.directions.get(frame.next) else {
                stack.pop();
                continue;
            };
            frame.next += 1;
            let room = frame.room;

            let candidate = room.step_by(direction, 2);
            if !Self::is_carvable(grid, candidate) || grid.tile_at(candidate)? != TileKind::Wall {
                continue;
            }

            grid.set_tile(room.step(direction), TileKind::Floor)?;
            grid.set_tile(candidate, TileKind::Floor)?;
            stack.push(CarveFrame::enter(candidate, rng));
        }

        Ok(())
    }

    /// Sets the whole outer ring to walls.
    fn stamp_border(&self, grid: &mut GridModel) -> BurrowResult<()> {
        let right = grid.width() as i32 - 1;
        let bottom = grid.height() as i32 - 1;

        for x in 0..=right {
            grid.set_tile(Position::new(x, 0), TileKind::Wall)?;
            grid.set_tile(Position::new(x, bottom), TileKind::Wall)?;
        }
        for y in 0..=bottom {
            grid.set_tile(Position::new(0, y), TileKind::Wall)?;
            grid.set_tile(Position::new(right, y), TileKind::Wall)?;
        }

        Ok(())
    }

    /// Punches the exit into a random side and opens the cell inside it.
    fn place_exit<R: Rng + ?Sized>(
        &self,
        grid: &mut GridModel,
        rng: &mut R,
    ) -> BurrowResult<Position> {
        let right = grid.width() as i32 - 1;
        let bottom = grid.height() as i32 - 1;

        // Sides in draw order: top, right, bottom, left.
        let side = [
            Direction::North,
            Direction::East,
            Direction::South,
            Direction::West,
        ][rng.gen_range(0..4usize)];

        let exit = match side {
            Direction::North => Position::new(rng.gen_range(1..right), 0),
            Direction::East => Position::new(right, rng.gen_range(1..bottom)),
            Direction::South => Position::new(rng.gen_range(1..right), bottom),
            Direction::West => Position::new(0, rng.gen_range(1..bottom)),
        };
        let inward = exit.step(side.opposite());

        grid.set_tile(exit, TileKind::Exit)?;
        grid.set_tile(inward, TileKind::Floor)?;
        self.link_to_lattice(grid, inward)?;

        Ok(exit)
    }

    /// Opens cells from `pos` toward the nearest room up and to the left.
    ///
    /// Every room is carved, so reaching one joins the exit to the maze. On odd
    /// extents the inward cell is always a room or next to one, and this only
    /// re-floors cells that are already open.
    fn link_to_lattice(&self, grid: &mut GridModel, pos: Position) -> BurrowResult<()> {
        let mut current = pos;
        while current.x % 2 == 0 || current.y % 2 == 0 {
            let direction = if current.x % 2 == 0 {
                Direction::West
            } else {
                Direction::North
            };
            current = current.step(direction);
            grid.set_tile(current, TileKind::Floor)?;
        }
        Ok(())
    }

    /// Knocks out randomly sampled interior walls, returning how many opened.
    ///
    /// Samples are drawn with replacement; hitting open ground is a no-op.
    fn sparsify<R: Rng + ?Sized>(
        &self,
        grid: &mut GridModel,
        rng: &mut R,
    ) -> BurrowResult<usize> {
        let samples = grid.width() * grid.height() / self.sparsity_divisor;
        let right = grid.width() as i32 - 2;
        let bottom = grid.height() as i32 - 2;

        let mut opened = 0;
        for _ in 0..samples {
            let pos = Position::new(rng.gen_range(1..=right), rng.gen_range(1..=bottom));
            if grid.tile_at(pos)? == TileKind::Wall {
                grid.set_tile(pos, TileKind::Floor)?;
                opened += 1;
            }
        }

        Ok(opened)
    }
}

impl Generator<GeneratedMaze> for MazeGenerator {
    fn generate(
        &self,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> BurrowResult<GeneratedMaze> {
        config.validate_maze_settings()?;
        let generator = Self {
            sparsity_divisor: config.sparsity_divisor,
            ..self.clone()
        };
        generator.build(config.width, config.height, rng)
    }

    fn validate(&self, maze: &GeneratedMaze, config: &GenerationConfig) -> BurrowResult<()> {
        if maze.grid.width() != config.width || maze.grid.height() != config.height {
            return Err(BurrowError::GenerationFailed(format!(
                "maze is {}x{}, expected {}x{}",
                maze.grid.width(),
                maze.grid.height(),
                config.width,
                config.height
            )));
        }
        utils::validate_maze(&maze.grid, maze.entrance)
    }

    fn generator_type(&self) -> &'static str {
        "MazeGenerator"
    }
}

impl Default for MazeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Generates a maze of the given size with the default generator.
///
/// # Examples
///
/// ```
/// use burrow::{generate_maze, TileKind};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let a = generate_maze(15, 15, &mut StdRng::seed_from_u64(11)).unwrap();
/// let b = generate_maze(15, 15, &mut StdRng::seed_from_u64(11)).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.count(TileKind::Exit), 1);
/// ```
pub fn generate_maze<R: Rng + ?Sized>(
    width: u32,
    height: u32,
    rng: &mut R,
) -> BurrowResult<GridModel> {
    MazeGenerator::new().build(width, height, rng).map(|maze| maze.grid)
}
