//! # Burrow
//!
//! Maze generation and pursuit pathfinding for a grid-based chase game.
//!
//! ## Architecture Overview
//!
//! Burrow is the algorithmic core that sits underneath a chase game loop. It owns
//! no window, no timers and no game session; the surrounding application drives it:
//!
//! - **Grid Model**: a rectangular tile map with a fixed integer encoding
//! - **Generation System**: randomized depth-first maze carving with a guaranteed exit
//! - **Pursuit**: a breadth-first next-step query recomputed on every tick
//! - **Spawning**: hero/pursuer spawn pairs and pickup placement on a fresh maze
//!
//! ## Determinism
//!
//! Every random decision is drawn from a caller-supplied random source. Seeding a
//! [`rand::rngs::StdRng`] with the same value always reproduces the same maze.
//!
//! ```
//! use burrow::{generate_maze, next_step, PassableSet, Position};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let grid = generate_maze(25, 25, &mut rng).unwrap();
//!
//! let exit = grid.find_first(burrow::TileKind::Exit).unwrap();
//! let step = next_step(&grid, &PassableSet::walkable(), Position::new(0, 1), exit).unwrap();
//! assert!(Position::new(0, 1).manhattan_distance(step) <= 1);
//! ```

pub mod game;
pub mod generation;
pub mod utils;

pub use game::*;
pub use generation::*;
pub use utils::*;

pub use game::{GridModel, PassableSet, Position, TileKind, TileRules};
pub use generation::{
    generate_maze, GeneratedMaze, GenerationConfig, Generator, MazeGenerator, SpawnPair,
};
pub use utils::{next_step, DistanceField, PathFinder, PursuitStep};

/// Core error type for the Burrow maze engine.
#[derive(thiserror::Error, Debug)]
pub enum BurrowError {
    /// A coordinate lies outside the grid
    #[error("position {position} is outside the {width}x{height} grid")]
    OutOfBounds {
        position: Position,
        width: u32,
        height: u32,
    },

    /// Grid or maze dimensions are degenerate
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// A matrix cell holds an integer with no tile mapping
    #[error("unknown tile code {code} at row {row}, column {column}")]
    InvalidTileCode { code: u8, row: usize, column: usize },

    /// A matrix row does not match the width of the first row
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Matrix text could not be parsed
    #[error("parse error at row {row}: {message}")]
    Parse { row: usize, message: String },

    /// Not enough free cells for the requested placement
    #[error("requested {requested} cells but only {available} are free")]
    NotEnoughSpace { requested: usize, available: usize },

    /// Generated content failed validation
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// Configuration values are inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type used throughout the Burrow codebase.
pub type BurrowResult<T> = Result<T, BurrowError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine configuration constants.
pub mod config {
    /// Default maze width in tiles
    pub const DEFAULT_MAZE_WIDTH: u32 = 25;

    /// Default maze height in tiles
    pub const DEFAULT_MAZE_HEIGHT: u32 = 25;

    /// Smallest width or height the maze generator accepts
    pub const MIN_MAZE_EXTENT: u32 = 5;

    /// One extra opening is sampled per this many grid cells
    pub const SPARSITY_DIVISOR: u32 = 6;

    /// Number of pickups placed on each fresh level
    pub const DEFAULT_PICKUP_COUNT: usize = 10;

    /// Manhattan distance between the hero and pursuer spawn cells
    pub const DEFAULT_SPAWN_SEPARATION: u32 = 20;

    /// How many hero cells are tried before spawn selection gives up
    pub const MAX_SPAWN_ATTEMPTS: u32 = 100;
}
