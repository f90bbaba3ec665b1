//! # Grid Model
//!
//! The rectangular tile map shared by maze generation and pursuit.
//!
//! A [`GridModel`] has a fixed shape for its whole life. Tiles are mutated in
//! place when the game layer reclassifies them (sealing and unsealing exits,
//! promoting the final exit to the finish tile), and the whole grid is replaced
//! when a new level is generated.

use crate::{BurrowError, BurrowResult, Position};
use serde::{Deserialize, Serialize};

/// The semantic category of one grid cell.
///
/// The integer codes are a fixed contract with the persistence and rendering
/// layers and must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Open ground (code 0)
    Floor,
    /// Solid wall (code 1)
    Wall,
    /// Open level exit (code 2)
    Exit,
    /// Exit that is temporarily impassable until the level is cleared (code 3)
    SealedExit,
    /// Final goal tile (code 4)
    Goal,
}

impl TileKind {
    /// Every tile kind, ordered by integer code.
    pub const ALL: [TileKind; 5] = [
        TileKind::Floor,
        TileKind::Wall,
        TileKind::Exit,
        TileKind::SealedExit,
        TileKind::Goal,
    ];

    /// Returns the integer code used by the text matrix encoding.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow::TileKind;
    ///
    /// assert_eq!(TileKind::Wall.code(), 1);
    /// assert_eq!(TileKind::from_code(4), Some(TileKind::Goal));
    /// ```
    pub fn code(self) -> u8 {
        match self {
            TileKind::Floor => 0,
            TileKind::Wall => 1,
            TileKind::Exit => 2,
            TileKind::SealedExit => 3,
            TileKind::Goal => 4,
        }
    }

    /// Maps an integer code back to its tile kind.
    pub fn from_code(code: u8) -> Option<TileKind> {
        Self::ALL.get(code as usize).copied()
    }

    fn bit(self) -> u8 {
        1 << self.code()
    }
}

/// A set of tile kinds that a traversal treats as walkable.
///
/// # Examples
///
/// ```
/// use burrow::{PassableSet, TileKind};
///
/// let set = PassableSet::walkable();
/// assert!(set.contains(TileKind::Exit));
/// assert!(!set.contains(TileKind::SealedExit));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<TileKind>", into = "Vec<TileKind>")]
pub struct PassableSet {
    mask: u8,
}

impl PassableSet {
    /// Creates a set containing exactly `kinds`.
    pub fn new(kinds: &[TileKind]) -> Self {
        kinds.iter().copied().collect()
    }

    /// The set nothing can walk through.
    pub fn empty() -> Self {
        Self { mask: 0 }
    }

    /// The usual walkable set for the chase game: `{Floor, Exit, Goal}`.
    pub fn walkable() -> Self {
        Self::new(&[TileKind::Floor, TileKind::Exit, TileKind::Goal])
    }

    /// Returns whether `kind` is in the set.
    pub fn contains(&self, kind: TileKind) -> bool {
        self.mask & kind.bit() != 0
    }

    /// Adds `kind` to the set.
    pub fn insert(&mut self, kind: TileKind) {
        self.mask |= kind.bit();
    }

    /// Removes `kind` from the set.
    pub fn remove(&mut self, kind: TileKind) {
        self.mask &= !kind.bit();
    }

    /// Returns a copy of the set that also contains `kind`.
    pub fn with(mut self, kind: TileKind) -> Self {
        self.insert(kind);
        self
    }

    /// Iterates over the members in code order.
    pub fn kinds(&self) -> impl Iterator<Item = TileKind> + '_ {
        TileKind::ALL.into_iter().filter(move |kind| self.contains(*kind))
    }

    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }
}

impl FromIterator<TileKind> for PassableSet {
    fn from_iter<I: IntoIterator<Item = TileKind>>(iter: I) -> Self {
        let mut set = PassableSet::empty();
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

impl From<Vec<TileKind>> for PassableSet {
    fn from(kinds: Vec<TileKind>) -> Self {
        kinds.into_iter().collect()
    }
}

impl From<PassableSet> for Vec<TileKind> {
    fn from(set: PassableSet) -> Self {
        set.kinds().collect()
    }
}

/// How the game layer classifies tiles on a particular grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRules {
    /// Kinds agents may stand on
    pub passable: PassableSet,
    /// Standing on this kind wins the game
    pub finish: TileKind,
    /// Standing on this kind advances to the next level
    pub level_exit: TileKind,
}

impl Default for TileRules {
    fn default() -> Self {
        Self {
            passable: PassableSet::walkable(),
            finish: TileKind::Goal,
            level_exit: TileKind::Exit,
        }
    }
}

/// A rectangular tile map addressed by `(x, y)` cell coordinates.
///
/// Tiles are stored row-major. Every coordinate in `[0, width) x [0, height)`
/// holds exactly one [`TileKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridRecord")]
pub struct GridModel {
    width: u32,
    height: u32,
    tiles: Vec<TileKind>,
    #[serde(default)]
    rules: TileRules,
}

/// Unchecked serde mirror of [`GridModel`].
#[derive(Deserialize)]
struct GridRecord {
    width: u32,
    height: u32,
    tiles: Vec<TileKind>,
    #[serde(default)]
    rules: TileRules,
}

impl TryFrom<GridRecord> for GridModel {
    type Error = BurrowError;

    fn try_from(record: GridRecord) -> BurrowResult<Self> {
        let mut grid = GridModel::new(record.width, record.height, TileKind::Wall)?;
        if record.tiles.len() != grid.tiles.len() {
            return Err(BurrowError::Parse {
                row: 0,
                message: format!(
                    "expected {} tiles for a {}x{} grid, found {}",
                    grid.tiles.len(),
                    record.width,
                    record.height,
                    record.tiles.len()
                ),
            });
        }
        grid.tiles = record.tiles;
        grid.rules = record.rules;
        Ok(grid)
    }
}

impl GridModel {
    /// Creates a grid of the given size with every cell set to `fill`.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow::{GridModel, Position, TileKind};
    ///
    /// let grid = GridModel::new(4, 3, TileKind::Wall).unwrap();
    /// assert_eq!(grid.width(), 4);
    /// assert_eq!(grid.tile_at(Position::new(3, 2)).unwrap(), TileKind::Wall);
    /// assert!(GridModel::new(0, 3, TileKind::Wall).is_err());
    /// ```
    pub fn new(width: u32, height: u32, fill: TileKind) -> BurrowResult<Self> {
        if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(BurrowError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            tiles: vec![fill; width as usize * height as usize],
            rules: TileRules::default(),
        })
    }

    /// Builds a grid from rows of tiles. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<TileKind>>) -> BurrowResult<Self> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        let mut grid = GridModel::new(width as u32, height as u32, TileKind::Wall)?;

        grid.tiles.clear();
        for (row_index, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(BurrowError::RaggedRow {
                    row: row_index,
                    expected: width,
                    found: row.len(),
                });
            }
            grid.tiles.extend(row);
        }

        Ok(grid)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Gets the tile classification rules of this grid.
    pub fn rules(&self) -> &TileRules {
        &self.rules
    }

    /// Replaces the tile classification rules.
    pub fn set_rules(&mut self, rules: TileRules) {
        self.rules = rules;
    }

    /// Builder-style variant of [`GridModel::set_rules`].
    pub fn with_rules(mut self, rules: TileRules) -> Self {
        self.rules = rules;
        self
    }

    /// Checks whether a position lies inside the grid.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    /// Checks whether a position lies on the outermost ring of the grid.
    pub fn is_border(&self, pos: Position) -> bool {
        self.contains(pos)
            && (pos.x == 0
                || pos.y == 0
                || pos.x == self.width as i32 - 1
                || pos.y == self.height as i32 - 1)
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.contains(pos) {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    fn out_of_bounds(&self, pos: Position) -> BurrowError {
        BurrowError::OutOfBounds {
            position: pos,
            width: self.width,
            height: self.height,
        }
    }

    /// Gets the tile at a position, or `None` off the grid.
    pub fn get(&self, pos: Position) -> Option<TileKind> {
        self.index(pos).map(|index| self.tiles[index])
    }

    /// Gets the tile at a position.
    ///
    /// # Errors
    ///
    /// [`BurrowError::OutOfBounds`] if `pos` is outside the grid.
    pub fn tile_at(&self, pos: Position) -> BurrowResult<TileKind> {
        self.get(pos).ok_or_else(|| self.out_of_bounds(pos))
    }

    /// Sets the tile at a position. Any kind may replace any other kind.
    ///
    /// # Errors
    ///
    /// [`BurrowError::OutOfBounds`] if `pos` is outside the grid.
    pub fn set_tile(&mut self, pos: Position, kind: TileKind) -> BurrowResult<()> {
        let index = self.index(pos).ok_or_else(|| self.out_of_bounds(pos))?;
        self.tiles[index] = kind;
        Ok(())
    }

    /// Checks whether a cell is in bounds and its tile is in `passable`.
    ///
    /// Off-grid positions are never passable.
    pub fn is_passable(&self, pos: Position, passable: &PassableSet) -> bool {
        self.get(pos).is_some_and(|kind| passable.contains(kind))
    }

    /// Checks passability against this grid's own rules.
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.is_passable(pos, &self.rules.passable)
    }

    /// Checks whether standing on `pos` wins the game.
    pub fn is_finish(&self, pos: Position) -> bool {
        self.get(pos) == Some(self.rules.finish)
    }

    /// Checks whether standing on `pos` advances to the next level.
    pub fn is_level_exit(&self, pos: Position) -> bool {
        self.get(pos) == Some(self.rules.level_exit)
    }

    /// Returns the 4 orthogonal neighbours of `pos` in East, South, West, North order.
    ///
    /// Neighbours may lie off the grid; callers filter them with
    /// [`GridModel::is_passable`] or [`GridModel::contains`].
    pub fn neighbors4(&self, pos: Position) -> [Position; 4] {
        pos.cardinal_adjacent_positions()
    }

    /// Iterates over every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let width = self.width as i32;
        (0..self.height as i32).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }

    /// Iterates over every `(position, tile)` pair in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = (Position, TileKind)> + '_ {
        self.positions().zip(self.tiles.iter().copied())
    }

    /// Iterates over the rows of the grid, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[TileKind]> + '_ {
        self.tiles.chunks(self.width as usize)
    }

    /// Finds the first cell of `kind` in row-major order.
    pub fn find_first(&self, kind: TileKind) -> Option<Position> {
        self.tiles()
            .find(|(_, tile)| *tile == kind)
            .map(|(pos, _)| pos)
    }

    /// Gets every cell of `kind` in row-major order.
    pub fn positions_of(&self, kind: TileKind) -> Vec<Position> {
        self.tiles()
            .filter(|(_, tile)| *tile == kind)
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Counts the cells of `kind`.
    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|tile| **tile == kind).count()
    }

    /// Rewrites every `from` tile to `to`, returning how many cells changed.
    pub fn replace_all(&mut self, from: TileKind, to: TileKind) -> usize {
        if from == to {
            return 0;
        }
        let mut changed = 0;
        for tile in self.tiles.iter_mut().filter(|tile| **tile == from) {
            *tile = to;
            changed += 1;
        }
        changed
    }

    /// Closes every open exit (`Exit` → `SealedExit`).
    pub fn seal_exits(&mut self) -> usize {
        self.replace_all(TileKind::Exit, TileKind::SealedExit)
    }

    /// Reopens every sealed exit (`SealedExit` → `Exit`).
    pub fn unseal_exits(&mut self) -> usize {
        self.replace_all(TileKind::SealedExit, TileKind::Exit)
    }

    /// Turns every sealed exit into the finish tile (`SealedExit` → `Goal`).
    pub fn promote_sealed_to_goal(&mut self) -> usize {
        self.replace_all(TileKind::SealedExit, TileKind::Goal)
    }

    /// Saves the grid to a JSON string.
    pub fn save_to_json(&self) -> BurrowResult<String> {
        serde_json::to_string(self).map_err(BurrowError::from)
    }

    /// Loads a grid from a JSON string.
    pub fn load_from_json(json: &str) -> BurrowResult<Self> {
        serde_json::from_str(json).map_err(BurrowError::from)
    }
}
