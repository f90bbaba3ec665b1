//! # Matrix Encoding
//!
//! Text form of a grid shared with the persistence and rendering layers: one
//! row per line, cells as whitespace-separated integer tile codes.
//!
//! ```text
//! 1 1 1 1 1
//! 0 0 0 0 1
//! 1 0 1 0 1
//! 1 0 0 0 2
//! 1 1 1 1 1
//! ```
//!
//! The canonical form written by this module uses single spaces and ends every
//! row with `\n`, so parsing canonical text and serializing it again is lossless.

use crate::{BurrowError, BurrowResult, GridModel, TileKind};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Parses a text matrix into a grid.
///
/// Blank lines are ignored. Every non-blank line must have the same number
/// of cells. The `row` reported in errors is the zero-based line number of the
/// offending line in `text`, counting blank lines.
///
/// # Examples
///
/// ```
/// use burrow::{parse_matrix, Position, TileKind};
///
/// let grid = parse_matrix("1 1 1\n0 0 2\n1 1 1\n").unwrap();
/// assert_eq!(grid.width(), 3);
/// assert_eq!(grid.tile_at(Position::new(2, 1)).unwrap(), TileKind::Exit);
/// ```
pub fn parse_matrix(text: &str) -> BurrowResult<GridModel> {
    let mut rows: Vec<Vec<TileKind>> = Vec::new();
    for (line_number, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row = parse_row(line_number, line)?;
        if let Some(first) = rows.first() {
            if row.len() != first.len() {
                return Err(BurrowError::RaggedRow {
                    row: line_number,
                    expected: first.len(),
                    found: row.len(),
                });
            }
        }
        rows.push(row);
    }

    GridModel::from_rows(rows)
}

fn parse_row(row: usize, line: &str) -> BurrowResult<Vec<TileKind>> {
    line.split_whitespace()
        .enumerate()
        .map(|(column, token)| {
            let code: u8 = token.parse().map_err(|_| BurrowError::Parse {
                row,
                message: format!("'{}' is not a tile code", token),
            })?;
            TileKind::from_code(code).ok_or(BurrowError::InvalidTileCode { code, row, column })
        })
        .collect()
}

/// Converts a grid to rows of integer tile codes.
pub fn serialize_maze(grid: &GridModel) -> Vec<Vec<u8>> {
    grid.rows()
        .map(|row| row.iter().map(|kind| kind.code()).collect())
        .collect()
}

/// Reads a text matrix from any buffered reader.
pub fn read_matrix<R: BufRead>(reader: R) -> BurrowResult<GridModel> {
    let mut text = String::new();
    for line in reader.lines() {
        text.push_str(&line?);
        text.push('\n');
    }
    parse_matrix(&text)
}

/// Writes the canonical text matrix of `grid` to `writer`.
pub fn write_matrix<W: Write>(grid: &GridModel, mut writer: W) -> BurrowResult<()> {
    for row in grid.rows() {
        let mut first = true;
        for kind in row {
            if !first {
                writer.write_all(b" ")?;
            }
            write!(writer, "{}", kind.code())?;
            first = false;
        }
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Loads a grid from a matrix file.
pub fn load_matrix_file<P: AsRef<Path>>(path: P) -> BurrowResult<GridModel> {
    let file = File::open(path.as_ref())?;
    let grid = read_matrix(BufReader::new(file))?;
    log::debug!(
        "Loaded {}x{} grid from {}",
        grid.width(),
        grid.height(),
        path.as_ref().display()
    );
    Ok(grid)
}

/// Saves a grid to a matrix file, replacing any existing content.
pub fn save_matrix_file<P: AsRef<Path>>(grid: &GridModel, path: P) -> BurrowResult<()> {
    let file = File::create(path.as_ref())?;
    write_matrix(grid, BufWriter::new(file))
}

impl GridModel {
    /// Renders the grid in canonical matrix form.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow::parse_matrix;
    ///
    /// let text = "1 1 1\n0 0 2\n1 1 1\n";
    /// assert_eq!(parse_matrix(text).unwrap().to_matrix_string(), text);
    /// ```
    pub fn to_matrix_string(&self) -> String {
        let mut out = String::with_capacity(self.width() as usize * self.height() as usize * 2);
        for row in self.rows() {
            let line = row
                .iter()
                .map(|kind| kind.code().to_string())
                .collect::<Vec<_>>()
                .join(" ");
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}
