use std::fmt;

use serde::Serialize;

pub mod direction;
pub mod error;
pub mod metrics;

pub use direction::Direction;
pub use error::{BoardError, ParseDirectionError};

/// Width and height of the board.
pub const SIZE: usize = 4;

/// Largest tile a board built from outside the engine may hold, the highest tile reachable on a
/// 4x4 board.
pub const MAX_TILE: u32 = 1 << 17;

pub type Line = [u32; SIZE];

/// A 4x4 grid of tiles stored row-major. Empty cells are 0, every other cell holds a power of
/// two no smaller than 2.
///
/// Serializes as a nested sequence of rows for display binding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Board([Line; SIZE]);

impl Board {
    pub const EMPTY: Self = Self([[0; SIZE]; SIZE]);

    pub fn from_rows(rows: [Line; SIZE]) -> Result<Self, BoardError> {
        for (row, line) in rows.iter().enumerate() {
            for (col, &value) in line.iter().enumerate() {
                if !is_tile_value(value) {
                    return Err(BoardError::InvalidTile { row, col, value });
                }

                if value > MAX_TILE {
                    return Err(BoardError::TileTooLarge { row, col, value });
                }
            }
        }

        Ok(Self(rows))
    }

    /// Builds a board from `SIZE * SIZE` cells in row-major order.
    pub fn from_flat(cells: &[u32]) -> Result<Self, BoardError> {
        if cells.len() != SIZE * SIZE {
            return Err(BoardError::WrongLength(cells.len()));
        }

        let mut rows = [[0; SIZE]; SIZE];

        for (i, &value) in cells.iter().enumerate() {
            rows[i / SIZE][i % SIZE] = value;
        }

        Self::from_rows(rows)
    }

    pub const fn rows(&self) -> &[Line; SIZE] {
        &self.0
    }

    pub const fn row(&self, row: usize) -> Line {
        self.0[row]
    }

    pub const fn get(&self, row: usize, col: usize) -> u32 {
        self.0[row][col]
    }

    /// Returns a copy of the board with `tile` placed at `(row, col)`.
    pub fn with_tile(mut self, row: usize, col: usize, tile: u32) -> Self {
        debug_assert!(is_tile_value(tile));

        self.0[row][col] = tile;
        self
    }

    /// Row-major copy of every cell, 0 meaning empty.
    pub fn to_flat(&self) -> [u32; SIZE * SIZE] {
        let mut cells = [0; SIZE * SIZE];

        for (i, cell) in cells.iter_mut().enumerate() {
            *cell = self.0[i / SIZE][i % SIZE];
        }

        cells
    }

    /// Positions of the empty cells, in row-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..SIZE * SIZE)
            .map(|i| (i / SIZE, i % SIZE))
            .filter(|&(row, col)| self.0[row][col] == 0)
    }

    pub fn map_rows(self, f: impl FnMut(Line) -> Line) -> Self {
        Self(self.0.map(f))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.0 {
            for (col, &value) in line.iter().enumerate() {
                if col != 0 {
                    f.write_str(" ")?;
                }

                if value == 0 {
                    write!(f, "{:>6}", ".")?;
                } else {
                    write!(f, "{value:>6}")?;
                }
            }

            f.write_str("\n")?;
        }

        Ok(())
    }
}

const fn is_tile_value(value: u32) -> bool {
    value == 0 || (value >= 2 && value.is_power_of_two())
}

/// Compacts `line` towards index 0 and merges equal neighbours, leftmost pair first. A tile
/// produced by a merge does not merge again in the same pass.
///
/// Returns the new line and the number of merges performed.
pub fn slide_line(line: Line) -> (Line, u32) {
    let mut new_line = [0; SIZE];
    let mut len = 0;
    let mut merges = 0;
    let mut can_merge = false;

    for cell in line.into_iter().filter(|&cell| cell != 0) {
        if can_merge && new_line[len - 1] == cell {
            new_line[len - 1] += cell;
            merges += 1;
            can_merge = false;
        } else {
            new_line[len] = cell;
            len += 1;
            can_merge = true;
        }
    }

    (new_line, merges)
}

pub fn slide_and_merge_line(line: Line) -> Line {
    slide_line(line).0
}

/// Reverses every row.
pub fn mirror_board(board: Board) -> Board {
    board.map_rows(|mut line| {
        line.reverse();
        line
    })
}

/// Swaps rows and columns.
pub fn transpose_board(board: Board) -> Board {
    let mut rows = [[0; SIZE]; SIZE];

    for (i, line) in board.0.iter().enumerate() {
        for (j, &cell) in line.iter().enumerate() {
            rows[j][i] = cell;
        }
    }

    Board(rows)
}

/// Reorients `board` so that moving in `direction` becomes a slide to the left.
pub fn normalize_board(board: Board, direction: Direction) -> Board {
    match direction {
        Direction::Left => board,
        Direction::Right => mirror_board(board),
        Direction::Up => transpose_board(board),
        Direction::Down => mirror_board(transpose_board(board)),
    }
}

/// Inverse of [`normalize_board`].
pub fn denormalize_board(board: Board, direction: Direction) -> Board {
    match direction {
        Direction::Left => board,
        Direction::Right => mirror_board(board),
        Direction::Up => transpose_board(board),
        Direction::Down => transpose_board(mirror_board(board)),
    }
}
