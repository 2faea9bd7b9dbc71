use crate::{transpose_board, Board, Line};

/// Number of adjacent equal non-empty pairs in a line.
pub fn row_merge_count(row: Line) -> u32 {
    row.windows(2)
        .filter(|pair| pair[0] != 0 && pair[0] == pair[1])
        .count() as u32
}

pub fn row_empty_count(row: Line) -> u32 {
    row.iter().filter(|&&cell| cell == 0).count() as u32
}

/// Sum of every tile value on the board. This is the game score.
pub fn tile_sum(board: Board) -> u32 {
    board.rows().iter().flatten().sum()
}

pub fn empty_count(board: Board) -> u32 {
    board.rows().iter().copied().map(row_empty_count).sum()
}

pub fn tile_count(board: Board) -> u32 {
    (crate::SIZE * crate::SIZE) as u32 - empty_count(board)
}

pub fn max_tile(board: Board) -> u32 {
    board.rows().iter().flatten().copied().max().unwrap_or(0)
}

/// Number of horizontally or vertically adjacent equal non-empty pairs.
pub fn adjacent_pair_count(board: Board) -> u32 {
    let row_pairs: u32 = board.rows().iter().copied().map(row_merge_count).sum();

    let column_pairs: u32 = transpose_board(board)
        .rows()
        .iter()
        .copied()
        .map(row_merge_count)
        .sum();

    row_pairs + column_pairs
}
