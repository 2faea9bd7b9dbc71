use rand::Rng;
use tracing::trace;

use crate::{denormalize_board, metrics, normalize_board, slide_line, Board, Direction};

/// Tile value spawned with probability 0.9.
pub const SMALL_TILE: u32 = 2;
/// Tile value spawned with probability 0.1.
pub const LARGE_TILE: u32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveResult {
    pub board: Board,
    /// Whether any cell differs from the board the move was applied to.
    pub moved: bool,
    pub merges: u32,
}

pub const fn create_empty_board() -> Board {
    Board::EMPTY
}

/// Places a 2 (90%) or 4 (10%) in an empty cell chosen uniformly at random. A full board is
/// returned unchanged.
pub fn spawn_random_tile(rng: &mut impl Rng, board: Board) -> Board {
    let slot_count = metrics::empty_count(board);

    if slot_count == 0 {
        return board;
    }

    let rand = rng.gen_range(0..(slot_count * 10));

    let slot_idx = rand / 10;
    let tile = if rand % 10 == 0 { LARGE_TILE } else { SMALL_TILE };

    // slot_idx < slot_count, the number of empty cells, so nth always yields a cell.
    board
        .empty_cells()
        .nth(slot_idx as usize)
        .map_or(board, |(row, col)| {
            trace!(row, col, tile, "spawned tile");

            board.with_tile(row, col, tile)
        })
}

/// Slides every row of `board` to the left, returning the new board and the merge count.
pub fn do_move(board: Board) -> (Board, u32) {
    let mut merges = 0;

    let new_board = board.map_rows(|row| {
        let (row, row_merges) = slide_line(row);
        merges += row_merges;
        row
    });

    (new_board, merges)
}

pub fn move_board(board: Board, direction: Direction) -> MoveResult {
    let (new_board, merges) = do_move(normalize_board(board, direction));
    let new_board = denormalize_board(new_board, direction);

    MoveResult {
        board: new_board,
        moved: new_board != board,
        merges,
    }
}

pub fn try_move(board: Board, direction: Direction) -> Option<Board> {
    let result = move_board(board, direction);

    result.moved.then_some(result.board)
}

/// Result of every move, indexed by `Direction as usize`. `None` marks a move that changes
/// nothing.
pub fn try_all_moves(board: Board) -> [Option<Board>; 4] {
    let mut moves = [None; 4];

    for direction in Direction::iter() {
        moves[direction as usize] = try_move(board, direction);
    }

    moves
}

/// True while the board has an empty cell or two equal tiles side by side.
pub fn has_any_move_available(board: Board) -> bool {
    metrics::empty_count(board) > 0 || metrics::adjacent_pair_count(board) > 0
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn board(rows: [[u32; 4]; 4]) -> Board {
        Board::from_rows(rows).unwrap()
    }

    #[test]
    fn test_move_left() {
        let game = board([[2, 4, 8, 16], [2, 8, 8, 4], [4, 0, 0, 4], [2, 0, 0, 4]]);
        let result = move_board(game, Direction::Left);

        assert!(result.moved);
        assert_eq!(result.merges, 2);
        assert_eq!(
            result.board,
            board([[2, 4, 8, 16], [2, 16, 4, 0], [8, 0, 0, 0], [2, 4, 0, 0]])
        );
    }

    #[test]
    fn test_move_right() {
        let game = board([[2, 4, 8, 16], [2, 8, 8, 4], [4, 0, 0, 4], [2, 0, 0, 4]]);
        let result = move_board(game, Direction::Right);

        assert_eq!(
            result.board,
            board([[2, 4, 8, 16], [0, 2, 16, 4], [0, 0, 0, 8], [0, 0, 2, 4]])
        );
    }

    #[test]
    fn test_move_up() {
        let game = board([[2, 2, 4, 2], [4, 8, 0, 0], [8, 8, 0, 0], [16, 2, 4, 4]]);
        let result = move_board(game, Direction::Up);

        assert_eq!(result.merges, 2);
        assert_eq!(
            result.board,
            board([[2, 2, 8, 2], [4, 16, 0, 4], [8, 2, 0, 0], [16, 0, 0, 0]])
        );
    }

    #[test]
    fn test_move_down() {
        let game = board([[2, 2, 4, 2], [4, 8, 0, 0], [8, 8, 0, 0], [16, 2, 4, 4]]);
        let result = move_board(game, Direction::Down);

        assert_eq!(
            result.board,
            board([[2, 0, 0, 0], [4, 2, 0, 0], [8, 16, 0, 2], [16, 2, 8, 4]])
        );
    }

    #[test]
    fn down_merges_from_the_bottom() {
        let game = board([[2, 0, 0, 0], [2, 0, 0, 0], [2, 0, 0, 0], [0, 0, 0, 0]]);
        let result = move_board(game, Direction::Down);

        assert_eq!(
            result.board,
            board([[0, 0, 0, 0], [0, 0, 0, 0], [2, 0, 0, 0], [4, 0, 0, 0]])
        );
    }

    #[test]
    fn settled_board_does_not_move() {
        let game = board([[2, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);

        assert!(!move_board(game, Direction::Left).moved);
        assert!(!move_board(game, Direction::Up).moved);
        assert_eq!(try_move(game, Direction::Left), None);

        let moves = try_all_moves(game);
        assert!(moves[Direction::Down as usize].is_some());
        assert!(moves[Direction::Right as usize].is_some());
        assert!(moves[Direction::Up as usize].is_none());
    }

    #[test]
    fn other_tile_decides_whether_left_moves() {
        let game = board([[2, 0, 0, 0], [0, 0, 0, 0], [0, 0, 4, 0], [0, 0, 0, 0]]);
        let result = move_board(game, Direction::Left);

        assert!(result.moved);
        assert_eq!(result.board.row(0), [2, 0, 0, 0]);
        assert_eq!(result.board.row(2), [4, 0, 0, 0]);

        let game = board([[2, 0, 0, 0], [0, 0, 0, 0], [4, 0, 0, 0], [0, 0, 0, 0]]);
        assert!(!move_board(game, Direction::Left).moved);
    }

    #[test]
    fn spawn_fills_board() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut game = create_empty_board();

        for filled in 1..=16 {
            game = spawn_random_tile(&mut rng, game);
            assert_eq!(metrics::tile_count(game), filled);
        }

        assert_eq!(spawn_random_tile(&mut rng, game), game);
        assert!(game
            .to_flat()
            .iter()
            .all(|&cell| cell == SMALL_TILE || cell == LARGE_TILE));
    }

    #[test]
    fn spawn_is_deterministic_for_a_seed() {
        let spawn = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let game = spawn_random_tile(&mut rng, create_empty_board());
            spawn_random_tile(&mut rng, game)
        };

        assert_eq!(spawn(7), spawn(7));
    }

    #[test]
    fn spawn_picks_the_only_empty_cell() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let game = board([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 0, 4], [4, 2, 4, 2]]);
        let game = spawn_random_tile(&mut rng, game);

        assert!(matches!(game.get(2, 2), SMALL_TILE | LARGE_TILE));
    }

    #[test]
    fn spawn_picks_empty_cells_uniformly() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let game = board([[2, 0, 4, 8], [16, 32, 0, 64], [0, 128, 256, 512], [1024, 2, 4, 0]]);
        let empty: Vec<_> = game.empty_cells().collect();
        let mut hits = [0u32; 4];

        for _ in 0..8_000 {
            let spawned = spawn_random_tile(&mut rng, game);

            for (i, &(row, col)) in empty.iter().enumerate() {
                if spawned.get(row, col) != 0 {
                    hits[i] += 1;
                }
            }

            for (row, col) in (0..16).map(|i| (i / 4, i % 4)) {
                if game.get(row, col) != 0 {
                    assert_eq!(spawned.get(row, col), game.get(row, col));
                }
            }
        }

        assert_eq!(hits.iter().sum::<u32>(), 8_000);

        for count in hits {
            assert!((1_500..=2_500).contains(&count), "{hits:?}");
        }
    }

    #[test]
    fn try_all_moves_is_indexed_by_direction() {
        let game = board([[2, 0, 0, 0], [0, 0, 0, 0], [0, 4, 0, 0], [0, 0, 0, 0]]);
        let moves = try_all_moves(game);

        for direction in Direction::iter() {
            assert_eq!(moves[direction as usize], try_move(game, direction), "{direction}");
        }

        assert_eq!(
            moves[Direction::Left as usize],
            Some(board([[2, 0, 0, 0], [0, 0, 0, 0], [4, 0, 0, 0], [0, 0, 0, 0]]))
        );
    }

    #[test]
    fn spawn_tile_distribution() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let large = (0..10_000)
            .filter(|_| {
                let game = spawn_random_tile(&mut rng, create_empty_board());
                metrics::tile_sum(game) == LARGE_TILE
            })
            .count();

        assert!((800..1200).contains(&large), "{large}");
    }

    #[test]
    fn terminal_state() {
        let checkerboard = board([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert!(!has_any_move_available(checkerboard));
        assert!(try_all_moves(checkerboard).iter().all(Option::is_none));

        let one_empty = board([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 0]]);
        assert!(has_any_move_available(one_empty));

        let vertical_pair = board([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [2, 8, 16, 32]]);
        assert!(has_any_move_available(vertical_pair));

        let horizontal_pair = board([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [8, 8, 16, 2]]);
        assert!(has_any_move_available(horizontal_pair));
    }
}
