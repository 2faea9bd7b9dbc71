use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    logic::{self, MoveResult},
    metrics, Board, Direction,
};

/// Number of tiles placed on a fresh board.
pub const INITIAL_TILES: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Session {
    pub board: Board,
    /// Sum of all tiles on `board` after the latest accepted move.
    pub score: u32,
    pub game_over: bool,
}

impl Session {
    /// Starts a session from an arbitrary board. The score is derived from the board.
    pub fn from_board(board: Board) -> Self {
        Self {
            board,
            score: metrics::tile_sum(board),
            game_over: !logic::has_any_move_available(board),
        }
    }
}

pub fn new_game(rng: &mut impl Rng) -> Session {
    let board = (0..INITIAL_TILES).fold(logic::create_empty_board(), |board, _| {
        logic::spawn_random_tile(rng, board)
    });

    Session {
        board,
        score: 0,
        game_over: false,
    }
}

/// Applies one directional input. A move that changes nothing, or any move once the game is
/// over, returns the session unchanged.
pub fn apply_move(session: &Session, direction: Direction, rng: &mut impl Rng) -> Session {
    if session.game_over {
        return *session;
    }

    let MoveResult {
        board,
        moved,
        merges,
    } = logic::move_board(session.board, direction);

    if !moved {
        debug!(%direction, "move rejected");
        return *session;
    }

    let board = logic::spawn_random_tile(rng, board);
    let score = metrics::tile_sum(board);
    let game_over = !logic::has_any_move_available(board);

    debug!(%direction, merges, score, "move accepted");

    if game_over {
        info!(score, max_tile = metrics::max_tile(board), "game over");
    }

    Session {
        board,
        score,
        game_over,
    }
}

/// A session together with the random source its spawns are drawn from. Inputs are applied one
/// at a time, each against the most recently committed board.
pub struct Game<R> {
    session: Session,
    rng: R,
}

impl<R> Game<R>
where
    R: Rng,
{
    pub fn new(mut rng: R) -> Self {
        let session = new_game(&mut rng);

        Self { session, rng }
    }

    pub fn from_session(session: Session, rng: R) -> Self {
        Self { session, rng }
    }

    pub const fn session(&self) -> &Session {
        &self.session
    }

    pub const fn is_over(&self) -> bool {
        self.session.game_over
    }

    /// Returns whether the input was accepted.
    pub fn apply(&mut self, direction: Direction) -> bool {
        let next = apply_move(&self.session, direction, &mut self.rng);
        let accepted = next != self.session;

        self.session = next;

        accepted
    }
}
