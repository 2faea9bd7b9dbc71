/// Rejected board input from outside the engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("cell ({row}, {col}) holds {value}, which is not 0 or a power of two >= 2")]
    InvalidTile { row: usize, col: usize, value: u32 },

    #[error("cell ({row}, {col}) holds {value}, larger than the 131072 tile")]
    TileTooLarge { row: usize, col: usize, value: u32 },

    #[error("expected 16 cells, got {0}")]
    WrongLength(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised direction {0:?}")]
pub struct ParseDirectionError(pub String);
