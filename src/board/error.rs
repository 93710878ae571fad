use thiserror::Error;

/// Everything that can go wrong against a running `Board`, plus board-file parse
/// failures. Kept as a concrete enum (rather than bare `anyhow::Error`, as the
/// teacher's engine uses) because callers match on *kind*, not just message text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("out of bounds: ({row}, {col})")]
    OutOfBounds { row: usize, col: usize },

    #[error("empty space")]
    EmptySpace,

    #[error("controlled")]
    Controlled,

    #[error("cannot choose same card")]
    SameCard,

    #[error("unknown player {0:?}")]
    UnknownPlayer(String),

    #[error("invalid player id {0:?}: must be non-empty and whitespace-free")]
    InvalidPlayerId(String),

    #[error("timed out waiting for cell ({row}, {col})")]
    Timeout { row: usize, col: usize },

    #[error("malformed board: {0}")]
    MalformedBoard(String),

    #[error("bad request: {0}")]
    BadRequest(String),
}
