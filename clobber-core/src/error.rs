//! Error types for move construction and text parsing

use thiserror::Error;

/// Errors raised when a move cannot be built or applied
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("cell ({row}, {col}) is off the board")]
    OffBoard { row: i32, col: i32 },

    #[error("cells ({r1}, {c1}) and ({r2}, {c2}) are not orthogonally adjacent")]
    NotAdjacent { r1: i32, c1: i32, r2: i32, c2: i32 },

    #[error("column {0} is out of range")]
    ColumnOutOfRange(i32),

    #[error("column {0} is full")]
    ColumnFull(usize),

    #[error("move {0} is not legal in this position")]
    Illegal(String),

    #[error("the game is already over")]
    GameOver,
}

/// Errors raised when parsing move or board text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected {expected} integers, found {found}")]
    WrongArity { expected: usize, found: usize },

    #[error("invalid integer {0:?}")]
    InvalidInteger(String),

    #[error("invalid board: {0}")]
    InvalidBoard(String),

    #[error(transparent)]
    Move(#[from] MoveError),
}

/// Parse whitespace-separated integers, requiring exactly `expected` of them
pub(crate) fn parse_ints(text: &str, expected: usize) -> Result<Vec<i32>, ParseError> {
    let values = text
        .split_whitespace()
        .map(|tok| {
            tok.parse::<i32>()
                .map_err(|_| ParseError::InvalidInteger(tok.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if values.len() != expected {
        return Err(ParseError::WrongArity {
            expected,
            found: values.len(),
        });
    }
    Ok(values)
}
