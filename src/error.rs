//! Error types for puzzle loading, persistence and replay.
//!
//! Expected search outcomes (a blocked move, an unsolvable puzzle) are not
//! errors; they are reported as plain values by the board and solver.

use thiserror::Error;

use crate::moves::Direction;
use crate::pieces::PieceId;

/// Result type alias for fallible puzzle operations.
pub type Result<T> = std::result::Result<T, PuzzleError>;

/// Errors that can occur while loading puzzles or replaying move lists.
#[derive(Debug, Error)]
pub enum PuzzleError {
    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line of a puzzle or move file could not be understood.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The puzzle parsed but describes an impossible board.
    #[error("invalid puzzle: {0}")]
    InvalidPuzzle(String),

    /// A replayed step was not legal from the layout it was applied to.
    #[error("step {index}: piece {piece} cannot move {direction}")]
    IllegalStep {
        index: usize,
        piece: PieceId,
        direction: Direction,
    },
}

impl PuzzleError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
