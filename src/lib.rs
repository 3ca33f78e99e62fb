//! Sliding Block Puzzle Solver Library
//!
//! Solves Klotski-style puzzles: rectangular pieces on a rectangular board,
//! moved one cell at a time, until the layout matches a goal. The search is
//! breadth-first, so the first solution found uses the fewest moves.
//! Pieces of the same type are interchangeable, both when matching the
//! goal and when deduplicating visited layouts.

pub mod board;
pub mod error;
pub mod moves;
pub mod persistence;
pub mod pieces;
pub mod puzzle_file;
pub mod puzzles;
pub mod solver;
pub mod trie;

pub use board::{Board, Layout};
pub use error::{PuzzleError, Result};
pub use moves::{Direction, DirectionSet};
pub use pieces::{Piece, PieceId, PieceType, TypeId};
pub use solver::{
    replay, solve, IndexKind, SearchOutcome, SearchStats, SearchStrategy, Solution, SolveOptions,
    Step,
};
pub use trie::{HashedLayouts, LayoutTrie, VisitedIndex};
