//! Piece type catalog and piece instances.
//!
//! A piece type is a rectangle shape (height x width). Pieces are instances of
//! a type anchored at their top-left cell. Both are numbered sequentially in
//! registration order, and those numbers double as indices into the board's
//! type and piece lists.

use crate::moves::DirectionSet;

/// Index of a piece type in the board's type list.
pub type TypeId = usize;

/// Index of a piece in the board's piece list.
pub type PieceId = usize;

/// A rectangular piece shape.
///
/// Type ids are the same numbering used by goal layouts, so registration
/// order is significant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PieceType {
    pub id: TypeId,
    pub height: usize,
    pub width: usize,
}

/// A piece on the board.
#[derive(Clone, Debug)]
pub struct Piece {
    /// Equal to the piece's index in the board's piece list.
    pub id: PieceId,
    pub type_id: TypeId,
    /// Anchor (top-left) row.
    pub row: usize,
    /// Anchor (top-left) column.
    pub col: usize,
    /// Directions the piece can currently slide one cell.
    pub legal_moves: DirectionSet,
}

impl Piece {
    pub(crate) fn new(id: PieceId, type_id: TypeId, row: usize, col: usize) -> Self {
        Self {
            id,
            type_id,
            row,
            col,
            legal_moves: DirectionSet::EMPTY,
        }
    }
}

/// Returns the char used to display a type id: `0-9`, then `A-Z`.
#[inline]
pub fn type_char(type_id: TypeId) -> char {
    match type_id {
        0..=9 => char::from(b'0' + type_id as u8),
        10..=35 => char::from(b'A' + (type_id - 10) as u8),
        _ => '#',
    }
}
