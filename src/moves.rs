//! Slide directions and legal-move generation.
//!
//! A move slides one piece by exactly one cell. The legal moves of every
//! piece are cached on the piece and refreshed after each successful move,
//! since relocating one piece can open or block moves for any other.

use std::fmt;
use std::str::FromStr;

use crate::board::Board;
use crate::pieces::PieceId;

/// One-cell slide direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// All directions, in the order moves are generated.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Row and column offsets of a one-cell slide.
    #[inline]
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
        }
    }

    #[inline]
    const fn bit(self) -> u8 {
        match self {
            Direction::Left => 1,
            Direction::Right => 1 << 1,
            Direction::Up => 1 << 2,
            Direction::Down => 1 << 3,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        })
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(Direction::Left),
            "right" | "r" => Ok(Direction::Right),
            "up" | "u" => Ok(Direction::Up),
            "down" | "d" => Ok(Direction::Down),
            other => Err(format!("unknown direction '{other}'")),
        }
    }
}

/// A set of directions stored as a 4-bit mask.
///
/// Iteration always yields directions in `Direction::ALL` order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirectionSet(u8);

impl DirectionSet {
    pub const EMPTY: Self = Self(0);

    #[inline]
    pub fn insert(&mut self, direction: Direction) {
        self.0 |= direction.bit();
    }

    #[inline]
    pub fn contains(self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .into_iter()
            .filter(move |&direction| self.contains(direction))
    }
}

impl FromIterator<Direction> for DirectionSet {
    fn from_iter<T: IntoIterator<Item = Direction>>(iter: T) -> Self {
        let mut set = DirectionSet::EMPTY;
        for direction in iter {
            set.insert(direction);
        }
        set
    }
}

/// Computes the directions in which a piece can currently slide.
///
/// Each candidate is tested with [`Board::fits`], which ignores the piece's
/// own footprint, so this never mutates the board.
pub fn legal_moves(board: &Board, piece_id: PieceId) -> DirectionSet {
    let piece = board.piece(piece_id);
    Direction::ALL
        .into_iter()
        .filter(|&direction| {
            let (row_offset, col_offset) = direction.offset();
            board.fits(
                piece_id,
                piece.row as isize + row_offset,
                piece.col as isize + col_offset,
            )
        })
        .collect()
}

impl Board {
    /// Recomputes and stores the legal moves of one piece.
    pub fn recompute_legal_moves(&mut self, piece_id: PieceId) {
        let moves = legal_moves(self, piece_id);
        self.pieces_mut()[piece_id].legal_moves = moves;
    }

    /// Recomputes the legal moves of every piece.
    pub fn refresh_legal_moves(&mut self) {
        for piece_id in 0..self.pieces().len() {
            self.recompute_legal_moves(piece_id);
        }
    }

    /// Every currently legal `(piece, direction)` pair, pieces in id order.
    pub fn available_moves(&self) -> impl Iterator<Item = (PieceId, Direction)> + '_ {
        self.pieces().iter().flat_map(|piece| {
            piece
                .legal_moves
                .iter()
                .map(move |direction| (piece.id, direction))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_board() -> Board {
        // 3x3 with a single 1x1 piece in the centre
        let mut board = Board::new(3, 3);
        let single = board.add_type(1, 1);
        board.add_piece(single, 1, 1);
        board.refresh_legal_moves();
        board
    }

    #[test]
    fn test_direction_set_iterates_in_generation_order() {
        let set: DirectionSet = [Direction::Down, Direction::Left, Direction::Up]
            .into_iter()
            .collect();
        let order: Vec<Direction> = set.iter().collect();
        assert_eq!(order, vec![Direction::Left, Direction::Up, Direction::Down]);
        assert_eq!(set.len(), 3);
        assert!(!set.contains(Direction::Right));
    }

    #[test]
    fn test_direction_parse_and_display_agree() {
        for direction in Direction::ALL {
            let parsed: Direction = direction.to_string().parse().unwrap();
            assert_eq!(parsed, direction);
        }
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_centre_piece_can_move_everywhere() {
        let board = open_board();
        let moves = board.piece(0).legal_moves;
        assert_eq!(moves.len(), 4);
    }

    #[test]
    fn test_corner_piece_cannot_leave_board() {
        let mut board = Board::new(3, 3);
        let single = board.add_type(1, 1);
        board.add_piece(single, 0, 0);
        board.refresh_legal_moves();
        let moves: Vec<Direction> = board.piece(0).legal_moves.iter().collect();
        assert_eq!(moves, vec![Direction::Right, Direction::Down]);
    }

    #[test]
    fn test_neighbours_block_each_other() {
        // 1x3 row: [A][B][.]
        let mut board = Board::new(1, 3);
        let single = board.add_type(1, 1);
        board.add_piece(single, 0, 0);
        board.add_piece(single, 0, 1);
        board.refresh_legal_moves();

        assert!(board.piece(0).legal_moves.is_empty());
        let moves: Vec<Direction> = board.piece(1).legal_moves.iter().collect();
        assert_eq!(moves, vec![Direction::Right]);

        let all: Vec<(PieceId, Direction)> = board.available_moves().collect();
        assert_eq!(all, vec![(1, Direction::Right)]);
    }

    #[test]
    fn test_moves_refresh_for_other_pieces() {
        let mut board = Board::new(1, 3);
        let single = board.add_type(1, 1);
        board.add_piece(single, 0, 0);
        board.add_piece(single, 0, 1);
        board.refresh_legal_moves();

        assert!(board.try_move(1, Direction::Right));
        // piece 0 was blocked, the move freed it
        assert!(board.piece(0).legal_moves.contains(Direction::Right));
        assert!(board.piece(1).legal_moves.contains(Direction::Left));
    }
}
