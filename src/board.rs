//! Board state: occupancy grid, pieces, types and goal.
//!
//! The grid is a flat row-major array where each cell holds the type id of
//! the piece covering it, or `None` when empty. Pieces are identified in
//! layouts by their anchor (top-left) cell only.
//!
//! Between public calls the board keeps these invariants:
//! - every occupied cell is covered by exactly one piece of that type;
//! - piece rectangles never overlap and stay inside the grid;
//! - `pieces[i].id == i`.

use std::rc::Rc;

use crate::moves::Direction;
use crate::pieces::{type_char, Piece, PieceId, PieceType, TypeId};

/// Flattened board snapshot: the piece id anchored at each cell, if any.
///
/// Shared between search nodes, so it is reference counted.
pub type Layout = Rc<[Option<PieceId>]>;

/// A rectangular sliding-block board.
#[derive(Clone, Debug)]
pub struct Board {
    height: usize,
    width: usize,
    grid: Vec<Option<TypeId>>,
    pieces: Vec<Piece>,
    types: Vec<PieceType>,
    goal: Vec<Option<TypeId>>,
}

impl Board {
    /// Creates an empty board with an all-empty goal.
    ///
    /// Panics if `height * width` overflows; [`crate::puzzle_file::parse`]
    /// rejects such sizes before building a board.
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            grid: vec![None; height * width],
            pieces: Vec::new(),
            types: Vec::new(),
            goal: vec![None; height * width],
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of cells, which is also the length of every layout.
    pub fn cell_count(&self) -> usize {
        self.height * self.width
    }

    /// Registers a new piece type and returns its id.
    pub fn add_type(&mut self, height: usize, width: usize) -> TypeId {
        let id = self.types.len();
        self.types.push(PieceType { id, height, width });
        id
    }

    /// Places a new piece and marks its footprint on the grid.
    ///
    /// Placement is not validated; the loader is responsible for keeping
    /// pieces in bounds and apart.
    pub fn add_piece(&mut self, type_id: TypeId, row: usize, col: usize) -> PieceId {
        let id = self.pieces.len();
        self.pieces.push(Piece::new(id, type_id, row, col));
        self.mark_footprint(id, true);
        id
    }

    /// Requires a piece of `type_id` to be anchored at (row, col) when solved.
    pub fn set_goal(&mut self, row: usize, col: usize, type_id: TypeId) {
        let index = self.index(row, col);
        self.goal[index] = Some(type_id);
    }

    pub fn goal(&self) -> &[Option<TypeId>] {
        &self.goal
    }

    pub fn grid(&self) -> &[Option<TypeId>] {
        &self.grid
    }

    /// Type id covering a cell, or `None` when empty.
    pub fn cell(&self, row: usize, col: usize) -> Option<TypeId> {
        debug_assert!(
            row < self.height && col < self.width,
            "cell ({row}, {col}) outside the {}x{} board",
            self.height,
            self.width
        );
        self.grid[self.index(row, col)]
    }

    pub fn types(&self) -> &[PieceType] {
        &self.types
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub(crate) fn pieces_mut(&mut self) -> &mut [Piece] {
        &mut self.pieces
    }

    #[inline]
    pub fn piece(&self, piece_id: PieceId) -> &Piece {
        &self.pieces[piece_id]
    }

    /// Shape of a piece.
    #[inline]
    pub fn shape(&self, piece_id: PieceId) -> PieceType {
        self.types[self.pieces[piece_id].type_id]
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// Returns true if the piece could sit with its anchor at (row, col).
    ///
    /// The piece's own current footprint counts as empty, so a piece always
    /// fits where it already is.
    pub fn fits(&self, piece_id: PieceId, row: isize, col: isize) -> bool {
        let shape = self.shape(piece_id);
        if row < 0
            || col < 0
            || row as usize + shape.height > self.height
            || col as usize + shape.width > self.width
        {
            return false;
        }
        let (row, col) = (row as usize, col as usize);
        let piece = &self.pieces[piece_id];
        let own = |r: usize, c: usize| {
            (piece.row..piece.row + shape.height).contains(&r)
                && (piece.col..piece.col + shape.width).contains(&c)
        };

        (row..row + shape.height).all(|r| {
            (col..col + shape.width).all(|c| self.grid[self.index(r, c)].is_none() || own(r, c))
        })
    }

    /// Slides a piece one cell, returning whether it moved.
    ///
    /// A failed move leaves the grid and the piece untouched. A successful
    /// move refreshes the legal moves of every piece.
    pub fn try_move(&mut self, piece_id: PieceId, direction: Direction) -> bool {
        self.mark_footprint(piece_id, false);

        let Some((row, col)) = self.slide_target(piece_id, direction) else {
            self.mark_footprint(piece_id, true);
            return false;
        };

        let piece = &mut self.pieces[piece_id];
        piece.row = row;
        piece.col = col;
        self.mark_footprint(piece_id, true);
        self.refresh_legal_moves();
        true
    }

    /// Computes the anchor after a one-cell slide, checking only the strip of
    /// cells the piece would newly enter. Expects the piece to be lifted.
    fn slide_target(&self, piece_id: PieceId, direction: Direction) -> Option<(usize, usize)> {
        let piece = &self.pieces[piece_id];
        let shape = self.shape(piece_id);
        let (top, left) = (piece.row, piece.col);
        let mut rows = top..top + shape.height;
        let mut cols = left..left + shape.width;

        match direction {
            Direction::Left => {
                if left == 0 {
                    return None;
                }
                rows.all(|row| self.grid[self.index(row, left - 1)].is_none())
                    .then_some((top, left - 1))
            }
            Direction::Right => {
                // free columns to the right of the piece must be at least one
                if left + shape.width + 1 > self.width {
                    return None;
                }
                rows.all(|row| self.grid[self.index(row, left + shape.width)].is_none())
                    .then_some((top, left + 1))
            }
            Direction::Up => {
                if top == 0 {
                    return None;
                }
                cols.all(|col| self.grid[self.index(top - 1, col)].is_none())
                    .then_some((top - 1, left))
            }
            Direction::Down => {
                if top + shape.height + 1 > self.height {
                    return None;
                }
                cols.all(|col| self.grid[self.index(top + shape.height, col)].is_none())
                    .then_some((top + 1, left))
            }
        }
    }

    /// Writes (or clears) a piece's footprint on the grid.
    fn mark_footprint(&mut self, piece_id: PieceId, place: bool) {
        let (top, left) = (self.pieces[piece_id].row, self.pieces[piece_id].col);
        let shape = self.shape(piece_id);
        let value = place.then_some(shape.id);
        for row in top..top + shape.height {
            let start = self.index(row, left);
            self.grid[start..start + shape.width].fill(value);
        }
    }

    /// Snapshots the current layout: each piece's id at its anchor cell.
    pub fn capture_layout(&self) -> Layout {
        let mut layout = vec![None; self.cell_count()];
        for piece in &self.pieces {
            layout[self.index(piece.row, piece.col)] = Some(piece.id);
        }
        layout.into()
    }

    /// Resets the grid and piece positions to a captured layout.
    ///
    /// Legal moves are not refreshed; callers either move straight away or
    /// call [`Board::refresh_legal_moves`].
    pub fn apply_layout(&mut self, layout: &[Option<PieceId>]) {
        debug_assert_eq!(layout.len(), self.cell_count());
        self.grid.fill(None);
        for (cell, slot) in layout.iter().enumerate() {
            let Some(piece_id) = *slot else {
                continue;
            };
            let piece = &mut self.pieces[piece_id];
            piece.row = cell / self.width;
            piece.col = cell % self.width;
            self.mark_footprint(piece_id, true);
        }
    }

    /// Returns true if every cell of the layout agrees with the goal.
    ///
    /// Empty goal cells must have no anchored piece; other goal cells need a
    /// piece of exactly that type anchored there.
    pub fn matches(&self, layout: &[Option<PieceId>]) -> bool {
        layout
            .iter()
            .zip(&self.goal)
            .all(|(slot, &wanted)| slot.map(|piece_id| self.pieces[piece_id].type_id) == wanted)
    }

    /// Renders the occupancy grid, one line per row.
    pub fn render(&self) -> String {
        format_grid(&self.grid, self.width)
    }

    /// Renders the goal anchors, one line per row.
    pub fn render_goal(&self) -> String {
        format_grid(&self.goal, self.width)
    }
}

/// Formats a flat grid of type ids as text: `0-9`, `A-Z`, `.` for empty.
///
/// Rows are separated by newlines with no trailing newline.
pub fn format_grid(cells: &[Option<TypeId>], width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    cells
        .chunks(width)
        .map(|row| {
            row.iter()
                .map(|cell| cell.map_or('.', type_char))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
