//! Puzzle definition loader.
//!
//! Line-oriented text format, fields separated by `:`:
//!
//! ```text
//! H:<height>                 board height
//! W:<width>                  board width
//! T:<label>:<width>:<height> next piece type (ids count up from 0)
//! P:<type>:<col>:<row>       piece of <type> anchored at (row, col)
//! S:<type>:<col>:<row>       goal anchor for a piece of <type>
//! ```
//!
//! Lines starting with `#` and blank lines are skipped. Goal cells not named
//! by an `S` line must be empty in the solved layout.

use std::fs;
use std::path::Path;

use log::warn;

use crate::board::Board;
use crate::error::{PuzzleError, Result};

/// A directive with its 1-based source line.
struct Placement {
    line: usize,
    type_id: usize,
    row: usize,
    col: usize,
}

/// Reads and parses a puzzle file.
pub fn load(path: impl AsRef<Path>) -> Result<Board> {
    let text = fs::read_to_string(path)?;
    parse(&text)
}

/// Parses a puzzle definition into a board with legal moves computed.
pub fn parse(text: &str) -> Result<Board> {
    let mut height = None;
    let mut width = None;
    let mut types: Vec<(usize, usize)> = Vec::new();
    let mut pieces = Vec::new();
    let mut goals = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = trimmed.split(':').map(str::trim).collect();

        match fields[0] {
            "H" => height = Some(positive(&fields, 1, line, "height")?),
            "W" => width = Some(positive(&fields, 1, line, "width")?),
            "T" => {
                expect_fields(&fields, 4, line)?;
                let type_width = positive(&fields, 2, line, "type width")?;
                let type_height = positive(&fields, 3, line, "type height")?;
                types.push((type_height, type_width));
            }
            "P" | "S" => {
                expect_fields(&fields, 4, line)?;
                let placement = Placement {
                    line,
                    type_id: number(&fields, 1, line, "type id")?,
                    col: number(&fields, 2, line, "column")?,
                    row: number(&fields, 3, line, "row")?,
                };
                if placement.type_id >= types.len() {
                    return Err(PuzzleError::parse(
                        line,
                        format!("unknown piece type {}", placement.type_id),
                    ));
                }
                if fields[0] == "P" {
                    pieces.push(placement);
                } else {
                    goals.push(placement);
                }
            }
            other => warn!("line {line}: ignoring unknown directive '{other}'"),
        }
    }

    let (Some(height), Some(width)) = (height, width) else {
        return Err(PuzzleError::InvalidPuzzle(
            "board height and width are required".to_string(),
        ));
    };

    if height.checked_mul(width).is_none() {
        return Err(PuzzleError::InvalidPuzzle(format!(
            "{height}x{width} board is too large"
        )));
    }

    let mut board = Board::new(height, width);
    for &(type_height, type_width) in &types {
        board.add_type(type_height, type_width);
    }

    for piece in &pieces {
        check_in_bounds(&board, piece)?;
        let shape = board.types()[piece.type_id];
        let overlaps = (piece.row..piece.row + shape.height).any(|row| {
            (piece.col..piece.col + shape.width).any(|col| board.cell(row, col).is_some())
        });
        if overlaps {
            return Err(PuzzleError::InvalidPuzzle(format!(
                "line {}: piece overlaps another piece",
                piece.line
            )));
        }
        board.add_piece(piece.type_id, piece.row, piece.col);
    }

    for goal in &goals {
        check_in_bounds(&board, goal)?;
        board.set_goal(goal.row, goal.col, goal.type_id);
    }

    board.refresh_legal_moves();
    Ok(board)
}

fn check_in_bounds(board: &Board, placement: &Placement) -> Result<()> {
    let shape = board.types()[placement.type_id];
    let inside = |start: usize, extent: usize, limit: usize| {
        start.checked_add(extent).is_some_and(|end| end <= limit)
    };
    if !inside(placement.row, shape.height, board.height())
        || !inside(placement.col, shape.width, board.width())
    {
        return Err(PuzzleError::InvalidPuzzle(format!(
            "line {}: {}x{} piece at ({}, {}) exceeds the {}x{} board",
            placement.line,
            shape.height,
            shape.width,
            placement.row,
            placement.col,
            board.height(),
            board.width()
        )));
    }
    Ok(())
}

fn expect_fields(fields: &[&str], count: usize, line: usize) -> Result<()> {
    if fields.len() < count {
        return Err(PuzzleError::parse(
            line,
            format!("'{}' needs {} fields, found {}", fields[0], count, fields.len()),
        ));
    }
    Ok(())
}

fn number(fields: &[&str], position: usize, line: usize, what: &str) -> Result<usize> {
    let field = fields
        .get(position)
        .ok_or_else(|| PuzzleError::parse(line, format!("missing {what}")))?;
    field
        .parse()
        .map_err(|_| PuzzleError::parse(line, format!("invalid {what} '{field}'")))
}

fn positive(fields: &[&str], position: usize, line: usize, what: &str) -> Result<usize> {
    match number(fields, position, line, what)? {
        0 => Err(PuzzleError::parse(line, format!("{what} must be positive"))),
        value => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "
# two squares and a bar
H:3
W:3
T:bar:2:1
T:dot:1:1
P:0:0:0
P:1:2:0
P:1:0:2
S:0:1:2
S:1:0:0
S:1:2:0
";

    #[test]
    fn test_parse_small_puzzle() {
        let board = parse(SMALL).unwrap();
        assert_eq!((board.height(), board.width()), (3, 3));
        assert_eq!(board.types().len(), 2);
        assert_eq!(board.types()[0].width, 2);
        assert_eq!(board.types()[0].height, 1);
        assert_eq!(board.pieces().len(), 3);
        insta::assert_snapshot!(board.render(), @r"
        001
        ...
        1..
        ");
        insta::assert_snapshot!(board.render_goal(), @r"
        1.1
        ...
        .0.
        ");
        assert!(!board.pieces()[1].legal_moves.is_empty(), "moves computed");
    }

    #[test]
    fn test_missing_dimensions() {
        let error = parse("H:3\nT:a:1:1\n").unwrap_err();
        assert!(matches!(error, PuzzleError::InvalidPuzzle(_)));
    }

    #[test]
    fn test_unknown_type_reports_line() {
        let error = parse("H:2\nW:2\nT:a:1:1\nP:1:0:0\n").unwrap_err();
        match error {
            PuzzleError::Parse { line, message } => {
                assert_eq!(line, 4);
                assert!(message.contains("unknown piece type"), "{message}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_bad_number_reports_line() {
        let error = parse("H:two\n").unwrap_err();
        assert!(matches!(error, PuzzleError::Parse { line: 1, .. }));
        let error = parse("H:0\n").unwrap_err();
        assert!(matches!(error, PuzzleError::Parse { line: 1, .. }));
        let error = parse("H:2\nW:2\nT:a:1\n").unwrap_err();
        assert!(matches!(error, PuzzleError::Parse { line: 3, .. }));
    }

    #[test]
    fn test_out_of_bounds_piece() {
        let error = parse("H:2\nW:2\nT:bar:2:1\nP:0:1:0\n").unwrap_err();
        assert!(matches!(error, PuzzleError::InvalidPuzzle(_)));
    }

    #[test]
    fn test_huge_coordinates_are_out_of_bounds() {
        for directive in ["P", "S"] {
            let text = format!("H:2\nW:2\nT:a:1:1\n{directive}:0:{}:0\n", usize::MAX);
            let error = parse(&text).unwrap_err();
            assert!(matches!(error, PuzzleError::InvalidPuzzle(_)), "{directive}");

            let text = format!("H:2\nW:2\nT:a:1:1\n{directive}:0:0:{}\n", usize::MAX);
            let error = parse(&text).unwrap_err();
            assert!(matches!(error, PuzzleError::InvalidPuzzle(_)), "{directive}");
        }
    }

    #[test]
    fn test_board_too_large() {
        let error = parse("H:4294967296\nW:4294967296\n").unwrap_err();
        match error {
            PuzzleError::InvalidPuzzle(message) => assert!(message.contains("too large"), "{message}"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_overlapping_pieces() {
        let error = parse("H:2\nW:2\nT:bar:2:1\nT:dot:1:1\nP:0:0:0\nP:1:1:0\n").unwrap_err();
        match error {
            PuzzleError::InvalidPuzzle(message) => assert!(message.contains("line 6"), "{message}"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_unknown_directives_are_skipped() {
        let board = parse("H:1\nW:2\nX:whatever\nT:a:1:1\nP:0:0:0\nS:0:1:0\n").unwrap();
        assert_eq!(board.pieces().len(), 1);
        assert_eq!(board.goal(), &[None, Some(0)]);
    }
}
