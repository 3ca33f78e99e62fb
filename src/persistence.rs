//! Saving and loading move lists.
//!
//! Text format, one step per line:
//! - lines starting with `#` are comments (the writer emits a header);
//! - every other non-blank line is `<piece id> <direction>`, with direction
//!   one of `left`, `right`, `up`, `down`.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::{PuzzleError, Result};
use crate::moves::Direction;
use crate::solver::Step;

/// Writes steps to `path`, with `title` in the comment header.
pub fn save(path: impl AsRef<Path>, title: &str, steps: &[Step]) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_steps(&mut file, title, steps)?;
    file.flush()?;
    Ok(())
}

/// Writes the text form of a move list.
pub fn write_steps(out: &mut impl Write, title: &str, steps: &[Step]) -> io::Result<()> {
    writeln!(out, "# {title}")?;
    writeln!(out, "# {} moves", steps.len())?;
    for step in steps {
        writeln!(out, "{} {}", step.piece, step.direction)?;
    }
    Ok(())
}

/// Reads a move list from `path`.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<Step>> {
    let text = fs::read_to_string(path)?;
    parse_steps(&text)
}

/// Parses the text form of a move list.
pub fn parse_steps(text: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut fields = trimmed.split_whitespace();
        let (Some(piece), Some(direction), None) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(PuzzleError::parse(line, "expected '<piece> <direction>'"));
        };
        let piece = piece
            .parse()
            .map_err(|_| PuzzleError::parse(line, format!("invalid piece id '{piece}'")))?;
        let direction: Direction = direction
            .parse()
            .map_err(|message: String| PuzzleError::parse(line, message))?;
        steps.push(Step { piece, direction });
    }
    Ok(steps)
}
