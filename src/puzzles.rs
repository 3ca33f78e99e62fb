//! Built-in puzzle definitions, in the puzzle-file format.

use crate::board::Board;
use crate::error::Result;
use crate::puzzle_file;

/// A named puzzle compiled into the binary.
pub struct BuiltinPuzzle {
    pub name: &'static str,
    pub description: &'static str,
    pub source: &'static str,
}

impl BuiltinPuzzle {
    /// Parses the puzzle into a fresh board.
    pub fn board(&self) -> Result<Board> {
        puzzle_file::parse(self.source)
    }
}

/// One 1x1 piece crossing an empty 5x4 board corner to corner.
const CORNER: &str = "
H:5
W:4
T:single:1:1
P:0:0:0
S:0:3:4
";

/// The classic Klotski start. The goal has the 2x2 block one row lower,
/// which needs the two small pieces and the bar beneath it to drop first.
///
/// ```text
/// start   goal
/// 1001    1..1
/// 1001    1001
/// 1221    1001
/// 1331    1221
/// 3..3    3333
/// ```
const OPENING: &str = "
H:5
W:4
T:block:2:2
T:tall:1:2
T:wide:2:1
T:small:1:1
P:1:0:0
P:0:1:0
P:1:3:0
P:1:0:2
P:2:1:2
P:1:3:2
P:3:1:3
P:3:2:3
P:3:0:4
P:3:3:4
S:1:0:0
S:0:1:1
S:1:3:0
S:1:0:2
S:2:1:3
S:1:3:2
S:3:0:4
S:3:1:4
S:3:2:4
S:3:3:4
";

/// Two interchangeable small pieces under a bar. The goal only names types,
/// so it does not matter which small piece ends up in which goal cell.
///
/// ```text
/// start  goal
/// 00.    001
/// 11.    .1.
/// ```
const SHUFFLE: &str = "
H:2
W:3
T:bar:2:1
T:small:1:1
P:0:0:0
P:1:0:1
P:1:1:1
S:0:0:0
S:1:2:0
S:1:1:1
";

/// A full board: nothing can move.
const STUCK: &str = "
H:3
W:3
T:bar:3:1
T:side:1:1
T:centre:1:1
P:0:0:0
P:1:0:1
P:2:1:1
P:1:2:1
P:0:0:2
S:0:0:0
S:2:0:1
S:1:1:1
S:1:2:1
S:0:0:2
";

/// Two different pieces in a one-row corridor that would have to pass each
/// other.
const CORRIDOR: &str = "
H:1
W:3
T:first:1:1
T:second:1:1
P:0:0:0
P:1:1:0
S:1:0:0
S:0:1:0
";

/// All built-in puzzles.
pub const BUILTIN: &[BuiltinPuzzle] = &[
    BuiltinPuzzle {
        name: "corner",
        description: "single piece, corner to corner (7 moves)",
        source: CORNER,
    },
    BuiltinPuzzle {
        name: "opening",
        description: "classic Klotski start, drop the block one row (4 moves)",
        source: OPENING,
    },
    BuiltinPuzzle {
        name: "shuffle",
        description: "interchangeable small pieces (3 moves)",
        source: SHUFFLE,
    },
    BuiltinPuzzle {
        name: "stuck",
        description: "full board, unsolvable",
        source: STUCK,
    },
    BuiltinPuzzle {
        name: "corridor",
        description: "pieces that cannot pass each other, unsolvable",
        source: CORRIDOR,
    },
];

/// Looks up a built-in puzzle by name.
pub fn find(name: &str) -> Option<&'static BuiltinPuzzle> {
    BUILTIN.iter().find(|puzzle| puzzle.name == name)
}
