//! Sliding Block Puzzle Solver
//!
//! Solves Klotski-style sliding block puzzles from the built-in collection
//! or from puzzle files, prints the move sequence, and replays saved
//! solutions to check them.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::LevelFilter;

use klotski::board::format_grid;
use klotski::{persistence, puzzle_file, puzzles, replay, solve};
use klotski::{Board, IndexKind, SearchOutcome, SearchStrategy, Solution, SolveOptions};

/// Solves sliding block puzzles.
#[derive(Parser)]
#[command(name = "klotski")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log search progress.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List the built-in puzzles.
    List,
    /// Print a puzzle's starting board and goal.
    Show {
        /// Built-in puzzle name or path to a puzzle file.
        puzzle: String,
    },
    /// Solve a puzzle and print the moves.
    Solve {
        /// Built-in puzzle name or path to a puzzle file.
        puzzle: String,
        /// Search strategy. `recursive` uses one stack frame per expanded
        /// node and overflows the stack on large puzzles.
        #[arg(long, value_enum, default_value_t = SearchStrategy::Iterative)]
        strategy: SearchStrategy,
        #[arg(long, value_enum, default_value_t = IndexKind::Trie)]
        index: IndexKind,
        /// Write the moves to this file.
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Check a saved move list against a puzzle.
    Replay {
        /// Built-in puzzle name or path to a puzzle file.
        puzzle: String,
        /// Move list written by `solve --save`.
        moves: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Command::List) => {
            run_list();
            Ok(())
        }
        Some(Command::Show { puzzle }) => run_show(&puzzle),
        Some(Command::Solve {
            puzzle,
            strategy,
            index,
            save,
        }) => run_solve(&puzzle, SolveOptions { strategy, index }, save.as_deref()),
        Some(Command::Replay { puzzle, moves }) => run_replay(&puzzle, &moves),
        None => run_solve("opening", SolveOptions::default(), None),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(default)
        .parse_default_env()
        .init();
}

/// Resolves a built-in name first, then a file path.
fn load_puzzle(puzzle: &str) -> klotski::Result<Board> {
    match puzzles::find(puzzle) {
        Some(builtin) => builtin.board(),
        None => puzzle_file::load(puzzle),
    }
}

fn run_list() {
    for puzzle in puzzles::BUILTIN {
        println!("{:<10} {}", puzzle.name, puzzle.description);
    }
}

fn run_show(puzzle: &str) -> klotski::Result<()> {
    let board = load_puzzle(puzzle)?;
    println!("{}", describe(&board));
    Ok(())
}

fn run_solve(
    puzzle: &str,
    options: SolveOptions,
    save: Option<&std::path::Path>,
) -> klotski::Result<()> {
    let mut board = load_puzzle(puzzle)?;
    let outcome = solve(&mut board, options);
    println!("{}", format_outcome(&board, &outcome));

    if let (Some(path), SearchOutcome::Solved(solution)) = (save, &outcome) {
        let steps: Vec<_> = solution.steps().collect();
        persistence::save(path, puzzle, &steps)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn run_replay(puzzle: &str, moves: &std::path::Path) -> klotski::Result<()> {
    let mut board = load_puzzle(puzzle)?;
    let steps = persistence::load(moves)?;
    replay(&mut board, &steps)?;

    let layout = board.capture_layout();
    if board.matches(&layout) {
        println!("{} moves replayed, goal reached", steps.len());
    } else {
        println!("{} moves replayed, goal not reached", steps.len());
    }
    println!("{}", board.render());
    Ok(())
}

/// Starting board and goal side by side.
fn describe(board: &Board) -> String {
    let start = board.render();
    let goal = board.render_goal();
    let mut output = format!("{:<w$}  goal\n", "start", w = board.width().max(5));
    for (left, right) in start.lines().zip(goal.lines()) {
        output.push_str(&format!("{:<w$}  {}\n", left, right, w = board.width().max(5)));
    }
    output.trim_end().to_string()
}

fn format_outcome(board: &Board, outcome: &SearchOutcome) -> String {
    match outcome {
        SearchOutcome::Solved(solution) => format_solution(board, solution),
        SearchOutcome::Unsolvable(stats) => format!(
            "No solution ({} layouts explored, {} nodes expanded)",
            stats.distinct_layouts, stats.nodes_expanded
        ),
    }
}

/// Lists each move followed by the board after it.
fn format_solution(board: &Board, solution: &Solution) -> String {
    let mut replayed = board.clone();
    let mut output = format!("Solved in {} moves\n", solution.len());
    for (number, step) in solution.steps().enumerate() {
        let moved = replayed.try_move(step.piece, step.direction);
        debug_assert!(moved, "solution step {step:?} is not a legal move");
        output.push_str(&format!(
            "\n{}. piece {} {}\n",
            number + 1,
            step.piece,
            step.direction
        ));
        output.push_str(&format_grid(replayed.grid(), replayed.width()));
        output.push('\n');
    }
    output.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin(name: &str) -> Board {
        puzzles::find(name).unwrap().board().unwrap()
    }

    #[test]
    fn test_describe_snapshot() {
        insta::assert_snapshot!(describe(&builtin("shuffle")), @r"
        start  goal
        00.    0.1
        11.    .1.
        ");
    }

    #[test]
    fn test_shuffle_solution_snapshot() {
        let mut board = builtin("shuffle");
        let outcome = board.solve();
        insta::assert_snapshot!(format_outcome(&board, &outcome), @r"
        Solved in 3 moves

        1. piece 2 right
        00.
        1.1

        2. piece 1 right
        00.
        .11

        3. piece 2 up
        001
        .1.
        ");
    }

    #[test]
    fn test_unsolvable_message() {
        let mut board = builtin("stuck");
        let outcome = board.solve();
        insta::assert_snapshot!(
            format_outcome(&board, &outcome),
            @"No solution (0 layouts explored, 0 nodes expanded)"
        );
    }

    #[test]
    fn test_load_puzzle_prefers_builtins() {
        assert!(load_puzzle("corner").is_ok());
        assert!(matches!(
            load_puzzle("/nonexistent/puzzle.txt"),
            Err(klotski::PuzzleError::Io(_))
        ));
    }

    #[test]
    fn test_solve_help_warns_about_recursion() {
        use clap::CommandFactory;

        let command = Cli::command();
        let solve = command.find_subcommand("solve").unwrap();
        let strategy = solve
            .get_arguments()
            .find(|arg| arg.get_id() == "strategy")
            .unwrap();
        let help = strategy.get_help().unwrap().to_string();
        assert!(help.contains("overflows the stack"), "{help}");
    }

    #[test]
    fn test_corner_solution_ends_on_goal() {
        let mut board = builtin("corner");
        let outcome = board.solve();
        let output = format_outcome(&board, &outcome);
        let last_board: Vec<&str> = output.lines().rev().take(5).collect();
        assert_eq!(last_board, ["...0", "....", "....", "....", "...."]);
    }

    #[test]
    fn test_cli_parses_solve_options() {
        let cli = Cli::try_parse_from([
            "klotski", "solve", "corner", "--strategy", "recursive", "--index", "hashed",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Solve {
                strategy, index, ..
            }) => {
                assert_eq!(strategy, SearchStrategy::Recursive);
                assert_eq!(index, IndexKind::Hashed);
            }
            _ => panic!("expected solve command"),
        }
    }
}
