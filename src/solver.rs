//! Breadth-first search over board layouts.
//!
//! Each search node proposes one move (piece + direction) against the layout
//! it was generated from. Nodes are stored in an arena and linked to their
//! parent by index, so the winning path is rebuilt by walking parents back
//! to the root.
//!
//! When a node is dequeued the board is reset to the node's layout and the
//! move is replayed. The resulting layout is checked against the goal first,
//! then deduplicated by canonical key; only unseen layouts get children.

use std::collections::VecDeque;

use log::{debug, info, warn};

use crate::board::{Board, Layout};
use crate::error::{PuzzleError, Result};
use crate::moves::Direction;
use crate::pieces::PieceId;
use crate::trie::{canonical_key, HashedLayouts, LayoutTrie, VisitedIndex};

/// Arena index of a search node.
pub type NodeId = usize;

/// One slide of one piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Step {
    pub piece: PieceId,
    pub direction: Direction,
}

/// A proposed move together with the layout it applies to.
///
/// The root and the terminal node of a solution carry no move.
#[derive(Clone, Debug)]
pub struct SearchNode {
    /// `None` for the root, and for duplicates detached from the tree.
    pub parent: Option<NodeId>,
    pub step: Option<Step>,
    /// Layout before `step` is applied.
    pub layout: Layout,
    pub depth: usize,
}

/// How the frontier is drained.
///
/// Both strategies visit nodes in the same order and return the same path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SearchStrategy {
    /// Explicit loop over the queue.
    #[default]
    Iterative,
    /// One stack frame per dequeued node. Stack depth grows with the number
    /// of nodes expanded, so large searches abort with a stack overflow;
    /// only suitable for small puzzles.
    Recursive,
}

/// Which visited-layout index deduplicates the search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum IndexKind {
    #[default]
    Trie,
    Hashed,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SolveOptions {
    pub strategy: SearchStrategy,
    pub index: IndexKind,
}

/// Counters collected during one search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes allocated, root and terminal included.
    pub nodes_created: usize,
    /// Nodes dequeued and replayed.
    pub nodes_expanded: usize,
    /// Expanded nodes whose layout had already been indexed.
    pub duplicates: usize,
    /// Distinct canonical layouts in the index.
    pub distinct_layouts: usize,
    /// Deepest node expanded.
    pub max_depth: usize,
}

/// A path from the starting layout to a goal layout.
#[derive(Clone, Debug)]
pub struct Solution {
    /// Root first, terminal node last.
    nodes: Vec<SearchNode>,
    stats: SearchStats,
}

impl Solution {
    /// Moves in order from the start.
    pub fn steps(&self) -> impl Iterator<Item = Step> + '_ {
        self.nodes.iter().filter_map(|node| node.step)
    }

    /// Number of moves.
    pub fn len(&self) -> usize {
        self.nodes.len().saturating_sub(2)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The reconstructed node chain, root first.
    pub fn nodes(&self) -> &[SearchNode] {
        &self.nodes
    }

    /// Layouts visited along the path: the start, then one per move.
    pub fn layouts(&self) -> impl Iterator<Item = &Layout> + '_ {
        self.nodes.iter().skip(1).map(|node| &node.layout)
    }

    /// The solved layout.
    pub fn final_layout(&self) -> &Layout {
        // a solution always holds at least the root and the terminal node
        &self.nodes[self.nodes.len() - 1].layout
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }
}

/// Result of a search.
#[derive(Clone, Debug)]
pub enum SearchOutcome {
    Solved(Solution),
    /// Every reachable layout was explored without meeting the goal.
    Unsolvable(SearchStats),
}

impl SearchOutcome {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SearchOutcome::Solved(solution) => Some(solution),
            SearchOutcome::Unsolvable(_) => None,
        }
    }

    pub fn into_solution(self) -> Option<Solution> {
        match self {
            SearchOutcome::Solved(solution) => Some(solution),
            SearchOutcome::Unsolvable(_) => None,
        }
    }

    pub fn stats(&self) -> &SearchStats {
        match self {
            SearchOutcome::Solved(solution) => solution.stats(),
            SearchOutcome::Unsolvable(stats) => stats,
        }
    }
}

/// Solves the puzzle from the board's current layout.
///
/// The board is restored to its starting layout, legal moves refreshed,
/// before returning.
pub fn solve(board: &mut Board, options: SolveOptions) -> SearchOutcome {
    board.refresh_legal_moves();
    let start = board.capture_layout();

    let index: Box<dyn VisitedIndex> = match options.index {
        IndexKind::Trie => Box::new(LayoutTrie::new(board.types().len(), board.cell_count())),
        IndexKind::Hashed => Box::new(HashedLayouts::new()),
    };
    let mut search = Search::new(board, index);
    let root = search.seed(start.clone());

    let terminal = if search.board.matches(&start) {
        Some(search.push(SearchNode {
            parent: Some(root),
            step: None,
            layout: start.clone(),
            depth: 1,
        }))
    } else {
        match options.strategy {
            SearchStrategy::Iterative => search.run_iterative(),
            SearchStrategy::Recursive => search.run_recursive(),
        }
    };

    let outcome = match terminal {
        Some(terminal) => {
            let solution = search.into_solution(terminal);
            info!(
                "solved in {} moves ({} nodes expanded, {} duplicates)",
                solution.len(),
                solution.stats.nodes_expanded,
                solution.stats.duplicates
            );
            SearchOutcome::Solved(solution)
        }
        None => {
            let stats = search.stats();
            info!(
                "no solution after exploring {} layouts ({} nodes expanded)",
                stats.distinct_layouts, stats.nodes_expanded
            );
            SearchOutcome::Unsolvable(stats)
        }
    };

    board.apply_layout(&start);
    board.refresh_legal_moves();
    outcome
}

impl Board {
    /// Solves with the iterative strategy and the trie index.
    pub fn solve(&mut self) -> SearchOutcome {
        solve(self, SolveOptions::default())
    }
}

/// Re-applies steps from the board's current layout.
///
/// Each step is checked with [`Board::fits`] before it is made; the first
/// illegal step aborts with the board left at the layout before it.
pub fn replay(board: &mut Board, steps: &[Step]) -> Result<()> {
    for (index, step) in steps.iter().enumerate() {
        let illegal = PuzzleError::IllegalStep {
            index,
            piece: step.piece,
            direction: step.direction,
        };
        if step.piece >= board.pieces().len() {
            return Err(illegal);
        }
        let piece = board.piece(step.piece);
        let (row_offset, col_offset) = step.direction.offset();
        let legal = board.fits(
            step.piece,
            piece.row as isize + row_offset,
            piece.col as isize + col_offset,
        );
        if !legal || !board.try_move(step.piece, step.direction) {
            return Err(illegal);
        }
    }
    Ok(())
}

/// Mutable state of one search.
struct Search<'b> {
    board: &'b mut Board,
    nodes: Vec<SearchNode>,
    pending: VecDeque<NodeId>,
    index: Box<dyn VisitedIndex>,
    /// Reused buffer for canonical keys.
    key: Vec<usize>,
    expanded: usize,
    duplicates: usize,
    max_depth: usize,
}

impl<'b> Search<'b> {
    fn new(board: &'b mut Board, index: Box<dyn VisitedIndex>) -> Self {
        let cells = board.cell_count();
        Self {
            board,
            nodes: Vec::new(),
            pending: VecDeque::new(),
            index,
            key: Vec::with_capacity(cells),
            expanded: 0,
            duplicates: 0,
            max_depth: 0,
        }
    }

    fn push(&mut self, node: SearchNode) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Creates the root and queues every move legal from the start.
    fn seed(&mut self, start: Layout) -> NodeId {
        let root = self.push(SearchNode {
            parent: None,
            step: None,
            layout: start.clone(),
            depth: 0,
        });
        self.enqueue_children(root, start);
        root
    }

    /// Queues one child per currently legal move, all sharing `layout`.
    fn enqueue_children(&mut self, parent: NodeId, layout: Layout) {
        let depth = self.nodes[parent].depth + 1;
        let moves: Vec<(PieceId, Direction)> = self.board.available_moves().collect();
        for (piece, direction) in moves {
            let child = self.push(SearchNode {
                parent: Some(parent),
                step: Some(Step { piece, direction }),
                layout: layout.clone(),
                depth,
            });
            self.pending.push_back(child);
        }
    }

    /// Replays a node's move and queues its children if the result is new.
    ///
    /// Returns the terminal node when the move reaches the goal.
    fn expand(&mut self, id: NodeId) -> Option<NodeId> {
        let node = &self.nodes[id];
        let (layout, depth) = (node.layout.clone(), node.depth);
        let step = node.step?;

        if depth > self.max_depth {
            self.max_depth = depth;
            debug!(
                "frontier at depth {depth}: {} queued, {} layouts seen",
                self.pending.len(),
                self.index.len()
            );
        }
        self.expanded += 1;

        self.board.apply_layout(&layout);
        if !self.board.try_move(step.piece, step.direction) {
            warn!(
                "queued move piece {} {} is illegal, skipping",
                step.piece, step.direction
            );
            return None;
        }
        let after = self.board.capture_layout();

        if self.board.matches(&after) {
            return Some(self.push(SearchNode {
                parent: Some(id),
                step: None,
                layout: after,
                depth: depth + 1,
            }));
        }

        self.key.clear();
        self.key.extend(canonical_key(
            &after,
            self.board.pieces(),
            self.board.types().len(),
        ));
        if self.index.insert_and_test(&self.key) {
            self.duplicates += 1;
            self.nodes[id].parent = None;
            return None;
        }

        self.enqueue_children(id, after);
        None
    }

    fn run_iterative(&mut self) -> Option<NodeId> {
        while let Some(next) = self.pending.pop_front() {
            if let Some(terminal) = self.expand(next) {
                return Some(terminal);
            }
        }
        None
    }

    fn run_recursive(&mut self) -> Option<NodeId> {
        let next = self.pending.pop_front()?;
        match self.expand(next) {
            Some(terminal) => Some(terminal),
            None => self.run_recursive(),
        }
    }

    fn stats(&self) -> SearchStats {
        SearchStats {
            nodes_created: self.nodes.len(),
            nodes_expanded: self.expanded,
            duplicates: self.duplicates,
            distinct_layouts: self.index.len(),
            max_depth: self.max_depth,
        }
    }

    /// Walks parent links from the terminal node back to the root.
    fn into_solution(self, terminal: NodeId) -> Solution {
        let stats = self.stats();
        let mut chain = Vec::new();
        let mut cursor = Some(terminal);
        while let Some(id) = cursor {
            chain.push(id);
            cursor = self.nodes[id].parent;
        }

        let nodes = chain
            .into_iter()
            .rev()
            .map(|id| self.nodes[id].clone())
            .collect();
        Solution { nodes, stats }
    }
}
