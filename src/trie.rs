//! Visited-layout index.
//!
//! Layouts are deduplicated by their canonical key: each cell holds the type
//! id of the piece anchored there (or an empty symbol), so layouts that differ
//! only by swapping same-typed pieces collapse to one search state.
//!
//! The default index is a fixed-arity trie over those keys, one level per
//! cell in row-major order. Nodes live in a flat arena; each node owns
//! `arity` child slots, where slot `num_types` stands for "no piece".

use std::num::NonZeroU32;

use rustc_hash::FxHashSet;

use crate::pieces::{Piece, PieceId};

/// Canonical symbol of every cell in a layout.
///
/// Anchored pieces map to their type id, empty cells to `num_types`.
pub fn canonical_key<'a>(
    layout: &'a [Option<PieceId>],
    pieces: &'a [Piece],
    num_types: usize,
) -> impl Iterator<Item = usize> + 'a {
    layout
        .iter()
        .map(move |slot| slot.map_or(num_types, |piece_id| pieces[piece_id].type_id))
}

/// A set of canonical layout keys supporting a combined insert-and-test.
pub trait VisitedIndex {
    /// Inserts a key, returning true if it was already present.
    fn insert_and_test(&mut self, key: &[usize]) -> bool;

    /// Number of distinct keys inserted so far.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Arena index of a trie node. The root is never a child, so zero is free to
/// mean "absent".
type NodeRef = Option<NonZeroU32>;

/// Fixed-arity trie of canonical layouts.
///
/// Every complete key has exactly `depth` symbols, so all leaves sit at the
/// same level and a key is present iff its full path exists.
pub struct LayoutTrie {
    arity: usize,
    depth: usize,
    /// `children[node * arity + symbol]`
    children: Vec<NodeRef>,
    layouts: usize,
}

impl LayoutTrie {
    /// Creates an empty trie for boards with `num_types` piece types and
    /// `cells` cells.
    pub fn new(num_types: usize, cells: usize) -> Self {
        let arity = num_types + 1;
        Self {
            arity,
            depth: cells,
            children: vec![None; arity],
            layouts: 0,
        }
    }

    /// Number of trie nodes, root included.
    pub fn node_count(&self) -> usize {
        self.children.len() / self.arity
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Appends a fresh node and returns its arena index.
    fn alloc(&mut self) -> NonZeroU32 {
        let index = self.node_count() as u32;
        self.children.extend(std::iter::repeat(None).take(self.arity));
        // the root occupies index 0, so new nodes are never zero
        NonZeroU32::new(index).unwrap_or(NonZeroU32::MIN)
    }
}

impl VisitedIndex for LayoutTrie {
    /// Walks the key one cell at a time, creating missing children on the
    /// way. The key was already present only if no child had to be created.
    fn insert_and_test(&mut self, key: &[usize]) -> bool {
        debug_assert_eq!(key.len(), self.depth, "key length must match cell count");
        let mut node = 0usize;
        let mut present = true;

        for &symbol in key {
            debug_assert!(symbol < self.arity, "symbol {symbol} out of range");
            let slot = node * self.arity + symbol;
            node = match self.children[slot] {
                Some(child) => child.get() as usize,
                None => {
                    present = false;
                    let child = self.alloc();
                    self.children[slot] = Some(child);
                    child.get() as usize
                }
            };
        }

        if !present {
            self.layouts += 1;
        }
        present
    }

    fn len(&self) -> usize {
        self.layouts
    }
}

/// Hash-set index over canonical keys.
///
/// Gives the same answers as [`LayoutTrie`]; usually uses less memory on
/// sparse state spaces.
#[derive(Default)]
pub struct HashedLayouts {
    seen: FxHashSet<Box<[usize]>>,
}

impl HashedLayouts {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VisitedIndex for HashedLayouts {
    fn insert_and_test(&mut self, key: &[usize]) -> bool {
        if self.seen.contains(key) {
            return true;
        }
        self.seen.insert(key.into());
        false
    }

    fn len(&self) -> usize {
        self.seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    /// 1x4 board with two same-typed singles, one other single and a gap.
    fn board() -> Board {
        let mut board = Board::new(1, 4);
        let a = board.add_type(1, 1);
        let b = board.add_type(1, 1);
        board.add_piece(a, 0, 0);
        board.add_piece(a, 0, 1);
        board.add_piece(b, 0, 2);
        board
    }

    fn key_of(board: &Board, layout: &[Option<PieceId>]) -> Vec<usize> {
        canonical_key(layout, board.pieces(), board.types().len()).collect()
    }

    #[test]
    fn test_canonical_key_uses_types() {
        let board = board();
        let layout = board.capture_layout();
        assert_eq!(key_of(&board, &layout), vec![0, 0, 1, 2]);
    }

    #[test]
    fn test_same_type_swap_gives_same_key() {
        let board = board();
        let original = vec![Some(0), Some(1), Some(2), None];
        let swapped = vec![Some(1), Some(0), Some(2), None];
        assert_eq!(key_of(&board, &original), key_of(&board, &swapped));

        let mut trie = LayoutTrie::new(2, 4);
        assert!(!trie.insert_and_test(&key_of(&board, &original)));
        let nodes = trie.node_count();
        assert!(trie.insert_and_test(&key_of(&board, &swapped)));
        assert_eq!(trie.node_count(), nodes, "swap walks the same path");
    }

    #[test]
    fn test_different_type_swap_is_new() {
        let board = board();
        let original = vec![Some(0), Some(1), Some(2), None];
        let swapped = vec![Some(0), Some(2), Some(1), None];

        let mut trie = LayoutTrie::new(2, 4);
        assert!(!trie.insert_and_test(&key_of(&board, &original)));
        assert!(!trie.insert_and_test(&key_of(&board, &swapped)));
        assert_eq!(trie.len(), 2);
    }

    #[test]
    fn test_prefix_sharing() {
        let mut trie = LayoutTrie::new(1, 3);
        assert!(trie.is_empty());
        assert!(!trie.insert_and_test(&[0, 1, 1]));
        assert_eq!(trie.node_count(), 4);
        // shares the first two levels, adds one leaf
        assert!(!trie.insert_and_test(&[0, 1, 0]));
        assert_eq!(trie.node_count(), 5);
        assert!(trie.insert_and_test(&[0, 1, 0]));
        assert!(trie.insert_and_test(&[0, 1, 1]));
        assert_eq!(trie.len(), 2);
        assert_eq!(trie.depth(), 3);
    }

    #[test]
    fn test_divergence_at_last_cell_is_new() {
        let mut trie = LayoutTrie::new(3, 4);
        assert!(!trie.insert_and_test(&[3, 3, 3, 0]));
        assert!(!trie.insert_and_test(&[3, 3, 3, 1]));
        assert!(!trie.insert_and_test(&[0, 3, 3, 1]));
    }

    #[test]
    fn test_hashed_index_agrees_with_trie() {
        let keys: [&[usize]; 6] = [
            &[0, 1, 2, 2],
            &[0, 1, 2, 2],
            &[2, 1, 0, 2],
            &[0, 1, 2, 0],
            &[2, 1, 0, 2],
            &[0, 0, 0, 0],
        ];
        let mut trie = LayoutTrie::new(2, 4);
        let mut hashed = HashedLayouts::new();
        for key in keys {
            assert_eq!(
                trie.insert_and_test(key),
                hashed.insert_and_test(key),
                "disagreement on {key:?}"
            );
        }
        assert_eq!(trie.len(), 4);
        assert_eq!(hashed.len(), 4);
    }
}
