//! Huffman tree construction from a frequency table.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::HuffError;
use crate::frequency::FrequencyTable;

/// A node of the prefix tree: either a leaf carrying one character or an
/// internal merge point with exactly two children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        weight: u64,
        symbol: char,
    },
    Internal {
        weight: u64,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    fn merge(left: Self, right: Self) -> Self {
        let weight = left.weight() + right.weight();
        HuffNode::Internal {
            weight,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// An owned Huffman tree rooted at a single node.
///
/// A table with one entry produces a degenerate tree consisting of a lone
/// leaf; code generation special-cases it (see [`crate::code::CodeTable`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    pub root: HuffNode,
}

// Queue entries order by weight, then by a monotonically increasing sequence
// number, so equal weights resolve identically on every run. Comparison is
// reversed to turn BinaryHeap into a min-heap.
struct QueueEntry {
    weight: u64,
    seq: u64,
    node: HuffNode,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.seq == other.seq
    }
}

impl Eq for QueueEntry {}

impl HuffmanTree {
    /// Build the optimal prefix tree for `table`.
    ///
    /// Repeatedly extracts the two lowest-weight nodes and merges them; the
    /// first node extracted becomes the left child. Leaves are numbered in
    /// table insertion order and merged nodes in creation order, so the same
    /// table always yields the same tree.
    pub fn from_frequencies(table: &FrequencyTable) -> Result<Self, HuffError> {
        if table.is_empty() {
            return Err(HuffError::EmptyInput);
        }

        let mut seq = 0u64;
        let mut heap = BinaryHeap::with_capacity(table.len());
        for (symbol, count) in table.iter() {
            let weight = count as u64;
            heap.push(QueueEntry {
                weight,
                seq,
                node: HuffNode::Leaf { weight, symbol },
            });
            seq += 1;
        }

        while heap.len() > 1 {
            let first = heap.pop().unwrap();
            let second = heap.pop().unwrap();
            let node = HuffNode::merge(first.node, second.node);
            heap.push(QueueEntry {
                weight: node.weight(),
                seq,
                node,
            });
            seq += 1;
        }

        heap.pop()
            .map(|entry| HuffmanTree { root: entry.node })
            .ok_or(HuffError::EmptyInput)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_for(text: &str) -> HuffmanTree {
        HuffmanTree::from_frequencies(&FrequencyTable::from_text(text)).unwrap()
    }

    #[test]
    fn test_empty_table_is_rejected() {
        let err = HuffmanTree::from_frequencies(&FrequencyTable::new()).unwrap_err();
        assert!(matches!(err, HuffError::EmptyInput));
    }

    #[test]
    fn test_single_symbol_tree_is_a_lone_leaf() {
        let tree = tree_for("aaaa");
        assert_eq!(
            tree.root,
            HuffNode::Leaf {
                weight: 4,
                symbol: 'a'
            }
        );
    }

    #[test]
    fn test_root_weight_is_total_count() {
        let tree = tree_for("abracadabra");
        assert_eq!(tree.root.weight(), 11);
    }

    #[test]
    fn test_equal_weights_merge_in_insertion_order() {
        // Four symbols, one occurrence each: a+b merge first, then c+d,
        // then the two pairs.
        let tree = tree_for("abcd");
        let leaf = |symbol| Box::new(HuffNode::Leaf { weight: 1, symbol });
        let pair = |a, b| {
            Box::new(HuffNode::Internal {
                weight: 2,
                left: leaf(a),
                right: leaf(b),
            })
        };
        assert_eq!(
            tree.root,
            HuffNode::Internal {
                weight: 4,
                left: pair('a', 'b'),
                right: pair('c', 'd'),
            }
        );
    }

    #[test]
    fn test_construction_is_deterministic() {
        let text = "mississippi river banks";
        assert_eq!(tree_for(text), tree_for(text));
    }

    #[test]
    fn test_lowest_weight_symbols_sit_deepest() {
        // 'a' dominates abracadabra, so it must sit directly under the root.
        let tree = tree_for("abracadabra");
        match &tree.root {
            HuffNode::Internal { left, .. } => {
                assert_eq!(
                    **left,
                    HuffNode::Leaf {
                        weight: 5,
                        symbol: 'a'
                    }
                );
            }
            other => panic!("expected internal root, got {:?}", other),
        }
    }
}
