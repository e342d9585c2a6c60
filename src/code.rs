//! Prefix code assignment from a Huffman tree.

use std::collections::HashMap;

use crate::frequency::FrequencyTable;
use crate::tree::{HuffNode, HuffmanTree};

/// Per-character prefix codes derived from a tree.
///
/// A bit is `false` for a left descent and `true` for a right descent. Codes
/// are prefix-free by construction since every code is the path to a
/// distinct leaf.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: HashMap<char, Vec<bool>>,
}

impl CodeTable {
    /// Assign a code to every leaf of `tree` via a depth-first walk.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = HashMap::new();
        match &tree.root {
            // Edge case: a lone leaf sits at depth zero, but an empty code
            // cannot be packed or walked, so it gets the one-bit code "0".
            HuffNode::Leaf { symbol, .. } => {
                codes.insert(*symbol, vec![false]);
            }
            root => collect(root, Vec::new(), &mut codes),
        }
        CodeTable { codes }
    }

    pub fn get(&self, ch: char) -> Option<&[bool]> {
        self.codes.get(&ch).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &[bool])> {
        self.codes.iter().map(|(&ch, code)| (ch, code.as_slice()))
    }

    /// Total bit length of a text with these codes and `table`'s counts.
    pub fn encoded_bits(&self, table: &FrequencyTable) -> u64 {
        table
            .iter()
            .map(|(ch, count)| {
                let len = self.get(ch).map_or(0, |code| code.len() as u64);
                count as u64 * len
            })
            .sum()
    }
}

fn collect(node: &HuffNode, prefix: Vec<bool>, codes: &mut HashMap<char, Vec<bool>>) {
    match node {
        HuffNode::Leaf { symbol, .. } => {
            codes.insert(*symbol, prefix);
        }
        HuffNode::Internal { left, right, .. } => {
            let mut left_prefix = prefix.clone();
            left_prefix.push(false);
            collect(left, left_prefix, codes);
            let mut right_prefix = prefix;
            right_prefix.push(true);
            collect(right, right_prefix, codes);
        }
    }
}
