//! Huffman tree: optimal prefix codes from character frequencies

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};
use std::fmt;

use generational_arena::Index;
use tracing::{instrument, trace};

use crate::domain::arena::BinaryArena;
use crate::domain::entities::Direction;
use crate::domain::error::{DomainError, DomainResult};

/// Character to bit-string code.
pub type CodeTable = BTreeMap<char, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HuffmanNode {
    /// Present only at leaves
    pub symbol: Option<char>,
    pub frequency: u64,
}

impl fmt::Display for HuffmanNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.symbol {
            Some(c) => write!(f, "{c:?}:{}", self.frequency),
            None => write!(f, "{}", self.frequency),
        }
    }
}

/// One merge performed while building: the two lightest trees and their sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeStep {
    pub left: HuffmanNode,
    pub right: HuffmanNode,
    pub merged: u64,
}

impl fmt::Display for MergeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {} -> {}", self.left, self.right, self.merged)
    }
}

#[derive(Debug, Clone, Default)]
pub struct HuffmanTree {
    arena: BinaryArena<HuffmanNode>,
    codes: CodeTable,
}

impl HuffmanTree {
    /// An unbuilt tree: encode/decode fail until [`build`](Self::build) is used.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(char, frequency)` pairs.
    ///
    /// The two lightest trees are merged repeatedly; equal frequencies are
    /// resolved by insertion order (leaves in input order, merged trees after
    /// every tree that already exists). The first tree extracted becomes the
    /// left child. A character listed twice keeps its first position and its
    /// last frequency.
    #[instrument(level = "debug", skip(frequencies))]
    pub fn build(frequencies: &[(char, u64)]) -> DomainResult<(Self, Vec<MergeStep>)> {
        let mut table: Vec<(char, u64)> = Vec::new();
        for &(symbol, frequency) in frequencies {
            match table.iter_mut().find(|(c, _)| *c == symbol) {
                Some(entry) => entry.1 = frequency,
                None => table.push((symbol, frequency)),
            }
        }
        if table.is_empty() {
            return Err(DomainError::NoFrequencies);
        }

        let mut tree = Self::new();
        let mut order: Vec<Index> = Vec::new();
        let mut heap = BinaryHeap::new();
        for (symbol, frequency) in table {
            let idx = tree.arena.alloc(HuffmanNode {
                symbol: Some(symbol),
                frequency,
            });
            heap.push(Reverse((frequency, order.len())));
            order.push(idx);
        }

        let mut steps = Vec::new();
        while heap.len() > 1 {
            let (Some(Reverse((lf, li))), Some(Reverse((rf, ri)))) = (heap.pop(), heap.pop()) else {
                break;
            };
            let (left, right) = (order[li], order[ri]);
            let merged = lf
                .checked_add(rf)
                .ok_or(DomainError::FrequencyOverflow {
                    left: lf,
                    right: rf,
                })?;
            let parent = tree.arena.alloc(HuffmanNode {
                symbol: None,
                frequency: merged,
            });
            tree.arena.set_child(parent, Direction::Left, Some(left));
            tree.arena.set_child(parent, Direction::Right, Some(right));

            let step = MergeStep {
                left: tree.node(left),
                right: tree.node(right),
                merged,
            };
            trace!(%step, "huffman merge");
            steps.push(step);

            heap.push(Reverse((merged, order.len())));
            order.push(parent);
        }

        let root = heap.pop().map(|Reverse((_, i))| order[i]);
        tree.arena.set_root(root);
        tree.codes = tree.collect_codes();
        Ok((tree, steps))
    }

    fn node(&self, idx: Index) -> HuffmanNode {
        self.arena.data(idx).copied().unwrap_or(HuffmanNode {
            symbol: None,
            frequency: 0,
        })
    }

    fn collect_codes(&self) -> CodeTable {
        let mut codes = CodeTable::new();
        let Some(root) = self.arena.root() else {
            return codes;
        };
        let mut stack = vec![(root, String::new())];
        while let Some((idx, code)) = stack.pop() {
            let Some(node) = self.arena.get_node(idx) else {
                continue;
            };
            if let Some(symbol) = node.data.symbol {
                // A lone leaf is the root; its code is defined as "0"
                let code = if code.is_empty() { "0".to_string() } else { code };
                codes.insert(symbol, code);
                continue;
            }
            if let Some(r) = node.right {
                stack.push((r, format!("{code}1")));
            }
            if let Some(l) = node.left {
                stack.push((l, format!("{code}0")));
            }
        }
        codes
    }

    pub fn arena(&self) -> &BinaryArena<HuffmanNode> {
        &self.arena
    }

    pub fn codes(&self) -> &CodeTable {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn height(&self) -> usize {
        self.arena.height()
    }

    /// Total frequency at the root.
    pub fn weight(&self) -> u64 {
        self.arena.root().map_or(0, |r| self.node(r).frequency)
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.codes.clear();
    }

    /// Concatenate the code of every character in `text`.
    pub fn encode(&self, text: &str) -> DomainResult<String> {
        if self.is_empty() {
            return Err(DomainError::Empty("huffman tree"));
        }
        text.chars()
            .map(|c| {
                self.codes
                    .get(&c)
                    .map(String::as_str)
                    .ok_or(DomainError::UnknownCharacter(c))
            })
            .collect()
    }

    /// Walk the tree bit by bit, emitting a character at every leaf.
    pub fn decode(&self, bits: &str) -> DomainResult<String> {
        let root = self
            .arena
            .root()
            .ok_or(DomainError::Empty("huffman tree"))?;
        let single_leaf = self.arena.get_node(root).is_some_and(|n| n.is_leaf());

        let mut decoded = String::new();
        let mut cursor = root;
        for (pos, bit) in bits.chars().enumerate() {
            let direction = match bit {
                '0' => Direction::Left,
                '1' => Direction::Right,
                other => {
                    return Err(DomainError::Decode(format!(
                        "invalid bit {other:?} at offset {pos}"
                    )))
                }
            };
            if single_leaf {
                if direction == Direction::Right {
                    return Err(DomainError::Decode(format!(
                        "bit '1' at offset {pos} leaves the tree"
                    )));
                }
            } else {
                cursor = self.arena.child(cursor, direction).ok_or_else(|| {
                    DomainError::Decode(format!("bit {bit:?} at offset {pos} leaves the tree"))
                })?;
            }
            if let Some(symbol) = self.arena.data(cursor).and_then(|n| n.symbol) {
                decoded.push(symbol);
                cursor = root;
            }
        }
        if cursor != root {
            return Err(DomainError::Decode(
                "trailing bits do not reach a leaf".to_string(),
            ));
        }
        Ok(decoded)
    }
}
