//! Binary search tree with optional AVL rebalancing
//!
//! Both flavours share descent, deletion and traversal; the AVL flavour
//! additionally rotates on the way back to the root. Heights are cached in
//! every node for both flavours so `height()` is O(1).

use std::cmp::Ordering;
use std::fmt;

use generational_arena::Index;
use tracing::{instrument, trace};

use crate::domain::arena::BinaryArena;
use crate::domain::entities::{Direction, TraverseKind};
use crate::domain::error::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Balancing {
    /// Plain BST: shape follows insertion order
    None,
    /// AVL: |height(left) - height(right)| <= 1 at every node
    Avl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchNode {
    pub value: i64,
    pub height: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationKind {
    /// Left-left case: single right rotation
    LeftLeft,
    /// Right-right case: single left rotation
    RightRight,
    /// Left-right case: left rotation on the left child, then right rotation
    LeftRight,
    /// Right-left case: right rotation on the right child, then left rotation
    RightLeft,
}

impl fmt::Display for RotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RotationKind::LeftLeft => "LL",
            RotationKind::RightRight => "RR",
            RotationKind::LeftRight => "LR",
            RotationKind::RightLeft => "RL",
        };
        f.write_str(s)
    }
}

/// One rebalancing step, identified by the value of the unbalanced node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotation {
    pub kind: RotationKind,
    pub pivot: i64,
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.pivot)
    }
}

/// Result of a search: whether the value exists and the values compared on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub found: bool,
    pub path: Vec<i64>,
}

#[derive(Debug, Clone)]
pub struct SearchTree {
    arena: BinaryArena<SearchNode>,
    balancing: Balancing,
}

impl SearchTree {
    pub fn new(balancing: Balancing) -> Self {
        Self {
            arena: BinaryArena::new(),
            balancing,
        }
    }

    pub fn bst() -> Self {
        Self::new(Balancing::None)
    }

    pub fn avl() -> Self {
        Self::new(Balancing::Avl)
    }

    /// Sequential inserts in the given order. Duplicates are skipped and
    /// returned alongside the rotations performed.
    pub fn build(balancing: Balancing, values: &[i64]) -> (Self, Vec<i64>, Vec<Rotation>) {
        let mut tree = Self::new(balancing);
        let mut skipped = Vec::new();
        let mut rotations = Vec::new();
        for &value in values {
            match tree.insert(value) {
                Ok(mut r) => rotations.append(&mut r),
                Err(_) => skipped.push(value),
            }
        }
        (tree, skipped, rotations)
    }

    pub fn balancing(&self) -> Balancing {
        self.balancing
    }

    pub fn arena(&self) -> &BinaryArena<SearchNode> {
        &self.arena
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn height(&self) -> usize {
        self.arena.root().map_or(0, |r| self.height_of(Some(r)))
    }

    pub fn clear(&mut self) {
        self.arena.clear();
    }

    fn value_of(&self, idx: Index) -> i64 {
        self.arena.data(idx).map_or(0, |n| n.value)
    }

    fn height_of(&self, idx: Option<Index>) -> usize {
        idx.and_then(|i| self.arena.data(i)).map_or(0, |n| n.height)
    }

    fn balance_of(&self, idx: Index) -> i64 {
        self.height_of(self.arena.left(idx)) as i64 - self.height_of(self.arena.right(idx)) as i64
    }

    fn update_height(&mut self, idx: Index) {
        let height = 1 + self
            .height_of(self.arena.left(idx))
            .max(self.height_of(self.arena.right(idx)));
        if let Some(node) = self.arena.get_node_mut(idx) {
            node.data.height = height;
        }
    }

    /// Descend by comparison; returns the matching node or the last node visited.
    fn descend(&self, value: i64) -> (Option<Index>, Option<Index>, Vec<i64>) {
        let mut compared = Vec::new();
        let mut last = None;
        let mut cursor = self.arena.root();
        while let Some(idx) = cursor {
            let current = self.value_of(idx);
            compared.push(current);
            match value.cmp(&current) {
                Ordering::Equal => return (Some(idx), last, compared),
                Ordering::Less => cursor = self.arena.left(idx),
                Ordering::Greater => cursor = self.arena.right(idx),
            }
            last = Some(idx);
        }
        (None, last, compared)
    }

    pub fn contains(&self, value: i64) -> bool {
        self.descend(value).0.is_some()
    }

    pub fn search(&self, value: i64) -> SearchOutcome {
        let (found, _, path) = self.descend(value);
        SearchOutcome {
            found: found.is_some(),
            path,
        }
    }

    /// Insert `value`; a duplicate is rejected and leaves the tree unchanged.
    #[instrument(level = "debug", skip(self))]
    pub fn insert(&mut self, value: i64) -> DomainResult<Vec<Rotation>> {
        let (existing, parent, _) = self.descend(value);
        if existing.is_some() {
            return Err(DomainError::Duplicate(value));
        }
        let idx = self.arena.alloc(SearchNode { value, height: 1 });
        let Some(parent) = parent else {
            self.arena.set_root(Some(idx));
            return Ok(Vec::new());
        };
        let direction = if value < self.value_of(parent) {
            Direction::Left
        } else {
            Direction::Right
        };
        self.arena.set_child(parent, direction, Some(idx));
        // A single rotation restores the pre-insert height, so stop at the first one
        Ok(self.retrace(Some(parent), true))
    }

    /// Delete `value`; a node with two children takes its in-order successor's value.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, value: i64) -> DomainResult<Vec<Rotation>> {
        let idx = self
            .descend(value)
            .0
            .ok_or(DomainError::ValueNotFound(value))?;

        let target = match (self.arena.left(idx), self.arena.right(idx)) {
            (Some(_), Some(right)) => {
                let successor = self.min_of(right);
                let successor_value = self.value_of(successor);
                if let Some(node) = self.arena.get_node_mut(idx) {
                    node.data.value = successor_value;
                }
                successor
            }
            _ => idx,
        };

        let parent = self.arena.parent(target);
        self.arena.splice_out(target);
        Ok(self.retrace(parent, false))
    }

    fn min_of(&self, mut idx: Index) -> Index {
        while let Some(left) = self.arena.left(idx) {
            idx = left;
        }
        idx
    }

    /// Walk from `start` to the root refreshing heights and, for AVL, rotating
    /// every unbalanced node met. Insertions stop after the first rotation.
    fn retrace(&mut self, start: Option<Index>, stop_after_rotation: bool) -> Vec<Rotation> {
        let mut rotations = Vec::new();
        let mut cursor = start;
        while let Some(idx) = cursor {
            self.update_height(idx);
            let mut subtree_root = idx;
            if self.balancing == Balancing::Avl {
                if let Some((root, rotation)) = self.rebalance(idx) {
                    trace!(%rotation, "avl rotation");
                    rotations.push(rotation);
                    subtree_root = root;
                    if stop_after_rotation {
                        break;
                    }
                }
            }
            cursor = self.arena.parent(subtree_root);
        }
        rotations
    }

    /// Rotate at `idx` if its balance factor is outside [-1, 1].
    fn rebalance(&mut self, idx: Index) -> Option<(Index, Rotation)> {
        let balance = self.balance_of(idx);
        let pivot = self.value_of(idx);
        if balance > 1 {
            let left = self.arena.left(idx)?;
            let kind = if self.balance_of(left) >= 0 {
                RotationKind::LeftLeft
            } else {
                let new_left = self.arena.rotate_left(left)?;
                self.update_height(left);
                self.update_height(new_left);
                RotationKind::LeftRight
            };
            let root = self.arena.rotate_right(idx)?;
            self.update_height(idx);
            self.update_height(root);
            Some((root, Rotation { kind, pivot }))
        } else if balance < -1 {
            let right = self.arena.right(idx)?;
            let kind = if self.balance_of(right) <= 0 {
                RotationKind::RightRight
            } else {
                let new_right = self.arena.rotate_right(right)?;
                self.update_height(right);
                self.update_height(new_right);
                RotationKind::RightLeft
            };
            let root = self.arena.rotate_left(idx)?;
            self.update_height(idx);
            self.update_height(root);
            Some((root, Rotation { kind, pivot }))
        } else {
            None
        }
    }

    pub fn traverse(&self, kind: TraverseKind) -> Vec<i64> {
        self.arena
            .order(kind)
            .into_iter()
            .map(|idx| self.value_of(idx))
            .collect()
    }

    /// `(value, balance factor)` for every node in level order.
    pub fn balance_factors(&self) -> Vec<(i64, i64)> {
        self.arena
            .iter_levelorder()
            .map(|(idx, node)| (node.data.value, self.balance_of(idx)))
            .collect()
    }

    /// Cached heights agree with a fresh recomputation.
    pub fn heights_consistent(&self) -> bool {
        self.arena
            .iter_postorder()
            .all(|(idx, node)| node.data.height == self.arena.subtree_height(idx))
    }
}
