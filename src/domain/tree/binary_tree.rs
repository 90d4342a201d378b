use tracing::{debug, instrument};

use crate::domain::arena::BinaryArena;
use crate::domain::entities::{TraverseKind, TreePath};
use crate::domain::error::{DomainError, DomainResult};

/// Plain binary tree addressed by 0/1 paths.
///
/// Deleting a node always removes its whole subtree; nothing is re-linked.
#[derive(Debug, Clone, Default)]
pub struct BinaryTree {
    arena: BinaryArena<i64>,
}

impl BinaryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Level-order build: first value is the root, the rest fill each level
    /// left to right.
    pub fn from_level_order(values: &[i64]) -> Self {
        let mut tree = Self::new();
        for &value in values {
            tree.insert_next(value);
        }
        tree
    }

    pub fn arena(&self) -> &BinaryArena<i64> {
        &self.arena
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

    pub fn clear(&mut self) {
        self.arena.clear();
    }

    /// Insert at the next free level-order slot; returns the new node's path.
    fn insert_next(&mut self, value: i64) -> TreePath {
        match self.arena.first_free_slot() {
            Some((parent, direction)) => {
                let idx = self.arena.alloc(value);
                self.arena.set_child(parent, direction, Some(idx));
                self.arena.path_of(idx)
            }
            None => {
                self.arena.reset_with_root(value);
                TreePath::root()
            }
        }
    }

    /// Insert a leaf holding `value`.
    ///
    /// With a path, every step but the last must land on an existing node and
    /// the last must land on an empty slot. Without one, the next level-order
    /// slot is used.
    #[instrument(level = "debug", skip(self))]
    pub fn insert(&mut self, value: i64, path: Option<&TreePath>) -> DomainResult<TreePath> {
        let Some(path) = path else {
            return Ok(self.insert_next(value));
        };

        let Some((parent_path, direction)) = path.split_last() else {
            if !self.arena.is_empty() {
                return Err(DomainError::invalid_path(path, "root already exists"));
            }
            self.arena.reset_with_root(value);
            return Ok(TreePath::root());
        };

        let parent = self
            .arena
            .resolve(&parent_path)
            .ok_or_else(|| DomainError::invalid_path(path, "intermediate node missing"))?;
        if self.arena.child(parent, direction).is_some() {
            return Err(DomainError::invalid_path(path, "slot already occupied"));
        }
        let idx = self.arena.alloc(value);
        self.arena.set_child(parent, direction, Some(idx));
        debug!(value, %path, "binary tree insert");
        Ok(path.clone())
    }

    /// Remove the node at `path` with its subtree.
    ///
    /// When `expected` is given the node must hold that value.
    /// Returns the removed values in preorder.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_at(&mut self, path: &TreePath, expected: Option<i64>) -> DomainResult<Vec<i64>> {
        let idx = self
            .arena
            .resolve(path)
            .ok_or_else(|| DomainError::invalid_path(path, "no node at path"))?;
        if let Some(expected) = expected {
            let actual = self.arena.data(idx).copied().unwrap_or_default();
            if actual != expected {
                return Err(DomainError::ValueMismatch {
                    path: path.clone(),
                    expected,
                    actual,
                });
            }
        }
        Ok(self.arena.remove_subtree(idx))
    }

    /// Remove the first level-order node holding `value`, with its subtree.
    pub fn delete_value(&mut self, value: i64) -> DomainResult<Vec<i64>> {
        let idx = self
            .arena
            .iter_levelorder()
            .find(|(_, node)| node.data == value)
            .map(|(idx, _)| idx)
            .ok_or(DomainError::ValueNotFound(value))?;
        Ok(self.arena.remove_subtree(idx))
    }

    /// Path of the first level-order node holding `value`.
    pub fn find(&self, value: i64) -> Option<TreePath> {
        self.arena
            .iter_levelorder()
            .find(|(_, node)| node.data == value)
            .map(|(idx, _)| self.arena.path_of(idx))
    }

    pub fn traverse(&self, kind: TraverseKind) -> Vec<i64> {
        self.arena
            .order(kind)
            .into_iter()
            .filter_map(|idx| self.arena.data(idx).copied())
            .collect()
    }
}
