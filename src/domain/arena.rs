use std::collections::VecDeque;

use generational_arena::{Arena, Index};
use termtree::Tree;
use tracing::instrument;

use crate::domain::entities::{Direction, TraverseKind, TreePath};

/// Binary tree node stored in a [`BinaryArena`].
#[derive(Debug, Clone)]
pub struct BinaryNode<T> {
    /// Payload of this node
    pub data: T,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    pub left: Option<Index>,
    pub right: Option<Index>,
}

impl<T> BinaryNode<T> {
    pub fn child(&self, direction: Direction) -> Option<Index> {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Arena-based binary tree storage.
///
/// Nodes reference each other through generational indices, so rotations and
/// subtree removal only rewrite links and never alias mutable references.
/// Every tree engine (path-addressed, search trees, Huffman) sits on top of it.
#[derive(Debug, Clone)]
pub struct BinaryArena<T> {
    /// Arena storage for all tree nodes
    arena: Arena<BinaryNode<T>>,
    /// Index of the root node, None for empty trees
    root: Option<Index>,
}

impl<T> Default for BinaryArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BinaryArena<T> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn get_node(&self, idx: Index) -> Option<&BinaryNode<T>> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut BinaryNode<T>> {
        self.arena.get_mut(idx)
    }

    pub fn data(&self, idx: Index) -> Option<&T> {
        self.arena.get(idx).map(|n| &n.data)
    }

    pub fn child(&self, idx: Index, direction: Direction) -> Option<Index> {
        self.arena.get(idx).and_then(|n| n.child(direction))
    }

    pub fn left(&self, idx: Index) -> Option<Index> {
        self.child(idx, Direction::Left)
    }

    pub fn right(&self, idx: Index) -> Option<Index> {
        self.child(idx, Direction::Right)
    }

    pub fn parent(&self, idx: Index) -> Option<Index> {
        self.arena.get(idx).and_then(|n| n.parent)
    }

    /// Create a detached node; link it with [`set_root`](Self::set_root) or
    /// [`set_child`](Self::set_child).
    pub fn alloc(&mut self, data: T) -> Index {
        self.arena.insert(BinaryNode {
            data,
            parent: None,
            left: None,
            right: None,
        })
    }

    /// Drop every node and install `data` as the only (root) node.
    pub fn reset_with_root(&mut self, data: T) -> Index {
        self.clear();
        let idx = self.alloc(data);
        self.root = Some(idx);
        idx
    }

    pub fn set_root(&mut self, idx: Option<Index>) {
        if let Some(i) = idx {
            if let Some(node) = self.arena.get_mut(i) {
                node.parent = None;
            }
        }
        self.root = idx;
    }

    /// Point `parent`'s `direction` slot at `child`, fixing the child's back link.
    pub fn set_child(&mut self, parent: Index, direction: Direction, child: Option<Index>) {
        if let Some(node) = self.arena.get_mut(parent) {
            match direction {
                Direction::Left => node.left = child,
                Direction::Right => node.right = child,
            }
        }
        if let Some(c) = child {
            if let Some(node) = self.arena.get_mut(c) {
                node.parent = Some(parent);
            }
        }
    }

    /// Which slot of its parent `idx` occupies; None for the root.
    pub fn side_of(&self, idx: Index) -> Option<(Index, Direction)> {
        let parent = self.parent(idx)?;
        if self.left(parent) == Some(idx) {
            Some((parent, Direction::Left))
        } else {
            Some((parent, Direction::Right))
        }
    }

    /// Put `new` where `old` hangs (parent slot or root). `old` is left detached.
    pub fn replace_in_parent(&mut self, old: Index, new: Option<Index>) {
        match self.side_of(old) {
            Some((parent, direction)) => self.set_child(parent, direction, new),
            None => self.set_root(new),
        }
        if let Some(node) = self.arena.get_mut(old) {
            node.parent = None;
        }
    }

    /// Resolve a root-relative path to a node.
    pub fn resolve(&self, path: &TreePath) -> Option<Index> {
        path.steps()
            .iter()
            .try_fold(self.root?, |idx, &dir| self.child(idx, dir))
    }

    /// Root-relative path of a linked node.
    pub fn path_of(&self, idx: Index) -> TreePath {
        let mut steps = Vec::new();
        let mut current = idx;
        while let Some((parent, direction)) = self.side_of(current) {
            steps.push(direction);
            current = parent;
        }
        steps.reverse();
        TreePath::new(steps)
    }

    /// Detach `idx` from the tree and free it together with all its descendants.
    ///
    /// Returns the payloads removed, in preorder.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_subtree(&mut self, idx: Index) -> Vec<T> {
        self.replace_in_parent(idx, None);
        let mut removed = Vec::new();
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.arena.remove(current) {
                if let Some(r) = node.right {
                    stack.push(r);
                }
                if let Some(l) = node.left {
                    stack.push(l);
                }
                removed.push(node.data);
            }
        }
        removed
    }

    /// Remove a node with at most one child, splicing that child into its place.
    pub fn splice_out(&mut self, idx: Index) -> Option<T> {
        let node = self.arena.get(idx)?;
        debug_assert!(node.left.is_none() || node.right.is_none());
        let child = node.left.or(node.right);
        self.replace_in_parent(idx, child);
        self.arena.remove(idx).map(|n| n.data)
    }

    /// Single left rotation around `x`; returns the new subtree root.
    ///
    /// ```text
    ///   x                y
    ///    \              / \
    ///     y     =>     x   c
    ///    / \            \
    ///   b   c            b
    /// ```
    pub fn rotate_left(&mut self, x: Index) -> Option<Index> {
        let y = self.right(x)?;
        let b = self.left(y);
        self.replace_in_parent(x, Some(y));
        self.set_child(x, Direction::Right, b);
        self.set_child(y, Direction::Left, Some(x));
        Some(y)
    }

    /// Single right rotation around `y`; mirror image of [`rotate_left`](Self::rotate_left).
    pub fn rotate_right(&mut self, y: Index) -> Option<Index> {
        let x = self.left(y)?;
        let b = self.right(x);
        self.replace_in_parent(y, Some(x));
        self.set_child(y, Direction::Left, b);
        self.set_child(x, Direction::Right, Some(y));
        Some(x)
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    #[instrument(level = "debug", skip(self))]
    pub fn height(&self) -> usize {
        self.root.map_or(0, |r| self.subtree_height(r))
    }

    pub fn subtree_height(&self, idx: Index) -> usize {
        match self.get_node(idx) {
            Some(node) => {
                let l = node.left.map_or(0, |c| self.subtree_height(c));
                let r = node.right.map_or(0, |c| self.subtree_height(c));
                1 + l.max(r)
            }
            None => 0,
        }
    }

    /// First empty child slot in level order, left slot before right slot.
    pub fn first_free_slot(&self) -> Option<(Index, Direction)> {
        self.iter_levelorder().find_map(|(idx, node)| {
            if node.left.is_none() {
                Some((idx, Direction::Left))
            } else if node.right.is_none() {
                Some((idx, Direction::Right))
            } else {
                None
            }
        })
    }

    pub fn iter_preorder(&self) -> PreOrderIterator<'_, T> {
        PreOrderIterator::new(self)
    }

    pub fn iter_inorder(&self) -> InOrderIterator<'_, T> {
        InOrderIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_, T> {
        PostOrderIterator::new(self)
    }

    pub fn iter_levelorder(&self) -> LevelOrderIterator<'_, T> {
        LevelOrderIterator::new(self)
    }

    /// Node indices in the requested visiting order.
    pub fn order(&self, kind: TraverseKind) -> Vec<Index> {
        match kind {
            TraverseKind::Preorder => self.iter_preorder().map(|(i, _)| i).collect(),
            TraverseKind::Inorder => self.iter_inorder().map(|(i, _)| i).collect(),
            TraverseKind::Postorder => self.iter_postorder().map(|(i, _)| i).collect(),
            TraverseKind::Levelorder => self.iter_levelorder().map(|(i, _)| i).collect(),
        }
    }

    /// Render as a `termtree`; children are tagged `L:`/`R:` so one-sided
    /// nodes stay unambiguous.
    pub fn to_termtree(&self, label: impl Fn(&T) -> String) -> Tree<String> {
        fn build<T>(
            arena: &BinaryArena<T>,
            idx: Index,
            tag: &str,
            label: &dyn Fn(&T) -> String,
        ) -> Tree<String> {
            let node = match arena.get_node(idx) {
                Some(n) => n,
                None => return Tree::new(String::new()),
            };
            let mut tree = Tree::new(format!("{tag}{}", label(&node.data)));
            if let Some(l) = node.left {
                tree.push(build(arena, l, "L: ", label));
            }
            if let Some(r) = node.right {
                tree.push(build(arena, r, "R: ", label));
            }
            tree
        }

        match self.root {
            Some(root) => build(self, root, "", &label),
            None => Tree::new("(empty)".to_string()),
        }
    }
}

pub struct PreOrderIterator<'a, T> {
    arena: &'a BinaryArena<T>,
    stack: Vec<Index>,
}

impl<'a, T> PreOrderIterator<'a, T> {
    fn new(arena: &'a BinaryArena<T>) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push(root);
        }
        Self { arena, stack }
    }
}

impl<'a, T> Iterator for PreOrderIterator<'a, T> {
    type Item = (Index, &'a BinaryNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        let node = self.arena.get_node(current)?;
        // Right first so left is visited first
        if let Some(r) = node.right {
            self.stack.push(r);
        }
        if let Some(l) = node.left {
            self.stack.push(l);
        }
        Some((current, node))
    }
}

pub struct InOrderIterator<'a, T> {
    arena: &'a BinaryArena<T>,
    stack: Vec<Index>,
    cursor: Option<Index>,
}

impl<'a, T> InOrderIterator<'a, T> {
    fn new(arena: &'a BinaryArena<T>) -> Self {
        Self {
            arena,
            stack: Vec::new(),
            cursor: arena.root(),
        }
    }
}

impl<'a, T> Iterator for InOrderIterator<'a, T> {
    type Item = (Index, &'a BinaryNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(idx) = self.cursor {
            self.stack.push(idx);
            self.cursor = self.arena.left(idx);
        }
        let current = self.stack.pop()?;
        let node = self.arena.get_node(current)?;
        self.cursor = node.right;
        Some((current, node))
    }
}

pub struct PostOrderIterator<'a, T> {
    arena: &'a BinaryArena<T>,
    stack: Vec<(Index, bool)>,
}

impl<'a, T> PostOrderIterator<'a, T> {
    fn new(arena: &'a BinaryArena<T>) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push((root, false));
        }
        Self { arena, stack }
    }
}

impl<'a, T> Iterator for PostOrderIterator<'a, T> {
    type Item = (Index, &'a BinaryNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current) {
                if visited {
                    return Some((current, node));
                }
                self.stack.push((current, true));
                if let Some(r) = node.right {
                    self.stack.push((r, false));
                }
                if let Some(l) = node.left {
                    self.stack.push((l, false));
                }
            }
        }
        None
    }
}

pub struct LevelOrderIterator<'a, T> {
    arena: &'a BinaryArena<T>,
    queue: VecDeque<Index>,
}

impl<'a, T> LevelOrderIterator<'a, T> {
    fn new(arena: &'a BinaryArena<T>) -> Self {
        let mut queue = VecDeque::new();
        if let Some(root) = arena.root() {
            queue.push_back(root);
        }
        Self { arena, queue }
    }
}

impl<'a, T> Iterator for LevelOrderIterator<'a, T> {
    type Item = (Index, &'a BinaryNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.queue.pop_front()?;
        let node = self.arena.get_node(current)?;
        if let Some(l) = node.left {
            self.queue.push_back(l);
        }
        if let Some(r) = node.right {
            self.queue.push_back(r);
        }
        Some((current, node))
    }
}
