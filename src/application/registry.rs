//! Structure registry: one live instance per kind plus the active context

use std::collections::BTreeMap;

use crate::domain::{
    ArrayList, BinaryTree, Domain, HuffmanTree, LinkedList, SearchTree, Sequence, Stack,
    StructureKind,
};

/// A live structure owned by the registry.
#[derive(Debug, Clone)]
pub enum Structure {
    ArrayList(ArrayList),
    LinkedList(LinkedList),
    Stack(Stack),
    BinaryTree(BinaryTree),
    Bst(SearchTree),
    Avl(SearchTree),
    Huffman(HuffmanTree),
}

impl Structure {
    pub fn kind(&self) -> StructureKind {
        match self {
            Structure::ArrayList(_) => StructureKind::ArrayList,
            Structure::LinkedList(_) => StructureKind::LinkedList,
            Structure::Stack(_) => StructureKind::Stack,
            Structure::BinaryTree(_) => StructureKind::BinaryTree,
            Structure::Bst(_) => StructureKind::Bst,
            Structure::Avl(_) => StructureKind::Avl,
            Structure::Huffman(_) => StructureKind::Huffman,
        }
    }

    /// Element count (node count for trees).
    pub fn size(&self) -> usize {
        match self {
            Structure::ArrayList(s) => s.len(),
            Structure::LinkedList(s) => s.len(),
            Structure::Stack(s) => s.len(),
            Structure::BinaryTree(t) => t.len(),
            Structure::Bst(t) | Structure::Avl(t) => t.len(),
            Structure::Huffman(t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Linear view of the structure, if it has one.
    pub fn as_sequence(&self) -> Option<&dyn Sequence> {
        match self {
            Structure::ArrayList(s) => Some(s),
            Structure::LinkedList(s) => Some(s),
            Structure::Stack(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut dyn Sequence> {
        match self {
            Structure::ArrayList(s) => Some(s),
            Structure::LinkedList(s) => Some(s),
            Structure::Stack(s) => Some(s),
            _ => None,
        }
    }
}

/// Holds the workspace state the executor mutates.
///
/// A fresh registry has no active context; the first `create`/`build`
/// adopts one and `use` switches it explicitly.
#[derive(Debug, Default)]
pub struct Registry {
    structures: BTreeMap<StructureKind, Structure>,
    active: Option<Domain>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<Domain> {
        self.active
    }

    pub fn set_active(&mut self, domain: Option<Domain>) {
        self.active = domain;
    }

    pub fn contains(&self, kind: StructureKind) -> bool {
        self.structures.contains_key(&kind)
    }

    pub fn get(&self, kind: StructureKind) -> Option<&Structure> {
        self.structures.get(&kind)
    }

    pub fn get_mut(&mut self, kind: StructureKind) -> Option<&mut Structure> {
        self.structures.get_mut(&kind)
    }

    /// Replace whatever instance of the same kind was live.
    pub fn replace(&mut self, structure: Structure) -> Option<Structure> {
        self.structures.insert(structure.kind(), structure)
    }

    pub fn remove(&mut self, kind: StructureKind) -> Option<Structure> {
        self.structures.remove(&kind)
    }

    /// Destroy every structure and forget the active context.
    pub fn clear(&mut self) {
        self.structures.clear();
        self.active = None;
    }

    pub fn iter(&self) -> impl Iterator<Item = &Structure> {
        self.structures.values()
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }
}
