//! Tree engines built on [`BinaryArena`](crate::domain::arena::BinaryArena)

pub mod binary_tree;
pub mod huffman;
pub mod search_tree;

pub use binary_tree::BinaryTree;
pub use huffman::{CodeTable, HuffmanTree, MergeStep};
pub use search_tree::{Balancing, Rotation, RotationKind, SearchOutcome, SearchTree};
