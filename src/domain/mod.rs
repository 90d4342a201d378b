//! Domain layer: data-structure engines and their vocabulary
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod entities;
pub mod error;
pub mod linear;
pub mod tree;

pub use arena::{BinaryArena, BinaryNode};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use linear::{ArrayList, LinkedList, Sequence, Stack};
pub use tree::{
    Balancing, BinaryTree, CodeTable, HuffmanTree, MergeStep, Rotation, RotationKind,
    SearchOutcome, SearchTree,
};
