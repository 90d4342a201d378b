//! Domain vocabulary: structure kinds, domains, traversal orders and tree paths

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// The two command categories with mutually exclusive context rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Linear,
    Tree,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Linear => "linear",
            Domain::Tree => "tree",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Domain::Linear),
            "tree" => Ok(Domain::Tree),
            other => Err(format!("unknown domain: {other}")),
        }
    }
}

/// The closed set of structures a workspace can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StructureKind {
    ArrayList,
    LinkedList,
    Stack,
    BinaryTree,
    Bst,
    Avl,
    Huffman,
}

impl StructureKind {
    pub const ALL: [StructureKind; 7] = [
        StructureKind::ArrayList,
        StructureKind::LinkedList,
        StructureKind::Stack,
        StructureKind::BinaryTree,
        StructureKind::Bst,
        StructureKind::Avl,
        StructureKind::Huffman,
    ];

    /// Keyword used by the bare command syntax.
    pub fn name(&self) -> &'static str {
        match self {
            StructureKind::ArrayList => "arraylist",
            StructureKind::LinkedList => "linkedlist",
            StructureKind::Stack => "stack",
            StructureKind::BinaryTree => "binarytree",
            StructureKind::Bst => "bst",
            StructureKind::Avl => "avl",
            StructureKind::Huffman => "huffman",
        }
    }

    /// Segment used by the `tree.<structure>.<verb>` syntax.
    ///
    /// Only tree structures have one.
    pub fn dotted_name(&self) -> Option<&'static str> {
        match self {
            StructureKind::BinaryTree => Some("binary_tree"),
            StructureKind::Bst => Some("bst"),
            StructureKind::Avl => Some("avl"),
            StructureKind::Huffman => Some("huffman"),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    pub fn from_dotted_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.dotted_name() == Some(name))
    }

    pub fn domain(&self) -> Domain {
        match self {
            StructureKind::ArrayList | StructureKind::LinkedList | StructureKind::Stack => {
                Domain::Linear
            }
            _ => Domain::Tree,
        }
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Visiting order for tree traversals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraverseKind {
    Preorder,
    Inorder,
    Postorder,
    Levelorder,
}

impl TraverseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TraverseKind::Preorder => "preorder",
            TraverseKind::Inorder => "inorder",
            TraverseKind::Postorder => "postorder",
            TraverseKind::Levelorder => "levelorder",
        }
    }
}

impl fmt::Display for TraverseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TraverseKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "preorder" => Ok(TraverseKind::Preorder),
            "inorder" => Ok(TraverseKind::Inorder),
            "postorder" => Ok(TraverseKind::Postorder),
            "levelorder" => Ok(TraverseKind::Levelorder),
            other => Err(format!("unknown traversal: {other}")),
        }
    }
}

/// One step of a tree path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn from_bit(bit: u8) -> Option<Self> {
        match bit {
            0 => Some(Direction::Left),
            1 => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn bit(&self) -> char {
        match self {
            Direction::Left => '0',
            Direction::Right => '1',
        }
    }
}

/// Root-relative address of a binary tree node: 0 = left, 1 = right.
///
/// The empty path addresses the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TreePath(Vec<Direction>);

impl TreePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new(steps: Vec<Direction>) -> Self {
        Self(steps)
    }

    /// Build a path from 0/1 digits; any other digit yields `None`.
    pub fn from_bits(bits: &[u8]) -> Option<Self> {
        bits.iter()
            .map(|&b| Direction::from_bit(b))
            .collect::<Option<Vec<_>>>()
            .map(Self)
    }

    pub fn steps(&self) -> &[Direction] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Split into the parent path and the final step.
    pub fn split_last(&self) -> Option<(TreePath, Direction)> {
        let (last, init) = self.0.split_last()?;
        Some((TreePath(init.to_vec()), *last))
    }

    pub fn child(&self, direction: Direction) -> TreePath {
        let mut steps = self.0.clone();
        steps.push(direction);
        TreePath(steps)
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().map(|d| d.bit()).join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_structure_names_when_resolving_then_round_trips_and_rejects_underscored_linear() {
        for kind in StructureKind::ALL {
            assert_eq!(StructureKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(StructureKind::from_name("array_list"), None);
        assert_eq!(
            StructureKind::from_dotted_name("binary_tree"),
            Some(StructureKind::BinaryTree)
        );
        assert_eq!(StructureKind::from_dotted_name("stack"), None);
    }

    #[test]
    fn given_bits_when_building_path_then_rejects_non_binary_digits() {
        let path = TreePath::from_bits(&[0, 1, 1]).unwrap();
        assert_eq!(path.to_string(), "0,1,1");
        assert!(TreePath::from_bits(&[0, 2]).is_none());

        let (parent, last) = path.split_last().unwrap();
        assert_eq!(parent.to_string(), "0,1");
        assert_eq!(last, Direction::Right);
        assert!(TreePath::root().split_last().is_none());
    }
}
