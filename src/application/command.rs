//! Canonical command representation
//!
//! Every surface syntax the parser accepts reduces to one [`Command`]. Its
//! `Display` output is the bare-keyword form, which parses back to the same
//! command and is what the recorder stores.

use std::fmt;

use itertools::Itertools;

use crate::domain::{Domain, StructureKind, TraverseKind, TreePath};

/// Where an insert/delete/get applies: a list position or a tree path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Position(usize),
    Path(TreePath),
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Position(p) => write!(f, "{p}"),
            Locator::Path(path) => write!(f, "{path}"),
        }
    }
}

/// Target of a `get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Value(i64),
    Position(usize),
}

/// Payload of a `build`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildInput {
    Values(Vec<i64>),
    Frequencies(Vec<(char, u64)>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearScope {
    /// Destroys every structure and resets the active context
    Global,
    Structure(StructureKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Create,
    Insert,
    Delete,
    Get,
    Push,
    Pop,
    Peek,
    Search,
    Traverse,
    Build,
    Encode,
    Decode,
    Clear,
    Use,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Create => "create",
            Verb::Insert => "insert",
            Verb::Delete => "delete",
            Verb::Get => "get",
            Verb::Push => "push",
            Verb::Pop => "pop",
            Verb::Peek => "peek",
            Verb::Search => "search",
            Verb::Traverse => "traverse",
            Verb::Build => "build",
            Verb::Encode => "encode",
            Verb::Decode => "decode",
            Verb::Clear => "clear",
            Verb::Use => "use",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed statement. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create {
        kind: StructureKind,
        values: Vec<i64>,
        capacity: Option<usize>,
    },
    Insert {
        kind: StructureKind,
        value: i64,
        at: Option<Locator>,
    },
    /// At least one of `value` and `at` is present.
    Delete {
        kind: StructureKind,
        value: Option<i64>,
        at: Option<Locator>,
    },
    Get {
        kind: StructureKind,
        lookup: Lookup,
    },
    Push {
        kind: StructureKind,
        value: i64,
    },
    Pop {
        kind: StructureKind,
    },
    Peek {
        kind: StructureKind,
    },
    Search {
        kind: StructureKind,
        value: i64,
    },
    Traverse {
        kind: StructureKind,
        order: TraverseKind,
    },
    Build {
        kind: StructureKind,
        input: BuildInput,
    },
    Encode {
        kind: StructureKind,
        text: String,
    },
    Decode {
        kind: StructureKind,
        bits: String,
    },
    Clear {
        scope: ClearScope,
    },
    Use {
        domain: Domain,
    },
}

impl Command {
    pub fn verb(&self) -> Verb {
        match self {
            Command::Create { .. } => Verb::Create,
            Command::Insert { .. } => Verb::Insert,
            Command::Delete { .. } => Verb::Delete,
            Command::Get { .. } => Verb::Get,
            Command::Push { .. } => Verb::Push,
            Command::Pop { .. } => Verb::Pop,
            Command::Peek { .. } => Verb::Peek,
            Command::Search { .. } => Verb::Search,
            Command::Traverse { .. } => Verb::Traverse,
            Command::Build { .. } => Verb::Build,
            Command::Encode { .. } => Verb::Encode,
            Command::Decode { .. } => Verb::Decode,
            Command::Clear { .. } => Verb::Clear,
            Command::Use { .. } => Verb::Use,
        }
    }

    /// Structure the command targets; `None` for global clear and `use`.
    pub fn structure(&self) -> Option<StructureKind> {
        match self {
            Command::Create { kind, .. }
            | Command::Insert { kind, .. }
            | Command::Delete { kind, .. }
            | Command::Get { kind, .. }
            | Command::Push { kind, .. }
            | Command::Pop { kind }
            | Command::Peek { kind }
            | Command::Search { kind, .. }
            | Command::Traverse { kind, .. }
            | Command::Build { kind, .. }
            | Command::Encode { kind, .. }
            | Command::Decode { kind, .. } => Some(*kind),
            Command::Clear {
                scope: ClearScope::Structure(kind),
            } => Some(*kind),
            Command::Clear {
                scope: ClearScope::Global,
            }
            | Command::Use { .. } => None,
        }
    }

    pub fn domain(&self) -> Option<Domain> {
        self.structure().map(|k| k.domain())
    }

    /// `create` and `build` replace the structure they name.
    pub fn is_rebuild(&self) -> bool {
        matches!(self, Command::Create { .. } | Command::Build { .. })
    }

    pub fn is_global_clear(&self) -> bool {
        matches!(
            self,
            Command::Clear {
                scope: ClearScope::Global
            }
        )
    }
}

fn join_values(values: &[i64]) -> String {
    values.iter().join(",")
}

fn quote(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Create {
                kind,
                values,
                capacity,
            } => {
                write!(f, "create {kind}")?;
                if !values.is_empty() {
                    write!(f, " with {}", join_values(values))?;
                }
                if let Some(capacity) = capacity {
                    write!(f, " size {capacity}")?;
                }
                Ok(())
            }
            Command::Insert { kind, value, at } => {
                write!(f, "insert {value}")?;
                if let Some(at) = at {
                    write!(f, " at {at}")?;
                }
                write!(f, " in {kind}")
            }
            Command::Delete { kind, value, at } => {
                f.write_str("delete")?;
                if let Some(value) = value {
                    write!(f, " {value}")?;
                }
                if let Some(at) = at {
                    write!(f, " at {at}")?;
                }
                write!(f, " from {kind}")
            }
            Command::Get { kind, lookup } => match lookup {
                Lookup::Value(v) => write!(f, "get {v} from {kind}"),
                Lookup::Position(p) => write!(f, "get at {p} from {kind}"),
            },
            Command::Push { kind, value } => write!(f, "push {value} to {kind}"),
            Command::Pop { kind } => write!(f, "pop from {kind}"),
            Command::Peek { kind } => write!(f, "peek {kind}"),
            Command::Search { kind, value } => write!(f, "search {value} in {kind}"),
            Command::Traverse { kind, order } => write!(f, "traverse {order} in {kind}"),
            Command::Build { kind, input } => {
                let items = match input {
                    BuildInput::Values(values) => join_values(values),
                    BuildInput::Frequencies(pairs) => {
                        pairs.iter().map(|(c, n)| format!("{c}:{n}")).join(",")
                    }
                };
                write!(f, "build {kind} with {items}")
            }
            Command::Encode { kind, text } => write!(f, "encode {} using {kind}", quote(text)),
            Command::Decode { kind, bits } => write!(f, "decode {bits} using {kind}"),
            Command::Clear {
                scope: ClearScope::Global,
            } => f.write_str("clear"),
            Command::Clear {
                scope: ClearScope::Structure(kind),
            } => write!(f, "clear {kind}"),
            Command::Use { domain } => write!(f, "use {domain}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn path(bits: &[u8]) -> TreePath {
        TreePath::from_bits(bits).unwrap()
    }

    #[rstest]
    #[case(
        Command::Create { kind: StructureKind::ArrayList, values: vec![1, 2, 3], capacity: Some(10) },
        "create arraylist with 1,2,3 size 10"
    )]
    #[case(
        Command::Insert { kind: StructureKind::BinaryTree, value: 6, at: Some(Locator::Path(path(&[0, 1]))) },
        "insert 6 at 0,1 in binarytree"
    )]
    #[case(
        Command::Delete { kind: StructureKind::LinkedList, value: None, at: Some(Locator::Position(1)) },
        "delete at 1 from linkedlist"
    )]
    #[case(
        Command::Build { kind: StructureKind::Huffman, input: BuildInput::Frequencies(vec![('a', 5), ('b', 9)]) },
        "build huffman with a:5,b:9"
    )]
    #[case(
        Command::Encode { kind: StructureKind::Huffman, text: "say \"hi\"".into() },
        "encode \"say \\\"hi\\\"\" using huffman"
    )]
    #[case(Command::Clear { scope: ClearScope::Global }, "clear")]
    fn given_command_when_displayed_then_canonical_text(
        #[case] command: Command,
        #[case] expected: &str,
    ) {
        assert_eq!(command.to_string(), expected);
    }

    #[test]
    fn given_global_commands_when_asking_domain_then_none() {
        assert_eq!(Command::Clear { scope: ClearScope::Global }.domain(), None);
        assert_eq!(Command::Use { domain: Domain::Tree }.domain(), None);
        assert_eq!(
            Command::Pop {
                kind: StructureKind::Stack
            }
            .domain(),
            Some(Domain::Linear)
        );
    }
}
