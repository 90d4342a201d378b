//! Command executor: the only writer of registry state
//!
//! Every command is validated first. `create`/`build` construct a complete new
//! instance and swap it in only on success; all other mutations go through
//! engine operations that either apply fully or fail untouched.

use std::fmt;

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::command::{BuildInput, ClearScope, Command, Locator, Lookup};
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::registry::{Registry, Structure};
use crate::application::validator::validate;
use crate::domain::{
    ArrayList, Balancing, BinaryTree, CodeTable, Domain, HuffmanTree, LinkedList, MergeStep,
    Rotation, SearchOutcome, SearchTree, Sequence, Stack, StructureKind, TraverseKind,
};

/// Data produced by a successful command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created {
        kind: StructureKind,
        size: usize,
    },
    /// BST/AVL built from values: duplicates skipped, rotations applied
    Built {
        kind: StructureKind,
        size: usize,
        skipped: Vec<i64>,
        rotations: Vec<Rotation>,
    },
    HuffmanBuilt {
        steps: Vec<MergeStep>,
        codes: CodeTable,
    },
    Inserted {
        kind: StructureKind,
        value: i64,
        at: Option<Locator>,
        rotations: Vec<Rotation>,
    },
    /// Removed values (a whole subtree for binary trees)
    Deleted {
        kind: StructureKind,
        removed: Vec<i64>,
        at: Option<Locator>,
        rotations: Vec<Rotation>,
    },
    /// `get at` and `peek`
    Element(i64),
    /// `get VALUE`: position of the first match
    Position(usize),
    Popped(i64),
    Pushed {
        value: i64,
        size: usize,
    },
    Search(SearchOutcome),
    Traversal {
        order: TraverseKind,
        values: Vec<i64>,
    },
    Encoded(String),
    Decoded(String),
    Cleared(ClearScope),
    Switched(Domain),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Created { kind, size } => write!(f, "created {kind} ({size} elements)"),
            Outcome::Built {
                kind,
                size,
                skipped,
                rotations,
            } => {
                write!(f, "built {kind} ({size} nodes)")?;
                if !skipped.is_empty() {
                    write!(f, ", skipped duplicates {}", skipped.iter().join(","))?;
                }
                if !rotations.is_empty() {
                    write!(f, ", rotations: {}", rotations.iter().join("; "))?;
                }
                Ok(())
            }
            Outcome::HuffmanBuilt { steps, codes } => {
                write!(
                    f,
                    "built huffman in {} merges, codes: {}",
                    steps.len(),
                    codes.iter().map(|(c, code)| format!("{c:?}={code}")).join(" ")
                )
            }
            Outcome::Inserted {
                kind,
                value,
                at,
                rotations,
            } => {
                write!(f, "inserted {value} into {kind}")?;
                if let Some(at) = at {
                    write!(f, " at {at}")?;
                }
                if !rotations.is_empty() {
                    write!(f, ", rotations: {}", rotations.iter().join("; "))?;
                }
                Ok(())
            }
            Outcome::Deleted {
                kind,
                removed,
                at,
                rotations,
            } => {
                write!(f, "deleted {} from {kind}", removed.iter().join(","))?;
                if let Some(at) = at {
                    write!(f, " at {at}")?;
                }
                if !rotations.is_empty() {
                    write!(f, ", rotations: {}", rotations.iter().join("; "))?;
                }
                Ok(())
            }
            Outcome::Element(v) => write!(f, "{v}"),
            Outcome::Position(p) => write!(f, "found at position {p}"),
            Outcome::Popped(v) => write!(f, "popped {v}"),
            Outcome::Pushed { value, size } => write!(f, "pushed {value} (size {size})"),
            Outcome::Search(s) => {
                let verdict = if s.found { "found" } else { "not found" };
                write!(f, "{verdict} after comparing {}", s.path.iter().join(" -> "))
            }
            Outcome::Traversal { order, values } => {
                write!(f, "{order}: {}", values.iter().join(" "))
            }
            Outcome::Encoded(bits) => write!(f, "{bits}"),
            Outcome::Decoded(text) => write!(f, "{text:?}"),
            Outcome::Cleared(ClearScope::Global) => f.write_str("cleared workspace"),
            Outcome::Cleared(ClearScope::Structure(kind)) => write!(f, "cleared {kind}"),
            Outcome::Switched(domain) => write!(f, "switched to {domain} context"),
        }
    }
}

/// Validate and apply `command`.
#[instrument(level = "debug", skip(registry), fields(command = %command))]
pub fn execute(registry: &mut Registry, command: &Command) -> ApplicationResult<Outcome> {
    validate(command, registry)?;
    let outcome = apply(registry, command)?;
    debug!(%outcome, "executed");
    Ok(outcome)
}

fn apply(registry: &mut Registry, command: &Command) -> ApplicationResult<Outcome> {
    match command {
        Command::Create {
            kind,
            values,
            capacity,
        } => {
            let structure = match kind {
                StructureKind::ArrayList => {
                    Structure::ArrayList(ArrayList::with_values(values, *capacity)?)
                }
                StructureKind::LinkedList => {
                    Structure::LinkedList(LinkedList::from_values(values))
                }
                StructureKind::Stack => Structure::Stack(Stack::from_values(values)),
                StructureKind::BinaryTree => {
                    Structure::BinaryTree(BinaryTree::from_level_order(values))
                }
                StructureKind::Bst => Structure::Bst(SearchTree::build(Balancing::None, values).0),
                StructureKind::Avl => Structure::Avl(SearchTree::build(Balancing::Avl, values).0),
                StructureKind::Huffman => Structure::Huffman(HuffmanTree::new()),
            };
            let size = structure.size();
            install(registry, structure);
            Ok(Outcome::Created { kind: *kind, size })
        }

        Command::Build { kind, input } => match (kind, input) {
            (StructureKind::Huffman, BuildInput::Frequencies(pairs)) => {
                let (tree, steps) = HuffmanTree::build(pairs)?;
                let codes = tree.codes().clone();
                install(registry, Structure::Huffman(tree));
                Ok(Outcome::HuffmanBuilt { steps, codes })
            }
            (StructureKind::Bst | StructureKind::Avl, BuildInput::Values(values)) => {
                let balancing = if *kind == StructureKind::Avl {
                    Balancing::Avl
                } else {
                    Balancing::None
                };
                let (tree, skipped, rotations) = SearchTree::build(balancing, values);
                let size = tree.len();
                let structure = if balancing == Balancing::Avl {
                    Structure::Avl(tree)
                } else {
                    Structure::Bst(tree)
                };
                install(registry, structure);
                Ok(Outcome::Built {
                    kind: *kind,
                    size,
                    skipped,
                    rotations,
                })
            }
            _ => Err(unsupported(command, *kind)),
        },

        Command::Insert { kind, value, at } => {
            let structure = live(registry, *kind)?;
            match structure {
                Structure::BinaryTree(tree) => {
                    let path = match at {
                        Some(Locator::Path(path)) => Some(path),
                        _ => None,
                    };
                    let placed = tree.insert(*value, path)?;
                    Ok(Outcome::Inserted {
                        kind: *kind,
                        value: *value,
                        at: Some(Locator::Path(placed)),
                        rotations: Vec::new(),
                    })
                }
                Structure::Bst(tree) | Structure::Avl(tree) => {
                    let rotations = tree.insert(*value)?;
                    Ok(Outcome::Inserted {
                        kind: *kind,
                        value: *value,
                        at: None,
                        rotations,
                    })
                }
                other => {
                    let sequence = other
                        .as_sequence_mut()
                        .ok_or_else(|| unsupported(command, *kind))?;
                    let position = match at {
                        Some(Locator::Position(p)) => Some(*p),
                        _ => None,
                    };
                    let placed = sequence.insert(*value, position)?;
                    Ok(Outcome::Inserted {
                        kind: *kind,
                        value: *value,
                        at: Some(Locator::Position(placed)),
                        rotations: Vec::new(),
                    })
                }
            }
        }

        Command::Delete { kind, value, at } => {
            let structure = live(registry, *kind)?;
            match (structure, value, at) {
                (Structure::BinaryTree(tree), _, Some(Locator::Path(path))) => {
                    let removed = tree.delete_at(path, *value)?;
                    Ok(deleted(*kind, removed, at.clone(), Vec::new()))
                }
                (Structure::BinaryTree(tree), Some(value), None) => {
                    let removed = tree.delete_value(*value)?;
                    Ok(deleted(*kind, removed, None, Vec::new()))
                }
                (Structure::Bst(tree) | Structure::Avl(tree), Some(value), None) => {
                    let rotations = tree.delete(*value)?;
                    Ok(deleted(*kind, vec![*value], None, rotations))
                }
                (other, value, at) => {
                    let sequence = other
                        .as_sequence_mut()
                        .ok_or_else(|| unsupported(command, *kind))?;
                    match (value, at) {
                        (_, Some(Locator::Position(position))) => {
                            let removed = sequence.delete_at(*position)?;
                            Ok(deleted(*kind, vec![removed], at.clone(), Vec::new()))
                        }
                        (Some(value), None) => {
                            let position = sequence.delete_value(*value)?;
                            Ok(deleted(
                                *kind,
                                vec![*value],
                                Some(Locator::Position(position)),
                                Vec::new(),
                            ))
                        }
                        _ => Err(unsupported(command, *kind)),
                    }
                }
            }
        }

        Command::Get { kind, lookup } => {
            let sequence = live(registry, *kind)?
                .as_sequence()
                .ok_or_else(|| unsupported(command, *kind))?;
            match lookup {
                Lookup::Position(p) => Ok(Outcome::Element(sequence.get_at(*p)?)),
                Lookup::Value(v) => Ok(Outcome::Position(sequence.position_of(*v)?)),
            }
        }

        Command::Push { kind, value } => match live(registry, *kind)? {
            Structure::Stack(stack) => {
                stack.push(*value);
                Ok(Outcome::Pushed {
                    value: *value,
                    size: stack.len(),
                })
            }
            _ => Err(unsupported(command, *kind)),
        },
        Command::Pop { kind } => match live(registry, *kind)? {
            Structure::Stack(stack) => Ok(Outcome::Popped(stack.pop()?)),
            _ => Err(unsupported(command, *kind)),
        },
        Command::Peek { kind } => match live(registry, *kind)? {
            Structure::Stack(stack) => Ok(Outcome::Element(stack.peek()?)),
            _ => Err(unsupported(command, *kind)),
        },

        Command::Search { kind, value } => match live(registry, *kind)? {
            Structure::Bst(tree) | Structure::Avl(tree) => Ok(Outcome::Search(tree.search(*value))),
            _ => Err(unsupported(command, *kind)),
        },

        Command::Traverse { kind, order } => match live(registry, *kind)? {
            Structure::BinaryTree(tree) => Ok(Outcome::Traversal {
                order: *order,
                values: tree.traverse(*order),
            }),
            _ => Err(unsupported(command, *kind)),
        },

        Command::Encode { kind, text } => match live(registry, *kind)? {
            Structure::Huffman(tree) => Ok(Outcome::Encoded(tree.encode(text)?)),
            _ => Err(unsupported(command, *kind)),
        },
        Command::Decode { kind, bits } => match live(registry, *kind)? {
            Structure::Huffman(tree) => Ok(Outcome::Decoded(tree.decode(bits)?)),
            _ => Err(unsupported(command, *kind)),
        },

        Command::Clear { scope } => {
            match scope {
                ClearScope::Global => registry.clear(),
                ClearScope::Structure(kind) => {
                    registry.remove(*kind);
                }
            }
            Ok(Outcome::Cleared(*scope))
        }

        Command::Use { domain } => {
            registry.set_active(Some(*domain));
            Ok(Outcome::Switched(*domain))
        }
    }
}

/// Swap in a freshly built structure and adopt its context if none is active.
fn install(registry: &mut Registry, structure: Structure) {
    let domain = structure.kind().domain();
    registry.replace(structure);
    if registry.active().is_none() {
        registry.set_active(Some(domain));
    }
}

fn live(registry: &mut Registry, kind: StructureKind) -> ApplicationResult<&mut Structure> {
    registry
        .get_mut(kind)
        .ok_or(ApplicationError::Precondition { kind })
}

fn unsupported(command: &Command, kind: StructureKind) -> ApplicationError {
    ApplicationError::UnsupportedOperation {
        verb: command.verb().to_string(),
        kind,
    }
}

fn deleted(
    kind: StructureKind,
    removed: Vec<i64>,
    at: Option<Locator>,
    rotations: Vec<Rotation>,
) -> Outcome {
    Outcome::Deleted {
        kind,
        removed,
        at,
        rotations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::parser::parse_statement;
    use crate::application::ErrorKind;
    use crate::domain::DomainError;

    fn run(registry: &mut Registry, statement: &str) -> ApplicationResult<Outcome> {
        execute(registry, &parse_statement(statement).unwrap())
    }

    fn linear(registry: &Registry, kind: StructureKind) -> Vec<i64> {
        registry
            .get(kind)
            .and_then(|s| s.as_sequence())
            .map(|s| s.to_vec())
            .unwrap_or_default()
    }

    #[test]
    fn given_arraylist_when_inserting_and_getting_then_positions_follow() {
        let mut registry = Registry::new();
        run(&mut registry, "create arraylist with 1,2,3").unwrap();
        run(&mut registry, "insert 100 at 0 in arraylist").unwrap();
        assert_eq!(
            run(&mut registry, "get at 0 from arraylist"),
            Ok(Outcome::Element(100))
        );
        run(&mut registry, "delete 3 from arraylist").unwrap();
        let err = run(&mut registry, "get 3 from arraylist").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(linear(&registry, StructureKind::ArrayList), vec![100, 1, 2]);
    }

    #[test]
    fn given_full_arraylist_when_inserting_then_capacity_error_without_mutation() {
        let mut registry = Registry::new();
        run(&mut registry, "create arraylist with 1,2 size 2").unwrap();
        let err = run(&mut registry, "insert 3 in arraylist").unwrap_err();
        assert_eq!(err, ApplicationError::Domain(DomainError::Capacity { capacity: 2 }));
        assert_eq!(linear(&registry, StructureKind::ArrayList), vec![1, 2]);
    }

    #[test]
    fn given_values_over_capacity_when_creating_then_previous_instance_kept() {
        let mut registry = Registry::new();
        run(&mut registry, "create arraylist with 9").unwrap();
        let err = run(&mut registry, "create arraylist with 1,2,3 size 2").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Capacity);
        assert_eq!(linear(&registry, StructureKind::ArrayList), vec![9]);
    }

    #[test]
    fn given_stack_when_pushing_popping_peeking_then_lifo() {
        let mut registry = Registry::new();
        run(&mut registry, "create stack").unwrap();
        run(&mut registry, "push 10 to stack").unwrap();
        run(&mut registry, "push 20 to stack").unwrap();
        assert_eq!(run(&mut registry, "peek stack"), Ok(Outcome::Element(20)));
        assert_eq!(run(&mut registry, "pop from stack"), Ok(Outcome::Popped(20)));
        assert_eq!(run(&mut registry, "pop from stack"), Ok(Outcome::Popped(10)));
        assert_eq!(
            run(&mut registry, "pop from stack").unwrap_err().kind(),
            ErrorKind::Empty
        );
    }

    #[test]
    fn given_huge_stack_size_when_creating_then_created_and_unbounded() {
        let mut registry = Registry::new();
        assert_eq!(
            run(&mut registry, "create stack with 1 size 9223372036854775807"),
            Ok(Outcome::Created {
                kind: StructureKind::Stack,
                size: 1
            })
        );
        run(&mut registry, "push 2 to stack").unwrap();
        assert_eq!(linear(&registry, StructureKind::Stack), vec![1, 2]);
    }

    #[test]
    fn given_no_binarytree_when_inserting_by_path_then_precondition() {
        let mut registry = Registry::new();
        let err = run(&mut registry, "insert 6 at 0,1 in binarytree").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Precondition);

        run(&mut registry, "create binarytree with 1,2,3").unwrap();
        assert!(run(&mut registry, "insert 6 at 0,1 in binarytree").is_ok());
        assert_eq!(
            run(&mut registry, "insert 7 at 1,0,1 in binarytree").unwrap_err().kind(),
            ErrorKind::InvalidPath
        );
    }

    #[test]
    fn given_binarytree_when_deleting_by_path_with_value_then_value_verified() {
        let mut registry = Registry::new();
        run(&mut registry, "create binarytree with 1,2,3,4").unwrap();
        assert_eq!(
            run(&mut registry, "delete 5 at 0 from binarytree").unwrap_err().kind(),
            ErrorKind::InvalidPath
        );
        let outcome = run(&mut registry, "delete 2 at 0 from binarytree").unwrap();
        assert!(matches!(outcome, Outcome::Deleted { ref removed, .. } if removed == &vec![2, 4]));
        assert_eq!(
            run(&mut registry, "traverse levelorder"),
            Ok(Outcome::Traversal {
                order: TraverseKind::Levelorder,
                values: vec![1, 3]
            })
        );
    }

    #[test]
    fn given_avl_build_when_sorted_input_then_rotations_reported() {
        let mut registry = Registry::new();
        let outcome = run(&mut registry, "build avl with 1,2,3,3").unwrap();
        match outcome {
            Outcome::Built {
                size,
                skipped,
                rotations,
                ..
            } => {
                assert_eq!(size, 3);
                assert_eq!(skipped, vec![3]);
                assert_eq!(rotations.len(), 1);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(
            run(&mut registry, "insert 2 in avl").unwrap_err().kind(),
            ErrorKind::Duplicate
        );
    }

    #[test]
    fn given_huffman_when_created_empty_then_encode_fails_until_built() {
        let mut registry = Registry::new();
        run(&mut registry, "create huffman").unwrap();
        assert_eq!(
            run(&mut registry, r#"encode "a" using huffman"#).unwrap_err().kind(),
            ErrorKind::Empty
        );
        run(&mut registry, "build huffman with a:5,b:2,c:1").unwrap();
        let Outcome::Encoded(bits) = run(&mut registry, r#"encode "abac" using huffman"#).unwrap()
        else {
            panic!("expected encoded bits");
        };
        assert_eq!(
            run(&mut registry, &format!("decode {bits} using huffman")),
            Ok(Outcome::Decoded("abac".into()))
        );
        assert_eq!(
            run(&mut registry, r#"encode "z" using huffman"#).unwrap_err().kind(),
            ErrorKind::UnknownCharacter
        );
    }

    #[test]
    fn given_overflowing_frequencies_when_building_huffman_then_previous_tree_kept() {
        let mut registry = Registry::new();
        run(&mut registry, "build huffman with a:5,b:2").unwrap();
        let err = run(&mut registry, "build huffman with a:18446744073709551615,b:1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Capacity);
        assert_eq!(
            run(&mut registry, r#"encode "ab" using huffman"#),
            Ok(Outcome::Encoded("10".into()))
        );
    }

    #[test]
    fn given_first_create_when_no_context_then_context_adopted() {
        let mut registry = Registry::new();
        run(&mut registry, "create linkedlist with 1").unwrap();
        assert_eq!(registry.active(), Some(Domain::Linear));
        assert_eq!(
            run(&mut registry, "build bst with 1").unwrap_err().kind(),
            ErrorKind::Context
        );
        run(&mut registry, "use tree").unwrap();
        assert!(run(&mut registry, "build bst with 1").is_ok());
        run(&mut registry, "clear").unwrap();
        assert!(registry.is_empty());
        assert_eq!(registry.active(), None);
    }

    #[test]
    fn given_structure_clear_when_executed_then_only_that_structure_destroyed() {
        let mut registry = Registry::new();
        run(&mut registry, "create stack with 1,2").unwrap();
        run(&mut registry, "create arraylist with 3").unwrap();
        run(&mut registry, "clear stack").unwrap();
        assert!(!registry.contains(StructureKind::Stack));
        assert_eq!(linear(&registry, StructureKind::ArrayList), vec![3]);
        assert_eq!(registry.active(), Some(Domain::Linear));
        assert_eq!(
            run(&mut registry, "pop from stack").unwrap_err().kind(),
            ErrorKind::Precondition
        );
    }
}
