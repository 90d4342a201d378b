//! Context validation of parsed commands against the registry
//!
//! Checks run in a fixed order and the first failure wins:
//! existence, then context, then verb-to-kind capability.

use tracing::trace;

use crate::application::command::{Command, Locator, Verb};
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::registry::Registry;
use crate::domain::StructureKind;

/// Verbs each structure kind accepts.
pub fn capabilities(kind: StructureKind) -> &'static [Verb] {
    use Verb::*;
    match kind {
        StructureKind::ArrayList | StructureKind::LinkedList => {
            &[Create, Insert, Delete, Get, Clear]
        }
        StructureKind::Stack => &[Create, Insert, Delete, Get, Push, Pop, Peek, Clear],
        StructureKind::BinaryTree => &[Create, Insert, Delete, Traverse, Clear],
        StructureKind::Bst | StructureKind::Avl => &[Create, Insert, Delete, Search, Build, Clear],
        StructureKind::Huffman => &[Create, Build, Encode, Decode, Clear],
    }
}

pub fn supports(kind: StructureKind, verb: Verb) -> bool {
    capabilities(kind).contains(&verb)
}

/// Accept `command` or name the reason it cannot run. Never mutates.
pub fn validate(command: &Command, registry: &Registry) -> ApplicationResult<()> {
    let Some(kind) = command.structure() else {
        // global clear and `use` apply in any state
        return Ok(());
    };

    let creates = command.is_rebuild() || command.verb() == Verb::Clear;
    if !creates && !registry.contains(kind) {
        return Err(ApplicationError::Precondition { kind });
    }

    if let Some(active) = registry.active() {
        if kind.domain() != active {
            return Err(ApplicationError::Context {
                command: command.to_string(),
                command_domain: kind.domain(),
                active,
            });
        }
    }

    let verb = command.verb();
    if !supports(kind, verb) {
        return Err(ApplicationError::UnsupportedOperation {
            verb: verb.to_string(),
            kind,
        });
    }

    // search trees place values by ordering, never by path
    if matches!(kind, StructureKind::Bst | StructureKind::Avl) {
        let addressed = match command {
            Command::Insert { at, .. } | Command::Delete { at, .. } => {
                matches!(at, Some(Locator::Path(_)))
            }
            _ => false,
        };
        if addressed {
            return Err(ApplicationError::UnsupportedOperation {
                verb: format!("{verb} at a path"),
                kind,
            });
        }
    }

    trace!(%command, "validated");
    Ok(())
}
