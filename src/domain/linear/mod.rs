//! Linear engines: array list, singly linked list and stack

pub mod array_list;
pub mod linked_list;
pub mod stack;

pub use array_list::ArrayList;
pub use linked_list::LinkedList;
pub use stack::Stack;

use crate::domain::error::{DomainError, DomainResult};

/// Operations shared by every linear structure.
///
/// Positions are 0-based. Every method either applies fully or returns an
/// error and leaves the sequence untouched.
pub trait Sequence {
    /// Insert `value` at `position`, or append when no position is given.
    /// Returns the position the value landed at.
    fn insert(&mut self, value: i64, position: Option<usize>) -> DomainResult<usize>;

    /// Remove the first element equal to `value`; returns its former position.
    fn delete_value(&mut self, value: i64) -> DomainResult<usize>;

    /// Remove and return the element at `position`.
    fn delete_at(&mut self, position: usize) -> DomainResult<i64>;

    /// Position of the first element equal to `value`.
    fn position_of(&self, value: i64) -> DomainResult<usize>;

    fn get_at(&self, position: usize) -> DomainResult<i64>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);

    /// Elements front to back.
    fn to_vec(&self) -> Vec<i64>;
}

/// Reject positions past `len` (for inserts) or at/after `len` (for reads).
pub(crate) fn check_position(position: usize, len: usize, inclusive: bool) -> DomainResult<()> {
    let ok = if inclusive {
        position <= len
    } else {
        position < len
    };
    if ok {
        Ok(())
    } else {
        Err(DomainError::IndexOutOfRange { position, len })
    }
}
