use generational_arena::{Arena, Index};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::linear::{check_position, Sequence};

#[derive(Debug, Clone)]
struct ListNode {
    value: i64,
    next: Option<Index>,
}

/// Singly linked list over an arena of nodes.
///
/// Following `next` from `head` reaches `None` in exactly `len` steps.
#[derive(Debug, Clone, Default)]
pub struct LinkedList {
    nodes: Arena<ListNode>,
    head: Option<Index>,
    len: usize,
}

impl LinkedList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: &[i64]) -> Self {
        let mut list = Self::new();
        // Build back to front so every node is linked once
        for &value in values.iter().rev() {
            let idx = list.nodes.insert(ListNode {
                value,
                next: list.head,
            });
            list.head = Some(idx);
            list.len += 1;
        }
        list
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let node = self.nodes.get(cursor?)?;
            cursor = node.next;
            Some(node.value)
        })
    }

    /// Index of the node at `position`; caller has range-checked it.
    fn node_at(&self, position: usize) -> Option<Index> {
        let mut cursor = self.head;
        for _ in 0..position {
            cursor = self.nodes.get(cursor?)?.next;
        }
        cursor
    }

    /// Unlink the node after `prev` (or the head when `prev` is None).
    fn unlink_after(&mut self, prev: Option<Index>) -> Option<i64> {
        let target = match prev {
            Some(p) => self.nodes.get(p)?.next?,
            None => self.head?,
        };
        let removed = self.nodes.remove(target)?;
        match prev {
            Some(p) => {
                if let Some(node) = self.nodes.get_mut(p) {
                    node.next = removed.next;
                }
            }
            None => self.head = removed.next,
        }
        self.len -= 1;
        Some(removed.value)
    }
}

impl Sequence for LinkedList {
    fn insert(&mut self, value: i64, position: Option<usize>) -> DomainResult<usize> {
        let position = position.unwrap_or(self.len);
        check_position(position, self.len, true)?;
        if position == 0 {
            let idx = self.nodes.insert(ListNode {
                value,
                next: self.head,
            });
            self.head = Some(idx);
        } else {
            let prev = self
                .node_at(position - 1)
                .ok_or(DomainError::IndexOutOfRange {
                    position,
                    len: self.len,
                })?;
            let next = self.nodes.get(prev).and_then(|n| n.next);
            let idx = self.nodes.insert(ListNode { value, next });
            if let Some(node) = self.nodes.get_mut(prev) {
                node.next = Some(idx);
            }
        }
        self.len += 1;
        Ok(position)
    }

    fn delete_value(&mut self, value: i64) -> DomainResult<usize> {
        let position = self.position_of(value)?;
        let prev = match position {
            0 => None,
            p => self.node_at(p - 1),
        };
        self.unlink_after(prev)
            .map(|_| position)
            .ok_or(DomainError::ValueNotFound(value))
    }

    fn delete_at(&mut self, position: usize) -> DomainResult<i64> {
        check_position(position, self.len, false)?;
        let prev = match position {
            0 => None,
            p => self.node_at(p - 1),
        };
        self.unlink_after(prev).ok_or(DomainError::IndexOutOfRange {
            position,
            len: self.len,
        })
    }

    fn position_of(&self, value: i64) -> DomainResult<usize> {
        self.iter()
            .position(|v| v == value)
            .ok_or(DomainError::ValueNotFound(value))
    }

    fn get_at(&self, position: usize) -> DomainResult<i64> {
        check_position(position, self.len, false)?;
        self.node_at(position)
            .and_then(|idx| self.nodes.get(idx))
            .map(|n| n.value)
            .ok_or(DomainError::IndexOutOfRange {
                position,
                len: self.len,
            })
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.len = 0;
    }

    fn to_vec(&self) -> Vec<i64> {
        self.iter().collect()
    }
}
