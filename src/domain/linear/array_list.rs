use tracing::debug;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::linear::{check_position, Sequence};

/// Contiguous list with an optional hard capacity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArrayList {
    items: Vec<i64>,
    capacity: Option<usize>,
}

impl ArrayList {
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            items: Vec::new(),
            capacity,
        }
    }

    /// Create pre-filled; fails when `values` does not fit `capacity`.
    pub fn with_values(values: &[i64], capacity: Option<usize>) -> DomainResult<Self> {
        if let Some(cap) = capacity {
            if values.len() > cap {
                return Err(DomainError::Capacity { capacity: cap });
            }
        }
        Ok(Self {
            items: values.to_vec(),
            capacity,
        })
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.capacity.is_some_and(|c| self.items.len() >= c)
    }
}

impl Sequence for ArrayList {
    fn insert(&mut self, value: i64, position: Option<usize>) -> DomainResult<usize> {
        let position = position.unwrap_or(self.items.len());
        check_position(position, self.items.len(), true)?;
        if let Some(capacity) = self.capacity.filter(|_| self.is_full()) {
            return Err(DomainError::Capacity { capacity });
        }
        self.items.insert(position, value);
        debug!(value, position, "arraylist insert");
        Ok(position)
    }

    fn delete_value(&mut self, value: i64) -> DomainResult<usize> {
        let position = self.position_of(value)?;
        self.items.remove(position);
        Ok(position)
    }

    fn delete_at(&mut self, position: usize) -> DomainResult<i64> {
        check_position(position, self.items.len(), false)?;
        Ok(self.items.remove(position))
    }

    fn position_of(&self, value: i64) -> DomainResult<usize> {
        self.items
            .iter()
            .position(|&v| v == value)
            .ok_or(DomainError::ValueNotFound(value))
    }

    fn get_at(&self, position: usize) -> DomainResult<i64> {
        check_position(position, self.items.len(), false)?;
        Ok(self.items[position])
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn clear(&mut self) {
        self.items.clear();
    }

    fn to_vec(&self) -> Vec<i64> {
        self.items.clone()
    }
}
