use crate::domain::error::{DomainError, DomainResult};
use crate::domain::linear::{check_position, Sequence};

/// LIFO stack; position 0 is the bottom, the top is the last element.
///
/// Unbounded: a `size` given at creation is accepted and ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stack {
    items: Vec<i64>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: &[i64]) -> Self {
        Self {
            items: values.to_vec(),
        }
    }

    pub fn push(&mut self, value: i64) {
        self.items.push(value);
    }

    pub fn pop(&mut self) -> DomainResult<i64> {
        self.items.pop().ok_or(DomainError::Empty("stack"))
    }

    pub fn peek(&self) -> DomainResult<i64> {
        self.items.last().copied().ok_or(DomainError::Empty("stack"))
    }
}

impl Sequence for Stack {
    fn insert(&mut self, value: i64, position: Option<usize>) -> DomainResult<usize> {
        let position = position.unwrap_or(self.items.len());
        check_position(position, self.items.len(), true)?;
        self.items.insert(position, value);
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_pushes_when_popping_then_lifo_order() {
        let mut stack = Stack::new();
        stack.push(1);
        stack.push(2);
        stack.push(3);
        assert_eq!(stack.peek(), Ok(3));
        assert_eq!(stack.pop(), Ok(3));
        assert_eq!(stack.pop(), Ok(2));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn given_empty_stack_when_popping_or_peeking_then_empty_error() {
        let mut stack = Stack::default();
        assert_eq!(stack.pop(), Err(DomainError::Empty("stack")));
        assert_eq!(stack.peek(), Err(DomainError::Empty("stack")));
    }
}
