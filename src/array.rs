//! PDF arrays.
//!
//! An ordered sequence of heterogeneous values, written as `[v1 v2 ...]`.

use crate::error::{Error, Result};
use crate::object::Object;

/// A PDF array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Array {
    values: Vec<Object>,
}

impl Array {
    /// Create an empty array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an array with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    /// Append a value.
    pub fn push(&mut self, value: impl Into<Object>) {
        self.values.push(value.into());
    }

    /// Get the value at `index`.
    pub fn get(&self, index: usize) -> Option<&Object> {
        self.values.get(index)
    }

    /// Get a mutable reference to the value at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Object> {
        self.values.get_mut(index)
    }

    /// Replace the value at `index`.
    pub fn set(&mut self, index: usize, value: impl Into<Object>) -> Result<()> {
        let len = self.values.len();
        match self.values.get_mut(index) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            },
            None => Err(Error::illegal_argument(format!(
                "Array index {} out of bounds (length {})",
                index, len
            ))),
        }
    }

    /// Remove all values.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the array is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the values.
    pub fn iter(&self) -> std::slice::Iter<'_, Object> {
        self.values.iter()
    }

    /// The values as a slice.
    pub fn as_slice(&self) -> &[Object] {
        &self.values
    }
}

impl From<Vec<Object>> for Array {
    fn from(values: Vec<Object>) -> Self {
        Self { values }
    }
}

impl FromIterator<Object> for Array {
    fn from_iter<I: IntoIterator<Item = Object>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Object;
    type IntoIter = std::slice::Iter<'a, Object>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl IntoIterator for Array {
    type Item = Object;
    type IntoIter = std::vec::IntoIter<Object>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_get_set() {
        let mut arr = Array::new();
        arr.push(1);
        arr.push(Object::name("Fit"));
        assert_eq!(arr.len(), 2);
        assert_eq!(arr.get(0), Some(&Object::Integer(1)));

        arr.set(0, 7).unwrap();
        assert_eq!(arr.get(0), Some(&Object::Integer(7)));
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut arr = Array::new();
        assert!(matches!(arr.set(0, 1), Err(Error::IllegalArgument(_))));
    }

    #[test]
    fn test_collect() {
        let arr: Array = (0..3).map(Object::from).collect();
        assert_eq!(arr.len(), 3);
        assert!(!arr.is_empty());
    }
}
