//! PDF dictionaries.
//!
//! Keys are unique names; insertion order is preserved and replayed on
//! output. Replacing the value of an existing key keeps its position.

use crate::name::Name;
use crate::object::{Object, ObjectRef};
use indexmap::IndexMap;

/// A PDF dictionary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    entries: IndexMap<Name, Object>,
}

impl Dictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dictionary with a `/Type` entry.
    pub fn with_type(type_name: &str) -> Self {
        let mut dict = Self::new();
        dict.put("Type", Object::name(type_name));
        dict
    }

    /// Insert or replace an entry.
    pub fn put(&mut self, key: impl Into<Name>, value: impl Into<Object>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Insert a reference entry.
    pub fn put_ref(&mut self, key: impl Into<Name>, reference: ObjectRef) {
        self.put(key, Object::Reference(reference));
    }

    /// Get the value for `key`.
    pub fn get(&self, key: &str) -> Option<&Object> {
        self.entries.get(key.as_bytes())
    }

    /// Get a mutable reference to the value for `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Object> {
        self.entries.get_mut(key.as_bytes())
    }

    /// Remove an entry, keeping the order of the others.
    pub fn remove(&mut self, key: &str) -> Option<Object> {
        self.entries.shift_remove(key.as_bytes())
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key.as_bytes())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, Name, Object> {
        self.entries.iter()
    }

    /// Iterate over keys in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, Name, Object> {
        self.entries.keys()
    }
}

impl<'a> IntoIterator for &'a Dictionary {
    type Item = (&'a Name, &'a Object);
    type IntoIter = indexmap::map::Iter<'a, Name, Object>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K: Into<Name>, V: Into<Object>> FromIterator<(K, V)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = Self::new();
        for (k, v) in iter {
            dict.put(k, v);
        }
        dict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_preserved() {
        let mut dict = Dictionary::new();
        dict.put("Type", Object::name("Page"));
        dict.put("Count", 3);
        dict.put("Alpha", 1);
        let keys: Vec<String> = dict.keys().map(|k| k.escaped()).collect();
        assert_eq!(keys, vec!["/Type", "/Count", "/Alpha"]);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut dict = Dictionary::new();
        dict.put("A", 1);
        dict.put("B", 2);
        dict.put("A", 3);
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get("A"), Some(&Object::Integer(3)));
        assert_eq!(dict.keys().next().unwrap(), &Name::new("A"));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut dict: Dictionary = vec![("A", 1), ("B", 2), ("C", 3)].into_iter().collect();
        assert_eq!(dict.remove("B"), Some(Object::Integer(2)));
        let keys: Vec<String> = dict.keys().map(|k| k.escaped()).collect();
        assert_eq!(keys, vec!["/A", "/C"]);
        assert!(!dict.contains_key("B"));
    }
}
