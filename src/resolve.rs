//! Deferred, at-most-once population of dictionary entries.
//!
//! Some nodes (navigation nodes, set-OCG-state actions) point at objects that
//! may not exist yet when the node is created. They carry a [`Deferred`]
//! resolver that fills in the entries at output time, once the document
//! knows every referenced id.

use crate::dictionary::Dictionary;
use crate::error::Result;
use crate::object::ObjectRef;
use std::collections::HashMap;
use std::fmt;

/// Lookup table from extension ids to object references.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    refs: HashMap<String, ObjectRef>,
}

impl ReferenceTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the reference for `id`. Returns the previous one, if any.
    pub fn insert(&mut self, id: impl Into<String>, reference: ObjectRef) -> Option<ObjectRef> {
        self.refs.insert(id.into(), reference)
    }

    /// Look up `id`.
    pub fn get(&self, id: &str) -> Option<ObjectRef> {
        self.refs.get(id).copied()
    }

    /// Number of ids.
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}

/// Resolution logic for a node's dictionary.
pub type ResolveFn = Box<dyn FnMut(&mut Dictionary, &ReferenceTable) -> Result<()>>;

/// A one-shot resolver attached to a node.
///
/// [`Deferred::resolve`] runs the resolver at most once; the `resolved` flag
/// guards repeat calls. Without a resolver, resolving is a no-op and the node
/// keeps whatever was populated eagerly.
#[derive(Default)]
pub struct Deferred {
    resolver: Option<ResolveFn>,
    resolved: bool,
}

impl Deferred {
    /// No resolver attached.
    pub fn none() -> Self {
        Self::default()
    }

    /// Attach a resolver.
    pub fn new(resolver: ResolveFn) -> Self {
        Self {
            resolver: Some(resolver),
            resolved: false,
        }
    }

    /// Replace the resolver. Has no effect once resolution has happened.
    pub fn set(&mut self, resolver: ResolveFn) {
        if !self.resolved {
            self.resolver = Some(resolver);
        }
    }

    /// Whether resolution has already run.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Run the resolver if it has not run yet.
    pub fn resolve(&mut self, dict: &mut Dictionary, refs: &ReferenceTable) -> Result<()> {
        if self.resolved {
            return Ok(());
        }
        if let Some(resolver) = self.resolver.as_mut() {
            resolver(dict, refs)?;
        }
        self.resolved = true;
        Ok(())
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("has_resolver", &self.resolver.is_some())
            .field("resolved", &self.resolved)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Object;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_resolves_at_most_once() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mut deferred = Deferred::new(Box::new(move |dict: &mut Dictionary, refs: &ReferenceTable| {
            counter.set(counter.get() + 1);
            if let Some(r) = refs.get("next") {
                dict.put_ref("Next", r);
            }
            Ok(())
        }));

        let mut refs = ReferenceTable::new();
        refs.insert("next", ObjectRef::new(9, 0));
        let mut dict = Dictionary::new();

        deferred.resolve(&mut dict, &refs).unwrap();
        deferred.resolve(&mut dict, &refs).unwrap();

        assert_eq!(calls.get(), 1);
        assert!(deferred.is_resolved());
        assert_eq!(dict.get("Next"), Some(&Object::Reference(ObjectRef::new(9, 0))));
    }

    #[test]
    fn test_no_resolver_is_noop() {
        let mut deferred = Deferred::none();
        let mut dict = Dictionary::new();
        dict.put("Eager", 1);
        deferred.resolve(&mut dict, &ReferenceTable::new()).unwrap();
        assert_eq!(dict.len(), 1);
        assert!(deferred.is_resolved());
    }
}
