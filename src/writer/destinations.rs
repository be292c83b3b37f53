//! Named destinations.

use crate::array::Array;
use crate::object::{Object, ObjectRef};

/// A named destination: an id and the explicit destination it points to.
///
/// Destinations are not indirect objects. The document collects them into
/// the `/Dests` name tree, keyed by id. Two destinations are equal when both
/// the id and the target are equal, which lets the document drop duplicates.
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    id_ref: String,
    go_to: Object,
}

impl Destination {
    /// Create a destination with an arbitrary target value.
    pub fn new(id_ref: impl Into<String>, go_to: impl Into<Object>) -> Self {
        Self {
            id_ref: id_ref.into(),
            go_to: go_to.into(),
        }
    }

    /// Destination `[page /XYZ left top null]`.
    pub fn xyz(id_ref: impl Into<String>, page: ObjectRef, left: f64, top: f64) -> Self {
        let target = Array::from(vec![
            Object::Reference(page),
            Object::name("XYZ"),
            Object::Real(left),
            Object::Real(top),
            Object::Null,
        ]);
        Self::new(id_ref, target)
    }

    /// Destination `[page /Fit]`.
    pub fn fit(id_ref: impl Into<String>, page: ObjectRef) -> Self {
        Self::new(
            id_ref,
            Array::from(vec![Object::Reference(page), Object::name("Fit")]),
        )
    }

    /// The id the destination is registered under.
    pub fn id_ref(&self) -> &str {
        &self.id_ref
    }

    /// The target (explicit destination array or action reference).
    pub fn go_to(&self) -> &Object {
        &self.go_to
    }
}
