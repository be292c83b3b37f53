//! Optional content groups and navigation nodes.

use crate::dictionary::Dictionary;
use crate::error::Result;
use crate::object::{Identity, Object, ObjectRef, PdfObject};
use crate::resolve::{Deferred, ReferenceTable, ResolveFn};
use crate::writer::WriteContext;
use std::io::Write;

/// An optional content group (`/Type /OCG`), i.e. a layer.
#[derive(Debug, Clone)]
pub struct Layer {
    identity: Identity,
    id: String,
    name: String,
    intent: Option<String>,
}

impl Layer {
    /// Create a layer registered under `id` and shown to users as `name`.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            identity: Identity::new(),
            id: id.into(),
            name: name.into(),
            intent: None,
        }
    }

    /// Set `/Intent` (`View` or `Design`).
    pub fn with_intent(mut self, intent: impl Into<String>) -> Self {
        self.intent = Some(intent.into());
        self
    }

    /// The registration id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The display name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PdfObject for Layer {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }

    fn write_body(&mut self, ctx: &WriteContext<'_>, w: &mut dyn Write) -> Result<()> {
        let mut dict = Dictionary::with_type("OCG");
        dict.put("Name", Object::text(&self.name));
        if let Some(intent) = &self.intent {
            dict.put("Intent", Object::name(intent));
        }
        ctx.serializer.write_dictionary(w, &dict)
    }
}

#[derive(Debug, Clone, Default)]
struct NavTargets {
    next_action: Option<String>,
    prev_action: Option<String>,
    next: Option<String>,
    prev: Option<String>,
}

/// A navigation node (`/Type /NavNode`) for presentation-style paging.
///
/// Neighbouring nodes and the actions run on entering and leaving are given
/// by id. They are resolved into references once, right before output.
/// An id that was never registered is skipped with a warning.
#[derive(Debug)]
pub struct Navigator {
    identity: Identity,
    id: String,
    dict: Dictionary,
    targets: NavTargets,
    deferred: Deferred,
}

impl Navigator {
    /// Create a navigation node registered under `id`.
    pub fn new(id: impl Into<String>) -> Self {
        let mut navigator = Self {
            identity: Identity::new(),
            id: id.into(),
            dict: Dictionary::with_type("NavNode"),
            targets: NavTargets::default(),
            deferred: Deferred::none(),
        };
        navigator.install_resolver();
        navigator
    }

    /// The registration id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Action executed when moving forward onto this node (`/NA`).
    pub fn with_next_action(mut self, id: impl Into<String>) -> Self {
        self.targets.next_action = Some(id.into());
        self.install_resolver();
        self
    }

    /// Action executed when moving backward onto this node (`/PA`).
    pub fn with_prev_action(mut self, id: impl Into<String>) -> Self {
        self.targets.prev_action = Some(id.into());
        self.install_resolver();
        self
    }

    /// Next navigation node (`/Next`).
    pub fn with_next(mut self, id: impl Into<String>) -> Self {
        self.targets.next = Some(id.into());
        self.install_resolver();
        self
    }

    /// Previous navigation node (`/Prev`).
    pub fn with_prev(mut self, id: impl Into<String>) -> Self {
        self.targets.prev = Some(id.into());
        self.install_resolver();
        self
    }

    /// Maximum display time in seconds (`/Dur`).
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.dict.put("Dur", seconds);
        self
    }

    /// Replace the resolver.
    pub fn set_resolver(&mut self, resolver: ResolveFn) {
        self.deferred.set(resolver);
    }

    /// Whether the references have been resolved.
    pub fn is_resolved(&self) -> bool {
        self.deferred.is_resolved()
    }

    fn install_resolver(&mut self) {
        let targets = self.targets.clone();
        let node = self.id.clone();
        self.deferred.set(Box::new(move |dict: &mut Dictionary, refs: &ReferenceTable| {
            let entries = [
                ("NA", &targets.next_action),
                ("PA", &targets.prev_action),
                ("Next", &targets.next),
                ("Prev", &targets.prev),
            ];
            for (key, id) in entries {
                let Some(id) = id else { continue };
                match refs.get(id) {
                    Some(reference) => dict.put_ref(key, reference),
                    None => log::warn!("Navigator '{}': unresolved /{} target '{}'", node, key, id),
                }
            }
            Ok(())
        }));
    }

    /// Resolved reference for `key`, if present.
    pub fn entry(&self, key: &str) -> Option<ObjectRef> {
        self.dict.get(key).and_then(|v| v.as_reference())
    }
}

impl PdfObject for Navigator {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }

    fn resolve(&mut self, refs: &ReferenceTable) -> Result<()> {
        self.deferred.resolve(&mut self.dict, refs)
    }

    fn write_body(&mut self, ctx: &WriteContext<'_>, w: &mut dyn Write) -> Result<()> {
        ctx.serializer.write_dictionary(w, &self.dict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::ObjectSerializer;

    #[test]
    fn test_navigator_resolution() {
        let mut node = Navigator::new("slide-1")
            .with_next("slide-2")
            .with_prev("slide-0")
            .with_next_action("fade-in");
        let mut refs = ReferenceTable::new();
        refs.insert("slide-2", ObjectRef::new(12, 0));
        refs.insert("fade-in", ObjectRef::new(20, 0));

        assert!(!node.is_resolved());
        node.resolve(&refs).unwrap();
        assert!(node.is_resolved());
        assert_eq!(node.entry("Next"), Some(ObjectRef::new(12, 0)));
        assert_eq!(node.entry("NA"), Some(ObjectRef::new(20, 0)));
        assert_eq!(node.entry("Prev"), None);

        refs.insert("slide-0", ObjectRef::new(10, 0));
        node.resolve(&refs).unwrap();
        assert_eq!(node.entry("Prev"), None);
    }

    #[test]
    fn test_custom_resolver() {
        let mut node = Navigator::new("n");
        node.set_resolver(Box::new(|dict: &mut Dictionary, _refs: &ReferenceTable| {
            dict.put("Dur", 2.5);
            Ok(())
        }));
        node.resolve(&ReferenceTable::new()).unwrap();
        let text = ObjectSerializer::with_precision(1)
            .serialize_to_string(&node.dict.clone().into())
            .unwrap();
        assert_eq!(text, "<< /Type /NavNode /Dur 2.5 >>");
    }

    #[test]
    fn test_layer_body() {
        let layer = Layer::new("notes", "Speaker notes").with_intent("View");
        assert_eq!(layer.id(), "notes");
        assert_eq!(layer.name(), "Speaker notes");
    }
}
