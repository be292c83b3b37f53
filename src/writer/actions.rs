//! File specifications and actions.
//!
//! [`FileSpec`] and [`LaunchAction`] compare by content so the document can
//! hand out one object for structurally identical requests. Identity is not
//! part of that comparison.

use super::embedded_files::AFRelationship;
use crate::array::Array;
use crate::dictionary::Dictionary;
use crate::error::Result;
use crate::object::{Identity, Object, ObjectRef, PdfObject};
use crate::resolve::{Deferred, ReferenceTable, ResolveFn};
use crate::writer::WriteContext;
use std::io::Write;

/// A file specification (`/Type /Filespec`).
#[derive(Debug, Clone)]
pub struct FileSpec {
    identity: Identity,
    filename: String,
    embedded_file: Option<ObjectRef>,
    description: Option<String>,
    af_relationship: Option<AFRelationship>,
}

impl FileSpec {
    /// Reference an external file by name.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            identity: Identity::new(),
            filename: filename.into(),
            embedded_file: None,
            description: None,
            af_relationship: None,
        }
    }

    /// Reference an embedded file stream.
    pub fn embedded(filename: impl Into<String>, stream: ObjectRef) -> Self {
        let mut spec = Self::new(filename);
        spec.embedded_file = Some(stream);
        spec
    }

    /// Set `/Desc`.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set `/AFRelationship`.
    pub fn with_af_relationship(mut self, relationship: AFRelationship) -> Self {
        self.af_relationship = Some(relationship);
        self
    }

    /// The file name.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The embedded file stream, if any.
    pub fn embedded_file(&self) -> Option<ObjectRef> {
        self.embedded_file
    }

    /// The dictionary as it will be written.
    pub fn to_dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::with_type("Filespec");
        dict.put("F", Object::string(self.filename.as_bytes()));
        dict.put("UF", Object::text(&self.filename));
        if let Some(stream) = self.embedded_file {
            let mut ef = Dictionary::new();
            ef.put_ref("F", stream);
            ef.put_ref("UF", stream);
            dict.put("EF", ef);
        }
        if let Some(description) = &self.description {
            dict.put("Desc", Object::text(description));
        }
        if let Some(relationship) = self.af_relationship {
            dict.put("AFRelationship", Object::name(relationship.pdf_name()));
        }
        dict
    }
}

impl PartialEq for FileSpec {
    fn eq(&self, other: &Self) -> bool {
        self.filename == other.filename
            && self.embedded_file == other.embedded_file
            && self.description == other.description
            && self.af_relationship == other.af_relationship
    }
}

impl PdfObject for FileSpec {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }

    fn write_body(&mut self, ctx: &WriteContext<'_>, w: &mut dyn Write) -> Result<()> {
        ctx.serializer.write_dictionary(w, &self.to_dictionary())
    }
}

/// `/S /Launch` action pointing at a file specification.
#[derive(Debug, Clone)]
pub struct LaunchAction {
    identity: Identity,
    file_spec: ObjectRef,
    new_window: Option<bool>,
}

impl LaunchAction {
    /// Launch the file described by `file_spec`.
    pub fn new(file_spec: ObjectRef) -> Self {
        Self {
            identity: Identity::new(),
            file_spec,
            new_window: None,
        }
    }

    /// Set `/NewWindow`.
    pub fn with_new_window(mut self, new_window: bool) -> Self {
        self.new_window = Some(new_window);
        self
    }

    /// The launched file specification.
    pub fn file_spec(&self) -> ObjectRef {
        self.file_spec
    }
}

impl PartialEq for LaunchAction {
    fn eq(&self, other: &Self) -> bool {
        self.file_spec == other.file_spec && self.new_window == other.new_window
    }
}

impl PdfObject for LaunchAction {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }

    fn write_body(&mut self, ctx: &WriteContext<'_>, w: &mut dyn Write) -> Result<()> {
        let mut dict = Dictionary::new();
        dict.put("S", Object::name("Launch"));
        dict.put_ref("F", self.file_spec);
        if let Some(new_window) = self.new_window {
            dict.put("NewWindow", new_window);
        }
        ctx.serializer.write_dictionary(w, &dict)
    }
}

/// `/S /GoTo` action.
#[derive(Debug, Clone)]
pub struct GoToAction {
    identity: Identity,
    destination: Object,
}

impl GoToAction {
    /// Jump to an explicit destination array or a named destination string.
    pub fn new(destination: impl Into<Object>) -> Self {
        Self {
            identity: Identity::new(),
            destination: destination.into(),
        }
    }

    /// Jump to `(x, y)` on `page`, keeping the zoom.
    pub fn to_page(page: ObjectRef, x: f64, y: f64) -> Self {
        Self::new(Array::from(vec![
            Object::Reference(page),
            Object::name("XYZ"),
            Object::Real(x),
            Object::Real(y),
            Object::Null,
        ]))
    }

    /// Jump to the named destination `id`.
    pub fn named(id: &str) -> Self {
        Self::new(Object::text(id))
    }

    /// The `/D` value.
    pub fn destination(&self) -> &Object {
        &self.destination
    }
}

impl PdfObject for GoToAction {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }

    fn write_body(&mut self, ctx: &WriteContext<'_>, w: &mut dyn Write) -> Result<()> {
        let mut dict = Dictionary::new();
        dict.put("S", Object::name("GoTo"));
        dict.put("D", self.destination.clone());
        ctx.serializer.write_dictionary(w, &dict)
    }
}

/// Optional content state change applied by [`SetOcgStateAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StateOp {
    On,
    Off,
    Toggle,
}

impl StateOp {
    fn pdf_name(self) -> &'static str {
        match self {
            StateOp::On => "ON",
            StateOp::Off => "OFF",
            StateOp::Toggle => "Toggle",
        }
    }
}

/// `/S /SetOCGState` action.
///
/// Layers are named by id because they may be registered after the action.
/// The `/State` array is built by a one-shot resolver right before output.
#[derive(Debug)]
pub struct SetOcgStateAction {
    identity: Identity,
    id: String,
    dict: Dictionary,
    state: Vec<(StateOp, String)>,
    deferred: Deferred,
}

impl SetOcgStateAction {
    /// Create an action with no state changes.
    pub fn new(id: impl Into<String>) -> Self {
        let mut dict = Dictionary::new();
        dict.put("S", Object::name("SetOCGState"));
        let mut action = Self {
            identity: Identity::new(),
            id: id.into(),
            dict,
            state: Vec::new(),
            deferred: Deferred::none(),
        };
        action.install_resolver();
        action
    }

    /// The id the action is registered under.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Turn the given layers on.
    pub fn with_on<S: AsRef<str>>(self, layer_ids: &[S]) -> Self {
        self.with_state(StateOp::On, layer_ids)
    }

    /// Turn the given layers off.
    pub fn with_off<S: AsRef<str>>(self, layer_ids: &[S]) -> Self {
        self.with_state(StateOp::Off, layer_ids)
    }

    /// Toggle the given layers.
    pub fn with_toggle<S: AsRef<str>>(self, layer_ids: &[S]) -> Self {
        self.with_state(StateOp::Toggle, layer_ids)
    }

    /// Set `/PreserveRB`.
    pub fn with_preserve_rb(mut self, preserve: bool) -> Self {
        self.dict.put("PreserveRB", preserve);
        self
    }

    /// Replace the resolver.
    pub fn set_resolver(&mut self, resolver: ResolveFn) {
        self.deferred.set(resolver);
    }

    fn with_state<S: AsRef<str>>(mut self, op: StateOp, layer_ids: &[S]) -> Self {
        self.state
            .extend(layer_ids.iter().map(|id| (op, id.as_ref().to_string())));
        self.install_resolver();
        self
    }

    fn install_resolver(&mut self) {
        let state = self.state.clone();
        self.deferred.set(Box::new(move |dict: &mut Dictionary, refs: &ReferenceTable| {
            let mut array = Array::new();
            let mut current = None;
            for (op, id) in &state {
                let Some(reference) = refs.get(id) else {
                    log::warn!("SetOCGState: unknown layer id '{}'", id);
                    continue;
                };
                if current != Some(*op) {
                    array.push(Object::name(op.pdf_name()));
                    current = Some(*op);
                }
                array.push(reference);
            }
            dict.put("State", array);
            Ok(())
        }));
    }
}

impl PdfObject for SetOcgStateAction {
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
    fn test_file_spec_content_equality() {
        let mut a = FileSpec::new("data.csv");
        let b = FileSpec::new("data.csv");
        a.identity_mut().assign(ObjectRef::new(3, 0)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, FileSpec::new("other.csv"));
        assert_ne!(b, FileSpec::embedded("data.csv", ObjectRef::new(5, 0)));
    }

    #[test]
    fn test_file_spec_dictionary() {
        let spec = FileSpec::embedded("data.csv", ObjectRef::new(5, 0))
            .with_af_relationship(AFRelationship::Data);
        let dict = spec.to_dictionary();
        let ef = dict.get("EF").and_then(|e| e.as_dict()).unwrap();
        assert_eq!(ef.get("F"), Some(&Object::Reference(ObjectRef::new(5, 0))));
        assert_eq!(dict.get("AFRelationship"), Some(&Object::name("Data")));
    }

    #[test]
    fn test_launch_equality() {
        let a = LaunchAction::new(ObjectRef::new(3, 0));
        let b = LaunchAction::new(ObjectRef::new(3, 0));
        assert_eq!(a, b);
        assert_ne!(a, b.with_new_window(true));
    }

    #[test]
    fn test_set_ocg_state_resolves_once() {
        let mut action = SetOcgStateAction::new("show-notes")
            .with_on(&["notes"])
            .with_off(&["draft", "missing"]);
        let mut refs = ReferenceTable::new();
        refs.insert("notes", ObjectRef::new(10, 0));
        refs.insert("draft", ObjectRef::new(11, 0));
        action.resolve(&refs).unwrap();

        // A second resolution with different ids must not change anything.
        refs.insert("missing", ObjectRef::new(12, 0));
        action.resolve(&refs).unwrap();

        let state = ObjectSerializer::new()
            .serialize_to_string(action.dict.get("State").unwrap())
            .unwrap();
        assert_eq!(state, "[/ON 10 0 R /OFF 11 0 R]");
    }
}
