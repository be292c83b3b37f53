//! Document-level dictionaries: catalog, info, name dictionary and the
//! structure tree root.

use crate::array::Array;
use crate::compliance::Profile;
use crate::config::DocumentConfig;
use crate::date::format_pdf_date;
use crate::dictionary::Dictionary;
use crate::error::{Error, Result};
use crate::name::Name;
use crate::object::{Identity, Object, ObjectRef, PdfObject};
use crate::tree::ParentTree;
use crate::writer::{ObjectNumberAllocator, PdfOutput, WriteContext};
use chrono::{DateTime, FixedOffset};
use std::io::Write;

/// The document catalog (`/Type /Catalog`).
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    identity: Identity,
    pages: Option<ObjectRef>,
    names: Option<ObjectRef>,
    struct_tree_root: Option<ObjectRef>,
    metadata: Option<ObjectRef>,
    marked: bool,
    oc_properties: Option<Dictionary>,
    associated_files: Vec<ObjectRef>,
    extra: Dictionary,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root of the page tree.
    pub fn set_pages(&mut self, pages: ObjectRef) {
        self.pages = Some(pages);
    }

    /// Set the `/Names` dictionary.
    pub fn set_names(&mut self, names: ObjectRef) {
        self.names = Some(names);
    }

    /// Set the `/StructTreeRoot` and mark the document as tagged.
    pub fn set_struct_tree_root(&mut self, root: ObjectRef) {
        self.struct_tree_root = Some(root);
        self.marked = true;
    }

    /// Whether the document is tagged.
    pub fn is_marked(&self) -> bool {
        self.marked
    }

    /// Set the XMP `/Metadata` stream.
    pub fn set_metadata(&mut self, metadata: ObjectRef) {
        self.metadata = Some(metadata);
    }

    /// Set `/OCProperties` from the list of optional content groups.
    pub fn set_layers(&mut self, layers: &[ObjectRef]) {
        if layers.is_empty() {
            self.oc_properties = None;
            return;
        }
        let ocgs: Array = layers.iter().map(|r| Object::Reference(*r)).collect();
        let mut default_config = Dictionary::new();
        default_config.put("Order", ocgs.clone());
        let mut props = Dictionary::new();
        props.put("OCGs", ocgs);
        props.put("D", default_config);
        self.oc_properties = Some(props);
    }

    /// Add a file specification to the catalog's `/AF` array.
    pub fn add_associated_file(&mut self, file_spec: ObjectRef) {
        if !self.associated_files.contains(&file_spec) {
            self.associated_files.push(file_spec);
        }
    }

    /// Add any other catalog entry (e.g. `/PageMode`, `/Lang`).
    pub fn put(&mut self, key: impl Into<Name>, value: impl Into<Object>) {
        self.extra.put(key, value);
    }

    fn to_dictionary(&self) -> Result<Dictionary> {
        let pages = self
            .pages
            .ok_or_else(|| Error::illegal_state("Catalog has no page tree"))?;
        let mut dict = Dictionary::with_type("Catalog");
        dict.put_ref("Pages", pages);
        if let Some(names) = self.names {
            dict.put_ref("Names", names);
        }
        if let Some(root) = self.struct_tree_root {
            dict.put_ref("StructTreeRoot", root);
        }
        if self.marked {
            let mut mark_info = Dictionary::new();
            mark_info.put("Marked", true);
            dict.put("MarkInfo", mark_info);
        }
        if let Some(metadata) = self.metadata {
            dict.put_ref("Metadata", metadata);
        }
        if let Some(props) = &self.oc_properties {
            dict.put("OCProperties", props.clone());
        }
        if !self.associated_files.is_empty() {
            let af: Array = self.associated_files.iter().map(|r| Object::Reference(*r)).collect();
            dict.put("AF", af);
        }
        for (key, value) in &self.extra {
            dict.put(key.clone(), value.clone());
        }
        Ok(dict)
    }
}

impl PdfObject for Catalog {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }

    fn write_body(&mut self, ctx: &WriteContext<'_>, w: &mut dyn Write) -> Result<()> {
        let dict = self.to_dictionary()?;
        ctx.serializer.write_dictionary(w, &dict)
    }
}

/// The document information dictionary.
#[derive(Debug, Clone)]
pub struct Info {
    identity: Identity,
    dict: Dictionary,
}

impl Info {
    /// Build the info dictionary from the configuration.
    pub fn from_config(config: &DocumentConfig, creation_date: &DateTime<FixedOffset>) -> Self {
        let mut dict = Dictionary::new();
        let text_fields = [
            ("Title", &config.title),
            ("Author", &config.author),
            ("Subject", &config.subject),
            ("Keywords", &config.keywords),
            ("Creator", &config.creator),
        ];
        for (key, value) in text_fields {
            if let Some(value) = value {
                dict.put(key, Object::text(value));
            }
        }
        dict.put("Producer", Object::text(&config.producer));
        let date = format_pdf_date(creation_date);
        dict.put("CreationDate", Object::string(date.clone()));
        dict.put("ModDate", Object::string(date));
        apply_profile(&mut dict, &config.profile);
        Self {
            identity: Identity::new(),
            dict,
        }
    }

    /// The dictionary as it will be written.
    pub fn dict(&self) -> &Dictionary {
        &self.dict
    }

    /// Whether a non-empty `/Title` is present.
    pub fn has_title(&self) -> bool {
        self.dict
            .get("Title")
            .and_then(|t| t.as_string())
            .map_or(false, |t| !t.is_empty())
    }

    /// Add a custom entry.
    pub fn put(&mut self, key: impl Into<Name>, value: impl Into<Object>) {
        self.dict.put(key, value);
    }
}

fn apply_profile(dict: &mut Dictionary, profile: &Profile) {
    if let Some(level) = profile.pdfx_level() {
        dict.put("GTS_PDFXVersion", Object::text(level.gts_pdfx_version()));
        dict.put("Trapped", Object::name("False"));
    }
}

impl PdfObject for Info {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }

    fn write_body(&mut self, ctx: &WriteContext<'_>, w: &mut dyn Write) -> Result<()> {
        ctx.serializer.write_dictionary(w, &self.dict)
    }
}

/// The catalog's `/Names` dictionary.
#[derive(Debug, Clone, Default)]
pub struct Names {
    identity: Identity,
    dests: Option<ObjectRef>,
    embedded_files: Option<ObjectRef>,
}

impl Names {
    /// Create an empty name dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root of the `/Dests` name tree.
    pub fn set_dests(&mut self, tree: ObjectRef) {
        self.dests = Some(tree);
    }

    /// Set the root of the `/EmbeddedFiles` name tree.
    pub fn set_embedded_files(&mut self, tree: ObjectRef) {
        self.embedded_files = Some(tree);
    }

    /// Whether no tree has been attached.
    pub fn is_empty(&self) -> bool {
        self.dests.is_none() && self.embedded_files.is_none()
    }
}

impl PdfObject for Names {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }

    fn write_body(&mut self, ctx: &WriteContext<'_>, w: &mut dyn Write) -> Result<()> {
        let mut dict = Dictionary::new();
        if let Some(dests) = self.dests {
            dict.put_ref("Dests", dests);
        }
        if let Some(files) = self.embedded_files {
            dict.put_ref("EmbeddedFiles", files);
        }
        ctx.serializer.write_dictionary(w, &dict)
    }
}

/// Root of the logical structure tree.
///
/// Owns the `/ParentTree`, which is written right after the root.
#[derive(Debug, Clone, Default)]
pub struct StructTreeRoot {
    identity: Identity,
    parent_tree: ParentTree,
    kids: Array,
    role_map: Option<Dictionary>,
}

impl StructTreeRoot {
    /// Create a root with an empty parent tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number the root and its parent tree.
    pub fn number(&mut self, alloc: &mut ObjectNumberAllocator) -> Result<ObjectRef> {
        let root = alloc.assign(&mut self.identity)?;
        alloc.assign_object(&mut self.parent_tree)?;
        Ok(root)
    }

    /// Append a top-level structure element.
    pub fn add_kid(&mut self, kid: impl Into<Object>) {
        self.kids.push(kid);
    }

    /// Top-level structure elements.
    pub fn kids(&self) -> &Array {
        &self.kids
    }

    /// Map a custom structure type to a standard one.
    pub fn add_role(&mut self, custom: impl Into<Name>, standard: &str) {
        self.role_map
            .get_or_insert_with(Dictionary::new)
            .put(custom, Object::name(standard));
    }

    /// The parent tree.
    pub fn parent_tree(&self) -> &ParentTree {
        &self.parent_tree
    }

    /// Mutable parent tree.
    pub fn parent_tree_mut(&mut self) -> &mut ParentTree {
        &mut self.parent_tree
    }
}

impl PdfObject for StructTreeRoot {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }

    fn write_body(&mut self, ctx: &WriteContext<'_>, w: &mut dyn Write) -> Result<()> {
        let mut dict = Dictionary::with_type("StructTreeRoot");
        if !self.kids.is_empty() {
            dict.put("K", self.kids.clone());
        }
        dict.put_ref("ParentTree", self.parent_tree.reference()?);
        if let Some(role_map) = &self.role_map {
            dict.put("RoleMap", role_map.clone());
        }
        ctx.serializer.write_dictionary(w, &dict)
    }

    fn write_children(&mut self, ctx: &WriteContext<'_>, out: &mut PdfOutput<'_>) -> Result<()> {
        out.write_object(ctx, &mut self.parent_tree)
    }
}
