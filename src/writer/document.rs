//! Document assembly and output.
//!
//! A [`Document`] owns every object registered with it. Objects are
//! numbered when they are registered, held until [`Document::output`], and
//! dropped one by one as soon as their bytes have been written.

use super::actions::{FileSpec, LaunchAction};
use super::catalog::{Catalog, Info, Names, StructTreeRoot};
use super::destinations::Destination;
use super::embedded_files::EmbeddedFile;
use super::fonts::Font;
use super::navigator::Layer;
use super::object_serializer::ObjectSerializer;
use super::output::{ObjectNumberAllocator, PdfOutput, WriteContext};
use super::pages::{Page, Pages};
use crate::array::Array;
use crate::compliance::{ActionKind, Profile};
use crate::config::DocumentConfig;
use crate::date::{self, format_pdf_date};
use crate::dictionary::Dictionary;
use crate::error::{Error, Result};
use crate::object::{IndirectValue, Object, ObjectRef, PdfObject};
use crate::resolve::ReferenceTable;
use crate::stream::{Stream, StreamEncryption};
use crate::tree::{NameTreeNode, MAX_NUMS_ARRAY_SIZE};
use chrono::{DateTime, FixedOffset};
use md5::{Digest, Md5};
use std::io::Write;

/// Binary marker written on the second header line.
const BINARY_MARKER: &[u8] = b"%\xAA\xAB\xAC\xAD\n";

/// A PDF document under construction.
pub struct Document {
    config: DocumentConfig,
    creation_date: DateTime<FixedOffset>,
    alloc: ObjectNumberAllocator,
    catalog: Catalog,
    pages: Pages,
    info: Info,
    names: Names,
    struct_tree: Option<StructTreeRoot>,
    objects: Vec<Box<dyn PdfObject>>,
    trailer_objects: Vec<Box<dyn PdfObject>>,
    refs: ReferenceTable,
    destinations: Vec<Destination>,
    file_specs: Vec<(FileSpec, ObjectRef)>,
    launches: Vec<(LaunchAction, ObjectRef)>,
    embedded_files: NameTreeNode,
    layers: Vec<ObjectRef>,
    encryption: Option<Box<dyn StreamEncryption>>,
    encrypt_ref: Option<ObjectRef>,
    stream_count: usize,
}

impl Document {
    /// Create a document. The catalog, page tree and info dictionary take
    /// object numbers 1, 2 and 3.
    pub fn new(config: DocumentConfig) -> Result<Self> {
        config.profile.validate()?;
        let creation_date = config.creation_date.unwrap_or_else(date::now);
        let mut alloc = ObjectNumberAllocator::new();

        let mut catalog = Catalog::new();
        let mut pages = Pages::new();
        let mut info = Info::from_config(&config, &creation_date);
        alloc.assign_object(&mut catalog)?;
        let pages_ref = alloc.assign_object(&mut pages)?;
        alloc.assign_object(&mut info)?;
        catalog.set_pages(pages_ref);

        log::debug!(
            "New document: PDF {}, profile {}",
            config.version,
            config.profile
        );

        Ok(Self {
            config,
            creation_date,
            alloc,
            catalog,
            pages,
            info,
            names: Names::new(),
            struct_tree: None,
            objects: Vec::new(),
            trailer_objects: Vec::new(),
            refs: ReferenceTable::new(),
            destinations: Vec::new(),
            file_specs: Vec::new(),
            launches: Vec::new(),
            embedded_files: NameTreeNode::new(),
            layers: Vec::new(),
            encryption: None,
            encrypt_ref: None,
            stream_count: 0,
        })
    }

    /// The configuration the document was created with.
    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// The conformance profile.
    pub fn profile(&self) -> &Profile {
        &self.config.profile
    }

    /// The number allocator.
    pub fn allocator(&self) -> &ObjectNumberAllocator {
        &self.alloc
    }

    /// Reference to the catalog.
    pub fn catalog_ref(&self) -> Result<ObjectRef> {
        self.catalog.reference()
    }

    /// Reference to the root of the page tree.
    pub fn pages_ref(&self) -> Result<ObjectRef> {
        self.pages.reference()
    }

    /// Mutable catalog, for entries not covered by the document API.
    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    /// Mutable info dictionary.
    pub fn info_mut(&mut self) -> &mut Info {
        &mut self.info
    }

    /// The page tree.
    pub fn pages(&self) -> &Pages {
        &self.pages
    }

    /// Number of object numbers handed out so far.
    pub fn object_count(&self) -> u32 {
        self.alloc.count()
    }

    /// Extension id table used for deferred resolution.
    pub fn references(&self) -> &ReferenceTable {
        &self.refs
    }

    /// Give `obj` the next object number.
    pub fn assign_object_number(&mut self, obj: &mut dyn PdfObject) -> Result<ObjectRef> {
        self.alloc.assign_object(obj)
    }

    /// Queue an object that has already been numbered.
    pub fn add_object(&mut self, obj: Box<dyn PdfObject>) -> Result<ObjectRef> {
        let reference = obj
            .identity()
            .get()
            .ok_or_else(|| Error::illegal_state("Cannot add an object without an object number"))?;
        self.objects.push(obj);
        Ok(reference)
    }

    /// Number `obj` if needed and queue it for output.
    pub fn register_object<T: PdfObject + 'static>(&mut self, mut obj: T) -> Result<ObjectRef> {
        if !obj.has_object_number() {
            self.alloc.assign_object(&mut obj)?;
        }
        self.add_object(Box::new(obj))
    }

    /// Number `obj` and write it in the trailer phase, after every queued
    /// object.
    pub fn register_trailer_object<T: PdfObject + 'static>(&mut self, mut obj: T) -> Result<ObjectRef> {
        let reference = self.alloc.assign_object(&mut obj)?;
        self.alloc.register_trailer(reference);
        self.trailer_objects.push(Box::new(obj));
        Ok(reference)
    }

    /// Register `obj` and record its reference under `id` for deferred
    /// resolution by navigators and actions.
    pub fn register_named<T: PdfObject + 'static>(
        &mut self,
        id: impl Into<String>,
        obj: T,
    ) -> Result<ObjectRef> {
        let id = id.into();
        let reference = self.register_object(obj)?;
        if let Some(previous) = self.refs.insert(id.clone(), reference) {
            log::warn!("Id '{}' re-registered; {} replaced by {}", id, previous, reference);
        }
        Ok(reference)
    }

    /// Install filters, number and queue a stream.
    ///
    /// Streams without explicit filters get the configured defaults for
    /// their category (or the null filter when filters are disabled). The
    /// encryption filter, if any, is appended last.
    pub fn register_stream(&mut self, mut stream: Stream) -> Result<ObjectRef> {
        if !stream.filters().is_initialized() {
            if self.config.disable_filters {
                stream.filters_mut().disable();
            } else {
                let category = stream.category().to_string();
                stream
                    .filters_mut()
                    .add_default_filters(&self.config.filter_map, &category)?;
            }
        }
        let reference = if stream.has_object_number() {
            stream.reference()?
        } else {
            self.alloc.assign_object(&mut stream)?
        };
        if let Some(encryption) = &self.encryption {
            stream.filters_mut().add_filter(encryption.filter_for(reference));
        }
        self.stream_count += 1;
        self.add_object(Box::new(stream))
    }

    /// Add a page, either at its claimed index or appended.
    pub fn add_page(&mut self, mut page: Page) -> Result<ObjectRef> {
        if let Some(index) = page.page_index() {
            self.pages.check_slot(index)?;
        }
        let reference = if page.has_object_number() {
            page.reference()?
        } else {
            self.alloc.assign_object(&mut page)?
        };
        page.set_parent(self.pages.reference()?);
        self.pages.notify_kid_registered(page.page_index(), reference)?;
        self.objects.push(Box::new(page));
        Ok(reference)
    }

    /// Add a named destination. Returns `false` for an exact duplicate.
    pub fn add_destination(&mut self, destination: Destination) -> bool {
        if self.destinations.contains(&destination) {
            log::debug!("Skipping duplicate destination '{}'", destination.id_ref());
            return false;
        }
        self.destinations.push(destination);
        true
    }

    /// Add a file specification, reusing an equal one if present.
    pub fn add_file_spec(&mut self, spec: FileSpec) -> Result<ObjectRef> {
        if let Some((_, reference)) = self.file_specs.iter().find(|(s, _)| *s == spec) {
            return Ok(*reference);
        }
        let reference = self.register_object(spec.clone())?;
        self.file_specs.push((spec, reference));
        Ok(reference)
    }

    /// Add a launch action, reusing an equal one if present.
    pub fn add_launch(&mut self, action: LaunchAction) -> Result<ObjectRef> {
        self.config.profile.verify_action_allowed(ActionKind::Launch)?;
        if let Some((_, reference)) = self.launches.iter().find(|(a, _)| *a == action) {
            return Ok(*reference);
        }
        let reference = self.register_object(action.clone())?;
        self.launches.push((action, reference));
        Ok(reference)
    }

    /// Attach a file. Returns the reference of its file specification.
    pub fn add_embedded_file(&mut self, file: EmbeddedFile) -> Result<ObjectRef> {
        self.config.profile.verify_embedded_files_allowed()?;
        let stream = file.to_stream(self.config.cache_strategy)?;
        let stream_ref = self.register_stream(stream)?;
        let spec_ref = self.add_file_spec(file.to_file_spec(stream_ref))?;
        self.embedded_files.add(file.name.clone(), spec_ref);
        if file.af_relationship.is_some() {
            self.catalog.add_associated_file(spec_ref);
        }
        log::debug!("Embedded '{}' ({} bytes)", file.name, file.size());
        Ok(spec_ref)
    }

    /// Attach XMP metadata to the catalog.
    pub fn set_metadata(&mut self, xmp: &[u8]) -> Result<ObjectRef> {
        let stream = Stream::metadata(self.config.cache_strategy, xmp)?;
        let reference = self.register_stream(stream)?;
        self.catalog.set_metadata(reference);
        Ok(reference)
    }

    /// Register a font after checking it against the profile.
    pub fn register_font(&mut self, mut font: Font) -> Result<ObjectRef> {
        font.validate(&self.config.profile)?;
        let reference = font.number(&mut self.alloc)?;
        self.objects.push(Box::new(font));
        Ok(reference)
    }

    /// Register an optional content group and list it in `/OCProperties`.
    pub fn add_layer(&mut self, layer: Layer) -> Result<ObjectRef> {
        let id = layer.id().to_string();
        let reference = self.register_named(id, layer)?;
        self.layers.push(reference);
        Ok(reference)
    }

    /// Create the structure tree root and mark the document as tagged.
    pub fn enable_accessibility(&mut self) -> Result<ObjectRef> {
        if let Some(root) = &self.struct_tree {
            return root.reference();
        }
        let mut root = StructTreeRoot::new();
        let reference = root.number(&mut self.alloc)?;
        self.alloc.register_trailer(reference);
        self.catalog.set_struct_tree_root(reference);
        self.struct_tree = Some(root);
        log::debug!("Accessibility enabled; structure tree root is object {}", reference.id);
        Ok(reference)
    }

    /// Whether a structure tree exists.
    pub fn is_accessible(&self) -> bool {
        self.struct_tree.is_some()
    }

    /// Map a `/StructParents` key to its structure element(s).
    pub fn add_to_parent_tree(&mut self, key: i64, value: impl Into<Object>) -> Result<()> {
        let root = self
            .struct_tree
            .as_mut()
            .ok_or_else(|| Error::illegal_state("Accessibility is not enabled"))?;
        root.parent_tree_mut().add_to_nums(&mut self.alloc, key, value)
    }

    /// Append a top-level structure element.
    pub fn add_struct_kid(&mut self, kid: impl Into<Object>) -> Result<()> {
        let root = self
            .struct_tree
            .as_mut()
            .ok_or_else(|| Error::illegal_state("Accessibility is not enabled"))?;
        root.add_kid(kid);
        Ok(())
    }

    /// Enable encryption.
    ///
    /// `encrypt_dict` becomes the trailer's `/Encrypt` entry; `encryption`
    /// supplies the per-stream filter. Streams registered earlier would stay
    /// unencrypted, so this must be called before the first stream.
    pub fn set_encryption(
        &mut self,
        encryption: Box<dyn StreamEncryption>,
        encrypt_dict: Dictionary,
    ) -> Result<ObjectRef> {
        self.config.profile.verify_encryption_allowed()?;
        if self.encryption.is_some() {
            return Err(Error::illegal_state("Encryption is already set"));
        }
        if self.stream_count > 0 {
            return Err(Error::illegal_state(format!(
                "Encryption must be set before streams are registered ({} already registered)",
                self.stream_count
            )));
        }
        let reference = self.register_trailer_object(IndirectValue::new(encrypt_dict))?;
        self.encryption = Some(encryption);
        self.encrypt_ref = Some(reference);
        Ok(reference)
    }

    /// Structural checks that would otherwise fail halfway through output.
    fn verify_structure(&self) -> Result<()> {
        self.pages.kids_array().map(|_| ())
    }

    fn verify_conformance(&self) -> Result<()> {
        let profile = &self.config.profile;
        profile.verify_pdf_version(self.config.version)?;
        profile.verify_tagged_pdf(self.struct_tree.is_some())?;
        profile.verify_title_present(self.info.has_title())
    }

    fn file_id(&self) -> Vec<u8> {
        let mut hasher = Md5::new();
        hasher.update(self.config.producer.as_bytes());
        hasher.update(format_pdf_date(&self.creation_date).as_bytes());
        hasher.update(self.alloc.count().to_string().as_bytes());
        hasher.finalize().to_vec()
    }

    /// Serialize the document into `w` and hand the sink back.
    ///
    /// Conformance checks that need the finished document run first, as
    /// does the page-gap check, so either failure leaves `w` untouched.
    pub fn output<W: Write>(mut self, mut w: W) -> Result<W> {
        self.verify_conformance()?;
        self.verify_structure()?;

        // Trees and dictionaries that only exist once everything is known.
        let mut trees: Vec<Box<dyn PdfObject>> = Vec::new();
        if !self.destinations.is_empty() {
            let mut dests = NameTreeNode::new();
            for destination in self.destinations.drain(..) {
                dests.add(destination.id_ref().to_string(), destination.go_to().clone());
            }
            let reference = self.alloc.assign_object(&mut dests)?;
            dests.split_leaves(&mut self.alloc, MAX_NUMS_ARRAY_SIZE as usize)?;
            self.names.set_dests(reference);
            trees.push(Box::new(dests));
        }
        if !self.embedded_files.is_empty() {
            let mut files = std::mem::take(&mut self.embedded_files);
            let reference = self.alloc.assign_object(&mut files)?;
            files.split_leaves(&mut self.alloc, MAX_NUMS_ARRAY_SIZE as usize)?;
            self.names.set_embedded_files(reference);
            trees.push(Box::new(files));
        }
        if !self.names.is_empty() {
            let names = std::mem::take(&mut self.names);
            let reference = self.register_trailer_object(names)?;
            self.catalog.set_names(reference);
        }
        self.catalog.set_layers(&self.layers);

        let file_id = self.file_id();
        let max_id = self.alloc.count();

        let Document {
            config,
            mut catalog,
            mut pages,
            mut info,
            struct_tree,
            objects,
            trailer_objects,
            refs,
            encrypt_ref,
            ..
        } = self;

        let serializer = ObjectSerializer::with_precision(config.precision);
        let ctx = WriteContext {
            serializer: &serializer,
            refs: &refs,
        };
        let root_ref = catalog.reference()?;
        let info_ref = info.reference()?;
        {
            let mut out = PdfOutput::new(&mut w);
            writeln!(out, "%PDF-{}", config.version)?;
            out.write_all(BINARY_MARKER)?;

            out.write_object(&ctx, &mut catalog)?;
            out.write_object(&ctx, &mut pages)?;
            out.write_object(&ctx, &mut info)?;

            let queued = objects.len();
            for mut obj in objects {
                out.write_object(&ctx, obj.as_mut())?;
            }
            for mut tree in trees {
                out.write_object(&ctx, tree.as_mut())?;
            }
            if let Some(mut root) = struct_tree {
                out.write_object(&ctx, &mut root)?;
            }
            for mut obj in trailer_objects {
                out.write_object(&ctx, obj.as_mut())?;
            }
            log::debug!("Wrote {} queued objects, {} in total", queued, max_id);

            let startxref = out.write_xref(max_id)?;

            let id = Object::String(file_id);
            let mut trailer = Dictionary::new();
            trailer.put("Size", max_id + 1);
            trailer.put_ref("Root", root_ref);
            trailer.put_ref("Info", info_ref);
            trailer.put("ID", Array::from(vec![id.clone(), id]));
            if let Some(encrypt) = encrypt_ref {
                trailer.put_ref("Encrypt", encrypt);
            }
            out.write_all(b"trailer\n")?;
            serializer.write_dictionary(&mut out, &trailer)?;
            write!(out, "\nstartxref\n{}\n%%EOF\n", startxref)?;
            log::info!("PDF written: {} objects, {} bytes", max_id, out.position());
        }
        w.flush()?;
        Ok(w)
    }
}
