//! PDF writing: document assembly and serialization.
//!
//! ## Architecture
//!
//! ```text
//! objects registered with a Document (numbered once, in registration order)
//!     ↓
//! [Document::output] (header, queued objects, trailer objects)
//!     ↓
//! [PdfOutput] (obj/endobj framing, byte offsets, xref)
//!     ↓
//! [ObjectSerializer] (inline values: names, numbers, arrays, dictionaries)
//!     ↓
//! PDF bytes
//! ```
//!
//! ## Example
//!
//! ```
//! use pdf_scribe::config::DocumentConfig;
//! use pdf_scribe::rectangle::Rectangle;
//! use pdf_scribe::stream::{CacheStrategy, Stream};
//! use pdf_scribe::writer::{Document, Page};
//!
//! # fn main() -> pdf_scribe::Result<()> {
//! let mut doc = Document::new(DocumentConfig::new().with_title("Hello"))?;
//! let content = Stream::content(CacheStrategy::Memory, b"BT /F1 12 Tf 72 720 Td (Hello) Tj ET")?;
//! let contents = doc.register_stream(content)?;
//!
//! let mut page = Page::new(Rectangle::new(0.0, 0.0, 612.0, 792.0));
//! page.set_contents(contents);
//! doc.add_page(page)?;
//!
//! let bytes = doc.output(Vec::new())?;
//! assert!(bytes.starts_with(b"%PDF-1.4"));
//! # Ok(())
//! # }
//! ```

mod actions;
mod catalog;
mod color_space;
mod destinations;
mod document;
mod embedded_files;
mod fonts;
mod navigator;
mod object_serializer;
mod output;
mod pages;

pub use actions::{FileSpec, GoToAction, LaunchAction, SetOcgStateAction};
pub use catalog::{Catalog, Info, Names, StructTreeRoot};
pub use color_space::CieLabColorSpace;
pub use destinations::Destination;
pub use document::Document;
pub use embedded_files::{AFRelationship, EmbeddedFile};
pub use fonts::{Font, FontDescriptor, FontFileKind, FontFlags, FontSubtype};
pub use navigator::{Layer, Navigator};
pub use object_serializer::ObjectSerializer;
pub use output::{ObjectNumberAllocator, PdfOutput, WriteContext, DEFAULT_GENERATION};
pub use pages::{Page, Pages};
