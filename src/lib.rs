// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::wrong_self_convention)]
#![allow(clippy::should_implement_trait)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # PDF Scribe
//!
//! PDF object model and serializer: the in-memory representation of PDF
//! primitives and the logic that writes them out as a valid PDF file.
//!
//! ## Core Features
//!
//! - **Object model**: names, fixed-precision numbers, arrays, ordered
//!   dictionaries, rectangles and references ([`object`])
//! - **Indirect objects**: numbered once, written once, then dropped
//!   ([`writer::ObjectNumberAllocator`], [`writer::PdfOutput`])
//! - **Streams**: memory or temp-file payloads pushed through a filter chain
//!   (Flate, LZW, ASCIIHex, ASCII85) with exact `/Length` ([`stream`])
//! - **Trees**: name and number trees, sorted once before output, and the
//!   structure tree's parent tree with bounded leaves ([`tree`])
//! - **Document**: page tree with indexed slots, named destinations,
//!   embedded files, layers, navigation nodes, fonts ([`writer::Document`])
//! - **Conformance**: PDF/A, PDF/X and PDF/VT restrictions enforced as
//!   content enters the document ([`compliance`])
//!
//! ## Architecture
//!
//! ```text
//! DocumentConfig ──► Document ──► PdfOutput ──► bytes
//!                       │             │
//!                       │             └── ObjectSerializer (inline values)
//!                       ├── Catalog / Pages / Info / Names
//!                       ├── queued objects (pages, streams, fonts, actions)
//!                       └── trailer objects (trees, structure tree, /Encrypt)
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use pdf_scribe::config::DocumentConfig;
//! use pdf_scribe::rectangle::Rectangle;
//! use pdf_scribe::writer::{Destination, Document, Page};
//!
//! # fn main() -> pdf_scribe::Result<()> {
//! let mut doc = Document::new(DocumentConfig::new().with_title("Minimal"))?;
//! let page = doc.add_page(Page::new(Rectangle::new(0.0, 0.0, 595.0, 842.0)))?;
//! doc.add_destination(Destination::fit("start", page));
//!
//! let pdf = doc.output(Vec::new())?;
//! assert!(pdf.ends_with(b"%%EOF\n"));
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 (<http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license (<http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Primitive values
pub mod array;
pub mod date;
pub mod dictionary;
pub mod name;
pub mod number;
pub mod object;
pub mod rectangle;

// Deferred resolution
pub mod resolve;

// Streams and filters
pub mod stream;

// Name and number trees
pub mod tree;

// PDF/A, PDF/X, PDF/VT
pub mod compliance;

// Document assembly and serialization
pub mod writer;

pub use error::{Error, Result};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        // VERSION is populated from CARGO_PKG_VERSION at compile time
        assert!(VERSION.starts_with("0."));
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "pdf_scribe");
    }

    #[test]
    fn test_package_metadata() {
        assert_eq!(env!("CARGO_PKG_AUTHORS"), "The pdf_scribe Authors");
        assert_eq!(env!("CARGO_PKG_LICENSE"), "MIT OR Apache-2.0");
    }

    #[test]
    fn test_crate_docs_link_no_missing_files() {
        let docs = include_str!("lib.rs");
        let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
        for file in ["LICENSE-APACHE", "LICENSE-MIT"] {
            if docs.contains(&format!("]({})", file)) {
                assert!(root.join(file).exists(), "crate docs link to missing {}", file);
            }
        }
    }
}
