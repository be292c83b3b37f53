//! Conformance profiles.
//!
//! A document carries one [`Profile`] combining optional PDF/A (archival),
//! PDF/X (print production) and PDF/VT (variable data printing) modes. The
//! profile is consulted as content enters the document; violations raise
//! [`crate::Error::Conformance`] and abort generation.
//!
//! ## PDF/A Conformance Levels (Archival)
//!
//! - **PDF/A-1a / 1b**: PDF 1.4 based; fonts embedded, no encryption
//! - **PDF/A-2a / 2b / 2u**: PDF 1.7 based
//! - **PDF/A-3a / 3b / 3u**: PDF/A-2 plus embedded files of any type
//!
//! Level A additionally requires a tagged document.
//!
//! ## PDF/X Conformance Levels (Print Production)
//!
//! - **PDF/X-1a:2003**, **PDF/X-3:2003**: PDF 1.4 based
//! - **PDF/X-4**: PDF 1.6 based; prerequisite for PDF/VT
//!
//! ## Standards Reference
//!
//! - ISO 19005-1:2005 (PDF/A-1)
//! - ISO 19005-2:2011 (PDF/A-2)
//! - ISO 19005-3:2012 (PDF/A-3)
//! - ISO 15930-4:2003 (PDF/X-1a:2003)
//! - ISO 15930-6:2003 (PDF/X-3:2003)
//! - ISO 15930-7:2010 (PDF/X-4)
//! - ISO 16612-2:2010 (PDF/VT-1)

mod profile;
mod types;

pub use profile::{ActionKind, Profile};
pub use types::{PdfALevel, PdfAPart, PdfVtLevel, PdfXLevel};
