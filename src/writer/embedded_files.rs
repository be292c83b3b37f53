//! Embedded file attachments.
//!
//! An attachment ends up as three pieces: an embedded file stream holding the
//! bytes, a file specification pointing at that stream, and an entry in the
//! catalog's `/EmbeddedFiles` name tree keyed by file name.
//!
//! ## Example
//!
//! ```
//! use pdf_scribe::writer::{AFRelationship, EmbeddedFile};
//!
//! let file = EmbeddedFile::new("data.csv", b"a,b,c".to_vec())
//!     .with_description("Monthly sales data")
//!     .with_mime_type("text/csv")
//!     .with_af_relationship(AFRelationship::Data);
//! assert_eq!(file.size(), 5);
//! ```

use super::actions::FileSpec;
use crate::error::Result;
use crate::object::ObjectRef;
use crate::stream::{CacheStrategy, Stream};
use chrono::{DateTime, FixedOffset};

/// Associated file relationship (`/AFRelationship`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AFRelationship {
    /// The file is the original source
    Source,
    /// The file contains data referenced by the document
    Data,
    /// An alternative representation
    Alternative,
    /// Supplementary data
    Supplement,
    /// Encrypted payload
    EncryptedPayload,
    /// A form data file
    FormData,
    /// A schema definition
    Schema,
    /// Unspecified relationship
    Unspecified,
}

impl AFRelationship {
    /// The PDF name for this relationship.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            AFRelationship::Source => "Source",
            AFRelationship::Data => "Data",
            AFRelationship::Alternative => "Alternative",
            AFRelationship::Supplement => "Supplement",
            AFRelationship::EncryptedPayload => "EncryptedPayload",
            AFRelationship::FormData => "FormData",
            AFRelationship::Schema => "Schema",
            AFRelationship::Unspecified => "Unspecified",
        }
    }
}

/// A file to attach to the document.
#[derive(Debug, Clone)]
pub struct EmbeddedFile {
    /// File name, also the key in the `/EmbeddedFiles` tree
    pub name: String,
    /// File contents
    pub data: Vec<u8>,
    /// `/Desc` of the file specification
    pub description: Option<String>,
    /// MIME type, written as the stream `/Subtype`
    pub mime_type: Option<String>,
    /// `/Params /CreationDate`
    pub creation_date: Option<DateTime<FixedOffset>>,
    /// `/Params /ModDate`
    pub modification_date: Option<DateTime<FixedOffset>>,
    /// Relationship to the document; files with one are listed in `/AF`
    pub af_relationship: Option<AFRelationship>,
}

impl EmbeddedFile {
    /// Create an attachment.
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
            description: None,
            mime_type: None,
            creation_date: None,
            modification_date: None,
            af_relationship: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Set the creation date.
    pub fn with_creation_date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.creation_date = Some(date);
        self
    }

    /// Set the modification date.
    pub fn with_modification_date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.modification_date = Some(date);
        self
    }

    /// Set the associated file relationship.
    pub fn with_af_relationship(mut self, relationship: AFRelationship) -> Self {
        self.af_relationship = Some(relationship);
        self
    }

    /// Size of the file in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Build the embedded file stream.
    pub fn to_stream(&self, strategy: CacheStrategy) -> Result<Stream> {
        Stream::embedded_file(
            strategy,
            &self.data,
            self.mime_type.clone(),
            self.creation_date,
            self.modification_date,
        )
    }

    /// Build the file specification pointing at `stream`.
    pub fn to_file_spec(&self, stream: ObjectRef) -> FileSpec {
        let mut spec = FileSpec::embedded(self.name.clone(), stream);
        if let Some(description) = &self.description {
            spec = spec.with_description(description.clone());
        }
        if let Some(relationship) = self.af_relationship {
            spec = spec.with_af_relationship(relationship);
        }
        spec
    }
}
