//! Stream objects.
//!
//! A [`Stream`] is a dictionary plus a byte payload held in a [`ByteCache`].
//! On output the payload is pushed through the stream's [`FilterList`] into a
//! scratch buffer, `/Length` is set from the encoded size, and dictionary and
//! data are emitted. The cached payload is released right after it is written.
//!
//! Font programs, embedded files and XMP metadata are variants of the same
//! type ([`StreamKind`]) that add their own dictionary keys.

pub mod cache;
pub mod filter;

pub use cache::{ByteCache, CacheStrategy, MemoryCache, TempFileCache};
pub use filter::{
    filter_by_name, Ascii85Filter, AsciiHexFilter, Filter, FilterList, FilterMap, FilterSink,
    FlateFilter, LzwFilter, NullFilter, PreEncodedFilter, CONTENT_FILTER, DEFAULT_FILTER,
    EMBEDDED_FILE_FILTER, FONT_FILTER, IMAGE_FILTER, METADATA_FILTER,
};

use crate::date::format_pdf_date;
use crate::dictionary::Dictionary;
use crate::error::{Error, Result};
use crate::name::Name;
use crate::object::{Identity, Object, ObjectRef, PdfObject};
use crate::writer::WriteContext;
use chrono::{DateTime, FixedOffset};
use md5::{Digest, Md5};
use std::fmt;
use std::io::{self, Write};

/// Supplies the per-object encryption filter for streams.
///
/// Only the contract is defined here; key derivation and ciphers belong to
/// the implementor.
pub trait StreamEncryption: fmt::Debug {
    /// The filter that encrypts the stream numbered `reference`.
    fn filter_for(&self, reference: ObjectRef) -> Box<dyn Filter>;
}

/// Variant-specific stream behaviour.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamKind {
    /// Plain stream (content, images, generic data)
    Generic,
    /// Type 1 font program: clear-text, encrypted and trailer portion lengths
    Type1Font {
        /// Length of the clear-text portion
        length1: usize,
        /// Length of the encrypted portion
        length2: usize,
        /// Length of the fixed-content portion
        length3: usize,
    },
    /// TrueType font program
    TrueTypeFont {
        /// Length of the unencoded font program
        length1: usize,
    },
    /// Embedded file (`/Type /EmbeddedFile`)
    EmbeddedFile {
        /// Creation date for `/Params`
        creation_date: Option<DateTime<FixedOffset>>,
        /// Modification date for `/Params`
        modification_date: Option<DateTime<FixedOffset>>,
        /// MIME type, written as `/Subtype`
        mime_type: Option<String>,
        /// MD5 of the unencoded file
        checksum: Option<[u8; 16]>,
    },
    /// XMP metadata (`/Type /Metadata /Subtype /XML`)
    Metadata,
}

/// A PDF stream.
#[derive(Debug)]
pub struct Stream {
    identity: Identity,
    dict: Dictionary,
    filters: FilterList,
    cache: Box<dyn ByteCache>,
    kind: StreamKind,
    category: String,
    written: bool,
}

impl Stream {
    /// Create an empty generic stream backed by the given cache strategy.
    pub fn new(strategy: CacheStrategy) -> Result<Self> {
        Ok(Self::with_cache(strategy.create()?))
    }

    /// Create an empty generic stream over an existing cache.
    pub fn with_cache(cache: Box<dyn ByteCache>) -> Self {
        Self {
            identity: Identity::new(),
            dict: Dictionary::new(),
            filters: FilterList::new(),
            cache,
            kind: StreamKind::Generic,
            category: DEFAULT_FILTER.to_string(),
            written: false,
        }
    }

    /// Create a generic stream holding `data`.
    pub fn with_data(strategy: CacheStrategy, data: &[u8]) -> Result<Self> {
        let mut stream = Self::new(strategy)?;
        stream.write_data(data)?;
        Ok(stream)
    }

    /// Create a page content stream.
    pub fn content(strategy: CacheStrategy, data: &[u8]) -> Result<Self> {
        let mut stream = Self::with_data(strategy, data)?;
        stream.category = CONTENT_FILTER.to_string();
        Ok(stream)
    }

    /// Create a Type 1 font program stream from its three portions.
    pub fn type1_font(
        strategy: CacheStrategy,
        clear_text: &[u8],
        encrypted: &[u8],
        trailer: &[u8],
    ) -> Result<Self> {
        let mut stream = Self::new(strategy)?;
        stream.write_data(clear_text)?;
        stream.write_data(encrypted)?;
        stream.write_data(trailer)?;
        stream.kind = StreamKind::Type1Font {
            length1: clear_text.len(),
            length2: encrypted.len(),
            length3: trailer.len(),
        };
        stream.category = FONT_FILTER.to_string();
        Ok(stream)
    }

    /// Create a TrueType font program stream.
    pub fn truetype_font(strategy: CacheStrategy, data: &[u8]) -> Result<Self> {
        let mut stream = Self::with_data(strategy, data)?;
        stream.kind = StreamKind::TrueTypeFont { length1: data.len() };
        stream.category = FONT_FILTER.to_string();
        Ok(stream)
    }

    /// Create an embedded file stream. The MD5 checksum is taken from `data`.
    pub fn embedded_file(
        strategy: CacheStrategy,
        data: &[u8],
        mime_type: Option<String>,
        creation_date: Option<DateTime<FixedOffset>>,
        modification_date: Option<DateTime<FixedOffset>>,
    ) -> Result<Self> {
        let mut stream = Self::with_data(strategy, data)?;
        let mut checksum = [0u8; 16];
        checksum.copy_from_slice(&Md5::digest(data));
        stream.kind = StreamKind::EmbeddedFile {
            creation_date,
            modification_date,
            mime_type,
            checksum: Some(checksum),
        };
        stream.category = EMBEDDED_FILE_FILTER.to_string();
        Ok(stream)
    }

    /// Create an XMP metadata stream.
    pub fn metadata(strategy: CacheStrategy, xmp: &[u8]) -> Result<Self> {
        let mut stream = Self::with_data(strategy, xmp)?;
        stream.kind = StreamKind::Metadata;
        stream.category = METADATA_FILTER.to_string();
        Ok(stream)
    }

    /// The stream dictionary (without the entries added at output time).
    pub fn dict(&self) -> &Dictionary {
        &self.dict
    }

    /// Mutable stream dictionary.
    pub fn dict_mut(&mut self) -> &mut Dictionary {
        &mut self.dict
    }

    /// Insert or replace a dictionary entry.
    pub fn put(&mut self, key: impl Into<Name>, value: impl Into<Object>) {
        self.dict.put(key, value);
    }

    /// The filter list.
    pub fn filters(&self) -> &FilterList {
        &self.filters
    }

    /// Mutable filter list.
    pub fn filters_mut(&mut self) -> &mut FilterList {
        &mut self.filters
    }

    /// The stream variant.
    pub fn kind(&self) -> &StreamKind {
        &self.kind
    }

    /// Filter category used to pick default filters.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Override the filter category.
    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
    }

    /// Whether the stream has been written.
    pub fn is_written(&self) -> bool {
        self.written
    }

    /// Append raw (unfiltered) payload bytes.
    pub fn write_data(&mut self, data: &[u8]) -> Result<()> {
        if self.written {
            return Err(Error::illegal_state("Stream has already been written"));
        }
        self.cache.write_all(data)?;
        Ok(())
    }

    /// Size of the raw payload.
    pub fn data_len(&self) -> io::Result<u64> {
        self.cache.size()
    }

    /// Run the payload through the filter chain into a scratch buffer.
    pub fn encode_payload(&mut self) -> Result<Vec<u8>> {
        let mut scratch = Vec::new();
        {
            let mut sink = self.filters.apply(Box::new(&mut scratch));
            self.cache.output_contents(&mut sink)?;
            sink.finish()?;
        }
        Ok(scratch)
    }

    /// Add `/Length`, filter entries and the kind-specific keys.
    fn populate_stream_dict(&mut self, length: usize) {
        self.dict.put("Length", length);
        self.filters.build_filter_entries(&mut self.dict);

        match &self.kind {
            StreamKind::Generic => {},
            StreamKind::Type1Font {
                length1,
                length2,
                length3,
            } => {
                self.dict.put("Length1", *length1);
                self.dict.put("Length2", *length2);
                self.dict.put("Length3", *length3);
            },
            StreamKind::TrueTypeFont { length1 } => {
                self.dict.put("Length1", *length1);
            },
            StreamKind::EmbeddedFile {
                creation_date,
                modification_date,
                mime_type,
                checksum,
            } => {
                let mut params = Dictionary::new();
                match self.cache.size() {
                    Ok(size) => params.put("Size", size as i64),
                    Err(e) => log::warn!("Omitting embedded file /Size: {}", e),
                }
                if let Some(date) = creation_date {
                    params.put("CreationDate", Object::string(format_pdf_date(date)));
                }
                if let Some(date) = modification_date {
                    params.put("ModDate", Object::string(format_pdf_date(date)));
                }
                if let Some(sum) = checksum {
                    params.put("CheckSum", Object::String(sum.to_vec()));
                }

                // Type and Subtype lead the dictionary.
                let mut dict = Dictionary::with_type("EmbeddedFile");
                if let Some(mime) = mime_type {
                    dict.put("Subtype", Object::name(mime));
                }
                for (key, value) in &self.dict {
                    dict.put(key.clone(), value.clone());
                }
                dict.put("Params", params);
                self.dict = dict;
            },
            StreamKind::Metadata => {
                let mut dict = Dictionary::with_type("Metadata");
                dict.put("Subtype", Object::name("XML"));
                for (key, value) in &self.dict {
                    dict.put(key.clone(), value.clone());
                }
                self.dict = dict;
            },
        }
    }
}

impl Write for Stream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "Stream has already been written",
            ));
        }
        self.cache.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.cache.flush()
    }
}

impl PdfObject for Stream {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }

    fn write_body(&mut self, ctx: &WriteContext<'_>, w: &mut dyn Write) -> Result<()> {
        if self.written {
            return Err(Error::illegal_state("Stream has already been written"));
        }
        let data = self.encode_payload()?;
        self.populate_stream_dict(data.len());

        ctx.serializer.write_dictionary(w, &self.dict)?;
        w.write_all(b"\nstream\n")?;
        w.write_all(&data)?;
        w.write_all(b"\nendstream")?;

        self.cache.clear()?;
        self.written = true;
        log::trace!("Wrote stream ({} encoded bytes)", data.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::ReferenceTable;
    use crate::writer::ObjectSerializer;

    fn write(stream: &mut Stream) -> Result<Vec<u8>> {
        let serializer = ObjectSerializer::new();
        let refs = ReferenceTable::new();
        let ctx = WriteContext {
            serializer: &serializer,
            refs: &refs,
        };
        let mut out = Vec::new();
        stream.write_body(&ctx, &mut out)?;
        Ok(out)
    }

    #[test]
    fn test_null_filter_stream_framing() {
        let mut stream = Stream::with_data(CacheStrategy::Memory, b"0 0 m 10 10 l S").unwrap();
        stream.filters_mut().add_filter(Box::new(NullFilter));
        let out = write(&mut stream).unwrap();
        assert_eq!(out, b"<< /Length 15 >>\nstream\n0 0 m 10 10 l S\nendstream");
    }

    #[test]
    fn test_length_matches_encoded_payload() {
        let mut stream = Stream::with_data(CacheStrategy::Memory, &[7u8; 500]).unwrap();
        stream.filters_mut().add_filter(Box::new(FlateFilter::new()));
        let out = write(&mut stream).unwrap();
        let length = stream.dict().get("Length").and_then(Object::as_integer).unwrap() as usize;
        let start = out.windows(8).position(|w| w == b"\nstream\n").unwrap() + 8;
        assert_eq!(out.len() - start - b"\nendstream".len(), length);
        assert_eq!(stream.dict().get("Filter"), Some(&Object::name("FlateDecode")));
    }

    #[test]
    fn test_second_write_fails() {
        let mut stream = Stream::with_data(CacheStrategy::Memory, b"x").unwrap();
        write(&mut stream).unwrap();
        assert!(stream.is_written());
        assert!(matches!(write(&mut stream), Err(Error::IllegalState(_))));
        assert!(stream.write_data(b"y").is_err());
    }

    #[test]
    fn test_payload_released_after_write() {
        let mut stream = Stream::with_data(CacheStrategy::Memory, b"payload").unwrap();
        write(&mut stream).unwrap();
        assert_eq!(stream.data_len().unwrap(), 0);
    }

    #[test]
    fn test_type1_lengths() {
        let mut stream =
            Stream::type1_font(CacheStrategy::Memory, b"clear", b"encrypted", b"000").unwrap();
        stream.filters_mut().add_filter(Box::new(NullFilter));
        write(&mut stream).unwrap();
        assert_eq!(stream.dict().get("Length1"), Some(&Object::Integer(5)));
        assert_eq!(stream.dict().get("Length2"), Some(&Object::Integer(9)));
        assert_eq!(stream.dict().get("Length3"), Some(&Object::Integer(3)));
        assert_eq!(stream.dict().get("Length"), Some(&Object::Integer(17)));
    }

    #[test]
    fn test_truetype_length1() {
        let mut stream = Stream::truetype_font(CacheStrategy::Memory, &[1, 2, 3, 4]).unwrap();
        write(&mut stream).unwrap();
        assert_eq!(stream.dict().get("Length1"), Some(&Object::Integer(4)));
    }

    #[test]
    fn test_metadata_dictionary() {
        let mut stream = Stream::metadata(CacheStrategy::Memory, b"<x:xmpmeta/>").unwrap();
        write(&mut stream).unwrap();
        assert_eq!(stream.dict().get("Type"), Some(&Object::name("Metadata")));
        assert_eq!(stream.dict().get("Subtype"), Some(&Object::name("XML")));
    }
}
