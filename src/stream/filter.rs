//! Stream filters.
//!
//! A filter wraps an output sink in a transforming sink. Filters in a
//! [`FilterList`] are applied in list order: `filters[0]` sees the raw
//! payload first, so the sink chain is built from the last filter outwards.
//! `/Filter` names the filters in decode order, which is the reverse.

use crate::array::Array;
use crate::dictionary::Dictionary;
use crate::error::{Error, Result};
use crate::object::Object;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};

/// Filter category for streams without a more specific one.
pub const DEFAULT_FILTER: &str = "default";
/// Filter category for page content streams.
pub const CONTENT_FILTER: &str = "content";
/// Filter category for image streams.
pub const IMAGE_FILTER: &str = "image";
/// Filter category for font program streams.
pub const FONT_FILTER: &str = "font";
/// Filter category for XMP metadata streams.
pub const METADATA_FILTER: &str = "metadata";
/// Filter category for embedded file streams.
pub const EMBEDDED_FILE_FILTER: &str = "embedded-file";

/// Line length used by the ASCII filters.
const ASCII_LINE_LENGTH: usize = 80;

/// A `Write` that must be finished explicitly so encoders can flush their
/// trailing state (checksums, end-of-data markers).
pub trait FilterSink: Write {
    /// Flush any trailing state into the inner sink, then finish it.
    fn finish(self: Box<Self>) -> io::Result<()>;
}

impl FilterSink for Vec<u8> {
    fn finish(self: Box<Self>) -> io::Result<()> {
        Ok(())
    }
}

impl<W: FilterSink + ?Sized> FilterSink for &mut W {
    fn finish(mut self: Box<Self>) -> io::Result<()> {
        self.flush()
    }
}

/// A named, reversible stream transformation.
pub trait Filter: fmt::Debug {
    /// PDF name of the decode filter. Empty names contribute no `/Filter`
    /// entry (the null filter, encryption).
    fn name(&self) -> &str;

    /// Decode parameters for `/DecodeParms`, if any.
    fn decode_parms(&self) -> Option<Object> {
        None
    }

    /// Whether the filter output is 7-bit ASCII.
    fn is_ascii(&self) -> bool {
        false
    }

    /// Whether the payload is already encoded with this filter.
    fn is_applied(&self) -> bool {
        false
    }

    /// Wrap `sink` so bytes written to the result are encoded into it.
    fn apply<'a>(&self, sink: Box<dyn FilterSink + 'a>) -> Box<dyn FilterSink + 'a>;
}

/// Pass-through filter.
#[derive(Debug, Clone, Default)]
pub struct NullFilter;

impl Filter for NullFilter {
    fn name(&self) -> &str {
        ""
    }

    fn apply<'a>(&self, sink: Box<dyn FilterSink + 'a>) -> Box<dyn FilterSink + 'a> {
        sink
    }
}

/// A filter whose encoding was done upstream, e.g. a JPEG passed through as
/// `/DCTDecode`. It only contributes dictionary entries.
#[derive(Debug, Clone)]
pub struct PreEncodedFilter {
    name: String,
    decode_parms: Option<Object>,
}

impl PreEncodedFilter {
    /// Mark the payload as already encoded with `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            decode_parms: None,
        }
    }

    /// Attach decode parameters.
    pub fn with_decode_parms(mut self, parms: impl Into<Object>) -> Self {
        self.decode_parms = Some(parms.into());
        self
    }
}

impl Filter for PreEncodedFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn decode_parms(&self) -> Option<Object> {
        self.decode_parms.clone()
    }

    fn is_applied(&self) -> bool {
        true
    }

    fn apply<'a>(&self, sink: Box<dyn FilterSink + 'a>) -> Box<dyn FilterSink + 'a> {
        sink
    }
}

/// Zlib/deflate compression (`/FlateDecode`).
#[derive(Debug, Clone)]
pub struct FlateFilter {
    level: Compression,
}

impl Default for FlateFilter {
    fn default() -> Self {
        Self {
            level: Compression::default(),
        }
    }
}

impl FlateFilter {
    /// Flate with the default compression level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flate with an explicit level (0-9).
    pub fn with_level(level: u32) -> Self {
        Self {
            level: Compression::new(level.min(9)),
        }
    }
}

struct FlateSink<'a> {
    encoder: ZlibEncoder<Box<dyn FilterSink + 'a>>,
}

impl Write for FlateSink<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.encoder.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.encoder.flush()
    }
}

impl FilterSink for FlateSink<'_> {
    fn finish(self: Box<Self>) -> io::Result<()> {
        let FlateSink { encoder } = *self;
        encoder.finish()?.finish()
    }
}

impl Filter for FlateFilter {
    fn name(&self) -> &str {
        "FlateDecode"
    }

    fn apply<'a>(&self, sink: Box<dyn FilterSink + 'a>) -> Box<dyn FilterSink + 'a> {
        Box::new(FlateSink {
            encoder: ZlibEncoder::new(sink, self.level),
        })
    }
}

/// LZW compression (`/LZWDecode`) with the PDF early-change convention.
#[derive(Debug, Clone, Default)]
pub struct LzwFilter;

struct LzwSink<'a> {
    buffer: Vec<u8>,
    inner: Box<dyn FilterSink + 'a>,
}

impl Write for LzwSink<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl FilterSink for LzwSink<'_> {
    fn finish(self: Box<Self>) -> io::Result<()> {
        let LzwSink { buffer, mut inner } = *self;
        // TIFF size switch matches /EarlyChange 1, the PDF default.
        let encoded = weezl::encode::Encoder::with_tiff_size_switch(weezl::BitOrder::Msb, 8)
            .encode(&buffer)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        inner.write_all(&encoded)?;
        inner.finish()
    }
}

impl Filter for LzwFilter {
    fn name(&self) -> &str {
        "LZWDecode"
    }

    fn apply<'a>(&self, sink: Box<dyn FilterSink + 'a>) -> Box<dyn FilterSink + 'a> {
        Box::new(LzwSink {
            buffer: Vec::new(),
            inner: sink,
        })
    }
}

/// Hexadecimal encoding (`/ASCIIHexDecode`), terminated by `>`.
#[derive(Debug, Clone, Default)]
pub struct AsciiHexFilter;

struct AsciiHexSink<'a> {
    inner: Box<dyn FilterSink + 'a>,
    column: usize,
}

impl Write for AsciiHexSink<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut out = Vec::with_capacity(buf.len() * 2 + buf.len() / 40 + 1);
        for byte in buf {
            if self.column >= ASCII_LINE_LENGTH {
                out.push(b'\n');
                self.column = 0;
            }
            write!(out, "{:02X}", byte)?;
            self.column += 2;
        }
        self.inner.write_all(&out)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl FilterSink for AsciiHexSink<'_> {
    fn finish(self: Box<Self>) -> io::Result<()> {
        let AsciiHexSink { mut inner, .. } = *self;
        inner.write_all(b">")?;
        inner.finish()
    }
}

impl Filter for AsciiHexFilter {
    fn name(&self) -> &str {
        "ASCIIHexDecode"
    }

    fn is_ascii(&self) -> bool {
        true
    }

    fn apply<'a>(&self, sink: Box<dyn FilterSink + 'a>) -> Box<dyn FilterSink + 'a> {
        Box::new(AsciiHexSink {
            inner: sink,
            column: 0,
        })
    }
}

/// Base-85 encoding (`/ASCII85Decode`), terminated by `~>`.
#[derive(Debug, Clone, Default)]
pub struct Ascii85Filter;

struct Ascii85Sink<'a> {
    inner: Box<dyn FilterSink + 'a>,
    group: [u8; 4],
    filled: usize,
    column: usize,
}

impl Ascii85Sink<'_> {
    fn emit(&mut self, chars: &[u8]) -> io::Result<()> {
        for &c in chars {
            if self.column >= ASCII_LINE_LENGTH {
                self.inner.write_all(b"\n")?;
                self.column = 0;
            }
            self.inner.write_all(&[c])?;
            self.column += 1;
        }
        Ok(())
    }

    fn encode_group(group: [u8; 4]) -> [u8; 5] {
        let mut value = u32::from_be_bytes(group);
        let mut chars = [0u8; 5];
        for slot in chars.iter_mut().rev() {
            *slot = (value % 85) as u8 + b'!';
            value /= 85;
        }
        chars
    }
}

impl Write for Ascii85Sink<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for &byte in buf {
            self.group[self.filled] = byte;
            self.filled += 1;
            if self.filled == 4 {
                if self.group == [0; 4] {
                    self.emit(b"z")?;
                } else {
                    let chars = Self::encode_group(self.group);
                    self.emit(&chars)?;
                }
                self.filled = 0;
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl FilterSink for Ascii85Sink<'_> {
    fn finish(mut self: Box<Self>) -> io::Result<()> {
        if self.filled > 0 {
            // Partial group: pad with zeros, keep n + 1 characters.
            let mut group = [0u8; 4];
            group[..self.filled].copy_from_slice(&self.group[..self.filled]);
            let chars = Self::encode_group(group);
            let keep = self.filled + 1;
            self.emit(&chars[..keep])?;
        }
        let Ascii85Sink { mut inner, .. } = *self;
        inner.write_all(b"~>")?;
        inner.finish()
    }
}

impl Filter for Ascii85Filter {
    fn name(&self) -> &str {
        "ASCII85Decode"
    }

    fn is_ascii(&self) -> bool {
        true
    }

    fn apply<'a>(&self, sink: Box<dyn FilterSink + 'a>) -> Box<dyn FilterSink + 'a> {
        Box::new(Ascii85Sink {
            inner: sink,
            group: [0; 4],
            filled: 0,
            column: 0,
        })
    }
}

/// Create a filter from its configuration name.
pub fn filter_by_name(name: &str) -> Result<Box<dyn Filter>> {
    let filter: Box<dyn Filter> = match name.trim().to_ascii_lowercase().as_str() {
        "flate" => Box::new(FlateFilter::new()),
        "lzw" => Box::new(LzwFilter),
        "ascii-hex" | "asciihex" => Box::new(AsciiHexFilter),
        "ascii-85" | "ascii85" => Box::new(Ascii85Filter),
        "null" => Box::new(NullFilter),
        _ => {
            return Err(Error::illegal_argument(format!(
                "Unsupported filter type in stream-filter-list: {}",
                name
            )))
        },
    };
    Ok(filter)
}

/// Filter names per stream category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterMap {
    entries: HashMap<String, Vec<String>>,
}

impl FilterMap {
    /// Create an empty map (every category falls back to flate).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filters for a category.
    pub fn insert(&mut self, category: impl Into<String>, filters: Vec<String>) {
        self.entries.insert(category.into(), filters);
    }

    /// Builder-style [`FilterMap::insert`].
    pub fn with(mut self, category: impl Into<String>, filters: &[&str]) -> Self {
        self.insert(category, filters.iter().map(|f| f.to_string()).collect());
        self
    }

    /// Filters configured for a category.
    pub fn get(&self, category: &str) -> Option<&[String]> {
        self.entries.get(category).map(Vec::as_slice)
    }
}

/// Ordered list of filters for one stream.
#[derive(Debug, Default)]
pub struct FilterList {
    filters: Vec<Box<dyn Filter>>,
    ignore_ascii: bool,
}

impl FilterList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any filter has been added.
    pub fn is_initialized(&self) -> bool {
        !self.filters.is_empty()
    }

    /// Number of filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Filters in application order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Filter> {
        self.filters.iter().map(|f| f.as_ref())
    }

    /// Skip ASCII filters added from now on.
    pub fn ignore_ascii_filters(&mut self, ignore: bool) {
        self.ignore_ascii = ignore;
    }

    /// Append a filter. ASCII filters are dropped when they are being ignored.
    pub fn add_filter(&mut self, filter: Box<dyn Filter>) {
        if self.ignore_ascii && filter.is_ascii() {
            log::debug!("Ignoring ASCII filter {}", filter.name());
            return;
        }
        self.filters.push(filter);
    }

    /// Append a filter by configuration name.
    pub fn add_filter_by_name(&mut self, name: &str) -> Result<()> {
        self.add_filter(filter_by_name(name)?);
        Ok(())
    }

    /// Install the configured filters for `category`.
    ///
    /// Falls back to the `default` category, then to flate. Metadata streams
    /// get no filter unless one is configured for them explicitly.
    pub fn add_default_filters(&mut self, map: &FilterMap, category: &str) -> Result<()> {
        let configured = match map.get(category) {
            Some(names) => Some(names),
            None if category == METADATA_FILTER => None,
            None => map.get(DEFAULT_FILTER),
        };
        match configured {
            Some(names) => {
                for name in names {
                    self.add_filter_by_name(name)?;
                }
            },
            None if category == METADATA_FILTER => {
                // XMP must stay readable by non-PDF tools.
                self.add_filter(Box::new(NullFilter));
            },
            None => self.add_filter(Box::new(FlateFilter::new())),
        }
        log::trace!("Filters for category '{}': {:?}", category, self.filters);
        Ok(())
    }

    /// Replace every filter with the null filter.
    pub fn disable(&mut self) {
        self.filters.clear();
        self.filters.push(Box::new(NullFilter));
    }

    /// Build the sink chain over `sink`. Pre-encoded filters are skipped.
    pub fn apply<'a>(&self, sink: Box<dyn FilterSink + 'a>) -> Box<dyn FilterSink + 'a> {
        let mut sink = sink;
        for filter in self.filters.iter().rev() {
            if !filter.is_applied() {
                sink = filter.apply(sink);
            }
        }
        sink
    }

    /// Encode `data` through the whole chain.
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        {
            let mut sink = self.apply(Box::new(&mut out));
            sink.write_all(data)?;
            sink.finish()?;
        }
        Ok(out)
    }

    /// Write `/Filter` and `/DecodeParms` for the filters in this list.
    pub fn build_filter_entries(&self, dict: &mut Dictionary) {
        let named: Vec<&dyn Filter> = self
            .filters
            .iter()
            .rev()
            .map(|f| f.as_ref())
            .filter(|f| !f.name().is_empty())
            .collect();

        match named.as_slice() {
            [] => {
                dict.remove("Filter");
                dict.remove("DecodeParms");
                return;
            },
            [single] => dict.put("Filter", Object::name(single.name())),
            many => {
                let names: Array = many.iter().map(|f| Object::name(f.name())).collect();
                dict.put("Filter", names);
            },
        }

        let parms: Vec<Option<Object>> = named.iter().map(|f| f.decode_parms()).collect();
        if parms.iter().all(Option::is_none) {
            dict.remove("DecodeParms");
        } else if parms.len() == 1 {
            if let Some(Some(p)) = parms.into_iter().next() {
                dict.put("DecodeParms", p);
            }
        } else {
            let arr: Array = parms.into_iter().map(|p| p.unwrap_or(Object::Null)).collect();
            dict.put("DecodeParms", arr);
        }
    }
}
