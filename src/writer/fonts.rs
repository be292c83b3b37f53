//! Font dictionaries and font descriptors.
//!
//! A [`Font`] owns its [`FontDescriptor`]; the descriptor is numbered with
//! the font and written right after it. The font program itself is a
//! separate [`crate::stream::Stream`] referenced from the descriptor.

use crate::array::Array;
use crate::compliance::Profile;
use crate::dictionary::Dictionary;
use crate::error::Result;
use crate::name::Name;
use crate::object::{Identity, Object, ObjectRef, PdfObject};
use crate::rectangle::Rectangle;
use crate::writer::{ObjectNumberAllocator, PdfOutput, WriteContext};
use bitflags::bitflags;
use std::io::Write;

bitflags! {
    /// Font descriptor flags (`/Flags`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FontFlags: u32 {
        /// Bit 1: all glyphs have the same width
        const FIXED_PITCH = 1 << 0;
        /// Bit 2: glyphs have serifs
        const SERIF = 1 << 1;
        /// Bit 3: glyphs outside the standard Latin set
        const SYMBOLIC = 1 << 2;
        /// Bit 4: glyphs resemble cursive handwriting
        const SCRIPT = 1 << 3;
        /// Bit 6: standard Latin character set
        const NONSYMBOLIC = 1 << 5;
        /// Bit 7: dominant vertical strokes are slanted
        const ITALIC = 1 << 6;
        /// Bit 17: no lowercase letters
        const ALL_CAP = 1 << 16;
        /// Bit 18: lowercase letters drawn as small capitals
        const SMALL_CAP = 1 << 17;
        /// Bit 19: force bold at small sizes
        const FORCE_BOLD = 1 << 18;
    }
}

/// Font dictionary `/Subtype`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSubtype {
    /// Type 1
    Type1,
    /// TrueType
    TrueType,
    /// Composite font
    Type0,
    /// CID-keyed descendant with CFF outlines
    CidFontType0,
    /// CID-keyed descendant with TrueType outlines
    CidFontType2,
}

impl FontSubtype {
    /// The PDF name.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            FontSubtype::Type1 => "Type1",
            FontSubtype::TrueType => "TrueType",
            FontSubtype::Type0 => "Type0",
            FontSubtype::CidFontType0 => "CIDFontType0",
            FontSubtype::CidFontType2 => "CIDFontType2",
        }
    }
}

/// Descriptor key under which a font program is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFileKind {
    /// `/FontFile` (Type 1)
    FontFile,
    /// `/FontFile2` (TrueType)
    FontFile2,
    /// `/FontFile3` (CFF, OpenType)
    FontFile3,
}

impl FontFileKind {
    fn key(&self) -> &'static str {
        match self {
            FontFileKind::FontFile => "FontFile",
            FontFileKind::FontFile2 => "FontFile2",
            FontFileKind::FontFile3 => "FontFile3",
        }
    }
}

/// A font descriptor (`/Type /FontDescriptor`).
#[derive(Debug, Clone)]
pub struct FontDescriptor {
    identity: Identity,
    font_name: Name,
    flags: FontFlags,
    bbox: Rectangle,
    italic_angle: f64,
    ascent: f64,
    descent: f64,
    cap_height: f64,
    stem_v: f64,
    font_file: Option<(FontFileKind, ObjectRef)>,
}

impl FontDescriptor {
    /// Create a descriptor with the required metrics.
    pub fn new(font_name: impl Into<Name>, flags: FontFlags, bbox: Rectangle) -> Self {
        Self {
            identity: Identity::new(),
            font_name: font_name.into(),
            flags,
            bbox,
            italic_angle: 0.0,
            ascent: bbox.ury,
            descent: bbox.lly,
            cap_height: bbox.ury,
            stem_v: 80.0,
            font_file: None,
        }
    }

    /// Set ascent, descent and cap height.
    pub fn with_metrics(mut self, ascent: f64, descent: f64, cap_height: f64) -> Self {
        self.ascent = ascent;
        self.descent = descent;
        self.cap_height = cap_height;
        self
    }

    /// Set `/ItalicAngle`.
    pub fn with_italic_angle(mut self, angle: f64) -> Self {
        self.italic_angle = angle;
        self
    }

    /// Set `/StemV`.
    pub fn with_stem_v(mut self, stem_v: f64) -> Self {
        self.stem_v = stem_v;
        self
    }

    /// Attach the embedded font program.
    pub fn with_font_file(mut self, kind: FontFileKind, stream: ObjectRef) -> Self {
        self.font_file = Some((kind, stream));
        self
    }

    /// Whether a font program is attached.
    pub fn is_embedded(&self) -> bool {
        self.font_file.is_some()
    }

    /// The flags.
    pub fn flags(&self) -> FontFlags {
        self.flags
    }

    fn to_dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::with_type("FontDescriptor");
        dict.put("FontName", self.font_name.clone());
        dict.put("Flags", self.flags.bits());
        dict.put("FontBBox", self.bbox);
        dict.put("ItalicAngle", self.italic_angle);
        dict.put("Ascent", self.ascent);
        dict.put("Descent", self.descent);
        dict.put("CapHeight", self.cap_height);
        dict.put("StemV", self.stem_v);
        if let Some((kind, stream)) = self.font_file {
            dict.put_ref(kind.key(), stream);
        }
        dict
    }
}

impl PdfObject for FontDescriptor {
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

/// A font dictionary (`/Type /Font`).
#[derive(Debug, Clone)]
pub struct Font {
    identity: Identity,
    subtype: FontSubtype,
    base_font: Name,
    encoding: Option<Name>,
    first_char: u32,
    widths: Vec<f64>,
    descriptor: Option<FontDescriptor>,
}

impl Font {
    /// Create a font. Without a descriptor it refers to a non-embedded font.
    pub fn new(subtype: FontSubtype, base_font: impl Into<Name>) -> Self {
        Self {
            identity: Identity::new(),
            subtype,
            base_font: base_font.into(),
            encoding: None,
            first_char: 0,
            widths: Vec::new(),
            descriptor: None,
        }
    }

    /// Set `/Encoding` (e.g. `WinAnsiEncoding`).
    pub fn with_encoding(mut self, encoding: impl Into<Name>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// Set `/FirstChar`, `/LastChar` and `/Widths`.
    pub fn with_widths(mut self, first_char: u32, widths: Vec<f64>) -> Self {
        self.first_char = first_char;
        self.widths = widths;
        self
    }

    /// Attach the descriptor.
    pub fn with_descriptor(mut self, descriptor: FontDescriptor) -> Self {
        self.descriptor = Some(descriptor);
        self
    }

    /// The `/BaseFont` name.
    pub fn base_font(&self) -> &Name {
        &self.base_font
    }

    /// The descriptor, if any.
    pub fn descriptor(&self) -> Option<&FontDescriptor> {
        self.descriptor.as_ref()
    }

    /// Whether the font program is embedded.
    pub fn is_embedded(&self) -> bool {
        self.descriptor.as_ref().map_or(false, FontDescriptor::is_embedded)
    }

    /// Check the font against the conformance profile.
    pub fn validate(&self, profile: &Profile) -> Result<()> {
        let name = String::from_utf8_lossy(self.base_font.as_bytes());
        profile.verify_font_embedding(&name, self.is_embedded())
    }

    /// Number the font and its descriptor.
    pub fn number(&mut self, alloc: &mut ObjectNumberAllocator) -> Result<ObjectRef> {
        let reference = alloc.assign(&mut self.identity)?;
        if let Some(descriptor) = self.descriptor.as_mut() {
            alloc.assign_object(descriptor)?;
        }
        Ok(reference)
    }

    fn to_dictionary(&self) -> Result<Dictionary> {
        let mut dict = Dictionary::with_type("Font");
        dict.put("Subtype", Object::name(self.subtype.pdf_name()));
        dict.put("BaseFont", self.base_font.clone());
        if let Some(encoding) = &self.encoding {
            dict.put("Encoding", encoding.clone());
        }
        if !self.widths.is_empty() {
            let last_char = self.first_char as usize + self.widths.len() - 1;
            let widths: Array = self.widths.iter().map(|w| Object::Real(*w)).collect();
            dict.put("FirstChar", self.first_char);
            dict.put("LastChar", last_char);
            dict.put("Widths", widths);
        }
        if let Some(descriptor) = &self.descriptor {
            dict.put_ref("FontDescriptor", descriptor.reference()?);
        }
        Ok(dict)
    }
}

impl PdfObject for Font {
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

    fn write_children(&mut self, ctx: &WriteContext<'_>, out: &mut PdfOutput<'_>) -> Result<()> {
        if let Some(descriptor) = self.descriptor.as_mut() {
            out.write_object(ctx, descriptor)?;
        }
        Ok(())
    }
}
