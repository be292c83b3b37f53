//! PDF object serialization.
//!
//! Serializes PDF values to their byte representation according to
//! PDF specification ISO 32000-1:2008.
//!
//! Layout conventions:
//! - Arrays: `[1 2 3]`
//! - Dictionaries with at most two entries: `<< /Type /Page /Count 1 >>`
//! - Larger dictionaries: one entry per line, indented by two spaces
//! - Reals: fixed number of decimal places (see [`crate::number`])

use crate::array::Array;
use crate::dictionary::Dictionary;
use crate::error::Result;
use crate::number::{clamp_precision, format_double, DEFAULT_PRECISION};
use crate::object::{Object, ObjectRef};
use std::io::Write;

/// Dictionaries with this many entries or fewer are written on one line.
const COMPACT_DICTIONARY_LIMIT: usize = 2;

/// Serializer for PDF objects.
#[derive(Debug, Clone, Copy)]
pub struct ObjectSerializer {
    /// Decimal places used for reals
    precision: u8,
}

impl Default for ObjectSerializer {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
        }
    }
}

impl ObjectSerializer {
    /// Create a serializer with the default precision.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a serializer with the given precision (capped to 1..=16).
    pub fn with_precision(precision: u8) -> Self {
        Self {
            precision: clamp_precision(precision),
        }
    }

    /// Decimal places used for reals.
    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Serialize an object to bytes.
    pub fn serialize(&self, obj: &Object) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_object(&mut buf, obj)?;
        Ok(buf)
    }

    /// Serialize an object to a string (for debugging and tests).
    pub fn serialize_to_string(&self, obj: &Object) -> Result<String> {
        Ok(String::from_utf8_lossy(&self.serialize(obj)?).to_string())
    }

    /// Serialize an indirect object definition.
    ///
    /// Format: `{id} {gen} obj\n{object}\nendobj\n`
    pub fn serialize_indirect(&self, reference: ObjectRef, obj: &Object) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        writeln!(buf, "{} {} obj", reference.id, reference.gen)?;
        self.write_object(&mut buf, obj)?;
        write!(buf, "\nendobj\n")?;
        Ok(buf)
    }

    /// Write an object.
    pub fn write_object<W: Write + ?Sized>(&self, w: &mut W, obj: &Object) -> Result<()> {
        match obj {
            Object::Null => w.write_all(b"null")?,
            Object::Boolean(b) => w.write_all(if *b { b"true".as_slice() } else { b"false" })?,
            Object::Integer(i) => write!(w, "{}", i)?,
            Object::Real(r) => self.write_real(w, *r)?,
            Object::String(s) => self.write_string(w, s)?,
            Object::Name(n) => n.write_to(w)?,
            Object::Array(arr) => self.write_array(w, arr)?,
            Object::Dictionary(dict) => self.write_dictionary(w, dict)?,
            Object::Reference(r) => write!(w, "{} {} R", r.id, r.gen)?,
        }
        Ok(())
    }

    /// Write a real number with the configured precision.
    pub fn write_real<W: Write + ?Sized>(&self, w: &mut W, value: f64) -> Result<()> {
        w.write_all(format_double(value, self.precision)?.as_bytes())?;
        Ok(())
    }

    /// Write a PDF string.
    ///
    /// Uses literal string syntax `(...)` with proper escaping,
    /// or hex string syntax `<...>` for binary data.
    pub fn write_string<W: Write + ?Sized>(&self, w: &mut W, data: &[u8]) -> Result<()> {
        let is_printable = data
            .iter()
            .all(|&b| b == b'\n' || b == b'\r' || b == b'\t' || (0x20..=0x7E).contains(&b));

        if is_printable {
            w.write_all(b"(")?;
            for &byte in data {
                match byte {
                    b'(' => w.write_all(b"\\(")?,
                    b')' => w.write_all(b"\\)")?,
                    b'\\' => w.write_all(b"\\\\")?,
                    b'\n' => w.write_all(b"\\n")?,
                    b'\r' => w.write_all(b"\\r")?,
                    b'\t' => w.write_all(b"\\t")?,
                    _ => w.write_all(&[byte])?,
                }
            }
            w.write_all(b")")?;
        } else {
            w.write_all(b"<")?;
            for byte in data {
                write!(w, "{:02X}", byte)?;
            }
            w.write_all(b">")?;
        }
        Ok(())
    }

    /// Write a PDF array.
    pub fn write_array<W: Write + ?Sized>(&self, w: &mut W, arr: &Array) -> Result<()> {
        w.write_all(b"[")?;
        for (i, obj) in arr.iter().enumerate() {
            if i > 0 {
                w.write_all(b" ")?;
            }
            self.write_object(w, obj)?;
        }
        w.write_all(b"]")?;
        Ok(())
    }

    /// Write a PDF dictionary, replaying insertion order.
    pub fn write_dictionary<W: Write + ?Sized>(&self, w: &mut W, dict: &Dictionary) -> Result<()> {
        let compact = dict.len() <= COMPACT_DICTIONARY_LIMIT;
        w.write_all(b"<<")?;
        for (key, value) in dict {
            if compact {
                w.write_all(b" ")?;
            } else {
                w.write_all(b"\n  ")?;
            }
            key.write_to(w)?;
            w.write_all(b" ")?;
            self.write_object(w, value)?;
        }
        if compact {
            w.write_all(b" >>")?;
        } else {
            w.write_all(b"\n>>")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::Name;

    fn s() -> ObjectSerializer {
        ObjectSerializer::new()
    }

    #[test]
    fn test_serialize_null() {
        assert_eq!(s().serialize_to_string(&Object::Null).unwrap(), "null");
    }

    #[test]
    fn test_serialize_boolean() {
        assert_eq!(s().serialize_to_string(&Object::Boolean(true)).unwrap(), "true");
        assert_eq!(s().serialize_to_string(&Object::Boolean(false)).unwrap(), "false");
    }

    #[test]
    fn test_serialize_integer() {
        assert_eq!(s().serialize_to_string(&Object::Integer(42)).unwrap(), "42");
        assert_eq!(s().serialize_to_string(&Object::Integer(-123)).unwrap(), "-123");
    }

    #[test]
    fn test_serialize_real() {
        assert_eq!(s().serialize_to_string(&Object::Real(1.0)).unwrap(), "1.000000");
        let two = ObjectSerializer::with_precision(2);
        assert_eq!(two.serialize_to_string(&Object::Real(-0.5)).unwrap(), "-0.50");
    }

    #[test]
    fn test_precision_is_capped() {
        assert_eq!(ObjectSerializer::with_precision(0).precision(), 1);
        assert_eq!(ObjectSerializer::with_precision(99).precision(), 16);
    }

    #[test]
    fn test_serialize_string() {
        assert_eq!(s().serialize_to_string(&Object::string("Hello")).unwrap(), "(Hello)");
        assert_eq!(
            s().serialize_to_string(&Object::string("Test (parens)")).unwrap(),
            "(Test \\(parens\\))"
        );
    }

    #[test]
    fn test_serialize_hex_string() {
        assert_eq!(
            s().serialize_to_string(&Object::String(vec![0x00, 0xFF, 0x80])).unwrap(),
            "<00FF80>"
        );
    }

    #[test]
    fn test_serialize_name_with_special_chars() {
        assert_eq!(
            s().serialize_to_string(&Object::Name(Name::new("Name With Space"))).unwrap(),
            "/Name#20With#20Space"
        );
    }

    #[test]
    fn test_serialize_array() {
        let arr = Object::from(vec![Object::Integer(1), Object::Integer(2), Object::Integer(3)]);
        assert_eq!(s().serialize_to_string(&arr).unwrap(), "[1 2 3]");
    }

    #[test]
    fn test_dictionary_compact_layout() {
        let mut dict = Dictionary::new();
        dict.put("Type", Object::name("Page"));
        dict.put("Count", 1);
        assert_eq!(
            s().serialize_to_string(&dict.into()).unwrap(),
            "<< /Type /Page /Count 1 >>"
        );
    }

    #[test]
    fn test_dictionary_expanded_layout() {
        let mut dict = Dictionary::new();
        dict.put("Type", Object::name("Pages"));
        dict.put("Count", 0);
        dict.put("Kids", Array::new());
        assert_eq!(
            s().serialize_to_string(&dict.into()).unwrap(),
            "<<\n  /Type /Pages\n  /Count 0\n  /Kids []\n>>"
        );
    }

    #[test]
    fn test_empty_dictionary() {
        assert_eq!(s().serialize_to_string(&Dictionary::new().into()).unwrap(), "<< >>");
    }

    #[test]
    fn test_serialize_reference() {
        let r = Object::Reference(ObjectRef::new(10, 0));
        assert_eq!(s().serialize_to_string(&r).unwrap(), "10 0 R");
    }

    #[test]
    fn test_serialize_indirect() {
        let bytes = s().serialize_indirect(ObjectRef::new(1, 0), &Object::Integer(42)).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "1 0 obj\n42\nendobj\n");
    }

    #[test]
    fn test_non_finite_real_fails() {
        assert!(s().serialize(&Object::Real(f64::NAN)).is_err());
    }
}
