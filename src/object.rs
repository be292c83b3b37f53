//! PDF object types.
//!
//! Values ([`Object`]) are serialized inline inside their container. Anything
//! that must stand alone as an indirect object implements [`PdfObject`]: it
//! carries an [`Identity`] that is numbered once by the owning document and
//! is referenced elsewhere as `N G R`.

use crate::array::Array;
use crate::dictionary::Dictionary;
use crate::error::{Error, Result};
use crate::name::Name;
use crate::rectangle::Rectangle;
use crate::resolve::ReferenceTable;
use crate::writer::{PdfOutput, WriteContext};
use std::io::Write;

/// Reference to an indirect object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef {
    /// Object number
    pub id: u32,
    /// Generation number
    pub gen: u16,
}

impl ObjectRef {
    /// Create a new object reference.
    pub fn new(id: u32, gen: u16) -> Self {
        Self { id, gen }
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} R", self.id, self.gen)
    }
}

/// Indirect identity of an object.
///
/// An identity starts out unnumbered. Once a number is assigned it never
/// changes; a second assignment is an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    number: Option<ObjectRef>,
}

impl Identity {
    /// Create an unnumbered identity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an object number has been assigned.
    pub fn is_assigned(&self) -> bool {
        self.number.is_some()
    }

    /// The assigned reference, if any.
    pub fn get(&self) -> Option<ObjectRef> {
        self.number
    }

    /// The assigned reference, failing for unnumbered objects.
    pub fn reference(&self) -> Result<ObjectRef> {
        self.number.ok_or_else(|| {
            Error::illegal_state("Cannot reference an object without an object number")
        })
    }

    /// Assign the object number. Re-numbering is forbidden.
    pub fn assign(&mut self, reference: ObjectRef) -> Result<()> {
        if let Some(existing) = self.number {
            return Err(Error::illegal_state(format!(
                "Object already has object number {} (attempted {})",
                existing.id, reference.id
            )));
        }
        self.number = Some(reference);
        Ok(())
    }
}

/// An object that can be written as a standalone indirect object.
///
/// The document writes `N G obj\n`, then [`PdfObject::write_body`], then
/// `\nendobj\n`. Objects that own further indirect objects (tree kids, font
/// descriptors) emit them from [`PdfObject::write_children`].
pub trait PdfObject {
    /// Indirect identity of this object.
    fn identity(&self) -> &Identity;

    /// Mutable identity, used by the number allocator.
    fn identity_mut(&mut self) -> &mut Identity;

    /// Whether this object has been numbered.
    fn has_object_number(&self) -> bool {
        self.identity().is_assigned()
    }

    /// The `N G R` reference to this object.
    fn reference(&self) -> Result<ObjectRef> {
        self.identity().reference()
    }

    /// Deferred population hook, called right before the body is written.
    fn resolve(&mut self, _refs: &ReferenceTable) -> Result<()> {
        Ok(())
    }

    /// Write the object body (between `obj` and `endobj`).
    fn write_body(&mut self, ctx: &WriteContext<'_>, w: &mut dyn Write) -> Result<()>;

    /// Write indirect objects owned by this one.
    fn write_children(&mut self, _ctx: &WriteContext<'_>, _out: &mut PdfOutput<'_>) -> Result<()> {
        Ok(())
    }
}

/// PDF object representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// Null object
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Real (floating-point) value, written with fixed precision
    Real(f64),
    /// String (byte array)
    String(Vec<u8>),
    /// Name (starting with /)
    Name(Name),
    /// Array of objects
    Array(Array),
    /// Dictionary (ordered key-value pairs)
    Dictionary(Dictionary),
    /// Indirect object reference
    Reference(ObjectRef),
}

impl Object {
    /// Get the type name of this object (without data).
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Null => "Null",
            Object::Boolean(_) => "Boolean",
            Object::Integer(_) => "Integer",
            Object::Real(_) => "Real",
            Object::String(_) => "String",
            Object::Name(_) => "Name",
            Object::Array(_) => "Array",
            Object::Dictionary(_) => "Dictionary",
            Object::Reference(_) => "Reference",
        }
    }

    /// Create a Name object.
    pub fn name(s: &str) -> Object {
        Object::Name(Name::new(s))
    }

    /// Create a byte string object.
    pub fn string(bytes: impl Into<Vec<u8>>) -> Object {
        Object::String(bytes.into())
    }

    /// Create a text string.
    ///
    /// Pure ASCII text is stored as is; anything else is encoded as UTF-16BE
    /// with a byte order mark.
    pub fn text(s: &str) -> Object {
        if s.is_ascii() {
            Object::String(s.as_bytes().to_vec())
        } else {
            Object::String(encode_utf16_be(s))
        }
    }

    /// Create a reference to a numbered object.
    pub fn reference_to(obj: &dyn PdfObject) -> Result<Object> {
        Ok(Object::Reference(obj.reference()?))
    }

    /// Try to cast to integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Object::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to cast to real number. Integers widen.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Object::Real(r) => Some(*r),
            Object::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to cast to name.
    pub fn as_name(&self) -> Option<&Name> {
        match self {
            Object::Name(n) => Some(n),
            _ => None,
        }
    }

    /// Try to cast to dictionary.
    pub fn as_dict(&self) -> Option<&Dictionary> {
        match self {
            Object::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// Try to cast to mutable dictionary.
    pub fn as_dict_mut(&mut self) -> Option<&mut Dictionary> {
        match self {
            Object::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// Try to cast to array.
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Object::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Try to cast to mutable array.
    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match self {
            Object::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Try to cast to reference.
    pub fn as_reference(&self) -> Option<ObjectRef> {
        match self {
            Object::Reference(r) => Some(*r),
            _ => None,
        }
    }

    /// Try to cast to boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Object::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to cast to string (bytes).
    pub fn as_string(&self) -> Option<&[u8]> {
        match self {
            Object::String(s) => Some(s),
            _ => None,
        }
    }

    /// Check if object is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Object::Null)
    }
}

/// Encode a string as UTF-16BE with BOM for PDF Unicode strings.
pub(crate) fn encode_utf16_be(s: &str) -> Vec<u8> {
    let mut result = vec![0xFE, 0xFF];
    for c in s.encode_utf16() {
        result.push((c >> 8) as u8);
        result.push((c & 0xFF) as u8);
    }
    result
}

impl From<bool> for Object {
    fn from(b: bool) -> Self {
        Object::Boolean(b)
    }
}

impl From<i32> for Object {
    fn from(i: i32) -> Self {
        Object::Integer(i as i64)
    }
}

impl From<i64> for Object {
    fn from(i: i64) -> Self {
        Object::Integer(i)
    }
}

impl From<u32> for Object {
    fn from(i: u32) -> Self {
        Object::Integer(i as i64)
    }
}

impl From<usize> for Object {
    fn from(i: usize) -> Self {
        Object::Integer(i as i64)
    }
}

impl From<f32> for Object {
    fn from(r: f32) -> Self {
        Object::Real(r as f64)
    }
}

impl From<f64> for Object {
    fn from(r: f64) -> Self {
        Object::Real(r)
    }
}

impl From<Name> for Object {
    fn from(n: Name) -> Self {
        Object::Name(n)
    }
}

impl From<Array> for Object {
    fn from(a: Array) -> Self {
        Object::Array(a)
    }
}

impl From<Vec<Object>> for Object {
    fn from(v: Vec<Object>) -> Self {
        Object::Array(Array::from(v))
    }
}

impl From<Dictionary> for Object {
    fn from(d: Dictionary) -> Self {
        Object::Dictionary(d)
    }
}

impl From<ObjectRef> for Object {
    fn from(r: ObjectRef) -> Self {
        Object::Reference(r)
    }
}

impl From<Rectangle> for Object {
    fn from(r: Rectangle) -> Self {
        Object::Array(r.to_array())
    }
}

/// A plain value promoted to an indirect object.
///
/// Used for arrays, dictionaries and numbers that several containers refer
/// to, or that must be written standalone (e.g. a shared `/Resources`).
#[derive(Debug, Clone)]
pub struct IndirectValue {
    identity: Identity,
    value: Object,
}

impl IndirectValue {
    /// Wrap a value; it gets its number when registered with a document.
    pub fn new(value: impl Into<Object>) -> Self {
        Self {
            identity: Identity::new(),
            value: value.into(),
        }
    }

    /// The wrapped value.
    pub fn value(&self) -> &Object {
        &self.value
    }

    /// Mutable access to the wrapped value.
    pub fn value_mut(&mut self) -> &mut Object {
        &mut self.value
    }
}

impl PdfObject for IndirectValue {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }

    fn write_body(&mut self, ctx: &WriteContext<'_>, w: &mut dyn Write) -> Result<()> {
        ctx.serializer.write_object(w, &self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_ref_display() {
        assert_eq!(ObjectRef::new(12, 0).to_string(), "12 0 R");
    }

    #[test]
    fn test_identity_assign_once() {
        let mut identity = Identity::new();
        assert!(!identity.is_assigned());
        assert!(matches!(identity.reference(), Err(Error::IllegalState(_))));

        identity.assign(ObjectRef::new(4, 0)).unwrap();
        assert_eq!(identity.reference().unwrap(), ObjectRef::new(4, 0));

        let again = identity.assign(ObjectRef::new(5, 0));
        assert!(matches!(again, Err(Error::IllegalState(_))));
        assert_eq!(identity.get(), Some(ObjectRef::new(4, 0)));
    }

    #[test]
    fn test_object_casts() {
        assert_eq!(Object::from(42).as_integer(), Some(42));
        assert_eq!(Object::from(2).as_real(), Some(2.0));
        assert_eq!(Object::name("Type").as_name(), Some(&Name::new("Type")));
        assert_eq!(Object::from(true).as_bool(), Some(true));
        assert!(Object::Null.is_null());
        assert_eq!(Object::Null.type_name(), "Null");
    }

    #[test]
    fn test_text_encoding() {
        assert_eq!(Object::text("abc").as_string(), Some(&b"abc"[..]));
        let unicode = Object::text("Grüße");
        let bytes = unicode.as_string().unwrap();
        assert_eq!(&bytes[0..2], &[0xFE, 0xFF]);
        assert_eq!(bytes.len(), 2 + 5 * 2);
    }

    #[test]
    fn test_reference_to_unnumbered_fails() {
        let value = IndirectValue::new(Object::from(1));
        assert!(Object::reference_to(&value).is_err());
    }
}
