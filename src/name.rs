//! PDF name objects.
//!
//! PDF Spec: ISO 32000-1:2008, Section 7.3.5 - Name Objects
//!
//! A name is written with a leading `/`. Every byte outside the printable
//! range 33..=126, and the `/` delimiter itself, is written as `#XX` with two
//! uppercase hex digits.

use std::borrow::Borrow;
use std::fmt;
use std::io::Write;

/// A PDF name.
///
/// Stores the unescaped bytes; escaping happens on output. Since escaping is
/// injective, equality and hashing on the raw bytes agree with equality on
/// the escaped form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(Vec<u8>);

impl Name {
    /// Create a name from a string (without the leading `/`).
    pub fn new(name: impl Into<String>) -> Self {
        Name(name.into().into_bytes())
    }

    /// Create a name from arbitrary bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Name(bytes.into())
    }

    /// The raw, unescaped bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The escaped form including the leading `/`.
    pub fn escaped(&self) -> String {
        let mut out = String::with_capacity(self.0.len() + 1);
        out.push('/');
        for &byte in &self.0 {
            if needs_escape(byte) {
                out.push_str(&format!("#{:02X}", byte));
            } else {
                out.push(byte as char);
            }
        }
        out
    }

    /// Write the escaped form to `w`.
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_all(b"/")?;
        for &byte in &self.0 {
            if needs_escape(byte) {
                write!(w, "#{:02X}", byte)?;
            } else {
                w.write_all(&[byte])?;
            }
        }
        Ok(())
    }
}

fn needs_escape(byte: u8) -> bool {
    !(33..=126).contains(&byte) || byte == b'/'
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.escaped())
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Name::new(s)
    }
}

impl From<String> for Name {
    fn from(s: String) -> Self {
        Name(s.into_bytes())
    }
}

impl From<&Name> for Name {
    fn from(n: &Name) -> Self {
        n.clone()
    }
}

impl Borrow<[u8]> for Name {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}
