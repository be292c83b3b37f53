//! Output sink bookkeeping: object numbering, byte offsets and the
//! cross-reference table.

use super::object_serializer::ObjectSerializer;
use crate::error::{Error, Result};
use crate::object::{Identity, ObjectRef, PdfObject};
use crate::resolve::ReferenceTable;
use std::io::{self, Write};

/// Generation number used for every object this crate writes.
pub const DEFAULT_GENERATION: u16 = 0;

/// Document-wide object number allocator.
///
/// Numbers are minted sequentially from 1 and never reused. The allocator
/// also remembers which objects were registered for the trailer phase, so
/// output can verify that each of them was actually written.
#[derive(Debug, Clone)]
pub struct ObjectNumberAllocator {
    next: u32,
    trailer: Vec<ObjectRef>,
}

impl Default for ObjectNumberAllocator {
    fn default() -> Self {
        Self {
            next: 1,
            trailer: Vec::new(),
        }
    }
}

impl ObjectNumberAllocator {
    /// Create an allocator starting at object number 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next free number to `identity`.
    ///
    /// Fails if the identity is already numbered; the counter is not advanced
    /// in that case.
    pub fn assign(&mut self, identity: &mut Identity) -> Result<ObjectRef> {
        if let Some(existing) = identity.get() {
            return Err(Error::illegal_state(format!(
                "Error registering a PDF object: it already has object number {}",
                existing.id
            )));
        }
        let reference = ObjectRef::new(self.next, DEFAULT_GENERATION);
        identity.assign(reference)?;
        self.next += 1;
        log::trace!("Assigned object number {}", reference.id);
        Ok(reference)
    }

    /// Assign a number to `obj`.
    pub fn assign_object(&mut self, obj: &mut dyn PdfObject) -> Result<ObjectRef> {
        self.assign(obj.identity_mut())
    }

    /// Record that `reference` must be written in the trailer phase.
    pub fn register_trailer(&mut self, reference: ObjectRef) {
        self.trailer.push(reference);
    }

    /// References registered for the trailer phase.
    pub fn trailer_refs(&self) -> &[ObjectRef] {
        &self.trailer
    }

    /// Number of object numbers handed out so far.
    pub fn count(&self) -> u32 {
        self.next - 1
    }
}

/// Shared state available while objects are written.
pub struct WriteContext<'a> {
    /// Serializer for inline values
    pub serializer: &'a ObjectSerializer,
    /// Extension ids for deferred resolution
    pub refs: &'a ReferenceTable,
}

/// Counting output sink.
///
/// Tracks the byte position and the offset at which each indirect object
/// starts, which is what the cross-reference table needs.
pub struct PdfOutput<'a> {
    inner: &'a mut dyn Write,
    position: u64,
    offsets: Vec<Option<u64>>,
}

impl<'a> PdfOutput<'a> {
    /// Wrap a sink.
    pub fn new(inner: &'a mut dyn Write) -> Self {
        Self {
            inner,
            position: 0,
            offsets: Vec::new(),
        }
    }

    /// Current byte position.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Offset recorded for `id`.
    pub fn offset_of(&self, id: u32) -> Option<u64> {
        let index = id.checked_sub(1)? as usize;
        self.offsets.get(index).copied().flatten()
    }

    /// Whether the object with number `id` has been written.
    pub fn is_written(&self, id: u32) -> bool {
        self.offset_of(id).is_some()
    }

    fn record_offset(&mut self, reference: ObjectRef) -> Result<()> {
        if reference.id == 0 {
            return Err(Error::illegal_state("Object number 0 is reserved"));
        }
        let index = (reference.id - 1) as usize;
        if self.offsets.len() <= index {
            self.offsets.resize(index + 1, None);
        }
        if self.offsets[index].is_some() {
            return Err(Error::illegal_state(format!(
                "Object {} has already been written",
                reference.id
            )));
        }
        self.offsets[index] = Some(self.position);
        Ok(())
    }

    /// Write `obj` framed as an indirect object, then its children.
    ///
    /// Deferred resolution runs before the body is written.
    pub fn write_object(&mut self, ctx: &WriteContext<'_>, obj: &mut dyn PdfObject) -> Result<()> {
        let reference = obj
            .identity()
            .get()
            .ok_or_else(|| Error::illegal_argument("Not an indirect object"))?;
        obj.resolve(ctx.refs)?;
        self.record_offset(reference)?;
        writeln!(self, "{} {} obj", reference.id, reference.gen)?;
        obj.write_body(ctx, self)?;
        self.write_all(b"\nendobj\n")?;
        obj.write_children(ctx, self)
    }

    /// Write the cross-reference table for objects `1..=max_id`.
    ///
    /// Every number up to `max_id` must have been written.
    pub fn write_xref(&mut self, max_id: u32) -> Result<u64> {
        let startxref = self.position;
        write!(self, "xref\n0 {}\n", max_id + 1)?;
        self.write_all(b"0000000000 65535 f \n")?;
        for id in 1..=max_id {
            let offset = self.offset_of(id).ok_or_else(|| {
                Error::illegal_state(format!(
                    "Object {} was assigned a number but never written",
                    id
                ))
            })?;
            write!(self, "{:010} {:05} n \n", offset, DEFAULT_GENERATION)?;
        }
        Ok(startxref)
    }
}

impl Write for PdfOutput<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.position += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
