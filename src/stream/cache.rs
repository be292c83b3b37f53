//! Byte caches holding stream payloads until they are written.
//!
//! The strategy is a plain configuration value ([`CacheStrategy`]) passed to
//! stream constructors; there is no global factory.

use bytes::BytesMut;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};

/// Buffered storage for stream bytes.
pub trait ByteCache: Write + fmt::Debug {
    /// Copy the cached bytes to `out`.
    fn output_contents(&mut self, out: &mut dyn Write) -> io::Result<()>;

    /// Number of cached bytes.
    fn size(&self) -> io::Result<u64>;

    /// Drop the cached bytes.
    fn clear(&mut self) -> io::Result<()>;
}

/// How stream payloads are buffered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheStrategy {
    /// Keep payloads on the heap
    #[default]
    Memory,
    /// Spill payloads to an anonymous temporary file
    TempFile,
}

impl CacheStrategy {
    /// Create a cache for one stream.
    pub fn create(self) -> io::Result<Box<dyn ByteCache>> {
        match self {
            CacheStrategy::Memory => Ok(Box::new(MemoryCache::new())),
            CacheStrategy::TempFile => Ok(Box::new(TempFileCache::new()?)),
        }
    }
}

/// In-memory cache.
#[derive(Debug, Default)]
pub struct MemoryCache {
    buf: BytesMut,
}

impl MemoryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Write for MemoryCache {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl ByteCache for MemoryCache {
    fn output_contents(&mut self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(&self.buf)
    }

    fn size(&self) -> io::Result<u64> {
        Ok(self.buf.len() as u64)
    }

    fn clear(&mut self) -> io::Result<()> {
        // Release the allocation, not just the length.
        self.buf = BytesMut::new();
        Ok(())
    }
}

/// Cache backed by an anonymous temporary file, removed when dropped.
#[derive(Debug)]
pub struct TempFileCache {
    file: File,
}

impl TempFileCache {
    /// Create a cache backed by a fresh temporary file.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            file: tempfile::tempfile()?,
        })
    }
}

impl Write for TempFileCache {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.file.write(data)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl ByteCache for TempFileCache {
    fn output_contents(&mut self, out: &mut dyn Write) -> io::Result<()> {
        self.file.flush()?;
        let end = self.file.stream_position()?;
        self.file.seek(SeekFrom::Start(0))?;
        let mut reader = (&mut self.file).take(end);
        io::copy(&mut reader, out)?;
        self.file.seek(SeekFrom::Start(end))?;
        Ok(())
    }

    fn size(&self) -> io::Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.file.set_len(0)?;
        self.file.seek(SeekFrom::Start(0))?;
        Ok(())
    }
}
