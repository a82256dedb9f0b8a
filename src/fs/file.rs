//! File handle abstraction
//!
//! A `DiscFile` represents one open readable stream, regardless of whether
//! the bytes come from a local file, a parsed disc image, or a decrypting
//! wrapper. Dropping the handle releases everything it wraps.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::error::{Error, Result};

/// Polymorphic handle to one open file
pub trait DiscFile: Send + std::fmt::Debug {
    /// Read up to `buf.len()` bytes, returning how many were read
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Write `buf`, returning how many bytes were written
    ///
    /// Most handle variants are read-only.
    fn write(&mut self, _buf: &[u8]) -> Result<usize> {
        Err(Error::Unsupported("write"))
    }

    /// Reposition the stream
    fn seek(&mut self, pos: SeekFrom) -> Result<u64>;

    /// Total size of the stream in bytes
    ///
    /// The default probes via seek and restores the current position.
    fn size(&mut self) -> Result<u64> {
        let cur = self.seek(SeekFrom::Current(0))?;
        let end = self.seek(SeekFrom::End(0))?;
        self.seek(SeekFrom::Start(cur))?;
        Ok(end)
    }
}

/// Plain-filesystem-backed file handle
#[derive(Debug)]
pub struct LocalFile {
    file: File,
}

impl LocalFile {
    /// Open an existing file for reading
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound(path.to_string_lossy().into_owned())
            } else {
                Error::Io(e)
            }
        })?;
        Ok(LocalFile { file })
    }

    /// Create a file for writing, truncating any existing content
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(LocalFile { file })
    }
}

impl DiscFile for LocalFile {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.file.read(buf).map_err(Error::Io)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.file.write(buf).map_err(Error::Io)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        self.file.seek(pos).map_err(Error::Io)
    }

    fn size(&mut self) -> Result<u64> {
        Ok(self.file.metadata()?.len())
    }
}
