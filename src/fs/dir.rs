//! Directory handle abstraction
//!
//! A `DiscDir` is a forward-only listing: entries come out once, in source
//! order, and the handle cannot be rewound. Merged listings are materialized
//! up front for exactly that reason.

use std::fs::ReadDir;
use std::path::Path;

use crate::error::{Error, Result};

/// One directory entry; only the name is carried
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Entry name, without any path components
    pub name: String,
}

impl DirEntry {
    /// Create an entry from a name
    pub fn new(name: impl Into<String>) -> Self {
        DirEntry { name: name.into() }
    }
}

/// Polymorphic forward-only directory listing
pub trait DiscDir: Send {
    /// Next entry, or `None` once the listing is exhausted
    fn read_next(&mut self) -> Option<DirEntry>;
}

/// Plain-filesystem-backed directory handle
#[derive(Debug)]
pub struct LocalDir {
    inner: ReadDir,
}

impl LocalDir {
    /// Open a local directory for listing
    pub fn open(path: &Path) -> Result<Self> {
        let inner = std::fs::read_dir(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound(path.to_string_lossy().into_owned())
            } else {
                Error::Io(e)
            }
        })?;
        Ok(LocalDir { inner })
    }
}

impl DiscDir for LocalDir {
    fn read_next(&mut self) -> Option<DirEntry> {
        // Entries that fail to stat or carry non-UTF-8 names are skipped
        // rather than ending the listing.
        loop {
            match self.inner.next()? {
                Ok(entry) => {
                    if let Ok(name) = entry.file_name().into_string() {
                        return Some(DirEntry { name });
                    }
                }
                Err(_) => continue,
            }
        }
    }
}
