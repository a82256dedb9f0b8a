//! Parsed-image filesystem interface
//!
//! When the medium is a raw image or device node rather than a mounted
//! directory, paths resolve inside a foreign filesystem parsed from
//! fixed-size blocks. The parser itself lives outside this crate; these
//! traits are the boundary it is consumed through.

use std::io;
use std::path::Path;

use crate::error::Result;
use crate::fs::{DiscDir, DiscFile};

/// Logical block size of optical disc images
pub const BLOCK_SIZE: usize = 2048;

/// Fetches fixed-size blocks from a raw device or image
///
/// Supplied by the caller at session open and consumed only by the image
/// opener; never used once a backend has been selected.
pub trait BlockReader: Send + Sync {
    /// Read blocks starting at logical block address `lba` into `buf`,
    /// returning the number of blocks read
    fn read_blocks(&self, lba: u64, buf: &mut [u8]) -> io::Result<usize>;
}

/// A parsed raw-image filesystem
///
/// Paths are resolved inside the image, independent of any mounted-path
/// string. Dropping the value releases the parser.
pub trait ImageFilesystem: Send + Sync {
    /// Open a file inside the image by logical path
    fn open_file(&self, path: &str) -> Result<Box<dyn DiscFile>>;

    /// Open a directory listing inside the image by logical path
    fn open_dir(&self, path: &str) -> Result<Box<dyn DiscDir>>;

    /// Volume identifier exposed by the parsed filesystem
    fn volume_id(&self) -> Option<String>;
}

/// Entry point to an external image parser
pub trait ImageOpener {
    /// Attempt to parse `device_path` as a raw image
    ///
    /// `None` means the medium is not parsable; backend selection then
    /// falls through to a detached session.
    fn open(
        &self,
        device_path: &Path,
        reader: Option<Box<dyn BlockReader>>,
    ) -> Option<Box<dyn ImageFilesystem>>;
}
