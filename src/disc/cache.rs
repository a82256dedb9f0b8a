//! Copy-from-medium file caching
//!
//! Streams a medium-sourced file into a newly created local file. Failure
//! never leaves a truncated artifact: the destination is removed before the
//! error propagates.

use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, error};

use crate::error::Result;
use crate::fs::DiscFile;

/// Copy chunk size, sixteen 2048-byte blocks
const CACHE_CHUNK_SIZE: usize = 16 * 2048;

/// Stream `src` into a local file at `dest`
///
/// Missing destination directory components are created. Concurrent readers
/// of `dest` may observe the file mid-write; its final existence, not its
/// transient content, signals completeness.
pub fn cache_file(mut src: Box<dyn DiscFile>, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut out = match fs::File::create(dest) {
        Ok(f) => f,
        Err(e) => {
            error!("error creating cache file {}: {}", dest.display(), e);
            return Err(e.into());
        }
    };

    let mut buf = vec![0u8; CACHE_CHUNK_SIZE];
    loop {
        let got = match src.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                error!("error reading source for cache file {}: {}", dest.display(), e);
                remove_partial(out, dest);
                return Err(e);
            }
        };
        if let Err(e) = out.write_all(&buf[..got]) {
            error!("error writing cache file {}: {}", dest.display(), e);
            remove_partial(out, dest);
            return Err(e.into());
        }
    }

    debug!("cached to {}", dest.display());
    Ok(())
}

fn remove_partial(out: fs::File, dest: &Path) {
    // The handle must be closed before the unlink takes effect everywhere.
    drop(out);
    let _ = fs::remove_file(dest);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::fs::LocalFile;
    use std::io::SeekFrom;
    use tempfile::tempdir;

    /// Source that yields some bytes, then fails
    #[derive(Debug)]
    struct FailingSource {
        remaining: usize,
    }

    impl DiscFile for FailingSource {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
            if self.remaining == 0 {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "medium read error",
                )));
            }
            let n = self.remaining.min(buf.len());
            buf[..n].fill(0xAB);
            self.remaining -= n;
            Ok(n)
        }

        fn seek(&mut self, _pos: SeekFrom) -> Result<u64> {
            Err(Error::Unsupported("seek"))
        }
    }

    #[test]
    fn test_cache_copies_content() {
        let dir = tempdir().unwrap();
        let src_path = dir.path().join("src.bin");
        let data: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
        fs::write(&src_path, &data).unwrap();

        let src = Box::new(LocalFile::open(&src_path).unwrap());
        let dest = dir.path().join("cache").join("deep").join("copy.bin");
        cache_file(src, &dest).unwrap();

        assert_eq!(fs::read(&dest).unwrap(), data);
    }

    #[test]
    fn test_failed_read_removes_destination() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("partial.bin");

        let src = Box::new(FailingSource {
            remaining: CACHE_CHUNK_SIZE + 17,
        });
        assert!(cache_file(src, &dest).is_err());
        assert!(!dest.exists());
    }

    #[test]
    fn test_empty_source_creates_empty_file() {
        let dir = tempdir().unwrap();
        let src_path = dir.path().join("empty.bin");
        fs::write(&src_path, b"").unwrap();

        let src = Box::new(LocalFile::open(&src_path).unwrap());
        let dest = dir.path().join("empty-copy.bin");
        cache_file(src, &dest).unwrap();

        assert_eq!(fs::read(&dest).unwrap().len(), 0);
    }
}
