//! Backend selection
//!
//! At session open the logical root is probed once: a listable directory
//! selects the plain-filesystem backend, otherwise the path is offered to
//! the external image parser. A medium that is neither still yields a
//! usable session for overlay-only workflows.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::fs::{DiscDir, DiscFile, LocalDir, LocalFile};
use crate::image::{BlockReader, ImageFilesystem, ImageOpener};

/// Medium access selected once at session open, immutable thereafter
pub enum Backend {
    /// Disc contents mounted or extracted under a local directory
    Mounted { root: PathBuf },
    /// Raw image or device parsed by an external image filesystem
    Image { image: Box<dyn ImageFilesystem> },
    /// No usable medium was detected
    Detached,
}

impl Backend {
    /// Probe `device_path` as a plain directory first, then as a raw image
    pub fn select(
        device_path: Option<&Path>,
        reader: Option<Box<dyn BlockReader>>,
        opener: Option<&dyn ImageOpener>,
    ) -> Backend {
        let Some(device) = device_path else {
            return Backend::Detached;
        };

        match fs::read_dir(device) {
            Ok(_) => {
                let root = device
                    .canonicalize()
                    .unwrap_or_else(|_| device.to_path_buf());
                debug!("using mounted disc root {}", root.display());
                return Backend::Mounted { root };
            }
            Err(e) => {
                debug!(
                    "{} does not seem to be a mounted directory: {}",
                    device.display(),
                    e
                );
            }
        }

        if let Some(opener) = opener {
            if let Some(image) = opener.open(device, reader) {
                debug!("parsed {} as raw disc image", device.display());
                return Backend::Image { image };
            }
        }

        // Not an error: overlay-only and pre-extracted workflows still work.
        info!("failed opening image {}", device.display());
        Backend::Detached
    }

    /// Open a file from the medium by logical path, bypassing any overlay
    pub fn open_file(&self, rel_path: &str) -> Result<Box<dyn DiscFile>> {
        match self {
            Backend::Mounted { root } => {
                Ok(Box::new(LocalFile::open(&root.join(rel_path))?))
            }
            Backend::Image { image } => image.open_file(rel_path),
            Backend::Detached => Err(Error::BackendUnavailable),
        }
    }

    /// Open a directory listing from the medium by logical path
    pub fn open_dir(&self, rel_path: &str) -> Result<Box<dyn DiscDir>> {
        match self {
            Backend::Mounted { root } => {
                Ok(Box::new(LocalDir::open(&root.join(rel_path))?))
            }
            Backend::Image { image } => image.open_dir(rel_path),
            Backend::Detached => Err(Error::BackendUnavailable),
        }
    }

    /// Disc root path, present only for the mounted variant
    pub fn root(&self) -> Option<&Path> {
        match self {
            Backend::Mounted { root } => Some(root),
            _ => None,
        }
    }

    /// Volume identifier, present only for parsed images
    pub fn volume_id(&self) -> Option<String> {
        match self {
            Backend::Image { image } => image.volume_id(),
            _ => None,
        }
    }

    /// Whether a medium was detected at all
    pub fn is_available(&self) -> bool {
        !matches!(self, Backend::Detached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_select_mounted_directory() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("index.bdmv"), b"x").unwrap();

        let backend = Backend::select(Some(dir.path()), None, None);
        assert!(backend.is_available());
        assert!(backend.root().is_some());
        assert!(backend.volume_id().is_none());
        assert!(backend.open_file("index.bdmv").is_ok());
    }

    #[test]
    fn test_select_without_device() {
        let backend = Backend::select(None, None, None);
        assert!(!backend.is_available());
        assert!(matches!(
            backend.open_file("anything"),
            Err(Error::BackendUnavailable)
        ));
        assert!(matches!(
            backend.open_dir("anything"),
            Err(Error::BackendUnavailable)
        ));
    }

    #[test]
    fn test_select_unparsable_file_is_detached() {
        let dir = tempdir().unwrap();
        let image = dir.path().join("disc.iso");
        fs::write(&image, b"not really an image").unwrap();

        // No opener supplied, so the image branch cannot succeed.
        let backend = Backend::select(Some(&image), None, None);
        assert!(!backend.is_available());
    }
}
