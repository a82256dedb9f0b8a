//! Disc session
//!
//! One `Disc` per opened medium. The backend is selected once at open time;
//! the overlay root may be swapped at any point afterwards, concurrently
//! with resolution running on other threads.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error};

use crate::dec::{self, DecDevice, Decrypter, DecrypterFactory, DiscEvent, StreamVerdict};
use crate::error::{Error, Result};
use crate::fs::{DiscDir, DiscFile, LocalDir, LocalFile};
use crate::image::{BlockReader, ImageOpener};

use super::backend::Backend;
use super::cache;
use super::merge::MergedDir;
use super::overlay::OverlayStore;

/// Fixed logical subdirectory holding the media streams
pub const STREAM_DIR: &str = "BDMV/STREAM";

/// Largest file `read_file` will materialize in memory
pub const MAX_READ_FILE_SIZE: u64 = 256 * 1024 * 1024;

/// How to open a disc session
///
/// Everything is optional: with no device path the session starts detached,
/// with no image opener raw images cannot be parsed, with no decrypter
/// factory streams pass through unprotected.
#[derive(Default)]
pub struct DiscOptions {
    /// Mounted directory, extracted tree, image file or device node
    pub device_path: Option<PathBuf>,
    /// Block access used only by the image-parsing branch
    pub block_reader: Option<Box<dyn BlockReader>>,
    /// External image parser entry point
    pub image_opener: Option<Box<dyn ImageOpener>>,
    /// External content-protection module entry point
    pub decrypter_factory: Option<Box<dyn DecrypterFactory>>,
    /// Key file handed to the protection module
    pub key_file: Option<PathBuf>,
}

impl DiscOptions {
    /// Options for a plain open of `device_path`
    pub fn with_device(device_path: impl Into<PathBuf>) -> Self {
        DiscOptions {
            device_path: Some(device_path.into()),
            ..Default::default()
        }
    }
}

/// Path resolution across the selected backend and the overlay
///
/// Shared between the session and the protection module, which may read
/// auxiliary files through it during and after init.
pub struct DiscVfs {
    backend: Backend,
    overlay: OverlayStore,
}

impl DiscVfs {
    pub(crate) fn new(backend: Backend) -> Self {
        DiscVfs {
            backend,
            overlay: OverlayStore::new(),
        }
    }

    /// Disc root path, present only when the medium is a mounted directory
    pub fn root(&self) -> Option<&Path> {
        self.backend.root()
    }

    /// Whether a medium was detected at open time
    pub fn has_backend(&self) -> bool {
        self.backend.is_available()
    }

    /// Replace or clear the overlay root
    pub fn set_overlay(&self, root: Option<PathBuf>) {
        self.overlay.set(root);
    }

    /// Open a file from the medium only, bypassing the overlay
    pub fn open_rom_path(&self, rel_path: &str) -> Result<Box<dyn DiscFile>> {
        self.backend.open_file(rel_path)
    }

    /// Open a directory listing from the medium only
    pub fn open_rom_dir(&self, rel_path: &str) -> Result<Box<dyn DiscDir>> {
        self.backend.open_dir(rel_path)
    }

    /// Open a file by logical path, overlay first
    ///
    /// The overlay always wins when it holds the path, regardless of whether
    /// the medium also does. Files are never spliced across sources.
    pub fn open_path(&self, rel_path: &str) -> Result<Box<dyn DiscFile>> {
        // Snapshot under the lock, open outside it.
        if let Some(overlay_root) = self.overlay.snapshot() {
            if let Ok(fp) = LocalFile::open(&overlay_root.join(rel_path)) {
                return Ok(Box::new(fp));
            }
        }

        self.backend.open_file(rel_path).map_err(|e| {
            debug!("error opening file {}: {}", rel_path, e);
            e
        })
    }

    /// Open a directory listing by logical path, merging overlay and medium
    pub fn open_dir(&self, rel_path: &str) -> Result<Box<dyn DiscDir>> {
        let rom = self.backend.open_dir(rel_path).ok();
        let ovl = self.open_overlay_dir(rel_path);

        match (ovl, rom) {
            (None, None) => {
                debug!("error opening dir {}", rel_path);
                Err(Error::NotFound(rel_path.to_string()))
            }
            (Some(dp), None) => Ok(dp),
            (None, Some(dp)) => Ok(dp),
            (Some(ovl), Some(rom)) => Ok(Box::new(MergedDir::merge(ovl, rom))),
        }
    }

    fn open_overlay_dir(&self, rel_path: &str) -> Option<Box<dyn DiscDir>> {
        let overlay_root = self.overlay.snapshot()?;
        LocalDir::open(&overlay_root.join(rel_path))
            .ok()
            .map(|dp| Box::new(dp) as Box<dyn DiscDir>)
    }
}

/// One open disc medium
pub struct Disc {
    // Declared before `vfs` so the protection module is released first.
    dec: Option<Box<dyn Decrypter>>,
    vfs: Arc<DiscVfs>,
    volume_id: Option<String>,
}

impl Disc {
    /// Open a disc session
    ///
    /// Medium detection failure is not fatal; the session then serves only
    /// overlay content. Protection-module init failure is not fatal either;
    /// streams simply pass through undecrypted.
    pub fn open(options: DiscOptions) -> Result<Disc> {
        let DiscOptions {
            device_path,
            block_reader,
            image_opener,
            decrypter_factory,
            key_file,
        } = options;

        let backend = Backend::select(
            device_path.as_deref(),
            block_reader,
            image_opener.as_deref(),
        );
        let volume_id = backend.volume_id();
        let vfs = Arc::new(DiscVfs::new(backend));

        let dec = decrypter_factory.and_then(|factory| {
            let dev = DecDevice {
                vfs: Arc::clone(&vfs),
                root: vfs.root().map(Path::to_path_buf),
                device_path,
                key_file,
            };
            factory.init(&dev)
        });

        Ok(Disc {
            dec,
            vfs,
            volume_id,
        })
    }

    /// Explicitly end the session; dropping the value does the same
    pub fn close(self) {}

    /// Disc root path, present only when the medium is a mounted directory
    pub fn root(&self) -> Option<&Path> {
        self.vfs.root()
    }

    /// Volume identifier, present only when the medium is a parsed image
    pub fn volume_id(&self) -> Option<&str> {
        self.volume_id.as_deref()
    }

    /// Whether a medium was detected at open time
    pub fn has_backend(&self) -> bool {
        self.vfs.has_backend()
    }

    /// Replace or clear the overlay root
    ///
    /// Takes effect for subsequent resolutions; in-flight ones may still use
    /// the previous value.
    pub fn set_overlay(&self, root: Option<PathBuf>) {
        self.vfs.set_overlay(root);
    }

    /// Open a directory listing from the medium only, bypassing the overlay
    pub fn open_rom_dir(&self, rel_path: &str) -> Result<Box<dyn DiscDir>> {
        self.vfs.open_rom_dir(rel_path)
    }

    /// Open a file by logical path, overlay first
    pub fn open_path(&self, rel_path: &str) -> Result<Box<dyn DiscFile>> {
        self.vfs.open_path(rel_path)
    }

    /// Open `dir/file`, overlay first
    pub fn open_file(&self, dir: &str, file: &str) -> Result<Box<dyn DiscFile>> {
        self.vfs.open_path(&format!("{}/{}", dir, file))
    }

    /// Open a directory listing by logical path, merging overlay and medium
    pub fn open_dir(&self, rel_path: &str) -> Result<Box<dyn DiscDir>> {
        self.vfs.open_dir(rel_path)
    }

    /// Read the whole of `dir/file` into memory
    ///
    /// Fails closed: a zero-length or implausibly large declared size, or a
    /// short read, yields an error and no buffer.
    pub fn read_file(&self, dir: &str, file: &str) -> Result<Vec<u8>> {
        let path = format!("{}/{}", dir, file);
        let mut fp = self.vfs.open_path(&path)?;

        let size = fp.size()?;
        if size == 0 || size > MAX_READ_FILE_SIZE {
            return Err(Error::FileSize { path, size });
        }

        let mut data = vec![0u8; size as usize];
        let mut filled = 0;
        while filled < data.len() {
            let got = fp.read(&mut data[filled..])?;
            if got == 0 {
                error!("error reading file {} from {}", file, dir);
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    format!("short read of {}", path),
                )));
            }
            filled += got;
        }

        Ok(data)
    }

    /// Copy a medium file into the local filesystem
    ///
    /// The source is opened strictly from the backend, bypassing the overlay:
    /// caching materializes the original medium content. Failure removes any
    /// partially written destination.
    pub fn cache_rom_file(&self, rel_path: &str, dest: impl AsRef<Path>) -> Result<()> {
        let src = self.vfs.open_rom_path(rel_path).map_err(|e| {
            error!("error caching file {} (does not exist?)", rel_path);
            e
        })?;
        cache::cache_file(src, dest.as_ref())
    }

    /// Open a stream file, offering it to the protection module
    ///
    /// The stream is resolved under `BDMV/STREAM` with the usual overlay
    /// precedence. When the module is absent or declines, the raw handle is
    /// returned unchanged.
    pub fn open_stream(&self, file: &str) -> Result<Box<dyn DiscFile>> {
        let fp = self.open_file(STREAM_DIR, file)?;

        match &self.dec {
            Some(dec) => match dec.open_stream(fp, dec::stream_id(file)) {
                StreamVerdict::Decrypted(wrapped) => Ok(wrapped),
                StreamVerdict::Declined(raw) => Ok(raw),
            },
            None => Ok(fp),
        }
    }

    /// Side-channel data from the protection module, absent without one
    pub fn protection_data(&self, ty: u32) -> Option<Vec<u8>> {
        self.dec.as_ref().and_then(|dec| dec.data(ty))
    }

    /// Forward an event to the protection module; no-op without one
    pub fn event(&self, event: DiscEvent) {
        if let Some(dec) = &self.dec {
            dec.on_event(event);
        }
    }
}
