//! Content-protection module interface
//!
//! Decryption is consumed as an opaque transform: an opened raw stream plus
//! its numeric identifier go in, a wrapping stream may come out. When the
//! module is absent or declines, callers transparently get the raw content.

use std::path::PathBuf;
use std::sync::Arc;

use crate::disc::DiscVfs;
use crate::fs::DiscFile;

/// Events forwarded to the protection module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscEvent {
    /// Playback start
    Start(u32),
    /// Title change
    Title(u32),
    /// Application change
    Application(u32),
}

/// Outcome of offering a raw stream to the protection module
pub enum StreamVerdict {
    /// The module consumed the raw handle and returned a decrypting wrapper
    Decrypted(Box<dyn DiscFile>),
    /// The module declined; the raw handle is handed back untouched
    Declined(Box<dyn DiscFile>),
}

impl StreamVerdict {
    /// The handle to give the caller, wrapped or not
    pub fn into_file(self) -> Box<dyn DiscFile> {
        match self {
            StreamVerdict::Decrypted(f) | StreamVerdict::Declined(f) => f,
        }
    }
}

/// Opaque content-protection module attached to one disc session
pub trait Decrypter: Send + Sync {
    /// Offer a raw stream for decryption
    ///
    /// Ownership of `raw` transfers in; it always comes back out through
    /// the verdict, so the caller's handle is never silently closed.
    fn open_stream(&self, raw: Box<dyn DiscFile>, stream_id: u32) -> StreamVerdict;

    /// Side-channel data blob by type
    fn data(&self, ty: u32) -> Option<Vec<u8>>;

    /// Fire-and-forget event notification
    fn on_event(&self, event: DiscEvent);
}

/// Everything a protection module may probe at init time
///
/// The VFS accessor lets the module read auxiliary files from the medium,
/// both raw (`open_rom_path`) and with overlay precedence (`open_path`).
/// Key material beyond the key-file path travels inside the caller's
/// factory, not through this struct.
pub struct DecDevice {
    /// Path resolution into the opened medium
    pub vfs: Arc<DiscVfs>,
    /// Mounted disc root, absent for parsed images and detached sessions
    pub root: Option<PathBuf>,
    /// Device path the session was opened with
    pub device_path: Option<PathBuf>,
    /// Caller-supplied key file
    pub key_file: Option<PathBuf>,
}

/// Builds a `Decrypter` for one opened disc
///
/// Returning `None` leaves the session unprotected; opens still succeed and
/// streams pass through undecrypted.
pub trait DecrypterFactory {
    fn init(&self, dev: &DecDevice) -> Option<Box<dyn Decrypter>>;
}

/// Parse the numeric identifier from a stream file name
///
/// Stream files are named by their decimal id ("00001.m2ts" -> 1). A name
/// without a digit prefix yields 0.
pub fn stream_id(file_name: &str) -> u32 {
    let digits: String = file_name.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}
