//! discfs - unified filesystem access for optical-disc-structured media
//!
//! This library abstracts three possible physical sources of the same
//! logical file tree: a mounted or extracted disc root, a raw disc image
//! parsed by an external filesystem, and an optional local overlay
//! directory that transparently shadows the disc contents. Consumers
//! request a path and get a uniform handle regardless of which source
//! served it.

pub mod config;
pub mod dec;
pub mod disc;
pub mod error;
pub mod fs;
pub mod image;

pub use config::Config;
pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::dec::DiscEvent;
    pub use crate::disc::{Disc, DiscOptions};
    pub use crate::error::{Error, Result};
    pub use crate::fs::{DirEntry, DiscDir, DiscFile};
}
