//! Disc access and merge engine
//!
//! Reconciles up to three physical sources of one logical file tree behind
//! a single handle abstraction:
//! - a mounted or extracted disc root (plain filesystem)
//! - a raw image or device parsed by an external image filesystem
//! - an optional overlay directory that shadows or augments the medium

mod backend;
mod cache;
mod merge;
mod overlay;
mod session;

pub use backend::Backend;
pub use merge::MergedDir;
pub use overlay::OverlayStore;
pub use session::{Disc, DiscOptions, DiscVfs, MAX_READ_FILE_SIZE, STREAM_DIR};
