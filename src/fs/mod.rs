//! File and directory handle abstraction
//!
//! Every physical source behind the disc layer produces handles satisfying
//! these traits; callers never learn which source served them.

mod dir;
mod file;

pub use dir::{DirEntry, DiscDir, LocalDir};
pub use file::{DiscFile, LocalFile};
