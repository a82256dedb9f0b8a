//! Overlay root storage
//!
//! The overlay root is the only mutable session state. Readers snapshot the
//! current value under the lock and do their file I/O outside it, so a slow
//! or blocking medium never serializes resolution. Concurrent replacement is
//! race-free with last-write-wins visibility: an in-flight resolution may use
//! either the old or the new root, consistently within that one call.

use parking_lot::RwLock;
use std::path::PathBuf;

/// Lock-guarded overlay root path
#[derive(Default)]
pub struct OverlayStore {
    root: RwLock<Option<PathBuf>>,
}

impl OverlayStore {
    /// Create an empty store; no overlay is set
    pub fn new() -> Self {
        OverlayStore {
            root: RwLock::new(None),
        }
    }

    /// Replace the overlay root; `None` clears it
    pub fn set(&self, root: Option<PathBuf>) {
        *self.root.write() = root;
    }

    /// Snapshot the current overlay root
    pub fn snapshot(&self) -> Option<PathBuf> {
        self.root.read().clone()
    }

    /// Whether an overlay is currently set
    pub fn is_set(&self) -> bool {
        self.root.read().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_set_and_snapshot() {
        let store = OverlayStore::new();
        assert!(store.snapshot().is_none());

        store.set(Some(PathBuf::from("/overlay")));
        assert_eq!(store.snapshot(), Some(PathBuf::from("/overlay")));

        store.set(None);
        assert!(!store.is_set());
    }

    #[test]
    fn test_concurrent_replacement() {
        let store = Arc::new(OverlayStore::new());

        let writer = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for i in 0..1000 {
                    store.set(Some(PathBuf::from(format!("/overlay-{}", i))));
                }
                store.set(None);
            })
        };

        // Snapshots observe either an old or a new value, never garbage.
        for _ in 0..1000 {
            if let Some(root) = store.snapshot() {
                assert!(root.to_string_lossy().starts_with("/overlay-"));
            }
        }

        writer.join().unwrap();
        assert!(store.snapshot().is_none());
    }
}
