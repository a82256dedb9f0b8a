//! Directory-listing merge
//!
//! Combines an overlay listing and a medium listing into one deduplicated
//! view. Both sources are forward-only and may not be reopenable, so the
//! union is materialized eagerly at construction.

use crate::fs::{DirEntry, DiscDir};

/// Materialized union of two directory listings
pub struct MergedDir {
    entries: Vec<DirEntry>,
    pos: usize,
}

impl MergedDir {
    /// Merge `overlay` then `rom`; the first source to produce a name wins
    ///
    /// Entries keep each source's original enumeration order: all overlay
    /// entries first, then medium entries whose names were not already seen.
    /// Both source handles are consumed and dropped here.
    pub fn merge(overlay: Box<dyn DiscDir>, rom: Box<dyn DiscDir>) -> MergedDir {
        let mut entries: Vec<DirEntry> = Vec::new();

        for mut source in [overlay, rom] {
            while let Some(entry) = source.read_next() {
                // Listings are small; a linear scan per insert is fine.
                if !entries.iter().any(|e| e.name == entry.name) {
                    entries.push(entry);
                }
            }
        }

        MergedDir { entries, pos: 0 }
    }

    /// Number of merged entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the merged listing is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DiscDir for MergedDir {
    fn read_next(&mut self) -> Option<DirEntry> {
        let entry = self.entries.get(self.pos)?.clone();
        self.pos += 1;
        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedDir {
        names: Vec<&'static str>,
        pos: usize,
    }

    impl FixedDir {
        fn boxed(names: Vec<&'static str>) -> Box<dyn DiscDir> {
            Box::new(FixedDir { names, pos: 0 })
        }
    }

    impl DiscDir for FixedDir {
        fn read_next(&mut self) -> Option<DirEntry> {
            let name = self.names.get(self.pos)?;
            self.pos += 1;
            Some(DirEntry::new(*name))
        }
    }

    fn drain(mut dir: MergedDir) -> Vec<String> {
        let mut names = Vec::new();
        while let Some(entry) = dir.read_next() {
            names.push(entry.name);
        }
        names
    }

    #[test]
    fn test_overlay_entries_come_first() {
        let ovl = FixedDir::boxed(vec!["index.bdmv", "PLAYLIST"]);
        let rom = FixedDir::boxed(vec!["index.bdmv", "MovieObject.bdmv"]);

        let merged = MergedDir::merge(ovl, rom);
        assert_eq!(merged.len(), 3);
        assert_eq!(drain(merged), vec!["index.bdmv", "PLAYLIST", "MovieObject.bdmv"]);
    }

    #[test]
    fn test_dedup_counts() {
        // Two listings of N entries sharing M names merge to 2N - M.
        let ovl = FixedDir::boxed(vec!["a", "b", "c", "d"]);
        let rom = FixedDir::boxed(vec!["c", "d", "e", "f"]);

        let merged = MergedDir::merge(ovl, rom);
        assert_eq!(merged.len(), 2 * 4 - 2);
        assert_eq!(drain(merged), vec!["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn test_dedup_is_case_sensitive() {
        let ovl = FixedDir::boxed(vec!["BDMV"]);
        let rom = FixedDir::boxed(vec!["bdmv"]);

        let merged = MergedDir::merge(ovl, rom);
        assert_eq!(drain(merged), vec!["BDMV", "bdmv"]);
    }

    #[test]
    fn test_duplicates_within_one_source() {
        let ovl = FixedDir::boxed(vec!["x", "x", "y"]);
        let rom = FixedDir::boxed(vec![]);

        let merged = MergedDir::merge(ovl, rom);
        assert_eq!(drain(merged), vec!["x", "y"]);
    }

    #[test]
    fn test_both_sources_empty() {
        let merged = MergedDir::merge(FixedDir::boxed(vec![]), FixedDir::boxed(vec![]));
        assert!(merged.is_empty());
    }
}
