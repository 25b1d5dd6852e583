//! Parent → children index over flat entry paths.

use crate::files::entry::parent_path;
use crate::files::FileEntry;
use std::collections::HashMap;

/// Maps each folder path to the positions of its direct children.
///
/// Root-level entries are kept under the empty key. Rebuilt from scratch
/// whenever the store changes; lookups never scan the whole entry list.
#[derive(Debug, Clone, Default)]
pub struct PathIndex {
    by_path: HashMap<String, usize>,
    children: HashMap<String, Vec<usize>>,
}

impl PathIndex {
    /// Build the index for `entries`.
    pub fn build(entries: &[FileEntry]) -> Self {
        let mut by_path = HashMap::with_capacity(entries.len());
        let mut children: HashMap<String, Vec<usize>> = HashMap::new();

        for (idx, entry) in entries.iter().enumerate() {
            by_path.insert(entry.path.clone(), idx);
            let parent = parent_path(&entry.path).unwrap_or("");
            children.entry(parent.to_string()).or_default().push(idx);
        }

        Self { by_path, children }
    }

    /// Position of the entry with `path`.
    pub fn position(&self, path: &str) -> Option<usize> {
        self.by_path.get(path).copied()
    }

    /// Positions of the direct children of the folder at `path`.
    pub fn children_of(&self, path: &str) -> &[usize] {
        self.children.get(path).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<FileEntry> {
        vec![
            FileEntry::folder("src"),
            FileEntry::text("src/a.ts", "", "text/plain"),
            FileEntry::folder("src/lib"),
            FileEntry::text("src/lib/b.ts", "", "text/plain"),
            FileEntry::text("readme.md", "", "text/markdown"),
        ]
    }

    #[test]
    fn test_index_roots_and_children() {
        let entries = sample();
        let index = PathIndex::build(&entries);

        assert_eq!(index.children_of(""), &[0, 4]);
        assert_eq!(index.children_of("src"), &[1, 2]);
        assert_eq!(index.children_of("src/lib"), &[3]);
        assert!(index.children_of("src/a.ts").is_empty());
    }

    #[test]
    fn test_index_position() {
        let entries = sample();
        let index = PathIndex::build(&entries);
        assert_eq!(index.position("src/lib/b.ts"), Some(3));
        assert_eq!(index.position("missing"), None);
    }

    #[test]
    fn test_index_children_exclude_grandchildren() {
        let entries = sample();
        let index = PathIndex::build(&entries);
        let names: Vec<&str> = index
            .children_of("src")
            .iter()
            .map(|&i| entries[i].path.as_str())
            .collect();
        assert!(!names.contains(&"src/lib/b.ts"));
    }
}
