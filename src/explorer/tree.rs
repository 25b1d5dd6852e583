//! Explorer tree view state: expanded folders, selection and row layout.

use super::store::FileStore;
use crate::files::entry::ancestors;
use crate::files::{EntryId, FileEntry};
use std::collections::HashSet;

/// The selected tree node. Folder and file selection exclude each other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Folder(EntryId),
    File(EntryId),
}

/// A row of the flattened, expanded tree.
#[derive(Debug, Clone, Copy)]
pub struct TreeRow<'a> {
    pub entry: &'a FileEntry,
    /// Nesting level, 0 for root entries
    pub depth: usize,
    /// Whether the row is an expanded folder
    pub expanded: bool,
}

/// Expanded folders and the current selection.
#[derive(Debug, Clone, Default)]
pub struct TreeState {
    expanded: HashSet<EntryId>,
    selection: Selection,
}

impl TreeState {
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expansion
    // ─────────────────────────────────────────────────────────────────────────

    pub fn is_expanded(&self, id: &EntryId) -> bool {
        self.expanded.contains(id)
    }

    /// Flip a folder between expanded and collapsed.
    pub fn toggle(&mut self, id: &EntryId) {
        if !self.expanded.remove(id) {
            self.expanded.insert(id.clone());
        }
    }

    pub fn expand(&mut self, id: &EntryId) {
        self.expanded.insert(id.clone());
    }

    /// Expand every folder above `path` so the entry becomes visible.
    pub fn reveal(&mut self, store: &FileStore, path: &str) {
        for ancestor in ancestors(path) {
            if let Some(folder) = store.get_by_path(ancestor) {
                self.expanded.insert(folder.id.clone());
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────────

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn select_folder(&mut self, id: &EntryId) {
        self.selection = Selection::Folder(id.clone());
    }

    pub fn select_file(&mut self, id: &EntryId) {
        self.selection = Selection::File(id.clone());
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::None;
    }

    pub fn is_selected(&self, id: &EntryId) -> bool {
        match &self.selection {
            Selection::Folder(selected) | Selection::File(selected) => selected == id,
            Selection::None => false,
        }
    }

    /// Folder new entries should be created in: the selected folder, or the
    /// root when a file or nothing is selected.
    pub fn target_folder(&self, store: &FileStore) -> Option<String> {
        match &self.selection {
            Selection::Folder(id) => store
                .get(id)
                .filter(|e| e.is_folder())
                .map(|e| e.path.clone()),
            _ => None,
        }
    }

    /// Forget removed entries: collapse and deselect them.
    pub fn prune(&mut self, removed: &[FileEntry]) {
        for entry in removed {
            self.expanded.remove(&entry.id);
            if self.is_selected(&entry.id) {
                self.selection = Selection::None;
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Layout
    // ─────────────────────────────────────────────────────────────────────────

    /// Flatten the visible part of the tree: folders first, then by name.
    pub fn visible_rows<'a>(&self, store: &'a FileStore) -> Vec<TreeRow<'a>> {
        let mut rows = Vec::new();
        self.push_rows(store, "", 0, &mut rows);
        rows
    }

    fn push_rows<'a>(&self, store: &'a FileStore, path: &str, depth: usize, rows: &mut Vec<TreeRow<'a>>) {
        let mut children = store.children(path);
        children.sort_by(|a, b| {
            b.is_folder()
                .cmp(&a.is_folder())
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });

        for entry in children {
            let expanded = entry.is_folder() && self.is_expanded(&entry.id);
            rows.push(TreeRow {
                entry,
                depth,
                expanded,
            });
            if expanded {
                self.push_rows(store, &entry.path, depth + 1, rows);
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
