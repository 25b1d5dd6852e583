//! The file store: every imported or created entry, keyed by path.

use super::index::PathIndex;
use crate::config::Settings;
use crate::files::entry::{ancestors, extension_of, is_descendant, join_path, parent_path};
use crate::files::{EntryId, FileEntry, ImportRejection};
use crate::storage::{remove_key, try_read_json, write_json, KeyValueStore, FILES_KEY};
use log::{debug, info, warn};
use std::fmt;

/// Characters not allowed in entry names.
const INVALID_NAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

// ─────────────────────────────────────────────────────────────────────────────
// Store Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Why a store mutation was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// An entry with the same leaf name exists (import only)
    DuplicateName { name: String },
    /// An entry with the same path exists
    DuplicatePath { path: String },
    /// File content exceeds the size limit
    TooLarge { name: String, size: u64, limit: u64 },
    /// The name is empty or contains a forbidden character
    InvalidName { name: String, reason: &'static str },
    /// A path segment that must be a folder is a file
    NotAFolder { path: String },
    /// No entry with the given id
    NotFound,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::DuplicateName { name } => {
                write!(f, "A file named \"{}\" already exists", name)
            }
            StoreError::DuplicatePath { path } => write!(f, "\"{}\" already exists", path),
            StoreError::TooLarge { name, limit, .. } => write!(
                f,
                "\"{}\" is larger than {} MB",
                name,
                limit / (1024 * 1024)
            ),
            StoreError::InvalidName { name, reason } => {
                write!(f, "Invalid name \"{}\": {}", name, reason)
            }
            StoreError::NotAFolder { path } => write!(f, "\"{}\" is not a folder", path),
            StoreError::NotFound => write!(f, "Entry not found"),
        }
    }
}

impl From<StoreError> for ImportRejection {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateName { name } => ImportRejection::DuplicateName { name },
            StoreError::DuplicatePath { path } => ImportRejection::DuplicatePath { path },
            StoreError::TooLarge { name, size, limit } => {
                ImportRejection::TooLarge { name, size, limit }
            }
            StoreError::InvalidName { name, reason } => ImportRejection::Invalid {
                name,
                reason: reason.to_string(),
            },
            StoreError::NotAFolder { path } => ImportRejection::Invalid {
                name: path,
                reason: "parent is not a folder".to_string(),
            },
            StoreError::NotFound => ImportRejection::Invalid {
                name: String::new(),
                reason: "entry not found".to_string(),
            },
        }
    }
}

/// Check a leaf name typed by the user or carried by a dropped file.
pub fn validate_name(name: &str) -> Result<(), StoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StoreError::InvalidName {
            name: name.to_string(),
            reason: "name cannot be empty",
        });
    }
    if trimmed == "." || trimmed == ".." {
        return Err(StoreError::InvalidName {
            name: name.to_string(),
            reason: "name is reserved",
        });
    }
    if trimmed.contains(INVALID_NAME_CHARS) {
        return Err(StoreError::InvalidName {
            name: name.to_string(),
            reason: "name contains an invalid character",
        });
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// File Store
// ─────────────────────────────────────────────────────────────────────────────

/// Flat list of entries plus a parent index.
///
/// Paths are unique and every entry's parent folder exists. Mutations never
/// edit an entry in place; they replace it with a new value.
#[derive(Debug, Clone)]
pub struct FileStore {
    entries: Vec<FileEntry>,
    index: PathIndex,
    max_file_size: u64,
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(Settings::DEFAULT_MAX_FILE_SIZE)
    }
}

impl FileStore {
    /// Create an empty store with the given size limit.
    pub fn new(max_file_size: u64) -> Self {
        Self {
            entries: Vec::new(),
            index: PathIndex::default(),
            max_file_size,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lookups
    // ─────────────────────────────────────────────────────────────────────────

    /// All entries in insertion order.
    #[cfg(test)]
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of non-folder entries.
    pub fn file_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_folder()).count()
    }

    pub fn get(&self, id: &EntryId) -> Option<&FileEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub fn get_by_path(&self, path: &str) -> Option<&FileEntry> {
        self.index.position(path).map(|idx| &self.entries[idx])
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.index.position(path).is_some()
    }

    /// Whether any entry has the leaf name `name`.
    pub fn contains_name(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Direct children of the folder at `path`, in insertion order.
    pub fn children(&self, path: &str) -> Vec<&FileEntry> {
        self.index
            .children_of(path)
            .iter()
            .map(|&idx| &self.entries[idx])
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Add an entry, synthesizing any missing parent folders.
    ///
    /// Rejects path collisions and files over the size limit.
    pub fn add(&mut self, entry: FileEntry) -> Result<&FileEntry, StoreError> {
        if self.contains_path(&entry.path) {
            return Err(StoreError::DuplicatePath { path: entry.path });
        }
        if !entry.is_folder() {
            let size = entry.size_bytes() as u64;
            if size > self.max_file_size {
                return Err(StoreError::TooLarge {
                    name: entry.name,
                    size,
                    limit: self.max_file_size,
                });
            }
        }
        self.check_parents(&entry.path)?;

        let synthesized = self.synthesize_parents(&entry.path);
        debug!(
            "Added {} ({} parent folders created)",
            entry.path, synthesized
        );
        self.entries.push(entry);
        self.reindex();
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Add an imported file, additionally rejecting leaf-name collisions.
    pub fn add_imported(&mut self, entry: FileEntry) -> Result<&FileEntry, StoreError> {
        if self.contains_name(&entry.name) {
            return Err(StoreError::DuplicateName { name: entry.name });
        }
        self.add(entry)
    }

    /// Create an empty text file named `name` under `parent`.
    pub fn create_file(&mut self, parent: Option<&str>, name: &str) -> Result<&FileEntry, StoreError> {
        validate_name(name)?;
        let path = join_path(parent, name.trim());
        let mime = crate::files::import::guess_mime(name.trim());
        self.add(FileEntry::text(&path, String::new(), mime))
    }

    /// Create a folder named `name` under `parent`.
    pub fn create_folder(
        &mut self,
        parent: Option<&str>,
        name: &str,
    ) -> Result<&FileEntry, StoreError> {
        validate_name(name)?;
        let path = join_path(parent, name.trim());
        self.add(FileEntry::folder(&path))
    }

    /// Remove the entry with `id`; folders take their descendants with them.
    ///
    /// Returns every removed entry, the target first. Empty if `id` is unknown.
    pub fn remove(&mut self, id: &EntryId) -> Vec<FileEntry> {
        let Some(target) = self.get(id).cloned() else {
            return Vec::new();
        };

        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.entries.len());
        for entry in self.entries.drain(..) {
            if entry.id == target.id {
                removed.insert(0, entry);
            } else if target.is_folder() && is_descendant(&entry.path, &target.path) {
                removed.push(entry);
            } else {
                kept.push(entry);
            }
        }
        self.entries = kept;
        self.reindex();

        info!("Deleted {} ({} entries)", target.path, removed.len());
        removed
    }

    /// Replace the content of the file at `path`. Returns `false` if absent.
    pub fn update_content(&mut self, path: &str, content: String) -> bool {
        match self.index.position(path) {
            Some(idx) => {
                let updated = self.entries[idx].with_content(content);
                self.entries[idx] = updated;
                true
            }
            None => false,
        }
    }

    /// Rename the entry with `id` to `new_name`, rewriting descendant paths.
    ///
    /// Returns the old and new paths.
    pub fn rename(&mut self, id: &EntryId, new_name: &str) -> Result<(String, String), StoreError> {
        validate_name(new_name)?;
        let target = self.get(id).cloned().ok_or(StoreError::NotFound)?;
        let new_name = new_name.trim();
        let old_path = target.path.clone();
        let new_path = join_path(parent_path(&old_path), new_name);

        if new_path == old_path {
            return Ok((old_path, new_path));
        }
        if self.contains_path(&new_path) {
            return Err(StoreError::DuplicatePath { path: new_path });
        }
        let mime_type = if !target.is_folder() && extension_of(new_name) != target.extension() {
            crate::files::import::guess_mime(new_name).to_string()
        } else {
            target.mime_type.clone()
        };

        self.entries = self
            .entries
            .iter()
            .map(|entry| {
                if entry.id == target.id {
                    FileEntry {
                        name: new_name.to_string(),
                        path: new_path.clone(),
                        mime_type: mime_type.clone(),
                        ..entry.clone()
                    }
                } else if is_descendant(&entry.path, &old_path) {
                    FileEntry {
                        path: format!("{}{}", new_path, &entry.path[old_path.len()..]),
                        ..entry.clone()
                    }
                } else {
                    entry.clone()
                }
            })
            .collect();
        self.reindex();

        info!("Renamed {} to {}", old_path, new_path);
        Ok((old_path, new_path))
    }

    /// Replace the whole store, e.g. when restoring persisted entries.
    ///
    /// Later duplicates of a path are dropped, as are entries nested under a
    /// file. Missing parent folders are synthesized.
    pub fn replace_all(&mut self, entries: Vec<FileEntry>) {
        self.entries.clear();
        self.index = PathIndex::default();
        for entry in entries {
            if self.contains_path(&entry.path) {
                warn!("Skipping duplicate entry {}", entry.path);
                continue;
            }
            if let Err(e) = self.check_parents(&entry.path) {
                warn!("Skipping entry {}: {}", entry.path, e);
                continue;
            }
            self.synthesize_parents(&entry.path);
            self.entries.push(entry);
            self.reindex();
        }
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.reindex();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Persistence
    // ─────────────────────────────────────────────────────────────────────────

    /// Write the store under the `files` key; an empty store removes the key.
    pub fn persist(&self, storage: &mut dyn KeyValueStore) -> bool {
        if self.entries.is_empty() {
            remove_key(storage, FILES_KEY)
        } else {
            write_json(storage, FILES_KEY, &self.entries)
        }
    }

    /// Read persisted entries. `None` when absent, empty or malformed.
    pub fn read_persisted(storage: &dyn KeyValueStore) -> Option<Vec<FileEntry>> {
        try_read_json::<Vec<FileEntry>>(storage, FILES_KEY).filter(|entries| !entries.is_empty())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn reindex(&mut self) {
        self.index = PathIndex::build(&self.entries);
    }

    fn check_parents(&self, path: &str) -> Result<(), StoreError> {
        for ancestor in ancestors(path) {
            if let Some(existing) = self.get_by_path(ancestor) {
                if !existing.is_folder() {
                    return Err(StoreError::NotAFolder {
                        path: ancestor.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Insert folder entries for every missing ancestor of `path`.
    fn synthesize_parents(&mut self, path: &str) -> usize {
        let missing: Vec<String> = ancestors(path)
            .into_iter()
            .filter(|a| !self.contains_path(a))
            .map(str::to_string)
            .collect();
        for folder in &missing {
            self.entries.push(FileEntry::folder(folder));
        }
        if !missing.is_empty() {
            self.reindex();
        }
        missing.len()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn text(path: &str) -> FileEntry {
        FileEntry::text(path, "", "text/plain")
    }

    #[test]
    fn test_add_and_lookup() {
        let mut store = FileStore::default();
        store.add(text("a.ts")).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.contains_path("a.ts"));
        assert_eq!(store.get_by_path("a.ts").unwrap().name, "a.ts");
    }

    #[test]
    fn test_add_rejects_duplicate_path() {
        let mut store = FileStore::default();
        store.add(text("a.ts")).unwrap();
        assert_eq!(
            store.add(text("a.ts")).unwrap_err(),
            StoreError::DuplicatePath {
                path: "a.ts".to_string()
            }
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_imported_rejects_duplicate_name_anywhere() {
        let mut store = FileStore::default();
        store.add(text("src/a.ts")).unwrap();
        let err = store.add_imported(text("a.ts")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName { .. }));
    }

    #[test]
    fn test_add_rejects_oversized_file() {
        let mut store = FileStore::new(4);
        let err = store
            .add(FileEntry::text("big.txt", "12345", "text/plain"))
            .unwrap_err();
        assert!(matches!(err, StoreError::TooLarge { size: 5, limit: 4, .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_synthesizes_parent_folders() {
        let mut store = FileStore::default();
        store.add(text("src/lib/util.ts")).unwrap();

        assert_eq!(store.len(), 3);
        assert!(store.get_by_path("src").unwrap().is_folder());
        assert!(store.get_by_path("src/lib").unwrap().is_folder());
        assert_eq!(store.children("").len(), 1);
        assert_eq!(store.children("src/lib")[0].path, "src/lib/util.ts");
    }

    #[test]
    fn test_add_under_file_is_rejected() {
        let mut store = FileStore::default();
        store.add(text("a.ts")).unwrap();
        let err = store.add(text("a.ts/b.ts")).unwrap_err();
        assert!(matches!(err, StoreError::NotAFolder { .. }));
    }

    #[test]
    fn test_create_file_and_folder() {
        let mut store = FileStore::default();
        store.create_folder(None, "src").unwrap();
        let file = store.create_file(Some("src"), "main.ts").unwrap();
        assert_eq!(file.path, "src/main.ts");
        assert_eq!(file.mime_type, "text/typescript");
        assert!(store.create_file(Some("src"), "bad/name").is_err());
        assert!(store.create_folder(None, "  ").is_err());
    }

    #[test]
    fn test_remove_folder_cascades() {
        let mut store = FileStore::default();
        store.add(text("src/a.ts")).unwrap();
        store.add(text("src/lib/b.ts")).unwrap();
        store.add(text("srcfoo/c.ts")).unwrap();
        store.add(text("d.ts")).unwrap();

        let src_id = store.get_by_path("src").unwrap().id.clone();
        let removed = store.remove(&src_id);

        assert_eq!(removed[0].path, "src");
        let mut removed_paths: Vec<&str> = removed.iter().map(|e| e.path.as_str()).collect();
        removed_paths.sort();
        assert_eq!(removed_paths, vec!["src", "src/a.ts", "src/lib", "src/lib/b.ts"]);
        assert!(store.contains_path("srcfoo/c.ts"));
        assert!(store.contains_path("d.ts"));
        assert!(store.entries().iter().all(|e| !e.path.starts_with("src/")));
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut store = FileStore::default();
        store.add(text("a.ts")).unwrap();
        assert!(store.remove(&EntryId::from("nope")).is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_content_replaces_entry() {
        let mut store = FileStore::default();
        let id = store.add(text("a.ts")).unwrap().id.clone();
        assert!(store.update_content("a.ts", "z".to_string()));
        let entry = store.get_by_path("a.ts").unwrap();
        assert_eq!(entry.content, "z");
        assert_eq!(entry.id, id);
        assert!(!store.update_content("missing.ts", "z".to_string()));
    }

    #[test]
    fn test_rename_rewrites_descendants() {
        let mut store = FileStore::default();
        store.add(text("src/lib/b.ts")).unwrap();
        store.add(text("src/a.ts")).unwrap();
        let src_id = store.get_by_path("src").unwrap().id.clone();

        let (old, new) = store.rename(&src_id, "app").unwrap();
        assert_eq!((old.as_str(), new.as_str()), ("src", "app"));
        assert!(store.contains_path("app/lib/b.ts"));
        assert!(store.contains_path("app/a.ts"));
        assert!(!store.contains_path("src"));
        assert_eq!(store.get_by_path("app").unwrap().name, "app");
        assert_eq!(store.children("app").len(), 2);
    }

    #[test]
    fn test_rename_rejects_collision() {
        let mut store = FileStore::default();
        let a = store.add(text("a.ts")).unwrap().id.clone();
        store.add(text("b.ts")).unwrap();
        assert!(matches!(
            store.rename(&a, "b.ts"),
            Err(StoreError::DuplicatePath { .. })
        ));
        assert_eq!(store.rename(&EntryId::from("x"), "c.ts"), Err(StoreError::NotFound));
    }

    #[test]
    fn test_replace_all_repairs_input() {
        let mut store = FileStore::default();
        store.replace_all(vec![text("a/b.ts"), text("a/b.ts"), text("c.ts")]);
        assert_eq!(store.len(), 3);
        assert!(store.get_by_path("a").unwrap().is_folder());
    }

    #[test]
    fn test_replace_all_drops_entries_under_a_file() {
        let mut store = FileStore::default();
        store.replace_all(vec![text("a"), text("a/b.ts"), text("c.ts")]);
        assert_eq!(store.len(), 2);
        assert!(!store.get_by_path("a").unwrap().is_folder());
        assert!(!store.contains_path("a/b.ts"));
        assert!(store.children("a").is_empty());
    }

    #[test]
    fn test_rename_updates_mime_on_extension_change() {
        let mut store = FileStore::default();
        let id = store
            .add(FileEntry::text("a.ts", "", "text/typescript"))
            .unwrap()
            .id
            .clone();

        store.rename(&id, "a.png").unwrap();
        assert_eq!(store.get_by_path("a.png").unwrap().mime_type, "image/png");

        store.rename(&id, "b.png").unwrap();
        assert_eq!(store.get_by_path("b.png").unwrap().mime_type, "image/png");
    }

    #[test]
    fn test_persist_and_read_back() {
        let mut storage = MemoryStorage::new();
        let mut store = FileStore::default();
        store.add(FileEntry::text("a.ts", "let a;", "text/typescript")).unwrap();
        store
            .add(FileEntry::binary("img/x.png", &[1, 2, 3], "image/png"))
            .unwrap();

        assert!(store.persist(&mut storage));
        let restored = FileStore::read_persisted(&storage).unwrap();
        assert_eq!(restored, store.entries().to_vec());
    }

    #[test]
    fn test_persist_empty_store_removes_key() {
        let mut storage = MemoryStorage::new();
        let mut store = FileStore::default();
        let id = store.add(text("a.ts")).unwrap().id.clone();
        store.persist(&mut storage);
        assert!(storage.contains(FILES_KEY));

        store.remove(&id);
        store.persist(&mut storage);
        assert!(!storage.contains(FILES_KEY));
    }

    #[test]
    fn test_read_persisted_empty_or_malformed_is_none() {
        let mut storage = MemoryStorage::new();
        storage.set(FILES_KEY, "[]").unwrap();
        assert!(FileStore::read_persisted(&storage).is_none());
        storage.set(FILES_KEY, "{oops").unwrap();
        assert!(FileStore::read_persisted(&storage).is_none());
    }

    #[test]
    fn test_store_error_into_rejection() {
        let rejection: ImportRejection = StoreError::DuplicateName {
            name: "a.ts".to_string(),
        }
        .into();
        assert_eq!(
            rejection,
            ImportRejection::DuplicateName {
                name: "a.ts".to_string()
            }
        );
    }
}
