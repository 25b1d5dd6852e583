//! One-time decision on whether to restore the persisted file set.

use crate::explorer::FileStore;
use crate::files::FileEntry;
use crate::storage::{remove_key, KeyValueStore, FILES_KEY};
use log::info;

/// Startup restore prompt state.
///
/// Moves `Unknown → Prompting → Resolved`, or straight to `Resolved` when
/// there is nothing to restore. Never leaves `Resolved` within a session.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ImportGate {
    /// Storage has not been checked yet
    #[default]
    Unknown,
    /// Waiting for the user; holds the entries that would be restored
    Prompting(Vec<FileEntry>),
    /// Decision made (or nothing to decide)
    Resolved,
}

impl ImportGate {
    /// Check storage for persisted files. Only acts in the `Unknown` state.
    pub fn check(&mut self, storage: &dyn KeyValueStore) {
        if *self != ImportGate::Unknown {
            return;
        }
        *self = match FileStore::read_persisted(storage) {
            Some(entries) => {
                info!("Found {} persisted entries, asking to restore", entries.len());
                ImportGate::Prompting(entries)
            }
            None => ImportGate::Resolved,
        };
    }

    pub fn is_prompting(&self) -> bool {
        matches!(self, ImportGate::Prompting(_))
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, ImportGate::Resolved)
    }

    /// Number of entries offered for restore.
    pub fn pending_count(&self) -> usize {
        match self {
            ImportGate::Prompting(entries) => entries.len(),
            _ => 0,
        }
    }

    /// "Yes": resolve and hand back the entries to restore.
    pub fn accept(&mut self) -> Vec<FileEntry> {
        match std::mem::replace(self, ImportGate::Resolved) {
            ImportGate::Prompting(entries) => {
                info!("Restoring {} persisted entries", entries.len());
                entries
            }
            _ => Vec::new(),
        }
    }

    /// "No": resolve and clear the persisted file set.
    pub fn decline(&mut self, storage: &mut dyn KeyValueStore) {
        if self.is_prompting() {
            info!("Discarding persisted entries");
            remove_key(storage, FILES_KEY);
        }
        *self = ImportGate::Resolved;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{write_json, MemoryStorage};

    fn storage_with(paths: &[&str]) -> MemoryStorage {
        let mut storage = MemoryStorage::new();
        let entries: Vec<FileEntry> = paths
            .iter()
            .map(|p| FileEntry::text(p, "", "text/plain"))
            .collect();
        write_json(&mut storage, FILES_KEY, &entries);
        storage
    }

    #[test]
    fn test_nothing_persisted_resolves_directly() {
        let storage = MemoryStorage::new();
        let mut gate = ImportGate::default();
        gate.check(&storage);
        assert!(gate.is_resolved());
    }

    #[test]
    fn test_empty_or_malformed_resolves_directly() {
        let mut storage = MemoryStorage::new();
        storage.set(FILES_KEY, "[]").unwrap();
        let mut gate = ImportGate::default();
        gate.check(&storage);
        assert!(gate.is_resolved());

        storage.set(FILES_KEY, "not json").unwrap();
        let mut gate = ImportGate::default();
        gate.check(&storage);
        assert!(gate.is_resolved());
    }

    #[test]
    fn test_persisted_files_prompt() {
        let storage = storage_with(&["c.ts"]);
        let mut gate = ImportGate::default();
        gate.check(&storage);
        assert!(gate.is_prompting());
        assert_eq!(gate.pending_count(), 1);
    }

    #[test]
    fn test_accept_returns_entries() {
        let storage = storage_with(&["c.ts"]);
        let mut gate = ImportGate::default();
        gate.check(&storage);

        let entries = gate.accept();
        assert_eq!(entries[0].path, "c.ts");
        assert!(gate.is_resolved());
        assert!(storage.contains(FILES_KEY));
    }

    #[test]
    fn test_decline_removes_key() {
        let mut storage = storage_with(&["c.ts"]);
        let mut gate = ImportGate::default();
        gate.check(&storage);

        gate.decline(&mut storage);
        assert!(gate.is_resolved());
        assert!(!storage.contains(FILES_KEY));
    }

    #[test]
    fn test_resolved_gate_stays_resolved() {
        let storage = storage_with(&["c.ts"]);
        let mut gate = ImportGate::Resolved;
        gate.check(&storage);
        assert!(gate.is_resolved());
        assert!(gate.accept().is_empty());
    }
}
