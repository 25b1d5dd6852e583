//! Open tabs and the recently-opened list
//!
//! Tabs are copies of store entries with their own id. The list is bounded:
//! opening a new file when it is full evicts the oldest tab (first opened),
//! regardless of how recently it was used.

use crate::config::Settings;
use crate::files::entry::is_descendant;
use crate::files::{EntryId, FileEntry};
use log::debug;

// ─────────────────────────────────────────────────────────────────────────────
// Tab
// ─────────────────────────────────────────────────────────────────────────────

/// An open, editable copy of a file entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Tab {
    /// Snapshot of the entry; `file.id` is the tab's own id
    pub file: FileEntry,
}

impl Tab {
    /// Open a tab on a fresh copy of `entry`.
    pub fn open(entry: &FileEntry) -> Self {
        Self {
            file: entry.fresh_copy(),
        }
    }

    pub fn id(&self) -> &EntryId {
        &self.file.id
    }

    pub fn path(&self) -> &str {
        &self.file.path
    }

    /// Title shown in the tab bar.
    pub fn title(&self) -> &str {
        &self.file.name
    }
}

/// What [`OpenTabs::open`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum OpenOutcome {
    /// A tab for the path already existed and was activated
    Activated(EntryId),
    /// A new tab was opened; the evicted oldest tab, if any, is returned
    Opened {
        id: EntryId,
        evicted: Option<Tab>,
    },
}

impl OpenOutcome {
    /// Id of the tab that is now active.
    pub fn id(&self) -> &EntryId {
        match self {
            OpenOutcome::Activated(id) | OpenOutcome::Opened { id, .. } => id,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Open Tabs
// ─────────────────────────────────────────────────────────────────────────────

/// Bounded, ordered list of open tabs with at most one active.
///
/// Order is open order, oldest first. The active tab, when set, is always one
/// of the open tabs.
#[derive(Debug, Clone)]
pub struct OpenTabs {
    tabs: Vec<Tab>,
    active: Option<EntryId>,
    max_tabs: usize,
}

impl Default for OpenTabs {
    fn default() -> Self {
        Self::new(Settings::default().max_open_tabs)
    }
}

impl OpenTabs {
    /// Create an empty list holding at most `max_tabs` tabs (at least one).
    pub fn new(max_tabs: usize) -> Self {
        Self {
            tabs: Vec::new(),
            active: None,
            max_tabs: max_tabs.max(1),
        }
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn max_tabs(&self) -> usize {
        self.max_tabs
    }

    pub fn get(&self, id: &EntryId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id() == id)
    }

    pub fn find_by_path(&self, path: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.path() == path)
    }

    pub fn active(&self) -> Option<&Tab> {
        self.active.as_ref().and_then(|id| self.get(id))
    }

    pub fn is_active(&self, id: &EntryId) -> bool {
        self.active.as_ref() == Some(id)
    }

    /// Open `entry`, or activate its existing tab.
    pub fn open(&mut self, entry: &FileEntry) -> OpenOutcome {
        if let Some(existing) = self.find_by_path(&entry.path) {
            let id = existing.id().clone();
            self.active = Some(id.clone());
            return OpenOutcome::Activated(id);
        }

        let evicted = if self.tabs.len() >= self.max_tabs {
            let oldest = self.tabs.remove(0);
            debug!("Tab limit reached, evicting {}", oldest.path());
            Some(oldest)
        } else {
            None
        };

        let tab = Tab::open(entry);
        let id = tab.id().clone();
        debug!("Opened tab {} for {}", id, entry.path);
        self.tabs.push(tab);
        self.active = Some(id.clone());
        OpenOutcome::Opened { id, evicted }
    }

    /// Activate the tab with `id`. Returns `false` if no such tab.
    pub fn activate(&mut self, id: &EntryId) -> bool {
        if self.get(id).is_some() {
            self.active = Some(id.clone());
            true
        } else {
            false
        }
    }

    /// Close the tab with `id`.
    ///
    /// Closing the active tab activates the most recently opened remaining
    /// tab, or nothing when none remain.
    pub fn close(&mut self, id: &EntryId) -> Option<Tab> {
        let index = self.tabs.iter().position(|t| t.id() == id)?;
        let tab = self.tabs.remove(index);
        if self.is_active(id) {
            self.active = self.tabs.last().map(|t| t.id().clone());
        }
        debug!("Closed tab {}", tab.path());
        Some(tab)
    }

    /// Close the active tab, if any.
    pub fn close_active(&mut self) -> Option<Tab> {
        let id = self.active.clone()?;
        self.close(&id)
    }

    /// Close every tab matching `pred`. Returns the closed tabs.
    ///
    /// Unlike [`close`](Self::close), losing the active tab this way leaves
    /// nothing active.
    pub fn close_where(&mut self, mut pred: impl FnMut(&Tab) -> bool) -> Vec<Tab> {
        let (closed, kept): (Vec<Tab>, Vec<Tab>) = self.tabs.drain(..).partition(|t| pred(t));
        self.tabs = kept;
        if let Some(active) = &self.active {
            if closed.iter().any(|t| t.id() == active) {
                self.active = None;
            }
        }
        closed
    }

    /// Replace the content of the tab showing `path`.
    pub fn sync_content(&mut self, path: &str, content: &str) -> bool {
        match self.tabs.iter_mut().find(|t| t.path() == path) {
            Some(tab) => {
                tab.file = tab.file.with_content(content.to_string());
                true
            }
            None => false,
        }
    }

    /// Rewrite tab paths after `old_path` was renamed to `new_path`.
    pub fn rename_paths(&mut self, old_path: &str, new_path: &str) {
        for tab in &mut self.tabs {
            let rewritten = if tab.path() == old_path {
                Some(new_path.to_string())
            } else if is_descendant(tab.path(), old_path) {
                Some(format!("{}{}", new_path, &tab.path()[old_path.len()..]))
            } else {
                None
            };
            if let Some(path) = rewritten {
                let name = crate::files::entry::leaf_name(&path).to_string();
                tab.file = FileEntry {
                    name,
                    path,
                    ..tab.file.clone()
                };
            }
        }
    }

    pub fn clear(&mut self) {
        self.tabs.clear();
        self.active = None;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Recent Files
// ─────────────────────────────────────────────────────────────────────────────

/// Distinct recently-opened file names, most recent first.
#[derive(Debug, Clone)]
pub struct RecentFiles {
    names: Vec<String>,
    capacity: usize,
}

impl Default for RecentFiles {
    fn default() -> Self {
        Self::new(Settings::default().max_recent_files)
    }
}

impl RecentFiles {
    pub fn new(capacity: usize) -> Self {
        Self {
            names: Vec::new(),
            capacity,
        }
    }

    /// Move `name` to the front, dropping the oldest past capacity.
    pub fn touch(&mut self, name: &str) {
        self.names.retain(|n| n != name);
        self.names.insert(0, name.to_string());
        self.names.truncate(self.capacity);
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
