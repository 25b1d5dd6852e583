//! Application state management for Codepad
//!
//! [`AppState`] owns every piece of view state (file store, open tabs, tree
//! selection, import gate, panel sizing) and exposes the user-level
//! operations that keep them consistent with each other and with persisted
//! storage. The UI layer only reads from it and calls these operations.

use crate::config::{save_config_silent, Settings, WindowSize};
use crate::debounce::Debouncer;
use crate::explorer::{FileStore, StoreError, TreeState};
use crate::files::export::export_entry;
use crate::files::{EntryId, FileEntry, FileReader, ImportRejection, ImportReport, ImportRules, ImportedFile};
use crate::import_gate::ImportGate;
use crate::panel::PanelResize;
use crate::storage::KeyValueStore;
use crate::tabs::{OpenOutcome, OpenTabs, RecentFiles, Tab};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// How long the "Saving…" indicator stays up after Ctrl+S, in seconds.
pub const SAVING_INDICATOR_SECS: f64 = 0.5;

/// Default toast duration in seconds.
pub const TOAST_SECS: f64 = 2.5;

// ─────────────────────────────────────────────────────────────────────────────
// UI State
// ─────────────────────────────────────────────────────────────────────────────

/// UI-related state flags.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Whether to show error modal
    pub show_error_modal: bool,
    /// Error message for modal
    pub error_message: String,
    /// Temporary toast message (shown in the status bar)
    pub toast_message: Option<String>,
    /// When the toast message should expire (as seconds since app start)
    pub toast_expires_at: Option<f64>,
    /// Until when the "Saving…" indicator is shown
    pub saving_until: Option<f64>,
    /// Entry awaiting delete confirmation
    pub pending_delete: Option<EntryId>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Application State
// ─────────────────────────────────────────────────────────────────────────────

/// Central application state struct.
pub struct AppState {
    /// User settings (loaded from config)
    pub settings: Settings,
    /// UI-related state
    pub ui: UiState,
    storage: Box<dyn KeyValueStore>,
    store: FileStore,
    tabs: OpenTabs,
    recent: RecentFiles,
    tree: TreeState,
    gate: ImportGate,
    panel: PanelResize,
    save_debouncer: Debouncer,
    reader: FileReader,
    /// Whether settings have been modified and need saving
    settings_dirty: bool,
    /// App clock, seconds; advanced by [`tick`](Self::tick)
    now: f64,
}

impl AppState {
    /// Create state over `storage`, checking it for files to restore.
    pub fn new(settings: Settings, storage: Box<dyn KeyValueStore>) -> Self {
        let mut gate = ImportGate::default();
        gate.check(storage.as_ref());
        let panel = PanelResize::load(storage.as_ref());

        info!(
            "State initialized (restore prompt: {})",
            if gate.is_prompting() { "yes" } else { "no" }
        );

        Self {
            store: FileStore::new(settings.max_file_size),
            tabs: OpenTabs::new(settings.max_open_tabs),
            recent: RecentFiles::new(settings.max_recent_files),
            tree: TreeState::new(),
            save_debouncer: Debouncer::new(settings.save_debounce()),
            reader: FileReader::new(settings.max_file_size),
            ui: UiState::default(),
            settings_dirty: false,
            now: 0.0,
            gate,
            panel,
            storage,
            settings,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn store(&self) -> &FileStore {
        &self.store
    }

    pub fn tabs(&self) -> &OpenTabs {
        &self.tabs
    }

    pub fn recent(&self) -> &RecentFiles {
        &self.recent
    }

    pub fn tree(&self) -> &TreeState {
        &self.tree
    }

    pub fn gate(&self) -> &ImportGate {
        &self.gate
    }

    pub fn panel(&self) -> &PanelResize {
        &self.panel
    }

    pub fn storage(&self) -> &dyn KeyValueStore {
        self.storage.as_ref()
    }

    /// The active tab, if any.
    pub fn active_tab(&self) -> Option<&Tab> {
        self.tabs.active()
    }

    /// Whether the "Saving…" indicator should be shown.
    pub fn is_saving(&self) -> bool {
        self.ui.saving_until.is_some()
    }

    /// Whether background reads are still outstanding.
    pub fn imports_in_flight(&self) -> bool {
        self.reader.in_flight() > 0
    }

    /// Time until the next timed state change, for repaint scheduling.
    pub fn next_wakeup(&self) -> Option<std::time::Duration> {
        let deadlines = [self.ui.toast_expires_at, self.ui.saving_until];
        let timed = deadlines
            .iter()
            .flatten()
            .map(|t| std::time::Duration::from_secs_f64((t - self.now).max(0.0)));
        timed
            .chain(self.save_debouncer.remaining(self.now))
            .min()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Frame Clock
    // ─────────────────────────────────────────────────────────────────────────

    /// Advance the clock: expire toasts and indicators, fire debounced writes.
    ///
    /// Call once per frame with the current app time in seconds.
    pub fn tick(&mut self, now: f64) {
        self.now = now;
        self.update_toast(now);
        if matches!(self.ui.saving_until, Some(until) if now >= until) {
            self.ui.saving_until = None;
        }
        if self.save_debouncer.poll(now) {
            debug!("Debounced save fired");
            self.persist_files();
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Import Gate
    // ─────────────────────────────────────────────────────────────────────────

    /// "Yes" on the restore prompt: load the persisted files.
    pub fn accept_restore(&mut self) {
        let entries = self.gate.accept();
        self.store.replace_all(entries);
    }

    /// "No" on the restore prompt: start empty and forget the persisted files.
    pub fn decline_restore(&mut self) {
        self.gate.decline(self.storage.as_mut());
        self.store.clear();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Import
    // ─────────────────────────────────────────────────────────────────────────

    /// Start a background read of a dropped or picked file.
    pub fn queue_path(&mut self, path: PathBuf, mime_type: String) {
        debug!("Queued import of {}", path.display());
        self.reader.read_path(path, mime_type);
    }

    /// Queue a dropped file whose bytes are already in memory.
    pub fn queue_bytes(&mut self, name: String, mime_type: String, bytes: Vec<u8>) {
        self.reader.push_bytes(name, mime_type, bytes);
    }

    /// Import every read that has completed since the last call.
    pub fn poll_imports(&mut self) -> Option<ImportReport> {
        let outcomes = self.reader.poll();
        if outcomes.is_empty() {
            return None;
        }

        let mut files = Vec::new();
        let mut failed = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(file) => files.push(file),
                Err(rejection) => failed.push(rejection),
            }
        }

        Some(self.import_batch(files, failed))
    }

    /// Import a batch of files into the store root.
    ///
    /// Valid files are added; every rejection is collected and shown together
    /// in one notice.
    pub fn import_files(&mut self, files: Vec<ImportedFile>) -> ImportReport {
        self.import_batch(files, Vec::new())
    }

    /// Import `files`, reporting them together with reads that already failed.
    fn import_batch(
        &mut self,
        files: Vec<ImportedFile>,
        failed: Vec<ImportRejection>,
    ) -> ImportReport {
        let rules = ImportRules::from_settings(&self.settings);
        let mut report = ImportReport {
            rejected: failed,
            ..ImportReport::default()
        };

        for file in files {
            if let Err(rejection) = file.validate(&rules) {
                report.rejected.push(rejection);
                continue;
            }
            let entry = file.into_entry(None);
            match self.store.add_imported(entry) {
                Ok(added) => report.accepted.push(added.path.clone()),
                Err(e) => report.rejected.push(ImportRejection::from(e)),
            }
        }

        if !report.accepted.is_empty() {
            info!("Imported {} files", report.accepted.len());
            self.persist_files();
        }
        self.notify_rejections(&report);
        report
    }

    fn notify_rejections(&mut self, report: &ImportReport) {
        if let Some(message) = report.error_message() {
            warn!("Import rejected {} files", report.rejected.len());
            self.show_error(message);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tabs
    // ─────────────────────────────────────────────────────────────────────────

    /// Open the store entry with `id` in a tab. Folders are ignored.
    pub fn open_entry(&mut self, id: &EntryId) -> Option<OpenOutcome> {
        let entry = self.store.get(id).filter(|e| !e.is_folder())?.clone();
        let outcome = self.tabs.open(&entry);
        if let OpenOutcome::Opened {
            evicted: Some(tab), ..
        } = &outcome
        {
            debug!("Evicted {} to stay within {} tabs", tab.path(), self.tabs.max_tabs());
        }
        self.recent.touch(&entry.name);
        self.tree.select_file(&entry.id);
        Some(outcome)
    }

    /// Open the store entry at `path`.
    #[cfg(test)]
    pub fn open_path(&mut self, path: &str) -> Option<OpenOutcome> {
        let id = self.store.get_by_path(path)?.id.clone();
        self.open_entry(&id)
    }

    pub fn activate_tab(&mut self, tab_id: &EntryId) -> bool {
        self.tabs.activate(tab_id)
    }

    pub fn close_tab(&mut self, tab_id: &EntryId) -> bool {
        self.tabs.close(tab_id).is_some()
    }

    pub fn close_active_tab(&mut self) -> bool {
        self.tabs.close_active().is_some()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Editing and Saving
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the active file's content in its tab and in the store.
    ///
    /// The storage write is debounced.
    pub fn edit_active(&mut self, content: String) -> bool {
        let Some(path) = self.tabs.active().map(|t| t.path().to_string()) else {
            return false;
        };
        self.tabs.sync_content(&path, &content);
        if !self.store.update_content(&path, content) {
            warn!("Edited tab {} has no store entry", path);
            return false;
        }
        self.save_debouncer.schedule(self.now);
        true
    }

    /// Ctrl+S: schedule the debounced write and flash the saving indicator.
    pub fn request_save(&mut self) {
        if self.tabs.active().is_none() {
            return;
        }
        self.save_debouncer.schedule(self.now);
        self.ui.saving_until = Some(self.now + SAVING_INDICATOR_SECS);
    }

    /// Write the file store now. Empty stores clear the key.
    pub fn persist_files(&mut self) -> bool {
        self.store.persist(self.storage.as_mut())
    }

    /// Flush pending writes and settings. Called on exit.
    pub fn shutdown(&mut self) {
        if self.save_debouncer.take() {
            info!("Flushing pending save");
            self.persist_files();
        }
        self.save_settings_if_dirty();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Explorer Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Click on a folder row: select it and toggle its expansion.
    pub fn click_folder(&mut self, id: &EntryId) {
        self.tree.select_folder(id);
        self.tree.toggle(id);
    }

    /// Click on a file row: select and open it.
    pub fn click_file(&mut self, id: &EntryId) {
        self.open_entry(id);
    }

    /// Click outside the tree rows.
    pub fn clear_selection(&mut self) {
        self.tree.clear_selection();
    }

    /// Select and expand a folder so new entries are created inside it.
    pub fn select_folder(&mut self, id: &EntryId) {
        if self.store.get(id).is_some_and(FileEntry::is_folder) {
            self.tree.select_folder(id);
            self.tree.expand(id);
        }
    }

    /// Folder that New File / New Folder will create into (root when `None`).
    pub fn target_folder(&self) -> Option<String> {
        self.tree.target_folder(&self.store)
    }

    /// Create an empty file under `parent` (root when `None`) and open it.
    ///
    /// `parent` is the folder the prompt showed, usually [`target_folder`](Self::target_folder)
    /// at the time it opened.
    pub fn create_file(&mut self, parent: Option<&str>, name: &str) -> Result<(), StoreError> {
        let entry = self.store.create_file(parent, name)?.clone();
        self.tree.reveal(&self.store, &entry.path);
        self.persist_files();
        self.open_entry(&entry.id);
        Ok(())
    }

    /// Create a folder under `parent` (root when `None`) and select it.
    pub fn create_folder(&mut self, parent: Option<&str>, name: &str) -> Result<(), StoreError> {
        let folder = self.store.create_folder(parent, name)?.clone();
        self.tree.reveal(&self.store, &folder.path);
        self.tree.select_folder(&folder.id);
        self.persist_files();
        Ok(())
    }

    /// Rename an entry, carrying open tabs along.
    pub fn rename_entry(&mut self, id: &EntryId, new_name: &str) -> Result<(), StoreError> {
        let (old_path, new_path) = self.store.rename(id, new_name)?;
        if old_path != new_path {
            self.tabs.rename_paths(&old_path, &new_path);
            self.persist_files();
        }
        Ok(())
    }

    /// Ask for confirmation before deleting `id`.
    pub fn request_delete(&mut self, id: &EntryId) {
        self.ui.pending_delete = Some(id.clone());
    }

    /// Confirm the pending delete.
    pub fn confirm_delete(&mut self) {
        if let Some(id) = self.ui.pending_delete.take() {
            self.delete_entry(&id);
        }
    }

    pub fn cancel_delete(&mut self) {
        self.ui.pending_delete = None;
    }

    /// Delete an entry and everything below it, closing their tabs.
    pub fn delete_entry(&mut self, id: &EntryId) -> Vec<FileEntry> {
        let removed = self.store.remove(id);
        if removed.is_empty() {
            return removed;
        }

        let closed = self
            .tabs
            .close_where(|tab| removed.iter().any(|e| e.path == tab.path()));
        debug!("Delete closed {} tabs", closed.len());
        self.tree.prune(&removed);
        self.persist_files();
        removed
    }

    /// Write the decoded content of `id` to `destination`.
    pub fn download_entry(&mut self, id: &EntryId, destination: &Path) {
        let Some(entry) = self.store.get(id) else {
            return;
        };
        match export_entry(entry, destination) {
            Ok(_) => {
                let message = format!("Downloaded {}", entry.name);
                self.show_toast(message, TOAST_SECS);
            }
            Err(e) => {
                warn!("Download failed: {}", e);
                self.show_error(format!("Download failed: {}", e));
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Panel
    // ─────────────────────────────────────────────────────────────────────────

    pub fn toggle_panel(&mut self) -> bool {
        self.panel.toggle(self.storage.as_mut())
    }

    pub fn begin_panel_drag(&mut self, pointer_x: f32) {
        self.panel.begin_drag(pointer_x);
    }

    pub fn drag_panel(&mut self, pointer_x: f32) {
        self.panel.drag_to(pointer_x);
    }

    pub fn end_panel_drag(&mut self) {
        self.panel.end_drag(self.storage.as_mut());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings Management
    // ─────────────────────────────────────────────────────────────────────────

    /// Grow the editor font.
    pub fn zoom_in(&mut self) {
        let size = self.settings.zoom_in();
        self.settings_dirty = true;
        self.show_toast(format!("Font size: {}px", size), 1.0);
    }

    /// Shrink the editor font.
    pub fn zoom_out(&mut self) {
        let size = self.settings.zoom_out();
        self.settings_dirty = true;
        self.show_toast(format!("Font size: {}px", size), 1.0);
    }

    /// Switch between dark and light themes.
    pub fn toggle_theme(&mut self) {
        self.settings.theme = self.settings.theme.toggle();
        self.settings_dirty = true;
    }

    /// Remember the window geometry for the next launch.
    pub fn set_window_size(&mut self, window_size: WindowSize) {
        if self.settings.window_size != window_size {
            self.settings.window_size = window_size;
            self.settings_dirty = true;
        }
    }

    /// Save settings if they have been modified.
    pub fn save_settings_if_dirty(&mut self) -> bool {
        if !self.settings_dirty {
            return false;
        }
        let saved = save_config_silent(&self.settings);
        if saved {
            self.settings_dirty = false;
        }
        saved
    }

    // ─────────────────────────────────────────────────────────────────────────
    // UI State Helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Show an error in a modal dialog.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.ui.error_message = message.into();
        self.ui.show_error_modal = true;
    }

    /// Dismiss the error modal.
    pub fn dismiss_error(&mut self) {
        self.ui.show_error_modal = false;
        self.ui.error_message.clear();
    }

    /// Show a temporary toast message for `duration` seconds.
    pub fn show_toast(&mut self, message: impl Into<String>, duration: f64) {
        self.ui.toast_message = Some(message.into());
        self.ui.toast_expires_at = Some(self.now + duration);
    }

    fn update_toast(&mut self, current_time: f64) {
        if let Some(expires_at) = self.ui.toast_expires_at {
            if current_time >= expires_at {
                self.ui.toast_message = None;
                self.ui.toast_expires_at = None;
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{write_json, MemoryStorage, FILES_KEY};
    use crate::ui::{FileOperationDialog, FileOperationResult};

    fn state() -> AppState {
        AppState::new(Settings::default(), Box::new(MemoryStorage::new()))
    }

    fn state_with_persisted(paths: &[&str]) -> AppState {
        let mut storage = MemoryStorage::new();
        let entries: Vec<FileEntry> = paths
            .iter()
            .map(|p| FileEntry::text(p, "", "text/typescript"))
            .collect();
        write_json(&mut storage, FILES_KEY, &entries);
        AppState::new(Settings::default(), Box::new(storage))
    }

    fn file(name: &str, content: &str) -> ImportedFile {
        ImportedFile::new(name, "", content.as_bytes().to_vec())
    }

    fn persisted_paths(state: &AppState) -> Option<Vec<String>> {
        FileStore::read_persisted(state.storage())
            .map(|entries| entries.into_iter().map(|e| e.path).collect())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Import Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_import_valid_and_invalid_grows_by_valid_count() {
        let mut state = state();
        state.settings.max_file_size = 8;
        state.import_files(vec![file("taken.ts", "")]);

        let report = state.import_files(vec![
            file("a.ts", "1"),
            file("big.ts", "0123456789"),
            file("b.ts", "2"),
            file("taken.ts", "3"),
        ]);

        assert_eq!(state.store().len(), 3);
        assert_eq!(report.accepted, vec!["a.ts", "b.ts"]);
        assert_eq!(report.rejected.len(), 2);
        assert!(state.ui.show_error_modal);
        assert_eq!(state.ui.error_message.lines().count(), 2);
        assert_eq!(persisted_paths(&state).unwrap().len(), 3);
    }

    #[test]
    fn test_import_respects_extension_restriction() {
        let mut state = state();
        state.settings.restrict_extensions = true;
        let report = state.import_files(vec![file("a.ts", ""), file("notes.txt", "")]);
        assert_eq!(report.accepted, vec!["a.ts"]);
        assert!(matches!(
            report.rejected[0],
            ImportRejection::DisallowedExtension { .. }
        ));
    }

    #[test]
    fn test_poll_imports_reads_queued_bytes() {
        let mut state = state();
        state.queue_bytes("a.ts".to_string(), String::new(), b"x".to_vec());
        assert!(state.imports_in_flight());

        let report = state.poll_imports().unwrap();
        assert_eq!(report.accepted, vec!["a.ts"]);
        assert!(!state.imports_in_flight());
        assert!(state.poll_imports().is_none());
    }

    #[test]
    fn test_failed_reads_share_one_notice_with_batch() {
        let mut state = state();
        state.import_files(vec![file("taken.ts", "")]);

        let failed = vec![ImportRejection::ReadFailed {
            name: "gone.ts".to_string(),
            message: "not found".to_string(),
        }];
        let report = state.import_batch(vec![file("a.ts", ""), file("taken.ts", "")], failed);

        assert_eq!(report.accepted, vec!["a.ts"]);
        assert_eq!(report.rejected.len(), 2);
        assert!(state.ui.show_error_modal);
        assert_eq!(state.ui.error_message.lines().count(), 2);
        assert!(state.ui.error_message.contains("gone.ts"));
        assert!(state.ui.error_message.contains("taken.ts"));
    }

    #[test]
    fn test_failed_reads_alone_are_reported() {
        let mut state = state();
        let failed = vec![ImportRejection::ReadFailed {
            name: "gone.ts".to_string(),
            message: "not found".to_string(),
        }];
        let report = state.import_batch(Vec::new(), failed);

        assert!(report.accepted.is_empty());
        assert!(state.ui.show_error_modal);
        assert!(state.store().is_empty());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tab Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_open_same_path_twice_yields_one_tab() {
        let mut state = state();
        state.import_files(vec![file("a.ts", "")]);
        state.open_path("a.ts");
        state.open_path("a.ts");
        assert_eq!(state.tabs().len(), 1);
        assert_eq!(state.recent().names(), &["a.ts"]);
    }

    #[test]
    fn test_open_folder_is_ignored() {
        let mut state = state();
        state.create_folder(None, "src").unwrap();
        assert!(state.open_path("src").is_none());
        assert!(state.tabs().is_empty());
    }

    #[test]
    fn test_tab_bound_evicts_oldest() {
        let settings = Settings {
            max_open_tabs: 2,
            ..Settings::default()
        };
        let mut state = AppState::new(settings, Box::new(MemoryStorage::new()));
        state.import_files(vec![file("a.ts", ""), file("b.ts", ""), file("c.ts", "")]);
        for path in ["a.ts", "b.ts", "c.ts"] {
            state.open_path(path);
        }
        let open: Vec<&str> = state.tabs().tabs().iter().map(|t| t.path()).collect();
        assert_eq!(open, vec!["b.ts", "c.ts"]);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scenario Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_scenario_import_open_edit_close() {
        let mut state = state();
        state.import_files(vec![file("a.ts", "a"), file("b.ts", "b")]);
        state.open_path("a.ts");
        assert!(state.edit_active("z".to_string()));

        assert_eq!(state.store().get_by_path("a.ts").unwrap().content, "z");
        assert_eq!(state.active_tab().unwrap().file.content, "z");

        assert!(state.close_active_tab());
        assert!(state.active_tab().is_none());
        assert_eq!(state.tabs().len(), 0);
    }

    #[test]
    fn test_scenario_restore_declined() {
        let mut state = state_with_persisted(&["c.ts"]);
        assert!(state.gate().is_prompting());

        state.decline_restore();
        assert!(state.gate().is_resolved());
        assert!(state.store().is_empty());
        assert!(!state.storage().contains(FILES_KEY));
    }

    #[test]
    fn test_scenario_restore_accepted() {
        let mut state = state_with_persisted(&["c.ts"]);
        state.accept_restore();
        assert!(state.gate().is_resolved());
        assert!(state.store().contains_path("c.ts"));
    }

    #[test]
    fn test_delete_folder_closes_tabs_and_clears_active() {
        let mut state = state();
        state.create_folder(None, "src").unwrap();
        state.create_file(Some("src"), "a.ts").unwrap();
        state.clear_selection();
        state.create_file(None, "root.ts").unwrap();
        state.open_path("src/a.ts");

        let src = state.store().get_by_path("src").unwrap().id.clone();
        let removed = state.delete_entry(&src);

        assert_eq!(removed.len(), 2);
        assert!(state.store().entries().iter().all(|e| !e.path.starts_with("src")));
        assert_eq!(state.tabs().len(), 1);
        assert!(state.active_tab().is_none());
        assert_eq!(persisted_paths(&state).unwrap(), vec!["root.ts"]);
    }

    #[test]
    fn test_delete_last_entry_clears_persisted_key() {
        let mut state = state();
        state.import_files(vec![file("a.ts", "")]);
        assert!(state.storage().contains(FILES_KEY));

        let id = state.store().get_by_path("a.ts").unwrap().id.clone();
        state.request_delete(&id);
        state.confirm_delete();

        assert!(state.store().is_empty());
        assert!(!state.storage().contains(FILES_KEY));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Explorer Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_create_file_in_selected_folder() {
        let mut state = state();
        state.create_folder(None, "src").unwrap();
        let target = state.target_folder();
        assert_eq!(target.as_deref(), Some("src"));
        state.create_file(target.as_deref(), "main.ts").unwrap();
        assert!(state.store().contains_path("src/main.ts"));
        assert_eq!(state.active_tab().unwrap().path(), "src/main.ts");

        // Selecting a file targets the root again
        assert_eq!(state.target_folder(), None);
        state.create_file(None, "other.ts").unwrap();
        assert!(state.store().contains_path("other.ts"));
    }

    #[test]
    fn test_create_uses_folder_captured_before_selection_moved() {
        let mut state = state();
        state.create_folder(None, "src").unwrap();
        state.create_file(None, "root.ts").unwrap();
        let src = state.store().get_by_path("src").unwrap().id.clone();
        let root = state.store().get_by_path("root.ts").unwrap().id.clone();

        state.select_folder(&src);
        let dialog = FileOperationDialog::new_file(state.target_folder());

        // Selection moves while the prompt is still open
        state.click_file(&root);
        assert_eq!(state.target_folder(), None);

        match dialog.submit("x.ts".to_string()) {
            FileOperationResult::CreateFile { parent, name } => {
                state.create_file(parent.as_deref(), &name).unwrap();
            }
            other => panic!("unexpected result {:?}", other),
        }
        assert!(state.store().contains_path("src/x.ts"));
        assert!(!state.store().contains_path("x.ts"));
    }

    #[test]
    fn test_rename_carries_open_tabs() {
        let mut state = state();
        state.create_folder(None, "src").unwrap();
        state.create_file(Some("src"), "a.ts").unwrap();
        let src = state.store().get_by_path("src").unwrap().id.clone();

        state.rename_entry(&src, "app").unwrap();
        assert_eq!(state.active_tab().unwrap().path(), "app/a.ts");
        assert_eq!(persisted_paths(&state).unwrap().len(), 2);

        // Content edits still reach the store after the rename
        state.edit_active("x".to_string());
        assert_eq!(state.store().get_by_path("app/a.ts").unwrap().content, "x");
    }

    #[test]
    fn test_click_folder_toggles_and_selects() {
        let mut state = state();
        state.create_folder(None, "src").unwrap();
        let src = state.store().get_by_path("src").unwrap().id.clone();
        state.clear_selection();

        state.click_folder(&src);
        assert!(state.tree().is_expanded(&src));
        assert!(state.tree().is_selected(&src));
        state.click_folder(&src);
        assert!(!state.tree().is_expanded(&src));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Persistence Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_edits_are_debounced() {
        let mut state = state();
        state.import_files(vec![file("a.ts", "a")]);
        state.open_path("a.ts");

        state.tick(10.0);
        state.edit_active("b".to_string());
        state.tick(10.5);
        let stored = FileStore::read_persisted(state.storage()).unwrap();
        assert_eq!(stored[0].content, "a");

        state.tick(11.0);
        let stored = FileStore::read_persisted(state.storage()).unwrap();
        assert_eq!(stored[0].content, "b");
    }

    #[test]
    fn test_save_shortcut_shows_indicator() {
        let mut state = state();
        state.import_files(vec![file("a.ts", "a")]);
        state.open_path("a.ts");

        state.tick(1.0);
        state.request_save();
        assert!(state.is_saving());
        state.tick(1.6);
        assert!(!state.is_saving());
    }

    #[test]
    fn test_shutdown_flushes_pending_save() {
        let mut state = state();
        state.import_files(vec![file("a.ts", "a")]);
        state.open_path("a.ts");
        state.edit_active("b".to_string());

        state.shutdown();
        let stored = FileStore::read_persisted(state.storage()).unwrap();
        assert_eq!(stored[0].content, "b");
    }

    #[test]
    fn test_panel_state_round_trips_through_storage() {
        let mut state = state();
        state.begin_panel_drag(800.0);
        state.drag_panel(700.0);
        state.end_panel_drag();
        state.toggle_panel();

        let panel = PanelResize::load(state.storage());
        assert_eq!(panel.width(), state.panel().width());
        assert!(!panel.is_visible());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // UI State Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_toast_expires() {
        let mut state = state();
        state.tick(1.0);
        state.show_toast("hello", 2.0);
        state.tick(2.5);
        assert!(state.ui.toast_message.is_some());
        state.tick(3.0);
        assert!(state.ui.toast_message.is_none());
    }

    #[test]
    fn test_error_modal() {
        let mut state = state();
        state.show_error("boom");
        assert!(state.ui.show_error_modal);
        state.dismiss_error();
        assert!(!state.ui.show_error_modal);
        assert!(state.ui.error_message.is_empty());
    }
}
