//! Main application module for Codepad
//!
//! This module implements the eframe App trait: it feeds input into
//! [`AppState`], lays out the panels, and applies whatever the panels report
//! back. Panics during a frame are caught and replace the UI with a static
//! crash screen.

use crate::config::{load_config, Theme, WindowSize};
use crate::editor::EditorWidget;
use crate::files::clipboard::copy_text;
use crate::files::dialogs::{open_files_dialog, save_file_dialog};
use crate::files::import::guess_mime;
use crate::files::EntryId;
use crate::state::{AppState, TOAST_SECS};
use crate::storage::{DirStorage, KeyValueStore, MemoryStorage};
use crate::theme::{apply_theme, ThemeColors};
use crate::ui::{
    show_activity_bar, show_delete_confirm, show_details_panel, show_error_modal, show_explorer,
    show_restore_prompt, show_status_bar, show_tab_bar, ActivityAction, ExplorerAction,
    FileOperationDialog, FileOperationResult, PanelDrag, RestoreChoice, TabAction,
};
use eframe::egui::{self, Key, Modifiers, RichText};
use log::{debug, error, info, warn};
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

/// Application name shown in the title bar.
pub const APP_TITLE: &str = "Codepad";

/// Repaint interval while background reads are outstanding.
const IMPORT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Accumulated Ctrl+wheel factor that counts as one zoom step.
const WHEEL_ZOOM_STEP: f32 = 1.1;

/// Keyboard shortcut actions that need to be deferred.
///
/// These actions are detected in the input handling closure and executed
/// afterwards to avoid borrow conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyboardAction {
    /// Schedule a save of the active file (Ctrl+S)
    Save,
    /// Close current tab (Ctrl+W)
    CloseTab,
    /// Toggle the details panel (Ctrl+Alt+B)
    ToggleDetails,
    /// Grow the editor font (Ctrl+= / Ctrl++)
    ZoomIn,
    /// Shrink the editor font (Ctrl+-)
    ZoomOut,
}

/// The main application struct that holds all state and implements eframe::App.
pub struct CodepadApp {
    /// Central application state
    state: AppState,
    /// Active name prompt (New File, New Folder, Rename)
    file_operation_dialog: Option<FileOperationDialog>,
    /// Theme currently applied to the egui context
    applied_theme: Theme,
    /// Ctrl+wheel zoom factor not yet turned into a font step
    wheel_zoom: f32,
    /// Last known window geometry (for detecting changes)
    last_window_rect: Option<egui::Rect>,
    /// Set once a frame panicked; the UI stays on the crash screen
    crashed: bool,
    /// Application start time for the state clock
    start_time: Instant,
}

impl CodepadApp {
    /// Create a new CodepadApp instance.
    ///
    /// Loads settings, opens persistent storage (falling back to an in-memory
    /// store when the data directory is unavailable) and applies the theme.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        info!("Initializing {}", APP_TITLE);

        let settings = load_config();
        let storage: Box<dyn KeyValueStore> = match DirStorage::open_default() {
            Ok(storage) => {
                info!("Using storage at {}", storage.root().display());
                Box::new(storage)
            }
            Err(e) => {
                warn!("Persistent storage unavailable, using memory: {}", e);
                Box::new(MemoryStorage::new())
            }
        };

        let applied_theme = settings.theme;
        apply_theme(&cc.egui_ctx, applied_theme);
        // Ctrl+= / Ctrl+- resize the editor font, not the whole UI
        cc.egui_ctx.options_mut(|o| o.zoom_with_keyboard = false);

        Self {
            state: AppState::new(settings, storage),
            file_operation_dialog: None,
            applied_theme,
            wheel_zoom: 1.0,
            last_window_rect: None,
            crashed: false,
            start_time: Instant::now(),
        }
    }

    /// Get elapsed time since app start in seconds.
    fn get_app_time(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Get the window title based on current state.
    ///
    /// Returns "Filename - Codepad", or "Codepad" if no file is open.
    fn window_title(&self) -> String {
        match self.state.active_tab() {
            Some(tab) => format!("{} - {}", tab.title(), APP_TITLE),
            None => APP_TITLE.to_string(),
        }
    }

    /// Record window size and position changes in settings.
    fn update_window_state(&mut self, ctx: &egui::Context) {
        let (rect, maximized) = ctx.input(|i| {
            (
                i.viewport().outer_rect,
                i.viewport().maximized.unwrap_or(false),
            )
        });
        let Some(rect) = rect else {
            return;
        };

        let changed = self.last_window_rect.map_or(true, |last| {
            (last.min - rect.min).length() > 1.0 || (last.size() - rect.size()).length() > 1.0
        });
        if !changed {
            return;
        }
        self.last_window_rect = Some(rect);
        self.state.set_window_size(WindowSize {
            width: rect.width(),
            height: rect.height(),
            x: Some(rect.min.x),
            y: Some(rect.min.y),
            maximized,
        });
    }

    /// Re-apply visuals when the theme setting changed.
    fn apply_theme_if_needed(&mut self, ctx: &egui::Context) {
        if self.state.settings.theme != self.applied_theme {
            self.applied_theme = self.state.settings.theme;
            apply_theme(ctx, self.applied_theme);
            debug!("Applied theme: {:?}", self.applied_theme);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Input
    // ─────────────────────────────────────────────────────────────────────────

    /// Queue dropped files for background import.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            return;
        }
        info!("{} files dropped", dropped.len());

        for file in dropped {
            if let Some(path) = file.path {
                if path.is_dir() {
                    self.state
                        .show_error(format!("{}: folders cannot be imported", path.display()));
                    continue;
                }
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let mime = if file.mime.is_empty() {
                    guess_mime(&name).to_string()
                } else {
                    file.mime
                };
                self.state.queue_path(path, mime);
            } else if let Some(bytes) = file.bytes {
                self.state.queue_bytes(file.name, file.mime, bytes.to_vec());
            }
        }
    }

    /// Pick files with the native dialog and queue them.
    fn handle_open_files(&mut self) {
        for path in open_files_dialog(None) {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let mime = guess_mime(&name).to_string();
            self.state.queue_path(path, mime);
        }
    }

    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        let action = ctx.input_mut(|i| {
            // Ctrl+Alt+B first: it must not be read as a plain Ctrl shortcut
            if i.consume_key(Modifiers::COMMAND | Modifiers::ALT, Key::B) {
                return Some(KeyboardAction::ToggleDetails);
            }
            if i.consume_key(Modifiers::COMMAND, Key::S) {
                return Some(KeyboardAction::Save);
            }
            if i.consume_key(Modifiers::COMMAND, Key::W) {
                return Some(KeyboardAction::CloseTab);
            }
            if i.consume_key(Modifiers::COMMAND, Key::Equals)
                || i.consume_key(Modifiers::COMMAND, Key::Plus)
            {
                return Some(KeyboardAction::ZoomIn);
            }
            if i.consume_key(Modifiers::COMMAND, Key::Minus) {
                return Some(KeyboardAction::ZoomOut);
            }
            None
        });

        if let Some(action) = action {
            debug!("Keyboard shortcut: {:?}", action);
            self.apply_keyboard_action(action);
        }

        // Ctrl+wheel zoom
        let delta = ctx.input(|i| i.zoom_delta());
        if (delta - 1.0).abs() > f32::EPSILON {
            self.wheel_zoom *= delta;
            if self.wheel_zoom >= WHEEL_ZOOM_STEP {
                self.wheel_zoom = 1.0;
                self.state.zoom_in();
            } else if self.wheel_zoom <= 1.0 / WHEEL_ZOOM_STEP {
                self.wheel_zoom = 1.0;
                self.state.zoom_out();
            }
        }
    }

    fn apply_keyboard_action(&mut self, action: KeyboardAction) {
        match action {
            KeyboardAction::Save => self.state.request_save(),
            KeyboardAction::CloseTab => {
                self.state.close_active_tab();
            }
            KeyboardAction::ToggleDetails => {
                self.state.toggle_panel();
            }
            KeyboardAction::ZoomIn => self.state.zoom_in(),
            KeyboardAction::ZoomOut => self.state.zoom_out(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Panel Actions
    // ─────────────────────────────────────────────────────────────────────────

    fn handle_explorer_action(&mut self, action: ExplorerAction) {
        match action {
            ExplorerAction::ClickFolder(id) => self.state.click_folder(&id),
            ExplorerAction::ClickFile(id) => self.state.click_file(&id),
            ExplorerAction::ClearSelection => self.state.clear_selection(),
            ExplorerAction::NewFile(folder) => {
                self.target(folder);
                self.file_operation_dialog =
                    Some(FileOperationDialog::new_file(self.state.target_folder()));
            }
            ExplorerAction::NewFolder(folder) => {
                self.target(folder);
                self.file_operation_dialog =
                    Some(FileOperationDialog::new_folder(self.state.target_folder()));
            }
            ExplorerAction::OpenFiles => self.handle_open_files(),
            ExplorerAction::Rename(id) => {
                if let Some(entry) = self.state.store().get(&id) {
                    self.file_operation_dialog = Some(FileOperationDialog::rename(entry));
                }
            }
            ExplorerAction::Delete(id) => self.state.request_delete(&id),
            ExplorerAction::Download(id) => self.handle_download(&id),
            ExplorerAction::CopyPath(path) => match copy_text(&path) {
                Ok(()) => self.state.show_toast("Path copied", TOAST_SECS),
                Err(e) => {
                    warn!("Copy path failed: {}", e);
                    self.state.show_error(format!("Could not copy path: {}", e));
                }
            },
        }
    }

    /// Make `folder` the create target when a folder's context menu was used.
    fn target(&mut self, folder: Option<EntryId>) {
        if let Some(id) = folder {
            self.state.select_folder(&id);
        }
    }

    fn handle_download(&mut self, id: &EntryId) {
        let Some(name) = self.state.store().get(id).map(|e| e.name.clone()) else {
            return;
        };
        if let Some(destination) = save_file_dialog(&name) {
            self.state.download_entry(id, &destination);
        }
    }

    fn handle_tab_action(&mut self, action: TabAction) {
        match action {
            TabAction::Activate(id) => {
                self.state.activate_tab(&id);
            }
            TabAction::Close(id) => {
                self.state.close_tab(&id);
            }
        }
    }

    fn handle_panel_drag(&mut self, drag: PanelDrag) {
        match drag {
            PanelDrag::Begin(x) => self.state.begin_panel_drag(x),
            PanelDrag::Move(x) => self.state.drag_panel(x),
            PanelDrag::End => self.state.end_panel_drag(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    /// Render one frame of the UI.
    fn render_ui(&mut self, ctx: &egui::Context) {
        let colors = ThemeColors::from_theme(self.state.settings.theme);

        show_status_bar(ctx, &self.state, &colors);

        let details_visible = self.state.panel().is_visible();
        if let Some(action) = show_activity_bar(ctx, &colors, details_visible) {
            match action {
                ActivityAction::ToggleTheme => self.state.toggle_theme(),
                ActivityAction::ToggleDetails => {
                    self.state.toggle_panel();
                }
            }
        }

        if let Some(action) = show_explorer(ctx, &self.state, &colors).action {
            self.handle_explorer_action(action);
        }

        if self.state.panel().is_visible() {
            if let Some(drag) = show_details_panel(ctx, &self.state, &colors) {
                self.handle_panel_drag(drag);
            }
        }

        self.render_editor_area(ctx, &colors);
        self.render_dialogs(ctx, &colors);
    }

    fn render_editor_area(&mut self, ctx: &egui::Context, colors: &ThemeColors) {
        let mut tab_action = None;
        let mut edited = None;
        let mut surface_clicked = false;

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(colors.editor_bg))
            .show(ctx, |ui| {
                if !self.state.tabs().is_empty() {
                    tab_action = show_tab_bar(ui, self.state.tabs(), colors);
                }

                let Some(tab) = self.state.active_tab() else {
                    render_welcome(ui, colors);
                    return;
                };

                if tab.file.is_base64 {
                    ui.centered_and_justified(|ui| {
                        ui.label(
                            RichText::new(format!(
                                "{} is a binary file and cannot be edited.",
                                tab.title()
                            ))
                            .color(colors.text_muted),
                        );
                    });
                    return;
                }

                let settings = &self.state.settings;
                let extension = tab.file.extension();
                let mut buffer = tab.file.content.clone();
                let output = EditorWidget::new(&mut buffer, *colors)
                    .id(egui::Id::new(("editor", tab.id().as_str())))
                    .extension(extension.as_deref())
                    .font_size(settings.font_size)
                    .word_wrap(settings.word_wrap)
                    .show_line_numbers(settings.show_line_numbers)
                    .show(ui);
                if output.changed {
                    edited = Some(buffer);
                }
                surface_clicked = output.clicked;
            });

        if let Some(action) = tab_action {
            self.handle_tab_action(action);
        }
        if let Some(content) = edited {
            self.state.edit_active(content);
        }
        if surface_clicked {
            self.state.clear_selection();
        }
    }

    /// Render modals and dialogs on top of the panels.
    fn render_dialogs(&mut self, ctx: &egui::Context, colors: &ThemeColors) {
        // Restore prompt blocks everything else until answered
        if self.state.gate().is_prompting() {
            let count = self.state.gate().pending_count();
            match show_restore_prompt(ctx, count, colors) {
                Some(RestoreChoice::Import) => self.state.accept_restore(),
                Some(RestoreChoice::Skip) => self.state.decline_restore(),
                None => {}
            }
            return;
        }

        if let Some(dialog) = self.file_operation_dialog.as_mut() {
            let outcome = match dialog.show(ctx, colors) {
                FileOperationResult::None => None,
                FileOperationResult::Cancelled => Some(Ok(())),
                FileOperationResult::CreateFile { parent, name } => {
                    Some(self.state.create_file(parent.as_deref(), &name))
                }
                FileOperationResult::CreateFolder { parent, name } => {
                    Some(self.state.create_folder(parent.as_deref(), &name))
                }
                FileOperationResult::Rename { id, name } => {
                    Some(self.state.rename_entry(&id, &name))
                }
            };
            match outcome {
                Some(Ok(())) => self.file_operation_dialog = None,
                Some(Err(e)) => dialog.set_error(e.to_string()),
                None => {}
            }
        }

        if let Some(id) = self.state.ui.pending_delete.clone() {
            match self.state.store().get(&id) {
                Some(entry) => match show_delete_confirm(ctx, entry, colors) {
                    Some(true) => self.state.confirm_delete(),
                    Some(false) => self.state.cancel_delete(),
                    None => {}
                },
                None => self.state.cancel_delete(),
            }
        }

        if self.state.ui.show_error_modal
            && show_error_modal(ctx, &self.state.ui.error_message, colors)
        {
            self.state.dismiss_error();
        }
    }

    /// Render the static screen shown after a panic.
    fn render_crash_screen(ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new(format!("Something went wrong. Please restart {}.", APP_TITLE))
                        .size(18.0),
                );
            });
        });
    }

    /// Run one frame's worth of input handling and layout.
    fn frame(&mut self, ctx: &egui::Context) {
        let now = self.get_app_time();
        self.state.tick(now);
        self.apply_theme_if_needed(ctx);

        ctx.send_viewport_cmd(egui::ViewportCommand::Title(self.window_title()));
        self.update_window_state(ctx);

        if self.state.gate().is_resolved() {
            self.handle_dropped_files(ctx);
            self.handle_keyboard_shortcuts(ctx);
        }
        self.state.poll_imports();

        self.render_ui(ctx);

        if self.state.imports_in_flight() {
            ctx.request_repaint_after(IMPORT_POLL_INTERVAL);
        }
        if let Some(wakeup) = self.state.next_wakeup() {
            ctx.request_repaint_after(wakeup);
        }
    }
}

fn render_welcome(ui: &mut egui::Ui, colors: &ThemeColors) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.3);
        ui.label(RichText::new(APP_TITLE).size(28.0).color(colors.text_muted));
        ui.add_space(12.0);
        for line in [
            "Drop files anywhere to import them",
            "Ctrl+S  Save",
            "Ctrl+W  Close tab",
            "Ctrl+Alt+B  Toggle details",
            "Ctrl+=  /  Ctrl+-  Font size",
        ] {
            ui.label(RichText::new(line).color(colors.text_muted));
        }
    });
}

impl eframe::App for CodepadApp {
    /// Called each time the UI needs repainting.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.crashed {
            Self::render_crash_screen(ctx);
            return;
        }

        let result = panic::catch_unwind(AssertUnwindSafe(|| self.frame(ctx)));
        if let Err(payload) = result {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            error!("UI panicked: {}", message);
            self.crashed = true;
            ctx.request_repaint();
        }
    }

    /// Called when the application is about to close.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application exiting");
        self.state.shutdown();
    }

    /// Save persistent state.
    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        debug!("Saving application state");
        self.state.save_settings_if_dirty();
    }

    /// Auto-save interval in seconds.
    fn auto_save_interval(&self) -> Duration {
        Duration::from_secs(30)
    }
}
