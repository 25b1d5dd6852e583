//! Modal dialogs for explorer operations.
//!
//! Name prompts for New File / New Folder / Rename, and the delete
//! confirmation. Dialogs only collect input; the store decides whether the
//! operation succeeds and any error is fed back with [`FileOperationDialog::set_error`].

// - too_many_arguments: Dialog functions have many UI configuration parameters
#![allow(clippy::too_many_arguments)]

use crate::explorer::validate_name;
use crate::files::{EntryId, FileEntry};
use crate::theme::ThemeColors;
use eframe::egui::{self, Key, RichText};

/// State for an active name prompt.
#[derive(Debug, Clone)]
pub enum FileOperationDialog {
    /// Create a new file under `parent` (root when `None`)
    NewFile {
        parent: Option<String>,
        name_input: String,
        error_message: Option<String>,
    },
    /// Create a new folder under `parent` (root when `None`)
    NewFolder {
        parent: Option<String>,
        name_input: String,
        error_message: Option<String>,
    },
    /// Rename a file or folder
    Rename {
        target: EntryId,
        is_folder: bool,
        new_name_input: String,
        error_message: Option<String>,
    },
}

/// Result from showing a file operation dialog.
#[derive(Debug, PartialEq)]
pub enum FileOperationResult {
    /// No action taken (dialog still open)
    None,
    /// Dialog was cancelled
    Cancelled,
    /// Create a file named `name` under `parent`, the folder shown in the prompt
    CreateFile { parent: Option<String>, name: String },
    /// Create a folder named `name` under `parent`
    CreateFolder { parent: Option<String>, name: String },
    /// Rename `id` to `name`
    Rename { id: EntryId, name: String },
}

impl FileOperationDialog {
    pub fn new_file(parent: Option<String>) -> Self {
        Self::NewFile {
            parent,
            name_input: String::new(),
            error_message: None,
        }
    }

    pub fn new_folder(parent: Option<String>) -> Self {
        Self::NewFolder {
            parent,
            name_input: String::new(),
            error_message: None,
        }
    }

    /// Rename prompt prefilled with the current name.
    pub fn rename(entry: &FileEntry) -> Self {
        Self::Rename {
            target: entry.id.clone(),
            is_folder: entry.is_folder(),
            new_name_input: entry.name.clone(),
            error_message: None,
        }
    }

    /// Show an error under the input and keep the dialog open.
    pub fn set_error(&mut self, message: impl Into<String>) {
        let message = Some(message.into());
        match self {
            FileOperationDialog::NewFile { error_message, .. }
            | FileOperationDialog::NewFolder { error_message, .. }
            | FileOperationDialog::Rename { error_message, .. } => *error_message = message,
        }
    }

    /// Show the dialog and return the result.
    pub fn show(&mut self, ctx: &egui::Context, colors: &ThemeColors) -> FileOperationResult {
        if ctx.input(|i| i.key_pressed(Key::Escape)) {
            return FileOperationResult::Cancelled;
        }

        let prompt = match self {
            FileOperationDialog::NewFile {
                parent,
                name_input,
                error_message,
            } => {
                let location = parent.as_deref().unwrap_or("/").to_string();
                show_name_prompt(
                    ctx,
                    "New File",
                    "Enter file name:",
                    "index.ts",
                    Some(&location),
                    name_input,
                    error_message,
                    colors,
                )
            }
            FileOperationDialog::NewFolder {
                parent,
                name_input,
                error_message,
            } => {
                let location = parent.as_deref().unwrap_or("/").to_string();
                show_name_prompt(
                    ctx,
                    "New Folder",
                    "Enter folder name:",
                    "folder-name",
                    Some(&location),
                    name_input,
                    error_message,
                    colors,
                )
            }
            FileOperationDialog::Rename {
                is_folder,
                new_name_input,
                error_message,
                ..
            } => {
                let title = if *is_folder {
                    "Rename Folder"
                } else {
                    "Rename File"
                };
                show_name_prompt(
                    ctx,
                    title,
                    "Enter new name:",
                    "",
                    None,
                    new_name_input,
                    error_message,
                    colors,
                )
            }
        };

        match prompt {
            Ok(name) => self.submit(name),
            Err(result) => result,
        }
    }

    /// The operation to run for a submitted `name`.
    ///
    /// Creates go into the folder captured when the prompt opened, whatever
    /// is selected in the tree by the time the user submits.
    pub fn submit(&self, name: String) -> FileOperationResult {
        match self {
            FileOperationDialog::NewFile { parent, .. } => FileOperationResult::CreateFile {
                parent: parent.clone(),
                name,
            },
            FileOperationDialog::NewFolder { parent, .. } => FileOperationResult::CreateFolder {
                parent: parent.clone(),
                name,
            },
            FileOperationDialog::Rename { target, .. } => FileOperationResult::Rename {
                id: target.clone(),
                name,
            },
        }
    }
}

/// Whether `name` may be submitted from a prompt.
pub fn is_valid_name(name: &str) -> bool {
    validate_name(name).is_ok()
}

/// Shared name prompt. `Ok(name)` on submit, `Err(result)` otherwise.
fn show_name_prompt(
    ctx: &egui::Context,
    title: &str,
    label: &str,
    hint: &str,
    location: Option<&str>,
    name_input: &mut String,
    error_message: &mut Option<String>,
    colors: &ThemeColors,
) -> Result<String, FileOperationResult> {
    let mut result = Err(FileOperationResult::None);

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .frame(
            egui::Frame::window(&ctx.style())
                .fill(colors.sidebar_bg)
                .stroke(egui::Stroke::new(1.0, colors.border))
                .rounding(6.0),
        )
        .show(ctx, |ui| {
            ui.set_min_width(320.0);

            ui.add_space(6.0);
            ui.label(label);
            ui.add_space(4.0);

            let response = ui.add(
                egui::TextEdit::singleline(name_input)
                    .hint_text(hint)
                    .desired_width(300.0),
            );
            if !response.has_focus() && error_message.is_none() {
                response.request_focus();
            }
            if response.changed() {
                *error_message = None;
            }

            if let Some(error) = error_message.as_deref() {
                ui.add_space(4.0);
                ui.colored_label(colors.error, error);
            } else if !name_input.trim().is_empty() {
                if let Err(e) = validate_name(name_input) {
                    ui.add_space(4.0);
                    ui.colored_label(colors.error, e.to_string());
                }
            }

            if let Some(location) = location {
                ui.add_space(8.0);
                ui.label(
                    RichText::new(format!("Location: {}", location))
                        .small()
                        .color(colors.text_muted),
                );
            }

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let enabled = is_valid_name(name_input);
                    let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
                    if ui.add_enabled(enabled, egui::Button::new("OK")).clicked()
                        || (submitted && enabled)
                    {
                        result = Ok(name_input.trim().to_string());
                    }
                    ui.add_space(8.0);
                    if ui.button("Cancel").clicked() {
                        result = Err(FileOperationResult::Cancelled);
                    }
                });
            });
            ui.add_space(4.0);
        });

    result
}

/// Delete confirmation. `Some(true)` confirms, `Some(false)` cancels.
pub fn show_delete_confirm(
    ctx: &egui::Context,
    entry: &FileEntry,
    colors: &ThemeColors,
) -> Option<bool> {
    if ctx.input(|i| i.key_pressed(Key::Escape)) {
        return Some(false);
    }

    let mut decision = None;
    egui::Window::new("Delete")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .frame(
            egui::Frame::window(&ctx.style())
                .fill(colors.sidebar_bg)
                .stroke(egui::Stroke::new(1.0, colors.border))
                .rounding(6.0),
        )
        .show(ctx, |ui| {
            ui.set_min_width(320.0);
            ui.add_space(6.0);
            let what = if entry.is_folder() {
                format!("Delete folder \"{}\" and all its contents?", entry.name)
            } else {
                format!("Delete \"{}\"?", entry.name)
            };
            ui.label(what);
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let delete = egui::Button::new(RichText::new("Delete").color(egui::Color32::WHITE))
                        .fill(colors.error);
                    if ui.add(delete).clicked() {
                        decision = Some(true);
                    }
                    ui.add_space(8.0);
                    if ui.button("Cancel").clicked() {
                        decision = Some(false);
                    }
                });
            });
            ui.add_space(4.0);
        });
    decision
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_name() {
        assert!(is_valid_name("main.ts"));
        assert!(is_valid_name("  spaced.ts "));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("   "));
        assert!(!is_valid_name("a/b"));
        assert!(!is_valid_name("what?"));
        assert!(!is_valid_name(".."));
    }

    #[test]
    fn test_rename_dialog_prefills_name() {
        let entry = FileEntry::folder("src/lib");
        match FileOperationDialog::rename(&entry) {
            FileOperationDialog::Rename {
                new_name_input,
                is_folder,
                ..
            } => {
                assert_eq!(new_name_input, "lib");
                assert!(is_folder);
            }
            other => panic!("unexpected dialog {:?}", other),
        }
    }

    #[test]
    fn test_submit_keeps_parent_from_open() {
        let dialog = FileOperationDialog::new_file(Some("src".to_string()));
        assert_eq!(
            dialog.submit("x.ts".to_string()),
            FileOperationResult::CreateFile {
                parent: Some("src".to_string()),
                name: "x.ts".to_string()
            }
        );

        let dialog = FileOperationDialog::new_folder(None);
        assert_eq!(
            dialog.submit("lib".to_string()),
            FileOperationResult::CreateFolder {
                parent: None,
                name: "lib".to_string()
            }
        );
    }

    #[test]
    fn test_set_error() {
        let mut dialog = FileOperationDialog::new_file(None);
        dialog.set_error("exists");
        match dialog {
            FileOperationDialog::NewFile { error_message, .. } => {
                assert_eq!(error_message.as_deref(), Some("exists"));
            }
            other => panic!("unexpected dialog {:?}", other),
        }
    }
}
