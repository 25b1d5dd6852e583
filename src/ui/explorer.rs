//! Explorer side panel.
//!
//! Renders the file store as a collapsible tree with a header toolbar and a
//! per-row context menu. The panel never mutates state itself: every
//! interaction comes back as an [`ExplorerAction`] for the app to apply.

use crate::explorer::{Selection, TreeRow};
use crate::files::{EntryId, FileEntry};
use crate::state::AppState;
use crate::theme::ThemeColors;
use eframe::egui::{self, RichText, Sense, Ui, Vec2};

/// Width of the explorer panel.
const EXPLORER_WIDTH: f32 = 240.0;

/// Indentation per tree level.
const INDENT_PER_LEVEL: f32 = 12.0;

/// Height of each tree item row.
const ROW_HEIGHT: f32 = 22.0;

/// Something the user asked the explorer to do.
#[derive(Debug, Clone, PartialEq)]
pub enum ExplorerAction {
    /// Folder row clicked: select and toggle
    ClickFolder(EntryId),
    /// File row clicked: open in a tab
    ClickFile(EntryId),
    /// Click on empty space below the rows
    ClearSelection,
    /// Prompt for a new file, inside `folder` or the current target
    NewFile(Option<EntryId>),
    /// Prompt for a new folder, inside `folder` or the current target
    NewFolder(Option<EntryId>),
    /// Show the native picker and import the chosen files
    OpenFiles,
    Rename(EntryId),
    Delete(EntryId),
    Download(EntryId),
    /// Copy the logical path to the clipboard
    CopyPath(String),
}

/// Output from the explorer panel.
#[derive(Debug, Default)]
pub struct ExplorerOutput {
    pub action: Option<ExplorerAction>,
}

impl ExplorerOutput {
    fn set(&mut self, action: ExplorerAction) {
        self.action = Some(action);
    }
}

/// Render the explorer panel on the left of the window.
pub fn show_explorer(ctx: &egui::Context, state: &AppState, colors: &ThemeColors) -> ExplorerOutput {
    let mut output = ExplorerOutput::default();

    egui::SidePanel::left("explorer_panel")
        .resizable(false)
        .exact_width(EXPLORER_WIDTH)
        .frame(
            egui::Frame::none()
                .fill(colors.sidebar_bg)
                .stroke(egui::Stroke::new(1.0, colors.border)),
        )
        .show(ctx, |ui| {
            render_header(ui, colors, &mut output);
            ui.add_space(2.0);

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    let rows = state.tree().visible_rows(state.store());
                    if rows.is_empty() {
                        ui.add_space(12.0);
                        ui.vertical_centered(|ui| {
                            ui.label(
                                RichText::new("No files yet.\nDrop files here or create one.")
                                    .color(colors.text_muted)
                                    .size(12.0),
                            );
                        });
                    }

                    for row in &rows {
                        let selected = state.tree().is_selected(&row.entry.id);
                        let active = state
                            .active_tab()
                            .is_some_and(|tab| tab.path() == row.entry.path);
                        render_row(ui, row, selected || active, colors, &mut output);
                    }

                    // Empty space below the rows
                    let rest = ui.available_size().max(Vec2::new(0.0, ROW_HEIGHT));
                    let (_, background) = ui.allocate_exact_size(rest, Sense::click());
                    if background.clicked() && !matches!(state.tree().selection(), Selection::None) {
                        output.set(ExplorerAction::ClearSelection);
                    }
                    background.context_menu(|ui| {
                        if ui.button("New File").clicked() {
                            output.set(ExplorerAction::NewFile(None));
                            ui.close_menu();
                        }
                        if ui.button("New Folder").clicked() {
                            output.set(ExplorerAction::NewFolder(None));
                            ui.close_menu();
                        }
                    });
                });
        });

    output
}

fn render_header(ui: &mut Ui, colors: &ThemeColors, output: &mut ExplorerOutput) {
    ui.add_space(6.0);
    ui.horizontal(|ui| {
        ui.add_space(8.0);
        ui.label(
            RichText::new("EXPLORER")
                .size(11.0)
                .strong()
                .color(colors.text_muted),
        );

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.add_space(4.0);
            if header_button(ui, "⬆", "Open Files…").clicked() {
                output.set(ExplorerAction::OpenFiles);
            }
            if header_button(ui, "🗀", "New Folder").clicked() {
                output.set(ExplorerAction::NewFolder(None));
            }
            if header_button(ui, "🗋", "New File").clicked() {
                output.set(ExplorerAction::NewFile(None));
            }
        });
    });
}

fn header_button(ui: &mut Ui, icon: &str, tooltip: &str) -> egui::Response {
    ui.add(egui::Button::new(RichText::new(icon).size(13.0)).frame(false))
        .on_hover_text(tooltip)
}

/// Render one tree row.
fn render_row(
    ui: &mut Ui,
    row: &TreeRow<'_>,
    highlighted: bool,
    colors: &ThemeColors,
    output: &mut ExplorerOutput,
) {
    let entry = row.entry;
    let indent = row.depth as f32 * INDENT_PER_LEVEL;

    let row_width = ui.available_width();
    let (row_rect, response) =
        ui.allocate_exact_size(Vec2::new(row_width, ROW_HEIGHT), Sense::click());

    if highlighted {
        ui.painter().rect_filled(row_rect, 0.0, colors.selected);
    } else if response.hovered() {
        ui.painter().rect_filled(row_rect, 0.0, colors.hover);
    }
    if response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }

    let painter = ui.painter();
    let mut pos = row_rect.left_center() + Vec2::new(indent + 8.0, 0.0);

    if entry.is_folder() {
        let arrow = if row.expanded { "▼" } else { "▶" };
        painter.text(
            pos,
            egui::Align2::LEFT_CENTER,
            arrow,
            egui::FontId::proportional(9.0),
            colors.text_muted,
        );
    }
    pos.x += 14.0;

    painter.text(
        pos,
        egui::Align2::LEFT_CENTER,
        entry_icon(entry, row.expanded),
        egui::FontId::proportional(13.0),
        colors.text,
    );
    pos.x += 18.0;

    painter.text(
        pos,
        egui::Align2::LEFT_CENTER,
        &entry.name,
        egui::FontId::proportional(13.0),
        colors.text,
    );

    if response.clicked() {
        let action = if entry.is_folder() {
            ExplorerAction::ClickFolder(entry.id.clone())
        } else {
            ExplorerAction::ClickFile(entry.id.clone())
        };
        output.set(action);
    }

    response
        .on_hover_text(&entry.path)
        .context_menu(|ui| render_context_menu(ui, entry, output));
}

fn render_context_menu(ui: &mut Ui, entry: &FileEntry, output: &mut ExplorerOutput) {
    if entry.is_folder() {
        if ui.button("New File").clicked() {
            output.set(ExplorerAction::NewFile(Some(entry.id.clone())));
            ui.close_menu();
        }
        if ui.button("New Folder").clicked() {
            output.set(ExplorerAction::NewFolder(Some(entry.id.clone())));
            ui.close_menu();
        }
        ui.separator();
    }

    if ui.button("Rename…").clicked() {
        output.set(ExplorerAction::Rename(entry.id.clone()));
        ui.close_menu();
    }
    if ui.button("Delete").clicked() {
        output.set(ExplorerAction::Delete(entry.id.clone()));
        ui.close_menu();
    }

    ui.separator();

    if !entry.is_folder() && ui.button("Download…").clicked() {
        output.set(ExplorerAction::Download(entry.id.clone()));
        ui.close_menu();
    }
    if ui.button("Copy Path").clicked() {
        output.set(ExplorerAction::CopyPath(entry.path.clone()));
        ui.close_menu();
    }
}

/// Glyph shown before an entry's name.
fn entry_icon(entry: &FileEntry, expanded: bool) -> &'static str {
    if entry.is_folder() {
        return if expanded { "📂" } else { "📁" };
    }
    match entry.extension().as_deref() {
        Some("ts" | "tsx" | "js" | "jsx") => "📜",
        Some("c" | "cpp" | "h" | "hpp") => "⚙",
        Some("md" | "txt") => "📝",
        Some("json") => "🔧",
        Some("png" | "jpg" | "jpeg" | "gif" | "svg") => "🖼",
        _ => "📄",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_icon() {
        let folder = FileEntry::folder("src");
        assert_eq!(entry_icon(&folder, false), "📁");
        assert_eq!(entry_icon(&folder, true), "📂");

        let ts = FileEntry::text("main.ts", "", "text/typescript");
        assert_eq!(entry_icon(&ts, false), "📜");

        let other = FileEntry::text("LICENSE", "", "text/plain");
        assert_eq!(entry_icon(&other, false), "📄");
    }

    #[test]
    fn test_explorer_output_default() {
        let output = ExplorerOutput::default();
        assert!(output.action.is_none());
    }
}
