//! Right-hand details panel with a drag-to-resize handle.
//!
//! Shows facts about the active file and the recently-opened list. The
//! panel's width and visibility live in [`PanelResize`](crate::panel::PanelResize);
//! this module only reports pointer movement on the handle.

use crate::editor::language_label;
use crate::state::AppState;
use crate::theme::ThemeColors;
use chrono::Local;
use eframe::egui::{self, CursorIcon, RichText, Sense, Ui};

/// Width of the grab area on the panel's left edge.
const HANDLE_WIDTH: f32 = 5.0;

/// Pointer events on the resize handle, in screen x coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelDrag {
    Begin(f32),
    Move(f32),
    End,
}

/// Render the details panel. Returns a drag event when the handle is used.
pub fn show_details_panel(
    ctx: &egui::Context,
    state: &AppState,
    colors: &ThemeColors,
) -> Option<PanelDrag> {
    let mut drag = None;
    let panel = state.panel();

    egui::SidePanel::right("details_panel")
        .resizable(false)
        .exact_width(panel.width())
        .frame(
            egui::Frame::none()
                .fill(colors.sidebar_bg)
                .stroke(egui::Stroke::new(1.0, colors.border))
                .inner_margin(egui::Margin {
                    left: HANDLE_WIDTH + 8.0,
                    right: 10.0,
                    top: 8.0,
                    bottom: 8.0,
                }),
        )
        .show(ctx, |ui| {
            drag = resize_handle(ui, panel.is_dragging(), colors);

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    render_file_info(ui, state, colors);
                    ui.add_space(12.0);
                    render_recent(ui, state, colors);
                });
        });

    drag
}

fn resize_handle(ui: &mut Ui, dragging: bool, colors: &ThemeColors) -> Option<PanelDrag> {
    let panel_rect = ui.max_rect();
    let frame_left = panel_rect.left() - HANDLE_WIDTH - 8.0;
    let handle = egui::Rect::from_min_max(
        egui::pos2(frame_left, panel_rect.top() - 8.0),
        egui::pos2(frame_left + HANDLE_WIDTH, panel_rect.bottom() + 8.0),
    );
    let response = ui.interact(handle, ui.id().with("resize_handle"), Sense::drag());

    if response.hovered() || dragging {
        ui.ctx().set_cursor_icon(CursorIcon::ResizeHorizontal);
        ui.painter().rect_filled(handle, 0.0, colors.accent.gamma_multiply(0.6));
    }

    let pointer_x = response.interact_pointer_pos().map(|p| p.x);
    if response.drag_started() {
        return pointer_x.map(PanelDrag::Begin);
    }
    if response.drag_stopped() {
        return Some(PanelDrag::End);
    }
    if response.dragged() {
        return pointer_x.map(PanelDrag::Move);
    }
    None
}

fn section_title(ui: &mut Ui, title: &str, colors: &ThemeColors) {
    ui.label(
        RichText::new(title)
            .size(11.0)
            .strong()
            .color(colors.text_muted),
    );
    ui.add_space(4.0);
}

fn render_file_info(ui: &mut Ui, state: &AppState, colors: &ThemeColors) {
    section_title(ui, "DETAILS", colors);

    let Some(tab) = state.active_tab() else {
        ui.label(RichText::new("No file open").color(colors.text_muted));
        return;
    };
    let file = &tab.file;
    let extension = file.extension();

    egui::Grid::new("details_grid")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            let row = |ui: &mut Ui, label: &str, value: String| {
                ui.label(RichText::new(label).color(colors.text_muted));
                ui.add(egui::Label::new(value).truncate());
                ui.end_row();
            };
            row(ui, "Name", file.name.clone());
            row(ui, "Path", file.path.clone());
            row(ui, "Language", language_label(extension.as_deref()).to_string());
            row(ui, "Type", file.mime_type.clone());
            row(ui, "Size", format_size(file.size_bytes()));
            row(
                ui,
                "Opened",
                file.last_opened
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string(),
            );
        });
}

fn render_recent(ui: &mut Ui, state: &AppState, colors: &ThemeColors) {
    section_title(ui, "RECENTLY OPENED", colors);
    let names = state.recent().names();
    if names.is_empty() {
        ui.label(RichText::new("Nothing yet").color(colors.text_muted));
        return;
    }
    for name in names {
        ui.label(RichText::new(name).size(12.0));
    }
}

/// Human-readable byte count.
pub fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{} B", bytes)
    } else if b < MB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / MB)
    }
}
