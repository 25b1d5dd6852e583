//! Bottom status bar.

use crate::editor::{count_lines, language_label};
use crate::state::AppState;
use crate::theme::ThemeColors;
use eframe::egui::{self, RichText};

const STATUS_BAR_HEIGHT: f32 = 22.0;

pub fn show_status_bar(ctx: &egui::Context, state: &AppState, colors: &ThemeColors) {
    let fg = colors.status_bar_fg;
    let text = |s: String| RichText::new(s).size(12.0).color(fg);

    egui::TopBottomPanel::bottom("status_bar")
        .exact_height(STATUS_BAR_HEIGHT)
        .frame(
            egui::Frame::none()
                .fill(colors.status_bar_bg)
                .inner_margin(egui::Margin::symmetric(10.0, 2.0)),
        )
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                let store = state.store();
                ui.label(text(format!(
                    "{} files, {} folders",
                    store.file_count(),
                    store.len() - store.file_count()
                )));
                ui.add_space(12.0);
                ui.label(text(format!(
                    "{}/{} tabs",
                    state.tabs().len(),
                    state.tabs().max_tabs()
                )));

                if let Some(toast) = &state.ui.toast_message {
                    ui.add_space(12.0);
                    ui.label(text(toast.clone()));
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(tab) = state.active_tab() {
                        let extension = tab.file.extension();
                        ui.label(text(language_label(extension.as_deref()).to_string()));
                        if !tab.file.is_base64 {
                            ui.add_space(12.0);
                            ui.label(text(format!("{} lines", count_lines(&tab.file.content))));
                        }
                        ui.add_space(12.0);
                        ui.label(text(format!("{}px", state.settings.font_size)));
                    }
                    if state.is_saving() {
                        ui.add_space(12.0);
                        ui.label(text("Saving…".to_string()));
                    }
                });
            });
        });
}
