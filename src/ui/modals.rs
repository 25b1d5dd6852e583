//! Blocking modals: the restore prompt and the error notice.
//!
//! Both dim the window behind them so nothing else can be clicked until the
//! user answers.

use crate::theme::ThemeColors;
use eframe::egui::{self, Color32, Key, RichText};

/// Answer to the restore prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreChoice {
    Import,
    Skip,
}

/// Dim everything behind a modal and swallow clicks to it.
fn paint_backdrop(ctx: &egui::Context, id: &str) {
    let screen = ctx.screen_rect();
    egui::Area::new(egui::Id::new(id))
        .order(egui::Order::Middle)
        .fixed_pos(screen.min)
        .interactable(true)
        .show(ctx, |ui| {
            ui.painter()
                .rect_filled(screen, 0.0, Color32::from_black_alpha(140));
            ui.allocate_rect(screen, egui::Sense::click());
        });
}

fn modal_frame(ctx: &egui::Context, colors: &ThemeColors) -> egui::Frame {
    egui::Frame::window(&ctx.style())
        .fill(colors.sidebar_bg)
        .stroke(egui::Stroke::new(1.0, colors.border))
        .rounding(6.0)
        .inner_margin(16.0)
}

/// "Import previous files?" prompt shown at startup when storage holds files.
pub fn show_restore_prompt(
    ctx: &egui::Context,
    file_count: usize,
    colors: &ThemeColors,
) -> Option<RestoreChoice> {
    paint_backdrop(ctx, "restore_backdrop");

    let mut choice = None;
    egui::Window::new("Restore Files")
        .title_bar(false)
        .collapsible(false)
        .resizable(false)
        .order(egui::Order::Foreground)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .frame(modal_frame(ctx, colors))
        .show(ctx, |ui| {
            ui.set_width(340.0);
            ui.label(RichText::new("Import previous files?").size(16.0).strong());
            ui.add_space(8.0);
            let noun = if file_count == 1 { "entry" } else { "entries" };
            ui.label(
                RichText::new(format!(
                    "{} {} from your last session can be restored.",
                    file_count, noun
                ))
                .color(colors.text_muted),
            );
            ui.add_space(14.0);
            ui.horizontal(|ui| {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let yes = egui::Button::new(RichText::new("Yes").color(Color32::WHITE))
                        .fill(colors.accent)
                        .min_size(egui::vec2(72.0, 0.0));
                    if ui.add(yes).clicked() || ui.input(|i| i.key_pressed(Key::Enter)) {
                        choice = Some(RestoreChoice::Import);
                    }
                    ui.add_space(8.0);
                    if ui
                        .add(egui::Button::new("No").min_size(egui::vec2(72.0, 0.0)))
                        .clicked()
                    {
                        choice = Some(RestoreChoice::Skip);
                    }
                });
            });
        });
    choice
}

/// Error notice. Returns true once dismissed.
pub fn show_error_modal(ctx: &egui::Context, message: &str, colors: &ThemeColors) -> bool {
    paint_backdrop(ctx, "error_backdrop");

    let mut dismissed = ctx.input(|i| i.key_pressed(Key::Escape));
    egui::Window::new("Error")
        .title_bar(false)
        .collapsible(false)
        .resizable(false)
        .order(egui::Order::Foreground)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .frame(modal_frame(ctx, colors))
        .show(ctx, |ui| {
            ui.set_max_width(420.0);
            ui.label(RichText::new("⚠ Error").size(16.0).strong().color(colors.error));
            ui.add_space(8.0);
            egui::ScrollArea::vertical()
                .max_height(240.0)
                .show(ui, |ui| {
                    for line in message.lines() {
                        ui.label(line);
                    }
                });
            ui.add_space(12.0);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add(egui::Button::new("OK").min_size(egui::vec2(72.0, 0.0)))
                    .clicked()
                {
                    dismissed = true;
                }
            });
        });
    dismissed
}
