//! Far-left icon strip.
//!
//! The view icons are decorative. Only the bottom buttons do anything.

use crate::theme::ThemeColors;
use eframe::egui::{self, RichText};

const BAR_WIDTH: f32 = 48.0;

/// Icons shown at the top of the bar.
const VIEW_ICONS: [(&str, &str); 4] = [
    ("🗐", "Explorer"),
    ("🔍", "Search"),
    ("⑂", "Source Control"),
    ("⊞", "Extensions"),
];

/// Button pressed on the activity bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityAction {
    ToggleTheme,
    ToggleDetails,
}

pub fn show_activity_bar(
    ctx: &egui::Context,
    colors: &ThemeColors,
    details_visible: bool,
) -> Option<ActivityAction> {
    let mut action = None;
    let icon_color = colors.status_bar_fg.gamma_multiply(0.6);

    egui::SidePanel::left("activity_bar")
        .resizable(false)
        .exact_width(BAR_WIDTH)
        .frame(egui::Frame::none().fill(colors.activity_bar_bg))
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(8.0);
                for (i, (icon, name)) in VIEW_ICONS.iter().enumerate() {
                    let color = if i == 0 { colors.status_bar_fg } else { icon_color };
                    ui.label(RichText::new(*icon).size(22.0).color(color))
                        .on_hover_text(*name);
                    ui.add_space(14.0);
                }
            });

            ui.with_layout(egui::Layout::bottom_up(egui::Align::Center), |ui| {
                ui.add_space(8.0);
                let theme_icon = if colors.is_dark() { "☀" } else { "🌙" };
                if ui
                    .add(egui::Button::new(RichText::new(theme_icon).size(18.0).color(icon_color)).frame(false))
                    .on_hover_text("Toggle Theme")
                    .clicked()
                {
                    action = Some(ActivityAction::ToggleTheme);
                }
                ui.add_space(10.0);
                let details_color = if details_visible { colors.status_bar_fg } else { icon_color };
                if ui
                    .add(egui::Button::new(RichText::new("ℹ").size(18.0).color(details_color)).frame(false))
                    .on_hover_text("Toggle Details (Ctrl+Alt+B)")
                    .clicked()
                {
                    action = Some(ActivityAction::ToggleDetails);
                }
            });
        });

    action
}
