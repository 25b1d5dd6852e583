//! Editor tab strip.

use crate::files::EntryId;
use crate::tabs::OpenTabs;
use crate::theme::ThemeColors;
use eframe::egui::{self, RichText, Sense, Ui, Vec2};

const TAB_HEIGHT: f32 = 32.0;

/// Interaction with the tab strip.
#[derive(Debug, Clone, PartialEq)]
pub enum TabAction {
    Activate(EntryId),
    Close(EntryId),
}

/// Render the open tabs in one horizontally scrolling row.
pub fn show_tab_bar(ui: &mut Ui, tabs: &OpenTabs, colors: &ThemeColors) -> Option<TabAction> {
    let mut action = None;

    egui::Frame::none().fill(colors.tab_bar_bg).show(ui, |ui| {
        ui.set_min_height(TAB_HEIGHT);
        egui::ScrollArea::horizontal()
            .id_source("tab_bar_scroll")
            .auto_shrink([false, true])
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.spacing_mut().item_spacing.x = 1.0;
                    for tab in tabs.tabs() {
                        let active = tabs.is_active(tab.id());
                        if let Some(a) = render_tab(ui, tab.id(), tab.title(), tab.path(), active, colors) {
                            action = Some(a);
                        }
                    }
                });
            });
    });

    action
}

fn render_tab(
    ui: &mut Ui,
    id: &EntryId,
    title: &str,
    path: &str,
    active: bool,
    colors: &ThemeColors,
) -> Option<TabAction> {
    let mut action = None;
    let fill = if active {
        colors.tab_active_bg
    } else {
        colors.tab_inactive_bg
    };

    let inner = egui::Frame::none()
        .fill(fill)
        .inner_margin(egui::Margin::symmetric(10.0, 6.0))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                let text_color = if active { colors.text } else { colors.text_muted };
                let label = ui
                    .add(
                        egui::Label::new(RichText::new(title).size(13.0).color(text_color))
                            .selectable(false)
                            .sense(Sense::click()),
                    )
                    .on_hover_text(path);
                if label.middle_clicked() {
                    action = Some(TabAction::Close(id.clone()));
                } else if label.clicked() && !active {
                    action = Some(TabAction::Activate(id.clone()));
                }

                let close = ui
                    .add(egui::Button::new(RichText::new("×").size(13.0)).frame(false))
                    .on_hover_text("Close (Ctrl+W)");
                if close.clicked() {
                    action = Some(TabAction::Close(id.clone()));
                }
            });
        });

    if active {
        let rect = inner.response.rect;
        let top = egui::Rect::from_min_size(rect.min, Vec2::new(rect.width(), 2.0));
        ui.painter().rect_filled(top, 0.0, colors.accent);
    }
    action
}
