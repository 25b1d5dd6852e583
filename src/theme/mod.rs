//! Theme system for Codepad
//!
//! A VS Code–style palette for dark and light mode, and its conversion into
//! egui `Visuals`. Panels that paint their own chrome (activity bar, tab bar,
//! status bar) read colors from [`ThemeColors`] directly.

use crate::config::Theme;
use eframe::egui::{self, Color32, Rounding, Stroke, Visuals};

// ─────────────────────────────────────────────────────────────────────────────
// Theme Colors
// ─────────────────────────────────────────────────────────────────────────────

/// Complete color palette for one theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeColors {
    dark: bool,
    /// Editor surface
    pub editor_bg: Color32,
    /// Explorer and details panels
    pub sidebar_bg: Color32,
    /// Far-left icon strip
    pub activity_bar_bg: Color32,
    /// Strip behind the tabs
    pub tab_bar_bg: Color32,
    pub tab_active_bg: Color32,
    pub tab_inactive_bg: Color32,
    /// Bottom status bar
    pub status_bar_bg: Color32,
    pub status_bar_fg: Color32,
    pub border: Color32,
    pub hover: Color32,
    /// Selected tree row
    pub selected: Color32,
    pub text: Color32,
    pub text_muted: Color32,
    pub accent: Color32,
    pub error: Color32,
    /// Line-number gutter
    pub gutter_bg: Color32,
    pub gutter_fg: Color32,
}

impl ThemeColors {
    /// Dark+ palette.
    pub fn dark() -> Self {
        Self {
            dark: true,
            editor_bg: Color32::from_rgb(30, 30, 30),
            sidebar_bg: Color32::from_rgb(37, 37, 38),
            activity_bar_bg: Color32::from_rgb(51, 51, 51),
            tab_bar_bg: Color32::from_rgb(37, 37, 38),
            tab_active_bg: Color32::from_rgb(30, 30, 30),
            tab_inactive_bg: Color32::from_rgb(45, 45, 45),
            status_bar_bg: Color32::from_rgb(0, 122, 204),
            status_bar_fg: Color32::WHITE,
            border: Color32::from_rgb(60, 60, 60),
            hover: Color32::from_rgb(42, 45, 46),
            selected: Color32::from_rgb(55, 55, 61),
            text: Color32::from_rgb(204, 204, 204),
            text_muted: Color32::from_rgb(133, 133, 133),
            accent: Color32::from_rgb(0, 122, 204),
            error: Color32::from_rgb(241, 76, 76),
            gutter_bg: Color32::from_rgb(30, 30, 30),
            gutter_fg: Color32::from_rgb(133, 133, 133),
        }
    }

    /// Light+ palette.
    pub fn light() -> Self {
        Self {
            dark: false,
            editor_bg: Color32::WHITE,
            sidebar_bg: Color32::from_rgb(243, 243, 243),
            activity_bar_bg: Color32::from_rgb(44, 44, 44),
            tab_bar_bg: Color32::from_rgb(243, 243, 243),
            tab_active_bg: Color32::WHITE,
            tab_inactive_bg: Color32::from_rgb(236, 236, 236),
            status_bar_bg: Color32::from_rgb(0, 122, 204),
            status_bar_fg: Color32::WHITE,
            border: Color32::from_rgb(212, 212, 212),
            hover: Color32::from_rgb(232, 232, 232),
            selected: Color32::from_rgb(228, 230, 241),
            text: Color32::from_rgb(51, 51, 51),
            text_muted: Color32::from_rgb(110, 110, 110),
            accent: Color32::from_rgb(0, 95, 184),
            error: Color32::from_rgb(205, 49, 49),
            gutter_bg: Color32::WHITE,
            gutter_fg: Color32::from_rgb(35, 120, 147),
        }
    }

    /// Palette for a settings theme.
    pub fn from_theme(theme: Theme) -> Self {
        if theme.is_dark() {
            Self::dark()
        } else {
            Self::light()
        }
    }

    pub fn is_dark(&self) -> bool {
        self.dark
    }

    /// Convert the palette into egui visuals.
    pub fn to_visuals(&self) -> Visuals {
        let mut visuals = if self.dark {
            Visuals::dark()
        } else {
            Visuals::light()
        };
        let rounding = Rounding::same(2.0);

        // ─────────────────────────────────────────────────────────────────────
        // Window & Panel Background
        // ─────────────────────────────────────────────────────────────────────
        visuals.panel_fill = self.sidebar_bg;
        visuals.window_fill = self.sidebar_bg;
        visuals.extreme_bg_color = self.editor_bg;
        visuals.faint_bg_color = self.hover;
        visuals.code_bg_color = self.editor_bg;
        visuals.error_fg_color = self.error;
        visuals.hyperlink_color = self.accent;

        // ─────────────────────────────────────────────────────────────────────
        // Selection
        // ─────────────────────────────────────────────────────────────────────
        visuals.selection.bg_fill = self.accent.gamma_multiply(0.45);
        visuals.selection.stroke = Stroke::new(1.0, self.accent);

        // ─────────────────────────────────────────────────────────────────────
        // Widgets
        // ─────────────────────────────────────────────────────────────────────
        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, self.border);
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text);
        visuals.widgets.noninteractive.rounding = rounding;

        visuals.widgets.inactive.weak_bg_fill = Color32::TRANSPARENT;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text);
        visuals.widgets.inactive.rounding = rounding;

        visuals.widgets.hovered.weak_bg_fill = self.hover;
        visuals.widgets.hovered.bg_fill = self.hover;
        visuals.widgets.hovered.bg_stroke = Stroke::NONE;
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.5, self.text);
        visuals.widgets.hovered.rounding = rounding;

        visuals.widgets.active.bg_fill = self.accent;
        visuals.widgets.active.weak_bg_fill = self.selected;
        visuals.widgets.active.fg_stroke = Stroke::new(2.0, Color32::WHITE);
        visuals.widgets.active.rounding = rounding;

        // ─────────────────────────────────────────────────────────────────────
        // Window & Popup Styling
        // ─────────────────────────────────────────────────────────────────────
        visuals.window_rounding = Rounding::same(4.0);
        visuals.window_stroke = Stroke::new(1.0, self.border);
        visuals.window_shadow = egui::epaint::Shadow {
            offset: egui::vec2(0.0, 4.0),
            blur: 16.0,
            spread: 0.0,
            color: Color32::from_black_alpha(if self.dark { 100 } else { 40 }),
        };

        visuals
    }
}

/// Apply the settings theme to the context.
pub fn apply_theme(ctx: &egui::Context, theme: Theme) {
    ctx.set_visuals(ThemeColors::from_theme(theme).to_visuals());
}
