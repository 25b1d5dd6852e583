//! Text editor widget for Codepad
//!
//! Wraps egui's `TextEdit` with syntect highlighting, a line-number gutter
//! and font sizing from settings. The widget edits a plain `String`; callers
//! decide what to do when it reports a change.

use super::highlight::get_highlighter;
use crate::theme::ThemeColors;
use eframe::egui::{self, FontId, ScrollArea, TextEdit, Ui};
use std::sync::Arc;

/// Result of showing the editor widget.
pub struct EditorOutput {
    /// Whether the content was modified.
    pub changed: bool,
    /// Whether the editor surface was clicked.
    pub clicked: bool,
}

/// A text editor widget over a content buffer.
///
/// # Example
///
/// ```ignore
/// EditorWidget::new(&mut buffer, colors)
///     .extension(Some("ts"))
///     .font_size(settings.font_size)
///     .show_line_numbers(true)
///     .show(ui);
/// ```
pub struct EditorWidget<'a> {
    content: &'a mut String,
    colors: ThemeColors,
    extension: Option<&'a str>,
    font_size: f32,
    word_wrap: bool,
    show_line_numbers: bool,
    id: Option<egui::Id>,
}

impl<'a> EditorWidget<'a> {
    /// Create a new editor widget for the given buffer.
    pub fn new(content: &'a mut String, colors: ThemeColors) -> Self {
        Self {
            content,
            colors,
            extension: None,
            font_size: 14.0,
            word_wrap: false,
            show_line_numbers: true,
            id: None,
        }
    }

    /// File extension used to pick the highlighting grammar.
    #[must_use]
    pub fn extension(mut self, extension: Option<&'a str>) -> Self {
        self.extension = extension;
        self
    }

    #[must_use]
    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    #[must_use]
    pub fn word_wrap(mut self, wrap: bool) -> Self {
        self.word_wrap = wrap;
        self
    }

    #[must_use]
    pub fn show_line_numbers(mut self, show: bool) -> Self {
        self.show_line_numbers = show;
        self
    }

    /// Set a custom ID for the editor (one per tab keeps cursor state apart).
    #[must_use]
    pub fn id(mut self, id: egui::Id) -> Self {
        self.id = Some(id);
        self
    }

    /// Show the editor widget and return the output.
    pub fn show(self, ui: &mut Ui) -> EditorOutput {
        let id = self.id.unwrap_or_else(|| ui.id().with("editor"));
        let font_size = self.font_size;
        let word_wrap = self.word_wrap;
        let colors = self.colors;
        let extension = self.extension.map(str::to_string);
        let font_id = FontId::monospace(font_size);

        let gutter_width = if self.show_line_numbers {
            gutter_width(count_lines(self.content), font_size)
        } else {
            0.0
        };

        let mut layouter = move |ui: &Ui, text: &str, wrap_width: f32| -> Arc<egui::Galley> {
            let mut job = get_highlighter().layout_job(
                text,
                extension.as_deref(),
                colors.is_dark(),
                font_size,
                colors.text,
            );
            job.wrap.max_width = if word_wrap { wrap_width } else { f32::INFINITY };
            ui.fonts(|f| f.layout_job(job))
        };

        let content = self.content;
        let show_line_numbers = self.show_line_numbers;

        let scroll_output = ScrollArea::both()
            .id_source(id.with("scroll"))
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.horizontal_top(|ui| {
                    let gutter_rect = show_line_numbers.then(|| {
                        let line_height = ui.fonts(|f| f.row_height(&font_id));
                        let total_height = count_lines(content) as f32 * line_height;
                        let (rect, _) = ui.allocate_exact_size(
                            egui::vec2(gutter_width, total_height.max(ui.available_height())),
                            egui::Sense::hover(),
                        );
                        rect
                    });

                    let text_output = TextEdit::multiline(content)
                        .id(id)
                        .frame(false)
                        .font(font_id.clone())
                        .lock_focus(true)
                        .desired_width(f32::INFINITY)
                        .desired_rows(1)
                        .layouter(&mut layouter)
                        .show(ui);

                    if let Some(gutter_rect) = gutter_rect {
                        paint_gutter(
                            ui,
                            gutter_rect,
                            &text_output.galley,
                            text_output.galley_pos,
                            &font_id,
                            &colors,
                        );
                    }

                    text_output
                })
                .inner
            });

        let response = &scroll_output.inner.response;
        EditorOutput {
            changed: response.changed(),
            clicked: response.clicked(),
        }
    }
}

/// Number of logical lines in `text`; an empty buffer still has one.
pub fn count_lines(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'\n').count() + 1
}

/// Width of the line-number gutter for `line_count` lines.
fn gutter_width(line_count: usize, font_size: f32) -> f32 {
    let digits = line_count.max(1).to_string().len();
    let char_width = font_size * 0.6;
    (char_width * digits as f32 + 20.0).max(30.0)
}

/// Draw line numbers aligned with the galley's logical lines.
fn paint_gutter(
    ui: &Ui,
    gutter_rect: egui::Rect,
    galley: &egui::Galley,
    galley_pos: egui::Pos2,
    font_id: &FontId,
    colors: &ThemeColors,
) {
    let painter = ui.painter();
    painter.rect_filled(gutter_rect, 0.0, colors.gutter_bg);

    // With word wrap several rows share one logical line
    let mut logical_line = 0usize;
    let mut drawn_for_line = false;
    for row in galley.rows.iter() {
        if !drawn_for_line {
            painter.text(
                egui::pos2(gutter_rect.right() - 12.0, galley_pos.y + row.rect.min.y),
                egui::Align2::RIGHT_TOP,
                (logical_line + 1).to_string(),
                font_id.clone(),
                colors.gutter_fg,
            );
            drawn_for_line = true;
        }
        if row.ends_with_newline {
            logical_line += 1;
            drawn_for_line = false;
        }
    }

    if galley.rows.is_empty() {
        painter.text(
            egui::pos2(gutter_rect.right() - 12.0, galley_pos.y),
            egui::Align2::RIGHT_TOP,
            "1",
            font_id.clone(),
            colors.gutter_fg,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_lines() {
        assert_eq!(count_lines(""), 1);
        assert_eq!(count_lines("one"), 1);
        assert_eq!(count_lines("a\nb\n"), 3);
        assert_eq!(count_lines("\r\n\r\n"), 3);
    }

    #[test]
    fn test_gutter_width_grows_with_digits() {
        let narrow = gutter_width(9, 14.0);
        let wide = gutter_width(1000, 14.0);
        assert!(wide > narrow);
        assert!(gutter_width(0, 8.0) >= 30.0);
    }
}
