//! Syntax Highlighting for the editor surface
//!
//! Wraps syntect: the syntax and theme sets are loaded once into a global
//! [`SyntaxHighlighter`], and file content is turned into an egui
//! [`LayoutJob`] for the `TextEdit` layouter. The last job is cached so an
//! unchanged buffer is not re-highlighted every frame.

use eframe::egui::text::{LayoutJob, TextFormat};
use eframe::egui::{Color32, FontId, Stroke};
use log::{debug, warn};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, OnceLock};
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Style, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

/// Default dark theme name from syntect's built-in themes
pub const DEFAULT_DARK_THEME: &str = "base16-ocean.dark";

/// Default light theme name from syntect's built-in themes
pub const DEFAULT_LIGHT_THEME: &str = "InspiredGitHub";

// ─────────────────────────────────────────────────────────────────────────────
// Language Detection
// ─────────────────────────────────────────────────────────────────────────────

/// Display name of the language for a file extension.
pub fn language_label(extension: Option<&str>) -> &'static str {
    match extension.unwrap_or("") {
        "ts" => "TypeScript",
        "tsx" => "TypeScript React",
        "js" | "mjs" | "cjs" => "JavaScript",
        "jsx" => "JavaScript React",
        "c" | "h" => "C",
        "cpp" | "cc" | "cxx" | "hpp" => "C++",
        "rs" => "Rust",
        "py" => "Python",
        "go" => "Go",
        "java" => "Java",
        "json" => "JSON",
        "md" | "markdown" => "Markdown",
        "html" | "htm" => "HTML",
        "css" => "CSS",
        "yaml" | "yml" => "YAML",
        "toml" => "TOML",
        "sh" | "bash" => "Shell",
        _ => "Plain Text",
    }
}

/// Extension syntect knows for a file extension.
///
/// The bundled syntaxes have no TypeScript grammar, so TS and JSX files are
/// highlighted as JavaScript.
fn syntax_extension(extension: &str) -> &str {
    match extension {
        "ts" | "tsx" | "jsx" | "mjs" | "cjs" => "js",
        "cc" | "cxx" | "hpp" => "cpp",
        "markdown" => "md",
        "yml" => "yaml",
        "bash" | "zsh" => "sh",
        other => other,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Syntax Highlighter
// ─────────────────────────────────────────────────────────────────────────────

/// Cached syntect state plus the most recent layout.
pub struct SyntaxHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    last_job: Mutex<Option<(u64, LayoutJob)>>,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxHighlighter {
    /// Load the default syntaxes and themes bundled with syntect.
    pub fn new() -> Self {
        debug!("Loading syntect syntax and theme sets");
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let theme_set = ThemeSet::load_defaults();
        debug!(
            "Loaded {} syntaxes and {} themes",
            syntax_set.syntaxes().len(),
            theme_set.themes.len()
        );
        Self {
            syntax_set,
            theme_set,
            last_job: Mutex::new(None),
        }
    }

    fn theme_for_mode(&self, dark_mode: bool) -> Option<&Theme> {
        let name = if dark_mode {
            DEFAULT_DARK_THEME
        } else {
            DEFAULT_LIGHT_THEME
        };
        self.theme_set
            .themes
            .get(name)
            .or_else(|| self.theme_set.themes.values().next())
    }

    fn find_syntax(&self, extension: Option<&str>) -> Option<&SyntaxReference> {
        let ext = syntax_extension(extension?);
        self.syntax_set.find_syntax_by_extension(ext)
    }

    /// Lay out `code` with highlighting for `extension`.
    ///
    /// Unknown languages and highlighting failures fall back to plain text in
    /// `fallback_color`.
    pub fn layout_job(
        &self,
        code: &str,
        extension: Option<&str>,
        dark_mode: bool,
        font_size: f32,
        fallback_color: Color32,
    ) -> LayoutJob {
        let key = cache_key(code, extension, dark_mode, font_size);
        if let Ok(cache) = self.last_job.lock() {
            if let Some((cached_key, job)) = cache.as_ref() {
                if *cached_key == key {
                    return job.clone();
                }
            }
        }

        let job = self.build_job(code, extension, dark_mode, font_size, fallback_color);
        if let Ok(mut cache) = self.last_job.lock() {
            *cache = Some((key, job.clone()));
        }
        job
    }

    fn build_job(
        &self,
        code: &str,
        extension: Option<&str>,
        dark_mode: bool,
        font_size: f32,
        fallback_color: Color32,
    ) -> LayoutJob {
        let font_id = FontId::monospace(font_size);
        let mut job = LayoutJob::default();

        let (Some(syntax), Some(theme)) = (self.find_syntax(extension), self.theme_for_mode(dark_mode))
        else {
            job.append(code, 0.0, TextFormat::simple(font_id, fallback_color));
            return job;
        };

        let mut highlighter = HighlightLines::new(syntax, theme);
        for line in LinesWithEndings::from(code) {
            match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(ranges) => {
                    for (style, text) in ranges {
                        job.append(text, 0.0, style_to_format(style, &font_id));
                    }
                }
                Err(e) => {
                    warn!("Failed to highlight line: {}", e);
                    job.append(line, 0.0, TextFormat::simple(font_id.clone(), fallback_color));
                }
            }
        }
        job
    }
}

fn cache_key(code: &str, extension: Option<&str>, dark_mode: bool, font_size: f32) -> u64 {
    let mut hasher = DefaultHasher::new();
    code.hash(&mut hasher);
    extension.hash(&mut hasher);
    dark_mode.hash(&mut hasher);
    font_size.to_bits().hash(&mut hasher);
    hasher.finish()
}

/// Convert syntect Color to egui Color32.
pub fn syntect_to_egui_color(color: syntect::highlighting::Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

fn style_to_format(style: Style, font_id: &FontId) -> TextFormat {
    let color = syntect_to_egui_color(style.foreground);
    let mut format = TextFormat::simple(font_id.clone(), color);
    format.italics = style.font_style.contains(FontStyle::ITALIC);
    if style.font_style.contains(FontStyle::UNDERLINE) {
        format.underline = Stroke::new(1.0, color);
    }
    format
}

// ─────────────────────────────────────────────────────────────────────────────
// Global Highlighter Instance
// ─────────────────────────────────────────────────────────────────────────────

static HIGHLIGHTER: OnceLock<SyntaxHighlighter> = OnceLock::new();

/// Get or create the global syntax highlighter.
pub fn get_highlighter() -> &'static SyntaxHighlighter {
    HIGHLIGHTER.get_or_init(SyntaxHighlighter::new)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_labels() {
        assert_eq!(language_label(Some("ts")), "TypeScript");
        assert_eq!(language_label(Some("cpp")), "C++");
        assert_eq!(language_label(Some("weird")), "Plain Text");
        assert_eq!(language_label(None), "Plain Text");
    }

    #[test]
    fn test_typescript_falls_back_to_javascript_grammar() {
        let highlighter = get_highlighter();
        assert!(highlighter.find_syntax(Some("ts")).is_some());
        assert!(highlighter.find_syntax(Some("cpp")).is_some());
        assert!(highlighter.find_syntax(None).is_none());
    }

    #[test]
    fn test_layout_job_keeps_text() {
        let highlighter = SyntaxHighlighter::new();
        let code = "const a = 1;\nlet b = 'x';\n";
        let job = highlighter.layout_job(code, Some("ts"), true, 14.0, Color32::GRAY);
        assert_eq!(job.text, code);
        assert!(job.sections.len() > 1);
    }

    #[test]
    fn test_unknown_language_is_single_plain_section() {
        let highlighter = SyntaxHighlighter::new();
        let job = highlighter.layout_job("hello", Some("zzz"), false, 12.0, Color32::RED);
        assert_eq!(job.text, "hello");
        assert_eq!(job.sections.len(), 1);
        assert_eq!(job.sections[0].format.color, Color32::RED);
    }

    #[test]
    fn test_layout_job_cache_returns_same_layout() {
        let highlighter = SyntaxHighlighter::new();
        let first = highlighter.layout_job("int x;", Some("c"), true, 14.0, Color32::GRAY);
        let second = highlighter.layout_job("int x;", Some("c"), true, 14.0, Color32::GRAY);
        assert_eq!(first.text, second.text);
        assert_eq!(first.sections.len(), second.sections.len());
    }

    #[test]
    fn test_syntect_to_egui_color() {
        let color = syntect_to_egui_color(syntect::highlighting::Color {
            r: 255,
            g: 128,
            b: 64,
            a: 255,
        });
        assert_eq!((color.r(), color.g(), color.b()), (255, 128, 64));
    }
}
