//! User settings and preferences for Codepad
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Theme Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Available color themes for the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Whether this theme uses a dark palette.
    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }

    /// Switch to the other theme.
    pub fn toggle(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Window Size Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Window dimensions and position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    /// Window width in pixels
    pub width: f32,
    /// Window height in pixels
    pub height: f32,
    /// Window X position (optional, for restoring position)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    /// Window Y position (optional, for restoring position)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    /// Whether the window was maximized
    #[serde(default)]
    pub maximized: bool,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            x: None,
            y: None,
            maximized: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences and editor limits.
///
/// Missing fields in the config file fall back to their defaults, and
/// out-of-range values are clamped by [`Settings::sanitize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Appearance
    // ─────────────────────────────────────────────────────────────────────────
    /// Color theme
    pub theme: Theme,

    /// Whether to show the line number gutter
    pub show_line_numbers: bool,

    /// Editor font size in points
    pub font_size: f32,

    /// Whether long lines wrap
    pub word_wrap: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Tabs & History
    // ─────────────────────────────────────────────────────────────────────────
    /// Maximum number of open tabs before the oldest is evicted
    pub max_open_tabs: usize,

    /// Length of the recently-opened list
    pub max_recent_files: usize,

    // ─────────────────────────────────────────────────────────────────────────
    // Persistence & Import
    // ─────────────────────────────────────────────────────────────────────────
    /// Delay before an edit is written to storage, in milliseconds
    pub save_debounce_ms: u64,

    /// Largest file accepted by import, in bytes
    pub max_file_size: u64,

    /// Reject imported files whose extension is not in `allowed_extensions`
    pub restrict_extensions: bool,

    /// Extensions accepted when `restrict_extensions` is set (with leading dot)
    pub allowed_extensions: Vec<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Window State
    // ─────────────────────────────────────────────────────────────────────────
    /// Last window size and position
    pub window_size: WindowSize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Appearance
            theme: Theme::default(),
            show_line_numbers: true,
            font_size: 14.0,
            word_wrap: false,

            // Tabs & History
            max_open_tabs: 10,
            max_recent_files: 10,

            // Persistence & Import
            save_debounce_ms: 1000,
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            restrict_extensions: false,
            allowed_extensions: [".ts", ".tsx", ".js", ".jsx", ".c", ".cpp"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),

            // Window State
            window_size: WindowSize::default(),
        }
    }
}

impl Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    pub const MIN_FONT_SIZE: f32 = 8.0;
    pub const MAX_FONT_SIZE: f32 = 40.0;
    /// Step used by Ctrl +/- and Ctrl+wheel zoom.
    pub const FONT_SIZE_STEP: f32 = 2.0;
    pub const MIN_OPEN_TABS: usize = 1;
    pub const MAX_OPEN_TABS: usize = 50;
    pub const MIN_DEBOUNCE_MS: u64 = 100;
    pub const MAX_DEBOUNCE_MS: u64 = 10_000;
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;
    pub const MIN_WINDOW_SIZE: f32 = 200.0;
    pub const MAX_WINDOW_SIZE: f32 = 10000.0;

    /// Clamp all values into their valid ranges.
    pub fn sanitize(&mut self) {
        self.font_size = self
            .font_size
            .clamp(Self::MIN_FONT_SIZE, Self::MAX_FONT_SIZE);

        self.max_open_tabs = self
            .max_open_tabs
            .clamp(Self::MIN_OPEN_TABS, Self::MAX_OPEN_TABS);

        if self.max_recent_files == 0 {
            self.max_recent_files = 10;
        } else if self.max_recent_files > 100 {
            self.max_recent_files = 100;
        }

        self.save_debounce_ms = self
            .save_debounce_ms
            .clamp(Self::MIN_DEBOUNCE_MS, Self::MAX_DEBOUNCE_MS);

        if self.max_file_size == 0 {
            self.max_file_size = Self::DEFAULT_MAX_FILE_SIZE;
        }

        // Normalize extensions to lowercase with a leading dot
        self.allowed_extensions = self
            .allowed_extensions
            .iter()
            .map(|ext| ext.trim().to_lowercase())
            .filter(|ext| !ext.is_empty() && ext != ".")
            .map(|ext| {
                if ext.starts_with('.') {
                    ext
                } else {
                    format!(".{}", ext)
                }
            })
            .collect();

        self.window_size.width = self
            .window_size
            .width
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
        self.window_size.height = self
            .window_size
            .height
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
    }

    /// Parse settings from JSON and clamp the result.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Grow the editor font by one step. Returns the new size.
    pub fn zoom_in(&mut self) -> f32 {
        self.font_size = (self.font_size + Self::FONT_SIZE_STEP).min(Self::MAX_FONT_SIZE);
        self.font_size
    }

    /// Shrink the editor font by one step. Returns the new size.
    pub fn zoom_out(&mut self) -> f32 {
        self.font_size = (self.font_size - Self::FONT_SIZE_STEP).max(Self::MIN_FONT_SIZE);
        self.font_size
    }

    /// The save debounce delay as a `Duration`.
    pub fn save_debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.save_debounce_ms)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
