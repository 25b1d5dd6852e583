//! Width and visibility of the resizable details panel.

use crate::storage::{read_json, write_json, KeyValueStore, PANEL_VISIBLE_KEY, PANEL_WIDTH_KEY};
use log::debug;

/// Narrowest the panel may be dragged to.
pub const MIN_PANEL_WIDTH: f32 = 200.0;
/// Widest the panel may be dragged to.
pub const MAX_PANEL_WIDTH: f32 = 600.0;
/// Width before the user has resized anything.
pub const DEFAULT_PANEL_WIDTH: f32 = 256.0;

/// Captured at drag start.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DragOrigin {
    pointer_x: f32,
    width: f32,
}

/// Right-hand panel sizing. The drag handle sits on the panel's left edge, so
/// moving the pointer left widens it.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelResize {
    width: f32,
    visible: bool,
    drag: Option<DragOrigin>,
}

impl Default for PanelResize {
    fn default() -> Self {
        Self {
            width: DEFAULT_PANEL_WIDTH,
            visible: true,
            drag: None,
        }
    }
}

impl PanelResize {
    /// Restore width and visibility from storage, falling back to defaults.
    pub fn load(storage: &dyn KeyValueStore) -> Self {
        let width: f32 = read_json(storage, PANEL_WIDTH_KEY, DEFAULT_PANEL_WIDTH);
        let visible = read_json(storage, PANEL_VISIBLE_KEY, true);
        Self {
            width: clamp_width(width),
            visible,
            drag: None,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Start a resize at pointer position `pointer_x`.
    pub fn begin_drag(&mut self, pointer_x: f32) {
        self.drag = Some(DragOrigin {
            pointer_x,
            width: self.width,
        });
    }

    /// Follow the pointer. Ignored when no drag is active.
    pub fn drag_to(&mut self, pointer_x: f32) {
        if let Some(origin) = self.drag {
            self.width = clamp_width(origin.width + (origin.pointer_x - pointer_x));
        }
    }

    /// Finish a resize and persist the width. Returns whether a drag ended.
    pub fn end_drag(&mut self, storage: &mut dyn KeyValueStore) -> bool {
        if self.drag.take().is_none() {
            return false;
        }
        debug!("Details panel resized to {}px", self.width);
        write_json(storage, PANEL_WIDTH_KEY, &self.width);
        true
    }

    /// Show or hide the panel and persist the choice.
    ///
    /// A drag in progress is finished first: a hidden panel never reports
    /// the end of the drag.
    pub fn toggle(&mut self, storage: &mut dyn KeyValueStore) -> bool {
        self.end_drag(storage);
        self.visible = !self.visible;
        write_json(storage, PANEL_VISIBLE_KEY, &self.visible);
        self.visible
    }
}

fn clamp_width(width: f32) -> f32 {
    if width.is_finite() {
        width.clamp(MIN_PANEL_WIDTH, MAX_PANEL_WIDTH)
    } else {
        DEFAULT_PANEL_WIDTH
    }
}
