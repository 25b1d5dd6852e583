//! Editor module for Codepad
//!
//! The text editing surface: a highlighted `TextEdit` with a line-number
//! gutter.

mod highlight;
mod widget;

pub use highlight::language_label;
pub use widget::{count_lines, EditorWidget};
