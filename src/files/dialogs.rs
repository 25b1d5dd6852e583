//! Native file dialog integration using the rfd crate
//!
//! Used for "Open Files…" in the explorer header and for "Download".

use rfd::FileDialog;
use std::path::PathBuf;

/// Source files the editor highlights.
const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "c", "cpp", "h", "hpp", "rs"];
const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "json", "yaml", "yml", "toml"];

/// Opens a native file dialog for selecting multiple files to import.
///
/// Returns the selected paths. Empty if the dialog was cancelled.
pub fn open_files_dialog(initial_dir: Option<&PathBuf>) -> Vec<PathBuf> {
    let mut dialog = FileDialog::new()
        .set_title("Open Files")
        .add_filter("All Files", &["*"])
        .add_filter("Source Files", SOURCE_EXTENSIONS)
        .add_filter("Text Files", TEXT_EXTENSIONS);

    if let Some(dir) = initial_dir {
        dialog = dialog.set_directory(dir);
    }

    dialog.pick_files().unwrap_or_default()
}

/// Opens a native save dialog for downloading an entry.
///
/// Returns `Some(PathBuf)` if a location was selected, `None` if cancelled.
pub fn save_file_dialog(default_name: &str) -> Option<PathBuf> {
    let mut dialog = FileDialog::new()
        .set_title("Download")
        .set_file_name(default_name);

    if let Some(dir) = dirs::download_dir() {
        dialog = dialog.set_directory(dir);
    }

    dialog.save_file()
}
