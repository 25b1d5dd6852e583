//! File entries and their movement in and out of Codepad
//!
//! This module provides the entry model, importing of dropped or picked
//! files, downloading entries, the native dialogs used for both, and copying
//! paths to the clipboard.

pub mod clipboard;
pub mod dialogs;
pub mod entry;
pub mod export;
pub mod import;

pub use entry::{EntryId, FileEntry};
pub use import::{FileReader, ImportRejection, ImportReport, ImportRules, ImportedFile};
