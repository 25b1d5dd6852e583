//! File and folder entries.
//!
//! A [`FileEntry`] is the unit stored in the file store and cloned into tabs.
//! Identity is the slash-delimited logical `path`; the `id` is a random token
//! used to address a particular record (store entry or tab copy).

use crate::error::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The `type` value marking a folder entry.
pub const FOLDER_TYPE: &str = "folder";

/// Path separator for logical entry paths.
pub const PATH_SEPARATOR: char = '/';

// ─────────────────────────────────────────────────────────────────────────────
// Entry Id
// ─────────────────────────────────────────────────────────────────────────────

/// Unique identifier for an entry or tab.
///
/// Generated from a random v4 UUID so that entries created in the same
/// instant never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Generate a fresh id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// View the id as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Entry
// ─────────────────────────────────────────────────────────────────────────────

/// A file or folder record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub id: EntryId,
    /// Leaf display name
    pub name: String,
    /// Full logical path, e.g. `src/lib/util.ts`
    pub path: String,
    /// UTF-8 text, or base64 data when `is_base64` is set
    #[serde(default)]
    pub content: String,
    /// MIME-like type, or [`FOLDER_TYPE`]
    #[serde(rename = "type", default)]
    pub mime_type: String,
    #[serde(default)]
    pub is_base64: bool,
    /// Advisory; refreshed when the entry is opened in a tab
    #[serde(default = "Utc::now")]
    pub last_opened: DateTime<Utc>,
}

impl FileEntry {
    /// Create a text file entry at `path`.
    pub fn text(path: &str, content: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            id: EntryId::generate(),
            name: leaf_name(path).to_string(),
            path: path.to_string(),
            content: content.into(),
            mime_type: mime_type.into(),
            is_base64: false,
            last_opened: Utc::now(),
        }
    }

    /// Create a binary file entry at `path`, storing `bytes` as base64.
    pub fn binary(path: &str, bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            content: STANDARD.encode(bytes),
            is_base64: true,
            ..Self::text(path, String::new(), mime_type)
        }
    }

    /// Create a folder entry at `path`.
    pub fn folder(path: &str) -> Self {
        Self::text(path, String::new(), FOLDER_TYPE)
    }

    /// Whether this entry is a folder.
    pub fn is_folder(&self) -> bool {
        self.mime_type == FOLDER_TYPE
    }

    /// Path of the containing folder, or `None` at the root.
    pub fn parent_path(&self) -> Option<&str> {
        parent_path(&self.path)
    }

    /// The raw bytes of the content, decoding base64 when needed.
    pub fn decoded_bytes(&self) -> Result<Vec<u8>> {
        if self.is_base64 {
            Ok(STANDARD.decode(self.content.as_bytes())?)
        } else {
            Ok(self.content.as_bytes().to_vec())
        }
    }

    /// Size of the decoded content in bytes (approximate for base64).
    pub fn size_bytes(&self) -> usize {
        if self.is_base64 {
            // Every 4 base64 chars carry 3 bytes, minus padding
            let padding = self.content.bytes().rev().take_while(|&b| b == b'=').count();
            (self.content.len() / 4 * 3).saturating_sub(padding)
        } else {
            self.content.len()
        }
    }

    /// Lowercase extension of the leaf name, without the dot.
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.name)
    }

    /// A copy with a fresh id and `last_opened` set to now.
    pub fn fresh_copy(&self) -> Self {
        Self {
            id: EntryId::generate(),
            last_opened: Utc::now(),
            ..self.clone()
        }
    }

    /// A copy with replaced content; everything else is kept.
    pub fn with_content(&self, content: String) -> Self {
        Self {
            content,
            ..self.clone()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Path Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Last segment of a logical path.
pub fn leaf_name(path: &str) -> &str {
    path.rsplit(PATH_SEPARATOR).next().unwrap_or(path)
}

/// Everything before the last separator, or `None` for root-level paths.
pub fn parent_path(path: &str) -> Option<&str> {
    path.rfind(PATH_SEPARATOR).map(|idx| &path[..idx])
}

/// Join a parent folder path and a leaf name.
pub fn join_path(parent: Option<&str>, name: &str) -> String {
    match parent {
        Some(parent) if !parent.is_empty() => format!("{}{}{}", parent, PATH_SEPARATOR, name),
        _ => name.to_string(),
    }
}

/// Whether `path` lies strictly below `ancestor`.
pub fn is_descendant(path: &str, ancestor: &str) -> bool {
    path.len() > ancestor.len()
        && path.starts_with(ancestor)
        && path[ancestor.len()..].starts_with(PATH_SEPARATOR)
}

/// Every proper ancestor of `path`, outermost first.
///
/// `"a/b/c.ts"` yields `["a", "a/b"]`.
pub fn ancestors(path: &str) -> Vec<&str> {
    path.match_indices(PATH_SEPARATOR)
        .map(|(idx, _)| &path[..idx])
        .collect()
}

/// Lowercase extension of a file name, without the dot.
pub fn extension_of(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_ids_are_unique() {
        let a = FileEntry::text("a.ts", "x", "text/typescript");
        let b = FileEntry::text("a.ts", "x", "text/typescript");
        assert_ne!(a.id, b.id);
        assert_eq!(a.id.as_str().len(), 32);
    }

    #[test]
    fn test_text_entry_fields() {
        let entry = FileEntry::text("src/util/a.ts", "let x = 1;", "text/typescript");
        assert_eq!(entry.name, "a.ts");
        assert_eq!(entry.parent_path(), Some("src/util"));
        assert!(!entry.is_folder());
        assert!(!entry.is_base64);
        assert_eq!(entry.extension().as_deref(), Some("ts"));
    }

    #[test]
    fn test_folder_entry() {
        let folder = FileEntry::folder("src");
        assert!(folder.is_folder());
        assert_eq!(folder.mime_type, "folder");
        assert_eq!(folder.parent_path(), None);
    }

    #[test]
    fn test_binary_entry_decodes() {
        let bytes = [0u8, 159, 146, 150, 255];
        let entry = FileEntry::binary("img/logo.png", &bytes, "image/png");
        assert!(entry.is_base64);
        assert_eq!(entry.decoded_bytes().unwrap(), bytes.to_vec());
        assert_eq!(entry.size_bytes(), bytes.len());
    }

    #[test]
    fn test_text_entry_decoded_bytes_are_utf8() {
        let entry = FileEntry::text("a.ts", "héllo", "text/plain");
        assert_eq!(entry.decoded_bytes().unwrap(), "héllo".as_bytes());
    }

    #[test]
    fn test_corrupt_base64_is_an_error() {
        let mut entry = FileEntry::binary("a.bin", b"abc", "application/octet-stream");
        entry.content = "%%%".to_string();
        assert!(entry.decoded_bytes().is_err());
    }

    #[test]
    fn test_fresh_copy_changes_only_id_and_timestamp() {
        let entry = FileEntry::text("a.ts", "x", "text/plain");
        let copy = entry.fresh_copy();
        assert_ne!(copy.id, entry.id);
        assert_eq!(copy.path, entry.path);
        assert_eq!(copy.content, entry.content);
        assert!(copy.last_opened >= entry.last_opened);
    }

    #[test]
    fn test_path_helpers() {
        assert_eq!(leaf_name("a/b/c.ts"), "c.ts");
        assert_eq!(leaf_name("c.ts"), "c.ts");
        assert_eq!(parent_path("a/b/c.ts"), Some("a/b"));
        assert_eq!(parent_path("c.ts"), None);
        assert_eq!(join_path(Some("a/b"), "c.ts"), "a/b/c.ts");
        assert_eq!(join_path(None, "c.ts"), "c.ts");
        assert_eq!(join_path(Some(""), "c.ts"), "c.ts");
        assert_eq!(ancestors("a/b/c.ts"), vec!["a", "a/b"]);
        assert!(ancestors("c.ts").is_empty());
    }

    #[test]
    fn test_is_descendant_requires_separator() {
        assert!(is_descendant("src/a.ts", "src"));
        assert!(is_descendant("src/lib/a.ts", "src"));
        assert!(!is_descendant("src", "src"));
        assert!(!is_descendant("srcfoo/a.ts", "src"));
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("main.CPP").as_deref(), Some("cpp"));
        assert_eq!(extension_of("Makefile"), None);
        assert_eq!(extension_of(".gitignore"), None);
        assert_eq!(extension_of("archive.tar.gz").as_deref(), Some("gz"));
    }

    #[test]
    fn test_serialization_uses_camel_case_and_type_field() {
        let entry = FileEntry::text("a.ts", "x", "text/typescript");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "text/typescript");
        assert_eq!(json["isBase64"], false);
        assert!(json["lastOpened"].is_string());
        assert!(json.get("children").is_none());
    }

    #[test]
    fn test_deserialize_ignores_legacy_children() {
        let json = r#"{
            "id": "a.ts1700000000000",
            "name": "a.ts",
            "path": "a.ts",
            "content": "x",
            "type": "text/typescript",
            "isBase64": false,
            "lastOpened": "2024-01-01T00:00:00.000Z",
            "children": []
        }"#;
        let entry: FileEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id.as_str(), "a.ts1700000000000");
        assert_eq!(entry.content, "x");
    }
}
