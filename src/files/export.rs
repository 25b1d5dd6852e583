//! Writing entries out to the real filesystem ("Download").

use super::entry::FileEntry;
use crate::error::{Error, Result};
use log::info;
use std::fs;
use std::path::Path;

/// Write the decoded content of `entry` to `destination`.
///
/// Base64 entries are decoded first, so a downloaded image is the original
/// image rather than its encoding. Returns the number of bytes written.
pub fn export_entry(entry: &FileEntry, destination: &Path) -> Result<usize> {
    if entry.is_folder() {
        return Err(Error::Application(format!(
            "{} is a folder and cannot be downloaded",
            entry.name
        )));
    }

    let bytes = entry.decoded_bytes()?;
    fs::write(destination, &bytes).map_err(|e| Error::FileWrite {
        path: destination.to_path_buf(),
        source: e,
    })?;

    info!("Downloaded {} to {}", entry.path, destination.display());
    Ok(bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_export_text_entry() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("a.ts");
        let entry = FileEntry::text("src/a.ts", "let a = 1;", "text/typescript");

        assert_eq!(export_entry(&entry, &dest).unwrap(), 10);
        assert_eq!(fs::read_to_string(&dest).unwrap(), "let a = 1;");
    }

    #[test]
    fn test_export_decodes_base64() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("logo.png");
        let bytes = vec![0x89, b'P', b'N', b'G', 0, 1, 2];
        let entry = FileEntry::binary("logo.png", &bytes, "image/png");

        export_entry(&entry, &dest).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), bytes);
    }

    #[test]
    fn test_export_folder_is_rejected() {
        let temp = TempDir::new().unwrap();
        let folder = FileEntry::folder("src");
        assert!(export_entry(&folder, &temp.path().join("src")).is_err());
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("missing").join("a.ts");
        let entry = FileEntry::text("a.ts", "x", "text/plain");
        assert!(matches!(
            export_entry(&entry, &dest),
            Err(Error::FileWrite { .. })
        ));
    }
}
