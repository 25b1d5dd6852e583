//! Importing dropped and picked files.
//!
//! Reads happen off the UI thread: [`FileReader`] spawns one short-lived
//! thread per file and hands completed reads back over a channel, so several
//! dropped files import independently and land in completion order.
//! Classification, size checks and the extension allow-list live here too;
//! duplicate checks are left to the file store.

use super::entry::{extension_of, join_path, FileEntry};
use crate::config::Settings;
use log::{debug, warn};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};

/// Extensions always treated as text, regardless of reported MIME type.
const TEXT_EXTENSIONS: &[&str] = &[
    "ts", "tsx", "js", "jsx", "mjs", "cjs", "c", "h", "cpp", "cc", "cxx", "hpp", "rs", "go",
    "py", "rb", "java", "kt", "cs", "php", "swift", "sh", "bash", "zsh", "ps1", "json", "jsonc",
    "yaml", "yml", "toml", "ini", "cfg", "xml", "html", "htm", "css", "scss", "less", "md",
    "markdown", "txt", "csv", "sql", "lua", "vue", "svelte", "graphql", "env", "log",
];

/// Non-`text/` MIME types that still carry text.
const TEXT_MIME_TYPES: &[&str] = &[
    "application/json",
    "application/javascript",
    "application/typescript",
    "application/x-typescript",
    "application/xml",
    "application/x-sh",
    "application/toml",
    "application/x-yaml",
    "image/svg+xml",
];

// ─────────────────────────────────────────────────────────────────────────────
// Classification
// ─────────────────────────────────────────────────────────────────────────────

/// How a file's content is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Stored as a UTF-8 string
    Text,
    /// Stored as base64
    Binary,
}

/// Classify a file as text or binary by MIME prefix or extension allow-list.
pub fn classify(name: &str, mime_type: &str) -> ContentKind {
    let mime = mime_type.to_lowercase();
    if mime.starts_with("text/") || TEXT_MIME_TYPES.contains(&mime.as_str()) {
        return ContentKind::Text;
    }
    match extension_of(name) {
        Some(ext) if TEXT_EXTENSIONS.contains(&ext.as_str()) => ContentKind::Text,
        _ => ContentKind::Binary,
    }
}

/// Best-effort MIME type from a file name, for sources that report none.
pub fn guess_mime(name: &str) -> &'static str {
    match extension_of(name).as_deref() {
        Some("ts") | Some("tsx") => "text/typescript",
        Some("js") | Some("jsx") | Some("mjs") | Some("cjs") => "text/javascript",
        Some("c") | Some("h") => "text/x-c",
        Some("cpp") | Some("cc") | Some("cxx") | Some("hpp") => "text/x-c++",
        Some("rs") => "text/rust",
        Some("py") => "text/x-python",
        Some("json") => "application/json",
        Some("md") | Some("markdown") => "text/markdown",
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some(ext) if TEXT_EXTENSIONS.contains(&ext) => "text/plain",
        _ => "application/octet-stream",
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rejections
// ─────────────────────────────────────────────────────────────────────────────

/// Why a file was not imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportRejection {
    /// File is larger than the configured limit
    TooLarge { name: String, size: u64, limit: u64 },
    /// Another entry already uses this name
    DuplicateName { name: String },
    /// Another entry already uses this path
    DuplicatePath { path: String },
    /// Extension is not in the allow-list
    DisallowedExtension { name: String },
    /// The file could not be read
    ReadFailed { name: String, message: String },
    /// The file cannot be placed in the store
    Invalid { name: String, reason: String },
}

impl fmt::Display for ImportRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportRejection::TooLarge { name, limit, .. } => write!(
                f,
                "{}: file is larger than {} MB",
                name,
                limit / (1024 * 1024)
            ),
            ImportRejection::DuplicateName { name } => {
                write!(f, "{}: a file with this name already exists", name)
            }
            ImportRejection::DuplicatePath { path } => {
                write!(f, "{}: this path already exists", path)
            }
            ImportRejection::DisallowedExtension { name } => {
                write!(f, "{}: file type is not allowed", name)
            }
            ImportRejection::ReadFailed { name, message } => {
                write!(f, "{}: could not be read ({})", name, message)
            }
            ImportRejection::Invalid { name, reason } => write!(f, "{}: {}", name, reason),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Import Rules
// ─────────────────────────────────────────────────────────────────────────────

/// Validation limits applied to every incoming file.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRules {
    pub max_file_size: u64,
    pub restrict_extensions: bool,
    /// Lowercase, with leading dot
    pub allowed_extensions: Vec<String>,
}

impl ImportRules {
    /// Build rules from user settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            max_file_size: settings.max_file_size,
            restrict_extensions: settings.restrict_extensions,
            allowed_extensions: settings.allowed_extensions.clone(),
        }
    }

    /// Reject files over the size limit.
    pub fn check_size(&self, name: &str, size: u64) -> Result<(), ImportRejection> {
        if size > self.max_file_size {
            return Err(ImportRejection::TooLarge {
                name: name.to_string(),
                size,
                limit: self.max_file_size,
            });
        }
        Ok(())
    }

    /// Reject files outside the extension allow-list, when it is enforced.
    pub fn check_extension(&self, name: &str) -> Result<(), ImportRejection> {
        if !self.restrict_extensions {
            return Ok(());
        }
        let allowed = extension_of(name)
            .map(|ext| format!(".{}", ext))
            .map(|ext| self.allowed_extensions.contains(&ext))
            .unwrap_or(false);
        if allowed {
            Ok(())
        } else {
            Err(ImportRejection::DisallowedExtension {
                name: name.to_string(),
            })
        }
    }
}

impl Default for ImportRules {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Imported File
// ─────────────────────────────────────────────────────────────────────────────

/// A file whose bytes have been read and is ready to become an entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImportedFile {
    /// Create from a name and bytes; an empty MIME type is guessed from the name.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mut mime_type = mime_type.into();
        if mime_type.is_empty() {
            mime_type = guess_mime(&name).to_string();
        }
        Self {
            name,
            mime_type,
            bytes,
        }
    }

    /// Run size and extension checks.
    pub fn validate(&self, rules: &ImportRules) -> Result<(), ImportRejection> {
        rules.check_size(&self.name, self.bytes.len() as u64)?;
        rules.check_extension(&self.name)
    }

    /// Turn into an entry placed under `parent` (root when `None`).
    ///
    /// Text-classified files that are not valid UTF-8 are stored as base64.
    pub fn into_entry(self, parent: Option<&str>) -> FileEntry {
        let path = join_path(parent, &self.name);
        match classify(&self.name, &self.mime_type) {
            ContentKind::Text => match String::from_utf8(self.bytes) {
                Ok(text) => FileEntry::text(&path, text, self.mime_type),
                Err(e) => {
                    debug!("{} is not valid UTF-8, storing as base64", self.name);
                    FileEntry::binary(&path, e.as_bytes(), self.mime_type)
                }
            },
            ContentKind::Binary => FileEntry::binary(&path, &self.bytes, self.mime_type),
        }
    }
}

/// Outcome of one background read.
pub type ReadOutcome = Result<ImportedFile, ImportRejection>;

// ─────────────────────────────────────────────────────────────────────────────
// Import Report
// ─────────────────────────────────────────────────────────────────────────────

/// Result of importing a batch of files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// Paths of the entries that were added
    pub accepted: Vec<String>,
    /// Files that were turned away
    pub rejected: Vec<ImportRejection>,
}

impl ImportReport {
    /// All rejection reasons joined with newlines, or `None` if nothing was rejected.
    pub fn error_message(&self) -> Option<String> {
        if self.rejected.is_empty() {
            return None;
        }
        Some(
            self.rejected
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Background File Reader
// ─────────────────────────────────────────────────────────────────────────────

/// Reads files on background threads and reports completed reads.
#[derive(Debug)]
pub struct FileReader {
    sender: Sender<ReadOutcome>,
    receiver: Receiver<ReadOutcome>,
    in_flight: usize,
    max_file_size: u64,
}

impl FileReader {
    /// Create a reader that rejects files over `max_file_size` before reading.
    pub fn new(max_file_size: u64) -> Self {
        let (sender, receiver) = channel();
        Self {
            sender,
            receiver,
            in_flight: 0,
            max_file_size,
        }
    }

    /// Start reading `path` in the background.
    pub fn read_path(&mut self, path: PathBuf, mime_type: String) {
        let sender = self.sender.clone();
        let limit = self.max_file_size;
        self.in_flight += 1;
        std::thread::spawn(move || {
            let outcome = read_file(&path, mime_type, limit);
            // Receiver gone means the app is shutting down
            let _ = sender.send(outcome);
        });
    }

    /// Queue a file whose bytes are already in memory.
    pub fn push_bytes(&mut self, name: String, mime_type: String, bytes: Vec<u8>) {
        self.in_flight += 1;
        let _ = self
            .sender
            .send(Ok(ImportedFile::new(name, mime_type, bytes)));
    }

    /// Number of reads started but not yet collected.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Collect all reads completed since the last poll. Non-blocking.
    pub fn poll(&mut self) -> Vec<ReadOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(outcome) = self.receiver.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            outcomes.push(outcome);
        }
        outcomes
    }
}

/// Read one file, checking its size before loading it.
fn read_file(path: &Path, mime_type: String, limit: u64) -> ReadOutcome {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let read_failed = |e: std::io::Error| {
        warn!("Failed to read dropped file {}: {}", path.display(), e);
        ImportRejection::ReadFailed {
            name: name.clone(),
            message: e.to_string(),
        }
    };

    let metadata = fs::metadata(path).map_err(read_failed)?;
    if metadata.is_dir() {
        return Err(ImportRejection::ReadFailed {
            name,
            message: "folders cannot be imported".to_string(),
        });
    }
    if metadata.len() > limit {
        return Err(ImportRejection::TooLarge {
            name,
            size: metadata.len(),
            limit,
        });
    }

    let bytes = fs::read(path).map_err(read_failed)?;
    debug!("Read {} ({} bytes)", path.display(), bytes.len());
    Ok(ImportedFile::new(name, mime_type, bytes))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    fn wait_for(reader: &mut FileReader, count: usize) -> Vec<ReadOutcome> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut outcomes = Vec::new();
        while outcomes.len() < count && Instant::now() < deadline {
            outcomes.extend(reader.poll());
            std::thread::sleep(Duration::from_millis(5));
        }
        outcomes
    }

    #[test]
    fn test_classify_by_mime_prefix() {
        assert_eq!(classify("notes", "text/plain"), ContentKind::Text);
        assert_eq!(classify("data", "application/json"), ContentKind::Text);
        assert_eq!(classify("logo.png", "image/png"), ContentKind::Binary);
    }

    #[test]
    fn test_classify_by_extension() {
        assert_eq!(classify("main.ts", ""), ContentKind::Text);
        assert_eq!(classify("main.CPP", "application/octet-stream"), ContentKind::Text);
        assert_eq!(classify("archive.zip", ""), ContentKind::Binary);
        assert_eq!(classify("Makefile", ""), ContentKind::Binary);
    }

    #[test]
    fn test_guess_mime() {
        assert_eq!(guess_mime("a.ts"), "text/typescript");
        assert_eq!(guess_mime("a.png"), "image/png");
        assert_eq!(guess_mime("a.yaml"), "text/plain");
        assert_eq!(guess_mime("blob"), "application/octet-stream");
    }

    #[test]
    fn test_imported_file_guesses_empty_mime() {
        let file = ImportedFile::new("a.js", "", b"1".to_vec());
        assert_eq!(file.mime_type, "text/javascript");
    }

    #[test]
    fn test_rules_size_limit() {
        let rules = ImportRules {
            max_file_size: 10,
            ..ImportRules::default()
        };
        assert!(rules.check_size("a.ts", 10).is_ok());
        assert!(matches!(
            rules.check_size("a.ts", 11),
            Err(ImportRejection::TooLarge { size: 11, limit: 10, .. })
        ));
    }

    #[test]
    fn test_rules_extension_allow_list() {
        let mut rules = ImportRules::default();
        assert!(rules.check_extension("photo.png").is_ok());

        rules.restrict_extensions = true;
        assert!(rules.check_extension("main.tsx").is_ok());
        assert!(rules.check_extension("MAIN.CPP").is_ok());
        assert!(rules.check_extension("photo.png").is_err());
        assert!(rules.check_extension("Makefile").is_err());
    }

    #[test]
    fn test_into_entry_text_and_binary() {
        let text = ImportedFile::new("a.ts", "", b"let a = 1;".to_vec()).into_entry(None);
        assert_eq!(text.path, "a.ts");
        assert!(!text.is_base64);
        assert_eq!(text.content, "let a = 1;");

        let bytes = vec![0x89, b'P', b'N', b'G'];
        let binary = ImportedFile::new("logo.png", "image/png", bytes.clone()).into_entry(Some("img"));
        assert_eq!(binary.path, "img/logo.png");
        assert!(binary.is_base64);
        assert_eq!(binary.decoded_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_into_entry_invalid_utf8_falls_back_to_base64() {
        let bytes = vec![0xff, 0xfe, 0x00];
        let entry = ImportedFile::new("weird.txt", "text/plain", bytes.clone()).into_entry(None);
        assert!(entry.is_base64);
        assert_eq!(entry.decoded_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_report_error_message_joins_lines() {
        let report = ImportReport {
            accepted: vec!["a.ts".to_string()],
            rejected: vec![
                ImportRejection::DuplicateName {
                    name: "b.ts".to_string(),
                },
                ImportRejection::TooLarge {
                    name: "big.bin".to_string(),
                    size: 6 * 1024 * 1024,
                    limit: 5 * 1024 * 1024,
                },
            ],
        };
        assert_eq!(
            report.error_message().unwrap(),
            "b.ts: a file with this name already exists\nbig.bin: file is larger than 5 MB"
        );
        assert_eq!(ImportReport::default().error_message(), None);
    }

    #[test]
    fn test_file_reader_reads_paths_in_background() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.ts");
        let b = temp.path().join("b.ts");
        fs::write(&a, "x").unwrap();
        fs::write(&b, "y").unwrap();

        let mut reader = FileReader::new(1024);
        reader.read_path(a, String::new());
        reader.read_path(b, String::new());
        assert_eq!(reader.in_flight(), 2);

        let outcomes = wait_for(&mut reader, 2);
        assert_eq!(outcomes.len(), 2);
        assert_eq!(reader.in_flight(), 0);

        let mut names: Vec<String> = outcomes
            .into_iter()
            .map(|o| o.unwrap().name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.ts", "b.ts"]);
    }

    #[test]
    fn test_file_reader_rejects_oversized_before_reading() {
        let temp = TempDir::new().unwrap();
        let big = temp.path().join("big.txt");
        fs::write(&big, vec![b'a'; 64]).unwrap();

        let mut reader = FileReader::new(16);
        reader.read_path(big, String::new());

        let outcomes = wait_for(&mut reader, 1);
        assert!(matches!(
            outcomes[0],
            Err(ImportRejection::TooLarge { size: 64, limit: 16, .. })
        ));
    }

    #[test]
    fn test_file_reader_reports_missing_file() {
        let temp = TempDir::new().unwrap();
        let mut reader = FileReader::new(1024);
        reader.read_path(temp.path().join("missing.ts"), String::new());

        let outcomes = wait_for(&mut reader, 1);
        assert!(matches!(outcomes[0], Err(ImportRejection::ReadFailed { .. })));
    }

    #[test]
    fn test_file_reader_push_bytes() {
        let mut reader = FileReader::new(1024);
        reader.push_bytes("c.ts".to_string(), String::new(), b"z".to_vec());
        let outcomes = reader.poll();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(reader.in_flight(), 0);
        assert_eq!(outcomes[0].as_ref().unwrap().bytes, b"z".to_vec());
    }
}
