//! Error types for Bindery Core

use thiserror::Error;

/// Result type alias using BinderyError
pub type Result<T> = std::result::Result<T, BinderyError>;

/// Top-level error type for all Bindery operations
#[derive(Debug, Error)]
pub enum BinderyError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Read error: {0}")]
    Read(#[from] ReadError),

    #[error("Pre-flight check failed: {0}")]
    Preflight(#[from] PreflightError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("Package error: {0}")]
    Package(#[from] PackageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors in the project metadata file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Metadata file not found: {0}")]
    MissingFile(String),

    #[error("Malformed metadata line {line_number}: {line:?} (expected `key = value`)")]
    MalformedLine { line_number: usize, line: String },

    #[error("Missing required metadata key: {0}")]
    MissingKey(&'static str),
}

/// Errors that occur while reading project entities
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Unknown extension: {0}")]
    UnknownExtension(String),

    #[error("Not a chapter source: {0}")]
    NotAChapter(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid UTF-8 in {0}")]
    InvalidUtf8(String),

    #[error("Section {0} must start with a chapter file, not a directory")]
    SectionHeadIsDirectory(String),

    #[error("Path escapes the project root: {0}")]
    PathTraversal(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Fatal invariant violations found before anything is written
#[derive(Debug, Error)]
pub enum PreflightError {
    #[error("The book doesn't have chapter titles")]
    NoChapterTitles,

    #[error("Invalid titles: {}", format_invalid_titles(.0))]
    InvalidTitles(Vec<InvalidTitle>),

    #[error("Missing cover (expected cover.jpg or cover.png at the project root)")]
    MissingCover,

    #[error("Archive path used more than once: {0}")]
    DuplicatePath(String),
}

/// A chapter whose title would corrupt generated attribute markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTitle {
    pub title: String,
    pub path: String,
}

fn format_invalid_titles(titles: &[InvalidTitle]) -> String {
    titles
        .iter()
        .map(|t| format!("\"{}\" ({})", t.title, t.path))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors raised by an entry sink
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Entry written twice: {0}")]
    DuplicateEntry(String),

    #[error("Entry {0} written after finalize")]
    Finalized(String),

    #[error("Invalid entry path: {0}")]
    InvalidPath(String),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur when reading back a packaged archive
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("Invalid archive: {0}")]
    InvalidArchive(String),

    #[error("Missing entry: {0}")]
    MissingEntry(String),

    #[error("Malformed XML in {path}: {message}")]
    MalformedXml { path: String, message: String },
}
