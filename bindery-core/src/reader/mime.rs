//! Extension to MIME type table

use crate::error::ReadError;

/// MIME type of chapter documents
pub const XHTML: &str = "application/xhtml+xml";

const TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("xhtml", XHTML),
    // html/htm sources stay viewable in a browser
    ("html", XHTML),
    ("htm", XHTML),
];

/// Extensions treated as markdown chapter sources
const MARKDOWN: &[&str] = &["md", "markdown", "mdown", "mkd"];

/// Lowercased extension of the last path component
pub fn extension(path: &str) -> Option<String> {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.rsplit_once('.')
        .filter(|(stem, _)| !stem.is_empty())
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Guess a file's MIME type from its extension
pub fn mime_type(path: &str) -> Result<&'static str, ReadError> {
    let ext = extension(path).ok_or_else(|| ReadError::UnknownExtension(path.to_string()))?;
    TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, t)| *t)
        .ok_or_else(|| ReadError::UnknownExtension(path.to_string()))
}

/// Whether the path names a markdown source
pub fn is_markdown(path: &str) -> bool {
    extension(path).is_some_and(|ext| MARKDOWN.contains(&ext.as_str()))
}

/// Replace the extension of the last path component
pub fn with_extension(path: &str, ext: &str) -> String {
    let (dir, name) = match path.rsplit_once('/') {
        Some((dir, name)) => (Some(dir), name),
        None => (None, path),
    };
    let stem = match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    };
    match dir {
        Some(dir) => format!("{dir}/{stem}.{ext}"),
        None => format!("{stem}.{ext}"),
    }
}
