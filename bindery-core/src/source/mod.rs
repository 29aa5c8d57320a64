//! Directory-read capability the Entity Reader works against
//!
//! Paths are project-relative and `/`-separated; the empty string is the
//! project root.

use crate::error::ReadError;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};

/// Result type for source operations
pub type SourceResult<T> = std::result::Result<T, ReadError>;

/// A single directory listing entry
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

impl DirEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }
}

/// Read-only view of a project directory
pub trait ProjectSource {
    /// List the entries directly under `path`, in no particular order
    fn list_entries(&self, path: &str) -> SourceResult<Vec<DirEntry>>;

    /// Read a whole file
    fn read(&self, path: &str) -> SourceResult<Vec<u8>>;

    /// Whether a file exists at `path`
    fn is_file(&self, path: &str) -> bool;

    /// Whether a directory exists at `path`
    fn is_dir(&self, path: &str) -> bool;
}

/// Join a project-relative directory and an entry name
pub fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

/// Project rooted at a filesystem directory
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    /// Create a source reading from the given root directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a project path, rejecting anything that escapes the root
    fn full_path(&self, path: &str) -> SourceResult<PathBuf> {
        let mut normalized = PathBuf::new();
        for component in Path::new(path).components() {
            match component {
                Component::Normal(c) => normalized.push(c),
                Component::CurDir => {}
                Component::ParentDir | Component::Prefix(_) | Component::RootDir => {
                    return Err(ReadError::PathTraversal(path.to_string()));
                }
            }
        }

        Ok(self.root.join(normalized))
    }

    fn io_error(path: &str, source: std::io::Error) -> ReadError {
        if source.kind() == std::io::ErrorKind::NotFound {
            ReadError::NotFound(path.to_string())
        } else {
            ReadError::Io {
                path: path.to_string(),
                source,
            }
        }
    }
}

impl ProjectSource for FsSource {
    fn list_entries(&self, path: &str) -> SourceResult<Vec<DirEntry>> {
        let full_path = self.full_path(path)?;
        let read_dir = std::fs::read_dir(&full_path).map_err(|e| Self::io_error(path, e))?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| Self::io_error(path, e))?;
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                tracing::warn!("Skipping non UTF-8 file name in {:?}", full_path);
                continue;
            };
            // Follows symlinks, like a plain stat would
            let is_dir = entry.path().is_dir();
            entries.push(DirEntry { name, is_dir });
        }
        Ok(entries)
    }

    fn read(&self, path: &str) -> SourceResult<Vec<u8>> {
        let full_path = self.full_path(path)?;
        std::fs::read(full_path).map_err(|e| Self::io_error(path, e))
    }

    fn is_file(&self, path: &str) -> bool {
        self.full_path(path).map(|p| p.is_file()).unwrap_or(false)
    }

    fn is_dir(&self, path: &str) -> bool {
        self.full_path(path).map(|p| p.is_dir()).unwrap_or(false)
    }
}

/// In-memory project (for testing)
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file; parent directories are implied
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), content.into());
    }

    fn prefix(path: &str) -> String {
        if path.is_empty() {
            String::new()
        } else {
            format!("{path}/")
        }
    }
}

impl ProjectSource for MemorySource {
    fn list_entries(&self, path: &str) -> SourceResult<Vec<DirEntry>> {
        if !path.is_empty() && !self.is_dir(path) {
            return Err(ReadError::NotFound(path.to_string()));
        }

        let prefix = Self::prefix(path);
        let entries: BTreeSet<DirEntry> = self
            .files
            .keys()
            .filter_map(|key| key.strip_prefix(&prefix))
            .map(|rest| match rest.split_once('/') {
                Some((dir, _)) => DirEntry::dir(dir),
                None => DirEntry::file(rest),
            })
            .collect();
        Ok(entries.into_iter().collect())
    }

    fn read(&self, path: &str) -> SourceResult<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| ReadError::NotFound(path.to_string()))
    }

    fn is_file(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn is_dir(&self, path: &str) -> bool {
        let prefix = Self::prefix(path);
        self.files.keys().any(|key| key.starts_with(&prefix))
    }
}
