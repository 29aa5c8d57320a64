//! Entry sinks: where packaged entries end up
//!
//! Every sink follows an append-then-finalize discipline enforced by
//! [`EntryLedger`]: a path may be written once, and nothing may be written
//! after [`EntrySink::finalize`].

mod archive;
mod directory;
mod memory;

pub use archive::ZipSink;
pub use directory::DirectorySink;
pub use memory::MemorySink;

use crate::error::SinkError;
use std::collections::HashSet;
use std::path::Path;

/// Result type for sink operations
pub type SinkResult<T> = std::result::Result<T, SinkError>;

/// Archive path of the format marker entry
pub const MIMETYPE_PATH: &str = "mimetype";

/// Abstract destination for packaged entries
pub trait EntrySink {
    /// Write one entry
    fn write_entry(&mut self, path: &str, content: &[u8]) -> SinkResult<()>;

    /// Copy a file from disk into an entry
    fn copy_file(&mut self, path: &str, source: &Path) -> SinkResult<()> {
        let content = std::fs::read(source)?;
        self.write_entry(path, &content)
    }

    /// Flush and close; no writes are accepted afterwards
    fn finalize(&mut self) -> SinkResult<()>;
}

/// Bookkeeping shared by all sinks
#[derive(Debug, Default)]
pub struct EntryLedger {
    written: HashSet<String>,
    finalized: bool,
}

impl EntryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a write, rejecting duplicates, bad paths and late writes
    pub fn admit(&mut self, path: &str) -> SinkResult<()> {
        if self.finalized {
            return Err(SinkError::Finalized(path.to_string()));
        }
        check_path(path)?;
        if !self.written.insert(path.to_string()) {
            return Err(SinkError::DuplicateEntry(path.to_string()));
        }
        Ok(())
    }

    /// Mark the sink finalized; a second call is an error
    pub fn finalize(&mut self) -> SinkResult<()> {
        if self.finalized {
            return Err(SinkError::Finalized("<finalize>".to_string()));
        }
        self.finalized = true;
        Ok(())
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn len(&self) -> usize {
        self.written.len()
    }

    pub fn is_empty(&self) -> bool {
        self.written.is_empty()
    }
}

/// Entry paths are relative, `/`-separated and never leave the root
fn check_path(path: &str) -> SinkResult<()> {
    let valid = !path.is_empty()
        && !path.starts_with('/')
        && !path.contains('\\')
        && path
            .split('/')
            .all(|part| !part.is_empty() && part != "." && part != "..");
    if valid {
        Ok(())
    } else {
        Err(SinkError::InvalidPath(path.to_string()))
    }
}
