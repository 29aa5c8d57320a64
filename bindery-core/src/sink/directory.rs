//! Plain directory tree sink, for inspecting output by hand

use super::{EntryLedger, EntrySink, SinkResult};
use std::path::{Path, PathBuf};

/// Writes each entry as a file under a root directory
pub struct DirectorySink {
    root: PathBuf,
    ledger: EntryLedger,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ledger: EntryLedger::new(),
        }
    }

    fn target(&self, path: &str) -> SinkResult<PathBuf> {
        let target = path.split('/').fold(self.root.clone(), |acc, part| acc.join(part));
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(target)
    }
}

impl EntrySink for DirectorySink {
    fn write_entry(&mut self, path: &str, content: &[u8]) -> SinkResult<()> {
        self.ledger.admit(path)?;
        let target = self.target(path)?;
        std::fs::write(&target, content)?;
        tracing::debug!("dir: {:?} ({} bytes)", target, content.len());
        Ok(())
    }

    fn copy_file(&mut self, path: &str, source: &Path) -> SinkResult<()> {
        self.ledger.admit(path)?;
        let target = self.target(path)?;
        std::fs::copy(source, &target)?;
        Ok(())
    }

    fn finalize(&mut self) -> SinkResult<()> {
        self.ledger.finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SinkError;

    #[test]
    fn test_directory_sink_writes_tree() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("book");
        let mut sink = DirectorySink::new(&out);

        sink.write_entry("mimetype", b"application/epub+zip").unwrap();
        sink.write_entry("epub/part1/a.html", b"<p/>").unwrap();

        let css = dir.path().join("custom.css");
        std::fs::write(&css, "body {}").unwrap();
        sink.copy_file("epub/style.css", &css).unwrap();
        sink.finalize().unwrap();

        assert_eq!(std::fs::read(out.join("mimetype")).unwrap(), b"application/epub+zip");
        assert_eq!(std::fs::read(out.join("epub/part1/a.html")).unwrap(), b"<p/>");
        assert_eq!(std::fs::read_to_string(out.join("epub/style.css")).unwrap(), "body {}");
    }

    #[test]
    fn test_directory_sink_duplicate_copy() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path());
        sink.write_entry("epub/style.css", b"a").unwrap();
        let err = sink.copy_file("epub/style.css", Path::new("/nonexistent")).unwrap_err();
        assert!(matches!(err, SinkError::DuplicateEntry(_)));
    }
}
