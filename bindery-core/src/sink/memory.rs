//! In-memory sink (for testing)

use super::{EntryLedger, EntrySink, SinkResult};

/// Records entries in write order
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Vec<(String, Vec<u8>)>,
    ledger: EntryLedger,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries in the order they were written
    pub fn entries(&self) -> &[(String, Vec<u8>)] {
        &self.entries
    }

    /// Entry paths in the order they were written
    pub fn paths(&self) -> Vec<&str> {
        self.entries.iter().map(|(p, _)| p.as_str()).collect()
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, c)| c.as_slice())
    }

    /// Entry content as UTF-8 text
    pub fn text(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|c| std::str::from_utf8(c).ok())
    }

    pub fn is_finalized(&self) -> bool {
        self.ledger.is_finalized()
    }
}

impl EntrySink for MemorySink {
    fn write_entry(&mut self, path: &str, content: &[u8]) -> SinkResult<()> {
        self.ledger.admit(path)?;
        self.entries.push((path.to_string(), content.to_vec()));
        Ok(())
    }

    fn finalize(&mut self) -> SinkResult<()> {
        self.ledger.finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink() {
        let mut sink = MemorySink::new();
        sink.write_entry("mimetype", b"application/epub+zip").unwrap();
        sink.write_entry("epub/a.html", b"<p/>").unwrap();
        assert!(!sink.is_finalized());
        sink.finalize().unwrap();

        assert!(sink.is_finalized());
        assert_eq!(sink.paths(), vec!["mimetype", "epub/a.html"]);
        assert_eq!(sink.text("epub/a.html"), Some("<p/>"));
        assert_eq!(sink.get("missing"), None);
    }
}
