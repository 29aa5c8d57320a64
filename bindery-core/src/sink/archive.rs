//! Compressed package archive sink

use super::{EntryLedger, EntrySink, SinkResult, MIMETYPE_PATH};
use crate::error::SinkError;
use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Writes entries into a zip archive.
///
/// The `mimetype` entry is stored uncompressed; everything else is
/// deflated.
pub struct ZipSink<W: Write + Seek> {
    zip: Option<ZipWriter<W>>,
    output: Option<W>,
    ledger: EntryLedger,
}

impl ZipSink<File> {
    /// Create (or truncate) an archive file on disk
    pub fn create(path: impl AsRef<Path>) -> SinkResult<Self> {
        Ok(Self::new(File::create(path)?))
    }
}

impl<W: Write + Seek> ZipSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            zip: Some(ZipWriter::new(writer)),
            output: None,
            ledger: EntryLedger::new(),
        }
    }

    /// The underlying writer, once finalized
    pub fn into_inner(self) -> Option<W> {
        self.output
    }
}

impl<W: Write + Seek> EntrySink for ZipSink<W> {
    fn write_entry(&mut self, path: &str, content: &[u8]) -> SinkResult<()> {
        self.ledger.admit(path)?;
        let zip = self
            .zip
            .as_mut()
            .ok_or_else(|| SinkError::Finalized(path.to_string()))?;

        let method = if path == MIMETYPE_PATH {
            CompressionMethod::Stored
        } else {
            CompressionMethod::Deflated
        };
        let options = SimpleFileOptions::default().compression_method(method);

        zip.start_file(path, options)?;
        zip.write_all(content)?;
        tracing::debug!("zip: {} ({} bytes, {:?})", path, content.len(), method);
        Ok(())
    }

    fn finalize(&mut self) -> SinkResult<()> {
        self.ledger.finalize()?;
        if let Some(zip) = self.zip.take() {
            self.output = Some(zip.finish()?);
        }
        Ok(())
    }
}
