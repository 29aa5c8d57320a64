//! Archive Assembler: read, check, generate, validate, write
//!
//! Assembly is split in two phases. [`Assembler::prepare`] does everything
//! that can fail fatally and returns a [`PreparedPackage`];
//! [`PreparedPackage::write_to`] streams its entries into a sink. Nothing
//! touches the sink until the pre-flight checks have passed.

use crate::error::{InvalidTitle, PreflightError, Result};
use crate::markup::{
    chapter_document, container_document, navigation_document, package_document, CoverLinkage,
    PackageInfo,
};
use crate::reader::ProjectReader;
use crate::sink::{EntrySink, MIMETYPE_PATH};
use crate::source::ProjectSource;
use crate::types::{Chapter, Project};
use crate::validate::{validate, MarkupDiagnostic};
use std::collections::HashSet;
use std::path::PathBuf;

/// Content of the `mimetype` entry
pub const MIMETYPE: &str = "application/epub+zip";
/// Container pointer location, fixed by the format
pub const CONTAINER_PATH: &str = "META-INF/container.xml";
/// Directory holding the package document and all content
pub const PACKAGE_DIR: &str = "epub";
/// Package document location
pub const PACKAGE_PATH: &str = "epub/content.opf";
/// Navigation document location
pub const NCX_PATH: &str = "epub/toc.ncx";
/// Stylesheet location
pub const STYLESHEET_PATH: &str = "epub/style.css";

/// Stylesheet bundled with the tool
pub const DEFAULT_STYLESHEET: &str = include_str!("../assets/style.css");

/// Whether a missing cover stops the build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoverPolicy {
    /// Build without a cover
    #[default]
    Optional,

    /// Fail pre-flight when no cover exists
    Required,
}

/// Build configuration
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub cover_policy: CoverPolicy,
    pub cover_linkage: CoverLinkage,

    /// Stylesheet to copy instead of the bundled one
    pub stylesheet: Option<PathBuf>,
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cover policy
    pub fn with_cover_policy(mut self, policy: CoverPolicy) -> Self {
        self.cover_policy = policy;
        self
    }

    /// Set how the package links its cover
    pub fn with_cover_linkage(mut self, linkage: CoverLinkage) -> Self {
        self.cover_linkage = linkage;
        self
    }

    /// Copy this stylesheet instead of the bundled one
    pub fn with_stylesheet(mut self, path: impl Into<PathBuf>) -> Self {
        self.stylesheet = Some(path.into());
        self
    }
}

/// Payload of one archive entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryContent {
    Bytes(Vec<u8>),

    /// Copied from disk at write time
    File(PathBuf),
}

/// One archive entry ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    pub path: String,
    pub content: EntryContent,
}

impl GeneratedDocument {
    pub fn bytes(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: EntryContent::Bytes(content.into()),
        }
    }

    /// Entry content as text, if it is in memory and valid UTF-8
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            EntryContent::Bytes(b) => std::str::from_utf8(b).ok(),
            EntryContent::File(_) => None,
        }
    }
}

/// Everything needed to write the archive
#[derive(Debug, Clone)]
pub struct PreparedPackage {
    pub title: String,
    pub chapter_count: usize,
    pub image_count: usize,
    pub has_cover: bool,
    entries: Vec<GeneratedDocument>,
    diagnostics: Vec<MarkupDiagnostic>,
}

impl PreparedPackage {
    /// Entries in write order
    pub fn entries(&self) -> &[GeneratedDocument] {
        &self.entries
    }

    pub fn entry(&self, path: &str) -> Option<&GeneratedDocument> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// Validation failures found while generating
    pub fn diagnostics(&self) -> &[MarkupDiagnostic] {
        &self.diagnostics
    }

    /// Write every entry in order, then finalize the sink
    pub fn write_to(&self, sink: &mut dyn EntrySink) -> Result<()> {
        for entry in &self.entries {
            match &entry.content {
                EntryContent::Bytes(bytes) => sink.write_entry(&entry.path, bytes)?,
                EntryContent::File(source) => sink.copy_file(&entry.path, source)?,
            }
        }
        sink.finalize()?;

        tracing::info!(
            "Wrote {} entries for '{}' ({} diagnostics)",
            self.entries.len(),
            self.title,
            self.diagnostics.len()
        );
        Ok(())
    }
}

/// Orchestrates the full pipeline
#[derive(Clone, Default)]
pub struct Assembler {
    reader: ProjectReader,
    options: BuildOptions,
}

impl Assembler {
    pub fn new(options: BuildOptions) -> Self {
        Self {
            reader: ProjectReader::new(),
            options,
        }
    }

    /// Use a custom entity reader
    pub fn with_reader(mut self, reader: ProjectReader) -> Self {
        self.reader = reader;
        self
    }

    /// Read the project and prepare its package
    pub fn prepare(&self, source: &dyn ProjectSource) -> Result<PreparedPackage> {
        let project = self.reader.read(source)?;
        self.prepare_project(&project)
    }

    /// Prepare the package for an already-read project
    pub fn prepare_project(&self, project: &Project) -> Result<PreparedPackage> {
        let chapters = project.flat_chapters();
        preflight(project, &chapters, self.options.cover_policy)?;

        let identifier = project.identifier();
        let language = project.meta.language();
        let mut diagnostics = Vec::new();
        let mut entries = vec![GeneratedDocument::bytes(MIMETYPE_PATH, MIMETYPE)];

        entries.push(generate_validated(
            CONTAINER_PATH,
            || container_document(PACKAGE_PATH),
            &mut diagnostics,
        ));
        entries.push(generate_validated(
            PACKAGE_PATH,
            || {
                package_document(
                    &chapters,
                    &project.images,
                    &PackageInfo {
                        meta: &project.meta,
                        identifier: &identifier,
                        cover: project.cover.as_ref(),
                        cover_linkage: self.options.cover_linkage,
                    },
                )
            },
            &mut diagnostics,
        ));
        entries.push(generate_validated(
            NCX_PATH,
            || navigation_document(&project.chapters, &project.meta, &identifier),
            &mut diagnostics,
        ));

        for chapter in &chapters {
            entries.push(generate_validated(
                &content_path(&chapter.path),
                || chapter_document(chapter, language),
                &mut diagnostics,
            ));
        }

        for image in &project.images {
            entries.push(GeneratedDocument::bytes(
                content_path(&image.path),
                image.content.clone(),
            ));
        }
        if let Some(cover) = &project.cover {
            entries.push(GeneratedDocument::bytes(
                content_path(&cover.path),
                cover.content.clone(),
            ));
        }

        entries.push(match &self.options.stylesheet {
            Some(path) => GeneratedDocument {
                path: STYLESHEET_PATH.to_string(),
                content: EntryContent::File(path.clone()),
            },
            None => GeneratedDocument::bytes(STYLESHEET_PATH, DEFAULT_STYLESHEET),
        });

        Ok(PreparedPackage {
            title: project.meta.title().to_string(),
            chapter_count: chapters.len(),
            image_count: project.images.len(),
            has_cover: project.cover.is_some(),
            entries,
            diagnostics,
        })
    }

    /// Prepare and write in one go
    pub fn build(
        &self,
        source: &dyn ProjectSource,
        sink: &mut dyn EntrySink,
    ) -> Result<PreparedPackage> {
        let package = self.prepare(source)?;
        package.write_to(sink)?;
        Ok(package)
    }
}

/// Run a generator and validate its output, recording any failure
fn generate_validated(
    path: &str,
    generate: impl FnOnce() -> String,
    diagnostics: &mut Vec<MarkupDiagnostic>,
) -> GeneratedDocument {
    let document = generate();
    if let Some(report) = validate(&document) {
        let diagnostic = MarkupDiagnostic {
            path: path.to_string(),
            report,
        };
        tracing::warn!("{}", diagnostic);
        diagnostics.push(diagnostic);
    }
    GeneratedDocument::bytes(path, document)
}

/// Archive path of a chapter or image
pub fn content_path(path: &str) -> String {
    format!("{PACKAGE_DIR}/{path}")
}

/// Check invariants that must hold before anything is written
pub fn preflight(
    project: &Project,
    chapters: &[&Chapter],
    cover_policy: CoverPolicy,
) -> std::result::Result<(), PreflightError> {
    let invalid: Vec<InvalidTitle> = chapters
        .iter()
        .filter_map(|c| {
            let heading = c.heading.as_deref()?;
            heading.contains('<').then(|| InvalidTitle {
                title: heading.to_string(),
                path: c.path.clone(),
            })
        })
        .collect();
    if !invalid.is_empty() {
        return Err(PreflightError::InvalidTitles(invalid));
    }

    if !chapters.iter().any(|c| c.has_title()) {
        return Err(PreflightError::NoChapterTitles);
    }

    if cover_policy == CoverPolicy::Required && project.cover.is_none() {
        return Err(PreflightError::MissingCover);
    }

    let mut seen: HashSet<String> = [
        MIMETYPE_PATH,
        CONTAINER_PATH,
        PACKAGE_PATH,
        NCX_PATH,
        STYLESHEET_PATH,
    ]
    .into_iter()
    .map(str::to_string)
    .collect();
    let content_paths = chapters
        .iter()
        .map(|c| c.path.as_str())
        .chain(project.images.iter().map(|i| i.path.as_str()))
        .chain(project.cover.iter().map(|c| c.path.as_str()));
    for path in content_paths {
        let path = content_path(path);
        if !seen.insert(path.clone()) {
            return Err(PreflightError::DuplicatePath(path));
        }
    }

    Ok(())
}
