//! Entity Reader: turns a project directory into in-memory records
//!
//! Expected layout:
//!
//! ```text
//! meta                 key = value lines (title, author, language)
//! chapters/            chapter files, nested directories become sections
//! images/              flat directory of images (optional)
//! cover.jpg|cover.png  optional cover image
//! ```

mod entities;
mod markdown;
mod mime;

pub use entities::{chapter_title, heading_markup, heading_text, normalize_entities};
pub use markdown::{CommonMark, MarkdownRenderer};
pub use mime::{extension, is_markdown, mime_type, with_extension, XHTML};

use crate::error::{ConfigError, ReadError, Result};
use crate::source::{join, DirEntry, ProjectSource};
use crate::types::{Chapter, ChapterNode, Image, Project, ProjectMeta};
use std::sync::Arc;

/// Metadata file name at the project root
pub const META_FILE: &str = "meta";
/// Chapter tree directory
pub const CHAPTERS_DIR: &str = "chapters";
/// Image directory
pub const IMAGES_DIR: &str = "images";
/// Cover candidates, probed in order
pub const COVER_FILES: [&str; 2] = ["cover.jpg", "cover.png"];

/// Reads a project through a [`ProjectSource`]
#[derive(Clone)]
pub struct ProjectReader {
    markdown: Arc<dyn MarkdownRenderer>,
}

impl ProjectReader {
    pub fn new() -> Self {
        Self {
            markdown: Arc::new(CommonMark::new()),
        }
    }

    /// Use a different markdown renderer
    pub fn with_markdown(mut self, renderer: impl MarkdownRenderer + 'static) -> Self {
        self.markdown = Arc::new(renderer);
        self
    }

    /// Read metadata, chapters, images and cover
    pub fn read(&self, source: &dyn ProjectSource) -> Result<Project> {
        let meta = read_meta(source)?;
        let cover = read_cover(source)?;
        let chapters = self.read_part(source, CHAPTERS_DIR)?;
        let images = read_images(source)?;

        tracing::info!(
            "Read '{}': {} top-level chapter nodes, {} images, cover: {}",
            meta.title(),
            chapters.len(),
            images.len(),
            cover.as_ref().map(|c| c.path.as_str()).unwrap_or("none")
        );

        Ok(Project {
            meta,
            chapters,
            images,
            cover,
        })
    }

    /// Read a directory of chapters, nesting subdirectories as sections
    fn read_part(&self, source: &dyn ProjectSource, dir: &str) -> Result<Vec<ChapterNode>> {
        if !source.is_dir(dir) {
            return Err(ReadError::NotFound(dir.to_string()).into());
        }

        let mut nodes = Vec::new();
        for entry in sorted_entries(source, dir)? {
            let path = join(dir, &entry.name);
            if entry.is_dir {
                let mut nested = self.read_part(source, &path)?.into_iter();
                match nested.next() {
                    None => tracing::warn!("Skipping empty chapter directory {}", path),
                    Some(ChapterNode::Leaf(head)) => {
                        nodes.push(ChapterNode::section(head, nested.collect()));
                    }
                    Some(ChapterNode::Section { .. }) => {
                        return Err(ReadError::SectionHeadIsDirectory(path).into());
                    }
                }
            } else {
                nodes.push(ChapterNode::Leaf(self.read_chapter(source, &path)?));
            }
        }
        Ok(nodes)
    }

    /// Read one chapter file, converting markdown and normalizing entities
    pub fn read_chapter(&self, source: &dyn ProjectSource, path: &str) -> Result<Chapter> {
        let raw = source.read(path)?;
        let mut content =
            String::from_utf8(raw).map_err(|_| ReadError::InvalidUtf8(path.to_string()))?;

        let mut path = path.to_string();
        if is_markdown(&path) {
            content = self.markdown.render(&content);
            path = with_extension(&path, "html");
        }

        let mime = mime_type(&path)?;
        if mime != XHTML {
            return Err(ReadError::NotAChapter(path).into());
        }

        let content = normalize_entities(&content);
        let heading = heading_markup(&content).map(str::to_string);
        let title = heading.as_deref().map(heading_text);
        let archive_path = local_path(&path);

        tracing::debug!("Chapter {} title={:?}", archive_path, title);

        Ok(Chapter {
            path: archive_path,
            mime_type: mime.to_string(),
            content,
            title,
            heading,
        })
    }
}

impl Default for ProjectReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the project's metadata file
pub fn read_meta(source: &dyn ProjectSource) -> Result<ProjectMeta> {
    if !source.is_file(META_FILE) {
        return Err(ConfigError::MissingFile(META_FILE.to_string()).into());
    }
    let raw = source.read(META_FILE)?;
    let text = String::from_utf8(raw).map_err(|_| ReadError::InvalidUtf8(META_FILE.to_string()))?;
    Ok(ProjectMeta::parse(&text)?)
}

/// Read every image in `images/`; a missing directory means no images
pub fn read_images(source: &dyn ProjectSource) -> Result<Vec<Image>> {
    if !source.is_dir(IMAGES_DIR) {
        return Ok(Vec::new());
    }

    let mut images = Vec::new();
    for entry in sorted_entries(source, IMAGES_DIR)? {
        let path = join(IMAGES_DIR, &entry.name);
        if entry.is_dir {
            tracing::warn!("Skipping directory {} (images/ is flat)", path);
            continue;
        }
        images.push(read_image(source, &path, local_path(&path))?);
    }
    Ok(images)
}

/// Probe for `cover.jpg` then `cover.png`
pub fn read_cover(source: &dyn ProjectSource) -> Result<Option<Image>> {
    for name in COVER_FILES {
        if source.is_file(name) {
            return Ok(Some(read_image(source, name, name.to_string())?));
        }
    }
    Ok(None)
}

fn read_image(source: &dyn ProjectSource, path: &str, archive_path: String) -> Result<Image> {
    let mime = mime_type(path)?;
    let content = source.read(path)?;
    tracing::debug!("Image {} ({}, {} bytes)", archive_path, mime, content.len());
    Ok(Image::new(archive_path, mime, content))
}

fn sorted_entries(source: &dyn ProjectSource, dir: &str) -> Result<Vec<DirEntry>> {
    let mut entries = source.list_entries(dir)?;
    // Byte order of names, directories interleaved with files
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Archive-relative path: the project path minus its `chapters/` or
/// `images/` prefix
pub fn local_path(path: &str) -> String {
    match path.split_once('/') {
        Some((_, rest)) => rest.to_string(),
        None => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BinderyError;
    use crate::source::MemorySource;
    use crate::types::flatten;

    const META: &str = "title = Test Book\nauthor = A. Writer\nlanguage = en\n";

    #[test]
    fn test_read_markdown_chapter() {
        let source = MemorySource::new()
            .with_file("meta", META)
            .with_file("chapters/01.md", "# Hello\n\nBody text.");

        let project = ProjectReader::new().read(&source).unwrap();
        let chapters = flatten(&project.chapters);
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].path, "01.html");
        assert_eq!(chapters[0].mime_type, XHTML);
        assert_eq!(chapters[0].title.as_deref(), Some("Hello"));
        assert!(project.images.is_empty());
        assert!(project.cover.is_none());
    }

    #[test]
    fn test_nested_sections() {
        let source = MemorySource::new()
            .with_file("meta", META)
            .with_file("chapters/part1/a.md", "# A")
            .with_file("chapters/part1/b.md", "# B")
            .with_file("chapters/c.md", "# C");

        let project = ProjectReader::new().read(&source).unwrap();
        assert_eq!(project.chapters.len(), 2);
        match &project.chapters[1] {
            ChapterNode::Section { head, children } => {
                assert_eq!(head.path, "part1/a.html");
                assert_eq!(children.len(), 1);
                assert_eq!(children[0].head().path, "part1/b.html");
            }
            other => panic!("expected section, got {other:?}"),
        }
        // "c.md" sorts after "part1"
        let paths: Vec<_> = flatten(&project.chapters).iter().map(|c| c.path.clone()).collect();
        assert_eq!(paths, vec!["c.html", "part1/a.html", "part1/b.html"]);
    }

    #[test]
    fn test_section_head_must_be_file() {
        let source = MemorySource::new()
            .with_file("meta", META)
            .with_file("chapters/part/inner/a.md", "# A");

        let err = ProjectReader::new().read(&source).unwrap_err();
        assert!(matches!(
            err,
            BinderyError::Read(ReadError::SectionHeadIsDirectory(_))
        ));
    }

    #[test]
    fn test_missing_meta() {
        let source = MemorySource::new().with_file("chapters/01.md", "# A");
        let err = ProjectReader::new().read(&source).unwrap_err();
        assert!(matches!(err, BinderyError::Config(ConfigError::MissingFile(_))));
    }

    #[test]
    fn test_unknown_chapter_extension() {
        let source = MemorySource::new()
            .with_file("meta", META)
            .with_file("chapters/notes.txt", "plain");
        let err = ProjectReader::new().read(&source).unwrap_err();
        assert!(matches!(err, BinderyError::Read(ReadError::UnknownExtension(_))));
    }

    #[test]
    fn test_image_in_chapters_is_rejected() {
        let source = MemorySource::new()
            .with_file("meta", META)
            .with_file("chapters/figure.png", vec![0u8; 4]);
        let err = ProjectReader::new().read(&source).unwrap_err();
        assert!(matches!(err, BinderyError::Read(ReadError::NotAChapter(_))));
    }

    #[test]
    fn test_images_and_cover() {
        let source = MemorySource::new()
            .with_file("meta", META)
            .with_file("chapters/01.html", "<h1>One</h1>")
            .with_file("images/b.png", vec![2u8])
            .with_file("images/a.jpg", vec![1u8])
            .with_file("cover.png", vec![9u8])
            .with_file("cover.jpg", vec![8u8]);

        let project = ProjectReader::new().read(&source).unwrap();
        let paths: Vec<_> = project.images.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["a.jpg", "b.png"]);
        assert_eq!(project.images[0].mime_type, "image/jpeg");

        let cover = project.cover.unwrap();
        assert_eq!(cover.path, "cover.jpg");
        assert_eq!(cover.content, vec![8u8]);
    }

    #[test]
    fn test_unknown_image_extension() {
        let source = MemorySource::new()
            .with_file("meta", META)
            .with_file("chapters/01.html", "<h1>One</h1>")
            .with_file("images/diagram.svg", "<svg/>");
        let err = ProjectReader::new().read(&source).unwrap_err();
        assert!(matches!(err, BinderyError::Read(ReadError::UnknownExtension(_))));
    }

    #[test]
    fn test_entities_normalized_before_title() {
        let source = MemorySource::new()
            .with_file("meta", META)
            .with_file("chapters/01.html", "<h1>Caf&eacute; &amp; Bar</h1>");
        let project = ProjectReader::new().read(&source).unwrap();
        assert_eq!(
            project.chapters[0].head().title.as_deref(),
            Some("Caf\u{e9} & Bar")
        );
        assert_eq!(
            project.chapters[0].head().heading.as_deref(),
            Some("Caf\u{e9} &amp; Bar")
        );
    }

    #[test]
    fn test_custom_markdown_renderer() {
        struct Shout;
        impl MarkdownRenderer for Shout {
            fn render(&self, source: &str) -> String {
                format!("<h1>{}</h1>", source.trim().to_uppercase())
            }
        }

        let source = MemorySource::new()
            .with_file("meta", META)
            .with_file("chapters/01.md", "quiet");
        let project = ProjectReader::new().with_markdown(Shout).read(&source).unwrap();
        assert_eq!(project.chapters[0].head().title.as_deref(), Some("QUIET"));
    }

    #[test]
    fn test_local_path() {
        assert_eq!(local_path("chapters/part1/a.html"), "part1/a.html");
        assert_eq!(local_path("images/x.png"), "x.png");
    }
}
