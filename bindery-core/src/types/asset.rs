//! Chapter and image assets destined for the archive

use serde::Serialize;

/// Anything that gets its own manifest item
pub trait Asset {
    /// Archive-relative path (forward slashes, unique within the package)
    fn path(&self) -> &str;

    /// MIME type used as the manifest media-type
    fn mime_type(&self) -> &str;
}

/// A single chapter document
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Chapter {
    /// Archive-relative path, with markdown sources already renamed to `.html`
    pub path: String,

    /// Always `application/xhtml+xml` for chapters
    pub mime_type: String,

    /// Body markup, already converted from markdown and entity-normalized
    pub content: String,

    /// Plain text of the first heading, if any
    pub title: Option<String>,

    /// Raw markup of that heading, entities still escaped
    #[serde(skip)]
    pub heading: Option<String>,
}

impl Chapter {
    pub fn new(
        path: impl Into<String>,
        mime_type: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            mime_type: mime_type.into(),
            content: content.into(),
            title: None,
            heading: None,
        }
    }

    /// Set the chapter title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Record the raw heading markup the title was taken from
    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }

    /// Whether the chapter has a non-empty title
    pub fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.is_empty())
    }
}

impl Asset for Chapter {
    fn path(&self) -> &str {
        &self.path
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }
}

/// An image copied into the archive byte for byte
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Image {
    pub path: String,
    pub mime_type: String,
    #[serde(skip)]
    pub content: Vec<u8>,
}

impl Image {
    pub fn new(path: impl Into<String>, mime_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            mime_type: mime_type.into(),
            content,
        }
    }
}

impl Asset for Image {
    fn path(&self) -> &str {
        &self.path
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }
}
