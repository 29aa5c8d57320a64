//! The fully read book project

use super::{flatten, Chapter, ChapterTree, Image, ProjectMeta};
use uuid::Uuid;

/// Everything the Entity Reader produces for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    /// Metadata from the `meta` file
    pub meta: ProjectMeta,

    /// Chapters in sorted directory order
    pub chapters: ChapterTree,

    /// Images from the `images` directory
    pub images: Vec<Image>,

    /// `cover.jpg` or `cover.png` from the project root
    pub cover: Option<Image>,
}

impl Project {
    /// Create a project with no content
    pub fn new(meta: ProjectMeta) -> Self {
        Self {
            meta,
            chapters: Vec::new(),
            images: Vec::new(),
            cover: None,
        }
    }

    /// Chapters in reading order
    pub fn flat_chapters(&self) -> Vec<&Chapter> {
        flatten(&self.chapters)
    }

    /// Package identifier.
    ///
    /// Uses the `identifier` metadata key when present, otherwise a
    /// name-based UUID so rebuilding the same book keeps its identity.
    pub fn identifier(&self) -> String {
        if let Some(id) = self.meta.get("identifier").filter(|s| !s.is_empty()) {
            return id.to_string();
        }
        let name = format!("{}\u{0}{}", self.meta.title(), self.meta.author());
        format!("urn:uuid:{}", Uuid::new_v5(&Uuid::NAMESPACE_URL, name.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(extra: &str) -> ProjectMeta {
        ProjectMeta::parse(&format!("title = T\nauthor = A\nlanguage = en\n{extra}")).unwrap()
    }

    #[test]
    fn test_identifier_is_stable() {
        let a = Project::new(meta(""));
        let b = Project::new(meta(""));
        assert_eq!(a.identifier(), b.identifier());
        assert!(a.identifier().starts_with("urn:uuid:"));
    }

    #[test]
    fn test_identifier_from_meta() {
        let project = Project::new(meta("identifier = isbn:12345"));
        assert_eq!(project.identifier(), "isbn:12345");
    }
}
