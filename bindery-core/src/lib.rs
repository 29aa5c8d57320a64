//! Bindery Core Library
//!
//! Assembles a book project directory (a `meta` file, a chapter tree,
//! images and an optional cover) into an EPUB package. Projects are read
//! into an in-memory [`Project`], checked, rendered into XML documents and
//! streamed into an [`EntrySink`].

pub mod assembler;
pub mod error;
pub mod markup;
pub mod package;
pub mod reader;
pub mod sink;
pub mod source;
pub mod types;
pub mod validate;

pub use assembler::{
    Assembler, BuildOptions, CoverPolicy, EntryContent, GeneratedDocument, PreparedPackage,
};
pub use error::{
    BinderyError, ConfigError, InvalidTitle, PackageError, PreflightError, ReadError, Result,
    SinkError,
};
pub use markup::CoverLinkage;
pub use package::{read_package, ManifestItem, PackageSummary};
pub use reader::ProjectReader;
pub use sink::{DirectorySink, EntrySink, MemorySink, ZipSink};
pub use source::{FsSource, MemorySource, ProjectSource};
pub use types::{Chapter, ChapterNode, Image, Project, ProjectMeta};
pub use validate::{validate, MarkupDiagnostic, ValidationReport};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_creation() {
        let meta = ProjectMeta::parse("title = Test Book\nauthor = Me\nlanguage = en").unwrap();
        let project = Project::new(meta);
        assert_eq!(project.meta.title(), "Test Book");
        assert_eq!(project.meta.language(), "en");
        assert!(project.flat_chapters().is_empty());
    }
}
