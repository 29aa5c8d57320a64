//! Core types for a book project: metadata, assets and the chapter tree

mod asset;
mod meta;
mod project;
mod tree;

pub use asset::{Asset, Chapter, Image};
pub use meta::{ProjectMeta, REQUIRED_KEYS};
pub use project::Project;
pub use tree::{flatten, ChapterNode, ChapterTree};
