//! Markup Generator: pure functions producing each package document
//!
//! Nothing here performs I/O. Interpolated free text goes through
//! [`escape`]; chapter bodies are inserted as-is.

mod chapter;
mod container;
mod escape;
mod manifest;
mod navigation;

pub use chapter::{chapter_document, stylesheet_href};
pub use container::container_document;
pub use escape::escape;
pub use manifest::{package_document, CoverLinkage, PackageInfo};
pub use navigation::navigation_document;

/// Navigation document href, relative to the package document
pub const NCX_HREF: &str = "toc.ncx";

/// Stylesheet href, relative to the package document
pub const STYLESHEET_HREF: &str = "style.css";
