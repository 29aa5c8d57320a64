//! XHTML envelope around a chapter body

use super::{escape, STYLESHEET_HREF};
use crate::types::Chapter;

/// Wrap a chapter's markup in a complete XHTML document.
///
/// The stylesheet link is relative to the chapter's own directory.
pub fn chapter_document(chapter: &Chapter, language: &str) -> String {
    let language = escape(language);
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" lang="{language}" xml:lang="{language}">
<head>
  <title>{}</title>
  <link href="{}" rel="stylesheet" type="text/css"/>
</head>
<body>
{}
</body>
</html>
"#,
        escape(chapter.title.as_deref().unwrap_or_default()),
        stylesheet_href(&chapter.path),
        chapter.content
    )
}

/// Stylesheet href as seen from a chapter at `path`
pub fn stylesheet_href(path: &str) -> String {
    let depth = path.matches('/').count();
    format!("{}{STYLESHEET_HREF}", "../".repeat(depth))
}
