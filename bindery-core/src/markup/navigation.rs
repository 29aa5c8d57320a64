//! Navigation document (NCX) rendered from the chapter tree

use super::escape;
use crate::types::{Chapter, ChapterNode, ProjectMeta};

/// Render the navigation map.
///
/// Sections become navigation points labelled by their head chapter with
/// the remaining nodes nested inside. `playOrder` follows the flattened
/// reading order.
pub fn navigation_document(tree: &[ChapterNode], meta: &ProjectMeta, identifier: &str) -> String {
    let mut points = String::new();
    let mut play_order = 0;
    for node in tree {
        push_nav_point(&mut points, node, 2, &mut play_order);
    }

    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1" xml:lang="{}">
  <head>
    <meta name="dtb:uid" content="{}"/>
  </head>
  <docTitle>
    <text>{}</text>
  </docTitle>
  <navMap id="navmap">
{points}  </navMap>
</ncx>
"#,
        escape(meta.language()),
        escape(identifier),
        escape(meta.title()),
    )
}

fn push_nav_point(out: &mut String, node: &ChapterNode, depth: usize, play_order: &mut usize) {
    let head = node.head();
    *play_order += 1;

    let indent = "  ".repeat(depth);
    let path = escape(&head.path);
    out.push_str(&format!(
        "{indent}<navPoint id=\"navpoint-{path}\" playOrder=\"{}\">\n",
        *play_order
    ));
    out.push_str(&format!(
        "{indent}  <navLabel><text>{}</text></navLabel>\n",
        escape(label(head))
    ));
    out.push_str(&format!("{indent}  <content src=\"{path}\"/>\n"));
    for child in node.children() {
        push_nav_point(out, child, depth + 1, play_order);
    }
    out.push_str(&format!("{indent}</navPoint>\n"));
}

fn label(chapter: &Chapter) -> &str {
    chapter
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(&chapter.path)
}
