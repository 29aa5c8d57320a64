//! Hierarchical chapter tree

use super::Chapter;
use serde::Serialize;

/// Ordered top-level sequence of chapter nodes
pub type ChapterTree = Vec<ChapterNode>;

/// A single node in the chapter tree
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChapterNode {
    /// A chapter file
    Leaf(Chapter),

    /// A subdirectory. Its first chapter labels the section in navigation;
    /// the remaining nodes nest underneath it.
    Section {
        head: Chapter,
        children: Vec<ChapterNode>,
    },
}

impl ChapterNode {
    /// Create a section node
    pub fn section(head: Chapter, children: Vec<ChapterNode>) -> Self {
        ChapterNode::Section { head, children }
    }

    /// The chapter this node is labelled and linked by
    pub fn head(&self) -> &Chapter {
        match self {
            ChapterNode::Leaf(chapter) => chapter,
            ChapterNode::Section { head, .. } => head,
        }
    }

    /// Nested nodes (empty for leaves)
    pub fn children(&self) -> &[ChapterNode] {
        match self {
            ChapterNode::Leaf(_) => &[],
            ChapterNode::Section { children, .. } => children,
        }
    }

    /// Number of chapters under this node, the head included
    pub fn leaf_count(&self) -> usize {
        1 + self.children().iter().map(ChapterNode::leaf_count).sum::<usize>()
    }
}

/// Flatten a chapter tree depth-first, preserving order.
pub fn flatten(tree: &[ChapterNode]) -> Vec<&Chapter> {
    let mut out = Vec::new();
    for node in tree {
        push_flat(node, &mut out);
    }
    out
}

fn push_flat<'a>(node: &'a ChapterNode, out: &mut Vec<&'a Chapter>) {
    out.push(node.head());
    for child in node.children() {
        push_flat(child, out);
    }
}
