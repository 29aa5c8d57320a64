//! Markdown to HTML conversion for chapter sources

use pulldown_cmark::{html, Options, Parser};

/// Opaque markdown-to-markup transform
pub trait MarkdownRenderer: Send + Sync {
    /// Render markdown source to an HTML fragment
    fn render(&self, source: &str) -> String;
}

/// CommonMark renderer backed by pulldown-cmark
#[derive(Debug, Clone)]
pub struct CommonMark {
    /// Whether to enable tables extension
    enable_tables: bool,
    /// Whether to enable strikethrough extension
    enable_strikethrough: bool,
    /// Whether to enable footnotes extension
    enable_footnotes: bool,
}

impl CommonMark {
    pub fn new() -> Self {
        Self {
            enable_tables: true,
            enable_strikethrough: true,
            enable_footnotes: true,
        }
    }

    /// Enable or disable tables parsing
    pub fn with_tables(mut self, enable: bool) -> Self {
        self.enable_tables = enable;
        self
    }

    /// Enable or disable strikethrough parsing
    pub fn with_strikethrough(mut self, enable: bool) -> Self {
        self.enable_strikethrough = enable;
        self
    }

    /// Enable or disable footnotes parsing
    pub fn with_footnotes(mut self, enable: bool) -> Self {
        self.enable_footnotes = enable;
        self
    }

    fn get_parser_options(&self) -> Options {
        let mut options = Options::empty();
        if self.enable_tables {
            options.insert(Options::ENABLE_TABLES);
        }
        if self.enable_strikethrough {
            options.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.enable_footnotes {
            options.insert(Options::ENABLE_FOOTNOTES);
        }
        options
    }
}

impl Default for CommonMark {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer for CommonMark {
    fn render(&self, source: &str) -> String {
        let parser = Parser::new_ext(source, self.get_parser_options());
        let mut out = String::with_capacity(source.len() * 3 / 2);
        html::push_html(&mut out, parser);
        // Raw inline <br> passes through verbatim; XHTML needs it self-closed
        out.replace("<br>", "<br/>")
    }
}
