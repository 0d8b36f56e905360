//! Markdown rendering service
//!
//! Converts comment content from Markdown to HTML with pulldown-cmark.
//! The rendered HTML is stored next to the raw content so the public
//! page never renders on the read path.
//!
//! # Example
//!
//! ```
//! use inkpot::services::markdown::MarkdownRenderer;
//!
//! let renderer = MarkdownRenderer::new();
//! let html = renderer.render("This is **bold** text.");
//! assert!(html.contains("<strong>"));
//! ```

use pulldown_cmark::{html, Options, Parser};

/// A thread-safe Markdown renderer.
///
/// Supports the common Markdown features plus tables, strikethrough,
/// task lists, and smart punctuation.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    options: Options,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    /// Creates a new MarkdownRenderer with the default feature set.
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_SMART_PUNCTUATION);

        Self { options }
    }

    /// Render Markdown to HTML.
    pub fn render(&self, content: &str) -> String {
        let parser = Parser::new_ext(content, self.options);
        let mut output = String::new();
        html::push_html(&mut output, parser);
        output
    }
}
