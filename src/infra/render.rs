//! Comrak markdown rendering with Ammonia sanitisation.

use comrak::{Options, markdown_to_html};

use crate::application::ports::MarkdownRenderer;

/// GitHub-flavoured rendering; raw HTML is let through comrak and then
/// sanitised, so embedded markup survives only when it is safe.
pub struct ComrakRenderer {
    options: Options<'static>,
    sanitizer: ammonia::Builder<'static>,
}

impl ComrakRenderer {
    pub fn new() -> Self {
        let mut options = Options::default();
        let ext = &mut options.extension;
        ext.strikethrough = true;
        ext.table = true;
        ext.autolink = true;
        ext.tasklist = true;
        ext.footnotes = true;
        ext.superscript = true;

        let render = &mut options.render;
        render.github_pre_lang = true;
        render.r#unsafe = true;

        Self {
            options,
            sanitizer: ammonia::Builder::default(),
        }
    }
}

impl Default for ComrakRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer for ComrakRenderer {
    fn render(&self, markdown: &str) -> String {
        let html = markdown_to_html(markdown, &self.options);
        self.sanitizer.clean(&html).to_string()
    }
}
