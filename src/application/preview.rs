//! Reader-facing preview of a draft.

use crate::application::ports::MarkdownRenderer;
use crate::domain::draft::PostDraft;

pub const MARKDOWN_GUIDE_URL: &str = "https://www.markdownguide.org/basic-syntax/";

/// One line of the markdown cheat sheet shown while the body has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownRule {
    pub title: &'static str,
    pub rule: &'static str,
}

pub const MARKDOWN_RULES: &[MarkdownRule] = &[
    MarkdownRule {
        title: "From h1 to h6",
        rule: "# Heading -> ###### Heading",
    },
    MarkdownRule {
        title: "Blockquote",
        rule: "> Your Quote",
    },
    MarkdownRule {
        title: "Image",
        rule: "![image alt](http://image_url.com)",
    },
    MarkdownRule {
        title: "Link",
        rule: "[Link Text](http://your_link.com)",
    },
];

/// Cheat sheet shown next to the body editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownHint {
    pub guide_url: &'static str,
    pub rules: &'static [MarkdownRule],
}

impl MarkdownHint {
    pub const fn standard() -> Self {
        Self {
            guide_url: MARKDOWN_GUIDE_URL,
            rules: MARKDOWN_RULES,
        }
    }

    /// Plain-text rendering for terminals.
    pub fn to_text(&self) -> String {
        let mut text = String::from("Markdown rules\n");
        for rule in self.rules {
            text.push_str(&format!("  {:<14} {}\n", rule.title, rule.rule));
        }
        text.push_str(&format!("Full guide: {}\n", self.guide_url));
        text
    }
}

/// The draft rendered the way a reader would see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevicePreview {
    pub title: String,
    pub thumbnail: Option<String>,
    pub body_html: String,
}

impl DevicePreview {
    pub fn render(draft: &PostDraft, renderer: &dyn MarkdownRenderer) -> Self {
        Self {
            title: draft.title.clone(),
            thumbnail: draft.thumbnail.preview_url().map(str::to_string),
            body_html: renderer.render(&draft.content),
        }
    }

    /// Standalone HTML page for viewing the preview in a browser.
    pub fn to_html_document(&self) -> String {
        let title = escape_html(&self.title);
        let thumbnail = self
            .thumbnail
            .as_deref()
            .map(|url| {
                format!(
                    "<img class=\"thumbnail\" src=\"{}\" alt=\"\">\n",
                    escape_html(url)
                )
            })
            .unwrap_or_default();

        format!(
            "<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n<article>\n<h1>{title}</h1>\n{thumbnail}{body}\n</article>\n</body>\n</html>\n",
            body = self.body_html,
        )
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
