//! Read-only summaries of stored posts.

use soffio_composer_api_types::Post;
use time::{format_description::FormatItem, macros::format_description};

use super::tags::join_tags;

/// Medium date, e.g. "Oct 19, 2026".
pub const MEDIUM_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:short] [day padding:none], [year]");

const EXCERPT_CHARS: usize = 80;
const EXCERPT_SUFFIX: &str = "...";
const FALLBACK_THUMBNAIL: &str = "./logo.png";

/// Everything a post list needs to show one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCard {
    pub title: String,
    pub thumbnail: String,
    pub excerpt: String,
    pub date: Option<String>,
    pub tags: String,
    pub edit_path: String,
}

impl PostCard {
    pub fn from_post(post: &Post) -> Self {
        let thumbnail = post
            .thumbnail
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(FALLBACK_THUMBNAIL)
            .to_string();

        let date = post
            .created_at
            .and_then(|created| created.date().format(MEDIUM_DATE_FORMAT).ok());

        Self {
            title: post.title.clone(),
            thumbnail,
            excerpt: excerpt(&post.meta),
            date,
            tags: join_tags(&post.tags),
            edit_path: edit_path(&post.slug),
        }
    }
}

/// Route of the editor for a post.
pub fn edit_path(slug: &str) -> String {
    format!("/update-post/{slug}")
}

fn excerpt(meta: &str) -> String {
    let mut shortened: String = meta.chars().take(EXCERPT_CHARS).collect();
    shortened.push_str(EXCERPT_SUFFIX);
    shortened
}
