//! The in-progress post and the store holding its current snapshot.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use soffio_composer_api_types::Post;

use super::image::{ImageFile, PreviewRef};
use super::tags::join_tags;

/// Advertised upper bound for meta descriptions.
pub const MAX_META_CHARS: usize = 150;

/// Length meta descriptions are clamped to once they reach [`MAX_META_CHARS`].
pub const META_CLAMP_CHARS: usize = MAX_META_CHARS - 1;

/// The post's cover image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Thumbnail {
    #[default]
    Empty,
    /// Already stored by the backend, e.g. when editing an existing post.
    Remote(String),
    /// Picked locally; the bytes travel with the final submission.
    Local { file: ImageFile, preview: PreviewRef },
}

impl Thumbnail {
    /// Reference suitable for showing the thumbnail in a preview.
    pub fn preview_url(&self) -> Option<&str> {
        match self {
            Thumbnail::Empty => None,
            Thumbnail::Remote(url) => Some(url.as_str()),
            Thumbnail::Local { preview, .. } => Some(preview.as_str()),
        }
    }

    /// The thumbnail as it can be persisted: local files are dropped.
    pub fn without_file(&self) -> Thumbnail {
        match self {
            Thumbnail::Local { .. } => Thumbnail::Empty,
            other => other.clone(),
        }
    }
}

/// Every editable field of a post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    /// Raw comma-separated entry, normalized only at submit time.
    pub tags: String,
    pub meta: String,
    pub featured: bool,
    pub thumbnail: Thumbnail,
}

impl PostDraft {
    /// Hydrate a draft from a stored post for editing.
    pub fn from_post(post: &Post) -> Self {
        let thumbnail = post
            .thumbnail
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(|url| Thumbnail::Remote(url.to_string()))
            .unwrap_or_default();

        Self {
            title: post.title.clone(),
            content: post.content.clone(),
            tags: join_tags(&post.tags),
            meta: post.meta.clone(),
            featured: post.featured,
            thumbnail,
        }
    }

    /// Apply a partial update, keeping every field the patch leaves unset.
    #[must_use]
    pub fn merged(&self, patch: DraftPatch) -> Self {
        let DraftPatch {
            title,
            content,
            tags,
            meta,
            featured,
            thumbnail,
        } = patch;

        Self {
            title: title.unwrap_or_else(|| self.title.clone()),
            content: content.unwrap_or_else(|| self.content.clone()),
            tags: tags.unwrap_or_else(|| self.tags.clone()),
            meta: meta.unwrap_or_else(|| self.meta.clone()),
            featured: featured.unwrap_or(self.featured),
            thumbnail: thumbnail.unwrap_or_else(|| self.thumbnail.clone()),
        }
    }

    /// The draft minus any in-memory file payload.
    #[must_use]
    pub fn persistable(&self) -> Self {
        Self {
            thumbnail: self.thumbnail.without_file(),
            ..self.clone()
        }
    }
}

/// A partial update to a [`PostDraft`].
#[derive(Debug, Clone, Default)]
pub struct DraftPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<String>,
    pub meta: Option<String>,
    pub featured: Option<bool>,
    pub thumbnail: Option<Thumbnail>,
}

impl DraftPatch {
    pub fn title(value: impl Into<String>) -> Self {
        Self {
            title: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn content(value: impl Into<String>) -> Self {
        Self {
            content: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn tags(value: impl Into<String>) -> Self {
        Self {
            tags: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn meta(value: impl Into<String>) -> Self {
        Self {
            meta: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn featured(value: bool) -> Self {
        Self {
            featured: Some(value),
            ..Self::default()
        }
    }

    pub fn thumbnail(value: Thumbnail) -> Self {
        Self {
            thumbnail: Some(value),
            ..Self::default()
        }
    }
}

/// Holds the current draft snapshot. Snapshots are immutable; every update
/// swaps in a new one.
#[derive(Debug, Clone, Default)]
pub struct FieldStore {
    current: Arc<PostDraft>,
}

impl FieldStore {
    pub fn new(initial: PostDraft) -> Self {
        Self {
            current: Arc::new(initial),
        }
    }

    pub fn get(&self) -> Arc<PostDraft> {
        Arc::clone(&self.current)
    }

    pub fn set(&mut self, patch: DraftPatch) -> Arc<PostDraft> {
        self.current = Arc::new(self.current.merged(patch));
        self.get()
    }

    pub fn replace(&mut self, draft: PostDraft) -> Arc<PostDraft> {
        self.current = Arc::new(draft);
        self.get()
    }
}

/// Serialized shape of a draft in the durable slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub meta: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl From<&PostDraft> for DraftRecord {
    fn from(draft: &PostDraft) -> Self {
        let thumbnail = match &draft.thumbnail {
            Thumbnail::Remote(url) => Some(url.clone()),
            Thumbnail::Empty | Thumbnail::Local { .. } => None,
        };

        Self {
            title: draft.title.clone(),
            content: draft.content.clone(),
            tags: draft.tags.clone(),
            meta: draft.meta.clone(),
            featured: draft.featured,
            thumbnail,
        }
    }
}

impl From<DraftRecord> for PostDraft {
    fn from(record: DraftRecord) -> Self {
        Self {
            title: record.title,
            content: record.content,
            tags: record.tags,
            meta: record.meta,
            featured: record.featured,
            thumbnail: record
                .thumbnail
                .filter(|url| !url.trim().is_empty())
                .map(Thumbnail::Remote)
                .unwrap_or_default(),
        }
    }
}

/// Clamp a meta description once it reaches the advertised limit.
pub fn clamp_meta(value: String) -> String {
    if value.chars().count() >= MAX_META_CHARS {
        value.chars().take(META_CLAMP_CHARS).collect()
    } else {
        value
    }
}
