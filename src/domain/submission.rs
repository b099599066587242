//! Turning a draft into the payload sent to the backend.

use serde_json::Value;

use super::draft::{PostDraft, Thumbnail};
use super::error::ValidationError;
use super::image::ImageFile;
use super::slug::derive_slug;
use super::tags::normalize_tags;

pub const FIELD_TITLE: &str = "title";
pub const FIELD_CONTENT: &str = "content";
pub const FIELD_FEATURED: &str = "featured";
pub const FIELD_META: &str = "meta";
pub const FIELD_TAGS: &str = "tags";
pub const FIELD_SLUG: &str = "slug";
pub const FIELD_THUMBNAIL: &str = "thumbnail";

/// Thumbnail as it travels with a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadThumbnail {
    Absent,
    /// Keep the thumbnail the backend already stores.
    Url(String),
    File(ImageFile),
}

/// A validated, normalized submission. Built once per submit and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPayload {
    pub title: String,
    pub content: String,
    pub featured: bool,
    pub meta: String,
    pub tags: Vec<String>,
    pub slug: String,
    pub thumbnail: PayloadThumbnail,
}

/// One multipart field of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadPart {
    Text(String),
    File(ImageFile),
}

impl SubmissionPayload {
    /// Tags encoded as the JSON array string the backend expects.
    pub fn tags_json(&self) -> String {
        Value::from(self.tags.clone()).to_string()
    }

    /// Multipart fields in submission order.
    pub fn parts(&self) -> Vec<(&'static str, PayloadPart)> {
        let mut parts = vec![
            (FIELD_TITLE, PayloadPart::Text(self.title.clone())),
            (FIELD_CONTENT, PayloadPart::Text(self.content.clone())),
            (FIELD_FEATURED, PayloadPart::Text(self.featured.to_string())),
            (FIELD_META, PayloadPart::Text(self.meta.clone())),
            (FIELD_TAGS, PayloadPart::Text(self.tags_json())),
            (FIELD_SLUG, PayloadPart::Text(self.slug.clone())),
        ];

        match &self.thumbnail {
            PayloadThumbnail::Absent => {}
            PayloadThumbnail::Url(url) => {
                parts.push((FIELD_THUMBNAIL, PayloadPart::Text(url.clone())));
            }
            PayloadThumbnail::File(file) => {
                parts.push((FIELD_THUMBNAIL, PayloadPart::File(file.clone())));
            }
        }

        parts
    }
}

/// Check a draft for submission and normalize it into a payload.
///
/// Fields are checked in form order (title, content, tags, meta) and the first
/// missing one is reported.
pub fn validate(draft: &PostDraft) -> Result<SubmissionPayload, ValidationError> {
    if draft.title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    if draft.content.trim().is_empty() {
        return Err(ValidationError::MissingContent);
    }
    if draft.tags.trim().is_empty() {
        return Err(ValidationError::MissingTags);
    }
    if draft.meta.trim().is_empty() {
        return Err(ValidationError::MissingMeta);
    }

    let thumbnail = match &draft.thumbnail {
        Thumbnail::Empty => PayloadThumbnail::Absent,
        Thumbnail::Remote(url) => PayloadThumbnail::Url(url.clone()),
        Thumbnail::Local { file, .. } => PayloadThumbnail::File(file.clone()),
    };

    Ok(SubmissionPayload {
        title: draft.title.clone(),
        content: draft.content.clone(),
        featured: draft.featured,
        meta: draft.meta.clone(),
        tags: normalize_tags(&draft.tags),
        slug: derive_slug(&draft.title),
        thumbnail,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::image::PreviewRef;
    use crate::domain::tags::join_tags;

    fn complete_draft() -> PostDraft {
        PostDraft {
            title: "Hello, World! 2024".into(),
            content: "# Body".into(),
            tags: "a, b , c,d,e".into(),
            meta: "A short description".into(),
            featured: false,
            thumbnail: Thumbnail::Empty,
        }
    }

    #[test]
    fn reports_first_missing_field() {
        let cases = [
            (
                PostDraft {
                    title: "   ".into(),
                    ..complete_draft()
                },
                ValidationError::MissingTitle,
            ),
            (
                PostDraft {
                    content: "\n\t".into(),
                    ..complete_draft()
                },
                ValidationError::MissingContent,
            ),
            (
                PostDraft {
                    tags: "  ".into(),
                    ..complete_draft()
                },
                ValidationError::MissingTags,
            ),
            (
                PostDraft {
                    meta: String::new(),
                    ..complete_draft()
                },
                ValidationError::MissingMeta,
            ),
            (PostDraft::default(), ValidationError::MissingTitle),
        ];

        for (draft, expected) in cases {
            assert_eq!(validate(&draft), Err(expected));
        }
    }

    #[test]
    fn normalizes_slug_and_tags() {
        let payload = validate(&complete_draft()).expect("valid draft");
        assert_eq!(payload.slug, "hello-world");
        assert_eq!(payload.tags, vec!["a", "b", "c", "d"]);
        assert_eq!(payload.tags_json(), r#"["a","b","c","d"]"#);
        assert_eq!(payload.thumbnail, PayloadThumbnail::Absent);
    }

    #[test]
    fn validation_is_idempotent_on_derived_drafts() {
        let first = validate(&complete_draft()).expect("valid draft");
        let derived = PostDraft {
            title: first.title.clone(),
            content: first.content.clone(),
            tags: join_tags(&first.tags),
            meta: first.meta.clone(),
            featured: first.featured,
            thumbnail: Thumbnail::Empty,
        };

        let second = validate(&derived).expect("still valid");
        assert_eq!(second.slug, first.slug);
        assert_eq!(second.tags, first.tags);
    }

    #[test]
    fn parts_follow_field_order_and_carry_thumbnail_file() {
        let file = ImageFile::new("cover.png", "image/png", vec![1u8, 2]);
        let draft = PostDraft {
            featured: true,
            thumbnail: Thumbnail::Local {
                preview: PreviewRef::local(&file),
                file: file.clone(),
            },
            ..complete_draft()
        };

        let parts = validate(&draft).expect("valid").parts();
        let names: Vec<&str> = parts.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            ["title", "content", "featured", "meta", "tags", "slug", "thumbnail"]
        );
        assert_eq!(parts[2].1, PayloadPart::Text("true".into()));
        assert_eq!(parts[6].1, PayloadPart::File(file));
    }

    #[test]
    fn remote_thumbnail_is_sent_as_text() {
        let draft = PostDraft {
            thumbnail: Thumbnail::Remote("https://cdn.example/t.png".into()),
            ..complete_draft()
        };
        let parts = validate(&draft).expect("valid").parts();
        assert_eq!(
            parts.last().map(|(_, part)| part.clone()),
            Some(PayloadPart::Text("https://cdn.example/t.png".into()))
        );
    }

    #[test]
    fn tags_json_escapes_quotes() {
        let draft = PostDraft {
            tags: r#"say "hi", ok"#.into(),
            ..complete_draft()
        };
        let payload = validate(&draft).expect("valid");
        assert_eq!(payload.tags_json(), r#"["say \"hi\"","ok"]"#);
    }
}
