//! Image files picked by the author and the references derived from them.

use std::fmt;

use bytes::Bytes;
use uuid::Uuid;

const IMAGE_CONTENT_TYPE_PREFIX: &str = "image/";
const LOCAL_PREVIEW_SCHEME: &str = "local-preview";

/// Alt text placeholder used when handing an uploaded image URL to the author.
pub const IMAGE_ALT_PLACEHOLDER: &str = "Add image description";

/// Determine whether the provided MIME type denotes an image.
pub fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .trim()
        .to_ascii_lowercase()
        .starts_with(IMAGE_CONTENT_TYPE_PREFIX)
}

/// Markdown snippet that embeds an uploaded image in the post body.
pub fn image_markdown(url: &str) -> String {
    format!("![{IMAGE_ALT_PLACEHOLDER}]({url})")
}

/// A file picked from the author's machine, held in memory until submission.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl ImageFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    #[must_use]
    pub fn is_image(&self) -> bool {
        is_image_content_type(&self.content_type)
    }
}

// Payload bytes stay out of logs.
impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size_bytes", &self.bytes.len())
            .finish()
    }
}

/// Session-local reference used to preview a picked file before it is uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRef(String);

impl PreviewRef {
    /// Mint a fresh preview reference for a picked file.
    pub fn local(file: &ImageFile) -> Self {
        Self(format!(
            "{LOCAL_PREVIEW_SCHEME}://{}/{}",
            Uuid::new_v4(),
            file.file_name
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PreviewRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_content_types_are_detected() {
        assert!(is_image_content_type("image/png"));
        assert!(is_image_content_type("IMAGE/JPEG"));
        assert!(!is_image_content_type("application/pdf"));
        assert!(!is_image_content_type("text/plain; charset=image"));
        assert!(!is_image_content_type(""));
    }

    #[test]
    fn markdown_snippet_wraps_url() {
        assert_eq!(
            image_markdown("https://cdn.example/a.png"),
            "![Add image description](https://cdn.example/a.png)"
        );
    }

    #[test]
    fn preview_refs_are_unique_per_pick() {
        let file = ImageFile::new("cover.png", "image/png", vec![1u8, 2, 3]);
        let first = PreviewRef::local(&file);
        let second = PreviewRef::local(&file);
        assert_ne!(first, second);
        assert!(first.as_str().starts_with("local-preview://"));
        assert!(first.as_str().ends_with("/cover.png"));
    }

    #[test]
    fn debug_output_omits_bytes() {
        let file = ImageFile::new("cover.png", "image/png", vec![0u8; 16]);
        let rendered = format!("{file:?}");
        assert!(rendered.contains("size_bytes: 16"));
        assert!(!rendered.contains("bytes: b"));
    }
}
