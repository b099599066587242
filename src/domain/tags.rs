//! Comma-separated tag entry handling.

/// Number of tags a post can carry; extra entries are dropped at submit time.
pub const MAX_TAGS: usize = 4;

/// Split a raw tag entry into the trimmed tags that will be submitted.
///
/// Only the first [`MAX_TAGS`] entries survive. Empty entries between commas
/// are kept as empty strings so positions match what the author typed.
pub fn normalize_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .take(MAX_TAGS)
        .map(str::to_string)
        .collect()
}

/// Whether the raw entry names more tags than will be submitted.
pub fn exceeds_tag_limit(raw: &str) -> bool {
    raw.split(',').count() > MAX_TAGS
}

/// Render stored tags back into the editable raw form.
pub fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}
