//! Wire types exchanged with the blog post authoring API.
//!
//! The backend speaks camelCase JSON. Post responses are wrapped in a
//! `{ "post": ... }` envelope and failures carry `{ "error": "..." }`.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A stored blog post as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub meta: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

/// Envelope used by the fetch, create and update endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostEnvelope {
    pub post: Post,
}

/// Envelope used by the search endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostListEnvelope {
    #[serde(default)]
    pub posts: Vec<Post>,
}

/// Result of uploading an inline body image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUploadResponse {
    #[serde(rename = "imageUrl", alias = "image")]
    pub image_url: String,
}

/// Error body returned alongside non-success statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}
