//! Capability traits the authoring engine consumes.
//!
//! Everything outside the engine (backend, durable storage, notifications,
//! markdown rendering, search) is injected through these seams so tests can
//! substitute in-memory doubles.

use async_trait::async_trait;
use soffio_composer_api_types::Post;
use thiserror::Error;

use crate::domain::draft::DraftRecord;
use crate::domain::image::ImageFile;
use crate::domain::submission::SubmissionPayload;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("resource not found")]
    NotFound,
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }
}

/// An image stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub url: String,
}

/// Backend request/response contract for posts and images.
#[async_trait]
pub trait PostApi: Send + Sync {
    async fn fetch_post(&self, slug: &str) -> Result<Post, ApiError>;

    async fn create_post(&self, payload: SubmissionPayload) -> Result<Post, ApiError>;

    async fn update_post(&self, id: &str, payload: SubmissionPayload) -> Result<Post, ApiError>;

    async fn upload_image(&self, image: ImageFile) -> Result<UploadedImage, ApiError>;
}

/// The caller-supplied action run with a validated payload.
#[async_trait]
pub trait SubmitPost: Send + Sync {
    async fn submit(&self, payload: SubmissionPayload) -> Result<Post, ApiError>;
}

#[derive(Debug, Error)]
pub enum DraftStoreError {
    #[error("draft storage unavailable: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored draft is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// A single named durable slot holding the serialized draft.
pub trait DraftStore: Send + Sync {
    /// Name of the slot, used in logs.
    fn slot(&self) -> &str;

    fn save(&self, record: &DraftRecord) -> Result<(), DraftStoreError>;

    /// `Ok(None)` when the slot is empty.
    fn restore(&self) -> Result<Option<DraftRecord>, DraftStoreError>;

    fn clear(&self) -> Result<(), DraftStoreError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Warning,
    Error,
}

impl NoticeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Info => "info",
            NoticeKind::Warning => "warning",
            NoticeKind::Error => "error",
        }
    }
}

/// A one-shot message for the author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(NoticeKind::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, text)
    }

    fn new(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Pure markdown-to-HTML rendering.
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, markdown: &str) -> String;
}

#[async_trait]
pub trait PostSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<Post>, ApiError>;
}
