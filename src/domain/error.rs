use thiserror::Error;

/// Reasons a draft cannot be submitted. Messages are shown to the author as-is.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title is missing")]
    MissingTitle,
    #[error("Content is missing")]
    MissingContent,
    #[error("Tags are necessary")]
    MissingTags,
    #[error("Please add some meta descriptions!")]
    MissingMeta,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("This is not an image!")]
    NotAnImage,
    #[error("an image upload is already in progress")]
    Busy,
    #[error("{0}")]
    BackendFailure(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("a submission is already in progress")]
    Busy,
    #[error("{0}")]
    BackendFailure(String),
}

/// Failures while loading an existing post for editing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("post `{slug}` not found")]
    NotFound { slug: String },
    #[error("{0}")]
    BackendFailure(String),
}

impl UploadError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::BackendFailure(message.into())
    }
}

impl SubmitError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::BackendFailure(message.into())
    }
}
