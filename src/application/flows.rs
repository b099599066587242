//! Create and update flows built on top of [`PostForm`].

use std::sync::Arc;

use async_trait::async_trait;
use soffio_composer_api_types::Post;
use tracing::{info, warn};

use crate::application::form::{FormOptions, FormServices, PostForm, SubmitOutcome};
use crate::application::ports::{ApiError, Notice, PostApi, SubmitPost};
use crate::domain::draft::PostDraft;
use crate::domain::error::FetchError;
use crate::domain::submission::SubmissionPayload;

const SOURCE: &str = "application::flows";

/// Submits new posts.
pub struct CreatePost {
    api: Arc<dyn PostApi>,
}

impl CreatePost {
    pub fn new(api: Arc<dyn PostApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl SubmitPost for CreatePost {
    async fn submit(&self, payload: SubmissionPayload) -> Result<Post, ApiError> {
        self.api.create_post(payload).await
    }
}

/// Submits changes to one existing post.
pub struct UpdatePost {
    api: Arc<dyn PostApi>,
    post_id: String,
}

impl UpdatePost {
    pub fn new(api: Arc<dyn PostApi>, post_id: impl Into<String>) -> Self {
        Self {
            api,
            post_id: post_id.into(),
        }
    }
}

#[async_trait]
impl SubmitPost for UpdatePost {
    async fn submit(&self, payload: SubmissionPayload) -> Result<Post, ApiError> {
        self.api.update_post(&self.post_id, payload).await
    }
}

/// Open the new-post form, resuming any saved draft.
pub fn compose(services: &FormServices) -> PostForm {
    PostForm::mount(
        services,
        Arc::new(CreatePost::new(Arc::clone(&services.api))),
        FormOptions::create(),
    )
}

/// What the edit route shows.
pub enum EditorView {
    Form(EditSession),
    NotFound(FetchError),
}

/// An open editor for an existing post.
pub struct EditSession {
    form: PostForm,
    post: Post,
}

impl EditSession {
    /// Load `slug` and hydrate a form from it. Any fetch failure lands on the
    /// not-found view.
    pub async fn open(services: &FormServices, slug: &str) -> EditorView {
        match services.api.fetch_post(slug).await {
            Ok(post) => {
                info!(target = SOURCE, slug, post_id = %post.id, "opened post for editing");
                let form = PostForm::mount_hydrated(
                    services,
                    Arc::new(UpdatePost::new(Arc::clone(&services.api), post.id.clone())),
                    FormOptions::update(),
                    PostDraft::from_post(&post),
                );
                EditorView::Form(EditSession { form, post })
            }
            Err(err) => {
                warn!(target = SOURCE, slug, error = %err, "failed to load post");
                let err = match err {
                    ApiError::NotFound => FetchError::NotFound {
                        slug: slug.to_string(),
                    },
                    other => FetchError::BackendFailure(other.to_string()),
                };
                services.notifier.notify(Notice::error(err.to_string()));
                EditorView::NotFound(err)
            }
        }
    }

    pub fn form(&self) -> &PostForm {
        &self.form
    }

    /// The post as last returned by the backend.
    pub fn post(&self) -> &Post {
        &self.post
    }

    /// Submit the form; on success the editor shows the stored post again.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let outcome = self.form.on_submit().await;
        if let SubmitOutcome::Submitted(post) = &outcome {
            self.form.hydrate(PostDraft::from_post(post));
            self.post = post.clone();
        }
        outcome
    }

    /// Leave the editor. Dropping the session does the same, so an early
    /// return never leaves the edited post in the shared draft slot.
    pub fn close(self) {
        drop(self);
    }
}

impl Drop for EditSession {
    fn drop(&mut self) {
        self.form.unmount();
    }
}
