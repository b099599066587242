//! In-memory doubles shared by the application unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use soffio_composer_api_types::Post;
use tokio::sync::Notify;

use crate::application::ports::{
    ApiError, Notice, NoticeKind, Notifier, PostApi, PostSearch, UploadedImage,
};
use crate::domain::image::ImageFile;
use crate::domain::submission::SubmissionPayload;

pub(crate) fn png(name: &str) -> ImageFile {
    ImageFile::new(name, "image/png", vec![0x89u8, b'P', b'N', b'G'])
}

pub(crate) fn stored_post(id: &str, slug: &str) -> Post {
    Post {
        id: id.to_string(),
        title: "Stored title".to_string(),
        content: "Stored body".to_string(),
        meta: "Stored meta".to_string(),
        slug: slug.to_string(),
        tags: vec!["rust".to_string(), "web".to_string()],
        featured: false,
        thumbnail: Some("https://cdn.example/stored.png".to_string()),
        created_at: None,
    }
}

#[derive(Default)]
struct FakeApiState {
    posts: HashMap<String, Post>,
    upload_url: String,
    upload_error: Option<String>,
    upload_calls: usize,
    submit_error: Option<String>,
    created: Vec<SubmissionPayload>,
    updated: Vec<(String, SubmissionPayload)>,
}

/// Backend double recording every call.
#[derive(Default)]
pub(crate) struct FakeApi {
    state: Mutex<FakeApiState>,
    hold: Mutex<Option<Arc<Notify>>>,
    entered: Notify,
}

impl FakeApi {
    fn with_state<R>(&self, f: impl FnOnce(&mut FakeApiState) -> R) -> R {
        let mut state = self.state.lock().expect("fake api state");
        f(&mut state)
    }

    pub(crate) fn insert_post(&self, post: Post) {
        self.with_state(|state| state.posts.insert(post.slug.clone(), post));
    }

    pub(crate) fn set_upload_url(&self, url: &str) {
        self.with_state(|state| {
            state.upload_url = url.to_string();
            state.upload_error = None;
        });
    }

    pub(crate) fn fail_uploads(&self, message: &str) {
        self.with_state(|state| state.upload_error = Some(message.to_string()));
    }

    pub(crate) fn fail_submissions(&self, message: &str) {
        self.with_state(|state| state.submit_error = Some(message.to_string()));
    }

    pub(crate) fn upload_calls(&self) -> usize {
        self.with_state(|state| state.upload_calls)
    }

    pub(crate) fn created(&self) -> Vec<SubmissionPayload> {
        self.with_state(|state| state.created.clone())
    }

    pub(crate) fn updated(&self) -> Vec<(String, SubmissionPayload)> {
        self.with_state(|state| state.updated.clone())
    }

    /// Park submissions until the returned handle is notified.
    pub(crate) fn hold_submissions(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.hold.lock().expect("fake api hold") = Some(Arc::clone(&gate));
        gate
    }

    pub(crate) async fn submission_started(&self) {
        self.entered.notified().await;
    }

    async fn pass_gate(&self) {
        let gate = self.hold.lock().expect("fake api hold").clone();
        if let Some(gate) = gate {
            self.entered.notify_one();
            gate.notified().await;
        }
    }

    fn post_from(&self, id: &str, payload: &SubmissionPayload) -> Post {
        Post {
            id: id.to_string(),
            title: payload.title.clone(),
            content: payload.content.clone(),
            meta: payload.meta.clone(),
            slug: payload.slug.clone(),
            tags: payload.tags.clone(),
            featured: payload.featured,
            thumbnail: Some(format!("https://cdn.example/{id}.png")),
            created_at: None,
        }
    }
}

#[async_trait]
impl PostApi for FakeApi {
    async fn fetch_post(&self, slug: &str) -> Result<Post, ApiError> {
        self.with_state(|state| state.posts.get(slug).cloned())
            .ok_or(ApiError::NotFound)
    }

    async fn create_post(&self, payload: SubmissionPayload) -> Result<Post, ApiError> {
        self.pass_gate().await;
        if let Some(message) = self.with_state(|state| state.submit_error.clone()) {
            return Err(ApiError::Rejected {
                status: 500,
                message,
            });
        }
        let post = self.post_from("created-1", &payload);
        self.with_state(|state| state.created.push(payload));
        Ok(post)
    }

    async fn update_post(&self, id: &str, payload: SubmissionPayload) -> Result<Post, ApiError> {
        self.pass_gate().await;
        if let Some(message) = self.with_state(|state| state.submit_error.clone()) {
            return Err(ApiError::Rejected {
                status: 500,
                message,
            });
        }
        let post = self.post_from(id, &payload);
        self.with_state(|state| state.updated.push((id.to_string(), payload)));
        Ok(post)
    }

    async fn upload_image(&self, _image: ImageFile) -> Result<UploadedImage, ApiError> {
        self.with_state(|state| {
            state.upload_calls += 1;
            match &state.upload_error {
                Some(message) => Err(ApiError::Rejected {
                    status: 500,
                    message: message.clone(),
                }),
                None => Ok(UploadedImage {
                    url: state.upload_url.clone(),
                }),
            }
        })
    }
}

#[async_trait]
impl PostSearch for FakeApi {
    async fn search(&self, query: &str) -> Result<Vec<Post>, ApiError> {
        let needle = query.to_lowercase();
        Ok(self.with_state(|state| {
            state
                .posts
                .values()
                .filter(|post| post.title.to_lowercase().contains(&needle))
                .cloned()
                .collect()
        }))
    }
}

/// Notifier double keeping every notice in order.
#[derive(Default)]
pub(crate) struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub(crate) fn all(&self) -> Vec<Notice> {
        self.notices.lock().expect("notices").clone()
    }

    pub(crate) fn texts(&self, kind: NoticeKind) -> Vec<String> {
        self.all()
            .into_iter()
            .filter(|notice| notice.kind == kind)
            .map(|notice| notice.text)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().expect("notices").push(notice);
    }
}
