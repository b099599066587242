//! Doubles shared by the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use soffio_composer::application::form::FormServices;
use soffio_composer::application::ports::{
    ApiError, DraftStore, Notice, NoticeKind, Notifier, PostApi, UploadedImage,
};
use soffio_composer::domain::image::ImageFile;
use soffio_composer::domain::submission::SubmissionPayload;
use soffio_composer_api_types::Post;

#[derive(Default)]
pub struct StubApi {
    pub posts: Mutex<Vec<Post>>,
    pub submissions: Mutex<Vec<SubmissionPayload>>,
    pub reject_with: Mutex<Option<String>>,
}

impl StubApi {
    pub fn with_post(post: Post) -> Self {
        let api = Self::default();
        api.posts.lock().expect("posts").push(post);
        api
    }

    pub fn submissions(&self) -> Vec<SubmissionPayload> {
        self.submissions.lock().expect("submissions").clone()
    }

    fn rejection(&self) -> Option<ApiError> {
        self.reject_with
            .lock()
            .expect("reject_with")
            .clone()
            .map(|message| ApiError::Rejected {
                status: 422,
                message,
            })
    }

    fn store(&self, id: &str, payload: SubmissionPayload) -> Post {
        let post = Post {
            id: id.to_string(),
            title: payload.title.clone(),
            content: payload.content.clone(),
            meta: payload.meta.clone(),
            slug: payload.slug.clone(),
            tags: payload.tags.clone(),
            featured: payload.featured,
            thumbnail: None,
            created_at: None,
        };
        self.submissions.lock().expect("submissions").push(payload);
        post
    }
}

#[async_trait]
impl PostApi for StubApi {
    async fn fetch_post(&self, slug: &str) -> Result<Post, ApiError> {
        self.posts
            .lock()
            .expect("posts")
            .iter()
            .find(|post| post.slug == slug)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn create_post(&self, payload: SubmissionPayload) -> Result<Post, ApiError> {
        match self.rejection() {
            Some(err) => Err(err),
            None => Ok(self.store("new-post", payload)),
        }
    }

    async fn update_post(&self, id: &str, payload: SubmissionPayload) -> Result<Post, ApiError> {
        match self.rejection() {
            Some(err) => Err(err),
            None => Ok(self.store(id, payload)),
        }
    }

    async fn upload_image(&self, image: ImageFile) -> Result<UploadedImage, ApiError> {
        match self.rejection() {
            Some(err) => Err(err),
            None => Ok(UploadedImage {
                url: format!("https://cdn.example/{}", image.file_name),
            }),
        }
    }
}

#[derive(Default)]
pub struct Notices {
    notices: Mutex<Vec<Notice>>,
}

impl Notices {
    pub fn texts(&self, kind: NoticeKind) -> Vec<String> {
        self.notices
            .lock()
            .expect("notices")
            .iter()
            .filter(|notice| notice.kind == kind)
            .map(|notice| notice.text.clone())
            .collect()
    }
}

impl Notifier for Notices {
    fn notify(&self, notice: Notice) {
        self.notices.lock().expect("notices").push(notice);
    }
}

pub fn services(
    api: Arc<dyn PostApi>,
    drafts: Arc<dyn DraftStore>,
    notices: Arc<Notices>,
) -> FormServices {
    FormServices {
        api,
        drafts,
        notifier: notices,
    }
}

pub fn png(name: &str) -> ImageFile {
    ImageFile::new(name, "image/png", vec![0x89u8, b'P', b'N', b'G'])
}

pub fn stored_post(slug: &str) -> Post {
    Post {
        id: "post-42".into(),
        title: "Stored".into(),
        content: "Stored body".into(),
        meta: "Stored meta".into(),
        slug: slug.into(),
        tags: vec!["rust".into(), "cli".into()],
        featured: true,
        thumbnail: Some("https://cdn.example/cover.png".into()),
        created_at: None,
    }
}
