//! `reqwest` implementation of the authoring API.

use std::path::Path;

use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder, Response, StatusCode, Url,
    multipart::{Form, Part},
};
use serde::de::DeserializeOwned;
use soffio_composer_api_types::{
    ApiErrorBody, ImageUploadResponse, Post, PostEnvelope, PostListEnvelope,
};
use tracing::debug;

use crate::application::ports::{ApiError, PostApi, PostSearch, UploadedImage};
use crate::config::ApiSettings;
use crate::domain::image::ImageFile;
use crate::domain::submission::{PayloadPart, SubmissionPayload};

use super::error::InfraError;

const SOURCE: &str = "infra::api";
const IMAGE_FIELD: &str = "image";

#[derive(Clone, Debug)]
pub struct HttpPostApi {
    client: Client,
    base: Url,
    token: Option<String>,
}

impl HttpPostApi {
    pub fn new(settings: &ApiSettings) -> Result<Self, InfraError> {
        if settings.base_url.cannot_be_a_base() {
            return Err(InfraError::configuration(format!(
                "API base URL `{}` cannot carry endpoint paths",
                settings.base_url
            )));
        }

        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(settings.timeout)
            .build()
            .map_err(|err| InfraError::http(err.to_string()))?;

        Ok(Self {
            client,
            base: settings.base_url.clone(),
            token: settings.token.clone(),
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("soffio-composer/", env!("CARGO_PKG_VERSION"))
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::transport("API base URL cannot carry endpoint paths"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &'static str,
    ) -> Result<T, ApiError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(ApiError::transport)?;
        debug!(
            target = SOURCE,
            endpoint,
            status = response.status().as_u16(),
            "api response"
        );
        Self::handle(response).await
    }

    async fn handle<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        let bytes = response.bytes().await.map_err(ApiError::transport)?;

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }
        if !status.is_success() {
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message: error_message(status, &bytes),
            });
        }

        serde_json::from_slice(&bytes).map_err(ApiError::decode)
    }
}

/// Prefer the backend's `{ "error": ... }` message, then the raw body.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(parsed) = serde_json::from_slice::<ApiErrorBody>(body) {
        return parsed.error;
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        format!("request failed with status {status}")
    } else {
        text
    }
}

fn file_part(file: ImageFile) -> Result<Part, ApiError> {
    Part::bytes(file.bytes.to_vec())
        .file_name(file.file_name)
        .mime_str(&file.content_type)
        .map_err(ApiError::transport)
}

fn submission_form(payload: &SubmissionPayload) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for (name, part) in payload.parts() {
        form = match part {
            PayloadPart::Text(value) => form.text(name, value),
            PayloadPart::File(file) => form.part(name, file_part(file)?),
        };
    }
    Ok(form)
}

#[async_trait]
impl PostApi for HttpPostApi {
    async fn fetch_post(&self, slug: &str) -> Result<Post, ApiError> {
        let url = self.url(&["post", "single", slug])?;
        let envelope: PostEnvelope = self.send(self.client.get(url), "fetch_post").await?;
        Ok(envelope.post)
    }

    async fn create_post(&self, payload: SubmissionPayload) -> Result<Post, ApiError> {
        let url = self.url(&["post", "create"])?;
        let form = submission_form(&payload)?;
        let envelope: PostEnvelope = self
            .send(self.client.post(url).multipart(form), "create_post")
            .await?;
        Ok(envelope.post)
    }

    async fn update_post(&self, id: &str, payload: SubmissionPayload) -> Result<Post, ApiError> {
        let url = self.url(&["post", id])?;
        let form = submission_form(&payload)?;
        let envelope: PostEnvelope = self
            .send(self.client.put(url).multipart(form), "update_post")
            .await?;
        Ok(envelope.post)
    }

    async fn upload_image(&self, image: ImageFile) -> Result<UploadedImage, ApiError> {
        let url = self.url(&["post", "upload-image"])?;
        let form = Form::new().part(IMAGE_FIELD, file_part(image)?);
        let response: ImageUploadResponse = self
            .send(self.client.post(url).multipart(form), "upload_image")
            .await?;
        Ok(UploadedImage {
            url: response.image_url,
        })
    }
}

#[async_trait]
impl PostSearch for HttpPostApi {
    async fn search(&self, query: &str) -> Result<Vec<Post>, ApiError> {
        let mut url = self.url(&["post", "search"])?;
        url.query_pairs_mut().append_pair("title", query);
        let envelope: PostListEnvelope = self.send(self.client.get(url), "search").await?;
        Ok(envelope.posts)
    }
}

/// Read an image from disk, guessing its content type from the extension.
pub fn read_image_file(path: &Path) -> Result<ImageFile, InfraError> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload.bin")
        .to_string();
    let content_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    Ok(ImageFile::new(file_name, content_type, bytes))
}
