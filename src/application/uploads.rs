//! Single-flight upload of inline body images.
//!
//! The coordinator moves between `Idle` and `Uploading`. Claiming the slot is
//! synchronous, so a second pick while an upload is in flight is turned away
//! before any request is made; it is neither queued nor allowed to cancel the
//! first.

use std::sync::{Arc, Mutex};

use metrics::counter;
use tracing::{debug, info, warn};

use crate::application::metrics::{METRIC_UPLOAD_FAILED, METRIC_UPLOAD_STARTED};
use crate::application::ports::{Notice, Notifier, PostApi};
use crate::domain::error::UploadError;
use crate::domain::image::ImageFile;
use crate::util::lock::mutex_lock;

const SOURCE: &str = "application::uploads";

/// Observable upload state for UI feedback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadState {
    pub busy: bool,
    /// URL of the most recent successful upload.
    pub result_url: Option<String>,
}

#[derive(Clone)]
pub struct UploadCoordinator {
    api: Arc<dyn PostApi>,
    notifier: Arc<dyn Notifier>,
    state: Arc<Mutex<UploadState>>,
}

impl UploadCoordinator {
    pub fn new(api: Arc<dyn PostApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            state: Arc::new(Mutex::new(UploadState::default())),
        }
    }

    pub fn state(&self) -> UploadState {
        mutex_lock(&self.state, SOURCE, "state").clone()
    }

    pub fn is_busy(&self) -> bool {
        mutex_lock(&self.state, SOURCE, "is_busy").busy
    }

    pub fn result_url(&self) -> Option<String> {
        mutex_lock(&self.state, SOURCE, "result_url")
            .result_url
            .clone()
    }

    /// Claim the upload slot for `file`.
    ///
    /// Non-images are reported to the notifier and rejected; a pick while
    /// another upload is in flight is rejected silently. Neither touches the
    /// state. The returned [`PendingUpload`] performs the request.
    pub fn start_upload(&self, file: ImageFile) -> Result<PendingUpload, UploadError> {
        if !file.is_image() {
            let err = UploadError::NotAnImage;
            self.notifier.notify(Notice::error(err.to_string()));
            return Err(err);
        }

        {
            let mut state = mutex_lock(&self.state, SOURCE, "start_upload");
            if state.busy {
                debug!(
                    target = SOURCE,
                    file_name = %file.file_name,
                    "upload already in flight, ignoring pick"
                );
                return Err(UploadError::Busy);
            }
            state.busy = true;
        }

        counter!(METRIC_UPLOAD_STARTED).increment(1);
        info!(
            target = SOURCE,
            file_name = %file.file_name,
            content_type = %file.content_type,
            size_bytes = file.bytes.len(),
            "starting image upload"
        );

        Ok(PendingUpload {
            guard: BusyGuard {
                state: Arc::clone(&self.state),
            },
            api: Arc::clone(&self.api),
            notifier: Arc::clone(&self.notifier),
            file,
        })
    }

    /// Claim the slot and run the upload to completion.
    pub async fn upload(&self, file: ImageFile) -> Result<String, UploadError> {
        self.start_upload(file)?.finish().await
    }
}

/// An upload that holds the single-flight slot until it completes or is dropped.
#[must_use = "the upload only runs when `finish` is awaited"]
pub struct PendingUpload {
    guard: BusyGuard,
    api: Arc<dyn PostApi>,
    notifier: Arc<dyn Notifier>,
    file: ImageFile,
}

impl PendingUpload {
    pub async fn finish(self) -> Result<String, UploadError> {
        let PendingUpload {
            guard,
            api,
            notifier,
            file,
        } = self;
        let file_name = file.file_name.clone();

        match api.upload_image(file).await {
            Ok(image) => {
                info!(target = SOURCE, file_name = %file_name, url = %image.url, "image uploaded");
                guard.complete(Some(image.url.clone()));
                Ok(image.url)
            }
            Err(err) => {
                counter!(METRIC_UPLOAD_FAILED).increment(1);
                warn!(target = SOURCE, file_name = %file_name, error = %err, "image upload failed");
                guard.complete(None);
                let err = UploadError::backend(err.to_string());
                notifier.notify(Notice::error(err.to_string()));
                Err(err)
            }
        }
    }
}

/// Returns the coordinator to `Idle` even when the pending future is abandoned.
struct BusyGuard {
    state: Arc<Mutex<UploadState>>,
}

impl BusyGuard {
    fn complete(self, result_url: Option<String>) {
        let mut state = mutex_lock(&self.state, SOURCE, "complete");
        if result_url.is_some() {
            state.result_url = result_url;
        }
        // busy is cleared by Drop once the guard goes out of scope
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        mutex_lock(&self.state, SOURCE, "release").busy = false;
    }
}
