//! The post-authoring form engine.
//!
//! [`PostForm`] owns the live draft for one authoring session. Field edits are
//! written through to the draft slot, submissions are validated before the
//! caller's submit capability runs, and body images go through the
//! single-flight [`UploadCoordinator`].
//!
//! The form is a cheap handle over shared state. State is locked only for the
//! synchronous part of each operation, never across an `.await`, so edits keep
//! landing while a submit or upload is in flight.

use std::sync::{Arc, Mutex, MutexGuard};

use metrics::counter;
use soffio_composer_api_types::Post;
use tracing::{debug, info, warn};

use crate::application::drafts::DraftPersistence;
use crate::application::metrics::{METRIC_SUBMIT_FAILED, METRIC_SUBMIT_TOTAL};
use crate::application::ports::{
    DraftStore, MarkdownRenderer, Notice, Notifier, PostApi, SubmitPost,
};
use crate::application::preview::{DevicePreview, MarkdownHint};
use crate::application::uploads::{PendingUpload, UploadCoordinator, UploadState};
use crate::domain::draft::{
    DraftPatch, FieldStore, MAX_META_CHARS, PostDraft, Thumbnail, clamp_meta,
};
use crate::domain::error::{SubmitError, UploadError, ValidationError};
use crate::domain::image::{ImageFile, PreviewRef, image_markdown};
use crate::domain::submission::validate;
use crate::domain::tags::exceeds_tag_limit;
use crate::util::lock::mutex_lock;


const SOURCE: &str = "application::form";

pub const TAG_LIMIT_WARNING: &str = "Only the first four tags will be selected!";
pub const COPIED_NOTICE: &str = "Copied to Clipboard!";

/// Collaborators shared by every form in a process.
#[derive(Clone)]
pub struct FormServices {
    pub api: Arc<dyn PostApi>,
    pub drafts: Arc<dyn DraftStore>,
    pub notifier: Arc<dyn Notifier>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormOptions {
    pub submit_label: String,
    /// Clear the draft after a successful submit and on unmount.
    pub reset_after_submit: bool,
}

impl FormOptions {
    pub fn create() -> Self {
        Self {
            submit_label: "Post".to_string(),
            reset_after_submit: false,
        }
    }

    pub fn update() -> Self {
        Self {
            submit_label: "Update".to_string(),
            reset_after_submit: true,
        }
    }
}

/// A single edit coming from the form's inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Title(String),
    Content(String),
    Tags(String),
    Meta(String),
    Featured(bool),
}

/// Inputs that can take focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Content,
    Tags,
    Meta,
}

/// What happened to a submit request. Failures have already been reported to
/// the notifier by the time this is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted(Post),
    Invalid(ValidationError),
    Failed(SubmitError),
}

/// Snapshot of everything a UI needs to draw the form.
#[derive(Debug, Clone)]
pub struct FormView {
    pub draft: Arc<PostDraft>,
    pub thumbnail_preview: Option<String>,
    pub submit_label: String,
    pub submitting: bool,
    pub upload: UploadState,
    /// Present while the body editor has focus.
    pub markdown_hint: Option<MarkdownHint>,
    pub device_view: bool,
    pub meta_counter: String,
}

struct FormState {
    fields: FieldStore,
    submitting: bool,
    markdown_hint: bool,
    device_view: bool,
}

struct FormInner {
    options: FormOptions,
    drafts: DraftPersistence,
    uploads: UploadCoordinator,
    notifier: Arc<dyn Notifier>,
    submitter: Arc<dyn SubmitPost>,
    state: Mutex<FormState>,
}

#[derive(Clone)]
pub struct PostForm {
    inner: Arc<FormInner>,
}

impl PostForm {
    /// Mount a form for a new post, resuming the saved draft when there is one.
    pub fn mount(
        services: &FormServices,
        submitter: Arc<dyn SubmitPost>,
        options: FormOptions,
    ) -> Self {
        let drafts = DraftPersistence::new(Arc::clone(&services.drafts));
        let initial = match drafts.restore() {
            Some(draft) => {
                info!(target = SOURCE, "resuming saved draft");
                draft
            }
            None => PostDraft::default(),
        };
        Self::build(services, submitter, options, drafts, initial)
    }

    /// Mount a form hydrated from an existing post. The draft slot is not
    /// consulted, so a stale draft never overwrites the stored post.
    pub fn mount_hydrated(
        services: &FormServices,
        submitter: Arc<dyn SubmitPost>,
        options: FormOptions,
        initial: PostDraft,
    ) -> Self {
        let drafts = DraftPersistence::new(Arc::clone(&services.drafts));
        Self::build(services, submitter, options, drafts, initial)
    }

    fn build(
        services: &FormServices,
        submitter: Arc<dyn SubmitPost>,
        options: FormOptions,
        drafts: DraftPersistence,
        initial: PostDraft,
    ) -> Self {
        let uploads = UploadCoordinator::new(
            Arc::clone(&services.api),
            Arc::clone(&services.notifier),
        );
        let state = FormState {
            fields: FieldStore::new(initial),
            submitting: false,
            markdown_hint: false,
            device_view: false,
        };

        Self {
            inner: Arc::new(FormInner {
                options,
                drafts,
                uploads,
                notifier: Arc::clone(&services.notifier),
                submitter,
                state: Mutex::new(state),
            }),
        }
    }

    fn lock(&self, op: &'static str) -> MutexGuard<'_, FormState> {
        mutex_lock(&self.inner.state, SOURCE, op)
    }

    pub fn options(&self) -> &FormOptions {
        &self.inner.options
    }

    pub fn draft(&self) -> Arc<PostDraft> {
        self.lock("draft").fields.get()
    }

    pub fn is_submitting(&self) -> bool {
        self.lock("is_submitting").submitting
    }

    pub fn uploads(&self) -> &UploadCoordinator {
        &self.inner.uploads
    }

    pub fn view(&self) -> FormView {
        let state = self.lock("view");
        let draft = state.fields.get();
        FormView {
            thumbnail_preview: draft.thumbnail.preview_url().map(str::to_string),
            meta_counter: format!("{}/{MAX_META_CHARS}", draft.meta.chars().count()),
            draft,
            submit_label: self.inner.options.submit_label.clone(),
            submitting: state.submitting,
            upload: self.inner.uploads.state(),
            markdown_hint: state.markdown_hint.then(MarkdownHint::standard),
            device_view: state.device_view,
        }
    }

    /// Apply one field edit and write the result through to the draft slot.
    pub fn on_field_change(&self, edit: FieldEdit) -> Arc<PostDraft> {
        let patch = match edit {
            FieldEdit::Title(value) => DraftPatch::title(value),
            FieldEdit::Content(value) => DraftPatch::content(value),
            FieldEdit::Tags(value) => {
                if exceeds_tag_limit(&value) {
                    self.inner.notifier.notify(Notice::warning(TAG_LIMIT_WARNING));
                }
                DraftPatch::tags(value)
            }
            FieldEdit::Meta(value) => DraftPatch::meta(clamp_meta(value)),
            FieldEdit::Featured(value) => DraftPatch::featured(value),
        };
        self.apply(patch, "on_field_change")
    }

    /// Select a cover image. Only the type is checked here; the file is sent
    /// with the final submission.
    pub fn on_thumbnail_pick(&self, file: ImageFile) -> Result<PreviewRef, UploadError> {
        if !file.is_image() {
            let err = UploadError::NotAnImage;
            self.inner.notifier.notify(Notice::error(err.to_string()));
            return Err(err);
        }

        let preview = PreviewRef::local(&file);
        debug!(
            target = SOURCE,
            file_name = %file.file_name,
            preview = %preview,
            "thumbnail selected"
        );
        self.apply(
            DraftPatch::thumbnail(Thumbnail::Local {
                file,
                preview: preview.clone(),
            }),
            "on_thumbnail_pick",
        );
        Ok(preview)
    }

    /// Claim the upload slot for a body image without awaiting the upload.
    pub fn start_image_upload(&self, file: ImageFile) -> Result<PendingUpload, UploadError> {
        self.inner.uploads.start_upload(file)
    }

    /// Upload a body image and return its URL.
    pub async fn on_image_pick(&self, file: ImageFile) -> Result<String, UploadError> {
        self.start_image_upload(file)?.finish().await
    }

    /// Markdown embedding the last uploaded image, ready for the clipboard.
    pub fn copy_image_markdown(&self) -> Option<String> {
        let url = self.inner.uploads.result_url()?;
        self.inner.notifier.notify(Notice::success(COPIED_NOTICE));
        Some(image_markdown(&url))
    }

    /// Validate the current draft and hand the payload to the submit capability.
    ///
    /// The payload is fixed before the request is sent; edits made while it is
    /// in flight stay in the draft but are not part of this submission.
    pub async fn on_submit(&self) -> SubmitOutcome {
        let payload = {
            let mut state = self.lock("on_submit");
            if state.submitting {
                debug!(target = SOURCE, "submit already in flight");
                return SubmitOutcome::Failed(SubmitError::Busy);
            }
            match validate(&state.fields.get()) {
                Ok(payload) => {
                    state.submitting = true;
                    payload
                }
                Err(err) => {
                    drop(state);
                    debug!(target = SOURCE, error = %err, "draft rejected");
                    self.inner.notifier.notify(Notice::error(err.to_string()));
                    return SubmitOutcome::Invalid(err);
                }
            }
        };

        counter!(METRIC_SUBMIT_TOTAL).increment(1);
        info!(target = SOURCE, slug = %payload.slug, tags = payload.tags.len(), "submitting post");

        let guard = SubmittingGuard {
            inner: Arc::clone(&self.inner),
        };
        let result = self.inner.submitter.submit(payload).await;
        drop(guard);

        match result {
            Ok(post) => {
                info!(target = SOURCE, post_id = %post.id, slug = %post.slug, "post submitted");
                if self.inner.options.reset_after_submit {
                    self.on_reset();
                }
                SubmitOutcome::Submitted(post)
            }
            Err(err) => {
                counter!(METRIC_SUBMIT_FAILED).increment(1);
                warn!(target = SOURCE, error = %err, "submit failed");
                let err = SubmitError::backend(err.to_string());
                self.inner.notifier.notify(Notice::error(err.to_string()));
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Back to empty defaults, in memory and in the draft slot.
    pub fn on_reset(&self) {
        let mut state = self.lock("on_reset");
        state.fields.replace(PostDraft::default());
        self.inner.drafts.clear();
    }

    /// Replace the draft wholesale, e.g. with the post returned by an update.
    /// The draft slot is left alone.
    pub fn hydrate(&self, draft: PostDraft) -> Arc<PostDraft> {
        self.lock("hydrate").fields.replace(draft)
    }

    /// Leave the form. Reset-after-submit forms discard their draft; others
    /// keep it so authoring can resume later.
    pub fn unmount(&self) {
        if self.inner.options.reset_after_submit {
            self.on_reset();
        }
    }

    /// Focusing the body shows the markdown hint; focusing the title hides it.
    pub fn focus(&self, field: Field) {
        let mut state = self.lock("focus");
        match field {
            Field::Content => state.markdown_hint = true,
            Field::Title => state.markdown_hint = false,
            Field::Tags | Field::Meta => {}
        }
    }

    pub fn open_device_view(&self) {
        self.lock("open_device_view").device_view = true;
    }

    pub fn close_device_view(&self) {
        self.lock("close_device_view").device_view = false;
    }

    /// Render the draft the way a reader would see it.
    pub fn preview(&self, renderer: &dyn MarkdownRenderer) -> DevicePreview {
        DevicePreview::render(&self.draft(), renderer)
    }

    fn apply(&self, patch: DraftPatch, op: &'static str) -> Arc<PostDraft> {
        let mut state = self.lock(op);
        let draft = state.fields.set(patch);
        self.inner.drafts.save(&draft);
        draft
    }
}

/// Clears the submitting flag when the submit future finishes or is dropped.
struct SubmittingGuard {
    inner: Arc<FormInner>,
}

impl Drop for SubmittingGuard {
    fn drop(&mut self) {
        mutex_lock(&self.inner.state, SOURCE, "submit_release").submitting = false;
    }
}
