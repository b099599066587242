//! Metric names emitted by the authoring engine.

pub const METRIC_DRAFT_SAVE_FAILED: &str = "composer_draft_save_failed_total";
pub const METRIC_DRAFT_RESTORE_DISCARDED: &str = "composer_draft_restore_discarded_total";
pub const METRIC_UPLOAD_STARTED: &str = "composer_image_upload_started_total";
pub const METRIC_UPLOAD_FAILED: &str = "composer_image_upload_failed_total";
pub const METRIC_SUBMIT_TOTAL: &str = "composer_submit_total";
pub const METRIC_SUBMIT_FAILED: &str = "composer_submit_failed_total";
