use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::application::metrics::{
    METRIC_DRAFT_RESTORE_DISCARDED, METRIC_DRAFT_SAVE_FAILED, METRIC_SUBMIT_FAILED,
    METRIC_SUBMIT_TOTAL, METRIC_UPLOAD_FAILED, METRIC_UPLOAD_STARTED,
};
use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            METRIC_DRAFT_SAVE_FAILED,
            Unit::Count,
            "Total number of draft writes that failed."
        );
        describe_counter!(
            METRIC_DRAFT_RESTORE_DISCARDED,
            Unit::Count,
            "Total number of unreadable drafts discarded on restore."
        );
        describe_counter!(
            METRIC_UPLOAD_STARTED,
            Unit::Count,
            "Total number of inline image uploads started."
        );
        describe_counter!(
            METRIC_UPLOAD_FAILED,
            Unit::Count,
            "Total number of inline image uploads that failed."
        );
        describe_counter!(
            METRIC_SUBMIT_TOTAL,
            Unit::Count,
            "Total number of validated post submissions."
        );
        describe_counter!(
            METRIC_SUBMIT_FAILED,
            Unit::Count,
            "Total number of post submissions rejected by the backend."
        );
    });
}
