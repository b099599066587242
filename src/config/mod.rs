//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{num::NonZeroU64, path::PathBuf, str::FromStr, time::Duration};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

mod cli;

pub use cli::{
    CliArgs, Command, DraftArgs, DraftCommand, EditArgs, FieldArgs, GlobalOverrides, NewArgs,
    PreviewArgs, SearchArgs, UploadImageArgs,
};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "soffio-composer";
const ENV_PREFIX: &str = "SOFFIO_COMPOSER";
const DEFAULT_API_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DRAFTS_DIR: &str = ".soffio-composer";
pub(crate) const DEFAULT_DRAFT_SLOT: &str = "blogPost";

#[derive(Debug, Clone)]
pub struct Settings {
    /// Absent when no base URL is configured; only commands that talk to the
    /// API require it.
    pub api: Option<ApiSettings>,
    pub drafts: DraftSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Always ends with `/` so endpoint paths join beneath it.
    pub base_url: Url,
    pub timeout: Duration,
    pub token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DraftSettings {
    pub directory: PathBuf,
    pub slot: String,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(&cli.overrides);

    Settings::from_raw(raw)
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    api: RawApiSettings,
    drafts: RawDraftSettings,
    logging: RawLoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawApiSettings {
    base_url: Option<String>,
    timeout_seconds: Option<u64>,
    token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawDraftSettings {
    directory: Option<PathBuf>,
    slot: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &GlobalOverrides) {
        if let Some(url) = overrides.api_base_url.as_ref() {
            self.api.base_url = Some(url.clone());
        }
        if let Some(token) = overrides.api_token.as_ref() {
            self.api.token = Some(token.clone());
        }
        if let Some(seconds) = overrides.api_timeout_seconds {
            self.api.timeout_seconds = Some(seconds);
        }
        if let Some(directory) = overrides.drafts_directory.as_ref() {
            self.drafts.directory = Some(directory.clone());
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    pub fn require_api(&self) -> Result<&ApiSettings, LoadError> {
        self.api
            .as_ref()
            .ok_or_else(|| LoadError::invalid("api.base_url", "must be set"))
    }

    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            api,
            drafts,
            logging,
        } = raw;

        Ok(Self {
            api: build_api_settings(api)?,
            drafts: build_draft_settings(drafts)?,
            logging: build_logging_settings(logging)?,
        })
    }
}

fn build_api_settings(api: RawApiSettings) -> Result<Option<ApiSettings>, LoadError> {
    let timeout_secs = api.timeout_seconds.unwrap_or(DEFAULT_API_TIMEOUT_SECS);
    let timeout_secs = NonZeroU64::new(timeout_secs)
        .ok_or_else(|| LoadError::invalid("api.timeout_seconds", "must be greater than zero"))?;

    let Some(raw_url) = non_blank(api.base_url) else {
        return Ok(None);
    };
    let mut base_url = Url::parse(&raw_url)
        .map_err(|err| LoadError::invalid("api.base_url", format!("failed to parse: {err}")))?;
    if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
        return Err(LoadError::invalid(
            "api.base_url",
            "must be an http or https URL",
        ));
    }
    if !base_url.path().ends_with('/') {
        let path = format!("{}/", base_url.path());
        base_url.set_path(&path);
    }

    Ok(Some(ApiSettings {
        base_url,
        timeout: Duration::from_secs(timeout_secs.get()),
        token: non_blank(api.token),
    }))
}

fn build_draft_settings(drafts: RawDraftSettings) -> Result<DraftSettings, LoadError> {
    let directory = drafts
        .directory
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DRAFTS_DIR));
    if directory.as_os_str().is_empty() {
        return Err(LoadError::invalid(
            "drafts.directory",
            "path must not be empty",
        ));
    }

    let slot = drafts
        .slot
        .map(|slot| slot.trim().to_string())
        .unwrap_or_else(|| DEFAULT_DRAFT_SLOT.to_string());
    if slot.is_empty() {
        return Err(LoadError::invalid("drafts.slot", "must not be empty"));
    }
    if !slot
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'))
        || slot.starts_with('.')
    {
        return Err(LoadError::invalid(
            "drafts.slot",
            "may only contain ASCII letters, digits, `-`, `_` and `.`",
        ));
    }

    Ok(DraftSettings { directory, slot })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::WARN,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}
