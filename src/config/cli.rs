use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the composer binary.
#[derive(Debug, Parser)]
#[command(
    name = "soffio-composer",
    version,
    about = "Write, preview and publish blog posts"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "SOFFIO_COMPOSER_CONFIG_FILE",
        value_name = "PATH",
        value_hint = ValueHint::FilePath,
        global = true
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: GlobalOverrides,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args, Default, Clone)]
pub struct GlobalOverrides {
    /// Override the API base URL, e.g. `https://blog.example/api/`.
    #[arg(long = "api-base-url", value_name = "URL", global = true)]
    pub api_base_url: Option<String>,

    /// Bearer token sent with every API request.
    #[arg(
        long = "api-token",
        env = "SOFFIO_COMPOSER_API_TOKEN",
        value_name = "TOKEN",
        hide_env_values = true,
        global = true
    )]
    pub api_token: Option<String>,

    /// Override the API request timeout.
    #[arg(long = "api-timeout-seconds", value_name = "SECONDS", global = true)]
    pub api_timeout_seconds: Option<u64>,

    /// Override the directory holding the draft slot.
    #[arg(
        long = "drafts-directory",
        value_name = "PATH",
        value_hint = ValueHint::DirPath,
        global = true
    )]
    pub drafts_directory: Option<PathBuf>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Compose a new post, resuming the saved draft, and publish it.
    New(NewArgs),
    /// Edit an existing post by slug.
    Edit(EditArgs),
    /// Upload an inline image and print its markdown snippet.
    #[command(name = "upload-image")]
    UploadImage(UploadImageArgs),
    /// Inspect or discard the saved draft.
    Draft(DraftArgs),
    /// Render the saved draft to HTML.
    Preview(PreviewArgs),
    /// Search published posts by title.
    Search(SearchArgs),
}

/// Field values applied on top of the current draft.
#[derive(Debug, Args, Default, Clone)]
pub struct FieldArgs {
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Post body as inline markdown.
    #[arg(long, value_name = "MARKDOWN", conflicts_with = "content_file")]
    pub content: Option<String>,

    /// Read the post body from a markdown file.
    #[arg(long = "content-file", value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub content_file: Option<PathBuf>,

    /// Comma-separated tags; only the first four are kept.
    #[arg(long, value_name = "TAGS")]
    pub tags: Option<String>,

    #[arg(long, value_name = "TEXT")]
    pub meta: Option<String>,

    #[arg(long, value_name = "BOOL", value_parser = BoolishValueParser::new())]
    pub featured: Option<bool>,

    /// Cover image sent with the submission.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub thumbnail: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct NewArgs {
    #[command(flatten)]
    pub fields: FieldArgs,

    /// Only save the draft; do not submit.
    #[arg(long = "save-only", action = clap::ArgAction::SetTrue)]
    pub save_only: bool,
}

#[derive(Debug, Args, Clone)]
pub struct EditArgs {
    /// Slug of the post to edit.
    pub slug: String,

    #[command(flatten)]
    pub fields: FieldArgs,
}

#[derive(Debug, Args, Clone)]
pub struct UploadImageArgs {
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct DraftArgs {
    #[command(subcommand)]
    pub command: DraftCommand,
}

#[derive(Debug, Subcommand, Clone)]
pub enum DraftCommand {
    /// Print the saved draft as JSON.
    Show,
    /// Discard the saved draft.
    Reset,
}

#[derive(Debug, Args, Clone)]
pub struct PreviewArgs {
    /// Write the HTML page here instead of stdout.
    #[arg(long, short, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct SearchArgs {
    pub query: String,
}
