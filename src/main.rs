use std::{fs, process, sync::Arc};

use soffio_composer::{
    application::{
        drafts::DraftPersistence,
        error::AppError,
        flows::{self, EditSession, EditorView},
        form::{FieldEdit, FormServices, PostForm, SubmitOutcome},
        preview::{DevicePreview, MarkdownHint},
        search::SearchBox,
        uploads::UploadCoordinator,
    },
    config::{
        self, Command, DraftArgs, DraftCommand, EditArgs, FieldArgs, NewArgs, PreviewArgs,
        SearchArgs, Settings, UploadImageArgs,
    },
    domain::{
        draft::DraftRecord,
        image::image_markdown,
        posts::PostCard,
    },
    infra::{
        api::{HttpPostApi, read_image_file},
        drafts::FileDraftStore,
        error::InfraError,
        notify::ConsoleNotifier,
        render::ComrakRenderer,
        telemetry,
    },
};
use soffio_composer_api_types::Post;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(error.exit_code());
    }
}

fn report_application_error(error: &AppError) {
    let report = error.report();
    if dispatcher::has_been_set() {
        error!(error = %error, chain = ?report.messages, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_writer(std::io::stderr)
        .with_max_level(Level::ERROR)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, chain = ?report.messages, "application error");
    });
}

struct Runtime {
    services: FormServices,
    api: Arc<HttpPostApi>,
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli().map_err(|err| {
        InfraError::configuration(format!("failed to load configuration: {err}"))
    })?;

    telemetry::init(&settings.logging)?;
    let drafts = draft_store(&settings);

    match cli_args.command {
        Command::Draft(args) => run_draft(drafts, args),
        Command::Preview(args) => run_preview(drafts, args),
        Command::New(args) => run_new(&connect(&settings, drafts)?, args).await,
        Command::Edit(args) => run_edit(&connect(&settings, drafts)?, args).await,
        Command::UploadImage(args) => {
            run_upload_image(&connect(&settings, drafts)?, args).await
        }
        Command::Search(args) => run_search(&connect(&settings, drafts)?, args).await,
    }
}

fn draft_store(settings: &Settings) -> Arc<FileDraftStore> {
    let drafts = Arc::new(FileDraftStore::from_settings(&settings.drafts));
    info!(draft_path = %drafts.path().display(), "draft slot configured");
    drafts
}

/// Build the HTTP client for commands that talk to the API.
fn connect(settings: &Settings, drafts: Arc<FileDraftStore>) -> Result<Runtime, AppError> {
    let api_settings = settings
        .require_api()
        .map_err(|err| InfraError::configuration(err.to_string()))?;
    let api = Arc::new(HttpPostApi::new(api_settings)?);
    info!(base_url = %api_settings.base_url, "api client configured");

    Ok(Runtime {
        services: FormServices {
            api: api.clone(),
            drafts,
            notifier: Arc::new(ConsoleNotifier),
        },
        api,
    })
}

async fn run_new(runtime: &Runtime, args: NewArgs) -> Result<(), AppError> {
    let form = flows::compose(&runtime.services);
    let has_thumbnail = args.fields.thumbnail.is_some();
    apply_fields(&form, args.fields)?;

    if args.save_only {
        if has_thumbnail {
            warn!("picked thumbnails are not kept in saved drafts");
        }
        println!("draft saved");
        return Ok(());
    }

    let post = submitted(form.on_submit().await)?;
    form.on_reset();
    print_post(&post);
    Ok(())
}

async fn run_edit(runtime: &Runtime, args: EditArgs) -> Result<(), AppError> {
    let mut session = match EditSession::open(&runtime.services, &args.slug).await {
        EditorView::Form(session) => session,
        EditorView::NotFound(err) => return Err(err.into()),
    };

    if let Err(err) = apply_fields(session.form(), args.fields) {
        session.close();
        return Err(err);
    }
    let outcome = session.submit().await;
    session.close();

    let post = submitted(outcome)?;
    print_post(&post);
    Ok(())
}

async fn run_upload_image(runtime: &Runtime, args: UploadImageArgs) -> Result<(), AppError> {
    let file = read_image_file(&args.file)?;
    let uploads = UploadCoordinator::new(
        runtime.services.api.clone(),
        runtime.services.notifier.clone(),
    );
    let url = uploads.upload(file).await?;
    println!("{}", image_markdown(&url));
    Ok(())
}

fn run_draft(store: Arc<FileDraftStore>, args: DraftArgs) -> Result<(), AppError> {
    let drafts = DraftPersistence::new(store);
    match args.command {
        DraftCommand::Show => match drafts.restore() {
            Some(draft) => {
                let json = serde_json::to_string_pretty(&DraftRecord::from(&draft))
                    .map_err(|err| AppError::unexpected(err.to_string()))?;
                println!("{json}");
            }
            None => println!("no saved draft"),
        },
        DraftCommand::Reset => {
            drafts.clear();
            println!("draft discarded");
        }
    }
    Ok(())
}

fn run_preview(store: Arc<FileDraftStore>, args: PreviewArgs) -> Result<(), AppError> {
    let draft = DraftPersistence::new(store).restore().unwrap_or_default();
    if draft.content.trim().is_empty() {
        eprint!("{}", MarkdownHint::standard().to_text());
    }
    let html = DevicePreview::render(&draft, &ComrakRenderer::new()).to_html_document();

    match args.output {
        Some(path) => {
            fs::write(&path, html).map_err(InfraError::from)?;
            println!("preview written to {}", path.display());
        }
        None => print!("{html}"),
    }
    Ok(())
}

async fn run_search(runtime: &Runtime, args: SearchArgs) -> Result<(), AppError> {
    let mut search = SearchBox::new(runtime.api.clone(), runtime.services.notifier.clone());
    search.set_query(args.query);
    if !search.submit().await {
        return Err(AppError::unexpected("search query must not be blank"));
    }

    if search.results().is_empty() {
        println!("no matching posts");
    }
    for card in search.results() {
        print_card(card);
    }
    Ok(())
}

/// Apply command-line field values on top of the form's current draft.
fn apply_fields(form: &PostForm, fields: FieldArgs) -> Result<(), AppError> {
    let FieldArgs {
        title,
        content,
        content_file,
        tags,
        meta,
        featured,
        thumbnail,
    } = fields;

    let content = match (content, content_file) {
        (Some(content), _) => Some(content),
        (None, Some(path)) => Some(fs::read_to_string(&path).map_err(InfraError::from)?),
        (None, None) => None,
    };

    let edits = [
        title.map(FieldEdit::Title),
        content.map(FieldEdit::Content),
        tags.map(FieldEdit::Tags),
        meta.map(FieldEdit::Meta),
        featured.map(FieldEdit::Featured),
    ];
    for edit in edits.into_iter().flatten() {
        form.on_field_change(edit);
    }

    if let Some(path) = thumbnail {
        let file = read_image_file(&path)?;
        form.on_thumbnail_pick(file)?;
    }
    Ok(())
}

fn submitted(outcome: SubmitOutcome) -> Result<Post, AppError> {
    match outcome {
        SubmitOutcome::Submitted(post) => Ok(post),
        SubmitOutcome::Invalid(err) => Err(err.into()),
        SubmitOutcome::Failed(err) => Err(err.into()),
    }
}

fn print_post(post: &Post) {
    print_card(&PostCard::from_post(post));
}

fn print_card(card: &PostCard) {
    let date = card.date.as_deref().unwrap_or("-");
    println!("{}\t{}\t{}\t{}", card.title, date, card.tags, card.edit_path);
}
