use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Html,
};
use tracing::{error, info, warn};

use crate::{
    catalog::{StoryCatalog, StoryEntry},
    records::{StorySubmission, Submission, timestamp_now},
    web::{
        AppState,
        responses::{PageError, not_found_page, server_error},
        templates::{PageLayout, escape_html, render_flash, render_page},
        uploads::{UploadError, read_story_form},
    },
};

const UPLOAD_SUCCESS_MESSAGE: &str = "Thank you! Your story has been uploaded.";
const UNREADABLE_FORM_MESSAGE: &str = "We couldn't read your upload. Please try again.";

pub async fn stories_page(State(state): State<AppState>) -> Html<String> {
    Html(render_stories_page(state.catalog(), None))
}

pub async fn submit_story(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Html<String>, PageError> {
    let catalog = state.catalog();
    let rejected = |message: &str| {
        (
            StatusCode::BAD_REQUEST,
            Html(render_stories_page(catalog, Some((message, true)))),
        )
    };

    let form = match read_story_form(multipart, state.uploads()).await {
        Ok(form) => form,
        Err(UploadError::Malformed(message)) => {
            warn!(%message, "could not read story upload form");
            return Err(rejected(UNREADABLE_FORM_MESSAGE));
        }
        Err(UploadError::Storage(err)) => {
            error!(?err, "failed to store story upload");
            return Err(server_error());
        }
    };

    let stored = form.attachment.map_err(|reason| {
        warn!(reason = reason.message(), "rejected story upload");
        rejected(reason.message())
    })?;
    let stored_filename = stored.stored_name;

    let submission = Submission::Story(StorySubmission {
        uploaded_at: timestamp_now(),
        name: form.name,
        email: form.email,
        title: form.title,
        stored_filename: stored_filename.clone(),
    });
    if let Err(err) = state.records().append(&submission).await {
        error!(?err, "failed to record story submission");
        if let Err(cleanup) = state.uploads().discard(&stored_filename).await {
            warn!(?cleanup, "failed to remove unrecorded story upload");
        }
        return Err(server_error());
    }

    info!(
        %stored_filename,
        original = %stored.original_name,
        bytes = stored.size,
        "story submission accepted"
    );

    Ok(Html(render_stories_page(
        catalog,
        Some((UPLOAD_SUCCESS_MESSAGE, false)),
    )))
}

pub async fn story_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Html<String>, PageError> {
    let story = state.catalog().get(&slug).ok_or_else(not_found_page)?;
    Ok(Html(render_story_detail(story)))
}

fn render_stories_page(catalog: &StoryCatalog, flash: Option<(&str, bool)>) -> String {
    let flash_html = flash
        .map(|(message, is_error)| render_flash(message, is_error))
        .unwrap_or_default();

    let cards = catalog
        .entries()
        .iter()
        .map(|story| {
            format!(
                r#"<a class="card" href="/stories/{slug}"><h3>{title}</h3><p>{short}</p><div>{tags}</div></a>"#,
                slug = escape_html(story.slug),
                title = escape_html(story.title),
                short = escape_html(story.short),
                tags = render_tags(story),
            )
        })
        .collect::<String>();

    let body = format!(
        r#"        <section class="panel">
            <h1>Stories</h1>
            <p class="lead">Ideas we are developing right now. Have one of your own? Send it to us below.</p>
            <div class="card-grid">
                {cards}
            </div>
        </section>
        <section class="panel" id="submit">
            <h2>Submit your story</h2>
            {flash_html}
            <form method="post" action="/stories" enctype="multipart/form-data">
                <label for="name">Your name</label>
                <input id="name" name="name">
                <label for="email">Email</label>
                <input id="email" type="email" name="email">
                <label for="title">Story title</label>
                <input id="title" name="title">
                <label for="file">Manuscript (PDF, DOC or DOCX)</label>
                <input id="file" type="file" name="file" accept=".pdf,.doc,.docx">
                <button type="submit">Upload story</button>
            </form>
        </section>"#,
    );

    render_page(PageLayout::new("Stories", body).active("/stories"))
}

fn render_story_detail(story: &StoryEntry) -> String {
    let paragraphs = story
        .paragraphs
        .iter()
        .map(|paragraph| format!(r#"<p class="lead">{}</p>"#, escape_html(paragraph)))
        .collect::<Vec<_>>()
        .join("\n            ");

    let body = format!(
        r#"        <section class="panel">
            <h1>{title}</h1>
            <div>{tags}</div>
            {paragraphs}
            <a class="button" href="/stories">← All stories</a>
        </section>"#,
        title = escape_html(story.title),
        tags = render_tags(story),
        paragraphs = paragraphs,
    );

    render_page(PageLayout::new(story.title, body).active("/stories"))
}

fn render_tags(story: &StoryEntry) -> String {
    story
        .tags
        .iter()
        .map(|tag| format!(r#"<span class="tag">{}</span>"#, escape_html(tag)))
        .collect()
}
