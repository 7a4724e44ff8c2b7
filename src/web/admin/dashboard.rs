use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::error;

use crate::{
    records::{SubmissionKind, SubmissionTable, display_timestamp},
    web::{
        AppState,
        responses::server_error,
        templates::{PageLayout, escape_html, render_page},
    },
};

use super::auth::require_admin;

pub async fn dashboard(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Html<String>, Response> {
    require_admin(&state, &jar)
        .await
        .map_err(IntoResponse::into_response)?;

    let mut sections = String::new();
    for kind in SubmissionKind::ALL {
        let table = state.records().list_all(kind).await.map_err(|err| {
            error!(?err, kind = kind.key(), "failed to load submissions for dashboard");
            server_error().into_response()
        })?;
        sections.push_str(&render_table_section(&table));
    }

    let body = format!(
        r#"        <section class="panel">
            <div class="header-bar">
                <h1>Admin Dashboard</h1>
                <a class="button" href="/admin/logout">Log out</a>
            </div>
            <p class="lead">Signed in as <strong>{username}</strong>.</p>
        </section>
{sections}"#,
        username = escape_html(state.admin().username()),
        sections = sections,
    );

    Ok(Html(render_page(
        PageLayout::new("Admin Dashboard", body).noindex(),
    )))
}

fn render_table_section(table: &SubmissionTable) -> String {
    let head = table
        .columns
        .iter()
        .map(|column| format!("<th>{}</th>", escape_html(column)))
        .collect::<String>();

    let body = if table.rows.is_empty() {
        format!(
            r#"<tr><td colspan="{span}">No submissions yet.</td></tr>"#,
            span = table.columns.len().max(1)
        )
    } else {
        table.rows.iter().map(|row| render_row(row)).collect()
    };

    format!(
        r#"        <section class="panel" id="{key}">
            <div class="header-bar">
                <h2>{label} ({count})</h2>
                <a class="button" href="/admin/download/{key}">Download CSV</a>
            </div>
            <table>
                <thead><tr>{head}</tr></thead>
                <tbody>{body}</tbody>
            </table>
        </section>
"#,
        key = table.kind.key(),
        label = table.kind.label(),
        count = table.rows.len(),
        head = head,
        body = body,
    )
}

/// The first cell of every row is its timestamp.
fn render_row(row: &[String]) -> String {
    let cells = row
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            let shown = if idx == 0 {
                display_timestamp(value)
            } else {
                value.clone()
            };
            format!("<td>{}</td>", escape_html(&shown))
        })
        .collect::<String>();

    format!("<tr>{cells}</tr>")
}
