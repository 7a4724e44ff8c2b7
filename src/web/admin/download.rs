use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{error, info, warn};

use crate::{
    records::{SubmissionKind, export_csv},
    web::{
        AppState,
        responses::{error_page, server_error},
        storage::attachment_response,
    },
};

use super::auth::require_admin;

/// Fresh CSV export of one submission kind, rebuilt from the store on every request.
pub async fn download_submissions(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(kind): Path<String>,
) -> Result<Response, Response> {
    require_admin(&state, &jar)
        .await
        .map_err(IntoResponse::into_response)?;

    let Some(kind) = SubmissionKind::from_key(&kind) else {
        warn!(%kind, "export requested for unknown submission kind");
        return Err(error_page(
            StatusCode::BAD_REQUEST,
            "Unknown export",
            "Choose one of: stories, casting, contact.",
        )
        .into_response());
    };

    let table = state.records().list_all(kind).await.map_err(|err| {
        error!(?err, kind = kind.key(), "failed to load submissions for export");
        server_error().into_response()
    })?;
    let bytes = export_csv(&table).map_err(|err| {
        error!(?err, kind = kind.key(), "failed to encode export");
        server_error().into_response()
    })?;

    info!(kind = kind.key(), rows = table.rows.len(), "exported submissions");
    attachment_response(bytes, kind.csv_file_name(), mime::TEXT_CSV_UTF_8.as_ref())
        .map_err(IntoResponse::into_response)
}
