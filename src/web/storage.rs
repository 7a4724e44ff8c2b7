use std::path::Path;

use anyhow::{Context, Result};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};

use crate::web::responses::server_error;

/// Ensure a storage directory exists, creating parents as needed.
pub async fn ensure_storage_root(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .with_context(|| format!("failed to ensure storage root at {}", path.display()))
}

/// Wrap bytes in a download response with an attachment disposition.
pub fn attachment_response(
    bytes: Vec<u8>,
    filename: &str,
    content_type: &str,
) -> Result<Response, (StatusCode, Html<String>)> {
    let mut headers = HeaderMap::new();
    let content_type = HeaderValue::from_str(content_type).map_err(|_| server_error())?;
    headers.insert(header::CONTENT_TYPE, content_type);
    let disposition = format!("attachment; filename=\"{}\"", filename);
    let disposition = HeaderValue::from_str(&disposition).map_err(|_| server_error())?;
    headers.insert(header::CONTENT_DISPOSITION, disposition);

    Ok((headers, bytes).into_response())
}
