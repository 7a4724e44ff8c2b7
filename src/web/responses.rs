use axum::{http::StatusCode, response::Html};

use crate::web::templates::{PageLayout, escape_html, render_page};

/// Error half of every HTML handler.
pub type PageError = (StatusCode, Html<String>);

pub fn error_page(status: StatusCode, heading: &str, message: &str) -> PageError {
    let body = format!(
        r#"        <section class="panel">
            <h1>{heading}</h1>
            <p class="lead">{message}</p>
            <a class="button" href="/">Back to home</a>
        </section>"#,
        heading = escape_html(heading),
        message = escape_html(message),
    );
    (status, Html(render_page(PageLayout::new(heading, body))))
}

pub fn not_found_page() -> PageError {
    error_page(
        StatusCode::NOT_FOUND,
        "Page not found",
        "We couldn't find what you were looking for.",
    )
}

pub fn server_error() -> PageError {
    error_page(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Something went wrong",
        "Please try again in a little while.",
    )
}

pub async fn fallback() -> PageError {
    not_found_page()
}
