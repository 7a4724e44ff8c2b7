use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};

use crate::web::{AppState, admin, auth, forms, landing, responses, stories};

const ROBOTS_TXT_BODY: &str = include_str!("../../robots.txt");

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(landing::home_page))
        .route("/about", get(landing::about_page))
        .route("/films", get(landing::films_page))
        .route(
            "/stories",
            get(stories::stories_page)
                .merge(post(stories::submit_story).layer(DefaultBodyLimit::disable())),
        )
        .route("/stories/:slug", get(stories::story_detail))
        .route(
            "/casting",
            get(forms::casting_page).post(forms::submit_casting),
        )
        .route(
            "/contact",
            get(forms::contact_page).post(forms::submit_contact),
        )
        .route(
            "/admin/login",
            get(auth::login_page).post(auth::process_login),
        )
        .route("/admin/logout", get(auth::logout))
        .route("/admin/dashboard", get(admin::dashboard))
        .route("/admin/download/:kind", get(admin::download_submissions))
        .route("/healthz", get(healthz))
        .route("/robots.txt", get(robots_txt))
        .fallback(responses::fallback)
        .with_state(state)
}

async fn robots_txt() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        ROBOTS_TXT_BODY,
    )
}

async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}
