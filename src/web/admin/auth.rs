use axum::response::Redirect;
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::web::{
    AppState,
    auth::{LOGIN_PATH, active_session},
};

/// Gate for admin-only views: the live session token, or a redirect to the login form.
pub async fn require_admin(state: &AppState, jar: &CookieJar) -> Result<Uuid, Redirect> {
    active_session(state, jar)
        .await
        .ok_or_else(|| Redirect::to(LOGIN_PATH))
}
