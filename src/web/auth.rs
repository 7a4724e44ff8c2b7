use std::{collections::HashSet, sync::Arc};

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use cookie::time::Duration as CookieDuration;
use rand_core::OsRng;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::web::{AppState, responses::PageError, templates::render_login_page};

pub const SESSION_COOKIE: &str = "cineartist_admin";
pub const LOGIN_PATH: &str = "/admin/login";
pub const DASHBOARD_PATH: &str = "/admin/dashboard";

/// Server-side set of authenticated admin sessions, keyed by cookie token.
///
/// A token is either present (Authenticated) or absent (Anonymous); there is
/// no expiry.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    tokens: Arc<RwLock<HashSet<Uuid>>>,
}

impl SessionRegistry {
    pub async fn open(&self) -> Uuid {
        let token = Uuid::new_v4();
        self.tokens.write().await.insert(token);
        token
    }

    pub async fn is_active(&self, token: Uuid) -> bool {
        self.tokens.read().await.contains(&token)
    }

    pub async fn close(&self, token: Uuid) -> bool {
        self.tokens.write().await.remove(&token)
    }
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Default, Deserialize)]
pub struct LoginQuery {
    pub status: Option<String>,
}

pub async fn login_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<LoginQuery>,
) -> Result<Html<String>, Redirect> {
    if active_session(&state, &jar).await.is_some() {
        return Err(Redirect::to(DASHBOARD_PATH));
    }

    let flash = match params.status.as_deref() {
        Some("logged_out") => Some(("You have been logged out.", false)),
        _ => None,
    };

    Ok(Html(render_login_page(flash)))
}

pub async fn process_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Redirect), PageError> {
    if !state.admin().matches(&form.username, &form.password) {
        warn!(username = %form.username, "rejected admin login");
        return Err(invalid_credentials());
    }

    let token = state.sessions().open().await;
    info!("admin signed in");

    let mut cookie = Cookie::new(SESSION_COOKIE, token.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);

    let jar = jar.add(cookie);
    Ok((jar, Redirect::to(DASHBOARD_PATH)))
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let mut jar = jar;

    if let Some(token) = session_token(&jar) {
        if state.sessions().close(token).await {
            info!("admin signed out");
        }
    }

    let mut removal = Cookie::new(SESSION_COOKIE, "");
    removal.set_path("/");
    removal.set_http_only(true);
    removal.set_same_site(SameSite::Lax);
    removal.set_max_age(CookieDuration::seconds(0));
    jar = jar.remove(removal);

    (jar, Redirect::to(&format!("{LOGIN_PATH}?status=logged_out")))
}

/// The caller's session token, if it names a live admin session.
pub async fn active_session(state: &AppState, jar: &CookieJar) -> Option<Uuid> {
    let token = session_token(jar)?;
    state.sessions().is_active(token).await.then_some(token)
}

fn session_token(jar: &CookieJar) -> Option<Uuid> {
    let cookie = jar.get(SESSION_COOKIE)?;
    Uuid::parse_str(cookie.value()).ok()
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let parsed = PasswordHash::new(password_hash);
    match parsed {
        Ok(hash) => Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok(),
        Err(_) => false,
    }
}

fn invalid_credentials() -> PageError {
    (
        StatusCode::UNAUTHORIZED,
        Html(render_login_page(Some(("Invalid credentials", true)))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn registry_tracks_open_and_closed_sessions() {
        let registry = SessionRegistry::default();
        let token = registry.open().await;

        assert!(registry.is_active(token).await);
        assert!(!registry.is_active(Uuid::new_v4()).await);

        assert!(registry.close(token).await);
        assert!(!registry.is_active(token).await);
        assert!(!registry.close(token).await);
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("lights-camera").expect("hash");
        assert!(verify_password("lights-camera", &hash));
        assert!(!verify_password("lights-camera ", &hash));
        assert!(!verify_password("lights-camera", "not-a-phc-string"));
    }

    #[test]
    fn reads_token_from_cookie() {
        let token = Uuid::new_v4();
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, token.to_string()));
        assert_eq!(session_token(&jar), Some(token));

        let garbage = CookieJar::new().add(Cookie::new(SESSION_COOKIE, "nope"));
        assert_eq!(session_token(&garbage), None);
    }
}
