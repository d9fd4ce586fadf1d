use axum::extract::State;
use axum::response::{Html, Response};
use axum_extra::extract::PrivateCookieJar;

use crate::app::AppState;
use crate::auth::session::SessionData;
use crate::error::AppError;
use crate::rendering::views;
use crate::routes::found;

/// `GET /` — Landing page, reachable without a session.
pub async fn index_handler(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let mut context = views::page_context(None);
    context.insert("demo_mode", &state.demo_mode);
    views::render("index.html", &context)
}

/// `GET /logout` — Forget the authenticated user and go back to `/`.
///
/// Only the login is dropped; a pending signed request stays in the session.
pub async fn logout_handler(jar: PrivateCookieJar) -> Result<(PrivateCookieJar, Response), AppError> {
    let mut session = SessionData::from_jar(&jar);
    if let Some(user_id) = session.user_id.take() {
        tracing::info!(user_id, "User logged out");
    }
    let jar = session.store(jar)?;
    Ok((jar, found("/")))
}
