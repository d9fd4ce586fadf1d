use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::PrivateCookieJar;

use crate::app::AppState;
use crate::auth::session::SessionData;
use crate::db::models::User;
use crate::error::AppError;

/// Per-request context handed explicitly to every authenticated handler.
///
/// Extraction fails with `AppError::Auth` when nobody is logged in or the
/// session points at a user that no longer exists.
pub struct RequestContext {
    /// The authenticated user.
    pub user: User,
    /// Session contents as read at the start of the request.
    pub session: SessionData,
    /// Cookie jar to hand back when the session changes.
    pub jar: PrivateCookieJar,
}

impl RequestContext {
    /// Persist `session` into the cookie jar, consuming the context.
    pub fn commit(self, session: &SessionData) -> Result<PrivateCookieJar, AppError> {
        session.store(self.jar)
    }
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::from_headers(&parts.headers, state.cookie_key.clone());
        let session = SessionData::from_jar(&jar);

        let user_id = session
            .user_id
            .ok_or_else(|| AppError::Auth("Not logged in".into()))?;

        let user = state
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!(user_id, "Session refers to an unknown user");
                AppError::Auth("Invalid session".into())
            })?;

        Ok(Self { user, session, jar })
    }
}
