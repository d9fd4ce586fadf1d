use std::sync::Arc;

use axum::extract::FromRef;
use axum::routing::{get, post};
use axum::Router;
use axum_extra::extract::cookie::Key;

use crate::db::community_repository::CommunityRepository;
use crate::db::repository::DocumentRepository;
use crate::db::user_repository::UserRepository;
use crate::messaging::client::MessagingService;
use crate::routes;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub document_repo: Arc<dyn DocumentRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub community_repo: Arc<dyn CommunityRepository>,
    pub messaging: Arc<dyn MessagingService>,
    /// Encryption key of the session cookie.
    pub cookie_key: Key,
    /// Workplace app secret used to verify signed requests.
    pub app_secret: String,
    /// Lifetime of a platform signed request.
    pub signed_request_max_age: chrono::Duration,
    pub demo_mode: bool,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Build the application router (without transport layers).
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::session::index_handler))
        .route("/login", post(crate::auth::demo_auth::login_handler))
        .route("/logout", get(routes::session::logout_handler))
        .route("/documents", get(routes::documents::list_handler))
        .route(
            "/document/create",
            get(routes::documents::create_form_handler).post(routes::documents::create_handler),
        )
        .route("/document/{id}", get(routes::documents::view_handler))
        .route(
            "/messages",
            get(routes::messages::messages_page_handler)
                .post(routes::messages::send_message_handler),
        )
        .route(
            "/link_account",
            get(routes::link_account::receive_signed_request_handler),
        )
        .route(
            "/link_account_confirm",
            get(routes::link_account::confirm_page_handler)
                .post(routes::link_account::confirm_handler),
        )
        .fallback(routes::errors::not_found_handler)
        .with_state(state)
}
