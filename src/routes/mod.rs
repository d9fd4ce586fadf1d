pub mod documents;
pub mod errors;
pub mod link_account;
pub mod messages;
pub mod session;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

/// Plain `302 Found` redirect.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
