use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::AppError;
use crate::rendering::views::error_page;

impl AppError {
    /// HTTP status and page header used when this error reaches the client.
    pub fn status_and_header(&self) -> (StatusCode, Option<&'static str>) {
        match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, Some("Not found")),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, Some("Access denied")),
            AppError::DocumentNotFound => (StatusCode::NOT_FOUND, Some("Document does not exist")),
            AppError::DocumentPrivate => (StatusCode::FORBIDDEN, Some("Document is private")),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, None),
            AppError::Auth(_) => (StatusCode::UNAUTHORIZED, Some("Please log in")),
            AppError::Database(_) | AppError::Messaging(_) | AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Some("Something went wrong"),
            ),
        }
    }
}

/// The process-wide error handler: converts AppError into an HTML error page.
///
/// Upstream failures are logged here and their details are kept out of the
/// response body.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, header) = self.status_and_header();

        let message = match &self {
            AppError::NotFound(msg)
            | AppError::Forbidden(msg)
            | AppError::BadRequest(msg)
            | AppError::Auth(msg) => msg.clone(),
            AppError::DocumentNotFound => {
                "The document you requested does not seem to exist.".to_string()
            }
            AppError::DocumentPrivate => "This document is private.".to_string(),
            upstream => {
                tracing::error!("Request failed: {upstream}");
                "An unexpected error occurred. Please try again later.".to_string()
            }
        };

        match error_page(header, &message) {
            Ok(page) => (status, page).into_response(),
            Err(e) => {
                tracing::error!("Failed to render error page: {e}");
                (status, message).into_response()
            }
        }
    }
}

/// Fallback for paths without a route.
pub async fn not_found_handler() -> AppError {
    AppError::NotFound("The page you requested does not exist.".into())
}
