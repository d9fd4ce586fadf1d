use thiserror::Error;

/// Application-wide error types.
///
/// `NotFound`, `Forbidden`, `BadRequest`, `Auth` and the two document
/// access errors are answered with a dedicated error page. The remaining variants are upstream failures and
/// are handed to the generic error page unchanged.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Messaging error: {0}")]
    Messaging(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Document does not exist")]
    DocumentNotFound,

    #[error("Document is private")]
    DocumentPrivate,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns `true` for failures coming from the persistence or messaging
    /// gateways (or any other unexpected condition).
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            AppError::Database(_) | AppError::Messaging(_) | AppError::Internal(_)
        )
    }
}

/// Helper conversion from anyhow::Error
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::Database(err.to_string())
    }
}
