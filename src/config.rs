use std::path::Path;

use serde::Deserialize;

use crate::error::AppError;

/// Development fallback, long enough to derive a cookie key from. Only
/// accepted in demo mode.
const DEV_SESSION_SECRET: &str = "worklink-development-session-secret-change-me";

/// Minimum accepted length (in bytes) of `session_secret`.
pub const MIN_SESSION_SECRET_LEN: usize = 32;

/// Default lifetime of a platform signed request.
const DEFAULT_SIGNED_REQUEST_MAX_AGE_SECS: i64 = 300;

/// Runtime configuration.
///
/// Values are layered: built-in defaults, then an optional config file, then
/// environment variables (`MONGODB_URI`, `SESSION_SECRET`, `DEMO_MODE`, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// MongoDB connection string.
    pub mongodb_uri: String,
    /// Database holding the `documents`, `users` and `communities` collections.
    pub mongodb_database: String,
    /// Address the HTTP server binds to.
    pub site_addr: String,
    /// Secret the session cookie encryption key is derived from.
    pub session_secret: String,
    /// Workplace app secret used to verify signed requests.
    pub app_secret: String,
    /// Signed requests older than this many seconds are rejected.
    pub signed_request_max_age_secs: i64,
    /// Base URL of the Graph API used to deliver messages.
    pub graph_api_url: String,
    /// Access token for the Graph API. Messaging fails when unset.
    #[serde(default)]
    pub graph_access_token: Option<String>,
    /// Enables the demo login endpoint and seeds demo data at startup.
    #[serde(default)]
    pub demo_mode: bool,
}

impl AppConfig {
    /// Load the configuration, reading `file` if it exists.
    pub fn load(file: Option<&Path>) -> Result<Self, AppError> {
        let mut builder = config::Config::builder()
            .set_default("mongodb_uri", "mongodb://localhost:27017")
            .and_then(|b| b.set_default("mongodb_database", "worklink"))
            .and_then(|b| b.set_default("site_addr", "127.0.0.1:3000"))
            .and_then(|b| b.set_default("session_secret", DEV_SESSION_SECRET))
            .and_then(|b| b.set_default("app_secret", ""))
            .and_then(|b| {
                b.set_default(
                    "signed_request_max_age_secs",
                    DEFAULT_SIGNED_REQUEST_MAX_AGE_SECS,
                )
            })
            .and_then(|b| b.set_default("graph_api_url", "https://graph.facebook.com"))
            .and_then(|b| b.set_default("demo_mode", false))
            .map_err(config_error)?;

        let file = file.unwrap_or_else(|| Path::new("worklink.toml"));
        builder = builder.add_source(config::File::from(file).required(false));

        let config: AppConfig = builder
            .add_source(config::Environment::default().try_parsing(true))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(config_error)?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values the server cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.session_secret.len() < MIN_SESSION_SECRET_LEN {
            return Err(AppError::Internal(format!(
                "session_secret must be at least {} bytes long",
                MIN_SESSION_SECRET_LEN
            )));
        }

        if self.session_secret == DEV_SESSION_SECRET {
            if !self.demo_mode {
                return Err(AppError::Internal(
                    "SESSION_SECRET must be set outside demo mode".into(),
                ));
            }
            tracing::warn!("Using the built-in development session secret");
        }

        if self.signed_request_max_age_secs <= 0 {
            return Err(AppError::Internal(
                "signed_request_max_age_secs must be positive".into(),
            ));
        }

        url::Url::parse(&self.graph_api_url).map_err(|e| {
            AppError::Internal(format!(
                "Invalid graph_api_url '{}': {}",
                self.graph_api_url, e
            ))
        })?;

        if self.app_secret.is_empty() {
            tracing::warn!("APP_SECRET not set, signed requests will be rejected");
        }

        Ok(())
    }
}

fn config_error(err: config::ConfigError) -> AppError {
    AppError::Internal(format!("Failed to load configuration: {err}"))
}
