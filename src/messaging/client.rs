use async_trait::async_trait;
use serde::Serialize;

use crate::error::AppError;

/// Trait for delivering messages through the workplace platform.
///
/// Abstracted as a trait so tests can use a mock without a real Graph API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagingService: Send + Sync {
    /// Send `content` to `target` (a user or thread id on the platform).
    async fn post_message(&self, target: &str, content: &str) -> Result<(), AppError>;
}

#[derive(Debug, Serialize)]
struct Recipient<'a> {
    id: &'a str,
}

#[derive(Debug, Serialize)]
struct MessageBody<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    recipient: Recipient<'a>,
    message: MessageBody<'a>,
}

/// Graph API implementation of MessagingService.
pub struct GraphMessagingService {
    http: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl GraphMessagingService {
    pub fn new(base_url: impl Into<String>, access_token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            access_token,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/me/messages", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl MessagingService for GraphMessagingService {
    async fn post_message(&self, target: &str, content: &str) -> Result<(), AppError> {
        let token = self
            .access_token
            .as_deref()
            .ok_or_else(|| AppError::Messaging("GRAPH_ACCESS_TOKEN not set".into()))?;

        let body = SendMessageRequest {
            recipient: Recipient { id: target },
            message: MessageBody { text: content },
        };

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Messaging(format!("Failed to reach Graph API: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::Messaging(format!(
                "Graph API rejected message to '{}' ({}): {}",
                target, status, detail
            )));
        }

        tracing::debug!(target_id = target, "Message delivered");
        Ok(())
    }
}
