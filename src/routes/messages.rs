use axum::extract::State;
use axum::response::{Html, Response};
use axum::Form;
use serde::Deserialize;

use crate::app::AppState;
use crate::auth::middleware::RequestContext;
use crate::error::AppError;
use crate::messaging::client::MessagingService;
use crate::rendering::views;
use crate::routes::found;

/// Form posted by the messages page.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageForm {
    pub target: String,
    pub message: String,
}

/// Deliver a message. Failures are returned as-is, there is no retry.
pub async fn process_send(
    messaging: &dyn MessagingService,
    form: &SendMessageForm,
) -> Result<(), AppError> {
    messaging.post_message(&form.target, &form.message).await
}

/// `GET /messages`
pub async fn messages_page_handler(ctx: RequestContext) -> Result<Html<String>, AppError> {
    views::render("messages.html", &views::page_context(Some(&ctx.user)))
}

/// `POST /messages`
pub async fn send_message_handler(
    State(state): State<AppState>,
    _ctx: RequestContext,
    Form(form): Form<SendMessageForm>,
) -> Result<Response, AppError> {
    process_send(state.messaging.as_ref(), &form).await?;
    Ok(found("/messages"))
}
