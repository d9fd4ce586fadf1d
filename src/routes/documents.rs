use axum::extract::{Path, State};
use axum::response::{Html, Response};
use axum::Form;
use serde::Deserialize;

use crate::app::AppState;
use crate::auth::middleware::RequestContext;
use crate::db::models::{Document, NewDocument, Privacy, User};
use crate::db::repository::DocumentRepository;
use crate::db::user_repository::UserRepository;
use crate::error::AppError;
use crate::rendering::views;
use crate::routes::found;

/// Form posted by the creation page.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocumentForm {
    pub name: String,
    pub content: String,
    pub privacy: String,
}

/// A document together with its owner, as shown on the document page.
#[derive(Debug, Clone)]
pub struct DocumentWithOwner {
    pub document: Document,
    pub owner: Option<User>,
}

/// Create a document owned by `user`.
///
/// The privacy value is stored as given; unknown values are kept verbatim.
pub async fn process_create(
    repo: &dyn DocumentRepository,
    user: &User,
    form: CreateDocumentForm,
) -> Result<Document, AppError> {
    repo.create(NewDocument {
        name: form.name,
        content: form.content,
        privacy: Privacy::from(form.privacy),
        owner_id: user.id,
    })
    .await
}

/// Load a document for `user`, enforcing the privacy rule.
pub async fn process_view(
    repo: &dyn DocumentRepository,
    users: &dyn UserRepository,
    user: &User,
    document_id: i64,
) -> Result<DocumentWithOwner, AppError> {
    let document = repo
        .find_by_id(document_id)
        .await?
        .ok_or(AppError::DocumentNotFound)?;

    if !document.is_viewable_by(user.id) {
        return Err(AppError::DocumentPrivate);
    }

    let owner = users.find_by_id(document.owner_id).await?;
    Ok(DocumentWithOwner { document, owner })
}

/// `GET /documents`
pub async fn list_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Html<String>, AppError> {
    let documents = state.document_repo.list_visible_to(ctx.user.id).await?;
    views::documents_page(&ctx.user, &documents)
}

/// `GET /document/create`
pub async fn create_form_handler(ctx: RequestContext) -> Result<Html<String>, AppError> {
    views::render("create_document.html", &views::page_context(Some(&ctx.user)))
}

/// `POST /document/create`
pub async fn create_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
    Form(form): Form<CreateDocumentForm>,
) -> Result<Response, AppError> {
    let document = process_create(state.document_repo.as_ref(), &ctx.user, form).await?;
    tracing::info!(document_id = document.id, owner_id = ctx.user.id, "Document created");
    Ok(found("/documents"))
}

/// `GET /document/{id}`
///
/// A non-numeric id cannot match any document and answers 404.
pub async fn view_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let document_id: i64 = id.parse().map_err(|_| AppError::DocumentNotFound)?;

    let viewed = process_view(
        state.document_repo.as_ref(),
        state.user_repo.as_ref(),
        &ctx.user,
        document_id,
    )
    .await?;

    views::document_page(&ctx.user, &viewed.document, viewed.owner.as_ref())
}
