use std::sync::LazyLock;

use axum::response::Html;
use serde::Serialize;
use tera::{Context, Tera};

use crate::db::models::{Community, Document, User};
use crate::error::AppError;

/// An entry of the navigation bar shown on authenticated pages.
#[derive(Debug, Clone, Serialize)]
pub struct NavItem {
    pub name: &'static str,
    pub path: &'static str,
}

pub const NAVIGATION: &[NavItem] = &[
    NavItem {
        name: "Documents",
        path: "/documents",
    },
    NavItem {
        name: "Messages",
        path: "/messages",
    },
    NavItem {
        name: "Admin",
        path: "/admin",
    },
];

/// Templates are compiled into the binary.
const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../templates/base.html")),
    ("index.html", include_str!("../../templates/index.html")),
    ("documents.html", include_str!("../../templates/documents.html")),
    ("create_document.html", include_str!("../../templates/create_document.html")),
    ("document.html", include_str!("../../templates/document.html")),
    ("messages.html", include_str!("../../templates/messages.html")),
    ("link_account.html", include_str!("../../templates/link_account.html")),
    ("link_success.html", include_str!("../../templates/link_success.html")),
    ("error.html", include_str!("../../templates/error.html")),
];

static ENGINE: LazyLock<Result<Tera, String>> = LazyLock::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_templates(TEMPLATES.iter().copied())
        .map(|_| tera)
        .map_err(|e| format!("{e:?}"))
});

/// Template-facing shape of a document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentView {
    pub id: i64,
    pub name: String,
    pub content: String,
    pub privacy: String,
    pub owner_id: i64,
    pub owner_name: Option<String>,
    pub updated_at: String,
}

impl DocumentView {
    pub fn new(doc: &Document, owner: Option<&User>) -> Self {
        Self {
            id: doc.id,
            name: doc.name.clone(),
            content: doc.content.clone(),
            privacy: doc.privacy.to_string(),
            owner_id: doc.owner_id,
            owner_name: owner.map(|u| u.name.clone()),
            updated_at: doc.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct UserView<'a> {
    id: i64,
    name: &'a str,
    linked: bool,
}

/// Base context for a page: navigation and, when known, the current user.
pub fn page_context(user: Option<&User>) -> Context {
    let mut context = Context::new();
    if let Some(user) = user {
        context.insert("navigation", NAVIGATION);
        context.insert(
            "current_user",
            &UserView {
                id: user.id,
                name: &user.name,
                linked: user.workplace_id.is_some(),
            },
        );
    }
    context
}

/// Render a named template.
pub fn render(template: &str, context: &Context) -> Result<Html<String>, AppError> {
    let engine = ENGINE
        .as_ref()
        .map_err(|e| AppError::Internal(format!("Templates failed to load: {e}")))?;

    engine
        .render(template, context)
        .map(Html)
        .map_err(|e| AppError::Internal(format!("Failed to render '{}': {:?}", template, e)))
}

pub fn documents_page(user: &User, documents: &[Document]) -> Result<Html<String>, AppError> {
    let mut context = page_context(Some(user));
    let documents: Vec<DocumentView> = documents
        .iter()
        .map(|d| DocumentView::new(d, None))
        .collect();
    context.insert("documents", &documents);
    render("documents.html", &context)
}

pub fn document_page(user: &User, doc: &Document, owner: Option<&User>) -> Result<Html<String>, AppError> {
    let mut context = page_context(Some(user));
    context.insert("document", &DocumentView::new(doc, owner));
    render("document.html", &context)
}

pub fn link_account_page(user: &User, community: &Community) -> Result<Html<String>, AppError> {
    let mut context = page_context(Some(user));
    context.insert("community_id", &community.id);
    context.insert("community_name", &community.name);
    render("link_account.html", &context)
}

pub fn link_success_page(user: &User, redirect: &str) -> Result<Html<String>, AppError> {
    let mut context = page_context(Some(user));
    context.insert("redirect", redirect);
    render("link_success.html", &context)
}

/// Error page. `header` is optional, `message` is always shown.
pub fn error_page(header: Option<&str>, message: &str) -> Result<Html<String>, AppError> {
    let mut context = page_context(None);
    context.insert("header", &header);
    context.insert("message", message);
    render("error.html", &context)
}
