use axum::extract::{Query, State};
use axum::response::{Html, Response};
use axum_extra::extract::PrivateCookieJar;
use serde::Deserialize;

use crate::app::AppState;
use crate::auth::middleware::RequestContext;
use crate::auth::session::SessionData;
use crate::auth::signed_request::{parse_signed_request, SignedRequest};
use crate::db::community_repository::CommunityRepository;
use crate::db::models::{Community, User};
use crate::db::user_repository::UserRepository;
use crate::error::AppError;
use crate::rendering::views;
use crate::routes::found;

/// A pending link that passed every check.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkTarget {
    pub community: Community,
    pub signed_request: SignedRequest,
}

/// Check that `signed_request` can be linked to `current_user`.
///
/// The community and the user already holding the external identity are
/// looked up concurrently; both lookups finish before any decision is made.
pub async fn resolve_link(
    users: &dyn UserRepository,
    communities: &dyn CommunityRepository,
    current_user: &User,
    signed_request: Option<&SignedRequest>,
) -> Result<LinkTarget, AppError> {
    let signed_request = signed_request
        .ok_or_else(|| AppError::BadRequest("No saved signed request.".into()))?;

    let (community, linked_user) = futures::try_join!(
        communities.find_by_id(signed_request.community_id),
        users.find_by_workplace_id(&signed_request.user_id),
    )?;

    let community = community.ok_or_else(|| {
        AppError::BadRequest(format!(
            "No community with id {} found",
            signed_request.community_id
        ))
    })?;

    if let Some(linked) = linked_user {
        if linked.id != current_user.id {
            return Err(AppError::BadRequest(
                "This user is already linked to somebody else.".into(),
            ));
        }
    }

    Ok(LinkTarget {
        community,
        signed_request: signed_request.clone(),
    })
}

/// Link the external identity to `current_user` and persist it.
///
/// Returns the redirect target carried by the signed request. The caller
/// must only drop the signed request from the session once this succeeds.
pub async fn process_link_confirm(
    users: &dyn UserRepository,
    communities: &dyn CommunityRepository,
    current_user: &User,
    signed_request: Option<&SignedRequest>,
) -> Result<String, AppError> {
    let target = resolve_link(users, communities, current_user, signed_request).await?;

    let mut user = current_user.clone();
    user.workplace_id = Some(target.signed_request.user_id.clone());
    users.save(&user).await?;

    tracing::info!(
        user_id = user.id,
        community_id = target.community.id,
        "Workplace account linked"
    );

    Ok(target.signed_request.redirect)
}

#[derive(Debug, Deserialize)]
pub struct SignedRequestQuery {
    pub signed_request: String,
}

/// `GET /link_account` — Accept a signed request from the platform.
///
/// Verifies the signature, keeps the request in the session and sends the
/// user on to the confirmation page.
pub async fn receive_signed_request_handler(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Query(query): Query<SignedRequestQuery>,
) -> Result<(PrivateCookieJar, Response), AppError> {
    let signed_request = parse_signed_request(
        &query.signed_request,
        &state.app_secret,
        state.signed_request_max_age,
    )?;

    let mut session = SessionData::from_jar(&jar);
    session.signed_request = Some(signed_request);
    let jar = session.store(jar)?;

    Ok((jar, found("/link_account_confirm")))
}

/// `GET /link_account_confirm`
pub async fn confirm_page_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Html<String>, AppError> {
    let target = resolve_link(
        state.user_repo.as_ref(),
        state.community_repo.as_ref(),
        &ctx.user,
        ctx.session.signed_request.as_ref(),
    )
    .await?;

    views::link_account_page(&ctx.user, &target.community)
}

/// `POST /link_account_confirm`
///
/// The signed request is removed from the session only after the user has
/// been saved, so a failed write can be retried.
pub async fn confirm_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<(PrivateCookieJar, Html<String>), AppError> {
    let redirect = process_link_confirm(
        state.user_repo.as_ref(),
        state.community_repo.as_ref(),
        &ctx.user,
        ctx.session.signed_request.as_ref(),
    )
    .await?;

    let page = views::link_success_page(&ctx.user, &redirect)?;

    let mut session = ctx.session.clone();
    session.signed_request = None;
    let jar = ctx.commit(&session)?;

    Ok((jar, page))
}
