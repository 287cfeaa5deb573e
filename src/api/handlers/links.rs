//! Handlers for link management endpoints (create, list, update, delete).

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::link::{CreateLinkRequest, LinkResponse, LinksResponse, UpdateLinkRequest};
use crate::api::middleware::auth::Authenticated;
use crate::domain::entities::Identity;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for the caller.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "originalUrl": "https://example.com",
///   "customAlias": "mybrand"   // optional, registered users only
/// }
/// ```
///
/// Guests may call this without an `Authorization` header; their links expire
/// after the configured guest TTL.
///
/// # Errors
///
/// - 400 invalid URL or alias
/// - 403 quota exceeded, or alias requested by a guest
/// - 409 alias already taken
pub async fn create_link_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_link(payload.into(), &identity)
        .await?;

    Ok((StatusCode::CREATED, Json(link.into())))
}

/// Lists the caller's links together with quota usage.
///
/// # Endpoint
///
/// `GET /api/links`
///
/// # Response
///
/// ```json
/// {
///   "links": [ { "shortCode": "mybrand", "originalUrl": "...", ... } ],
///   "usage": { "custom": 1, "standard": 4 }
/// }
/// ```
pub async fn list_links_handler(
    State(state): State<AppState>,
    Authenticated(owner_id, _): Authenticated,
) -> Result<Json<LinksResponse>, AppError> {
    let links = state.link_service.get_links_by_owner(owner_id).await?;
    let usage = state.link_service.count_links_by_owner(owner_id).await?;

    Ok(Json(LinksResponse {
        links: links.into_iter().map(LinkResponse::from).collect(),
        usage,
    }))
}

/// Points a custom-alias link at a new destination.
///
/// # Endpoint
///
/// `PUT /api/links/{code}`
///
/// # Cache
///
/// The resolver cache entry for this code is invalidated after the update
/// commits. Invalidation failures do not affect the response.
///
/// # Errors
///
/// - 404 unknown code
/// - 403 caller is neither the owner nor an admin
/// - 409 link uses a generated code and cannot be edited
pub async fn update_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    Authenticated(_, identity): Authenticated,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .update_link(&code, payload.original_url, &identity)
        .await?;

    Ok(Json(link.into()))
}

/// Permanently removes a link.
///
/// # Endpoint
///
/// `DELETE /api/links/{code}`
///
/// # Cache
///
/// The resolver cache entry for this code is invalidated after the delete
/// commits.
///
/// # Errors
///
/// - 404 unknown code
/// - 403 caller is neither the owner nor an admin
pub async fn delete_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    Authenticated(_, identity): Authenticated,
) -> Result<StatusCode, AppError> {
    state.link_service.delete_link(&code, &identity).await?;

    Ok(StatusCode::NO_CONTENT)
}
