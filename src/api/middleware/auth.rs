//! Bearer token identity middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::domain::entities::{Identity, Owner};
use crate::{error::AppError, state::AppState};

/// Resolves the caller's [`Identity`] and stores it in request extensions.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <jwt>
/// ```
///
/// # Resolution
///
/// - No `Authorization` header: [`Identity::guest`]
/// - Valid HS256 token: owner from `sub`, role from `role`
///
/// # Errors
///
/// Returns `401 Unauthorized` if the header is present but malformed, or the
/// token is invalid, expired or carries an unknown role. Adds
/// `WWW-Authenticate: Bearer` per RFC 6750.
///
/// # Example
///
/// ```rust,ignore
/// let api = Router::new()
///     .route("/links", post(create_link_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let identity = if parts.headers.contains_key(AUTHORIZATION) {
        let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
            .await
            .map_err(|_| {
                AppError::unauthenticated(
                    "Unauthenticated",
                    json!({"reason": "Authorization header is invalid"}),
                )
            })?;

        st.auth_service.identify(&token)?
    } else {
        Identity::guest()
    };

    parts.extensions.insert(identity);
    let req = Request::from_parts(parts, body);

    Ok(next.run(req).await)
}

/// Extractor for endpoints that need a signed-in caller.
///
/// Yields the caller's user ID alongside the full identity and rejects
/// guests with `401`. Requires [`layer`] to have run.
#[derive(Debug, Clone, Copy)]
pub struct Authenticated(pub i64, pub Identity);

impl<S: Send + Sync> FromRequestParts<S> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .extensions
            .get::<Identity>()
            .copied()
            .unwrap_or_else(Identity::guest);

        match identity.owner {
            Owner::User(user_id) => Ok(Self(user_id, identity)),
            Owner::Anonymous => Err(AppError::unauthenticated(
                "Unauthenticated",
                json!({"reason": "Authorization header is missing"}),
            )),
        }
    }
}
