//! API route configuration.
//!
//! Every endpoint runs behind [`crate::api::middleware::auth::layer`], which
//! resolves the caller identity. Guests reach only link creation; the other
//! handlers reject them through the `Authenticated` extractor.

use crate::api::handlers::{
    create_link_handler, delete_link_handler, list_links_handler, update_link_handler,
};
use crate::api::middleware::auth;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, put},
};

/// Link management routes with identity resolution applied.
///
/// # Endpoints
///
/// - `POST   /links`        - Create a link (guests allowed)
/// - `GET    /links`        - List the caller's links and quota usage
/// - `PUT    /links/{code}` - Change the destination of a custom-alias link
/// - `DELETE /links/{code}` - Remove a link
pub fn link_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route(
            "/links/{code}",
            put(update_link_handler).delete(delete_link_handler),
        )
        .route_layer(middleware::from_fn_with_state(state, auth::layer))
}
