//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Link store reachable
/// - **503 Service Unavailable**: Link store unreachable
///
/// # Components Checked
///
/// 1. **Database**: Link store round trip
/// 2. **Cache invalidation**: Backend reachability (always ok when disabled).
///    Reported only; invalidation is best effort and does not affect status.
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok" },
///     "cache_invalidation": { "status": "ok", "message": "Backend: redis" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let db_check = check_database(&state).await;

    let cache_check = check_cache_invalidation(&state).await;

    let all_healthy = db_check.status == "ok";

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database: db_check,
            cache_invalidation: cache_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    if state.link_service.store_healthy().await {
        CheckStatus {
            status: "ok".to_string(),
            message: None,
        }
    } else {
        CheckStatus {
            status: "error".to_string(),
            message: Some("Link store unreachable".to_string()),
        }
    }
}

async fn check_cache_invalidation(state: &AppState) -> CheckStatus {
    let dispatcher = state.link_service.invalidation();
    let backend = dispatcher.backend();

    if dispatcher.health_check().await {
        CheckStatus {
            status: "ok".to_string(),
            message: Some(format!("Backend: {}", backend)),
        }
    } else {
        CheckStatus {
            status: "error".to_string(),
            message: Some(format!("Backend {} unreachable", backend)),
        }
    }
}
