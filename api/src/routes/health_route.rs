use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use catalog_service::HealthStatus;

use crate::core::app_state::AppState;

/// Handler: GET /health
///
/// `200` with the catalog health status when healthy, `503` otherwise.
pub async fn health_route(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthStatus>) {
    let status = match state.catalog_health.as_ref() {
        Some(health) => health.check().await,
        None => HealthStatus {
            endpoint: String::new(),
            ok: false,
            latency_ms: 0,
            message: "catalog is not configured".into(),
        },
    };

    let code = if status.ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status))
}
