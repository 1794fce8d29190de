use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use super::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status ("ok" when healthy, "degraded" when the registry file is missing)
    pub status: String,
    /// API version
    pub version: String,
    /// Whether the wind farm registry file exists
    pub data_source: bool,
}

/// Health check endpoint.
///
/// Returns the API status and version. Reports status "degraded" (still 200)
/// if the registry file is missing, since every dashboard would then be empty.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let data_ok = state.data_file.is_file();

    Json(HealthResponse {
        status: if data_ok {
            "ok".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        data_source: data_ok,
    })
}
