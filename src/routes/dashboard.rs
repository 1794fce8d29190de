//! Dashboard HTTP endpoint.
//!
//! GET /api/v1/dashboard builds the dashboard from scratch (registry load,
//! live wind lookups, aggregation) and returns the display payload.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use super::AppState;
use crate::services::dashboard::build_dashboard;
use crate::services::presentation::DashboardPayload;

/// Dashboard payload plus an optional user-facing error.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    #[serde(flatten)]
    pub dashboard: DashboardPayload,
    /// Present only when the build failed; the payload is then empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Get the wind farm dashboard.
///
/// Always answers 200: an empty registry or a failed build yields the empty
/// dashboard, with `error_message` set in the failure case. Farms whose wind
/// lookup failed show `null` for wind, output, efficiency and rating.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Dashboard payload", body = DashboardResponse),
    )
)]
pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardResponse> {
    let outcome =
        build_dashboard(state.source.as_ref(), &state.weather, state.lookup_concurrency).await;

    Json(DashboardResponse {
        dashboard: outcome.payload,
        error_message: outcome.error_message,
    })
}
