use axum::{routing::get, Router};
use std::sync::Arc;

use crate::services::records::RecordSource;
use crate::services::weather::OpenWeatherClient;

pub mod dashboard;
pub mod health;

/// Shared application state for all endpoints.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) source: Arc<dyn RecordSource>,
    pub(crate) weather: OpenWeatherClient,
    pub(crate) lookup_concurrency: usize,
    /// Registry file checked by the health endpoint.
    pub(crate) data_file: std::path::PathBuf,
}

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health::health_check))
        .route("/api/v1/dashboard", get(dashboard::get_dashboard))
        .with_state(state)
}
