//! Dashboard build pipeline.
//!
//! One build runs four stages in order, with no state shared between builds:
//!
//! 1. load: read the farm registry
//! 2. enrich: look up live wind speed per farm and estimate output
//! 3. aggregate: country and fleet totals
//! 4. format: display payload
//!
//! An empty registry short-circuits to the empty payload. A failure (error or
//! panic) in any stage is logged with the stage name and also produces the
//! empty payload, plus a message for the user. Nothing escapes `build_dashboard`.

use chrono::Local;
use futures::FutureExt;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::errors::{AppError, PipelineStage};
use crate::services::aggregate::aggregate;
use crate::services::enrichment::enrich_farms;
use crate::services::presentation::{format_dashboard, DashboardPayload};
use crate::services::records::RecordSource;
use crate::services::weather::WindSpeedLookup;

/// Shown to the user when a build fails.
pub const BUILD_FAILED_MESSAGE: &str =
    "Unable to load wind farm data. Please check your configuration and try again.";

/// Result of one dashboard build.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOutcome {
    pub payload: DashboardPayload,
    /// Set only when the build failed and the payload is the empty fallback.
    pub error_message: Option<String>,
}

impl DashboardOutcome {
    fn ready(payload: DashboardPayload) -> Self {
        Self {
            payload,
            error_message: None,
        }
    }

    fn failed(err: &AppError) -> Self {
        tracing::error!("Dashboard build failed: {}", err);
        Self {
            payload: DashboardPayload::empty(),
            error_message: Some(BUILD_FAILED_MESSAGE.to_string()),
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Run a synchronous stage, converting errors and panics to a stage failure.
fn run_stage<T>(
    stage: PipelineStage,
    f: impl FnOnce() -> Result<T, AppError>,
) -> Result<T, AppError> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result.map_err(|e| e.in_stage(stage)),
        Err(payload) => Err(AppError::Pipeline {
            stage,
            message: format!("panicked: {}", panic_message(payload)),
        }),
    }
}

/// Build the dashboard from a record source and a wind-speed lookup.
///
/// At most `lookup_concurrency` lookups are in flight at once.
pub async fn build_dashboard<L>(
    source: &dyn RecordSource,
    lookup: &L,
    lookup_concurrency: usize,
) -> DashboardOutcome
where
    L: WindSpeedLookup + Sync,
{
    tracing::info!("Building wind farm dashboard");

    let records = match run_stage(PipelineStage::Load, || Ok(source.load())) {
        Ok(records) => records,
        Err(e) => return DashboardOutcome::failed(&e),
    };

    if records.is_empty() {
        tracing::warn!("No wind farm data loaded, serving empty dashboard");
        return DashboardOutcome::ready(DashboardPayload::empty());
    }

    let enriched = match AssertUnwindSafe(enrich_farms(records, lookup, lookup_concurrency))
        .catch_unwind()
        .await
    {
        Ok(Ok(enriched)) => enriched,
        Ok(Err(e)) => return DashboardOutcome::failed(&e.in_stage(PipelineStage::Enrich)),
        Err(payload) => {
            return DashboardOutcome::failed(&AppError::Pipeline {
                stage: PipelineStage::Enrich,
                message: format!("panicked: {}", panic_message(payload)),
            })
        }
    };

    let (countries, fleet) = match run_stage(PipelineStage::Aggregate, || aggregate(&enriched)) {
        Ok(totals) => totals,
        Err(e) => return DashboardOutcome::failed(&e),
    };

    let built_at = Local::now();
    match run_stage(PipelineStage::Format, || {
        Ok(format_dashboard(&enriched, &countries, &fleet, &built_at))
    }) {
        Ok(payload) => {
            for country in &payload.country_performance {
                tracing::debug!(
                    "{}: {} ({}% capacity factor)",
                    country.name,
                    country.performance_level,
                    country.capacity_factor
                );
            }
            tracing::info!(
                "Dashboard ready: {} farms, {} countries",
                payload.status_metrics.active_farms,
                payload.status_metrics.countries
            );
            DashboardOutcome::ready(payload)
        }
        Err(e) => DashboardOutcome::failed(&e),
    }
}
