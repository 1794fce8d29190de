//! Joins farm records with live wind observations.
//!
//! Each farm gets exactly one lookup per dashboard build. Lookups run
//! concurrently up to a configured limit, but results always line up with the
//! input order, and one farm's failure only affects that farm.

use futures::stream::{self, StreamExt};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;

use crate::errors::AppError;
use crate::models::{EnrichedFarm, FarmRecord};
use crate::services::power_curve;
use crate::services::weather::WindSpeedLookup;

/// Combine a record with its (possibly absent) wind observation.
///
/// Absent or non-finite wind means absent power; the power curve is not
/// consulted in that case.
pub fn enrich_farm(record: FarmRecord, wind_speed_ms: Option<f64>) -> EnrichedFarm {
    let wind_speed_ms = wind_speed_ms.filter(|v| v.is_finite());
    let estimated_power_mw = wind_speed_ms.map(|ws| power_curve::estimate(ws, record.capacity_mw));

    EnrichedFarm {
        record,
        wind_speed_ms,
        estimated_power_mw,
    }
}

/// Check a record against the invariants the pipeline relies on.
///
/// Coordinates are not checked here: an unusable location is the lookup's
/// concern and only leaves that farm without wind data.
pub fn validate_record(record: &FarmRecord) -> Result<(), AppError> {
    if !record.capacity_mw.is_finite() || record.capacity_mw < 0.0 {
        return Err(AppError::InternalError(format!(
            "Farm '{}' has invalid capacity {}",
            record.id, record.capacity_mw
        )));
    }
    Ok(())
}

/// Enrich every record with a wind observation from `lookup`.
///
/// At most `concurrency` lookups are in flight at once (minimum 1). The
/// returned vector has the same length and order as `records`. Returns only
/// after every lookup has settled.
pub async fn enrich_farms<L>(
    records: Vec<FarmRecord>,
    lookup: &L,
    concurrency: usize,
) -> Result<Vec<EnrichedFarm>, AppError>
where
    L: WindSpeedLookup + Sync,
{
    for record in &records {
        validate_record(record)?;
    }

    tracing::info!(
        "Fetching wind speeds for {} farms (concurrency {})",
        records.len(),
        concurrency.max(1)
    );

    let enriched: Vec<EnrichedFarm> = stream::iter(records)
        .map(|record| async move {
            let wind_speed = AssertUnwindSafe(lookup.lookup(record.latitude, record.longitude))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| {
                    tracing::error!("Wind speed lookup panicked for farm '{}'", record.id);
                    None
                });
            enrich_farm(record, wind_speed)
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let with_data = enriched
        .iter()
        .filter(|f| f.wind_speed_ms.is_some())
        .count();
    tracing::info!(
        "Wind data available for {} of {} farms",
        with_data,
        enriched.len()
    );

    Ok(enriched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn record(id: &str, capacity_mw: f64, latitude: f64, longitude: f64) -> FarmRecord {
        FarmRecord {
            id: id.to_string(),
            name: id.to_string(),
            country: "Denmark".to_string(),
            capacity_mw,
            turbine_count: 10,
            latitude,
            longitude,
        }
    }

    /// Lookup keyed by latitude; unknown coordinates are absent. Later entries
    /// in the table respond faster, to scramble completion order.
    struct TableLookup {
        speeds: HashMap<u64, Option<f64>>,
        calls: AtomicUsize,
    }

    impl TableLookup {
        fn new(entries: &[(f64, Option<f64>)]) -> Self {
            Self {
                speeds: entries.iter().map(|(lat, ws)| (lat.to_bits(), *ws)).collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl WindSpeedLookup for TableLookup {
        async fn lookup(&self, latitude: f64, _longitude: f64) -> Option<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let delay = 60u64.saturating_sub(latitude as u64);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            self.speeds.get(&latitude.to_bits()).copied().flatten()
        }
    }

    struct PanickingLookup;

    impl WindSpeedLookup for PanickingLookup {
        async fn lookup(&self, latitude: f64, _longitude: f64) -> Option<f64> {
            if latitude > 50.0 {
                panic!("lookup exploded");
            }
            Some(8.0)
        }
    }

    #[test]
    fn test_enrich_farm_with_wind() {
        let farm = enrich_farm(record("ANH", 400.0, 56.6, 11.21), Some(10.0));
        assert_eq!(farm.wind_speed_ms, Some(10.0));
        assert!((farm.estimated_power_mw.unwrap() - 360.0).abs() < 1e-9);
    }

    #[test]
    fn test_enrich_farm_without_wind() {
        let farm = enrich_farm(record("ANH", 400.0, 56.6, 11.21), None);
        assert_eq!(farm.wind_speed_ms, None);
        assert_eq!(farm.estimated_power_mw, None);
        assert_eq!(farm.power_or_zero(), 0.0);
    }

    #[test]
    fn test_enrich_farm_calm_wind_is_zero_not_absent() {
        let farm = enrich_farm(record("ANH", 400.0, 56.6, 11.21), Some(1.0));
        assert_eq!(farm.estimated_power_mw, Some(0.0));
    }

    #[test]
    fn test_enrich_farm_non_finite_wind_is_absent() {
        let farm = enrich_farm(record("ANH", 400.0, 56.6, 11.21), Some(f64::NAN));
        assert_eq!(farm.wind_speed_ms, None);
        assert_eq!(farm.estimated_power_mw, None);
    }

    #[test]
    fn test_validate_record_rejects_bad_capacity() {
        assert!(validate_record(&record("X", -1.0, 0.0, 0.0)).is_err());
        assert!(validate_record(&record("X", f64::NAN, 0.0, 0.0)).is_err());
        assert!(validate_record(&record("X", 0.0, 0.0, 0.0)).is_ok());
    }

    #[test]
    fn test_validate_record_accepts_out_of_range_coordinates() {
        assert!(validate_record(&record("X", 1.0, 95.0, 0.0)).is_ok());
        assert!(validate_record(&record("X", 1.0, 0.0, -180.5)).is_ok());
    }

    #[tokio::test]
    async fn test_enrich_farms_preserves_order_and_isolates_failures() {
        let lookup = TableLookup::new(&[(10.0, Some(10.0)), (20.0, None), (30.0, Some(8.0))]);
        let records = vec![
            record("A", 100.0, 10.0, 0.0),
            record("B", 100.0, 20.0, 0.0),
            record("C", 100.0, 30.0, 0.0),
            record("D", 100.0, 40.0, 0.0),
        ];

        let enriched = enrich_farms(records, &lookup, 4).await.unwrap();

        let ids: Vec<&str> = enriched.iter().map(|f| f.record.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C", "D"]);
        assert_eq!(enriched[0].wind_speed_ms, Some(10.0));
        assert_eq!(enriched[1].wind_speed_ms, None);
        assert_eq!(enriched[1].estimated_power_mw, None);
        assert_eq!(enriched[2].wind_speed_ms, Some(8.0));
        assert_eq!(enriched[3].wind_speed_ms, None);
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_enrich_farms_sequential_when_concurrency_zero() {
        let lookup = TableLookup::new(&[(10.0, Some(12.0))]);
        let enriched = enrich_farms(vec![record("A", 50.0, 10.0, 0.0)], &lookup, 0)
            .await
            .unwrap();
        assert_eq!(enriched[0].estimated_power_mw, Some(50.0));
    }

    #[tokio::test]
    async fn test_enrich_farms_contains_lookup_panic() {
        let records = vec![record("SAFE", 100.0, 10.0, 0.0), record("BOOM", 100.0, 55.0, 0.0)];
        let enriched = enrich_farms(records, &PanickingLookup, 2).await.unwrap();
        assert_eq!(enriched[0].wind_speed_ms, Some(8.0));
        assert_eq!(enriched[1].wind_speed_ms, None);
    }

    #[tokio::test]
    async fn test_enrich_farms_rejects_invalid_record_before_lookups() {
        let lookup = TableLookup::new(&[]);
        let records = vec![record("A", 10.0, 10.0, 0.0), record("B", -3.0, 20.0, 0.0)];
        assert!(enrich_farms(records, &lookup, 2).await.is_err());
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }
}
