//! Core farm data shapes flowing through the dashboard pipeline.
//!
//! `FarmRecord` comes from a record source and is never mutated. Everything
//! else is derived per dashboard build and dropped afterwards.

/// A wind farm as listed in the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct FarmRecord {
    pub id: String,
    pub name: String,
    pub country: String,
    /// Rated (installed) capacity in MW, never negative.
    pub capacity_mw: f64,
    pub turbine_count: u32,
    /// WGS84, within [-90, 90].
    pub latitude: f64,
    /// WGS84, within [-180, 180].
    pub longitude: f64,
}

/// A farm record joined with this build's wind observation.
///
/// `estimated_power_mw` is `None` exactly when `wind_speed_ms` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedFarm {
    pub record: FarmRecord,
    pub wind_speed_ms: Option<f64>,
    pub estimated_power_mw: Option<f64>,
}

impl EnrichedFarm {
    /// Estimated power with absent treated as zero, for summation.
    pub fn power_or_zero(&self) -> f64 {
        self.estimated_power_mw.unwrap_or(0.0)
    }
}

/// Totals for all farms sharing one `country` value.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryAggregate {
    pub country: String,
    pub total_capacity_mw: f64,
    pub total_estimated_power_mw: f64,
    pub capacity_factor_pct: f64,
}

/// Totals across the whole fleet plus environmental estimates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FleetSummary {
    pub total_capacity_mw: f64,
    pub total_generation_mw: f64,
    pub fleet_efficiency_pct: f64,
    /// Tons of CO2 avoided per hour of generation at the current rate.
    pub co2_avoided_tons: f64,
    pub homes_powered: f64,
}
