//! Display records for the dashboard UI.
//!
//! Turns enriched farms and aggregates into the payload the rendering layer
//! consumes. This is the only place figures are rounded. Missing measurements
//! are `None` (JSON `null`), never zero, so a renderer can tell "no data" from
//! a measured 0.

use chrono::{DateTime, TimeZone};
use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

use crate::helpers::{opt_round_1dp, round_1dp, round_dp};
use crate::models::{CountryAggregate, EnrichedFarm, FleetSummary};

/// Shown in `last_updated` when the dashboard has no data.
pub const NO_DATA_STATUS: &str = "No data available";

/// Qualitative performance label for a farm or a country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum PerformanceRating {
    Excellent,
    #[serde(rename = "Very Good")]
    VeryGood,
    Good,
    Fair,
    Low,
}

impl fmt::Display for PerformanceRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PerformanceRating::Excellent => "Excellent",
            PerformanceRating::VeryGood => "Very Good",
            PerformanceRating::Good => "Good",
            PerformanceRating::Fair => "Fair",
            PerformanceRating::Low => "Low",
        };
        f.write_str(label)
    }
}

/// Rating for a single farm's efficiency percentage.
pub fn performance_rating(efficiency_pct: f64) -> PerformanceRating {
    if efficiency_pct >= 80.0 {
        PerformanceRating::Excellent
    } else if efficiency_pct >= 60.0 {
        PerformanceRating::VeryGood
    } else if efficiency_pct >= 40.0 {
        PerformanceRating::Good
    } else if efficiency_pct >= 20.0 {
        PerformanceRating::Fair
    } else {
        PerformanceRating::Low
    }
}

/// Rating for a country's capacity factor.
///
/// Thresholds are lower than per-farm ones: a country's portfolio is spread
/// over many sites, so its combined factor runs lower.
pub fn country_performance_level(capacity_factor_pct: f64) -> PerformanceRating {
    if capacity_factor_pct >= 70.0 {
        PerformanceRating::Excellent
    } else if capacity_factor_pct >= 40.0 {
        PerformanceRating::Good
    } else if capacity_factor_pct >= 20.0 {
        PerformanceRating::Fair
    } else {
        PerformanceRating::Low
    }
}

/// Width of a progress bar for a percentage, capped at 100.
fn progress_width(pct: f64) -> f64 {
    round_1dp(pct).min(100.0)
}

/// One wind farm card.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FarmCard {
    /// Registry identifier
    pub id: String,
    /// Wind farm name
    pub name: String,
    /// Country the farm is located in
    pub country: String,
    /// Current wind speed in m/s, null when unavailable
    pub current_wind_speed: Option<f64>,
    /// Estimated output in MW, null when unavailable
    pub estimated_power: Option<f64>,
    /// Installed capacity in MW, whole units
    pub overall_capacity: f64,
    /// Number of turbines
    pub number_of_turbines: u32,
    /// Estimated output as a percentage of capacity, null when unavailable
    pub efficiency: Option<f64>,
    /// Rating derived from efficiency, null when unavailable
    pub performance_rating: Option<PerformanceRating>,
    /// Efficiency capped at 100 for progress bars, null when unavailable
    pub progress_width: Option<f64>,
}

/// One country performance card.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CountryCard {
    /// Country name
    pub name: String,
    /// Installed capacity in MW
    pub total_capacity: f64,
    /// Estimated current output in MW
    pub current_output: f64,
    /// Output as a percentage of capacity
    pub capacity_factor: f64,
    pub performance_level: PerformanceRating,
    pub progress_width: f64,
}

/// Fleet-wide figures.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FleetSummaryCard {
    /// Installed capacity in MW
    pub total_capacity: f64,
    /// Estimated current generation in MW
    pub total_generation: f64,
    /// Generation as a percentage of capacity
    pub fleet_efficiency: f64,
    /// Tons of CO2 avoided per hour at the current rate, whole tons
    pub co2_avoided: f64,
    /// Average homes the current generation could supply
    pub homes_powered: u64,
    pub progress_width: f64,
}

/// Status bar figures.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StatusMetrics {
    /// Number of farms in the registry, with or without wind data
    pub active_farms: usize,
    /// Number of distinct countries
    pub countries: usize,
    /// Installed capacity in MW
    pub total_capacity: f64,
    /// Build time (e.g. "March 01, 2026 at 02:05 PM")
    pub last_updated: String,
}

/// Everything the dashboard view renders.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DashboardPayload {
    pub wind_farms: Vec<FarmCard>,
    /// Countries in order of first appearance in the registry
    pub country_performance: Vec<CountryCard>,
    pub fleet_summary: FleetSummaryCard,
    pub status_metrics: StatusMetrics,
}

impl DashboardPayload {
    /// The payload shown when there is nothing to display.
    pub fn empty() -> Self {
        Self {
            wind_farms: Vec::new(),
            country_performance: Vec::new(),
            fleet_summary: FleetSummaryCard {
                total_capacity: 0.0,
                total_generation: 0.0,
                fleet_efficiency: 0.0,
                co2_avoided: 0.0,
                homes_powered: 0,
                progress_width: 0.0,
            },
            status_metrics: StatusMetrics {
                active_farms: 0,
                countries: 0,
                total_capacity: 0.0,
                last_updated: NO_DATA_STATUS.to_string(),
            },
        }
    }
}

/// Display card for one farm; efficiency and rating are absent without a power estimate.
pub fn farm_card(farm: &EnrichedFarm) -> FarmCard {
    let record = &farm.record;
    let efficiency = farm
        .estimated_power_mw
        .filter(|_| record.capacity_mw > 0.0)
        .map(|power| power / record.capacity_mw * 100.0);

    FarmCard {
        id: record.id.clone(),
        name: record.name.clone(),
        country: record.country.clone(),
        current_wind_speed: opt_round_1dp(farm.wind_speed_ms),
        estimated_power: opt_round_1dp(farm.estimated_power_mw),
        overall_capacity: round_dp(record.capacity_mw, 0),
        number_of_turbines: record.turbine_count,
        efficiency: opt_round_1dp(efficiency),
        performance_rating: efficiency.map(performance_rating),
        progress_width: efficiency.map(progress_width),
    }
}

/// Display card for one country aggregate.
pub fn country_card(aggregate: &CountryAggregate) -> CountryCard {
    CountryCard {
        name: aggregate.country.clone(),
        total_capacity: round_1dp(aggregate.total_capacity_mw),
        current_output: round_1dp(aggregate.total_estimated_power_mw),
        capacity_factor: round_1dp(aggregate.capacity_factor_pct),
        performance_level: country_performance_level(aggregate.capacity_factor_pct),
        progress_width: progress_width(aggregate.capacity_factor_pct),
    }
}

/// Fleet-wide summary card.
pub fn fleet_summary_card(fleet: &FleetSummary) -> FleetSummaryCard {
    FleetSummaryCard {
        total_capacity: round_1dp(fleet.total_capacity_mw),
        total_generation: round_1dp(fleet.total_generation_mw),
        fleet_efficiency: round_1dp(fleet.fleet_efficiency_pct),
        co2_avoided: round_dp(fleet.co2_avoided_tons, 0),
        homes_powered: round_dp(fleet.homes_powered, 0).max(0.0) as u64,
        progress_width: progress_width(fleet.fleet_efficiency_pct),
    }
}

/// Human-readable build time, e.g. "March 01, 2026 at 02:05 PM".
pub fn format_last_updated<Tz>(built_at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    built_at.format("%B %d, %Y at %I:%M %p").to_string()
}

/// Assemble the full payload from one build's enriched farms and aggregates.
pub fn format_dashboard<Tz>(
    farms: &[EnrichedFarm],
    countries: &[CountryAggregate],
    fleet: &FleetSummary,
    built_at: &DateTime<Tz>,
) -> DashboardPayload
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    DashboardPayload {
        wind_farms: farms.iter().map(farm_card).collect(),
        country_performance: countries.iter().map(country_card).collect(),
        fleet_summary: fleet_summary_card(fleet),
        status_metrics: StatusMetrics {
            active_farms: farms.len(),
            countries: countries.len(),
            total_capacity: round_1dp(fleet.total_capacity_mw),
            last_updated: format_last_updated(built_at),
        },
    }
}
