//! Country and fleet totals over enriched farms.
//!
//! Farms without a power estimate still count towards capacity; their power
//! contributes 0 to every sum.

use std::collections::HashMap;

use crate::errors::AppError;
use crate::models::{CountryAggregate, EnrichedFarm, FleetSummary};

/// CO2 avoided per MWh generated (tons).
const CO2_TONS_PER_MWH: f64 = 0.82;

/// Average household draw (kW).
const AVERAGE_HOME_DRAW_KW: f64 = 2.5;

/// Output divided by capacity as a percentage; 0 when there is no capacity.
pub fn capacity_factor_pct(power_mw: f64, capacity_mw: f64) -> f64 {
    if capacity_mw > 0.0 {
        power_mw / capacity_mw * 100.0
    } else {
        0.0
    }
}

/// Group farms by exact `country` string, in order of first appearance.
pub fn aggregate_by_country(farms: &[EnrichedFarm]) -> Vec<CountryAggregate> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut countries: Vec<CountryAggregate> = Vec::new();

    for farm in farms {
        let slot = *index.entry(farm.record.country.as_str()).or_insert_with(|| {
            countries.push(CountryAggregate {
                country: farm.record.country.clone(),
                total_capacity_mw: 0.0,
                total_estimated_power_mw: 0.0,
                capacity_factor_pct: 0.0,
            });
            countries.len() - 1
        });

        let entry = &mut countries[slot];
        entry.total_capacity_mw += farm.record.capacity_mw;
        entry.total_estimated_power_mw += farm.power_or_zero();
    }

    for entry in &mut countries {
        entry.capacity_factor_pct =
            capacity_factor_pct(entry.total_estimated_power_mw, entry.total_capacity_mw);
    }

    countries
}

/// Fleet-wide totals and environmental estimates.
pub fn summarize_fleet(farms: &[EnrichedFarm]) -> FleetSummary {
    let (total_capacity_mw, total_generation_mw) =
        farms.iter().fold((0.0, 0.0), |(capacity, generation), f| {
            (capacity + f.record.capacity_mw, generation + f.power_or_zero())
        });

    FleetSummary {
        total_capacity_mw,
        total_generation_mw,
        fleet_efficiency_pct: capacity_factor_pct(total_generation_mw, total_capacity_mw),
        co2_avoided_tons: total_generation_mw * CO2_TONS_PER_MWH,
        homes_powered: total_generation_mw * 1000.0 / AVERAGE_HOME_DRAW_KW,
    }
}

/// Per-country aggregates plus the fleet summary.
///
/// Fails if any total is not finite, which can only happen when the input
/// violates the record invariants or the sums overflow.
pub fn aggregate(
    farms: &[EnrichedFarm],
) -> Result<(Vec<CountryAggregate>, FleetSummary), AppError> {
    let countries = aggregate_by_country(farms);
    let fleet = summarize_fleet(farms);

    if let Some(bad) = countries.iter().find(|c| {
        !c.total_capacity_mw.is_finite() || !c.total_estimated_power_mw.is_finite()
    }) {
        return Err(AppError::InternalError(format!(
            "Non-finite totals for country '{}'",
            bad.country
        )));
    }
    if !fleet.total_capacity_mw.is_finite() || !fleet.total_generation_mw.is_finite() {
        return Err(AppError::InternalError("Non-finite fleet totals".to_string()));
    }

    tracing::info!(
        "Aggregated {} farms into {} countries: {:.1} MW of {:.1} MW",
        farms.len(),
        countries.len(),
        fleet.total_generation_mw,
        fleet.total_capacity_mw
    );

    Ok((countries, fleet))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FarmRecord;

    fn farm(id: &str, country: &str, capacity_mw: f64, power: Option<f64>) -> EnrichedFarm {
        EnrichedFarm {
            record: FarmRecord {
                id: id.to_string(),
                name: id.to_string(),
                country: country.to_string(),
                capacity_mw,
                turbine_count: 1,
                latitude: 0.0,
                longitude: 0.0,
            },
            wind_speed_ms: power.map(|_| 10.0),
            estimated_power_mw: power,
        }
    }

    #[test]
    fn test_denmark_fixture() {
        let farms = vec![
            farm("ANH", "Denmark", 400.0, Some(360.0)),
            farm("AVD", "Denmark", 7.2, Some(4.32)),
        ];
        let (countries, fleet) = aggregate(&farms).unwrap();

        assert_eq!(countries.len(), 1);
        let dk = &countries[0];
        assert_eq!(dk.country, "Denmark");
        assert!((dk.total_capacity_mw - 407.2).abs() < 1e-9);
        assert!((dk.total_estimated_power_mw - 364.32).abs() < 1e-9);
        assert!((dk.capacity_factor_pct - 89.469548).abs() < 1e-4);

        assert!((fleet.total_capacity_mw - 407.2).abs() < 1e-9);
        assert!((fleet.co2_avoided_tons - 364.32 * 0.82).abs() < 1e-9);
        assert!((fleet.homes_powered - 145_728.0).abs() < 1e-6);
    }

    #[test]
    fn test_countries_in_first_seen_order() {
        let farms = vec![
            farm("A", "United Kingdom", 10.0, Some(1.0)),
            farm("B", "Denmark", 10.0, Some(2.0)),
            farm("C", "United Kingdom", 10.0, Some(3.0)),
            farm("D", "Germany", 10.0, None),
        ];
        let countries = aggregate_by_country(&farms);
        let names: Vec<&str> = countries.iter().map(|c| c.country.as_str()).collect();
        assert_eq!(names, vec!["United Kingdom", "Denmark", "Germany"]);
        assert_eq!(countries[0].total_estimated_power_mw, 4.0);
    }

    #[test]
    fn test_country_grouping_is_exact_match() {
        let farms = vec![
            farm("A", "Denmark", 10.0, Some(1.0)),
            farm("B", "denmark", 10.0, Some(1.0)),
            farm("C", "Denmark ", 10.0, Some(1.0)),
        ];
        assert_eq!(aggregate_by_country(&farms).len(), 3);
    }

    #[test]
    fn test_absent_power_counts_as_zero() {
        let farms = vec![
            farm("A", "Denmark", 100.0, None),
            farm("B", "Denmark", 100.0, Some(50.0)),
        ];
        let (countries, fleet) = aggregate(&farms).unwrap();
        assert_eq!(countries[0].total_capacity_mw, 200.0);
        assert_eq!(countries[0].total_estimated_power_mw, 50.0);
        assert_eq!(countries[0].capacity_factor_pct, 25.0);
        assert_eq!(fleet.total_generation_mw, 50.0);
    }

    #[test]
    fn test_country_capacities_sum_to_fleet() {
        let farms = vec![
            farm("A", "Denmark", 400.0, Some(360.0)),
            farm("B", "Germany", 288.0, None),
            farm("C", "United Kingdom", 1218.0, Some(1218.0)),
            farm("D", "Denmark", 7.2, Some(4.32)),
            farm("E", "Germany", 0.0, Some(0.0)),
        ];
        let (countries, fleet) = aggregate(&farms).unwrap();
        let sum: f64 = countries.iter().map(|c| c.total_capacity_mw).sum();
        assert!((sum - fleet.total_capacity_mw).abs() < 1e-9);
    }

    #[test]
    fn test_zero_capacity_has_zero_factor() {
        let farms = vec![farm("A", "Denmark", 0.0, Some(0.0))];
        let (countries, fleet) = aggregate(&farms).unwrap();
        assert_eq!(countries[0].capacity_factor_pct, 0.0);
        assert_eq!(fleet.fleet_efficiency_pct, 0.0);
    }

    #[test]
    fn test_empty_input() {
        let (countries, fleet) = aggregate(&[]).unwrap();
        assert!(countries.is_empty());
        assert_eq!(fleet, FleetSummary::default());
    }

    #[test]
    fn test_non_finite_totals_fail() {
        let farms = vec![
            farm("A", "Denmark", f64::MAX, None),
            farm("B", "Denmark", f64::MAX, None),
        ];
        assert!(aggregate(&farms).is_err());
    }
}
