//! Simplified offshore turbine power curve.
//!
//! Maps a wind speed and a farm's rated capacity to an estimated instantaneous
//! output. Below cut-in and above cut-out the farm produces nothing; from rated
//! speed up to cut-out it produces its full capacity; in between, output is
//! linearly interpolated between fixed anchor points.

/// Below this speed (m/s) turbines do not generate.
pub const CUT_IN_SPEED_MS: f64 = 3.0;

/// From this speed (m/s) turbines produce full rated output.
pub const RATED_SPEED_MS: f64 = 12.0;

/// Above this speed (m/s) turbines shut down for safety.
pub const CUT_OUT_SPEED_MS: f64 = 25.0;

/// (wind speed m/s, fraction of rated capacity), ascending by speed.
const ANCHORS: [(f64, f64); 6] = [
    (3.0, 0.0),
    (4.0, 0.1),
    (6.0, 0.3),
    (8.0, 0.6),
    (10.0, 0.9),
    (12.0, 1.0),
];

/// Estimate power output in MW for the given wind speed and rated capacity.
///
/// Total: never fails, and the result always lies in `[0, rated_capacity_mw]`.
/// Non-finite or non-positive wind speeds yield 0. A negative or non-finite
/// capacity is treated as 0.
pub fn estimate(wind_speed_ms: f64, rated_capacity_mw: f64) -> f64 {
    if !wind_speed_ms.is_finite() || wind_speed_ms <= 0.0 {
        return 0.0;
    }

    let capacity = if rated_capacity_mw.is_finite() {
        rated_capacity_mw.max(0.0)
    } else {
        0.0
    };

    if wind_speed_ms < CUT_IN_SPEED_MS || wind_speed_ms > CUT_OUT_SPEED_MS {
        return 0.0;
    }
    if wind_speed_ms >= RATED_SPEED_MS {
        return capacity;
    }

    capacity * power_fraction(wind_speed_ms)
}

/// Fraction of rated capacity for a speed in `[CUT_IN_SPEED_MS, RATED_SPEED_MS)`.
///
/// Picks the first segment whose upper anchor is `>=` the speed, so an exact
/// anchor speed evaluates to that anchor's own fraction.
fn power_fraction(wind_speed_ms: f64) -> f64 {
    for pair in ANCHORS.windows(2) {
        let (speed_low, fraction_low) = pair[0];
        let (speed_high, fraction_high) = pair[1];
        if wind_speed_ms <= speed_high {
            let fraction = fraction_low
                + (fraction_high - fraction_low) * (wind_speed_ms - speed_low)
                    / (speed_high - speed_low);
            return fraction.clamp(0.0, 1.0);
        }
    }
    1.0
}
