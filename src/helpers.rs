//! Display rounding for dashboard figures.
//!
//! Aggregation always works in full `f64` precision; rounding happens only when
//! a figure is turned into a display record. Rounding is "half away from zero"
//! on the value as it is written in decimal, so `0.15` rounds to `0.2` even
//! though its binary representation is slightly below the midpoint.
//!
//! Non-finite inputs (NaN, ±Inf) round to 0.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Round `v` to `dp` decimal places, midpoint away from zero.
pub(crate) fn round_dp(v: f64, dp: u32) -> f64 {
    if !v.is_finite() {
        tracing::warn!("round_dp received non-finite value {}, defaulting to 0", v);
        return 0.0;
    }

    // `f64` Display yields the shortest string that round-trips.
    match Decimal::from_str(&v.to_string()) {
        Ok(d) => d
            .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
            .to_f64()
            .unwrap_or(0.0),
        // Outside Decimal range: the fractional part is already below f64 resolution.
        Err(_) => {
            let scale = 10f64.powi(dp as i32);
            (v * scale).round() / scale
        }
    }
}

/// Round to one decimal place, the default precision for dashboard figures.
pub(crate) fn round_1dp(v: f64) -> f64 {
    round_dp(v, 1)
}

/// Round an optional figure to one decimal place; absent stays absent.
pub(crate) fn opt_round_1dp(v: Option<f64>) -> Option<f64> {
    v.map(round_1dp)
}
