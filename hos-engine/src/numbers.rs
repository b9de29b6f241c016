//! Numeric conversion helpers centralizing hour/minute casts.

use num_traits::cast::cast;

use crate::constants::MINUTES_PER_HOUR;

/// Convert fractional hours to whole minutes, rounding up.
///
/// Non-finite and negative inputs yield zero; results saturate at `u32::MAX`.
#[must_use]
pub fn hours_to_minutes_ceil(hours: f64) -> u32 {
    if !hours.is_finite() || hours <= 0.0 {
        return 0;
    }
    let minutes = (hours * f64::from(MINUTES_PER_HOUR)).ceil();
    let max = f64::from(u32::MAX);
    cast::<f64, u32>(minutes.min(max)).unwrap_or(u32::MAX)
}

/// Convert whole minutes to fractional hours.
#[must_use]
pub fn minutes_to_hours(minutes: u32) -> f64 {
    f64::from(minutes) / f64::from(MINUTES_PER_HOUR)
}

/// Round to one decimal place, the precision used for reported hour totals.
#[must_use]
pub fn round_tenth(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 10.0).round() / 10.0
}

/// Truncate a mileage figure to whole miles for display labels.
#[must_use]
pub fn whole_miles(miles: f64) -> u64 {
    if !miles.is_finite() || miles <= 0.0 {
        return 0;
    }
    cast::<f64, u64>(miles.floor()).unwrap_or(u64::MAX)
}

/// Full fuel intervals driven before the last segment of a `miles`-long leg.
///
/// A leg of exactly one interval has no stop; the remainder is always in
/// `(0, interval]` when the leg is non-empty.
#[must_use]
pub fn fuel_chunks(miles: f64, interval: f64) -> u32 {
    if !miles.is_finite() || !interval.is_finite() || interval <= 0.0 || miles <= interval {
        return 0;
    }
    let chunks = (miles / interval).ceil() - 1.0;
    cast::<f64, u32>(chunks.min(f64::from(u32::MAX))).unwrap_or(0)
}
