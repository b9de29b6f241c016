use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::MAX_LOCATION_LEN;
use crate::rules::HosRules;

/// Errors raised when a trip request fails boundary validation.
#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("{field} location must not be empty")]
    EmptyLocation { field: &'static str },
    #[error("{field} location exceeds {max} characters (got {len})")]
    LocationTooLong {
        field: &'static str,
        max: usize,
        len: usize,
    },
    #[error("cycle hours used must be between 0 and {max:.0} (got {value})")]
    CycleHoursOutOfRange { value: f64, max: f64 },
}

/// Driver input for a single trip plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    pub origin: String,
    pub pickup: String,
    pub dropoff: String,
    pub cycle_hours_used: f64,
    #[serde(default)]
    pub use_sleeper_berth: bool,
    #[serde(default = "TripRequest::default_include_fuel_stops")]
    pub include_fuel_stops: bool,
}

impl TripRequest {
    /// Request with the input form defaults: no sleeper berth, fuel stops on.
    #[must_use]
    pub fn new(
        origin: impl Into<String>,
        pickup: impl Into<String>,
        dropoff: impl Into<String>,
        cycle_hours_used: f64,
    ) -> Self {
        Self {
            origin: origin.into(),
            pickup: pickup.into(),
            dropoff: dropoff.into(),
            cycle_hours_used,
            use_sleeper_berth: false,
            include_fuel_stops: Self::default_include_fuel_stops(),
        }
    }

    #[must_use]
    pub fn with_sleeper_berth(mut self, enabled: bool) -> Self {
        self.use_sleeper_berth = enabled;
        self
    }

    #[must_use]
    pub fn with_fuel_stops(mut self, enabled: bool) -> Self {
        self.include_fuel_stops = enabled;
        self
    }

    const fn default_include_fuel_stops() -> bool {
        true
    }

    /// Human-readable route, `origin → pickup → dropoff`.
    #[must_use]
    pub fn route_label(&self) -> String {
        format!("{} → {} → {}", self.origin, self.pickup, self.dropoff)
    }

    /// Reject requests the engine cannot plan meaningfully.
    ///
    /// # Errors
    ///
    /// Returns an error for blank or oversized locations and for cycle hours
    /// outside `0..=cycle_limit_hours`.
    pub fn validate(&self, rules: &HosRules) -> Result<(), RequestError> {
        for (field, value) in [
            ("origin", &self.origin),
            ("pickup", &self.pickup),
            ("dropoff", &self.dropoff),
        ] {
            validate_location(field, value)?;
        }
        let max = rules.cycle_limit_hours;
        if !(0.0..=max).contains(&self.cycle_hours_used) {
            return Err(RequestError::CycleHoursOutOfRange {
                value: self.cycle_hours_used,
                max,
            });
        }
        Ok(())
    }
}

fn validate_location(field: &'static str, value: &str) -> Result<(), RequestError> {
    if value.trim().is_empty() {
        return Err(RequestError::EmptyLocation { field });
    }
    let len = value.chars().count();
    if len > MAX_LOCATION_LEN {
        return Err(RequestError::LocationTooLong {
            field,
            max: MAX_LOCATION_LEN,
            len,
        });
    }
    Ok(())
}
