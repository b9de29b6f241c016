//! Tunable Hours-of-Service rule set.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    AVERAGE_SPEED_MPH, BREAK_AFTER_DRIVING_HOURS, CYCLE_LIMIT_HOURS, DAY_START_MINUTE,
    DROPOFF_MINUTES, FUEL_INTERVAL_MILES, FUEL_STOP_MINUTES, MAX_DAILY_DRIVING_HOURS,
    MAX_DUTY_WINDOW_HOURS, MINUTES_PER_DAY, PICKUP_MINUTES, PRE_TRIP_MINUTES, REST_BREAK_MINUTES,
    SLEEPER_DRIVING_TRIGGER_HOURS, SLEEPER_MINUTES, SLEEPER_ON_DUTY_TRIGGER_HOURS,
};
use crate::numbers::minutes_to_hours;

/// Errors raised when rule-set invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum RulesError {
    #[error("{field} must be at least {min:.2} (got {value:.2})")]
    MinViolation {
        field: &'static str,
        min: f64,
        value: f64,
    },
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("{field} ({value:.2}) must not exceed {limit_field} ({limit:.2})")]
    ExceedsLimit {
        field: &'static str,
        value: f64,
        limit_field: &'static str,
        limit: f64,
    },
    #[error("rules file could not be parsed: {0}")]
    Parse(String),
}

/// Thresholds and durations driving the trip simulation.
///
/// Every field falls back to its regulatory default when omitted from a
/// rules file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HosRules {
    #[serde(default = "HosRules::default_average_speed_mph")]
    pub average_speed_mph: f64,
    #[serde(default = "HosRules::default_fuel_interval_miles")]
    pub fuel_interval_miles: f64,
    #[serde(default = "HosRules::default_break_after_driving_hours")]
    pub break_after_driving_hours: f64,
    #[serde(default = "HosRules::default_max_daily_driving_hours")]
    pub max_daily_driving_hours: f64,
    #[serde(default = "HosRules::default_max_duty_window_hours")]
    pub max_duty_window_hours: f64,
    #[serde(default = "HosRules::default_cycle_limit_hours")]
    pub cycle_limit_hours: f64,
    #[serde(default = "HosRules::default_sleeper_driving_trigger_hours")]
    pub sleeper_driving_trigger_hours: f64,
    #[serde(default = "HosRules::default_sleeper_on_duty_trigger_hours")]
    pub sleeper_on_duty_trigger_hours: f64,
    #[serde(default = "HosRules::default_day_start_minute")]
    pub day_start_minute: u32,
    #[serde(default = "HosRules::default_pre_trip_minutes")]
    pub pre_trip_minutes: u32,
    #[serde(default = "HosRules::default_rest_break_minutes")]
    pub rest_break_minutes: u32,
    #[serde(default = "HosRules::default_pickup_minutes")]
    pub pickup_minutes: u32,
    #[serde(default = "HosRules::default_dropoff_minutes")]
    pub dropoff_minutes: u32,
    #[serde(default = "HosRules::default_fuel_stop_minutes")]
    pub fuel_stop_minutes: u32,
    #[serde(default = "HosRules::default_sleeper_minutes")]
    pub sleeper_minutes: u32,
}

impl HosRules {
    const fn default_average_speed_mph() -> f64 {
        AVERAGE_SPEED_MPH
    }

    const fn default_fuel_interval_miles() -> f64 {
        FUEL_INTERVAL_MILES
    }

    const fn default_break_after_driving_hours() -> f64 {
        BREAK_AFTER_DRIVING_HOURS
    }

    const fn default_max_daily_driving_hours() -> f64 {
        MAX_DAILY_DRIVING_HOURS
    }

    const fn default_max_duty_window_hours() -> f64 {
        MAX_DUTY_WINDOW_HOURS
    }

    const fn default_cycle_limit_hours() -> f64 {
        CYCLE_LIMIT_HOURS
    }

    const fn default_sleeper_driving_trigger_hours() -> f64 {
        SLEEPER_DRIVING_TRIGGER_HOURS
    }

    const fn default_sleeper_on_duty_trigger_hours() -> f64 {
        SLEEPER_ON_DUTY_TRIGGER_HOURS
    }

    const fn default_day_start_minute() -> u32 {
        DAY_START_MINUTE
    }

    const fn default_pre_trip_minutes() -> u32 {
        PRE_TRIP_MINUTES
    }

    const fn default_rest_break_minutes() -> u32 {
        REST_BREAK_MINUTES
    }

    const fn default_pickup_minutes() -> u32 {
        PICKUP_MINUTES
    }

    const fn default_dropoff_minutes() -> u32 {
        DROPOFF_MINUTES
    }

    const fn default_fuel_stop_minutes() -> u32 {
        FUEL_STOP_MINUTES
    }

    const fn default_sleeper_minutes() -> u32 {
        SLEEPER_MINUTES
    }

    /// Parse a rules file, filling omitted fields with defaults, then validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the resulting rules are invalid.
    pub fn from_json(json: &str) -> Result<Self, RulesError> {
        let rules: Self =
            serde_json::from_str(json).map_err(|err| RulesError::Parse(err.to_string()))?;
        rules.validate()?;
        Ok(rules)
    }

    /// Driving hours needed to cover `miles` at the configured average speed.
    #[must_use]
    pub fn driving_hours(&self, miles: f64) -> f64 {
        miles / self.average_speed_mph
    }

    #[must_use]
    pub fn pre_trip_hours(&self) -> f64 {
        minutes_to_hours(self.pre_trip_minutes)
    }

    #[must_use]
    pub fn pickup_hours(&self) -> f64 {
        minutes_to_hours(self.pickup_minutes)
    }

    #[must_use]
    pub fn dropoff_hours(&self) -> f64 {
        minutes_to_hours(self.dropoff_minutes)
    }

    #[must_use]
    pub fn fuel_stop_hours(&self) -> f64 {
        minutes_to_hours(self.fuel_stop_minutes)
    }

    /// Validate invariants on the rule set.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invariant that does not hold.
    pub fn validate(&self) -> Result<(), RulesError> {
        self.validate_travel()?;
        self.validate_limits()?;
        self.validate_triggers()?;
        self.validate_clock()?;
        Ok(())
    }

    fn validate_travel(&self) -> Result<(), RulesError> {
        if !(5.0..=90.0).contains(&self.average_speed_mph) {
            return Err(RulesError::RangeViolation {
                field: "average_speed_mph",
                min: 5.0,
                max: 90.0,
                value: self.average_speed_mph,
            });
        }
        if !(self.fuel_interval_miles >= 50.0) {
            return Err(RulesError::MinViolation {
                field: "fuel_interval_miles",
                min: 50.0,
                value: self.fuel_interval_miles,
            });
        }
        Ok(())
    }

    fn validate_limits(&self) -> Result<(), RulesError> {
        for (field, value) in [
            ("break_after_driving_hours", self.break_after_driving_hours),
            ("max_daily_driving_hours", self.max_daily_driving_hours),
            ("max_duty_window_hours", self.max_duty_window_hours),
            ("cycle_limit_hours", self.cycle_limit_hours),
        ] {
            if !(value >= 1.0) {
                return Err(RulesError::MinViolation {
                    field,
                    min: 1.0,
                    value,
                });
            }
        }
        if self.max_daily_driving_hours > self.max_duty_window_hours {
            return Err(RulesError::ExceedsLimit {
                field: "max_daily_driving_hours",
                value: self.max_daily_driving_hours,
                limit_field: "max_duty_window_hours",
                limit: self.max_duty_window_hours,
            });
        }
        if self.break_after_driving_hours > self.max_daily_driving_hours {
            return Err(RulesError::ExceedsLimit {
                field: "break_after_driving_hours",
                value: self.break_after_driving_hours,
                limit_field: "max_daily_driving_hours",
                limit: self.max_daily_driving_hours,
            });
        }
        if self.max_duty_window_hours > self.cycle_limit_hours {
            return Err(RulesError::ExceedsLimit {
                field: "max_duty_window_hours",
                value: self.max_duty_window_hours,
                limit_field: "cycle_limit_hours",
                limit: self.cycle_limit_hours,
            });
        }
        Ok(())
    }

    fn validate_triggers(&self) -> Result<(), RulesError> {
        if self.sleeper_driving_trigger_hours > self.max_daily_driving_hours {
            return Err(RulesError::ExceedsLimit {
                field: "sleeper_driving_trigger_hours",
                value: self.sleeper_driving_trigger_hours,
                limit_field: "max_daily_driving_hours",
                limit: self.max_daily_driving_hours,
            });
        }
        if self.sleeper_on_duty_trigger_hours > self.max_duty_window_hours {
            return Err(RulesError::ExceedsLimit {
                field: "sleeper_on_duty_trigger_hours",
                value: self.sleeper_on_duty_trigger_hours,
                limit_field: "max_duty_window_hours",
                limit: self.max_duty_window_hours,
            });
        }
        if !(self.sleeper_driving_trigger_hours >= 0.0) {
            return Err(RulesError::MinViolation {
                field: "sleeper_driving_trigger_hours",
                min: 0.0,
                value: self.sleeper_driving_trigger_hours,
            });
        }
        if !(self.sleeper_on_duty_trigger_hours >= 0.0) {
            return Err(RulesError::MinViolation {
                field: "sleeper_on_duty_trigger_hours",
                min: 0.0,
                value: self.sleeper_on_duty_trigger_hours,
            });
        }
        Ok(())
    }

    fn validate_clock(&self) -> Result<(), RulesError> {
        if self.day_start_minute >= MINUTES_PER_DAY {
            return Err(RulesError::RangeViolation {
                field: "day_start_minute",
                min: 0.0,
                max: f64::from(MINUTES_PER_DAY - 1),
                value: f64::from(self.day_start_minute),
            });
        }
        if self.sleeper_minutes == 0 {
            return Err(RulesError::MinViolation {
                field: "sleeper_minutes",
                min: 1.0,
                value: 0.0,
            });
        }
        Ok(())
    }
}

impl Default for HosRules {
    fn default() -> Self {
        Self {
            average_speed_mph: Self::default_average_speed_mph(),
            fuel_interval_miles: Self::default_fuel_interval_miles(),
            break_after_driving_hours: Self::default_break_after_driving_hours(),
            max_daily_driving_hours: Self::default_max_daily_driving_hours(),
            max_duty_window_hours: Self::default_max_duty_window_hours(),
            cycle_limit_hours: Self::default_cycle_limit_hours(),
            sleeper_driving_trigger_hours: Self::default_sleeper_driving_trigger_hours(),
            sleeper_on_duty_trigger_hours: Self::default_sleeper_on_duty_trigger_hours(),
            day_start_minute: Self::default_day_start_minute(),
            pre_trip_minutes: Self::default_pre_trip_minutes(),
            rest_break_minutes: Self::default_rest_break_minutes(),
            pickup_minutes: Self::default_pickup_minutes(),
            dropoff_minutes: Self::default_dropoff_minutes(),
            fuel_stop_minutes: Self::default_fuel_stop_minutes(),
            sleeper_minutes: Self::default_sleeper_minutes(),
        }
    }
}
