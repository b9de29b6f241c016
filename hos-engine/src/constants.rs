//! Centralized Hours-of-Service thresholds and trip assumptions.
//!
//! These values seed [`crate::rules::HosRules`] defaults. Overrides go through
//! a rules file so that the numbers used for any plan stay reviewable.

// Clock ----------------------------------------------------------------------
pub const MINUTES_PER_HOUR: u32 = 60;
pub const MINUTES_PER_DAY: u32 = 24 * MINUTES_PER_HOUR;
pub(crate) const DAY_START_MINUTE: u32 = 6 * MINUTES_PER_HOUR;
pub(crate) const PRE_TRIP_MINUTES: u32 = 30;

// Travel -------------------------------------------------------------------
pub(crate) const AVERAGE_SPEED_MPH: f64 = 65.0;
pub(crate) const FUEL_INTERVAL_MILES: f64 = 1_000.0;

// Stop durations (minutes) --------------------------------------------------
pub(crate) const REST_BREAK_MINUTES: u32 = 30;
pub(crate) const PICKUP_MINUTES: u32 = 60;
pub(crate) const DROPOFF_MINUTES: u32 = 60;
pub(crate) const FUEL_STOP_MINUTES: u32 = 30;
pub(crate) const SLEEPER_MINUTES: u32 = 8 * MINUTES_PER_HOUR;

// Regulatory limits (hours) -------------------------------------------------
pub(crate) const BREAK_AFTER_DRIVING_HOURS: f64 = 8.0;
pub(crate) const MAX_DAILY_DRIVING_HOURS: f64 = 11.0;
pub(crate) const MAX_DUTY_WINDOW_HOURS: f64 = 14.0;
pub(crate) const CYCLE_LIMIT_HOURS: f64 = 70.0;
pub(crate) const SLEEPER_DRIVING_TRIGGER_HOURS: f64 = 8.0;
pub(crate) const SLEEPER_ON_DUTY_TRIGGER_HOURS: f64 = 12.0;

// Distance fallback ---------------------------------------------------------
pub(crate) const FALLBACK_MIN_MILES: u32 = 200;
pub(crate) const FALLBACK_MAX_MILES: u32 = 1_000;

// Input limits ---------------------------------------------------------------
pub(crate) const MAX_LOCATION_LEN: usize = 200;
/// Longest single leg accepted from an estimator, a provider, or a caller.
pub const MAX_LEG_MILES: f64 = 10_000.0;

// Log tolerance --------------------------------------------------------------
pub const DAY_TOTAL_TOLERANCE_HOURS: f64 = 0.1;

// Log sheet defaults ---------------------------------------------------------
pub(crate) const DEFAULT_DRIVER_NAME: &str = "Driver";
pub(crate) const DEFAULT_CARRIER_NAME: &str = "Carrier";
pub(crate) const DEFAULT_VEHICLE_NUMBER: &str = "V001";

// Log remarks ----------------------------------------------------------------
pub(crate) const HOME_TERMINAL: &str = "Home Terminal";
pub(crate) const REMARK_BREAK_COMPLETED: &str = "Off duty - 10 hour break completed";
pub(crate) const REMARK_TRIP_COMPLETE: &str = "Off duty - trip complete";
pub(crate) const REMARK_CONTINUED: &str = "Continued from previous day";
pub(crate) const REMARK_DRIVING: &str = "Driving";
