use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::hash::Hasher;
use twox_hash::XxHash64;

use crate::compliance::ComplianceIssue;
use crate::duty_log::DailyLog;
use crate::request::TripRequest;
use crate::stops::{RouteStop, StopKind};

/// A fully planned trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripResult {
    pub id: String,
    pub date: NaiveDate,
    pub route: String,
    pub total_distance: f64,
    /// Rounded to 0.1 h.
    pub total_driving_hours: f64,
    /// Rounded to 0.1 h.
    pub total_on_duty_hours: f64,
    /// Elapsed hours from trip start to the end of the dropoff.
    pub total_trip_hours: f64,
    pub is_compliant: bool,
    pub remaining_cycle_hours: f64,
    pub request: TripRequest,
    pub stops: Vec<RouteStop>,
    pub daily_logs: Vec<DailyLog>,
    pub compliance_issues: Vec<ComplianceIssue>,
}

impl TripResult {
    #[must_use]
    pub fn count_stops(&self, kind: StopKind) -> usize {
        self.stops.iter().filter(|stop| stop.kind == kind).count()
    }

    #[must_use]
    pub fn days(&self) -> usize {
        self.daily_logs.len()
    }

    #[must_use]
    pub fn issue_messages(&self) -> Vec<String> {
        self.compliance_issues
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

/// Stable id for a request planned on a given date.
#[must_use]
pub fn trip_id(request: &TripRequest, date: NaiveDate) -> String {
    let mut hasher = XxHash64::with_seed(0);
    for field in [&request.origin, &request.pickup, &request.dropoff] {
        hasher.write(field.as_bytes());
        hasher.write_u8(0);
    }
    hasher.write_u64(request.cycle_hours_used.to_bits());
    hasher.write_u8(u8::from(request.use_sleeper_berth));
    hasher.write_u8(u8::from(request.include_fuel_stops));
    hasher.write(date.to_string().as_bytes());
    format!("trip-{:016x}", hasher.finish())
}
