//! JSON shapes for an HTTP trip-calculation endpoint.

use serde::{Deserialize, Serialize};

use crate::clock::TimeOfDay;
use crate::request::TripRequest;
use crate::result::TripResult;
use crate::stops::StopKind;

/// Body of a calculate-trip request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculateTripPayload {
    pub current_location: String,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub current_cycle_used: f64,
    #[serde(default, alias = "useSleeperBerth")]
    pub use_sleeper_berth: bool,
    #[serde(
        default = "CalculateTripPayload::default_include_fuel_stops",
        alias = "includeFuelStops"
    )]
    pub include_fuel_stops: bool,
}

impl CalculateTripPayload {
    const fn default_include_fuel_stops() -> bool {
        true
    }
}

impl From<CalculateTripPayload> for TripRequest {
    fn from(payload: CalculateTripPayload) -> Self {
        Self::new(
            payload.current_location,
            payload.pickup_location,
            payload.dropoff_location,
            payload.current_cycle_used,
        )
        .with_sleeper_berth(payload.use_sleeper_berth)
        .with_fuel_stops(payload.include_fuel_stops)
    }
}

/// One stop as shown on the route map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub point_type: StopKind,
    pub address: String,
    pub sequence: usize,
    pub duration_minutes: u32,
    pub day: u32,
    pub arrival: TimeOfDay,
    pub mileage: f64,
    pub description: String,
}

/// Response body for a calculated trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculateTripResponse {
    pub trip_id: String,
    pub total_distance: f64,
    pub estimated_drive_time: f64,
    pub total_trip_time: f64,
    pub fuel_stops: usize,
    pub rest_stops: usize,
    pub route_points: Vec<RoutePoint>,
    pub eld_logs_needed: usize,
    pub is_compliant: bool,
    pub remaining_cycle_hours: f64,
    pub compliance_issues: Vec<String>,
    pub message: String,
}

impl CalculateTripResponse {
    #[must_use]
    pub fn from_result(result: &TripResult) -> Self {
        let route_points = result
            .stops
            .iter()
            .enumerate()
            .map(|(idx, stop)| RoutePoint {
                point_type: stop.kind,
                address: stop.location.clone(),
                sequence: idx + 1,
                duration_minutes: stop.duration_minutes,
                day: stop.day,
                arrival: stop.time,
                mileage: stop.mileage,
                description: stop.description.clone(),
            })
            .collect();

        Self {
            trip_id: result.id.clone(),
            total_distance: result.total_distance,
            estimated_drive_time: result.total_driving_hours,
            total_trip_time: result.total_trip_hours,
            fuel_stops: result.count_stops(StopKind::Fuel),
            rest_stops: result.count_stops(StopKind::Rest) + result.count_stops(StopKind::Sleeper),
            route_points,
            eld_logs_needed: result.days(),
            is_compliant: result.is_compliant,
            remaining_cycle_hours: result.remaining_cycle_hours,
            compliance_issues: result.issue_messages(),
            message: summary_message(result),
        }
    }
}

fn summary_message(result: &TripResult) -> String {
    let feasibility = if result.is_compliant {
        " Trip is feasible with current cycle."
    } else {
        " Warning: Trip may exceed current cycle limits."
    };
    format!(
        "Trip calculated successfully. {} days needed.{feasibility}",
        result.days()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{FixedFallback, TableEstimator};
    use crate::planner::TripPlanner;
    use chrono::NaiveDate;

    fn respond(payload: CalculateTripPayload) -> CalculateTripResponse {
        let mut planner = TripPlanner::new(TableEstimator::with_fallback(FixedFallback(500.0)));
        let date = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        let result = planner.plan(&payload.into(), date).unwrap();
        CalculateTripResponse::from_result(&result)
    }

    #[test]
    fn payload_defaults_and_mapping() {
        let payload: CalculateTripPayload = serde_json::from_str(
            r#"{"current_location":"Dallas, TX","pickup_location":"Dallas, TX",
                "dropoff_location":"Houston, TX","current_cycle_used":12}"#,
        )
        .unwrap();
        assert!(!payload.use_sleeper_berth);
        assert!(payload.include_fuel_stops);
        let request = TripRequest::from(payload);
        assert_eq!(request.origin, "Dallas, TX");
        assert!((request.cycle_hours_used - 12.0).abs() < f64::EPSILON);

        let payload: CalculateTripPayload = serde_json::from_str(
            r#"{"current_location":"A","pickup_location":"B","dropoff_location":"C",
                "current_cycle_used":0,"useSleeperBerth":true,"includeFuelStops":false}"#,
        )
        .unwrap();
        let request = TripRequest::from(payload);
        assert!(request.use_sleeper_berth);
        assert!(!request.include_fuel_stops);
    }

    #[test]
    fn payload_serializes_every_field_in_snake_case() {
        let payload = CalculateTripPayload {
            current_location: "A".to_string(),
            pickup_location: "B".to_string(),
            dropoff_location: "C".to_string(),
            current_cycle_used: 1.0,
            use_sleeper_berth: true,
            include_fuel_stops: false,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["use_sleeper_berth"], true);
        assert_eq!(value["include_fuel_stops"], false);
        assert!(value.get("useSleeperBerth").is_none());
        let back: CalculateTripPayload = serde_json::from_value(value).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn response_summarizes_a_short_trip() {
        let response = respond(CalculateTripPayload {
            current_location: "Dallas, TX".to_string(),
            pickup_location: "Dallas, TX".to_string(),
            dropoff_location: "Houston, TX".to_string(),
            current_cycle_used: 10.0,
            use_sleeper_berth: false,
            include_fuel_stops: true,
        });
        assert!(response.trip_id.starts_with("trip-"));
        assert!((response.total_distance - 239.0).abs() < f64::EPSILON);
        assert_eq!(response.route_points.len(), 3);
        assert_eq!(response.route_points[0].sequence, 1);
        assert_eq!(response.route_points[0].arrival.to_string(), "06:00");
        assert_eq!(response.eld_logs_needed, 1);
        assert!(response.is_compliant);
        assert_eq!(
            response.message,
            "Trip calculated successfully. 1 days needed. Trip is feasible with current cycle."
        );
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["route_points"][2]["point_type"], "dropoff");
    }

    #[test]
    fn response_warns_when_not_compliant() {
        let response = respond(CalculateTripPayload {
            current_location: "Boise, ID".to_string(),
            pickup_location: "Reno, NV".to_string(),
            dropoff_location: "Fargo, ND".to_string(),
            current_cycle_used: 69.0,
            use_sleeper_berth: false,
            include_fuel_stops: true,
        });
        assert!(!response.is_compliant);
        assert!(response.message.ends_with(" Warning: Trip may exceed current cycle limits."));
        assert!(!response.compliance_issues.is_empty());
        assert!(response.remaining_cycle_hours.abs() < f64::EPSILON);
    }
}
