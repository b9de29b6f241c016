//! Engine entry point: validate, simulate, synthesize logs, evaluate.

use chrono::NaiveDate;
use thiserror::Error;

use crate::compliance;
use crate::constants::MAX_LEG_MILES;
use crate::distance::{DistanceEstimator, resolve_legs};
use crate::duty_log::{self, LogSheetHeader};
use crate::numbers::round_tenth;
use crate::request::{RequestError, TripRequest};
use crate::result::{TripResult, trip_id};
use crate::rules::{HosRules, RulesError};
use crate::simulator::{self, LegDistances};

/// Errors raised before any simulation runs.
#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error("{leg} leg distance must be between 0 and {max} miles (got {miles})", max = MAX_LEG_MILES)]
    InvalidLeg { leg: &'static str, miles: f64 },
}

/// Plans trips with one rule set, distance source, and log header.
#[derive(Debug, Clone)]
pub struct TripPlanner<E> {
    rules: HosRules,
    estimator: E,
    header: LogSheetHeader,
}

impl<E: DistanceEstimator> TripPlanner<E> {
    /// Planner with the default rule set and log header.
    #[must_use]
    pub fn new(estimator: E) -> Self {
        Self {
            rules: HosRules::default(),
            estimator,
            header: LogSheetHeader::default(),
        }
    }

    /// Replace the rule set after validating it.
    ///
    /// # Errors
    ///
    /// Returns the first rule invariant that does not hold.
    pub fn with_rules(mut self, rules: HosRules) -> Result<Self, RulesError> {
        rules.validate()?;
        self.rules = rules;
        Ok(self)
    }

    #[must_use]
    pub fn with_header(mut self, header: LogSheetHeader) -> Self {
        self.header = header;
        self
    }

    #[must_use]
    pub const fn rules(&self) -> &HosRules {
        &self.rules
    }

    pub const fn estimator_mut(&mut self) -> &mut E {
        &mut self.estimator
    }

    /// Estimate both legs and plan the trip.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails validation.
    pub fn plan(
        &mut self,
        request: &TripRequest,
        start_date: NaiveDate,
    ) -> Result<TripResult, PlanError> {
        request.validate(&self.rules)?;
        let legs = resolve_legs(&mut self.estimator, request);
        self.plan_with_legs(request, legs, start_date)
    }

    /// Plan with leg distances already known. Pure and deterministic.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or either leg distance is invalid.
    pub fn plan_with_legs(
        &self,
        request: &TripRequest,
        legs: LegDistances,
        start_date: NaiveDate,
    ) -> Result<TripResult, PlanError> {
        request.validate(&self.rules)?;
        check_leg("pickup", legs.to_pickup)?;
        check_leg("dropoff", legs.to_dropoff)?;

        let outcome = simulator::simulate(&self.rules, request, legs);
        let daily_logs = duty_log::synthesize(&outcome.stops, start_date, &self.header);
        let report = compliance::evaluate(
            &self.rules,
            &outcome.counters,
            &outcome.violations,
            request,
        );

        let result = TripResult {
            id: trip_id(request, start_date),
            date: start_date,
            route: request.route_label(),
            total_distance: legs.total(),
            total_driving_hours: round_tenth(outcome.counters.cumulative_driving),
            total_on_duty_hours: round_tenth(outcome.counters.cumulative_on_duty),
            total_trip_hours: outcome.elapsed_hours(),
            is_compliant: report.is_compliant,
            remaining_cycle_hours: report.remaining_cycle_hours,
            request: request.clone(),
            stops: outcome.stops,
            daily_logs,
            compliance_issues: report.issues,
        };
        log::info!(
            "planned {} ({}): {:.0} mi, {} stops, {} day(s), compliant={}",
            result.id,
            result.route,
            result.total_distance,
            result.stops.len(),
            result.days(),
            result.is_compliant
        );
        Ok(result)
    }
}

fn check_leg(leg: &'static str, miles: f64) -> Result<(), PlanError> {
    if (0.0..=MAX_LEG_MILES).contains(&miles) {
        Ok(())
    } else {
        Err(PlanError::InvalidLeg { leg, miles })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{FixedFallback, TableEstimator};
    use crate::stops::StopKind;

    fn planner() -> TripPlanner<TableEstimator<FixedFallback>> {
        TripPlanner::new(TableEstimator::with_fallback(FixedFallback(450.0)))
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    #[test]
    fn plan_rejects_bad_requests() {
        let request = TripRequest::new("", "B", "C", 0.0);
        assert_eq!(
            planner().plan(&request, date()),
            Err(PlanError::Request(RequestError::EmptyLocation { field: "origin" }))
        );
    }

    #[test]
    fn plan_with_legs_rejects_bad_distances() {
        let request = TripRequest::new("A", "B", "C", 0.0);
        let err = planner()
            .plan_with_legs(&request, LegDistances::new(-1.0, 10.0), date())
            .unwrap_err();
        assert!(matches!(err, PlanError::InvalidLeg { leg: "pickup", .. }));
        let err = planner()
            .plan_with_legs(&request, LegDistances::new(1.0, f64::INFINITY), date())
            .unwrap_err();
        assert!(matches!(err, PlanError::InvalidLeg { leg: "dropoff", .. }));
    }

    #[test]
    fn plan_with_legs_rejects_runaway_distances() {
        let request = TripRequest::new("A", "B", "C", 0.0);
        for miles in [MAX_LEG_MILES + 1.0, 5e6, 1e20] {
            let err = planner()
                .plan_with_legs(&request, LegDistances::new(10.0, miles), date())
                .unwrap_err();
            assert!(matches!(err, PlanError::InvalidLeg { leg: "dropoff", .. }));
        }
        let result = planner()
            .plan_with_legs(&request, LegDistances::new(0.0, MAX_LEG_MILES), date())
            .unwrap();
        assert_eq!(result.count_stops(StopKind::Fuel), 9);
    }

    #[test]
    fn plan_uses_estimator_for_unknown_pairs() {
        let request = TripRequest::new("Boise, ID", "Reno, NV", "Dallas, TX", 5.0);
        let result = planner().plan(&request, date()).unwrap();
        assert!((result.total_distance - 900.0).abs() < f64::EPSILON);
        assert_eq!(result.count_stops(StopKind::Start), 1);
        assert_eq!(result.count_stops(StopKind::Dropoff), 1);
        assert_eq!(result.route, "Boise, ID → Reno, NV → Dallas, TX");
        assert_eq!(result.date, date());
    }

    #[test]
    fn custom_rules_are_validated() {
        let rules = HosRules {
            average_speed_mph: 0.0,
            ..HosRules::default()
        };
        assert!(planner().with_rules(rules).is_err());

        let rules = HosRules {
            average_speed_mph: 50.0,
            ..HosRules::default()
        };
        let planner = planner().with_rules(rules).unwrap();
        let request = TripRequest::new("A", "A", "B", 0.0);
        let result = planner
            .plan_with_legs(&request, LegDistances::new(0.0, 100.0), date())
            .unwrap();
        assert!((result.total_driving_hours - 2.0).abs() < 1e-9);
    }

    #[test]
    fn header_flows_into_logs() {
        let header = LogSheetHeader {
            driver_name: "J. Rivera".to_string(),
            carrier_name: "Lone Star Freight".to_string(),
            vehicle_number: "T-118".to_string(),
        };
        let planner = planner().with_header(header.clone());
        let request = TripRequest::new("Dallas, TX", "Dallas, TX", "Houston, TX", 0.0);
        let result = planner
            .plan_with_legs(&request, LegDistances::new(0.0, 239.0), date())
            .unwrap();
        assert!(result.daily_logs.iter().all(|log| log.header == header));
    }
}
