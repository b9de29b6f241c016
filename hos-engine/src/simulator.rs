//! Segment-by-segment trip simulation.
//!
//! The simulator walks the trip in order (pre-trip, drive to pickup, pickup,
//! delivery leg in fuel-interval chunks, dropoff), advancing the clock and
//! the duty counters and inserting rest, fuel, and sleeper stops when their
//! thresholds trip.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::clock::TripClock;
use crate::compliance::ComplianceIssue;
use crate::numbers::{fuel_chunks, hours_to_minutes_ceil, minutes_to_hours, whole_miles};
use crate::request::TripRequest;
use crate::rules::HosRules;
use crate::stops::{RouteStop, StopKind};

/// Violations projected while the simulation runs.
pub type ViolationList = SmallVec<[ComplianceIssue; 4]>;

/// Mileage for the two legs of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LegDistances {
    pub to_pickup: f64,
    pub to_dropoff: f64,
}

impl LegDistances {
    #[must_use]
    pub const fn new(to_pickup: f64, to_dropoff: f64) -> Self {
        Self {
            to_pickup,
            to_dropoff,
        }
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.to_pickup + self.to_dropoff
    }
}

/// Running duty counters. Cumulative values never reset; daily values and
/// `since_break` reset on each sleeper period.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DutyCounters {
    pub cumulative_driving: f64,
    pub cumulative_on_duty: f64,
    pub mileage: f64,
    pub daily_driving: f64,
    pub daily_on_duty: f64,
    pub since_break: f64,
    pub peak_daily_driving: f64,
    pub peak_daily_on_duty: f64,
    /// Number of duty periods begun; starts at 1.
    pub duty_period: u32,
}

impl DutyCounters {
    fn fresh() -> Self {
        Self {
            duty_period: 1,
            ..Self::default()
        }
    }

    fn add_on_duty(&mut self, hours: f64) {
        self.cumulative_on_duty += hours;
        self.daily_on_duty += hours;
        self.track_peaks();
    }

    fn add_driving(&mut self, hours: f64, miles: f64) {
        self.cumulative_driving += hours;
        self.daily_driving += hours;
        self.since_break += hours;
        self.mileage += miles;
        self.add_on_duty(hours);
    }

    fn start_duty_period(&mut self) {
        self.daily_driving = 0.0;
        self.daily_on_duty = 0.0;
        self.since_break = 0.0;
        self.duty_period = self.duty_period.saturating_add(1);
    }

    fn track_peaks(&mut self) {
        self.peak_daily_driving = self.peak_daily_driving.max(self.daily_driving);
        self.peak_daily_on_duty = self.peak_daily_on_duty.max(self.daily_on_duty);
    }
}

/// Everything the simulation produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutcome {
    pub stops: Vec<RouteStop>,
    pub counters: DutyCounters,
    pub violations: ViolationList,
    pub started_at: TripClock,
    pub finished_at: TripClock,
}

impl SimulationOutcome {
    #[must_use]
    pub fn count(&self, kind: StopKind) -> usize {
        self.stops.iter().filter(|stop| stop.kind == kind).count()
    }

    /// Hours between the trip start and the end of the dropoff.
    #[must_use]
    pub fn elapsed_hours(&self) -> f64 {
        self.finished_at.hours_since(self.started_at)
    }
}

/// Run the trip simulation for the given legs.
#[must_use]
pub fn simulate(rules: &HosRules, request: &TripRequest, legs: LegDistances) -> SimulationOutcome {
    let mut sim = TripSimulator::new(rules, request);
    sim.pre_trip();
    sim.drive_to_pickup(legs.to_pickup);
    sim.pickup();
    sim.drive_to_dropoff(legs.to_dropoff);
    sim.dropoff();
    sim.finish()
}

struct TripSimulator<'a> {
    rules: &'a HosRules,
    request: &'a TripRequest,
    started_at: TripClock,
    clock: TripClock,
    counters: DutyCounters,
    stops: Vec<RouteStop>,
    violations: ViolationList,
}

impl<'a> TripSimulator<'a> {
    fn new(rules: &'a HosRules, request: &'a TripRequest) -> Self {
        let started_at = TripClock::from_minutes(rules.day_start_minute);
        Self {
            rules,
            request,
            started_at,
            clock: started_at,
            counters: DutyCounters::fresh(),
            stops: Vec::new(),
            violations: ViolationList::new(),
        }
    }

    fn push_stop(
        &mut self,
        kind: StopKind,
        location: String,
        duration_minutes: u32,
        description: String,
    ) {
        let id = format!("{kind}-{}", self.stops.len() + 1);
        log::debug!(
            "{id} at {} ({} min) mile {:.1}: {description}",
            self.clock,
            duration_minutes,
            self.counters.mileage
        );
        self.stops.push(RouteStop {
            id,
            kind,
            location,
            day: self.clock.day_number(),
            time: self.clock.time_of_day(),
            duration_minutes,
            description,
            mileage: self.counters.mileage,
            cumulative_driving_hours: self.counters.cumulative_driving,
            cumulative_on_duty_hours: self.counters.cumulative_on_duty,
        });
    }

    fn mile_label(&self, suffix: &str) -> String {
        let mile = whole_miles(self.counters.mileage);
        if suffix.is_empty() {
            format!("Mile {mile}")
        } else {
            format!("Mile {mile} - {suffix}")
        }
    }

    fn pre_trip(&mut self) {
        let minutes = self.rules.pre_trip_minutes;
        self.push_stop(
            StopKind::Start,
            self.request.origin.clone(),
            minutes,
            "Trip Start - Pre-trip inspection".to_string(),
        );
        self.clock.advance(minutes);
        self.counters.add_on_duty(self.rules.pre_trip_hours());
    }

    fn drive_to_pickup(&mut self, miles: f64) {
        let location = format!("En route to {}", self.request.pickup);
        self.drive_with_break_check(miles, location);
    }

    fn pickup(&mut self) {
        let minutes = self.rules.pickup_minutes;
        self.push_stop(
            StopKind::Pickup,
            self.request.pickup.clone(),
            minutes,
            format!("Pickup - Loading cargo ({minutes} minutes)"),
        );
        self.clock.advance(minutes);
        self.counters.add_on_duty(self.rules.pickup_hours());
    }

    fn drive_to_dropoff(&mut self, miles: f64) {
        let interval = self.rules.fuel_interval_miles;
        let chunks = if self.request.include_fuel_stops {
            fuel_chunks(miles, interval)
        } else {
            0
        };
        for _ in 0..chunks {
            let location = self.mile_label("");
            self.drive_with_break_check(interval, location);
            self.fuel_stop();
        }
        self.final_segment(miles - interval * f64::from(chunks));
    }

    fn fuel_stop(&mut self) {
        let minutes = self.rules.fuel_stop_minutes;
        self.push_stop(
            StopKind::Fuel,
            self.mile_label("Truck Stop"),
            minutes,
            format!("Fuel stop ({minutes} minutes)"),
        );
        self.clock.advance(minutes);
        self.counters.add_on_duty(self.rules.fuel_stop_hours());
    }

    fn final_segment(&mut self, miles: f64) {
        let hours = self.rules.driving_hours(miles);
        if self.counters.daily_driving + hours > self.rules.max_daily_driving_hours {
            self.violations.push(ComplianceIssue::DailyDrivingLimit {
                limit_hours: self.rules.max_daily_driving_hours,
            });
        }
        if self.counters.daily_on_duty + hours > self.rules.max_duty_window_hours {
            self.violations.push(ComplianceIssue::DutyWindowLimit {
                limit_hours: self.rules.max_duty_window_hours,
            });
        }
        if self.request.use_sleeper_berth && self.sleeper_due() {
            self.sleeper();
        }
        self.drive(miles, hours);
    }

    fn sleeper_due(&self) -> bool {
        self.counters.daily_driving > self.rules.sleeper_driving_trigger_hours
            || self.counters.daily_on_duty > self.rules.sleeper_on_duty_trigger_hours
    }

    fn sleeper(&mut self) {
        let minutes = self.rules.sleeper_minutes;
        let hours = minutes_to_hours(minutes);
        self.push_stop(
            StopKind::Sleeper,
            self.mile_label("Rest Area"),
            minutes,
            format!("{hours}-hour sleeper berth rest"),
        );
        self.clock.advance(minutes);
        self.counters.start_duty_period();
    }

    fn dropoff(&mut self) {
        let minutes = self.rules.dropoff_minutes;
        self.push_stop(
            StopKind::Dropoff,
            self.request.dropoff.clone(),
            minutes,
            format!("Delivery - Unloading cargo ({minutes} minutes)"),
        );
        self.clock.advance(minutes);
        self.counters.add_on_duty(self.rules.dropoff_hours());
    }

    fn drive_with_break_check(&mut self, miles: f64, rest_location: String) {
        let hours = self.rules.driving_hours(miles);
        if self.counters.since_break + hours > self.rules.break_after_driving_hours {
            self.rest_break(rest_location);
        }
        self.drive(miles, hours);
    }

    fn rest_break(&mut self, location: String) {
        let minutes = self.rules.rest_break_minutes;
        let after = self.rules.break_after_driving_hours;
        self.push_stop(
            StopKind::Rest,
            location,
            minutes,
            format!("{minutes}-minute rest break (required after {after}hrs driving)"),
        );
        self.clock.advance(minutes);
        self.counters.since_break = 0.0;
    }

    fn drive(&mut self, miles: f64, hours: f64) {
        self.clock.advance(hours_to_minutes_ceil(hours));
        self.counters.add_driving(hours, miles);
    }

    fn finish(self) -> SimulationOutcome {
        SimulationOutcome {
            stops: self.stops,
            counters: self.counters,
            violations: self.violations,
            started_at: self.started_at,
            finished_at: self.clock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(outcome: &SimulationOutcome) -> Vec<StopKind> {
        outcome.stops.iter().map(|stop| stop.kind).collect()
    }

    fn run(request: &TripRequest, legs: LegDistances) -> SimulationOutcome {
        simulate(&HosRules::default(), request, legs)
    }

    #[test]
    fn local_trip_has_only_core_stops() {
        let request = TripRequest::new("Dallas, TX", "Dallas, TX", "Houston, TX", 0.0);
        let outcome = run(&request, LegDistances::new(0.0, 239.0));
        assert_eq!(
            kinds(&outcome),
            vec![StopKind::Start, StopKind::Pickup, StopKind::Dropoff]
        );
        let start = &outcome.stops[0];
        assert_eq!(start.time.to_string(), "06:00");
        assert_eq!(start.duration_minutes, 30);
        let pickup = &outcome.stops[1];
        assert_eq!(pickup.time.to_string(), "06:30");
        assert_eq!(pickup.duration_minutes, 60);
        // 239 mi at 65 mph rounds up to 221 minutes after the 07:30 departure.
        let dropoff = &outcome.stops[2];
        assert_eq!(dropoff.time.to_string(), "11:11");
        assert!((dropoff.mileage - 239.0).abs() < f64::EPSILON);
        assert!(outcome.violations.is_empty());
        let expected_on_duty = 0.5 + 1.0 + 239.0 / 65.0 + 1.0;
        assert!((outcome.counters.cumulative_on_duty - expected_on_duty).abs() < 1e-9);
    }

    #[test]
    fn long_first_leg_inserts_rest_before_driving() {
        let request = TripRequest::new("A", "B", "C", 0.0);
        let outcome = run(&request, LegDistances::new(600.0, 50.0));
        assert_eq!(
            kinds(&outcome),
            vec![
                StopKind::Start,
                StopKind::Rest,
                StopKind::Pickup,
                StopKind::Dropoff
            ]
        );
        let rest = &outcome.stops[1];
        assert_eq!(rest.location, "En route to B");
        assert_eq!(rest.time.to_string(), "06:30");
        assert_eq!(rest.duration_minutes, 30);
        assert!(rest.mileage.abs() < f64::EPSILON);
    }

    #[test]
    fn fuel_chunks_split_the_delivery_leg() {
        let request = TripRequest::new("A", "A", "Z", 0.0);
        let outcome = run(&request, LegDistances::new(0.0, 2_200.0));
        assert_eq!(outcome.count(StopKind::Fuel), 2);
        let fuel: Vec<&RouteStop> = outcome
            .stops
            .iter()
            .filter(|stop| stop.kind == StopKind::Fuel)
            .collect();
        assert!((fuel[0].mileage - 1_000.0).abs() < f64::EPSILON);
        assert!((fuel[1].mileage - 2_000.0).abs() < f64::EPSILON);
        assert_eq!(fuel[0].location, "Mile 1000 - Truck Stop");
        // Each 1000-mile chunk is more than 8 hours of driving.
        assert_eq!(outcome.count(StopKind::Rest), 2);
        assert!((outcome.counters.mileage - 2_200.0).abs() < 1e-9);
    }

    #[test]
    fn fuel_stops_disabled_drives_the_whole_leg() {
        let request = TripRequest::new("A", "A", "Z", 0.0).with_fuel_stops(false);
        let outcome = run(&request, LegDistances::new(0.0, 2_200.0));
        assert_eq!(outcome.count(StopKind::Fuel), 0);
        assert!((outcome.counters.mileage - 2_200.0).abs() < 1e-9);
        assert!(outcome
            .violations
            .contains(&ComplianceIssue::DailyDrivingLimit { limit_hours: 11.0 }));
    }

    #[test]
    fn sleeper_resets_daily_counters_once() {
        let request = TripRequest::new("A", "B", "C", 0.0).with_sleeper_berth(true);
        let outcome = run(&request, LegDistances::new(585.0, 400.0));
        assert_eq!(outcome.count(StopKind::Sleeper), 1);
        let sleeper = outcome
            .stops
            .iter()
            .find(|stop| stop.kind == StopKind::Sleeper)
            .unwrap();
        assert_eq!(sleeper.duration_minutes, 480);
        assert_eq!(sleeper.description, "8-hour sleeper berth rest");
        assert_eq!(outcome.counters.duty_period, 2);
        let second_period = 400.0 / 65.0 + 1.0;
        assert!((outcome.counters.daily_on_duty - second_period).abs() < 1e-9);
        assert!(outcome.counters.peak_daily_on_duty > outcome.counters.daily_on_duty);
    }

    #[test]
    fn sleeper_not_taken_when_disabled() {
        let request = TripRequest::new("A", "B", "C", 0.0);
        let outcome = run(&request, LegDistances::new(585.0, 400.0));
        assert_eq!(outcome.count(StopKind::Sleeper), 0);
        assert_eq!(outcome.counters.duty_period, 1);
        assert!(!outcome.violations.is_empty());
    }

    #[test]
    fn sleeper_waits_for_a_trigger_to_be_exceeded() {
        let request = TripRequest::new("A", "B", "C", 0.0).with_sleeper_berth(true);
        // 520 mi is exactly 8.0 h of driving and 9.5 h on duty at the pickup.
        let at_trigger = run(&request, LegDistances::new(520.0, 100.0));
        assert_eq!(at_trigger.count(StopKind::Sleeper), 0);
        assert_eq!(at_trigger.count(StopKind::Rest), 0);
        assert_eq!(at_trigger.counters.duty_period, 1);

        let past_trigger = run(&request, LegDistances::new(521.0, 100.0));
        assert_eq!(past_trigger.count(StopKind::Sleeper), 1);

        let on_duty_trigger = |hours: f64| HosRules {
            sleeper_on_duty_trigger_hours: hours,
            ..HosRules::default()
        };
        let legs = LegDistances::new(520.0, 100.0);
        let at_limit = simulate(&on_duty_trigger(9.5), &request, legs);
        assert_eq!(at_limit.count(StopKind::Sleeper), 0);
        let past_limit = simulate(&on_duty_trigger(9.0), &request, legs);
        assert_eq!(past_limit.count(StopKind::Sleeper), 1);
    }

    #[test]
    fn stops_are_ordered_in_time_and_mileage() {
        let request = TripRequest::new("A", "B", "C", 20.0).with_sleeper_berth(true);
        let outcome = run(&request, LegDistances::new(700.0, 2_450.0));
        for pair in outcome.stops.windows(2) {
            assert!(pair[0].clock() <= pair[1].clock());
            assert!(pair[0].mileage <= pair[1].mileage);
            assert!(pair[0].cumulative_driving_hours <= pair[1].cumulative_driving_hours);
            assert!(pair[0].cumulative_on_duty_hours <= pair[1].cumulative_on_duty_hours);
        }
        assert!(outcome.finished_at > outcome.started_at);
    }
}
