//! Properties every planned trip must satisfy.

use anyhow::{Result, ensure};
use hos_engine::constants::DAY_TOTAL_TOLERANCE_HOURS;
use hos_engine::numbers::minutes_to_hours;
use hos_engine::{ComplianceIssue, HosRules, StopKind, TimeOfDay, TripResult};

const EPSILON: f64 = 1e-6;

/// Run every structural check against one result.
pub fn check_trip(result: &TripResult, rules: &HosRules) -> Result<()> {
    check_distance(result)?;
    check_stop_order(result)?;
    check_daily_logs(result)?;
    check_break_stops(result)?;
    check_cycle(result, rules)?;
    Ok(())
}

fn check_distance(result: &TripResult) -> Result<()> {
    let dropoff = result
        .stops
        .last()
        .filter(|stop| stop.kind == StopKind::Dropoff);
    ensure!(dropoff.is_some(), "trip must end with a dropoff stop");
    if let Some(stop) = dropoff {
        ensure!(
            (stop.mileage - result.total_distance).abs() < EPSILON,
            "dropoff mileage {:.1} does not match total distance {:.1}",
            stop.mileage,
            result.total_distance
        );
    }
    ensure!(
        result.stops.first().map(|stop| stop.kind) == Some(StopKind::Start),
        "trip must begin with a start stop"
    );
    Ok(())
}

fn check_stop_order(result: &TripResult) -> Result<()> {
    for pair in result.stops.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        ensure!(
            a.end_clock() <= b.clock(),
            "{} ends at {} after {} begins at {}",
            a.id,
            a.end_clock(),
            b.id,
            b.clock()
        );
        ensure!(
            a.mileage <= b.mileage,
            "mileage decreases from {} to {}",
            a.id,
            b.id
        );
    }
    Ok(())
}

fn check_daily_logs(result: &TripResult) -> Result<()> {
    ensure!(!result.daily_logs.is_empty(), "trip has no daily logs");
    for (idx, log) in result.daily_logs.iter().enumerate() {
        ensure!(
            log.day as usize == idx + 1,
            "log {} is numbered day {}",
            idx + 1,
            log.day
        );
        ensure!(
            log.entries.first().map(|entry| entry.time) == Some(TimeOfDay::MIDNIGHT),
            "day {} does not begin at 00:00",
            log.day
        );
        let total = log.totals.total();
        ensure!(
            (total - 24.0).abs() <= DAY_TOTAL_TOLERANCE_HOURS,
            "day {} totals {total:.2}h instead of 24h",
            log.day
        );
    }
    if let Some(last) = result.stops.last() {
        ensure!(
            result.days() >= last.day as usize,
            "trip crosses into day {} but only {} log(s) exist",
            last.day,
            result.days()
        );
    }
    Ok(())
}

fn check_break_stops(result: &TripResult) -> Result<()> {
    let sleepers = result.count_stops(StopKind::Sleeper);
    ensure!(sleepers <= 1, "{sleepers} sleeper periods, at most one allowed");
    if !result.request.use_sleeper_berth {
        ensure!(sleepers == 0, "sleeper stop inserted with sleeper berth disabled");
    }
    if !result.request.include_fuel_stops {
        ensure!(
            result.count_stops(StopKind::Fuel) == 0,
            "fuel stop inserted with fuel stops disabled"
        );
    }
    for (idx, stop) in result.stops.iter().enumerate() {
        if stop.kind == StopKind::Rest {
            let next = result.stops.get(idx + 1);
            ensure!(
                next.is_some_and(|next| next.clock() > stop.end_clock()),
                "{} is not followed by driving",
                stop.id
            );
        }
        if stop.kind == StopKind::Sleeper {
            let previous = idx.checked_sub(1).and_then(|prev| result.stops.get(prev));
            ensure!(
                previous.is_some_and(|prev| matches!(prev.kind, StopKind::Pickup | StopKind::Fuel)),
                "{} is not on the final delivery segment",
                stop.id
            );
        }
    }
    Ok(())
}

fn check_cycle(result: &TripResult, rules: &HosRules) -> Result<()> {
    let Some(dropoff) = result.stops.last() else {
        return Ok(());
    };
    let on_duty = dropoff.cumulative_on_duty_hours + minutes_to_hours(rules.dropoff_minutes);
    let total_cycle = result.request.cycle_hours_used + on_duty;
    let expected = (rules.cycle_limit_hours - total_cycle).max(0.0);
    ensure!(
        (result.remaining_cycle_hours - expected).abs() < EPSILON,
        "remaining cycle {:.2} should be {expected:.2}",
        result.remaining_cycle_hours
    );
    if total_cycle > rules.cycle_limit_hours {
        ensure!(!result.is_compliant, "cycle overrun reported as compliant");
        ensure!(
            result.compliance_issues.contains(&ComplianceIssue::CycleLimit {
                limit_hours: rules.cycle_limit_hours
            }),
            "cycle overrun missing its compliance issue"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hos_engine::{FixedFallback, LegDistances, TableEstimator, TripPlanner, TripRequest};

    fn planned(request: &TripRequest, legs: LegDistances) -> TripResult {
        TripPlanner::new(TableEstimator::with_fallback(FixedFallback(300.0)))
            .plan_with_legs(request, legs, NaiveDate::from_ymd_opt(2025, 8, 4).unwrap())
            .unwrap()
    }

    #[test]
    fn planned_trips_pass_all_checks() {
        let rules = HosRules::default();
        let request = TripRequest::new("A", "B", "C", 40.0).with_sleeper_berth(true);
        let result = planned(&request, LegDistances::new(640.0, 1_900.0));
        check_trip(&result, &rules).unwrap();
    }

    #[test]
    fn tampered_results_are_caught() {
        let rules = HosRules::default();
        let request = TripRequest::new("A", "B", "C", 0.0);
        let mut result = planned(&request, LegDistances::new(100.0, 200.0));
        result.total_distance = 999.0;
        assert!(check_trip(&result, &rules).is_err());

        let mut result = planned(&request, LegDistances::new(100.0, 200.0));
        result.daily_logs[0].entries.remove(0);
        assert!(check_trip(&result, &rules).is_err());

        let mut result = planned(&request, LegDistances::new(100.0, 200.0));
        result.remaining_cycle_hours += 1.0;
        assert!(check_trip(&result, &rules).is_err());
    }
}
