use anyhow::{Result, ensure};
use hos_engine::{ComplianceIssue, DutyStatus, StopKind, TripRequest, TripResult};

use super::plan::TripPlan;

/// A named trip plan in the verification catalog.
#[derive(Debug, Clone)]
pub struct TripScenario {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub plan: TripPlan,
}

impl TripScenario {
    fn new(key: &'static str, name: &'static str, description: &'static str, plan: TripPlan) -> Self {
        Self {
            key,
            name,
            description,
            plan,
        }
    }
}

pub fn catalog_scenarios() -> Vec<TripScenario> {
    vec![
        TripScenario::new(
            "dallas-phoenix",
            "Dallas to Phoenix Corridor",
            "887-mile known corridor, single long duty period, no fuel stop",
            TripPlan::new(
                TripRequest::new("Dallas, TX", "Dallas, TX", "Phoenix, AZ", 10.0)
                    .with_sleeper_berth(true),
            )
            .with_expectation(dallas_phoenix_expectation),
        ),
        TripScenario::new(
            "short-haul",
            "Short Haul Compliance",
            "Dallas to Houston fits one compliant day",
            TripPlan::new(TripRequest::new("Dallas, TX", "Dallas, TX", "Houston, TX", 20.0))
                .with_expectation(short_haul_expectation),
        ),
        TripScenario::new(
            "long-haul-fuel",
            "Long Haul Fuel Stops",
            "2200-mile delivery leg refuels twice",
            TripPlan::new(TripRequest::new("Laredo, TX", "Laredo, TX", "Chicago, IL", 0.0))
                .with_legs(0.0, 2_200.0)
                .with_expectation(|result: &TripResult| expect_fuel_stops(result, 2)),
        ),
        TripScenario::new(
            "no-fuel-stops",
            "Fuel Stops Disabled",
            "2200-mile delivery leg driven as one segment",
            TripPlan::new(
                TripRequest::new("Laredo, TX", "Laredo, TX", "Chicago, IL", 0.0)
                    .with_fuel_stops(false),
            )
            .with_legs(0.0, 2_200.0)
            .with_expectation(|result: &TripResult| expect_fuel_stops(result, 0)),
        ),
        TripScenario::new(
            "cycle-boundary",
            "Cycle Limit Boundary",
            "Starting with a full 70-hour cycle is accepted but flagged",
            TripPlan::new(TripRequest::new("Dallas, TX", "Dallas, TX", "Houston, TX", 70.0))
                .with_expectation(cycle_boundary_expectation),
        ),
        TripScenario::new(
            "sleeper-overnight",
            "Sleeper Berth Overnight",
            "Sleeper period before the final segment carries the trip past midnight",
            TripPlan::new(
                TripRequest::new("Amarillo, TX", "Tucson, AZ", "San Diego, CA", 5.0)
                    .with_sleeper_berth(true),
            )
            .with_legs(585.0, 400.0)
            .with_expectation(sleeper_overnight_expectation),
        ),
        TripScenario::new(
            "unknown-corridor",
            "Unknown Corridor Fallback",
            "Unlisted city pairs fall back to 200-999 mile estimates",
            TripPlan::new(TripRequest::new("Boise, ID", "Reno, NV", "Fargo, ND", 15.0))
                .with_expectation(unknown_corridor_expectation),
        ),
        TripScenario::new(
            "same-city",
            "Same City Trip",
            "Identical locations are zero miles apart",
            TripPlan::new(TripRequest::new("Atlanta, GA", "atlanta,ga", "ATLANTA, GA", 0.0))
                .with_expectation(same_city_expectation),
        ),
    ]
}

pub fn find_catalog_scenario(key: &str) -> Option<TripScenario> {
    catalog_scenarios()
        .into_iter()
        .find(|scenario| scenario.key == key)
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    catalog_scenarios()
        .into_iter()
        .map(|scenario| (scenario.key, scenario.description))
        .collect()
}

/// Expand the `--scenarios` tokens, replacing `all` with every catalog key.
pub fn expand_scenario_keys(tokens: &[String]) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for token in tokens {
        if token.eq_ignore_ascii_case("all") {
            keys.extend(catalog_scenarios().iter().map(|s| s.key.to_string()));
        } else {
            keys.push(token.clone());
        }
    }
    let mut seen = std::collections::HashSet::new();
    keys.retain(|key| seen.insert(key.clone()));
    keys
}

fn dallas_phoenix_expectation(result: &TripResult) -> Result<()> {
    ensure!(
        (result.total_distance - 887.0).abs() < f64::EPSILON,
        "expected 887 miles, got {}",
        result.total_distance
    );
    ensure!(result.count_stops(StopKind::Fuel) == 0, "no fuel stop expected");
    ensure!(
        result.count_stops(StopKind::Sleeper) == 0,
        "sleeper berth should not trigger before any driving"
    );
    let pickup = result
        .stops
        .iter()
        .find(|stop| stop.kind == StopKind::Pickup);
    ensure!(
        pickup.is_some_and(|stop| stop.duration_minutes == 60),
        "pickup should take 60 minutes"
    );
    ensure!(
        !result.is_compliant,
        "13.6 hours of driving cannot be compliant"
    );
    ensure!(
        result
            .compliance_issues
            .contains(&ComplianceIssue::DailyDrivingLimit { limit_hours: 11.0 }),
        "daily driving overrun should be reported"
    );
    Ok(())
}

fn short_haul_expectation(result: &TripResult) -> Result<()> {
    ensure!(result.is_compliant, "short haul should be compliant");
    ensure!(result.days() == 1, "short haul should fit in one day");
    ensure!(
        result.count_stops(StopKind::Rest) == 0,
        "no rest break needed under 8 hours of driving"
    );
    Ok(())
}

fn expect_fuel_stops(result: &TripResult, expected: usize) -> Result<()> {
    let fuel = result.count_stops(StopKind::Fuel);
    ensure!(fuel == expected, "expected {expected} fuel stops, got {fuel}");
    ensure!(
        (result.total_distance - 2_200.0).abs() < f64::EPSILON,
        "total distance should be 2200 miles"
    );
    Ok(())
}

fn cycle_boundary_expectation(result: &TripResult) -> Result<()> {
    ensure!(!result.is_compliant, "full cycle cannot be compliant");
    ensure!(
        result.remaining_cycle_hours.abs() < f64::EPSILON,
        "remaining cycle should clamp to zero"
    );
    ensure!(
        result
            .issue_messages()
            .iter()
            .any(|msg| msg == "Would exceed 70-hour cycle limit"),
        "cycle message missing"
    );
    Ok(())
}

fn sleeper_overnight_expectation(result: &TripResult) -> Result<()> {
    ensure!(
        result.count_stops(StopKind::Sleeper) == 1,
        "exactly one sleeper period expected"
    );
    ensure!(result.days() >= 2, "sleeper trip should span two days");
    let second = &result.daily_logs[1];
    ensure!(
        second
            .entries
            .first()
            .is_some_and(|entry| entry.status == DutyStatus::Sleeper),
        "day 2 should open in the sleeper berth"
    );
    Ok(())
}

fn unknown_corridor_expectation(result: &TripResult) -> Result<()> {
    ensure!(
        (400.0..2_000.0).contains(&result.total_distance),
        "two fallback legs should total 400-1998 miles, got {}",
        result.total_distance
    );
    ensure!(
        result.total_distance.fract().abs() < f64::EPSILON,
        "fallback miles should be whole"
    );
    Ok(())
}

fn same_city_expectation(result: &TripResult) -> Result<()> {
    ensure!(result.total_distance.abs() < f64::EPSILON, "same city should be 0 miles");
    ensure!(result.is_compliant, "a zero-mile trip is compliant");
    ensure!(
        result.total_driving_hours.abs() < f64::EPSILON,
        "no driving expected for a zero-mile trip"
    );
    Ok(())
}
