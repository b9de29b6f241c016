use chrono::NaiveDate;
use colored::Colorize;
use hos_engine::{HosRules, TableEstimator, TripPlanner, TripResult};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::checks::check_trip;
use super::scenarios::TripScenario;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_key: String,
    pub scenario_name: String,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
}

/// Replays catalog scenarios against the engine.
pub struct ScenarioRunner {
    rules: HosRules,
    start_date: NaiveDate,
    verbose: bool,
}

impl ScenarioRunner {
    pub const fn new(rules: HosRules, start_date: NaiveDate, verbose: bool) -> Self {
        Self {
            rules,
            start_date,
            verbose,
        }
    }

    pub fn run_scenario(
        &self,
        scenario: &TripScenario,
        base_seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        if self.verbose {
            println!(
                "🧪 Testing scenario: {} (seed: {base_seed})",
                scenario.name.bright_white()
            );
        }

        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();

        for i in 0..iterations {
            let start_time = Instant::now();
            let seed = base_seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));

            match self.run_iteration(scenario, seed) {
                Ok(result) => {
                    successes += 1;
                    let duration = start_time.elapsed();
                    performance_data.push(duration);
                    if self.verbose {
                        println!(
                            "  ✅ Iteration {}/{} passed ({duration:?}) {:.0} mi, {} stops, {} day(s)",
                            i + 1,
                            iterations,
                            result.total_distance,
                            result.stops.len(),
                            result.days()
                        );
                    }
                }
                Err(err) => {
                    let message = format!("Iteration {} (seed {seed}): {err:#}", i + 1);
                    if self.verbose {
                        println!(
                            "  ❌ Iteration {}/{} failed: {}",
                            i + 1,
                            iterations,
                            format!("{err:#}").red()
                        );
                    }
                    failures.push(message);
                }
            }
        }

        let average_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_key: scenario.key.to_string(),
            scenario_name: scenario.name.to_string(),
            passed: failures.is_empty() && iterations > 0,
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration,
            performance_data,
        }
    }

    /// Plan twice with the same seed, then run structural and scenario checks.
    fn run_iteration(&self, scenario: &TripScenario, seed: u64) -> anyhow::Result<TripResult> {
        let first = self.plan_once(scenario, seed)?;
        let second = self.plan_once(scenario, seed)?;
        anyhow::ensure!(first == second, "same seed produced different plans");
        check_trip(&first, &self.rules)?;
        scenario.plan.evaluate(&first)?;
        Ok(first)
    }

    fn plan_once(&self, scenario: &TripScenario, seed: u64) -> anyhow::Result<TripResult> {
        let mut planner =
            TripPlanner::new(TableEstimator::seeded(seed)).with_rules(self.rules.clone())?;
        let plan = &scenario.plan;
        let result = match plan.legs {
            Some(legs) => planner.plan_with_legs(&plan.request, legs, self.start_date)?,
            None => planner.plan(&plan.request, self.start_date)?,
        };
        Ok(result)
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_micros().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros = u128::deserialize(deserializer)?;
        Ok(Duration::from_micros(u64::try_from(micros).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let micros: Vec<u128> = durations.iter().map(Duration::as_micros).collect();
        micros.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros = Vec::<u128>::deserialize(deserializer)?;
        Ok(micros
            .into_iter()
            .map(|m| Duration::from_micros(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::scenarios::{catalog_scenarios, find_catalog_scenario};

    fn runner() -> ScenarioRunner {
        ScenarioRunner::new(
            HosRules::default(),
            NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            false,
        )
    }

    #[test]
    fn every_catalog_scenario_passes() {
        let runner = runner();
        for scenario in catalog_scenarios() {
            let result = runner.run_scenario(&scenario, 1337, 3);
            assert!(result.passed, "{}: {:?}", result.scenario_key, result.failures);
            assert_eq!(result.successful_iterations, 3);
            assert_eq!(result.performance_data.len(), 3);
        }
    }

    #[test]
    fn failing_expectation_is_reported() {
        let mut scenario = find_catalog_scenario("short-haul").unwrap();
        scenario.plan = scenario
            .plan
            .with_expectation(|_: &TripResult| Err(anyhow::anyhow!("forced failure")));
        let result = runner().run_scenario(&scenario, 7, 2);
        assert!(!result.passed);
        assert_eq!(result.failures.len(), 2);
        assert!(result.failures[0].contains("forced failure"));
        assert_eq!(result.average_duration, Duration::ZERO);
    }

    #[test]
    fn results_serialize_durations_as_numbers() {
        let scenario = find_catalog_scenario("same-city").unwrap();
        let result = runner().run_scenario(&scenario, 1, 1);
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["average_duration"].is_u64());
        assert_eq!(json["scenario_key"], "same-city");
    }
}
