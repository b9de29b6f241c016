//! Hours-of-Service compliance evaluation.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::request::TripRequest;
use crate::rules::HosRules;
use crate::simulator::DutyCounters;

/// A projected or realized breach of an HOS limit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComplianceIssue {
    /// Driving within one duty period would exceed the daily driving limit
    DailyDrivingLimit { limit_hours: f64 },
    /// On-duty time within one duty period would exceed the duty window
    DutyWindowLimit { limit_hours: f64 },
    /// Cycle hours plus this trip would exceed the rolling cycle limit
    CycleLimit { limit_hours: f64 },
}

impl ComplianceIssue {
    /// Whether two issues flag the same limit, regardless of the numbers.
    #[must_use]
    pub const fn same_limit(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::DailyDrivingLimit { .. }, Self::DailyDrivingLimit { .. })
                | (Self::DutyWindowLimit { .. }, Self::DutyWindowLimit { .. })
                | (Self::CycleLimit { .. }, Self::CycleLimit { .. })
        )
    }
}

impl fmt::Display for ComplianceIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DailyDrivingLimit { limit_hours } => {
                write!(f, "Would exceed {limit_hours}-hour daily driving limit")
            }
            Self::DutyWindowLimit { limit_hours } => {
                write!(f, "Would exceed {limit_hours}-hour driving window")
            }
            Self::CycleLimit { limit_hours } => {
                write!(f, "Would exceed {limit_hours}-hour cycle limit")
            }
        }
    }
}

/// Outcome of checking a finished simulation against the rule set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub is_compliant: bool,
    pub issues: Vec<ComplianceIssue>,
    pub total_cycle_hours: f64,
    pub remaining_cycle_hours: f64,
}

/// Evaluate final counters and carried-over violations.
///
/// Driving and on-duty limits apply per duty period: the peaks recorded
/// between sleeper resets are checked, not the whole-trip totals.
#[must_use]
pub fn evaluate(
    rules: &HosRules,
    counters: &DutyCounters,
    violations: &[ComplianceIssue],
    request: &TripRequest,
) -> ComplianceReport {
    let mut issues: Vec<ComplianceIssue> = violations.to_vec();

    let total_cycle_hours = request.cycle_hours_used + counters.cumulative_on_duty;
    let within_cycle = total_cycle_hours <= rules.cycle_limit_hours;
    if !within_cycle {
        push_unique(
            &mut issues,
            ComplianceIssue::CycleLimit {
                limit_hours: rules.cycle_limit_hours,
            },
        );
    }

    let within_driving = counters.peak_daily_driving <= rules.max_daily_driving_hours;
    if !within_driving {
        push_unique(
            &mut issues,
            ComplianceIssue::DailyDrivingLimit {
                limit_hours: rules.max_daily_driving_hours,
            },
        );
    }

    let within_window = counters.peak_daily_on_duty <= rules.max_duty_window_hours;
    if !within_window {
        push_unique(
            &mut issues,
            ComplianceIssue::DutyWindowLimit {
                limit_hours: rules.max_duty_window_hours,
            },
        );
    }

    let is_compliant = within_driving && within_window && within_cycle && issues.is_empty();
    let remaining_cycle_hours = (rules.cycle_limit_hours - total_cycle_hours).max(0.0);

    ComplianceReport {
        is_compliant,
        issues,
        total_cycle_hours,
        remaining_cycle_hours,
    }
}

fn push_unique(issues: &mut Vec<ComplianceIssue>, issue: ComplianceIssue) {
    if !issues.iter().any(|existing| existing.same_limit(&issue)) {
        issues.push(issue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counters(driving: f64, on_duty: f64) -> DutyCounters {
        DutyCounters {
            cumulative_driving: driving,
            cumulative_on_duty: on_duty,
            daily_driving: driving,
            daily_on_duty: on_duty,
            peak_daily_driving: driving,
            peak_daily_on_duty: on_duty,
            ..DutyCounters::default()
        }
    }

    fn request(cycle: f64) -> TripRequest {
        TripRequest::new("A", "B", "C", cycle)
    }

    #[test]
    fn short_trip_is_compliant() {
        let report = evaluate(&HosRules::default(), &counters(5.0, 7.5), &[], &request(10.0));
        assert!(report.is_compliant);
        assert!(report.issues.is_empty());
        assert!((report.total_cycle_hours - 17.5).abs() < 1e-9);
        assert!((report.remaining_cycle_hours - 52.5).abs() < 1e-9);
    }

    #[test]
    fn cycle_overrun_is_flagged_and_clamped() {
        let report = evaluate(&HosRules::default(), &counters(2.0, 3.0), &[], &request(70.0));
        assert!(!report.is_compliant);
        assert_eq!(
            report.issues,
            vec![ComplianceIssue::CycleLimit { limit_hours: 70.0 }]
        );
        assert!(report.remaining_cycle_hours.abs() < f64::EPSILON);
        assert_eq!(report.issues[0].to_string(), "Would exceed 70-hour cycle limit");
    }

    #[test]
    fn carried_violations_are_not_duplicated() {
        let carried = [ComplianceIssue::DailyDrivingLimit { limit_hours: 11.0 }];
        let report = evaluate(
            &HosRules::default(),
            &counters(13.6, 15.1),
            &carried,
            &request(10.5),
        );
        assert!(!report.is_compliant);
        assert_eq!(
            report.issues,
            vec![
                ComplianceIssue::DailyDrivingLimit { limit_hours: 11.0 },
                ComplianceIssue::DutyWindowLimit { limit_hours: 14.0 },
            ]
        );
    }

    #[test]
    fn per_period_peaks_decide_driving_compliance() {
        let mut split = counters(18.0, 22.0);
        split.peak_daily_driving = 9.0;
        split.peak_daily_on_duty = 11.0;
        let report = evaluate(&HosRules::default(), &split, &[], &request(0.0));
        assert!(report.is_compliant);
    }

    #[test]
    fn carried_violation_alone_fails_compliance() {
        let carried = [ComplianceIssue::DutyWindowLimit { limit_hours: 14.0 }];
        let report = evaluate(&HosRules::default(), &counters(4.0, 6.0), &carried, &request(0.0));
        assert!(!report.is_compliant);
        assert_eq!(report.issues.len(), 1);
    }

    #[test]
    fn issues_serialize_with_kind_tag() {
        let json =
            serde_json::to_value(ComplianceIssue::DutyWindowLimit { limit_hours: 14.0 }).unwrap();
        assert_eq!(json["kind"], "duty_window_limit");
        assert_eq!(
            ComplianceIssue::DutyWindowLimit { limit_hours: 14.0 }.to_string(),
            "Would exceed 14-hour driving window"
        );
    }
}
