//! Daily duty-status logs derived from the route stops.
//!
//! Stops become status marks on the absolute trip clock. The marks are then
//! cut at each midnight so that every calendar day gets its own log running
//! from 00:00 to 24:00.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::clock::{TimeOfDay, TripClock};
use crate::constants::{
    DAY_TOTAL_TOLERANCE_HOURS, DEFAULT_CARRIER_NAME, DEFAULT_DRIVER_NAME, DEFAULT_VEHICLE_NUMBER,
    HOME_TERMINAL, MINUTES_PER_DAY, REMARK_BREAK_COMPLETED, REMARK_CONTINUED, REMARK_DRIVING,
    REMARK_TRIP_COMPLETE,
};
use crate::stops::RouteStop;

/// Duty status printed on the log grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DutyStatus {
    OffDuty,
    Sleeper,
    Driving,
    OnDuty,
}

impl DutyStatus {
    pub const ALL: [Self; 4] = [Self::OffDuty, Self::Sleeper, Self::Driving, Self::OnDuty];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OffDuty => "off-duty",
            Self::Sleeper => "sleeper",
            Self::Driving => "driving",
            Self::OnDuty => "on-duty",
        }
    }
}

impl fmt::Display for DutyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One status change on a day's log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DutyLogEntry {
    pub time: TimeOfDay,
    pub status: DutyStatus,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mileage: Option<f64>,
}

/// Hours spent in each status over one day.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DutyTotals {
    pub off_duty: f64,
    pub sleeper_berth: f64,
    pub driving: f64,
    pub on_duty: f64,
}

impl DutyTotals {
    pub fn add(&mut self, status: DutyStatus, hours: f64) {
        match status {
            DutyStatus::OffDuty => self.off_duty += hours,
            DutyStatus::Sleeper => self.sleeper_berth += hours,
            DutyStatus::Driving => self.driving += hours,
            DutyStatus::OnDuty => self.on_duty += hours,
        }
    }

    #[must_use]
    pub const fn get(&self, status: DutyStatus) -> f64 {
        match status {
            DutyStatus::OffDuty => self.off_duty,
            DutyStatus::Sleeper => self.sleeper_berth,
            DutyStatus::Driving => self.driving,
            DutyStatus::OnDuty => self.on_duty,
        }
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.off_duty + self.sleeper_berth + self.driving + self.on_duty
    }
}

/// Log-sheet header fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSheetHeader {
    pub driver_name: String,
    pub carrier_name: String,
    pub vehicle_number: String,
}

impl Default for LogSheetHeader {
    fn default() -> Self {
        Self {
            driver_name: DEFAULT_DRIVER_NAME.to_string(),
            carrier_name: DEFAULT_CARRIER_NAME.to_string(),
            vehicle_number: DEFAULT_VEHICLE_NUMBER.to_string(),
        }
    }
}

/// One calendar day of the trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    pub date: NaiveDate,
    /// One-based trip day.
    pub day: u32,
    pub header: LogSheetHeader,
    pub entries: Vec<DutyLogEntry>,
    pub totals: DutyTotals,
    pub total_miles: f64,
}

impl DailyLog {
    /// Each entry with the span it covers. The last span closes at 24:00.
    #[must_use]
    pub fn entry_spans(&self) -> Vec<(&DutyLogEntry, TimeOfDay, TimeOfDay)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                let end = self
                    .entries
                    .get(idx + 1)
                    .map_or(TimeOfDay::END_OF_DAY, |next| next.time);
                (entry, entry.time, end)
            })
            .collect()
    }

    /// Timeline opens at 00:00 and its totals cover the whole day.
    #[must_use]
    pub fn is_full_day(&self) -> bool {
        let opens_at_midnight = self
            .entries
            .first()
            .is_some_and(|entry| entry.time == TimeOfDay::MIDNIGHT);
        opens_at_midnight && (self.totals.total() - 24.0).abs() <= DAY_TOTAL_TOLERANCE_HOURS
    }
}

#[derive(Debug, Clone)]
struct StatusMark {
    at: TripClock,
    status: DutyStatus,
    location: String,
    remarks: Option<String>,
    mileage: Option<f64>,
}

impl StatusMark {
    fn entry(&self) -> DutyLogEntry {
        DutyLogEntry {
            time: self.at.time_of_day(),
            status: self.status,
            location: self.location.clone(),
            remarks: self.remarks.clone(),
            mileage: self.mileage,
        }
    }
}

/// Build one log per calendar day touched by the trip.
#[must_use]
pub fn synthesize(
    stops: &[RouteStop],
    start_date: NaiveDate,
    header: &LogSheetHeader,
) -> Vec<DailyLog> {
    let marks = timeline(stops);
    let last_day = marks.last().map_or(0, |mark| mark.at.day_index());
    (0..=last_day)
        .map(|day_index| build_day(&marks, day_index, start_date, header))
        .collect()
}

fn timeline(stops: &[RouteStop]) -> Vec<StatusMark> {
    let mut marks = vec![StatusMark {
        at: TripClock::TRIP_START,
        status: DutyStatus::OffDuty,
        location: HOME_TERMINAL.to_string(),
        remarks: Some(REMARK_BREAK_COMPLETED.to_string()),
        mileage: None,
    }];

    for (idx, stop) in stops.iter().enumerate() {
        marks.push(StatusMark {
            at: stop.clock(),
            status: stop.kind.duty_status(),
            location: stop.location.clone(),
            remarks: Some(stop.description.clone()),
            mileage: Some(stop.mileage),
        });
        let end = stop.end_clock();
        match stops.get(idx + 1) {
            Some(next) if end < next.clock() => marks.push(StatusMark {
                at: end,
                status: DutyStatus::Driving,
                location: format!("En route to {}", next.location),
                remarks: Some(REMARK_DRIVING.to_string()),
                mileage: Some(stop.mileage),
            }),
            Some(_) => {}
            None => marks.push(StatusMark {
                at: end,
                status: DutyStatus::OffDuty,
                location: stop.location.clone(),
                remarks: Some(REMARK_TRIP_COMPLETE.to_string()),
                mileage: Some(stop.mileage),
            }),
        }
    }
    marks
}

fn build_day(
    marks: &[StatusMark],
    day_index: u32,
    start_date: NaiveDate,
    header: &LogSheetHeader,
) -> DailyLog {
    let day_start = TripClock::from_minutes(day_index.saturating_mul(MINUTES_PER_DAY));
    let day_end = day_start.advanced(MINUTES_PER_DAY);

    let mut entries: Vec<DutyLogEntry> = Vec::new();
    let opens_with_mark = marks.iter().any(|mark| mark.at == day_start);
    if !opens_with_mark {
        if let Some(carried) = marks.iter().rev().find(|mark| mark.at < day_start) {
            entries.push(DutyLogEntry {
                time: TimeOfDay::MIDNIGHT,
                status: carried.status,
                location: carried.location.clone(),
                remarks: Some(REMARK_CONTINUED.to_string()),
                mileage: None,
            });
        }
    }
    entries.extend(
        marks
            .iter()
            .filter(|mark| mark.at >= day_start && mark.at < day_end)
            .map(StatusMark::entry),
    );

    let total_miles = (mileage_before(marks, day_end) - mileage_before(marks, day_start)).max(0.0);
    let date = start_date
        .checked_add_days(Days::new(u64::from(day_index)))
        .unwrap_or(NaiveDate::MAX);

    DailyLog {
        date,
        day: day_index + 1,
        header: header.clone(),
        totals: totals_for(&entries),
        entries,
        total_miles,
    }
}

/// Highest mileage recorded strictly before `at`.
fn mileage_before(marks: &[StatusMark], at: TripClock) -> f64 {
    marks
        .iter()
        .filter(|mark| mark.at < at)
        .filter_map(|mark| mark.mileage)
        .fold(0.0, f64::max)
}

fn totals_for(entries: &[DutyLogEntry]) -> DutyTotals {
    let mut totals = DutyTotals::default();
    for (idx, entry) in entries.iter().enumerate() {
        let next = entries
            .get(idx + 1)
            .map_or(TimeOfDay::END_OF_DAY, |next| next.time);
        totals.add(entry.status, entry.time.hours_until(next));
    }
    totals
}
